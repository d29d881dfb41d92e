mod common;

use async_trait::async_trait;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use sortable_core::{
    CreateTimeAssigner, DocumentMiddleware, MemoryDocumentStore, PluginConfig, SortError,
    SortResult, SortablePlugin,
};
use sortable_model::Entry;
use sortable_types::{ContentTypeUid, Locale};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn plugin(store: Arc<MemoryDocumentStore>, min: Option<i64>) -> SortablePlugin {
    SortablePlugin::new(store, registry(article_schema(min)), PluginConfig::default())
}

fn assigner(store: Arc<MemoryDocumentStore>, config: PluginConfig) -> CreateTimeAssigner {
    CreateTimeAssigner::new(store, registry(article_schema(None)), config)
}

#[tokio::test]
async fn first_entry_gets_the_minimum() {
    let store = Arc::new(MemoryDocumentStore::new());
    let plugin = plugin(store.clone(), None);

    let created = plugin
        .create_document(&uid(), object(json!({"title": "First", "sort": null})), None)
        .await
        .unwrap();

    assert_eq!(created.sort_value("sort"), Some(1));
    assert_eq!(store.entries(&uid()).await.len(), 1);
}

#[tokio::test]
async fn new_entry_lands_after_the_maximum() {
    let store = Arc::new(MemoryDocumentStore::new());
    seed(&store, &[("a", json!(3), "x"), ("b", json!(7), "x"), ("c", json!(null), "x")]).await;
    let plugin = plugin(store.clone(), None);

    let created = plugin
        .create_document(&uid(), object(json!({"title": "Next", "sort": null})), None)
        .await
        .unwrap();

    assert_eq!(created.sort_value("sort"), Some(8));
}

#[tokio::test]
async fn declared_minimum_is_used_for_an_empty_collection() {
    let store = Arc::new(MemoryDocumentStore::new());
    let plugin = plugin(store, Some(0));

    let created = plugin
        .create_document(&uid(), object(json!({"sort": null})), None)
        .await
        .unwrap();
    assert_eq!(created.sort_value("sort"), Some(0));
}

#[tokio::test]
async fn all_null_values_fall_back_to_the_minimum() {
    let store = Arc::new(MemoryDocumentStore::new());
    seed(&store, &[("a", json!(null), "x"), ("b", json!(null), "x")]).await;
    let assigner = assigner(store, PluginConfig::default().with_min_sort_order(100));

    let next = assigner.next_sort_value(&uid(), "sort", None).await.unwrap();
    assert_eq!(next, 100);
}

#[tokio::test]
async fn explicit_value_is_kept() {
    let store = Arc::new(MemoryDocumentStore::new());
    seed(&store, &[("a", json!(5), "x")]).await;
    let assigner = assigner(store, PluginConfig::default());

    for explicit in [json!(0), json!(42), json!("manual")] {
        let mut data = object(json!({"sort": explicit.clone()}));
        assigner.before_create(&uid(), &mut data, None).await.unwrap();
        assert_eq!(data.get("sort"), Some(&explicit));
    }
}

#[tokio::test]
async fn data_without_a_sort_key_is_untouched() {
    let store = Arc::new(MemoryDocumentStore::new());
    seed(&store, &[("a", json!(5), "x")]).await;
    let assigner = assigner(store, PluginConfig::default());

    let mut data = object(json!({"title": "No sort"}));
    assigner.before_create(&uid(), &mut data, None).await.unwrap();
    assert_eq!(Value::Object(data), json!({"title": "No sort"}));
}

#[tokio::test]
async fn first_present_candidate_is_filled() {
    let store = Arc::new(MemoryDocumentStore::new());
    let assigner = assigner(store, PluginConfig::default());

    let mut data = object(json!({"order": null, "orderIndex": null}));
    assigner.before_create(&uid(), &mut data, None).await.unwrap();

    assert_eq!(data.get("order"), Some(&json!(1)));
    assert_eq!(data.get("orderIndex"), Some(&Value::Null));
}

#[tokio::test]
async fn maximum_is_taken_per_locale() {
    let store = Arc::new(MemoryDocumentStore::new());
    for (id, locale, sort) in [("a", "en", 9), ("a", "fr", 2)] {
        store
            .insert(&uid(), Entry::new(id, object(json!({"sort": sort}))).with_locale(locale))
            .await;
    }
    let assigner = assigner(store, PluginConfig::default());

    let fr = Locale::from("fr");
    assert_eq!(assigner.next_sort_value(&uid(), "sort", Some(&fr)).await.unwrap(), 3);
    assert_eq!(assigner.next_sort_value(&uid(), "sort", None).await.unwrap(), 10);
}

#[tokio::test]
async fn maximum_does_not_overflow() {
    let store = Arc::new(MemoryDocumentStore::new());
    seed(&store, &[("a", json!(i64::MAX), "x")]).await;
    let assigner = assigner(store, PluginConfig::default());

    assert_eq!(assigner.next_sort_value(&uid(), "sort", None).await.unwrap(), i64::MAX);
}

struct CountingMiddleware(AtomicUsize);

#[async_trait]
impl DocumentMiddleware for CountingMiddleware {
    async fn before_create(
        &self,
        _uid: &ContentTypeUid,
        data: &mut Map<String, Value>,
        _locale: Option<&Locale>,
    ) -> SortResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        // Runs after the assigner, so the value is already set.
        match data.get("sort") {
            Some(Value::Number(_)) => Ok(()),
            other => Err(SortError::Validation(format!("sort not assigned: {other:?}"))),
        }
    }
}

#[tokio::test]
async fn registered_middlewares_run_after_the_assigner() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut plugin = plugin(store.clone(), None);
    let counter = Arc::new(CountingMiddleware(AtomicUsize::new(0)));
    plugin.register_middleware(counter.clone());

    plugin
        .create_document(&uid(), object(json!({"sort": null})), None)
        .await
        .unwrap();

    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_middleware_aborts_the_creation() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut plugin = plugin(store.clone(), None);
    plugin.register_middleware(Arc::new(CountingMiddleware(AtomicUsize::new(0))));

    // No sort key: the assigner leaves data alone and the check fails.
    let err = plugin
        .create_document(&uid(), object(json!({"title": "x"})), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SortError::Validation(_)));
    assert!(store.entries(&uid()).await.is_empty());
}
