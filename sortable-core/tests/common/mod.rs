#![allow(dead_code)]

use serde_json::{Map, Value, json};
use sortable_core::{MemoryDocumentStore, PluginConfig, SortOrderService, StaticSchemaRegistry};
use sortable_model::{Attribute, ContentTypeSchema, Entry};
use sortable_types::{ContentTypeUid, DocumentId};
use std::sync::Arc;

pub const ARTICLE: &str = "api::article.article";

pub fn uid() -> ContentTypeUid {
    ContentTypeUid::from(ARTICLE)
}

pub fn ids(raw: &[&str]) -> Vec<DocumentId> {
    raw.iter().map(|s| DocumentId::from(*s)).collect()
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Article schema whose `sort` attribute optionally declares a minimum.
pub fn article_schema(min: Option<i64>) -> ContentTypeSchema {
    let sort = match min {
        Some(min) => Attribute::integer().with_min(min),
        None => Attribute::integer(),
    };
    ContentTypeSchema::collection(ARTICLE)
        .with_attribute("title", Attribute::string())
        .with_attribute("category", Attribute::string())
        .with_attribute("sort", sort)
}

pub fn registry(schema: ContentTypeSchema) -> Arc<StaticSchemaRegistry> {
    Arc::new(StaticSchemaRegistry::new([schema]))
}

/// Inserts `(id, sort, category)` rows in the given order.
pub async fn seed(store: &MemoryDocumentStore, rows: &[(&str, Value, &str)]) {
    for (id, sort, category) in rows {
        let entry = Entry::new(
            *id,
            object(json!({"title": format!("Title {id}"), "category": category, "sort": sort})),
        );
        store.insert(&uid(), entry).await;
    }
}

pub fn service(
    store: Arc<MemoryDocumentStore>,
    schema: ContentTypeSchema,
    config: PluginConfig,
) -> SortOrderService {
    SortOrderService::new(store, registry(schema), config)
}

/// Document ids ordered by stored sort value.
pub async fn ordered_ids(store: &MemoryDocumentStore) -> Vec<String> {
    let mut entries = store.entries(&uid()).await;
    entries.sort_by_key(|e| e.sort_value("sort"));
    entries
        .into_iter()
        .map(|e| e.document_id.to_string())
        .collect()
}

pub async fn sort_of(store: &MemoryDocumentStore, id: &str) -> Option<i64> {
    store
        .entries(&uid())
        .await
        .into_iter()
        .find(|e| e.document_id.as_str() == id)
        .and_then(|e| e.sort_value("sort"))
}
