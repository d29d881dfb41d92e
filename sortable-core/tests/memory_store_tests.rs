mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sortable_core::{
    DocumentStore, FindFirstQuery, FindManyQuery, MemoryDocumentStore, SortError, SortSpec,
    UpdateRequest,
};
use sortable_model::Entry;
use sortable_types::{DocumentId, Locale};

async fn store_with_relations() -> MemoryDocumentStore {
    let store = MemoryDocumentStore::new();
    let rows = [
        ("a", json!({"title": "Alpha", "sort": 3, "author": {"name": "Ann"}, "tags": [{"name": "x"}]})),
        ("b", json!({"title": "beta", "sort": 1, "author": {"name": "Bob"}, "tags": []})),
        ("c", json!({"title": "Gamma", "sort": null, "author": null, "tags": [{"name": "y"}]})),
    ];
    for (id, data) in rows {
        store.insert(&uid(), Entry::new(id, object(data))).await;
    }
    store
}

async fn matching(store: &MemoryDocumentStore, filters: Value) -> Vec<String> {
    let query = FindManyQuery::new()
        .with_sort(SortSpec::asc("sort"))
        .with_filters(Some(filters));
    store
        .find_many(&uid(), query)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.document_id.to_string())
        .collect()
}

#[tokio::test]
async fn missing_values_sort_first() {
    let store = store_with_relations().await;

    let asc = store
        .find_many(&uid(), FindManyQuery::new().with_sort(SortSpec::asc("sort")))
        .await
        .unwrap();
    let desc = store
        .find_many(&uid(), FindManyQuery::new().with_sort(SortSpec::desc("sort")))
        .await
        .unwrap();

    let ids = |entries: Vec<Entry>| -> Vec<String> {
        entries.into_iter().map(|e| e.document_id.to_string()).collect()
    };
    assert_eq!(ids(asc), ["c", "b", "a"]);
    assert_eq!(ids(desc), ["a", "b", "c"]);
}

#[tokio::test]
async fn field_operators() {
    let store = store_with_relations().await;

    assert_eq!(matching(&store, json!({"title": "Alpha"})).await, ["a"]);
    assert_eq!(matching(&store, json!({"sort": {"$gte": 1, "$lt": 3}})).await, ["b"]);
    assert_eq!(matching(&store, json!({"sort": {"$null": true}})).await, ["c"]);
    assert_eq!(matching(&store, json!({"sort": {"$notNull": true}})).await, ["b", "a"]);
    assert_eq!(matching(&store, json!({"title": {"$containsi": "A"}})).await, ["c", "b", "a"]);
    assert_eq!(matching(&store, json!({"title": {"$contains": "a"}})).await, ["c", "b", "a"]);
    assert_eq!(matching(&store, json!({"title": {"$contains": "G"}})).await, ["c"]);
    assert_eq!(matching(&store, json!({"documentId": {"$in": ["a", "c"]}})).await, ["c", "a"]);
    assert_eq!(matching(&store, json!({"documentId": {"$notIn": ["a"]}})).await, ["c", "b"]);
    assert_eq!(matching(&store, json!({"title": {"$ne": "beta"}})).await, ["c", "a"]);
}

#[tokio::test]
async fn relation_and_logical_filters() {
    let store = store_with_relations().await;

    assert_eq!(matching(&store, json!({"author": {"name": {"$eq": "Bob"}}})).await, ["b"]);
    assert_eq!(matching(&store, json!({"tags": {"name": "y"}})).await, ["c"]);
    assert_eq!(
        matching(&store, json!({"$or": [{"title": "Alpha"}, {"title": "beta"}]})).await,
        ["b", "a"]
    );
    assert_eq!(
        matching(&store, json!({"$and": [{"sort": {"$notNull": true}}, {"$not": {"title": "beta"}}]})).await,
        ["a"]
    );
}

#[tokio::test]
async fn unknown_operator_is_a_validation_error() {
    let store = store_with_relations().await;
    let query = FindManyQuery::new().with_filters(Some(json!({"title": {"$regex": "a"}})));

    let err = store.find_many(&uid(), query).await.unwrap_err();
    assert!(matches!(err, SortError::Validation(ref m) if m.contains("$regex")));
}

#[tokio::test]
async fn projection_keeps_fields_and_populated_relations() {
    let store = store_with_relations().await;
    let query = FindManyQuery::new()
        .with_fields(["title"])
        .with_populate(vec!["author".to_string()])
        .with_limit(Some(1));

    let found = store.find_many(&uid(), query).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].to_json(),
        json!({"documentId": "a", "title": "Alpha", "author": {"name": "Ann"}})
    );
}

#[tokio::test]
async fn find_first_honours_sort_and_locale() {
    let store = MemoryDocumentStore::new();
    for (id, locale, sort) in [("a", "en", 4), ("b", "en", 9), ("a", "de", 1)] {
        store
            .insert(&uid(), Entry::new(id, object(json!({"sort": sort}))).with_locale(locale))
            .await;
    }

    let query = |locale: &str| FindFirstQuery {
        fields: vec!["sort".into()],
        sort: Some(SortSpec::desc("sort")),
        locale: Some(Locale::from(locale)),
    };
    let en = store.find_first(&uid(), query("en")).await.unwrap().unwrap();
    let de = store.find_first(&uid(), query("de")).await.unwrap().unwrap();
    let fr = store.find_first(&uid(), query("fr")).await.unwrap();

    assert_eq!(en.document_id.as_str(), "b");
    assert_eq!(de.sort_value("sort"), Some(1));
    assert!(fr.is_none());
}

#[tokio::test]
async fn update_merges_and_logs() {
    let store = store_with_relations().await;

    let updated = store
        .update(
            &uid(),
            UpdateRequest {
                document_id: DocumentId::from("a"),
                locale: None,
                data: object(json!({"sort": 10})),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.sort_value("sort"), Some(10));
    assert_eq!(updated.get_str("title"), Some("Alpha"));
    let log = store.update_log().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].document_id.as_str(), "a");
}

#[tokio::test]
async fn update_of_unknown_document_is_not_found() {
    let store = store_with_relations().await;

    let err = store
        .update(
            &uid(),
            UpdateRequest {
                document_id: DocumentId::from("zz"),
                locale: None,
                data: object(json!({"sort": 1})),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SortError::NotFound(_)));
    assert!(store.update_log().await.is_empty());
}

#[tokio::test]
async fn create_generates_an_id() {
    let store = MemoryDocumentStore::new();

    let created = store
        .create(&uid(), object(json!({"title": "new"})), Some(Locale::from("en")))
        .await
        .unwrap();

    assert!(!created.document_id.as_str().is_empty());
    assert_eq!(store.entries(&uid()).await, vec![created]);
}
