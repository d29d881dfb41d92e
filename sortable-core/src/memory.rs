//! In-memory [`DocumentStore`] used by tests and the standalone server.
//!
//! Understands the subset of the host's filter syntax the reorder modal
//! produces: field equality, `$eq`, `$ne`, `$in`, `$notIn`, `$null`,
//! `$notNull`, `$contains`, `$containsi`, `$lt`/`$lte`/`$gt`/`$gte`, nested
//! relation objects, and `$and` / `$or` / `$not` combinators.

use crate::error::{SortError, SortResult};
use crate::store::{DocumentStore, FindFirstQuery, FindManyQuery, SortDirection, UpdateRequest};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sortable_model::Entry;
use sortable_types::{ContentTypeUid, DocumentId, Locale};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// A write applied through [`DocumentStore::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedUpdate {
    pub uid: ContentTypeUid,
    pub document_id: DocumentId,
    pub locale: Option<Locale>,
    pub data: Map<String, Value>,
}

/// Document store holding every entry in process memory.
///
/// Filters are evaluated against the rendered entry (attributes plus
/// `documentId` and `locale`), so `{"documentId": {"$in": [...]}}` works.
#[derive(Default)]
pub struct MemoryDocumentStore {
    entries: RwLock<HashMap<ContentTypeUid, Vec<Entry>>>,
    update_log: RwLock<Vec<LoggedUpdate>>,
    failing: RwLock<HashSet<DocumentId>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry as-is, bypassing document middlewares.
    pub async fn insert(&self, uid: &ContentTypeUid, entry: Entry) {
        self.entries
            .write()
            .await
            .entry(uid.clone())
            .or_default()
            .push(entry);
    }

    /// Snapshot of all entries of `uid` in insertion order.
    pub async fn entries(&self, uid: &ContentTypeUid) -> Vec<Entry> {
        self.entries
            .read()
            .await
            .get(uid)
            .cloned()
            .unwrap_or_default()
    }

    /// Every successful update, in completion order.
    pub async fn update_log(&self) -> Vec<LoggedUpdate> {
        self.update_log.read().await.clone()
    }

    pub async fn clear_update_log(&self) {
        self.update_log.write().await.clear();
    }

    /// Makes every later update of `document_id` fail with [`SortError::Store`].
    pub async fn fail_updates_for(&self, document_id: impl Into<DocumentId>) {
        self.failing.write().await.insert(document_id.into());
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_many(&self, uid: &ContentTypeUid, query: FindManyQuery) -> SortResult<Vec<Entry>> {
        let guard = self.entries.read().await;
        let Some(all) = guard.get(uid) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for entry in all {
            if !locale_matches(entry, query.locale.as_ref()) {
                continue;
            }
            if let Some(filters) = &query.filters {
                if !matches_filter(&entry.to_json(), filters)? {
                    continue;
                }
            }
            found.push(entry.clone());
        }
        drop(guard);

        if let Some(sort) = &query.sort {
            found.sort_by(|a, b| {
                let ord = compare_sort_values(a.data.get(&sort.field), b.data.get(&sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            found.truncate(limit);
        }
        if !query.fields.is_empty() {
            for entry in &mut found {
                entry
                    .data
                    .retain(|key, _| query.fields.contains(key) || query.populate.contains(key));
            }
        }
        Ok(found)
    }

    async fn find_first(&self, uid: &ContentTypeUid, query: FindFirstQuery) -> SortResult<Option<Entry>> {
        let many = FindManyQuery {
            fields: query.fields,
            sort: query.sort,
            locale: query.locale,
            limit: Some(1),
            ..FindManyQuery::default()
        };
        Ok(self.find_many(uid, many).await?.into_iter().next())
    }

    async fn update(&self, uid: &ContentTypeUid, request: UpdateRequest) -> SortResult<Entry> {
        if self.failing.read().await.contains(&request.document_id) {
            return Err(SortError::Store(format!(
                "update of {} rejected by store",
                request.document_id
            )));
        }

        let mut guard = self.entries.write().await;
        let entries = guard
            .get_mut(uid)
            .ok_or_else(|| SortError::NotFound(format!("content type {uid}")))?;

        let mut updated = None;
        for entry in entries.iter_mut().filter(|e| {
            e.document_id == request.document_id && locale_matches(e, request.locale.as_ref())
        }) {
            for (key, value) in &request.data {
                entry.data.insert(key.clone(), value.clone());
            }
            updated.get_or_insert_with(|| entry.clone());
        }
        drop(guard);

        let updated = updated
            .ok_or_else(|| SortError::NotFound(format!("document {}", request.document_id)))?;
        self.update_log.write().await.push(LoggedUpdate {
            uid: uid.clone(),
            document_id: request.document_id,
            locale: request.locale,
            data: request.data,
        });
        Ok(updated)
    }

    async fn create(
        &self,
        uid: &ContentTypeUid,
        data: Map<String, Value>,
        locale: Option<Locale>,
    ) -> SortResult<Entry> {
        let entry = Entry {
            document_id: DocumentId::generate(),
            locale,
            data,
        };
        self.insert(uid, entry.clone()).await;
        Ok(entry)
    }
}

fn locale_matches(entry: &Entry, locale: Option<&Locale>) -> bool {
    locale.is_none_or(|l| entry.locale.as_ref() == Some(l))
}

/// Orders sort keys: missing and non-scalar values first, then strings,
/// then numbers.
fn compare_sort_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 1,
            _ => 0,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn matches_filter(doc: &Value, filter: &Value) -> SortResult<bool> {
    let Value::Object(conditions) = filter else {
        return Err(SortError::Validation(format!(
            "filters must be an object, got {filter}"
        )));
    };

    for (key, cond) in conditions {
        let ok = match key.as_str() {
            "$and" => {
                let mut all = true;
                for f in as_array(key, cond)? {
                    all &= matches_filter(doc, f)?;
                }
                all
            }
            "$or" => {
                let mut any = false;
                for f in as_array(key, cond)? {
                    any |= matches_filter(doc, f)?;
                }
                any
            }
            "$not" => !matches_filter(doc, cond)?,
            op if op.starts_with('$') => {
                return Err(SortError::Validation(format!("unsupported filter operator {op}")));
            }
            field => matches_field(doc.get(field), cond)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches_field(value: Option<&Value>, cond: &Value) -> SortResult<bool> {
    let Value::Object(ops) = cond else {
        return Ok(value == Some(cond));
    };

    // Nested relation filter, e.g. {"category": {"name": {"$eq": "x"}}}
    if !ops.keys().any(|k| k.starts_with('$')) {
        return match value {
            Some(nested @ Value::Object(_)) => matches_filter(nested, cond),
            Some(Value::Array(items)) => {
                for item in items {
                    if matches_filter(item, cond)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Ok(false),
        };
    }

    let is_null = value.is_none_or(Value::is_null);
    for (op, operand) in ops {
        let ok = match op.as_str() {
            "$eq" => value == Some(operand),
            "$ne" => value != Some(operand),
            "$in" => as_array(op, operand)?.iter().any(|v| Some(v) == value),
            "$notIn" => !as_array(op, operand)?.iter().any(|v| Some(v) == value),
            "$null" => is_null == truthy(operand),
            "$notNull" => is_null != truthy(operand),
            "$contains" => text_contains(value, operand, false),
            "$containsi" => text_contains(value, operand, true),
            "$lt" => compare_numbers(value, operand).is_some_and(Ordering::is_lt),
            "$lte" => compare_numbers(value, operand).is_some_and(Ordering::is_le),
            "$gt" => compare_numbers(value, operand).is_some_and(Ordering::is_gt),
            "$gte" => compare_numbers(value, operand).is_some_and(Ordering::is_ge),
            "$and" | "$or" | "$not" => match value {
                Some(nested @ Value::Object(_)) => {
                    let mut wrapped = Map::new();
                    wrapped.insert(op.clone(), operand.clone());
                    matches_filter(nested, &Value::Object(wrapped))?
                }
                _ => false,
            },
            other => {
                return Err(SortError::Validation(format!(
                    "unsupported filter operator {other}"
                )));
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn as_array<'a>(op: &str, value: &'a Value) -> SortResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| SortError::Validation(format!("{op} expects an array")))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

fn text_contains(value: Option<&Value>, needle: &Value, case_insensitive: bool) -> bool {
    let (Some(Value::String(haystack)), Value::String(needle)) = (value, needle) else {
        return false;
    };
    if case_insensitive {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(needle.as_str())
    }
}

fn compare_numbers(value: Option<&Value>, operand: &Value) -> Option<Ordering> {
    let a = value?.as_f64()?;
    let b = operand.as_f64()?;
    a.partial_cmp(&b)
}
