//! Sort-order reconciliation: turn a client's reordered ids into the
//! smallest set of sort-field writes.
//!
//! Two entry points:
//! - [`SortOrderService::update_sort_order`] keeps one ordering across the
//!   whole collection. With a filter present, only the filtered entries
//!   trade places; everything else keeps its slot.
//! - [`SortOrderService::update_sort_order_scoped`] renumbers the filtered
//!   entries on their own (per-scope local ordering). Values may collide
//!   with entries outside the scope.

use crate::config::PluginConfig;
use crate::error::{SortError, SortResult};
use crate::reindex::reorder_subset;
use crate::store::{DocumentStore, FindManyQuery, SchemaRegistry, SortSpec, UpdateRequest};
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use sortable_model::{ContentTypeSchema, Entry, SortFieldResolver};
use sortable_types::{ContentTypeUid, DocumentId, Locale};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A reorder submitted by the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReorderRequest {
    pub sorted_document_ids: Vec<DocumentId>,
    pub filters: Option<Value>,
    pub locale: Option<Locale>,
}

/// Parameters of an entries listing for the reorder modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchRequest {
    /// Attribute displayed as the entry's label.
    pub main_field: String,
    pub filters: Option<Value>,
    pub locale: Option<Locale>,
    /// Relation attributes to populate.
    pub relation_fields: Vec<String>,
}

/// One entry of a pre-update snapshot: id and stored sort value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub document_id: DocumentId,
    pub sort_value: Option<i64>,
}

/// A sort-field write the reconciler decided to issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedUpdate {
    pub document_id: DocumentId,
    pub sort_value: i64,
}

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub sort_field: String,
    pub updates: Vec<PlannedUpdate>,
    pub unchanged: usize,
}

/// Position-for-position diff of `current` against `target`.
///
/// The entry at index `i` of `target` should hold `min_sort_order + i`. A write
/// is skipped only when the snapshot has the same id at that index *and* it
/// already stores exactly that value. A missing previous value never counts
/// as correct.
///
/// Fails with [`SortError::Validation`] when a target value does not fit in
/// an `i64`.
pub fn plan_updates(
    current: &[SnapshotEntry],
    target: &[DocumentId],
    min_sort_order: i64,
) -> SortResult<Vec<PlannedUpdate>> {
    let mut updates = Vec::new();
    for (index, document_id) in target.iter().enumerate() {
        let desired = i64::try_from(index)
            .ok()
            .and_then(|offset| min_sort_order.checked_add(offset))
            .ok_or_else(|| {
                SortError::Validation(format!(
                    "sort value overflows: minimum {min_sort_order} plus position {index}"
                ))
            })?;
        let in_place = current.get(index).is_some_and(|prev| {
            prev.document_id == *document_id && prev.sort_value == Some(desired)
        });
        if !in_place {
            updates.push(PlannedUpdate {
                document_id: document_id.clone(),
                sort_value: desired,
            });
        }
    }
    Ok(updates)
}

/// Reads and rewrites the sort field of a content type's entries.
pub struct SortOrderService {
    store: Arc<dyn DocumentStore>,
    schemas: Arc<dyn SchemaRegistry>,
    config: PluginConfig,
    resolver: SortFieldResolver,
}

impl SortOrderService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        schemas: Arc<dyn SchemaRegistry>,
        config: PluginConfig,
    ) -> Self {
        let resolver = config.sort_field_resolver();
        Self {
            store,
            schemas,
            config,
            resolver,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Looks up the schema and the sort field of `uid`.
    pub fn sortable_schema(&self, uid: &ContentTypeUid) -> SortResult<(ContentTypeSchema, String)> {
        let schema = self
            .schemas
            .content_type(uid)
            .ok_or_else(|| SortError::NotFound(format!("content type {uid}")))?;
        if !schema.is_collection_type() {
            return Err(SortError::Validation(format!(
                "content type {uid} is not a collection type"
            )));
        }
        let field = self.resolver.resolve_for_schema(&schema).ok_or_else(|| {
            SortError::Validation(format!(
                "content type {uid} is not sortable: none of [{}] is an integer attribute",
                self.resolver.candidates().join(", ")
            ))
        })?;
        Ok((schema, field))
    }

    // ── Listing ──────────────────────────────────────────────────

    /// Lists entries ascending by the sort field for the reorder modal.
    pub async fn fetch_entries(&self, uid: &ContentTypeUid, request: FetchRequest) -> SortResult<Vec<Value>> {
        self.fetch(uid, request, false).await
    }

    /// Same listing as [`Self::fetch_entries`], issued from a scoped modal.
    pub async fn fetch_entries_scoped(
        &self,
        uid: &ContentTypeUid,
        request: FetchRequest,
    ) -> SortResult<Vec<Value>> {
        self.fetch(uid, request, true).await
    }

    async fn fetch(&self, uid: &ContentTypeUid, request: FetchRequest, scoped: bool) -> SortResult<Vec<Value>> {
        if request.main_field.trim().is_empty() {
            return Err(SortError::Validation("mainField is required".into()));
        }
        let (schema, field) = self.sortable_schema(uid)?;
        let locale = scope_locale(uid, &schema, request.locale)?;

        let query = FindManyQuery::new()
            .with_fields([request.main_field.clone(), field.clone()])
            .with_populate(request.relation_fields)
            .with_sort(SortSpec::asc(&field))
            .with_filters(request.filters)
            .with_locale(locale)
            .with_limit(self.config.entries_page_size);
        let entries = self.store.find_many(uid, query).await?;

        debug!(uid = %uid, scoped, count = entries.len(), "Fetched entries");
        Ok(entries.iter().map(Entry::to_json).collect())
    }

    // ── Reconciliation ───────────────────────────────────────────

    /// Applies a new ordering across the whole collection.
    ///
    /// Without filters `sorted_document_ids` must list every entry, or the
    /// whole first page when listings are paged. With filters it lists only
    /// the filtered entries, which are interleaved back into the slots they
    /// already occupy.
    pub async fn update_sort_order(
        &self,
        uid: &ContentTypeUid,
        request: ReorderRequest,
    ) -> SortResult<ReconcileReport> {
        let (schema, field) = self.sortable_schema(uid)?;
        let locale = scope_locale(uid, &schema, request.locale)?;
        let snapshot = self.snapshot(uid, &field, None, locale.clone()).await?;
        let current_ids: Vec<DocumentId> = snapshot.iter().map(|e| e.document_id.clone()).collect();

        let target = match &request.filters {
            None => self.paged_target(&current_ids, &request.sorted_document_ids)?,
            Some(_) => reorder_subset(&current_ids, &request.sorted_document_ids)?,
        };
        if target.len() != snapshot.len() {
            return Err(stale_count(snapshot.len(), target.len()));
        }

        let min = self.config.min_sort_order_for(Some(&schema), &field);
        self.apply(uid, &field, locale.as_ref(), &snapshot, &target, min)
            .await
    }

    /// Renumbers only the filtered entries, from the minimum sort value up,
    /// ignoring entries outside the filter. Without filters this is
    /// [`Self::update_sort_order`].
    pub async fn update_sort_order_scoped(
        &self,
        uid: &ContentTypeUid,
        request: ReorderRequest,
    ) -> SortResult<ReconcileReport> {
        if request.filters.is_none() {
            return self.update_sort_order(uid, request).await;
        }

        let (schema, field) = self.sortable_schema(uid)?;
        let locale = scope_locale(uid, &schema, request.locale)?;
        let snapshot = self
            .snapshot(uid, &field, request.filters, locale.clone())
            .await?;
        let current_ids: Vec<DocumentId> = snapshot.iter().map(|e| e.document_id.clone()).collect();
        let target = self.paged_target(&current_ids, &request.sorted_document_ids)?;

        let min = self.config.min_sort_order_for(Some(&schema), &field);
        self.apply(uid, &field, locale.as_ref(), &snapshot, &target, min)
            .await
    }

    /// Full target order for a reorder of `requested`.
    ///
    /// When listings are paged and `current` is longer than a page, a list
    /// of exactly one page reorders the first page of `current`; the entries
    /// past it keep their relative order behind it.
    fn paged_target(
        &self,
        current: &[DocumentId],
        requested: &[DocumentId],
    ) -> SortResult<Vec<DocumentId>> {
        match self.config.entries_page_size {
            Some(page) if current.len() > page && requested.len() == page => {
                let (first_page, rest) = current.split_at(page);
                check_membership(first_page, requested)?;
                Ok(requested.iter().chain(rest).cloned().collect())
            }
            _ => {
                check_membership(current, requested)?;
                Ok(requested.to_vec())
            }
        }
    }

    async fn snapshot(
        &self,
        uid: &ContentTypeUid,
        field: &str,
        filters: Option<Value>,
        locale: Option<Locale>,
    ) -> SortResult<Vec<SnapshotEntry>> {
        let query = FindManyQuery::new()
            .with_fields([field])
            .with_sort(SortSpec::asc(field))
            .with_filters(filters)
            .with_locale(locale);
        let entries = self.store.find_many(uid, query).await?;
        Ok(entries
            .into_iter()
            .map(|e| SnapshotEntry {
                sort_value: e.sort_value(field),
                document_id: e.document_id,
            })
            .collect())
    }

    /// Diffs and dispatches all writes concurrently. Every write is awaited;
    /// writes that succeeded before a failure are not rolled back.
    async fn apply(
        &self,
        uid: &ContentTypeUid,
        field: &str,
        locale: Option<&Locale>,
        snapshot: &[SnapshotEntry],
        target: &[DocumentId],
        min_sort_order: i64,
    ) -> SortResult<ReconcileReport> {
        let updates = plan_updates(snapshot, target, min_sort_order)?;

        let writes = updates.iter().map(|update| {
            let mut data = Map::new();
            data.insert(field.to_string(), Value::from(update.sort_value));
            self.store.update(
                uid,
                UpdateRequest {
                    document_id: update.document_id.clone(),
                    locale: locale.cloned(),
                    data,
                },
            )
        });
        let results = join_all(writes).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if let Some(err) = results.into_iter().find_map(Result::err) {
            warn!(uid = %uid, failed, total = updates.len(), error = %err, "Sort order writes failed");
            return Err(err);
        }

        let unchanged = target.len() - updates.len();
        info!(
            uid = %uid,
            namespace = uid.namespace().unwrap_or_default(),
            field,
            writes = updates.len(),
            unchanged,
            "Sort order reconciled"
        );
        Ok(ReconcileReport {
            sort_field: field.to_string(),
            updates,
            unchanged,
        })
    }
}

/// Localized content types are read and written one locale at a time;
/// the locale is dropped for content types that are not localized.
fn scope_locale(
    uid: &ContentTypeUid,
    schema: &ContentTypeSchema,
    locale: Option<Locale>,
) -> SortResult<Option<Locale>> {
    match (schema.localized, locale) {
        (true, None) => Err(SortError::Validation(format!(
            "content type {uid} is localized: a locale is required"
        ))),
        (true, locale) => Ok(locale),
        (false, Some(locale)) => {
            debug!(uid = %uid, locale = %locale, "Ignoring locale of non-localized content type");
            Ok(None)
        }
        (false, None) => Ok(None),
    }
}

/// Requires `requested` to list exactly the ids of `current`, each once.
fn check_membership(current: &[DocumentId], requested: &[DocumentId]) -> SortResult<()> {
    let known: HashSet<&DocumentId> = current.iter().collect();
    let unknown: Vec<&str> = requested
        .iter()
        .filter(|id| !known.contains(id))
        .map(DocumentId::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(SortError::InputMismatch(format!(
            "ids not present in the current entries: {}",
            unknown.join(", ")
        )));
    }
    if requested.len() != current.len() {
        return Err(stale_count(current.len(), requested.len()));
    }
    let distinct: HashSet<&DocumentId> = requested.iter().collect();
    if distinct.len() != requested.len() {
        return Err(SortError::InputMismatch(
            "sorted ids contain duplicates".into(),
        ));
    }
    Ok(())
}

fn stale_count(expected: usize, got: usize) -> SortError {
    SortError::InputMismatch(format!(
        "stale input: record count changed since last fetch (expected {expected}, got {got})"
    ))
}
