//! Create-time sort value assignment.
//!
//! Runs as a document middleware before an entry is created. When the new
//! entry carries a sort field key without a value, it gets one past the
//! current maximum so new entries land at the end of the list.
//!
//! Two concurrent creations can read the same maximum and store duplicate
//! values. The next reconciliation renumbers them.

use crate::config::PluginConfig;
use crate::error::SortResult;
use crate::store::{DocumentStore, FindFirstQuery, SchemaRegistry, SortSpec};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sortable_model::SortFieldResolver;
use sortable_types::{ContentTypeUid, Locale};
use std::sync::Arc;
use tracing::debug;

/// Hook run on the host's document creation path, before the write.
///
/// Most middlewares only need to touch a few keys of `data`; returning an
/// error aborts the creation.
#[async_trait]
pub trait DocumentMiddleware: Send + Sync {
    async fn before_create(
        &self,
        uid: &ContentTypeUid,
        data: &mut Map<String, Value>,
        locale: Option<&Locale>,
    ) -> SortResult<()>;
}

/// Fills in a missing sort value with `max + 1`, or the minimum sort value
/// when the collection has no usable maximum yet.
pub struct CreateTimeAssigner {
    store: Arc<dyn DocumentStore>,
    schemas: Arc<dyn SchemaRegistry>,
    config: PluginConfig,
    resolver: SortFieldResolver,
}

impl CreateTimeAssigner {
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

    /// The value a new entry of `uid` would receive in `field`.
    pub async fn next_sort_value(
        &self,
        uid: &ContentTypeUid,
        field: &str,
        locale: Option<&Locale>,
    ) -> SortResult<i64> {
        let query = FindFirstQuery {
            fields: vec![field.to_string()],
            sort: Some(SortSpec::desc(field)),
            locale: locale.cloned(),
        };
        let max = self
            .store
            .find_first(uid, query)
            .await?
            .and_then(|entry| entry.sort_value(field));

        Ok(match max {
            Some(max) => max.saturating_add(1),
            None => {
                let schema = self.schemas.content_type(uid);
                self.config.min_sort_order_for(schema.as_ref(), field)
            }
        })
    }
}

#[async_trait]
impl DocumentMiddleware for CreateTimeAssigner {
    async fn before_create(
        &self,
        uid: &ContentTypeUid,
        data: &mut Map<String, Value>,
        locale: Option<&Locale>,
    ) -> SortResult<()> {
        let Some(field) = self.resolver.resolve_for_data(data) else {
            return Ok(());
        };
        if data.get(&field).is_some_and(|v| !v.is_null()) {
            return Ok(());
        }

        let next = self.next_sort_value(uid, &field, locale).await?;
        debug!(uid = %uid, field = %field, value = next, "Assigned sort value on create");
        data.insert(field, Value::from(next));
        Ok(())
    }
}
