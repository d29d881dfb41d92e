//! Plugin wiring: one value holding the collaborators, the reconciler and
//! the document middlewares.

use crate::assigner::{CreateTimeAssigner, DocumentMiddleware};
use crate::config::PluginConfig;
use crate::controller::Controller;
use crate::error::SortResult;
use crate::reconciler::SortOrderService;
use crate::store::{DocumentStore, SchemaRegistry};
use serde_json::{Map, Value};
use sortable_model::Entry;
use sortable_types::{ContentTypeUid, Locale};
use std::sync::Arc;
use tracing::info;

pub struct SortablePlugin {
    store: Arc<dyn DocumentStore>,
    service: SortOrderService,
    middlewares: Vec<Arc<dyn DocumentMiddleware>>,
}

impl SortablePlugin {
    /// Builds the plugin with the create-time assigner registered.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        schemas: Arc<dyn SchemaRegistry>,
        config: PluginConfig,
    ) -> Self {
        let assigner = CreateTimeAssigner::new(store.clone(), schemas.clone(), config.clone());
        info!(
            default_field = %config.sort_order_field,
            candidates = ?config.sort_field_candidates,
            "Sortable plugin registered"
        );
        Self {
            service: SortOrderService::new(store.clone(), schemas, config),
            store,
            middlewares: vec![Arc::new(assigner)],
        }
    }

    /// Appends a middleware to the creation path. Middlewares run in
    /// registration order.
    pub fn register_middleware(&mut self, middleware: Arc<dyn DocumentMiddleware>) {
        self.middlewares.push(middleware);
    }

    pub fn service(&self) -> &SortOrderService {
        &self.service
    }

    pub fn controller(&self) -> Controller<'_> {
        Controller::new(&self.service)
    }

    /// Creates an entry through the middleware chain.
    pub async fn create_document(
        &self,
        uid: &ContentTypeUid,
        mut data: Map<String, Value>,
        locale: Option<Locale>,
    ) -> SortResult<Entry> {
        for middleware in &self.middlewares {
            middleware.before_create(uid, &mut data, locale.as_ref()).await?;
        }
        self.store.create(uid, data, locale).await
    }
}
