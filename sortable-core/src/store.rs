//! Persistence and schema collaborator interfaces.
//!
//! The host content system owns storage. The core only needs to list
//! entries of a content type, fetch the top entry by a sort key, patch one
//! entry, and create one. Filters are opaque and passed through verbatim.

use crate::error::SortResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sortable_model::{ContentTypeSchema, Entry};
use sortable_types::{ContentTypeUid, DocumentId, Locale};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort key of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Query for [`DocumentStore::find_many`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindManyQuery {
    /// Attributes to project. Empty means all.
    pub fields: Vec<String>,
    /// Relation attributes to populate alongside the projection.
    pub populate: Vec<String>,
    pub sort: Option<SortSpec>,
    pub filters: Option<Value>,
    pub locale: Option<Locale>,
    pub limit: Option<usize>,
}

impl FindManyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_populate(mut self, populate: Vec<String>) -> Self {
        self.populate = populate;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_filters(mut self, filters: Option<Value>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Query for [`DocumentStore::find_first`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindFirstQuery {
    pub fields: Vec<String>,
    pub sort: Option<SortSpec>,
    pub locale: Option<Locale>,
}

/// Partial update of a single entry.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub document_id: DocumentId,
    pub locale: Option<Locale>,
    pub data: Map<String, Value>,
}

/// The host's document API, keyed by content type.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists entries matching `query`.
    async fn find_many(&self, uid: &ContentTypeUid, query: FindManyQuery) -> SortResult<Vec<Entry>>;

    /// Returns the first entry in `query.sort` order, if any.
    async fn find_first(&self, uid: &ContentTypeUid, query: FindFirstQuery) -> SortResult<Option<Entry>>;

    /// Patches the given attributes of one entry.
    async fn update(&self, uid: &ContentTypeUid, request: UpdateRequest) -> SortResult<Entry>;

    /// Persists a new entry. Document middlewares run before this is called.
    async fn create(
        &self,
        uid: &ContentTypeUid,
        data: Map<String, Value>,
        locale: Option<Locale>,
    ) -> SortResult<Entry>;
}

/// Read access to content-type schemas.
pub trait SchemaRegistry: Send + Sync {
    fn content_type(&self, uid: &ContentTypeUid) -> Option<ContentTypeSchema>;
}

/// Schema registry backed by a fixed map, filled at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaRegistry {
    schemas: HashMap<ContentTypeUid, ContentTypeSchema>,
}

impl StaticSchemaRegistry {
    pub fn new(schemas: impl IntoIterator<Item = ContentTypeSchema>) -> Self {
        Self {
            schemas: schemas.into_iter().map(|s| (s.uid.clone(), s)).collect(),
        }
    }

    pub fn register(&mut self, schema: ContentTypeSchema) {
        self.schemas.insert(schema.uid.clone(), schema);
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaRegistry for StaticSchemaRegistry {
    fn content_type(&self, uid: &ContentTypeUid) -> Option<ContentTypeSchema> {
        self.schemas.get(uid).cloned()
    }
}
