//! Drag-and-drop reordering core for collection-type content.
//!
//! Persists a client-chosen order into an integer sort field on each entry.
//!
//! # Components
//!
//! - **Reindex**: permute a subset of an ordering in place, leaving every
//!   other element in its slot ([`reorder_subset_in_place`])
//! - **Reconciler**: diff a target ordering against the stored one and
//!   issue only the writes that change something ([`SortOrderService`])
//! - **Assigner**: give new entries a sort value one past the current
//!   maximum ([`CreateTimeAssigner`])
//! - **Controller**: framework-independent request handling for the admin
//!   routes ([`Controller`])
//!
//! Storage and schemas belong to the host and are reached only through the
//! [`DocumentStore`] and [`SchemaRegistry`] traits.
//!
//! # Example
//!
//! ```
//! use sortable_core::reorder_subset;
//!
//! let full = ["a", "b", "c", "d", "e", "f"];
//! let result = reorder_subset(&full, &["e", "a", "c"]).unwrap();
//! assert_eq!(result, ["e", "b", "a", "d", "c", "f"]);
//! ```

mod assigner;
mod config;
mod controller;
mod error;
pub mod memory;
mod plugin;
mod reconciler;
mod reindex;
pub mod store;

pub use assigner::{CreateTimeAssigner, DocumentMiddleware};
pub use config::{FALLBACK_MIN_SORT_ORDER, PluginConfig};
pub use controller::{
    Controller, ControllerResponse, FetchEntriesParams, UpdateSortOrderBody, UpdateSortOrderData,
};
pub use error::{SortError, SortResult};
pub use memory::{LoggedUpdate, MemoryDocumentStore};
pub use plugin::SortablePlugin;
pub use reconciler::{
    FetchRequest, PlannedUpdate, ReconcileReport, ReorderRequest, SnapshotEntry, SortOrderService,
    plan_updates,
};
pub use reindex::{reorder_subset, reorder_subset_in_place};
pub use store::{
    DocumentStore, FindFirstQuery, FindManyQuery, SchemaRegistry, SortDirection, SortSpec,
    StaticSchemaRegistry, UpdateRequest,
};
