//! Entry and schema model for the sortable content plugin.
//!
//! Defines the types every other crate in the workspace depends on:
//! - [`Entry`]: a record of a collection type (document id, locale, JSON payload)
//! - [`ContentTypeSchema`]: the attributes a content type declares
//! - [`SortFieldResolver`]: picks which integer attribute holds the sort order
//!
//! These types mirror what the host content system hands to plugins. They
//! form the contract between the host's document API and the reordering core.

mod entry;
mod schema;
mod sort_field;

pub use entry::{Entry, DOCUMENT_ID_KEY, LOCALE_KEY};
pub use schema::{Attribute, AttributeType, ContentTypeKind, ContentTypeSchema};
pub use sort_field::{DEFAULT_SORT_FIELD, DEFAULT_SORT_FIELD_CANDIDATES, SortFieldResolver};
