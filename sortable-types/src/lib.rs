//! Core identifier types for the sortable content plugin.
//!
//! This crate defines the plugin-agnostic identifiers used throughout the
//! workspace:
//! - [`DocumentId`]: stable identifier of an entry, shared by all its locales
//! - [`ContentTypeUid`]: identifier of a collection type (e.g. `api::article.article`)
//! - [`Locale`]: locale code of a localized entry
//!
//! Identifiers are opaque strings owned by the host content system; the only
//! validation performed here is rejecting empty values.

mod ids;

pub use ids::{ContentTypeUid, DocumentId, Locale};

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}
