use crate::ContentTypeSchema;
use serde_json::{Map, Value};

/// Field name used when no candidate matches.
pub const DEFAULT_SORT_FIELD: &str = "sort";

/// Candidate sort field names, highest priority first.
pub const DEFAULT_SORT_FIELD_CANDIDATES: [&str; 4] = ["sort", "sortOrder", "order", "orderIndex"];

/// Picks which attribute of a content type holds the sort order.
///
/// Candidates are tried in order; the configured default field is the last
/// resort. A content type with none of them is not sortable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFieldResolver {
    default_field: String,
    candidates: Vec<String>,
}

impl SortFieldResolver {
    pub fn new(default_field: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            default_field: default_field.into(),
            candidates,
        }
    }

    pub fn default_field(&self) -> &str {
        &self.default_field
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// First candidate declared as an integer attribute, else the default
    /// field if it is one.
    pub fn resolve_for_schema(&self, schema: &ContentTypeSchema) -> Option<String> {
        self.ordered_names()
            .find(|name| {
                schema
                    .attribute(name)
                    .is_some_and(|a| a.attr_type.is_integer())
            })
            .map(str::to_string)
    }

    /// First candidate present as a key of `data`, else the default field
    /// if present. Values are not inspected.
    pub fn resolve_for_data(&self, data: &Map<String, Value>) -> Option<String> {
        self.ordered_names()
            .find(|name| data.contains_key(*name))
            .map(str::to_string)
    }

    fn ordered_names(&self) -> impl Iterator<Item = &str> {
        self.candidates
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.default_field.as_str()))
    }
}

impl Default for SortFieldResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_SORT_FIELD,
            DEFAULT_SORT_FIELD_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}
