//! Plugin configuration: reads an optional `sortable.toml` and resolves the
//! per-content-type minimum sort value.

use crate::error::{SortError, SortResult};
use serde::{Deserialize, Serialize};
use sortable_model::{
    ContentTypeSchema, DEFAULT_SORT_FIELD, DEFAULT_SORT_FIELD_CANDIDATES, SortFieldResolver,
};
use std::path::Path;
use tracing::{info, warn};

/// Minimum sort value used when neither the schema nor the config declare one.
pub const FALLBACK_MIN_SORT_ORDER: i64 = 1;

/// Plugin-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Sort field used when no candidate matches.
    #[serde(default = "default_sort_order_field")]
    pub sort_order_field: String,
    /// Candidate sort field names, highest priority first.
    #[serde(default = "default_sort_field_candidates")]
    pub sort_field_candidates: Vec<String>,
    /// Overrides the fallback minimum when the sort attribute declares none.
    #[serde(default)]
    pub min_sort_order: Option<i64>,
    /// Caps the number of entries returned to the reorder modal.
    #[serde(default)]
    pub entries_page_size: Option<usize>,
}

fn default_sort_order_field() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

fn default_sort_field_candidates() -> Vec<String> {
    DEFAULT_SORT_FIELD_CANDIDATES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            sort_order_field: default_sort_order_field(),
            sort_field_candidates: default_sort_field_candidates(),
            min_sort_order: None,
            entries_page_size: None,
        }
    }
}

impl PluginConfig {
    /// Loads config from an explicit path.
    /// Falls back to defaults with a warning when the file is unreadable or invalid.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded sortable config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("{}. Falling back to defaults.", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parses config from TOML text.
    pub fn from_toml_str(contents: &str) -> SortResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| SortError::Config(format!("failed to parse config: {e}")))?;
        if config.sort_order_field.trim().is_empty() {
            return Err(SortError::Config("sortOrderField must not be empty".into()));
        }
        if config.entries_page_size == Some(0) {
            return Err(SortError::Config("entriesPageSize must be positive".into()));
        }
        Ok(config)
    }

    pub fn with_min_sort_order(mut self, min: i64) -> Self {
        self.min_sort_order = Some(min);
        self
    }

    pub fn with_entries_page_size(mut self, size: usize) -> Self {
        self.entries_page_size = Some(size);
        self
    }

    pub fn sort_field_resolver(&self) -> SortFieldResolver {
        SortFieldResolver::new(
            self.sort_order_field.clone(),
            self.sort_field_candidates.clone(),
        )
    }

    /// Minimum sort value for `field`: the attribute's declared minimum,
    /// else the configured override, else [`FALLBACK_MIN_SORT_ORDER`].
    pub fn min_sort_order_for(&self, schema: Option<&ContentTypeSchema>, field: &str) -> i64 {
        schema
            .and_then(|s| s.declared_min(field))
            .or(self.min_sort_order)
            .unwrap_or(FALLBACK_MIN_SORT_ORDER)
    }
}
