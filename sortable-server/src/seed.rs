//! Seed file for the standalone server.
//!
//! ```json
//! {
//!   "contentTypes": [{ "uid": "api::article.article", "attributes": { "sort": { "type": "integer" } } }],
//!   "entries": { "api::article.article": [{ "data": { "title": "First", "sort": null } }] }
//! }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};
use sortable_core::{SortResult, SortablePlugin, StaticSchemaRegistry};
use sortable_model::ContentTypeSchema;
use sortable_types::{ContentTypeUid, Locale};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFile {
    #[serde(default)]
    pub content_types: Vec<ContentTypeSchema>,
    #[serde(default)]
    pub entries: BTreeMap<ContentTypeUid, Vec<SeedEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    #[serde(default)]
    pub locale: Option<Locale>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl SeedFile {
    pub fn from_json_str(contents: &str) -> SortResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn registry(&self) -> StaticSchemaRegistry {
        StaticSchemaRegistry::new(self.content_types.iter().cloned())
    }

    /// Creates every seeded entry through the plugin, in file order, so
    /// entries without a sort value get one assigned. Returns the number of
    /// entries created.
    pub async fn populate(self, plugin: &SortablePlugin) -> SortResult<usize> {
        let mut created = 0;
        for (uid, entries) in self.entries {
            let count = entries.len();
            for entry in entries {
                plugin.create_document(&uid, entry.data, entry.locale).await?;
            }
            info!(uid = %uid, count, "Seeded entries");
            created += count;
        }
        Ok(created)
    }
}
