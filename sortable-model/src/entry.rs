use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sortable_types::{DocumentId, Locale};

/// JSON key carrying the document id when an entry is rendered for clients.
pub const DOCUMENT_ID_KEY: &str = "documentId";

/// JSON key carrying the locale when an entry is rendered for clients.
pub const LOCALE_KEY: &str = "locale";

/// A single entry of a collection type.
///
/// The `data` map holds the entry's attributes exactly as the host stores
/// them. The plugin only ever reads and writes the sort field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub document_id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Entry {
    pub fn new(document_id: impl Into<DocumentId>, data: Map<String, Value>) -> Self {
        Self {
            document_id: document_id.into(),
            locale: None,
            data,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Reads `field` as a usable sort value.
    ///
    /// Integers and integral floats count. `null`, a missing key, empty
    /// strings and any other non-numeric value read as `None`.
    pub fn sort_value(&self, field: &str) -> Option<i64> {
        match self.data.get(field)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }

    /// Extract a string value from `data`.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }

    /// Renders the entry the way clients see it: attributes plus
    /// `documentId` and, for localized entries, `locale`.
    pub fn to_json(&self) -> Value {
        let mut out = self.data.clone();
        out.insert(
            DOCUMENT_ID_KEY.to_string(),
            Value::String(self.document_id.to_string()),
        );
        if let Some(locale) = &self.locale {
            out.insert(LOCALE_KEY.to_string(), Value::String(locale.to_string()));
        }
        Value::Object(out)
    }
}
