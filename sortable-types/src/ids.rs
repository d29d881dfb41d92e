//! Identifier types used throughout the plugin.
//!
//! All identifiers are owned by the host content system. Document IDs minted
//! locally (in-memory stores, tests) use UUID v7 so creation order is visible.

use crate::IdError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of an entry, shared by all of its locale variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Mints a new time-ordered document ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Parses a document ID, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        non_blank(s, "document id").map(Self)
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a content type, e.g. `api::article.article`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentTypeUid(String);

impl ContentTypeUid {
    /// Parses a content type UID, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        non_blank(s, "content type uid").map(Self)
    }

    /// Returns the UID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace before `::` (`api`, `plugin`, ...), if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once("::").map(|(ns, _)| ns)
    }
}

/// Locale code of a localized entry (e.g. `en`, `fr-CA`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Parses a locale code, rejecting blank input.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        non_blank(s, "locale").map(Self)
    }

    /// Returns the locale code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn non_blank(s: &str, what: &'static str) -> Result<String, IdError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err(IdError::Empty(what))
    } else {
        Ok(trimmed.to_string())
    }
}

macro_rules! string_id_impls {
    ($($ty:ident),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $ty {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        /// Deserializes through [`Self::parse`], so blank strings are rejected.
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    )*};
}

string_id_impls!(DocumentId, ContentTypeUid, Locale);
