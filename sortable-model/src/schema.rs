use serde::{Deserialize, Serialize};
use sortable_types::ContentTypeUid;
use std::collections::BTreeMap;

/// Describes a content type's attributes as declared by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeSchema {
    pub uid: ContentTypeUid,
    #[serde(default)]
    pub kind: ContentTypeKind,
    /// Whether entries carry a locale.
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl ContentTypeSchema {
    pub fn collection(uid: impl Into<ContentTypeUid>) -> Self {
        Self {
            uid: uid.into(),
            kind: ContentTypeKind::CollectionType,
            localized: false,
            attributes: BTreeMap::new(),
        }
    }

    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    pub fn with_attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    /// Only collection types hold more than one entry and can be reordered.
    pub fn is_collection_type(&self) -> bool {
        self.kind == ContentTypeKind::CollectionType
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// The declared minimum of `field`, if it is an integer attribute with one.
    pub fn declared_min(&self, field: &str) -> Option<i64> {
        self.attribute(field)
            .filter(|a| a.attr_type.is_integer())
            .and_then(|a| a.min)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentTypeKind {
    #[default]
    CollectionType,
    SingleType,
}

/// A single attribute declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Declared numeric minimum. Only meaningful for numeric attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default)]
    pub required: bool,
}

impl Attribute {
    fn simple(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            min: None,
            required: false,
        }
    }

    pub fn integer() -> Self {
        Self::simple(AttributeType::Integer)
    }

    pub fn big_integer() -> Self {
        Self::simple(AttributeType::BigInteger)
    }

    pub fn string() -> Self {
        Self::simple(AttributeType::String)
    }

    pub fn text() -> Self {
        Self::simple(AttributeType::Text)
    }

    pub fn boolean() -> Self {
        Self::simple(AttributeType::Boolean)
    }

    pub fn enumeration() -> Self {
        Self::simple(AttributeType::Enumeration)
    }

    pub fn relation() -> Self {
        Self::simple(AttributeType::Relation)
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The data type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Integer,
    #[serde(rename = "biginteger")]
    BigInteger,
    Float,
    Decimal,
    String,
    Text,
    Boolean,
    #[serde(rename = "datetime")]
    DateTime,
    Enumeration,
    Relation,
    Json,
    Media,
    Component,
}

impl AttributeType {
    /// Whether values of this type can hold a sort order.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::BigInteger)
    }
}
