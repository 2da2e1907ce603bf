use indexmap::IndexMap;
use serde::Deserialize;

/// Semantic type tag for one leaf schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Encoded numeric identifier, validated and decoded by the
    /// identifier codec.
    Id,
    /// Backend-native opaque reference (BSON ObjectId / UUID).
    #[serde(alias = "objectId", alias = "opaqueRef")]
    ObjectId,
    /// Exact-match string key.
    Permalink,
    /// Free text, matched through the search pattern builder.
    #[serde(rename = "string")]
    Text,
    Integer,
    Float,
    Date,
    DateTime,
    Boolean,
}

/// One entry in a filter schema: a scalar leaf, a scalar stored under a
/// complement sub-key (e.g. localized text), or a nested sub-entity schema.
///
/// Deserializes from the wire shape: a type tag string, a two-element
/// `[tag, complement]` array, or a nested object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldSchema {
    Scalar(FieldKind),
    Complemented(FieldKind, String),
    Nested(FieldMap),
}

/// Nested mapping from field name to schema entry. Iteration follows
/// declaration order.
pub type FieldMap = IndexMap<String, FieldSchema>;

/// Resolved descriptor for one leaf field being processed.
#[derive(Debug, Clone)]
pub struct FieldRef<'a> {
    pub name: &'a str,
    pub kind: FieldKind,
    pub compl_name: Option<&'a str>,
}

impl FieldRef<'_> {
    /// Backend field path: `name` or `name.complement`.
    pub fn key(&self) -> String {
        match self.compl_name {
            Some(compl) => format!("{}.{}", self.name, compl),
            None => self.name.to_string(),
        }
    }
}
