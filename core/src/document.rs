use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// One JSON:API resource object. Empty members are omitted entirely from
/// the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, RelationshipObject>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub links: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ResourceObject {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            attributes: Map::new(),
            relationships: BTreeMap::new(),
            links: Map::new(),
            meta: None,
        }
    }
}

/// The `{links, data, meta}` triple of one rendered relationship.
///
/// `data: None` means the member is absent; `data: Some(Value::Null)` is an
/// empty to-one linkage and serializes as `"data": null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationshipObject {
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub links: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl RelationshipObject {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.data.is_none() && self.meta.is_none()
    }
}

/// Minimal `{type, id}` reference to a resource.
pub fn identifier(kind: &str, id: &str) -> Value {
    json!({ "type": kind, "id": id })
}

/// Output of a top-level render call. Serializes untagged: `null`, a single
/// resource object, or an array of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    Null,
    One(ResourceObject),
    Many(Vec<ResourceObject>),
}
