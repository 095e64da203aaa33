use crate::{rule::InferRule, schema::Schema};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

lazy_static::lazy_static! {
    static ref SCHEMAS: RwLock<HashMap<String, Arc<Schema>>> = Default::default();
}

/// Register a schema under a logical name for late lookup by name-shaped
/// class overrides and inference. Returns the shared handle; re-registering
/// a name replaces the previous schema.
pub fn register(name: impl Into<String>, schema: Schema) -> Arc<Schema> {
    let schema = Arc::new(schema);
    if let Ok(mut schemas) = SCHEMAS.write() {
        schemas.insert(name.into(), schema.clone());
    }
    schema
}

pub fn lookup(name: &str) -> Option<Arc<Schema>> {
    SCHEMAS.read().ok()?.get(name).cloned()
}

pub fn is_registered(name: &str) -> bool {
    SCHEMAS
        .read()
        .map(|schemas| schemas.contains_key(name))
        .unwrap_or(false)
}

pub fn unregister(name: &str) -> Option<Arc<Schema>> {
    SCHEMAS.write().ok()?.remove(name)
}

pub fn unregister_all() {
    if let Ok(mut schemas) = SCHEMAS.write() {
        schemas.clear();
    }
}

pub(crate) fn simple_name(class_name: &str) -> &str {
    class_name.rsplit("::").next().unwrap_or(class_name)
}

/// Name-convention inference: the registry name of the schema serializing a
/// domain class is derived from the class name itself.
///
/// The default takes the simple class name and prefixes it with
/// `Serializable` (`app::models::User` -> `SerializableUser`). The original
/// module path can be kept (`app::models::SerializableUser`) and an extra
/// namespace segment can be prepended (`api::SerializableUser`).
#[derive(Debug, Clone)]
pub struct Inference {
    prefix: String,
    namespace: Option<String>,
    keep_module_path: bool,
}

impl Default for Inference {
    fn default() -> Self {
        Self {
            prefix: "Serializable".to_owned(),
            namespace: None,
            keep_module_path: false,
        }
    }
}

impl Inference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn keep_module_path(mut self) -> Self {
        self.keep_module_path = true;
        self
    }

    pub fn infer(&self, class_name: &str) -> String {
        let simple = simple_name(class_name);
        let mut name = format!("{}{}", self.prefix, simple);
        if self.keep_module_path {
            if let Some(path) = class_name.strip_suffix(simple) {
                name = format!("{}{}", path, name);
            }
        }
        if let Some(namespace) = &self.namespace {
            name = format!("{}::{}", namespace, name);
        }
        name
    }

    pub fn inferrer(self) -> InferRule {
        Arc::new(move |class_name: &str| self.infer(class_name))
    }
}
