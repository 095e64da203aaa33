use crate::{
    exposures::Exposures,
    link::Link,
    object::{ObjectRef, Related},
};
use serde_json::Value;
use std::sync::Arc;

/// Everything in scope for one rule evaluation: the bound domain object and
/// the exposure context of the current render pass.
///
/// The object is handed out as the shared [`ObjectRef`] handle so rules can
/// pass it (or objects derived from it) back into the engine, e.g. when
/// building related resources by hand.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub object: &'a ObjectRef,
    pub exposures: &'a Exposures,
}

impl<'a> Scope<'a> {
    pub fn new(object: &'a ObjectRef, exposures: &'a Exposures) -> Self {
        Self { object, exposures }
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.object.field(name)
    }

    pub fn expose<T: 'static>(&self, key: &str) -> Option<&'a T> {
        self.exposures.get(key)
    }
}

pub type ValueRule = Arc<dyn Fn(&Scope) -> Value + Send + Sync>;
pub type StringRule = Arc<dyn Fn(&Scope) -> String + Send + Sync>;
pub type ConditionRule = Arc<dyn Fn(&Scope) -> bool + Send + Sync>;
pub type LinkRule = Arc<dyn Fn(&Scope) -> Link + Send + Sync>;
pub type DataRule = Arc<dyn Fn(&Scope) -> Related + Send + Sync>;
pub type KeyFormatRule = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type InferRule = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// JSON:API type of a schema: a fixed name or a computation.
#[derive(Clone)]
pub enum TypeRule {
    Fixed(String),
    Computed(StringRule),
}

impl TypeRule {
    pub fn resolve(&self, scope: &Scope) -> String {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Computed(rule) => rule(scope),
        }
    }
}

/// Meta member of a schema, relationship or error: a fixed value or a
/// computation. A declared rule that evaluates to `null` counts as absent.
#[derive(Clone)]
pub enum MetaRule {
    Fixed(Value),
    Computed(ValueRule),
}

impl MetaRule {
    pub fn resolve(&self, scope: &Scope) -> Option<Value> {
        let value = match self {
            Self::Fixed(value) => value.clone(),
            Self::Computed(rule) => rule(scope),
        };
        match value {
            Value::Null => None,
            value => Some(value),
        }
    }
}

pub(crate) fn stringify(value: Value) -> String {
    match value {
        Value::String(value) => value,
        value => value.to_string(),
    }
}

pub(crate) fn default_id_rule() -> StringRule {
    Arc::new(|scope: &Scope| match scope.field("id") {
        Some(value) => stringify(value),
        None => panic!("undefined field `id` on `{}`", scope.object.class_name()),
    })
}

pub(crate) fn default_attribute_rule(name: String) -> ValueRule {
    Arc::new(move |scope: &Scope| match scope.field(&name) {
        Some(value) => value,
        None => panic!(
            "undefined field `{}` on `{}`",
            name,
            scope.object.class_name()
        ),
    })
}

pub(crate) fn default_data_rule(name: String) -> DataRule {
    Arc::new(move |scope: &Scope| scope.object.related(&name))
}
