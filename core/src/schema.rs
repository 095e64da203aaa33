use crate::{
    builder::ClassSpec,
    rule::{
        default_attribute_rule, default_data_rule, default_id_rule, ConditionRule, DataRule,
        KeyFormatRule, LinkRule, MetaRule, Scope, StringRule, TypeRule, ValueRule,
    },
    Link, Related,
};
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    if let Some(entry) = entries.iter_mut().find(|(n, _)| n == &name) {
        entry.1 = value;
    } else {
        entries.push((name, value));
    }
}

pub(crate) fn condition_passes(
    conditions: &[(String, ConditionRule)],
    name: &str,
    scope: &Scope,
) -> bool {
    conditions
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, rule)| rule(scope))
        .unwrap_or(true)
}

/// Declarative rule bundle for one relationship, configured by chaining
/// and attached with [`Schema::relationship`].
///
/// Without an explicit [`Relationship::data`] rule the related objects are
/// read off the bound object under the relationship's declared name.
#[derive(Clone, Default)]
pub struct Relationship {
    pub(crate) data: Option<DataRule>,
    pub(crate) linkage: Option<ValueRule>,
    pub(crate) linkage_always: bool,
    pub(crate) links: Vec<(String, LinkRule)>,
    pub(crate) meta: Option<MetaRule>,
    pub(crate) class: Option<ClassSpec>,
}

impl Relationship {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the related objects (or already-built resources).
    pub fn data<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope) -> Related + Send + Sync + 'static,
    {
        self.data = Some(Arc::new(rule));
        self
    }

    /// Explicitly declare linkage data, overriding the derived
    /// `{type, id}` pairs. The rule fully controls the emitted shape.
    pub fn linkage<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope) -> Value + Send + Sync + 'static,
    {
        self.linkage = Some(Arc::new(rule));
        self
    }

    /// Emit linkage data even when the relationship is not included.
    pub fn linkage_always(mut self) -> Self {
        self.linkage_always = true;
        self
    }

    pub fn link<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope) -> Link + Send + Sync + 'static,
    {
        upsert(&mut self.links, name.into(), Arc::new(rule) as LinkRule);
        self
    }

    pub fn meta(mut self, value: impl Into<Value>) -> Self {
        self.meta = Some(MetaRule::Fixed(value.into()));
        self
    }

    pub fn meta_with<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope) -> Value + Send + Sync + 'static,
    {
        self.meta = Some(MetaRule::Computed(Arc::new(rule)));
        self
    }

    /// Serializable class override used to resolve the related objects.
    pub fn class(mut self, spec: impl Into<ClassSpec>) -> Self {
        self.class = Some(spec.into());
        self
    }
}

/// Memoizes attribute computations across renders of the same underlying
/// object identity, keyed by `(resource id, attribute name)`.
pub(crate) struct AttributeCache {
    names: Option<HashSet<String>>,
    store: Mutex<HashMap<(String, String), Value>>,
}

impl AttributeCache {
    fn new(names: Option<HashSet<String>>) -> Self {
        Self {
            names,
            store: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn covers(&self, name: &str) -> bool {
        match &self.names {
            None => true,
            Some(names) => names.contains(name),
        }
    }

    pub(crate) fn fetch<F>(&self, id: &str, name: &str, compute: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store
            .entry((id.to_owned(), name.to_owned()))
            .or_insert_with(compute)
            .clone()
    }

    fn fresh(&self) -> Self {
        Self::new(self.names.clone())
    }
}

/// Per-type declarative registry of id/type/attribute/relationship/link/
/// meta rules.
///
/// Built once (typically at startup), then shared immutably between render
/// passes. Redeclaring a name overwrites only that entry. Subtype schemas
/// start as a value copy of the parent via [`Schema::inherit`], so later
/// changes on either side never leak across the hierarchy.
pub struct Schema {
    pub(crate) kind: TypeRule,
    pub(crate) id: StringRule,
    pub(crate) attributes: Vec<(String, ValueRule)>,
    pub(crate) relationships: Vec<(String, Relationship)>,
    pub(crate) links: Vec<(String, LinkRule)>,
    pub(crate) meta: Option<MetaRule>,
    pub(crate) field_conditions: Vec<(String, ConditionRule)>,
    pub(crate) link_conditions: Vec<(String, ConditionRule)>,
    key_format: Option<KeyFormatRule>,
    pub(crate) cache: Option<AttributeCache>,
}

impl Schema {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: TypeRule::Fixed(kind.into()),
            id: default_id_rule(),
            attributes: vec![],
            relationships: vec![],
            links: vec![],
            meta: None,
            field_conditions: vec![],
            link_conditions: vec![],
            key_format: None,
            cache: None,
        }
    }

    /// Value copy of `parent`: all registries are cloned at call time, the
    /// attribute cache (if enabled) starts empty.
    pub fn inherit(parent: &Schema) -> Self {
        Self {
            kind: parent.kind.clone(),
            id: parent.id.clone(),
            attributes: parent.attributes.clone(),
            relationships: parent.relationships.clone(),
            links: parent.links.clone(),
            meta: parent.meta.clone(),
            field_conditions: parent.field_conditions.clone(),
            link_conditions: parent.link_conditions.clone(),
            key_format: parent.key_format.clone(),
            cache: parent.cache.as_ref().map(|cache| cache.fresh()),
        }
    }

    pub fn kind(mut self, value: impl Into<String>) -> Self {
        self.kind = TypeRule::Fixed(value.into());
        self
    }

    pub fn kind_with<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope) -> String + Send + Sync + 'static,
    {
        self.kind = TypeRule::Computed(Arc::new(rule));
        self
    }

    pub fn id<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope) -> String + Send + Sync + 'static,
    {
        self.id = Arc::new(rule);
        self
    }

    /// Declare an attribute read off the object under its own name.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let rule = default_attribute_rule(name.clone());
        let key = self.format_key(name);
        upsert(&mut self.attributes, key, rule);
        self
    }

    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.attribute(name);
        }
        self
    }

    pub fn attribute_with<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope) -> Value + Send + Sync + 'static,
    {
        let key = self.format_key(name.into());
        upsert(&mut self.attributes, key, Arc::new(rule) as ValueRule);
        self
    }

    pub fn relationship(mut self, name: impl Into<String>, mut relationship: Relationship) -> Self {
        let name = name.into();
        if relationship.data.is_none() {
            relationship.data = Some(default_data_rule(name.clone()));
        }
        let key = self.format_key(name);
        upsert(&mut self.relationships, key, relationship);
        self
    }

    pub fn link<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope) -> Link + Send + Sync + 'static,
    {
        let key = self.format_key(name.into());
        upsert(&mut self.links, key, Arc::new(rule) as LinkRule);
        self
    }

    pub fn meta(mut self, value: impl Into<Value>) -> Self {
        self.meta = Some(MetaRule::Fixed(value.into()));
        self
    }

    pub fn meta_with<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Scope) -> Value + Send + Sync + 'static,
    {
        self.meta = Some(MetaRule::Computed(Arc::new(rule)));
        self
    }

    /// Render the named attribute or relationship only when `rule` holds.
    pub fn condition<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope) -> bool + Send + Sync + 'static,
    {
        let key = self.format_key(name.into());
        upsert(
            &mut self.field_conditions,
            key,
            Arc::new(rule) as ConditionRule,
        );
        self
    }

    /// Render the named attribute or relationship only when `rule` does
    /// not hold.
    pub fn condition_unless<F>(self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope) -> bool + Send + Sync + 'static,
    {
        self.condition(name, move |scope| !rule(scope))
    }

    /// Render the named link only when `rule` holds. Link conditions are
    /// registered independently of field conditions, so an attribute and a
    /// link sharing an output name keep their own.
    pub fn link_condition<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope) -> bool + Send + Sync + 'static,
    {
        let key = self.format_key(name.into());
        upsert(
            &mut self.link_conditions,
            key,
            Arc::new(rule) as ConditionRule,
        );
        self
    }

    pub fn link_condition_unless<F>(self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Scope) -> bool + Send + Sync + 'static,
    {
        self.link_condition(name, move |scope| !rule(scope))
    }

    /// Rename every subsequently declared key. Formatted names become the
    /// actual registry keys, so this must be set before declarations.
    pub fn key_format<F>(mut self, rule: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.key_format = Some(Arc::new(rule));
        self
    }

    /// Cache every attribute computation across renders of the same object
    /// identity.
    pub fn cached(mut self) -> Self {
        self.cache = Some(AttributeCache::new(None));
        self
    }

    /// Cache only the named attributes.
    pub fn cached_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect();
        self.cache = Some(AttributeCache::new(Some(names)));
        self
    }

    fn format_key(&self, name: String) -> String {
        match &self.key_format {
            Some(rule) => rule(&name),
            None => name,
        }
    }
}
