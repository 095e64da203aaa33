use crate::{
    builder::ResourceBuilder,
    document::{identifier, RelationshipObject},
    error::Result,
    exposures::Exposures,
    object::{ObjectRef, Related, RelatedItem},
    resource::ResourceInstance,
    rule::Scope,
    schema::Relationship,
};
use serde_json::{json, Value};
use std::cell::RefCell;

/// Linkage shape of a relationship, pinned at first data resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    One,
    Many,
}

/// One declared relationship bound to its owning resource's object and
/// exposure context.
///
/// Data resolution (the data rule plus class resolution of every related
/// object) runs lazily on first access and is memoized; resolution failures
/// are returned without being memoized.
pub struct RelationshipUnit {
    rule: Relationship,
    object: ObjectRef,
    exposures: Exposures,
    builder: ResourceBuilder,
    resolved: RefCell<Option<(Arity, Vec<ResourceInstance>)>>,
}

impl RelationshipUnit {
    pub(crate) fn new(
        rule: Relationship,
        object: ObjectRef,
        exposures: Exposures,
        builder: ResourceBuilder,
    ) -> Self {
        Self {
            rule,
            object,
            exposures,
            builder,
            resolved: RefCell::new(None),
        }
    }

    fn scope(&self) -> Scope {
        Scope::new(&self.object, &self.exposures)
    }

    /// Render the `{links, data, meta}` triple.
    ///
    /// `data` is emitted when the relationship is included in the current
    /// render or declared `linkage_always`; a relationship that would
    /// otherwise render empty gets a `{"meta": {"included": false}}`
    /// placeholder instead.
    pub fn as_jsonapi(&self, included: bool) -> Result<RelationshipObject> {
        let scope = self.scope();
        let mut out = RelationshipObject::default();
        for (name, rule) in &self.rule.links {
            out.links.insert(name.clone(), rule(&scope).as_jsonapi());
        }
        if included || self.rule.linkage_always {
            out.data = Some(self.linkage_data()?);
        }
        if let Some(meta) = self.rule.meta.as_ref().and_then(|meta| meta.resolve(&scope)) {
            out.meta = Some(meta);
        }
        if out.is_empty() {
            out.meta = Some(json!({ "included": false }));
        }
        Ok(out)
    }

    /// Resolved related resources, flattened regardless of arity. Used by
    /// document assembly to walk the resource graph.
    pub fn related_resources(&self) -> Result<Vec<ResourceInstance>> {
        Ok(self.resolve()?.1)
    }

    fn linkage_data(&self) -> Result<Value> {
        if let Some(rule) = &self.rule.linkage {
            return Ok(rule(&self.scope()));
        }
        let (arity, resources) = self.resolve()?;
        let mut linkage = resources
            .iter()
            .map(|resource| identifier(resource.jsonapi_type(), resource.jsonapi_id()))
            .collect::<Vec<_>>();
        Ok(match arity {
            Arity::Many => Value::Array(linkage),
            Arity::One => linkage.pop().unwrap_or(Value::Null),
        })
    }

    fn resolve(&self) -> Result<(Arity, Vec<ResourceInstance>)> {
        if let Some(resolved) = self.resolved.borrow().as_ref() {
            return Ok(resolved.clone());
        }
        let data = match &self.rule.data {
            Some(rule) => rule(&self.scope()),
            None => Related::None,
        };
        let resolved = match data {
            Related::None => (Arity::One, vec![]),
            Related::One(item) => (Arity::One, vec![self.resolve_item(item)?]),
            Related::Many(items) => (
                Arity::Many,
                items
                    .into_iter()
                    .map(|item| self.resolve_item(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        *self.resolved.borrow_mut() = Some(resolved.clone());
        Ok(resolved)
    }

    fn resolve_item(&self, item: RelatedItem) -> Result<ResourceInstance> {
        match item {
            RelatedItem::Resource(resource) => Ok(resource),
            RelatedItem::Object(object) => {
                self.builder
                    .build_one(object, &self.exposures, self.rule.class.as_ref())
            }
        }
    }
}
