use crate::{
    builder::ResourceBuilder,
    document::ResourceObject,
    error::Result,
    exposures::Exposures,
    object::{DomainObject, ObjectRef},
    relationship::RelationshipUnit,
    rule::Scope,
    schema::{condition_passes, Schema},
};
use serde_json::{Map, Value};
use std::{
    cell::OnceCell,
    collections::{HashMap, HashSet},
    rc::Rc,
    sync::Arc,
};

struct InstanceInner {
    schema: Arc<Schema>,
    object: ObjectRef,
    exposures: Exposures,
    kind: OnceCell<String>,
    id: OnceCell<String>,
    meta: OnceCell<Option<Value>>,
    links: OnceCell<Map<String, Value>>,
    relationships: Vec<(String, RelationshipUnit)>,
}

/// One domain object bound to its schema and exposure context for the
/// duration of a render pass.
///
/// Cheap to clone (shared handle), so document assembly can hold the same
/// instance it received from `jsonapi_related`. Type, id, links, meta and
/// relationship data are computed on first access and memoized.
#[derive(Clone)]
pub struct ResourceInstance {
    inner: Rc<InstanceInner>,
}

impl ResourceInstance {
    pub fn new(schema: Arc<Schema>, object: ObjectRef, exposures: Exposures) -> Self {
        Self::with_builder(schema, object, exposures, ResourceBuilder::new())
    }

    pub(crate) fn with_builder(
        schema: Arc<Schema>,
        object: ObjectRef,
        exposures: Exposures,
        builder: ResourceBuilder,
    ) -> Self {
        let relationships = schema
            .relationships
            .iter()
            .map(|(name, rule)| {
                let unit = RelationshipUnit::new(
                    rule.clone(),
                    object.clone(),
                    exposures.clone(),
                    builder.clone(),
                );
                (name.clone(), unit)
            })
            .collect();
        Self {
            inner: Rc::new(InstanceInner {
                schema,
                object,
                exposures,
                kind: OnceCell::new(),
                id: OnceCell::new(),
                meta: OnceCell::new(),
                links: OnceCell::new(),
                relationships,
            }),
        }
    }

    fn scope(&self) -> Scope {
        Scope::new(&self.inner.object, &self.inner.exposures)
    }

    pub fn object(&self) -> &dyn DomainObject {
        self.inner.object.as_ref()
    }

    pub fn exposures(&self) -> &Exposures {
        &self.inner.exposures
    }

    pub fn jsonapi_type(&self) -> &str {
        self.inner
            .kind
            .get_or_init(|| self.inner.schema.kind.resolve(&self.scope()))
    }

    pub fn jsonapi_id(&self) -> &str {
        let rule = &self.inner.schema.id;
        self.inner.id.get_or_init(|| rule(&self.scope()))
    }

    /// Render with no field filtering and nothing included.
    pub fn as_jsonapi(&self) -> Result<ResourceObject> {
        self.as_jsonapi_with(None, &HashSet::new())
    }

    /// Render the resource object. `fields` restricts attributes,
    /// relationships and nothing else (`None` passes everything);
    /// `include` marks which relationships emit full linkage data.
    pub fn as_jsonapi_with(
        &self,
        fields: Option<&HashSet<String>>,
        include: &HashSet<String>,
    ) -> Result<ResourceObject> {
        let mut out = ResourceObject::new(self.jsonapi_type(), self.jsonapi_id());
        out.attributes = self.requested_attributes(fields);
        for (name, unit) in self.requested_relationships(fields) {
            out.relationships
                .insert(name.clone(), unit.as_jsonapi(include.contains(name))?);
        }
        out.links = self.links().clone();
        out.meta = self.meta().clone();
        Ok(out)
    }

    /// Resolved related resources of the included relationships, for
    /// compound-document assembly.
    pub fn jsonapi_related(
        &self,
        include: &HashSet<String>,
    ) -> Result<HashMap<String, Vec<ResourceInstance>>> {
        let mut related = HashMap::new();
        for (name, unit) in &self.inner.relationships {
            if include.contains(name) {
                related.insert(name.clone(), unit.related_resources()?);
            }
        }
        Ok(related)
    }

    fn requested_attributes(&self, fields: Option<&HashSet<String>>) -> Map<String, Value> {
        let scope = self.scope();
        let schema = &self.inner.schema;
        let mut attributes = Map::new();
        for (name, rule) in &schema.attributes {
            if !fields.map_or(true, |fields| fields.contains(name)) {
                continue;
            }
            if !condition_passes(&schema.field_conditions, name, &scope) {
                continue;
            }
            let value = match &schema.cache {
                Some(cache) if cache.covers(name) => {
                    cache.fetch(self.jsonapi_id(), name, || rule(&scope))
                }
                _ => rule(&scope),
            };
            attributes.insert(name.clone(), value);
        }
        attributes
    }

    fn requested_relationships<'a>(
        &'a self,
        fields: Option<&'a HashSet<String>>,
    ) -> impl Iterator<Item = &'a (String, RelationshipUnit)> {
        let scope = self.scope();
        self.inner.relationships.iter().filter(move |(name, _)| {
            fields.map_or(true, |fields| fields.contains(name))
                && condition_passes(&self.inner.schema.field_conditions, name, &scope)
        })
    }

    fn links(&self) -> &Map<String, Value> {
        self.inner.links.get_or_init(|| {
            let scope = self.scope();
            let schema = &self.inner.schema;
            let mut links = Map::new();
            for (name, rule) in &schema.links {
                if condition_passes(&schema.link_conditions, name, &scope) {
                    links.insert(name.clone(), rule(&scope).as_jsonapi());
                }
            }
            links
        })
    }

    fn meta(&self) -> &Option<Value> {
        self.inner.meta.get_or_init(|| {
            self.inner
                .schema
                .meta
                .as_ref()
                .and_then(|meta| meta.resolve(&self.scope()))
        })
    }
}
