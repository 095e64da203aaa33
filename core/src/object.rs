use crate::resource::ResourceInstance;
use serde_json::Value;
use std::{any::Any, rc::Rc};

/// Shared handle to a domain object in a resource graph.
pub type ObjectRef = Rc<dyn DomainObject>;

/// Accessor capability the engine requires of domain objects.
///
/// The engine never inspects domain objects directly: defaulted id and
/// attribute rules go through [`DomainObject::field`], and defaulted
/// relationship rules go through [`DomainObject::related`]. Objects reached
/// only by custom rules can keep the default (empty) implementations.
pub trait DomainObject: Any {
    /// Class name used for serializable-class resolution.
    fn class_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Read a named field as a JSON value.
    fn field(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    /// Read the related objects behind a named relationship.
    fn related(&self, name: &str) -> Related {
        let _ = name;
        Related::None
    }
}

/// Result of a relationship data computation.
///
/// The variant decides linkage arity: `One` renders linkage as a single
/// identifier (or `null` for `None`), `Many` always renders an array.
pub enum Related {
    None,
    One(RelatedItem),
    Many(Vec<RelatedItem>),
}

/// One related entry: either a plain domain object still to be resolved
/// through the class resolver, or an already-built resource passed through
/// unchanged.
pub enum RelatedItem {
    Object(ObjectRef),
    Resource(ResourceInstance),
}

impl Related {
    pub fn one(object: ObjectRef) -> Self {
        Self::One(RelatedItem::Object(object))
    }

    pub fn maybe(object: Option<ObjectRef>) -> Self {
        match object {
            Some(object) => Self::one(object),
            None => Self::None,
        }
    }

    pub fn many<I>(objects: I) -> Self
    where
        I: IntoIterator<Item = ObjectRef>,
    {
        Self::Many(objects.into_iter().map(RelatedItem::Object).collect())
    }

    pub fn resource(resource: ResourceInstance) -> Self {
        Self::One(RelatedItem::Resource(resource))
    }

    pub fn resources<I>(resources: I) -> Self
    where
        I: IntoIterator<Item = ResourceInstance>,
    {
        Self::Many(resources.into_iter().map(RelatedItem::Resource).collect())
    }
}

impl From<ObjectRef> for Related {
    fn from(object: ObjectRef) -> Self {
        Self::one(object)
    }
}

impl From<Option<ObjectRef>> for Related {
    fn from(object: Option<ObjectRef>) -> Self {
        Self::maybe(object)
    }
}

impl From<Vec<ObjectRef>> for Related {
    fn from(objects: Vec<ObjectRef>) -> Self {
        Self::many(objects)
    }
}

impl From<ResourceInstance> for Related {
    fn from(resource: ResourceInstance) -> Self {
        Self::resource(resource)
    }
}

impl From<Vec<ResourceInstance>> for Related {
    fn from(resources: Vec<ResourceInstance>) -> Self {
        Self::resources(resources)
    }
}
