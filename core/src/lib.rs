pub mod builder;
pub mod document;
pub mod error;
pub mod error_object;
pub mod exposures;
pub mod link;
pub mod object;
pub mod registry;
pub mod relationship;
pub mod renderer;
pub mod resource;
pub mod rule;
pub mod schema;


pub use crate::{
    builder::{Built, ClassSpec, Data, ResourceBuilder},
    document::{identifier, RelationshipObject, Rendered, ResourceObject},
    error::{Error, Result},
    error_object::ErrorSchema,
    exposures::Exposures,
    link::Link,
    object::{DomainObject, ObjectRef, Related, RelatedItem},
    registry::Inference,
    relationship::RelationshipUnit,
    renderer::{render, resources_for, Fields, RenderOptions},
    resource::ResourceInstance,
    rule::Scope,
    schema::{Relationship, Schema},
};
