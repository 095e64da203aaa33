use crate::{
    builder::{Built, ClassSpec, Data, ResourceBuilder},
    document::{Rendered, ResourceObject},
    error::Result,
    exposures::Exposures,
    registry::Inference,
    resource::ResourceInstance,
    rule::InferRule,
};
use std::{
    any::Any,
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// Sparse-fieldset filter: one flat set applied to every type, or a
/// per-type map (types without an entry render all fields).
#[derive(Clone)]
pub enum Fields {
    Flat(HashSet<String>),
    ByType(HashMap<String, HashSet<String>>),
}

impl Fields {
    pub fn flat<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Flat(names.into_iter().map(Into::into).collect())
    }

    pub fn by_type<I, S, F, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, F)>,
        S: Into<String>,
        F: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::ByType(
            entries
                .into_iter()
                .map(|(kind, names)| {
                    (
                        kind.into(),
                        names.into_iter().map(Into::into).collect::<HashSet<_>>(),
                    )
                })
                .collect(),
        )
    }

    pub(crate) fn for_type(&self, kind: &str) -> Option<&HashSet<String>> {
        match self {
            Self::Flat(names) => Some(names),
            Self::ByType(map) => map.get(kind),
        }
    }
}

/// Options of one render pass.
#[derive(Default, Clone)]
pub struct RenderOptions {
    class: Option<ClassSpec>,
    inferrer: Option<InferRule>,
    namespace: Option<String>,
    expose: Exposures,
    fields: Option<Fields>,
    include: HashSet<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializable-class override: a schema, a registered name, a
    /// per-type map, or an inference callable.
    pub fn class(mut self, spec: impl Into<ClassSpec>) -> Self {
        self.class = Some(spec.into());
        self
    }

    /// Replace the default name-convention inferrer.
    pub fn inferrer<F>(mut self, rule: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.inferrer = Some(Arc::new(rule));
        self
    }

    /// Namespace segment fed into the default inference convention.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Expose a named value to every rule computation of the pass.
    pub fn expose<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.expose.insert(key, value);
        self
    }

    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = names.into_iter().map(Into::into).collect();
        self
    }

    fn builder(&self) -> ResourceBuilder {
        match &self.inferrer {
            Some(rule) => ResourceBuilder::with_inferrer(rule.clone()),
            None => {
                let mut inference = Inference::new();
                if let Some(namespace) = &self.namespace {
                    inference = inference.namespace(namespace.clone());
                }
                ResourceBuilder::with_inferrer(inference.inferrer())
            }
        }
    }
}

/// Bind domain objects to resource instances without rendering them, for
/// callers (like a compound-document assembler) that walk the graph
/// themselves.
pub fn resources_for(data: impl Into<Data>, options: &RenderOptions) -> Result<Built> {
    options
        .builder()
        .build(data.into(), &options.expose, options.class.as_ref())
}

/// Render domain objects straight to JSON:API resource objects.
pub fn render(data: impl Into<Data>, options: &RenderOptions) -> Result<Rendered> {
    Ok(match resources_for(data, options)? {
        Built::Null => Rendered::Null,
        Built::One(resource) => Rendered::One(render_one(&resource, options)?),
        Built::Many(resources) => Rendered::Many(
            resources
                .iter()
                .map(|resource| render_one(resource, options))
                .collect::<Result<Vec<_>>>()?,
        ),
    })
}

fn render_one(resource: &ResourceInstance, options: &RenderOptions) -> Result<ResourceObject> {
    let fields = options
        .fields
        .as_ref()
        .and_then(|fields| fields.for_type(resource.jsonapi_type()));
    resource.as_jsonapi_with(fields, &options.include)
}
