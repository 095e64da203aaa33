use crate::{
    error::{Error, Result},
    exposures::Exposures,
    object::{DomainObject, ObjectRef},
    registry::{self, simple_name, Inference},
    resource::ResourceInstance,
    rule::InferRule,
    schema::Schema,
};
use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc};

/// Serializable-class override accepted by render options and relationship
/// declarations.
#[derive(Clone)]
pub enum ClassSpec {
    /// A concrete schema, used as-is.
    Schema(Arc<Schema>),
    /// A name resolved late through the global registry.
    Name(String),
    /// Per-domain-class-name map; values must be `Schema` or `Name`.
    Map(HashMap<String, ClassSpec>),
    /// A pluggable inference strategy producing a registry name from the
    /// domain class name.
    Infer(InferRule),
}

impl ClassSpec {
    pub fn map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, ClassSpec)>,
        S: Into<String>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(name, spec)| (name.into(), spec))
                .collect(),
        )
    }

    pub fn infer<F>(rule: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Infer(Arc::new(rule))
    }

    /// Identity used in resolver cache keys.
    fn descriptor(&self) -> String {
        match self {
            Self::Schema(schema) => format!("schema:{:p}", Arc::as_ptr(schema)),
            Self::Name(name) => format!("name:{}", name),
            Self::Map(_) => "map".to_owned(),
            Self::Infer(rule) => format!("infer:{:p}", Arc::as_ptr(rule)),
        }
    }
}

impl From<Arc<Schema>> for ClassSpec {
    fn from(schema: Arc<Schema>) -> Self {
        Self::Schema(schema)
    }
}

impl From<Schema> for ClassSpec {
    fn from(schema: Schema) -> Self {
        Self::Schema(Arc::new(schema))
    }
}

impl From<&str> for ClassSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ClassSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<HashMap<String, ClassSpec>> for ClassSpec {
    fn from(map: HashMap<String, ClassSpec>) -> Self {
        Self::Map(map)
    }
}

/// Input of a build/render call: nothing, one object, or many.
pub enum Data {
    Null,
    One(ObjectRef),
    Many(Vec<ObjectRef>),
}

impl Data {
    pub fn one(object: impl DomainObject) -> Self {
        Self::One(Rc::new(object))
    }
}

impl From<ObjectRef> for Data {
    fn from(object: ObjectRef) -> Self {
        Self::One(object)
    }
}

impl From<Option<ObjectRef>> for Data {
    fn from(object: Option<ObjectRef>) -> Self {
        match object {
            Some(object) => Self::One(object),
            None => Self::Null,
        }
    }
}

impl From<Vec<ObjectRef>> for Data {
    fn from(objects: Vec<ObjectRef>) -> Self {
        Self::Many(objects)
    }
}

/// Built resources, mirroring the arity of the input [`Data`].
pub enum Built {
    Null,
    One(ResourceInstance),
    Many(Vec<ResourceInstance>),
}

impl std::fmt::Debug for Built {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Built::Null => f.write_str("Null"),
            Built::One(_) => f.write_str("One"),
            Built::Many(items) => f.debug_tuple("Many").field(&items.len()).finish(),
        }
    }
}

struct BuilderInner {
    inferrer: InferRule,
    cache: RefCell<HashMap<(String, String), Arc<Schema>>>,
}

/// Resolves domain objects to the schemas that serialize them and binds
/// them into [`ResourceInstance`]s.
///
/// Resolution results are memoized per builder keyed by
/// `(domain class name, override identity)`; builders are cheap handles
/// meant to live for a single render pass.
#[derive(Clone)]
pub struct ResourceBuilder {
    inner: Rc<BuilderInner>,
}

impl Default for ResourceBuilder {
    fn default() -> Self {
        Self::with_inferrer(Inference::new().inferrer())
    }
}

impl ResourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inferrer(inferrer: InferRule) -> Self {
        Self {
            inner: Rc::new(BuilderInner {
                inferrer,
                cache: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn build(
        &self,
        data: Data,
        exposures: &Exposures,
        class: Option<&ClassSpec>,
    ) -> Result<Built> {
        match data {
            Data::Null => Ok(Built::Null),
            Data::One(object) => Ok(Built::One(self.build_one(object, exposures, class)?)),
            Data::Many(objects) => objects
                .into_iter()
                .map(|object| self.build_one(object, exposures, class))
                .collect::<Result<Vec<_>>>()
                .map(Built::Many),
        }
    }

    pub fn build_one(
        &self,
        object: ObjectRef,
        exposures: &Exposures,
        class: Option<&ClassSpec>,
    ) -> Result<ResourceInstance> {
        let schema = self.serializable_schema(object.class_name(), class)?;
        Ok(ResourceInstance::with_builder(
            schema,
            object,
            exposures.clone(),
            self.clone(),
        ))
    }

    fn serializable_schema(
        &self,
        class_name: &str,
        spec: Option<&ClassSpec>,
    ) -> Result<Arc<Schema>> {
        let spec = self.narrow(class_name, spec)?;
        let key = (
            class_name.to_owned(),
            spec.map(ClassSpec::descriptor)
                .unwrap_or_else(|| "inferred".to_owned()),
        );
        if let Some(schema) = self.inner.cache.borrow().get(&key) {
            return Ok(schema.clone());
        }
        let schema = match spec {
            Some(ClassSpec::Schema(schema)) => schema.clone(),
            Some(ClassSpec::Name(name)) => lookup_name(name)?,
            Some(ClassSpec::Infer(rule)) => lookup_inferred(class_name, rule)?,
            Some(ClassSpec::Map(_)) => {
                return Err(Error::InvalidResourceClass(
                    "per-type map nested in a per-type map".to_owned(),
                ))
            }
            None => lookup_inferred(class_name, &self.inner.inferrer)?,
        };
        self.inner.cache.borrow_mut().insert(key, schema.clone());
        Ok(schema)
    }

    /// Per-type maps are indexed by the object's class name (full path,
    /// falling back to the simple name) before ordinary resolution.
    fn narrow<'s>(
        &self,
        class_name: &str,
        spec: Option<&'s ClassSpec>,
    ) -> Result<Option<&'s ClassSpec>> {
        match spec {
            Some(ClassSpec::Map(map)) => {
                let entry = map
                    .get(class_name)
                    .or_else(|| map.get(simple_name(class_name)));
                match entry {
                    Some(ClassSpec::Infer(_)) => Err(Error::InvalidResourceClass(
                        "inference callable in a per-type map".to_owned(),
                    )),
                    Some(entry) => Ok(Some(entry)),
                    None => Err(Error::UndefinedSerializableClass(class_name.to_owned())),
                }
            }
            spec => Ok(spec),
        }
    }
}

fn lookup_name(name: &str) -> Result<Arc<Schema>> {
    registry::lookup(name).ok_or_else(|| Error::UndefinedSerializableClass(name.to_owned()))
}

fn lookup_inferred(class_name: &str, rule: &InferRule) -> Result<Arc<Schema>> {
    registry::lookup(&rule(class_name))
        .ok_or_else(|| Error::UndefinedSerializableClass(class_name.to_owned()))
}
