use crate::{exposures::Exposures, link::Link};
use serde_json::{Map, Value};
use std::sync::Arc;

type MemberRule = Arc<dyn Fn(&Exposures) -> Value + Send + Sync>;
type ErrorLinkRule = Arc<dyn Fn(&Exposures) -> Link + Send + Sync>;

#[derive(Clone)]
enum Member {
    Fixed(Value),
    Computed(MemberRule),
}

impl Member {
    fn resolve(&self, exposures: &Exposures) -> Option<Value> {
        let value = match self {
            Self::Fixed(value) => value.clone(),
            Self::Computed(rule) => rule(exposures),
        };
        match value {
            Value::Null => None,
            value => Some(value),
        }
    }
}

macro_rules! impl_member {
    ($name:ident, $name_with:ident) => {
        pub fn $name(mut self, value: impl Into<Value>) -> Self {
            self.$name = Some(Member::Fixed(value.into()));
            self
        }

        pub fn $name_with<F>(mut self, rule: F) -> Self
        where
            F: Fn(&Exposures) -> Value + Send + Sync + 'static,
        {
            self.$name = Some(Member::Computed(Arc::new(rule)));
            self
        }
    };
}

/// Declarative JSON:API error object: `id`/`status`/`code`/`title`/
/// `detail`/`meta`/`source` members as fixed values or computations over
/// the exposure context, plus named links.
///
/// Error objects carry no bound domain object, so rules see only the
/// exposures. Undeclared and null members are omitted.
#[derive(Clone, Default)]
pub struct ErrorSchema {
    id: Option<Member>,
    status: Option<Member>,
    code: Option<Member>,
    title: Option<Member>,
    detail: Option<Member>,
    meta: Option<Member>,
    source: Option<Member>,
    links: Vec<(String, ErrorLinkRule)>,
}

impl ErrorSchema {
    pub fn new() -> Self {
        Self::default()
    }

    impl_member!(id, id_with);
    impl_member!(status, status_with);
    impl_member!(code, code_with);
    impl_member!(title, title_with);
    impl_member!(detail, detail_with);
    impl_member!(meta, meta_with);
    impl_member!(source, source_with);

    pub fn link<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&Exposures) -> Link + Send + Sync + 'static,
    {
        let name = name.into();
        if let Some(entry) = self.links.iter_mut().find(|(n, _)| n == &name) {
            entry.1 = Arc::new(rule);
        } else {
            self.links.push((name, Arc::new(rule)));
        }
        self
    }

    pub fn as_jsonapi(&self, exposures: &Exposures) -> Value {
        let mut out = Map::new();
        let mut links = Map::new();
        for (name, rule) in &self.links {
            links.insert(name.clone(), rule(exposures).as_jsonapi());
        }
        if !links.is_empty() {
            out.insert("links".to_owned(), Value::Object(links));
        }
        let members = [
            ("id", &self.id),
            ("status", &self.status),
            ("code", &self.code),
            ("title", &self.title),
            ("detail", &self.detail),
            ("meta", &self.meta),
            ("source", &self.source),
        ];
        for (key, member) in members {
            if let Some(value) = member.as_ref().and_then(|member| member.resolve(exposures)) {
                out.insert(key.to_owned(), value);
            }
        }
        Value::Object(out)
    }
}
