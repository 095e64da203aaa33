use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// One link value: a bare href, optionally carrying link meta.
///
/// Renders as a bare string when no meta is set, as `{href, meta}`
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    href: String,
    meta: Option<Value>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            meta: None,
        }
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    pub fn meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn as_jsonapi(&self) -> Value {
        match &self.meta {
            None => Value::String(self.href.clone()),
            Some(meta) => json!({ "href": self.href, "meta": meta }),
        }
    }
}

impl From<&str> for Link {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Self::new(href)
    }
}

impl Serialize for Link {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_jsonapi().serialize(serializer)
    }
}
