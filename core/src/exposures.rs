use std::{any::Any, collections::HashMap, rc::Rc};

/// Named values visible to every rule computation of a render pass, beyond
/// the bound domain object itself (current user, URL helpers, flags...).
///
/// Values are stored type-erased and read back with [`Exposures::get`],
/// which downcasts to the requested type.
#[derive(Default, Clone)]
pub struct Exposures {
    values: HashMap<String, Rc<dyn Any>>,
}

impl Exposures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Rc::new(value));
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// New bag with `other`'s entries layered over `self`'s.
    pub fn merge(&self, other: &Exposures) -> Exposures {
        let mut values = self.values.clone();
        for (key, value) in &other.values {
            values.insert(key.clone(), value.clone());
        }
        Exposures { values }
    }
}

impl std::fmt::Debug for Exposures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys = self.values.keys().collect::<Vec<_>>();
        keys.sort();
        f.debug_struct("Exposures").field("keys", &keys).finish()
    }
}
