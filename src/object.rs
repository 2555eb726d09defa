//! `Object`: a case-insensitive field bag plus a per-object event-listener
//! registry (`SPEC_FULL.md` §3, §4.5).

use ahash::AHashMap;

use crate::value::Variant;
use crate::vm::scheduler::Listener;

/// An object's field map folds keys to lowercase ASCII at every access, the
/// way `instructions.cpp`'s field lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct Object {
    fields: AHashMap<String, Variant>,
    pub(crate) listeners: Vec<Listener>,
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_field(&self, name: &str) -> Variant {
        self.fields.get(&fold(name)).cloned().unwrap_or(Variant::Undefined)
    }

    pub fn set_field(&mut self, name: &str, value: Variant) {
        self.fields.insert(fold(name), value);
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(&fold(name))
    }
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}
