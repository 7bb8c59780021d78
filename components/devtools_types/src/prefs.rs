//! Preference access
//!
//! Preference storage belongs to the host application; tools only read
//! booleans through this trait.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Read/write access to persisted boolean preferences
pub trait Preferences: Send + Sync {
    /// Value of a boolean preference, `None` when unset
    fn get_bool(&self, name: &str) -> Option<bool>;

    /// Set a boolean preference
    fn set_bool(&self, name: &str, value: bool);
}

/// In-memory preference store
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, bool>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy when wiring tools in tests
    pub fn with_bool(self, name: &str, value: bool) -> Self {
        self.set_bool(name, value);
        self
    }
}

impl Preferences for MemoryPreferences {
    fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.read().get(name).copied()
    }

    fn set_bool(&self, name: &str, value: bool) {
        self.values.write().insert(name.to_string(), value);
    }
}
