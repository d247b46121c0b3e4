use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::Result;
use crate::settings::{read_json, read_schema_version, KeyValueStoreTrait};

/// In-memory snapshot of the persisted keys a migration may touch, plus the
/// schema version they are in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigBlob {
    pub schema_version: u32,
    entries: BTreeMap<String, Value>,
}

impl ConfigBlob {
    pub fn new(schema_version: u32) -> Self {
        ConfigBlob {
            schema_version,
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style `set`, handy for fixtures.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    /// Reads `keys` from the store. Malformed values are left out, as if
    /// they had never been written.
    pub fn load(store: &dyn KeyValueStoreTrait, keys: &[&str]) -> Result<Self> {
        let mut blob = ConfigBlob::new(read_schema_version(store)?);
        for key in keys {
            if let Some(value) = read_json::<Value>(store, key)? {
                blob.set(key, value);
            }
        }
        Ok(blob)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Typed read. A value of the wrong shape reads as absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!("Ignoring malformed '{}' during migration: {}", key, e);
                None
            }
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
