//! In-memory reference backend
//!
//! ## Design
//!
//! A single `parking_lot::RwLock` over a map of slots, each slot a hash
//! or a counter, mirroring the kind-per-key behavior of a Redis server:
//! hash operations on a counter key (and vice versa) fail with a
//! wrong-kind error instead of silently coercing.
//!
//! This backend exists for tests and for embedding without an external
//! store; nothing in the record layer is specific to it.

use crate::store::Store;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;
use warren_core::error::{Error, Result};

#[derive(Debug, Clone)]
enum Slot {
    Hash(HashMap<String, String>),
    Counter(i64),
}

impl Slot {
    fn kind(&self) -> &'static str {
        match self {
            Slot::Hash(_) => "hash",
            Slot::Counter(_) => "counter",
        }
    }
}

fn wrong_kind(key: &str, want: &str, got: &str) -> Error {
    Error::Store(format!(
        "wrong kind for key '{}': want {}, holds {}",
        key, want, got
    ))
}

/// In-memory [`Store`] with Redis-compatible hash and counter semantics
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, Slot>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every key
    pub fn clear(&self) {
        self.slots.write().clear();
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn hash_get(&self, key: &str, fields: &[&str]) -> Result<Vec<Option<String>>> {
        let slots = self.slots.read();
        match slots.get(key) {
            None => Ok(vec![None; fields.len()]),
            Some(Slot::Hash(hash)) => Ok(fields
                .iter()
                .map(|field| hash.get(*field).cloned())
                .collect()),
            Some(other) => Err(wrong_kind(key, "hash", other.kind())),
        }
    }

    fn hash_set(&self, key: &str, entries: &[(String, String)]) -> Result<()> {
        let mut slots = self.slots.write();
        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::Hash(HashMap::new()));
        match slot {
            Slot::Hash(hash) => {
                for (field, value) in entries {
                    hash.insert(field.clone(), value.clone());
                }
                trace!(key, fields = entries.len(), "hash_set");
                Ok(())
            }
            other => Err(wrong_kind(key, "hash", other.kind())),
        }
    }

    fn incr(&self, key: &str) -> Result<i64> {
        let mut slots = self.slots.write();
        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::Counter(0));
        match slot {
            Slot::Counter(n) => {
                *n += 1;
                Ok(*n)
            }
            other => Err(wrong_kind(key, "counter", other.kind())),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.slots.write().remove(key).is_some())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.slots.read().contains_key(key))
    }

    fn scan(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .slots
            .read()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
