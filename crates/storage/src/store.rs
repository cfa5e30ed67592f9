//! Store abstraction: the black-box key-value backend
//!
//! ## Design
//!
//! The record layer never talks wire protocol; it sees this trait only.
//! The operation set mirrors what the persistence gateway needs from a
//! Redis-style store: hash-field reads and writes, an atomic counter,
//! deletion, existence and key enumeration.
//!
//! ## Atomicity
//!
//! `incr` is the one operation required to be atomic across concurrent
//! callers, because identifier allocation depends on it. A `hash_set`
//! call writes its fields as one operation, but a multi-call save is not
//! atomic as a whole; last write per family wins.

use warren_core::error::Result;

/// Black-box key-value store with hash fields, counters and key scans
///
/// Implementations must be safe to share across threads; the core issues
/// blocking round-trips from the caller's thread and adds no locking of
/// its own.
pub trait Store: Send + Sync {
    /// Read the named hash fields of `key`, `None` per missing field
    ///
    /// A missing key reads as all-`None`.
    fn hash_get(&self, key: &str, fields: &[&str]) -> Result<Vec<Option<String>>>;

    /// Write the given hash fields of `key`, creating the key if absent
    fn hash_set(&self, key: &str, entries: &[(String, String)]) -> Result<()>;

    /// Atomically increment the integer at `key` and return the new value
    ///
    /// A missing key counts from zero, so the first call returns 1.
    fn incr(&self, key: &str) -> Result<i64>;

    /// Delete `key`; returns whether it existed
    fn delete(&self, key: &str) -> Result<bool>;

    /// Whether `key` exists
    fn exists(&self, key: &str) -> Result<bool>;

    /// All keys starting with `prefix`, in unspecified order
    fn scan(&self, prefix: &str) -> Result<Vec<String>>;
}
