//! Error types for the Warren record store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! - Configuration errors (`StoreNotConfigured`) are fatal and surface on
//!   the first store access attempt.
//! - `FamilyNotLoaded` is a usage error, recoverable by reloading the
//!   record with the named family.
//! - Not-found is represented as absence (`Option::None` / omission from
//!   batch results), never as an error variant.
//! - Cast and decode errors propagate to the caller; nothing is retried.

use thiserror::Error;

/// Result type alias for Warren operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Warren record store
#[derive(Debug, Error)]
pub enum Error {
    /// No store handle has been configured for the process
    #[error("No store configured: call warren_storage::configure before any record operation")]
    StoreNotConfigured,

    /// Property access on a persisted record whose owning family was not fetched
    #[error("Property '{property}' belongs to family '{family}' which is not loaded; reload with families: [\"{family}\"]")]
    FamilyNotLoaded {
        /// The property that was accessed
        property: String,
        /// The family that owns it, i.e. the one to reload with
        family: String,
    },

    /// Property name not declared on the schema
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Mutation attempted on a destroyed record
    #[error("Record has been destroyed and is frozen")]
    RecordDestroyed,

    /// A declared cast target rejected the raw value
    #[error("Cannot cast property '{property}': {reason}")]
    Cast {
        /// The property being cast
        property: String,
        /// Why the cast target rejected the value
        reason: String,
    },

    /// Malformed stored JSON or an unencodable in-memory value
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage layer error (wrong key kind, backend failure)
    #[error("Store error: {0}")]
    Store(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
