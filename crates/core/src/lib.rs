//! Core types for the Warren record store
//!
//! This crate defines the pieces every other layer builds on:
//! - [`value::Value`]: tagged attribute values with JSON conversion
//! - [`error::Error`]: the error taxonomy and `Result` alias
//! - [`key`]: the frozen storage key layout
//! - [`schema::Schema`]: the per-type property registry
//! - [`cast`]: the value caster applied on every attribute write

pub mod cast;
pub mod error;
pub mod key;
pub mod schema;
pub mod value;

pub use cast::{CastTarget, CastType};
pub use error::{Error, Result};
pub use schema::{PropertyOptions, Schema, SchemaBuilder, DEFAULT_FAMILY, ID_PROPERTY};
pub use value::Value;
