//! Warren - family-partitioned record persistence over a key-value store
//!
//! Warren maps declared record properties onto a key-value store,
//! grouping properties into independently loadable and saveable
//! partitions ("families") for performance and memory control.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use warren::{
//!     attributes, FindOptions, MemoryStore, Model, PropertyOptions, Schema, StoreContext, Value,
//! };
//!
//! # fn main() -> warren::Result<()> {
//! let schema = Schema::builder("article")
//!     .property("title", PropertyOptions::new().default_value("(Unknown)"))
//!     .property("views", PropertyOptions::new().default_value(0i64).family("counters"))
//!     .build();
//!
//! let articles = Model::new(schema, StoreContext::new(Arc::new(MemoryStore::new())));
//!
//! let article = articles.create(attributes([("title", Value::from("One"))]))?;
//! assert_eq!(article.id().unwrap(), &Value::Int(1));
//!
//! // A plain find loads only the default family; "views" stays cold
//! let found = articles.find(1, &FindOptions::new())?.unwrap();
//! assert_eq!(found.get("title")?, &Value::from("One"));
//! assert!(found.get("views").is_err());
//!
//! // Asking for the family loads it
//! let found = articles.find(1, &FindOptions::with_families(["counters"]))?.unwrap();
//! assert_eq!(found.get("views")?, &Value::Int(0));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `warren-core`: the value model, error taxonomy, key layout, schema
//!   registry and value caster
//! - `warren-storage`: the black-box [`Store`] trait, the in-memory
//!   backend and the configuration surface
//! - `warren-records`: the persistence gateway and the record lifecycle

pub use warren_core::{
    CastTarget, CastType, Error, PropertyOptions, Result, Schema, SchemaBuilder, Value,
    DEFAULT_FAMILY, ID_PROPERTY,
};
pub use warren_records::{
    attributes, Attributes, FamilySelection, FindOptions, Hook, HookOutcome, HookPoint, Hooks,
    Model, Outcome, Record, SaveOptions, ScanOptions,
};
pub use warren_storage::{configure, MemoryStore, Store, StoreContext};
