//! Record lifecycle and persistence gateway for Warren
//!
//! This crate turns a declared schema plus a store context into live
//! records: construction with defaults and casting, family-partitioned
//! load and save, destroy, reload, existence checks, batch iteration,
//! and the hook chains an embedding framework wraps around the
//! lifecycle.

pub mod gateway;
pub mod hooks;
pub mod model;
pub mod options;
pub mod record;

pub use gateway::{Fetched, Gateway};
pub use hooks::{Hook, HookOutcome, HookPoint, Hooks, Outcome};
pub use model::Model;
pub use options::{FamilySelection, FindOptions, SaveOptions, ScanOptions};
pub use record::{attributes, Attributes, Record};
