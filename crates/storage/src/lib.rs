//! Storage layer for the Warren record store
//!
//! Defines the black-box [`Store`] trait the record layer persists
//! through, an in-memory reference backend, and the configuration
//! surface (explicit [`StoreContext`] injection, with a process-wide
//! slot kept for convenience).

pub mod config;
pub mod memory;
pub mod store;

pub use config::{configure, StoreContext};
pub use memory::MemoryStore;
pub use store::Store;
