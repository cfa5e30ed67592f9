//! Model: the type-level entry point for record operations
//!
//! ## Design
//!
//! A `Model` is a stateless facade holding the shared handles of one
//! record type: its schema, its persistence gateway and its hook chains.
//! Cloning a model is cheap; every record it produces shares the same
//! handles.
//!
//! Lookups are by identifier only: single, batch, or full scan. A miss
//! is absence, not an error: `find` returns `None`, `find_many` omits
//! the id, `find_each` simply never yields it.

use crate::gateway::Gateway;
use crate::hooks::Hooks;
use crate::options::{FindOptions, ScanOptions};
use crate::record::{Attributes, Record};
use std::sync::Arc;
use tracing::debug;
use warren_core::error::Result;
use warren_core::schema::Schema;
use warren_storage::StoreContext;

/// Type-level handle for one declared record type
#[derive(Clone)]
pub struct Model {
    gateway: Gateway,
    hooks: Arc<Hooks>,
}

impl Model {
    /// Model over an explicit store context
    pub fn new(schema: Arc<Schema>, context: StoreContext) -> Self {
        Self::with_hooks(schema, context, Hooks::new())
    }

    /// Model with lifecycle hook chains
    pub fn with_hooks(schema: Arc<Schema>, context: StoreContext, hooks: Hooks) -> Self {
        Self {
            gateway: Gateway::new(schema, context),
            hooks: Arc::new(hooks),
        }
    }

    /// Model over the process-wide configured store
    pub fn configured(schema: Arc<Schema>) -> Result<Self> {
        Ok(Self::new(schema, StoreContext::configured()?))
    }

    /// The schema of this type
    pub fn schema(&self) -> &Arc<Schema> {
        self.gateway.schema()
    }

    /// Construct an unsaved record from an attribute mapping
    pub fn new_record(&self, attrs: Attributes) -> Result<Record> {
        Record::build(self.gateway.clone(), Arc::clone(&self.hooks), attrs)
    }

    /// Construct and immediately save
    pub fn create(&self, attrs: Attributes) -> Result<Record> {
        let mut record = self.new_record(attrs)?;
        record.save(&Default::default())?;
        Ok(record)
    }

    /// Find one record by id; `None` when it does not exist
    pub fn find(&self, id: impl ToString, options: &FindOptions) -> Result<Option<Record>> {
        let id = id.to_string();
        match self.gateway.fetch_one(&id, &options.families)? {
            Some(fetched) => Ok(Some(Record::from_fetched(
                self.gateway.clone(),
                Arc::clone(&self.hooks),
                fetched,
            )?)),
            None => Ok(None),
        }
    }

    /// Find many records by id, in the given order, omitting misses
    pub fn find_many<I: ToString>(&self, ids: &[I], options: &FindOptions) -> Result<Vec<Record>> {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        self.gateway
            .fetch_many(&ids, &options.families)?
            .into_iter()
            .map(|fetched| {
                Record::from_fetched(self.gateway.clone(), Arc::clone(&self.hooks), fetched)
            })
            .collect()
    }

    /// Every stored record of this type, in id-sorted order
    pub fn all(&self) -> Result<Vec<Record>> {
        let ids = self.gateway.all_ids()?;
        self.find_many(&ids, &FindOptions::new())
    }

    /// Iterate every stored record in hydration batches
    ///
    /// Lists all ids up front, then hydrates `options.batch_size`
    /// records per store round-trip and yields each to `f`. Only the id
    /// listing is bulk; attribute data never exceeds one batch in
    /// memory. Ids written or removed concurrently may or may not be
    /// observed, depending on batch boundaries.
    pub fn find_each<F>(&self, options: &ScanOptions, mut f: F) -> Result<()>
    where
        F: FnMut(Record) -> Result<()>,
    {
        let ids = self.gateway.all_ids()?;
        debug!(
            record = self.schema().name(),
            total = ids.len(),
            batch_size = options.batch_size,
            "batch iteration"
        );
        for batch in ids.chunks(options.batch_size.max(1)) {
            for fetched in self.gateway.fetch_many(batch, &options.families)? {
                let record =
                    Record::from_fetched(self.gateway.clone(), Arc::clone(&self.hooks), fetched)?;
                f(record)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("type", &self.schema().name())
            .finish_non_exhaustive()
    }
}
