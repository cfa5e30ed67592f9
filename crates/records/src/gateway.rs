//! Persistence gateway: records to store fields and back
//!
//! ## Design
//!
//! The gateway is a stateless facade holding only shared handles (the
//! schema and the store context). It translates between a record's
//! family-partitioned attributes and store operations:
//!
//! - each family is one hash field on the record key, its value the UTF-8
//!   JSON object of exactly that family's declared properties;
//! - `id` appears only in the `"default"` family, which declares it;
//! - decoding merges the family objects into one flat attribute map,
//!   last family wins on a key collision (families partition properties,
//!   so none is expected).

use crate::options::FamilySelection;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use warren_core::error::{Error, Result};
use warren_core::key::{counter_key, id_from_key, record_key, scan_prefix};
use warren_core::schema::{Schema, DEFAULT_FAMILY};
use warren_core::value::Value;
use warren_storage::StoreContext;

/// One record's raw fetched state, before casting
#[derive(Debug)]
pub struct Fetched {
    /// Flat attribute map merged from the decoded family objects
    pub attributes: BTreeMap<String, Value>,
    /// The family fields this fetch covered; they are now known-current
    pub families: Vec<String>,
}

/// Stateless translator between one record type and the store
#[derive(Clone)]
pub struct Gateway {
    schema: Arc<Schema>,
    context: StoreContext,
}

impl Gateway {
    /// Gateway for one record type over the given store
    pub fn new(schema: Arc<Schema>, context: StoreContext) -> Self {
        Self { schema, context }
    }

    /// The schema this gateway serves
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Allocate the next identifier from the per-type atomic counter
    pub fn next_id(&self) -> Result<i64> {
        self.context.store().incr(&counter_key(self.schema.plural()))
    }

    /// Every stored id for this type, sorted lexically
    pub fn all_ids(&self) -> Result<Vec<String>> {
        let prefix = scan_prefix(self.schema.plural());
        let keys = self.context.store().scan(&prefix)?;
        let mut ids: Vec<String> = keys
            .iter()
            .filter_map(|key| id_from_key(self.schema.plural(), key))
            .map(str::to_string)
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Resolve a selection to the ordered field list to read or write
    ///
    /// Always includes `"default"`; `All` expands to every registered
    /// family. Order follows the schema, with unregistered requested
    /// names appended as given.
    pub fn family_fields(&self, selection: &FamilySelection) -> Vec<String> {
        match selection {
            FamilySelection::All => self.schema.family_names().map(str::to_string).collect(),
            FamilySelection::Requested(requested) => {
                let mut fields: Vec<String> = vec![DEFAULT_FAMILY.to_string()];
                for name in requested {
                    if !fields.contains(name) {
                        fields.push(name.clone());
                    }
                }
                fields
            }
        }
    }

    /// Read one record's raw field values
    ///
    /// Returns `None` when every requested field is missing, which is how
    /// a nonexistent record reads.
    pub fn fetch_one(&self, id: &str, selection: &FamilySelection) -> Result<Option<Fetched>> {
        let fields = self.family_fields(selection);
        let key = record_key(self.schema.plural(), id);
        let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        let raw = self.context.store().hash_get(&key, &field_refs)?;

        if raw.iter().all(Option::is_none) {
            return Ok(None);
        }

        let mut attributes = BTreeMap::new();
        for (family, payload) in fields.iter().zip(&raw) {
            let Some(json) = payload else { continue };
            let decoded: serde_json::Value = serde_json::from_str(json)?;
            let serde_json::Value::Object(entries) = decoded else {
                return Err(Error::Serialization(format!(
                    "family '{}' of {} is not a JSON object",
                    family, key
                )));
            };
            for (name, value) in entries {
                attributes.insert(name, Value::from_json(value));
            }
        }
        Ok(Some(Fetched {
            attributes,
            families: fields,
        }))
    }

    /// Read many records, dropping absent ids and preserving input order
    pub fn fetch_many(&self, ids: &[String], selection: &FamilySelection) -> Result<Vec<Fetched>> {
        let mut fetched = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(one) = self.fetch_one(id, selection)? {
                fetched.push(one);
            }
        }
        Ok(fetched)
    }

    /// Write the named families of one record as hash fields
    ///
    /// Serializes, per family, a JSON object of exactly that family's
    /// declared properties taken from `attributes` (absent ones as null).
    /// Families without registered properties are skipped.
    pub fn write_fields(
        &self,
        id: &str,
        families: &[String],
        attributes: &BTreeMap<String, Value>,
    ) -> Result<()> {
        let mut entries = Vec::with_capacity(families.len());
        for family in families {
            let Some(props) = self.schema.family_properties(family) else {
                continue;
            };
            let mut object = serde_json::Map::with_capacity(props.len());
            for prop in props {
                let value = match attributes.get(prop) {
                    Some(v) => v.to_json()?,
                    None => serde_json::Value::Null,
                };
                object.insert(prop.clone(), value);
            }
            let payload = serde_json::to_string(&serde_json::Value::Object(object))?;
            entries.push((family.clone(), payload));
        }

        let key = record_key(self.schema.plural(), id);
        debug!(%key, families = entries.len(), "writing record fields");
        self.context.store().hash_set(&key, &entries)
    }

    /// Delete one record's key; returns whether it existed
    pub fn delete_key(&self, id: &str) -> Result<bool> {
        let key = record_key(self.schema.plural(), id);
        debug!(%key, "deleting record key");
        self.context.store().delete(&key)
    }

    /// Whether one record's key exists in the store
    pub fn exists(&self, id: &str) -> Result<bool> {
        self.context
            .store()
            .exists(&record_key(self.schema.plural(), id))
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("type", &self.schema.name())
            .finish_non_exhaustive()
    }
}
