//! Record instances: partial hydration and the family tracker
//!
//! ## Lifecycle
//!
//! A record moves `new` → `persisted` → `destroyed` (terminal; the
//! instance is frozen against mutation). `is_persisted` is an existence
//! check against the store, not merely "has an id".
//!
//! ## Loaded families
//!
//! `loaded_families` names the families whose in-memory values are
//! known-current; it always contains `"default"`. It grows at three
//! points:
//! - construction/hydration: families intersecting the supplied
//!   attribute keys (plus, on hydration, the fields actually fetched);
//! - mutation: a setter activates its property's family when the value
//!   differs from both the current value and the property default;
//! - reload: the loaded set unions with the requested one, and is then
//!   replaced by the freshly fetched set.
//!
//! Reading a property of a persisted record whose family is not loaded
//! is an error naming the family to reload with, never a silent default:
//! a stale default flowing into the next save would lose data.

use crate::gateway::{Fetched, Gateway};
use crate::hooks::{HookOutcome, HookPoint, Hooks, Outcome};
use crate::options::{FamilySelection, SaveOptions};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;
use warren_core::cast::cast_value;
use warren_core::error::{Error, Result};
use warren_core::schema::{Schema, DEFAULT_FAMILY, ID_PROPERTY};
use warren_core::value::Value;

static NULL: Value = Value::Null;

/// Attribute mapping supplied at construction and update
pub type Attributes = BTreeMap<String, Value>;

/// Build an [`Attributes`] map from name/value pairs
pub fn attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    New,
    Persisted,
    Destroyed,
}

/// One record instance of a declared type
pub struct Record {
    schema: Arc<Schema>,
    gateway: Gateway,
    hooks: Arc<Hooks>,
    id: Option<Value>,
    attributes: BTreeMap<String, Value>,
    loaded_families: BTreeSet<String>,
    state: LifecycleState,
}

impl Record {
    // ========== Construction (crate-internal; use Model) ==========

    pub(crate) fn build(gateway: Gateway, hooks: Arc<Hooks>, attrs: Attributes) -> Result<Self> {
        let schema = Arc::clone(gateway.schema());
        let mut record = Record {
            schema: Arc::clone(&schema),
            gateway,
            hooks,
            id: None,
            attributes: BTreeMap::new(),
            loaded_families: BTreeSet::from([DEFAULT_FAMILY.to_string()]),
            state: LifecycleState::New,
        };

        // Defaults materialize fresh per instance and go through the
        // caster like any supplied value
        for prop in schema.properties() {
            if let Some(default) = schema.default_for(prop) {
                let cast = cast_value(prop, schema.cast_target(prop), default)?;
                record.attributes.insert(prop.clone(), cast);
            }
        }

        let touched = schema.families_touched(attrs.keys().map(String::as_str));
        record.apply_raw(attrs)?;
        record.loaded_families.extend(touched);
        Ok(record)
    }

    pub(crate) fn from_fetched(
        gateway: Gateway,
        hooks: Arc<Hooks>,
        fetched: Fetched,
    ) -> Result<Self> {
        let Fetched {
            attributes: raw,
            families,
        } = fetched;
        let mut record = Self::build(gateway, hooks, raw)?;
        record.loaded_families.extend(families);
        record.state = LifecycleState::Persisted;
        Ok(record)
    }

    /// Cast and store raw attributes; `id` is tracked on the side
    fn apply_raw(&mut self, attrs: Attributes) -> Result<()> {
        for (name, raw) in attrs {
            if !self.schema.has_property(&name) {
                return Err(Error::UnknownProperty(name));
            }
            let cast = cast_value(&name, self.schema.cast_target(&name), raw)?;
            if name == ID_PROPERTY {
                self.id = identifier(cast.clone())?;
            }
            self.attributes.insert(name, cast);
        }
        Ok(())
    }

    // ========== Accessors ==========

    /// The identifier, unset until the first save assigns one
    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// The identifier rendered as its storage-key string
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(Value::to_key_string)
    }

    /// The schema of this record's type
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Families currently known-current in memory
    pub fn loaded_families(&self) -> &BTreeSet<String> {
        &self.loaded_families
    }

    /// Whether `destroy` completed on this instance
    pub fn is_destroyed(&self) -> bool {
        self.state == LifecycleState::Destroyed
    }

    /// Read one property
    ///
    /// On a persisted record, reading a property whose owning family is
    /// not loaded errors with [`Error::FamilyNotLoaded`]; reload with
    /// the named family to recover. Unset properties read as null.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let family = self
            .schema
            .family_of(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))?;
        if self.state != LifecycleState::New && !self.loaded_families.contains(family) {
            return Err(Error::FamilyNotLoaded {
                property: name.to_string(),
                family: family.to_string(),
            });
        }
        Ok(self.attributes.get(name).unwrap_or(&NULL))
    }

    /// Write one property through the caster
    ///
    /// When the cast value differs from both the current value and the
    /// property default, the owning family joins the loaded set, so the
    /// next unscoped save writes it.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.state == LifecycleState::Destroyed {
            return Err(Error::RecordDestroyed);
        }
        let family = self
            .schema
            .family_of(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))?
            .to_string();

        let cast = cast_value(name, self.schema.cast_target(name), value.into())?;
        if name == ID_PROPERTY {
            self.id = identifier(cast.clone())?;
        }

        let current = self.attributes.get(name).unwrap_or(&NULL);
        let default = self.schema.default_for(name).unwrap_or(Value::Null);
        if cast != *current && cast != default {
            self.loaded_families.insert(family);
        }
        self.attributes.insert(name.to_string(), cast);
        Ok(())
    }

    /// Cast-assign many attributes without saving
    pub fn update(&mut self, attrs: Attributes) -> Result<()> {
        for (name, value) in attrs {
            self.set(&name, value)?;
        }
        Ok(())
    }

    /// Cast-assign many attributes, then save with default options
    pub fn update_attributes(&mut self, attrs: Attributes) -> Result<Outcome> {
        self.update(attrs)?;
        self.save(&SaveOptions::new())
    }

    /// Snapshot of the readable attributes
    ///
    /// Properties of not-loaded families are skipped rather than
    /// erroring: this is the generic inspection/serialization surface.
    pub fn attributes(&self) -> BTreeMap<String, Value> {
        let mut snapshot = BTreeMap::new();
        for prop in self.schema.properties() {
            match self.get(prop) {
                Ok(value) => {
                    snapshot.insert(prop.clone(), value.clone());
                }
                Err(_) => {}
            }
        }
        snapshot
    }

    /// The readable attributes as a JSON object
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut object = serde_json::Map::new();
        for (name, value) in self.attributes() {
            object.insert(name, value.to_json()?);
        }
        Ok(serde_json::Value::Object(object))
    }

    // ========== Lifecycle ==========

    /// Persist this record
    ///
    /// Assigns an id from the per-type counter when unpersisted. Writes
    /// the loaded families plus any requested in `options` (or every
    /// registered family for [`FamilySelection::All`]), one hash field
    /// each. Hook order on a first save: before-save, before-create,
    /// write, after-create, after-save. A halting before-hook returns
    /// [`Outcome::Halted`] without touching the store.
    pub fn save(&mut self, options: &SaveOptions) -> Result<Outcome> {
        if self.state == LifecycleState::Destroyed {
            return Err(Error::RecordDestroyed);
        }
        let creating = self.state == LifecycleState::New;
        let hooks = Arc::clone(&self.hooks);

        if hooks.run(HookPoint::BeforeSave, self) == HookOutcome::Halt {
            return Ok(Outcome::Halted);
        }
        if creating && hooks.run(HookPoint::BeforeCreate, self) == HookOutcome::Halt {
            return Ok(Outcome::Halted);
        }

        let id = match &self.id {
            Some(value) => value.to_key_string(),
            None => {
                let assigned = self.gateway.next_id()?;
                self.id = Some(Value::Int(assigned));
                self.attributes
                    .insert(ID_PROPERTY.to_string(), Value::Int(assigned));
                assigned.to_string()
            }
        };

        let families = self.families_to_write(&options.families);
        self.gateway.write_fields(&id, &families, &self.attributes)?;
        debug!(
            record = self.schema.name(),
            %id,
            families = families.len(),
            "saved"
        );
        self.state = LifecycleState::Persisted;
        self.loaded_families.extend(families);

        if creating {
            hooks.run(HookPoint::AfterCreate, self);
        }
        hooks.run(HookPoint::AfterSave, self);
        Ok(Outcome::Completed)
    }

    /// Registered families due for the next write, in schema order
    fn families_to_write(&self, selection: &FamilySelection) -> Vec<String> {
        match selection {
            FamilySelection::All => self.schema.family_names().map(str::to_string).collect(),
            FamilySelection::Requested(requested) => self
                .schema
                .family_names()
                .filter(|name| {
                    self.loaded_families.contains(*name)
                        || requested.iter().any(|r| r == name)
                })
                .map(str::to_string)
                .collect(),
        }
    }

    /// Delete the storage key and freeze this instance
    pub fn destroy(&mut self) -> Result<Outcome> {
        if self.state == LifecycleState::Destroyed {
            return Err(Error::RecordDestroyed);
        }
        let hooks = Arc::clone(&self.hooks);
        if hooks.run(HookPoint::BeforeDestroy, self) == HookOutcome::Halt {
            return Ok(Outcome::Halted);
        }
        if let Some(id) = self.id_string() {
            self.gateway.delete_key(&id)?;
        }
        self.state = LifecycleState::Destroyed;
        hooks.run(HookPoint::AfterDestroy, self);
        Ok(Outcome::Completed)
    }

    /// Whether this record's key currently exists in the store
    pub fn is_persisted(&self) -> Result<bool> {
        match self.id_string() {
            Some(id) => self.gateway.exists(&id),
            None => Ok(false),
        }
    }

    /// Re-fetch from the store with the loaded families plus any requested
    ///
    /// Fetched attributes are cast and copied in, and the loaded set is
    /// replaced by the freshly fetched one. Returns `false` when the
    /// record no longer exists in the store; the instance is untouched
    /// in that case.
    pub fn reload(&mut self, selection: &FamilySelection) -> Result<bool> {
        if self.state == LifecycleState::Destroyed {
            return Err(Error::RecordDestroyed);
        }
        let Some(id) = self.id_string() else {
            return Ok(false);
        };

        let union = match selection {
            FamilySelection::All => FamilySelection::All,
            FamilySelection::Requested(requested) => {
                let mut names: Vec<String> = self.loaded_families.iter().cloned().collect();
                for name in requested {
                    if !names.contains(name) {
                        names.push(name.clone());
                    }
                }
                FamilySelection::Requested(names)
            }
        };

        let Some(fetched) = self.gateway.fetch_one(&id, &union)? else {
            return Ok(false);
        };
        let Fetched {
            attributes: raw,
            families,
        } = fetched;
        self.apply_raw(raw)?;
        self.loaded_families = BTreeSet::from([DEFAULT_FAMILY.to_string()]);
        self.loaded_families.extend(families);
        self.state = LifecycleState::Persisted;
        Ok(true)
    }
}

fn identifier(value: Value) -> Result<Option<Value>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(_) | Value::String(_) => Ok(Some(value)),
        other => Err(Error::Cast {
            property: ID_PROPERTY.to_string(),
            reason: format!(
                "identifier must be an integer or string, got {}",
                other.type_name()
            ),
        }),
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("type", &self.schema.name())
            .field("id", &self.id)
            .field("state", &self.state)
            .field("loaded_families", &self.loaded_families)
            .finish_non_exhaustive()
    }
}
