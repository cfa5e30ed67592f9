//! Property registry for record types
//!
//! ## Design
//!
//! A `Schema` is built once at type-declaration time and immutable after
//! that; every record instance shares it through an `Arc`. Declaring a
//! property records its default, its cast target and its family, and is
//! idempotent: a repeated declaration never duplicates the property in
//! the ordered property list or in its family.
//!
//! ## Defaults
//!
//! A default is either a literal value or a zero-argument provider.
//! Both materialize fresh per instance, so two records can never share
//! one mutable default (arrays and maps are cloned, providers re-run).
//!
//! ## Families
//!
//! Every property belongs to exactly one named family; properties
//! declared without a family land in `"default"`, which always exists
//! and always contains at least `id`. Families are the load/save
//! granularity: each is stored as one hash field.

use crate::cast::CastTarget;
use crate::key::pluralize;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the family holding every property not assigned elsewhere
pub const DEFAULT_FAMILY: &str = "default";

/// Name of the identifier property, present on every schema
pub const ID_PROPERTY: &str = "id";

/// A per-property default: a literal value or a lazy provider
#[derive(Clone)]
pub enum DefaultValue {
    /// Cloned fresh for each instance
    Literal(Value),
    /// Invoked fresh for each instance
    Provider(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produce this default's value for one instance
    pub fn materialize(&self) -> Value {
        match self {
            DefaultValue::Literal(v) => v.clone(),
            DefaultValue::Provider(f) => f(),
        }
    }
}

impl std::fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Literal(v) => write!(f, "Literal({:?})", v),
            DefaultValue::Provider(_) => write!(f, "Provider(..)"),
        }
    }
}

/// Options for one property declaration
#[derive(Debug, Default)]
pub struct PropertyOptions {
    default: Option<DefaultValue>,
    cast: Option<CastTarget>,
    family: Option<String>,
}

impl PropertyOptions {
    /// No default, no cast, `"default"` family
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal default value, cloned per instance
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Lazy default, produced fresh per instance
    pub fn default_with(mut self, provider: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::Provider(Arc::new(provider)));
        self
    }

    /// Cast target applied on every write and hydration
    pub fn cast(mut self, target: CastTarget) -> Self {
        self.cast = Some(target);
        self
    }

    /// Assign the property to a named family
    pub fn family(mut self, name: impl Into<String>) -> Self {
        self.family = Some(name.into());
        self
    }
}

/// Immutable, shared registry of a record type's properties
#[derive(Debug)]
pub struct Schema {
    name: String,
    plural: String,
    properties: Vec<String>,
    defaults: HashMap<String, DefaultValue>,
    casts: HashMap<String, CastTarget>,
    // Ordered family list; "default" is always first
    families: Vec<(String, Vec<String>)>,
    property_family: HashMap<String, String>,
}

impl Schema {
    /// Start declaring a record type
    pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(type_name)
    }

    /// Singular type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pluralized type name used in storage keys
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Ordered property names, starting with `id`
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Whether a property is declared
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }

    /// Ordered family names, `"default"` first
    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(|(name, _)| name.as_str())
    }

    /// Ordered properties of one family
    pub fn family_properties(&self, family: &str) -> Option<&[String]> {
        self.families
            .iter()
            .find(|(name, _)| name == family)
            .map(|(_, props)| props.as_slice())
    }

    /// The family owning a property
    pub fn family_of(&self, property: &str) -> Option<&str> {
        self.property_family.get(property).map(String::as_str)
    }

    /// Materialize the default for one property, if declared
    pub fn default_for(&self, property: &str) -> Option<Value> {
        self.defaults.get(property).map(DefaultValue::materialize)
    }

    /// The declared cast target for a property, if any
    pub fn cast_target(&self, property: &str) -> Option<&CastTarget> {
        self.casts.get(property)
    }

    /// Families whose property set intersects the given attribute names
    pub fn families_touched<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut touched: Vec<String> = Vec::new();
        for name in names {
            if let Some(family) = self.family_of(name) {
                if !touched.iter().any(|f| f == family) {
                    touched.push(family.to_string());
                }
            }
        }
        touched
    }
}

/// Builder accumulating property declarations into a frozen [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// New builder for a type; the plural is derived from the name
    pub fn new(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        let plural = pluralize(&name);
        Self::with_plural(name, plural)
    }

    /// New builder with an explicit (irregular) plural
    pub fn with_plural(type_name: impl Into<String>, plural: impl Into<String>) -> Self {
        let schema = Schema {
            name: type_name.into(),
            plural: plural.into(),
            properties: vec![ID_PROPERTY.to_string()],
            defaults: HashMap::new(),
            casts: HashMap::new(),
            families: vec![(DEFAULT_FAMILY.to_string(), vec![ID_PROPERTY.to_string()])],
            property_family: HashMap::from([(
                ID_PROPERTY.to_string(),
                DEFAULT_FAMILY.to_string(),
            )]),
        };
        SchemaBuilder { schema }
    }

    /// Declare one property; repeated declarations of the same name are ignored
    pub fn property(mut self, name: impl Into<String>, options: PropertyOptions) -> Self {
        let name = name.into();
        if self.schema.has_property(&name) {
            return self;
        }
        self.schema.properties.push(name.clone());

        if let Some(default) = options.default {
            self.schema.defaults.insert(name.clone(), default);
        }
        if let Some(cast) = options.cast {
            self.schema.casts.insert(name.clone(), cast);
        }

        let family = options.family.unwrap_or_else(|| DEFAULT_FAMILY.to_string());
        match self
            .schema
            .families
            .iter_mut()
            .find(|(existing, _)| *existing == family)
        {
            Some((_, props)) => props.push(name.clone()),
            None => self.schema.families.push((family.clone(), vec![name.clone()])),
        }
        self.schema.property_family.insert(name, family);
        self
    }

    /// Freeze the schema for sharing across instances
    pub fn build(self) -> Arc<Schema> {
        Arc::new(self.schema)
    }
}
