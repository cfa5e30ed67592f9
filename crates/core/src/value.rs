//! Value types for Warren records
//!
//! This module defines:
//! - `Value`: tagged enum holding every attribute a record can carry
//!
//! ## Design
//!
//! Attributes are a generic mapping from property name to `Value`, so one
//! record type can hold a dynamic schema while property access stays O(1)
//! and type checking happens once, at the cast boundary.
//!
//! Nested maps are live views: `dig` walks dotted paths by borrowing into
//! the stored map, never copying.
//!
//! ## JSON mapping
//!
//! `Value` converts losslessly to and from `serde_json::Value`, since each
//! family is persisted as a UTF-8 JSON object. `Timestamp` serializes as an
//! ISO-8601 string (`YYYY-MM-DDTHH:MM:SS[.fraction]Z`), the same shape the
//! caster recognizes on the way back in.

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Canonical Warren value type for record attributes
///
/// ## Type Equality
///
/// Different variants are never equal, even for the same "value":
/// `Int(1) != Float(1.0)`. Float equality follows IEEE-754 semantics
/// (`NaN != NaN`, `-0.0 == 0.0`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null / unset value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// UTC timestamp (parsed from ISO-8601 strings by the caster)
    Timestamp(DateTime<Utc>),
    /// Array of values
    Array(Vec<Value>),
    /// Nested map with string keys, dot-accessible via [`Value::dig`]
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a map value
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a timestamp if this is a Timestamp value
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &BTreeMap if this is a Map value
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Read a nested value by dotted path, e.g. `"tree.trunk.branch"`
    ///
    /// A live borrowing walk over nested maps; nothing is copied. Returns
    /// `None` when any segment is missing or a non-map is hit mid-path.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren_core::value::Value;
    /// use std::collections::BTreeMap;
    ///
    /// let mut trunk = BTreeMap::new();
    /// trunk.insert("branch".to_string(), Value::String("leaf".to_string()));
    /// let mut tree = BTreeMap::new();
    /// tree.insert("trunk".to_string(), Value::Map(trunk));
    /// let value = Value::Map(tree);
    ///
    /// assert_eq!(value.dig("trunk.branch"), Some(&Value::String("leaf".to_string())));
    /// assert_eq!(value.dig("trunk.missing"), None);
    /// ```
    pub fn dig(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            match current {
                Value::Map(m) => current = m.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Render this value as the string used in storage keys
    ///
    /// Only meaningful for identifier values (Int or String).
    pub fn to_key_string(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::String(s) => s.clone(),
            other => format!("{:?}", other),
        }
    }

    /// Convert to a `serde_json::Value` for storage
    ///
    /// Non-finite floats cannot be represented in JSON and error out.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| {
                    Error::Serialization(format!("non-finite float {} is not valid JSON", f))
                })?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(t) => {
                serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<Result<_>>()?,
            ),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.to_json()?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// Convert from a decoded `serde_json::Value`
    ///
    /// Strings stay strings here; timestamp recognition is the caster's
    /// job, so hydration and construction share one resolution ladder.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from_json(json))
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(m: BTreeMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tree_fixture() -> Value {
        let mut branch = BTreeMap::new();
        branch.insert("leaf".to_string(), Value::Int(1));
        let mut trunk = BTreeMap::new();
        trunk.insert("branch".to_string(), Value::Map(branch));
        let mut tree = BTreeMap::new();
        tree.insert("trunk".to_string(), Value::Map(trunk));
        Value::Map(tree)
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Int(1).type_name(), "Int");
        assert_eq!(Value::Map(BTreeMap::new()).type_name(), "Map");
    }

    #[test]
    fn test_int_and_float_never_equal() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_nan_not_equal_to_itself() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_dig_nested_path() {
        let tree = tree_fixture();
        assert_eq!(tree.dig("trunk.branch.leaf"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_dig_missing_segment() {
        let tree = tree_fixture();
        assert_eq!(tree.dig("trunk.missing.leaf"), None);
    }

    #[test]
    fn test_dig_through_non_map() {
        let tree = tree_fixture();
        assert_eq!(tree.dig("trunk.branch.leaf.deeper"), None);
    }

    #[test]
    fn test_json_round_trip_scalars() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Int(-7),
            Value::Float(2.5),
            Value::String("hello".to_string()),
        ] {
            let json = value.to_json().unwrap();
            assert_eq!(Value::from_json(json), value);
        }
    }

    #[test]
    fn test_timestamp_serializes_as_iso8601() {
        let t = Utc.with_ymd_and_hms(2011, 11, 9, 23, 0, 0).unwrap();
        let json = Value::Timestamp(t).to_json().unwrap();
        assert_eq!(json, serde_json::json!("2011-11-09T23:00:00Z"));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let err = Value::Float(f64::INFINITY).to_json().unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from_json(serde_json::json!(3)), Value::Int(3));
        assert_eq!(Value::from_json(serde_json::json!(3.5)), Value::Float(3.5));
    }

    #[test]
    fn test_to_key_string() {
        assert_eq!(Value::Int(42).to_key_string(), "42");
        assert_eq!(Value::String("abc".to_string()).to_key_string(), "abc");
    }

    #[test]
    fn test_serde_uses_the_json_mapping() {
        let t = Utc.with_ymd_and_hms(2011, 11, 9, 23, 0, 0).unwrap();
        let serialized = serde_json::to_string(&Value::Timestamp(t)).unwrap();
        assert_eq!(serialized, "\"2011-11-09T23:00:00Z\"");

        let back: Value = serde_json::from_str("{\"n\": 3}").unwrap();
        assert_eq!(back.dig("n"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
        assert_eq!(Value::from(5i64), Value::Int(5));
        assert_eq!(
            Value::from(vec![1i64, 2]),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
    }
}
