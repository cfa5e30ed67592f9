//! Value casting for record attributes
//!
//! The caster runs for every attribute supplied at construction, at
//! `update_attributes`, and when hydrating from storage. It converts raw
//! decoded values into the property's declared type.
//!
//! ## Resolution order
//!
//! 1. Declared array-of-T target and the raw value is an array: each
//!    element is passed through T, elements already matching T unchanged.
//! 2. Declared single target T: construct T from the raw value, passing
//!    through values that already match.
//! 3. Untyped nested map: kept as a live map, dot-accessible through
//!    [`Value::dig`] without copying.
//! 4. String matching the ISO-8601 shape `YYYY-MM-DDTHH:MM:SS[.frac]Z`:
//!    parsed to a timestamp.
//! 5. Anything else passes through unchanged.

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A declared cast target for a property
///
/// Implementors convert raw decoded values into the property's domain
/// representation. `cast` must be idempotent over its own output, which
/// `matches` makes cheap to guarantee: values that already match are
/// passed through without re-casting.
pub trait CastType: Send + Sync {
    /// Name of the target type, used in error messages
    fn name(&self) -> &str;

    /// Whether the value is already an instance of this type
    fn matches(&self, value: &Value) -> bool;

    /// Construct the typed value from a raw one
    ///
    /// Errors here surface as [`Error::Cast`] naming the property.
    fn cast(&self, value: Value) -> std::result::Result<Value, String>;
}

/// How a property's declared cast applies: to the value, or elementwise
#[derive(Clone)]
pub enum CastTarget {
    /// Cast the value as a whole
    One(Arc<dyn CastType>),
    /// The value is an array; cast each element
    Many(Arc<dyn CastType>),
}

impl CastTarget {
    /// Single-value target
    pub fn one(target: impl CastType + 'static) -> Self {
        CastTarget::One(Arc::new(target))
    }

    /// Array-of-values target
    pub fn many(target: impl CastType + 'static) -> Self {
        CastTarget::Many(Arc::new(target))
    }
}

impl std::fmt::Debug for CastTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastTarget::One(t) => write!(f, "CastTarget::One({})", t.name()),
            CastTarget::Many(t) => write!(f, "CastTarget::Many([{}])", t.name()),
        }
    }
}

/// Cast one raw attribute value per the resolution order above
pub fn cast_value(property: &str, target: Option<&CastTarget>, raw: Value) -> Result<Value> {
    match target {
        Some(CastTarget::Many(t)) => match raw {
            Value::Array(items) => {
                let cast_items = items
                    .into_iter()
                    .map(|item| apply(property, t.as_ref(), item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(cast_items))
            }
            other => Err(Error::Cast {
                property: property.to_string(),
                reason: format!(
                    "expected an array of {}, got {}",
                    t.name(),
                    other.type_name()
                ),
            }),
        },
        Some(CastTarget::One(t)) => apply(property, t.as_ref(), raw),
        None => Ok(match raw {
            // Nested maps stay live views, readable by dotted path
            Value::Map(m) => Value::Map(m),
            Value::String(s) => match parse_timestamp(&s) {
                Some(t) => Value::Timestamp(t),
                None => Value::String(s),
            },
            other => other,
        }),
    }
}

fn apply(property: &str, target: &dyn CastType, value: Value) -> Result<Value> {
    if target.matches(&value) {
        return Ok(value);
    }
    target.cast(value).map_err(|reason| Error::Cast {
        property: property.to_string(),
        reason: format!("{}: {}", target.name(), reason),
    })
}

/// Parse a string of the exact shape `YYYY-MM-DDTHH:MM:SS[.frac]Z`
///
/// Returns `None` for any other shape; strings that match the shape but
/// name an impossible date also yield `None` and stay strings.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if !matches_timestamp_shape(s) {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn matches_timestamp_shape(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() < 20 || !s.is_ascii() {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| b[range].iter().all(u8::is_ascii_digit);
    let fixed = digits(0..4)
        && b[4] == b'-'
        && digits(5..7)
        && b[7] == b'-'
        && digits(8..10)
        && b[10] == b'T'
        && digits(11..13)
        && b[13] == b':'
        && digits(14..16)
        && b[16] == b':'
        && digits(17..19);
    if !fixed {
        return false;
    }
    match &b[19..] {
        [b'Z'] => true,
        [b'.', frac @ .., b'Z'] => !frac.is_empty() && frac.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}
