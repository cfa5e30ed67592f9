//! Storage key layout for Warren records
//!
//! ## Contract
//!
//! The layout is frozen for compatibility with existing datasets:
//! - Per-record hash: `{plural}:{id}`, one hash field per family
//! - Per-type counter: `{plural}_ids`, incremented atomically
//! - Enumeration: record keys match `{plural}:*`; the id is the suffix
//!   after the colon
//!
//! Type names are pluralized with a small deterministic English
//! pluralizer; callers that need an irregular plural can pass it
//! explicitly when building the schema.

/// Build the hash key for one record
pub fn record_key(plural: &str, id: &str) -> String {
    format!("{}:{}", plural, id)
}

/// Build the auto-increment counter key for a record type
pub fn counter_key(plural: &str) -> String {
    format!("{}_ids", plural)
}

/// Build the scan prefix matching every record key of a type
pub fn scan_prefix(plural: &str) -> String {
    format!("{}:", plural)
}

/// Extract the id suffix from a record key, if it belongs to this type
pub fn id_from_key<'a>(plural: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(plural)?.strip_prefix(':')
}

/// Pluralize an English type name for the key layout
///
/// Handles the regular cases: sibilant endings take `es`, consonant + `y`
/// becomes `ies`, everything else takes `s`.
///
/// # Examples
///
/// ```
/// use warren_core::key::pluralize;
///
/// assert_eq!(pluralize("article"), "articles");
/// assert_eq!(pluralize("box"), "boxes");
/// assert_eq!(pluralize("company"), "companies");
/// assert_eq!(pluralize("day"), "days");
/// ```
pub fn pluralize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let lower = name.to_ascii_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", name);
    }
    if lower.ends_with('y') {
        let before_y = lower.as_bytes()[lower.len().saturating_sub(2)];
        if !matches!(before_y, b'a' | b'e' | b'i' | b'o' | b'u') || lower.len() == 1 {
            return format!("{}ies", &name[..name.len() - 1]);
        }
    }
    format!("{}s", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_layout() {
        assert_eq!(record_key("articles", "1"), "articles:1");
        assert_eq!(record_key("articles", "abc"), "articles:abc");
    }

    #[test]
    fn test_counter_key_layout() {
        assert_eq!(counter_key("articles"), "articles_ids");
    }

    #[test]
    fn test_scan_prefix_layout() {
        assert_eq!(scan_prefix("articles"), "articles:");
    }

    #[test]
    fn test_id_from_key() {
        assert_eq!(id_from_key("articles", "articles:42"), Some("42"));
        assert_eq!(id_from_key("articles", "comments:42"), None);
        assert_eq!(id_from_key("articles", "articles_ids"), None);
    }

    #[test]
    fn test_pluralize_regular() {
        assert_eq!(pluralize("article"), "articles");
        assert_eq!(pluralize("record"), "records");
    }

    #[test]
    fn test_pluralize_sibilants() {
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("dish"), "dishes");
        assert_eq!(pluralize("quiz"), "quizes");
    }

    #[test]
    fn test_pluralize_consonant_y() {
        assert_eq!(pluralize("company"), "companies");
        assert_eq!(pluralize("city"), "cities");
    }

    #[test]
    fn test_pluralize_vowel_y() {
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("key"), "keys");
    }

    #[test]
    fn test_pluralize_empty() {
        assert_eq!(pluralize(""), "");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn key_round_trips_any_id(plural in "[a-z]{1,12}", id in "[A-Za-z0-9_:-]{1,16}") {
                let key = record_key(&plural, &id);
                prop_assert_eq!(id_from_key(&plural, &key), Some(id.as_str()));
            }
        }
    }
}
