//! Raw list parameters as they arrive from the query string.
//!
//! The bag is open-ended; typed filters are coerced out of it once by each
//! listing's [`super::ListingFilters::from_raw`]. Coercion never fails:
//! unusable values read as absent.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::parse_bool;

/// Longest free text kept from a parameter, in characters.
pub const MAX_TEXT_CHARS: usize = 200;

/// Multi-valued parameter bag. Repeated keys accumulate in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    params: BTreeMap<String, Vec<String>>,
}

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one value under `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Builder form of [`RawQuery::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Builds a bag from a JSON object. Arrays become repeated values;
    /// numbers and booleans are stringified; nulls and nested objects are
    /// dropped.
    pub fn from_json(value: &Value) -> Self {
        let mut raw = Self::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                match value {
                    Value::Array(items) => {
                        for item in items {
                            if let Some(text) = scalar_text(item) {
                                raw.push(key.clone(), text);
                            }
                        }
                    }
                    other => {
                        if let Some(text) = scalar_text(other) {
                            raw.push(key.clone(), text);
                        }
                    }
                }
            }
        }
        raw
    }

    /// First non-blank value for `key`, trimmed.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)?
            .iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Sanitized free text: control characters stripped, whitespace trimmed,
    /// cut to [`MAX_TEXT_CHARS`], blank reads as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        let cleaned: String = self
            .first(key)?
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .chars()
            .take(MAX_TEXT_CHARS)
            .collect();
        let cleaned = cleaned.trim_end();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }

    /// Positive integer, or absent when missing, non-numeric or zero.
    pub fn positive_int(&self, key: &str) -> Option<u32> {
        self.first(key)?.parse::<u32>().ok().filter(|n| *n > 0)
    }

    /// Boolean-coercible value (`true/false/1/0/yes/no/on/off`).
    pub fn boolean(&self, key: &str) -> Option<bool> {
        parse_bool(self.first(key)?)
    }

    /// Every value for `key`, each split on commas, trimmed and lowercased.
    /// Blank items and control characters are dropped; the result is sorted
    /// and deduplicated so the list reads as a set.
    pub fn list(&self, key: &str) -> Vec<String> {
        let mut items: Vec<String> = self
            .params
            .get(key)
            .into_iter()
            .flatten()
            .flat_map(|value| value.split(','))
            .map(|item| {
                item.chars()
                    .filter(|c| !c.is_control())
                    .collect::<String>()
                    .trim()
                    .to_lowercase()
            })
            .filter(|item| !item.is_empty())
            .collect();
        items.sort();
        items.dedup();
        items
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (key, value) in iter {
            raw.push(key, value);
        }
        raw
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_skips_blank_values() {
        let raw = RawQuery::new().with("keyword", "  ").with("keyword", " rust ");
        assert_eq!(raw.first("keyword"), Some("rust"));
        assert_eq!(raw.first("missing"), None);
    }

    #[test]
    fn test_text_strips_control_characters() {
        let raw = RawQuery::new().with("keyword", "ru\u{0}st\n");
        assert_eq!(raw.text("keyword"), Some("rust".to_string()));

        let blank = RawQuery::new().with("keyword", "\t\n");
        assert_eq!(blank.text("keyword"), None);
    }

    #[test]
    fn test_text_truncated_on_char_boundary() {
        let long = "é".repeat(MAX_TEXT_CHARS + 50);
        let raw = RawQuery::new().with("keyword", long.as_str());
        let text = raw.text("keyword").unwrap();
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
        assert!(text.chars().all(|c| c == 'é'));

        // Whitespace at the cut is trimmed
        let padded = format!("{} tail", "a".repeat(MAX_TEXT_CHARS - 1));
        let raw = RawQuery::new().with("keyword", padded.as_str());
        assert_eq!(raw.text("keyword"), Some("a".repeat(MAX_TEXT_CHARS - 1)));
    }

    #[test]
    fn test_positive_int_coercion() {
        let raw = RawQuery::new()
            .with("page", "3")
            .with("limit", "0")
            .with("skip", "-2")
            .with("size", "ten");
        assert_eq!(raw.positive_int("page"), Some(3));
        assert_eq!(raw.positive_int("limit"), None);
        assert_eq!(raw.positive_int("skip"), None);
        assert_eq!(raw.positive_int("size"), None);
    }

    #[test]
    fn test_list_merges_commas_and_repeats() {
        let raw = RawQuery::new()
            .with("tags", "Rust, go")
            .with("tags", "rust")
            .with("tags", " , ");
        assert_eq!(raw.list("tags"), vec!["go".to_string(), "rust".to_string()]);
        assert!(raw.list("missing").is_empty());
    }

    #[test]
    fn test_from_json_accepts_scalars_and_arrays() {
        let raw = RawQuery::from_json(&json!({
            "page": 2,
            "isRemote": true,
            "tags": ["a", "b"],
            "keyword": "x",
            "ignored": null,
            "nested": {"a": 1}
        }));

        assert_eq!(raw.positive_int("page"), Some(2));
        assert_eq!(raw.boolean("isRemote"), Some(true));
        assert_eq!(raw.list("tags"), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(raw.first("ignored"), None);
        assert_eq!(raw.first("nested"), None);
    }

    #[test]
    fn test_from_iterator_pairs() {
        let raw: RawQuery = vec![("tags", "a"), ("tags", "b"), ("page", "1")]
            .into_iter()
            .collect();
        assert_eq!(raw.list("tags").len(), 2);
        assert_eq!(raw.positive_int("page"), Some(1));
    }
}
