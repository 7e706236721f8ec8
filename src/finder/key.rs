//! Cache Key Deriver.
//!
//! Keys look like
//! `jobs:v1:page=1|limit=20|sort=newest_first|order=desc|keyword=rust|tags=a,b|...`.
//! Fields appear in a fixed order: the paging fields, then the listing's
//! `KEY_FIELDS`. Absent filters render as `~`. Values are escaped so no
//! value can forge a separator or the absent marker. Keys that would exceed
//! the cache's key limit collapse to `<tag>:v<version>:h:<sha256>`, which
//! keeps the entity prefix intact for invalidation.

use sha2::{Digest, Sha256};

use crate::cache::MAX_KEY_LENGTH;

use super::{ListRequest, Listing, ListingFilters, SortToken};

/// Marker for an absent field.
pub const ABSENT: &str = "~";

/// Namespace shared by every key of one entity.
pub fn key_prefix(entity_tag: &str) -> String {
    format!("{}:", entity_tag)
}

/// Derives the cache key for a normalized request.
pub fn derive<L: Listing>(request: &ListRequest<L>) -> String {
    let page = request.page.to_string();
    let limit = request.limit.to_string();

    let mut fields: Vec<(&str, Option<String>)> = Vec::with_capacity(4 + L::KEY_FIELDS.len());
    fields.push(("page", Some(page)));
    fields.push(("limit", Some(limit)));
    fields.push(("sort", Some(request.sort.as_str().to_string())));
    fields.push(("order", Some(request.order.as_str().to_string())));
    for &field in L::KEY_FIELDS {
        fields.push((field, request.filters.key_value(field)));
    }

    derive_from_fields(L::TAG, L::KEY_VERSION, &fields)
}

/// Builds a key from an explicitly ordered field list.
pub fn derive_from_fields(entity_tag: &str, version: u32, fields: &[(&str, Option<String>)]) -> String {
    let body = fields
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Some(v) => escape(v),
                None => ABSENT.to_string(),
            };
            format!("{}={}", name, value)
        })
        .collect::<Vec<_>>()
        .join("|");

    let key = format!("{}:v{}:{}", entity_tag, version, body);
    if key.len() <= MAX_KEY_LENGTH {
        return key;
    }

    let digest = Sha256::digest(body.as_bytes());
    format!("{}:v{}:h:{}", entity_tag, version, hex::encode(digest))
}

/// Percent-escapes the characters that carry meaning inside a key.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '|' => out.push_str("%7C"),
            '=' => out.push_str("%3D"),
            '~' => out.push_str("%7E"),
            ':' => out.push_str("%3A"),
            c if c.is_control() || c.is_whitespace() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_literal_tilde_differ() {
        let absent = derive_from_fields("jobs", 1, &[("keyword", None)]);
        let tilde = derive_from_fields("jobs", 1, &[("keyword", Some("~".to_string()))]);
        assert_ne!(absent, tilde);
        assert_eq!(absent, "jobs:v1:keyword=~");
    }

    #[test]
    fn test_separator_injection_is_escaped() {
        let forged = derive_from_fields(
            "jobs",
            1,
            &[("keyword", Some("x|location=y".to_string())), ("location", None)],
        );
        let honest = derive_from_fields(
            "jobs",
            1,
            &[("keyword", Some("x".to_string())), ("location", Some("y".to_string()))],
        );
        assert_ne!(forged, honest);
    }

    #[test]
    fn test_escape_round_trip_characters() {
        assert_eq!(escape("a b"), "a%20b");
        assert_eq!(escape("100%"), "100%25");
        assert_eq!(escape("k=v|w"), "k%3Dv%7Cw");
        assert_eq!(escape("plain-text_1,2"), "plain-text_1,2");
    }

    #[test]
    fn test_long_keys_are_hashed_under_prefix() {
        let long = "x".repeat(MAX_KEY_LENGTH);
        let key = derive_from_fields("blogs", 2, &[("keyword", Some(long.clone()))]);

        assert!(key.starts_with("blogs:v2:h:"));
        assert!(key.len() <= MAX_KEY_LENGTH);
        assert_eq!(key, derive_from_fields("blogs", 2, &[("keyword", Some(long))]));
    }

    #[test]
    fn test_version_is_part_of_key() {
        let v1 = derive_from_fields("jobs", 1, &[("keyword", None)]);
        let v2 = derive_from_fields("jobs", 2, &[("keyword", None)]);
        assert_ne!(v1, v2);
        assert!(v1.starts_with(&key_prefix("jobs")));
    }
}
