//! Store-level filter expressions.
//!
//! Field names are the document's JSON field names. `Matches` carries a
//! regex source that was escaped from literal text, so a store that compiles
//! it can only ever perform a case-insensitive substring match.

use serde::Serialize;
use serde_json::Value;

/// A filter over documents, composable with AND/OR.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Predicate {
    /// Matches every document
    All,
    /// Field equals value
    Eq { field: &'static str, value: Value },
    /// Field text contains a literal substring, case-insensitively
    Matches { field: &'static str, pattern: String },
    /// Array field contains every listed value
    ContainsAll {
        field: &'static str,
        values: Vec<String>,
    },
    /// Numeric field is at least `value`
    Gte { field: &'static str, value: f64 },
    /// Numeric field is at most `value`
    Lte { field: &'static str, value: f64 },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            field,
            value: value.into(),
        }
    }

    /// Literal substring match. Control characters are dropped and regex
    /// metacharacters escaped.
    pub fn contains_text(field: &'static str, text: &str) -> Self {
        Predicate::Matches {
            field,
            pattern: literal_pattern(text),
        }
    }

    /// Literal substring match against any of `fields`.
    pub fn contains_text_any(fields: &[&'static str], text: &str) -> Self {
        Predicate::or(
            fields
                .iter()
                .map(|field| Predicate::contains_text(*field, text))
                .collect(),
        )
    }

    /// AND over an array field. An empty list matches everything.
    pub fn contains_all(field: &'static str, values: &[String]) -> Self {
        if values.is_empty() {
            return Predicate::All;
        }
        Predicate::ContainsAll {
            field,
            values: values.to_vec(),
        }
    }

    /// Conjunction with `All` terms dropped and nested ANDs flattened.
    pub fn and(terms: Vec<Predicate>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Predicate::All => {}
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Predicate::All,
            1 => flat.pop().unwrap_or(Predicate::All),
            _ => Predicate::And(flat),
        }
    }

    /// Disjunction. An `All` term makes the whole disjunction `All`.
    pub fn or(terms: Vec<Predicate>) -> Self {
        if terms.iter().any(|t| matches!(t, Predicate::All)) {
            return Predicate::All;
        }
        let mut terms = terms;
        match terms.len() {
            0 => Predicate::All,
            1 => terms.pop().unwrap_or(Predicate::All),
            _ => Predicate::Or(terms),
        }
    }
}

/// Turns user text into a regex source that matches it literally.
pub fn literal_pattern(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
    regex::escape(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    #[test]
    fn test_literal_pattern_neutralizes_metacharacters() {
        let pattern = literal_pattern(".*(a|b)+$");
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .unwrap();

        assert!(re.is_match("xx.*(A|B)+$yy"));
        assert!(!re.is_match("anything at all"));
        assert!(!re.is_match("a"));
    }

    #[test]
    fn test_literal_pattern_drops_control_characters() {
        assert_eq!(literal_pattern("ru\u{7}st"), "rust");
    }

    #[test]
    fn test_and_flattens_and_drops_all() {
        let p = Predicate::and(vec![
            Predicate::All,
            Predicate::and(vec![Predicate::eq("a", 1), Predicate::eq("b", 2)]),
            Predicate::eq("c", 3),
        ]);
        match p {
            Predicate::And(terms) => assert_eq!(terms.len(), 3),
            other => panic!("unexpected predicate {:?}", other),
        }
        assert_eq!(Predicate::and(vec![Predicate::All]), Predicate::All);
        assert_eq!(
            Predicate::and(vec![Predicate::eq("a", 1)]),
            Predicate::eq("a", 1)
        );
    }

    #[test]
    fn test_or_with_all_is_all() {
        assert_eq!(
            Predicate::or(vec![Predicate::eq("a", 1), Predicate::All]),
            Predicate::All
        );
    }

    #[test]
    fn test_contains_all_empty_is_all() {
        assert_eq!(Predicate::contains_all("tags", &[]), Predicate::All);
    }

    #[test]
    fn test_contains_text_any_builds_or() {
        match Predicate::contains_text_any(&["title", "description"], "rust") {
            Predicate::Or(terms) => assert_eq!(terms.len(), 2),
            other => panic!("unexpected predicate {:?}", other),
        }
    }
}
