//! In-memory document store.
//!
//! Holds JSON documents per collection and evaluates predicates directly.
//! Text matches compile the predicate's escaped pattern case-insensitively.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::finder::{Predicate, SortOrder, SortSpec};

use super::{DocumentStore, FindOptions};

/// Collections of JSON documents keyed by their `id` field.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends documents without id checks. Used for seeding.
    pub async fn seed(&self, collection: &str, documents: impl IntoIterator<Item = Value>) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        options: &FindOptions,
    ) -> Result<Vec<Value>, StoreError> {
        let filter = Compiled::new(predicate)?;
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Value> = documents.iter().filter(|doc| filter.eval(doc)).collect();
        matched.sort_by(|a, b| compare_documents(a, b, &options.sort));

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(options.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, collection: &str, predicate: &Predicate) -> Result<u64, StoreError> {
        let filter = Compiled::new(predicate)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map_or(0, |docs| docs.iter().filter(|doc| filter.eval(doc)).count()) as u64)
    }

    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|doc| document_id(doc) == Some(id)) {
            return Err(StoreError::Conflict(id.to_string()));
        }
        documents.push(document);
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| document_id(doc) == Some(id)))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = document;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let position = documents
            .iter()
            .position(|doc| document_id(doc) == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        documents.remove(position);
        Ok(())
    }
}

fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

// == Predicate evaluation ==

enum Compiled<'a> {
    All,
    Eq(&'a str, &'a Value),
    Matches(&'a str, Regex),
    ContainsAll(&'a str, Vec<String>),
    Gte(&'a str, f64),
    Lte(&'a str, f64),
    And(Vec<Compiled<'a>>),
    Or(Vec<Compiled<'a>>),
}

impl<'a> Compiled<'a> {
    fn new(predicate: &'a Predicate) -> Result<Self, StoreError> {
        Ok(match predicate {
            Predicate::All => Compiled::All,
            Predicate::Eq { field, value } => Compiled::Eq(*field, value),
            Predicate::Matches { field, pattern } => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| StoreError::InvalidPredicate(e.to_string()))?;
                Compiled::Matches(*field, regex)
            }
            Predicate::ContainsAll { field, values } => {
                Compiled::ContainsAll(*field, values.iter().map(|v| v.to_lowercase()).collect())
            }
            Predicate::Gte { field, value } => Compiled::Gte(*field, *value),
            Predicate::Lte { field, value } => Compiled::Lte(*field, *value),
            Predicate::And(terms) => {
                Compiled::And(terms.iter().map(Compiled::new).collect::<Result<_, _>>()?)
            }
            Predicate::Or(terms) => {
                Compiled::Or(terms.iter().map(Compiled::new).collect::<Result<_, _>>()?)
            }
        })
    }

    fn eval(&self, doc: &Value) -> bool {
        match self {
            Compiled::All => true,
            Compiled::Eq(field, value) => doc.get(*field) == Some(*value),
            Compiled::Matches(field, regex) => match doc.get(*field) {
                Some(Value::String(text)) => regex.is_match(text),
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|text| regex.is_match(text)),
                _ => false,
            },
            Compiled::ContainsAll(field, wanted) => match doc.get(*field) {
                Some(Value::Array(items)) => {
                    let present: Vec<String> = items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_lowercase)
                        .collect();
                    wanted.iter().all(|w| present.contains(w))
                }
                _ => false,
            },
            Compiled::Gte(field, bound) => doc
                .get(*field)
                .and_then(Value::as_f64)
                .is_some_and(|v| v >= *bound),
            Compiled::Lte(field, bound) => doc
                .get(*field)
                .and_then(Value::as_f64)
                .is_some_and(|v| v <= *bound),
            Compiled::And(terms) => terms.iter().all(|t| t.eval(doc)),
            Compiled::Or(terms) => terms.iter().any(|t| t.eval(doc)),
        }
    }
}

// == Ordering ==

/// Orders by the primary field (missing values last in either direction),
/// then by the tie-break field ascending.
fn compare_documents(a: &Value, b: &Value, sort: &SortSpec) -> Ordering {
    let primary = match (present(a, sort.field), present(b, sort.field)) {
        (Some(x), Some(y)) => {
            let ord = compare_values(x, y);
            match sort.direction {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    primary.then_with(|| {
        match (present(a, sort.tie_break), present(b, sort.tie_break)) {
            (Some(x), Some(y)) => compare_values(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    })
}

fn present<'v>(doc: &'v Value, field: &str) -> Option<&'v Value> {
    doc.get(field).filter(|v| !v.is_null())
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok()
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
