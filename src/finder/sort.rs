//! Sort tokens and store-level sort specifications.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Field every sort falls back to when primary values tie.
pub const TIE_BREAK_FIELD: &str = "id";

/// Fully specified ordering: primary field and direction, then
/// [`TIE_BREAK_FIELD`] ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortOrder,
    pub tie_break: &'static str,
}

impl SortSpec {
    pub const fn new(field: &'static str, direction: SortOrder) -> Self {
        Self {
            field,
            direction,
            tie_break: TIE_BREAK_FIELD,
        }
    }

    pub const fn with_direction(self, direction: SortOrder) -> Self {
        Self { direction, ..self }
    }
}

/// A listing's closed set of sort intents.
///
/// `Default` must be the newest-first token; unknown and absent tokens
/// resolve to it.
pub trait SortToken: Copy + Eq + Debug + Default + Send + Sync + 'static {
    /// Every token, in display order.
    const ALL: &'static [Self];

    /// Wire name, e.g. `newest_first`.
    fn as_str(&self) -> &'static str;

    /// Field and natural direction.
    fn spec(&self) -> SortSpec;

    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
    }
}

/// Resolves a raw token, favouring the default over an error.
pub fn resolve<S: SortToken>(token: Option<&str>) -> S {
    token.and_then(S::parse).unwrap_or_default()
}

/// Resolves a raw token straight to its sort specification.
#[cfg(test)]
pub fn resolve_spec<S: SortToken>(token: Option<&str>) -> SortSpec {
    resolve::<S>(token).spec()
}
