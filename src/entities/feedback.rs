//! User feedback. Only moderated (approved) entries are listed by default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::finder::{
    Document, Listing, ListingFilters, Predicate, RawQuery, SortOrder, SortSpec, SortToken,
};

use super::normalize_token;

/// Ratings run from 1 to this value.
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Bug,
    Feature,
    #[default]
    General,
    Praise,
}

impl FeedbackCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::Feature => "feature",
            FeedbackCategory::General => "general",
            FeedbackCategory::Praise => "praise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "bug" => Some(FeedbackCategory::Bug),
            "feature" => Some(FeedbackCategory::Feature),
            "general" => Some(FeedbackCategory::General),
            "praise" => Some(FeedbackCategory::Praise),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Approved => "approved",
            FeedbackStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "pending" => Some(FeedbackStatus::Pending),
            "approved" => Some(FeedbackStatus::Approved),
            "rejected" => Some(FeedbackStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub category: FeedbackCategory,
    pub rating: u8,
    #[serde(default)]
    pub status: FeedbackStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Document for Feedback {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackFilters {
    pub keyword: Option<String>,
    pub category: Option<FeedbackCategory>,
    /// Clamped to `1..=MAX_RATING`
    pub min_rating: Option<u8>,
    pub status: FeedbackStatus,
}

impl Default for FeedbackFilters {
    fn default() -> Self {
        Self {
            keyword: None,
            category: None,
            min_rating: None,
            status: FeedbackStatus::Approved,
        }
    }
}

impl ListingFilters for FeedbackFilters {
    fn from_raw(raw: &RawQuery) -> Self {
        Self {
            keyword: raw.text("keyword"),
            category: raw.first("category").and_then(FeedbackCategory::parse),
            min_rating: raw
                .positive_int("minRating")
                .map(|r| r.min(u32::from(MAX_RATING)) as u8),
            status: raw
                .first("status")
                .and_then(FeedbackStatus::parse)
                .unwrap_or(FeedbackStatus::Approved),
        }
    }

    fn key_value(&self, field: &str) -> Option<String> {
        match field {
            "keyword" => self.keyword.clone(),
            "category" => self.category.map(|c| c.as_str().to_string()),
            "minRating" => self.min_rating.map(|r| r.to_string()),
            "status" => Some(self.status.as_str().to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackSort {
    #[default]
    NewestFirst,
    OldestFirst,
    RatingHighToLow,
    RatingLowToHigh,
}

impl SortToken for FeedbackSort {
    const ALL: &'static [Self] = &[
        FeedbackSort::NewestFirst,
        FeedbackSort::OldestFirst,
        FeedbackSort::RatingHighToLow,
        FeedbackSort::RatingLowToHigh,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            FeedbackSort::NewestFirst => "newest_first",
            FeedbackSort::OldestFirst => "oldest_first",
            FeedbackSort::RatingHighToLow => "rating_high_to_low",
            FeedbackSort::RatingLowToHigh => "rating_low_to_high",
        }
    }

    fn spec(&self) -> SortSpec {
        match self {
            FeedbackSort::NewestFirst => SortSpec::new("createdAt", SortOrder::Desc),
            FeedbackSort::OldestFirst => SortSpec::new("createdAt", SortOrder::Asc),
            FeedbackSort::RatingHighToLow => SortSpec::new("rating", SortOrder::Desc),
            FeedbackSort::RatingLowToHigh => SortSpec::new("rating", SortOrder::Asc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackListing;

impl Listing for FeedbackListing {
    const TAG: &'static str = "feedback";
    const KEY_VERSION: u32 = 1;
    const KEY_FIELDS: &'static [&'static str] = &["keyword", "category", "minRating", "status"];
    const DEFAULT_LIMIT: u32 = 20;
    const MAX_LIMIT: u32 = 100;

    type Item = Feedback;
    type Filters = FeedbackFilters;
    type Sort = FeedbackSort;

    fn build_predicate(filters: &FeedbackFilters) -> Predicate {
        let mut terms = vec![Predicate::eq("status", filters.status.as_str())];
        if let Some(keyword) = &filters.keyword {
            terms.push(Predicate::contains_text_any(&["message", "name"], keyword));
        }
        if let Some(category) = filters.category {
            terms.push(Predicate::eq("category", category.as_str()));
        }
        if let Some(min_rating) = filters.min_rating {
            terms.push(Predicate::Gte {
                field: "rating",
                value: f64::from(min_rating),
            });
        }
        Predicate::and(terms)
    }
}
