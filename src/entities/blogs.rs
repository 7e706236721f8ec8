//! Blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::finder::{
    Document, Listing, ListingFilters, Predicate, RawQuery, SortOrder, SortSpec, SortToken,
};

use super::{key_list, normalize_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            "archived" => Some(PostStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub views: u64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Document for BlogPost {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlogFilters {
    pub keyword: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
}

impl ListingFilters for BlogFilters {
    fn from_raw(raw: &RawQuery) -> Self {
        Self {
            keyword: raw.text("keyword"),
            author: raw.text("author"),
            tags: raw.list("tags"),
            status: raw
                .first("status")
                .and_then(PostStatus::parse)
                .unwrap_or_default(),
        }
    }

    fn key_value(&self, field: &str) -> Option<String> {
        match field {
            "keyword" => self.keyword.clone(),
            "author" => self.author.clone(),
            "tags" => key_list(&self.tags),
            "status" => Some(self.status.as_str().to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSort {
    #[default]
    NewestFirst,
    OldestFirst,
    MostViewed,
    TitleAZ,
}

impl SortToken for BlogSort {
    const ALL: &'static [Self] = &[
        BlogSort::NewestFirst,
        BlogSort::OldestFirst,
        BlogSort::MostViewed,
        BlogSort::TitleAZ,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            BlogSort::NewestFirst => "newest_first",
            BlogSort::OldestFirst => "oldest_first",
            BlogSort::MostViewed => "most_viewed",
            BlogSort::TitleAZ => "title_a_z",
        }
    }

    fn spec(&self) -> SortSpec {
        match self {
            BlogSort::NewestFirst => SortSpec::new("createdAt", SortOrder::Desc),
            BlogSort::OldestFirst => SortSpec::new("createdAt", SortOrder::Asc),
            BlogSort::MostViewed => SortSpec::new("views", SortOrder::Desc),
            BlogSort::TitleAZ => SortSpec::new("title", SortOrder::Asc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlogListing;

impl Listing for BlogListing {
    const TAG: &'static str = "blogs";
    const KEY_VERSION: u32 = 1;
    const KEY_FIELDS: &'static [&'static str] = &["keyword", "author", "tags", "status"];
    const DEFAULT_LIMIT: u32 = 10;
    const MAX_LIMIT: u32 = 50;

    type Item = BlogPost;
    type Filters = BlogFilters;
    type Sort = BlogSort;

    fn build_predicate(filters: &BlogFilters) -> Predicate {
        let mut terms = vec![Predicate::eq("status", filters.status.as_str())];
        if let Some(keyword) = &filters.keyword {
            terms.push(Predicate::contains_text_any(
                &["title", "excerpt", "content"],
                keyword,
            ));
        }
        if let Some(author) = &filters.author {
            terms.push(Predicate::contains_text("author", author));
        }
        terms.push(Predicate::contains_all("tags", &filters.tags));
        Predicate::and(terms)
    }
}
