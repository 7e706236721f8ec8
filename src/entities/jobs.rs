//! Job listings.
//!
//! Public scope by default: published and approved. Both scoping fields can
//! be overridden explicitly (`status=closed`, `approved=false`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::finder::{
    Document, Listing, ListingFilters, Predicate, RawQuery, SortOrder, SortSpec, SortToken,
};

use super::{key_list, normalize_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
            EmploymentType::Temporary => "temporary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "full_time" | "fulltime" => Some(EmploymentType::FullTime),
            "part_time" | "parttime" => Some(EmploymentType::PartTime),
            "contract" => Some(EmploymentType::Contract),
            "internship" => Some(EmploymentType::Internship),
            "temporary" => Some(EmploymentType::Temporary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    #[default]
    Published,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Published => "published",
            JobStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "draft" => Some(JobStatus::Draft),
            "published" => Some(JobStatus::Published),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }
}

/// A job posting as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
    #[serde(default)]
    pub status: JobStatus,
    /// New postings wait for an admin
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl Document for Job {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobFilters {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub employment_type: Option<EmploymentType>,
    pub is_remote: Option<bool>,
    pub status: JobStatus,
    pub approved: bool,
}

impl Default for JobFilters {
    fn default() -> Self {
        Self {
            keyword: None,
            location: None,
            tags: Vec::new(),
            employment_type: None,
            is_remote: None,
            status: JobStatus::Published,
            approved: true,
        }
    }
}

impl ListingFilters for JobFilters {
    fn from_raw(raw: &RawQuery) -> Self {
        Self {
            keyword: raw.text("keyword"),
            location: raw.text("location"),
            tags: raw.list("tags"),
            employment_type: raw.first("employmentType").and_then(EmploymentType::parse),
            is_remote: raw.boolean("isRemote"),
            status: raw
                .first("status")
                .and_then(JobStatus::parse)
                .unwrap_or_default(),
            approved: raw.boolean("approved").unwrap_or(true),
        }
    }

    fn key_value(&self, field: &str) -> Option<String> {
        match field {
            "keyword" => self.keyword.clone(),
            "location" => self.location.clone(),
            "tags" => key_list(&self.tags),
            "employmentType" => self.employment_type.map(|t| t.as_str().to_string()),
            "isRemote" => self.is_remote.map(|r| r.to_string()),
            "status" => Some(self.status.as_str().to_string()),
            "approved" => Some(self.approved.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobSort {
    #[default]
    NewestFirst,
    OldestFirst,
    SalaryHighToLow,
    SalaryLowToHigh,
    DeadlineSoonest,
}

impl SortToken for JobSort {
    const ALL: &'static [Self] = &[
        JobSort::NewestFirst,
        JobSort::OldestFirst,
        JobSort::SalaryHighToLow,
        JobSort::SalaryLowToHigh,
        JobSort::DeadlineSoonest,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            JobSort::NewestFirst => "newest_first",
            JobSort::OldestFirst => "oldest_first",
            JobSort::SalaryHighToLow => "salary_high_to_low",
            JobSort::SalaryLowToHigh => "salary_low_to_high",
            JobSort::DeadlineSoonest => "deadline_soonest",
        }
    }

    fn spec(&self) -> SortSpec {
        match self {
            JobSort::NewestFirst => SortSpec::new("createdAt", SortOrder::Desc),
            JobSort::OldestFirst => SortSpec::new("createdAt", SortOrder::Asc),
            JobSort::SalaryHighToLow => SortSpec::new("salaryMax", SortOrder::Desc),
            JobSort::SalaryLowToHigh => SortSpec::new("salaryMin", SortOrder::Asc),
            JobSort::DeadlineSoonest => SortSpec::new("deadline", SortOrder::Asc),
        }
    }
}

/// Job board listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobListing;

impl Listing for JobListing {
    const TAG: &'static str = "jobs";
    const KEY_VERSION: u32 = 1;
    const KEY_FIELDS: &'static [&'static str] = &[
        "keyword",
        "location",
        "tags",
        "employmentType",
        "isRemote",
        "status",
        "approved",
    ];
    const DEFAULT_LIMIT: u32 = 20;
    const MAX_LIMIT: u32 = 100;

    type Item = Job;
    type Filters = JobFilters;
    type Sort = JobSort;

    fn build_predicate(filters: &JobFilters) -> Predicate {
        let mut terms = vec![
            Predicate::eq("status", filters.status.as_str()),
            Predicate::eq("isApproved", filters.approved),
        ];
        if let Some(keyword) = &filters.keyword {
            terms.push(Predicate::contains_text_any(
                &["title", "company", "description"],
                keyword,
            ));
        }
        if let Some(location) = &filters.location {
            terms.push(Predicate::contains_text("location", location));
        }
        terms.push(Predicate::contains_all("tags", &filters.tags));
        if let Some(employment_type) = filters.employment_type {
            terms.push(Predicate::eq("employmentType", employment_type.as_str()));
        }
        if let Some(is_remote) = filters.is_remote {
            terms.push(Predicate::eq("isRemote", is_remote));
        }
        Predicate::and(terms)
    }
}
