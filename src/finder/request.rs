//! Normalized list requests.

use std::fmt;

use super::{sort, Listing, ListingFilters, RawQuery, SortOrder, SortSpec, SortToken};

/// A list request after defaulting and clamping. Built once per call.
pub struct ListRequest<L: Listing> {
    pub page: u32,
    pub limit: u32,
    pub sort: L::Sort,
    pub order: SortOrder,
    pub filters: L::Filters,
}

impl<L: Listing> ListRequest<L> {
    /// Coerces a raw bag. Bad values fall back to defaults, never errors:
    /// page defaults to 1, limit to the listing default clamped to its
    /// maximum, sort to newest-first, order to the sort's natural direction.
    pub fn normalize(raw: &RawQuery) -> Self {
        let page = raw.positive_int("page").unwrap_or(1);
        let limit = raw
            .positive_int("limit")
            .unwrap_or(L::DEFAULT_LIMIT)
            .clamp(1, L::MAX_LIMIT.max(1));
        let sort: L::Sort = sort::resolve(raw.first("sort"));
        let order = raw
            .first("order")
            .and_then(SortOrder::parse)
            .unwrap_or_else(|| sort.spec().direction);

        Self {
            page,
            limit,
            sort,
            order,
            filters: L::Filters::from_raw(raw),
        }
    }

    /// Sort specification with the request's direction applied.
    pub fn sort_spec(&self) -> SortSpec {
        self.sort.spec().with_direction(self.order)
    }

    /// Number of documents skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl<L: Listing> Clone for ListRequest<L> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            limit: self.limit,
            sort: self.sort,
            order: self.order,
            filters: self.filters.clone(),
        }
    }
}

impl<L: Listing> PartialEq for ListRequest<L> {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page
            && self.limit == other.limit
            && self.sort == other.sort
            && self.order == other.order
            && self.filters == other.filters
    }
}

impl<L: Listing> fmt::Debug for ListRequest<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListRequest")
            .field("entity", &L::TAG)
            .field("page", &self.page)
            .field("limit", &self.limit)
            .field("sort", &self.sort.as_str())
            .field("order", &self.order)
            .field("filters", &self.filters)
            .finish()
    }
}
