//! Product filter state.
//!
//! Held by the consumer (the UI layer) and handed to the product feed;
//! the feed decides which parts go upstream (search, category, limit)
//! and which apply client-side (tags, sort).

use serde::{Deserialize, Serialize};

/// Default page size for catalog fetches.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Sort order applied client-side over fetched pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Lowest rated first.
    RatingAsc,
    /// Highest rated first.
    RatingDesc,
    /// Descending id, a proxy for recency in the upstream catalog.
    Newest,
    /// Preserve arrival order.
    #[default]
    None,
}

/// Filter state for a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Full-text search query, sent upstream after debouncing.
    pub search: String,
    /// Upstream category slug; `None` lists the whole catalog.
    pub category: Option<String>,
    /// Tag set for the client-side post-filter; empty means no filtering.
    pub tags: Vec<String>,
    /// Page size for upstream fetches.
    pub limit: u32,
    /// Client-side sort order.
    pub sort: SortOption,
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            tags: Vec::new(),
            limit: DEFAULT_PAGE_LIMIT,
            sort: SortOption::None,
        }
    }
}

impl ProductFilters {
    /// Number of active filters, for the UI's "n filters applied" badge.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        let mut count = 0;
        if !self.search.trim().is_empty() {
            count += 1;
        }
        if self.category.is_some() {
            count += 1;
        }
        if !self.tags.is_empty() {
            count += 1;
        }
        if self.sort != SortOption::None {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters() {
        let filters = ProductFilters::default();
        assert_eq!(filters.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(filters.sort, SortOption::None);
        assert_eq!(filters.applied_count(), 0);
    }

    #[test]
    fn test_applied_count() {
        let filters = ProductFilters {
            search: "serum".to_owned(),
            category: Some("beauty".to_owned()),
            tags: vec!["beauty".to_owned()],
            limit: DEFAULT_PAGE_LIMIT,
            sort: SortOption::PriceAsc,
        };
        assert_eq!(filters.applied_count(), 4);

        let whitespace_search = ProductFilters {
            search: "   ".to_owned(),
            ..ProductFilters::default()
        };
        assert_eq!(whitespace_search.applied_count(), 0);
    }

    #[test]
    fn test_sort_option_serde_names() {
        let json = serde_json::to_string(&SortOption::PriceDesc).expect("serialize");
        assert_eq!(json, "\"price_desc\"");
        let json = serde_json::to_string(&SortOption::None).expect("serialize");
        assert_eq!(json, "\"none\"");
    }
}
