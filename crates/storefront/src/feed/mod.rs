//! Paginated product feed with client-side filtering and sorting.
//!
//! Split into a pure state core ([`ProductFeed`]) and a thin async
//! driver ([`ProductFeed::load_more`]). The core issues numbered page
//! requests and only accepts the response matching the request it last
//! issued, so a response that was superseded by a filter change can
//! never overwrite newer state. Keeping the core synchronous makes the
//! ordering rules testable without a network.
//!
//! Search, category, and page size go upstream; tags and sort order are
//! applied client-side over the pages fetched so far.

pub mod debounce;

use viorra_core::{PageRequest, Product, ProductFilters, ProductPage, SortOption};

use crate::catalog::{CatalogError, ProductSource};

/// Lifecycle of the feed's upstream cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// First page in flight.
    Loading,
    /// A follow-up page in flight.
    LoadingMore,
    /// At least one page held, more available upstream.
    Ready,
    /// Every upstream page for the current filters has been fetched.
    Exhausted,
}

/// Accumulates catalog pages for one filter configuration.
#[derive(Debug, Default)]
pub struct ProductFeed {
    filters: ProductFilters,
    pages: Vec<ProductPage>,
    phase: FeedPhase,
    seq: u64,
    in_flight: Option<u64>,
}

impl ProductFeed {
    /// Create an idle feed with the given filters.
    #[must_use]
    pub fn new(filters: ProductFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> FeedPhase {
        self.phase
    }

    /// The active filter configuration.
    #[must_use]
    pub const fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    /// Upstream total for the current filters, once one page has landed.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.pages.last().map(|page| page.total)
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Issue the next page request, if one is due.
    ///
    /// Returns `None` while a request is in flight, once the feed is
    /// exhausted, or when there is nothing beyond the last fetched page.
    /// The returned sequence number must be echoed back to
    /// [`apply_page`](Self::apply_page) or
    /// [`fail_request`](Self::fail_request).
    pub fn next_request(&mut self) -> Option<(u64, PageRequest)> {
        if self.in_flight.is_some() {
            return None;
        }

        let (skip, next_phase) = match self.phase {
            FeedPhase::Idle => (0, FeedPhase::Loading),
            FeedPhase::Ready => {
                let skip = self.pages.last().and_then(ProductPage::next_skip)?;
                (skip, FeedPhase::LoadingMore)
            }
            FeedPhase::Loading | FeedPhase::LoadingMore | FeedPhase::Exhausted => return None,
        };

        self.seq += 1;
        self.in_flight = Some(self.seq);
        self.phase = next_phase;

        let search = self.filters.search.trim();
        Some((
            self.seq,
            PageRequest {
                limit: u64::from(self.filters.limit),
                skip,
                search: (!search.is_empty()).then(|| search.to_owned()),
                category: self.filters.category.clone(),
            },
        ))
    }

    /// Apply a fetched page.
    ///
    /// Returns `false` and discards the page when `seq` does not match
    /// the outstanding request, which happens when the filters changed
    /// while the fetch was in flight.
    pub fn apply_page(&mut self, seq: u64, page: ProductPage) -> bool {
        if self.in_flight != Some(seq) {
            return false;
        }
        self.in_flight = None;

        self.phase = if page.next_skip().is_some() {
            FeedPhase::Ready
        } else {
            FeedPhase::Exhausted
        };
        self.pages.push(page);
        true
    }

    /// Record that the outstanding request failed, restoring the last
    /// stable phase so the fetch can be retried.
    pub fn fail_request(&mut self, seq: u64) {
        if self.in_flight != Some(seq) {
            return;
        }
        self.in_flight = None;
        self.phase = match self.pages.last() {
            None => FeedPhase::Idle,
            Some(page) if page.next_skip().is_some() => FeedPhase::Ready,
            Some(_) => FeedPhase::Exhausted,
        };
    }

    /// Replace the filter configuration.
    ///
    /// A change to search, category, or page size invalidates the fetched
    /// pages and any in-flight request; tag and sort changes only affect
    /// the client-side view and keep the pages.
    pub fn set_filters(&mut self, filters: ProductFilters) {
        let resets = filters.search != self.filters.search
            || filters.category != self.filters.category
            || filters.limit != self.filters.limit;
        self.filters = filters;
        if resets {
            self.pages.clear();
            self.phase = FeedPhase::Idle;
            self.in_flight = None;
        }
    }

    /// Update the search query. Resets the cursor when it changes.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let mut filters = self.filters.clone();
        filters.search = search.into();
        self.set_filters(filters);
    }

    /// Update the category. Resets the cursor when it changes.
    pub fn set_category(&mut self, category: Option<String>) {
        let mut filters = self.filters.clone();
        filters.category = category;
        self.set_filters(filters);
    }

    /// Update the client-side tag filter. Fetched pages are kept.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        let mut filters = self.filters.clone();
        filters.tags = tags;
        self.set_filters(filters);
    }

    /// Update the client-side sort order. Fetched pages are kept.
    pub fn set_sort(&mut self, sort: SortOption) {
        let mut filters = self.filters.clone();
        filters.sort = sort;
        self.set_filters(filters);
    }

    // =========================================================================
    // Client-side view
    // =========================================================================

    /// The visible products: all fetched pages in fetch order, tag-filtered,
    /// then stably sorted by the active sort option.
    ///
    /// The tag filter only sees fetched pages, so the visible count can
    /// undershoot the page size even when more matches exist upstream.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .pages
            .iter()
            .flat_map(|page| page.products.iter())
            .filter(|product| matches_tags(product, &self.filters.tags))
            .cloned()
            .collect();
        sort_products(&mut products, self.filters.sort);
        products
    }

    // =========================================================================
    // Async driver
    // =========================================================================

    /// Fetch the next page from `source` and fold it into the feed.
    ///
    /// Returns `Ok(true)` when a page was applied and `Ok(false)` when
    /// there was nothing to fetch. Taking `&mut self` means a second
    /// fetch for the same cursor cannot start while one is running.
    ///
    /// # Errors
    ///
    /// Propagates the catalog error after restoring the previous phase,
    /// so a later call retries the same page.
    pub async fn load_more(&mut self, source: &impl ProductSource) -> Result<bool, CatalogError> {
        let Some((seq, request)) = self.next_request() else {
            return Ok(false);
        };
        match source.fetch_page(&request).await {
            Ok(page) => Ok(self.apply_page(seq, page)),
            Err(error) => {
                self.fail_request(seq);
                Err(error)
            }
        }
    }
}

/// Keep a product iff its tag set intersects the requested set.
///
/// An empty request set disables the filter; with a filter active,
/// untagged products drop out.
fn matches_tags(product: &Product, tags: &[String]) -> bool {
    if tags.is_empty() {
        return true;
    }
    product.tags.as_ref().is_some_and(|product_tags| {
        product_tags
            .iter()
            .any(|tag| tags.iter().any(|wanted| wanted == tag))
    })
}

/// Stable sort, so equal keys keep arrival order.
fn sort_products(products: &mut [Product], sort: SortOption) {
    match sort {
        SortOption::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOption::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::RatingAsc => {
            products.sort_by(|a, b| a.rating.rate.total_cmp(&b.rating.rate));
        }
        SortOption::RatingDesc => {
            products.sort_by(|a, b| b.rating.rate.total_cmp(&a.rating.rate));
        }
        SortOption::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
        SortOption::None => {}
    }
}
