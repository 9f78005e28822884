//! Pagination for taxon search endpoints
//!
//! Provides the per-call page parameters plus the aggregation loop that
//! walks a paginated search to exhaustion.

use std::future::Future;

use log::{debug, warn};

use crate::error::Result;

/// Maximum page size supported by the Speshits API.
/// Aggregation uses this to minimize round-trips.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Default page size for single-page searches.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound on page fetches during aggregation. A server that never
/// satisfies the stop rule would otherwise iterate without bound.
pub const MAX_PAGE_FETCHES: u32 = 1000;

/// Page parameters for a single search request. Pages are 1-based.
///
/// # Example
/// ```ignore
/// let page = PageRequest::new().page(2).page_size(100);
/// ```
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: u32,
    /// Items per page
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Create page parameters with defaults (page 1, 50 items).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number (1-based).
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size (items per page).
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Convert to query string parameters using the service's names.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

/// One page of results plus the server-reported total across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in this page
    pub items: Vec<T>,
    /// Total item count the server reports for the whole result set
    pub total: u64,
}

/// When aggregation decides the last page has been reached.
///
/// The service the client was written against shipped with a termination
/// rule that stops as soon as one page returns fewer items than the
/// reported total, which ends single-request result sets only after a
/// second, empty fetch. `TotalCollected` is the corrected reading and the
/// default; the shipped rule survives as `PageShortOfTotal` for callers
/// that need bug-for-bug compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopRule {
    /// Stop once the accumulated item count reaches the reported total,
    /// or a page comes back empty.
    #[default]
    TotalCollected,
    /// Stop once a single page returns fewer items than the reported total.
    PageShortOfTotal,
}

/// Fetch pages starting at 1 and append their items until the stop rule
/// fires or `MAX_PAGE_FETCHES` is reached.
///
/// Fetches are sequential: each page's item count feeds the stop decision
/// for the next. Errors from `fetch_page` abort aggregation and any
/// partially collected items are discarded.
pub async fn collect_all_pages<T, F, Fut>(stop_rule: StopRule, fetch_page: F) -> Result<Vec<T>>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all_items = Vec::new();
    let mut page = 1u32;

    loop {
        let fetched = fetch_page(page).await?;
        let count = fetched.items.len();
        let total = fetched.total;
        all_items.extend(fetched.items);
        debug!(
            "page {} returned {} items ({}/{} collected)",
            page,
            count,
            all_items.len(),
            total
        );

        let done = match stop_rule {
            StopRule::TotalCollected => count == 0 || all_items.len() as u64 >= total,
            StopRule::PageShortOfTotal => (count as u64) < total,
        };
        if done {
            break;
        }
        if page >= MAX_PAGE_FETCHES {
            warn!(
                "page cap reached after {} fetches; returning {} of {} reported items",
                page,
                all_items.len(),
                total
            );
            break;
        }
        page += 1;
    }

    Ok(all_items)
}
