//! List view state and the paging arithmetic behind it.

use dining_client::FetchedPage;
use dining_core::Entity;
use serde::Serialize;
use std::collections::BTreeMap;

/// Lifecycle of one list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPhase {
    /// Nothing requested yet, or the last request ended in a login redirect
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// Items reflect the latest response
    Loaded,
    /// The latest request failed; `last_error` says why
    Errored,
}

/// A filter applied locally after the response arrives, because the API
/// does not reliably apply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResidualFilter {
    /// Case-insensitive substring match over the entity's search fields
    Search {
        /// Filter key holding the needle
        key: String,
    },
    /// Exact match on the owning restaurant id
    ExactRestaurant {
        /// Filter key holding the restaurant id
        key: String,
    },
}

impl ResidualFilter {
    /// Search on the `search` key
    pub fn search() -> Self {
        ResidualFilter::Search {
            key: "search".to_string(),
        }
    }

    /// Restaurant match on the `restaurant` key
    pub fn restaurant() -> Self {
        ResidualFilter::ExactRestaurant {
            key: "restaurant".to_string(),
        }
    }

    /// Filter key this applies to
    pub fn key(&self) -> &str {
        match self {
            ResidualFilter::Search { key } | ResidualFilter::ExactRestaurant { key } => key,
        }
    }

    /// Whether `item` passes the filter for `value`.
    pub fn matches<E: Entity>(&self, item: &E, value: &str) -> bool {
        match self {
            ResidualFilter::Search { .. } => item.matches_search(value),
            ResidualFilter::ExactRestaurant { .. } => item.restaurant_id() == Some(value.trim()),
        }
    }
}

/// State of one list view. Mutated only by its controller.
#[derive(Debug, Clone)]
pub struct ListState<E> {
    /// 1-based current page
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Displayed total after client-side narrowing
    pub total_count: u64,
    /// Total the API reported, if any
    pub server_total: Option<u64>,
    /// Active filters by key
    pub filters: BTreeMap<String, String>,
    /// Rows of the current page
    pub items: Vec<E>,
    /// Request lifecycle
    pub phase: ListPhase,
    /// Message of the last failure while `Errored`
    pub last_error: Option<String>,
}

impl<E> ListState<E> {
    /// Empty state on page 1
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_count: 0,
            server_total: None,
            filters: BTreeMap::new(),
            items: Vec::new(),
            phase: ListPhase::Idle,
            last_error: None,
        }
    }

    /// Pages needed for `total_count`
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }
}

/// `ceil(total / page_size)`, zero for an empty list.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX)
}

/// 1-based `(first, last)` row numbers shown on `page`; `(0, 0)` when empty.
pub fn showing_range(page: u32, page_size: u32, total: u64) -> (u64, u64) {
    if total == 0 {
        return (0, 0);
    }
    let size = u64::from(page_size.max(1));
    let start = u64::from(page.max(1) - 1) * size + 1;
    let end = (u64::from(page.max(1)) * size).min(total);
    (start.min(end), end)
}

/// Outcome of fitting a response into the current page.
#[derive(Debug, Clone)]
pub struct Windowed<E> {
    /// Rows to display
    pub items: Vec<E>,
    /// Displayed total
    pub total_count: u64,
    /// Page the rows belong to
    pub page: u32,
    /// The requested page no longer exists and the server paginates, so
    /// page 1 has to be fetched again
    pub needs_refetch: bool,
}

/// Fit a fetched page into `page`.
///
/// 1. Residual filters whose key has a non-empty value narrow the items.
/// 2. If more than a page survives, the API ignored pagination and the
///    page is sliced locally.
/// 3. The total is the narrowed count when narrowing removed anything or
///    slicing happened, else the server total. A non-empty page counts at
///    least the rows up to and including it.
/// 4. A page past the end is clamped back to 1.
pub fn window<E: Entity>(
    fetched: FetchedPage<E>,
    page: u32,
    page_size: u32,
    filters: &BTreeMap<String, String>,
    residual: &[ResidualFilter],
) -> Windowed<E> {
    let page = page.max(1);
    let size = page_size.max(1) as usize;

    let active: Vec<(&ResidualFilter, &str)> = residual
        .iter()
        .filter_map(|f| {
            filters
                .get(f.key())
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| (f, v))
        })
        .collect();

    let fetched_len = fetched.items.len();
    let narrowed: Vec<E> = fetched
        .items
        .into_iter()
        .filter(|item| active.iter().all(|(f, v)| f.matches(item, v)))
        .collect();
    let removed_any = narrowed.len() < fetched_len;

    if narrowed.len() > size {
        let total = narrowed.len() as u64;
        let mut page = page;
        if page > total_pages(total, page_size).max(1) {
            page = 1;
        }
        let start = (page as usize - 1) * size;
        let items = narrowed.into_iter().skip(start).take(size).collect();
        return Windowed {
            items,
            total_count: total,
            page,
            needs_refetch: false,
        };
    }

    let total = if removed_any {
        narrowed.len() as u64
    } else {
        let through_page = if narrowed.is_empty() {
            0
        } else {
            u64::from(page - 1) * size as u64 + narrowed.len() as u64
        };
        fetched
            .server_total
            .map_or(through_page, |t| t.max(through_page))
    };

    if page > total_pages(total, page_size).max(1) {
        return Windowed {
            items: narrowed,
            total_count: total,
            page: 1,
            needs_refetch: true,
        };
    }

    Windowed {
        items: narrowed,
        total_count: total,
        page,
        needs_refetch: false,
    }
}

/// Read-only view of a list, with the values the pagination controls need.
#[derive(Debug, Clone)]
pub struct ListSnapshot<E> {
    /// 1-based current page
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Displayed total
    pub total_count: u64,
    /// Total the API reported
    pub server_total: Option<u64>,
    /// Active filters
    pub filters: BTreeMap<String, String>,
    /// Rows of the current page
    pub items: Vec<E>,
    /// Request lifecycle
    pub phase: ListPhase,
    /// Last failure message
    pub last_error: Option<String>,
    /// `ceil(total_count / page_size)`
    pub total_pages: u32,
    /// 1-based rows shown
    pub showing: (u64, u64),
}

impl<E: Clone> From<&ListState<E>> for ListSnapshot<E> {
    fn from(state: &ListState<E>) -> Self {
        Self {
            page: state.page,
            page_size: state.page_size,
            total_count: state.total_count,
            server_total: state.server_total,
            filters: state.filters.clone(),
            items: state.items.clone(),
            phase: state.phase,
            last_error: state.last_error.clone(),
            total_pages: state.total_pages(),
            showing: showing_range(state.page, state.page_size, state.total_count),
        }
    }
}

impl<E> ListSnapshot<E> {
    /// First and previous buttons are enabled
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Next and last buttons are enabled
    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.page < self.total_pages
    }

    /// Page count shown in "Page X of Y" (at least 1)
    pub fn display_pages(&self) -> u32 {
        self.total_pages.max(1)
    }
}
