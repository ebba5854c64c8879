//! Pagination envelope returned alongside listed items.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// Navigation metadata for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based page number that was served.
    pub current_page: u32,
    /// Number of pages needed to show every matching item.
    pub total_pages: u64,
    /// Number of matching items before pagination.
    pub total_items: u64,
    /// Page size used for this response.
    pub items_per_page: u32,
}

impl PageInfo {
    /// Describe `request` against a total item count.
    ///
    /// An empty result yields zero pages.
    #[must_use]
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            current_page: request.page(),
            total_pages: total_items.div_ceil(u64::from(request.limit())),
            total_items,
            items_per_page: request.limit(),
        }
    }
}

/// A page of items with its navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Navigation metadata.
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    /// Pair items with their envelope.
    #[must_use]
    pub const fn new(items: Vec<T>, pagination: PageInfo) -> Self {
        Self { items, pagination }
    }

    /// Transform every item while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
