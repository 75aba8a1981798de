//! Canonical list result and the server's pagination block.

use serde::{Deserialize, Serialize};

/// One page of entities plus the server-reported total across all pages.
///
/// `total_items` counts the whole (filtered) collection on the server and is
/// deliberately distinct from `items.len()`: dashboards computing shares must
/// divide by whichever denominator matches the numerator.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
        }
    }
}

/// Pagination block as the server reports it in `{data, pagination}` bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Number of pages needed for `total_items` at `page_size` rows per page,
/// never less than 1.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_items.div_ceil(u64::from(page_size));
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}
