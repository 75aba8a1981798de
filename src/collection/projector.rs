//! Derived view projection.
//!
//! Pure functions computing the visible slice of a canonical collection from
//! the view parameters: search filter, stable sort, page slice. No I/O, no
//! side effects — the same inputs always yield the same output.

use std::cmp::Ordering;

use crate::models::entity::CollectionItem;
use crate::models::params::{SortDirection, ViewParams};

/// Compute the visible items for one collection screen.
///
/// 1. When the search term is non-empty and the type declares
///    `SEARCH_FIELDS`, keep items where any of those fields contains the
///    term case-insensitively.
/// 2. When a sort key is set, stable-sort by that field: numeric when both
///    values parse as numbers, lexicographic otherwise; missing values sort
///    last. Ties keep their prior relative order.
/// 3. Slice to `[(page-1)*pageSize, page*pageSize)`.
pub fn project<T: CollectionItem>(items: &[T], params: &ViewParams) -> Vec<T> {
    let needle = params.search.trim().to_lowercase();
    let mut rows: Vec<T> = if needle.is_empty() || T::SEARCH_FIELDS.is_empty() {
        items.to_vec()
    } else {
        items
            .iter()
            .filter(|item| matches_search(*item, &needle))
            .cloned()
            .collect()
    };

    if let Some((key, direction)) = &params.sort {
        rows.sort_by(|a, b| match (a.field_text(key), b.field_text(key)) {
            (Some(x), Some(y)) => {
                let ordering = compare_values(&x, &y);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
            // Missing values land last regardless of direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    page_slice(rows, params.page, params.page_size)
}

fn matches_search<T: CollectionItem>(item: &T, needle: &str) -> bool {
    T::SEARCH_FIELDS.iter().any(|field| {
        item.field_text(field)
            .map(|text| text.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

/// Field comparison: numeric when both sides parse, lexicographic otherwise.
fn compare_values(x: &str, y: &str) -> Ordering {
    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(nx), Ok(ny)) => nx.partial_cmp(&ny).unwrap_or(Ordering::Equal),
        _ => x.cmp(y),
    }
}

fn page_slice<T>(rows: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
    let start = (page.max(1) as usize - 1).saturating_mul(page_size as usize);
    if start >= rows.len() {
        return Vec::new();
    }
    let end = start
        .saturating_add(page_size.max(1) as usize)
        .min(rows.len());
    rows.into_iter().skip(start).take(end - start).collect()
}
