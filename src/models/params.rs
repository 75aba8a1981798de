//! View parameters: the user-controlled knobs driving what is fetched and
//! displayed, plus their wire-shaped counterpart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default rows per page across all console tables.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort order for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Current view parameters for one collection screen.
///
/// `page` is 1-based. An empty `search` is equivalent to no search.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParams {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub sort: Option<(String, SortDirection)>,
    pub filters: BTreeMap<String, String>,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort: None,
            filters: BTreeMap::new(),
        }
    }
}

impl ViewParams {
    /// Merge a partial update, returning `true` when anything query-relevant
    /// changed and a refetch is needed.
    ///
    /// Any change to search, sort, or filters rewinds to the first page;
    /// pure page / pageSize navigation does not.
    pub fn merge(&mut self, patch: ViewParamsPatch) -> bool {
        let mut changed = false;
        let mut rewind = false;

        if let Some(search) = patch.search {
            if search != self.search {
                self.search = search;
                changed = true;
                rewind = true;
            }
        }
        if let Some(sort) = patch.sort {
            if sort != self.sort {
                self.sort = sort;
                changed = true;
                rewind = true;
            }
        }
        if let Some(filters) = patch.filters {
            if filters != self.filters {
                self.filters = filters;
                changed = true;
                rewind = true;
            }
        }
        if let Some(page_size) = patch.page_size {
            let page_size = page_size.max(1);
            if page_size != self.page_size {
                self.page_size = page_size;
                changed = true;
            }
        }
        if let Some(page) = patch.page {
            let page = page.max(1);
            if page != self.page {
                self.page = page;
                changed = true;
            }
        }
        if rewind {
            self.page = 1;
        }
        changed
    }

    /// Sort-header click semantics: same key toggles asc→desc→asc, a new key
    /// starts ascending. Always rewinds to the first page.
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some((current, direction)) if current == key => Some((current, direction.toggled())),
            _ => Some((key.to_string(), SortDirection::Ascending)),
        };
        self.page = 1;
    }

    /// Copy with the page rewound to 1; used when the canonical collection is
    /// already a single server page and local slicing must not re-page it.
    pub fn first_page(&self) -> Self {
        let mut params = self.clone();
        params.page = 1;
        params
    }
}

/// Partial update of [`ViewParams`]. `sort: Some(None)` clears the sort.
#[derive(Debug, Clone, Default)]
pub struct ViewParamsPatch {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<Option<(String, SortDirection)>>,
    pub filters: Option<BTreeMap<String, String>>,
}

impl ViewParamsPatch {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(Some((key.into(), direction)));
        self
    }

    pub fn clear_sort(mut self) -> Self {
        self.sort = Some(None);
        self
    }

    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut filters = self.filters.unwrap_or_default();
        filters.insert(name.into(), value.into());
        self.filters = Some(filters);
        self
    }
}

/// Wire shape of a list request:
/// `?page=&pageSize=&search=&sortBy=&sortOrder=&<filters>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDirection>,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// Map view parameters to the wire shape. `effective_page` is the
    /// pagination-clamped page the state machine decided to request.
    pub fn from_params(params: &ViewParams, effective_page: u32) -> Self {
        let search = params.search.trim();
        Self {
            page: effective_page.max(1),
            page_size: params.page_size.max(1),
            search: (!search.is_empty()).then(|| search.to_string()),
            sort_by: params.sort.as_ref().map(|(key, _)| key.clone()),
            sort_order: params.sort.as_ref().map(|(_, direction)| *direction),
            filters: params.filters.clone(),
        }
    }

    /// Query-string pairs in the order the server documents them.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.clone()));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sortOrder".to_string(), sort_order.as_str().to_string()));
        }
        for (name, value) in &self.filters {
            pairs.push((name.clone(), value.clone()));
        }
        pairs
    }
}
