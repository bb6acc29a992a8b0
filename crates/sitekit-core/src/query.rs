// ── Resource query builder ──
//
// Turns a `CollectionQuery` into ordered wire parameters. UI "no filter"
// placeholders are collapsed to `None` by `collapse_sentinel` before they
// reach a `FilterKey`; nothing below this module branches on them.

use sitekit_api::QueryParams;

use crate::model::ResourceKind;

/// Collapse a UI selection into an optional filter value.
///
/// Empty (or whitespace-only) input and the collection's sentinel both
/// mean "no filter".
pub fn collapse_sentinel(selection: &str, sentinel: &str) -> Option<String> {
    let trimmed = selection.trim();
    if trimmed.is_empty() || trimmed == sentinel {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

// ── Filter identity ──────────────────────────────────────────────────

/// The search/filter part of a query.
///
/// Two views showing the same `FilterKey` show the same subset; a change
/// of key is what resets pagination. Page number is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterKey {
    search: Option<String>,
    status: Option<String>,
    category: Option<String>,
}

impl FilterKey {
    /// Build from raw UI selections, collapsing the kind's sentinels.
    pub fn from_selection(kind: &ResourceKind, search: &str, status: &str, category: &str) -> Self {
        Self {
            search: normalize(Some(search.to_owned())),
            status: kind.status_filter(status),
            category: kind.category_filter(category),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = normalize(Some(search.into()));
        self
    }

    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = normalize(status);
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = normalize(category);
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

// ── Query ────────────────────────────────────────────────────────────

/// Which subset of a collection is being viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    page: u32,
    page_size: u32,
    filters: FilterKey,
}

impl CollectionQuery {
    /// Page 1 of the unfiltered collection.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            filters: FilterKey::default(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_filters(mut self, filters: FilterKey) -> Self {
        self.filters = filters;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> &FilterKey {
        &self.filters
    }
}

// ── Wire form ────────────────────────────────────────────────────────

/// Ordered query parameters: page, limit, search, status, category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireQuery(Vec<(&'static str, String)>);

impl WireQuery {
    pub fn params(&self) -> &QueryParams {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// URL-encoded form, e.g. `page=1&limit=10&search=react`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

/// Build the wire parameters for a list request. Pure.
pub fn build_query(query: &CollectionQuery) -> WireQuery {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("limit", query.page_size.to_string()),
    ];
    let filters = &query.filters;
    if let Some(search) = filters.search() {
        params.push(("search", search.to_owned()));
    }
    if let Some(status) = filters.status() {
        params.push(("status", status.to_owned()));
    }
    if let Some(category) = filters.category() {
        params.push(("category", category.to_owned()));
    }
    WireQuery(params)
}
