//! Search module - parameters for the tracker's item search

/// Field search results are sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    /// Last-updated timestamp
    Updated,
}

impl SearchSort {
    /// Query-string spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Updated => "updated",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending
    Asc,

    /// Descending
    Desc,
}

impl SortOrder {
    /// Query-string spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A single search request against the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search expression (qualifiers joined by spaces)
    pub query: String,

    /// Sort field
    pub sort: SearchSort,

    /// Sort direction
    pub order: SortOrder,

    /// Maximum number of results
    pub per_page: u32,
}

impl SearchRequest {
    /// Most recently updated first, at most `per_page` results
    pub fn recently_updated(query: impl Into<String>, per_page: u32) -> Self {
        Self {
            query: query.into(),
            sort: SearchSort::Updated,
            order: SortOrder::Desc,
            per_page,
        }
    }
}
