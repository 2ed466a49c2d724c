//! Listing query resolution types: search filter, sort strategy, pagination
//! window.

use toplist_ranks::Rank;

/// Pagination window over a sorted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Records per page.
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    /// Non-positive values fall back to the defaults (page 1, limit 10).
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            limit: limit.filter(|l| *l > 0).unwrap_or(10),
        }
    }

    /// Lenient construction from raw query-string values: non-numeric or
    /// missing input defaults rather than erroring.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            page.and_then(|p| p.trim().parse().ok()),
            limit.and_then(|l| l.trim().parse().ok()),
        )
    }

    pub fn skip(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    pub fn take(&self) -> usize {
        self.limit as usize
    }
}

/// Mutually exclusive sort strategies for rank listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankSort {
    /// `created_at` descending (newest first).
    #[default]
    Newest,
    /// Upvote-set size descending. Ties fall back to store-native order,
    /// which is unspecified for a generic backend.
    Upvotes,
}

impl RankSort {
    /// `sortBy=upvotes` selects popularity; anything else means recency.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("upvotes") => Self::Upvotes,
            _ => Self::Newest,
        }
    }
}

/// Text filter over rank listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankFilter {
    /// Case-insensitive substring matched against title or description.
    pub search: Option<String>,
}

impl RankFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    pub fn matches(&self, rank: &Rank) -> bool {
        match &self.search {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                rank.title.to_lowercase().contains(&needle)
                    || rank.description.to_lowercase().contains(&needle)
            }
        }
    }
}

/// A fully resolved listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankQuery {
    pub filter: RankFilter,
    pub sort: RankSort,
    pub page: Pagination,
}
