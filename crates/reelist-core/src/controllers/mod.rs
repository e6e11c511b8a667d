//! Per-screen state holders. None of them own durable state: the catalog and
//! the [`WatchlistStore`](crate::WatchlistStore) are the sources of truth, and
//! every controller re-derives its view from them.

pub mod detail;
pub mod home;
pub mod search;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod fake;

pub use detail::{DetailController, DetailError, DetailState};
pub use home::HomeController;
pub use search::{SearchController, SearchState};
pub use watchlist::WatchlistController;

use reelist_catalog::CatalogError;
use reelist_models::CatalogRecord;

/// A catalog-backed list as a screen shows it.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(Vec<CatalogRecord>),
    /// The catalog could not be reached; carries a displayable reason.
    Unavailable(String),
}

impl ListState {
    pub fn from_result(result: Result<Vec<CatalogRecord>, CatalogError>) -> Self {
        match result {
            Ok(records) => ListState::Loaded(records),
            Err(e) => ListState::Unavailable(e.to_string()),
        }
    }

    pub fn records(&self) -> &[CatalogRecord] {
        match self {
            ListState::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ListState::Unavailable(_))
    }
}
