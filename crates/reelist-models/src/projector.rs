use crate::catalog::CatalogRecord;
use crate::watchlist::WatchlistEntry;

/// Reduce a catalog record to the fields the watchlist persists.
///
/// Pure: the returned entry owns copies of every field and shares nothing with `record`.
pub fn project(record: &CatalogRecord) -> WatchlistEntry {
    WatchlistEntry {
        id: record.id,
        title: record.title.clone(),
        poster_path: record.poster_path.clone(),
        vote_average: record.vote_average,
        release_date: record.release_date,
    }
}

impl From<&CatalogRecord> for WatchlistEntry {
    fn from(record: &CatalogRecord) -> Self {
        project(record)
    }
}
