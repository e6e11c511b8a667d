use reelist_catalog::CatalogClient;
use reelist_models::{project, CatalogRecord, MovieId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use crate::error::StoreError;
use crate::store::WatchlistStore;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Box<CatalogRecord>),
    /// The catalog has no movie with this id.
    NotFound,
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("movie {0} has no details loaded; cannot change its watchlist membership")]
    DetailNotLoaded(MovieId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One movie's detail view plus its watchlist toggle.
pub struct DetailController {
    catalog: Arc<dyn CatalogClient>,
    store: WatchlistStore,
    movie_id: MovieId,
    state: DetailState,
    in_watchlist: bool,
}

impl DetailController {
    pub fn new(catalog: Arc<dyn CatalogClient>, store: WatchlistStore, movie_id: MovieId) -> Self {
        Self {
            catalog,
            store,
            movie_id,
            state: DetailState::Loading,
            in_watchlist: false,
        }
    }

    /// Fetch the detail record and the membership flag concurrently.
    ///
    /// A catalog failure leaves the screen unavailable (or not found, for an
    /// unknown id); a store read failure is
    /// logged and shows the movie as not in the watchlist.
    pub async fn open(&mut self) {
        self.state = DetailState::Loading;

        let (detail, membership) = futures::join!(
            self.catalog.fetch_detail(self.movie_id),
            self.store.contains(self.movie_id)
        );

        self.state = match detail {
            Ok(record) => DetailState::Loaded(Box::new(record)),
            Err(e) if e.is_not_found() => {
                debug!("Catalog has no movie {}", self.movie_id);
                DetailState::NotFound
            }
            Err(e) => {
                warn!("Details for movie {} unavailable: {}", self.movie_id, e);
                DetailState::Unavailable(e.to_string())
            }
        };

        self.in_watchlist = match membership {
            Ok(member) => member,
            Err(e) => {
                warn!("Could not check watchlist membership for {}: {}", self.movie_id, e);
                false
            }
        };
    }

    /// Add or remove the movie. On success the flag reflects the completed call;
    /// on failure it is left as it was.
    pub async fn toggle(&mut self) -> Result<bool, DetailError> {
        let record = match &self.state {
            DetailState::Loaded(record) => record,
            _ => return Err(DetailError::DetailNotLoaded(self.movie_id)),
        };

        if self.in_watchlist {
            self.store.remove(self.movie_id).await?;
            self.in_watchlist = false;
        } else {
            self.store.add(project(record)).await?;
            self.in_watchlist = true;
        }
        debug!("Movie {} watchlist membership is now {}", self.movie_id, self.in_watchlist);
        Ok(self.in_watchlist)
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn record(&self) -> Option<&CatalogRecord> {
        match &self.state {
            DetailState::Loaded(record) => Some(&**record),
            _ => None,
        }
    }

    pub fn in_watchlist(&self) -> bool {
        self.in_watchlist
    }
}
