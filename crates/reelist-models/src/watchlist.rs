use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::movie_id::MovieId;
use crate::serde_helpers::{null_as_empty, optional_date};

/// The locally persisted projection of a catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub id: MovieId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster_path: String,
    pub vote_average: f64,
    /// Absent stays absent; never defaulted.
    #[serde(default, with = "optional_date")]
    pub release_date: Option<NaiveDate>,
}

/// Ordered watchlist, unique by [`MovieId`], insertion order preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WatchlistCollection {
    entries: Vec<WatchlistEntry>,
}

impl WatchlistCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded sequence, keeping the first occurrence of each id.
    /// Returns the collection and the number of duplicates dropped.
    pub fn from_entries(entries: Vec<WatchlistEntry>) -> (Self, usize) {
        let total = entries.len();
        let mut collection = Self::new();
        for entry in entries {
            collection.insert(entry);
        }
        let dropped = total - collection.len();
        (collection, dropped)
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: MovieId) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Append unless the id is already present. Returns whether the collection changed.
    pub fn insert(&mut self, entry: WatchlistEntry) -> bool {
        if self.contains(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Drop the entry with this id. Returns whether the collection changed.
    pub fn remove(&mut self, id: MovieId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<MovieId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a WatchlistCollection {
    type Item = &'a WatchlistEntry;
    type IntoIter = std::slice::Iter<'a, WatchlistEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
