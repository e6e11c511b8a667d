pub mod catalog;
pub mod display;
pub mod movie_id;
pub mod projector;
pub mod serde_helpers;
pub mod watchlist;

pub use catalog::{CastMember, CatalogRecord, Credits, CrewMember, Genre, Video};
pub use movie_id::MovieId;
pub use projector::project;
pub use watchlist::{WatchlistCollection, WatchlistEntry};
