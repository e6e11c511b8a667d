pub mod error;
pub mod images;
pub mod tmdb;
pub mod traits;

pub use error::CatalogError;
pub use images::ImageUrlBuilder;
pub use tmdb::TmdbClient;
pub use traits::CatalogClient;
