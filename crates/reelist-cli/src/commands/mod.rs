pub mod config;
pub mod context;
pub mod home;
pub mod render;
pub mod search;
pub mod show;
pub mod spinner;
pub mod watchlist;
