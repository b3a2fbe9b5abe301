pub mod core;
pub mod models;
pub mod stores;
pub mod wal;
pub mod aggregator;
pub mod auth;
pub mod accounts;
pub mod importer;
pub mod utils;
pub mod handlers;
