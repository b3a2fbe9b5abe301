pub mod record_store;
pub mod user_store;
