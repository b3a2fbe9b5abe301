pub mod api;
pub mod record;
pub mod user;
