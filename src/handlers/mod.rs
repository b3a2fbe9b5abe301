pub mod accounts;
pub mod fallback;
pub mod health;
pub mod stats;
