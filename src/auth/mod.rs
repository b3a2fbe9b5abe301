pub mod middleware;
pub mod policy;
pub mod token;
