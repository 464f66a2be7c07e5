pub mod bidding;
pub mod database;
pub mod error;
pub mod handlers;
pub mod moderation;
pub mod query;
pub mod scheduler;
pub mod store;
