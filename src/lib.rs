pub mod api;
pub mod auction;
pub mod bidding;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod session;
