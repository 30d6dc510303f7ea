pub mod filters;
pub mod handlers;
