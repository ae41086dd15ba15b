pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod graphql;
pub mod models;
pub mod services;
pub mod store;

pub use errors::AppError;
