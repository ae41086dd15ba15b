// API routes and handlers

pub mod auth;
pub mod exercises;
pub mod health;
pub mod modifiers;
pub mod response;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod users;
pub mod workout_plans;

pub use response::ApiResponse;
pub use routes::create_routes;
pub use state::AppState;
