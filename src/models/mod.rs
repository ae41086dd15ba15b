// Domain entities and request payloads

pub mod exercise;
pub mod modifier;
pub mod session;
pub mod user;
pub mod validation;
pub mod workout_plan;

pub use exercise::*;
pub use modifier::*;
pub use session::*;
pub use user::*;
pub use validation::*;
pub use workout_plan::*;
