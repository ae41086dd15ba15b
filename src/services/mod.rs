// Business logic services

pub mod exercise_service;
pub mod modifier_service;
pub mod session_service;
pub mod user_service;
pub mod workout_plan_service;

pub use exercise_service::ExerciseService;
pub use modifier_service::ModifierService;
pub use session_service::SessionService;
pub use user_service::{NewProfile, UserService};
pub use workout_plan_service::WorkoutPlanService;

use crate::store::SharedDatabase;

/// One handle per service, all over the same store
#[derive(Debug, Clone)]
pub struct Services {
    pub users: UserService,
    pub exercises: ExerciseService,
    pub modifiers: ModifierService,
    pub workout_plans: WorkoutPlanService,
    pub sessions: SessionService,
}

impl Services {
    pub fn new(db: SharedDatabase, bcrypt_cost: u32) -> Self {
        Self {
            users: UserService::new(db.clone(), bcrypt_cost),
            exercises: ExerciseService::new(db.clone()),
            modifiers: ModifierService::new(db.clone()),
            workout_plans: WorkoutPlanService::new(db.clone()),
            sessions: SessionService::new(db),
        }
    }
}
