// In-memory database shared by every service

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{
    Exercise, ExecutionDetails, InstructorProfile, Modifier, Role, Session, SessionDetails,
    StudentProfile, User, UserResponse, WorkoutPlan, WorkoutPlanDetails, WorkoutPlanItemDetails,
    WorkoutPlanSummary,
};

pub type SharedDatabase = Arc<RwLock<Database>>;

/// Top-level collections that own their own id sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Exercises,
    Modifiers,
    WorkoutPlans,
    WorkoutPlanItems,
    Sessions,
    Executions,
}

/// Records that still point at a user
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UserReferences {
    pub workout_plans: usize,
    pub sessions: usize,
    pub students: usize,
}

impl UserReferences {
    pub fn is_empty(&self) -> bool {
        self.workout_plans == 0 && self.sessions == 0 && self.students == 0
    }
}

#[derive(Debug, Default)]
pub struct Database {
    pub users: Vec<User>,
    pub student_profiles: Vec<StudentProfile>,
    pub instructor_profiles: Vec<InstructorProfile>,
    pub exercises: Vec<Exercise>,
    pub modifiers: Vec<Modifier>,
    pub workout_plans: Vec<WorkoutPlan>,
    pub sessions: Vec<Session>,
}

impl Database {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedDatabase {
        Arc::new(RwLock::new(self))
    }

    /// Max existing id + 1, or 1 for an empty collection
    pub fn next_id(&self, collection: Collection) -> i64 {
        let max = match collection {
            Collection::Users => self.users.iter().map(|u| u.id).max(),
            Collection::Exercises => self.exercises.iter().map(|e| e.id).max(),
            Collection::Modifiers => self.modifiers.iter().map(|m| m.id).max(),
            Collection::WorkoutPlans => self.workout_plans.iter().map(|p| p.id).max(),
            Collection::WorkoutPlanItems => self
                .workout_plans
                .iter()
                .flat_map(|p| p.items.iter().map(|i| i.id))
                .max(),
            Collection::Sessions => self.sessions.iter().map(|s| s.id).max(),
            Collection::Executions => self
                .sessions
                .iter()
                .flat_map(|s| s.executions.iter().map(|e| e.id))
                .max(),
        };
        max.unwrap_or(0) + 1
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: i64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Login lookup: email first, then document
    pub fn user_by_login(&self, document_or_email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email == document_or_email)
            .or_else(|| self.users.iter().find(|u| u.document == document_or_email))
    }

    pub fn student_profile(&self, user_id: i64) -> Option<&StudentProfile> {
        self.student_profiles.iter().find(|p| p.user_id == user_id)
    }

    pub fn student_profile_mut(&mut self, user_id: i64) -> Option<&mut StudentProfile> {
        self.student_profiles.iter_mut().find(|p| p.user_id == user_id)
    }

    pub fn instructor_profile(&self, user_id: i64) -> Option<&InstructorProfile> {
        self.instructor_profiles.iter().find(|p| p.user_id == user_id)
    }

    pub fn instructor_profile_mut(&mut self, user_id: i64) -> Option<&mut InstructorProfile> {
        self.instructor_profiles.iter_mut().find(|p| p.user_id == user_id)
    }

    pub fn exercise(&self, id: i64) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn modifier(&self, id: i64) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.id == id)
    }

    pub fn workout_plan(&self, id: i64) -> Option<&WorkoutPlan> {
        self.workout_plans.iter().find(|p| p.id == id)
    }

    pub fn session(&self, id: i64) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// User with the given role, if any
    pub fn user_with_role(&self, id: i64, role: Role) -> Option<&User> {
        self.user(id).filter(|u| u.role == role)
    }

    /// True when the student's profile names this instructor
    pub fn is_instructor_of(&self, instructor_id: i64, student_id: i64) -> bool {
        self.student_profile(student_id)
            .and_then(|p| p.instructor_id)
            .is_some_and(|id| id == instructor_id)
    }

    /// Ids of the students assigned to an instructor
    pub fn students_of(&self, instructor_id: i64) -> Vec<i64> {
        self.student_profiles
            .iter()
            .filter(|p| p.instructor_id == Some(instructor_id))
            .map(|p| p.user_id)
            .collect()
    }

    pub fn document_taken(&self, document: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.document == document && Some(u.id) != except)
    }

    pub fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    pub fn cref_taken(&self, cref: &str, except: Option<i64>) -> bool {
        self.instructor_profiles
            .iter()
            .any(|p| p.cref == cref && Some(p.user_id) != except)
    }

    pub fn exercise_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        let name = name.to_lowercase();
        self.exercises
            .iter()
            .any(|e| e.name.to_lowercase() == name && Some(e.id) != except)
    }

    pub fn modifier_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        let name = name.to_lowercase();
        self.modifiers
            .iter()
            .any(|m| m.name.to_lowercase() == name && Some(m.id) != except)
    }

    /// Plan items plus session executions using the exercise
    pub fn exercise_references(&self, exercise_id: i64) -> usize {
        let items = self
            .workout_plans
            .iter()
            .flat_map(|p| &p.items)
            .filter(|i| i.exercise_id == exercise_id)
            .count();
        let executions = self
            .sessions
            .iter()
            .flat_map(|s| &s.executions)
            .filter(|e| e.exercise_id == exercise_id)
            .count();
        items + executions
    }

    pub fn modifier_references(&self, modifier_id: i64) -> usize {
        let items = self
            .workout_plans
            .iter()
            .flat_map(|p| &p.items)
            .filter(|i| i.modifier_ids.contains(&modifier_id))
            .count();
        let executions = self
            .sessions
            .iter()
            .flat_map(|s| &s.executions)
            .filter(|e| e.modifier_ids.contains(&modifier_id))
            .count();
        items + executions
    }

    pub fn user_references(&self, user_id: i64) -> UserReferences {
        UserReferences {
            workout_plans: self
                .workout_plans
                .iter()
                .filter(|p| p.student_id == user_id || p.instructor_id == user_id)
                .count(),
            sessions: self
                .sessions
                .iter()
                .filter(|s| s.student_id == user_id)
                .count(),
            students: self
                .student_profiles
                .iter()
                .filter(|p| p.instructor_id == Some(user_id))
                .count(),
        }
    }

    pub fn workout_plan_references(&self, plan_id: i64) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.workout_plan_id == Some(plan_id))
            .count()
    }

    pub fn ensure_exercise(&self, exercise_id: i64) -> Result<(), AppError> {
        if self.exercise(exercise_id).is_none() {
            return Err(AppError::BadRequest(format!(
                "Exercise with ID {} not found.",
                exercise_id
            )));
        }
        Ok(())
    }

    pub fn ensure_modifiers(&self, modifier_ids: &[i64]) -> Result<(), AppError> {
        if let Some(missing) = modifier_ids.iter().find(|id| self.modifier(**id).is_none()) {
            return Err(AppError::BadRequest(format!(
                "Modifier with ID {} not found.",
                missing
            )));
        }
        Ok(())
    }

    pub fn user_response(&self, user: &User) -> UserResponse {
        let student_profile = match user.role {
            Role::Student => self.student_profile(user.id).cloned(),
            _ => None,
        };
        let instructor_profile = match user.role {
            Role::Instructor => self.instructor_profile(user.id).cloned(),
            _ => None,
        };
        UserResponse::new(user, student_profile, instructor_profile)
    }

    pub fn user_response_by_id(&self, id: i64) -> Option<UserResponse> {
        self.user(id).map(|u| self.user_response(u))
    }

    fn modifiers_for(&self, ids: &[i64]) -> Vec<Modifier> {
        ids.iter().filter_map(|id| self.modifier(*id).cloned()).collect()
    }

    pub fn workout_plan_details(&self, plan: &WorkoutPlan) -> WorkoutPlanDetails {
        let items = plan
            .items
            .iter()
            .map(|item| WorkoutPlanItemDetails {
                id: item.id,
                exercise_id: item.exercise_id,
                exercise: self.exercise(item.exercise_id).cloned(),
                series_count: item.series_count,
                repetitions_expected: item.repetitions_expected.clone(),
                load_suggested: item.load_suggested.clone(),
                observations: item.observations.clone(),
                order_index: item.order_index,
                modifier_ids: item.modifier_ids.clone(),
                modifiers: self.modifiers_for(&item.modifier_ids),
            })
            .collect();

        WorkoutPlanDetails {
            id: plan.id,
            name: plan.name.clone(),
            description: plan.description.clone(),
            instructor_id: plan.instructor_id,
            instructor: self.user_response_by_id(plan.instructor_id),
            student_id: plan.student_id,
            student: self.user_response_by_id(plan.student_id),
            start_date: plan.start_date,
            end_date: plan.end_date,
            items,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }

    pub fn session_details(&self, session: &Session) -> SessionDetails {
        let workout_plan = session
            .workout_plan_id
            .and_then(|id| self.workout_plan(id))
            .map(|plan| WorkoutPlanSummary {
                id: plan.id,
                name: plan.name.clone(),
                start_date: plan.start_date,
                end_date: plan.end_date,
                instructor: self.user_response_by_id(plan.instructor_id),
            });

        let executions = session
            .executions
            .iter()
            .map(|execution| ExecutionDetails {
                id: execution.id,
                exercise_id: execution.exercise_id,
                exercise: self.exercise(execution.exercise_id).cloned(),
                series_completed: execution.series_completed,
                repetitions_completed: execution.repetitions_completed.clone(),
                load_used: execution.load_used.clone(),
                observations: execution.observations.clone(),
                modifier_ids: execution.modifier_ids.clone(),
                modifiers: self.modifiers_for(&execution.modifier_ids),
            })
            .collect();

        SessionDetails {
            id: session.id,
            student_id: session.student_id,
            student: self.user_response_by_id(session.student_id),
            workout_plan_id: session.workout_plan_id,
            workout_plan,
            session_date: session.session_date,
            observations: session.observations.clone(),
            executions,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
