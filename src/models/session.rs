use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    exercise::Exercise,
    modifier::Modifier,
    user::UserResponse,
    validation::validate_not_blank,
    workout_plan::{validate_ids, WorkoutPlanSummary},
};

/// Training session actually performed by a student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub student_id: i64,
    pub workout_plan_id: Option<i64>,
    pub session_date: NaiveDate,
    pub observations: Option<String>,
    pub executions: Vec<Execution>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: i64,
    pub exercise_id: i64,
    pub series_completed: i32,
    pub repetitions_completed: String,
    pub load_used: String,
    pub observations: Option<String>,
    pub modifier_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct ExecutionInput {
    #[validate(range(min = 1))]
    pub exercise_id: i64,
    #[validate(range(min = 1))]
    pub series_completed: i32,
    #[validate(custom(function = "validate_not_blank"))]
    pub repetitions_completed: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub load_used: String,
    pub observations: Option<String>,
    #[serde(default)]
    #[graphql(default)]
    #[validate(custom(function = "validate_ids"))]
    pub modifier_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateSessionRequest {
    #[validate(range(min = 1))]
    pub student_id: i64,
    #[validate(range(min = 1))]
    pub workout_plan_id: Option<i64>,
    pub session_date: NaiveDate,
    #[validate(length(max = 1000))]
    pub observations: Option<String>,
    #[validate(length(min = 1), nested)]
    pub executions: Vec<ExecutionInput>,
}

/// Partial session update; the student of a session never changes
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateSessionRequest {
    #[validate(range(min = 1))]
    pub workout_plan_id: Option<i64>,
    pub session_date: Option<NaiveDate>,
    #[validate(length(max = 1000))]
    pub observations: Option<String>,
    #[validate(length(min = 1), nested)]
    pub executions: Option<Vec<ExecutionInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilter {
    pub student_id: Option<i64>,
    pub workout_plan_id: Option<i64>,
    pub session_date: Option<NaiveDate>,
}

impl SessionFilter {
    pub fn matches(&self, session: &Session) -> bool {
        self.student_id.map_or(true, |id| session.student_id == id)
            && self
                .workout_plan_id
                .map_or(true, |id| session.workout_plan_id == Some(id))
            && self.session_date.map_or(true, |date| session.session_date == date)
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(name = "Session", rename_fields = "snake_case")]
pub struct SessionDetails {
    pub id: i64,
    pub student_id: i64,
    pub student: Option<UserResponse>,
    pub workout_plan_id: Option<i64>,
    pub workout_plan: Option<WorkoutPlanSummary>,
    pub session_date: NaiveDate,
    pub observations: Option<String>,
    pub executions: Vec<ExecutionDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(name = "Execution", rename_fields = "snake_case")]
pub struct ExecutionDetails {
    pub id: i64,
    pub exercise_id: i64,
    pub exercise: Option<Exercise>,
    pub series_completed: i32,
    pub repetitions_completed: String,
    pub load_used: String,
    pub observations: Option<String>,
    pub modifier_ids: Vec<i64>,
    pub modifiers: Vec<Modifier>,
}
