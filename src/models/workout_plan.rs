use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{exercise::Exercise, modifier::Modifier, user::UserResponse, validation::validate_not_blank};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: i64,
    pub student_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub items: Vec<WorkoutPlanItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanItem {
    pub id: i64,
    pub exercise_id: i64,
    pub series_count: i32,
    pub repetitions_expected: String,
    pub load_suggested: String,
    pub observations: Option<String>,
    pub order_index: i32,
    pub modifier_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct WorkoutPlanItemInput {
    #[validate(range(min = 1))]
    pub exercise_id: i64,
    #[validate(range(min = 1))]
    pub series_count: i32,
    #[validate(custom(function = "validate_not_blank"))]
    pub repetitions_expected: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub load_suggested: String,
    pub observations: Option<String>,
    #[validate(range(min = 1))]
    pub order_index: i32,
    #[serde(default)]
    #[graphql(default)]
    #[validate(custom(function = "validate_ids"))]
    pub modifier_ids: Vec<i64>,
}

pub(crate) fn validate_ids(ids: &[i64]) -> Result<(), ValidationError> {
    if ids.iter().any(|id| *id < 1) {
        return Err(ValidationError::new("positive_ids"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateWorkoutPlanRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub student_id: i64,
    /// Required when an Admin creates the plan; ignored for Instructors
    #[validate(range(min = 1))]
    pub instructor_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1), nested)]
    pub items: Vec<WorkoutPlanItemInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateWorkoutPlanRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub student_id: Option<i64>,
    #[validate(range(min = 1))]
    pub instructor_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(length(min = 1), nested)]
    pub items: Option<Vec<WorkoutPlanItemInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutPlanFilter {
    pub instructor_id: Option<i64>,
    pub student_id: Option<i64>,
}

impl WorkoutPlanFilter {
    pub fn matches(&self, plan: &WorkoutPlan) -> bool {
        self.instructor_id.map_or(true, |id| plan.instructor_id == id)
            && self.student_id.map_or(true, |id| plan.student_id == id)
    }
}

/// Plan with its student, instructor and catalog entries resolved
#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(name = "WorkoutPlan", rename_fields = "snake_case")]
pub struct WorkoutPlanDetails {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: i64,
    pub instructor: Option<UserResponse>,
    pub student_id: i64,
    pub student: Option<UserResponse>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub items: Vec<WorkoutPlanItemDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(name = "WorkoutPlanItem", rename_fields = "snake_case")]
pub struct WorkoutPlanItemDetails {
    pub id: i64,
    pub exercise_id: i64,
    pub exercise: Option<Exercise>,
    pub series_count: i32,
    pub repetitions_expected: String,
    pub load_suggested: String,
    pub observations: Option<String>,
    pub order_index: i32,
    pub modifier_ids: Vec<i64>,
    pub modifiers: Vec<Modifier>,
}

/// Short plan reference embedded in session responses
#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct WorkoutPlanSummary {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub instructor: Option<UserResponse>,
}
