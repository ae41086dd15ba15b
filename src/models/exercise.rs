use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub general_observation: Option<String>,
    pub muscle_category: String,
    pub video_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateExerciseRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub general_observation: Option<String>,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub muscle_category: String,
    #[validate(url)]
    pub video_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateExerciseRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub general_observation: Option<String>,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub muscle_category: Option<String>,
    #[validate(url)]
    pub video_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseFilter {
    pub muscle_category: Option<String>,
}

impl ExerciseFilter {
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.muscle_category
            .as_deref()
            .map_or(true, |category| exercise.muscle_category.eq_ignore_ascii_case(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_request_validation() {
        let request = CreateExerciseRequest {
            name: "Deadlift".to_string(),
            description: None,
            general_observation: None,
            muscle_category: "Back".to_string(),
            video_link: Some("https://videos.example.com/deadlift".to_string()),
        };
        assert!(request.validate().is_ok());

        let request = CreateExerciseRequest {
            name: "DL".to_string(),
            video_link: Some("not a url".to_string()),
            ..request
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("video_link"));
    }

    #[test]
    fn test_blank_muscle_category_rejected() {
        let request = UpdateExerciseRequest {
            muscle_category: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let exercise = Exercise {
            id: 1,
            name: "Back Squat".to_string(),
            description: None,
            general_observation: None,
            muscle_category: "Legs".to_string(),
            video_link: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let filter = ExerciseFilter {
            muscle_category: Some("LEGS".to_string()),
        };
        assert!(filter.matches(&exercise));
        assert!(ExerciseFilter::default().matches(&exercise));
        assert!(!ExerciseFilter {
            muscle_category: Some("chest".to_string())
        }
        .matches(&exercise));
    }
}
