use chrono::Utc;
use validator::Validate;

use crate::auth::{access::require_any_role, CurrentUser};
use crate::errors::AppError;
use crate::models::{CreateExerciseRequest, Exercise, ExerciseFilter, Role, UpdateExerciseRequest};
use crate::store::{Collection, SharedDatabase};

const EDITORS: &[Role] = &[Role::Admin, Role::Instructor];

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Exercise with ID {} not found.", id))
}

fn duplicate(name: &str) -> AppError {
    AppError::Duplicate(format!("An exercise named '{}' already exists.", name))
}

/// Exercise catalog
#[derive(Debug, Clone)]
pub struct ExerciseService {
    db: SharedDatabase,
}

impl ExerciseService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub async fn create_exercise(
        &self,
        actor: &CurrentUser,
        request: CreateExerciseRequest,
    ) -> Result<Exercise, AppError> {
        request.validate()?;
        require_any_role(actor, EDITORS)?;

        let mut db = self.db.write().await;
        if db.exercise_name_taken(&request.name, None) {
            return Err(duplicate(&request.name));
        }

        let now = Utc::now();
        let exercise = Exercise {
            id: db.next_id(Collection::Exercises),
            name: request.name,
            description: request.description,
            general_observation: request.general_observation,
            muscle_category: request.muscle_category,
            video_link: request.video_link,
            created_at: now,
            updated_at: now,
        };
        db.exercises.push(exercise.clone());

        tracing::info!(exercise_id = exercise.id, created_by = actor.id, "Exercise created");
        Ok(exercise)
    }

    pub async fn list_exercises(&self, filter: &ExerciseFilter) -> Vec<Exercise> {
        let db = self.db.read().await;
        db.exercises
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    pub async fn get_exercise(&self, id: i64) -> Result<Exercise, AppError> {
        let db = self.db.read().await;
        db.exercise(id).cloned().ok_or_else(|| not_found(id))
    }

    pub async fn update_exercise(
        &self,
        actor: &CurrentUser,
        id: i64,
        request: UpdateExerciseRequest,
    ) -> Result<Exercise, AppError> {
        request.validate()?;
        require_any_role(actor, EDITORS)?;

        let mut db = self.db.write().await;
        if db.exercise(id).is_none() {
            return Err(not_found(id));
        }
        if let Some(name) = &request.name {
            if db.exercise_name_taken(name, Some(id)) {
                return Err(duplicate(name));
            }
        }

        let exercise = db
            .exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = request.name {
            exercise.name = name;
        }
        if let Some(description) = request.description {
            exercise.description = Some(description);
        }
        if let Some(observation) = request.general_observation {
            exercise.general_observation = Some(observation);
        }
        if let Some(category) = request.muscle_category {
            exercise.muscle_category = category;
        }
        if let Some(link) = request.video_link {
            exercise.video_link = Some(link);
        }
        exercise.updated_at = Utc::now();

        tracing::info!(exercise_id = id, updated_by = actor.id, "Exercise updated");
        Ok(exercise.clone())
    }

    /// Blocked while any plan item or execution uses the exercise
    pub async fn delete_exercise(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        require_any_role(actor, EDITORS)?;

        let mut db = self.db.write().await;
        if db.exercise(id).is_none() {
            return Err(not_found(id));
        }

        let references = db.exercise_references(id);
        if references > 0 {
            tracing::warn!(exercise_id = id, references, "Exercise delete blocked");
            return Err(AppError::InUse(format!(
                "Cannot delete exercise {}: it is used by {} workout plan item(s) or session execution(s).",
                id, references
            )));
        }

        db.exercises.retain(|e| e.id != id);
        tracing::info!(exercise_id = id, deleted_by = actor.id, "Exercise deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{actor, seeded_db};
    use assert_matches::assert_matches;

    fn request(name: &str) -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: name.to_string(),
            description: Some("Hip hinge".to_string()),
            general_observation: None,
            muscle_category: "Back".to_string(),
            video_link: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_exercise() {
        let service = ExerciseService::new(seeded_db().await);
        let admin = actor(1, Role::Admin);

        let created = service.create_exercise(&admin, request("Deadlift")).await.unwrap();
        assert_eq!(created.id, 4);

        let fetched = service.get_exercise(created.id).await.unwrap();
        assert_eq!(fetched.name, "Deadlift");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_case_insensitive() {
        let service = ExerciseService::new(seeded_db().await);
        let instructor = actor(2, Role::Instructor);

        let result = service
            .create_exercise(&instructor, request("back squat"))
            .await;
        assert_matches!(result, Err(AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_student_cannot_create() {
        let service = ExerciseService::new(seeded_db().await);
        let result = service
            .create_exercise(&actor(3, Role::Student), request("Deadlift"))
            .await;
        assert_matches!(result, Err(AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_filter_by_muscle_category() {
        let service = ExerciseService::new(seeded_db().await);
        let filter = ExerciseFilter {
            muscle_category: Some("legs".to_string()),
        };
        let exercises = service.list_exercises(&filter).await;
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name, "Back Squat");
    }

    #[tokio::test]
    async fn test_delete_referenced_exercise_is_blocked() {
        let service = ExerciseService::new(seeded_db().await);
        let admin = actor(1, Role::Admin);

        assert_matches!(service.delete_exercise(&admin, 1).await, Err(AppError::InUse(_)));
        assert_matches!(service.delete_exercise(&admin, 99).await, Err(AppError::NotFound(_)));

        let unused = service.create_exercise(&admin, request("Deadlift")).await.unwrap();
        service.delete_exercise(&admin, unused.id).await.unwrap();
        assert_matches!(service.get_exercise(unused.id).await, Err(AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_name() {
        let service = ExerciseService::new(seeded_db().await);
        let admin = actor(1, Role::Admin);

        let update = UpdateExerciseRequest {
            name: Some("Bent-Over Row".to_string()),
            ..Default::default()
        };
        assert_matches!(
            service.update_exercise(&admin, 1, update).await,
            Err(AppError::Duplicate(_))
        );

        let update = UpdateExerciseRequest {
            description: Some("Flat bench, full range".to_string()),
            ..Default::default()
        };
        let updated = service.update_exercise(&admin, 1, update).await.unwrap();
        assert_eq!(updated.description.as_deref(), Some("Flat bench, full range"));
    }
}
