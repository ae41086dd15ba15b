use chrono::Utc;
use validator::Validate;

use crate::auth::access::{can_access_session, can_act_for_student, forbidden};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{
    CreateSessionRequest, Execution, ExecutionInput, Role, Session, SessionDetails, SessionFilter,
    UpdateSessionRequest,
};
use crate::store::{Collection, Database, SharedDatabase};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Session with ID {} not found.", id))
}

/// A linked plan must exist and be assigned to the session's student
fn check_plan_link(db: &Database, plan_id: i64, student_id: i64) -> Result<(), AppError> {
    let plan = db.workout_plan(plan_id).ok_or_else(|| {
        AppError::BadRequest(format!("Workout plan with ID {} not found.", plan_id))
    })?;

    if plan.student_id != student_id {
        return Err(AppError::BadRequest(format!(
            "Workout plan {} is not assigned to student {}.",
            plan_id, student_id
        )));
    }
    Ok(())
}

fn build_executions(db: &Database, inputs: Vec<ExecutionInput>) -> Result<Vec<Execution>, AppError> {
    for input in &inputs {
        db.ensure_exercise(input.exercise_id)?;
        db.ensure_modifiers(&input.modifier_ids)?;
    }

    let now = Utc::now();
    let first_id = db.next_id(Collection::Executions);
    Ok(inputs
        .into_iter()
        .zip(first_id..)
        .map(|(input, id)| Execution {
            id,
            exercise_id: input.exercise_id,
            series_completed: input.series_completed,
            repetitions_completed: input.repetitions_completed,
            load_used: input.load_used,
            observations: input.observations,
            modifier_ids: input.modifier_ids,
            created_at: now,
            updated_at: now,
        })
        .collect())
}

/// Training sessions and their executions
#[derive(Debug, Clone)]
pub struct SessionService {
    db: SharedDatabase,
}

impl SessionService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub async fn create_session(
        &self,
        actor: &CurrentUser,
        request: CreateSessionRequest,
    ) -> Result<SessionDetails, AppError> {
        request.validate()?;

        let mut db = self.db.write().await;
        if !can_act_for_student(&db, actor, request.student_id) {
            return Err(forbidden());
        }

        if db.user_with_role(request.student_id, Role::Student).is_none() {
            return Err(AppError::BadRequest(format!(
                "Student with ID {} not found.",
                request.student_id
            )));
        }
        if let Some(plan_id) = request.workout_plan_id {
            check_plan_link(&db, plan_id, request.student_id)?;
        }

        let executions = build_executions(&db, request.executions)?;
        let now = Utc::now();
        let session = Session {
            id: db.next_id(Collection::Sessions),
            student_id: request.student_id,
            workout_plan_id: request.workout_plan_id,
            session_date: request.session_date,
            observations: request.observations,
            executions,
            created_at: now,
            updated_at: now,
        };

        tracing::info!(
            session_id = session.id,
            student_id = session.student_id,
            recorded_by = actor.id,
            "Session created"
        );
        let details = db.session_details(&session);
        db.sessions.push(session);
        Ok(details)
    }

    pub async fn list_sessions(&self, actor: &CurrentUser, filter: &SessionFilter) -> Vec<SessionDetails> {
        let db = self.db.read().await;
        db.sessions
            .iter()
            .filter(|session| match actor.role {
                Role::Admin => true,
                Role::Instructor => db.is_instructor_of(actor.id, session.student_id),
                Role::Student => session.student_id == actor.id,
            })
            .filter(|session| filter.matches(session))
            .map(|session| db.session_details(session))
            .collect()
    }

    pub async fn get_session(&self, actor: &CurrentUser, id: i64) -> Result<SessionDetails, AppError> {
        let db = self.db.read().await;
        let session = db.session(id).ok_or_else(|| not_found(id))?;

        if !can_access_session(&db, actor, session) {
            return Err(forbidden());
        }

        Ok(db.session_details(session))
    }

    pub async fn update_session(
        &self,
        actor: &CurrentUser,
        id: i64,
        request: UpdateSessionRequest,
    ) -> Result<SessionDetails, AppError> {
        request.validate()?;

        let mut db = self.db.write().await;
        let session = db.session(id).ok_or_else(|| not_found(id))?;

        if !can_access_session(&db, actor, session) {
            return Err(forbidden());
        }

        if let Some(plan_id) = request.workout_plan_id {
            check_plan_link(&db, plan_id, session.student_id)?;
        }
        let executions = match request.executions {
            Some(inputs) => Some(build_executions(&db, inputs)?),
            None => None,
        };

        let session = db
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(plan_id) = request.workout_plan_id {
            session.workout_plan_id = Some(plan_id);
        }
        if let Some(session_date) = request.session_date {
            session.session_date = session_date;
        }
        if let Some(observations) = request.observations {
            session.observations = Some(observations);
        }
        if let Some(executions) = executions {
            session.executions = executions;
        }
        session.updated_at = Utc::now();

        tracing::info!(session_id = id, updated_by = actor.id, "Session updated");
        let session = db.session(id).ok_or_else(|| not_found(id))?;
        Ok(db.session_details(session))
    }

    pub async fn delete_session(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        let mut db = self.db.write().await;
        let session = db.session(id).ok_or_else(|| not_found(id))?;

        if !can_access_session(&db, actor, session) {
            return Err(forbidden());
        }

        db.sessions.retain(|s| s.id != id);
        tracing::info!(session_id = id, deleted_by = actor.id, "Session deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{actor, seeded_db};
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn execution(exercise_id: i64, modifier_ids: Vec<i64>) -> ExecutionInput {
        ExecutionInput {
            exercise_id,
            series_completed: 3,
            repetitions_completed: "12,10,8".to_string(),
            load_used: "30kg".to_string(),
            observations: None,
            modifier_ids,
        }
    }

    fn request(student_id: i64, workout_plan_id: Option<i64>) -> CreateSessionRequest {
        CreateSessionRequest {
            student_id,
            workout_plan_id,
            session_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            observations: Some("Felt strong".to_string()),
            executions: vec![execution(1, vec![2]), execution(3, vec![])],
        }
    }

    #[tokio::test]
    async fn test_student_logs_own_session() {
        let service = SessionService::new(seeded_db().await);
        let student = actor(3, Role::Student);

        let session = service.create_session(&student, request(3, Some(1))).await.unwrap();
        assert_eq!(session.id, 3);
        assert_eq!(session.executions.len(), 2);
        assert_eq!(session.executions[0].modifiers[0].name, "Work Set");
        assert_eq!(session.workout_plan.map(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn test_cannot_log_for_other_student() {
        let service = SessionService::new(seeded_db().await);
        assert_matches!(
            service.create_session(&actor(3, Role::Student), request(4, None)).await,
            Err(AppError::Forbidden(_))
        );
    }

    #[tokio::test]
    async fn test_plan_must_belong_to_student() {
        let service = SessionService::new(seeded_db().await);
        let admin = actor(1, Role::Admin);

        // Plan 2 is assigned to student 4
        assert_matches!(
            service.create_session(&admin, request(3, Some(2))).await,
            Err(AppError::BadRequest(_))
        );
        assert_matches!(
            service.create_session(&admin, request(3, Some(99))).await,
            Err(AppError::BadRequest(_))
        );
        // User 2 is an instructor, not a student
        assert_matches!(
            service.create_session(&admin, request(2, None)).await,
            Err(AppError::BadRequest(_))
        );
    }

    #[tokio::test]
    async fn test_unknown_exercise_in_execution() {
        let service = SessionService::new(seeded_db().await);
        let mut bad = request(3, None);
        bad.executions = vec![execution(77, vec![])];

        assert_matches!(
            service.create_session(&actor(2, Role::Instructor), bad).await,
            Err(AppError::BadRequest(_))
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_role() {
        let service = SessionService::new(seeded_db().await);

        let all = service.list_sessions(&actor(1, Role::Admin), &SessionFilter::default()).await;
        assert_eq!(all.len(), 2);

        let own = service.list_sessions(&actor(4, Role::Student), &SessionFilter::default()).await;
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].student_id, 4);

        let filtered = service
            .list_sessions(
                &actor(2, Role::Instructor),
                &SessionFilter {
                    workout_plan_id: Some(1),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_student_and_revalidates() {
        let service = SessionService::new(seeded_db().await);
        let instructor = actor(2, Role::Instructor);

        let update = UpdateSessionRequest {
            observations: Some("Adjusted loads".to_string()),
            executions: Some(vec![execution(2, vec![1])]),
            ..Default::default()
        };
        let session = service.update_session(&instructor, 1, update).await.unwrap();
        assert_eq!(session.student_id, 3);
        assert_eq!(session.executions[0].exercise_id, 2);

        let bad_plan = UpdateSessionRequest {
            workout_plan_id: Some(2),
            ..Default::default()
        };
        assert_matches!(
            service.update_session(&instructor, 1, bad_plan).await,
            Err(AppError::BadRequest(_))
        );
    }

    #[tokio::test]
    async fn test_delete_session() {
        let service = SessionService::new(seeded_db().await);
        assert_matches!(
            service.delete_session(&actor(4, Role::Student), 1).await,
            Err(AppError::Forbidden(_))
        );
        service.delete_session(&actor(3, Role::Student), 1).await.unwrap();
        assert_matches!(
            service.get_session(&actor(1, Role::Admin), 1).await,
            Err(AppError::NotFound(_))
        );
    }
}
