use chrono::{NaiveDate, Utc};
use validator::Validate;

use crate::auth::access::{can_modify_plan, can_view_plan, forbidden, require_any_role};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{
    CreateWorkoutPlanRequest, Role, UpdateWorkoutPlanRequest, WorkoutPlan, WorkoutPlanDetails,
    WorkoutPlanFilter, WorkoutPlanItem, WorkoutPlanItemInput,
};
use crate::store::{Collection, Database, SharedDatabase};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Workout plan with ID {} not found.", id))
}

fn check_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), AppError> {
    if end_date < start_date {
        return Err(AppError::BadRequest(
            "End date cannot be before the start date.".to_string(),
        ));
    }
    Ok(())
}

/// Student must hold the Student role, instructor the Instructor role
fn check_participants(db: &Database, student_id: i64, instructor_id: i64) -> Result<(), AppError> {
    if db.user_with_role(student_id, Role::Student).is_none() {
        return Err(AppError::NotFound(format!("Student with ID {} not found.", student_id)));
    }
    if db.user_with_role(instructor_id, Role::Instructor).is_none() {
        return Err(AppError::NotFound(format!(
            "Instructor with ID {} not found.",
            instructor_id
        )));
    }
    Ok(())
}

/// Validate catalog references and build items ordered by `order_index`
fn build_items(db: &Database, inputs: Vec<WorkoutPlanItemInput>) -> Result<Vec<WorkoutPlanItem>, AppError> {
    for input in &inputs {
        db.ensure_exercise(input.exercise_id)?;
        db.ensure_modifiers(&input.modifier_ids)?;
    }

    let first_id = db.next_id(Collection::WorkoutPlanItems);
    let mut items: Vec<WorkoutPlanItem> = inputs
        .into_iter()
        .zip(first_id..)
        .map(|(input, id)| WorkoutPlanItem {
            id,
            exercise_id: input.exercise_id,
            series_count: input.series_count,
            repetitions_expected: input.repetitions_expected,
            load_suggested: input.load_suggested,
            observations: input.observations,
            order_index: input.order_index,
            modifier_ids: input.modifier_ids,
        })
        .collect();
    items.sort_by_key(|item| item.order_index);

    Ok(items)
}

#[derive(Debug, Clone)]
pub struct WorkoutPlanService {
    db: SharedDatabase,
}

impl WorkoutPlanService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub async fn create_workout_plan(
        &self,
        actor: &CurrentUser,
        request: CreateWorkoutPlanRequest,
    ) -> Result<WorkoutPlanDetails, AppError> {
        request.validate()?;
        require_any_role(actor, &[Role::Admin, Role::Instructor])?;

        let instructor_id = if actor.is_admin() {
            request.instructor_id.ok_or_else(|| {
                AppError::BadRequest(
                    "An instructor_id is required when an administrator creates a workout plan."
                        .to_string(),
                )
            })?
        } else {
            actor.id
        };
        check_dates(request.start_date, request.end_date)?;

        let mut db = self.db.write().await;
        check_participants(&db, request.student_id, instructor_id)?;

        if actor.is_instructor() && !db.is_instructor_of(actor.id, request.student_id) {
            return Err(AppError::Forbidden(
                "You can only create workout plans for your own students.".to_string(),
            ));
        }

        let items = build_items(&db, request.items)?;
        let now = Utc::now();
        let plan = WorkoutPlan {
            id: db.next_id(Collection::WorkoutPlans),
            name: request.name,
            description: request.description,
            instructor_id,
            student_id: request.student_id,
            start_date: request.start_date,
            end_date: request.end_date,
            items,
            created_at: now,
            updated_at: now,
        };

        tracing::info!(
            plan_id = plan.id,
            student_id = plan.student_id,
            instructor_id,
            "Workout plan created"
        );
        let details = db.workout_plan_details(&plan);
        db.workout_plans.push(plan);
        Ok(details)
    }

    pub async fn list_workout_plans(
        &self,
        actor: &CurrentUser,
        filter: &WorkoutPlanFilter,
    ) -> Vec<WorkoutPlanDetails> {
        let db = self.db.read().await;
        db.workout_plans
            .iter()
            .filter(|plan| match actor.role {
                Role::Admin => true,
                Role::Instructor => plan.instructor_id == actor.id,
                Role::Student => plan.student_id == actor.id,
            })
            .filter(|plan| filter.matches(plan))
            .map(|plan| db.workout_plan_details(plan))
            .collect()
    }

    pub async fn get_workout_plan(
        &self,
        actor: &CurrentUser,
        id: i64,
    ) -> Result<WorkoutPlanDetails, AppError> {
        let db = self.db.read().await;
        let plan = db.workout_plan(id).ok_or_else(|| not_found(id))?;

        if !can_view_plan(actor, plan) {
            return Err(forbidden());
        }

        Ok(db.workout_plan_details(plan))
    }

    pub async fn update_workout_plan(
        &self,
        actor: &CurrentUser,
        id: i64,
        request: UpdateWorkoutPlanRequest,
    ) -> Result<WorkoutPlanDetails, AppError> {
        request.validate()?;

        let mut db = self.db.write().await;
        let plan = db.workout_plan(id).ok_or_else(|| not_found(id))?;

        if !can_modify_plan(actor, plan) {
            return Err(forbidden());
        }

        let instructor_id = request.instructor_id.unwrap_or(plan.instructor_id);
        if instructor_id != plan.instructor_id && !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only administrators can reassign a workout plan to another instructor."
                    .to_string(),
            ));
        }
        let student_id = request.student_id.unwrap_or(plan.student_id);
        check_dates(
            request.start_date.unwrap_or(plan.start_date),
            request.end_date.unwrap_or(plan.end_date),
        )?;

        check_participants(&db, student_id, instructor_id)?;
        if actor.is_instructor()
            && student_id != plan.student_id
            && !db.is_instructor_of(actor.id, student_id)
        {
            return Err(AppError::Forbidden(
                "You can only assign workout plans to your own students.".to_string(),
            ));
        }
        // Linked sessions belong to the current student
        if student_id != plan.student_id && db.workout_plan_references(id) > 0 {
            return Err(AppError::InUse(format!(
                "Workout plan with ID {} has recorded sessions and cannot move to another student.",
                id
            )));
        }

        let items = match request.items {
            Some(inputs) => Some(build_items(&db, inputs)?),
            None => None,
        };

        let plan = db
            .workout_plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = request.name {
            plan.name = name;
        }
        if let Some(description) = request.description {
            plan.description = Some(description);
        }
        plan.student_id = student_id;
        plan.instructor_id = instructor_id;
        if let Some(start_date) = request.start_date {
            plan.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            plan.end_date = end_date;
        }
        if let Some(items) = items {
            plan.items = items;
        }
        plan.updated_at = Utc::now();

        tracing::info!(plan_id = id, updated_by = actor.id, "Workout plan updated");
        let plan = db.workout_plan(id).ok_or_else(|| not_found(id))?;
        Ok(db.workout_plan_details(plan))
    }

    /// Blocked while any session is linked to the plan
    pub async fn delete_workout_plan(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        let mut db = self.db.write().await;
        let plan = db.workout_plan(id).ok_or_else(|| not_found(id))?;

        if !can_modify_plan(actor, plan) {
            return Err(forbidden());
        }

        let references = db.workout_plan_references(id);
        if references > 0 {
            tracing::warn!(plan_id = id, references, "Workout plan delete blocked");
            return Err(AppError::InUse(format!(
                "Cannot delete workout plan {}: {} session(s) are linked to it.",
                id, references
            )));
        }

        db.workout_plans.retain(|p| p.id != id);
        tracing::info!(plan_id = id, deleted_by = actor.id, "Workout plan deleted");
        Ok(())
    }
}
