use async_graphql::{Context, EmptySubscription, ErrorExtensions, InputObject, Object, Result, Schema};
use chrono::NaiveDate;

use crate::auth::{AuthError, AuthService, CurrentUser, LoginRequest, LoginResponse};
use crate::errors::AppError;
use crate::models::*;
use crate::services::{NewProfile, Services};

pub type GymSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: Services, auth_service: AuthService) -> GymSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .data(auth_service)
        .finish()
}

fn gql(err: AppError) -> async_graphql::Error {
    err.extend()
}

/// The acting user, resolved from the bearer token by the HTTP handler
fn current_user<'a>(ctx: &'a Context<'_>) -> Result<&'a CurrentUser> {
    ctx.data_opt::<CurrentUser>()
        .ok_or_else(|| gql(AuthError::NotLoggedIn.into()))
}

fn services<'a>(ctx: &'a Context<'_>) -> Result<&'a Services> {
    ctx.data::<Services>()
}

#[derive(Debug, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateUserInput {
    pub user_data: CreateUserData,
    pub role: Role,
    pub student_profile: Option<StudentProfileData>,
    pub instructor_profile: Option<InstructorProfileData>,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn users(
        &self,
        ctx: &Context<'_>,
        role: Option<Role>,
        status: Option<UserStatus>,
    ) -> Result<Vec<UserResponse>> {
        let actor = current_user(ctx)?;
        let filter = UserFilter { role, status };
        Ok(services(ctx)?.users.list_users(actor, &filter).await)
    }

    async fn user(&self, ctx: &Context<'_>, id: i64) -> Result<UserResponse> {
        let actor = current_user(ctx)?;
        services(ctx)?.users.get_user(actor, id).await.map_err(gql)
    }

    async fn exercises(
        &self,
        ctx: &Context<'_>,
        muscle_category: Option<String>,
    ) -> Result<Vec<Exercise>> {
        current_user(ctx)?;
        let filter = ExerciseFilter { muscle_category };
        Ok(services(ctx)?.exercises.list_exercises(&filter).await)
    }

    async fn exercise(&self, ctx: &Context<'_>, id: i64) -> Result<Exercise> {
        current_user(ctx)?;
        services(ctx)?.exercises.get_exercise(id).await.map_err(gql)
    }

    async fn modifiers(&self, ctx: &Context<'_>) -> Result<Vec<Modifier>> {
        current_user(ctx)?;
        Ok(services(ctx)?.modifiers.list_modifiers().await)
    }

    async fn modifier(&self, ctx: &Context<'_>, id: i64) -> Result<Modifier> {
        current_user(ctx)?;
        services(ctx)?.modifiers.get_modifier(id).await.map_err(gql)
    }

    async fn workout_plans(
        &self,
        ctx: &Context<'_>,
        student_id: Option<i64>,
        instructor_id: Option<i64>,
    ) -> Result<Vec<WorkoutPlanDetails>> {
        let actor = current_user(ctx)?;
        let filter = WorkoutPlanFilter {
            instructor_id,
            student_id,
        };
        Ok(services(ctx)?
            .workout_plans
            .list_workout_plans(actor, &filter)
            .await)
    }

    async fn workout_plan(&self, ctx: &Context<'_>, id: i64) -> Result<WorkoutPlanDetails> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .workout_plans
            .get_workout_plan(actor, id)
            .await
            .map_err(gql)
    }

    async fn sessions(
        &self,
        ctx: &Context<'_>,
        student_id: Option<i64>,
        plan_id: Option<i64>,
        session_date: Option<NaiveDate>,
    ) -> Result<Vec<SessionDetails>> {
        let actor = current_user(ctx)?;
        let filter = SessionFilter {
            student_id,
            workout_plan_id: plan_id,
            session_date,
        };
        Ok(services(ctx)?.sessions.list_sessions(actor, &filter).await)
    }

    async fn session(&self, ctx: &Context<'_>, id: i64) -> Result<SessionDetails> {
        let actor = current_user(ctx)?;
        services(ctx)?.sessions.get_session(actor, id).await.map_err(gql)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<LoginResponse> {
        let request = LoginRequest {
            document_or_email: email,
            password,
        };
        ctx.data::<AuthService>()?
            .login(request)
            .await
            .map_err(|err| gql(err.into()))
    }

    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<UserResponse> {
        let actor = current_user(ctx)?;
        let profile = match (input.student_profile, input.instructor_profile) {
            (Some(student), None) => NewProfile::Student(student),
            (None, Some(instructor)) => NewProfile::Instructor(instructor),
            (None, None) => NewProfile::None,
            (Some(_), Some(_)) => {
                return Err(gql(AppError::BadRequest(
                    "Provide either a student or an instructor profile, not both.".to_string(),
                )))
            }
        };
        services(ctx)?
            .users
            .create_user(actor, input.user_data, input.role, profile)
            .await
            .map_err(gql)
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: UpdateUserRequest,
    ) -> Result<UserResponse> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .users
            .update_user(actor, id, input)
            .await
            .map_err(gql)
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let actor = current_user(ctx)?;
        services(ctx)?.users.delete_user(actor, id).await.map_err(gql)?;
        Ok(true)
    }

    async fn create_exercise(
        &self,
        ctx: &Context<'_>,
        input: CreateExerciseRequest,
    ) -> Result<Exercise> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .exercises
            .create_exercise(actor, input)
            .await
            .map_err(gql)
    }

    async fn update_exercise(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: UpdateExerciseRequest,
    ) -> Result<Exercise> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .exercises
            .update_exercise(actor, id, input)
            .await
            .map_err(gql)
    }

    async fn delete_exercise(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .exercises
            .delete_exercise(actor, id)
            .await
            .map_err(gql)?;
        Ok(true)
    }

    async fn create_modifier(
        &self,
        ctx: &Context<'_>,
        input: CreateModifierRequest,
    ) -> Result<Modifier> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .modifiers
            .create_modifier(actor, input)
            .await
            .map_err(gql)
    }

    async fn update_modifier(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: UpdateModifierRequest,
    ) -> Result<Modifier> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .modifiers
            .update_modifier(actor, id, input)
            .await
            .map_err(gql)
    }

    async fn delete_modifier(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .modifiers
            .delete_modifier(actor, id)
            .await
            .map_err(gql)?;
        Ok(true)
    }

    async fn create_workout_plan(
        &self,
        ctx: &Context<'_>,
        input: CreateWorkoutPlanRequest,
    ) -> Result<WorkoutPlanDetails> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .workout_plans
            .create_workout_plan(actor, input)
            .await
            .map_err(gql)
    }

    async fn update_workout_plan(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: UpdateWorkoutPlanRequest,
    ) -> Result<WorkoutPlanDetails> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .workout_plans
            .update_workout_plan(actor, id, input)
            .await
            .map_err(gql)
    }

    async fn delete_workout_plan(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .workout_plans
            .delete_workout_plan(actor, id)
            .await
            .map_err(gql)?;
        Ok(true)
    }

    async fn create_session(
        &self,
        ctx: &Context<'_>,
        input: CreateSessionRequest,
    ) -> Result<SessionDetails> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .sessions
            .create_session(actor, input)
            .await
            .map_err(gql)
    }

    async fn update_session(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: UpdateSessionRequest,
    ) -> Result<SessionDetails> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .sessions
            .update_session(actor, id, input)
            .await
            .map_err(gql)
    }

    async fn delete_session(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let actor = current_user(ctx)?;
        services(ctx)?
            .sessions
            .delete_session(actor, id)
            .await
            .map_err(gql)?;
        Ok(true)
    }
}
