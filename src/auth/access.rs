//! Role and ownership rules shared by every service.
//!
//! Each check takes the acting user and a read view of the store, so the same
//! rule set backs both the REST handlers and the GraphQL resolvers.

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{Role, Session, User, WorkoutPlan};
use crate::store::Database;

pub fn forbidden() -> AppError {
    AppError::Forbidden("You do not have permission to perform this action.".to_string())
}

pub fn require_any_role(actor: &CurrentUser, roles: &[Role]) -> Result<(), AppError> {
    if roles.contains(&actor.role) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

/// Instructor whose student profile link points at them
pub fn is_instructor_of(db: &Database, actor: &CurrentUser, student_id: i64) -> bool {
    actor.is_instructor() && db.is_instructor_of(actor.id, student_id)
}

/// Admin, the user themself, or the instructor of a student target
pub fn can_access_user(db: &Database, actor: &CurrentUser, target: &User) -> bool {
    actor.is_admin()
        || actor.is_owner(target.id)
        || (target.role == Role::Student && is_instructor_of(db, actor, target.id))
}

pub fn can_delete_user(db: &Database, actor: &CurrentUser, target: &User) -> bool {
    if target.role == Role::Admin && !actor.is_admin() {
        return false;
    }
    can_access_user(db, actor, target)
}

/// Admin, the student themself, or that student's instructor
pub fn can_act_for_student(db: &Database, actor: &CurrentUser, student_id: i64) -> bool {
    actor.is_admin() || actor.is_owner(student_id) || is_instructor_of(db, actor, student_id)
}

pub fn can_view_plan(actor: &CurrentUser, plan: &WorkoutPlan) -> bool {
    actor.is_admin() || actor.is_owner(plan.instructor_id) || actor.is_owner(plan.student_id)
}

pub fn can_modify_plan(actor: &CurrentUser, plan: &WorkoutPlan) -> bool {
    actor.is_admin() || (actor.is_instructor() && actor.is_owner(plan.instructor_id))
}

pub fn can_access_session(db: &Database, actor: &CurrentUser, session: &Session) -> bool {
    can_act_for_student(db, actor, session.student_id)
}
