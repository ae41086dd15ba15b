use chrono::Utc;
use validator::Validate;

use crate::auth::access::{can_access_user, can_delete_user, forbidden, require_any_role};
use crate::auth::{password::hash_password, CurrentUser};
use crate::errors::AppError;
use crate::models::{
    CreateInstructorRequest, CreateStudentRequest, CreateUserData, InstructorProfile,
    InstructorProfileData, ProfileUpdateData, Role, StudentProfile, StudentProfileData,
    UpdateUserRequest, User, UserFilter, UserResponse,
};
use crate::store::{Collection, Database, SharedDatabase};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User with ID {} not found.", id))
}

/// Role-specific data attached to a new user
#[derive(Debug, Clone)]
pub enum NewProfile {
    Student(StudentProfileData),
    Instructor(InstructorProfileData),
    None,
}

impl NewProfile {
    fn validate(&self) -> Result<(), AppError> {
        match self {
            NewProfile::Student(data) => data.validate()?,
            NewProfile::Instructor(data) => data.validate()?,
            NewProfile::None => {}
        }
        Ok(())
    }
}

fn ensure_instructor(db: &Database, instructor_id: i64) -> Result<(), AppError> {
    if db.user_with_role(instructor_id, Role::Instructor).is_none() {
        return Err(AppError::BadRequest(format!(
            "Instructor with ID {} not found.",
            instructor_id
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct UserService {
    db: SharedDatabase,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(db: SharedDatabase, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    pub async fn create_student(
        &self,
        actor: &CurrentUser,
        request: CreateStudentRequest,
    ) -> Result<UserResponse, AppError> {
        self.create_user(
            actor,
            request.user_data,
            Role::Student,
            NewProfile::Student(request.profile_data),
        )
        .await
    }

    pub async fn create_instructor(
        &self,
        actor: &CurrentUser,
        request: CreateInstructorRequest,
    ) -> Result<UserResponse, AppError> {
        self.create_user(
            actor,
            request.user_data,
            Role::Instructor,
            NewProfile::Instructor(request.profile_data),
        )
        .await
    }

    /// Create a user of any role together with its profile
    pub async fn create_user(
        &self,
        actor: &CurrentUser,
        user_data: CreateUserData,
        role: Role,
        profile: NewProfile,
    ) -> Result<UserResponse, AppError> {
        user_data.validate()?;
        profile.validate()?;

        match role {
            Role::Student => require_any_role(actor, &[Role::Admin, Role::Instructor])?,
            Role::Instructor | Role::Admin => require_any_role(actor, &[Role::Admin])?,
        }

        let mut profile = match (role, profile) {
            (Role::Student, NewProfile::Student(data)) => NewProfile::Student(data),
            (Role::Student, NewProfile::None) => NewProfile::Student(StudentProfileData::default()),
            (Role::Instructor, NewProfile::Instructor(data)) => NewProfile::Instructor(data),
            (Role::Instructor, _) => {
                return Err(AppError::BadRequest(
                    "Instructor profile data with a CREF is required.".to_string(),
                ))
            }
            (Role::Admin, NewProfile::None) => NewProfile::None,
            (role, _) => {
                return Err(AppError::BadRequest(format!(
                    "Profile data does not match the {} role.",
                    role
                )))
            }
        };

        // Students created by an instructor belong to that instructor
        if let NewProfile::Student(data) = &mut profile {
            if actor.is_instructor() {
                match data.instructor_id {
                    None => data.instructor_id = Some(actor.id),
                    Some(id) if id != actor.id => return Err(forbidden()),
                    Some(_) => {}
                }
            }
        }

        let password_hash = hash_password(&user_data.password, self.bcrypt_cost)?;

        let mut db = self.db.write().await;

        if db.document_taken(&user_data.document, None) {
            return Err(AppError::Duplicate("Document is already registered.".to_string()));
        }
        if db.email_taken(&user_data.email, None) {
            return Err(AppError::Duplicate("Email is already registered.".to_string()));
        }
        match &profile {
            NewProfile::Instructor(data) if db.cref_taken(&data.cref, None) => {
                return Err(AppError::Duplicate("CREF is already registered.".to_string()));
            }
            NewProfile::Student(StudentProfileData {
                instructor_id: Some(instructor_id),
                ..
            }) => ensure_instructor(&db, *instructor_id)?,
            _ => {}
        }

        let now = Utc::now();
        let user = User {
            id: db.next_id(Collection::Users),
            document: user_data.document,
            full_name: user_data.full_name,
            email: user_data.email,
            role,
            password_hash,
            status: user_data.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        match profile {
            NewProfile::Student(data) => db.student_profiles.push(StudentProfile {
                user_id: user.id,
                height: data.height,
                weight: data.weight,
                date_of_birth: data.date_of_birth,
                instructor_id: data.instructor_id,
            }),
            NewProfile::Instructor(data) => db.instructor_profiles.push(InstructorProfile {
                user_id: user.id,
                cref: data.cref,
                specialization: data.specialization,
                bio: data.bio,
            }),
            NewProfile::None => {}
        }

        tracing::info!(user_id = user.id, role = %role, created_by = actor.id, "User created");
        let response = db.user_response(&user);
        db.users.push(user);
        Ok(response)
    }

    /// Admin sees everyone, an instructor sees themself and their students,
    /// a student sees only themself
    pub async fn list_users(&self, actor: &CurrentUser, filter: &UserFilter) -> Vec<UserResponse> {
        let db = self.db.read().await;

        let visible_ids = match actor.role {
            Role::Admin => None,
            Role::Instructor => {
                let mut ids = db.students_of(actor.id);
                ids.push(actor.id);
                Some(ids)
            }
            Role::Student => Some(vec![actor.id]),
        };

        db.users
            .iter()
            .filter(|user| visible_ids.as_ref().map_or(true, |ids| ids.contains(&user.id)))
            .filter(|user| filter.matches(user))
            .map(|user| db.user_response(user))
            .collect()
    }

    pub async fn get_user(&self, actor: &CurrentUser, id: i64) -> Result<UserResponse, AppError> {
        let db = self.db.read().await;
        let user = db.user(id).ok_or_else(|| not_found(id))?;

        if !can_access_user(&db, actor, user) {
            return Err(forbidden());
        }

        Ok(db.user_response(user))
    }

    pub async fn update_user(
        &self,
        actor: &CurrentUser,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        request.validate()?;

        let user_data = request.user_data.unwrap_or_default();
        let profile_data = request.profile_data;

        let password_hash = match &user_data.password {
            Some(password) => Some(hash_password(password, self.bcrypt_cost)?),
            None => None,
        };

        let mut db = self.db.write().await;
        let target = db.user(id).ok_or_else(|| not_found(id))?;

        if !can_access_user(&db, actor, target) {
            return Err(forbidden());
        }
        let target_role = target.role;

        if user_data.status.is_some() && actor.is_student() {
            return Err(AppError::Forbidden(
                "Students cannot change account status.".to_string(),
            ));
        }
        if let Some(document) = &user_data.document {
            if db.document_taken(document, Some(id)) {
                return Err(AppError::Duplicate("Document is already registered.".to_string()));
            }
        }
        if let Some(email) = &user_data.email {
            if db.email_taken(email, Some(id)) {
                return Err(AppError::Duplicate("Email is already registered.".to_string()));
            }
        }
        if let Some(profile) = &profile_data {
            Self::check_profile_update(&db, actor, id, target_role, profile)?;
        }

        let now = Utc::now();
        let user = db.user_mut(id).ok_or_else(|| not_found(id))?;
        if let Some(document) = user_data.document {
            user.document = document;
        }
        if let Some(full_name) = user_data.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = user_data.email {
            user.email = email;
        }
        if let Some(status) = user_data.status {
            user.status = status;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = now;

        if let Some(profile) = profile_data {
            Self::apply_profile_update(&mut db, id, target_role, profile);
        }

        tracing::info!(user_id = id, updated_by = actor.id, "User updated");
        let user = db.user(id).ok_or_else(|| not_found(id))?;
        Ok(db.user_response(user))
    }

    fn check_profile_update(
        db: &Database,
        actor: &CurrentUser,
        id: i64,
        target_role: Role,
        profile: &ProfileUpdateData,
    ) -> Result<(), AppError> {
        match target_role {
            Role::Student => {
                if let Some(instructor_id) = profile.instructor_id {
                    if actor.is_student() {
                        return Err(AppError::Forbidden(
                            "Only administrators and instructors can change a student's instructor."
                                .to_string(),
                        ));
                    }
                    ensure_instructor(db, instructor_id)?;
                }
            }
            Role::Instructor => {
                if let Some(cref) = &profile.cref {
                    if db.cref_taken(cref, Some(id)) {
                        return Err(AppError::Duplicate("CREF is already registered.".to_string()));
                    }
                }
            }
            Role::Admin => {}
        }
        Ok(())
    }

    fn apply_profile_update(db: &mut Database, id: i64, target_role: Role, profile: ProfileUpdateData) {
        match target_role {
            Role::Student => {
                if db.student_profile(id).is_none() {
                    db.student_profiles.push(StudentProfile {
                        user_id: id,
                        height: None,
                        weight: None,
                        date_of_birth: None,
                        instructor_id: None,
                    });
                }
                if let Some(existing) = db.student_profile_mut(id) {
                    if profile.height.is_some() {
                        existing.height = profile.height;
                    }
                    if profile.weight.is_some() {
                        existing.weight = profile.weight;
                    }
                    if profile.date_of_birth.is_some() {
                        existing.date_of_birth = profile.date_of_birth;
                    }
                    if profile.instructor_id.is_some() {
                        existing.instructor_id = profile.instructor_id;
                    }
                }
            }
            Role::Instructor => {
                if let Some(existing) = db.instructor_profile_mut(id) {
                    if let Some(cref) = profile.cref {
                        existing.cref = cref;
                    }
                    if profile.specialization.is_some() {
                        existing.specialization = profile.specialization;
                    }
                    if profile.bio.is_some() {
                        existing.bio = profile.bio;
                    }
                }
            }
            Role::Admin => {}
        }
    }

    /// Blocked while plans, sessions or assigned students still point at the user
    pub async fn delete_user(&self, actor: &CurrentUser, id: i64) -> Result<(), AppError> {
        let mut db = self.db.write().await;
        let target = db.user(id).ok_or_else(|| not_found(id))?;

        if !can_delete_user(&db, actor, target) {
            return Err(forbidden());
        }

        let references = db.user_references(id);
        if !references.is_empty() {
            tracing::warn!(user_id = id, ?references, "User delete blocked");
            return Err(AppError::InUse(format!(
                "Cannot delete user {}: still referenced by {} workout plan(s), {} session(s) and {} assigned student(s).",
                id, references.workout_plans, references.sessions, references.students
            )));
        }

        db.users.retain(|u| u.id != id);
        db.student_profiles.retain(|p| p.user_id != id);
        db.instructor_profiles.retain(|p| p.user_id != id);

        tracing::info!(user_id = id, deleted_by = actor.id, "User deleted");
        Ok(())
    }
}
