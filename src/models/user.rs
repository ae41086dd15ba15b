use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::validation::{validate_cref, validate_document};

/// User roles for role-based access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Enum)]
#[graphql(rename_items = "PascalCase")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Instructor => "Instructor",
            Role::Student => "Student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Enum, Default)]
#[graphql(rename_items = "PascalCase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// Stored user record. Never serialized directly: it carries the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub document: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct StudentProfile {
    pub user_id: i64,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct InstructorProfile {
    pub user_id: i64,
    pub cref: String,
    pub specialization: Option<String>,
    pub bio: Option<String>,
}

/// Public view of a user, with the role-specific profile attached
#[derive(Debug, Clone, Serialize, SimpleObject)]
#[graphql(name = "User", rename_fields = "snake_case")]
pub struct UserResponse {
    pub id: i64,
    pub document: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_profile: Option<InstructorProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(
        user: &User,
        student_profile: Option<StudentProfile>,
        instructor_profile: Option<InstructorProfile>,
    ) -> Self {
        Self {
            id: user.id,
            document: user.document.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            student_profile,
            instructor_profile,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateUserData {
    #[validate(custom(function = "validate_document"))]
    pub document: String,
    #[validate(length(min = 3, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct StudentProfileData {
    #[validate(range(min = 50.0, max = 250.0))]
    pub height: Option<f64>,
    #[validate(range(min = 10.0, max = 500.0))]
    pub weight: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(range(min = 1))]
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct InstructorProfileData {
    #[validate(custom(function = "validate_cref"))]
    pub cref: String,
    #[validate(length(max = 255))]
    pub specialization: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

/// `POST /users-management/students`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(nested)]
    pub user_data: CreateUserData,
    #[serde(default)]
    #[validate(nested)]
    pub profile_data: StudentProfileData,
}

/// `POST /users-management/instructors`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInstructorRequest {
    #[validate(nested)]
    pub user_data: CreateUserData,
    #[validate(nested)]
    pub profile_data: InstructorProfileData,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateUserData {
    #[validate(custom(function = "validate_document"))]
    pub document: Option<String>,
    #[validate(length(min = 3, max = 100))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    pub status: Option<UserStatus>,
}

impl UpdateUserData {
    pub fn is_empty(&self) -> bool {
        self.document.is_none()
            && self.full_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.status.is_none()
    }
}

/// Profile changes; fields that do not apply to the target's role are ignored
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct ProfileUpdateData {
    #[validate(range(min = 50.0, max = 250.0))]
    pub height: Option<f64>,
    #[validate(range(min = 10.0, max = 500.0))]
    pub weight: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(range(min = 1))]
    pub instructor_id: Option<i64>,
    #[validate(custom(function = "validate_cref"))]
    pub cref: Option<String>,
    #[validate(length(max = 255))]
    pub specialization: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

/// `PUT /users-management/:id`
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[graphql(name = "UpdateUserInput", rename_fields = "snake_case")]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(nested)]
    pub user_data: Option<UpdateUserData>,
    #[serde(default)]
    #[validate(nested)]
    pub profile_data: Option<ProfileUpdateData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.role.map_or(true, |role| user.role == role)
            && self.status.map_or(true, |status| user.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_data() -> CreateUserData {
        CreateUserData {
            document: "555.555.555-55".to_string(),
            full_name: "Carla Mendes".to_string(),
            email: "carla@app.com".to_string(),
            password: "secretPass1".to_string(),
            status: None,
        }
    }

    #[test]
    fn test_create_user_data_validation() {
        assert!(create_data().validate().is_ok());

        let bad_document = CreateUserData {
            document: "555".to_string(),
            ..create_data()
        };
        assert!(bad_document.validate().is_err());

        let short_password = CreateUserData {
            password: "short".to_string(),
            ..create_data()
        };
        assert!(short_password.validate().is_err());

        let bad_email = CreateUserData {
            email: "not-an-email".to_string(),
            ..create_data()
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_profile_ranges() {
        let profile = StudentProfileData {
            height: Some(300.0),
            ..Default::default()
        };
        assert!(profile.validate().is_err());

        let profile = StudentProfileData {
            height: Some(180.0),
            weight: Some(80.0),
            ..Default::default()
        };
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_nested_request_validation() {
        let request = UpdateUserRequest {
            user_data: Some(UpdateUserData {
                email: Some("broken".to_string()),
                ..Default::default()
            }),
            profile_data: None,
        };
        assert!(request.validate().is_err());
        assert!(UpdateUserRequest::default().validate().is_ok());
    }

    #[test]
    fn test_user_filter() {
        let user = User {
            id: 9,
            document: "999.999.999-99".to_string(),
            full_name: "Filter Target".to_string(),
            email: "filter@app.com".to_string(),
            role: Role::Student,
            password_hash: String::new(),
            status: UserStatus::Inactive,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(UserFilter::default().matches(&user));
        assert!(UserFilter { role: Some(Role::Student), status: None }.matches(&user));
        assert!(!UserFilter { role: Some(Role::Admin), status: None }.matches(&user));
        assert!(!UserFilter { role: None, status: Some(UserStatus::Active) }.matches(&user));
    }
}
