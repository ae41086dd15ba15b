mod common;

use axum::http::StatusCode;
use gym_manager::models::Role;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::*;

fn plan_body(student_id: i64) -> serde_json::Value {
    json!({
        "name": "Hypertrophy",
        "student_id": student_id,
        "start_date": "2024-06-01",
        "end_date": "2024-07-01",
        "items": [{ "exercise_id": 1, "series_count": 3, "repetitions_expected": "10",
                    "load_suggested": "30kg", "order_index": 1 }]
    })
}

#[tokio::test]
async fn test_student_cannot_manage_catalog() {
    let app = TestApp::new().await;
    let student = app.student_token();

    let exercise = app
        .post(
            "/api/v1/exercises",
            &student,
            json!({ "name": "Curl", "muscle_category": "Arms" }),
        )
        .await;
    assert_eq!(exercise.status, StatusCode::FORBIDDEN);
    assert_eq!(exercise.body["code"], "FORBIDDEN");

    let modifier = app.delete("/api/v1/modifiers/3", &student).await;
    assert_eq!(modifier.status, StatusCode::FORBIDDEN);

    // Reading the catalog is open to every role
    let listed = app.get("/api/v1/modifiers", &student).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["results"], 3);
}

#[tokio::test]
async fn test_user_creation_routes_are_role_gated() {
    let app = TestApp::new().await;

    let student_creates = app
        .post(
            "/api/v1/users-management/students",
            &app.student_token(),
            json!({
                "user_data": {
                    "document": "777.777.777-77",
                    "full_name": "Sneaky Student",
                    "email": "sneaky@app.com",
                    "password": "sneakyPassword1"
                }
            }),
        )
        .await;
    assert_eq!(student_creates.status, StatusCode::FORBIDDEN);

    let duplicate = app
        .post(
            "/api/v1/users-management/students",
            &app.admin_token(),
            json!({
                "user_data": {
                    "document": "888.888.888-88",
                    "full_name": "Copy Cat",
                    "email": "student@app.com",
                    "password": "copyPassword1"
                },
                "profile_data": { "instructor_id": INSTRUCTOR_ID }
            }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["code"], "DUPLICATE");
}

#[tokio::test]
async fn test_user_visibility_by_role() {
    let app = TestApp::new().await;

    let own = app.get("/api/v1/users-management/3", &app.student_token()).await;
    assert_eq!(own.status, StatusCode::OK);

    let other = app.get("/api/v1/users-management/4", &app.student_token()).await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);

    let listed = app.get("/api/v1/users-management", &app.student_token()).await;
    assert_eq!(listed.body["results"], 1);
    assert_eq!(listed.body["data"]["users"][0]["id"], STUDENT_ID);

    let instructor_view = app
        .get("/api/v1/users-management/4", &app.instructor_token())
        .await;
    assert_eq!(instructor_view.status, StatusCode::OK);

    let admin_view = app
        .get("/api/v1/users-management/1", &app.instructor_token())
        .await;
    assert_eq!(admin_view.status, StatusCode::FORBIDDEN);

    let missing = app.get("/api/v1/users-management/99", &app.admin_token()).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_cannot_change_own_status() {
    let app = TestApp::new().await;

    let response = app
        .put(
            "/api/v1/users-management/3",
            &app.student_token(),
            json!({ "user_data": { "status": "Inactive" } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let renamed = app
        .put(
            "/api/v1/users-management/3",
            &app.student_token(),
            json!({ "user_data": { "full_name": "João Atleta" }, "profile_data": { "weight": 80.5 } }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["user"]["full_name"], "João Atleta");
    assert_eq!(renamed.body["data"]["user"]["student_profile"]["weight"], 80.5);
}

#[tokio::test]
async fn test_referenced_users_cannot_be_deleted() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let instructor = app.delete("/api/v1/users-management/2", &admin).await;
    assert_eq!(instructor.status, StatusCode::BAD_REQUEST);
    assert_eq!(instructor.body["code"], "RESOURCE_IN_USE");

    let student = app.delete("/api/v1/users-management/3", &admin).await;
    assert_eq!(student.status, StatusCode::BAD_REQUEST);

    let admin_by_instructor = app
        .delete("/api/v1/users-management/1", &app.instructor_token())
        .await;
    assert_eq!(admin_by_instructor.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::new().await;

    let created = app
        .post(
            "/api/v1/users-management/students",
            &app.admin_token(),
            json!({
                "user_data": {
                    "document": "999.999.999-99",
                    "full_name": "Short Lived",
                    "email": "short@app.com",
                    "password": "shortPassword1"
                },
                "profile_data": { "instructor_id": INSTRUCTOR_ID }
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["user"]["id"].as_i64().unwrap();
    let token = app.token(id, Role::Student);

    assert_eq!(app.get("/api/v1/exercises", &token).await.status, StatusCode::OK);

    let deleted = app
        .delete(&format!("/api/v1/users-management/{}", id), &app.admin_token())
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let rejected = app.get("/api/v1/exercises", &token).await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_workout_plan_ownership() {
    let app = TestApp::new().await;

    let by_student = app
        .post("/api/v1/workout-plans", &app.student_token(), plan_body(STUDENT_ID))
        .await;
    assert_eq!(by_student.status, StatusCode::FORBIDDEN);

    let own_plan = app.get("/api/v1/workout-plans/1", &app.student_token()).await;
    assert_eq!(own_plan.status, StatusCode::OK);

    let other_plan = app.get("/api/v1/workout-plans/2", &app.student_token()).await;
    assert_eq!(other_plan.status, StatusCode::FORBIDDEN);

    let listed = app.get("/api/v1/workout-plans", &app.student_token()).await;
    assert_eq!(listed.body["results"], 1);

    let edit = app
        .put(
            "/api/v1/workout-plans/1",
            &app.student_token(),
            json!({ "name": "My own plan" }),
        )
        .await;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);

    let reassign = app
        .put(
            "/api/v1/workout-plans/1",
            &app.instructor_token(),
            json!({ "instructor_id": 99 }),
        )
        .await;
    assert_eq!(reassign.status, StatusCode::FORBIDDEN);

    let renamed = app
        .put(
            "/api/v1/workout-plans/1",
            &app.instructor_token(),
            json!({ "name": "Strength Block II" }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["workout_plan"]["name"], "Strength Block II");
}

#[tokio::test]
async fn test_session_ownership() {
    let app = TestApp::new().await;
    let student = app.student_token();

    let for_someone_else = app
        .post(
            "/api/v1/sessions",
            &student,
            json!({
                "student_id": OTHER_STUDENT_ID,
                "session_date": "2024-06-03",
                "executions": [{ "exercise_id": 2, "series_completed": 3,
                                 "repetitions_completed": "10", "load_used": "50kg" }]
            }),
        )
        .await;
    assert_eq!(for_someone_else.status, StatusCode::FORBIDDEN);

    let foreign_plan = app
        .post(
            "/api/v1/sessions",
            &student,
            json!({
                "student_id": STUDENT_ID,
                "workout_plan_id": 2,
                "session_date": "2024-06-03",
                "executions": [{ "exercise_id": 2, "series_completed": 3,
                                 "repetitions_completed": "10", "load_used": "50kg" }]
            }),
        )
        .await;
    assert_eq!(foreign_plan.status, StatusCode::BAD_REQUEST);

    let other_session = app.get("/api/v1/sessions/2", &student).await;
    assert_eq!(other_session.status, StatusCode::FORBIDDEN);

    let listed = app.get("/api/v1/sessions", &app.instructor_token()).await;
    assert_eq!(listed.body["results"], 2);
}
