use axum::http::{Method, StatusCode};
use serde_json::json;
use time::Duration;
use tower::ServiceExt;

use crate::core::time::now_utc;
use crate::store::types::UserRole;
use crate::store::Table;
use crate::test_support;

#[tokio::test]
async fn task_list_covers_all_enrolled_subjects_with_statuses() {
    let ctx = test_support::setup_test_context().await;
    let now = now_utc();
    test_support::insert_user(ctx.store.as_ref(), "u1", "Ana", UserRole::Student).await;
    test_support::enroll(ctx.store.as_ref(), "u1", "s1").await;
    test_support::enroll(ctx.store.as_ref(), "u1", "s2").await;

    // s1: one task still open, one past its hard cutoff.
    test_support::insert_task(
        ctx.store.as_ref(),
        "open",
        "s1",
        now + Duration::days(5),
        now + Duration::days(10),
    )
    .await;
    test_support::insert_task(
        ctx.store.as_ref(),
        "closed",
        "s1",
        now - Duration::days(10),
        now - Duration::days(5),
    )
    .await;
    // s2: in the late window.
    test_support::insert_task(
        ctx.store.as_ref(),
        "late",
        "s2",
        now - Duration::days(1),
        now + Duration::days(5),
    )
    .await;
    // Unenrolled subjects never show up.
    test_support::insert_task(
        ctx.store.as_ref(),
        "other",
        "s3",
        now + Duration::days(5),
        now + Duration::days(10),
    )
    .await;

    let token = test_support::bearer_token("u1", UserRole::Student, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/student/tasks",
            Some(&token),
            None,
        ))
        .await
        .expect("task list");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let listed = body.as_array().expect("array");
    assert_eq!(listed.len(), 3);
    let status_of = |task_id: &str| {
        listed
            .iter()
            .find(|entry| entry["task_id"] == task_id)
            .unwrap_or_else(|| panic!("task {task_id} missing"))["status"]
            .clone()
    };
    assert_eq!(status_of("open"), "pending");
    assert_eq!(status_of("closed"), "inactive");
    assert_eq!(status_of("late"), "expired");
}

#[tokio::test]
async fn registering_an_upload_flips_the_listed_status_to_delivered() {
    let ctx = test_support::setup_test_context().await;
    let now = now_utc();
    test_support::insert_user(ctx.store.as_ref(), "u1", "Ana", UserRole::Student).await;
    test_support::enroll(ctx.store.as_ref(), "u1", "s1").await;
    // Past due but before the hard cutoff: late uploads still count.
    test_support::insert_task(
        ctx.store.as_ref(),
        "t1",
        "s1",
        now - Duration::days(1),
        now + Duration::days(5),
    )
    .await;
    let token = test_support::bearer_token("u1", UserRole::Student, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/student/tasks",
            Some(&token),
            None,
        ))
        .await
        .expect("task list");
    let body = test_support::read_json(response).await;
    assert_eq!(body[0]["status"], "expired");
    assert!(body[0]["submission"].is_null());

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/tasks/t1/upload-url",
            Some(&token),
            Some(json!({"file_name": "late.pdf", "content_type": "application/pdf"})),
        ))
        .await
        .expect("upload url");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/student/tasks",
            Some(&token),
            None,
        ))
        .await
        .expect("task list");
    let body = test_support::read_json(response).await;
    assert_eq!(body[0]["status"], "delivered");
    assert_eq!(body[0]["submission"]["user_id"], "u1");
}

#[tokio::test]
async fn task_list_is_student_only() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_user(ctx.store.as_ref(), "prof", "Prof. Ruiz", UserRole::Teacher).await;
    let token = test_support::bearer_token("prof", UserRole::Teacher, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/student/tasks",
            Some(&token),
            None,
        ))
        .await
        .expect("task list");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_can_delete_submission_while_window_is_open() {
    let ctx = test_support::setup_test_context().await;
    let now = now_utc();
    test_support::insert_user(ctx.store.as_ref(), "u1", "Ana", UserRole::Student).await;
    test_support::insert_task(
        ctx.store.as_ref(),
        "t1",
        "s1",
        now + Duration::days(5),
        now + Duration::days(10),
    )
    .await;
    let token = test_support::bearer_token("u1", UserRole::Student, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/tasks/t1/upload-url",
            Some(&token),
            Some(json!({"file_name": "report.pdf", "content_type": "application/pdf"})),
        ))
        .await
        .expect("upload url");
    let body = test_support::read_json(response).await;
    let submission_id = body["submission"]["submission_id"].as_str().expect("id").to_string();
    let object_key = body["object_key"].as_str().expect("key").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/student/submissions/{submission_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(ctx.store.len(Table::Submissions), 0);
    assert_eq!(ctx.blob.deleted(), vec![object_key]);
}

#[tokio::test]
async fn deleting_someone_elses_submission_reads_as_missing() {
    let ctx = test_support::setup_test_context().await;
    let now = now_utc();
    test_support::insert_user(ctx.store.as_ref(), "u1", "Ana", UserRole::Student).await;
    test_support::insert_user(ctx.store.as_ref(), "u2", "Luis", UserRole::Student).await;
    test_support::insert_task(
        ctx.store.as_ref(),
        "t1",
        "s1",
        now + Duration::days(5),
        now + Duration::days(10),
    )
    .await;

    let owner_token = test_support::bearer_token("u1", UserRole::Student, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/tasks/t1/upload-url",
            Some(&owner_token),
            Some(json!({"file_name": "report.pdf", "content_type": "application/pdf"})),
        ))
        .await
        .expect("upload url");
    let body = test_support::read_json(response).await;
    let submission_id = body["submission"]["submission_id"].as_str().expect("id").to_string();

    let other_token = test_support::bearer_token("u2", UserRole::Student, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/student/submissions/{submission_id}"),
            Some(&other_token),
            None,
        ))
        .await
        .expect("delete");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.store.len(Table::Submissions), 1);
}

#[tokio::test]
async fn deletion_is_forbidden_after_the_hard_cutoff() {
    let ctx = test_support::setup_test_context().await;
    let now = now_utc();
    test_support::insert_user(ctx.store.as_ref(), "u1", "Ana", UserRole::Student).await;
    // Window fully closed; registration itself has no timing gate.
    test_support::insert_task(
        ctx.store.as_ref(),
        "t1",
        "s1",
        now - Duration::days(10),
        now - Duration::days(5),
    )
    .await;
    let token = test_support::bearer_token("u1", UserRole::Student, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/tasks/t1/upload-url",
            Some(&token),
            Some(json!({"file_name": "late.pdf", "content_type": "application/pdf"})),
        ))
        .await
        .expect("upload url");
    let body = test_support::read_json(response).await;
    let submission_id = body["submission"]["submission_id"].as_str().expect("id").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/student/submissions/{submission_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(ctx.store.len(Table::Submissions), 1);
    assert!(ctx.blob.deleted().is_empty());
}

#[tokio::test]
async fn self_enrollment_conflicts_on_duplicates() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_user(ctx.store.as_ref(), "u1", "Ana", UserRole::Student).await;
    let token = test_support::bearer_token("u1", UserRole::Student, ctx.state.settings());

    let payload = json!({"subject_id": "s1"});
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/student/enrollments",
            Some(&token),
            Some(payload.clone()),
        ))
        .await
        .expect("enroll");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["subject_id"], "s1");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/student/enrollments",
            Some(&token),
            Some(payload),
        ))
        .await
        .expect("enroll again");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
