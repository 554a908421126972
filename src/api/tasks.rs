use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStaff, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::schemas::submission::{SubmissionResponse, UploadUrlRequest, UploadUrlResponse};
use crate::schemas::task::{TaskCreate, TaskResponse};
use crate::services;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_task)).route("/:task_id/upload-url", post(upload_url))
}

async fn create_task(
    CurrentStaff(_user): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let task = services::tasks::create_task(
        state.store(),
        now_utc(),
        services::tasks::NewTask {
            subject_id: payload.subject_id,
            title: payload.title,
            due_at: payload.due_at,
            expires_at: payload.expires_at,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from_model(task))))
}

/// Any authenticated user can request an upload URL; only students
/// leave a submission record behind.
async fn upload_url(
    Path(task_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let url_ttl = Duration::from_secs(state.settings().uploads().presigned_url_expire_seconds);
    let intent = services::submissions::register_upload_intent(
        state.store(),
        state.storage(),
        now_utc(),
        url_ttl,
        &user,
        &task_id,
        &payload.file_name,
        &payload.content_type,
    )
    .await?;

    Ok(Json(UploadUrlResponse {
        upload_url: intent.upload_url,
        object_key: intent.object_key,
        method: "PUT",
        submission: intent.submission.map(SubmissionResponse::from_model),
    }))
}
