use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::schemas::enrollment::{EnrollmentRequest, EnrollmentResponse};
use crate::schemas::submission::SubmissionResponse;
use crate::schemas::task::{StudentTaskResponse, TaskResponse};
use crate::services;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/submissions/:submission_id", delete(delete_submission))
        .route("/enrollments", post(enroll))
}

/// Every task across the student's enrolled subjects, with its current
/// lifecycle status.
async fn list_tasks(
    CurrentStudent(user): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentTaskResponse>>, ApiError> {
    let listed =
        services::submissions::list_task_statuses(state.store(), now_utc(), &user.id).await?;

    Ok(Json(
        listed
            .into_iter()
            .map(|entry| StudentTaskResponse {
                task: TaskResponse::from_model(entry.task),
                status: entry.status,
                submission: entry.submission.map(SubmissionResponse::from_model),
            })
            .collect(),
    ))
}

async fn delete_submission(
    Path(submission_id): Path<String>,
    CurrentStudent(user): CurrentStudent,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    services::submissions::delete_submission(
        state.store(),
        state.storage(),
        now_utc(),
        &submission_id,
        &user.id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn enroll(
    CurrentStudent(user): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let enrollment =
        services::enrollments::enroll(state.store(), &user.id, &payload.subject_id).await?;

    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_model(enrollment))))
}

#[cfg(test)]
mod tests;
