use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::core::state::AppState;
use crate::schemas::enrollment::{EnrollmentCreate, EnrollmentResponse};
use crate::services;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(enroll_student))
}

async fn enroll_student(
    CurrentStaff(_user): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentCreate>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let enrollment =
        services::enrollments::enroll(state.store(), &payload.user_id, &payload.subject_id)
            .await?;

    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_model(enrollment))))
}
