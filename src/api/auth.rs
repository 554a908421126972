use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::{security, state::AppState};
use crate::repositories;
use crate::schemas::auth::{TokenResponse, UserResponse, UserSelect};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/select-user", post(select_user)).route("/me", get(me))
}

/// Selection login: no password, the caller just names a user and gets
/// a bearer token for it.
async fn select_user(
    State(state): State<AppState>,
    Json(payload): Json<UserSelect>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = repositories::users::find_by_id(state.store(), &payload.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let token = security::create_access_token(&user.id, user.role, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_model(user),
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_model(user))
}
