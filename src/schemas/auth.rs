use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::models::User;
use crate::store::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserSelect {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub(crate) user_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) user: UserResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) user_id: String,
    pub(crate) name: String,
    pub(crate) role: UserRole,
}

impl UserResponse {
    pub(crate) fn from_model(user: User) -> Self {
        Self { user_id: user.id, name: user.name, role: user.role }
    }
}
