use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::models::Enrollment;

/// Self-enrollment: the student comes from the bearer token.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EnrollmentRequest {
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
}

/// Staff enrolling a specific student.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EnrollmentCreate {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub(crate) user_id: String,
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) user_id: String,
    pub(crate) subject_id: String,
}

impl EnrollmentResponse {
    pub(crate) fn from_model(enrollment: Enrollment) -> Self {
        Self { user_id: enrollment.user_id, subject_id: enrollment.subject_id }
    }
}
