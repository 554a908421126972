use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_timestamp;
use crate::store::models::Submission;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UploadUrlRequest {
    #[validate(length(min = 1, max = 255, message = "file_name must be 1-255 characters"))]
    pub(crate) file_name: String,
    #[validate(length(min = 1, message = "content_type must not be empty"))]
    pub(crate) content_type: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadUrlResponse {
    pub(crate) upload_url: String,
    pub(crate) object_key: String,
    pub(crate) method: &'static str,
    /// Present only when the caller is a student, whose upload intent is
    /// registered as a submission.
    pub(crate) submission: Option<SubmissionResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) submission_id: String,
    pub(crate) task_id: String,
    pub(crate) user_id: String,
    pub(crate) subject_id: String,
    pub(crate) created_at: String,
    pub(crate) object_key: String,
}

impl SubmissionResponse {
    pub(crate) fn from_model(submission: Submission) -> Self {
        Self {
            submission_id: submission.id,
            task_id: submission.task_id,
            user_id: submission.user_id,
            subject_id: submission.subject_id,
            created_at: format_timestamp(submission.created_at),
            object_key: submission.object_key,
        }
    }
}
