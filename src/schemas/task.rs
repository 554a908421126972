use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::core::time::{format_timestamp, parse_timestamp};
use crate::schemas::submission::SubmissionResponse;
use crate::store::models::Task;
use crate::store::types::SubmissionStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TaskCreate {
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: String,
    #[serde(deserialize_with = "deserialize_rfc3339")]
    pub(crate) due_at: OffsetDateTime,
    #[serde(deserialize_with = "deserialize_rfc3339")]
    pub(crate) expires_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub(crate) struct TaskResponse {
    pub(crate) task_id: String,
    pub(crate) subject_id: String,
    pub(crate) title: String,
    pub(crate) created_at: String,
    pub(crate) due_at: String,
    pub(crate) expires_at: String,
}

impl TaskResponse {
    pub(crate) fn from_model(task: Task) -> Self {
        Self {
            task_id: task.id,
            subject_id: task.subject_id,
            title: task.title,
            created_at: format_timestamp(task.created_at),
            due_at: format_timestamp(task.due_at),
            expires_at: format_timestamp(task.expires_at),
        }
    }
}

/// One row of the student's aggregated task list: the task, its derived
/// status, and the submission backing a `delivered` status.
#[derive(Debug, Serialize)]
pub(crate) struct StudentTaskResponse {
    #[serde(flatten)]
    pub(crate) task: TaskResponse,
    pub(crate) status: SubmissionStatus,
    pub(crate) submission: Option<SubmissionResponse>,
}

fn deserialize_rfc3339<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw}")))
}
