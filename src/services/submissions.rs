use std::time::Duration;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::repositories;
use crate::services::storage::BlobStore;
use crate::services::submission_status::resolve_status;
use crate::services::ServiceError;
use crate::store::models::{Submission, Task, User};
use crate::store::types::{SubmissionStatus, UserRole};
use crate::store::ItemStore;

#[derive(Debug)]
pub(crate) struct UploadIntent {
    pub(crate) upload_url: String,
    pub(crate) object_key: String,
    pub(crate) submission: Option<Submission>,
}

pub(crate) struct TaskWithStatus {
    pub(crate) task: Task,
    pub(crate) status: SubmissionStatus,
    pub(crate) submission: Option<Submission>,
}

/// Registers the intent to upload and hands back a presigned PUT URL.
///
/// The record is written only for students, and only after the URL has
/// been produced: a presign failure aborts with nothing persisted,
/// while a client that never completes its upload leaves a record
/// behind. There is no existing-submission check either; registering
/// twice for the same task writes a second record and the object key is
/// simply overwritten at the blob layer. The read path collapses such
/// duplicates, see [`submission_for`].
pub(crate) async fn register_upload_intent(
    store: &dyn ItemStore,
    storage: Option<&dyn BlobStore>,
    now: OffsetDateTime,
    url_ttl: Duration,
    user: &User,
    task_id: &str,
    file_name: &str,
    content_type: &str,
) -> Result<UploadIntent, ServiceError> {
    let task = repositories::tasks::find_by_id(store, task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("task not found".to_string()))?;

    let object_key = submission_object_key(&task.subject_id, task_id, &user.id, file_name);

    let storage = storage.ok_or(ServiceError::Upstream {
        context: "upload URL generation failed",
        message: "blob storage is not configured".to_string(),
    })?;
    let upload_url = storage
        .presign_put(&object_key, content_type, url_ttl)
        .await
        .map_err(|err| ServiceError::upstream("upload URL generation failed", err))?;

    let submission = if user.role == UserRole::Student {
        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.to_string(),
            user_id: user.id.clone(),
            subject_id: task.subject_id.clone(),
            created_at: now,
            object_key: object_key.clone(),
        };
        repositories::submissions::create(store, &submission)
            .await
            .map_err(|err| ServiceError::upstream("submission registration failed", err))?;
        Some(submission)
    } else {
        // Staff preview uploads get the same URL with no persisted record.
        None
    };

    Ok(UploadIntent { upload_url, object_key, submission })
}

/// Deletes a submission and its blob object while the task window is
/// still open.
///
/// A submission owned by someone else is reported exactly like a
/// missing one, so callers cannot probe for existence. The blob object
/// goes first: if that fails, the record survives and still points at
/// the orphaned object.
pub(crate) async fn delete_submission(
    store: &dyn ItemStore,
    storage: Option<&dyn BlobStore>,
    now: OffsetDateTime,
    submission_id: &str,
    requesting_user_id: &str,
) -> Result<(), ServiceError> {
    let submission = match repositories::submissions::find_by_id(store, submission_id).await? {
        Some(submission) if submission.user_id == requesting_user_id => submission,
        _ => return Err(ServiceError::NotFound("submission not found".to_string())),
    };

    let task = repositories::tasks::find_by_id(store, &submission.task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("task for submission not found".to_string()))?;

    if now > task.expires_at {
        return Err(ServiceError::Forbidden(
            "submissions cannot be deleted after the task has expired",
        ));
    }

    let storage = storage.ok_or(ServiceError::Upstream {
        context: "blob object deletion failed, submission record kept",
        message: "blob storage is not configured".to_string(),
    })?;
    storage.delete_object(&submission.object_key).await.map_err(|err| {
        ServiceError::upstream("blob object deletion failed, submission record kept", err)
    })?;

    repositories::submissions::delete(store, submission_id).await.map_err(|err| {
        ServiceError::upstream("submission record deletion failed after blob removal", err)
    })?;

    Ok(())
}

/// At most one submission per (user, task). Racing registrations can
/// leave duplicates in the store; the newest by creation time wins, id
/// as tiebreak, so reads stay deterministic.
pub(crate) async fn submission_for(
    store: &dyn ItemStore,
    user_id: &str,
    task_id: &str,
) -> Result<Option<Submission>, ServiceError> {
    let mut found = repositories::submissions::list_for_user_task(store, user_id, task_id).await?;
    found.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
    Ok(found.pop())
}

/// Every task across the user's enrolled subjects, each with its
/// resolved status and the submission backing it, if any.
pub(crate) async fn list_task_statuses(
    store: &dyn ItemStore,
    now: OffsetDateTime,
    user_id: &str,
) -> Result<Vec<TaskWithStatus>, ServiceError> {
    let enrollments = repositories::enrollments::list_for_user(store, user_id).await?;

    let mut result = Vec::new();
    for enrollment in enrollments {
        let tasks = repositories::tasks::list_by_subject(store, &enrollment.subject_id).await?;
        for task in tasks {
            let submission = submission_for(store, user_id, &task.id).await?;
            let status = resolve_status(now, &task, submission.as_ref());
            result.push(TaskWithStatus { task, status, submission });
        }
    }
    Ok(result)
}

/// Deterministic object key scoped by subject, task, and user. Distinct
/// users or tasks can never collide; the same user re-uploading to the
/// same task overwrites, last writer wins.
pub(crate) fn submission_object_key(
    subject_id: &str,
    task_id: &str,
    user_id: &str,
    file_name: &str,
) -> String {
    format!("submissions/{subject_id}/{task_id}/{user_id}/{}", sanitized_filename(file_name))
}

fn sanitized_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}
