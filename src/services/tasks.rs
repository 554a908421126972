use time::OffsetDateTime;
use uuid::Uuid;

use crate::repositories;
use crate::services::ServiceError;
use crate::store::models::Task;
use crate::store::ItemStore;

pub(crate) struct NewTask {
    pub(crate) subject_id: String,
    pub(crate) title: String,
    pub(crate) due_at: OffsetDateTime,
    pub(crate) expires_at: OffsetDateTime,
}

/// Tasks are immutable after creation, so the date ordering only needs
/// to be checked here.
pub(crate) async fn create_task(
    store: &dyn ItemStore,
    now: OffsetDateTime,
    new_task: NewTask,
) -> Result<Task, ServiceError> {
    if new_task.expires_at <= new_task.due_at {
        return Err(ServiceError::InvalidArgument(
            "expires_at must be strictly later than due_at".to_string(),
        ));
    }

    let task = Task {
        id: Uuid::new_v4().to_string(),
        subject_id: new_task.subject_id,
        title: new_task.title,
        created_at: now,
        due_at: new_task.due_at,
        expires_at: new_task.expires_at,
    };

    repositories::tasks::create(store, &task).await?;
    Ok(task)
}
