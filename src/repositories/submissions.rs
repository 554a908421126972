use crate::store::models::Submission;
use crate::store::{Item, ItemStore, StoreError, Table, USER_TASK_INDEX};

use super::{put_str, put_timestamp, require_str, require_timestamp};

pub(crate) async fn find_by_id(
    store: &dyn ItemStore,
    id: &str,
) -> Result<Option<Submission>, StoreError> {
    store.get(Table::Submissions, &[("submission_id", id)]).await?.map(from_item).transpose()
}

/// All records for one (user, task) pair. More than one can exist when
/// registrations raced; callers collapse the list, this adapter does not.
pub(crate) async fn list_for_user_task(
    store: &dyn ItemStore,
    user_id: &str,
    task_id: &str,
) -> Result<Vec<Submission>, StoreError> {
    store
        .query_index(
            Table::Submissions,
            USER_TASK_INDEX,
            &[("user_id", user_id), ("task_id", task_id)],
        )
        .await?
        .into_iter()
        .map(from_item)
        .collect()
}

pub(crate) async fn create(
    store: &dyn ItemStore,
    submission: &Submission,
) -> Result<(), StoreError> {
    store.put(Table::Submissions, to_item(submission)).await
}

pub(crate) async fn delete(store: &dyn ItemStore, id: &str) -> Result<bool, StoreError> {
    store.delete(Table::Submissions, &[("submission_id", id)]).await
}

fn from_item(item: Item) -> Result<Submission, StoreError> {
    Ok(Submission {
        id: require_str(Table::Submissions, &item, "submission_id")?,
        task_id: require_str(Table::Submissions, &item, "task_id")?,
        user_id: require_str(Table::Submissions, &item, "user_id")?,
        subject_id: require_str(Table::Submissions, &item, "subject_id")?,
        created_at: require_timestamp(Table::Submissions, &item, "created_at")?,
        object_key: require_str(Table::Submissions, &item, "object_key")?,
    })
}

fn to_item(submission: &Submission) -> Item {
    let mut item = Item::new();
    put_str(&mut item, "submission_id", &submission.id);
    put_str(&mut item, "task_id", &submission.task_id);
    put_str(&mut item, "user_id", &submission.user_id);
    put_str(&mut item, "subject_id", &submission.subject_id);
    put_timestamp(&mut item, "created_at", submission.created_at);
    put_str(&mut item, "object_key", &submission.object_key);
    item
}
