use crate::store::models::Task;
use crate::store::{Item, ItemStore, StoreError, Table, SUBJECT_TASKS_INDEX};

use super::{put_str, put_timestamp, require_str, require_timestamp};

pub(crate) async fn find_by_id(
    store: &dyn ItemStore,
    id: &str,
) -> Result<Option<Task>, StoreError> {
    store.get(Table::Tasks, &[("task_id", id)]).await?.map(from_item).transpose()
}

pub(crate) async fn list_by_subject(
    store: &dyn ItemStore,
    subject_id: &str,
) -> Result<Vec<Task>, StoreError> {
    store
        .query_index(Table::Tasks, SUBJECT_TASKS_INDEX, &[("subject_id", subject_id)])
        .await?
        .into_iter()
        .map(from_item)
        .collect()
}

pub(crate) async fn create(store: &dyn ItemStore, task: &Task) -> Result<(), StoreError> {
    store.put(Table::Tasks, to_item(task)).await
}

fn from_item(item: Item) -> Result<Task, StoreError> {
    Ok(Task {
        id: require_str(Table::Tasks, &item, "task_id")?,
        subject_id: require_str(Table::Tasks, &item, "subject_id")?,
        title: require_str(Table::Tasks, &item, "title")?,
        created_at: require_timestamp(Table::Tasks, &item, "created_at")?,
        due_at: require_timestamp(Table::Tasks, &item, "due_at")?,
        expires_at: require_timestamp(Table::Tasks, &item, "expires_at")?,
    })
}

fn to_item(task: &Task) -> Item {
    let mut item = Item::new();
    put_str(&mut item, "task_id", &task.id);
    put_str(&mut item, "subject_id", &task.subject_id);
    put_str(&mut item, "title", &task.title);
    put_timestamp(&mut item, "created_at", task.created_at);
    put_timestamp(&mut item, "due_at", task.due_at);
    put_timestamp(&mut item, "expires_at", task.expires_at);
    item
}
