use crate::store::models::Enrollment;
use crate::store::{Item, ItemStore, StoreError, Table, USER_SUBJECT_INDEX};

use super::{put_str, require_str};

pub(crate) async fn find(
    store: &dyn ItemStore,
    subject_id: &str,
    user_id: &str,
) -> Result<Option<Enrollment>, StoreError> {
    store
        .get(Table::Enrollments, &[("subject_id", subject_id), ("user_id", user_id)])
        .await?
        .map(from_item)
        .transpose()
}

pub(crate) async fn list_for_user(
    store: &dyn ItemStore,
    user_id: &str,
) -> Result<Vec<Enrollment>, StoreError> {
    store
        .query_index(Table::Enrollments, USER_SUBJECT_INDEX, &[("user_id", user_id)])
        .await?
        .into_iter()
        .map(from_item)
        .collect()
}

pub(crate) async fn create(
    store: &dyn ItemStore,
    enrollment: &Enrollment,
) -> Result<(), StoreError> {
    let mut item = Item::new();
    put_str(&mut item, "subject_id", &enrollment.subject_id);
    put_str(&mut item, "user_id", &enrollment.user_id);
    store.put(Table::Enrollments, item).await
}

fn from_item(item: Item) -> Result<Enrollment, StoreError> {
    Ok(Enrollment {
        user_id: require_str(Table::Enrollments, &item, "user_id")?,
        subject_id: require_str(Table::Enrollments, &item, "subject_id")?,
    })
}
