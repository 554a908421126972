use crate::store::models::User;
use crate::store::types::UserRole;
use crate::store::{Item, ItemStore, StoreError, Table};

use super::require_str;

pub(crate) async fn find_by_id(
    store: &dyn ItemStore,
    id: &str,
) -> Result<Option<User>, StoreError> {
    store.get(Table::Users, &[("user_id", id)]).await?.map(from_item).transpose()
}

fn from_item(item: Item) -> Result<User, StoreError> {
    let role_raw = require_str(Table::Users, &item, "role")?;
    let role = UserRole::parse(&role_raw)
        .ok_or_else(|| StoreError::corrupt(Table::Users, format!("unknown role {role_raw}")))?;

    Ok(User {
        id: require_str(Table::Users, &item, "user_id")?,
        name: require_str(Table::Users, &item, "name")?,
        role,
    })
}
