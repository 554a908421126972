//! Boundary adapters between typed models and the key-value store.
//! Timestamps live in the store as RFC 3339 strings; parsing and
//! formatting happen here and nowhere else.

use time::OffsetDateTime;

use crate::core::time::{format_timestamp, parse_timestamp};
use crate::store::{Item, StoreError, Table};

pub(crate) mod enrollments;
pub(crate) mod submissions;
pub(crate) mod tasks;
pub(crate) mod users;

fn require_str(table: Table, item: &Item, attr: &str) -> Result<String, StoreError> {
    item.get(attr)
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| StoreError::corrupt(table, format!("missing attribute {attr}")))
}

fn require_timestamp(table: Table, item: &Item, attr: &str) -> Result<OffsetDateTime, StoreError> {
    let raw = require_str(table, item, attr)?;
    parse_timestamp(&raw)
        .ok_or_else(|| StoreError::corrupt(table, format!("attribute {attr} is not RFC 3339")))
}

fn put_str(item: &mut Item, attr: &str, value: &str) {
    item.insert(attr.to_string(), serde_json::Value::String(value.to_string()));
}

fn put_timestamp(item: &mut Item, attr: &str, value: OffsetDateTime) {
    item.insert(attr.to_string(), serde_json::Value::String(format_timestamp(value)));
}
