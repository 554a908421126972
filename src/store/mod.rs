use async_trait::async_trait;
use thiserror::Error;

pub(crate) mod dynamo;
#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod models;
pub(crate) mod types;

/// Secondary index names. These match the GSIs provisioned on the
/// DynamoDB tables; the in-memory store ignores them and filters on the
/// key conditions directly.
pub(crate) const USER_TASK_INDEX: &str = "user-task-index";
pub(crate) const SUBJECT_TASKS_INDEX: &str = "subject-tasks-index";
pub(crate) const USER_SUBJECT_INDEX: &str = "user-subject-index";

/// A record as it crosses the store boundary: flat attribute map with
/// timestamps as RFC 3339 strings. Typed models live in [`models`]; the
/// repositories convert between the two.
pub(crate) type Item = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Table {
    Users,
    Tasks,
    Submissions,
    Enrollments,
}

impl Table {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Tasks => "tasks",
            Table::Submissions => "submissions",
            Table::Enrollments => "enrollments",
        }
    }

    /// Primary key attributes, in key order. Enrollments use a composite
    /// (subject_id, user_id) key; everything else a single id.
    pub(crate) fn primary_key(self) -> &'static [&'static str] {
        match self {
            Table::Users => &["user_id"],
            Table::Tasks => &["task_id"],
            Table::Submissions => &["submission_id"],
            Table::Enrollments => &["subject_id", "user_id"],
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("{table} store request failed: {message}")]
    Backend { table: &'static str, message: String },
    #[error("malformed {table} item: {message}")]
    Corrupt { table: &'static str, message: String },
}

impl StoreError {
    pub(crate) fn backend(table: Table, err: impl std::fmt::Display) -> Self {
        StoreError::Backend { table: table.as_str(), message: err.to_string() }
    }

    pub(crate) fn corrupt(table: Table, message: impl Into<String>) -> Self {
        StoreError::Corrupt { table: table.as_str(), message: message.into() }
    }
}

/// Narrow key-value collaborator interface. Injected everywhere a handle
/// is needed so tests can substitute [`memory::InMemoryStore`].
#[async_trait]
pub(crate) trait ItemStore: Send + Sync {
    async fn get(&self, table: Table, key: &[(&str, &str)]) -> Result<Option<Item>, StoreError>;

    /// Unconditional write; an item with the same primary key is replaced.
    async fn put(&self, table: Table, item: Item) -> Result<(), StoreError>;

    /// Returns whether an item was actually removed.
    async fn delete(&self, table: Table, key: &[(&str, &str)]) -> Result<bool, StoreError>;

    async fn query_index(
        &self,
        table: Table,
        index: &str,
        key: &[(&str, &str)],
    ) -> Result<Vec<Item>, StoreError>;

    async fn health(&self) -> Result<(), StoreError>;
}
