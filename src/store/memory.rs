use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::store::{Item, ItemStore, StoreError, Table};

/// Test double for the key-value collaborator. Mirrors DynamoDB
/// semantics closely enough for the coordinator: `put` replaces by
/// primary key, secondary-index queries are plain attribute filters.
#[derive(Debug, Default)]
pub(crate) struct InMemoryStore {
    tables: RwLock<HashMap<Table, Vec<Item>>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self, table: Table) -> usize {
        self.tables.read().expect("store lock").get(&table).map_or(0, Vec::len)
    }
}

fn matches(item: &Item, key: &[(&str, &str)]) -> bool {
    key.iter().all(|(attr, value)| {
        item.get(*attr).and_then(|v| v.as_str()).is_some_and(|v| v == *value)
    })
}

fn same_primary_key(table: Table, a: &Item, b: &Item) -> bool {
    table.primary_key().iter().all(|attr| a.get(*attr) == b.get(*attr))
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn get(&self, table: Table, key: &[(&str, &str)]) -> Result<Option<Item>, StoreError> {
        let tables = self.tables.read().expect("store lock");
        Ok(tables
            .get(&table)
            .and_then(|items| items.iter().find(|item| matches(item, key)).cloned()))
    }

    async fn put(&self, table: Table, item: Item) -> Result<(), StoreError> {
        let mut tables = self.tables.write().expect("store lock");
        let items = tables.entry(table).or_default();
        items.retain(|existing| !same_primary_key(table, existing, &item));
        items.push(item);
        Ok(())
    }

    async fn delete(&self, table: Table, key: &[(&str, &str)]) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().expect("store lock");
        let Some(items) = tables.get_mut(&table) else {
            return Ok(false);
        };
        let before = items.len();
        items.retain(|item| !matches(item, key));
        Ok(items.len() < before)
    }

    async fn query_index(
        &self,
        table: Table,
        _index: &str,
        key: &[(&str, &str)],
    ) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read().expect("store lock");
        Ok(tables
            .get(&table)
            .map(|items| items.iter().filter(|item| matches(item, key)).cloned().collect())
            .unwrap_or_default())
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
