use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use crate::core::config::Settings;
use crate::store::{Item, ItemStore, StoreError, Table};

#[derive(Debug, Clone)]
pub(crate) struct DynamoStore {
    client: Client,
    tables: TableNames,
}

#[derive(Debug, Clone)]
struct TableNames {
    users: String,
    tasks: String,
    submissions: String,
    enrollments: String,
}

impl DynamoStore {
    pub(crate) async fn from_settings(settings: &Settings) -> Self {
        let dynamodb = settings.dynamodb();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(dynamodb.region.clone()));
        if let Some(endpoint) = dynamodb.endpoint.clone() {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        Self {
            client: Client::new(&config),
            tables: TableNames {
                users: dynamodb.users_table.clone(),
                tasks: dynamodb.tasks_table.clone(),
                submissions: dynamodb.submissions_table.clone(),
                enrollments: dynamodb.enrollments_table.clone(),
            },
        }
    }

    fn table_name(&self, table: Table) -> &str {
        match table {
            Table::Users => &self.tables.users,
            Table::Tasks => &self.tables.tasks,
            Table::Submissions => &self.tables.submissions,
            Table::Enrollments => &self.tables.enrollments,
        }
    }
}

#[async_trait]
impl ItemStore for DynamoStore {
    async fn get(&self, table: Table, key: &[(&str, &str)]) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(self.table_name(table))
            .set_key(Some(key_map(key)))
            .send()
            .await
            .map_err(|err| StoreError::backend(table, err))?;

        output.item.map(|attrs| from_attrs(table, attrs)).transpose()
    }

    async fn put(&self, table: Table, item: Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(self.table_name(table))
            .set_item(Some(to_attrs(table, &item)?))
            .send()
            .await
            .map_err(|err| StoreError::backend(table, err))?;

        Ok(())
    }

    async fn delete(&self, table: Table, key: &[(&str, &str)]) -> Result<bool, StoreError> {
        let output = self
            .client
            .delete_item()
            .table_name(self.table_name(table))
            .set_key(Some(key_map(key)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|err| StoreError::backend(table, err))?;

        Ok(output.attributes.is_some_and(|attrs| !attrs.is_empty()))
    }

    async fn query_index(
        &self,
        table: Table,
        index: &str,
        key: &[(&str, &str)],
    ) -> Result<Vec<Item>, StoreError> {
        let mut request =
            self.client.query().table_name(self.table_name(table)).index_name(index);

        let mut conditions = Vec::with_capacity(key.len());
        for (pos, (attr, value)) in key.iter().enumerate() {
            let name_placeholder = format!("#k{pos}");
            let value_placeholder = format!(":v{pos}");
            conditions.push(format!("{name_placeholder} = {value_placeholder}"));
            request = request
                .expression_attribute_names(name_placeholder, attr.to_string())
                .expression_attribute_values(
                    value_placeholder,
                    AttributeValue::S(value.to_string()),
                );
        }

        let output = request
            .key_condition_expression(conditions.join(" AND "))
            .send()
            .await
            .map_err(|err| StoreError::backend(table, err))?;

        output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|attrs| from_attrs(table, attrs))
            .collect()
    }

    async fn health(&self) -> Result<(), StoreError> {
        self.client
            .list_tables()
            .limit(1)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| StoreError::Backend { table: "dynamodb", message: err.to_string() })
    }
}

fn key_map(key: &[(&str, &str)]) -> HashMap<String, AttributeValue> {
    key.iter()
        .map(|(attr, value)| (attr.to_string(), AttributeValue::S(value.to_string())))
        .collect()
}

fn to_attrs(table: Table, item: &Item) -> Result<HashMap<String, AttributeValue>, StoreError> {
    let mut attrs = HashMap::with_capacity(item.len());
    for (name, value) in item {
        let attr = match value {
            serde_json::Value::String(s) => AttributeValue::S(s.clone()),
            serde_json::Value::Number(n) => AttributeValue::N(n.to_string()),
            serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
            serde_json::Value::Null => AttributeValue::Null(true),
            other => {
                return Err(StoreError::corrupt(
                    table,
                    format!("attribute {name} has unsupported type: {other}"),
                ))
            }
        };
        attrs.insert(name.clone(), attr);
    }
    Ok(attrs)
}

fn from_attrs(table: Table, attrs: HashMap<String, AttributeValue>) -> Result<Item, StoreError> {
    let mut item = Item::new();
    for (name, attr) in attrs {
        let value = match attr {
            AttributeValue::S(s) => serde_json::Value::String(s),
            AttributeValue::N(raw) => raw
                .parse::<serde_json::Number>()
                .map(serde_json::Value::Number)
                .map_err(|_| {
                    StoreError::corrupt(table, format!("attribute {name} is not numeric"))
                })?,
            AttributeValue::Bool(b) => serde_json::Value::Bool(b),
            AttributeValue::Null(_) => serde_json::Value::Null,
            _ => {
                return Err(StoreError::corrupt(
                    table,
                    format!("attribute {name} has unsupported DynamoDB type"),
                ))
            }
        };
        item.insert(name, value);
    }
    Ok(item)
}
