// src/infrastructure/dynamo.rs
use crate::application::{NoteRepository, ScanPage};
use crate::constants::{
    ATTR_IS_INCOMPLETE, ATTR_NOTE, ATTR_NOTE_ID, ATTR_USER_ID, INCOMPLETE_FLAG,
    TABLE_READ_CAPACITY, TABLE_WRITE_CAPACITY,
};
use crate::domain::{DomainError, Note, NoteKey, NoteRecord, ScanCursor};
use crate::infrastructure::attribute::{
    cursor_to_item, item_to_cursor, item_to_record, key_to_item, note_to_item,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::client::Waiters;
use aws_sdk_dynamodb::error::{BuildError, DisplayErrorContext};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ReturnValue, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};

fn db_error<E: Error>(operation: &str, err: E) -> DomainError {
    DomainError::Database(format!("{} failed: {}", operation, DisplayErrorContext(err)))
}

/// Notes table backed by DynamoDB
#[derive(Clone)]
pub struct DynamoNoteRepository {
    client: Client,
}

impl DynamoNoteRepository {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn key_schema() -> Result<(Vec<AttributeDefinition>, Vec<KeySchemaElement>), DomainError> {
        let build = |e: BuildError| db_error("CreateTable", e);
        let definitions = vec![
            AttributeDefinition::builder()
                .attribute_name(ATTR_USER_ID)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(build)?,
            AttributeDefinition::builder()
                .attribute_name(ATTR_NOTE_ID)
                .attribute_type(ScalarAttributeType::N)
                .build()
                .map_err(build)?,
        ];
        let schema = vec![
            KeySchemaElement::builder()
                .attribute_name(ATTR_USER_ID)
                .key_type(KeyType::Hash)
                .build()
                .map_err(build)?,
            KeySchemaElement::builder()
                .attribute_name(ATTR_NOTE_ID)
                .key_type(KeyType::Range)
                .build()
                .map_err(build)?,
        ];
        Ok((definitions, schema))
    }
}

#[async_trait]
impl NoteRepository for DynamoNoteRepository {
    #[instrument(level = "debug", skip(self))]
    async fn table_exists(&self, table: &str) -> Result<bool, DomainError> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_not_found_exception() {
                    debug!(table, "Table not found");
                    Ok(false)
                } else {
                    Err(db_error("DescribeTable", err))
                }
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_table(&self, table: &str) -> Result<String, DomainError> {
        let (definitions, schema) = Self::key_schema()?;
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(TABLE_READ_CAPACITY)
            .write_capacity_units(TABLE_WRITE_CAPACITY)
            .build()
            .map_err(|e| db_error("CreateTable", e))?;

        let output = self
            .client
            .create_table()
            .table_name(table)
            .set_attribute_definitions(Some(definitions))
            .set_key_schema(Some(schema))
            .provisioned_throughput(throughput)
            .send()
            .await
            .map_err(|e| db_error("CreateTable", e))?;

        let status = output
            .table_description()
            .and_then(|description| description.table_status())
            .map(|status| status.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        info!(table, %status, "Created table");
        Ok(status)
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_for_table(&self, table: &str, max_wait: Duration) -> Result<(), DomainError> {
        self.client
            .wait_until_table_exists()
            .table_name(table)
            .wait(max_wait)
            .await
            .map_err(|e| db_error("Waiting for table", e))?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn table_status(&self, table: &str) -> Result<String, DomainError> {
        let output = match self.client.describe_table().table_name(table).send().await {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                return Err(if err.is_resource_not_found_exception() {
                    DomainError::TableNotFound(table.to_string())
                } else {
                    db_error("DescribeTable", err)
                });
            }
        };

        Ok(output
            .table()
            .and_then(|description| description.table_status())
            .map(|status| status.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string()))
    }

    #[instrument(level = "trace", skip(self))]
    async fn put_note(&self, table: &str, note: &Note) -> Result<(), DomainError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(note_to_item(note)))
            .send()
            .await
            .map_err(|e| db_error("PutItem", e))?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn mark_incomplete(
        &self,
        table: &str,
        key: &NoteKey,
    ) -> Result<NoteRecord, DomainError> {
        let output = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_item(key)))
            .update_expression(format!("SET {} = :incomplete", ATTR_IS_INCOMPLETE))
            .expression_attribute_values(
                ":incomplete",
                AttributeValue::S(INCOMPLETE_FLAG.to_string()),
            )
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| db_error("UpdateItem", e))?;

        Ok(output
            .attributes()
            .map(item_to_record)
            .unwrap_or_default())
    }

    #[instrument(level = "debug", skip(self))]
    async fn query_notes(
        &self,
        table: &str,
        user_id: &str,
    ) -> Result<Vec<NoteRecord>, DomainError> {
        let mut pages = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression(format!("{} = :userId", ATTR_USER_ID))
            .expression_attribute_values(":userId", AttributeValue::S(user_id.to_string()))
            .projection_expression(format!("{}, {}", ATTR_NOTE_ID, ATTR_NOTE))
            .into_paginator()
            .send();

        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| db_error("Query", e))?;
            records.extend(page.items().iter().map(item_to_record));
        }
        debug!(count = records.len(), "Query returned");
        Ok(records)
    }

    #[instrument(level = "debug", skip(self))]
    async fn scan_page(
        &self,
        table: &str,
        page_size: u32,
        start: Option<ScanCursor>,
    ) -> Result<ScanPage, DomainError> {
        let limit = i32::try_from(page_size).map_err(|_| {
            DomainError::InvalidRequest(format!("page size {} is too large", page_size))
        })?;

        let output = self
            .client
            .scan()
            .table_name(table)
            .limit(limit)
            .set_exclusive_start_key(start.as_ref().map(cursor_to_item))
            .send()
            .await
            .map_err(|e| db_error("Scan", e))?;

        let next = output.last_evaluated_key().map(item_to_cursor).transpose()?;
        debug!(count = ?output.count(), ?next, "Scan page returned");

        Ok(ScanPage {
            records: output.items().iter().map(item_to_record).collect(),
            next,
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn lookup(&self, table: &str, key: &NoteKey) -> Result<Vec<NoteRecord>, DomainError> {
        let statement = format!(
            "SELECT * FROM \"{}\" WHERE {} = ? AND {} = ?",
            table, ATTR_USER_ID, ATTR_NOTE_ID
        );

        let output = self
            .client
            .execute_statement()
            .statement(statement)
            .parameters(AttributeValue::S(key.user_id.clone()))
            .parameters(AttributeValue::N(key.note_id.to_string()))
            .send()
            .await
            .map_err(|e| db_error("ExecuteStatement", e))?;

        Ok(output.items().iter().map(item_to_record).collect())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_table(&self, table: &str) -> Result<(), DomainError> {
        match self.client.delete_table().table_name(table).send().await {
            Ok(_) => {
                info!(table, "Deleted table");
                Ok(())
            }
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_not_found_exception() {
                    Err(DomainError::TableNotFound(table.to_string()))
                } else {
                    Err(db_error("DeleteTable", err))
                }
            }
        }
    }
}
