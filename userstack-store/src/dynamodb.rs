//! DynamoDB storage backend

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::{
    error::DisplayErrorContext,
    types::{AttributeValue, ReturnValue},
    Client,
};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::model::{User, UserUpdate};
use crate::traits::{RecordStore, StoreError};

const ID: &str = "id";
const NAME: &str = "name";
const EMAIL: &str = "email";
const CREATED_AT: &str = "createdAt";

type Item = HashMap<String, AttributeValue>;

/// Connection settings for [`DynamoDbStore::connect`]
#[derive(Debug, Clone, Default)]
pub struct DynamoDbStoreConfig {
    pub table_name: String,
    /// Override the service endpoint (DynamoDB Local, an emulator)
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
}

/// Record store backed by a DynamoDB table with an `id` string partition key
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client from the ambient AWS configuration (environment,
    /// profile, instance role) plus the given overrides
    pub async fn connect(config: DynamoDbStoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = config.region {
            loader = loader.region(Region::new(region));
        }
        if let Some(endpoint) = config.endpoint_url.as_deref() {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        info!(
            table = %config.table_name,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "Using DynamoDB record store"
        );
        Self::new(Client::new(&sdk_config), config.table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl RecordStore for DynamoDbStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(unavailable)?;

        debug!(count = output.count(), "Scanned users table");
        output.items().iter().map(item_to_user).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(unavailable)?;

        output.item().map(item_to_user).transpose()
    }

    async fn put(&self, user: User) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(user_to_item(&user)))
            .send()
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn update(&self, id: &str, update: UserUpdate) -> Result<User, StoreError> {
        // `name` is a DynamoDB reserved word, so every attribute goes through a placeholder
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ID, AttributeValue::S(id.to_string()))
            .update_expression("SET #name = :name, #email = :email")
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ID)
            .expression_attribute_names("#name", NAME)
            .expression_attribute_names("#email", EMAIL)
            .expression_attribute_values(":name", optional_string(update.name))
            .expression_attribute_values(":email", optional_string(update.email))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => output
                .attributes()
                .map(item_to_user)
                .unwrap_or_else(|| Err(malformed(id, "update returned no attributes"))),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(err) => Err(unavailable(err)),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Unavailable(DisplayErrorContext(err).to_string())
}

fn malformed(id: &str, reason: impl Into<String>) -> StoreError {
    StoreError::MalformedRecord {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn optional_string(value: Option<String>) -> AttributeValue {
    value.map_or(AttributeValue::Null(true), AttributeValue::S)
}

pub(crate) fn user_to_item(user: &User) -> Item {
    let mut item = Item::new();
    item.insert(ID.to_string(), AttributeValue::S(user.id.clone()));
    item.insert(NAME.to_string(), optional_string(user.name.clone()));
    item.insert(EMAIL.to_string(), optional_string(user.email.clone()));
    item.insert(
        CREATED_AT.to_string(),
        AttributeValue::S(user.created_at.clone()),
    );
    item
}

pub(crate) fn item_to_user(item: &Item) -> Result<User, StoreError> {
    let id = match item.get(ID) {
        Some(AttributeValue::S(id)) => id.clone(),
        _ => return Err(malformed("<unknown>", "missing string id")),
    };

    let created_at = match item.get(CREATED_AT) {
        Some(AttributeValue::S(ts)) => ts.clone(),
        _ => return Err(malformed(&id, "missing createdAt")),
    };

    Ok(User {
        name: read_optional(item, NAME, &id)?,
        email: read_optional(item, EMAIL, &id)?,
        id,
        created_at,
    })
}

fn read_optional(item: &Item, attribute: &str, id: &str) -> Result<Option<String>, StoreError> {
    match item.get(attribute) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(_) => Err(malformed(id, format!("{attribute} is not a string"))),
    }
}
