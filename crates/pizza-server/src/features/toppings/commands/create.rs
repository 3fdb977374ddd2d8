//! Create topping command
//!
//! The name is checked against every existing topping case-insensitively
//! before the insert; the unique index settles any race that slips past
//! the check.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::topping_name_taken;
use crate::db;
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{check_name, validate_name, FieldErrors};
use crate::features::toppings::types::{ToppingRecord, TOPPING_FIELD};

/// Command to create a new topping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateToppingCommand {
    pub topping: String,
}

/// Errors that can occur when creating a topping
#[derive(Debug, thiserror::Error)]
pub enum CreateToppingError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Topping '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateToppingCommand {
    /// Build the command from a request body
    pub fn from_payload(object: &Map<String, Value>) -> Result<Self, CreateToppingError> {
        let mut errors = FieldErrors::default();
        match validate_name(object, TOPPING_FIELD, &mut errors) {
            Some(topping) => Ok(Self { topping }),
            None => Err(CreateToppingError::Validation(errors)),
        }
    }

    pub fn validate(&self) -> Result<(), CreateToppingError> {
        check_name(&self.topping).map_err(|message| {
            CreateToppingError::Validation(FieldErrors::single(TOPPING_FIELD, message))
        })
    }
}

#[tracing::instrument(skip(pool, command), fields(topping = %command.topping))]
pub async fn handle(
    pool: SqlitePool,
    command: CreateToppingCommand,
) -> Result<ToppingRecord, CreateToppingError> {
    command.validate()?;

    let mut tx = db::begin_write(&pool).await?;

    if topping_name_taken(&mut tx, &command.topping, None).await? {
        return Err(CreateToppingError::DuplicateName(command.topping));
    }

    let record = sqlx::query_as::<_, ToppingRecord>(
        "INSERT INTO toppings (name) VALUES (?) RETURNING id, name",
    )
    .bind(&command.topping)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CreateToppingError::DuplicateName(command.topping.clone()),
            CreateToppingError::Database,
        )
    })?;

    tx.commit().await?;

    tracing::info!(topping_id = record.id, "Topping created");

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use serde_json::json;

    fn command(name: &str) -> CreateToppingCommand {
        CreateToppingCommand {
            topping: name.to_string(),
        }
    }

    #[test]
    fn test_from_payload_requires_topping() {
        let object = json!({"name": "Ham"}).as_object().cloned().unwrap();
        match CreateToppingCommand::from_payload(&object) {
            Err(CreateToppingError::Validation(errors)) => assert!(errors.contains("topping")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_long_name() {
        assert!(matches!(
            command(&"x".repeat(201)).validate(),
            Err(CreateToppingError::Validation(_))
        ));
        assert!(command(&"x".repeat(200)).validate().is_ok());
    }

    #[tokio::test]
    async fn test_handle_creates_topping() {
        let pool = in_memory_pool().await.unwrap();

        let first = handle(pool.clone(), command("Ham")).await.unwrap();
        let second = handle(pool.clone(), command("Cheese")).await.unwrap();

        assert_eq!(first.name, "Ham");
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_handle_rejects_case_variant() {
        let pool = in_memory_pool().await.unwrap();

        handle(pool.clone(), command("Bacon")).await.unwrap();
        let result = handle(pool.clone(), command("BACON")).await;

        assert!(matches!(result, Err(CreateToppingError::DuplicateName(name)) if name == "BACON"));
    }
}
