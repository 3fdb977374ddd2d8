//! Update topping command
//!
//! A full replace of the topping's name. Pizzas reference toppings by id,
//! so a rename shows up in every pizza immediately.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::topping_name_taken;
use crate::db;
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{check_name, validate_name, FieldErrors};
use crate::features::toppings::types::{ToppingRecord, TOPPING_FIELD};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateToppingCommand {
    #[serde(skip)]
    pub id: i64,
    pub topping: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateToppingError {
    #[error("Topping {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Topping '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateToppingCommand {
    pub fn from_payload(id: i64, object: &Map<String, Value>) -> Result<Self, UpdateToppingError> {
        let mut errors = FieldErrors::default();
        match validate_name(object, TOPPING_FIELD, &mut errors) {
            Some(topping) => Ok(Self { id, topping }),
            None => Err(UpdateToppingError::Validation(errors)),
        }
    }

    pub fn validate(&self) -> Result<(), UpdateToppingError> {
        check_name(&self.topping).map_err(|message| {
            UpdateToppingError::Validation(FieldErrors::single(TOPPING_FIELD, message))
        })
    }
}

#[tracing::instrument(skip(pool, command), fields(id = command.id, topping = %command.topping))]
pub async fn handle(
    pool: SqlitePool,
    command: UpdateToppingCommand,
) -> Result<ToppingRecord, UpdateToppingError> {
    command.validate()?;

    let mut tx = db::begin_write(&pool).await?;

    // Saving a topping under its own name, in any case, is not a conflict
    if topping_name_taken(&mut tx, &command.topping, Some(command.id)).await? {
        return Err(UpdateToppingError::DuplicateName(command.topping));
    }

    let record = sqlx::query_as::<_, ToppingRecord>(
        r#"
        UPDATE toppings
        SET name = ?, updated_at = datetime('now')
        WHERE id = ?
        RETURNING id, name
        "#,
    )
    .bind(&command.topping)
    .bind(command.id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            UpdateToppingError::DuplicateName(command.topping.clone()),
            UpdateToppingError::Database,
        )
    })?
    .ok_or(UpdateToppingError::NotFound(command.id))?;

    tx.commit().await?;

    tracing::info!("Topping updated");

    Ok(record)
}
