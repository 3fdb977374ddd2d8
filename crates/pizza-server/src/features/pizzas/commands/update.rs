//! Update pizza command
//!
//! PUT replaces the name and the whole topping set. An empty topping list
//! clears every association.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::{check_pizza, replace_toppings};
use crate::db;
use crate::features::pizzas::types::{PizzaRecord, DUPLICATE_PIZZA, PIZZA_FIELD, TOPPINGS_FIELD};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{check_name, validate_name, validate_name_list};
use crate::features::shared::FieldErrors;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePizzaCommand {
    #[serde(skip)]
    pub id: i64,
    pub pizza: String,
    pub toppings: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdatePizzaError {
    #[error("Pizza {0} not found")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdatePizzaCommand {
    pub fn from_payload(id: i64, object: &Map<String, Value>) -> Result<Self, UpdatePizzaError> {
        let mut errors = FieldErrors::default();
        let pizza = validate_name(object, PIZZA_FIELD, &mut errors);
        let toppings = validate_name_list(object, TOPPINGS_FIELD, &mut errors);

        match (pizza, toppings) {
            (Some(pizza), Some(toppings)) => Ok(Self { id, pizza, toppings }),
            _ => Err(UpdatePizzaError::Validation(errors)),
        }
    }

    pub fn validate(&self) -> Result<(), UpdatePizzaError> {
        check_name(&self.pizza).map_err(|message| {
            UpdatePizzaError::Validation(FieldErrors::single(PIZZA_FIELD, message))
        })
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(id = command.id, pizza = %command.pizza, toppings = command.toppings.len())
)]
pub async fn handle(
    pool: SqlitePool,
    command: UpdatePizzaCommand,
) -> Result<PizzaRecord, UpdatePizzaError> {
    command.validate()?;

    let mut tx = db::begin_write(&pool).await?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pizzas WHERE id = ?)")
        .bind(command.id)
        .fetch_one(&mut *tx)
        .await?;
    if !exists {
        return Err(UpdatePizzaError::NotFound(command.id));
    }

    let toppings = check_pizza(&mut tx, &command.pizza, &command.toppings, Some(command.id))
        .await?
        .map_err(UpdatePizzaError::Validation)?;

    let name: String = sqlx::query_scalar(
        r#"
        UPDATE pizzas
        SET name = ?, updated_at = datetime('now')
        WHERE id = ?
        RETURNING name
        "#,
    )
    .bind(&command.pizza)
    .bind(command.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            UpdatePizzaError::Validation(FieldErrors::single(PIZZA_FIELD, DUPLICATE_PIZZA)),
            UpdatePizzaError::Database,
        )
    })?;

    replace_toppings(&mut tx, command.id, &toppings).await?;

    tx.commit().await?;

    tracing::info!("Pizza updated");

    Ok(PizzaRecord {
        id: command.id,
        name,
        toppings: toppings.into_iter().map(|t| t.name).collect(),
    })
}
