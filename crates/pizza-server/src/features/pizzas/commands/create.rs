//! Create pizza command

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::{check_pizza, replace_toppings};
use crate::db;
use crate::features::pizzas::types::{PizzaRecord, DUPLICATE_PIZZA, PIZZA_FIELD, TOPPINGS_FIELD};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{check_name, validate_name, validate_name_list};
use crate::features::shared::FieldErrors;

/// Command to create a new pizza
///
/// # Examples
///
/// ```rust,ignore
/// let command = CreatePizzaCommand {
///     pizza: "Hawaiian".to_string(),
///     toppings: vec!["Ham".to_string(), "Pineapple".to_string()],
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePizzaCommand {
    pub pizza: String,
    /// Topping names, matched case-insensitively
    pub toppings: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePizzaError {
    /// Field problems, including a taken name or an unknown topping
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreatePizzaCommand {
    pub fn from_payload(object: &Map<String, Value>) -> Result<Self, CreatePizzaError> {
        let mut errors = FieldErrors::default();
        let pizza = validate_name(object, PIZZA_FIELD, &mut errors);
        let toppings = validate_name_list(object, TOPPINGS_FIELD, &mut errors);

        match (pizza, toppings) {
            (Some(pizza), Some(toppings)) => Ok(Self { pizza, toppings }),
            _ => Err(CreatePizzaError::Validation(errors)),
        }
    }

    pub fn validate(&self) -> Result<(), CreatePizzaError> {
        check_name(&self.pizza).map_err(|message| {
            CreatePizzaError::Validation(FieldErrors::single(PIZZA_FIELD, message))
        })
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(pizza = %command.pizza, toppings = command.toppings.len())
)]
pub async fn handle(
    pool: SqlitePool,
    command: CreatePizzaCommand,
) -> Result<PizzaRecord, CreatePizzaError> {
    command.validate()?;

    let mut tx = db::begin_write(&pool).await?;

    let toppings = check_pizza(&mut tx, &command.pizza, &command.toppings, None)
        .await?
        .map_err(CreatePizzaError::Validation)?;

    let (id, name): (i64, String) =
        sqlx::query_as("INSERT INTO pizzas (name) VALUES (?) RETURNING id, name")
            .bind(&command.pizza)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                map_unique_violation(
                    e,
                    CreatePizzaError::Validation(FieldErrors::single(PIZZA_FIELD, DUPLICATE_PIZZA)),
                    CreatePizzaError::Database,
                )
            })?;

    replace_toppings(&mut tx, id, &toppings).await?;

    tx.commit().await?;

    tracing::info!(pizza_id = id, "Pizza created");

    Ok(PizzaRecord {
        id,
        name,
        toppings: toppings.into_iter().map(|t| t.name).collect(),
    })
}
