//! Get pizza query

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::pizzas::types::PizzaRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPizzaQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPizzaError {
    #[error("Pizza {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetPizzaQuery) -> Result<PizzaRecord, GetPizzaError> {
    let name: String = sqlx::query_scalar("SELECT name FROM pizzas WHERE id = ?")
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetPizzaError::NotFound(query.id))?;

    let toppings: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT t.name
        FROM pizza_toppings pt
        JOIN toppings t ON t.id = pt.topping_id
        WHERE pt.pizza_id = ?
        ORDER BY pt.position
        "#,
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    Ok(PizzaRecord {
        id: query.id,
        name,
        toppings,
    })
}
