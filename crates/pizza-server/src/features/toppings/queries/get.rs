//! Get topping query

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::toppings::types::ToppingRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetToppingQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetToppingError {
    #[error("Topping {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetToppingQuery) -> Result<ToppingRecord, GetToppingError> {
    sqlx::query_as::<_, ToppingRecord>("SELECT id, name FROM toppings WHERE id = ?")
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetToppingError::NotFound(query.id))
}
