//! List toppings query
//!
//! Toppings come back in insertion order. There is no pagination.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::toppings::types::ToppingRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListToppingsQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListToppingsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: ListToppingsQuery,
) -> Result<Vec<ToppingRecord>, ListToppingsError> {
    let toppings = sqlx::query_as::<_, ToppingRecord>("SELECT id, name FROM toppings ORDER BY id")
        .fetch_all(&pool)
        .await?;

    tracing::debug!(count = toppings.len(), "Toppings listed");

    Ok(toppings)
}
