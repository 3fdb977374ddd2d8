//! Delete topping command
//!
//! The topping is detached from every pizza and then removed, inside one
//! transaction. Pizzas that used it keep their other toppings.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteToppingCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteToppingResponse {
    pub id: i64,
    /// Number of pizzas the topping was removed from
    pub detached_from: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteToppingError {
    #[error("Topping {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(id = command.id))]
pub async fn handle(
    pool: SqlitePool,
    command: DeleteToppingCommand,
) -> Result<DeleteToppingResponse, DeleteToppingError> {
    let mut tx = db::begin_write(&pool).await?;

    let detached = sqlx::query("DELETE FROM pizza_toppings WHERE topping_id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM toppings WHERE id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(DeleteToppingError::NotFound(command.id));
    }

    tx.commit().await?;

    tracing::info!(
        detached_from = detached.rows_affected(),
        "Topping deleted"
    );

    Ok(DeleteToppingResponse {
        id: command.id,
        detached_from: detached.rows_affected(),
    })
}
