//! Delete pizza command
//!
//! Removes the pizza and its associations. Toppings are left untouched.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePizzaCommand {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeletePizzaError {
    #[error("Pizza {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(id = command.id))]
pub async fn handle(pool: SqlitePool, command: DeletePizzaCommand) -> Result<(), DeletePizzaError> {
    let mut tx = db::begin_write(&pool).await?;

    sqlx::query("DELETE FROM pizza_toppings WHERE pizza_id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM pizzas WHERE id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(DeletePizzaError::NotFound(command.id));
    }

    tx.commit().await?;

    tracing::info!("Pizza deleted");

    Ok(())
}
