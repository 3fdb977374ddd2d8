pub mod create;
pub mod delete;
pub mod update;

use sqlx::SqliteConnection;

pub use create::{CreateToppingCommand, CreateToppingError};
pub use delete::{DeleteToppingCommand, DeleteToppingError, DeleteToppingResponse};
pub use update::{UpdateToppingCommand, UpdateToppingError};

/// Whether another topping already uses `name`, ignoring case
///
/// `exclude_id` skips the topping being renamed.
pub(crate) async fn topping_name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM toppings WHERE name = ? AND id IS NOT ?)")
        .bind(name)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
}
