//! Database error handling utilities
//!
//! # Examples
//!
//! ```rust,ignore
//! use pizza_server::features::shared::error_helpers::map_unique_violation;
//!
//! sqlx::query("INSERT INTO toppings (name) VALUES (?)")
//!     .bind(&name)
//!     .execute(&mut *tx)
//!     .await
//!     .map_err(|e| {
//!         map_unique_violation(e, CreateToppingError::DuplicateName(name.clone()), Into::into)
//!     })?;
//! ```

use sqlx::Error as SqlxError;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Return `unique_error` on a unique violation, otherwise wrap the original error
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;

    #[tokio::test]
    async fn test_detects_unique_violation() {
        let pool = in_memory_pool().await.unwrap();

        sqlx::query("INSERT INTO toppings (name) VALUES ('Bacon')")
            .execute(&pool)
            .await
            .unwrap();
        let err = sqlx::query("INSERT INTO toppings (name) VALUES ('BACON')")
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(is_unique_violation(&err));

        let mapped = map_unique_violation(err, "duplicate", |_| "other");
        assert_eq!(mapped, "duplicate");
    }

    #[tokio::test]
    async fn test_other_errors_are_wrapped() {
        let pool = in_memory_pool().await.unwrap();

        let err = sqlx::query(
            "INSERT INTO pizza_toppings (pizza_id, topping_id, position) VALUES (7, 7, 0)",
        )
        .execute(&pool)
        .await
        .unwrap_err();

        assert!(!is_unique_violation(&err));
        let mapped = map_unique_violation(err, "duplicate", |_| "other");
        assert_eq!(mapped, "other");
    }
}
