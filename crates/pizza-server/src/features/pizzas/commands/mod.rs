pub mod create;
pub mod delete;
pub mod update;

use sqlx::SqliteConnection;
use std::collections::HashSet;

pub use create::{CreatePizzaCommand, CreatePizzaError};
pub use delete::{DeletePizzaCommand, DeletePizzaError};
pub use update::{UpdatePizzaCommand, UpdatePizzaError};

use super::types::{unknown_topping, DUPLICATE_PIZZA, PIZZA_FIELD, TOPPINGS_FIELD};
use crate::features::shared::FieldErrors;

/// A requested topping matched to its row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ResolvedTopping {
    pub id: i64,
    pub name: String,
}

/// Whether another pizza already uses `name`, ignoring case
pub(crate) async fn pizza_name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pizzas WHERE name = ? AND id IS NOT ?)")
        .bind(name)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
}

/// Match requested topping names to existing toppings
///
/// Matching ignores case. Order follows the request and repeated toppings
/// collapse onto their first occurrence. Stops at the first name with no
/// match and returns it as `Err`.
pub(crate) async fn resolve_toppings(
    conn: &mut SqliteConnection,
    names: &[String],
) -> sqlx::Result<Result<Vec<ResolvedTopping>, String>> {
    let mut resolved = Vec::with_capacity(names.len());
    let mut seen = HashSet::with_capacity(names.len());

    for name in names {
        let topping = sqlx::query_as::<_, ResolvedTopping>(
            "SELECT id, name FROM toppings WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

        match topping {
            Some(topping) => {
                if seen.insert(topping.id) {
                    resolved.push(topping);
                }
            },
            None => return Ok(Err(name.clone())),
        }
    }

    Ok(Ok(resolved))
}

/// Check the name and toppings of a create or update together
///
/// Both problems are reported in one error map.
pub(crate) async fn check_pizza(
    conn: &mut SqliteConnection,
    name: &str,
    toppings: &[String],
    exclude_id: Option<i64>,
) -> sqlx::Result<Result<Vec<ResolvedTopping>, FieldErrors>> {
    let mut errors = FieldErrors::default();

    if pizza_name_taken(conn, name, exclude_id).await? {
        errors.add(PIZZA_FIELD, DUPLICATE_PIZZA);
    }

    let resolved = match resolve_toppings(conn, toppings).await? {
        Ok(resolved) => resolved,
        Err(missing) => {
            errors.add(TOPPINGS_FIELD, unknown_topping(&missing));
            Vec::new()
        },
    };

    Ok(errors.into_result().map(|()| resolved))
}

/// Replace a pizza's associations with `toppings`, keeping their order
pub(crate) async fn replace_toppings(
    conn: &mut SqliteConnection,
    pizza_id: i64,
    toppings: &[ResolvedTopping],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM pizza_toppings WHERE pizza_id = ?")
        .bind(pizza_id)
        .execute(&mut *conn)
        .await?;

    for (position, topping) in toppings.iter().enumerate() {
        sqlx::query("INSERT INTO pizza_toppings (pizza_id, topping_id, position) VALUES (?, ?, ?)")
            .bind(pizza_id)
            .bind(topping.id)
            .bind(position as i64)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use crate::features::shared::test_helpers::TestTopping;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolve_ignores_case_and_collapses_repeats() {
        let pool = in_memory_pool().await.unwrap();
        let ham = TestTopping::new("Ham").insert(&pool).await.unwrap();
        let cheese = TestTopping::new("Cheese").insert(&pool).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let resolved = resolve_toppings(&mut conn, &names(&["cheese", "HAM", "Cheese"]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            resolved,
            vec![
                ResolvedTopping { id: cheese.id, name: "Cheese".to_string() },
                ResolvedTopping { id: ham.id, name: "Ham".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_reports_first_missing() {
        let pool = in_memory_pool().await.unwrap();
        TestTopping::new("Ham").insert(&pool).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let missing = resolve_toppings(&mut conn, &names(&["Ham", "Kale", "Tofu"]))
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(missing, "Kale");
    }

    #[tokio::test]
    async fn test_check_pizza_reports_both_fields() {
        let pool = in_memory_pool().await.unwrap();
        sqlx::query("INSERT INTO pizzas (name) VALUES ('Margherita')")
            .execute(&pool)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let errors = check_pizza(&mut conn, "MARGHERITA", &names(&["Kale"]), None)
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(errors.get(PIZZA_FIELD), Some(&[DUPLICATE_PIZZA.to_string()][..]));
        assert_eq!(
            errors.get(TOPPINGS_FIELD),
            Some(&["Object with topping=Kale does not exist.".to_string()][..])
        );
    }
}
