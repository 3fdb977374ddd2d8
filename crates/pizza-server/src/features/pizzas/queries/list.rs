//! List pizzas query
//!
//! Two queries: the pizzas, then every association in one pass, grouped in
//! memory.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::features::pizzas::types::PizzaRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPizzasQuery;

#[derive(Debug, thiserror::Error)]
pub enum ListPizzasError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: ListPizzasQuery,
) -> Result<Vec<PizzaRecord>, ListPizzasError> {
    let pizzas: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM pizzas ORDER BY id")
        .fetch_all(&pool)
        .await?;

    let associations: Vec<(i64, String)> = sqlx::query_as(
        r#"
        SELECT pt.pizza_id, t.name
        FROM pizza_toppings pt
        JOIN toppings t ON t.id = pt.topping_id
        ORDER BY pt.pizza_id, pt.position
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let mut toppings_by_pizza: HashMap<i64, Vec<String>> = HashMap::new();
    for (pizza_id, topping) in associations {
        toppings_by_pizza.entry(pizza_id).or_default().push(topping);
    }

    let records: Vec<PizzaRecord> = pizzas
        .into_iter()
        .map(|(id, name)| PizzaRecord {
            id,
            name,
            toppings: toppings_by_pizza.remove(&id).unwrap_or_default(),
        })
        .collect();

    tracing::debug!(count = records.len(), "Pizzas listed");

    Ok(records)
}
