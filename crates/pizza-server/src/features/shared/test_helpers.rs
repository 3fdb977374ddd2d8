//! Test fixtures for database tests
//!
//! # Examples
//!
//! ```rust,ignore
//! use pizza_server::features::shared::test_helpers::*;
//!
//! let pool = in_memory_pool().await?;
//! let ham = TestTopping::new("Ham").insert(&pool).await?;
//! let pizza = TestPizza::new("Hawaiian")
//!     .with_topping(&ham)
//!     .insert(&pool)
//!     .await?;
//! ```

use sqlx::SqlitePool;

/// A topping row inserted directly, bypassing the command layer
#[derive(Debug, Clone)]
pub struct TestTopping {
    pub id: i64,
    pub name: String,
}

impl TestTopping {
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        self.id = sqlx::query_scalar("INSERT INTO toppings (name) VALUES (?) RETURNING id")
            .bind(&self.name)
            .fetch_one(pool)
            .await?;
        Ok(self)
    }
}

/// Builder for pizza rows with their topping associations
#[derive(Debug, Clone)]
pub struct TestPizza {
    pub id: i64,
    pub name: String,
    pub topping_ids: Vec<i64>,
}

impl TestPizza {
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            topping_ids: Vec::new(),
        }
    }

    pub fn with_topping(mut self, topping: &TestTopping) -> Self {
        self.topping_ids.push(topping.id);
        self
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        self.id = sqlx::query_scalar("INSERT INTO pizzas (name) VALUES (?) RETURNING id")
            .bind(&self.name)
            .fetch_one(pool)
            .await?;

        for (position, topping_id) in self.topping_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO pizza_toppings (pizza_id, topping_id, position) VALUES (?, ?, ?)",
            )
            .bind(self.id)
            .bind(topping_id)
            .bind(position as i64)
            .execute(pool)
            .await?;
        }

        Ok(self)
    }
}

/// Number of association rows held by a pizza
pub async fn association_count(pool: &SqlitePool, pizza_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM pizza_toppings WHERE pizza_id = ?")
        .bind(pizza_id)
        .fetch_one(pool)
        .await
}
