//! Feature modules implementing the pizza store API
//!
//! Each feature is a vertical slice:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Rows and wire representations
//!
//! Route handlers call each command or query's `handle` function directly.

pub mod pizzas;
pub mod shared;
pub mod toppings;

use axum::Router;

use crate::api::AppState;

/// All resource routes, mounted at the root
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(toppings::toppings_routes())
        .merge(pizzas::pizzas_routes())
}
