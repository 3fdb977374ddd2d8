//! Pizza Store Server Library
//!
//! HTTP API for managing pizzas and their toppings.
//!
//! # Overview
//!
//! - **Toppings**: `/toppings/` and `/toppings/:id`, managed by the `owner` role
//! - **Pizzas**: `/pizzas/` and `/pizzas/:id`, managed by the `chef` role
//! - **Reads** are open to anonymous callers; writes need HTTP Basic
//!   credentials of a user holding the matching capability
//!
//! # Architecture
//!
//! Features are vertical slices of commands (writes) and queries (reads),
//! each a plain async `handle` function over a SQLite pool. Routes
//! authorize the caller, call the handler and map its error into
//! [`ApiError`].
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extractors
//! - **SQLx**: SQLite access and embedded migrations
//! - **Tower**: Middleware (CORS and request tracing)
//!
//! # Example
//!
//! ```no_run
//! use pizza_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
