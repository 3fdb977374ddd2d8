//! Topping rows and their wire representation

use serde::{Deserialize, Serialize};

use crate::api::extract::BaseUrl;

/// Name of the topping field in request and response bodies
pub const TOPPING_FIELD: &str = "topping";

pub const DUPLICATE_TOPPING: &str = "Topping already exists";

/// A row of the `toppings` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ToppingRecord {
    pub id: i64,
    pub name: String,
}

/// `{"topping": ..., "url": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToppingRepresentation {
    pub topping: String,
    pub url: String,
}

/// Path of a single topping
pub fn topping_path(id: i64) -> String {
    format!("/toppings/{}", id)
}

impl ToppingRecord {
    pub fn represent(self, base: &BaseUrl) -> ToppingRepresentation {
        ToppingRepresentation {
            url: base.join(&topping_path(self.id)),
            topping: self.name,
        }
    }
}
