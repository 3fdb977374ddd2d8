//! Pizza rows and their wire representation

use serde::{Deserialize, Serialize};

use crate::api::extract::BaseUrl;

pub const PIZZA_FIELD: &str = "pizza";
pub const TOPPINGS_FIELD: &str = "toppings";

pub const DUPLICATE_PIZZA: &str = "Pizza already exists";

/// Message for a topping name that matches no topping
pub fn unknown_topping(name: &str) -> String {
    format!("Object with topping={} does not exist.", name)
}

/// A pizza with its topping names in association order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PizzaRecord {
    pub id: i64,
    pub name: String,
    pub toppings: Vec<String>,
}

/// `{"pizza": ..., "toppings": [...], "url": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PizzaRepresentation {
    pub pizza: String,
    pub toppings: Vec<String>,
    pub url: String,
}

pub fn pizza_path(id: i64) -> String {
    format!("/pizzas/{}", id)
}

impl PizzaRecord {
    pub fn represent(self, base: &BaseUrl) -> PizzaRepresentation {
        PizzaRepresentation {
            url: base.join(&pizza_path(self.id)),
            pizza: self.name,
            toppings: self.toppings,
        }
    }
}
