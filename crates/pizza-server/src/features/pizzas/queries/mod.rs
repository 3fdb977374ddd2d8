pub mod get;
pub mod list;

pub use get::{GetPizzaError, GetPizzaQuery};
pub use list::{ListPizzasError, ListPizzasQuery};
