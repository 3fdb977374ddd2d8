pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreatePizzaCommand, CreatePizzaError, DeletePizzaCommand, DeletePizzaError,
    UpdatePizzaCommand, UpdatePizzaError,
};

pub use queries::{GetPizzaError, GetPizzaQuery, ListPizzasError, ListPizzasQuery};

pub use routes::pizzas_routes;
pub use types::{PizzaRecord, PizzaRepresentation};
