pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateToppingCommand, CreateToppingError, DeleteToppingCommand, DeleteToppingError,
    DeleteToppingResponse, UpdateToppingCommand, UpdateToppingError,
};

pub use queries::{GetToppingError, GetToppingQuery, ListToppingsError, ListToppingsQuery};

pub use routes::toppings_routes;
pub use types::{ToppingRecord, ToppingRepresentation};
