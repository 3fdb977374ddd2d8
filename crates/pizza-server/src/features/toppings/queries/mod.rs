pub mod get;
pub mod list;

pub use get::{GetToppingError, GetToppingQuery};
pub use list::{ListToppingsError, ListToppingsQuery};
