//! Command-line interface of the `pizza-server` binary

use clap::{Parser, Subcommand, ValueEnum};

/// Pizza store API server
#[derive(Parser, Debug)]
#[command(name = "pizza-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log at debug level regardless of LOG_LEVEL
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Apply migrations and serve the HTTP API
    Serve,

    /// Apply pending migrations and exit
    Migrate,

    /// Create a user account
    CreateUser {
        #[arg(short, long)]
        username: String,

        /// Password; read from PIZZA_USER_PASSWORD when not given
        #[arg(short, long, env = "PIZZA_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Role to grant; repeat for several
        #[arg(short, long = "role", value_enum)]
        roles: Vec<Role>,
    },
}

/// Roles seeded by the migrations
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Manages toppings
    Owner,
    /// Manages pizzas
    Chef,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Chef => "chef",
        }
    }
}
