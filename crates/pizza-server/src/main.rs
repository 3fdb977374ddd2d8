//! Pizza Store Server - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use pizza_common::logging::{init_logging, LogConfig, LogLevel};
use tracing::info;

use pizza_server::{
    api,
    auth::users,
    cli::{Cli, Commands},
    config::Config,
    db,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::builder()
        .log_file_prefix("pizza-server")
        .filter_directives("pizza_server=debug,tower_http=debug,sqlx=warn")
        .build();

    // Environment variables take precedence over the defaults above
    let mut log_config = log_config.merge_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    let _log_guard = init_logging(&log_config)?;

    let config = Config::load().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(
                "Starting pizza server on {}:{}",
                config.server.host, config.server.port
            );
            api::serve(config).await?;
        },
        Commands::Migrate => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;
            pool.close().await;
        },
        Commands::CreateUser {
            username,
            password,
            roles,
        } => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;

            let roles: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
            let user_id = users::create_user(&pool, &username, &password, &roles)
                .await
                .with_context(|| format!("Failed to create user '{}'", username))?;

            info!(user_id, %username, roles = ?roles, "User created");
            println!("Created user '{}' (id {})", username, user_id);
            pool.close().await;
        },
    }

    Ok(())
}
