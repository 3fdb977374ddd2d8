//! User accounts, password hashing and role assignment
//!
//! Passwords are stored as Argon2id PHC strings. Verification reads the
//! parameters from the stored hash, so hashes created with different cost
//! settings keep working.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use sqlx::SqlitePool;
use std::collections::HashSet;

use super::capability::Capability;
use super::AuthenticatedUser;
use crate::db;
use crate::features::shared::error_helpers::is_unique_violation;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("User '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, UserError> {
    hash_password_with(&Argon2::default(), password)
}

/// Hash a password with explicit Argon2 settings
pub fn hash_password_with(argon2: &Argon2<'_>, password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::Hash(e.to_string()))
}

/// Check a password against a stored PHC string
///
/// An unparseable hash is treated as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Create a user and assign the named roles in one transaction
#[tracing::instrument(skip(pool, password), fields(username = %username, roles = ?roles))]
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    roles: &[String],
) -> Result<i64, UserError> {
    let password_hash = hash_password(password)?;
    insert_user(pool, username, &password_hash, roles).await
}

/// Insert a user with an already computed hash
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    roles: &[String],
) -> Result<i64, UserError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(UserError::EmptyUsername);
    }
    if password_hash.is_empty() {
        return Err(UserError::EmptyPassword);
    }

    let mut tx = db::begin_write(pool).await?;

    let user_id: i64 =
        sqlx::query_scalar("INSERT INTO users (username, password_hash) VALUES (?, ?) RETURNING id")
            .bind(username)
            .bind(password_hash)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    UserError::DuplicateUsername(username.to_string())
                } else {
                    UserError::Database(e)
                }
            })?;

    for role in roles {
        let role_id: Option<i64> = sqlx::query_scalar("SELECT id FROM roles WHERE name = ?")
            .bind(role)
            .fetch_optional(&mut *tx)
            .await?;
        let role_id = role_id.ok_or_else(|| UserError::UnknownRole(role.clone()))?;

        sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(user_id, "User created");

    Ok(user_id)
}

/// Verify credentials and load the caller's capabilities
///
/// Returns `Ok(None)` for an unknown username or a wrong password.
#[tracing::instrument(skip(pool, password))]
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<AuthenticatedUser>, sqlx::Error> {
    let row: Option<(i64, String, String)> =
        sqlx::query_as("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    let Some((id, username, password_hash)) = row else {
        tracing::debug!("Unknown username");
        return Ok(None);
    };

    let password = password.to_string();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .unwrap_or(false);

    if !verified {
        tracing::debug!("Password mismatch");
        return Ok(None);
    }

    let capabilities = load_capabilities(pool, id).await?;

    Ok(Some(AuthenticatedUser {
        id,
        username,
        capabilities,
    }))
}

/// Union of the capabilities granted by every role the user holds
pub async fn load_capabilities(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<HashSet<Capability>, sqlx::Error> {
    let codenames: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT rc.capability
        FROM user_roles ur
        JOIN role_capabilities rc ON rc.role_id = ur.role_id
        WHERE ur.user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut capabilities = HashSet::with_capacity(codenames.len());
    for codename in codenames {
        match codename.parse::<Capability>() {
            Ok(capability) => {
                capabilities.insert(capability);
            },
            Err(e) => tracing::warn!(error = %e, "Ignoring unknown capability"),
        }
    }

    Ok(capabilities)
}
