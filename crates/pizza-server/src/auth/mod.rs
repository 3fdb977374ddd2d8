//! Caller authentication and permission checks
//!
//! Write handlers take a [`Caller`] extractor, which reads the HTTP Basic
//! `Authorization` header and verifies it against the user table. Read
//! handlers never extract a caller, so they never look at credentials.
//!
//! Any scheme other than Basic is treated as an anonymous request.

pub mod capability;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::collections::HashSet;

use crate::api::AppState;
use crate::error::ApiError;

pub use capability::{authorize, Action, Capability, EntityKind};

pub const INVALID_CREDENTIALS: &str = "Invalid username/password.";
pub const NO_CREDENTIALS: &str = "Invalid basic header. No credentials provided.";
pub const CREDENTIALS_WITH_SPACES: &str =
    "Invalid basic header. Credentials string should not contain spaces.";
pub const BAD_ENCODING: &str = "Invalid basic header. Credentials not correctly base64 encoded.";

/// A user whose credentials have been verified
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub capabilities: HashSet<Capability>,
}

impl AuthenticatedUser {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Who is making the request
#[derive(Debug, Clone)]
pub enum Caller {
    Anonymous,
    User(AuthenticatedUser),
}

/// Decoded `Authorization: Basic` credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Parse an `Authorization` header
///
/// Returns `Ok(None)` when the scheme is not Basic.
pub fn parse_basic(value: &HeaderValue) -> Result<Option<BasicCredentials>, ApiError> {
    let raw = String::from_utf8_lossy(value.as_bytes());
    let mut parts = raw.split_whitespace();

    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("basic") => {},
        _ => return Ok(None),
    }

    let encoded = parts
        .next()
        .ok_or_else(|| ApiError::AuthenticationFailed(NO_CREDENTIALS.to_string()))?;
    if parts.next().is_some() {
        return Err(ApiError::AuthenticationFailed(
            CREDENTIALS_WITH_SPACES.to_string(),
        ));
    }

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| ApiError::AuthenticationFailed(BAD_ENCODING.to_string()))?;

    // Latin-1 fallback for clients that do not send UTF-8
    let decoded = match String::from_utf8(decoded) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };

    let (username, password) = decoded.split_once(':').unwrap_or((decoded.as_str(), ""));

    Ok(Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    }))
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Caller::Anonymous);
        };

        let Some(credentials) = parse_basic(value)? else {
            return Ok(Caller::Anonymous);
        };

        match users::authenticate(&state.db, &credentials.username, &credentials.password).await? {
            Some(user) => {
                tracing::debug!(user_id = user.id, username = %user.username, "Caller authenticated");
                Ok(Caller::User(user))
            },
            None => {
                tracing::info!(username = %credentials.username, "Authentication failed");
                Err(ApiError::AuthenticationFailed(INVALID_CREDENTIALS.to_string()))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    fn failure_message(result: Result<Option<BasicCredentials>, ApiError>) -> String {
        match result {
            Err(ApiError::AuthenticationFailed(message)) => message,
            other => panic!("expected authentication failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_basic() {
        let value = header(&format!("Basic {}", STANDARD.encode("olive:s3cret")));
        let credentials = parse_basic(&value).unwrap().unwrap();
        assert_eq!(credentials.username, "olive");
        assert_eq!(credentials.password, "s3cret");
    }

    #[test]
    fn test_password_may_contain_colons() {
        let value = header(&format!("basic {}", STANDARD.encode("olive:a:b")));
        let credentials = parse_basic(&value).unwrap().unwrap();
        assert_eq!(credentials.password, "a:b");
    }

    #[test]
    fn test_other_schemes_are_anonymous() {
        assert!(parse_basic(&header("Bearer abc.def")).unwrap().is_none());
        assert!(parse_basic(&header("Token abc")).unwrap().is_none());
    }

    #[test]
    fn test_bad_base64() {
        assert_eq!(failure_message(parse_basic(&header("Basic !!!"))), BAD_ENCODING);
    }

    #[test]
    fn test_missing_credentials() {
        assert_eq!(failure_message(parse_basic(&header("Basic"))), NO_CREDENTIALS);
    }

    #[test]
    fn test_credentials_with_spaces() {
        assert_eq!(
            failure_message(parse_basic(&header("Basic abc def"))),
            CREDENTIALS_WITH_SPACES
        );
    }
}
