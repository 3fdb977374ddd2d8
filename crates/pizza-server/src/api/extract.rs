//! Request extractors shared by the resource handlers

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
};
use serde_json::{Map, Value};
use std::convert::Infallible;

use super::AppState;
use crate::error::ApiError;
use crate::features::shared::validation::{expected_object, FieldErrors};

/// Key used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Raw request body, parsed only when the handler asks for it
///
/// Extraction never fails on content, so authentication, permission and
/// lookup checks all run before any 400 or 415 can be produced.
#[derive(Debug, Clone)]
pub struct RequestPayload {
    content_type: Option<String>,
    body: Bytes,
}

impl RequestPayload {
    pub fn new(content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Parse the body as a JSON object
    ///
    /// # Errors
    ///
    /// - `UnsupportedMediaType` when a non-JSON content type was sent
    /// - `Parse` when the body is not valid JSON
    /// - `Validation` under `non_field_errors` when the JSON is not an object
    ///
    /// An empty body is read as an empty object.
    pub fn into_object(self) -> Result<Map<String, Value>, ApiError> {
        if let Some(content_type) = &self.content_type {
            if !is_json(content_type) {
                return Err(ApiError::UnsupportedMediaType(content_type.clone()));
            }
        }

        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::Parse(format!("JSON parse error - {}", e)))?;

        match value {
            Value::Object(object) => Ok(object),
            other => Err(ApiError::Validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                expected_object(&other),
            ))),
        }
    }
}

fn is_json(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[async_trait]
impl<S> FromRequest<S> for RequestPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BodyRejected {
                status: e.status(),
                message: e.body_text(),
            })?;

        Ok(Self { content_type, body })
    }
}

/// Scheme and authority used to build absolute `url` fields
///
/// Uses the configured public URL when set, otherwise `X-Forwarded-Proto`
/// (default `http`) and the `Host` header of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(pub String);

impl BaseUrl {
    pub fn from_headers(headers: &HeaderMap, fallback_host: Option<&str>) -> Self {
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("http");

        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or(fallback_host)
            .unwrap_or("localhost");

        Self(format!("{}://{}", scheme, host))
    }

    /// Absolute URL for a path starting with `/`
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BaseUrl {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(public_url) = &state.public_url {
            return Ok(Self(public_url.clone()));
        }
        Ok(Self::from_headers(&parts.headers, parts.uri.host()))
    }
}

/// Parse an item id from the path
///
/// Only non-negative decimal integers name an item; anything else is 404.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::NotFound);
    }
    raw.parse().map_err(|_| ApiError::NotFound)
}
