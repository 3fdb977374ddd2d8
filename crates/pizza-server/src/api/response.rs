//! Response helpers shared by the resource handlers

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Body returned with every 204 from a delete
///
/// The spelling is part of the public contract.
pub const DELETED_MESSAGE: &str = "Sucessfully Deleted";

/// Media types every resource renders and parses
pub const MEDIA_TYPES: [&str; 1] = ["application/json"];

/// 204 response for a successful delete
#[derive(Debug, Clone, Copy)]
pub struct Deleted;

impl IntoResponse for Deleted {
    fn into_response(self) -> Response {
        (StatusCode::NO_CONTENT, Json(DELETED_MESSAGE)).into_response()
    }
}

/// Answer to an `OPTIONS` request: resource metadata plus the `Allow` header
#[derive(Debug, Clone, Copy)]
pub struct ResourceOptions {
    pub name: &'static str,
    pub allow: &'static str,
}

impl IntoResponse for ResourceOptions {
    fn into_response(self) -> Response {
        let mut response = Json(json!({
            "name": self.name,
            "renders": MEDIA_TYPES,
            "parses": MEDIA_TYPES,
        }))
        .into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(self.allow));
        response
    }
}
