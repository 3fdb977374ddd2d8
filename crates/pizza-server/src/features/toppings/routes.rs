//! Topping API routes
//!
//! # Route Structure
//!
//! - `GET /toppings/` - List toppings
//! - `POST /toppings/` - Create a topping (`create_topping`)
//! - `GET /toppings/:id` - Get a single topping
//! - `PUT /toppings/:id` - Rename a topping (`change_topping`)
//! - `DELETE /toppings/:id` - Delete a topping (`delete_topping`)
//!
//! Write handlers check permissions first, then that the item exists, and
//! only then read the body.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{
        CreateToppingCommand, CreateToppingError, DeleteToppingCommand, DeleteToppingError,
        UpdateToppingCommand, UpdateToppingError,
    },
    queries::{GetToppingError, GetToppingQuery, ListToppingsError, ListToppingsQuery},
    types::{ToppingRepresentation, DUPLICATE_TOPPING, TOPPING_FIELD},
};
use crate::api::{
    extract::{parse_id, BaseUrl, RequestPayload},
    resource,
    response::Deleted,
    AppState,
};
use crate::auth::{authorize, Caller, EntityKind};
use crate::error::{ApiError, ApiResult};
use crate::features::shared::FieldErrors;

const COLLECTION_ALLOW: &str = "GET, POST, HEAD, OPTIONS";
const ITEM_ALLOW: &str = "GET, PUT, DELETE, HEAD, OPTIONS";

pub fn toppings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/toppings/",
            resource(
                get(list_toppings).post(create_topping),
                "Topping List",
                COLLECTION_ALLOW,
            ),
        )
        .route(
            "/toppings/:id",
            resource(
                get(get_topping).put(update_topping).delete(delete_topping),
                "Topping Details",
                ITEM_ALLOW,
            ),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip_all)]
async fn create_topping(
    State(state): State<AppState>,
    base: BaseUrl,
    caller: Caller,
    payload: RequestPayload,
) -> ApiResult<Response> {
    authorize(&Method::POST, EntityKind::Topping, &caller)?;

    let object = payload.into_object()?;
    let command = CreateToppingCommand::from_payload(&object)?;
    let record = super::commands::create::handle(state.db, command).await?;

    Ok((StatusCode::CREATED, Json(record.represent(&base))).into_response())
}

#[tracing::instrument(skip(state, base, caller, payload))]
async fn update_topping(
    State(state): State<AppState>,
    Path(id): Path<String>,
    base: BaseUrl,
    caller: Caller,
    payload: RequestPayload,
) -> ApiResult<Json<ToppingRepresentation>> {
    authorize(&Method::PUT, EntityKind::Topping, &caller)?;

    let id = parse_id(&id)?;
    super::queries::get::handle(state.db.clone(), GetToppingQuery { id }).await?;

    let object = payload.into_object()?;
    let command = UpdateToppingCommand::from_payload(id, &object)?;
    let record = super::commands::update::handle(state.db, command).await?;

    Ok(Json(record.represent(&base)))
}

#[tracing::instrument(skip(state, caller))]
async fn delete_topping(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: Caller,
) -> ApiResult<Deleted> {
    authorize(&Method::DELETE, EntityKind::Topping, &caller)?;

    let id = parse_id(&id)?;
    super::commands::delete::handle(state.db, DeleteToppingCommand { id }).await?;

    Ok(Deleted)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip_all)]
async fn list_toppings(
    State(state): State<AppState>,
    base: BaseUrl,
) -> ApiResult<Json<Vec<ToppingRepresentation>>> {
    let records = super::queries::list::handle(state.db, ListToppingsQuery).await?;

    Ok(Json(
        records
            .into_iter()
            .map(|record| record.represent(&base))
            .collect(),
    ))
}

#[tracing::instrument(skip(state, base))]
async fn get_topping(
    State(state): State<AppState>,
    Path(id): Path<String>,
    base: BaseUrl,
) -> ApiResult<Json<ToppingRepresentation>> {
    let id = parse_id(&id)?;
    let record = super::queries::get::handle(state.db, GetToppingQuery { id }).await?;

    Ok(Json(record.represent(&base)))
}

// ============================================================================
// Error Handling
// ============================================================================

fn duplicate() -> ApiError {
    ApiError::Validation(FieldErrors::single(TOPPING_FIELD, DUPLICATE_TOPPING))
}

impl From<CreateToppingError> for ApiError {
    fn from(err: CreateToppingError) -> Self {
        match err {
            CreateToppingError::Validation(errors) => ApiError::Validation(errors),
            CreateToppingError::DuplicateName(_) => duplicate(),
            CreateToppingError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<UpdateToppingError> for ApiError {
    fn from(err: UpdateToppingError) -> Self {
        match err {
            UpdateToppingError::NotFound(_) => ApiError::NotFound,
            UpdateToppingError::Validation(errors) => ApiError::Validation(errors),
            UpdateToppingError::DuplicateName(_) => duplicate(),
            UpdateToppingError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<DeleteToppingError> for ApiError {
    fn from(err: DeleteToppingError) -> Self {
        match err {
            DeleteToppingError::NotFound(_) => ApiError::NotFound,
            DeleteToppingError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<GetToppingError> for ApiError {
    fn from(err: GetToppingError) -> Self {
        match err {
            GetToppingError::NotFound(_) => ApiError::NotFound,
            GetToppingError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<ListToppingsError> for ApiError {
    fn from(err: ListToppingsError) -> Self {
        match err {
            ListToppingsError::Database(e) => ApiError::Database(e),
        }
    }
}
