//! Pizza API routes
//!
//! # Route Structure
//!
//! - `GET /pizzas/` - List pizzas with their topping names
//! - `POST /pizzas/` - Create a pizza (`create_pizza`)
//! - `GET /pizzas/:id` - Get a single pizza
//! - `PUT /pizzas/:id` - Replace name and toppings (`change_pizza`)
//! - `DELETE /pizzas/:id` - Delete a pizza (`delete_pizza`)

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{
        CreatePizzaCommand, CreatePizzaError, DeletePizzaCommand, DeletePizzaError,
        UpdatePizzaCommand, UpdatePizzaError,
    },
    queries::{GetPizzaError, GetPizzaQuery, ListPizzasError, ListPizzasQuery},
    types::PizzaRepresentation,
};
use crate::api::{
    extract::{parse_id, BaseUrl, RequestPayload},
    resource,
    response::Deleted,
    AppState,
};
use crate::auth::{authorize, Caller, EntityKind};
use crate::error::{ApiError, ApiResult};

const COLLECTION_ALLOW: &str = "GET, POST, HEAD, OPTIONS";
const ITEM_ALLOW: &str = "GET, PUT, DELETE, HEAD, OPTIONS";

pub fn pizzas_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pizzas/",
            resource(
                get(list_pizzas).post(create_pizza),
                "Pizza List",
                COLLECTION_ALLOW,
            ),
        )
        .route(
            "/pizzas/:id",
            resource(
                get(get_pizza).put(update_pizza).delete(delete_pizza),
                "Pizza Details",
                ITEM_ALLOW,
            ),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip_all)]
async fn create_pizza(
    State(state): State<AppState>,
    base: BaseUrl,
    caller: Caller,
    payload: RequestPayload,
) -> ApiResult<Response> {
    authorize(&Method::POST, EntityKind::Pizza, &caller)?;

    let object = payload.into_object()?;
    let command = CreatePizzaCommand::from_payload(&object)?;
    let record = super::commands::create::handle(state.db, command).await?;

    tracing::info!(pizza_id = record.id, "Pizza created via API");

    Ok((StatusCode::CREATED, Json(record.represent(&base))).into_response())
}

#[tracing::instrument(skip(state, base, caller, payload))]
async fn update_pizza(
    State(state): State<AppState>,
    Path(id): Path<String>,
    base: BaseUrl,
    caller: Caller,
    payload: RequestPayload,
) -> ApiResult<Json<PizzaRepresentation>> {
    authorize(&Method::PUT, EntityKind::Pizza, &caller)?;

    let id = parse_id(&id)?;
    super::queries::get::handle(state.db.clone(), GetPizzaQuery { id }).await?;

    let object = payload.into_object()?;
    let command = UpdatePizzaCommand::from_payload(id, &object)?;
    let record = super::commands::update::handle(state.db, command).await?;

    Ok(Json(record.represent(&base)))
}

#[tracing::instrument(skip(state, caller))]
async fn delete_pizza(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: Caller,
) -> ApiResult<Deleted> {
    authorize(&Method::DELETE, EntityKind::Pizza, &caller)?;

    let id = parse_id(&id)?;
    super::commands::delete::handle(state.db, DeletePizzaCommand { id }).await?;

    Ok(Deleted)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip_all)]
async fn list_pizzas(
    State(state): State<AppState>,
    base: BaseUrl,
) -> ApiResult<Json<Vec<PizzaRepresentation>>> {
    let records = super::queries::list::handle(state.db, ListPizzasQuery).await?;

    Ok(Json(
        records
            .into_iter()
            .map(|record| record.represent(&base))
            .collect(),
    ))
}

#[tracing::instrument(skip(state, base))]
async fn get_pizza(
    State(state): State<AppState>,
    Path(id): Path<String>,
    base: BaseUrl,
) -> ApiResult<Json<PizzaRepresentation>> {
    let id = parse_id(&id)?;
    let record = super::queries::get::handle(state.db, GetPizzaQuery { id }).await?;

    Ok(Json(record.represent(&base)))
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreatePizzaError> for ApiError {
    fn from(err: CreatePizzaError) -> Self {
        match err {
            CreatePizzaError::Validation(errors) => ApiError::Validation(errors),
            CreatePizzaError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<UpdatePizzaError> for ApiError {
    fn from(err: UpdatePizzaError) -> Self {
        match err {
            UpdatePizzaError::NotFound(_) => ApiError::NotFound,
            UpdatePizzaError::Validation(errors) => ApiError::Validation(errors),
            UpdatePizzaError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<DeletePizzaError> for ApiError {
    fn from(err: DeletePizzaError) -> Self {
        match err {
            DeletePizzaError::NotFound(_) => ApiError::NotFound,
            DeletePizzaError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<GetPizzaError> for ApiError {
    fn from(err: GetPizzaError) -> Self {
        match err {
            GetPizzaError::NotFound(_) => ApiError::NotFound,
            GetPizzaError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<ListPizzasError> for ApiError {
    fn from(err: ListPizzasError) -> Self {
        match err {
            ListPizzasError::Database(e) => ApiError::Database(e),
        }
    }
}
