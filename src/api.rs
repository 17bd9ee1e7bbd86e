use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::types::{AddRequest, AppState, ErrorResponse, QueryResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        add_item,
        query_item,
        delete_item,
    ),
    components(
        schemas(AddRequest, QueryResponse, ErrorResponse)
    ),
    tags(
        (name = "bloom-series", description = "Sliding-Window Bloom Filter API")
    )
)]
struct ApiDoc;

/// Check API health
#[utoipa::path(
    get,
    path = "/health",
    tag = "bloom-series",
    responses(
        (status = 200, description = "API is healthy")
    )
)]
async fn health_check() -> impl IntoResponse {
    debug!("Health check");
    StatusCode::OK
}

/// Record an item in the current time bucket
#[utoipa::path(
    post,
    path = "/items",
    tag = "bloom-series",
    request_body = AddRequest,
    responses(
        (status = 200, description = "Item recorded successfully"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddRequest>,
) -> impl IntoResponse {
    debug!("Adding item: {}", &request.value);
    match state.series.add(&request.value, SystemTime::now()) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                message: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Query whether an item was seen within the retention limit
#[utoipa::path(
    get,
    path = "/items/{value}",
    tag = "bloom-series",
    params(
        ("value" = String, Path, description = "Value to query")
    ),
    responses(
        (status = 200, description = "Query successful", body = QueryResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn query_item(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
) -> impl IntoResponse {
    debug!("Querying item: {}", &value);
    match state.series.contains(&value, SystemTime::now()) {
        Ok(exists) => {
            (StatusCode::OK, Json(QueryResponse { exists })).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                message: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Best-effort removal of an item from the retention window
#[utoipa::path(
    delete,
    path = "/items/{value}",
    tag = "bloom-series",
    params(
        ("value" = String, Path, description = "Value to delete")
    ),
    responses(
        (status = 200, description = "Delete applied"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(value): Path<String>,
) -> impl IntoResponse {
    debug!("Deleting item: {}", &value);
    match state.series.delete(&value, SystemTime::now()) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                message: e.to_string(),
            }),
        )
            .into_response(),
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let openapi = ApiDoc::openapi();

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi),
        )
        .route("/health", get(health_check))
        .route("/items", post(add_item))
        .route("/items/{value}", get(query_item).delete(delete_item))
        .with_state(state)
}
