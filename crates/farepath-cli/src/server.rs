//! HTTP API.
//!
//! | method | path              | success                                   |
//! |--------|-------------------|-------------------------------------------|
//! | GET    | `/best-route`     | 200 `{"route": "A - B", "price": n}`      |
//! | POST   | `/register-route` | 201 `{"message": "Route successfully registered"}` |
//! | GET    | `/health`         | 200 `{"status": "healthy"}`               |
//!
//! Every failure is a JSON `{"error": "..."}` body. Searches run inline on
//! the request task against the current snapshot; registrations do file I/O
//! and run on the blocking pool.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use farepath_core::traits::ConfigProvider;
use farepath_core::{Error, Result};
use farepath_graph::{
    ErrorResponse, HealthResponse, MessageResponse, Node, RouteResponse, parse_price,
};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tokio::net::TcpListener;

use crate::state::AppState;

const MISSING_PARAMS: &str = "Parameters 'from' and 'to' are required";
const MISSING_FIELDS: &str = "Fields 'from', 'to', and 'price' are required";
const ROUTE_NOT_FOUND: &str = "Route not found";
const REGISTERED: &str = "Route successfully registered";

// ============================================================================
// Router
// ============================================================================

/// Build the API router over `state`.
pub fn router<C: ConfigProvider>(state: AppState<C>) -> Router {
    Router::new()
        .route("/best-route", get(best_route_handler::<C>))
        .route("/register-route", post(register_route_handler::<C>))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<C, F>(state: AppState<C>, addr: String, shutdown: F) -> Result<()>
where
    C: ConfigProvider,
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            Error::io(std::io::Error::new(
                e.kind(),
                format!("could not bind {addr}: {e}"),
            ))
        })?;
    let local = listener.local_addr()?;

    tracing::info!(
        %local,
        routes = %state.routes().store().path().display(),
        "Server started at http://{local}"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct RouteParams {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RegisterRequest {
    from: Option<String>,
    to: Option<String>,
    price: Option<Value>,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

async fn best_route_handler<C: ConfigProvider>(
    State(state): State<AppState<C>>,
    Query(params): Query<RouteParams>,
) -> std::result::Result<Json<RouteResponse>, ApiError> {
    let (Some(from), Some(to)) = (non_blank(params.from), non_blank(params.to)) else {
        return Err(ApiError::bad_request(MISSING_PARAMS));
    };

    let best = state.routes().best_route(&from, &to);
    if !best.reaches(&Node::new(&to)) {
        tracing::debug!(%from, %to, "no route");
        return Err(ApiError::not_found(ROUTE_NOT_FOUND));
    }

    RouteResponse::from_best_route(&best)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(ROUTE_NOT_FOUND))
}

async fn register_route_handler<C: ConfigProvider>(
    State(state): State<AppState<C>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e.body_text())))?;

    let (Some(from), Some(to), Some(price)) =
        (non_blank(request.from), non_blank(request.to), request.price)
    else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };
    let price = price_from_json(&price)?;

    let routes = state.routes_arc();
    tokio::task::spawn_blocking(move || routes.register(&from, &to, price))
        .await
        .map_err(|e| ApiError::internal(format!("registration task failed: {e}")))??;

    Ok((StatusCode::CREATED, Json(MessageResponse::new(REGISTERED))))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept a JSON integer or a string holding one.
fn price_from_json(value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| Error::validation(format!("price {n} is not an integer"))),
        Value::String(s) => parse_price(s),
        other => Err(Error::validation(format!(
            "price must be an integer, got {other}"
        ))),
    }
}

// ============================================================================
// Errors
// ============================================================================

/// An error rendered as `{"error": ...}` with a status code.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => Self::bad_request(message),
            Error::NotFound(message) => Self::not_found(message),
            conflict @ Error::Conflict { .. } => Self::new(StatusCode::CONFLICT, conflict.to_string()),
            other => {
                tracing::error!(error = %other, "request failed");
                Self::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

// ============================================================================
// Tests
// ============================================================================
