//! REST routes
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/health` | liveness |
//! | GET | `/` | most recently updated documents |
//! | GET | `/api/swdocs?order=created\|updated&limit=N` | recent documents |
//! | GET | `/api/search?q=PATTERN` | search by name |
//! | GET | `/api/swdocs/:name` | one document |
//! | DELETE | `/api/swdocs/:name` | delete; `{"deleted": bool}` |
//! | POST | `/api/swdocs` | create; 201, or 409 on a taken name |
//! | PUT | `/api/swdocs` | create or update |
//!
//! Failures are `{"error": "..."}`.

use super::{AppState, USER_HEADER};
use crate::api::SwdocsApi;
use crate::commands::CmdResult;
use crate::error::SwdocsError;
use crate::model::{Document, DocumentPayload, DocumentSummary};
use crate::store::{DocumentStore, RecentOrder, RECENT_PAGE_SIZE};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub order: Option<RecentOrder>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error on its way to becoming a JSON response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<SwdocsError> for ApiError {
    fn from(err: SwdocsError) -> Self {
        let status = match &err {
            SwdocsError::Validation(_) => StatusCode::BAD_REQUEST,
            SwdocsError::DuplicateName(_) => StatusCode::CONFLICT,
            SwdocsError::NotFound(_) => StatusCode::NOT_FOUND,
            SwdocsError::WriteTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if err.is_storage() || status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, status = status.as_u16(), "request failed");
        } else {
            debug!(error = %err, status = status.as_u16(), "request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ==================
// Router
// ==================

pub fn swdocs_routes<S: DocumentStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(browse::<S>))
        .route(
            "/api/swdocs",
            get(list_recent::<S>)
                .post(create_document::<S>)
                .put(apply_document::<S>),
        )
        .route("/api/search", get(search::<S>))
        .route(
            "/api/swdocs/:name",
            get(get_document::<S>).delete(delete_document::<S>),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn health() -> &'static str {
    "ok"
}

async fn browse<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Json<Vec<DocumentSummary>>> {
    let result = blocking(&state, |api| {
        api.list_recent(RecentOrder::Updated, RECENT_PAGE_SIZE)
    })
    .await?;
    Ok(Json(result.summaries))
}

async fn list_recent<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<DocumentSummary>>> {
    let Query(query) = query?;
    let order = query.order.unwrap_or_default();
    let limit = query.limit.unwrap_or(RECENT_PAGE_SIZE);
    let result = blocking(&state, move |api| api.list_recent(order, limit)).await?;
    Ok(Json(result.summaries))
}

async fn search<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<DocumentSummary>>> {
    let Query(query) = query?;
    let term = query.q.unwrap_or_default();
    let result = blocking(&state, move |api| api.search(&term)).await?;
    Ok(Json(result.summaries))
}

async fn get_document<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Document>> {
    let result = blocking(&state, move |api| api.get_document(&name)).await?;
    Ok(Json(single(result)?))
}

async fn delete_document<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let result = blocking(&state, move |api| api.delete_document(&name)).await?;
    Ok(Json(DeleteResponse {
        deleted: !result.deleted.is_empty(),
    }))
}

async fn create_document<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    payload: Result<Json<DocumentPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let Json(payload) = payload?;
    let payload = with_caller(&headers, payload);
    let result = blocking(&state, move |api| api.create_document(payload)).await?;
    Ok((StatusCode::CREATED, Json(single(result)?)))
}

async fn apply_document<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    payload: Result<Json<DocumentPayload>, JsonRejection>,
) -> ApiResult<Json<Document>> {
    let Json(payload) = payload?;
    let payload = with_caller(&headers, payload);
    let result = blocking(&state, move |api| api.apply_document(payload)).await?;
    Ok(Json(single(result)?))
}

// ==================
// Helpers
// ==================

async fn blocking<S, T, F>(state: &Arc<AppState<S>>, op: F) -> ApiResult<T>
where
    S: DocumentStore + 'static,
    T: Send + 'static,
    F: FnOnce(&SwdocsApi<S>) -> crate::error::Result<T> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || op(&state.api))
        .await
        .map_err(|e| ApiError::internal(format!("worker failed: {}", e)))?
        .map_err(ApiError::from)
}

fn single(result: CmdResult) -> ApiResult<Document> {
    result
        .documents
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal("command returned no document"))
}

fn with_caller(headers: &HeaderMap, mut payload: DocumentPayload) -> DocumentPayload {
    let caller = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(caller) = caller {
        payload.user = Some(caller.to_string());
    }
    payload
}
