//! Preview host: serves item pages with their head fragment and accepts
//! editor saves over HTTP.

use crate::editor::EditorView;
use crate::error::Error;
use crate::i18n::{Monolingual, MultilingualLayer, StaticLayer};
use crate::injector::{HeadInjector, PageContext, SaveOutcome, SaveRequest};
use crate::store::{FragmentStore, ItemId};
use crate::submission::Submission;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Header carrying the API key on save requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared state of the preview host.
pub struct AppState {
    pub injector: HeadInjector<Arc<dyn FragmentStore>>,
    /// `None` when no multilingual layer is configured.
    pub languages: Option<StaticLayer>,
    pub api_key: Option<String>,
}

impl AppState {
    /// The layer for one request, switched to `lang` when given.
    fn layer(&self, lang: Option<&str>) -> Result<Box<dyn MultilingualLayer + Send>, ApiError> {
        match (&self.languages, lang) {
            (None, _) => Ok(Box::new(Monolingual::default())),
            (Some(layer), None) => Ok(Box::new(layer.clone())),
            (Some(layer), Some(code)) => layer
                .with_current(code)
                .map(|layer| Box::new(layer) as Box<dyn MultilingualLayer + Send>)
                .ok_or_else(|| ApiError::BadRequest(format!("language '{}' is not enabled", code))),
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = &self.api_key else {
            return Ok(());
        };
        let provided = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if constant_time_compare(provided, expected) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

/// Constant-time string comparison for the API key.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Unauthorized,
    Unprocessable(String),
    Internal,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidLanguageCode(_) | Error::UnknownLanguage(_) => {
                ApiError::Unprocessable(e.to_string())
            }
            other => {
                warn!("Request failed: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid API key".to_string()),
            ApiError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// Body of a save request. A missing `field` means the form did not carry
/// the fragment input.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveBody {
    #[serde(default)]
    pub autosave: bool,
    #[serde(default)]
    pub field: Option<Submission>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub outcome: SaveOutcome,
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn page_handler(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<ItemId>,
    Query(query): Query<LangQuery>,
) -> Result<Html<String>, ApiError> {
    let layer = state.layer(query.lang.as_deref())?;
    let head = state
        .injector
        .render_head(&PageContext::singular(item_id), layer.as_ref())
        .unwrap_or_default();
    Ok(Html(render_page(item_id, layer.current_language().as_str(), &head)))
}

async fn head_handler(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<ItemId>,
    Query(query): Query<LangQuery>,
) -> Result<Html<String>, ApiError> {
    let layer = state.layer(query.lang.as_deref())?;
    let head = state
        .injector
        .render_head(&PageContext::singular(item_id), layer.as_ref())
        .unwrap_or_default();
    Ok(Html(head))
}

async fn editor_handler(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<ItemId>,
    Query(query): Query<LangQuery>,
) -> Result<Json<EditorView>, ApiError> {
    let layer = state.layer(query.lang.as_deref())?;
    let active = query.lang.as_ref().map(|_| layer.current_language());
    let view = state
        .injector
        .editor_view(item_id, layer.as_ref(), active.as_ref())?;
    Ok(Json(view))
}

async fn save_handler(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<ItemId>,
    headers: HeaderMap,
    Json(body): Json<SaveBody>,
) -> Result<Json<SaveResponse>, ApiError> {
    state.authorize(&headers)?;
    let request = SaveRequest {
        autosave: body.autosave,
        submission: body.field,
    };
    let outcome = state.injector.save(item_id, request)?;
    Ok(Json(SaveResponse { outcome }))
}

/// Minimal document with the fragment placed at the end of `<head>`.
fn render_page(item_id: ItemId, lang: &str, head: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n<title>Item {item_id}</title>\n{head}\n</head>\n<body></body>\n</html>\n"
    )
}

/// Build the HTTP router for the preview host.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/items/:id", get(page_handler))
        .route("/items/:id/head", get(head_handler))
        .route("/items/:id/editor", get(editor_handler))
        .route("/items/:id/fragment", put(save_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
