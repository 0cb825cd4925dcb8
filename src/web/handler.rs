//! HTTP handlers for the consultation UI
//!
//! - GET  /              : consultation form
//! - POST /              : submit the form
//! - GET  /health        : liveness probe
//! - GET  /api/personas  : persona ids and labels
//! - POST /api/consult   : JSON consultation

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::consult::{is_blank, ConsultationRequest, Dispatcher, ERROR_PREFIX, EMPTY_INPUT_WARNING};
use crate::error::{Error, Result};

use super::page::{self, Notice, PageState};

/// Shared state for web handlers
#[derive(Clone)]
pub struct WebState {
    pub dispatcher: Arc<Dispatcher>,
}

impl WebState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Form fields posted by the page
#[derive(Debug, Deserialize)]
pub struct ConsultForm {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub persona: String,
}

/// JSON body of `POST /api/consult`
#[derive(Debug, Deserialize)]
pub struct ConsultBody {
    pub question: String,
    pub persona: String,
}

#[derive(Debug, Serialize)]
pub struct ConsultResponse {
    pub answer: String,
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PersonaSummary {
    pub id: &'static str,
    pub label: &'static str,
}

/// Create the router with every route and request tracing
pub fn web_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(health))
        .route("/api/personas", get(list_personas))
        .route("/api/consult", post(consult))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C
pub async fn serve(addr: &str, state: WebState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::ServerBind {
            addr: addr.to_string(),
            source: e,
        })?;

    let local: SocketAddr = listener.local_addr()?;
    info!(addr = %local, "Consultation UI listening on http://{}/", local);

    axum::serve(listener, web_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C, shutting down");
        return;
    }
    info!("Shutdown signal received, draining connections");
}

// =============================================================================
// Page handlers
// =============================================================================

/// GET /
async fn index() -> Html<String> {
    Html(page::render(&PageState::default()))
}

/// POST /
async fn submit(State(state): State<WebState>, Form(form): Form<ConsultForm>) -> impl IntoResponse {
    if is_blank(&form.question) {
        let page_state = PageState::with_notice(
            &form.question,
            &form.persona,
            Notice::Warning(EMPTY_INPUT_WARNING.to_string()),
        );
        return (StatusCode::OK, Html(page::render(&page_state)));
    }

    let (status, notice) = match state.dispatcher.respond(&form.question, &form.persona).await {
        Ok(text) => (StatusCode::OK, Notice::Answer(text)),
        Err(e) => {
            warn!(persona = %form.persona, error = %e, "Rejected consultation");
            (
                StatusCode::BAD_REQUEST,
                Notice::Error(format!("{}: {}", ERROR_PREFIX, e)),
            )
        }
    };

    let page_state = PageState::with_notice(&form.question, &form.persona, notice);
    (status, Html(page::render(&page_state)))
}

// =============================================================================
// JSON handlers
// =============================================================================

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/personas
async fn list_personas(State(state): State<WebState>) -> impl IntoResponse {
    let personas: Vec<PersonaSummary> = state
        .dispatcher
        .registry()
        .all()
        .iter()
        .map(|p| PersonaSummary {
            id: p.id.slug(),
            label: p.display_label,
        })
        .collect();
    Json(personas)
}

/// POST /api/consult
async fn consult(
    State(state): State<WebState>,
    Json(body): Json<ConsultBody>,
) -> axum::response::Response {
    if is_blank(&body.question) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: EMPTY_INPUT_WARNING.to_string(),
            }),
        )
            .into_response();
    }

    let request = match ConsultationRequest::new(body.question, &body.persona) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let outcome = state.dispatcher.dispatch(&request).await;
    let ok = outcome.is_answer();
    Json(ConsultResponse {
        answer: outcome.into_text(),
        ok,
    })
    .into_response()
}
