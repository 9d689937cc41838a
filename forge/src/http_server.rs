use crate::cache::CacheScope;
use crate::forger::{CacheStatus, ForgeReport, Forged, NoteForger};
use crate::page::{render_page, OutputRegion, TOO_SHORT_WARNING};
use axum::{
    extract::State,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Inputs shorter than this many characters are rejected without a remote call
pub const MIN_INPUT_CHARS: usize = 50;

/// Cookie carrying the browser session id in session cache scope
pub const SESSION_COOKIE: &str = "gsf_session";

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    forger: Arc<NoteForger>,
}

impl AppState {
    pub fn new(forger: NoteForger) -> Self {
        Self {
            forger: Arc::new(forger),
        }
    }
}

/// Form posted by the page
#[derive(Deserialize)]
pub struct ForgeForm {
    #[serde(default)]
    content: String,
}

/// Request model for the JSON API
#[derive(Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    content: String,
}

/// Response model for the JSON API
#[derive(Serialize, Debug)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotesResponse {
    Notes { markdown: String, cached: bool },
    Failed { message: String, cached: bool },
    TooShort { message: String, min_chars: usize },
}

impl From<ForgeReport> for NotesResponse {
    fn from(report: ForgeReport) -> Self {
        let cached = report.cache == CacheStatus::Hit;
        match report.outcome {
            Forged::Notes(markdown) => NotesResponse::Notes { markdown, cached },
            failed @ Forged::Failed(_) => NotesResponse::Failed {
                message: failed.display_text(),
                cached,
            },
        }
    }
}

/// True when `input` is below the minimum length, counted in characters
pub fn is_too_short(input: &str) -> bool {
    input.chars().count() < MIN_INPUT_CHARS
}

/// Build the router
pub fn create_router(state: AppState) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/forge", post(handle_forge_form))
        .route("/api/notes", post(handle_notes_api))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and serve until Ctrl+C or SIGTERM
pub async fn run_server(forger: NoteForger, addr: SocketAddr) -> anyhow::Result<()> {
    let scope = forger.scope();
    let app = create_router(AppState::new(forger));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!(%addr, cache_scope = ?scope, "Study notes forge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    info!("Study notes forge stopped");
    Ok(())
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = resolve_session(state.forger.scope(), &headers);
    with_session_cookie(Html(render_page("", OutputRegion::Empty)).into_response(), &session)
}

async fn handle_forge_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ForgeForm>,
) -> Response {
    let session = resolve_session(state.forger.scope(), &headers);

    let page = if is_too_short(&form.content) {
        debug!(chars = form.content.chars().count(), "Rejected short submission");
        render_page(&form.content, OutputRegion::TooShort)
    } else {
        let report = state
            .forger
            .forge(session.as_ref().map(|s| s.id.as_str()), &form.content)
            .await;
        render_page(&form.content, OutputRegion::Forged(&report.outcome))
    };

    with_session_cookie(Html(page).into_response(), &session)
}

async fn handle_notes_api(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NotesRequest>,
) -> (StatusCode, Json<NotesResponse>) {
    if is_too_short(&payload.content) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(NotesResponse::TooShort {
                message: TOO_SHORT_WARNING.to_string(),
                min_chars: MIN_INPUT_CHARS,
            }),
        );
    }

    // API callers are never issued a cookie; they may send one back from the page.
    let session = match state.forger.scope() {
        CacheScope::Session => session_from_headers(&headers),
        CacheScope::Process => None,
    };

    let report = state.forger.forge(session.as_deref(), &payload.content).await;
    let status = if report.outcome.is_failure() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };

    (status, Json(NotesResponse::from(report)))
}

/// Health check handler
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cached_notes = match state.forger.cache().len().await {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(error = %e, "Failed to read note cache size");
            None
        }
    };

    Json(serde_json::json!({
        "status": "ok",
        "cached_notes": cached_notes,
    }))
}

struct BrowserSession {
    id: String,
    is_new: bool,
}

/// Session identity for cache partitioning; `None` outside session scope
fn resolve_session(scope: CacheScope, headers: &HeaderMap) -> Option<BrowserSession> {
    if scope == CacheScope::Process {
        return None;
    }

    Some(match session_from_headers(headers) {
        Some(id) => BrowserSession { id, is_new: false },
        None => BrowserSession {
            id: Uuid::new_v4().to_string(),
            is_new: true,
        },
    })
}

/// Read a well-formed session id from the `Cookie` headers
pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| id.to_string())
}

fn with_session_cookie(mut response: Response, session: &Option<BrowserSession>) -> Response {
    if let Some(session) = session.as_ref().filter(|s| s.is_new) {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, session.id
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().insert(SET_COOKIE, value);
            }
            Err(e) => error!(error = %e, "Failed to build session cookie"),
        }
    }
    response
}

/// Signal handler for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received terminate signal, shutting down"),
    }
}
