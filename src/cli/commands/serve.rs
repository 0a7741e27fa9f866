//! Web front end: a single page backed by a small JSON API.
//!
//! Every browser gets its own [`SessionState`], found through the
//! `tubeqa_session` cookie.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::TubeQaError;
use crate::rag::AnswerSource;
use crate::session::{ProcessStage, RenderedEntry, SessionController, SessionState};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

const SESSION_COOKIE: &str = "tubeqa_session";
const INDEX_HTML: &str = include_str!("../../web/index.html");

/// Shared application state.
struct AppState {
    controller: SessionController,
    sessions: SessionRegistry,
}

/// Run the web server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let ttl = Duration::minutes(settings.server.session_ttl_minutes);
    let controller = preflight::start_controller(settings)?;

    let state = Arc::new(AppState {
        controller,
        sessions: SessionRegistry::new(ttl),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/process", post(process))
        .route("/api/ask", post(ask))
        .route("/api/history", get(history))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("YouTube Video Q&A");
    println!();
    Output::success(&format!("Open http://{} in your browser", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Page", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Process video", "POST /api/process");
    Output::kv("Ask", "POST /api/ask");
    Output::kv("History", "GET  /api/history");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Sessions ===

struct SessionEntry {
    state: Arc<tokio::sync::Mutex<SessionState>>,
    last_seen: DateTime<Utc>,
}

/// Live browser sessions with idle expiry.
struct SessionRegistry {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl SessionRegistry {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Look up the session for `id`, creating a fresh one when it is
    /// missing or expired. Expired sessions are dropped on every call.
    fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<tokio::sync::Mutex<SessionState>>) {
        self.get_or_create_at(id, Utc::now())
    }

    fn get_or_create_at(
        &self,
        id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> (Uuid, Arc<tokio::sync::Mutex<SessionState>>) {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let ttl = self.ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_seen <= ttl);
        if sessions.len() < before {
            debug!("Dropped {} idle sessions", before - sessions.len());
        }

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, entry.state.clone());
            }
        }

        let session = SessionState::new();
        let id = session.id();
        let state = Arc::new(tokio::sync::Mutex::new(session));
        sessions.insert(
            id,
            SessionEntry {
                state: state.clone(),
                last_seen: now,
            },
        );
        info!(session = %id, "Started browser session");

        (id, state)
    }

    fn len(&self) -> usize {
        match self.sessions.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

fn with_cookie<T: Serialize>(id: Uuid, status: StatusCode, body: T) -> Response {
    (status, [(header::SET_COOKIE, session_cookie(id))], Json(body)).into_response()
}

/// HTTP status for a failed action.
fn status_for(err: &TubeQaError) -> StatusCode {
    match err {
        TubeQaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TubeQaError::NoVideoProcessed => StatusCode::CONFLICT,
        e if e.is_transcript_unavailable() => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(id: Uuid, err: &TubeQaError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        warn!(session = %id, "Request failed: {}", err);
    }
    with_cookie(
        id,
        status,
        ErrorResponse {
            error: err.user_message(),
        },
    )
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ProcessRequest {
    video_id: String,
}

#[derive(Serialize)]
struct ProcessResponse {
    message: String,
    video_id: String,
    chunks: usize,
    /// Status messages in the order they were reached.
    progress: Vec<String>,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    source: AnswerSource,
    history: Vec<RenderedEntry>,
}

#[derive(Serialize)]
struct HistoryResponse {
    history: Vec<RenderedEntry>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn process(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ProcessRequest>,
) -> Response {
    let (id, session) = state.sessions.get_or_create(session_id_from_headers(&headers));
    let mut session = session.lock().await;

    let mut progress = Vec::new();
    let result = state
        .controller
        .process_video_with_progress(&mut session, &req.video_id, |stage| {
            progress.push(stage.to_string())
        })
        .await;

    match result {
        Ok(result) => with_cookie(
            id,
            StatusCode::OK,
            ProcessResponse {
                message: ProcessStage::Done.to_string(),
                video_id: result.video_id,
                chunks: result.segments_indexed,
                progress,
            },
        ),
        Err(e) => error_response(id, &e),
    }
}

async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AskRequest>,
) -> Response {
    let (id, session) = state.sessions.get_or_create(session_id_from_headers(&headers));
    let mut session = session.lock().await;

    match state.controller.answer_question(&mut session, &req.question).await {
        Ok(response) => with_cookie(
            id,
            StatusCode::OK,
            AskResponse {
                answer: response.answer,
                source: response.source,
                history: session.history().render(),
            },
        ),
        Err(e) => error_response(id, &e),
    }
}

async fn history(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, session) = state.sessions.get_or_create(session_id_from_headers(&headers));
    let session = session.lock().await;
    debug!(session = %id, sessions = state.sessions.len(), "History requested");

    with_cookie(
        id,
        StatusCode::OK,
        HistoryResponse {
            history: session.history().render(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::testing::{FakeEmbedder, FakeFetcher, FakeVideo, ScriptedGenerator};
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_from_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_missing_or_malformed_cookie() {
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("tubeqa_session=not-a-uuid"),
        );
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn test_session_cookie_format() {
        let id = Uuid::new_v4();
        let cookie = session_cookie(id);
        assert!(cookie.starts_with(&format!("tubeqa_session={};", id)));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&TubeQaError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&TubeQaError::NoVideoProcessed), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&TubeQaError::TranscriptsDisabled {
                video_id: "v".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&TubeQaError::NoTranscriptFound {
                video_id: "v".into(),
                languages: vec!["en".into()],
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&TubeQaError::Generation("quota".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_registry_reuses_known_session() {
        let registry = SessionRegistry::new(Duration::minutes(60));
        let (id, first) = registry.get_or_create(None);
        let (again, second) = registry.get_or_create(Some(id));

        assert_eq!(id, again);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_replaces_unknown_session() {
        let registry = SessionRegistry::new(Duration::minutes(60));
        let stranger = Uuid::new_v4();
        let (id, _) = registry.get_or_create(Some(stranger));

        assert_ne!(id, stranger);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_expires_idle_sessions() {
        let registry = SessionRegistry::new(Duration::minutes(10));
        let start = Utc::now();
        let (id, _) = registry.get_or_create_at(None, start);

        let (still, _) = registry.get_or_create_at(Some(id), start + Duration::minutes(5));
        assert_eq!(still, id);

        let later = start + Duration::minutes(30);
        let (fresh, session) = registry.get_or_create_at(Some(id), later);
        assert_ne!(fresh, id);
        assert_eq!(registry.len(), 1);
        assert!(!session.try_lock().unwrap().has_index());
    }

    #[tokio::test]
    async fn test_process_reports_every_stage() {
        let fetcher = FakeFetcher::default().with(
            "hello",
            FakeVideo::Captions(vec!["hello world", "this is a test"]),
        );
        let controller = SessionController::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(fetcher),
            Arc::new(FakeEmbedder),
            Arc::new(ScriptedGenerator::new(Vec::<&str>::new())),
        );
        let state = Arc::new(AppState {
            controller,
            sessions: SessionRegistry::new(Duration::minutes(60)),
        });

        let response = process(
            State(state),
            HeaderMap::new(),
            Json(ProcessRequest {
                video_id: "hello".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["progress"],
            serde_json::json!([
                "Fetching transcript...",
                "Transcript fetched successfully!",
                "Splitting transcript...",
                "Generating embeddings...",
                "Video processed! You can now ask questions.",
            ])
        );
        assert_eq!(json["chunks"], 1);
    }

    #[test]
    fn test_page_shows_progress_messages() {
        assert!(INDEX_HTML.contains("data.progress"));
    }
}
