use super::state::AppState;
use crate::minutes::{GenerationState, MeetingRequest, MinutesOutcome};
use crate::uploads::{self, CollisionError, UploadError, UploadListing, UploadedFile};
use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::{error, info, warn};

/// Document types accepted from the upload control
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

const INDEX_HTML: &str = include_str!("index.html");

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub directory: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub name: String,
    pub overwritten: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MinutesResponse {
    Completed {
        log: String,
        states: Vec<GenerationState>,
        minutes: String,
        file_name: String,
        download_url: String,
        cleanup_errors: Vec<String>,
    },
    Warning {
        log: String,
        states: Vec<GenerationState>,
        warning: String,
    },
    Failed {
        log: String,
        states: Vec<GenerationState>,
        error: String,
        cleanup_errors: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn has_allowed_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /session
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.sessions.session().await {
        Ok(session) => (
            StatusCode::OK,
            Json(SessionResponse {
                session_id: session.session_id.clone(),
                directory: session.directory.display().to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to open upload session: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to open upload session: {}", e),
            )
        }
    }
}

/// POST /uploads
/// Store one file in the session directory
pub async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let file = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return error_response(StatusCode::BAD_REQUEST, "Missing multipart field 'file'")
            }
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
        };

        if field.name() != Some("file") {
            continue;
        }

        let name = match field.file_name() {
            Some(name) => name.to_string(),
            None => return error_response(StatusCode::BAD_REQUEST, "Upload has no file name"),
        };

        match field.bytes().await {
            Ok(bytes) => break UploadedFile::new(name, bytes.to_vec()),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
        }
    };

    if !has_allowed_extension(&file.name) {
        warn!("Rejected upload with unsupported type: {}", file.name);
        return error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!(
                "Unsupported file type: {} (allowed: {})",
                file.name,
                ALLOWED_EXTENSIONS.join(", ")
            ),
        );
    }

    let session = match state.sessions.session().await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to open upload session: {:#}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    match uploads::save(session.directory(), &file, state.upload_policy) {
        Ok(saved) => (
            StatusCode::CREATED,
            Json(UploadResponse {
                message: saved.message(),
                name: saved.name,
                overwritten: saved.overwritten,
            }),
        )
            .into_response(),
        Err(e) if e.downcast_ref::<CollisionError>().is_some() => {
            error_response(StatusCode::CONFLICT, e.to_string())
        }
        Err(e) if e.downcast_ref::<UploadError>().is_some() => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            error!("Failed to save upload: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to save upload: {}", e),
            )
        }
    }
}

/// GET /uploads
pub async fn list_uploads(State(state): State<AppState>) -> Response {
    let listing = state
        .sessions
        .session()
        .await
        .and_then(|session| uploads::list(session.directory()));

    match listing {
        Ok(files) => {
            let listing: UploadListing = uploads::summarize(files);
            (StatusCode::OK, Json(listing)).into_response()
        }
        Err(e) => {
            error!("Failed to list uploads: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list uploads: {}", e),
            )
        }
    }
}

/// DELETE /uploads
/// Wipe the session directory and recreate it empty
pub async fn clear_uploads(State(state): State<AppState>) -> Response {
    let cleared = state
        .sessions
        .session()
        .await
        .and_then(|session| uploads::clear(session.directory()));

    match cleared {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "📂 업로드된 파일이 모두 삭제되었습니다.".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to clear uploads: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to clear uploads: {}", e),
            )
        }
    }
}

/// POST /minutes
/// Generate minutes from everything uploaded so far
pub async fn generate_minutes(
    State(state): State<AppState>,
    payload: Result<Json<MeetingRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected minutes request: {}", rejection.body_text());
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    let _guard = state.generation_lock.lock().await;

    let session = match state.sessions.session().await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to open upload session: {:#}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    info!("Minutes requested for meeting '{}'", req.meeting_name.trim());

    match state.minutes.run(&req, session.directory()).await {
        Ok(MinutesOutcome::Completed(done)) => {
            let download_url = format!(
                "/downloads/{}",
                utf8_percent_encode(&done.file_name, NON_ALPHANUMERIC)
            );
            (
                StatusCode::OK,
                Json(MinutesResponse::Completed {
                    log: done.log.text(),
                    states: done.log.history().to_vec(),
                    minutes: done.minutes,
                    file_name: done.file_name,
                    download_url,
                    cleanup_errors: done.cleanup_errors,
                }),
            )
                .into_response()
        }
        Ok(MinutesOutcome::Warning { warning, log }) => (
            StatusCode::OK,
            Json(MinutesResponse::Warning {
                log: log.text(),
                states: log.history().to_vec(),
                warning: warning.to_string(),
            }),
        )
            .into_response(),
        Err(failure) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MinutesResponse::Failed {
                log: failure.log.text(),
                states: failure.log.history().to_vec(),
                error: format!("{:#}", failure.error),
                cleanup_errors: failure.cleanup_errors,
            }),
        )
            .into_response(),
    }
}

/// GET /downloads/:file_name
/// Offer generated minutes as an attachment
pub async fn download_minutes(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Response {
    match state.minutes.writer().read(&file_name) {
        Ok(Some(text)) => {
            let disposition = format!(
                "attachment; filename*=UTF-8''{}",
                utf8_percent_encode(&file_name, NON_ALPHANUMERIC)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                text,
            )
                .into_response()
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("Minutes {} not found", file_name),
        ),
        Err(e) => {
            error!("Failed to read minutes {}: {:#}", file_name, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read minutes: {}", e),
            )
        }
    }
}
