//! Route handler functions for all API endpoints.
//!
//! The `/api/*` routes are stateless: the caller supplies the context
//! window with each request. The `/session/*` routes drive the server-held
//! conversation.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use vexa_chat::outcome::{
    AUDIO_FAILURE_MESSAGE, MISSING_AUDIO_MESSAGE, TEXT_FAILURE_MESSAGE,
};
use vexa_chat::{ChatError, TextReply, TurnFailure, TurnResult};
use vexa_core::types::{ContextMessage, Turn};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Vec<ContextMessage>,
}

/// Body of `POST /session/messages`.
#[derive(Debug, Deserialize, Serialize)]
pub struct SessionMessageRequest {
    pub message: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub context_turns: usize,
}

// =============================================================================
// Multipart parsing
// =============================================================================

/// Fields of an audio upload.
#[derive(Debug, Default)]
struct AudioForm {
    audio: Option<Bytes>,
    context: Option<String>,
}

async fn read_audio_form(mut multipart: Multipart) -> Result<AudioForm, ApiError> {
    let mut form = AudioForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid audio field: {}", e)))?;
                form.audio = Some(bytes);
            }
            Some("context") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid context field: {}", e)))?;
                form.context = Some(text);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }
    Ok(form)
}

/// Parse the serialized window; absent or blank means no history.
fn parse_context(raw: Option<&str>) -> Result<Vec<ContextMessage>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| ApiError::BadRequest(format!("Invalid context: {}", e))),
    }
}

fn non_empty_audio(form: &AudioForm) -> Option<&[u8]> {
    form.audio.as_deref().filter(|bytes| !bytes.is_empty())
}

async fn within_budget<T>(
    budget: Duration,
    work: impl std::future::Future<Output = Result<T, ChatError>>,
) -> Result<T, ChatError> {
    tokio::time::timeout(budget, work)
        .await
        .unwrap_or(Err(ChatError::Timeout(budget)))
}

fn turn_response<T: Serialize>(result: TurnResult<T>) -> Result<Response, ApiError> {
    match result {
        TurnResult::Completed(reply) => Ok(Json(reply).into_response()),
        TurnResult::Skipped => Ok(StatusCode::NO_CONTENT.into_response()),
        TurnResult::Failed(failure) => Err(failure.into()),
    }
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness and basic session stats.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        context_turns: state.session.context().len(),
    })
}

/// POST /api/chat - one text turn against a caller-supplied window.
pub async fn api_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    if request.message.trim().is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let result = within_budget(
        state.text_budget(),
        state
            .handler()
            .reply_text(&request.context, &request.message),
    )
    .await;

    match result {
        Ok(text) => Ok(Json(TextReply { text }).into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "Chat request failed");
            Err(TurnFailure::from_error(&e, TEXT_FAILURE_MESSAGE).into())
        }
    }
}

/// POST /api/audio - one audio turn against a caller-supplied window.
pub async fn api_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_audio_form(multipart).await?;
    let audio =
        non_empty_audio(&form).ok_or_else(|| ApiError::BadRequest(MISSING_AUDIO_MESSAGE.into()))?;
    let window = parse_context(form.context.as_deref())?;

    let result = within_budget(
        state.audio_budget(),
        state.handler().process_audio(audio, &window),
    )
    .await;

    match result {
        Ok(reply) => Ok(Json(reply).into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "Audio request failed");
            Err(TurnFailure::from_error(&e, AUDIO_FAILURE_MESSAGE).into())
        }
    }
}

/// POST /session/messages - text turn on the server-held conversation.
pub async fn session_message(
    State(state): State<AppState>,
    Json(request): Json<SessionMessageRequest>,
) -> Result<Response, ApiError> {
    turn_response(state.session.submit_text(&request.message).await)
}

/// POST /session/audio - audio turn on the server-held conversation.
pub async fn session_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_audio_form(multipart).await?;
    let audio = non_empty_audio(&form).unwrap_or_default();
    turn_response(state.session.submit_audio(audio).await)
}

/// GET /session/context - the exported window, oldest first.
pub async fn get_context(State(state): State<AppState>) -> Json<Vec<Turn>> {
    Json(state.session.context())
}

/// DELETE /session/context - forget the conversation.
pub async fn clear_context(State(state): State<AppState>) -> StatusCode {
    state.session.clear();
    StatusCode::NO_CONTENT
}
