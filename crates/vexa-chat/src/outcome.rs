//! Turn results handed back across the session boundary.
//!
//! Every failure is represented as data; nothing here is an error type.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Generic user-facing message for a failed text turn.
pub const TEXT_FAILURE_MESSAGE: &str = "Failed to generate response";
/// Generic user-facing message for a failed audio turn.
pub const AUDIO_FAILURE_MESSAGE: &str = "Failed to process audio";
/// User-facing message for an audio request without audio.
pub const MISSING_AUDIO_MESSAGE: &str = "No audio file provided";
/// Transcript substituted when transcription fails.
pub const TRANSCRIPTION_SENTINEL: &str = "Could not transcribe audio";

/// Reply to a text turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextReply {
    pub text: String,
}

/// Reply to an audio turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioReply {
    /// Transcript of the clip, or [`TRANSCRIPTION_SENTINEL`].
    pub transcription: String,
    /// Generated reply text.
    pub response: String,
    /// Synthesized speech reference; absent when no audio was produced.
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
}

/// Failure category, used by callers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    Upstream,
    Timeout,
    Internal,
}

/// A failed turn: a category plus a generic message safe to show users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TurnFailure {
    /// Classify `err`; `generic` replaces internal detail in the message.
    pub fn from_error(err: &ChatError, generic: &str) -> Self {
        let (kind, message) = match err {
            ChatError::MissingAudio => (
                FailureKind::InvalidInput,
                MISSING_AUDIO_MESSAGE.to_string(),
            ),
            ChatError::Generation(_) => (FailureKind::Upstream, generic.to_string()),
            ChatError::Timeout(_) => (FailureKind::Timeout, generic.to_string()),
            ChatError::Scratch(_) | ChatError::InvalidTransition { .. } => {
                (FailureKind::Internal, generic.to_string())
            }
        };
        Self { kind, message }
    }
}

/// Result of submitting one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnResult<T> {
    /// The turn completed and its turns were appended.
    Completed(T),
    /// Input was empty; nothing was appended and no call was made.
    Skipped,
    Failed(TurnFailure),
}

impl<T> TurnResult<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, TurnResult::Completed(_))
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            TurnResult::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&TurnFailure> {
        match self {
            TurnResult::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
