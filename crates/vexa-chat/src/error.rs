//! Error types for the chat core.

use std::time::Duration;

use crate::audio::AudioTurnState;

/// Errors from a single turn's pipeline.
///
/// These never cross the session boundary; `ChatSession` converts them
/// into failure data. Transcription and synthesis failures are absorbed
/// inside the handler, so they have no variant here.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("no audio provided")]
    MissingAudio,
    #[error("generation error: {0}")]
    Generation(String),
    #[error("scratch file error: {0}")]
    Scratch(String),
    #[error("invalid audio turn transition: {from} -> {to}")]
    InvalidTransition {
        from: AudioTurnState,
        to: AudioTurnState,
    },
    #[error("request exceeded its budget of {0:?}")]
    Timeout(Duration),
}
