//! Vexa LLM crate - outbound language-model, transcription, and speech capabilities.
//!
//! Each capability is a trait so the chat core can be driven by the hosted
//! HTTP clients in production and by the mock services in tests.

use std::future::Future;
use std::path::Path;

use vexa_core::error::VexaError;

pub mod generation;
pub mod http;
pub mod mock;
pub mod speech;
pub mod transcription;

pub use generation::ChatCompletionsClient;
pub use mock::{MockGenerator, MockSynthesizer, MockTranscriber};
pub use speech::SilentSynthesizer;
pub use transcription::WhisperApiClient;

// =============================================================================
// Request types
// =============================================================================

/// A single-prompt generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Full prompt: preamble, serialized history, and the new user line.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

// =============================================================================
// Traits
// =============================================================================

/// Service that turns a text prompt into generated text.
pub trait GenerationService: Send + Sync {
    /// Generate a reply for `request`.
    ///
    /// Errors cover transport failures, non-success statuses, and replies
    /// with no text content.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, VexaError>> + Send;
}

/// Service for transcribing an audio file to text.
pub trait TranscriptionService: Send + Sync {
    /// Transcribe the audio stored at `audio_path`.
    ///
    /// # Arguments
    /// * `audio_path` - Path to a waveform container (WAV) on local disk.
    ///
    /// # Returns
    /// The best-effort transcript text.
    fn transcribe(
        &self,
        audio_path: &Path,
    ) -> impl Future<Output = Result<String, VexaError>> + Send;
}

/// Service that renders reply text as audio.
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns a reference to produced audio, or `None` when no audio was produced.
    fn synthesize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Option<String>, VexaError>> + Send;
}
