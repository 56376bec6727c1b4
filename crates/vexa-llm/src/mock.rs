//! Mock capability services for tests and offline development.
//!
//! Each mock is cheap to clone; clones share call records so a test can
//! keep a handle after moving the service into a handler.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vexa_core::error::VexaError;

use crate::{GenerationRequest, GenerationService, SpeechSynthesizer, TranscriptionService};

fn record<T>(log: &Mutex<Vec<T>>, item: T) {
    if let Ok(mut entries) = log.lock() {
        entries.push(item);
    }
}

fn snapshot<T: Clone>(log: &Mutex<Vec<T>>) -> Vec<T> {
    log.lock().map(|entries| entries.clone()).unwrap_or_default()
}

// =============================================================================
// MockGenerator
// =============================================================================

/// Generation mock returning a fixed reply or a fixed failure.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    reply: Result<String, String>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleep before answering, to exercise request budgets.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        snapshot(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        snapshot(&self.requests)
    }
}

impl GenerationService for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, VexaError> {
        record(&self.requests, request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().map_err(VexaError::Generation)
    }
}

// =============================================================================
// MockTranscriber
// =============================================================================

/// One observed transcription call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedAudio {
    pub path: PathBuf,
    /// Whether the file existed when the call was made.
    pub existed: bool,
    pub bytes: Vec<u8>,
}

/// Transcription mock returning a fixed transcript or a fixed failure.
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    reply: Result<String, String>,
    observed: Arc<Mutex<Vec<ObservedAudio>>>,
}

impl MockTranscriber {
    pub fn transcribing(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            observed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            observed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        snapshot(&self.observed).len()
    }

    pub fn observed(&self) -> Vec<ObservedAudio> {
        snapshot(&self.observed)
    }
}

impl TranscriptionService for MockTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, VexaError> {
        let bytes = tokio::fs::read(audio_path).await.unwrap_or_default();
        record(
            &self.observed,
            ObservedAudio {
                path: audio_path.to_path_buf(),
                existed: audio_path.exists(),
                bytes,
            },
        );
        self.reply.clone().map_err(VexaError::Transcription)
    }
}

// =============================================================================
// MockSynthesizer
// =============================================================================

/// Synthesizer mock with a fixed outcome.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    reply: Result<Option<String>, String>,
    texts: Arc<Mutex<Vec<String>>>,
}

impl MockSynthesizer {
    pub fn producing(audio_url: impl Into<String>) -> Self {
        Self {
            reply: Ok(Some(audio_url.into())),
            texts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            texts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        snapshot(&self.texts)
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Option<String>, VexaError> {
        record(&self.texts, text.to_string());
        self.reply.clone().map_err(VexaError::Synthesis)
    }
}
