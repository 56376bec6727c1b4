//! Application state shared across all route handlers.
//!
//! AppState holds the loaded configuration and the single conversation
//! session. It is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use vexa_chat::{ChatSession, TurnHandler};
use vexa_core::config::VexaConfig;
use vexa_core::error::VexaError;
use vexa_llm::{ChatCompletionsClient, SilentSynthesizer, WhisperApiClient};

/// Turn handler wired to the hosted provider.
pub type LiveHandler = TurnHandler<ChatCompletionsClient, WhisperApiClient, SilentSynthesizer>;
/// Session wired to the hosted provider.
pub type LiveSession = ChatSession<ChatCompletionsClient, WhisperApiClient, SilentSynthesizer>;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The
/// session guards its own store.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, fixed at startup.
    pub config: Arc<VexaConfig>,
    /// The active conversation.
    pub session: Arc<LiveSession>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: VexaConfig, session: LiveSession) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(session),
            start_time: Instant::now(),
        }
    }

    /// Build provider clients and the session from `config`.
    pub fn from_config(config: VexaConfig, api_key: Option<String>) -> Result<Self, VexaError> {
        let generator = ChatCompletionsClient::from_config(&config, api_key.clone())?;
        let transcriber = WhisperApiClient::from_config(&config, api_key)?;
        let handler = TurnHandler::from_config(&config, generator, transcriber, SilentSynthesizer);
        let session = ChatSession::from_config(&config, handler);
        Ok(Self::new(config, session))
    }

    /// Stateless turn pipelines, shared with the session.
    pub fn handler(&self) -> &LiveHandler {
        self.session.handler()
    }

    pub fn text_budget(&self) -> Duration {
        Duration::from_secs(self.config.chat.text_timeout_secs)
    }

    pub fn audio_budget(&self) -> Duration {
        Duration::from_secs(self.config.chat.audio_timeout_secs)
    }
}
