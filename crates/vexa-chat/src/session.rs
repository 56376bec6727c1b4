//! Conversation session: owns the context store and drives turns through it.
//!
//! The store lock is held only to append or export, never across a
//! provider call, so concurrent turns interleave and land in completion
//! order.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use vexa_core::config::VexaConfig;
use vexa_core::types::{Turn, TurnKind};
use vexa_llm::{GenerationService, SpeechSynthesizer, TranscriptionService};

use crate::context::ContextStore;
use crate::error::ChatError;
use crate::handler::TurnHandler;
use crate::outcome::{
    AudioReply, TextReply, TurnFailure, TurnResult, AUDIO_FAILURE_MESSAGE, TEXT_FAILURE_MESSAGE,
};

/// Default wall-clock budget for a text turn.
pub const DEFAULT_TEXT_BUDGET: Duration = Duration::from_secs(30);
/// Default wall-clock budget for an audio turn.
pub const DEFAULT_AUDIO_BUDGET: Duration = Duration::from_secs(60);

/// One active conversation.
pub struct ChatSession<G, T, S> {
    handler: TurnHandler<G, T, S>,
    store: Mutex<ContextStore>,
    text_budget: Duration,
    audio_budget: Duration,
}

impl<G, T, S> ChatSession<G, T, S>
where
    G: GenerationService,
    T: TranscriptionService,
    S: SpeechSynthesizer,
{
    pub fn new(handler: TurnHandler<G, T, S>, store: ContextStore) -> Self {
        Self {
            handler,
            store: Mutex::new(store),
            text_budget: DEFAULT_TEXT_BUDGET,
            audio_budget: DEFAULT_AUDIO_BUDGET,
        }
    }

    /// Create a session with an empty store sized and budgeted from `config`.
    pub fn from_config(config: &VexaConfig, handler: TurnHandler<G, T, S>) -> Self {
        Self::new(handler, ContextStore::from_config(&config.context)).with_budgets(
            Duration::from_secs(config.chat.text_timeout_secs),
            Duration::from_secs(config.chat.audio_timeout_secs),
        )
    }

    pub fn with_budgets(mut self, text: Duration, audio: Duration) -> Self {
        self.text_budget = text;
        self.audio_budget = audio;
        self
    }

    pub fn handler(&self) -> &TurnHandler<G, T, S> {
        &self.handler
    }

    /// Submit a typed message.
    ///
    /// Whitespace-only input is skipped without appending or calling out.
    /// On failure the user turn stays in the store and no assistant turn
    /// is appended.
    pub async fn submit_text(&self, text: &str) -> TurnResult<TextReply> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty text turn");
            return TurnResult::Skipped;
        }

        let outcome = match tokio::time::timeout(self.text_budget, self.run_text(text)).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout(self.text_budget)),
        };

        match outcome {
            Ok(reply) => TurnResult::Completed(reply),
            Err(e) => {
                tracing::warn!(error = %e, "Text turn failed");
                TurnResult::Failed(TurnFailure::from_error(&e, TEXT_FAILURE_MESSAGE))
            }
        }
    }

    async fn run_text(&self, text: &str) -> Result<TextReply, ChatError> {
        let window = {
            let mut store = self.lock_store();
            store.append(Turn::user(text, TurnKind::Text));
            store.export_messages()
        };

        let reply = self.handler.reply_text(&window, text).await?;
        self.lock_store()
            .append(Turn::assistant(reply.as_str(), TurnKind::Text));
        Ok(TextReply { text: reply })
    }

    /// Submit a recorded clip.
    ///
    /// On success the transcript and the reply are appended as audio
    /// turns. On failure nothing is appended.
    pub async fn submit_audio(&self, audio: &[u8]) -> TurnResult<AudioReply> {
        let window = self.lock_store().export_messages();

        let outcome = match tokio::time::timeout(
            self.audio_budget,
            self.handler.process_audio(audio, &window),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout(self.audio_budget)),
        };

        match outcome {
            Ok(reply) => {
                let mut store = self.lock_store();
                store.append(Turn::user(reply.transcription.as_str(), TurnKind::Audio));
                store.append(Turn::assistant(reply.response.as_str(), TurnKind::Audio));
                TurnResult::Completed(reply)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Audio turn failed");
                TurnResult::Failed(TurnFailure::from_error(&e, AUDIO_FAILURE_MESSAGE))
            }
        }
    }

    /// Snapshot of the exported context window.
    pub fn context(&self) -> Vec<Turn> {
        self.lock_store().export_window()
    }

    /// Number of turns retained internally.
    pub fn retained(&self) -> usize {
        self.lock_store().len()
    }

    pub fn max_turns(&self) -> usize {
        self.lock_store().max_turns()
    }

    /// Empty the store.
    pub fn clear(&self) {
        self.lock_store().clear();
        tracing::info!("Conversation context cleared");
    }

    // Store operations cannot panic midway, so a poisoned lock still guards
    // a consistent log.
    fn lock_store(&self) -> MutexGuard<'_, ContextStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Tests
// =============================================================================
