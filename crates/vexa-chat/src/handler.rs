//! Turn handler: the stateless text and audio pipelines.
//!
//! The handler never touches a context store. Callers pass in the
//! exported window and decide what to append from the result.

use std::path::Path;

use vexa_core::config::VexaConfig;
use vexa_core::types::ContextMessage;
use vexa_llm::{GenerationRequest, GenerationService, SpeechSynthesizer, TranscriptionService};

use crate::audio::{AudioTurnState, AudioTurnTracker};
use crate::error::ChatError;
use crate::outcome::{AudioReply, TRANSCRIPTION_SENTINEL};
use crate::prompt::PromptBuilder;
use crate::scratch::ScratchDir;

/// Default generation budget in tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Runs text and audio turns against the outbound capabilities.
pub struct TurnHandler<G, T, S> {
    generator: G,
    transcriber: T,
    synthesizer: S,
    scratch: ScratchDir,
    prompt: PromptBuilder,
    max_output_tokens: u32,
    temperature: f32,
}

impl<G, T, S> TurnHandler<G, T, S>
where
    G: GenerationService,
    T: TranscriptionService,
    S: SpeechSynthesizer,
{
    /// Create a handler with default prompt and generation settings.
    pub fn new(generator: G, transcriber: T, synthesizer: S, scratch: ScratchDir) -> Self {
        Self {
            generator,
            transcriber,
            synthesizer,
            scratch,
            prompt: PromptBuilder::default(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Create a handler using the `generation` and `general` config sections.
    pub fn from_config(config: &VexaConfig, generator: G, transcriber: T, synthesizer: S) -> Self {
        Self {
            generator,
            transcriber,
            synthesizer,
            scratch: ScratchDir::new(config.general.scratch_path()),
            prompt: PromptBuilder::new(config.generation.system_preamble.clone()),
            max_output_tokens: config.generation.max_output_tokens,
            temperature: config.generation.temperature,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Build the prompt from `window` and `text` and generate a reply.
    pub async fn reply_text(
        &self,
        window: &[ContextMessage],
        text: &str,
    ) -> Result<String, ChatError> {
        let request = GenerationRequest {
            prompt: self.prompt.build(window, text),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        };

        self.generator.generate(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "Generation failed");
            ChatError::Generation(e.to_string())
        })
    }

    /// Run the full audio pipeline for one clip.
    ///
    /// The scratch file is removed on every exit path. Transcription and
    /// synthesis failures are absorbed; any other failure aborts the turn.
    pub async fn process_audio(
        &self,
        audio: &[u8],
        window: &[ContextMessage],
    ) -> Result<AudioReply, ChatError> {
        if audio.is_empty() {
            return Err(ChatError::MissingAudio);
        }

        let mut tracker = AudioTurnTracker::new();
        let result = self.run_audio(&mut tracker, audio, window).await;
        if let Err(ref e) = result {
            tracing::warn!(
                request_id = %tracker.request_id(),
                state = %tracker.current(),
                error = %e,
                "Audio turn failed"
            );
            tracker.fail();
        }
        result
    }

    async fn run_audio(
        &self,
        tracker: &mut AudioTurnTracker,
        audio: &[u8],
        window: &[ContextMessage],
    ) -> Result<AudioReply, ChatError> {
        let scratch = self.scratch.persist(audio).await?;
        tracker.transition(AudioTurnState::Persisted)?;

        let transcription = self.transcribe_or_sentinel(scratch.path()).await;
        tracker.transition(AudioTurnState::Transcribed)?;

        let response = self.reply_text(window, &transcription).await?;
        let audio_url = self.synthesize_or_none(&response).await;
        tracker.transition(AudioTurnState::Replied)?;

        scratch.remove().await?;
        tracker.transition(AudioTurnState::CleanedUp)?;

        Ok(AudioReply {
            transcription,
            response,
            audio_url,
        })
    }

    async fn transcribe_or_sentinel(&self, path: &Path) -> String {
        match self.transcriber.transcribe(path).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("Transcription returned no text");
                TRANSCRIPTION_SENTINEL.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transcription failed");
                TRANSCRIPTION_SENTINEL.to_string()
            }
        }
    }

    async fn synthesize_or_none(&self, text: &str) -> Option<String> {
        match self.synthesizer.synthesize(text).await {
            Ok(url) => url.filter(|u| !u.is_empty()),
            Err(e) => {
                tracing::debug!(error = %e, "Speech synthesis unavailable");
                None
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
