//! Hosted Whisper transcription client (OpenAI-compatible multipart API).

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use vexa_core::config::VexaConfig;
use vexa_core::error::VexaError;

use crate::http::{authorize, build_client, endpoint, ensure_success, http_error};
use crate::TranscriptionService;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Transcription client for `POST {base_url}/audio/transcriptions`.
#[derive(Debug, Clone)]
pub struct WhisperApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl WhisperApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VexaError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        })
    }

    /// Build from the `provider` and `transcription` config sections.
    pub fn from_config(config: &VexaConfig, api_key: Option<String>) -> Result<Self, VexaError> {
        Self::new(
            config.provider.base_url.clone(),
            api_key,
            config.transcription.model.clone(),
            Duration::from_secs(config.transcription.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TranscriptionService for WhisperApiClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, VexaError> {
        let audio = tokio::fs::read(audio_path).await?;
        let audio_len = audio.len();

        let part = Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(http_error)?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let builder = self
            .client
            .post(endpoint(&self.base_url, "audio/transcriptions"))
            .multipart(form);
        let response = authorize(builder, self.api_key.as_deref())
            .send()
            .await
            .map_err(http_error)?;
        let response = ensure_success(response).await?;

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| VexaError::Transcription(format!("malformed response: {}", e)))?;

        let text = parsed
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| VexaError::Transcription("response contained no text".to_string()))?;

        tracing::debug!(
            model = %self.model,
            audio_bytes = audio_len,
            text_len = text.len(),
            "Transcription completed"
        );
        Ok(text)
    }
}
