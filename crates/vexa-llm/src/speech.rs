//! Speech synthesis.
//!
//! No text-to-speech provider is wired in; replies are never voiced.

use vexa_core::error::VexaError;

use crate::SpeechSynthesizer;

/// Synthesizer that never produces audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Option<String>, VexaError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_silent_synthesizer_produces_nothing() {
        let out = SilentSynthesizer.synthesize("Hello there").await.unwrap();
        assert!(out.is_none());
    }
}
