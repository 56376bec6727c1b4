use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VexaError};

/// Top-level configuration for the Vexa service.
///
/// Loaded from `~/.vexa/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VexaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl VexaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VexaConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or is invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the turn handlers cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.context.max_turns == 0 {
            return Err(VexaError::Config(
                "context.max_turns must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(VexaError::Config(format!(
                "generation.temperature must be within 0.0..=2.0, got {}",
                self.generation.temperature
            )));
        }
        if self.generation.max_output_tokens == 0 {
            return Err(VexaError::Config(
                "generation.max_output_tokens must be at least 1".to_string(),
            ));
        }
        if self.generation.model.trim().is_empty() {
            return Err(VexaError::Config("generation.model is empty".to_string()));
        }
        if self.transcription.model.trim().is_empty() {
            return Err(VexaError::Config(
                "transcription.model is empty".to_string(),
            ));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(VexaError::Config("provider.base_url is empty".to_string()));
        }
        for (name, secs) in [
            ("chat.text_timeout_secs", self.chat.text_timeout_secs),
            ("chat.audio_timeout_secs", self.chat.audio_timeout_secs),
            ("generation.timeout_secs", self.generation.timeout_secs),
            ("transcription.timeout_secs", self.transcription.timeout_secs),
        ] {
            if secs == 0 {
                return Err(VexaError::Config(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// HTTP port for the API server.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Directory for per-request audio scratch files. Empty means the OS temp dir.
    pub scratch_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 3030,
            log_level: "info".to_string(),
            scratch_dir: String::new(),
        }
    }
}

impl GeneralConfig {
    /// Resolve the scratch directory, defaulting to the OS temp dir.
    pub fn scratch_path(&self) -> PathBuf {
        if self.scratch_dir.trim().is_empty() {
            std::env::temp_dir()
        } else {
            PathBuf::from(&self.scratch_dir)
        }
    }
}

/// How the context store sheds old turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionPolicy {
    /// Keep up to twice the window internally; shrink once it overflows.
    #[default]
    Amortized,
    /// Keep exactly the window; drop the oldest turn on every overflow.
    Eager,
}

/// Conversation context window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Number of most recent turns handed to the generation provider.
    pub max_turns: usize,
    pub retention: RetentionPolicy,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_turns: 5,
            retention: RetentionPolicy::Amortized,
        }
    }
}

/// Per-request wall-clock budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub text_timeout_secs: u64,
    pub audio_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            text_timeout_secs: 30,
            audio_timeout_secs: 60,
        }
    }
}

/// Hosted provider endpoint shared by generation and transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// Language-model generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Opening sentence of every prompt.
    pub system_preamble: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-70b-versatile".to_string(),
            max_output_tokens: 500,
            temperature: 0.7,
            system_preamble: "You are a helpful AI assistant.".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: "whisper-large-v3".to_string(),
            timeout_secs: 60,
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 25 * 1024 * 1024,
        }
    }
}
