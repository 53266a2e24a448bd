//! Configuration for the EchoMind core

use secrecy::SecretString;

use crate::{Error, Result};

/// Default Gemini REST endpoint
const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for streamed reply generation
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for speech synthesis
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// EchoMind core configuration
///
/// There is no persisted configuration beyond these values: the persona →
/// voice table and the PCM format constants are compiled in.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (from `GEMINI_API_KEY` or `API_KEY` env)
    pub api_key: SecretString,

    /// API base URL, overridable for tests and proxies
    /// (from `ECHOMIND_API_BASE_URL` env)
    pub api_base_url: String,

    /// Model identifier for reply generation
    /// (from `ECHOMIND_TEXT_MODEL` env)
    pub text_model: String,

    /// Model identifier for speech synthesis
    /// (from `ECHOMIND_TTS_MODEL` env)
    pub tts_model: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns error if no API key is set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| Error::Config("GEMINI_API_KEY or API_KEY must be set".to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            api_base_url: std::env::var("ECHOMIND_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            text_model: std::env::var("ECHOMIND_TEXT_MODEL")
                .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            tts_model: std::env::var("ECHOMIND_TTS_MODEL")
                .unwrap_or_else(|_| DEFAULT_TTS_MODEL.to_string()),
        })
    }

    /// Build a configuration with an explicit key and defaults elsewhere
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
        }
    }
}
