//! Error types for the EchoMind core

use thiserror::Error;

/// Result type alias for EchoMind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the EchoMind core
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generation request could not be issued or was rejected
    #[error("generation error: {0}")]
    Generation(String),

    /// Reply stream terminated abnormally mid-reply
    #[error("stream transport error: {0}")]
    Stream(String),

    /// Audio payload could not be decoded (invalid base64 or truncated PCM)
    #[error("decode error: {0}")]
    Decode(String),

    /// Speech synthesis request failed
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Audio device or playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
