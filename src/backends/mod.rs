//! External collaborator contracts
//!
//! The core depends on two narrow seams: a generation collaborator that
//! streams reply fragments, and a speech collaborator that turns a finished
//! transcript into a base64 PCM payload. Production traffic goes through
//! [`GeminiClient`]; tests substitute in-memory fakes.

mod gemini;

pub use gemini::GeminiClient;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Lazy, fallible sequence of reply fragments
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Who authored a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person reflecting
    User,
    /// A prior model reply
    Assistant,
}

/// One prior turn of the conversation
///
/// History is ordered oldest-first; persona tags have already been stripped
/// from assistant turns by the stream decoder.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatTurn {
    /// Turn author
    pub role: ChatRole,
    /// Visible text of the turn
    pub text: String,
}

impl ChatTurn {
    /// Build a user turn
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// Build an assistant turn
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Generation collaborator: streams one reply as ordered text fragments
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Open a fragment stream for a new user turn
    ///
    /// The stream terminates when the reply is complete; an abnormal
    /// termination surfaces as [`crate::Error::Stream`] mid-sequence.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be issued.
    async fn stream_reply(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        user_text: &str,
    ) -> Result<FragmentStream>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Speech collaborator: synthesizes a finished transcript
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Request synthesis of `text` in the given voice
    ///
    /// Returns the base64 PCM payload, or `Ok(None)` when synthesis is
    /// unavailable for this reply (not a failure: the reply stays text-only).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails outright.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Option<String>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
