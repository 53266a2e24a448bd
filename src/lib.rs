//! EchoMind core - reply-stream decoding and speech pipeline
//!
//! This library provides the core of the EchoMind reflective assistant:
//! - Persona tag extraction from streamed reply fragments
//! - The closed persona set and its voice table
//! - Base64 PCM decoding into normalized sample buffers
//! - Playback on the one shared output device
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Generation collaborator                 │
//! │        (streamed reply fragments over SSE)           │
//! └────────────────────┬────────────────────────────────┘
//!                      │ fragments
//! ┌────────────────────▼────────────────────────────────┐
//! │                 StreamDecoder                        │
//! │   persona tag (first fragment only) │ transcript     │
//! └────────────────────┬────────────────────────────────┘
//!                      │ transcript + persona
//! ┌────────────────────▼────────────────────────────────┐
//! │     Speech collaborator  →  AudioCodec               │
//! │   (base64 PCM, 24 kHz mono)  (normalized samples)    │
//! └────────────────────┬────────────────────────────────┘
//!                      │ sample buffer
//! ┌────────────────────▼────────────────────────────────┐
//! │               PlaybackCoordinator                    │
//! │           (one shared output device)                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The front end owns rendering and input capture; this crate is the
//! pipeline between the two collaborators and the speakers.

pub mod audio;
pub mod backends;
pub mod config;
pub mod error;
pub mod persona;
pub mod prompt;
pub mod reply;
pub mod stream;

pub use audio::{PlaybackCoordinator, PlaybackHandle, SampleBuffer, decode_payload};
pub use backends::{ChatRole, ChatTurn, GeminiClient, GenerationBackend, SpeechBackend};
pub use config::Config;
pub use error::{Error, Result};
pub use persona::{DEFAULT_VOICE, Persona, resolve_voice};
pub use reply::{CompletedReply, ReplyEngine};
pub use stream::{ReplySnapshot, StreamDecoder, TagState, decode_stream};
