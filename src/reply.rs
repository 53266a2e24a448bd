//! Reply orchestration
//!
//! Drives one model reply end to end: stream the fragments, decode them into
//! transcript snapshots, then voice the finished reply if a persona was
//! resolved.

use futures::StreamExt;

use crate::audio::{SampleBuffer, decode_payload};
use crate::backends::{ChatTurn, GenerationBackend, SpeechBackend};
use crate::persona::{Persona, resolve_voice};
use crate::prompt::build_system_instruction;
use crate::stream::{ReplySnapshot, StreamDecoder};
use crate::Result;

/// A finished reply: frozen transcript, resolved persona, optional voice
#[derive(Debug)]
pub struct CompletedReply {
    /// Final transcript with tag markup removed
    pub transcript: String,
    /// Persona announced by the reply's tag, if any
    pub persona: Option<Persona>,
    /// Synthesized speech, absent for personaless/empty replies and when
    /// synthesis degrades
    pub audio: Option<SampleBuffer>,
}

/// Runs replies against the two external collaborators
pub struct ReplyEngine<G, S> {
    generator: G,
    synthesizer: S,
}

impl<G, S> ReplyEngine<G, S>
where
    G: GenerationBackend,
    S: SpeechBackend,
{
    /// Pair a generation backend with a speech backend
    #[must_use]
    pub const fn new(generator: G, synthesizer: S) -> Self {
        Self {
            generator,
            synthesizer,
        }
    }

    /// Run one reply for the given history and user turn
    ///
    /// `on_snapshot` is invoked once per fragment, in arrival order, with
    /// the running transcript and persona. After a clean stream end, speech
    /// is synthesized only when the transcript is non-empty and a persona
    /// was resolved; any failure on the audio path degrades to a voiceless
    /// reply rather than discarding the text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Stream`] if the fragment stream fails mid-reply.
    /// Snapshots already delivered through `on_snapshot` remain valid.
    pub async fn run(
        &self,
        history: &[ChatTurn],
        user_text: &str,
        mut on_snapshot: impl FnMut(&ReplySnapshot) + Send,
    ) -> Result<CompletedReply> {
        let system_instruction = build_system_instruction();
        let mut fragments = self
            .generator
            .stream_reply(&system_instruction, history, user_text)
            .await?;

        let mut decoder = StreamDecoder::new();
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(text) => {
                    let snapshot = decoder.push(&text);
                    on_snapshot(&snapshot);
                }
                Err(e) => {
                    tracing::warn!(
                        backend = self.generator.name(),
                        error = %e,
                        transcript_len = decoder.transcript().len(),
                        "reply stream failed mid-reply"
                    );
                    return Err(e);
                }
            }
        }

        let persona = decoder.persona();
        let transcript = decoder.into_transcript();
        tracing::debug!(
            persona = persona.map(Persona::display_name),
            transcript_len = transcript.len(),
            "reply stream complete"
        );

        let audio = if transcript.is_empty() || persona.is_none() {
            // Personaless or empty replies are never voiced
            None
        } else {
            self.synthesize_audio(&transcript, persona).await
        };

        Ok(CompletedReply {
            transcript,
            persona,
            audio,
        })
    }

    /// Voice a finished transcript, degrading to `None` on any failure
    async fn synthesize_audio(
        &self,
        transcript: &str,
        persona: Option<Persona>,
    ) -> Option<SampleBuffer> {
        let voice = resolve_voice(persona);

        let payload = match self.synthesizer.synthesize(transcript, voice).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!(voice, "synthesis unavailable, reply stays text-only");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.synthesizer.name(),
                    voice,
                    error = %e,
                    "speech synthesis failed, reply stays text-only"
                );
                return None;
            }
        };

        match decode_payload(&payload) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                tracing::warn!(voice, error = %e, "speech payload undecodable, discarded");
                None
            }
        }
    }
}
