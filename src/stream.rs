//! Reply-stream decoding
//!
//! A model reply arrives as an ordered sequence of text fragments. The first
//! fragment may open with a persona tag (`[PERSONA: The Stoic]` followed by
//! an optional newline) announcing which persona the reply is voiced as. The
//! decoder strips the tag, resolves the persona against the closed set, and
//! re-emits a running transcript snapshot after every fragment.

use std::sync::LazyLock;

use futures::{Stream, StreamExt, future};
use regex::Regex;

use crate::Result;
use crate::persona::Persona;

/// Persona tag at the very start of a fragment, optional trailing newline.
/// Non-greedy so later bracket syntax in the same fragment is untouched.
static PERSONA_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[PERSONA: (.*?)\]\n?").expect("valid regex"));

/// State of the persona tag machine
///
/// A tag can only appear in the first fragment, so the machine advances
/// exactly once and never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    /// No fragment seen yet; the next one may open with a tag
    AwaitingFirstFragment,
    /// First fragment processed; later fragments are plain text
    TagResolved,
}

/// Transcript and persona as of one decoded fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplySnapshot {
    /// Accumulated transcript with any tag markup removed
    pub transcript: String,
    /// Resolved persona, `None` until (and unless) a valid tag is seen
    pub persona: Option<Persona>,
}

/// Decodes a fragment sequence into transcript snapshots
///
/// Feed fragments in arrival order via [`push`](Self::push); each call
/// returns the snapshot to render. The decoder itself never fails: a
/// malformed or unknown tag degrades to "no persona", and transport errors
/// are the stream owner's concern.
#[derive(Debug)]
pub struct StreamDecoder {
    transcript: String,
    persona: Option<Persona>,
    state: TagState,
}

impl StreamDecoder {
    /// Create a decoder for one reply
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transcript: String::new(),
            persona: None,
            state: TagState::AwaitingFirstFragment,
        }
    }

    /// Decode the next fragment and return the updated snapshot
    ///
    /// Only the first fragment is inspected for a tag. A tag naming an
    /// unknown persona is stripped all the same (it must never leak into the
    /// visible transcript) while the persona stays absent.
    pub fn push(&mut self, fragment: &str) -> ReplySnapshot {
        let mut text = fragment;

        if self.state == TagState::AwaitingFirstFragment {
            if let Some(captures) = PERSONA_TAG.captures(fragment) {
                self.persona = Persona::from_display_name(&captures[1]);
                if self.persona.is_none() {
                    tracing::debug!(name = &captures[1], "persona tag named unknown persona");
                }
                text = &fragment[captures[0].len()..];
            }
            self.state = TagState::TagResolved;
        }

        self.transcript.push_str(text);
        self.snapshot()
    }

    /// Current snapshot without consuming a fragment
    #[must_use]
    pub fn snapshot(&self) -> ReplySnapshot {
        ReplySnapshot {
            transcript: self.transcript.clone(),
            persona: self.persona,
        }
    }

    /// Transcript accumulated so far
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Resolved persona, if a valid tag was seen
    #[must_use]
    pub const fn persona(&self) -> Option<Persona> {
        self.persona
    }

    /// State of the tag machine
    #[must_use]
    pub const fn state(&self) -> TagState {
        self.state
    }

    /// Consume the decoder, returning the final transcript
    #[must_use]
    pub fn into_transcript(self) -> String {
        self.transcript
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a fragment stream into a lazy snapshot stream
///
/// Emits one snapshot per incoming fragment, in arrival order, terminating
/// with the input. Transport errors pass through unchanged; the transcript
/// accumulated before a failure remains in the previously emitted snapshots.
#[must_use]
pub fn decode_stream<S>(fragments: S) -> impl Stream<Item = Result<ReplySnapshot>>
where
    S: Stream<Item = Result<String>>,
{
    fragments.scan(StreamDecoder::new(), |decoder, fragment| {
        future::ready(Some(fragment.map(|text| decoder.push(&text))))
    })
}
