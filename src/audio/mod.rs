//! Audio codec and playback
//!
//! Decodes the speech collaborator's base64 PCM payloads into normalized
//! sample buffers and plays them on the one shared output device.

mod codec;
mod playback;

pub use codec::{CHANNELS, SAMPLE_RATE, SampleBuffer, decode_payload};
pub use playback::{PlaybackCoordinator, PlaybackHandle};
