//! Voice Provider for Rivet-MemGPT
//!
//! Speech-to-text for recorded messages and text-to-speech for assistant
//! replies, both through the OpenAI audio API:
//!
//! - STT: whisper-1 via `/audio/transcriptions`
//! - TTS: tts-1 with the alloy voice via `/audio/speech`, written to a local
//!   file (`voice.mp3` by default) and handed to an optional player command
//!
//! Requires `OPENAI_API_KEY`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bridge;
mod engines;
mod player;
mod types;

pub use bridge::VoiceBridge;
pub use engines::*;
pub use player::AudioPlayer;
pub use types::*;
