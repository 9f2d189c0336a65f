//! Voice engine implementations (TTS and STT)

pub mod openai;

pub use openai::OpenAIVoiceEngine;
