//! Core types for the voice provider

use async_trait::async_trait;
use bytes::Bytes;
use rivet_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Voice configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Voice identifier (engine-specific)
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Voice description
    pub description: Option<String>,
}

impl Voice {
    /// OpenAI Alloy voice, used for assistant replies
    pub fn openai_alloy() -> Self {
        Self::openai("alloy", "Versatile, expressive voice")
    }

    fn openai(id: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: Some(description.to_string()),
        }
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::openai_alloy()
    }
}

/// Audio container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AudioFormat {
    /// MP3 (most compatible, good compression)
    #[default]
    Mp3,
    /// Opus (best quality/size ratio)
    Opus,
    /// AAC
    Aac,
    /// FLAC (lossless)
    Flac,
    /// WAV (uncompressed)
    Wav,
    /// WebM (what browsers record)
    Webm,
    /// MPEG-4 audio
    M4a,
    /// Ogg
    Ogg,
}

impl AudioFormat {
    /// Get format as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
        }
    }

    /// Get MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::M4a => "audio/mp4",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" | "mpga" | "mpeg" => Some(Self::Mp3),
            "opus" => Some(Self::Opus),
            "aac" => Some(Self::Aac),
            "flac" => Some(Self::Flac),
            "wav" => Some(Self::Wav),
            "webm" => Some(Self::Webm),
            "m4a" | "mp4" => Some(Self::M4a),
            "ogg" | "oga" => Some(Self::Ogg),
            _ => None,
        }
    }

    /// Guess the format from a path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Text-to-speech settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Selected voice
    pub voice: Voice,
    /// Model to use (engine-specific)
    pub model: Option<String>,
    /// Speaking speed (0.25 to 4.0, default 1.0)
    pub speed: f32,
    /// Output audio format
    pub output_format: AudioFormat,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice: Voice::openai_alloy(),
            model: None,
            speed: 1.0,
            output_format: AudioFormat::Mp3,
        }
    }
}

/// Audio bytes with their format
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Raw audio bytes
    pub data: Bytes,
    /// Audio format
    pub format: AudioFormat,
    /// Character count of the synthesized text, 0 for recordings
    pub character_count: usize,
}

impl AudioData {
    /// Create new audio data
    pub fn new(data: Bytes, format: AudioFormat) -> Self {
        Self {
            data,
            format,
            character_count: 0,
        }
    }

    /// Get size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check if audio data is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Speech-to-text settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Model to use (engine-specific)
    pub model: Option<String>,
    /// Language hint (ISO 639-1); auto-detected when `None`
    pub language: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
}

/// Result of speech-to-text transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Full transcribed text
    pub text: String,
    /// Detected or hinted language
    pub language: Option<String>,
}

impl TranscriptionResult {
    /// Create a transcription result with just text
    pub fn new(text: String) -> Self {
        Self {
            text,
            language: None,
        }
    }

    /// Check if transcription is empty
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Voice engine trait - implemented by each TTS backend
#[async_trait]
pub trait VoiceEngine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Synthesize text to audio
    async fn synthesize(&self, text: &str, config: &VoiceConfig) -> Result<AudioData>;

    /// Check if engine is ready
    async fn is_ready(&self) -> bool;

    /// Get maximum text length, in characters
    fn max_text_length(&self) -> usize {
        4096
    }
}

/// Speech engine trait - implemented by each STT backend
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Transcribe audio to text
    async fn transcribe(
        &self,
        audio: &AudioData,
        config: &TranscriptionConfig,
    ) -> Result<TranscriptionResult>;

    /// Check if engine is ready
    async fn is_ready(&self) -> bool;

    /// Largest upload accepted, in bytes
    fn max_upload_bytes(&self) -> usize {
        25 * 1024 * 1024
    }
}

/// Voice synthesis and transcription error types
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// API authentication error
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Text too long
    #[error("Text exceeds maximum length: {length} > {max}")]
    TextTooLong {
        /// Actual text length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Audio too large to upload
    #[error("Audio exceeds maximum upload size: {size} > {max} bytes")]
    AudioTooLarge {
        /// Actual size in bytes
        size: usize,
        /// Maximum size in bytes
        max: usize,
    },

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Audio file error
    #[error("Audio processing error: {0}")]
    AudioError(String),

    /// Unsupported format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Transcription failed
    #[error("Transcription failed: {0}")]
    TranscriptionError(String),

    /// Playback failed
    #[error("Playback failed: {0}")]
    PlaybackError(String),

    /// Generic error
    #[error("Voice error: {0}")]
    Other(String),
}

impl From<VoiceError> for rivet_core::RivetError {
    fn from(err: VoiceError) -> Self {
        rivet_core::RivetError::other(err.to_string())
    }
}
