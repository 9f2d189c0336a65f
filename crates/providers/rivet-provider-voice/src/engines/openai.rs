//! OpenAI audio engine
//!
//! Text-to-speech through `POST /audio/speech` (tts-1, voice alloy by
//! default) and speech-to-text through `POST /audio/transcriptions`
//! (whisper-1). One blocking request per call, no streaming.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use rivet_core::{Result, RivetError};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use crate::types::*;

/// OpenAI API base URL
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Speech synthesis model used for replies
pub const TTS_MODEL: &str = "tts-1";

/// Transcription model used for recordings
pub const STT_MODEL: &str = "whisper-1";

/// Shared HTTP client for connection pooling
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// OpenAI TTS request
#[derive(Debug, Serialize)]
struct OpenAITTSRequest {
    model: String,
    input: String,
    voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

/// OpenAI transcription reply (`response_format=json`)
#[derive(Debug, Deserialize)]
struct OpenAITranscription {
    text: String,
}

/// OpenAI voice engine, both directions
#[derive(Debug, Clone)]
pub struct OpenAIVoiceEngine {
    /// API key (optional, uses OPENAI_API_KEY env var if not set)
    api_key: Option<String>,
    /// API base, overridable for proxies and tests
    base_url: String,
}

impl OpenAIVoiceEngine {
    /// Create new OpenAI voice engine
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: OPENAI_API_BASE.to_string(),
        }
    }

    /// Point the engine at a different API base
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn client() -> &'static Client {
        HTTP_CLIENT.get_or_init(|| {
            Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new())
        })
    }

    fn get_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                RivetError::config(
                    "OpenAI API key not found. Set OPENAI_API_KEY environment variable or provide key.",
                )
            })
    }

    /// Map audio format to the TTS `response_format` value
    fn map_format(format: AudioFormat) -> Result<&'static str> {
        match format {
            AudioFormat::Mp3 => Ok("mp3"),
            AudioFormat::Opus => Ok("opus"),
            AudioFormat::Aac => Ok("aac"),
            AudioFormat::Flac => Ok("flac"),
            AudioFormat::Wav => Ok("wav"),
            other => Err(VoiceError::UnsupportedFormat(other.as_str().to_string()).into()),
        }
    }

    async fn error_from_response(context: &str, response: reqwest::Response) -> VoiceError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => VoiceError::AuthenticationError(error_text),
            429 => VoiceError::RateLimitError(error_text),
            _ => VoiceError::Other(format!("OpenAI {} error ({}): {}", context, status, error_text)),
        }
    }
}

#[async_trait]
impl VoiceEngine for OpenAIVoiceEngine {
    fn name(&self) -> &str {
        "openai"
    }

    async fn synthesize(&self, text: &str, config: &VoiceConfig) -> Result<AudioData> {
        let api_key = self.get_api_key()?;

        // The API limit counts characters, not bytes
        let char_count = text.chars().count();
        if char_count > self.max_text_length() {
            return Err(VoiceError::TextTooLong {
                length: char_count,
                max: self.max_text_length(),
            }
            .into());
        }

        let model = config.model.as_deref().unwrap_or(TTS_MODEL);
        let request = OpenAITTSRequest {
            model: model.to_string(),
            input: text.to_string(),
            voice: config.voice.id.clone(),
            response_format: Some(Self::map_format(config.output_format)?.to_string()),
            speed: if (config.speed - 1.0).abs() > 0.01 {
                Some(config.speed)
            } else {
                None
            },
        };

        tracing::debug!(
            "OpenAI TTS request: model={}, voice={}, format={}, text_chars={}",
            model,
            config.voice.id,
            config.output_format.as_str(),
            char_count
        );

        let response = Self::client()
            .post(format!("{}/audio/speech", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| VoiceError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("TTS", response).await.into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VoiceError::NetworkError(e.to_string()))?;

        tracing::debug!("OpenAI TTS response: {} bytes", bytes.len());

        Ok(AudioData {
            data: bytes,
            format: config.output_format,
            character_count: char_count,
        })
    }

    async fn is_ready(&self) -> bool {
        self.get_api_key().is_ok()
    }
}

#[async_trait]
impl SpeechEngine for OpenAIVoiceEngine {
    fn name(&self) -> &str {
        "openai-whisper"
    }

    async fn transcribe(
        &self,
        audio: &AudioData,
        config: &TranscriptionConfig,
    ) -> Result<TranscriptionResult> {
        let api_key = self.get_api_key()?;

        if audio.is_empty() {
            return Err(VoiceError::AudioError("recording is empty".to_string()).into());
        }
        if audio.size() > self.max_upload_bytes() {
            return Err(VoiceError::AudioTooLarge {
                size: audio.size(),
                max: self.max_upload_bytes(),
            }
            .into());
        }

        let model = config.model.as_deref().unwrap_or(STT_MODEL);
        let file_name = format!("audio.{}", audio.format.as_str());
        let part = Part::bytes(audio.data.to_vec())
            .file_name(file_name)
            .mime_str(audio.format.mime_type())
            .map_err(|e| VoiceError::AudioError(e.to_string()))?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", model.to_string())
            .text("response_format", "json");
        if let Some(language) = &config.language {
            form = form.text("language", language.clone());
        }
        if let Some(temperature) = config.temperature {
            form = form.text("temperature", temperature.to_string());
        }

        tracing::debug!(
            "OpenAI transcription request: model={}, format={}, bytes={}",
            model,
            audio.format.as_str(),
            audio.size()
        );

        let response = Self::client()
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("transcription", response)
                .await
                .into());
        }

        let parsed: OpenAITranscription = response
            .json()
            .await
            .map_err(|e| VoiceError::TranscriptionError(e.to_string()))?;

        tracing::debug!("OpenAI transcription: {} chars", parsed.text.len());

        Ok(TranscriptionResult {
            text: parsed.text,
            language: config.language.clone(),
        })
    }

    async fn is_ready(&self) -> bool {
        self.get_api_key().is_ok()
    }
}
