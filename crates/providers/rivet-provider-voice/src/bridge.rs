//! Voice bridge between recordings, the chat and the speakers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use rivet_core::{ClientConfig, Result};

use crate::engines::OpenAIVoiceEngine;
use crate::player::AudioPlayer;
use crate::types::*;

/// Speech-to-text before a message is sent and text-to-speech after a reply
/// arrives. The reply audio always lands in the same file, overwritten on
/// every call.
pub struct VoiceBridge {
    tts: Arc<dyn VoiceEngine>,
    stt: Arc<dyn SpeechEngine>,
    tts_config: VoiceConfig,
    stt_config: TranscriptionConfig,
    output_path: PathBuf,
    player: AudioPlayer,
}

impl VoiceBridge {
    /// Bridge over explicit engines
    pub fn new(
        tts: Arc<dyn VoiceEngine>,
        stt: Arc<dyn SpeechEngine>,
        output_path: impl Into<PathBuf>,
        player: AudioPlayer,
    ) -> Self {
        Self {
            tts,
            stt,
            tts_config: VoiceConfig::default(),
            stt_config: TranscriptionConfig::default(),
            output_path: output_path.into(),
            player,
        }
    }

    /// OpenAI in both directions (tts-1/alloy, whisper-1)
    pub fn with_openai(
        engine: OpenAIVoiceEngine,
        output_path: impl Into<PathBuf>,
        player: AudioPlayer,
    ) -> Self {
        let engine = Arc::new(engine);
        Self::new(engine.clone(), engine, output_path, player)
    }

    /// OpenAI bridge using the output file and player from `config`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_openai(
            OpenAIVoiceEngine::new(None),
            config.audio_output.clone(),
            AudioPlayer::new(config.audio_player.as_deref()),
        )
    }

    /// Replace the synthesis settings
    pub fn with_voice_config(mut self, config: VoiceConfig) -> Self {
        self.tts_config = config;
        self
    }

    /// Replace the transcription settings
    pub fn with_transcription_config(mut self, config: TranscriptionConfig) -> Self {
        self.stt_config = config;
        self
    }

    /// Where replies are written
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// True when both engines can make requests
    pub async fn is_ready(&self) -> bool {
        self.tts.is_ready().await && self.stt.is_ready().await
    }

    /// Transcribe a recorded clip from disk
    pub async fn transcribe_file(&self, path: &Path) -> Result<String> {
        let format = AudioFormat::from_path(path).ok_or_else(|| {
            VoiceError::UnsupportedFormat(format!(
                "cannot tell the audio format of {}",
                path.display()
            ))
        })?;
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| VoiceError::AudioError(format!("{}: {}", path.display(), e)))?;
        self.transcribe(AudioData::new(Bytes::from(data), format)).await
    }

    /// Transcribe recorded audio
    pub async fn transcribe(&self, audio: AudioData) -> Result<String> {
        tracing::info!(
            "Transcribing {} bytes of {} with {}",
            audio.size(),
            audio.format.as_str(),
            self.stt.name()
        );
        let result = self.stt.transcribe(&audio, &self.stt_config).await?;
        if result.is_empty() {
            return Err(VoiceError::TranscriptionError("no speech recognized".to_string()).into());
        }
        Ok(result.text.trim().to_string())
    }

    /// Synthesize `text`, write it to the output file and start playback.
    /// Playback problems are logged, not returned: the file is still there.
    pub async fn speak(&self, text: &str) -> Result<PathBuf> {
        let audio = self.tts.synthesize(text, &self.tts_config).await?;
        tokio::fs::write(&self.output_path, &audio.data)
            .await
            .map_err(|e| {
                VoiceError::AudioError(format!("{}: {}", self.output_path.display(), e))
            })?;
        tracing::info!(
            "Wrote {} bytes of speech to {}",
            audio.size(),
            self.output_path.display()
        );
        if let Err(e) = self.player.play(&self.output_path) {
            tracing::warn!("{}", e);
        }
        Ok(self.output_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedEngine {
        transcript: &'static str,
    }

    #[async_trait]
    impl VoiceEngine for CannedEngine {
        fn name(&self) -> &str {
            "canned"
        }

        async fn synthesize(&self, text: &str, config: &VoiceConfig) -> Result<AudioData> {
            Ok(AudioData {
                data: Bytes::from(format!("audio:{}", text)),
                format: config.output_format,
                character_count: text.chars().count(),
            })
        }

        async fn is_ready(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl SpeechEngine for CannedEngine {
        fn name(&self) -> &str {
            "canned"
        }

        async fn transcribe(
            &self,
            _audio: &AudioData,
            _config: &TranscriptionConfig,
        ) -> Result<TranscriptionResult> {
            Ok(TranscriptionResult::new(self.transcript.to_string()))
        }

        async fn is_ready(&self) -> bool {
            true
        }
    }

    fn bridge(dir: &Path, transcript: &'static str) -> VoiceBridge {
        let engine = Arc::new(CannedEngine { transcript });
        VoiceBridge::new(
            engine.clone(),
            engine,
            dir.join("voice.mp3"),
            AudioPlayer::default(),
        )
    }

    #[tokio::test]
    async fn test_speak_overwrites_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge(dir.path(), "");

        let path = bridge.speak("first").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"audio:first");

        bridge.speak("second").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"audio:second");
    }

    #[tokio::test]
    async fn test_transcribe_file() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.wav");
        std::fs::write(&clip, b"RIFF").unwrap();

        let text = bridge(dir.path(), "  hello there \n")
            .transcribe_file(&clip)
            .await
            .unwrap();
        assert_eq!(text, "hello there");
    }

    #[tokio::test]
    async fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.txt");
        std::fs::write(&clip, b"text").unwrap();
        assert!(bridge(dir.path(), "x").transcribe_file(&clip).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = bridge(dir.path(), "x")
            .transcribe_file(&dir.path().join("absent.wav"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("absent.wav"));
    }

    #[tokio::test]
    async fn test_silence_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioData::new(Bytes::from_static(b"RIFF"), AudioFormat::Wav);
        assert!(bridge(dir.path(), "   ").transcribe(audio).await.is_err());
    }
}
