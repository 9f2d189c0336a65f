//! Hands synthesized audio to an external player command

use std::path::Path;
use tokio::process::Command;

use crate::types::VoiceError;
use rivet_core::Result;

/// Runs a configured command such as `mpv --no-video` with the audio file
/// appended as the last argument. Without a command, playback is skipped and
/// the file is only written.
#[derive(Debug, Clone, Default)]
pub struct AudioPlayer {
    command: Option<Vec<String>>,
}

impl AudioPlayer {
    /// Player from a whitespace-separated command line
    pub fn new(command: Option<&str>) -> Self {
        let command = command
            .map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self { command }
    }

    /// True when a player command is configured
    pub fn is_configured(&self) -> bool {
        self.command.is_some()
    }

    /// Start playback in the background. Returns `Ok(false)` when no player
    /// is configured.
    pub fn play(&self, path: &Path) -> Result<bool> {
        let Some(parts) = &self.command else {
            tracing::debug!("No audio player configured; wrote {}", path.display());
            return Ok(false);
        };
        let (program, args) = parts
            .split_first()
            .ok_or_else(|| VoiceError::PlaybackError("empty player command".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .arg(path)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| VoiceError::PlaybackError(format!("{}: {}", program, e)))?;

        let program = program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => tracing::warn!("{} exited with {}", program, status),
                Err(e) => tracing::warn!("{} failed: {}", program, e),
            }
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(!AudioPlayer::new(None).is_configured());
        assert!(!AudioPlayer::new(Some("   ")).is_configured());
        assert!(AudioPlayer::new(Some("mpv --no-video")).is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_player_skips() {
        let played = AudioPlayer::default().play(Path::new("voice.mp3")).unwrap();
        assert!(!played);
    }

    #[tokio::test]
    async fn test_missing_program_is_playback_error() {
        let player = AudioPlayer::new(Some("rivet-no-such-player-binary"));
        let err = player.play(Path::new("voice.mp3")).unwrap_err();
        assert!(err.to_string().contains("Playback failed"));
    }
}
