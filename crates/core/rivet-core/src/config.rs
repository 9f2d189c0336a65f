//! Configuration management and environment variable loading

use crate::{Result, RivetError};
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

/// Default backend address
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8085";

/// Model preselected in the configuration form when the backend offers it
pub const DEFAULT_GPT_MODEL: &str = "gpt-4-1106-preview";

/// Default file the synthesized reply is written to
pub const DEFAULT_AUDIO_OUTPUT: &str = "voice.mp3";

/// Load environment variables from .env file
///
/// Loads variables from a .env file in the current directory or a parent
/// directory. A missing file is not an error.
///
/// # Example
///
/// ```no_run
/// use rivet_core::load_env;
///
/// load_env().ok();
/// let url = std::env::var("RIVET_BACKEND_URL").unwrap_or_default();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("✓ Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(RivetError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(RivetError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(_) => {
            tracing::info!("✓ Loaded environment from: {}", path.as_ref().display());
            Ok(())
        }
        Err(e) => Err(RivetError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings of the front-end and its backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the conversational-agent backend
    pub backend_url: Url,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Whether the voice bridge is wired up
    pub voice_enabled: bool,
    /// Open the chat tab on startup
    pub auto_launch: bool,
    /// Preferred default for the GPT model selection
    pub default_gpt_model: String,
    /// Where synthesized replies are written
    pub audio_output: PathBuf,
    /// Command used to play synthesized replies
    pub audio_player: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
            timeout_secs: 60,
            voice_enabled: false,
            auto_launch: false,
            default_gpt_model: DEFAULT_GPT_MODEL.to_string(),
            audio_output: PathBuf::from(DEFAULT_AUDIO_OUTPUT),
            audio_player: None,
        }
    }
}

impl ClientConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend_url = match lookup("RIVET_BACKEND_URL") {
            Some(raw) => parse_backend_url(&raw)?,
            None => defaults.backend_url,
        };

        let timeout_secs = match lookup("RIVET_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                RivetError::config(format!(
                    "RIVET_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => defaults.timeout_secs,
        };
        if timeout_secs == 0 {
            return Err(RivetError::config("RIVET_HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        let flag = |key: &str, default: bool| lookup(key).and_then(|v| parse_bool(&v)).unwrap_or(default);

        Ok(Self {
            backend_url,
            timeout_secs,
            voice_enabled: flag("RIVET_VOICE_ENABLED", defaults.voice_enabled),
            auto_launch: flag("RIVET_AUTO_LAUNCH", defaults.auto_launch),
            default_gpt_model: lookup("RIVET_DEFAULT_GPT_MODEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_gpt_model),
            audio_output: lookup("RIVET_AUDIO_OUTPUT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.audio_output),
            audio_player: lookup("RIVET_AUDIO_PLAYER").filter(|v| !v.trim().is_empty()),
        })
    }

    /// Override the backend URL (e.g. from a CLI flag)
    pub fn with_backend_url(mut self, raw: &str) -> Result<Self> {
        self.backend_url = parse_backend_url(raw)?;
        Ok(self)
    }
}

/// Parse and check a backend base URL
pub fn parse_backend_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| RivetError::config(format!("Invalid backend URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RivetError::config(format!(
            "Backend URL must use http or https, got '{}'",
            other
        ))),
    }
}
