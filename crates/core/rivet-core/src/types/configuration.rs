//! Configuration profiles and the option lists they are built from

use crate::{Result, RivetError};
use serde::{Deserialize, Serialize};

/// Valid values for each configuration field, as served by `GET /options`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationOptions {
    /// User information files
    #[serde(default)]
    pub humans: Vec<String>,
    /// Persona files
    #[serde(default)]
    pub personas: Vec<String>,
    /// System prompt files
    #[serde(default)]
    pub prompts: Vec<String>,
    /// Function/tool definition files
    #[serde(default)]
    pub tools: Vec<String>,
    /// GPT model identifiers
    #[serde(default)]
    pub gptmodels: Vec<String>,
    /// Existing configurations, only filled by older backends
    #[serde(default)]
    pub configurations: Vec<String>,
}

impl ConfigurationOptions {
    /// Choices for one form field
    pub fn choices(&self, field: OptionField) -> &[String] {
        match field {
            OptionField::Human => &self.humans,
            OptionField::Persona => &self.personas,
            OptionField::Prompt => &self.prompts,
            OptionField::Tool => &self.tools,
            OptionField::GptModel => &self.gptmodels,
        }
    }

    /// Fails with `EmptyOptions` naming the first empty list
    pub fn ensure_complete(&self) -> Result<()> {
        for field in OptionField::ALL {
            if self.choices(field).is_empty() {
                return Err(RivetError::empty_options(field.list_key()));
            }
        }
        Ok(())
    }
}

/// Envelope of the `/options` response
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsResponse {
    /// The option lists; absent on a malformed reply
    pub options: Option<ConfigurationOptions>,
}

/// The five selectable fields of a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    /// User information
    Human,
    /// Persona
    Persona,
    /// System prompt
    Prompt,
    /// GPT tools/functions
    Tool,
    /// GPT model
    GptModel,
}

impl OptionField {
    /// All fields in form order
    pub const ALL: [OptionField; 5] = [
        OptionField::Human,
        OptionField::Persona,
        OptionField::Prompt,
        OptionField::Tool,
        OptionField::GptModel,
    ];

    /// Key of the option list in the `/options` payload
    pub fn list_key(&self) -> &'static str {
        match self {
            Self::Human => "humans",
            Self::Persona => "personas",
            Self::Prompt => "prompts",
            Self::Tool => "tools",
            Self::GptModel => "gptmodels",
        }
    }

    /// Widget label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Persona => "Persona",
            Self::Prompt => "Prompt",
            Self::Tool => "GPT Tools/Functions",
            Self::GptModel => "GPT Model",
        }
    }

    /// Widget hint
    pub fn info(&self) -> &'static str {
        match self {
            Self::Human => "Select the user information",
            Self::Persona => "Select the persona",
            Self::Prompt => "Select the system prompt",
            Self::Tool => "Select the functions that shall be available",
            Self::GptModel => "Select the gpt model to be used",
        }
    }
}

/// A saved configuration profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Unique, lower-cased key
    pub name: String,
    /// Selected user information
    pub human: String,
    /// Selected persona
    pub persona: String,
    /// Selected system prompt
    pub prompt: String,
    /// Selected tools/functions
    pub tool: String,
    /// Selected GPT model
    pub gptmodel: String,
}

/// Body of `POST /save`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Lower-cased name, `null` when left empty
    pub name: Option<String>,
    /// Selected user information
    pub human: String,
    /// Selected persona
    pub persona: String,
    /// Selected system prompt
    pub prompt: String,
    /// Selected tools/functions
    pub tool: String,
    /// Selected GPT model
    pub gptmodel: String,
}

impl From<Configuration> for SaveRequest {
    fn from(config: Configuration) -> Self {
        Self {
            name: normalize_name(&config.name),
            human: config.human,
            persona: config.persona,
            prompt: config.prompt,
            tool: config.tool,
            gptmodel: config.gptmodel,
        }
    }
}

/// Body of the legacy `POST /start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    /// Existing configuration to resume, if one was picked
    pub configuration: Option<String>,
    /// Name for a new configuration
    pub name: Option<String>,
    /// Selected user information
    pub human: String,
    /// Selected persona
    pub persona: String,
    /// Selected system prompt
    pub prompt: String,
    /// Selected tools/functions
    pub tool: String,
    /// Selected GPT model
    pub gptmodel: String,
}

/// `{message}` reply of `/save` and `/start`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    /// "success" or an error description
    pub message: Option<String>,
}

impl MessageResponse {
    /// Ok when `message == "success"`, otherwise the message as a rejection
    pub fn into_result(self) -> Result<()> {
        match self.message {
            Some(m) if m == super::SUCCESS => Ok(()),
            Some(m) => Err(RivetError::rejected(m)),
            None => Err(RivetError::missing_field("message", "backend response")),
        }
    }
}

/// `GET /configs` reply
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigsResponse {
    /// Saved configuration names
    pub configs: Option<Vec<String>>,
}

/// Lower-case a configuration name; blank names become `None`
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Names may only use ASCII letters, digits, `-` and `_`
pub fn validate_name(name: &str) -> Result<()> {
    match name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        Some(c) => Err(RivetError::validation(format!(
            "configuration name '{}' contains '{}'; do not use special characters",
            name, c
        ))),
        None => Ok(()),
    }
}
