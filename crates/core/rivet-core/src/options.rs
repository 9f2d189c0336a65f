//! Options fetcher: valid values and defaults for the configuration form

use std::sync::Arc;

use crate::backend::BackendApi;
use crate::types::{ConfigurationOptions, OptionField};
use crate::{Result, RivetError};

/// Option lists plus the default picked for each field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormChoices {
    options: ConfigurationOptions,
    preferred_model: Option<String>,
}

impl FormChoices {
    /// Wrap validated options; fails when any list is empty
    pub fn new(options: ConfigurationOptions, preferred_model: Option<String>) -> Result<Self> {
        options.ensure_complete()?;
        Ok(Self {
            options,
            preferred_model,
        })
    }

    /// Raw option lists
    pub fn options(&self) -> &ConfigurationOptions {
        &self.options
    }

    /// Choices for one field
    pub fn choices(&self, field: OptionField) -> &[String] {
        self.options.choices(field)
    }

    /// Default selection: the first element, except that the GPT model
    /// prefers the configured model when the backend offers it
    pub fn default_choice(&self, field: OptionField) -> &str {
        let choices = self.options.choices(field);
        if field == OptionField::GptModel {
            if let Some(preferred) = self
                .preferred_model
                .as_deref()
                .and_then(|p| choices.iter().find(|c| c.as_str() == p))
            {
                return preferred;
            }
        }
        // ensure_complete guarantees a first element
        choices.first().map(String::as_str).unwrap_or_default()
    }
}

/// Loads [`FormChoices`] from `GET /options`
pub struct OptionsFetcher {
    backend: Arc<dyn BackendApi>,
    preferred_model: Option<String>,
}

impl OptionsFetcher {
    /// Create a fetcher
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self {
            backend,
            preferred_model: None,
        }
    }

    /// Prefer `model` as the GPT model default when it is offered
    pub fn with_preferred_model(mut self, model: impl Into<String>) -> Self {
        self.preferred_model = Some(model.into());
        self
    }

    /// Fetch and validate the option lists
    pub async fn fetch(&self) -> Result<FormChoices> {
        let response = self.backend.fetch_options().await?;
        let options = response
            .options
            .ok_or_else(|| RivetError::missing_field("options", "/options response"))?;
        let choices = FormChoices::new(options, self.preferred_model.clone())?;
        tracing::info!(
            "Loaded options: {} humans, {} personas, {} prompts, {} tools, {} models",
            choices.choices(OptionField::Human).len(),
            choices.choices(OptionField::Persona).len(),
            choices.choices(OptionField::Prompt).len(),
            choices.choices(OptionField::Tool).len(),
            choices.choices(OptionField::GptModel).len(),
        );
        Ok(choices)
    }
}
