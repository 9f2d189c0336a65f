//! Configuration form: a profile name plus one selection per option field

use std::collections::HashMap;

use crate::backend::BackendApi;
use crate::options::FormChoices;
use crate::types::{normalize_name, validate_name, OptionField, SaveRequest, StartRequest};
use crate::{Result, RivetError};

/// Hint shown next to the name input
pub const NAME_INFO: &str =
    "Enter the name for the new configuration (do not use special characters)";

/// Notice shown after a successful save
pub const SAVED_NOTICE: &str = "Successfully created the new configuration";

/// Form state; starts with every field on its default
#[derive(Debug, Clone)]
pub struct ConfigurationForm {
    choices: FormChoices,
    name: String,
    selections: HashMap<OptionField, String>,
}

impl ConfigurationForm {
    /// New form with default selections and an empty name
    pub fn new(choices: FormChoices) -> Self {
        let selections = OptionField::ALL
            .iter()
            .map(|field| (*field, choices.default_choice(*field).to_string()))
            .collect();
        Self {
            choices,
            name: String::new(),
            selections,
        }
    }

    /// Option lists backing the form
    pub fn choices(&self) -> &FormChoices {
        &self.choices
    }

    /// Current name input, as typed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the name input
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Current selection for `field`
    pub fn value(&self, field: OptionField) -> &str {
        self.selections
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| self.choices.default_choice(field))
    }

    /// Select `value`; it must be one of the offered choices
    pub fn select(&mut self, field: OptionField, value: &str) -> Result<()> {
        if !self.choices.choices(field).iter().any(|c| c == value) {
            return Err(RivetError::validation(format!(
                "'{}' is not a valid {} choice",
                value,
                field.label()
            )));
        }
        self.selections.insert(field, value.to_string());
        Ok(())
    }

    /// Select by zero-based position in the choice list
    pub fn select_index(&mut self, field: OptionField, index: usize) -> Result<()> {
        let value = self
            .choices
            .choices(field)
            .get(index)
            .cloned()
            .ok_or_else(|| {
                RivetError::validation(format!(
                    "{} has no choice number {}",
                    field.label(),
                    index + 1
                ))
            })?;
        self.selections.insert(field, value);
        Ok(())
    }

    /// Build the `/save` body; the name is lower-cased, blank becomes `null`
    pub fn to_save_request(&self) -> Result<SaveRequest> {
        let name = normalize_name(&self.name);
        if let Some(name) = &name {
            validate_name(name)?;
        }
        Ok(SaveRequest {
            name,
            human: self.value(OptionField::Human).to_string(),
            persona: self.value(OptionField::Persona).to_string(),
            prompt: self.value(OptionField::Prompt).to_string(),
            tool: self.value(OptionField::Tool).to_string(),
            gptmodel: self.value(OptionField::GptModel).to_string(),
        })
    }

    /// Build the legacy `/start` body, optionally resuming `existing`
    pub fn to_start_request(&self, existing: Option<&str>) -> Result<StartRequest> {
        let save = self.to_save_request()?;
        let configuration = existing
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Ok(StartRequest {
            configuration,
            name: save.name,
            human: save.human,
            persona: save.persona,
            prompt: save.prompt,
            tool: save.tool,
            gptmodel: save.gptmodel,
        })
    }

    /// Submit to `/save`. Returns the saved name (if one was given); a
    /// non-"success" message comes back as [`RivetError::Rejected`]. The
    /// form is left untouched either way.
    pub async fn save(&self, backend: &dyn BackendApi) -> Result<Option<String>> {
        let request = self.to_save_request()?;
        tracing::info!("Saving configuration {:?}", request.name);
        backend.save_configuration(&request).await?.into_result()?;
        Ok(request.name)
    }

    /// Submit to the legacy `/start` endpoint
    pub async fn start_legacy(
        &self,
        backend: &dyn BackendApi,
        existing: Option<&str>,
    ) -> Result<()> {
        let request = self.to_start_request(existing)?;
        tracing::info!(
            "Starting configuration (existing={:?}, new={:?})",
            request.configuration,
            request.name
        );
        backend.start_configuration(&request).await?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackendApi;
    use crate::types::{ConfigurationOptions, MessageResponse};

    fn choices() -> FormChoices {
        let one = |s: &str| vec![s.to_string()];
        FormChoices::new(
            ConfigurationOptions {
                humans: vec!["h1".to_string(), "h2".to_string()],
                personas: one("p1"),
                prompts: one("pr1"),
                tools: one("t1"),
                gptmodels: one("g1"),
                configurations: vec![],
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_new_form_uses_defaults() {
        let form = ConfigurationForm::new(choices());
        assert_eq!(form.value(OptionField::Human), "h1");
        assert_eq!(form.value(OptionField::GptModel), "g1");
        assert_eq!(form.name(), "");
    }

    #[test]
    fn test_select_validates_membership() {
        let mut form = ConfigurationForm::new(choices());
        form.select(OptionField::Human, "h2").unwrap();
        assert_eq!(form.value(OptionField::Human), "h2");
        assert!(form.select(OptionField::Human, "h9").is_err());
        assert!(form.select_index(OptionField::Persona, 3).is_err());
        assert_eq!(form.value(OptionField::Human), "h2");
    }

    #[test]
    fn test_request_lowercases_name() {
        let mut form = ConfigurationForm::new(choices());
        form.set_name("Test");
        let request = form.to_save_request().unwrap();
        assert_eq!(request.name.as_deref(), Some("test"));
        assert_eq!(request.human, "h1");
    }

    #[test]
    fn test_special_characters_rejected_locally() {
        let mut form = ConfigurationForm::new(choices());
        form.set_name("my bot!");
        assert!(matches!(
            form.to_save_request(),
            Err(RivetError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_save_success() {
        let mut backend = MockBackendApi::new();
        backend
            .expect_save_configuration()
            .withf(|req| req.name.as_deref() == Some("test") && req.tool == "t1")
            .times(1)
            .returning(|_| {
                Ok(MessageResponse {
                    message: Some("success".to_string()),
                })
            });

        let mut form = ConfigurationForm::new(choices());
        form.set_name("Test");
        let saved = form.save(&backend).await.unwrap();
        assert_eq!(saved.as_deref(), Some("test"));
        // form stays in place
        assert_eq!(form.name(), "Test");
    }

    #[tokio::test]
    async fn test_save_rejection_is_verbatim() {
        let mut backend = MockBackendApi::new();
        backend.expect_save_configuration().returning(|_| {
            Ok(MessageResponse {
                message: Some("Configuration test already exists".to_string()),
            })
        });

        let mut form = ConfigurationForm::new(choices());
        form.set_name("test");
        let err = form.save(&backend).await.unwrap_err();
        assert_eq!(err.to_string(), "Configuration test already exists");
    }

    #[tokio::test]
    async fn test_invalid_name_sends_nothing() {
        let mut backend = MockBackendApi::new();
        backend.expect_save_configuration().times(0);

        let mut form = ConfigurationForm::new(choices());
        form.set_name("../escape");
        assert!(form.save(&backend).await.is_err());
    }

    #[tokio::test]
    async fn test_start_legacy_with_existing() {
        let mut backend = MockBackendApi::new();
        backend
            .expect_start_configuration()
            .withf(|req| req.configuration.as_deref() == Some("old") && req.name.is_none())
            .times(1)
            .returning(|_| {
                Ok(MessageResponse {
                    message: Some("success".to_string()),
                })
            });

        let form = ConfigurationForm::new(choices());
        form.start_legacy(&backend, Some("old")).await.unwrap();
    }
}
