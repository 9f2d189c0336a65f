//! Configuration lister for the "start chatting" tab

use std::sync::Arc;

use crate::backend::BackendApi;
use crate::{Result, RivetError};

/// Hint shown with the configuration dropdown
pub const CONFIGS_INFO: &str =
    "If no configuration is visible, create a new configuration first";

/// Fetches saved configuration names. Never caches: every tab activation
/// goes to the backend so freshly saved entries show up.
pub struct ConfigurationLister {
    backend: Arc<dyn BackendApi>,
}

impl ConfigurationLister {
    /// Create a lister
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }

    /// `GET /configs`
    pub async fn refresh(&self) -> Result<Vec<String>> {
        let configs = self
            .backend
            .list_configurations()
            .await?
            .configs
            .ok_or_else(|| RivetError::missing_field("configs", "/configs response"))?;
        tracing::debug!("Backend lists {} configurations", configs.len());
        Ok(configs)
    }
}
