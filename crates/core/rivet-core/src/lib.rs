//! Rivet-MemGPT client core
//!
//! Everything the front-end needs to talk to the conversational-agent
//! backend, independent of how it is rendered:
//!
//! - [`backend`]: the HTTP/JSON contract (`/options`, `/save`, `/start`,
//!   `/configs`, `/chat`) behind the [`BackendApi`] trait
//! - [`options`] and [`form`]: option lists, defaults and the configuration form
//! - [`lister`]: saved configuration names for the chat tab
//! - [`session`]: the chat session state machine and its transcript
//! - [`config`]: environment and `.env` driven settings
//!
//! # Example
//!
//! ```no_run
//! use rivet_core::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let backend: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(&config)?);
//!
//!     let mut session = ChatSession::new(backend);
//!     session.select_configuration("test")?;
//!     let turn = session.begin().await?;
//!     println!("{}", turn.render_assistant().unwrap_or_default());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod lister;
pub mod options;
pub mod session;
pub mod types;
pub mod utils;

pub use backend::{BackendApi, HttpBackend};
pub use config::{
    load_env, load_env_from_path, parse_backend_url, ClientConfig, DEFAULT_AUDIO_OUTPUT,
    DEFAULT_BACKEND_URL, DEFAULT_GPT_MODEL,
};
pub use error::{Result, RivetError};
pub use form::{ConfigurationForm, NAME_INFO, SAVED_NOTICE};
pub use lister::{ConfigurationLister, CONFIGS_INFO};
pub use options::{FormChoices, OptionsFetcher};
pub use session::{ChatSession, ControlState, SessionState};
pub use types::*;
pub use utils::logger::{init_logging, Logger};
