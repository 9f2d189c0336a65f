//! Chat session controller
//!
//! Two states, [`SessionState::NotStarted`] and [`SessionState::Started`].
//! `begin` performs the single NotStarted → Started transition by sending
//! `start: true`; every later `send` is a Started → Started self-transition.
//! A failed call leaves state, transcript and selected configuration exactly
//! as they were.

use std::sync::Arc;

use crate::backend::BackendApi;
use crate::types::{ChatRequest, ChatTurn, Transcript};
use crate::utils::Logger;
use crate::{Result, RivetError};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No `start: true` has succeeded yet
    #[default]
    NotStarted,
    /// Conversation is running
    Started,
}

/// Which controls the front-end should offer, derived from session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    /// Configuration dropdown and "Start conversation" button
    pub start: bool,
    /// Message input and submit button
    pub message_input: bool,
    /// Clear button
    pub clear: bool,
    /// Voice recording input
    pub voice_input: bool,
}

/// One conversation with the backend under a chosen configuration
pub struct ChatSession {
    backend: Arc<dyn BackendApi>,
    configuration: Option<String>,
    state: SessionState,
    transcript: Transcript,
    pending: Option<String>,
    logger: Logger,
}

impl ChatSession {
    /// New, not yet started session
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self {
            backend,
            configuration: None,
            state: SessionState::NotStarted,
            transcript: Transcript::new(),
            pending: None,
            logger: Logger::new("session"),
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once the opening request succeeded
    pub fn is_started(&self) -> bool {
        self.state == SessionState::Started
    }

    /// Selected configuration name
    pub fn configuration(&self) -> Option<&str> {
        self.configuration.as_deref()
    }

    /// Transcript so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// User text currently in flight
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Choose the configuration to talk to; only before the session starts
    pub fn select_configuration(&mut self, name: impl Into<String>) -> Result<()> {
        if self.is_started() {
            return Err(RivetError::invalid_state(
                "the conversation already started; reset it to switch configuration",
            ));
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RivetError::validation("select a configuration first"));
        }
        self.configuration = Some(name);
        Ok(())
    }

    /// Begin the conversation: NotStarted → Started
    pub async fn begin(&mut self) -> Result<&ChatTurn> {
        if self.is_started() {
            return Err(RivetError::invalid_state("the conversation already started"));
        }
        let name = self
            .configuration
            .clone()
            .ok_or_else(|| RivetError::validation("select a configuration first"))?;

        self.logger
            .info(&format!("Starting the conversation with '{}'", name));
        let reply = self
            .backend
            .chat(&ChatRequest::start(name))
            .await?
            .into_reply()?;

        self.transcript.push(ChatTurn::new(None, reply));
        self.state = SessionState::Started;
        self.logger.success("conversation started");
        self.last_turn()
    }

    /// Send user text: Started → Started
    pub async fn send(&mut self, text: &str) -> Result<&ChatTurn> {
        if !self.is_started() {
            return Err(RivetError::invalid_state(
                "start the conversation before sending messages",
            ));
        }
        if text.trim().is_empty() {
            return Err(RivetError::validation("message is empty"));
        }
        self.pending = Some(text.to_string());
        let result = self.dispatch_pending().await;
        self.pending = None;
        result?;
        self.last_turn()
    }

    async fn dispatch_pending(&mut self) -> Result<()> {
        let (name, text) = match (&self.configuration, &self.pending) {
            (Some(name), Some(text)) => (name.clone(), text.clone()),
            _ => return Err(RivetError::invalid_state("nothing to send")),
        };
        self.logger
            .debug(&format!("Sending {} chars to '{}'", text.len(), name));
        let reply = self
            .backend
            .chat(&ChatRequest::message(name, text.clone()))
            .await?
            .into_reply()?;
        self.transcript.push(ChatTurn::new(Some(text), reply));
        Ok(())
    }

    fn last_turn(&self) -> Result<&ChatTurn> {
        self.transcript
            .last()
            .ok_or_else(|| RivetError::other("transcript is empty"))
    }

    /// Empty the transcript. The session stays started.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Back to NotStarted with an empty transcript and no configuration
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.pending = None;
        self.configuration = None;
        self.state = SessionState::NotStarted;
        self.logger.info("session reset");
    }

    /// Control enablement for the current state
    pub fn controls(&self, configurations_available: bool, voice_enabled: bool) -> ControlState {
        let started = self.is_started();
        ControlState {
            start: !started && configurations_available,
            message_input: started,
            clear: started,
            voice_input: started && voice_enabled,
        }
    }
}
