//! Chat wire types and the transcript

use crate::{Result, RivetError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message sent with the opening `start: true` request
pub const START_MESSAGE: &str = "let's go";

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Configuration the conversation runs under
    pub name: String,
    /// User text; omitted when there is none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// True only for the opening request of a session
    pub start: bool,
}

impl ChatRequest {
    /// Opening request of a session
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: Some(START_MESSAGE.to_string()),
            start: true,
        }
    }

    /// Follow-up request carrying user text
    pub fn message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: Some(message.into()),
            start: false,
        }
    }
}

/// `POST /chat` reply
///
/// Success is keyed on `status`; `message` holds the assistant text on
/// success and the error description otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// "success" or an error description
    #[serde(default)]
    pub status: Option<String>,
    /// Agent's private reasoning aside
    #[serde(default)]
    pub inner_monologue: Option<String>,
    /// Assistant text or error description
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatResponse {
    /// True when `status == "success"`
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(super::SUCCESS)
    }

    /// Turn the reply into an assistant message or a rejection
    pub fn into_reply(self) -> Result<AssistantReply> {
        if !self.is_success() {
            let warning = self
                .message
                .or(self.status)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(RivetError::rejected(warning));
        }
        let message = self
            .message
            .ok_or_else(|| RivetError::missing_field("message", "/chat response"))?;
        Ok(AssistantReply {
            message,
            inner_monologue: self.inner_monologue.filter(|m| !m.trim().is_empty()),
        })
    }
}

/// A successful assistant answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    /// Text shown to the user
    pub message: String,
    /// Optional reasoning aside
    pub inner_monologue: Option<String>,
}

/// One exchange in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// What the user said; `None` for the opening turn
    pub user_message: Option<String>,
    /// What the assistant answered
    pub assistant_message: Option<String>,
    /// Reasoning aside attached to the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_monologue: Option<String>,
    /// When the answer arrived
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    /// Build a turn from the user text (if any) and the reply to it
    pub fn new(user_message: Option<String>, reply: AssistantReply) -> Self {
        Self {
            user_message,
            assistant_message: Some(reply.message),
            inner_monologue: reply.inner_monologue,
            at: Utc::now(),
        }
    }

    /// Assistant text annotated with the reasoning aside
    pub fn render_assistant(&self) -> Option<String> {
        let message = self.assistant_message.as_deref()?;
        Some(match self.inner_monologue.as_deref() {
            Some(aside) => format!("**Assistant** *({})*\n{}", aside, message),
            None => format!("**Assistant**\n{}", message),
        })
    }
}

/// Append-only list of turns for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    /// Empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Drop every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when there are no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns in order
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }
}
