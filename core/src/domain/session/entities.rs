use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    analysis::{
        ImageUpload,
        prompts::{ELECTRONICS_SYSTEM_INSTRUCTION, FOOD_SYSTEM_INSTRUCTION},
    },
    common::generate_timestamp,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    None,
    Food,
    Electronics,
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::None => "none",
            Mode::Food => "food",
            Mode::Electronics => "electronics",
        }
    }

    /// Fixed system instruction configuring a session for this mode.
    pub fn system_instruction(&self) -> Option<&'static str> {
        match self {
            Mode::None => None,
            Mode::Food => Some(FOOD_SYSTEM_INSTRUCTION),
            Mode::Electronics => Some(ELECTRONICS_SYSTEM_INSTRUCTION),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text(text.into())
    }

    pub fn image(image: &ImageUpload) -> Self {
        MessagePart::InlineData {
            mime_type: image.mime_type.clone(),
            data: image.to_base64(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMessage {
    pub role: Role,
    pub parts: Vec<MessagePart>,
}

impl SessionMessage {
    pub fn user(parts: Vec<MessagePart>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![MessagePart::text(text)],
        }
    }
}

/// One ongoing multi-turn exchange with the backend. The history only grows
/// when an exchange completes at the transport level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub mode: Mode,
    pub system_instruction: String,
    history: Vec<SessionMessage>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(mode: Mode, system_instruction: impl Into<String>) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            mode,
            system_instruction: system_instruction.into(),
            history: Vec::new(),
            created_at: now,
        }
    }

    pub fn history(&self) -> &[SessionMessage] {
        &self.history
    }

    /// History plus the pending user message, in send order.
    pub fn contents_with(&self, message: &SessionMessage) -> Vec<SessionMessage> {
        let mut contents = Vec::with_capacity(self.history.len() + 1);
        contents.extend(self.history.iter().cloned());
        contents.push(message.clone());
        contents
    }

    pub fn record_exchange(&mut self, message: SessionMessage, reply: &str) {
        self.history.push(message);
        self.history.push(SessionMessage::model(reply));
    }
}
