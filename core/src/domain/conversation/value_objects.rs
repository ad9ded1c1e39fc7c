use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{
    conversation::entities::{Phase, Turn},
    session::entities::Mode,
};

/// Outcome of a user action handed to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Accepted,
    Rejected(RejectReason),
}

impl Dispatch {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Dispatch::Accepted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("a request is already in flight")]
    Busy,

    #[error("action not valid in phase {actual:?}, expected {expected:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("input is empty")]
    EmptyInput,

    #[error("no analysis mode selected")]
    NoMode,

    #[error("no active session")]
    NoSession,

    #[error("no analyzed product to build a recipe for")]
    NoSubject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SelectMode,
    SubmitFoodImage,
    SubmitElectronicsDetails,
    RequestRecipe,
    SendMessage,
    Reset,
}

/// Read-only copy of the conversation handed to renderers. Turns are shared
/// with the conversation, so taking a snapshot never copies image data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversationSnapshot {
    pub mode: Mode,
    pub phase: Phase,
    pub loading: bool,
    #[schema(value_type = Vec<Turn>)]
    pub turns: Vec<Arc<Turn>>,
    pub last_analyzed_subject: Option<String>,
    pub available_actions: Vec<Action>,
}
