use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    analysis::{ElectronicsAnalysisResult, FoodAnalysisResult, ImageUpload},
    common::generate_timestamp,
    session::entities::Mode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingMode,
    AwaitingFoodImage,
    AwaitingElectronicsDetails,
    Processing,
    ActiveChat,
}

impl Phase {
    /// Phase the conversation waits in once a session for `mode` exists.
    pub fn first_waiting(mode: Mode) -> Option<Phase> {
        match mode {
            Mode::None => None,
            Mode::Food => Some(Phase::AwaitingFoodImage),
            Mode::Electronics => Some(Phase::AwaitingElectronicsDetails),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// Piece of a composite turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    Text { text: String },
    Image { mime_type: String, data_url: String },
}

impl Fragment {
    pub fn image(image: &ImageUpload) -> Self {
        Fragment::Image {
            mime_type: image.mime_type.clone(),
            data_url: image.to_data_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnContent {
    Text {
        text: String,
    },
    Image {
        mime_type: String,
        data_url: String,
    },
    FoodCard {
        result: FoodAnalysisResult,
    },
    ElectronicsCard {
        result: ElectronicsAnalysisResult,
    },
    /// Offer to generate a recipe for the analyzed product.
    RecipeOffer {
        product_name: String,
        text: String,
    },
    Error {
        message: String,
    },
    Composite {
        fragments: Vec<Fragment>,
    },
}

impl TurnContent {
    pub fn text(text: impl Into<String>) -> Self {
        TurnContent::Text { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        TurnContent::Error {
            message: message.into(),
        }
    }

    pub fn image(image: &ImageUpload) -> Self {
        TurnContent::Image {
            mime_type: image.mime_type.clone(),
            data_url: image.to_data_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Turn {
    pub id: Uuid,
    pub speaker: Speaker,
    pub content: TurnContent,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: Speaker, content: TurnContent) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            speaker,
            content,
            created_at: now,
        }
    }

    pub fn user(content: TurnContent) -> Self {
        Self::new(Speaker::User, content)
    }

    pub fn assistant(content: TurnContent) -> Self {
        Self::new(Speaker::Assistant, content)
    }
}
