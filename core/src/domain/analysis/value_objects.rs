use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub const MAX_SCORE: u8 = 100;
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// A 0-100 score. Decoding accepts any JSON number, rounds it and clamps it
/// into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_SCORE))
    }

    pub fn from_raw(raw: f64) -> Self {
        let rounded = raw.round();
        let clamped = rounded.clamp(0.0, f64::from(MAX_SCORE));
        if clamped != raw {
            tracing::warn!("score {} normalized to {}", raw, clamped);
        }
        Self(clamped as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from(*self)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Ok(Score::from_raw(raw))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl From<Score> for ScoreBand {
    fn from(score: Score) -> Self {
        match score.value() {
            75.. => ScoreBand::Good,
            40..=74 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

/// Outcome of an analysis call that reached the backend: either the typed
/// result, or a human-readable fallback carrying the raw reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome<T> {
    Structured(T),
    Fallback(String),
}

impl<T> AnalysisOutcome<T> {
    pub fn is_structured(&self) -> bool {
        matches!(self, AnalysisOutcome::Structured(_))
    }
}

/// An uploaded image, kept as raw bytes until it is sent.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    pub fn new(mime_type: Option<String>, data: Vec<u8>) -> Self {
        let mime_type = mime_type
            .filter(|m| m.starts_with("image/"))
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME_TYPE.to_string());

        Self { mime_type, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}
