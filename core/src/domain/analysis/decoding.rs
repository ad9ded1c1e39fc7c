use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    analysis::entities::{ElectronicsAnalysisResult, FoodAnalysisResult},
    common::entities::app_errors::CoreError,
};

static FENCED_JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fenced json pattern is valid")
});

/// Returns the body of the first ```json fenced block in `text`.
pub fn extract_fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON_BLOCK
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty())
}

pub fn decode_food_response(raw_response: &str) -> Result<FoodAnalysisResult, CoreError> {
    serde_json::from_str(raw_response.trim()).map_err(|e| {
        tracing::error!("Error parsing food analysis JSON: {}", e);
        CoreError::DecodeError(format!("Invalid food analysis format: {}", e))
    })
}

pub fn decode_electronics_response(
    raw_response: &str,
) -> Result<ElectronicsAnalysisResult, CoreError> {
    let json_text = extract_fenced_json(raw_response).ok_or_else(|| {
        tracing::error!("No JSON block found in the electronics response");
        CoreError::DecodeError("No JSON block found in the response".to_string())
    })?;

    serde_json::from_str(json_text).map_err(|e| {
        tracing::error!("Error parsing electronics analysis JSON: {}", e);
        CoreError::DecodeError(format!("Invalid electronics analysis format: {}", e))
    })
}
