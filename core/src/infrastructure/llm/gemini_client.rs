use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    session::{
        entities::{MessagePart, Role, SessionMessage},
        ports::LLMClient,
        value_objects::{GenerationRequest, Tool},
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    model_name: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolConfig {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl From<MessagePart> for Part {
    fn from(part: MessagePart) -> Self {
        match part {
            MessagePart::Text(text) => Part::Text { text },
            MessagePart::InlineData { mime_type, data } => Part::InlineData {
                inline_data: InlineData { mime_type, data },
            },
        }
    }
}

impl From<SessionMessage> for Content {
    fn from(message: SessionMessage) -> Self {
        Content {
            role: Some(message.role),
            parts: message.parts.into_iter().map(Part::from).collect(),
        }
    }
}

impl From<GenerationRequest> for GeminiRequest {
    fn from(request: GenerationRequest) -> Self {
        GeminiRequest {
            contents: request.contents.into_iter().map(Content::from).collect(),
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: request.system_instruction,
                }],
            }),
            generation_config: request.response_schema.map(|response_schema| GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            }),
            tools: request
                .tools
                .into_iter()
                .map(|tool| match tool {
                    Tool::GoogleSearch => ToolConfig {
                        google_search: GoogleSearch {},
                    },
                })
                .collect(),
        }
    }
}

impl GeminiResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates?.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        (!text.is_empty()).then_some(text)
    }
}

impl GeminiLLMClient {
    pub fn new(api_key: String, model_name: String) -> Self {
        Self {
            api_key,
            model_name,
            base_url: crate::domain::common::DEFAULT_GEMINI_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model_name)
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_name)
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Gemini API request failed: {}", e);
                CoreError::BackendError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::BackendError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::BackendError(format!("Failed to parse LLM response: {}", e))
        })?;

        gemini_response
            .into_text()
            .ok_or_else(|| CoreError::BackendError("No response from LLM".to_string()))
    }
}

impl From<&LLMConfig> for GeminiLLMClient {
    fn from(config: &LLMConfig) -> Self {
        GeminiLLMClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())
            .with_base_url(config.gemini_base_url.clone())
    }
}

impl LLMClient for GeminiLLMClient {
    async fn check_model(&self) -> Result<(), CoreError> {
        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Gemini API unreachable: {}", e);
                CoreError::ConnectionError(format!("LLM API unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini model check failed: {} - {}", status, error_text);
            return Err(CoreError::ConnectionError(format!(
                "LLM API rejected model {}: {}",
                self.model_name, status
            )));
        }

        tracing::debug!(model = %self.model_name, "Gemini model available");
        Ok(())
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, CoreError> {
        self.call_gemini_api(GeminiRequest::from(request)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(contents: Vec<SessionMessage>) -> GenerationRequest {
        GenerationRequest {
            system_instruction: "You are ECOSAUR.".to_string(),
            contents,
            response_schema: None,
            tools: Vec::new(),
        }
    }

    #[test]
    fn test_food_request_body() {
        let message = SessionMessage::user(vec![
            MessagePart::text("Analyze"),
            MessagePart::InlineData {
                mime_type: "image/png".to_string(),
                data: "AAEC".to_string(),
            },
        ]);
        let body = serde_json::to_value(GeminiRequest::from(
            request(vec![message]).with_response_schema(json!({"type": "object"})),
        ))
        .unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "Analyze"},
                        {"inline_data": {"mime_type": "image/png", "data": "AAEC"}}
                    ]
                }],
                "system_instruction": {"parts": [{"text": "You are ECOSAUR."}]},
                "generation_config": {
                    "response_mime_type": "application/json",
                    "response_schema": {"type": "object"}
                }
            })
        );
    }

    #[test]
    fn test_search_request_body_carries_history() {
        let history = vec![
            SessionMessage::user(vec![MessagePart::text("first")]),
            SessionMessage::model("reply"),
            SessionMessage::user(vec![MessagePart::text("second")]),
        ];
        let body = serde_json::to_value(GeminiRequest::from(
            request(history).with_tool(Tool::GoogleSearch),
        ))
        .unwrap();

        assert_eq!(body["tools"], json!([{"google_search": {}}]));
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert!(body.get("generation_config").is_none());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "```json\n"}, {"text": "{}\n```"}]}
            }]
        }))
        .unwrap();

        assert_eq!(response.into_text().as_deref(), Some("```json\n{}\n```"));
    }

    #[test]
    fn test_response_without_text() {
        let response: GeminiResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert_eq!(response.into_text(), None);

        let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let client = GeminiLLMClient::new("k".to_string(), "gemini-2.5-flash".to_string())
            .with_base_url("http://127.0.0.1:9000/v1beta/");

        assert_eq!(
            client.generate_url(),
            "http://127.0.0.1:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            client.model_url(),
            "http://127.0.0.1:9000/v1beta/models/gemini-2.5-flash"
        );
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_expose_api_key() {
        let client = GeminiLLMClient::new("SECRET-KEY-123".to_string(), "m".to_string())
            .with_base_url("http://127.0.0.1:1/v1beta");

        let error = client.check_model().await.unwrap_err();
        assert!(matches!(error, CoreError::ConnectionError(_)));
        assert!(!error.to_string().contains("SECRET-KEY-123"));

        let error = client.generate(request(Vec::new())).await.unwrap_err();
        assert!(matches!(error, CoreError::BackendError(_)));
        assert!(!error.to_string().contains("SECRET-KEY-123"));
    }
}
