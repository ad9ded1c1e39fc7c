use crate::domain::session::entities::{Session, SessionMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GoogleSearch,
}

/// A single `generateContent` call: instruction, full history including the
/// new user message, and the optional output constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub contents: Vec<SessionMessage>,
    pub response_schema: Option<serde_json::Value>,
    pub tools: Vec<Tool>,
}

impl GenerationRequest {
    pub fn for_session(session: &Session, message: &SessionMessage) -> Self {
        Self {
            system_instruction: session.system_instruction.clone(),
            contents: session.contents_with(message),
            response_schema: None,
            tools: Vec::new(),
        }
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }
}
