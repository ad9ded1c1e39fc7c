use crate::domain::{
    analysis::{
        AnalysisOutcome, ElectronicsAnalysisResult, FoodAnalysisResult, ImageUpload,
        decoding::{decode_electronics_response, decode_food_response},
        prompts::{
            FOOD_ANALYSIS_INSTRUCTION, electronics_analysis_prompt, electronics_fallback_message,
            food_fallback_message,
        },
        schema::get_food_analysis_schema,
    },
    common::{entities::app_errors::CoreError, services::Service},
    session::{
        entities::{MessagePart, Mode, Session, SessionMessage},
        ports::{LLMClient, SessionClient},
        value_objects::{GenerationRequest, Tool},
    },
};

impl<LLM> Service<LLM>
where
    LLM: LLMClient,
{
    /// Sends `message` on `session` and records the exchange once a reply
    /// arrives.
    async fn exchange(
        &self,
        session: &mut Session,
        message: SessionMessage,
        request: GenerationRequest,
    ) -> Result<String, CoreError> {
        let reply = self.llm_client.generate(request).await.map_err(|e| {
            tracing::error!(session_id = %session.id, "backend call failed: {}", e);
            match e {
                CoreError::ConnectionError(msg) => CoreError::BackendError(msg),
                other => other,
            }
        })?;

        session.record_exchange(message, &reply);
        Ok(reply)
    }
}

impl<LLM> SessionClient for Service<LLM>
where
    LLM: LLMClient,
{
    async fn start_session(&self, mode: Mode) -> Result<Session, CoreError> {
        let system_instruction = mode.system_instruction().ok_or(CoreError::InvalidMode)?;

        self.llm_client.check_model().await.map_err(|e| {
            tracing::error!("Failed to start chat session: {}", e);
            match e {
                CoreError::ConnectionError(msg) => CoreError::ConnectionError(msg),
                other => CoreError::ConnectionError(other.to_string()),
            }
        })?;

        let session = Session::new(mode, system_instruction);
        tracing::info!(session_id = %session.id, mode = mode.as_str(), "session started");

        Ok(session)
    }

    async fn analyze_food(
        &self,
        session: &mut Session,
        image: ImageUpload,
    ) -> Result<AnalysisOutcome<FoodAnalysisResult>, CoreError> {
        if image.is_empty() {
            return Err(CoreError::InvalidImage);
        }

        let message = SessionMessage::user(vec![
            MessagePart::text(FOOD_ANALYSIS_INSTRUCTION),
            MessagePart::image(&image),
        ]);
        let request = GenerationRequest::for_session(session, &message)
            .with_response_schema(get_food_analysis_schema());

        let raw_response = self.exchange(session, message, request).await?;

        match decode_food_response(&raw_response) {
            Ok(result) => Ok(AnalysisOutcome::Structured(result)),
            Err(e) => {
                tracing::warn!(raw_response = %raw_response, "falling back to raw food reply: {}", e);
                Ok(AnalysisOutcome::Fallback(food_fallback_message(&raw_response)))
            }
        }
    }

    async fn analyze_electronics(
        &self,
        session: &mut Session,
        model_name: &str,
    ) -> Result<AnalysisOutcome<ElectronicsAnalysisResult>, CoreError> {
        let model_name = model_name.trim();
        if model_name.is_empty() {
            return Err(CoreError::InvalidInput("model name is empty".to_string()));
        }

        let message =
            SessionMessage::user(vec![MessagePart::text(electronics_analysis_prompt(model_name))]);
        let request =
            GenerationRequest::for_session(session, &message).with_tool(Tool::GoogleSearch);

        let raw_response = self.exchange(session, message, request).await?;

        match decode_electronics_response(&raw_response) {
            Ok(result) => Ok(AnalysisOutcome::Structured(result)),
            Err(e) => {
                tracing::warn!(raw_response = %raw_response, "falling back to raw electronics reply: {}", e);
                Ok(AnalysisOutcome::Fallback(electronics_fallback_message(
                    &raw_response,
                )))
            }
        }
    }

    async fn continue_chat(
        &self,
        session: &mut Session,
        message: &str,
    ) -> Result<String, CoreError> {
        let message = SessionMessage::user(vec![MessagePart::text(message)]);
        let request = GenerationRequest::for_session(session, &message);

        self.exchange(session, message, request).await
    }
}
