use std::future::Future;

use crate::domain::{
    analysis::{AnalysisOutcome, ElectronicsAnalysisResult, FoodAnalysisResult, ImageUpload},
    common::entities::app_errors::CoreError,
    session::{
        entities::{Mode, Session},
        value_objects::GenerationRequest,
    },
};

/// LLM Client trait for calling AI models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Verifies the backend is reachable and accepts the configured
    /// credential and model.
    fn check_model(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Sends one request and returns the concatenated text of the reply.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Session-level operations. Each call is a single request/response cycle
/// and is never retried.
pub trait SessionClient: Send + Sync {
    fn start_session(&self, mode: Mode) -> impl Future<Output = Result<Session, CoreError>> + Send;

    fn analyze_food(
        &self,
        session: &mut Session,
        image: ImageUpload,
    ) -> impl Future<Output = Result<AnalysisOutcome<FoodAnalysisResult>, CoreError>> + Send;

    fn analyze_electronics(
        &self,
        session: &mut Session,
        model_name: &str,
    ) -> impl Future<Output = Result<AnalysisOutcome<ElectronicsAnalysisResult>, CoreError>> + Send;

    fn continue_chat(
        &self,
        session: &mut Session,
        message: &str,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}
