use crate::{
    domain::{
        common::{EcosaurConfig, entities::app_errors::CoreError, services::Service},
        conversation::Conversation,
    },
    infrastructure::llm::GeminiLLMClient,
};

pub type EcosaurService = Service<GeminiLLMClient>;

pub type EcosaurConversation = Conversation<EcosaurService>;

/// Builds the session service from configuration. A missing credential is
/// a fatal configuration error.
pub fn create_service(config: EcosaurConfig) -> Result<EcosaurService, CoreError> {
    if config.llm.gemini_api_key.trim().is_empty() {
        return Err(CoreError::ConfigurationError(
            "Gemini API key is not set".to_string(),
        ));
    }

    let llm_client = GeminiLLMClient::from(&config.llm);
    tracing::info!(model = %llm_client.model_name(), "Gemini client configured");

    Ok(Service::new(llm_client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::LLMConfig;

    #[test]
    fn test_create_service_requires_api_key() {
        let config = EcosaurConfig {
            llm: LLMConfig::default(),
        };

        assert!(matches!(
            create_service(config),
            Err(CoreError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_create_service() {
        let config = EcosaurConfig {
            llm: LLMConfig {
                gemini_api_key: "key".to_string(),
                ..LLMConfig::default()
            },
        };

        assert!(create_service(config).is_ok());
    }
}
