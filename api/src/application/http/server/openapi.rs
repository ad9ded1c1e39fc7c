use utoipa::OpenApi;

use crate::application::http::{conversation::router::ConversationApiDoc, health::HealthApiDoc};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ecosaur API",
        description = "Chat backend for food and electronics sustainability analysis"
    ),
    nest(
        (path = "/conversation", api = ConversationApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
