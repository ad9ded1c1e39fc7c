use axum::extract::State;

use crate::application::http::{
    conversation::validators::ConversationResponse,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/reset",
    tag = "conversation",
    summary = "Start over",
    description = "Drops the backend session and history and returns to mode selection",
    responses(
        (status = 200, body = ConversationResponse),
        (status = 409, body = ApiErrorResponse)
    ),
)]
pub async fn reset_conversation(
    State(state): State<AppState>,
) -> Result<Response<ConversationResponse>, ApiError> {
    let snapshot = state
        .dispatch(|mut conversation| async move { conversation.reset() })
        .await?;
    state.forget_recipe_offers();

    Ok(Response::OK(ConversationResponse::from(snapshot)))
}
