use axum::extract::State;

use crate::application::http::{
    conversation::validators::{ConversationResponse, SendMessageRequest},
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/messages",
    tag = "conversation",
    summary = "Send a follow-up message",
    request_body = SendMessageRequest,
    responses(
        (status = 200, body = ConversationResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 409, body = ApiErrorResponse)
    ),
)]
pub async fn send_message(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<SendMessageRequest>,
) -> Result<Response<ConversationResponse>, ApiError> {
    let snapshot = state
        .dispatch(move |mut conversation| async move {
            conversation.send_message(&payload.text).await
        })
        .await?;

    Ok(Response::OK(ConversationResponse::from(snapshot)))
}
