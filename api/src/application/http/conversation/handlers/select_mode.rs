use axum::extract::State;

use crate::application::http::{
    conversation::validators::{ConversationResponse, SelectModeRequest},
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
    path = "/mode",
    tag = "conversation",
    summary = "Select the analysis mode",
    description = "Opens a backend session for food or electronics analysis. A failed connection is reported as an error turn and the mode can be selected again.",
    request_body = SelectModeRequest,
    responses(
        (status = 200, body = ConversationResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 409, body = ApiErrorResponse)
    ),
)]
pub async fn select_mode(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<SelectModeRequest>,
) -> Result<Response<ConversationResponse>, ApiError> {
    let mode = payload.mode;
    let snapshot = state
        .dispatch(move |mut conversation| async move { conversation.select_mode(mode).await })
        .await?;

    Ok(Response::OK(ConversationResponse::from(snapshot)))
}
