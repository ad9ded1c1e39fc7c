use axum::extract::State;

use crate::application::http::{
    conversation::validators::ConversationResponse,
    server::{api_entities::response::Response, app_state::AppState},
};

#[utoipa::path(
    get,
    path = "",
    tag = "conversation",
    summary = "Current conversation",
    description = "Returns the latest snapshot, including the processing state while a request is in flight",
    responses(
        (status = 200, body = ConversationResponse)
    ),
)]
pub async fn get_conversation(State(state): State<AppState>) -> Response<ConversationResponse> {
    Response::OK(ConversationResponse::from(state.snapshot()))
}
