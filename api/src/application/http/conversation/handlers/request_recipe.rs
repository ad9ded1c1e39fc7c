use axum::extract::State;
use ecosaur_core::domain::conversation::TurnContent;

use crate::application::http::{
    conversation::validators::{ConversationResponse, RequestRecipeRequest},
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
    path = "/recipe",
    tag = "conversation",
    summary = "Accept a recipe offer",
    description = "Asks for a healthier recipe for the last analyzed product. Each offer can be accepted once.",
    request_body = RequestRecipeRequest,
    responses(
        (status = 200, body = ConversationResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 409, body = ApiErrorResponse)
    ),
)]
pub async fn request_recipe(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<RequestRecipeRequest>,
) -> Result<Response<ConversationResponse>, ApiError> {
    let offer_turn_id = payload.offer_turn_id;

    let is_offer = state.snapshot().turns.iter().any(|turn| {
        turn.id == offer_turn_id && matches!(turn.content, TurnContent::RecipeOffer { .. })
    });
    if !is_offer {
        return Err(ApiError::BadRequest(format!(
            "Turn {} is not a recipe offer",
            offer_turn_id
        )));
    }

    if !state.claim_recipe_offer(offer_turn_id) {
        return Err(ApiError::Conflict(
            "Recipe offer has already been used".to_string(),
        ));
    }

    let result = state
        .dispatch(|mut conversation| async move { conversation.request_recipe().await })
        .await;

    match result {
        Ok(snapshot) => Ok(Response::OK(ConversationResponse::from(snapshot))),
        Err(e) => {
            state.release_recipe_offer(&offer_turn_id);
            Err(e)
        }
    }
}
