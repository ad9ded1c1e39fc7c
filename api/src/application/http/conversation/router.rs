use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use utoipa::OpenApi;

use super::{
    handlers::{
        get_conversation::{__path_get_conversation, get_conversation},
        request_recipe::{__path_request_recipe, request_recipe},
        reset_conversation::{__path_reset_conversation, reset_conversation},
        select_mode::{__path_select_mode, select_mode},
        send_message::{__path_send_message, send_message},
        submit_electronics_details::{
            __path_submit_electronics_details, submit_electronics_details,
        },
        submit_food_image::{__path_submit_food_image, submit_food_image},
    },
    validators::MAX_UPLOAD_SIZE,
};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(
    get_conversation,
    select_mode,
    submit_food_image,
    submit_electronics_details,
    request_recipe,
    send_message,
    reset_conversation
))]
pub struct ConversationApiDoc;

pub fn conversation_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{}/conversation", root_path),
            get(get_conversation),
        )
        .route(
            &format!("{}/conversation/mode", root_path),
            post(select_mode),
        )
        .route(
            &format!("{}/conversation/food", root_path),
            post(submit_food_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE)),
        )
        .route(
            &format!("{}/conversation/electronics", root_path),
            post(submit_electronics_details).layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE)),
        )
        .route(
            &format!("{}/conversation/recipe", root_path),
            post(request_recipe),
        )
        .route(
            &format!("{}/conversation/messages", root_path),
            post(send_message),
        )
        .route(
            &format!("{}/conversation/reset", root_path),
            post(reset_conversation),
        )
}
