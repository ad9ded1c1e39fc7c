use axum::extract::{Multipart, State};

use crate::application::http::{
    conversation::validators::{
        ConversationResponse, FoodImageForm, multipart_error, read_image,
    },
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
    path = "/food",
    tag = "conversation",
    summary = "Analyze a food label",
    description = "Uploads a photo of a food label or ingredient list",
    request_body(content = FoodImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ConversationResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 409, body = ApiErrorResponse)
    ),
)]
pub async fn submit_food_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<ConversationResponse>, ApiError> {
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("image") {
            image = Some(read_image(field).await?);
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("Missing image field".to_string()))?;

    let snapshot = state
        .dispatch(move |mut conversation| async move {
            conversation.submit_food_image(image).await
        })
        .await?;

    Ok(Response::OK(ConversationResponse::from(snapshot)))
}
