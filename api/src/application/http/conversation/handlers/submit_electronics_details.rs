use axum::extract::{Multipart, State};

use crate::application::http::{
    conversation::validators::{
        ConversationResponse, ElectronicsDetailsForm, multipart_error, read_image,
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
    path = "/electronics",
    tag = "conversation",
    summary = "Analyze an electronic device",
    description = "Looks up a device by model name. An optional photo is shown in the conversation only.",
    request_body(content = ElectronicsDetailsForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ConversationResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 409, body = ApiErrorResponse)
    ),
)]
pub async fn submit_electronics_details(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<ConversationResponse>, ApiError> {
    let mut model_name = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("model_name") => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read model_name: {}", e))
                })?;
                model_name = Some(value);
            }
            Some("image") => {
                let upload = read_image(field).await?;
                if !upload.is_empty() {
                    image = Some(upload);
                }
            }
            _ => {}
        }
    }

    let model_name =
        model_name.ok_or_else(|| ApiError::BadRequest("Missing model_name field".to_string()))?;

    let snapshot = state
        .dispatch(move |mut conversation| async move {
            conversation
                .submit_electronics_details(&model_name, image)
                .await
        })
        .await?;

    Ok(Response::OK(ConversationResponse::from(snapshot)))
}
