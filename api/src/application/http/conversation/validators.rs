use axum::extract::multipart::{Field, MultipartError};
use ecosaur_core::domain::{
    analysis::ImageUpload, conversation::ConversationSnapshot, session::entities::Mode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::http::server::api_entities::api_error::ApiError;

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Body limit for multipart routes: one image plus form overhead.
pub const MAX_UPLOAD_SIZE: usize = MAX_IMAGE_SIZE + 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SelectModeRequest {
    #[schema(example = "food")]
    pub mode: Mode,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SendMessageRequest {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "text must be between 1 and 5000 characters"
    ))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RequestRecipeRequest {
    pub offer_turn_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationResponse {
    pub data: ConversationSnapshot,
}

impl From<ConversationSnapshot> for ConversationResponse {
    fn from(data: ConversationSnapshot) -> Self {
        Self { data }
    }
}

/// Documentation shape of `POST /conversation/food`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct FoodImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Documentation shape of `POST /conversation/electronics`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ElectronicsDetailsForm {
    #[schema(example = "MacBook Air M2")]
    pub model_name: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

pub fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
}

/// Reads an uploaded image field, keeping its declared content type.
pub async fn read_image(field: Field<'_>) -> Result<ImageUpload, ApiError> {
    let mime_type = field.content_type().map(str::to_string);
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

    if data.len() > MAX_IMAGE_SIZE {
        return Err(ApiError::BadRequest(format!(
            "Image too large. Max size is {} bytes",
            MAX_IMAGE_SIZE
        )));
    }

    Ok(ImageUpload::new(mime_type, data.to_vec()))
}
