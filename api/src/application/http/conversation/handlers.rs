pub mod get_conversation;
pub mod request_recipe;
pub mod reset_conversation;
pub mod select_mode;
pub mod send_message;
pub mod submit_electronics_details;
pub mod submit_food_image;
