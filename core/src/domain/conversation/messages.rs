use crate::domain::session::entities::Mode;

pub const FOOD_WELCOME: &str = "Great! Let's analyze a food product. Please upload a clear picture of its ingredients list and nutritional facts.";
pub const ELECTRONICS_WELCOME: &str = "Excellent choice. To analyze an electronic gadget, please upload a photo and enter its model name.";

pub const CONNECTION_FAILED: &str = "Sorry, I couldn't connect to the AI service. Please check your connection or API key and refresh.";
pub const FOOD_ANALYSIS_FAILED: &str =
    "I had trouble analyzing that image. Please try another one, ensuring the text is clear.";
pub const ELECTRONICS_ANALYSIS_FAILED: &str = "I couldn't find information for that model. Please double-check the model name and try again.";
pub const RECIPE_FAILED: &str =
    "I'm having trouble coming up with a recipe right now. Please try again in a moment.";
pub const CHAT_FAILED: &str =
    "I'm having trouble responding right now. Please try again in a moment.";

pub const ELECTRONICS_FOLLOW_UP: &str =
    "You can ask for a comparison with another device or ask any other questions you have.";
pub const RECIPE_OFFER: &str = "Would you like a recipe for a healthier, homemade version? You can also ask me any questions about this analysis.";

pub fn welcome(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::None => None,
        Mode::Food => Some(FOOD_WELCOME),
        Mode::Electronics => Some(ELECTRONICS_WELCOME),
    }
}

pub fn electronics_request(model_name: &str) -> String {
    format!("Analyzing: {model_name}")
}

pub fn electronics_model_caption(model_name: &str) -> String {
    format!("Model: {model_name}")
}

pub fn recipe_request(product_name: &str) -> String {
    format!("Yes, please generate a healthier recipe for {product_name}.")
}

pub fn recipe_prompt(product_name: &str) -> String {
    format!(
        "That sounds great. Please provide a simple, healthy, homemade recipe for {product_name}. The recipe should be easy to follow."
    )
}
