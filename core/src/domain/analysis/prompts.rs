use crate::domain::analysis::schema::ELECTRONICS_JSON_STRUCTURE;

pub const FOOD_SYSTEM_INSTRUCTION: &str = "You are an expert nutritionist and food scientist named ECOSAUR. You analyze food products for their health impact. You communicate in a friendly, clear, and helpful manner.";

pub const ELECTRONICS_SYSTEM_INSTRUCTION: &str = "You are an expert in consumer electronics and environmental sustainability, named ECOSAUR. You analyze gadgets for their eco-friendliness. You are informative, objective, and provide actionable advice.";

pub const FOOD_ANALYSIS_INSTRUCTION: &str = "Analyze the food product in this image. Use OCR to read the ingredients and nutritional facts. Provide a detailed analysis based on established dietary guidelines. Return the analysis in the specified JSON format.";

const FOOD_FALLBACK_PREFIX: &str = "I couldn't structure the analysis correctly. The product might be unusual or the image unclear. Here's the raw data I found: ";

const ELECTRONICS_FALLBACK_PREFIX: &str = "I found some information but couldn't structure it properly. This might happen with very new or obscure devices. Here's what I found: ";

pub fn electronics_analysis_prompt(model_name: &str) -> String {
    format!(
        "Please act as an expert on consumer electronics and environmental impact. \
The user wants to analyze the following gadget: \"{model_name}\".
1. Use Google Search to find the official specifications for this model.
2. Based on the specs, analyze its eco-friendliness.
3. Your entire response MUST be a single JSON object enclosed in a ```json ... ``` markdown block. \
Do not add any text before or after it.
The JSON object must have this exact structure:
{ELECTRONICS_JSON_STRUCTURE}"
    )
}

pub fn food_fallback_message(raw_response: &str) -> String {
    format!("{FOOD_FALLBACK_PREFIX}{raw_response}")
}

pub fn electronics_fallback_message(raw_response: &str) -> String {
    format!("{ELECTRONICS_FALLBACK_PREFIX}{raw_response}")
}
