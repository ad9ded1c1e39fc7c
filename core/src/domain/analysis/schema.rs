use serde_json::json;

/// Returns the JSON schema for food analysis LLM responses
pub fn get_food_analysis_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "productName": {
                "type": "string",
                "description": "The name of the food product identified from the image, e.g., \"Chocolate Chip Cookies\"."
            },
            "healthScore": {
                "type": "integer",
                "description": "Overall health score from 0 to 100, where 100 is healthiest."
            },
            "beneficialIngredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "benefit": { "type": "string" }
                    },
                    "required": ["name", "benefit"]
                }
            },
            "harmfulIngredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "risk": { "type": "string" }
                    },
                    "required": ["name", "risk"]
                }
            },
            "summary": {
                "type": "object",
                "properties": {
                    "merits": { "type": "array", "items": { "type": "string" } },
                    "demerits": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["merits", "demerits"]
            }
        },
        "required": [
            "productName", "healthScore", "beneficialIngredients",
            "harmfulIngredients", "summary"
        ]
    })
}

/// Field list the electronics prompt asks the backend to emit. Search
/// grounding rules out a response schema, so the shape travels in the prompt.
pub const ELECTRONICS_JSON_STRUCTURE: &str = r#"{
  "ecoScore": number (An eco-friendliness score from 0-100, where 100 is best),
  "deviceType": "string" (e.g., 'Laptop', 'Smartphone', 'Headphones'),
  "analysis": {
    "merits": ["string array of positive points like energy efficiency, recycled materials"],
    "demerits": ["string array of negative points like poor repairability, high power consumption, rare earth minerals"]
  },
  "carbonFootprint": "string" (Estimated lifetime carbon footprint, e.g., '25 kg CO2e'),
  "annualEnergyConsumption": "string" (Estimated annual energy use, e.g., '15 kWh/year')
}"#;
