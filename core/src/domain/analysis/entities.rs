use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::analysis::value_objects::Score;

/// Result of a food product analysis, as returned by the backend under the
/// food response schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodAnalysisResult {
    pub product_name: String,
    pub health_score: Score,
    pub beneficial_ingredients: Vec<BeneficialIngredient>,
    pub harmful_ingredients: Vec<HarmfulIngredient>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BeneficialIngredient {
    pub name: String,
    pub benefit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HarmfulIngredient {
    pub name: String,
    pub risk: String,
}

/// Merits and demerits, shared by both result kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisSummary {
    pub merits: Vec<String>,
    pub demerits: Vec<String>,
}

/// Result of an electronics sustainability analysis, decoded from the fenced
/// JSON block of the backend reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElectronicsAnalysisResult {
    pub eco_score: Score,
    pub device_type: String,
    pub analysis: AnalysisSummary,
    pub carbon_footprint: String,
    pub annual_energy_consumption: String,
}
