use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::types::{
    Leg, PayoffPoint, PositionContext, PositionMetrics, PriceRange, StrategyLabel,
};

/// AI-enriched response for `analyze_position`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeResponse {
    pub summary: String,
    pub strategy: StrategyLabel,
    pub context: PositionContext,
    pub warnings: Vec<String>,
    /// Validated legs in strike order
    pub legs: Vec<Leg>,
    pub price_range: PriceRange,
    pub break_evens: Vec<f64>,
    pub current_payoff: Option<f64>,
    pub metrics: PositionMetrics,
    pub curve_summary: CurveSummary,
    pub curve: Vec<PayoffPoint>,
    pub suggested_next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CurveSummary {
    pub num_points: usize,
    pub min_payoff: f64,
    pub max_payoff: f64,
    pub payoff_at_range_min: f64,
    pub payoff_at_range_max: f64,
    pub sampled_curve: Vec<PayoffPoint>,
}

/// AI-enriched response for `classify_position`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassifyResponse {
    pub summary: String,
    pub strategy: StrategyLabel,
    /// Catalog category of the matched pattern
    pub category: Option<String>,
    pub description: Option<String>,
    pub legs: Vec<Leg>,
    pub suggested_next_steps: Vec<String>,
}

/// AI-enriched response for `payoff_at_price`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PayoffAtResponse {
    pub summary: String,
    pub price: f64,
    pub payoff: f64,
    pub per_leg: Vec<LegPayoff>,
    pub suggested_next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LegPayoff {
    pub identifier: Option<String>,
    pub strike: f64,
    pub option_type: String,
    pub quantity: f64,
    pub payoff: f64,
}

/// AI-enriched response for `list_strategies`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StrategiesResponse {
    pub summary: String,
    pub total: usize,
    pub categories: HashMap<String, usize>,
    pub strategies: Vec<StrategyInfo>,
    pub suggested_next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StrategyInfo {
    pub name: String,
    pub category: String,
    pub legs: usize,
    pub description: String,
}
