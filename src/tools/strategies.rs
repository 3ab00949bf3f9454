use crate::strategies::catalog;

use super::ai_format;
use super::response_types::{StrategiesResponse, StrategyInfo};

pub fn execute() -> StrategiesResponse {
    let strategies: Vec<StrategyInfo> = catalog()
        .into_iter()
        .map(|p| StrategyInfo {
            name: p.name,
            category: p.category,
            legs: p.legs,
            description: p.description,
        })
        .collect();

    ai_format::format_strategies(strategies)
}
