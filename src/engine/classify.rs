use super::config::AnalysisConfig;
use super::types::{LegSet, StrategyLabel};
use crate::strategies;

/// Positions with more legs than this get a generic label without matching.
pub const MAX_CATALOG_LEGS: usize = 3;

/// True when the legs disagree on underlying or expiry.
pub fn has_mixed_context(legs: &LegSet) -> bool {
    let mut iter = legs.iter();
    let Some(first) = iter.next() else {
        return false;
    };
    iter.any(|l| l.underlying != first.underlying || l.expiry != first.expiry)
}

/// Classify a position against the strategy catalog. Never fails: shapes the
/// catalog does not know get the custom label.
pub fn identify_strategy(legs: &LegSet, config: &AnalysisConfig) -> StrategyLabel {
    let label = if has_mixed_context(legs) {
        StrategyLabel::mixed_context()
    } else if legs.len() > MAX_CATALOG_LEGS {
        StrategyLabel::custom_with_legs(legs.len())
    } else {
        strategies::catalog()
            .iter()
            .find_map(|p| {
                p.label_for(legs.legs(), config.strike_epsilon)
                    .map(|name| StrategyLabel::canonical(&p.name, name))
            })
            .unwrap_or_else(StrategyLabel::custom)
    };

    tracing::debug!(
        legs = legs.len(),
        strategy = %label,
        pattern = label.pattern.as_deref().unwrap_or("-"),
        "Classified position"
    );
    label
}
