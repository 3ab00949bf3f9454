use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::breakeven;
use super::classify;
use super::config::AnalysisConfig;
use super::error::{FieldIssue, ValidationError};
use super::metrics;
use super::payoff;
use super::types::{LegSet, PayoffPoint, PositionAnalysis, RawLeg, RawScalar, StrategyLabel};
use super::validation;

/// Unvalidated position as delivered by the data-retrieval layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PositionInput {
    /// Leg records, one per option contract
    pub legs: Vec<RawLeg>,
    /// Signed position quantities aligned by index with `legs`
    pub quantities: Vec<RawScalar>,
    /// Current underlying price, when known
    #[serde(default)]
    pub underlying_price: Option<f64>,
}

/// Validate, classify, and evaluate a position at expiry.
pub fn analyze_position(
    input: &PositionInput,
    config: &AnalysisConfig,
) -> Result<PositionAnalysis, ValidationError> {
    let (legs, underlying_price) =
        validation::validate_position(&input.legs, &input.quantities, input.underlying_price)?;

    let context = validation::resolve_context(&legs).ok_or_else(|| ValidationError {
        issues: vec![FieldIssue::position("legs", "at least one leg is required")],
    })?;
    if let Some(warning) = &context.warning {
        tracing::warn!(
            underlying = %context.underlying,
            expiry = %context.expiry,
            "Ambiguous position context: {warning}"
        );
    }

    let strategy = classify::identify_strategy(&legs, config);
    let range = payoff::select_range(&legs, underlying_price, config);
    let curve = payoff::build_curve(&legs, range);
    let break_evens = breakeven::find_break_evens(&curve, config);
    let current_payoff = underlying_price.map(|price| payoff::aggregate_payoff(&legs, price));
    let metrics = metrics::position_metrics(&legs);

    tracing::debug!(
        strategy = %strategy,
        break_evens = break_evens.len(),
        "Analyzed position"
    );

    Ok(PositionAnalysis {
        legs,
        context,
        strategy,
        curve,
        break_evens,
        current_payoff,
        metrics,
    })
}

/// Validate and classify only.
pub fn classify_position(
    input: &PositionInput,
    config: &AnalysisConfig,
) -> Result<(LegSet, StrategyLabel), ValidationError> {
    let legs = validation::validate_legs(&input.legs, &input.quantities)?;
    let label = classify::identify_strategy(&legs, config);
    Ok((legs, label))
}

/// Aggregate and per-leg expiry payoff at a single underlying price. Zero is
/// a valid price here.
pub fn payoff_at_price(
    input: &PositionInput,
    price: f64,
) -> Result<(LegSet, PayoffPoint), ValidationError> {
    let price_issue = (!price.is_finite() || price < 0.0).then(|| {
        FieldIssue::position("price", format!("must be a non-negative finite price, got {price}"))
    });
    let legs = match (validation::validate_legs(&input.legs, &input.quantities), price_issue) {
        (Ok(legs), None) => legs,
        (Ok(_), Some(issue)) => return Err(ValidationError { issues: vec![issue] }),
        (Err(mut err), Some(issue)) => {
            err.issues.push(issue);
            return Err(err);
        }
        (Err(err), None) => return Err(err),
    };
    let point = payoff::payoff_breakdown(&legs, price);
    Ok((legs, point))
}
