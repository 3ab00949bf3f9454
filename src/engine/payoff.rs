use super::config::AnalysisConfig;
use super::types::{Leg, LegSet, OptionType, PayoffCurve, PayoffPoint, PriceRange};

/// Margin applied to the distance from the center to the outermost strikes.
const STRIKE_MARGIN: f64 = 1.1;

/// Expiry payoff of one option position at underlying price `price`.
pub fn option_payoff(
    option_type: OptionType,
    strike: f64,
    premium: f64,
    quantity: f64,
    price: f64,
) -> f64 {
    let intrinsic = match option_type {
        OptionType::Call => (price - strike).max(0.0),
        OptionType::Put => (strike - price).max(0.0),
    };
    (intrinsic - premium) * quantity
}

pub fn leg_payoff(leg: &Leg, price: f64) -> f64 {
    option_payoff(leg.option_type, leg.strike, leg.premium, leg.quantity, price)
}

/// Total position payoff at `price`.
pub fn aggregate_payoff(legs: &LegSet, price: f64) -> f64 {
    legs.iter().map(|leg| leg_payoff(leg, price)).sum()
}

/// Total and per-leg payoff at `price`.
pub fn payoff_breakdown(legs: &LegSet, price: f64) -> PayoffPoint {
    let per_leg: Vec<f64> = legs.iter().map(|leg| leg_payoff(leg, price)).collect();
    let payoff = per_leg.iter().sum();
    PayoffPoint {
        price,
        payoff,
        per_leg,
    }
}

/// Choose the sampled price window.
///
/// Centered on the current underlying price when known, otherwise on the mean
/// strike. The half-width covers every strike with a 10% margin and is never
/// narrower than `range_fraction` of the center. The lower bound is clamped
/// to zero.
pub fn select_range(
    legs: &LegSet,
    underlying_price: Option<f64>,
    config: &AnalysisConfig,
) -> PriceRange {
    let center = underlying_price
        .or_else(|| legs.mean_strike())
        .unwrap_or(0.0);
    let min_strike = legs.min_strike().unwrap_or(center);
    let max_strike = legs.max_strike().unwrap_or(center);

    let half_width = (center * config.range_fraction)
        .max(STRIKE_MARGIN * (center - min_strike).abs())
        .max(STRIKE_MARGIN * (center - max_strike).abs());

    PriceRange {
        center,
        min: (center - half_width).max(0.0),
        max: center + half_width,
        samples: config.samples,
    }
}

/// Evaluate the position at `range.samples` evenly spaced prices, both ends
/// included.
pub fn build_curve(legs: &LegSet, range: PriceRange) -> PayoffCurve {
    let n = range.samples;
    let step = if n > 1 {
        (range.max - range.min) / (n - 1) as f64
    } else {
        0.0
    };

    let points: Vec<PayoffPoint> = (0..n)
        .map(|i| {
            // pin the last sample to the upper bound to avoid accumulated drift
            let price = if i + 1 == n {
                range.max
            } else {
                range.min + step * i as f64
            };
            payoff_breakdown(legs, price)
        })
        .collect();

    tracing::debug!(
        samples = points.len(),
        min = range.min,
        max = range.max,
        "Built payoff curve"
    );

    PayoffCurve { range, points }
}
