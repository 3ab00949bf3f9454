use super::payoff::aggregate_payoff;
use super::types::{LegSet, OptionType, PositionMetrics};

/// Σ premium × quantity. Positive means the position was opened for a net debit.
pub fn net_premium(legs: &LegSet) -> f64 {
    legs.iter().map(|l| l.premium * l.quantity).sum()
}

/// Payoff slope above the highest strike: only calls keep moving there.
fn upper_tail_slope(legs: &LegSet) -> f64 {
    legs.iter()
        .filter(|l| l.option_type == OptionType::Call)
        .map(|l| l.quantity)
        .sum()
}

/// Max profit and max loss at expiry; `None` marks an unlimited side.
///
/// The payoff is piecewise linear with kinks only at strikes, so over
/// `[0, ∞)` its extremes sit at zero, at a strike, or out in the upper tail.
pub fn profit_bounds(legs: &LegSet) -> (Option<f64>, Option<f64>) {
    if legs.is_empty() {
        return (None, None);
    }

    let mut best = f64::NEG_INFINITY;
    let mut worst = f64::INFINITY;
    for price in std::iter::once(0.0).chain(legs.iter().map(|l| l.strike)) {
        let payoff = aggregate_payoff(legs, price);
        best = best.max(payoff);
        worst = worst.min(payoff);
    }

    let slope = upper_tail_slope(legs);
    let max_profit = (slope <= 0.0).then_some(best);
    let max_loss = (slope >= 0.0).then_some((-worst).max(0.0));
    (max_profit, max_loss)
}

pub fn position_metrics(legs: &LegSet) -> PositionMetrics {
    let (max_profit, max_loss) = profit_bounds(legs);
    let risk_reward = match (max_profit, max_loss) {
        (Some(profit), Some(loss)) if loss > 0.0 => Some(profit / loss),
        _ => None,
    };
    PositionMetrics {
        net_premium: net_premium(legs),
        max_profit,
        max_loss,
        risk_reward,
    }
}
