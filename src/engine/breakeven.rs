use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use super::config::AnalysisConfig;
use super::types::PayoffCurve;

/// Locate the prices where the payoff curve touches or crosses zero.
///
/// Samples within `break_even_epsilon` of zero are taken as-is; true sign
/// changes between neighbouring samples are linearly interpolated. Results
/// are rounded to `break_even_decimals`, sorted, and points closer than
/// `break_even_min_separation` to the previously kept one are dropped.
pub fn find_break_evens(curve: &PayoffCurve, config: &AnalysisConfig) -> Vec<f64> {
    let eps = config.break_even_epsilon;
    let mut candidates = Vec::new();

    for point in &curve.points {
        if point.payoff.abs() < eps {
            candidates.push(point.price);
        }
    }

    for w in curve.points.windows(2) {
        let (x1, y1) = (w[0].price, w[0].payoff);
        let (x2, y2) = (w[1].price, w[1].payoff);
        if y1.abs() < eps || y2.abs() < eps {
            continue;
        }
        if y1.signum() == y2.signum() {
            continue;
        }
        let dy = y2 - y1;
        if dy.abs() < eps {
            continue;
        }
        let x = x1 + (x2 - x1) * (-y1 / dy);
        if x >= x1.min(x2) && x <= x1.max(x2) {
            candidates.push(x);
        }
    }

    let scale = 10f64.powi(config.break_even_decimals as i32);
    let rounded: BTreeSet<OrderedFloat<f64>> = candidates
        .into_iter()
        .map(|x| OrderedFloat((x * scale).round() / scale))
        .collect();

    let mut break_evens: Vec<f64> = Vec::with_capacity(rounded.len());
    for OrderedFloat(x) in rounded {
        match break_evens.last() {
            Some(prev) if x - prev < config.break_even_min_separation => {}
            _ => break_evens.push(x),
        }
    }
    break_evens
}
