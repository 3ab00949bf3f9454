use std::collections::HashMap;

use crate::engine::types::{
    LabelKind, LegSet, PayoffPoint, PositionAnalysis, PositionMetrics, StrategyLabel,
};
use crate::strategies;

use super::response_types::{
    AnalyzeResponse, ClassifyResponse, CurveSummary, LegPayoff, PayoffAtResponse,
    StrategiesResponse, StrategyInfo,
};

/// Points kept in the down-sampled curve preview.
const CURVE_PREVIEW_POINTS: usize = 25;

fn format_pnl(value: f64) -> String {
    if value >= 0.0 {
        format!("+${value:.2}")
    } else {
        format!("-${:.2}", value.abs())
    }
}

fn format_bound(value: Option<f64>) -> String {
    value.map_or_else(|| "unlimited".to_string(), |v| format!("${v:.2}"))
}

fn format_prices(prices: &[f64]) -> String {
    prices
        .iter()
        .map(|p| format!("{p:.2}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn premium_phrase(net_premium: f64) -> String {
    if net_premium > 0.0 {
        format!("net debit of ${net_premium:.2}")
    } else if net_premium < 0.0 {
        format!("net credit of ${:.2}", net_premium.abs())
    } else {
        "zero net premium".to_string()
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn sample_curve(curve: &[PayoffPoint], max_points: usize) -> Vec<PayoffPoint> {
    if max_points == 0 {
        return vec![];
    }
    if max_points == 1 {
        return curve.last().cloned().into_iter().collect();
    }
    if curve.len() <= max_points {
        return curve.to_vec();
    }
    let step = (curve.len() - 1) as f64 / (max_points - 1) as f64;
    (0..max_points)
        .map(|i| {
            let idx = (i as f64 * step).round() as usize;
            curve[idx.min(curve.len() - 1)].clone()
        })
        .collect()
}

fn compute_curve_summary(curve: &[PayoffPoint]) -> CurveSummary {
    let mut min_payoff = f64::INFINITY;
    let mut max_payoff = f64::NEG_INFINITY;
    for p in curve {
        min_payoff = min_payoff.min(p.payoff);
        max_payoff = max_payoff.max(p.payoff);
    }
    if curve.is_empty() {
        min_payoff = 0.0;
        max_payoff = 0.0;
    }

    CurveSummary {
        num_points: curve.len(),
        min_payoff,
        max_payoff,
        payoff_at_range_min: curve.first().map_or(0.0, |p| p.payoff),
        payoff_at_range_max: curve.last().map_or(0.0, |p| p.payoff),
        sampled_curve: sample_curve(curve, CURVE_PREVIEW_POINTS),
    }
}

fn metrics_sentence(metrics: &PositionMetrics) -> String {
    let mut sentence = format!(
        "Max profit {}, max loss {}",
        format_bound(metrics.max_profit),
        format_bound(metrics.max_loss),
    );
    if let Some(rr) = metrics.risk_reward {
        sentence.push_str(&format!(" (reward/risk {rr:.2})"));
    }
    sentence.push('.');
    sentence
}

pub fn format_analysis(analysis: PositionAnalysis) -> AnalyzeResponse {
    let PositionAnalysis {
        legs,
        context,
        strategy,
        curve,
        break_evens,
        current_payoff,
        metrics,
    } = analysis;

    let break_even_text = if break_evens.is_empty() {
        "no break-even inside the sampled range".to_string()
    } else {
        format!("break-evens at {}", format_prices(&break_evens))
    };
    let mut summary = format!(
        "{} on {} expiring {} ({} legs, {}): {}. {}",
        strategy,
        context.underlying,
        context.expiry.format("%Y-%m-%d"),
        legs.len(),
        premium_phrase(metrics.net_premium),
        break_even_text,
        metrics_sentence(&metrics),
    );
    if let Some(payoff) = current_payoff {
        summary.push_str(&format!(
            " Expiring at {:.2} pays {}.",
            curve.range.center,
            format_pnl(payoff)
        ));
    }

    let warnings: Vec<String> = context
        .warning
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut suggested_next_steps = Vec::new();
    match strategy.kind {
        LabelKind::MixedContext => suggested_next_steps.push(
            "Split the legs by underlying and expiry and analyze each group separately".to_string(),
        ),
        LabelKind::Custom => suggested_next_steps.push(
            "Use list_strategies to compare these legs against the recognized shapes".to_string(),
        ),
        LabelKind::Canonical => {}
    }
    if current_payoff.is_none() {
        suggested_next_steps.push(
            "Pass underlying_price to center the range on the current price and get the payoff there"
                .to_string(),
        );
    }
    if break_evens.is_empty() {
        suggested_next_steps.push(
            "Widen the sampled range with overrides.range_fraction to look for break-evens further out"
                .to_string(),
        );
    }
    suggested_next_steps
        .push("Use payoff_at_price to check the payoff at a specific target price".to_string());

    let curve_summary = compute_curve_summary(&curve.points);

    AnalyzeResponse {
        summary,
        strategy,
        context,
        warnings,
        legs: legs.legs().to_vec(),
        price_range: curve.range,
        break_evens,
        current_payoff,
        metrics,
        curve_summary,
        curve: curve.points,
        suggested_next_steps,
    }
}

pub fn format_classification(legs: &LegSet, strategy: StrategyLabel) -> ClassifyResponse {
    let pattern = strategy.pattern.as_deref().and_then(strategies::find_pattern);

    let summary = match strategy.kind {
        LabelKind::Canonical => format!("Classified {} legs as {}.", legs.len(), strategy),
        LabelKind::Custom => format!(
            "{} legs do not match any recognized shape; labeled {}.",
            legs.len(),
            strategy
        ),
        LabelKind::MixedContext => format!(
            "{} legs span more than one underlying or expiry and cannot be classified.",
            legs.len()
        ),
    };

    let mut suggested_next_steps =
        vec!["Use analyze_position for the payoff curve and break-evens".to_string()];
    if !strategy.is_canonical() {
        suggested_next_steps
            .push("Use list_strategies to see which leg shapes are recognized".to_string());
    }

    ClassifyResponse {
        summary,
        category: pattern.as_ref().map(|p| p.category.clone()),
        description: pattern.map(|p| p.description),
        strategy,
        legs: legs.legs().to_vec(),
        suggested_next_steps,
    }
}

pub fn format_payoff_at(legs: &LegSet, point: PayoffPoint) -> PayoffAtResponse {
    let per_leg: Vec<LegPayoff> = legs
        .iter()
        .zip(&point.per_leg)
        .map(|(leg, payoff)| LegPayoff {
            identifier: leg.identifier.clone(),
            strike: leg.strike,
            option_type: leg.option_type.as_str().to_string(),
            quantity: leg.quantity,
            payoff: *payoff,
        })
        .collect();

    let summary = format!(
        "Expiring at {:.2}, the {}-leg position pays {}.",
        point.price,
        legs.len(),
        format_pnl(point.payoff),
    );

    PayoffAtResponse {
        summary,
        price: point.price,
        payoff: point.payoff,
        per_leg,
        suggested_next_steps: vec![
            "Use analyze_position for the full curve, break-evens and max profit/loss".to_string(),
        ],
    }
}

pub fn format_strategies(strategies: Vec<StrategyInfo>) -> StrategiesResponse {
    let total = strategies.len();
    let mut categories: HashMap<String, usize> = HashMap::new();
    for s in &strategies {
        *categories.entry(s.category.clone()).or_default() += 1;
    }

    let cat_parts: Vec<String> = {
        let mut sorted: Vec<_> = categories.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        sorted
            .iter()
            .map(|(cat, count)| format!("{cat} ({count})"))
            .collect()
    };

    let summary = format!(
        "{} strategy shapes recognized across {} categories: {}.",
        total,
        categories.len(),
        cat_parts.join(", "),
    );

    StrategiesResponse {
        summary,
        total,
        categories,
        strategies,
        suggested_next_steps: vec![
            "Use classify_position to label a set of legs".to_string(),
            "Use analyze_position for the payoff curve, break-evens and max profit/loss"
                .to_string(),
        ],
    }
}
