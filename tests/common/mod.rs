#![allow(dead_code)]

use optopsy_payoff::engine::core::PositionInput;
use optopsy_payoff::engine::types::{RawLeg, RawScalar};
use serde_json::{json, Value};

pub const UNDERLYING: &str = "SPY";
pub const EXPIRY: &str = "2024-03-15";

/// Synthetic single-expiry chain (SPY, Mar 15 2024) used across the tests.
///
///   | Strike | Call premium | Put premium |
///   |--------|--------------|-------------|
///   | 90     | 12.00        | 1.00        |
///   | 95     | 8.20         | 2.30        |
///   | 100    | 5.00         | 4.00        |
///   | 105    | 2.60         | 6.50        |
///   | 110    | 1.00         | 10.00       |
pub fn chain_premium(strike: f64, option_type: &str) -> f64 {
    let calls = [(90.0, 12.00), (95.0, 8.20), (100.0, 5.00), (105.0, 2.60), (110.0, 1.00)];
    let puts = [(90.0, 1.00), (95.0, 2.30), (100.0, 4.00), (105.0, 6.50), (110.0, 10.00)];
    let table = if option_type.starts_with('C') { &calls } else { &puts };
    table
        .iter()
        .find(|(k, _)| (*k - strike).abs() < 1e-9)
        .map(|(_, p)| *p)
        .unwrap_or_else(|| panic!("no {option_type} at strike {strike} in test chain"))
}

/// Leg record as the chain lookup would deliver it; the premium comes from
/// the synthetic chain above.
pub fn chain_leg(strike: f64, option_type: &str) -> RawLeg {
    raw_leg(strike, option_type, chain_premium(strike, option_type))
}

pub fn raw_leg(strike: f64, option_type: &str, premium: f64) -> RawLeg {
    RawLeg {
        identifier: Some(format!("{UNDERLYING}240315{option_type}{strike:08.0}")),
        strike: Some(strike.into()),
        option_type: Some(option_type.to_string()),
        premium: Some(premium.into()),
        underlying: Some(UNDERLYING.to_string()),
        expiry: Some(EXPIRY.to_string()),
    }
}

pub fn quantities(values: &[f64]) -> Vec<RawScalar> {
    values.iter().map(|q| RawScalar::from(*q)).collect()
}

pub fn position(legs: Vec<RawLeg>, qty: &[f64], underlying_price: Option<f64>) -> PositionInput {
    PositionInput {
        legs,
        quantities: quantities(qty),
        underlying_price,
    }
}

/// Chain legs `(strike, type)` with the matching quantities.
pub fn chain_position(shape: &[(f64, &str, f64)]) -> PositionInput {
    let legs = shape.iter().map(|(k, t, _)| chain_leg(*k, t)).collect();
    let qty: Vec<f64> = shape.iter().map(|(_, _, q)| *q).collect();
    position(legs, &qty, None)
}

/// JSON leg records for MCP tool arguments.
pub fn legs_json(shape: &[(f64, &str)]) -> Value {
    Value::Array(
        shape
            .iter()
            .map(|(k, t)| {
                json!({
                    "strike": k,
                    "option_type": t,
                    "premium": chain_premium(*k, t),
                    "underlying": UNDERLYING,
                    "expiry": EXPIRY,
                })
            })
            .collect(),
    )
}
