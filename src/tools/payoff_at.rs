use anyhow::Result;

use crate::engine::core::PositionInput;

use super::ai_format;
use super::response_types::PayoffAtResponse;

pub fn execute(input: &PositionInput, price: f64) -> Result<PayoffAtResponse> {
    let (legs, point) = crate::engine::core::payoff_at_price(input, price)?;
    Ok(ai_format::format_payoff_at(&legs, point))
}
