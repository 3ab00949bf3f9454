pub use crate::engine::types::{Leg, Matcher, OptionType, Side, StrategyPattern};

pub fn pattern(
    name: &str,
    category: &str,
    description: &str,
    legs: usize,
    matcher: Matcher,
) -> StrategyPattern {
    StrategyPattern {
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        legs,
        matcher,
    }
}

pub fn strikes_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// True when the leg holds exactly `count` contracts on `side`.
// Quantities are contract counts; exact comparison is intended.
#[allow(clippy::float_cmp)]
pub fn holds(leg: &Leg, side: Side, count: f64) -> bool {
    leg.quantity == side.multiplier() * count
}

// Quantities are contract counts; exact comparison is intended.
#[allow(clippy::float_cmp)]
pub fn same_size(a: &Leg, b: &Leg) -> bool {
    a.quantity.abs() == b.quantity.abs()
}

pub fn all_of_type(legs: &[Leg], option_type: OptionType) -> bool {
    legs.iter().all(|l| l.option_type == option_type)
}

/// Contract count rendered for a label, e.g. `3` or `2.5`.
#[allow(clippy::float_cmp)]
pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{count:.0}")
    } else {
        count.to_string()
    }
}

/// Quantity token placed between side and instrument: empty for a single
/// contract, otherwise the count followed by a space.
// Quantities are contract counts; exact comparison is intended.
#[allow(clippy::float_cmp)]
pub fn count_token(quantity: f64) -> String {
    let count = quantity.abs();
    if count == 1.0 {
        String::new()
    } else {
        format!("{} ", format_count(count))
    }
}
