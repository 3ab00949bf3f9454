use super::helpers::{all_of_type, holds, pattern, strikes_equal, Leg, OptionType, Side, StrategyPattern};

/// Three same-type legs at equally spaced, strictly increasing strikes holding
/// 1 / -2 / 1 contracts (long) or -1 / 2 / -1 (short).
fn match_butterfly(legs: &[Leg], option_type: OptionType, side: Side, epsilon: f64) -> Option<String> {
    let [lower, middle, upper] = legs else {
        return None;
    };
    if !all_of_type(legs, option_type) {
        return None;
    }
    let lower_width = middle.strike - lower.strike;
    let upper_width = upper.strike - middle.strike;
    if lower_width <= epsilon
        || upper_width <= epsilon
        || !strikes_equal(lower_width, upper_width, epsilon)
    {
        return None;
    }
    let wing = side;
    let body = match side {
        Side::Long => Side::Short,
        Side::Short => Side::Long,
    };
    if !(holds(lower, wing, 1.0) && holds(middle, body, 2.0) && holds(upper, wing, 1.0)) {
        return None;
    }
    Some(format!("{} {} Butterfly", side.as_str(), option_type.as_str()))
}

pub fn long_call_butterfly() -> StrategyPattern {
    pattern(
        "long_call_butterfly",
        "Butterflies",
        "Buy 1 lower call, sell 2 middle calls, buy 1 upper call",
        3,
        |legs, eps| match_butterfly(legs, OptionType::Call, Side::Long, eps),
    )
}

pub fn short_call_butterfly() -> StrategyPattern {
    pattern(
        "short_call_butterfly",
        "Butterflies",
        "Sell 1 lower call, buy 2 middle calls, sell 1 upper call",
        3,
        |legs, eps| match_butterfly(legs, OptionType::Call, Side::Short, eps),
    )
}

pub fn long_put_butterfly() -> StrategyPattern {
    pattern(
        "long_put_butterfly",
        "Butterflies",
        "Buy 1 lower put, sell 2 middle puts, buy 1 upper put",
        3,
        |legs, eps| match_butterfly(legs, OptionType::Put, Side::Long, eps),
    )
}

pub fn short_put_butterfly() -> StrategyPattern {
    pattern(
        "short_put_butterfly",
        "Butterflies",
        "Sell 1 lower put, buy 2 middle puts, sell 1 upper put",
        3,
        |legs, eps| match_butterfly(legs, OptionType::Put, Side::Short, eps),
    )
}

pub fn all() -> Vec<StrategyPattern> {
    vec![
        long_call_butterfly(),
        short_call_butterfly(),
        long_put_butterfly(),
        short_put_butterfly(),
    ]
}
