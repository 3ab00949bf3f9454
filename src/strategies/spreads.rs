use super::helpers::{
    all_of_type, count_token, holds, pattern, same_size, strikes_equal, Leg, OptionType, Side,
    StrategyPattern,
};

// Straddles and strangles only label the one-lot shapes (+1,+1) / (-1,-1);
// ratio variants fall through to the custom label.

fn match_straddle(legs: &[Leg], side: Side, epsilon: f64) -> Option<String> {
    let [a, b] = legs else {
        return None;
    };
    if a.option_type == b.option_type || !strikes_equal(a.strike, b.strike, epsilon) {
        return None;
    }
    if !(holds(a, side, 1.0) && holds(b, side, 1.0)) {
        return None;
    }
    Some(format!("{} Straddle", side.as_str()))
}

fn match_strangle(legs: &[Leg], side: Side, epsilon: f64) -> Option<String> {
    let [lower, upper] = legs else {
        return None;
    };
    if lower.option_type != OptionType::Put
        || upper.option_type != OptionType::Call
        || strikes_equal(lower.strike, upper.strike, epsilon)
    {
        return None;
    }
    if !(holds(lower, side, 1.0) && holds(upper, side, 1.0)) {
        return None;
    }
    Some(format!("{} Strangle", side.as_str()))
}

/// Long verticals buy the lower strike and sell the upper (debit); short
/// verticals do the opposite (credit). Both legs must hold the same size.
fn match_vertical(legs: &[Leg], option_type: OptionType, side: Side, epsilon: f64) -> Option<String> {
    let [lower, upper] = legs else {
        return None;
    };
    if !all_of_type(legs, option_type) || strikes_equal(lower.strike, upper.strike, epsilon) {
        return None;
    }
    if lower.side() != side || upper.side() == side {
        return None;
    }
    if !same_size(lower, upper) {
        return None;
    }
    let size = lower.quantity.abs();
    let flavor = match side {
        Side::Long => "Debit Spread",
        Side::Short => "Credit Spread",
    };
    Some(format!(
        "{} {}{} Vertical Spread ({flavor})",
        side.as_str(),
        count_token(size),
        option_type.as_str()
    ))
}

// Straddles
pub fn long_straddle() -> StrategyPattern {
    pattern("long_straddle", "Straddles", "Buy a call and a put at the same strike", 2, |legs, eps| {
        match_straddle(legs, Side::Long, eps)
    })
}

pub fn short_straddle() -> StrategyPattern {
    pattern("short_straddle", "Straddles", "Sell a call and a put at the same strike", 2, |legs, eps| {
        match_straddle(legs, Side::Short, eps)
    })
}

// Strangles
pub fn long_strangle() -> StrategyPattern {
    pattern("long_strangle", "Strangles", "Buy a lower strike put and a higher strike call", 2, |legs, eps| {
        match_strangle(legs, Side::Long, eps)
    })
}

pub fn short_strangle() -> StrategyPattern {
    pattern("short_strangle", "Strangles", "Sell a lower strike put and a higher strike call", 2, |legs, eps| {
        match_strangle(legs, Side::Short, eps)
    })
}

// Vertical spreads
pub fn long_call_vertical() -> StrategyPattern {
    pattern("long_call_vertical", "Verticals", "Buy lower strike call, sell equal size higher strike call", 2, |legs, eps| {
        match_vertical(legs, OptionType::Call, Side::Long, eps)
    })
}

pub fn short_call_vertical() -> StrategyPattern {
    pattern("short_call_vertical", "Verticals", "Sell lower strike call, buy equal size higher strike call", 2, |legs, eps| {
        match_vertical(legs, OptionType::Call, Side::Short, eps)
    })
}

pub fn long_put_vertical() -> StrategyPattern {
    pattern("long_put_vertical", "Verticals", "Buy lower strike put, sell equal size higher strike put", 2, |legs, eps| {
        match_vertical(legs, OptionType::Put, Side::Long, eps)
    })
}

pub fn short_put_vertical() -> StrategyPattern {
    pattern("short_put_vertical", "Verticals", "Sell lower strike put, buy equal size higher strike put", 2, |legs, eps| {
        match_vertical(legs, OptionType::Put, Side::Short, eps)
    })
}

pub fn all() -> Vec<StrategyPattern> {
    vec![
        long_straddle(), short_straddle(),
        long_strangle(), short_strangle(),
        long_call_vertical(), short_call_vertical(),
        long_put_vertical(), short_put_vertical(),
    ]
}
