use super::helpers::{count_token, pattern, Leg, OptionType, Side, StrategyPattern};

fn match_single(legs: &[Leg], option_type: OptionType, side: Side) -> Option<String> {
    let [leg] = legs else {
        return None;
    };
    if leg.option_type != option_type || leg.side() != side {
        return None;
    }
    Some(format!(
        "{} {}{}",
        side.as_str(),
        count_token(leg.quantity),
        option_type.as_str()
    ))
}

pub fn long_call() -> StrategyPattern {
    pattern("long_call", "Singles", "Buy one or more calls", 1, |legs, _| {
        match_single(legs, OptionType::Call, Side::Long)
    })
}

pub fn short_call() -> StrategyPattern {
    pattern("short_call", "Singles", "Sell one or more calls", 1, |legs, _| {
        match_single(legs, OptionType::Call, Side::Short)
    })
}

pub fn long_put() -> StrategyPattern {
    pattern("long_put", "Singles", "Buy one or more puts", 1, |legs, _| {
        match_single(legs, OptionType::Put, Side::Long)
    })
}

pub fn short_put() -> StrategyPattern {
    pattern("short_put", "Singles", "Sell one or more puts", 1, |legs, _| {
        match_single(legs, OptionType::Put, Side::Short)
    })
}

pub fn all() -> Vec<StrategyPattern> {
    vec![long_call(), short_call(), long_put(), short_put()]
}
