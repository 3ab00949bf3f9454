pub mod butterflies;
pub mod helpers;
pub mod singles;
pub mod spreads;

use crate::engine::types::StrategyPattern;

/// Canonical shapes in evaluation order. The classifier takes the first entry
/// whose matcher accepts the legs.
pub fn catalog() -> Vec<StrategyPattern> {
    let mut patterns = Vec::new();
    patterns.extend(singles::all());
    patterns.extend(spreads::all());
    patterns.extend(butterflies::all());
    patterns
}

pub fn find_pattern(name: &str) -> Option<StrategyPattern> {
    catalog().into_iter().find(|p| p.name == name)
}
