pub mod ai_format;
pub mod analyze;
pub mod classify;
pub mod payoff_at;
pub mod response_types;
pub mod strategies;
