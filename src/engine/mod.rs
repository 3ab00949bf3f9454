pub mod breakeven;
pub mod classify;
pub mod config;
pub mod core;
pub mod error;
pub mod metrics;
pub mod payoff;
pub mod types;
pub mod validation;
