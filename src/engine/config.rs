use std::path::Path;

use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Env var naming an optional TOML file with `AnalysisConfig` fields.
pub const CONFIG_PATH_VAR: &str = "PAYOFF_CONFIG";

fn positive_finite(value: &f64, (): &()) -> garde::Result {
    if !value.is_finite() || *value <= 0.0 {
        return Err(garde::Error::new(format!(
            "must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}

fn non_negative_finite(value: &f64, (): &()) -> garde::Result {
    if !value.is_finite() || *value < 0.0 {
        return Err(garde::Error::new(format!(
            "must be a non-negative finite number, got {value}"
        )));
    }
    Ok(())
}

/// Sampling resolution and numeric tolerances for the payoff engine and the
/// strategy classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum half-width of the price range as a fraction of its center
    #[garde(custom(positive_finite))]
    pub range_fraction: f64,
    /// Number of evenly spaced curve samples (both ends included)
    #[garde(range(min = 2, max = 100_000))]
    pub samples: usize,
    /// Absolute tolerance for strike equality and strike spacing checks
    #[garde(custom(non_negative_finite))]
    pub strike_epsilon: f64,
    /// Payoff magnitude treated as zero when extracting break-evens
    #[garde(custom(positive_finite))]
    pub break_even_epsilon: f64,
    /// Break-evens closer than this collapse into one
    #[garde(custom(non_negative_finite))]
    pub break_even_min_separation: f64,
    /// Decimal places break-evens are rounded to
    #[garde(range(max = 10))]
    pub break_even_decimals: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            range_fraction: 0.10,
            samples: 300,
            strike_epsilon: 1e-8,
            break_even_epsilon: 1e-6,
            break_even_min_separation: 0.01,
            break_even_decimals: 2,
        }
    }
}

impl AnalysisConfig {
    /// Build from environment variables.
    ///
    /// | Env Var | Default | Field |
    /// |---------|---------|-------|
    /// | `PAYOFF_CONFIG` | (none) | TOML file loaded before env overrides |
    /// | `PAYOFF_RANGE_FRACTION` | `0.10` | `range_fraction` |
    /// | `PAYOFF_SAMPLES` | `300` | `samples` |
    /// | `PAYOFF_STRIKE_EPSILON` | `1e-8` | `strike_epsilon` |
    /// | `PAYOFF_BREAK_EVEN_EPSILON` | `1e-6` | `break_even_epsilon` |
    /// | `PAYOFF_BREAK_EVEN_MIN_SEPARATION` | `0.01` | `break_even_min_separation` |
    /// | `PAYOFF_BREAK_EVEN_DECIMALS` | `2` | `break_even_decimals` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides(|var| std::env::var(var).ok())
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply `PAYOFF_*` overrides resolved through `lookup`, then validate.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = parse_var(&lookup, "PAYOFF_RANGE_FRACTION")? {
            self.range_fraction = v;
        }
        if let Some(v) = parse_var(&lookup, "PAYOFF_SAMPLES")? {
            self.samples = v;
        }
        if let Some(v) = parse_var(&lookup, "PAYOFF_STRIKE_EPSILON")? {
            self.strike_epsilon = v;
        }
        if let Some(v) = parse_var(&lookup, "PAYOFF_BREAK_EVEN_EPSILON")? {
            self.break_even_epsilon = v;
        }
        if let Some(v) = parse_var(&lookup, "PAYOFF_BREAK_EVEN_MIN_SEPARATION")? {
            self.break_even_min_separation = v;
        }
        if let Some(v) = parse_var(&lookup, "PAYOFF_BREAK_EVEN_DECIMALS")? {
            self.break_even_decimals = v;
        }
        self.check()?;
        Ok(self)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidEnv {
            var: var.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}

/// Per-request overrides accepted by the MCP tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ConfigOverrides {
    /// Minimum range half-width as a fraction of the center price
    #[garde(inner(custom(positive_finite)))]
    pub range_fraction: Option<f64>,
    /// Number of curve samples
    #[garde(inner(range(min = 2, max = 100_000)))]
    pub samples: Option<usize>,
    /// Strike equality tolerance
    #[garde(inner(custom(non_negative_finite)))]
    pub strike_epsilon: Option<f64>,
    /// Payoff magnitude treated as zero
    #[garde(inner(custom(positive_finite)))]
    pub break_even_epsilon: Option<f64>,
    /// Minimum separation between reported break-evens
    #[garde(inner(custom(non_negative_finite)))]
    pub break_even_min_separation: Option<f64>,
    /// Break-even rounding precision
    #[garde(inner(range(max = 10)))]
    pub break_even_decimals: Option<u32>,
}

impl ConfigOverrides {
    pub fn apply(&self, base: &AnalysisConfig) -> AnalysisConfig {
        AnalysisConfig {
            range_fraction: self.range_fraction.unwrap_or(base.range_fraction),
            samples: self.samples.unwrap_or(base.samples),
            strike_epsilon: self.strike_epsilon.unwrap_or(base.strike_epsilon),
            break_even_epsilon: self.break_even_epsilon.unwrap_or(base.break_even_epsilon),
            break_even_min_separation: self
                .break_even_min_separation
                .unwrap_or(base.break_even_min_separation),
            break_even_decimals: self.break_even_decimals.unwrap_or(base.break_even_decimals),
        }
    }
}
