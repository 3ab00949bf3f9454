use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Display name for positions the catalog has no canonical shape for.
pub const CUSTOM_STRATEGY: &str = "Custom Strategy";

/// Display name for positions whose legs disagree on underlying or expiry.
pub const MIXED_CONTEXT: &str = "Unclassifiable: mixed underlying/expiry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Side {
    Long = 1,
    Short = -1,
}

impl Side {
    /// Side implied by a signed position quantity (zero is rejected upstream).
    pub fn of(quantity: f64) -> Self {
        if quantity > 0.0 {
            Side::Long
        } else {
            Side::Short
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Long => "Long",
            Side::Short => "Short",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        }
    }

    /// Parse a market-data option type code (`C`, `Call`, `P`, `Put`; any case).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "c" | "call" => Some(OptionType::Call),
            "p" | "put" => Some(OptionType::Put),
            _ => None,
        }
    }
}

/// A scalar as delivered by the data-retrieval layer: either a number or text
/// that should hold one. Any other JSON value is kept so validation can report
/// it against its leg and field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawScalar {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawScalar {
    /// Numeric value, or `None` when the text does not parse as a number.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            RawScalar::Number(v) => Some(*v),
            RawScalar::Text(s) => s.trim().parse::<f64>().ok(),
            RawScalar::Other(_) => None,
        }
    }
}

impl From<f64> for RawScalar {
    fn from(value: f64) -> Self {
        RawScalar::Number(value)
    }
}

impl From<&str> for RawScalar {
    fn from(value: &str) -> Self {
        RawScalar::Text(value.to_string())
    }
}

/// One unvalidated leg record. Every field is optional so that missing data
/// surfaces as a validation issue instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawLeg {
    /// Option contract ticker (informational)
    #[serde(default)]
    pub identifier: Option<String>,
    /// Strike price
    #[serde(default)]
    pub strike: Option<RawScalar>,
    /// Option type code: "C"/"Call" or "P"/"Put"
    #[serde(default)]
    pub option_type: Option<String>,
    /// Premium per unit (the contract's last price)
    #[serde(default, alias = "last_price")]
    pub premium: Option<RawScalar>,
    /// Underlying identifier (e.g. "SPY")
    #[serde(default)]
    pub underlying: Option<String>,
    /// Expiry date (YYYY-MM-DD)
    #[serde(default)]
    pub expiry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Leg {
    pub identifier: Option<String>,
    pub strike: f64,
    pub option_type: OptionType,
    pub premium: f64,
    /// Signed contract count: positive = long, negative = short
    pub quantity: f64,
    pub underlying: String,
    pub expiry: NaiveDate,
}

impl Leg {
    pub fn side(&self) -> Side {
        Side::of(self.quantity)
    }
}

/// Legs of one position, sorted ascending by strike. Ties keep input order.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct LegSet {
    legs: Vec<Leg>,
}

impl LegSet {
    pub fn new(mut legs: Vec<Leg>) -> Self {
        // sort_by is stable, so equal strikes keep their input order
        legs.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        Self { legs }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Leg> {
        self.legs.iter()
    }

    pub fn min_strike(&self) -> Option<f64> {
        self.legs.first().map(|l| l.strike)
    }

    pub fn max_strike(&self) -> Option<f64> {
        self.legs.last().map(|l| l.strike)
    }

    pub fn mean_strike(&self) -> Option<f64> {
        if self.legs.is_empty() {
            return None;
        }
        let total: f64 = self.legs.iter().map(|l| l.strike).sum();
        Some(total / self.legs.len() as f64)
    }
}

impl<'a> IntoIterator for &'a LegSet {
    type Item = &'a Leg;
    type IntoIter = std::slice::Iter<'a, Leg>;

    fn into_iter(self) -> Self::IntoIter {
        self.legs.iter()
    }
}

/// Matcher for one catalog entry: given strike-sorted legs and the strike
/// tolerance, returns the display label when the shape matches.
pub type Matcher = fn(&[Leg], f64) -> Option<String>;

#[derive(Debug, Clone)]
pub struct StrategyPattern {
    pub name: String,
    pub category: String,
    pub description: String,
    pub legs: usize,
    pub matcher: Matcher,
}

impl StrategyPattern {
    pub fn label_for(&self, legs: &[Leg], strike_epsilon: f64) -> Option<String> {
        if legs.len() != self.legs {
            return None;
        }
        (self.matcher)(legs, strike_epsilon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LabelKind {
    /// Matched a catalog entry
    Canonical,
    /// No catalog entry matched
    Custom,
    /// Legs disagree on underlying or expiry
    MixedContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StrategyLabel {
    pub name: String,
    /// Catalog entry that produced the label, `None` for custom/mixed
    pub pattern: Option<String>,
    pub kind: LabelKind,
}

impl StrategyLabel {
    pub fn canonical(pattern: &str, name: String) -> Self {
        Self {
            name,
            pattern: Some(pattern.to_string()),
            kind: LabelKind::Canonical,
        }
    }

    pub fn custom() -> Self {
        Self {
            name: CUSTOM_STRATEGY.to_string(),
            pattern: None,
            kind: LabelKind::Custom,
        }
    }

    pub fn custom_with_legs(count: usize) -> Self {
        Self {
            name: format!("{CUSTOM_STRATEGY} ({count} legs)"),
            pattern: None,
            kind: LabelKind::Custom,
        }
    }

    pub fn mixed_context() -> Self {
        Self {
            name: MIXED_CONTEXT.to_string(),
            pattern: None,
            kind: LabelKind::MixedContext,
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.kind == LabelKind::Canonical
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Raised (non-fatally) when legs disagree on underlying or expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AmbiguousInputWarning {
    pub underlyings: Vec<String>,
    pub expiries: Vec<NaiveDate>,
}

impl fmt::Display for AmbiguousInputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expiries: Vec<String> = self
            .expiries
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        write!(
            f,
            "legs mix underlyings [{}] and expiries [{}]",
            self.underlyings.join(", "),
            expiries.join(", ")
        )
    }
}

/// Underlying/expiry the analysis runs under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositionContext {
    pub underlying: String,
    pub expiry: NaiveDate,
    pub warning: Option<AmbiguousInputWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PriceRange {
    pub center: f64,
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PayoffPoint {
    pub price: f64,
    pub payoff: f64,
    /// Per-leg payoffs in strike order
    pub per_leg: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PayoffCurve {
    pub range: PriceRange,
    pub points: Vec<PayoffPoint>,
}

impl PayoffCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    pub fn payoffs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.payoff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositionMetrics {
    /// Σ premium × quantity; positive = net debit paid
    pub net_premium: f64,
    /// `None` when profit is unlimited
    pub max_profit: Option<f64>,
    /// Loss magnitude; `None` when loss is unlimited
    pub max_loss: Option<f64>,
    pub risk_reward: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PositionAnalysis {
    pub legs: LegSet,
    pub context: PositionContext,
    pub strategy: StrategyLabel,
    pub curve: PayoffCurve,
    pub break_evens: Vec<f64>,
    /// Payoff if the underlying expired at the supplied current price
    pub current_payoff: Option<f64>,
    pub metrics: PositionMetrics,
}
