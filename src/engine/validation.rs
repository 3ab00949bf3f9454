use chrono::NaiveDate;

use super::error::{FieldIssue, ValidationError};
use super::types::{AmbiguousInputWarning, Leg, LegSet, OptionType, PositionContext, RawLeg, RawScalar};

/// Expiry formats accepted from the data layer, tried in order.
const EXPIRY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Validate raw leg records against their parallel position quantities and
/// produce a strike-sorted `LegSet`.
///
/// All problems are collected before failing, so the error names every bad
/// field together with its leg index.
pub fn validate_legs(raw: &[RawLeg], quantities: &[RawScalar]) -> Result<LegSet, ValidationError> {
    let mut issues = Vec::new();
    let legs = collect_legs(raw, quantities, &mut issues);
    if issues.is_empty() {
        Ok(LegSet::new(legs))
    } else {
        Err(ValidationError { issues })
    }
}

/// `validate_legs` plus the optional current underlying price.
pub fn validate_position(
    raw: &[RawLeg],
    quantities: &[RawScalar],
    underlying_price: Option<f64>,
) -> Result<(LegSet, Option<f64>), ValidationError> {
    let mut issues = Vec::new();
    let legs = collect_legs(raw, quantities, &mut issues);
    if let Some(price) = underlying_price {
        if !price.is_finite() || price <= 0.0 {
            issues.push(FieldIssue::position(
                "underlying_price",
                format!("must be a positive finite price, got {price}"),
            ));
        }
    }
    if issues.is_empty() {
        Ok((LegSet::new(legs), underlying_price))
    } else {
        Err(ValidationError { issues })
    }
}

fn collect_legs(raw: &[RawLeg], quantities: &[RawScalar], issues: &mut Vec<FieldIssue>) -> Vec<Leg> {
    if raw.is_empty() {
        issues.push(FieldIssue::position("legs", "at least one leg is required"));
    }
    if raw.len() != quantities.len() {
        issues.push(FieldIssue::position(
            "quantities",
            format!(
                "{} position quantities for {} legs; lists must align by index",
                quantities.len(),
                raw.len()
            ),
        ));
    }

    let mut legs = Vec::with_capacity(raw.len());
    for (i, record) in raw.iter().enumerate() {
        let before = issues.len();

        let strike = number(record.strike.as_ref(), i, "strike", issues);
        if let Some(k) = strike {
            if k <= 0.0 {
                issues.push(FieldIssue::leg(i, "strike", format!("must be positive, got {k}")));
            }
        }
        let premium = number(record.premium.as_ref(), i, "premium", issues);
        // a missing quantity is already covered by the length mismatch issue
        let quantity = quantities
            .get(i)
            .and_then(|q| number(Some(q), i, "quantity", issues));
        if quantity == Some(0.0) {
            issues.push(FieldIssue::leg(i, "quantity", "must be non-zero"));
        }
        let option_type = option_type(record.option_type.as_deref(), i, issues);
        let underlying = text(record.underlying.as_deref(), i, "underlying", issues);
        let expiry = expiry(record.expiry.as_deref(), i, issues);

        if issues.len() > before {
            continue;
        }
        if let (Some(strike), Some(premium), Some(quantity), Some(option_type), Some(underlying), Some(expiry)) =
            (strike, premium, quantity, option_type, underlying, expiry)
        {
            legs.push(Leg {
                identifier: record
                    .identifier
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                strike,
                option_type,
                premium,
                quantity,
                underlying,
                expiry,
            });
        }
    }
    legs
}

fn number(value: Option<&RawScalar>, leg: usize, field: &str, issues: &mut Vec<FieldIssue>) -> Option<f64> {
    let Some(value) = value else {
        issues.push(FieldIssue::leg(leg, field, "is missing"));
        return None;
    };
    match value.to_f64() {
        Some(v) if v.is_finite() => Some(v),
        Some(v) => {
            issues.push(FieldIssue::leg(leg, field, format!("must be finite, got {v}")));
            None
        }
        None => {
            let shown = match value {
                RawScalar::Text(s) => s.clone(),
                RawScalar::Number(n) => n.to_string(),
                RawScalar::Other(v) => v.to_string(),
            };
            issues.push(FieldIssue::leg(leg, field, format!("is not numeric: {shown:?}")));
            None
        }
    }
}

fn option_type(code: Option<&str>, leg: usize, issues: &mut Vec<FieldIssue>) -> Option<OptionType> {
    let Some(code) = code else {
        issues.push(FieldIssue::leg(leg, "option_type", "is missing"));
        return None;
    };
    let parsed = OptionType::from_code(code);
    if parsed.is_none() {
        issues.push(FieldIssue::leg(
            leg,
            "option_type",
            format!("unknown option type {code:?} (expected Call or Put)"),
        ));
    }
    parsed
}

fn text(value: Option<&str>, leg: usize, field: &str, issues: &mut Vec<FieldIssue>) -> Option<String> {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => {
            issues.push(FieldIssue::leg(leg, field, "is missing"));
            None
        }
    }
}

fn expiry(value: Option<&str>, leg: usize, issues: &mut Vec<FieldIssue>) -> Option<NaiveDate> {
    let raw = text(value, leg, "expiry", issues)?;
    let parsed = EXPIRY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&raw, fmt).ok());
    if parsed.is_none() {
        issues.push(FieldIssue::leg(
            leg,
            "expiry",
            format!("is not a YYYY-MM-DD date: {raw:?}"),
        ));
    }
    parsed
}

/// Resolve the underlying/expiry the analysis runs under.
///
/// The first leg in strike order supplies the context, which keeps the result
/// independent of input order. When legs disagree, the distinct values are
/// reported in an `AmbiguousInputWarning`. Returns `None` for an empty set.
pub fn resolve_context(legs: &LegSet) -> Option<PositionContext> {
    let first = legs.legs().first()?;

    let mut underlyings: Vec<String> = Vec::new();
    let mut expiries: Vec<NaiveDate> = Vec::new();
    for leg in legs {
        if !underlyings.contains(&leg.underlying) {
            underlyings.push(leg.underlying.clone());
        }
        if !expiries.contains(&leg.expiry) {
            expiries.push(leg.expiry);
        }
    }

    let warning = (underlyings.len() > 1 || expiries.len() > 1)
        .then_some(AmbiguousInputWarning {
            underlyings,
            expiries,
        });

    Some(PositionContext {
        underlying: first.underlying.clone(),
        expiry: first.expiry,
        warning,
    })
}
