use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One invalid or missing field. `leg` is the 0-based input index, `None` for
/// position-level problems (empty leg list, length mismatch, underlying price).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldIssue {
    pub leg: Option<usize>,
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn leg(index: usize, field: &str, reason: impl Into<String>) -> Self {
        Self {
            leg: Some(index),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn position(field: &str, reason: impl Into<String>) -> Self {
        Self {
            leg: None,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leg {
            Some(i) => write!(f, "leg[{i}].{}: {}", self.field, self.reason),
            None => write!(f, "{}: {}", self.field, self.reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid position input: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Issues reported against a given leg index.
    pub fn for_leg(&self, index: usize) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter().filter(move |i| i.leg == Some(index))
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
