//! Converter configuration.
//!
//! The CLI reads it from a TOML file; library callers construct it directly.

use serde::{Deserialize, Serialize};

/// What to do with a decimal wider than the 38-digit ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalOverflowPolicy {
    /// Clamp with [`adjust_decimal`](crate::decimal::adjust_decimal) and log a warning.
    #[default]
    Adjust,
    /// Fail with `PrecisionOverflow`.
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub decimal_overflow: DecimalOverflowPolicy,
}

impl ConverterConfig {
    pub fn rejecting_overflow() -> Self {
        ConverterConfig {
            decimal_overflow: DecimalOverflowPolicy::Reject,
        }
    }
}
