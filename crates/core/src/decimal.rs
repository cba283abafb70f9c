//! Decimal precision handling for the 38-digit target ceiling.

use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, ConversionResult};

/// Largest precision representable by both `decimal128` and `NUMBER`.
pub const MAX_PRECISION: u8 = 38;

/// Outcome of fitting a decimal into the target ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalAdjustment {
    pub adjusted_precision: u8,
    pub adjusted_scale: u8,
    pub precision_reduced: bool,
    pub scale_reduced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl DecimalAdjustment {
    pub fn is_adjusted(&self) -> bool {
        self.precision_reduced || self.scale_reduced
    }
}

/// Fit `(precision, scale)` into the 38-digit ceiling.
///
/// Precision at or below the ceiling is returned unchanged. Above it,
/// precision is clamped to 38 and the scale gives up the same number of
/// digits (`excess = precision - 38`); when the scale has fewer than
/// `excess` digits it drops to 0. The scale never exceeds the clamped
/// precision.
pub fn adjust_decimal(precision: u8, scale: u8) -> DecimalAdjustment {
    if precision <= MAX_PRECISION {
        return DecimalAdjustment {
            adjusted_precision: precision,
            adjusted_scale: scale,
            precision_reduced: false,
            scale_reduced: false,
            warning: None,
        };
    }

    let excess = precision - MAX_PRECISION;
    let reduced = if scale >= excess { scale - excess } else { 0 };
    let adjusted_scale = reduced.min(MAX_PRECISION);
    let scale_reduced = adjusted_scale != scale;

    let mut warning = format!(
        "Precision reduced from {} to {}",
        precision, MAX_PRECISION
    );
    if scale_reduced {
        warning.push_str(&format!("; scale reduced from {} to {}", scale, adjusted_scale));
    }

    DecimalAdjustment {
        adjusted_precision: MAX_PRECISION,
        adjusted_scale,
        precision_reduced: true,
        scale_reduced,
        warning: Some(warning),
    }
}

/// Reject parameter pairs no decimal type can carry.
pub(crate) fn validate_decimal(precision: u8, scale: u8) -> ConversionResult<()> {
    if precision == 0 || scale > precision {
        return Err(ConversionError::InvalidDecimal { precision, scale });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_ceiling_is_unchanged() {
        let a = adjust_decimal(18, 3);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (18, 3));
        assert!(!a.precision_reduced);
        assert!(!a.scale_reduced);
        assert!(a.warning.is_none());

        let a = adjust_decimal(38, 38);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (38, 38));
        assert!(!a.is_adjusted());
    }

    #[test]
    fn excess_is_taken_from_scale() {
        let a = adjust_decimal(40, 10);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (38, 8));
        assert!(a.precision_reduced);
        assert!(a.scale_reduced);
        assert_eq!(
            a.warning.as_deref(),
            Some("Precision reduced from 40 to 38; scale reduced from 10 to 8")
        );
    }

    #[test]
    fn scale_smaller_than_excess_floors_to_zero() {
        let a = adjust_decimal(45, 5);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (38, 0));

        let a = adjust_decimal(50, 10);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (38, 0));
        assert!(a.scale_reduced);
    }

    #[test]
    fn zero_scale_only_reduces_precision() {
        let a = adjust_decimal(39, 0);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (38, 0));
        assert!(a.precision_reduced);
        assert!(!a.scale_reduced);
        assert_eq!(a.warning.as_deref(), Some("Precision reduced from 39 to 38"));
    }

    #[test]
    fn scale_is_capped_at_clamped_precision() {
        let a = adjust_decimal(255, 250);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (38, 33));

        let a = adjust_decimal(100, 99);
        assert_eq!((a.adjusted_precision, a.adjusted_scale), (38, 37));
    }

    #[test]
    fn validation_rejects_impossible_pairs() {
        assert!(validate_decimal(10, 2).is_ok());
        assert!(validate_decimal(5, 5).is_ok());
        assert_eq!(
            validate_decimal(0, 0),
            Err(ConversionError::InvalidDecimal {
                precision: 0,
                scale: 0
            })
        );
        assert!(validate_decimal(4, 6).is_err());
    }
}
