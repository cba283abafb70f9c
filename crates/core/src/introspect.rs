//! Mapping introspection and advisory compatibility reports.
//!
//! Nothing here feeds back into conversion; the reports exist for callers
//! that want to explain or vet a mapping before moving data.

use serde::{Deserialize, Serialize};

use crate::convert::TypeConverter;
use crate::decimal::{adjust_decimal, validate_decimal, MAX_PRECISION};
use crate::descriptor::{PrimitiveKind, SourceType, TemporalKind};
use crate::error::{ConversionError, ConversionResult};
use crate::nested;
use crate::tables;

/// Descriptive bundle for one source type. Reporting data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMappingInfo {
    pub source_type_name: String,
    /// `None` for nested types, which bypass the interchange stage.
    pub interchange_type_name: Option<String>,
    pub target_type_name: String,
    pub notes: String,
    pub has_precision_loss: bool,
    pub requires_special_handling: bool,
}

impl TypeConverter {
    /// Run both conversion paths for `source` and describe the result.
    pub fn mapping_info(&self, source: &SourceType) -> ConversionResult<TypeMappingInfo> {
        let target_type_name = self.to_target(source)?;
        let interchange_type_name = if source.is_nested() {
            None
        } else {
            Some(self.to_interchange(source)?.to_string())
        };

        let mut notes: Vec<String> = Vec::new();
        let mut has_precision_loss = false;
        let mut requires_special_handling = false;

        match source {
            SourceType::Primitive(kind) => {
                if let Some(row) = tables::widened_for(*kind) {
                    has_precision_loss = true;
                    notes.push(format!("Stored as {}; {}", row.target, row.caveat));
                } else if kind.is_integer() {
                    notes.push(format!(
                        "Integer stored as {}; reads back as a zero-scale decimal",
                        target_type_name
                    ));
                } else {
                    notes.push("Direct mapping".to_owned());
                }
            }
            SourceType::Decimal { precision, scale } => {
                if *precision > MAX_PRECISION {
                    requires_special_handling = true;
                    let adjustment = adjust_decimal(*precision, *scale);
                    if adjustment.is_adjusted() {
                        has_precision_loss = true;
                    }
                    if let Some(warning) = adjustment.warning {
                        notes.push(warning);
                    }
                } else {
                    notes.push("Decimal precision and scale preserved".to_owned());
                }
            }
            SourceType::Temporal {
                kind: TemporalKind::Timestamp,
                has_timezone: true,
            } => notes.push("Zoned timestamps are normalized to UTC".to_owned()),
            SourceType::Temporal { .. } => notes.push("Direct mapping".to_owned()),
            SourceType::List(_)
            | SourceType::Struct(_)
            | SourceType::Map { .. }
            | SourceType::Union(_) => {
                requires_special_handling = true;
                notes.push(nested::flattening_strategy(source)?);
                notes.push("Nested types bypass the interchange stage".to_owned());
            }
        }

        Ok(TypeMappingInfo {
            source_type_name: source.to_string(),
            interchange_type_name,
            target_type_name,
            notes: notes.join("; "),
            has_precision_loss,
            requires_special_handling,
        })
    }

    /// Can every value of `from` be stored in a column of type `to`?
    pub fn check_compatibility(
        &self,
        from: &SourceType,
        to: &SourceType,
    ) -> ConversionResult<String> {
        if from == to {
            return Ok(format!("{} and {} are identical", from, to));
        }
        if from.is_numeric() && to.is_numeric() {
            return self.validate_numeric_range(from, to);
        }

        match (from, to) {
            (SourceType::Union(variants), _) => {
                for v in variants {
                    self.check_compatibility(v, to).map_err(|e| {
                        ConversionError::incompatible(from, to, format!("union variant: {}", e))
                    })?;
                }
                Ok(format!(
                    "{} is compatible with {}: all {} variant(s) compatible",
                    from,
                    to,
                    variants.len()
                ))
            }
            (_, SourceType::Union(variants)) => variants
                .iter()
                .find(|v| self.check_compatibility(from, v).is_ok())
                .map(|v| format!("{} is compatible with {} via variant {}", from, to, v))
                .ok_or_else(|| {
                    ConversionError::incompatible(from, to, "no union variant accepts the type")
                }),
            (_, SourceType::Primitive(PrimitiveKind::Text)) if !from.is_nested() => Ok(format!(
                "{} can be stored in {} through its text representation",
                from, to
            )),
            (
                SourceType::Temporal {
                    kind: TemporalKind::Date,
                    has_timezone: false,
                },
                SourceType::Temporal {
                    kind: TemporalKind::Timestamp,
                    ..
                },
            ) => Ok(format!("{} widens to {} at midnight", from, to)),
            (
                SourceType::Temporal {
                    kind: TemporalKind::Timestamp,
                    has_timezone: false,
                },
                SourceType::Temporal {
                    kind: TemporalKind::Timestamp,
                    has_timezone: true,
                },
            ) => Ok(format!(
                "{} is compatible with {}: zone-less values are interpreted as UTC",
                from, to
            )),
            (
                SourceType::Temporal {
                    kind: TemporalKind::Timestamp,
                    has_timezone: true,
                },
                SourceType::Temporal {
                    kind: TemporalKind::Timestamp,
                    has_timezone: false,
                },
            ) => Err(ConversionError::incompatible(
                from,
                to,
                "the time zone offset would be discarded",
            )),
            (SourceType::List(a), SourceType::List(b)) => {
                self.check_compatibility(a, b).map_err(|e| {
                    ConversionError::incompatible(from, to, format!("element type: {}", e))
                })?;
                Ok(format!("{} is compatible with {}: element types compatible", from, to))
            }
            (
                SourceType::Map {
                    key: ak,
                    value: av,
                },
                SourceType::Map {
                    key: bk,
                    value: bv,
                },
            ) => {
                self.check_compatibility(ak, bk).map_err(|e| {
                    ConversionError::incompatible(from, to, format!("key type: {}", e))
                })?;
                self.check_compatibility(av, bv).map_err(|e| {
                    ConversionError::incompatible(from, to, format!("value type: {}", e))
                })?;
                Ok(format!(
                    "{} is compatible with {}: key and value types compatible",
                    from, to
                ))
            }
            (SourceType::Struct(a_fields), SourceType::Struct(b_fields)) => {
                let a = nested::fields_by_name(a_fields);
                let b = nested::fields_by_name(b_fields);
                for (name, a_type) in &a {
                    let b_type = b.get(name).ok_or_else(|| {
                        ConversionError::incompatible(
                            from,
                            to,
                            format!("field '{}' is missing from the target struct", name),
                        )
                    })?;
                    self.check_compatibility(a_type, b_type).map_err(|e| {
                        ConversionError::incompatible(from, to, format!("field '{}': {}", name, e))
                    })?;
                }
                Ok(format!(
                    "{} is compatible with {}: {} field(s) compatible by name",
                    from,
                    to,
                    a.len()
                ))
            }
            _ => Err(ConversionError::incompatible(
                from,
                to,
                "no conversion exists between these types",
            )),
        }
    }

    /// Can every value of numeric type `from` be represented by numeric type `to`?
    pub fn validate_numeric_range(
        &self,
        from: &SourceType,
        to: &SourceType,
    ) -> ConversionResult<String> {
        let a = NumericClass::of(from)
            .ok_or_else(|| ConversionError::incompatible(from, to, format!("{} is not numeric", from)))??;
        let b = NumericClass::of(to)
            .ok_or_else(|| ConversionError::incompatible(from, to, format!("{} is not numeric", to)))??;
        let fail = |reason: String| Err(ConversionError::incompatible(from, to, reason));

        match (a, b) {
            (
                NumericClass::Integer {
                    min: amin,
                    max: amax,
                    ..
                },
                NumericClass::Integer {
                    min: bmin,
                    max: bmax,
                    ..
                },
            ) => {
                if amin >= bmin && amax <= bmax {
                    Ok(format!(
                        "{} fits in {}: range [{}, {}] is within [{}, {}]",
                        from, to, amin, amax, bmin, bmax
                    ))
                } else {
                    fail(format!(
                        "narrowing integer conversion: range [{}, {}] exceeds [{}, {}]",
                        amin, amax, bmin, bmax
                    ))
                }
            }
            (NumericClass::Integer { digits, .. }, NumericClass::Decimal { precision, scale }) => {
                let int_digits = precision - scale;
                if digits <= int_digits {
                    Ok(format!(
                        "{} fits in {}: {} integer digit(s) needed, {} available",
                        from, to, digits, int_digits
                    ))
                } else {
                    fail(format!(
                        "decimal overflow: {} integer digit(s) needed, only {} available",
                        digits, int_digits
                    ))
                }
            }
            (
                NumericClass::Decimal {
                    precision: ap,
                    scale: as_,
                },
                NumericClass::Decimal {
                    precision: bp,
                    scale: bs,
                },
            ) => {
                let (a_int, b_int) = (ap - as_, bp - bs);
                if a_int > b_int {
                    fail(format!(
                        "decimal overflow: {} integer digit(s) needed, only {} available",
                        a_int, b_int
                    ))
                } else if as_ > bs {
                    fail(format!(
                        "scale truncation: {} fractional digit(s) would be cut to {}",
                        as_, bs
                    ))
                } else {
                    Ok(format!(
                        "{} fits in {}: integer digits {} <= {}, scale {} <= {}",
                        from, to, a_int, b_int, as_, bs
                    ))
                }
            }
            (NumericClass::Decimal { precision, scale }, NumericClass::Integer { min, max, .. }) => {
                if scale > 0 {
                    return fail(format!(
                        "{} fractional digit(s) would be truncated",
                        scale
                    ));
                }
                let bound = 10i128.checked_pow(u32::from(precision)).map(|p| p - 1);
                match bound {
                    Some(bound) if bound <= max && -bound >= min => Ok(format!(
                        "{} fits in {}: magnitude at most {} is within [{}, {}]",
                        from, to, bound, min, max
                    )),
                    _ => fail(format!(
                        "decimal overflow: {}-digit values exceed [{}, {}]",
                        precision, min, max
                    )),
                }
            }
            (NumericClass::Float { bits: ab }, NumericClass::Float { bits: bb }) => {
                if ab <= bb {
                    Ok(format!("{} widens to {}", from, to))
                } else {
                    fail("narrowing floating-point conversion".to_owned())
                }
            }
            (NumericClass::Integer { min, max, .. }, NumericClass::Float { bits }) => {
                let exact = 1i128 << mantissa_bits(bits);
                if max <= exact && min >= -exact {
                    Ok(format!("{} is exactly representable in {}", from, to))
                } else {
                    Ok(format!(
                        "{} fits in the range of {}; integers beyond +/-2^{} lose precision",
                        from,
                        to,
                        mantissa_bits(bits)
                    ))
                }
            }
            (NumericClass::Decimal { precision, scale }, NumericClass::Float { bits }) => {
                // FLOAT tops out near 3.4e38.
                if bits == 32 && precision - scale > MAX_PRECISION {
                    fail(format!(
                        "{} integer digit(s) exceed the range of {}",
                        precision - scale,
                        to
                    ))
                } else {
                    Ok(format!(
                        "{} fits in the range of {}; values are rounded to the nearest representable float",
                        from, to
                    ))
                }
            }
            (NumericClass::Float { .. }, _) => fail(
                "floating-point values cannot be stored exactly in an exact numeric type"
                    .to_owned(),
            ),
        }
    }
}

fn mantissa_bits(bits: u8) -> u32 {
    if bits == 32 {
        24
    } else {
        53
    }
}

#[derive(Debug, Clone, Copy)]
enum NumericClass {
    Integer { min: i128, max: i128, digits: u8 },
    Decimal { precision: u8, scale: u8 },
    Float { bits: u8 },
}

impl NumericClass {
    /// `None` for non-numeric types; `Some(Err)` for invalid decimals.
    fn of(t: &SourceType) -> Option<ConversionResult<NumericClass>> {
        let class = match t {
            SourceType::Decimal { precision, scale } => {
                return Some(validate_decimal(*precision, *scale).map(|_| {
                    NumericClass::Decimal {
                        precision: *precision,
                        scale: *scale,
                    }
                }))
            }
            SourceType::Primitive(kind) => match kind {
                PrimitiveKind::Int8 => int(i8::MIN.into(), i8::MAX.into(), 3),
                PrimitiveKind::Int16 => int(i16::MIN.into(), i16::MAX.into(), 5),
                PrimitiveKind::Int32 => int(i32::MIN.into(), i32::MAX.into(), 10),
                PrimitiveKind::Int64 => int(i64::MIN.into(), i64::MAX.into(), 19),
                PrimitiveKind::Int128 => int(i128::MIN, i128::MAX, 39),
                PrimitiveKind::UInt8 => int(0, u8::MAX.into(), 3),
                PrimitiveKind::UInt16 => int(0, u16::MAX.into(), 5),
                PrimitiveKind::UInt32 => int(0, u32::MAX.into(), 10),
                PrimitiveKind::UInt64 => int(0, u64::MAX.into(), 20),
                PrimitiveKind::Float32 => NumericClass::Float { bits: 32 },
                PrimitiveKind::Float64 => NumericClass::Float { bits: 64 },
                PrimitiveKind::Text | PrimitiveKind::Binary | PrimitiveKind::Boolean => {
                    return None
                }
            },
            _ => return None,
        };
        Some(Ok(class))
    }
}

fn int(min: i128, max: i128, digits: u8) -> NumericClass {
    NumericClass::Integer { min, max, digits }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;
    use crate::error::ErrorKind;

    fn conv() -> TypeConverter {
        TypeConverter::default()
    }

    fn int32() -> SourceType {
        PrimitiveKind::Int32.into()
    }

    #[test]
    fn info_for_plain_integer() {
        let info = conv().mapping_info(&int32()).unwrap();
        assert_eq!(info.source_type_name, "INTEGER");
        assert_eq!(info.interchange_type_name.as_deref(), Some("int32"));
        assert_eq!(info.target_type_name, "NUMBER(10,0)");
        assert!(!info.has_precision_loss);
        assert!(!info.requires_special_handling);
    }

    #[test]
    fn info_flags_unsigned_and_huge_as_lossy() {
        for kind in [PrimitiveKind::UInt8, PrimitiveKind::UInt64, PrimitiveKind::Int128] {
            let info = conv().mapping_info(&kind.into()).unwrap();
            assert!(info.has_precision_loss, "{:?}", kind);
            assert!(!info.requires_special_handling);
        }
    }

    #[test]
    fn info_flags_wide_decimal() {
        let info = conv().mapping_info(&SourceType::decimal(45, 5)).unwrap();
        assert_eq!(info.target_type_name, "NUMBER(38,0)");
        assert_eq!(info.interchange_type_name.as_deref(), Some("decimal128(38,0)"));
        assert!(info.has_precision_loss);
        assert!(info.requires_special_handling);
        assert!(info.notes.contains("Precision reduced from 45 to 38"));

        let narrow = conv().mapping_info(&SourceType::decimal(18, 3)).unwrap();
        assert!(!narrow.has_precision_loss);
        assert!(!narrow.requires_special_handling);
    }

    #[test]
    fn info_propagates_rejection() {
        let c = TypeConverter::new(ConverterConfig::rejecting_overflow());
        let err = c.mapping_info(&SourceType::decimal(45, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PrecisionOverflow);
    }

    #[test]
    fn info_for_nested_skips_interchange() {
        let info = conv()
            .mapping_info(&SourceType::list(SourceType::text()))
            .unwrap();
        assert_eq!(info.interchange_type_name, None);
        assert_eq!(info.target_type_name, "ARRAY");
        assert!(info.requires_special_handling);
        assert!(!info.has_precision_loss);
    }

    #[test]
    fn integer_widening_and_narrowing() {
        let c = conv();
        let int8: SourceType = PrimitiveKind::Int8.into();
        let int64: SourceType = PrimitiveKind::Int64.into();
        assert!(c.validate_numeric_range(&int8, &int64).is_ok());

        let err = c.validate_numeric_range(&int64, &int8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Incompatible);
        assert!(err.to_string().contains("narrowing integer conversion"));

        let u8_: SourceType = PrimitiveKind::UInt8.into();
        assert!(c.validate_numeric_range(&u8_, &PrimitiveKind::Int16.into()).is_ok());
        assert!(c.validate_numeric_range(&u8_, &int8).is_err());
    }

    #[test]
    fn integer_into_decimal_needs_digits() {
        let c = conv();
        assert!(c
            .validate_numeric_range(&int32(), &SourceType::decimal(10, 0))
            .is_ok());
        let err = c
            .validate_numeric_range(&int32(), &SourceType::decimal(10, 2))
            .unwrap_err();
        assert!(err.to_string().contains("decimal overflow"));
    }

    #[test]
    fn decimal_into_decimal() {
        let c = conv();
        assert!(c
            .validate_numeric_range(&SourceType::decimal(10, 2), &SourceType::decimal(12, 4))
            .is_ok());
        assert!(c
            .validate_numeric_range(&SourceType::decimal(10, 2), &SourceType::decimal(10, 4))
            .unwrap_err()
            .to_string()
            .contains("decimal overflow"));
        assert!(c
            .validate_numeric_range(&SourceType::decimal(10, 4), &SourceType::decimal(12, 2))
            .unwrap_err()
            .to_string()
            .contains("scale truncation"));
    }

    #[test]
    fn decimal_into_integer() {
        let c = conv();
        assert!(c
            .validate_numeric_range(&SourceType::decimal(9, 0), &int32())
            .is_ok());
        assert!(c
            .validate_numeric_range(&SourceType::decimal(10, 0), &int32())
            .is_err());
        assert!(c
            .validate_numeric_range(&SourceType::decimal(5, 1), &int32())
            .is_err());
        assert!(c
            .validate_numeric_range(&SourceType::decimal(38, 0), &PrimitiveKind::Int128.into())
            .is_ok());
    }

    #[test]
    fn float_rules() {
        let c = conv();
        let f32_: SourceType = PrimitiveKind::Float32.into();
        let f64_: SourceType = PrimitiveKind::Float64.into();
        assert!(c.validate_numeric_range(&f32_, &f64_).is_ok());
        assert!(c.validate_numeric_range(&f64_, &f32_).is_err());
        assert!(c.validate_numeric_range(&f64_, &int32()).is_err());
        assert!(c
            .validate_numeric_range(&int32(), &f64_)
            .unwrap()
            .contains("exactly representable"));
        assert!(c
            .validate_numeric_range(&PrimitiveKind::Int64.into(), &f64_)
            .unwrap()
            .contains("lose precision"));
    }

    #[test]
    fn non_numeric_is_rejected() {
        let err = conv()
            .validate_numeric_range(&SourceType::text(), &int32())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Incompatible);
        assert!(err.to_string().contains("VARCHAR is not numeric"));

        let err = conv()
            .validate_numeric_range(&SourceType::decimal(2, 5), &int32())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDecimal);
    }

    #[test]
    fn compatibility_of_scalars() {
        let c = conv();
        assert!(c.check_compatibility(&int32(), &int32()).unwrap().contains("identical"));
        assert!(c.check_compatibility(&int32(), &SourceType::text()).is_ok());
        assert!(c
            .check_compatibility(&SourceType::date(), &SourceType::timestamp(false))
            .is_ok());
        assert!(c
            .check_compatibility(&SourceType::timestamp(false), &SourceType::timestamp(true))
            .is_ok());
        assert!(c
            .check_compatibility(&SourceType::timestamp(true), &SourceType::timestamp(false))
            .is_err());
        assert!(c
            .check_compatibility(&SourceType::text(), &int32())
            .is_err());
    }

    #[test]
    fn compatibility_of_nested() {
        let c = conv();
        let narrow = SourceType::struct_of([("id", int32()), ("name", SourceType::text())]);
        let wide = SourceType::struct_of([
            ("name", SourceType::text()),
            ("id", PrimitiveKind::Int64.into()),
            ("extra", SourceType::date()),
        ]);
        assert!(c.check_compatibility(&narrow, &wide).is_ok());

        let err = c.check_compatibility(&wide, &narrow).unwrap_err();
        assert!(err.to_string().contains("field 'extra' is missing"));

        let shrunk = SourceType::struct_of([("id", PrimitiveKind::Int8.into())]);
        let only_id = SourceType::struct_of([("id", int32())]);
        let err = c.check_compatibility(&only_id, &shrunk).unwrap_err();
        assert!(err.to_string().contains("narrowing integer conversion"));

        assert!(c
            .check_compatibility(
                &SourceType::list(int32()),
                &SourceType::list(PrimitiveKind::Int64.into())
            )
            .is_ok());
        assert!(c
            .check_compatibility(&SourceType::list(int32()), &SourceType::text())
            .is_err());
    }

    #[test]
    fn compatibility_with_unions() {
        let c = conv();
        let u = SourceType::union(vec![PrimitiveKind::Int64.into(), SourceType::date()]);
        assert!(c.check_compatibility(&int32(), &u).unwrap().contains("via variant BIGINT"));
        assert!(c.check_compatibility(&SourceType::Primitive(PrimitiveKind::Boolean), &u).is_err());
        let small = SourceType::union(vec![int32(), SourceType::date()]);
        assert!(c.check_compatibility(&small, &u).is_ok());
    }
}
