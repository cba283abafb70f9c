//! Conversion orchestration between the source, interchange, and target
//! type systems.
//!
//! [`TypeConverter::to_target`] is the direct path. The pipelined path,
//! [`TypeConverter::to_interchange`] followed by
//! [`TypeConverter::interchange_to_target`], must produce the same strings
//! for every primitive kind. Every path that produces a decimal, forward
//! or reverse, consults the same overflow policy.

use crate::config::{ConverterConfig, DecimalOverflowPolicy};
use crate::decimal::{adjust_decimal, validate_decimal, MAX_PRECISION};
use crate::descriptor::{InterchangeType, SourceType};
use crate::error::{ConversionError, ConversionResult, Stage};
use crate::grammar::parse_params;
use crate::nested;
use crate::tables::{self, DECIMAL128_PREFIX, NUMBER_KEYWORD};

/// Stateless conversion engine parameterized by [`ConverterConfig`].
///
/// Cheap to construct and safe to share across threads; the mapping
/// tables it reads are process-wide and immutable.
#[derive(Debug, Clone, Default)]
pub struct TypeConverter {
    config: ConverterConfig,
}

impl TypeConverter {
    pub fn new(config: ConverterConfig) -> Self {
        TypeConverter { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    // ── Forward ─────────────────────────────────────────────────────

    /// Convert a source type to its interchange equivalent.
    ///
    /// Nested types have no interchange form.
    pub fn to_interchange(&self, source: &SourceType) -> ConversionResult<InterchangeType> {
        let result = match source {
            SourceType::Decimal { precision, scale } => {
                let (precision, scale) =
                    self.resolve_decimal(*precision, *scale, Stage::Interchange)?;
                Ok(InterchangeType::Decimal128 { precision, scale })
            }
            SourceType::Primitive(kind) => match source.scalar_kind() {
                Some(scalar) => named_interchange(source, tables::interchange_for(scalar)),
                None => tables::widened_for(*kind)
                    .map(|row| row.interchange)
                    .ok_or_else(|| {
                        ConversionError::unsupported_source(
                            source,
                            "not supported for interchange conversion",
                        )
                    }),
            },
            SourceType::Temporal { .. } => match source.scalar_kind() {
                Some(scalar) => named_interchange(source, tables::interchange_for(scalar)),
                None => Err(ConversionError::unsupported_source(
                    source,
                    "no zoned equivalent for this temporal kind",
                )),
            },
            SourceType::List(_)
            | SourceType::Struct(_)
            | SourceType::Map { .. }
            | SourceType::Union(_) => Err(ConversionError::unsupported_source(
                source,
                "nested types are not supported for interchange conversion",
            )),
        }?;
        log::debug!("to_interchange: {} -> {}", source, result);
        Ok(result)
    }

    /// Convert an interchange type name to a target grammar string.
    pub fn interchange_to_target(&self, name: &str) -> ConversionResult<String> {
        if let Some(target) = tables::target_for_interchange(name) {
            return Ok(target.to_owned());
        }
        if let Some(rest) = name.strip_prefix(DECIMAL128_PREFIX) {
            if let Some(params) = parse_params(name, rest) {
                let (precision, scale) = match params?.as_slice() {
                    [p, s] => (*p, *s),
                    other => {
                        return Err(ConversionError::malformed_params(
                            name,
                            format!("expected two parameters, found {}", other.len()),
                        ))
                    }
                };
                let (precision, scale) =
                    self.resolve_decimal(precision, scale, Stage::Interchange)?;
                return Ok(number(precision, scale));
            }
        }
        Err(ConversionError::UnsupportedInterchangeType {
            name: name.to_owned(),
        })
    }

    /// Convert a source type directly to a target grammar string.
    pub fn to_target(&self, source: &SourceType) -> ConversionResult<String> {
        let result = match source {
            SourceType::Decimal { precision, scale } => {
                let (precision, scale) =
                    self.resolve_decimal(*precision, *scale, Stage::Target)?;
                Ok(number(precision, scale))
            }
            SourceType::List(_)
            | SourceType::Struct(_)
            | SourceType::Map { .. }
            | SourceType::Union(_) => nested::flatten(source)
                .map(str::to_owned)
                .ok_or_else(|| ConversionError::unsupported_source(source, "unknown nested kind")),
            SourceType::Primitive(kind) => match source.scalar_kind() {
                Some(scalar) => primitive_target(source, tables::target_for(scalar)),
                None => tables::widened_for(*kind)
                    .map(|row| row.target.to_owned())
                    .ok_or_else(|| ConversionError::unsupported_source(source, "no target kind")),
            },
            SourceType::Temporal { .. } => match source.scalar_kind() {
                Some(scalar) => primitive_target(source, tables::target_for(scalar)),
                None => Err(ConversionError::unsupported_source(
                    source,
                    "no zoned equivalent for this temporal kind",
                )),
            },
        }?;
        log::debug!("to_target: {} -> {}", source, result);
        Ok(result)
    }

    // ── Reverse ─────────────────────────────────────────────────────

    /// Convert a target grammar string back to a source type.
    ///
    /// Integers come back as decimals (`NUMBER(10,0)` is `DECIMAL(10,0)`)
    /// and nested keywords come back with default element types.
    pub fn target_to_source(&self, text: &str) -> ConversionResult<SourceType> {
        let text = text.trim();

        if let Some(rest) = text.strip_prefix(NUMBER_KEYWORD) {
            if rest.is_empty() {
                return Ok(SourceType::decimal(MAX_PRECISION, 0));
            }
            if let Some(params) = parse_params(text, rest) {
                let (precision, scale) = match params?.as_slice() {
                    [p] => (*p, 0),
                    [p, s] => (*p, *s),
                    other => {
                        return Err(ConversionError::malformed_params(
                            text,
                            format!("expected one or two parameters, found {}", other.len()),
                        ))
                    }
                };
                let (precision, scale) = self.resolve_decimal(precision, scale, Stage::Target)?;
                return Ok(SourceType::decimal(precision, scale));
            }
        }

        if let Some(scalar) = tables::scalar_for_target(text) {
            return Ok(scalar.to_source());
        }

        if let Some(source) = nested::unflatten(text) {
            log::debug!(
                "target_to_source: {} carries no element types; using {}",
                text,
                source
            );
            return Ok(source);
        }

        Err(ConversionError::UnsupportedTargetType {
            text: text.to_owned(),
        })
    }

    /// Convert an interchange type name back to a source type.
    pub fn interchange_to_source(&self, name: &str) -> ConversionResult<SourceType> {
        if let Some(scalar) = tables::scalar_for_interchange(name) {
            return Ok(scalar.to_source());
        }
        if let Some(kind) = tables::widened_for_interchange(name) {
            return Ok(kind.into());
        }
        if let Some(rest) = name.strip_prefix(DECIMAL128_PREFIX) {
            if let Some(params) = parse_params(name, rest) {
                return match params?.as_slice() {
                    [p, s] => {
                        let (p, s) = self.resolve_decimal(*p, *s, Stage::Interchange)?;
                        Ok(SourceType::decimal(p, s))
                    }
                    other => Err(ConversionError::malformed_params(
                        name,
                        format!("expected two parameters, found {}", other.len()),
                    )),
                };
            }
        }
        Err(ConversionError::UnsupportedInterchangeType {
            name: name.to_owned(),
        })
    }

    // ── Decimal policy ──────────────────────────────────────────────

    /// Validate a decimal and fit it under the ceiling per the configured
    /// overflow policy.
    pub(crate) fn resolve_decimal(
        &self,
        precision: u8,
        scale: u8,
        stage: Stage,
    ) -> ConversionResult<(u8, u8)> {
        validate_decimal(precision, scale)?;
        if precision <= MAX_PRECISION {
            return Ok((precision, scale));
        }
        match self.config.decimal_overflow {
            DecimalOverflowPolicy::Reject => Err(ConversionError::PrecisionOverflow {
                precision,
                scale,
                limit: MAX_PRECISION,
                stage,
            }),
            DecimalOverflowPolicy::Adjust => {
                let adjustment = adjust_decimal(precision, scale);
                if let Some(warning) = &adjustment.warning {
                    log::warn!("DECIMAL({},{}): {}", precision, scale, warning);
                }
                Ok((adjustment.adjusted_precision, adjustment.adjusted_scale))
            }
        }
    }
}

fn number(precision: u8, scale: u8) -> String {
    format!("{}({},{})", NUMBER_KEYWORD, precision, scale)
}

fn named_interchange(
    source: &SourceType,
    name: Option<&'static str>,
) -> ConversionResult<InterchangeType> {
    name.map(InterchangeType::Named).ok_or_else(|| {
        ConversionError::unsupported_source(source, "not supported for interchange conversion")
    })
}

fn primitive_target(source: &SourceType, target: Option<&'static str>) -> ConversionResult<String> {
    target
        .map(str::to_owned)
        .ok_or_else(|| ConversionError::unsupported_source(source, "no target kind"))
}
