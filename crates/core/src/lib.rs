//! typebridge-core: type conversion between an analytic engine, a columnar
//! interchange format, and a cloud warehouse.
//!
//! Two conversion paths exist for every supported source type:
//!
//! - direct: [`to_target()`]
//! - pipelined: [`to_interchange()`] then [`interchange_to_target()`]
//!
//! Both produce the same target string. Reverse conversions
//! ([`target_to_source()`], [`interchange_to_source()`]) are best effort:
//! integers come back as zero-scale decimals and nested types come back
//! with default element types.
//!
//! The free functions use a default [`TypeConverter`], which clamps wide
//! decimals. Build a converter from a [`ConverterConfig`] to reject them
//! instead.

pub mod config;
pub mod convert;
pub mod decimal;
pub mod descriptor;
pub mod error;
pub mod introspect;
pub mod lexer;
pub mod nested;
pub mod parser;
pub mod tables;

mod grammar;

// ── Convenience re-exports: key types ────────────────────────────────

pub use config::{ConverterConfig, DecimalOverflowPolicy};
pub use convert::TypeConverter;
pub use decimal::{adjust_decimal, DecimalAdjustment, MAX_PRECISION};
pub use descriptor::{
    InterchangeType, PrimitiveKind, ScalarKind, SourceType, StructField, TemporalKind,
};
pub use error::{ConversionError, ConversionResult, ErrorKind, Stage};
pub use introspect::TypeMappingInfo;
pub use nested::flattening_strategy;

// ── Convenience entry points on the default converter ────────────────

pub fn to_target(source: &SourceType) -> ConversionResult<String> {
    TypeConverter::default().to_target(source)
}

pub fn to_interchange(source: &SourceType) -> ConversionResult<InterchangeType> {
    TypeConverter::default().to_interchange(source)
}

pub fn interchange_to_target(name: &str) -> ConversionResult<String> {
    TypeConverter::default().interchange_to_target(name)
}

pub fn target_to_source(text: &str) -> ConversionResult<SourceType> {
    TypeConverter::default().target_to_source(text)
}

pub fn interchange_to_source(name: &str) -> ConversionResult<SourceType> {
    TypeConverter::default().interchange_to_source(name)
}

pub fn mapping_info(source: &SourceType) -> ConversionResult<TypeMappingInfo> {
    TypeConverter::default().mapping_info(source)
}

pub fn check_compatibility(from: &SourceType, to: &SourceType) -> ConversionResult<String> {
    TypeConverter::default().check_compatibility(from, to)
}

pub fn validate_numeric_range(from: &SourceType, to: &SourceType) -> ConversionResult<String> {
    TypeConverter::default().validate_numeric_range(from, to)
}
