//! Nested type flattening.
//!
//! Composite source types map to fixed target keywords that carry no
//! element type. The reverse direction cannot recover what was dropped:
//! it yields default element types (text) and an empty struct. Round trips
//! through the target are therefore lossy for every nested kind.

use std::collections::BTreeMap;

use crate::descriptor::{SourceType, StructField};
use crate::error::{ConversionError, ConversionResult};

pub const ARRAY_KEYWORD: &str = "ARRAY";
pub const OBJECT_KEYWORD: &str = "OBJECT";
pub const MAP_KEYWORD: &str = "MAP";
pub const VARIANT_KEYWORD: &str = "VARIANT";

/// Target keyword for a nested type; `None` for everything else.
///
/// Only the outermost kind matters: a list of lists is still `ARRAY`.
pub fn flatten(source: &SourceType) -> Option<&'static str> {
    match source {
        SourceType::List(_) => Some(ARRAY_KEYWORD),
        SourceType::Struct(_) => Some(OBJECT_KEYWORD),
        SourceType::Map { .. } => Some(MAP_KEYWORD),
        SourceType::Union(_) => Some(VARIANT_KEYWORD),
        SourceType::Primitive(_) | SourceType::Decimal { .. } | SourceType::Temporal { .. } => {
            None
        }
    }
}

/// Default source type for a nested target keyword.
pub fn unflatten(keyword: &str) -> Option<SourceType> {
    match keyword {
        ARRAY_KEYWORD => Some(SourceType::list(SourceType::text())),
        OBJECT_KEYWORD => Some(SourceType::Struct(Vec::new())),
        MAP_KEYWORD => Some(SourceType::map(SourceType::text(), SourceType::text())),
        VARIANT_KEYWORD => Some(SourceType::text()),
        _ => None,
    }
}

/// By-name view of struct fields. Later definitions of a repeated name win.
pub fn fields_by_name(fields: &[StructField]) -> BTreeMap<&str, &SourceType> {
    let mut by_name = BTreeMap::new();
    for field in fields {
        if by_name
            .insert(field.name.as_str(), &field.field_type)
            .is_some()
        {
            log::warn!(
                "struct field '{}' is defined more than once; the last definition is used",
                field.name
            );
        }
    }
    by_name
}

/// Describe how a nested type is stored in the target and what the
/// reverse mapping will give back.
pub fn flattening_strategy(source: &SourceType) -> ConversionResult<String> {
    let keyword = flatten(source).ok_or_else(|| {
        ConversionError::unsupported_source(source, "flattening applies only to nested types")
    })?;
    let recovered = unflatten(keyword)
        .map(|t| t.to_string())
        .unwrap_or_default();

    let body = match source {
        SourceType::List(elem) => format!(
            "elements of type {} are stored as untyped semi-structured values",
            elem
        ),
        SourceType::Struct(fields) => {
            let by_name = fields_by_name(fields);
            let names: Vec<&str> = by_name.keys().copied().collect();
            format!(
                "{} field(s) ({}) are stored as key/value pairs",
                names.len(),
                names.join(", ")
            )
        }
        SourceType::Map { key, value } => format!(
            "entries of {} to {} are stored as key/value pairs",
            key, value
        ),
        SourceType::Union(variants) => format!(
            "{} alternative(s) are stored as a single semi-structured value",
            variants.len()
        ),
        SourceType::Primitive(_) | SourceType::Decimal { .. } | SourceType::Temporal { .. } => {
            String::new()
        }
    };

    Ok(format!(
        "{} -> {}: {}; nesting depth {}; reads back as {}",
        source,
        keyword,
        body,
        source.depth(),
        recovered
    ))
}
