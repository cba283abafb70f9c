//! Type descriptors for the three type systems.
//!
//! [`SourceType`] is the engine-side logical type of a result column. It is
//! owned by the caller and never mutated by the engine; every conversion
//! builds new values. [`InterchangeType`] is the columnar intermediate used
//! between the two conversion hops. Target types are plain grammar strings
//! (`NUMBER(10,0)`, `VARCHAR`, `ARRAY`) and have no descriptor of their own.

use serde::{Deserialize, Serialize};
use std::fmt;

// ──────────────────────────────────────────────
// Source kinds
// ──────────────────────────────────────────────

/// Non-parameterized, non-temporal engine types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Text,
    Binary,
    Boolean,
}

impl PrimitiveKind {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Int128
                | PrimitiveKind::UInt8
                | PrimitiveKind::UInt16
                | PrimitiveKind::UInt32
                | PrimitiveKind::UInt64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            PrimitiveKind::UInt8
                | PrimitiveKind::UInt16
                | PrimitiveKind::UInt32
                | PrimitiveKind::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    /// The engine's SQL spelling of this kind.
    pub fn sql_name(self) -> &'static str {
        match self {
            PrimitiveKind::Int8 => "TINYINT",
            PrimitiveKind::Int16 => "SMALLINT",
            PrimitiveKind::Int32 => "INTEGER",
            PrimitiveKind::Int64 => "BIGINT",
            PrimitiveKind::Int128 => "HUGEINT",
            PrimitiveKind::UInt8 => "UTINYINT",
            PrimitiveKind::UInt16 => "USMALLINT",
            PrimitiveKind::UInt32 => "UINTEGER",
            PrimitiveKind::UInt64 => "UBIGINT",
            PrimitiveKind::Float32 => "FLOAT",
            PrimitiveKind::Float64 => "DOUBLE",
            PrimitiveKind::Text => "VARCHAR",
            PrimitiveKind::Binary => "BLOB",
            PrimitiveKind::Boolean => "BOOLEAN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    Date,
    Time,
    Timestamp,
}

impl TemporalKind {
    pub fn sql_name(self) -> &'static str {
        match self {
            TemporalKind::Date => "DATE",
            TemporalKind::Time => "TIME",
            TemporalKind::Timestamp => "TIMESTAMP",
        }
    }
}

/// A named member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: SourceType,
}

impl StructField {
    pub fn new(name: impl Into<String>, field_type: SourceType) -> Self {
        StructField {
            name: name.into(),
            field_type,
        }
    }
}

/// The engine-side logical type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Primitive(PrimitiveKind),
    Decimal {
        precision: u8,
        scale: u8,
    },
    Temporal {
        kind: TemporalKind,
        has_timezone: bool,
    },
    List(Box<SourceType>),
    /// Fields in declaration order. Names are not required to be unique;
    /// consumers that need a by-name view treat the last definition as
    /// authoritative.
    Struct(Vec<StructField>),
    Map {
        key: Box<SourceType>,
        value: Box<SourceType>,
    },
    Union(Vec<SourceType>),
}

impl From<PrimitiveKind> for SourceType {
    fn from(kind: PrimitiveKind) -> Self {
        SourceType::Primitive(kind)
    }
}

impl SourceType {
    pub fn text() -> Self {
        SourceType::Primitive(PrimitiveKind::Text)
    }

    pub fn decimal(precision: u8, scale: u8) -> Self {
        SourceType::Decimal { precision, scale }
    }

    pub fn date() -> Self {
        SourceType::Temporal {
            kind: TemporalKind::Date,
            has_timezone: false,
        }
    }

    pub fn time() -> Self {
        SourceType::Temporal {
            kind: TemporalKind::Time,
            has_timezone: false,
        }
    }

    pub fn timestamp(has_timezone: bool) -> Self {
        SourceType::Temporal {
            kind: TemporalKind::Timestamp,
            has_timezone,
        }
    }

    pub fn list(element: SourceType) -> Self {
        SourceType::List(Box::new(element))
    }

    pub fn struct_of<I, N>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, SourceType)>,
        N: Into<String>,
    {
        SourceType::Struct(
            fields
                .into_iter()
                .map(|(name, t)| StructField::new(name, t))
                .collect(),
        )
    }

    pub fn map(key: SourceType, value: SourceType) -> Self {
        SourceType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn union(variants: Vec<SourceType>) -> Self {
        SourceType::Union(variants)
    }

    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            SourceType::List(_)
                | SourceType::Struct(_)
                | SourceType::Map { .. }
                | SourceType::Union(_)
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, SourceType::Primitive(k) if k.is_integer())
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            SourceType::Primitive(k) => k.is_integer() || k.is_float(),
            SourceType::Decimal { .. } => true,
            _ => false,
        }
    }

    /// Key into the primitive mapping table, if this type has a row there.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        let kind = match self {
            SourceType::Primitive(PrimitiveKind::Int8) => ScalarKind::Int8,
            SourceType::Primitive(PrimitiveKind::Int16) => ScalarKind::Int16,
            SourceType::Primitive(PrimitiveKind::Int32) => ScalarKind::Int32,
            SourceType::Primitive(PrimitiveKind::Int64) => ScalarKind::Int64,
            SourceType::Primitive(PrimitiveKind::Float32) => ScalarKind::Float32,
            SourceType::Primitive(PrimitiveKind::Float64) => ScalarKind::Float64,
            SourceType::Primitive(PrimitiveKind::Text) => ScalarKind::Text,
            SourceType::Primitive(PrimitiveKind::Binary) => ScalarKind::Binary,
            SourceType::Primitive(PrimitiveKind::Boolean) => ScalarKind::Boolean,
            SourceType::Temporal {
                kind: TemporalKind::Date,
                has_timezone: false,
            } => ScalarKind::Date,
            SourceType::Temporal {
                kind: TemporalKind::Time,
                has_timezone: false,
            } => ScalarKind::Time,
            SourceType::Temporal {
                kind: TemporalKind::Timestamp,
                has_timezone,
            } => {
                if *has_timezone {
                    ScalarKind::TimestampTz
                } else {
                    ScalarKind::Timestamp
                }
            }
            _ => return None,
        };
        Some(kind)
    }

    /// Number of nested levels; scalars and decimals are depth 0.
    pub fn depth(&self) -> usize {
        match self {
            SourceType::List(elem) => 1 + elem.depth(),
            SourceType::Struct(fields) => {
                1 + fields
                    .iter()
                    .map(|f| f.field_type.depth())
                    .max()
                    .unwrap_or(0)
            }
            SourceType::Map { key, value } => 1 + key.depth().max(value.depth()),
            SourceType::Union(variants) => {
                1 + variants.iter().map(SourceType::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Primitive(kind) => write!(f, "{}", kind.sql_name()),
            SourceType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({},{})", precision, scale)
            }
            SourceType::Temporal { kind, has_timezone } => {
                write!(f, "{}", kind.sql_name())?;
                if *has_timezone {
                    write!(f, " WITH TIME ZONE")?;
                }
                Ok(())
            }
            SourceType::List(elem) => write!(f, "{}[]", elem),
            SourceType::Struct(fields) => {
                write!(f, "STRUCT(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_identifier(f, &field.name)?;
                    write!(f, " {}", field.field_type)?;
                }
                write!(f, ")")
            }
            SourceType::Map { key, value } => write!(f, "MAP({}, {})", key, value),
            SourceType::Union(variants) => {
                write!(f, "UNION(")?;
                for (i, v) in variants.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Field names that are not plain identifiers are double-quoted, with
/// embedded quotes doubled.
fn write_identifier(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        write!(f, "{}", name)
    } else {
        write!(f, "\"{}\"", name.replace('"', "\"\""))
    }
}

// ──────────────────────────────────────────────
// Primitive table key
// ──────────────────────────────────────────────

/// The thirteen source kinds that have a row in the primitive mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Binary,
    Boolean,
    Date,
    Time,
    Timestamp,
    TimestampTz,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 13] = [
        ScalarKind::Int8,
        ScalarKind::Int16,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Float32,
        ScalarKind::Float64,
        ScalarKind::Text,
        ScalarKind::Binary,
        ScalarKind::Boolean,
        ScalarKind::Date,
        ScalarKind::Time,
        ScalarKind::Timestamp,
        ScalarKind::TimestampTz,
    ];

    pub fn to_source(self) -> SourceType {
        match self {
            ScalarKind::Int8 => PrimitiveKind::Int8.into(),
            ScalarKind::Int16 => PrimitiveKind::Int16.into(),
            ScalarKind::Int32 => PrimitiveKind::Int32.into(),
            ScalarKind::Int64 => PrimitiveKind::Int64.into(),
            ScalarKind::Float32 => PrimitiveKind::Float32.into(),
            ScalarKind::Float64 => PrimitiveKind::Float64.into(),
            ScalarKind::Text => PrimitiveKind::Text.into(),
            ScalarKind::Binary => PrimitiveKind::Binary.into(),
            ScalarKind::Boolean => PrimitiveKind::Boolean.into(),
            ScalarKind::Date => SourceType::date(),
            ScalarKind::Time => SourceType::time(),
            ScalarKind::Timestamp => SourceType::timestamp(false),
            ScalarKind::TimestampTz => SourceType::timestamp(true),
        }
    }
}

// ──────────────────────────────────────────────
// Interchange
// ──────────────────────────────────────────────

/// Columnar intermediate type between the source and target hops.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterchangeType {
    /// A fixed type name such as `int32` or `timestamp[us, UTC]`.
    Named(&'static str),
    Decimal128 { precision: u8, scale: u8 },
}

impl fmt::Display for InterchangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeType::Named(name) => write!(f, "{}", name),
            InterchangeType::Decimal128 { precision, scale } => {
                write!(f, "decimal128({},{})", precision, scale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_engine_spelling() {
        let t = SourceType::struct_of([
            ("name", SourceType::text()),
            ("age", PrimitiveKind::Int32.into()),
        ]);
        assert_eq!(t.to_string(), "STRUCT(name VARCHAR, age INTEGER)");
        assert_eq!(
            SourceType::list(SourceType::list(PrimitiveKind::Int32.into())).to_string(),
            "INTEGER[][]"
        );
        assert_eq!(
            SourceType::timestamp(true).to_string(),
            "TIMESTAMP WITH TIME ZONE"
        );
        assert_eq!(SourceType::decimal(18, 3).to_string(), "DECIMAL(18,3)");
    }

    #[test]
    fn display_quotes_irregular_field_names() {
        let t = SourceType::struct_of([("first name", SourceType::text())]);
        assert_eq!(t.to_string(), "STRUCT(\"first name\" VARCHAR)");
    }

    #[test]
    fn scalar_kind_covers_every_table_row() {
        for kind in ScalarKind::ALL {
            assert_eq!(kind.to_source().scalar_kind(), Some(kind));
        }
        assert_eq!(SourceType::decimal(10, 2).scalar_kind(), None);
        assert_eq!(SourceType::Primitive(PrimitiveKind::UInt8).scalar_kind(), None);
        assert_eq!(
            SourceType::Temporal {
                kind: TemporalKind::Time,
                has_timezone: true
            }
            .scalar_kind(),
            None
        );
    }

    #[test]
    fn depth_counts_nesting_levels() {
        let inner = SourceType::list(PrimitiveKind::Int32.into());
        assert_eq!(SourceType::text().depth(), 0);
        assert_eq!(inner.depth(), 1);
        assert_eq!(SourceType::list(inner).depth(), 2);
        assert_eq!(SourceType::Struct(vec![]).depth(), 1);
    }

    #[test]
    fn serde_shape_is_tagged_by_kind() {
        let t = SourceType::decimal(18, 3);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v, serde_json::json!({ "decimal": { "precision": 18, "scale": 3 } }));
        let back: SourceType = serde_json::from_value(v).unwrap();
        assert_eq!(back, t);
    }
}
