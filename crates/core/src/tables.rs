//! Static primitive mapping tables.
//!
//! Every table is written out as literal rows and indexed lazily on first
//! use. No table is derived from another at load time, so the direct
//! (source → target) and pipelined (source → interchange → target) paths
//! are independent and the tests can check that they agree.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::descriptor::{InterchangeType, PrimitiveKind, ScalarKind};

/// Keyword of the parameterized numeric type in the target grammar.
pub const NUMBER_KEYWORD: &str = "NUMBER";

/// Prefix of the parameterized decimal type in the interchange grammar.
pub const DECIMAL128_PREFIX: &str = "decimal128";

// ── Literal rows ────────────────────────────────────────────────────

const TARGET_ROWS: [(ScalarKind, &str); 13] = [
    (ScalarKind::Int8, "NUMBER(3,0)"),
    (ScalarKind::Int16, "NUMBER(5,0)"),
    (ScalarKind::Int32, "NUMBER(10,0)"),
    (ScalarKind::Int64, "NUMBER(19,0)"),
    (ScalarKind::Float32, "FLOAT"),
    (ScalarKind::Float64, "DOUBLE"),
    (ScalarKind::Text, "VARCHAR"),
    (ScalarKind::Binary, "BINARY"),
    (ScalarKind::Boolean, "BOOLEAN"),
    (ScalarKind::Date, "DATE"),
    (ScalarKind::Time, "TIME"),
    (ScalarKind::Timestamp, "TIMESTAMP_NTZ"),
    (ScalarKind::TimestampTz, "TIMESTAMP_TZ"),
];

const INTERCHANGE_ROWS: [(ScalarKind, &str); 13] = [
    (ScalarKind::Int8, "int8"),
    (ScalarKind::Int16, "int16"),
    (ScalarKind::Int32, "int32"),
    (ScalarKind::Int64, "int64"),
    (ScalarKind::Float32, "float32"),
    (ScalarKind::Float64, "float64"),
    (ScalarKind::Text, "utf8"),
    (ScalarKind::Binary, "binary"),
    (ScalarKind::Boolean, "bool"),
    (ScalarKind::Date, "date32"),
    (ScalarKind::Time, "time64[us]"),
    (ScalarKind::Timestamp, "timestamp[us]"),
    (ScalarKind::TimestampTz, "timestamp[us, UTC]"),
];

const REVERSE_INTERCHANGE_ROWS: [(&str, ScalarKind); 13] = [
    ("int8", ScalarKind::Int8),
    ("int16", ScalarKind::Int16),
    ("int32", ScalarKind::Int32),
    ("int64", ScalarKind::Int64),
    ("float32", ScalarKind::Float32),
    ("float64", ScalarKind::Float64),
    ("utf8", ScalarKind::Text),
    ("binary", ScalarKind::Binary),
    ("bool", ScalarKind::Boolean),
    ("date32", ScalarKind::Date),
    ("time64[us]", ScalarKind::Time),
    ("timestamp[us]", ScalarKind::Timestamp),
    ("timestamp[us, UTC]", ScalarKind::TimestampTz),
];

// Integer rows are absent: `NUMBER(...)` always parses as a decimal.
const REVERSE_TARGET_ROWS: [(&str, ScalarKind); 9] = [
    ("FLOAT", ScalarKind::Float32),
    ("DOUBLE", ScalarKind::Float64),
    ("VARCHAR", ScalarKind::Text),
    ("BINARY", ScalarKind::Binary),
    ("BOOLEAN", ScalarKind::Boolean),
    ("DATE", ScalarKind::Date),
    ("TIME", ScalarKind::Time),
    ("TIMESTAMP_NTZ", ScalarKind::Timestamp),
    ("TIMESTAMP_TZ", ScalarKind::TimestampTz),
];

const INTERCHANGE_TARGET_ROWS: [(&str, &str); 17] = [
    ("int8", "NUMBER(3,0)"),
    ("int16", "NUMBER(5,0)"),
    ("int32", "NUMBER(10,0)"),
    ("int64", "NUMBER(19,0)"),
    ("uint8", "NUMBER(3,0)"),
    ("uint16", "NUMBER(5,0)"),
    ("uint32", "NUMBER(10,0)"),
    ("uint64", "NUMBER(20,0)"),
    ("float32", "FLOAT"),
    ("float64", "DOUBLE"),
    ("utf8", "VARCHAR"),
    ("binary", "BINARY"),
    ("bool", "BOOLEAN"),
    ("date32", "DATE"),
    ("time64[us]", "TIME"),
    ("timestamp[us]", "TIMESTAMP_NTZ"),
    ("timestamp[us, UTC]", "TIMESTAMP_TZ"),
];

/// An integer kind with no exact target counterpart, stored in the
/// narrowest `NUMBER` that holds its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidenedInteger {
    pub kind: PrimitiveKind,
    pub target: &'static str,
    pub interchange: InterchangeType,
    /// Why the target cannot represent the kind exactly.
    pub caveat: &'static str,
}

const WIDENED_ROWS: [WidenedInteger; 5] = [
    WidenedInteger {
        kind: PrimitiveKind::UInt8,
        target: "NUMBER(3,0)",
        interchange: InterchangeType::Named("uint8"),
        caveat: "target has no unsigned integer type; the non-negative constraint is lost",
    },
    WidenedInteger {
        kind: PrimitiveKind::UInt16,
        target: "NUMBER(5,0)",
        interchange: InterchangeType::Named("uint16"),
        caveat: "target has no unsigned integer type; the non-negative constraint is lost",
    },
    WidenedInteger {
        kind: PrimitiveKind::UInt32,
        target: "NUMBER(10,0)",
        interchange: InterchangeType::Named("uint32"),
        caveat: "target has no unsigned integer type; the non-negative constraint is lost",
    },
    WidenedInteger {
        kind: PrimitiveKind::UInt64,
        target: "NUMBER(20,0)",
        interchange: InterchangeType::Named("uint64"),
        caveat: "target has no unsigned integer type; the non-negative constraint is lost",
    },
    WidenedInteger {
        kind: PrimitiveKind::Int128,
        target: "NUMBER(38,0)",
        interchange: InterchangeType::Decimal128 {
            precision: 38,
            scale: 0,
        },
        caveat: "128-bit range needs 39 digits; magnitudes beyond 38 digits cannot be stored",
    },
];

const REVERSE_WIDENED_INTERCHANGE_ROWS: [(&str, PrimitiveKind); 4] = [
    ("uint8", PrimitiveKind::UInt8),
    ("uint16", PrimitiveKind::UInt16),
    ("uint32", PrimitiveKind::UInt32),
    ("uint64", PrimitiveKind::UInt64),
];

// ── Indexed lookups ─────────────────────────────────────────────────

fn target_index() -> &'static HashMap<ScalarKind, &'static str> {
    static INDEX: OnceLock<HashMap<ScalarKind, &'static str>> = OnceLock::new();
    INDEX.get_or_init(|| TARGET_ROWS.into_iter().collect())
}

fn interchange_index() -> &'static HashMap<ScalarKind, &'static str> {
    static INDEX: OnceLock<HashMap<ScalarKind, &'static str>> = OnceLock::new();
    INDEX.get_or_init(|| INTERCHANGE_ROWS.into_iter().collect())
}

fn reverse_interchange_index() -> &'static HashMap<&'static str, ScalarKind> {
    static INDEX: OnceLock<HashMap<&'static str, ScalarKind>> = OnceLock::new();
    INDEX.get_or_init(|| REVERSE_INTERCHANGE_ROWS.into_iter().collect())
}

fn reverse_target_index() -> &'static HashMap<&'static str, ScalarKind> {
    static INDEX: OnceLock<HashMap<&'static str, ScalarKind>> = OnceLock::new();
    INDEX.get_or_init(|| REVERSE_TARGET_ROWS.into_iter().collect())
}

fn interchange_target_index() -> &'static HashMap<&'static str, &'static str> {
    static INDEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    INDEX.get_or_init(|| INTERCHANGE_TARGET_ROWS.into_iter().collect())
}

/// Target grammar string for a primitive table row.
pub fn target_for(kind: ScalarKind) -> Option<&'static str> {
    target_index().get(&kind).copied()
}

/// Interchange name for a primitive table row.
pub fn interchange_for(kind: ScalarKind) -> Option<&'static str> {
    interchange_index().get(&kind).copied()
}

/// Exact-match reverse lookup of a bare target keyword.
pub fn scalar_for_target(text: &str) -> Option<ScalarKind> {
    reverse_target_index().get(text).copied()
}

/// Exact-match reverse lookup of an interchange name.
pub fn scalar_for_interchange(name: &str) -> Option<ScalarKind> {
    reverse_interchange_index().get(name).copied()
}

/// Target grammar string for a non-decimal interchange name.
pub fn target_for_interchange(name: &str) -> Option<&'static str> {
    interchange_target_index().get(name).copied()
}

pub fn widened_for(kind: PrimitiveKind) -> Option<&'static WidenedInteger> {
    WIDENED_ROWS.iter().find(|row| row.kind == kind)
}

pub fn widened_for_interchange(name: &str) -> Option<PrimitiveKind> {
    REVERSE_WIDENED_INTERCHANGE_ROWS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, kind)| *kind)
}

/// Every primitive table row as `(kind, target, interchange)`.
pub fn primitive_rows() -> impl Iterator<Item = (ScalarKind, &'static str, &'static str)> {
    TARGET_ROWS
        .iter()
        .zip(INTERCHANGE_ROWS.iter())
        .map(|((kind, target), (_, interchange))| (*kind, *target, *interchange))
}
