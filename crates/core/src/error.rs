use serde::{Deserialize, Serialize};

/// The conversion stage whose precision ceiling was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Interchange,
    Target,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Interchange => write!(f, "interchange"),
            Stage::Target => write!(f, "target"),
        }
    }
}

/// All errors returned by the conversion engine.
///
/// Every failure is local to the input that produced it; callers may retry
/// with adjusted parameters or fall back to a default type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The source type has no equivalent in the requested type system.
    #[error("Unsupported source type {source_type}: {reason}")]
    UnsupportedSourceType { source_type: String, reason: String },

    /// A target grammar string matched no keyword or parameterized pattern.
    #[error("Unsupported target type: {text}")]
    UnsupportedTargetType { text: String },

    /// An interchange type name matched no known name or decimal pattern.
    #[error("Unsupported interchange type: {name}")]
    UnsupportedInterchangeType { name: String },

    /// Decimal precision exceeds the 38-digit ceiling and the caller did
    /// not ask for automatic adjustment.
    #[error("Decimal precision exceeds {stage} limit: DECIMAL({precision},{scale}) is wider than {limit} digits")]
    PrecisionOverflow {
        precision: u8,
        scale: u8,
        limit: u8,
        stage: Stage,
    },

    /// Parenthesized parameters are not valid integers, are missing a
    /// closing parenthesis, or have the wrong arity.
    #[error("Malformed parameter list in '{text}': {detail}")]
    MalformedParameterList { text: String, detail: String },

    /// Precision is zero or scale exceeds precision.
    #[error("Invalid decimal parameters ({precision},{scale}): precision must be at least 1 and scale must not exceed precision")]
    InvalidDecimal { precision: u8, scale: u8 },

    /// A textual source type descriptor could not be parsed.
    #[error("Malformed source type '{text}': {detail}")]
    MalformedSourceType { text: String, detail: String },

    /// An advisory compatibility or range check failed.
    #[error("Incompatible conversion from {from} to {to}: {reason}")]
    Incompatible {
        from: String,
        to: String,
        reason: String,
    },
}

/// Discriminant of [`ConversionError`] for callers that branch on the
/// failure class without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedSourceType,
    UnsupportedTargetType,
    UnsupportedInterchangeType,
    PrecisionOverflow,
    MalformedParameterList,
    InvalidDecimal,
    MalformedSourceType,
    Incompatible,
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::UnsupportedSourceType { .. } => ErrorKind::UnsupportedSourceType,
            ConversionError::UnsupportedTargetType { .. } => ErrorKind::UnsupportedTargetType,
            ConversionError::UnsupportedInterchangeType { .. } => {
                ErrorKind::UnsupportedInterchangeType
            }
            ConversionError::PrecisionOverflow { .. } => ErrorKind::PrecisionOverflow,
            ConversionError::MalformedParameterList { .. } => ErrorKind::MalformedParameterList,
            ConversionError::InvalidDecimal { .. } => ErrorKind::InvalidDecimal,
            ConversionError::MalformedSourceType { .. } => ErrorKind::MalformedSourceType,
            ConversionError::Incompatible { .. } => ErrorKind::Incompatible,
        }
    }

    pub(crate) fn unsupported_source(
        source_type: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConversionError::UnsupportedSourceType {
            source_type: source_type.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_params(text: &str, detail: impl Into<String>) -> Self {
        ConversionError::MalformedParameterList {
            text: text.to_owned(),
            detail: detail.into(),
        }
    }

    pub(crate) fn incompatible(
        from: impl ToString,
        to: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConversionError::Incompatible {
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.into(),
        }
    }

    /// Serialize to a `{ "kind", "message" }` object for machine-readable output.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": format!("{:?}", self.kind()),
            "message": self.to_string(),
        })
    }
}

/// Result of every public conversion operation.
pub type ConversionResult<T> = Result<T, ConversionError>;
