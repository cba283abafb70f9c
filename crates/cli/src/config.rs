//! Converter configuration file for `typebridge --config`.
//!
//! # Example
//!
//! ```toml
//! # "adjust" (default) clamps wide decimals; "reject" fails instead.
//! decimal_overflow = "reject"
//! ```

use std::path::Path;

use typebridge_core::ConverterConfig;

/// Read and parse a converter config TOML file.
///
/// Unknown keys are rejected so that typos do not silently fall back to
/// defaults.
pub fn read_config(path: &Path) -> Result<ConverterConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}
