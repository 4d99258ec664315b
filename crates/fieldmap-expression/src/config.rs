/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Engine configuration.

use crate::error::ConfigError;
use fieldmap_error_reporting::DiagnosticKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for an [`Expression`](crate::Expression).
///
/// Every key is optional in TOML:
///
/// ```toml
/// separator = " + "
/// unresolved_level = "warning"
/// positional_placeholders = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpressionConfig {
    /// Operator injected between two field references that would touch.
    pub separator: String,

    /// Level used when a placeholder cannot be resolved.
    pub unresolved_level: DiagnosticKind,

    /// Accept the bare `{n}` positional form in addition to `${n}`.
    pub positional_placeholders: bool,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            separator: " + ".to_string(),
            unresolved_level: DiagnosticKind::Error,
            positional_placeholders: true,
        }
    }
}

impl ExpressionConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
