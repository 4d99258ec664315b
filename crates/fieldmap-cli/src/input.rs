/*
 * input.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reading mapping files, expressions and settings from the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use fieldmap_expression::ExpressionConfig;
use fieldmap_model::{DocumentCatalog, Field, FieldKey, MappingModel};
use fieldmap_source_map::Position;
use serde::{Deserialize, Serialize};

/// A mapping together with the fields of its loaded documents.
///
/// ```json
/// {
///   "documents": [{ "doc_id": "DOC1", "path": "/a", "name": "a", "type": "string" }],
///   "mapping": { "id": "m1", "source_fields": [{ "field": { ... } }] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingFile {
    #[serde(default)]
    pub documents: Vec<Field>,
    pub mapping: MappingModel,
}

impl MappingFile {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
        Self::from_json(&source)
            .with_context(|| format!("Invalid mapping file: {}", path.display()))
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Catalog of every known field.
    ///
    /// Fields already bound in the mapping are included so a mapping file
    /// without a `documents` list still resolves its own fields.
    pub fn catalog(&self) -> DocumentCatalog {
        let mut catalog = DocumentCatalog::new();
        let mapped = self
            .mapping
            .source_fields()
            .iter()
            .chain(self.mapping.target_fields())
            .chain(self.mapping.reference_fields())
            .filter_map(|m| m.field.clone());
        for field in mapped {
            catalog.add(field);
        }
        for field in &self.documents {
            catalog.add(field.clone());
        }
        catalog
    }
}

/// Where the expression text comes from.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct ExpressionSource {
    /// Expression text, in qualified form
    #[arg(long)]
    pub text: Option<String>,

    /// File holding the expression text
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl ExpressionSource {
    pub fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read expression file: {}", path.display())),
            (None, None) => bail!("Either --text or --file is required"),
        }
    }
}

/// Engine settings from `--config`, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ExpressionConfig> {
    match path {
        Some(path) => ExpressionConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(ExpressionConfig::default()),
    }
}

/// Parse `LINE:COL`, both 1-based.
pub fn parse_position(value: &str) -> Result<Position, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got '{}'", value))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line in '{}'", value))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column in '{}'", value))?;
    if line == 0 || column == 0 {
        return Err(format!("positions are 1-based, got '{}'", value));
    }
    Ok(Position::new(line, column))
}

/// Parse `DOC:PATH`, splitting at the first colon.
pub fn parse_field_key(value: &str) -> Result<FieldKey, String> {
    match value.split_once(':') {
        Some((doc, path)) if !doc.is_empty() && path.starts_with('/') => {
            Ok(FieldKey::new(doc, path))
        }
        _ => Err(format!("expected DOC:/path, got '{}'", value)),
    }
}
