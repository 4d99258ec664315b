/*
 * sync.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Sync command: reconcile an expression after mapping changes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fieldmap_error_reporting::generic_warning;
use fieldmap_model::FieldKey;
use fieldmap_source_map::Position;
use tracing::debug;

use super::{Options, Session};
use crate::input::{ExpressionSource, parse_field_key, parse_position};

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Mapping file (JSON)
    #[arg(long)]
    pub mapping: PathBuf,

    #[command(flatten)]
    pub source: ExpressionSource,

    /// Insert newly mapped fields at LINE:COL instead of appending
    #[arg(long, value_parser = parse_position)]
    pub at: Option<Position>,

    /// Map a catalog field (DOC:PATH) as a source before syncing
    #[arg(long, value_parser = parse_field_key)]
    pub map: Vec<FieldKey>,

    /// Unmap a source field (DOC:PATH) before syncing
    #[arg(long, value_parser = parse_field_key)]
    pub unmap: Vec<FieldKey>,
}

pub fn execute(args: SyncArgs, options: &Options) -> Result<bool> {
    let text = args.source.read()?;
    let mut session = Session::open(&args.mapping, options)?;

    let mut expr = session.expression();
    {
        let mut ctx = session.context();
        expr.set_text(&text, &mut ctx);

        for key in &args.unmap {
            if ctx.mapping.remove_field(key).is_none() {
                ctx.report(generic_warning!(format!("Field {} is not mapped", key)));
                continue;
            }
            debug!(field = %key, "Unmapped field");
        }
        for key in &args.map {
            let mapped = ctx.mapping.map_source_from(key, ctx.catalog).map(|_| ());
            if let Err(err) = mapped {
                ctx.report(err.to_diagnostic());
            }
        }
        expr.update_field_reference(args.at, &mut ctx);
    }

    session.finish(&expr, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::mapping_file;
    use crate::input::ExpressionSource;

    const MAPPING: &str = r#"{ "mapping": { "id": "m1", "source_fields": [
        { "field": { "doc_id": "DOC1", "path": "/a", "name": "a" } },
        { "field": { "doc_id": "DOC1", "path": "/b", "name": "b" } }
    ] } }"#;

    fn args(path: PathBuf, text: &str, map: Vec<FieldKey>, unmap: Vec<FieldKey>) -> SyncArgs {
        SyncArgs {
            mapping: path,
            source: ExpressionSource {
                text: Some(text.to_string()),
                file: None,
            },
            at: None,
            map,
            unmap,
        }
    }

    #[test]
    fn test_unmapping_unmapped_field_only_warns() {
        let file = mapping_file(MAPPING);
        let args = args(
            file.path().to_path_buf(),
            "${DOC1:/a}",
            vec![],
            vec![FieldKey::new("DOC1", "/zzz")],
        );
        let had_errors = execute(args, &Options { config: None, json: true }).unwrap();
        assert!(!had_errors);
    }

    #[test]
    fn test_mapping_unknown_field_is_an_error() {
        let file = mapping_file(MAPPING);
        let args = args(
            file.path().to_path_buf(),
            "${DOC1:/a}",
            vec![FieldKey::new("DOC1", "/zzz")],
            vec![],
        );
        let had_errors = execute(args, &Options { config: None, json: true }).unwrap();
        assert!(had_errors);
    }

    #[test]
    fn test_sync_without_errors() {
        let file = mapping_file(MAPPING);
        let args = args(
            file.path().to_path_buf(),
            "${DOC1:/a}",
            vec![],
            vec![FieldKey::new("DOC1", "/a")],
        );
        let had_errors = execute(args, &Options { config: None, json: true }).unwrap();
        assert!(!had_errors);
    }
}
