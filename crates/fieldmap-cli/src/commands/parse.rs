/*
 * parse.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Parse command: qualified expression text to nodes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{Options, Session};
use crate::input::ExpressionSource;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Mapping file (JSON)
    #[arg(long)]
    pub mapping: PathBuf,

    #[command(flatten)]
    pub source: ExpressionSource,
}

pub fn execute(args: ParseArgs, options: &Options) -> Result<bool> {
    let text = args.source.read()?;
    let mut session = Session::open(&args.mapping, options)?;

    let mut expr = session.expression();
    {
        let mut ctx = session.context();
        expr.set_text(&text, &mut ctx);
    }
    info!(fields = expr.field_nodes().len(), "Parsed expression");

    session.finish(&expr, options)
}
