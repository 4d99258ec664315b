/*
 * init.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Init command: build the starting expression for a mapping.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{Options, Session};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Mapping file (JSON)
    #[arg(long)]
    pub mapping: PathBuf,
}

pub fn execute(args: InitArgs, options: &Options) -> Result<bool> {
    let mut session = Session::open(&args.mapping, options)?;

    let mut expr = session.expression();
    {
        let mut ctx = session.context();
        if let Some(warning) = ctx.mapping.check_expression_mode() {
            ctx.report(warning);
        }
        expr.generate_initial_expression(&mut ctx);
    }

    session.finish(&expr, options)
}
