//! # pandoc-sync CLI
//!
//! Binary entry point for the `pandoc-sync` command-line tool.
//!
//! It parses the command line with `clap`, runs the selected command and lets
//! `anyhow` report any error that escapes it. The conversion logic lives in
//! the library crate; the binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
