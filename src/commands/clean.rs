//! # Clean Command Implementation
//!
//! Deletes the outputs of every known source and the build state, so the
//! next build starts from scratch. Source files are never touched.

use anyhow::Result;
use clap::Args;

use pandoc_sync::output::{Icon, OutputConfig};
use pandoc_sync::pipeline;
use pandoc_sync::processor::DiskOutput;

use super::ConfigArgs;

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// List what would be deleted without deleting it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the clean command
pub fn execute(args: CleanArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = args.config.settings()?;

    let removed = pipeline::clean(&settings, &DiskOutput, args.dry_run)?;
    for target in &removed {
        println!("{} {}", out.icon(Icon::Delete), out.path(target));
    }

    let verb = if args.dry_run {
        "would be deleted"
    } else {
        "deleted"
    };
    println!("{} {} files {}", out.icon(Icon::Ok), removed.len(), verb);
    Ok(())
}
