//! # Ls Command Implementation
//!
//! Lists every discovered source together with the targets it resolves to.
//! Nothing is converted and the build state is not consulted.

use anyhow::Result;
use clap::Args;

use pandoc_sync::discovery;
use pandoc_sync::output::{Icon, OutputConfig};

use super::{display_path, ConfigArgs};

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Only show targets of this format
    #[arg(short, long, value_name = "NAME")]
    pub format: Option<String>,
}

/// Execute the ls command
pub fn execute(args: LsArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = args.config.settings()?;

    if let Some(name) = &args.format {
        if settings.formats.find(name).is_none() {
            let known: Vec<&str> = settings.formats.iter().map(|f| f.name.as_str()).collect();
            anyhow::bail!(
                "Unknown format '{}' (configured: {})",
                name,
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            );
        }
    }

    let sources = discovery::discover(&settings)?;
    if sources.is_empty() {
        println!("{} No source files found", out.icon(Icon::Warning));
        return Ok(());
    }

    for source in &sources {
        println!("{}", display_path(source));
        for (format, target) in settings.targets_for(source) {
            if args.format.as_deref().is_some_and(|name| name != format.name) {
                continue;
            }
            println!("  {} {}", format, out.path(&target));
        }
    }

    if settings.formats.is_empty() {
        println!(
            "{} No output formats configured, no targets",
            out.icon(Icon::Warning)
        );
    }
    Ok(())
}
