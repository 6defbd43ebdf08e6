//! # Validate Command Implementation
//!
//! Parses the configuration file, validates it the same way a build would
//! and prints a summary of what a build is going to do with it.
//!
//! Configuration errors (unparseable YAML, duplicate formats, flat layout
//! collisions, invalid glob patterns) fail the command. Missing source
//! directories and an empty format list are warnings, which only fail the
//! command with `--strict`.
//!
//! This command is read-only.

use anyhow::Result;
use clap::Args;

use pandoc_sync::format::LayoutMode;
use pandoc_sync::output::{Icon, OutputConfig};
use pandoc_sync::settings::BuildSettings;

use super::{display_path, ConfigArgs};

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the validate command
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config_path = args.config.path()?;
    println!(
        "{} Validating configuration: {}",
        out.icon(Icon::Scan),
        display_path(&config_path)
    );

    let settings = match args.config.settings() {
        Ok(settings) => {
            println!("{} Configuration is valid", out.icon(Icon::Ok));
            settings
        }
        Err(e) => {
            println!(
                "{} {}",
                out.icon(Icon::Error),
                out.failure(format!("{:#}", e))
            );
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    };

    print_summary(&out, &settings);

    let warnings = collect_warnings(&settings);
    for warning in &warnings {
        println!("{} {}", out.icon(Icon::Warning), warning);
    }

    if args.strict && !warnings.is_empty() {
        anyhow::bail!(
            "Validation failed with {} warning(s) in strict mode",
            warnings.len()
        );
    }
    Ok(())
}

fn print_summary(out: &OutputConfig, settings: &BuildSettings) {
    println!("\n{} Configuration Summary:", out.icon(Icon::Info));

    println!("   Sources:");
    for source in &settings.sources {
        println!("     {}", out.path(source));
    }
    println!("   Output directory: {}", out.path(&settings.output_dir));
    println!(
        "   Layout: {}",
        match settings.layout {
            LayoutMode::Separate => "one directory per format",
            LayoutMode::Flat => "flat",
        }
    );

    println!("   Formats:");
    for format in &settings.formats {
        match settings.layout {
            LayoutMode::Separate => println!(
                "     {} -> {}/",
                format,
                settings.output_dir.join(format.dir_name()).display()
            ),
            LayoutMode::Flat => println!("     {} -> *.{}", format, format.extension),
        }
    }

    println!(
        "   Converter: {}",
        settings.converter_program().display()
    );

    let includes: Vec<&str> = settings.filter.includes().collect();
    let excludes: Vec<&str> = settings.filter.excludes().collect();
    if !includes.is_empty() {
        println!("   Include: {}", includes.join(", "));
    }
    if !excludes.is_empty() {
        println!("   Exclude: {}", excludes.join(", "));
    }
}

/// Problems that do not prevent a build
fn collect_warnings(settings: &BuildSettings) -> Vec<String> {
    let mut warnings = Vec::new();
    if settings.formats.is_empty() {
        warnings.push("No output formats configured, builds will produce nothing".to_string());
    }
    for source in &settings.sources {
        if !source.exists() {
            warnings.push(format!("Source {} does not exist", source.display()));
        }
    }
    warnings
}
