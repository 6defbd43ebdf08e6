//! # Build Command Implementation
//!
//! Runs the full pipeline: discover sources, compare them with the previous
//! build, convert what changed into every format and delete the outputs of
//! sources that are gone.
//!
//! Conversion failures do not stop the build. Every failure is printed once
//! the build finishes and the command exits non-zero.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use pandoc_sync::config::Config;
use pandoc_sync::converter::PandocConverter;
use pandoc_sync::observer::{BuildEvent, BuildObserver, LogObserver};
use pandoc_sync::output::{Icon, OutputConfig};
use pandoc_sync::pipeline::{self, BuildOptions, BuildOutcome};
use pandoc_sync::processor::{Action, BuildReport, DiskOutput, Plan};

use super::{absolute, display_path, ConfigArgs};

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output directory, overriding `output_dir`
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Converter executable, overriding `converter_path`
    #[arg(long, value_name = "PROGRAM")]
    pub converter: Option<PathBuf>,

    /// Write every format directly into the output directory
    #[arg(long)]
    pub flat: bool,

    /// Ignore the previous build and convert everything
    #[arg(long)]
    pub full: bool,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl BuildArgs {
    /// Apply command-line overrides on top of the configuration file
    fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(output) = &self.output {
            config.output_dir = absolute(output)?;
        }
        if let Some(converter) = &self.converter {
            config.converter_path = Some(if converter.components().count() > 1 {
                absolute(converter)?
            } else {
                converter.clone()
            });
        }
        if self.flat {
            config.separate_output = false;
        }
        Ok(())
    }
}

/// Execute the build command
pub fn execute(args: BuildArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();

    let (mut config, base_dir) = args.config.load()?;
    args.apply_overrides(&mut config)?;
    let settings = config.into_settings(&base_dir)?;

    if !args.quiet && args.dry_run {
        println!(
            "{} DRY RUN MODE - No changes will be made",
            out.icon(Icon::DryRun)
        );
        println!();
    }

    let converter = PandocConverter::new(settings.converter_program());
    let options = BuildOptions {
        full: args.full,
        dry_run: args.dry_run,
    };
    let observer = ProgressObserver::new(!args.quiet && !args.dry_run && out.show_progress());
    let outcome = pipeline::run(&settings, options, &converter, &DiskOutput, &observer);
    observer.finish();
    let outcome = outcome?;

    if args.dry_run {
        if !args.quiet {
            print_plan(&out, &outcome);
        }
        return Ok(());
    }

    match outcome.report {
        Some(report) => summarize(&out, report, start_time.elapsed(), args.quiet, &outcome.plan),
        None => Ok(()),
    }
}

fn print_plan(out: &OutputConfig, outcome: &BuildOutcome) {
    if matches!(outcome.plan, Plan::NoFormats) {
        println!(
            "{} No output formats configured, nothing would be produced",
            out.icon(Icon::Warning)
        );
        return;
    }

    for action in outcome.plan.actions() {
        match action {
            Action::Convert(job) => println!(
                "{} convert {} -> {} ({})",
                out.icon(Icon::Convert),
                display_path(&job.source),
                out.path(&job.target),
                job.format
            ),
            Action::Delete { target, .. } => {
                println!("{} delete {}", out.icon(Icon::Delete), out.path(target))
            }
            Action::Refuse(job) => println!(
                "{} refuse {} -> {} (reserved for the build state)",
                out.icon(Icon::Error),
                display_path(&job.source),
                out.path(&job.target)
            ),
        }
    }
    println!(
        "{} {} conversions, {} deletions, {} sources up to date{}",
        out.icon(Icon::Info),
        outcome.plan.conversion_count(),
        outcome.plan.deletion_count(),
        outcome.changes.up_to_date.len(),
        if outcome.changes.incremental {
            ""
        } else {
            " (full build)"
        }
    );
}

fn summarize(
    out: &OutputConfig,
    report: BuildReport,
    elapsed: Duration,
    quiet: bool,
    plan: &Plan,
) -> Result<()> {
    if report.no_formats {
        // Warned through the observer; a build without formats is not a failure
        if !quiet {
            println!(
                "{} No output formats configured, no output produced",
                out.icon(Icon::Warning)
            );
        }
        return Ok(());
    }

    for failure in &report.failures {
        eprintln!(
            "{} {}",
            out.icon(Icon::Error),
            out.failure(&failure.error)
        );
    }

    if !quiet {
        if plan.files().is_empty() {
            println!("{} Everything up to date", out.icon(Icon::Ok));
        } else if report.is_success() {
            println!(
                "{} {} in {:.2}s",
                out.icon(Icon::Ok),
                out.success("Build finished"),
                elapsed.as_secs_f64()
            );
        }
        println!("   {} files converted", report.converted.len());
        println!("   {} files deleted", report.deleted.len());
    }

    report.into_result()?;
    Ok(())
}

/// Observer that logs every event and advances a progress spinner per source
struct ProgressObserver {
    bar: Option<ProgressBar>,
}

impl ProgressObserver {
    fn new(enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {pos} sources processed {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        Self { bar }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl BuildObserver for ProgressObserver {
    fn on_event(&self, event: &BuildEvent) {
        let Some(bar) = &self.bar else {
            LogObserver.on_event(event);
            return;
        };

        bar.suspend(|| LogObserver.on_event(event));
        match event {
            BuildEvent::Converting { target, .. } => {
                bar.set_message(display_path(target));
            }
            BuildEvent::SourceFinished { .. } => bar.inc(1),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: BuildArgs,
    }

    fn parse(argv: &[&str]) -> BuildArgs {
        let mut full = vec!["build"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_overrides_applied() {
        let args = parse(&["--output", "/tmp/out", "--converter", "pandoc3", "--flat"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.converter_path, Some(PathBuf::from("pandoc3")));
        assert!(!config.separate_output);
    }

    #[test]
    fn test_relative_converter_override_is_made_absolute() {
        let args = parse(&["--converter", "tools/pandoc"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config).unwrap();
        let converter = config.converter_path.unwrap();
        assert!(converter.is_absolute());
        assert!(converter.ends_with("tools/pandoc"));
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = parse(&[]);
        let mut config = Config::default();
        args.apply_overrides(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_progress_observer_without_bar_is_silent() {
        let observer = ProgressObserver::new(false);
        observer.on_event(&BuildEvent::SourceFinished {
            source: Path::new("/a.md").to_path_buf(),
        });
        observer.finish();
        assert!(observer.bar.is_none());
    }

    #[test]
    fn test_progress_observer_counts_sources() {
        let observer = ProgressObserver::new(true);
        for name in ["/a.md", "/b.md"] {
            observer.on_event(&BuildEvent::SourceFinished {
                source: PathBuf::from(name),
            });
        }
        assert_eq!(observer.bar.as_ref().unwrap().position(), 2);
        observer.finish();
    }
}
