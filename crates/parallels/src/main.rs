//! parallels - report parallel octaves, fifths and fourths between MIDI tracks

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use parallels_conf::{OutputConfig, OutputFormat, ParallelsConfig, SortOrder};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use voice_leading::{render_line, sort_findings, NameStyle, Report};

/// Find forbidden parallel motion between the tracks of MIDI files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// MIDI files to analyze
    #[arg(required_unless_present = "show_config")]
    files: Vec<PathBuf>,

    /// Output format: text or json
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Pitch names in text output: lilypond or sharp
    #[arg(long)]
    names: Option<NameStyle>,

    /// Finding order: pair (track pair, then tick) or time (tick, then pair)
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Config file, used instead of ./parallels.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Exit with status 1 when any parallel is found
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(path) = &args.config {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
    }

    let (mut config, sources) = ParallelsConfig::load_with_sources_from(args.config.as_deref())
        .context("loading configuration")?;
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(names) = args.names {
        config.output.names = names;
    }
    if let Some(sort) = args.sort {
        config.output.sort = sort;
    }

    init_tracing(&config.telemetry.log_level);
    debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    if args.show_config {
        print!("{}", config.to_toml().context("rendering configuration")?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut total = 0;
    for path in &args.files {
        let report = analyze_file(path, config.output.sort)?;
        info!("{}", report.summary());
        total += report.findings.len();
        print_report(&report, &config.output)?;
    }

    info!(files = args.files.len(), findings = total, "analysis complete");

    if args.strict && total > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr; stdout carries findings only.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze_file(path: &Path, sort: SortOrder) -> Result<Report> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let (smf, mut findings) = voice_leading::analyze(&bytes)
        .with_context(|| format!("analyzing {}", path.display()))?;

    if sort == SortOrder::Time {
        sort_findings(&mut findings);
    }

    debug!(
        file = %path.display(),
        format = smf.format,
        tracks = smf.tracks.len(),
        findings = findings.len(),
        "analyzed file"
    );

    Ok(Report {
        file: path.display().to_string(),
        ppq: smf.ppq,
        tracks_analyzed: smf.note_tracks(),
        findings,
    })
}

fn print_report(report: &Report, output: &OutputConfig) -> Result<()> {
    match output.format {
        OutputFormat::Text => {
            for finding in &report.findings {
                println!("{}", render_line(finding, output.names));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}
