//! `site-check` -- batch validator for postal address records.
//!
//! Reads addresses from a file or stdin, checks each one against the
//! active rule set, and prints a report to stdout. Logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default | Description                          |
//! |---------------------|----------|---------|--------------------------------------|
//! | `SITE_CHECK_RULES`  | no       | --      | JSON rule-set file                   |
//! | `SITE_CHECK_STRICT` | no       | `false` | Count warnings as failures           |
//! | `SITE_CHECK_FORMAT` | no       | `text`  | Report format, `text` or `json`      |
//!
//! Exit status is 0 when every entry is valid, 1 when any entry is invalid
//! or rejected, and 2 when the input or configuration cannot be loaded.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use site_check::config::{CheckConfig, ReportFormat};
use site_check::input::{self, InputFormat};
use site_check::report;

#[derive(Parser, Debug)]
#[command(name = "site-check")]
#[command(about = "Validate postal address records", long_about = None)]
struct Args {
    /// Input file; omitted or `-` reads stdin
    input: Option<PathBuf>,

    /// Input holds one single-line address per line instead of a JSON array
    #[arg(long)]
    lines: bool,

    /// JSON rule-set file (overrides SITE_CHECK_RULES)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Report format (overrides SITE_CHECK_FORMAT)
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Count warnings as failures
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_check=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> anyhow::Result<bool> {
    let config = CheckConfig::from_env()?.with_overrides(args.rules, args.format, args.strict);
    let rules = config.load_rules()?;
    tracing::info!(
        rules = rules.len(),
        strict = config.strict,
        custom = config.rules_path.is_some(),
        "Rule set loaded"
    );

    let format = if args.lines {
        InputFormat::Lines
    } else {
        InputFormat::Json
    };
    let text = input::read_source(args.input.as_deref())?;
    let entries = input::parse_entries(&text, format)?;

    let report = report::check_entries(entries, &rules, config.strict);
    println!("{}", report::render(&report, config.format)?.trim_end());

    let s = &report.summary;
    tracing::info!(
        total = s.total,
        valid = s.valid,
        invalid = s.invalid,
        rejected = s.rejected,
        "Check complete"
    );

    Ok(report.all_valid())
}
