//! CLI binary for contractgen.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GenerationConfig`, runs the batch, and prints the summary.

use anyhow::{Context, Result};
use clap::Parser;
use contractgen::pipeline::AnthropicClient;
use contractgen::{
    run_batch, states, BatchSummary, GenerationConfig, OutputFormat, RenderStrategy,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate PDFs for all built-in states
  contractgen

  # Only Florida and Texas, into a custom directory
  contractgen --only FL,TX --output-dir out/

  # HTML pipeline (requires wkhtmltopdf on PATH)
  contractgen --format html

  # Custom jurisdiction table
  contractgen --states my_states.json

  # List the built-in jurisdictions, no API key needed
  contractgen --list-states

  # Machine-readable run summary
  contractgen --json --no-progress > summary.json

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY         API key for the content service (required)
  CONTRACTGEN_MODEL         Override the model ID
  CONTRACTGEN_BASE_URL      Override the API base URL
  CONTRACTGEN_OUTPUT_DIR    Override the output directory

SETUP:
  1. Set API key:   export ANTHROPIC_API_KEY=sk-ant-...
  2. Generate:      contractgen --only FL

  Each state produces one dated document:
    contracts/Transportation_Contract_FL_20240315.pdf
  Rerunning on the same day overwrites; a failed state writes nothing.
"#;

/// Generate per-state medical-transportation contract documents.
#[derive(Parser, Debug)]
#[command(
    name = "contractgen",
    version,
    about = "Generate per-state medical transportation contract documents",
    long_about = "Generate complete medical-transportation contract documents, one per state: \
an LLM drafts the contract body, rate schedule, service areas, and performance standards from \
each jurisdiction's configuration, and the results are assembled into a dated PDF (directly, \
or via HTML and wkhtmltopdf).",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Output format: pdf (direct layout) or html (external renderer).
    #[arg(long, env = "CONTRACTGEN_FORMAT", value_enum, default_value = "pdf")]
    format: FormatArg,

    /// Directory for generated documents, created if absent.
    #[arg(short, long, env = "CONTRACTGEN_OUTPUT_DIR", default_value = "contracts")]
    output_dir: PathBuf,

    /// Filename stem: {base-name}_{ABBREV}_{YYYYMMDD}.{ext}.
    #[arg(long, env = "CONTRACTGEN_BASE_NAME", default_value = "Transportation_Contract")]
    base_name: String,

    /// JSON file of jurisdiction records (defaults to the built-in table).
    #[arg(long, env = "CONTRACTGEN_STATES")]
    states: Option<PathBuf>,

    /// Comma-separated state abbreviations to generate, e.g. FL,TX.
    #[arg(long, env = "CONTRACTGEN_ONLY")]
    only: Option<String>,

    /// Model ID sent to the content service.
    #[arg(long, env = "CONTRACTGEN_MODEL", default_value = "claude-3-sonnet-20240229")]
    model: String,

    /// API base URL (self-hosted gateways, test servers).
    #[arg(long, env = "CONTRACTGEN_BASE_URL", default_value = "https://api.anthropic.com")]
    base_url: String,

    /// Sampling temperature (0.0–1.0).
    #[arg(long, env = "CONTRACTGEN_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max tokens per content reply.
    #[arg(long, env = "CONTRACTGEN_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Per-request API timeout in seconds.
    #[arg(long, env = "CONTRACTGEN_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Path to the wkhtmltopdf executable (html format only).
    #[arg(long, env = "CONTRACTGEN_WKHTMLTOPDF", default_value = "wkhtmltopdf")]
    wkhtmltopdf: PathBuf,

    /// Output the run summary as JSON on stdout.
    #[arg(long, env = "CONTRACTGEN_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "CONTRACTGEN_NO_PROGRESS")]
    no_progress: bool,

    /// Print the built-in jurisdiction table and exit.
    #[arg(long)]
    list_states: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CONTRACTGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CONTRACTGEN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Pdf,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar is the user-facing feedback channel; keep library
    // logs quiet unless verbosity is requested explicitly.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Load and filter jurisdictions ────────────────────────────────────
    let records = match cli.states {
        Some(ref path) => states::load(path)?,
        None => states::builtin().to_vec(),
    };
    let records = match cli.only {
        Some(ref only) => states::filter_by_abbrev(records, only)?,
        None => records,
    };

    if cli.list_states {
        println!("{:<4} {:<15} {:<42} {}", "AB", "STATE", "PROVIDER", "AGENCY");
        for r in &records {
            println!(
                "{:<4} {:<15} {:<42} {}",
                r.abbrev, r.state, r.provider.name, r.agency.name
            );
        }
        return Ok(());
    }

    // ── Build config and client ──────────────────────────────────────────
    let config = GenerationConfig::builder()
        .format(cli.format.clone().into())
        .output_dir(&cli.output_dir)
        .base_name(&cli.base_name)
        .model(&cli.model)
        .base_url(&cli.base_url)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout)
        .wkhtmltopdf(&cli.wkhtmltopdf)
        .render_strategies(RenderStrategy::DEFAULT_ORDER.to_vec())
        .build()
        .context("Invalid configuration")?;

    let client = AnthropicClient::from_env(&config)?;
    let today = chrono::Local::now().date_naive();

    // ── Ctrl-C → graceful stop between records ───────────────────────────
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\ninterrupt received; finishing current state…");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    // ── Run the batch ────────────────────────────────────────────────────
    let bar = if show_progress {
        let bar = ProgressBar::new(records.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>2}/{len} states  \
                 ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Generating");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let summary = run_batch(&config, &records, &client, today, cancel.as_ref(), |outcome| {
        if let Some(ref bar) = bar {
            match &outcome.error {
                None => bar.println(format!(
                    "  {} {:<15} {}",
                    green("✓"),
                    outcome.state,
                    dim(&outcome
                        .artifacts
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")),
                )),
                Some(e) => bar.println(format!("  {} {:<15} {}", red("✗"), outcome.state, red(&e.to_string()))),
            }
            bar.inc(1);
        }
    })
    .await?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary_json(&summary))
                .context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        print_summary(&summary);
    }

    if summary.all_failed() {
        anyhow::bail!("all {} states failed", summary.attempted);
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    let failed = summary.failure_count();
    eprintln!(
        "{} {}/{} contract documents generated{}",
        if failed == 0 {
            green("✔")
        } else if summary.succeeded == 0 {
            red("✘")
        } else {
            cyan("⚠")
        },
        bold(&summary.succeeded.to_string()),
        summary.attempted,
        if summary.interrupted {
            " (interrupted)"
        } else {
            ""
        },
    );
    for outcome in summary.failed() {
        if let Some(ref e) = outcome.error {
            eprintln!("   {} {}: {}", red("✗"), outcome.abbrev, e);
        }
    }
}

fn summary_json(summary: &BatchSummary) -> serde_json::Value {
    serde_json::json!({
        "attempted": summary.attempted,
        "succeeded": summary.succeeded,
        "failed": summary.failure_count(),
        "interrupted": summary.interrupted,
        "records": summary.outcomes.iter().map(|o| serde_json::json!({
            "state": o.state,
            "abbrev": o.abbrev,
            "ok": o.succeeded(),
            "artifacts": o.artifacts.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "error": o.error.as_ref().map(|e| e.to_string()),
        })).collect::<Vec<_>>(),
    })
}
