//! authrisk CLI - biometric authentication failure risk scoring

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Results on stdout, diagnostics on stderr
// - Simulated telemetry is always labelled as such

use anyhow::Context;
use authrisk_core::render::{self, render_json};
use authrisk_core::ticker::{Ticker, TickerConfig};
use authrisk_core::{config, content, regions, signals};
use authrisk_core::{InputPolicy, ResolvedConfig, RiskSignals, RiskWeights};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "authrisk")]
#[command(about = "Risk scoring for biometric authentication failures")]
#[command(version = env!("AUTHRISK_VERSION"))]
struct Cli {
    /// Enable debug logging (overridden by AUTHRISK_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to config file (default: auto-discover)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one set of signals (what-if simulator)
    Score {
        /// Fallback dependency ratio, D18+ / T18+
        #[arg(long, default_value_t = 0.28, allow_negative_numbers = true)]
        fallback_ratio: f64,

        /// Biometric share, B18+ / T18+
        #[arg(long, default_value_t = 0.62, allow_negative_numbers = true)]
        biometric_share: f64,

        /// Normalized authentication intensity
        #[arg(long, default_value_t = 0.35, allow_negative_numbers = true)]
        intensity: f64,

        /// Weight for fallback dependency (overrides config file)
        #[arg(long, allow_negative_numbers = true)]
        w_fallback: Option<f64>,

        /// Weight for loss of biometric share (overrides config file)
        #[arg(long, allow_negative_numbers = true)]
        w_loss: Option<f64>,

        /// Weight for intensity (overrides config file)
        #[arg(long, allow_negative_numbers = true)]
        w_intensity: Option<f64>,

        /// Input range policy (overrides config file)
        #[arg(long)]
        policy: Option<PolicyArg>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Assess a JSON file of pincode records
    Assess {
        /// Path to records file
        path: PathBuf,

        /// Show only top N pincodes (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Classify pre-computed state aggregates (choropleth feed)
    Regions {
        /// Path to state aggregates file
        path: PathBuf,

        /// Show a single state
        #[arg(long)]
        state: Option<String>,

        /// Show only top N states (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the report: narrative, methodology and playbook
    Report {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Browse the report figures
    Figures {
        /// Figure id (fig1..fig5)
        #[arg(long)]
        id: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Emit simulated KPI ticker frames (not real measurements)
    Ticker {
        /// RNG seed (overrides config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of frames (overrides config file)
        #[arg(long)]
        ticks: Option<usize>,

        /// Milliseconds between frames (overrides config file)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Emit all frames immediately instead of pacing them
        #[arg(long)]
        no_wait: bool,

        /// Output format (json emits one object per line)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Validate or inspect configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum PolicyArg {
    Clamp,
    Strict,
    Passthrough,
}

impl From<PolicyArg> for InputPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Clamp => InputPolicy::Clamp,
            PolicyArg::Strict => InputPolicy::Strict,
            PolicyArg::Passthrough => InputPolicy::Passthrough,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("AUTHRISK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let project_root = std::env::current_dir()?;
    let resolved = config::load_and_resolve(&project_root, config_path)
        .context("failed to load configuration")?;
    if let Some(p) = &resolved.config_path {
        tracing::info!(path = %p.display(), "using config");
    }
    Ok(resolved)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Score {
            fallback_ratio,
            biometric_share,
            intensity,
            w_fallback,
            w_loss,
            w_intensity,
            policy,
            format,
        } => {
            let resolved = load_config(cli.config.as_deref())?;

            // CLI flags override config file values
            let weights = RiskWeights::new(
                w_fallback.unwrap_or(resolved.weights.fallback),
                w_loss.unwrap_or(resolved.weights.loss),
                w_intensity.unwrap_or(resolved.weights.intensity),
            );
            config::validate_weights(&weights).context("invalid weights")?;
            let policy = policy.map(InputPolicy::from).unwrap_or(resolved.input_policy);
            let signals = RiskSignals::new(fallback_ratio, biometric_share, intensity);

            let assessment = authrisk_core::score_inputs(signals, &weights, policy)
                .with_context(|| format!("inputs rejected by {} policy", policy.as_str()))?;

            match format {
                OutputFormat::Text => print!("{}", render::render_assessment_text(&assessment)),
                OutputFormat::Json => println!("{}", render_json(&assessment)?),
            }
        }
        Commands::Assess { path, top, format } => {
            config::validate_top(top).context("invalid --top")?;
            let resolved = load_config(cli.config.as_deref())?;
            ensure_exists(&path)?;

            let records = signals::load_records(&path)?;
            if records.is_empty() {
                tracing::warn!(path = %path.display(), "records file is empty");
            }
            let report =
                authrisk_core::run_batch(&records, &resolved.weights, top.or(resolved.top_n));

            match format {
                OutputFormat::Text => {
                    print!("{}", render::render_distribution_text(&report.distribution));
                    println!();
                    print!("{}", render::render_regions_text(&report.states));
                    println!();
                    print!("{}", render::render_assessments_text(&report.pincodes));
                }
                OutputFormat::Json => println!("{}", render_json(&report)?),
            }
        }
        Commands::Regions {
            path,
            state,
            top,
            format,
        } => {
            config::validate_top(top).context("invalid --top")?;
            let resolved = load_config(cli.config.as_deref())?;
            ensure_exists(&path)?;

            let aggregates = regions::load_state_aggregates(&path)?;
            let mut classified = regions::classify_regions(&aggregates);

            if let Some(name) = state {
                let region = regions::find_region(&classified, &name)
                    .with_context(|| format!("no data for state: {}", name))?;
                match format {
                    OutputFormat::Text => print!("{}", render::render_region_detail(region)),
                    OutputFormat::Json => println!("{}", render_json(region)?),
                }
                return Ok(());
            }

            if let Some(n) = top.or(resolved.top_n) {
                classified.truncate(n);
            }
            match format {
                OutputFormat::Text => print!("{}", render::render_regions_text(&classified)),
                OutputFormat::Json => println!("{}", render_json(&classified)?),
            }
        }
        Commands::Report { format } => {
            let resolved = load_config(cli.config.as_deref())?;
            let weights = resolved.weights.normalized();
            match format {
                OutputFormat::Text => print!("{}", render::render_report_text(&weights)),
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "meta": content::REPORT_META,
                        "narrative": content::NARRATIVE,
                        "definitions": content::METRIC_DEFINITIONS,
                        "formulas": content::FORMULAS,
                        "risk_score_formula": content::RISK_SCORE_FORMULA,
                        "active_formula": authrisk_core::risk::formula_text(&weights),
                        "categories": content::risk_categories(),
                        "figures": content::FIGURES,
                    });
                    println!("{}", render_json(&value)?);
                }
            }
        }
        Commands::Figures { id, format } => {
            if let Some(ref requested) = id {
                if !content::FIGURES
                    .iter()
                    .any(|f| f.id.eq_ignore_ascii_case(requested.trim()))
                {
                    tracing::warn!(id = %requested, "unknown figure id, showing fig1");
                }
            }
            let figure = content::select_figure(id.as_deref());
            match format {
                OutputFormat::Text => print!("{}", render::render_figures_text(figure)),
                OutputFormat::Json => println!("{}", render_json(figure)?),
            }
        }
        Commands::Ticker {
            seed,
            ticks,
            interval_ms,
            no_wait,
            format,
        } => {
            let resolved = load_config(cli.config.as_deref())?;
            let interval_ms = interval_ms.unwrap_or(resolved.ticker_interval_ms);
            if interval_ms == 0 {
                anyhow::bail!("--interval-ms must be positive");
            }
            let ticks = ticks.unwrap_or(resolved.ticker_ticks);
            let start_ms = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock is before the Unix epoch")?
                .as_millis() as u64;

            let ticker = Ticker::new(TickerConfig {
                seed: seed.unwrap_or(resolved.ticker_seed),
                interval_ms,
                start_ms,
            });
            tracing::debug!(seed = ticker.config().seed, ticks, "starting simulated ticker");

            let mut stdout = std::io::stdout();
            for (i, snapshot) in ticker.take(ticks).enumerate() {
                if i > 0 && !no_wait {
                    std::thread::sleep(Duration::from_millis(interval_ms));
                }
                let line = match format {
                    OutputFormat::Text => render::render_ticker_text(&snapshot),
                    OutputFormat::Json => serde_json::to_string(&snapshot)?,
                };
                writeln!(stdout, "{}", line)?;
                stdout.flush()?;
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let explicit = path.as_deref().or(cli.config.as_deref());
                let resolved = config::load_and_resolve(&project_root, explicit);

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = load_config(path.as_deref().or(cli.config.as_deref()))?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

fn ensure_exists(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    let normalized = resolved.weights.normalized();
    println!("Weights (raw -> normalized):");
    println!(
        "  fallback: {} -> {:.3}",
        resolved.weights.fallback, normalized.fallback
    );
    println!("  loss: {} -> {:.3}", resolved.weights.loss, normalized.loss);
    println!(
        "  intensity: {} -> {:.3}",
        resolved.weights.intensity, normalized.intensity
    );
    if resolved.weights.is_degenerate() {
        println!("  (raw weights sum to zero; defaults substituted)");
    }
    println!();
    println!("Input policy: {}", resolved.input_policy.as_str());
    println!();
    println!("Ticker (simulated):");
    println!("  seed: {}", resolved.ticker_seed);
    println!("  interval_ms: {}", resolved.ticker_interval_ms);
    println!("  ticks: {}", resolved.ticker_ticks);
    println!();
    println!(
        "  top: {}",
        resolved
            .top_n
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
}
