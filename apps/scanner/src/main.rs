//! Spot Arbitrage Scanner
//!
//! Reads downloaded exchange ticker responses, runs triangular and
//! inter-exchange spread detection, and prints ranked opportunities.

mod config;
mod error;
mod report;
mod source;

use clap::Parser;
use config::{load_config, Overrides};
use error::AppError;
use rust_decimal::Decimal;
use source::{now_ms, ResponseDir};
use spotarb_engine::OpportunityDetector;
use spotarb_feeds::SnapshotCache;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Spot Arbitrage Scanner CLI
#[derive(Parser, Debug)]
#[command(name = "spotarb-scanner")]
#[command(about = "Triangular and cross-exchange spot arbitrage scanner", long_about = None)]
struct Args {
    /// Engine configuration file (JSON); defaults when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding downloaded exchange responses
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Minimum net spread profit in quote currency
    #[arg(long)]
    min_profit: Option<Decimal>,

    /// Capital per spread trade
    #[arg(long)]
    capital: Option<Decimal>,

    /// Start currency for triangular cycles
    #[arg(long)]
    base: Option<String>,

    /// Maximum opportunities printed per section
    #[arg(long, default_value_t = 50)]
    max_display: usize,

    /// Number of analysis passes
    #[arg(long, default_value_t = 1)]
    passes: u32,

    /// Seconds between passes
    #[arg(long, default_value_t = 30)]
    interval_secs: u64,

    /// Seconds a loaded snapshot stays fresh before the files are re-read
    #[arg(long, default_value_t = 60)]
    freshness_secs: u64,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    };

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn run(args: &Args) -> Result<(), AppError> {
    let overrides = Overrides {
        min_profit: args.min_profit,
        capital: args.capital,
        base: args.base.clone(),
    };
    let config = load_config(args.config.as_deref(), &overrides)?;
    let detector = OpportunityDetector::new(config)?;

    let mut source = ResponseDir::new(&args.data_dir);
    let mut cache = SnapshotCache::new(args.freshness_secs.saturating_mul(1000));

    for pass in 1..=args.passes {
        if pass > 1 {
            std::thread::sleep(Duration::from_secs(args.interval_secs));
        }
        info!("Analysis pass {}/{}", pass, args.passes);

        let data = cache.get_or_refresh(now_ms(), &mut source)?;

        let triangular = detector.detect_triangular(&data.snapshot);
        println!("{}", report::render_triangular(&triangular.search.opportunities, args.max_display));

        let spreads = detector.detect_spreads(&data.comparison);
        println!("{}", report::render_spreads(&spreads.opportunities, args.max_display));
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!("Spot arbitrage scanner starting...");
    info!("  Data dir: {}", args.data_dir.display());
    match &args.config {
        Some(path) => info!("  Config: {}", path.display()),
        None => info!("  Config: defaults"),
    }
    info!("  Passes: {}", args.passes);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
