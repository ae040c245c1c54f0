//! Courier Discounts: batch pricing of shipment transactions.
//!
//! ```sh
//! # Price data/input.txt into data/output.txt
//! courier-discounts
//!
//! # Explicit input, results on stdout
//! courier-discounts transactions.txt -o -
//!
//! # Custom config and a tighter cap
//! courier-discounts --config ./courier.toml --monthly-cap 5.00
//!
//! # Validate config without processing
//! courier-discounts --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{error, info};

use courier_batch::{init_tracing, CourierConfig, OutputFormat, ShipmentProcessor};
use courier_core::{CapReset, Money};

/// Applies shipping discounts to a transaction file.
#[derive(Parser, Debug)]
#[command(
    name = "courier-discounts",
    version,
    about = "Apply shipping discounts to a transaction file",
    long_about = "Reads lines of `YYYY-MM-DD SIZE PROVIDER`, prices each shipment and \
                  writes the line back with its price and discount.\n\n\
                  Default config: the platform config dir, e.g. ~/.config/discounts/courier.toml"
)]
struct Cli {
    /// Transaction file to read. Overrides io.input.
    input: Option<PathBuf>,

    /// Where to write results; `-` for stdout. Overrides io.output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the total discount cap, e.g. 10.00.
    #[arg(long)]
    monthly_cap: Option<Money>,

    /// Override when the discount total restarts (never, calendar_month).
    #[arg(long)]
    cap_reset: Option<CapReset>,

    /// Output format (text, json).
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Raise console verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Validate the configuration and exit without processing.
    #[arg(long)]
    check: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long, conflicts_with = "check")]
    init_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────────────────
    let mut config = CourierConfig::load(cli.config.clone()).context("loading configuration")?;

    // ── Apply CLI overrides ─────────────────────────────────────────
    if let Some(input) = cli.input {
        config.io.input = input;
    }
    if let Some(output) = cli.output {
        config.io.output = output;
    }
    if let Some(cap) = cli.monthly_cap {
        config.pricing.monthly_cap = cap;
    }
    if let Some(cap_reset) = cli.cap_reset {
        config.pricing.cap_reset = cap_reset;
    }
    if let Some(format) = cli.format {
        config.io.format = format;
    }
    match cli.verbose {
        0 => {}
        1 => config.logging.level = "debug".to_string(),
        _ => config.logging.level = "trace".to_string(),
    }
    config.validate().context("validating command-line overrides")?;

    // ── Config-only modes ───────────────────────────────────────────
    if cli.init_config {
        let path = cli.config.or_else(CourierConfig::default_config_path);
        config.save(path.clone()).context("writing configuration")?;
        if let Some(path) = path {
            println!("Configuration written to {}", path.display());
        }
        return Ok(());
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Monthly cap : {}", config.pricing.monthly_cap);
        println!("   Cap reset   : {}", config.pricing.cap_reset);
        for provider in config.catalogs().iter() {
            let prices: Vec<String> = provider
                .prices()
                .map(|(size, price)| format!("{}={}", size, price))
                .collect();
            println!("   Provider    : {} {}", provider.id(), prices.join(" "));
        }
        println!("   Input       : {}", config.io.input.display());
        println!("   Output      : {}", config.io.output.display());
        println!("   Format      : {}", config.io.format);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config.logging).context("initialising logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Courier discounts starting");

    // ── Process ─────────────────────────────────────────────────────
    let engine = config.build_engine().context("building discount engine")?;
    let mut processor = ShipmentProcessor::new(engine, config.io.format);
    processor
        .process_file(&config.io.input, &config.io.output)
        .with_context(|| format!("processing {}", config.io.input.display()))?;

    Ok(())
}
