//! GEX CLI
//!
//! Fetches (or loads from cache) the option chain for a ticker, prints the
//! total dealer gamma exposure and draws the by-strike, by-expiration and
//! surface views in the terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gex_options::pipeline;
use gex_options::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "gex", about = "Dealer gamma exposure from listed options", version)]
struct Args {
    /// Ticker symbol; prompted for when omitted
    ticker: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cache directory for raw responses
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Data source host
    #[arg(long)]
    host: Option<String>,

    /// Always fetch, never read or write the cache
    #[arg(long)]
    no_cache: bool,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,

    /// Chart width in columns
    #[arg(long)]
    width: Option<usize>,

    /// Print the report as JSON instead of drawing charts
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let ticker = match &args.ticker {
        Some(t) => t.clone(),
        None => prompt_ticker()?,
    };
    let ticker = pipeline::normalize_ticker(&ticker)?;

    let transport = HttpTransport::new(&config.source.user_agent)?;
    let client = CboeClient::new(transport, config.source.clone(), config.cache.clone());
    let today = chrono::Local::now().date_naive();

    let report = pipeline::run(&client, &ticker, &config, today)
        .with_context(|| format!("GEX run for {} failed", ticker))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.total_line());
    if let Some(line) = report.skipped_line() {
        println!("{}", line);
    }

    let stdout = io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock(), config.style.clone());
    pipeline::render(&report, &mut renderer)?;

    Ok(())
}

fn load_config(args: &Args) -> Result<GexConfig> {
    let mut config = match &args.config {
        Some(path) => GexConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => GexConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.cache.cache_dir = dir.clone();
    }
    if let Some(host) = &args.host {
        config.source.host = host.clone();
    }
    if args.no_cache {
        config.cache.enabled = false;
    }
    if args.no_color {
        config.style.color = false;
    }
    if let Some(width) = args.width {
        config.style.width = width;
    }

    config.validate()?;
    Ok(config)
}

fn prompt_ticker() -> Result<String> {
    print!("Enter desired ticker:");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read ticker from stdin")?;
    Ok(line)
}
