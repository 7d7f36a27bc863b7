//! GEX pipeline
//!
//! acquire → normalize → compute exposure → aggregate → render, run once per
//! ticker. Every stage after acquisition is pure given the snapshot and the
//! reference date.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::GexConfig;
use crate::core::{GexError, GexResult, OptionChain};
use crate::data::{CboeClient, CboeSnapshot, DataSource, Transport};
use crate::exposure::{
    compute_exposure, gex_by_expiration, gex_by_strike, gex_surface, total_gex_bn,
    ExpirationExposure, GexSurface, StrikeExposure,
};
use crate::render::{BarChart, Renderer, SurfaceChart};

/// Everything a run produces
#[derive(Debug, Clone, Serialize)]
pub struct GexReport {
    pub ticker: String,
    pub spot: f64,
    pub source: DataSource,
    /// Snapshot time reported by the source
    pub timestamp: Option<String>,
    /// Normalized contract lines
    pub contracts: usize,
    /// Raw records left out because of malformed fields
    pub rejected: usize,
    /// Total notional GEX in billions, 4 decimals
    pub total_gex_bn: f64,
    pub by_strike: Vec<StrikeExposure>,
    pub by_expiration: Vec<ExpirationExposure>,
    pub surface: GexSurface,
}

impl GexReport {
    /// Console summary line; whole values keep one decimal, `-0` prints as `0.0`
    pub fn total_line(&self) -> String {
        let total = self.total_gex_bn + 0.0;
        let text = if total.fract() == 0.0 {
            format!("{:.1}", total)
        } else {
            total.to_string()
        };
        format!("Total notional GEX: ${} Bn", text)
    }

    /// Warning line when records were rejected
    pub fn skipped_line(&self) -> Option<String> {
        (self.rejected > 0).then(|| format!("Skipped {} malformed option identifiers", self.rejected))
    }
}

/// Trim and upper-case a user-supplied ticker
pub fn normalize_ticker(input: &str) -> GexResult<String> {
    let ticker = input.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(GexError::invalid_input("ticker is empty"));
    }
    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(GexError::invalid_input(format!("invalid ticker '{}'", ticker)));
    }
    Ok(ticker)
}

/// Normalize a snapshot into a chain
pub fn build_chain(ticker: &str, snapshot: &CboeSnapshot) -> OptionChain {
    OptionChain::normalize(ticker, snapshot.spot, snapshot.timestamp.clone(), &snapshot.options)
}

/// Compute exposure on the chain and build all three views
pub fn analyze(
    chain: &mut OptionChain,
    source: DataSource,
    config: &GexConfig,
    today: NaiveDate,
) -> GexReport {
    compute_exposure(chain, config.contract_multiplier);

    let window = config.window(chain.spot, today);
    let report = GexReport {
        ticker: chain.underlying.clone(),
        spot: chain.spot,
        source,
        timestamp: chain.timestamp.clone(),
        contracts: chain.len(),
        rejected: chain.rejected.len(),
        total_gex_bn: total_gex_bn(chain),
        by_strike: gex_by_strike(chain, &window),
        by_expiration: gex_by_expiration(chain, &window),
        surface: gex_surface(chain, &window),
    };

    tracing::info!(
        "{}: spot {} from {}, {} contracts, total {} Bn",
        report.ticker,
        report.spot,
        report.source.label(),
        report.contracts,
        report.total_gex_bn
    );
    report
}

/// Acquire and analyze one ticker
pub fn run<T: Transport>(
    client: &CboeClient<T>,
    ticker: &str,
    config: &GexConfig,
    today: NaiveDate,
) -> GexResult<GexReport> {
    let acquisition = client.acquire(ticker)?;
    let mut chain = build_chain(&acquisition.ticker, &acquisition.snapshot);

    if chain.is_empty() {
        return Err(GexError::data(format!(
            "{} returned no usable option records ({} rejected)",
            ticker,
            chain.rejected.len()
        )));
    }

    Ok(analyze(&mut chain, acquisition.source, config, today))
}

/// Hand the three views to a renderer
pub fn render<R: Renderer>(report: &GexReport, renderer: &mut R) -> GexResult<()> {
    renderer.render_bars(&BarChart::by_strike(&report.ticker, &report.by_strike))?;
    renderer.render_bars(&BarChart::by_expiration(&report.ticker, &report.by_expiration))?;
    renderer.render_surface(&SurfaceChart::new(&report.ticker, &report.surface))?;
    Ok(())
}
