//! Run configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! strike_band = 0.10
//!
//! [cache]
//! cache_dir = "/tmp/gex"
//!
//! [style]
//! color = false
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{GexError, GexResult};
use crate::data::{CacheConfig, SourceConfig};
use crate::exposure::{ExposureWindow, CONTRACT_MULTIPLIER};
use crate::render::ChartStyle;

/// Configuration for a GEX run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GexConfig {
    /// Shares per contract
    /// Default: 100
    pub contract_multiplier: f64,

    /// Fractional band around spot for the strike views
    /// Default: 0.15
    pub strike_band: f64,

    /// Expiration window length in days, end excluded
    /// Default: 365
    pub expiry_window_days: i64,

    /// Remote endpoint
    pub source: SourceConfig,
    /// Local raw-response cache
    pub cache: CacheConfig,
    /// Chart styling
    pub style: ChartStyle,
}

impl Default for GexConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: CONTRACT_MULTIPLIER,
            strike_band: 0.15,
            expiry_window_days: 365,
            source: SourceConfig::default(),
            cache: CacheConfig::default(),
            style: ChartStyle::default(),
        }
    }
}

impl GexConfig {
    pub fn from_toml_str(text: &str) -> GexResult<Self> {
        let config: GexConfig =
            toml::from_str(text).map_err(|e| GexError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> GexResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        tracing::info!("Loaded config from {:?}", path);
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> GexResult<()> {
        if !(self.contract_multiplier > 0.0) {
            return Err(GexError::config(format!(
                "contract_multiplier must be positive, got {}",
                self.contract_multiplier
            )));
        }
        if !(self.strike_band > 0.0 && self.strike_band < 1.0) {
            return Err(GexError::config(format!(
                "strike_band must be in (0, 1), got {}",
                self.strike_band
            )));
        }
        if self.expiry_window_days <= 0 || self.expiry_window_days > 36_500 {
            return Err(GexError::config(format!(
                "expiry_window_days must be in 1..=36500, got {}",
                self.expiry_window_days
            )));
        }
        if self.source.host.trim().is_empty() {
            return Err(GexError::config("source.host is empty"));
        }
        self.style.validate()
    }

    /// Aggregation window around `spot` starting at `today`
    pub fn window(&self, spot: f64, today: NaiveDate) -> ExposureWindow {
        ExposureWindow::new(spot, self.strike_band, today, self.expiry_window_days)
    }
}
