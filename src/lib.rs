//! # GEX Options - Dealer Gamma Exposure
//!
//! Estimates how much dealers must hedge for a 1% move in an underlying,
//! from the open interest and gamma of every listed option on it.
//!
//! ## Overview
//!
//! A run is a single linear pipeline:
//! - **Acquisition**: CBOE delayed-quotes snapshot, cached per ticker on disk
//! - **Normalization**: type / strike / expiration parsed from each identifier
//! - **Exposure**: signed per-contract GEX (dealers long calls, short puts)
//! - **Aggregation**: GEX by strike, by expiration, and the strike × expiry surface
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gex_options::prelude::*;
//!
//! let config = GexConfig::default();
//! let transport = HttpTransport::new(&config.source.user_agent).unwrap();
//! let client = CboeClient::new(transport, config.source.clone(), config.cache.clone());
//!
//! let today = chrono::Local::now().date_naive();
//! let report = pipeline::run(&client, "SPY", &config, today).unwrap();
//! println!("{}", report.total_line());
//!
//! let mut renderer = TerminalRenderer::new(std::io::stdout(), config.style.clone());
//! pipeline::render(&report, &mut renderer).unwrap();
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Compute gamma itself (the source's greeks are used as given)
//! - Model actual dealer positioning beyond the long-call / short-put convention
//! - Refresh a cached snapshot (delete `data/<TICKER>.json` to refetch)

pub mod config;
pub mod core;
pub mod data;
pub mod exposure;
pub mod pipeline;
pub mod render;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        parse_symbol, GexError, GexResult, OptionChain, OptionRecord, OptionType, ParsedSymbol,
        RawOption, RejectReason, RejectedRecord, SymbolError,
    };

    // Data fetching
    pub use crate::data::{
        parse_snapshot, Acquisition, CacheConfig, CboeClient, CboeSnapshot, DataCache, DataSource,
        HttpResponse, HttpTransport, SourceConfig, Transport,
    };

    // Exposure
    pub use crate::exposure::{
        compute_exposure, contract_gex, gex_by_expiration, gex_by_strike, gex_surface, total_gex,
        total_gex_bn, ExpirationExposure, ExposureWindow, GexSurface, StrikeExposure, SurfaceGrid,
        SurfacePoint, CONTRACT_MULTIPLIER,
    };

    // Rendering
    pub use crate::render::{BarChart, ChartStyle, Renderer, SurfaceChart, TerminalRenderer};

    pub use crate::config::GexConfig;
    pub use crate::pipeline::{self, GexReport};
}

// Re-export main types at crate root
pub use crate::config::GexConfig;
pub use crate::core::{GexError, GexResult};
pub use crate::pipeline::GexReport;
