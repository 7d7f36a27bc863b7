//! CBOE delayed-quotes fetcher
//!
//! Fetches the full option chain for a ticker from the CBOE delayed quotes
//! CDN. Index products are published under an underscore-prefixed name
//! (`_SPX.json`), equities and ETFs usually without (`SPY.json`), so the
//! prefixed URL is tried first and the plain one is used as a fallback when
//! the first response is not a usable chain.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cache::{CacheConfig, DataCache};
use crate::core::{GexError, GexResult, RawOption};

/// Remote endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// CDN host
    pub host: String,
    /// Path under the host holding the per-ticker files
    pub path_prefix: String,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: "cdn.cboe.com".to_string(),
            path_prefix: "api/global/delayed_quotes/options".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl SourceConfig {
    /// Underscore-prefixed URL, tried first
    pub fn primary_url(&self, ticker: &str) -> String {
        format!("https://{}/{}/_{}.json", self.host, self.path_prefix, ticker)
    }

    /// Plain URL, tried when the primary response is unusable
    pub fn fallback_url(&self, ticker: &str) -> String {
        format!("https://{}/{}/{}.json", self.host, self.path_prefix, ticker)
    }
}

/// Minimal HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking GET used by the fetcher
///
/// An `Err` means the request never produced a response (DNS, connect,
/// TLS); HTTP error statuses are returned as `Ok` responses.
pub trait Transport {
    fn get(&self, url: &str) -> GexResult<HttpResponse>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> GexResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| GexError::network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> GexResult<HttpResponse> {
        tracing::info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GexError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GexError::network(format!("Failed to read body: {}", e)))?;

        tracing::debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

/// Spot price and raw option records from one response
#[derive(Debug, Clone, PartialEq)]
pub struct CboeSnapshot {
    pub spot: f64,
    pub timestamp: Option<String>,
    pub options: Vec<RawOption>,
}

#[derive(Debug, Deserialize)]
struct CboeData {
    current_price: f64,
    options: Vec<RawOption>,
}

/// Parse a response body.
///
/// Accepts the CDN envelope `{"timestamp": .., "data": {..}}` as well as a
/// bare `{"current_price": .., "options": [..]}` object.
pub fn parse_snapshot(body: &str) -> GexResult<CboeSnapshot> {
    let value: Value = serde_json::from_str(body)?;

    let timestamp = value
        .get("timestamp")
        .and_then(Value::as_str)
        .map(str::to_string);
    let payload = value.get("data").unwrap_or(&value);

    let data = CboeData::deserialize(payload)?;

    Ok(CboeSnapshot {
        spot: data.current_price,
        timestamp,
        options: data.options,
    })
}

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Cache,
    Primary,
    Fallback,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Cache => "cache",
            DataSource::Primary => "primary url",
            DataSource::Fallback => "fallback url",
        }
    }
}

/// Result of the acquisition stage
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub ticker: String,
    pub snapshot: CboeSnapshot,
    pub source: DataSource,
}

/// CBOE client: cache first, then primary URL, then fallback URL
pub struct CboeClient<T: Transport> {
    transport: T,
    source: SourceConfig,
    cache: DataCache,
}

impl<T: Transport> CboeClient<T> {
    pub fn new(transport: T, source: SourceConfig, cache: CacheConfig) -> Self {
        Self {
            transport,
            source,
            cache: DataCache::new(cache),
        }
    }

    /// Get the snapshot for a ticker (from cache or fetch)
    pub fn acquire(&self, ticker: &str) -> GexResult<Acquisition> {
        if let Some(body) = self.cache.load_raw(ticker)? {
            let snapshot = parse_snapshot(&body).map_err(|e| {
                GexError::data(format!(
                    "Cached data at {:?} is unreadable: {}",
                    self.cache.path(ticker),
                    e
                ))
            })?;
            return Ok(Acquisition {
                ticker: ticker.to_string(),
                snapshot,
                source: DataSource::Cache,
            });
        }

        tracing::info!("Fetching fresh data for {}", ticker);
        let (body, snapshot, source) = self.fetch(ticker)?;
        self.cache.save_raw(ticker, &body)?;

        Ok(Acquisition {
            ticker: ticker.to_string(),
            snapshot,
            source,
        })
    }

    /// Two-attempt fetch, bypassing the cache
    pub fn fetch(&self, ticker: &str) -> GexResult<(String, CboeSnapshot, DataSource)> {
        let primary_url = self.source.primary_url(ticker);
        let primary_failure = match self.attempt(&primary_url)? {
            Ok((body, snapshot)) => return Ok((body, snapshot, DataSource::Primary)),
            Err(reason) => reason,
        };

        tracing::warn!("{} unusable ({}), trying fallback", primary_url, primary_failure);

        let fallback_url = self.source.fallback_url(ticker);
        match self.attempt(&fallback_url)? {
            Ok((body, snapshot)) => Ok((body, snapshot, DataSource::Fallback)),
            Err(reason) => Err(GexError::data(format!(
                "No option data for {}: {} ({}); {} ({})",
                ticker, primary_url, primary_failure, fallback_url, reason
            ))),
        }
    }

    /// One request. Transport failures are fatal (outer error); an error
    /// status or an unparseable body is returned as the inner error.
    fn attempt(&self, url: &str) -> GexResult<Result<(String, CboeSnapshot), String>> {
        let response = self.transport.get(url)?;

        if !response.is_success() {
            return Ok(Err(format!("HTTP {}", response.status)));
        }

        match parse_snapshot(&response.body) {
            Ok(snapshot) => Ok(Ok((response.body, snapshot))),
            Err(e) => Ok(Err(e.to_string())),
        }
    }
}
