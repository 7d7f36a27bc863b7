//! Option records and chains
//!
//! Raw records as delivered by the data source, and the normalized chain the
//! exposure stages work on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::symbol::{parse_symbol, SymbolError};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Dealer gamma sign: dealers are assumed long calls and short puts
    pub fn dealer_sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Parse the single-letter code used in identifiers
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(OptionType::Call),
            'P' => Some(OptionType::Put),
            _ => None,
        }
    }
}

/// Option record as delivered by the data source
///
/// Numeric fields are kept optional so a single null does not reject the
/// whole response; missing values are reported during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOption {
    /// Exchange identifier, e.g. "SPY210917C00550000"
    pub option: String,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub open_interest: Option<f64>,
}

/// Normalized option record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Original identifier
    pub identifier: String,
    /// Call or put, derived from the identifier
    pub option_type: OptionType,
    /// Strike, derived from the identifier
    pub strike: i64,
    /// Expiration, derived from the identifier
    pub expiration: NaiveDate,
    pub gamma: f64,
    pub open_interest: i64,
    /// Signed dealer gamma exposure; zero until exposure is computed
    #[serde(default)]
    pub gex: f64,
}

/// Why a raw record was left out of the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Symbol(SymbolError),
    MissingField(&'static str),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Symbol(e) => write!(f, "{}", e),
            RejectReason::MissingField(field) => write!(f, "missing {}", field),
        }
    }
}

/// A raw record that could not be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position in the raw input
    pub index: usize,
    pub identifier: String,
    pub reason: RejectReason,
}

/// Option chain for one underlying, all expiries
#[derive(Debug, Clone)]
pub struct OptionChain {
    /// Underlying ticker
    pub underlying: String,
    /// Spot price at fetch time
    pub spot: f64,
    /// Snapshot timestamp reported by the source, if any
    pub timestamp: Option<String>,
    /// Normalized records, in raw input order
    pub records: Vec<OptionRecord>,
    /// Records whose identifier or numeric fields were unusable
    pub rejected: Vec<RejectedRecord>,
}

impl OptionChain {
    /// Normalize raw records into a chain.
    ///
    /// Accepted records keep their relative input order; each rejected record
    /// keeps its input index so the two lists together cover the input.
    pub fn normalize(
        underlying: impl Into<String>,
        spot: f64,
        timestamp: Option<String>,
        raw: &[RawOption],
    ) -> Self {
        let underlying = underlying.into();
        let mut records = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();

        for (index, option) in raw.iter().enumerate() {
            match normalize_record(option) {
                Ok(record) => records.push(record),
                Err(reason) => rejected.push(RejectedRecord {
                    index,
                    identifier: option.option.clone(),
                    reason,
                }),
            }
        }

        if !rejected.is_empty() {
            tracing::warn!(
                "{}: skipped {} of {} option records with malformed fields",
                underlying,
                rejected.len(),
                raw.len()
            );
            for r in &rejected {
                tracing::debug!("rejected #{} '{}': {}", r.index, r.identifier, r.reason);
            }
        }

        Self {
            underlying,
            spot,
            timestamp,
            records,
            rejected,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_record(option: &RawOption) -> Result<OptionRecord, RejectReason> {
    let parsed = parse_symbol(&option.option).map_err(RejectReason::Symbol)?;
    let gamma = option.gamma.ok_or(RejectReason::MissingField("gamma"))?;
    let open_interest = option
        .open_interest
        .ok_or(RejectReason::MissingField("open_interest"))?;

    Ok(OptionRecord {
        identifier: option.option.clone(),
        option_type: parsed.option_type,
        strike: parsed.strike,
        expiration: parsed.expiration,
        gamma,
        open_interest: open_interest.round() as i64,
        gex: 0.0,
    })
}
