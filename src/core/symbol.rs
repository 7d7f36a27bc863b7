//! Option identifier parsing
//!
//! Listed option identifiers follow the fixed OCC-style layout
//! `<root><YYMMDD><C|P><strike * 1000>`, e.g. `SPY210917C00550000`.
//! Fields are extracted positionally from the type marker outwards; no
//! general tokenization is attempted.

use chrono::NaiveDate;
use thiserror::Error;

use super::option::OptionType;

/// Length of the `YYMMDD` expiration group
const DATE_LEN: usize = 6;

/// Trailing strike digits that hold the fractional part (strike * 1000)
const STRIKE_DECIMALS: usize = 3;

/// Reasons an identifier does not match the expected layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("empty identifier")]
    Empty,

    #[error("no call/put marker found")]
    MissingType,

    #[error("unknown option type marker '{0}'")]
    UnknownType(char),

    #[error("expected a 6-digit YYMMDD group before the type marker")]
    MissingDate,

    #[error("invalid expiration date '{0}'")]
    InvalidDate(String),

    #[error("missing root symbol")]
    MissingRoot,

    #[error("invalid strike field '{0}'")]
    InvalidStrike(String),
}

/// Fields derived from an option identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSymbol {
    /// Root symbol (e.g. "SPY", "SPXW")
    pub root: String,
    /// Expiration date
    pub expiration: NaiveDate,
    /// Call or put
    pub option_type: OptionType,
    /// Whole-currency strike; the fractional thousandths are truncated
    pub strike: i64,
}

/// Parse an option identifier into type, strike and expiration.
pub fn parse_symbol(identifier: &str) -> Result<ParsedSymbol, SymbolError> {
    let symbol = identifier.trim();
    if symbol.is_empty() {
        return Err(SymbolError::Empty);
    }

    // The type marker is the last letter; everything after it is the strike.
    let marker_pos = symbol
        .char_indices()
        .filter(|(_, c)| c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .last()
        .ok_or(SymbolError::MissingType)?;

    let strike_digits = &symbol[marker_pos + 1..];
    if strike_digits.len() <= STRIKE_DECIMALS || !strike_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SymbolError::InvalidStrike(strike_digits.to_string()));
    }

    let marker = symbol[marker_pos..].chars().next().ok_or(SymbolError::MissingType)?;
    let option_type = OptionType::from_code(marker).ok_or(SymbolError::UnknownType(marker))?;

    if marker_pos < DATE_LEN {
        return Err(SymbolError::MissingDate);
    }
    let date_start = marker_pos - DATE_LEN;
    let date_digits = symbol.get(date_start..marker_pos).ok_or(SymbolError::MissingDate)?;
    if !date_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SymbolError::MissingDate);
    }
    let expiration = NaiveDate::parse_from_str(date_digits, "%y%m%d")
        .map_err(|_| SymbolError::InvalidDate(date_digits.to_string()))?;

    let root = &symbol[..date_start];
    if root.is_empty() {
        return Err(SymbolError::MissingRoot);
    }

    let whole = &strike_digits[..strike_digits.len() - STRIKE_DECIMALS];
    let strike = whole
        .parse::<i64>()
        .map_err(|_| SymbolError::InvalidStrike(strike_digits.to_string()))?;

    Ok(ParsedSymbol {
        root: root.to_string(),
        expiration,
        option_type,
        strike,
    })
}
