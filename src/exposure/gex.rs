//! Dealer gamma exposure
//!
//! GEX per contract is the dollar change in dealer hedge for a 1% move in
//! the underlying: `spot * gamma * OI * multiplier * spot * 0.01`. Dealers
//! are assumed long calls and short puts, so put exposure is negated.

use crate::core::{OptionChain, OptionType};

/// Shares per standard equity option contract
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

pub const BILLION: f64 = 1e9;
pub const MILLION: f64 = 1e6;

/// Signed GEX of a single contract line
pub fn contract_gex(
    spot: f64,
    gamma: f64,
    open_interest: i64,
    multiplier: f64,
    option_type: OptionType,
) -> f64 {
    let gex = spot * gamma * open_interest as f64 * multiplier * spot * 0.01;
    gex * option_type.dealer_sign()
}

/// Fill in `gex` on every record of the chain using the chain's spot
pub fn compute_exposure(chain: &mut OptionChain, multiplier: f64) {
    let spot = chain.spot;
    for record in chain.records.iter_mut() {
        record.gex = contract_gex(
            spot,
            record.gamma,
            record.open_interest,
            multiplier,
            record.option_type,
        );
    }
}

/// Sum of signed GEX over the chain, in currency units
pub fn total_gex(chain: &OptionChain) -> f64 {
    chain.records.iter().map(|r| r.gex).sum()
}

/// Total GEX in billions, rounded to 4 decimals
pub fn total_gex_bn(chain: &OptionChain) -> f64 {
    round(total_gex(chain) / BILLION, 4)
}

pub fn round(x: f64, decimals: u32) -> f64 {
    let y = 10f64.powi(decimals as i32);
    (x * y).round() / y
}
