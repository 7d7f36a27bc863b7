//! GEX aggregation views
//!
//! Three independent summaries of an exposure-enriched chain:
//! - by strike (Bn$ / %), strikes strictly inside the band around spot
//! - by expiration (Bn$ / %), expirations in `[today, today + window)`
//! - surface by (expiration, strike) (M$ / %), both filters at once
//!
//! Keys come out in ascending order.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::gex::{BILLION, MILLION};
use crate::core::{OptionChain, OptionRecord};

/// Strike band and expiration window used to focus the views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureWindow {
    /// Reference spot
    pub spot: f64,
    /// Fractional band around spot (0.15 → strikes in (0.85 S, 1.15 S))
    pub strike_band: f64,
    /// First date of the expiration window
    pub today: NaiveDate,
    /// Window length in days; the end date is excluded
    pub window_days: i64,
}

impl ExposureWindow {
    pub fn new(spot: f64, strike_band: f64, today: NaiveDate, window_days: i64) -> Self {
        Self {
            spot,
            strike_band,
            today,
            window_days,
        }
    }

    /// Lower and upper strike bounds, both exclusive
    pub fn strike_bounds(&self) -> (f64, f64) {
        (
            self.spot * (1.0 - self.strike_band),
            self.spot * (1.0 + self.strike_band),
        )
    }

    /// First excluded expiration date
    pub fn expiry_end(&self) -> NaiveDate {
        Duration::try_days(self.window_days)
            .and_then(|d| self.today.checked_add_signed(d))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains_strike(&self, strike: i64) -> bool {
        let (lower, upper) = self.strike_bounds();
        let strike = strike as f64;
        strike > lower && strike < upper
    }

    pub fn contains_expiry(&self, expiration: NaiveDate) -> bool {
        expiration >= self.today && expiration < self.expiry_end()
    }
}

/// Net GEX at one strike, in billions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeExposure {
    pub strike: i64,
    pub gex_bn: f64,
}

/// Net GEX for one expiration, in billions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpirationExposure {
    pub expiration: NaiveDate,
    pub gex_bn: f64,
}

/// Net GEX at one (expiration, strike) cell, in millions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub expiration: NaiveDate,
    pub strike: i64,
    pub gex_mn: f64,
}

/// GEX surface in long format, sorted by expiration then strike
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GexSurface {
    pub points: Vec<SurfacePoint>,
}

/// Dense strike × expiration pivot of a [`GexSurface`]
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    /// Row axis, ascending
    pub strikes: Vec<i64>,
    /// Column axis, ascending
    pub expirations: Vec<NaiveDate>,
    /// GEX grid [strike, expiration] -> M$ / %, 0.0 where no contracts
    pub values: Array2<f64>,
}

impl GexSurface {
    /// Pivot into a dense grid
    pub fn to_grid(&self) -> SurfaceGrid {
        let mut strikes: Vec<i64> = self.points.iter().map(|p| p.strike).collect();
        strikes.sort_unstable();
        strikes.dedup();

        let mut expirations: Vec<NaiveDate> = self.points.iter().map(|p| p.expiration).collect();
        expirations.sort_unstable();
        expirations.dedup();

        let mut values = Array2::zeros((strikes.len(), expirations.len()));
        for point in &self.points {
            // Both axes were built from the points, so the searches succeed
            if let (Ok(i), Ok(j)) = (
                strikes.binary_search(&point.strike),
                expirations.binary_search(&point.expiration),
            ) {
                values[[i, j]] = point.gex_mn;
            }
        }

        SurfaceGrid {
            strikes,
            expirations,
            values,
        }
    }
}

/// Sum GEX by exact strike, keep strikes inside the band, scale to billions
pub fn gex_by_strike(chain: &OptionChain, window: &ExposureWindow) -> Vec<StrikeExposure> {
    let mut by_strike: BTreeMap<i64, f64> = BTreeMap::new();
    for record in &chain.records {
        *by_strike.entry(record.strike).or_insert(0.0) += record.gex;
    }

    let rows: Vec<StrikeExposure> = by_strike
        .into_iter()
        .filter(|(strike, _)| window.contains_strike(*strike))
        .map(|(strike, gex)| StrikeExposure {
            strike,
            gex_bn: gex / BILLION,
        })
        .collect();

    tracing::debug!("{}: {} strikes in band", chain.underlying, rows.len());
    rows
}

/// Sum GEX by expiration inside the window, scale to billions
pub fn gex_by_expiration(chain: &OptionChain, window: &ExposureWindow) -> Vec<ExpirationExposure> {
    let mut by_expiration: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in chain.records.iter().filter(|r| window.contains_expiry(r.expiration)) {
        *by_expiration.entry(record.expiration).or_insert(0.0) += record.gex;
    }

    let rows: Vec<ExpirationExposure> = by_expiration
        .into_iter()
        .map(|(expiration, gex)| ExpirationExposure {
            expiration,
            gex_bn: gex / BILLION,
        })
        .collect();

    tracing::debug!("{}: {} expirations in window", chain.underlying, rows.len());
    rows
}

/// Sum GEX by (expiration, strike) inside band and window, scale to millions
pub fn gex_surface(chain: &OptionChain, window: &ExposureWindow) -> GexSurface {
    let in_view =
        |r: &&OptionRecord| window.contains_expiry(r.expiration) && window.contains_strike(r.strike);

    let mut cells: BTreeMap<(NaiveDate, i64), f64> = BTreeMap::new();
    for record in chain.records.iter().filter(in_view) {
        *cells.entry((record.expiration, record.strike)).or_insert(0.0) += record.gex;
    }

    let points: Vec<SurfacePoint> = cells
        .into_iter()
        .map(|((expiration, strike), gex)| SurfacePoint {
            expiration,
            strike,
            gex_mn: gex / MILLION,
        })
        .collect();

    tracing::debug!("{}: {} surface cells", chain.underlying, points.len());
    GexSurface { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(strike: i64, expiration: NaiveDate, gex: f64) -> OptionRecord {
        OptionRecord {
            identifier: format!("TEST{}C{:05}000", expiration.format("%y%m%d"), strike),
            option_type: OptionType::Call,
            strike,
            expiration,
            gamma: 0.0,
            open_interest: 0,
            gex,
        }
    }

    fn chain(records: Vec<OptionRecord>) -> OptionChain {
        OptionChain {
            underlying: "TEST".to_string(),
            spot: 100.0,
            timestamp: None,
            records,
            rejected: Vec::new(),
        }
    }

    fn window() -> ExposureWindow {
        ExposureWindow::new(100.0, 0.15, date(2026, 1, 1), 365)
    }

    #[test]
    fn test_strike_band_is_strict() {
        let w = window();
        assert!(!w.contains_strike(85));
        assert!(w.contains_strike(86));
        assert!(w.contains_strike(114));
        assert!(!w.contains_strike(115));
    }

    #[test]
    fn test_expiry_window_bounds() {
        let w = window();
        assert_eq!(w.expiry_end(), date(2027, 1, 1));
        assert!(w.contains_expiry(date(2026, 1, 1)));
        assert!(w.contains_expiry(date(2026, 12, 31)));
        assert!(!w.contains_expiry(date(2027, 1, 1)));
        assert!(!w.contains_expiry(date(2025, 12, 31)));
    }

    #[test]
    fn test_oversized_window_saturates() {
        let w = ExposureWindow::new(100.0, 0.15, date(2026, 1, 1), i64::MAX);
        assert_eq!(w.expiry_end(), NaiveDate::MAX);
        assert!(w.contains_expiry(date(2100, 1, 1)));

        let w = ExposureWindow::new(100.0, 0.15, date(2026, 1, 1), 5_000_000_000);
        assert_eq!(w.expiry_end(), NaiveDate::MAX);
    }

    #[test]
    fn test_by_strike_groups_and_filters() {
        let exp = date(2026, 3, 20);
        let chain = chain(vec![
            record(100, exp, 2e9),
            record(85, exp, 5e9),
            record(100, date(2026, 6, 19), -0.5e9),
            record(115, exp, 7e9),
            record(90, exp, 1e9),
            // outside the expiry window; strike view does not filter dates
            record(90, date(2030, 1, 18), 1e9),
        ]);

        let rows = gex_by_strike(&chain, &window());

        assert_eq!(
            rows,
            vec![
                StrikeExposure { strike: 90, gex_bn: 2.0 },
                StrikeExposure { strike: 100, gex_bn: 1.5 },
            ]
        );
    }

    #[test]
    fn test_by_expiration_groups_and_filters() {
        let chain = chain(vec![
            record(100, date(2026, 6, 19), 1e9),
            record(300, date(2026, 3, 20), 2e9),
            record(100, date(2026, 3, 20), 1e9),
            record(100, date(2027, 1, 1), 9e9),
            record(100, date(2025, 12, 19), 9e9),
        ]);

        let rows = gex_by_expiration(&chain, &window());

        assert_eq!(
            rows,
            vec![
                ExpirationExposure { expiration: date(2026, 3, 20), gex_bn: 3.0 },
                ExpirationExposure { expiration: date(2026, 6, 19), gex_bn: 1.0 },
            ]
        );
    }

    #[test]
    fn test_surface_applies_both_filters() {
        let mar = date(2026, 3, 20);
        let jun = date(2026, 6, 19);
        let chain = chain(vec![
            record(105, jun, 3e6),
            record(95, mar, 1e6),
            record(95, mar, 1e6),
            record(105, mar, -4e6),
            record(120, mar, 8e6),
            record(95, date(2027, 3, 19), 8e6),
        ]);

        let surface = gex_surface(&chain, &window());

        assert_eq!(
            surface.points,
            vec![
                SurfacePoint { expiration: mar, strike: 95, gex_mn: 2.0 },
                SurfacePoint { expiration: mar, strike: 105, gex_mn: -4.0 },
                SurfacePoint { expiration: jun, strike: 105, gex_mn: 3.0 },
            ]
        );
    }

    #[test]
    fn test_surface_grid_pivot() {
        let mar = date(2026, 3, 20);
        let jun = date(2026, 6, 19);
        let surface = GexSurface {
            points: vec![
                SurfacePoint { expiration: mar, strike: 95, gex_mn: 2.0 },
                SurfacePoint { expiration: mar, strike: 105, gex_mn: -4.0 },
                SurfacePoint { expiration: jun, strike: 105, gex_mn: 3.0 },
            ],
        };

        let grid = surface.to_grid();

        assert_eq!(grid.strikes, vec![95, 105]);
        assert_eq!(grid.expirations, vec![mar, jun]);
        assert_eq!(grid.values.shape(), &[2, 2]);
        assert_eq!(grid.values[[0, 0]], 2.0);
        assert_eq!(grid.values[[0, 1]], 0.0);
        assert_eq!(grid.values[[1, 0]], -4.0);
        assert_eq!(grid.values[[1, 1]], 3.0);
    }

    #[test]
    fn test_empty_chain() {
        let chain = chain(Vec::new());
        assert!(gex_by_strike(&chain, &window()).is_empty());
        assert!(gex_by_expiration(&chain, &window()).is_empty());
        assert!(gex_surface(&chain, &window()).to_grid().values.is_empty());
    }
}
