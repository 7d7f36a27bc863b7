//! Chart specifications handed to renderers

use crate::exposure::{ExpirationExposure, GexSurface, StrikeExposure, SurfaceGrid};

const GEX_BN_LABEL: &str = "Gamma Exposure (Bn$ / %)";

/// One labelled bar
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// 2D bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// GEX by strike
    pub fn by_strike(ticker: &str, rows: &[StrikeExposure]) -> Self {
        Self {
            title: format!("{} GEX by strike", ticker),
            x_label: "Strike".to_string(),
            y_label: GEX_BN_LABEL.to_string(),
            bars: rows
                .iter()
                .map(|r| Bar {
                    label: r.strike.to_string(),
                    value: r.gex_bn,
                })
                .collect(),
        }
    }

    /// GEX by expiration
    pub fn by_expiration(ticker: &str, rows: &[ExpirationExposure]) -> Self {
        Self {
            title: format!("{} GEX by expiration", ticker),
            x_label: "Expiration date".to_string(),
            y_label: GEX_BN_LABEL.to_string(),
            bars: rows
                .iter()
                .map(|r| Bar {
                    label: r.expiration.format("%Y-%m-%d").to_string(),
                    value: r.gex_bn,
                })
                .collect(),
        }
    }

    /// Largest absolute bar value, 0.0 when empty
    pub fn max_abs(&self) -> f64 {
        self.bars.iter().map(|b| b.value.abs()).fold(0.0, f64::max)
    }
}

/// 3D surface over strike × expiration
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub grid: SurfaceGrid,
}

impl SurfaceChart {
    pub fn new(ticker: &str, surface: &GexSurface) -> Self {
        Self {
            title: format!("{} GEX surface", ticker),
            x_label: "Strike Price".to_string(),
            y_label: "Expiration date".to_string(),
            z_label: "Gamma (M$ / %)".to_string(),
            grid: surface.to_grid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_strike_chart() {
        let rows = vec![
            StrikeExposure { strike: 440, gex_bn: -0.25 },
            StrikeExposure { strike: 445, gex_bn: 1.5 },
        ];
        let chart = BarChart::by_strike("SPY", &rows);

        assert_eq!(chart.title, "SPY GEX by strike");
        assert_eq!(chart.x_label, "Strike");
        assert_eq!(chart.bars[0].label, "440");
        assert_eq!(chart.max_abs(), 1.5);
    }

    #[test]
    fn test_expiration_chart() {
        let rows = vec![ExpirationExposure {
            expiration: NaiveDate::from_ymd_opt(2021, 9, 17).unwrap(),
            gex_bn: 0.75,
        }];
        let chart = BarChart::by_expiration("SPY", &rows);

        assert_eq!(chart.title, "SPY GEX by expiration");
        assert_eq!(chart.x_label, "Expiration date");
        assert_eq!(chart.bars[0].label, "2021-09-17");
    }

    #[test]
    fn test_empty_max_abs() {
        assert_eq!(BarChart::by_strike("SPY", &[]).max_abs(), 0.0);
    }
}
