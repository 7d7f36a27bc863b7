//! Terminal renderer
//!
//! Draws bar charts as horizontal bars around a zero axis and the surface as
//! a strike × expiration heat grid.

use std::io::Write;

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};

use super::chart::{BarChart, SurfaceChart};
use super::style::{ChartStyle, Rgb};
use super::Renderer;
use crate::core::GexResult;

const VALUE_WIDTH: usize = 10;
const CELL_WIDTH: usize = 9;
const MIN_HALF: usize = 5;

/// Renders charts as text to any writer
pub struct TerminalRenderer<W: Write> {
    out: W,
    style: ChartStyle,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, style: ChartStyle) -> Self {
        Self { out, style }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, rgb: Rgb) -> String {
        if self.style.color {
            styled(text, Some(rgb), None, false)
        } else {
            text.to_string()
        }
    }

    fn heading(&mut self, title: &str) -> GexResult<()> {
        let title = if self.style.color {
            styled(title, Some(self.style.text_rgb()), None, self.style.heavy_font)
        } else {
            title.to_string()
        };
        writeln!(self.out)?;
        writeln!(self.out, "{}", title)?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_bars(&mut self, chart: &BarChart) -> GexResult<()> {
        self.heading(&chart.title)?;

        if chart.bars.is_empty() {
            writeln!(self.out, "  (no data)")?;
            return Ok(());
        }

        let bar_rgb = self.style.bar_rgb()?;
        let grid_rgb = Rgb::from_hex(&self.style.grid_color)?;
        let text_rgb = self.style.text_rgb();

        let label_width = chart
            .bars
            .iter()
            .map(|b| b.label.len())
            .chain(std::iter::once(chart.x_label.len()))
            .max()
            .unwrap_or(0);
        let half = (self.style.width.saturating_sub(label_width + VALUE_WIDTH + 3) / 2).max(MIN_HALF);
        let max_abs = chart.max_abs();

        let header = format!("{:>width$} | {}", chart.x_label, chart.y_label, width = label_width);
        let header = self.paint(&header, text_rgb);
        writeln!(self.out, "{}", header)?;

        for bar in &chart.bars {
            let filled = if max_abs > 0.0 {
                ((bar.value.abs() / max_abs) * half as f64).round() as usize
            } else {
                0
            }
            .min(half);

            let left = if bar.value < 0.0 {
                format!("{}{}", " ".repeat(half - filled), "█".repeat(filled))
            } else {
                " ".repeat(half)
            };
            let right = if bar.value > 0.0 {
                format!("{}{}", "█".repeat(filled), " ".repeat(half - filled))
            } else {
                " ".repeat(half)
            };

            let line = format!(
                "{:>lw$} {}{}{} {:>+vw$.4}",
                bar.label,
                self.paint(&left, bar_rgb),
                self.paint("│", grid_rgb),
                self.paint(&right, bar_rgb),
                bar.value,
                lw = label_width,
                vw = VALUE_WIDTH,
            );
            writeln!(self.out, "{}", line)?;
        }

        Ok(())
    }

    fn render_surface(&mut self, chart: &SurfaceChart) -> GexResult<()> {
        self.heading(&chart.title)?;

        let grid = &chart.grid;
        if grid.strikes.is_empty() {
            writeln!(self.out, "  (no data)")?;
            return Ok(());
        }

        let text_rgb = self.style.text_rgb();
        let label_width = grid
            .strikes
            .iter()
            .map(|s| s.to_string().len())
            .chain(std::iter::once(chart.x_label.len()))
            .max()
            .unwrap_or(0);

        let max_cols = (self.style.width.saturating_sub(label_width + 1) / CELL_WIDTH).max(1);
        let shown = grid.expirations.len().min(max_cols);
        let max_abs = grid.values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

        let axis = format!("{} ({}) vs {}", chart.x_label, chart.z_label, chart.y_label);
        let axis = self.paint(&axis, text_rgb);
        writeln!(self.out, "{}", axis)?;

        let mut header = format!("{:>width$} ", "", width = label_width);
        for expiration in &grid.expirations[..shown] {
            let label = expiration.format("%m/%d/%y").to_string();
            header.push_str(&format!("{:>cw$}", label, cw = CELL_WIDTH));
        }
        let header = self.paint(&header, text_rgb);
        writeln!(self.out, "{}", header)?;

        for (i, strike) in grid.strikes.iter().enumerate() {
            let mut line = format!("{:>width$} ", strike, width = label_width);
            for j in 0..shown {
                let value = grid.values[[i, j]];
                let cell = format!("{:>cw$.1}", value, cw = CELL_WIDTH);
                if self.style.color {
                    let t = if max_abs > 0.0 { value / max_abs } else { 0.0 };
                    let bg = self.style.diverging_rgb(t)?;
                    line.push_str(&styled(&cell, Some(Rgb(0, 0, 0)), Some(bg), false));
                } else {
                    line.push_str(&cell);
                }
            }
            writeln!(self.out, "{}", line)?;
        }

        if shown < grid.expirations.len() {
            writeln!(
                self.out,
                "  (+{} later expirations not shown)",
                grid.expirations.len() - shown
            )?;
        }

        Ok(())
    }
}

/// Apply colours and weight through crossterm; the result resets itself
fn styled(text: &str, fg: Option<Rgb>, bg: Option<Rgb>, bold: bool) -> String {
    let mut style = ContentStyle::new();
    style.foreground_color = fg.map(Color::from);
    style.background_color = bg.map(Color::from);
    if bold {
        style.attributes.set(Attribute::Bold);
    }
    StyledContent::new(style, text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::{GexSurface, StrikeExposure, SurfacePoint};
    use chrono::NaiveDate;
    use crossterm::style::{SetAttribute, SetBackgroundColor, SetForegroundColor};

    fn plain_style(width: usize) -> ChartStyle {
        ChartStyle {
            color: false,
            width,
            ..Default::default()
        }
    }

    fn render_to_string<F>(style: ChartStyle, f: F) -> String
    where
        F: FnOnce(&mut TerminalRenderer<Vec<u8>>),
    {
        let mut renderer = TerminalRenderer::new(Vec::new(), style);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_bars_plain() {
        let rows = vec![
            StrikeExposure { strike: 95, gex_bn: -1.0 },
            StrikeExposure { strike: 100, gex_bn: 2.0 },
            StrikeExposure { strike: 105, gex_bn: 0.0 },
        ];
        let chart = BarChart::by_strike("TEST", &rows);

        let out = render_to_string(plain_style(50), |r| r.render_bars(&chart).unwrap());
        let lines: Vec<&str> = out.lines().collect();

        // blank, title, header, 3 bars
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "TEST GEX by strike");
        assert!(lines[2].starts_with("Strike | Gamma Exposure"));

        // label 6 wide, half = (50 - 6 - 10 - 3) / 2 = 15
        let negative = lines[3];
        assert!(negative.starts_with("    95 "));
        assert_eq!(negative.matches('█').count(), 8);
        assert!(negative.ends_with("   -1.0000"));

        let positive = lines[4];
        assert_eq!(positive.matches('█').count(), 15);
        assert!(positive.contains("│███"));
        assert!(positive.ends_with("   +2.0000"));

        assert_eq!(lines[5].matches('█').count(), 0);
    }

    #[test]
    fn test_bars_empty() {
        let chart = BarChart::by_strike("TEST", &[]);
        let out = render_to_string(plain_style(80), |r| r.render_bars(&chart).unwrap());
        assert!(out.contains("(no data)"));
    }

    #[test]
    fn test_bars_colored() {
        let rows = vec![StrikeExposure { strike: 100, gex_bn: 1.0 }];
        let chart = BarChart::by_strike("TEST", &rows);
        let out = render_to_string(ChartStyle::default(), |r| r.render_bars(&chart).unwrap());

        let bar = SetForegroundColor(Color::Rgb { r: 144, g: 62, b: 129 }).to_string();
        assert!(out.contains(&bar));
        assert!(out.contains(&SetAttribute(Attribute::Bold).to_string()));
    }

    #[test]
    fn test_surface_colored_cells() {
        let points = vec![
            SurfacePoint {
                expiration: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
                strike: 100,
                gex_mn: 4.0,
            },
            SurfacePoint {
                expiration: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
                strike: 105,
                gex_mn: -4.0,
            },
        ];
        let chart = SurfaceChart::new("TEST", &GexSurface { points });
        let out = render_to_string(ChartStyle::default(), |r| r.render_surface(&chart).unwrap());

        // seismic_r: positive is blue, negative red
        let blue = SetBackgroundColor(Color::Rgb { r: 0, g: 0, b: 255 }).to_string();
        let red = SetBackgroundColor(Color::Rgb { r: 255, g: 0, b: 0 }).to_string();
        assert!(out.contains(&blue));
        assert!(out.contains(&red));
    }

    #[test]
    fn test_surface_grid_truncates_columns() {
        let points: Vec<SurfacePoint> = (0..12)
            .map(|m| SurfacePoint {
                expiration: NaiveDate::from_ymd_opt(2026, m + 1, 15).unwrap(),
                strike: 100,
                gex_mn: m as f64,
            })
            .collect();
        let chart = SurfaceChart::new("TEST", &GexSurface { points });

        // label width 12 ("Strike Price"), (60 - 13) / 9 = 5 columns
        let out = render_to_string(plain_style(60), |r| r.render_surface(&chart).unwrap());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[1], "TEST GEX surface");
        assert!(lines[2].contains("Gamma (M$ / %)"));
        assert!(lines[3].ends_with("05/15/26"));
        assert_eq!(lines[4].trim_start(), "100       0.0      1.0      2.0      3.0      4.0");
        assert_eq!(lines[5], "  (+7 later expirations not shown)");
    }
}
