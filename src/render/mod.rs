//! Presentation layer
//!
//! Aggregation results are turned into chart specifications and handed to a
//! [`Renderer`]. Styling is an explicit [`ChartStyle`] value owned by the
//! renderer; nothing here feeds back into the computation.

pub mod chart;
pub mod style;
pub mod terminal;

pub use chart::*;
pub use style::*;
pub use terminal::*;

use crate::core::GexResult;

/// Output sink for charts
pub trait Renderer {
    fn render_bars(&mut self, chart: &BarChart) -> GexResult<()>;
    fn render_surface(&mut self, chart: &SurfaceChart) -> GexResult<()>;
}
