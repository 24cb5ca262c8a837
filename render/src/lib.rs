//! PNG progression chart for recorded pulls
pub mod chart;
pub mod colors;
pub mod error;
pub mod renderer;

pub use chart::{ChartRenderer, PlotArea};
pub use error::RenderError;
pub use renderer::Renderer;
