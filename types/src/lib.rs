//! Shared configuration types for pullgraph
//!
//! This crate contains the serializable configuration shared between the
//! segmentation core (`pullgraph-core`), the chart renderer (`pullgraph-render`)
//! and the command line front end.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Color Type
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color as [r, g, b, a] bytes
pub type Color = [u8; 4];

pub mod phase_colors {
    use super::Color;

    pub const SILVER: Color = [192, 192, 192, 255];
    pub const GREEN: Color = [0, 128, 0, 255];
    pub const BLUE: Color = [0, 0, 255, 255];
    pub const CORNFLOWER_BLUE: Color = [100, 149, 237, 255];
    pub const VIOLET: Color = [238, 130, 238, 255];
    pub const PURPLE: Color = [128, 0, 128, 255];
    pub const ORANGE: Color = [255, 165, 0, 255];
}

// ─────────────────────────────────────────────────────────────────────────────
// Chart Config
// ─────────────────────────────────────────────────────────────────────────────

/// Presentation data for one encounter phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStyle {
    /// Legend label
    pub name: String,
    pub color: Color,
    /// Upper edge of this phase's background band, in seconds
    pub cutoff_secs: u32,
}

impl PhaseStyle {
    pub fn new(name: &str, color: Color, cutoff_secs: u32) -> Self {
        Self {
            name: name.to_string(),
            color,
            cutoff_secs,
        }
    }
}

/// Layout and lookup tables for the pull scatter chart.
///
/// `phases[0]` describes phase 1, `phases[1]` phase 2 and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Spacing of x axis ticks, in pulls
    #[serde(default = "default_x_tick_step")]
    pub x_tick_step: u32,
    /// Spacing of y axis ticks, in seconds (labelled in minutes)
    #[serde(default = "default_y_tick_step_secs")]
    pub y_tick_step_secs: u32,
    #[serde(default = "default_y_max_secs")]
    pub y_max_secs: u32,
    #[serde(default = "default_point_radius")]
    pub point_radius: f32,
    #[serde(default = "default_first_band_alpha")]
    pub first_band_alpha: f32,
    #[serde(default = "default_band_alpha")]
    pub band_alpha: f32,
    #[serde(default = "default_legend_alpha")]
    pub legend_alpha: f32,
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseStyle>,
}

fn default_width() -> u32 {
    1800
}
fn default_height() -> u32 {
    1000
}
fn default_x_tick_step() -> u32 {
    100
}
fn default_y_tick_step_secs() -> u32 {
    120
}
fn default_y_max_secs() -> u32 {
    1080
}
fn default_point_radius() -> f32 {
    3.5
}
fn default_first_band_alpha() -> f32 {
    0.2
}
fn default_band_alpha() -> f32 {
    0.15
}
fn default_legend_alpha() -> f32 {
    0.4
}

fn default_phases() -> Vec<PhaseStyle> {
    use phase_colors::*;
    vec![
        PhaseStyle::new("King Thordan", SILVER, 205),
        PhaseStyle::new("Nidhogg", GREEN, 345),
        PhaseStyle::new("Eyes", BLUE, 440),
        PhaseStyle::new("Rewind", CORNFLOWER_BLUE, 482),
        PhaseStyle::new("King Thordan II", VIOLET, 685),
        PhaseStyle::new("Double Dragons", PURPLE, 900),
        PhaseStyle::new("The Dragon King", ORANGE, 1080),
    ]
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            x_tick_step: default_x_tick_step(),
            y_tick_step_secs: default_y_tick_step_secs(),
            y_max_secs: default_y_max_secs(),
            point_radius: default_point_radius(),
            first_band_alpha: default_first_band_alpha(),
            band_alpha: default_band_alpha(),
            legend_alpha: default_legend_alpha(),
            phases: default_phases(),
        }
    }
}

impl ChartConfig {
    /// Style for a 1-based phase number
    pub fn phase(&self, phase: u8) -> Option<&PhaseStyle> {
        let idx = usize::from(phase).checked_sub(1)?;
        self.phases.get(idx)
    }

    /// Colour for a phase, falling back to the first phase's colour
    pub fn color_for(&self, phase: u8) -> Color {
        self.phase(phase)
            .or_else(|| self.phases.first())
            .map(|p| p.color)
            .unwrap_or(phase_colors::SILVER)
    }

    /// Background bands as `(phase, lower_secs, upper_secs)`.
    ///
    /// Each band starts where the previous phase's cutoff ended.
    pub fn bands(&self) -> Vec<(u8, u32, u32)> {
        let mut lower = 0;
        let mut bands = Vec::with_capacity(self.phases.len());
        for (idx, style) in self.phases.iter().enumerate() {
            bands.push((idx as u8 + 1, lower, style.cutoff_secs));
            lower = style.cutoff_secs;
        }
        bands
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_directory")]
    pub log_directory: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Continue with the next file when one cannot be read or decoded
    #[serde(default)]
    pub skip_unreadable_files: bool,
    #[serde(default)]
    pub chart: ChartConfig,
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_output_path() -> String {
    "graph.png".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_log_directory(default_log_directory())
    }
}

impl AppConfig {
    /// Create a new AppConfig with the specified log directory.
    /// Other fields use their default values.
    pub fn with_log_directory(log_directory: String) -> Self {
        Self {
            log_directory,
            output_path: default_output_path(),
            skip_unreadable_files: false,
            chart: ChartConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chart_has_seven_phases() {
        let chart = ChartConfig::default();
        assert_eq!(chart.phases.len(), 7);
        assert_eq!(chart.phase(1).unwrap().name, "King Thordan");
        assert_eq!(chart.phase(7).unwrap().name, "The Dragon King");
        assert!(chart.phase(0).is_none());
        assert!(chart.phase(8).is_none());
    }

    #[test]
    fn unknown_phase_uses_first_color() {
        let chart = ChartConfig::default();
        assert_eq!(chart.color_for(2), phase_colors::GREEN);
        assert_eq!(chart.color_for(9), phase_colors::SILVER);
    }

    #[test]
    fn bands_are_contiguous() {
        let bands = ChartConfig::default().bands();
        assert_eq!(bands[0], (1, 0, 205));
        assert_eq!(bands[1], (2, 205, 345));
        assert_eq!(bands[6], (7, 900, 1080));
        for pair in bands.windows(2) {
            assert_eq!(pair[0].2, pair[1].1);
        }
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            log_directory = "/tmp/act"

            [chart]
            width = 900
            "#,
        )
        .unwrap();

        assert_eq!(config.log_directory, "/tmp/act");
        assert_eq!(config.output_path, "graph.png");
        assert!(!config.skip_unreadable_files);
        assert_eq!(config.chart.width, 900);
        assert_eq!(config.chart.height, 1000);
        assert_eq!(config.chart.phases.len(), 7);
    }
}
