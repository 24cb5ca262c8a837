//! Scatter chart of pull durations by pull count
//!
//! Layout follows the classic progression chart: pulls along the x axis,
//! duration in minutes up the y axis, and one translucent band per phase
//! marking the time at which that phase ends.
use std::path::Path;

use pullgraph_core::{ChartConfig, PullRecord};
use tiny_skia::Pixmap;

use crate::colors;
use crate::error::RenderError;
use crate::renderer::Renderer;

const MARGIN_LEFT: f32 = 90.0;
const MARGIN_RIGHT: f32 = 30.0;
const MARGIN_TOP: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 80.0;

const TICK_FONT: f32 = 16.0;
const LABEL_FONT: f32 = 20.0;
const LEGEND_FONT: f32 = 16.0;

const TICK_LENGTH: f32 = 6.0;
const LEGEND_PADDING: f32 = 10.0;
const LEGEND_SWATCH: f32 = 24.0;
const LEGEND_ROW_SPACING: f32 = 6.0;

/// Horizontal headroom past the last pull
const X_HEADROOM: f32 = 1.01;

/// Pixel mapping for the data area of the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Largest ordinal on the x axis
    pub x_max: f32,
    /// Largest duration on the y axis, in seconds
    pub y_max: f32,
}

impl PlotArea {
    pub fn new(config: &ChartConfig, pull_count: usize) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (config.width as f32 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (config.height as f32 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            x_max: pull_count.max(1) as f32 * X_HEADROOM,
            y_max: config.y_max_secs.max(1) as f32,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn x_to_px(&self, ordinal: f32) -> f32 {
        self.left + ordinal / self.x_max * self.width
    }

    pub fn y_to_px(&self, secs: f32) -> f32 {
        self.bottom() - secs / self.y_max * self.height
    }

    /// Whether a data point lies inside the axis limits
    pub fn contains(&self, ordinal: f32, secs: f32) -> bool {
        (0.0..=self.x_max).contains(&ordinal) && (0.0..=self.y_max).contains(&secs)
    }
}

pub struct ChartRenderer {
    renderer: Renderer,
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            renderer: Renderer::new(),
            config,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Draw the chart for `pulls` into a new pixmap
    pub fn render(&mut self, pulls: &[PullRecord]) -> Result<Pixmap, RenderError> {
        let (width, height) = (self.config.width, self.config.height);
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidCanvas { width, height })?;
        pixmap.fill(colors::white());

        let area = PlotArea::new(&self.config, pulls.len());

        self.draw_bands(&mut pixmap, &area);
        self.draw_grid(&mut pixmap, &area);
        self.draw_points(&mut pixmap, &area, pulls);
        self.draw_axes(&mut pixmap, &area);
        self.draw_legend(&mut pixmap, &area);

        Ok(pixmap)
    }

    /// Render and write the chart as PNG, creating the parent directory if needed
    pub fn save_png(&mut self, pulls: &[PullRecord], path: &Path) -> Result<(), RenderError> {
        let pixmap = self.render(pulls)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        pixmap
            .save_png(path)
            .map_err(|source| RenderError::WritePng {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(path = %path.display(), pulls = pulls.len(), "Chart written");
        Ok(())
    }

    fn draw_bands(&self, pixmap: &mut Pixmap, area: &PlotArea) {
        for (phase, lower, upper) in self.config.bands() {
            let lower = (lower as f32).min(area.y_max);
            let upper = (upper as f32).min(area.y_max);
            if upper <= lower {
                continue;
            }

            let alpha = if phase == 1 {
                self.config.first_band_alpha
            } else {
                self.config.band_alpha
            };
            let color = colors::with_opacity(self.config.color_for(phase), alpha);

            let top = area.y_to_px(upper);
            let bottom = area.y_to_px(lower);
            self.renderer
                .fill_rect(pixmap, area.left, top, area.width, bottom - top, color);
        }
    }

    fn draw_grid(&self, pixmap: &mut Pixmap, area: &PlotArea) {
        for tick in x_ticks(self.config.x_tick_step, area.x_max) {
            let x = area.x_to_px(tick as f32);
            self.renderer
                .stroke_line(pixmap, (x, area.top), (x, area.bottom()), 1.0, colors::grid());
        }
    }

    fn draw_points(&self, pixmap: &mut Pixmap, area: &PlotArea, pulls: &[PullRecord]) {
        let mut clipped = 0usize;
        for pull in pulls {
            let x = pull.ordinal as f32;
            let secs = pull.duration_secs() as f32;
            if !area.contains(x, secs) {
                clipped += 1;
                continue;
            }

            let color = colors::phase_color(&self.config, pull.final_phase);
            self.renderer.fill_circle(
                pixmap,
                area.x_to_px(x),
                area.y_to_px(secs),
                self.config.point_radius,
                color,
            );
        }

        if clipped > 0 {
            tracing::debug!(clipped, "Pulls outside the chart limits were not drawn");
        }
    }

    fn draw_axes(&mut self, pixmap: &mut Pixmap, area: &PlotArea) {
        let black = colors::black();
        self.renderer.stroke_rect(
            pixmap,
            area.left,
            area.top,
            area.width,
            area.height,
            1.0,
            black,
        );

        for tick in x_ticks(self.config.x_tick_step, area.x_max) {
            let x = area.x_to_px(tick as f32);
            self.renderer.stroke_line(
                pixmap,
                (x, area.bottom()),
                (x, area.bottom() + TICK_LENGTH),
                1.0,
                black,
            );

            let label = tick.to_string();
            let (w, h) = self.renderer.measure_text(&label, TICK_FONT);
            self.renderer.draw_text(
                pixmap,
                &label,
                x - w / 2.0,
                area.bottom() + TICK_LENGTH + h,
                TICK_FONT,
                black,
            );
        }

        let y_step = self.config.y_tick_step_secs.max(1);
        let y_limit = self.config.y_max_secs;
        for secs in (0..=y_limit).step_by(y_step as usize) {
            let y = area.y_to_px(secs as f32);
            self.renderer.stroke_line(
                pixmap,
                (area.left - TICK_LENGTH, y),
                (area.left, y),
                1.0,
                black,
            );

            let label = minutes_label(secs);
            let (w, h) = self.renderer.measure_text(&label, TICK_FONT);
            self.renderer.draw_text(
                pixmap,
                &label,
                area.left - TICK_LENGTH - 4.0 - w,
                y + h / 3.0,
                TICK_FONT,
                black,
            );
        }

        let (w, _) = self.renderer.measure_text("Pull Count", LABEL_FONT);
        self.renderer.draw_text(
            pixmap,
            "Pull Count",
            area.left + (area.width - w) / 2.0,
            self.config.height as f32 - LABEL_FONT,
            LABEL_FONT,
            black,
        );

        self.renderer.draw_text(
            pixmap,
            "Minutes",
            LABEL_FONT / 2.0,
            area.top + area.height / 2.0,
            LABEL_FONT,
            black,
        );
    }

    /// Legend box in the top-left corner, last phase first
    fn draw_legend(&mut self, pixmap: &mut Pixmap, area: &PlotArea) {
        if self.config.phases.is_empty() {
            return;
        }

        let names: Vec<String> = self.config.phases.iter().map(|p| p.name.clone()).collect();
        let mut text_width = 0.0f32;
        let mut row_height = LEGEND_SWATCH;
        for name in &names {
            let (w, h) = self.renderer.measure_text(name, LEGEND_FONT);
            text_width = text_width.max(w);
            row_height = row_height.max(h);
        }

        let rows = names.len() as f32;
        let box_w = LEGEND_PADDING * 3.0 + LEGEND_SWATCH + text_width;
        let box_h = LEGEND_PADDING * 2.0 + rows * row_height + (rows - 1.0) * LEGEND_ROW_SPACING;
        let box_x = area.left + LEGEND_PADDING;
        let box_y = area.top + LEGEND_PADDING;

        self.renderer
            .fill_rect(pixmap, box_x, box_y, box_w, box_h, colors::white());
        self.renderer.stroke_rect(
            pixmap,
            box_x,
            box_y,
            box_w,
            box_h,
            1.0,
            colors::legend_border(),
        );

        let mut y = box_y + LEGEND_PADDING;
        for (idx, name) in names.iter().enumerate().rev() {
            let phase = idx as u8 + 1;
            let swatch = colors::with_opacity(self.config.color_for(phase), self.config.legend_alpha);
            let swatch_y = y + (row_height - LEGEND_SWATCH) / 2.0;
            self.renderer.fill_rect(
                pixmap,
                box_x + LEGEND_PADDING,
                swatch_y,
                LEGEND_SWATCH,
                LEGEND_SWATCH,
                swatch,
            );

            self.renderer.draw_text(
                pixmap,
                name,
                box_x + LEGEND_PADDING * 2.0 + LEGEND_SWATCH,
                y + row_height * 0.75,
                LEGEND_FONT,
                colors::black(),
            );

            y += row_height + LEGEND_ROW_SPACING;
        }
    }
}

/// Tick positions `0, step, 2*step, ...` up to `x_max`
fn x_ticks(step: u32, x_max: f32) -> impl Iterator<Item = u32> {
    let step = step.max(1);
    (0..)
        .map(move |i: u32| i * step)
        .take_while(move |tick| *tick as f32 <= x_max)
}

/// Axis label for a seconds tick, in whole minutes where possible
fn minutes_label(secs: u32) -> String {
    if secs % 60 == 0 {
        (secs / 60).to_string()
    } else {
        format!("{:.1}", secs as f32 / 60.0)
    }
}
