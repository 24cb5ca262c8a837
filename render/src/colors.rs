//! Chart palette
use pullgraph_core::ChartConfig;
use tiny_skia::Color;

#[inline]
pub fn white() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

#[inline]
pub fn black() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

/// Light grey used for the vertical grid lines
#[inline]
pub fn grid() -> Color {
    Color::from_rgba8(176, 176, 176, 255)
}

/// Border around the legend box
#[inline]
pub fn legend_border() -> Color {
    Color::from_rgba8(204, 204, 204, 255)
}

/// Convert a configured `[r, g, b, a]` colour, scaling its alpha by `opacity`
pub fn with_opacity(rgba: [u8; 4], opacity: f32) -> Color {
    let [r, g, b, a] = rgba;
    let alpha = (f32::from(a) * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::from_rgba8(r, g, b, alpha)
}

/// Solid marker colour for a pull that ended in `phase`
pub fn phase_color(config: &ChartConfig, phase: u8) -> Color {
    with_opacity(config.color_for(phase), 1.0)
}
