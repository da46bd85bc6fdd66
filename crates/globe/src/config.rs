use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Drawing surface in pixels; the globe is centered in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Tunables for the globe widget.
///
/// Deserializes from partial JSON: any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    // ── Projection ──────────────────────────────────────────
    pub viewport: Viewport,
    /// Globe radius in pixels at zoom 1.
    pub base_scale: f64,
    /// Lower zoom bound as a multiple of `base_scale`.
    pub min_zoom: f64,
    /// Upper zoom bound as a multiple of `base_scale`.
    pub max_zoom: f64,
    /// Markers farther than `π / visibility_divisor` from the facing point are hidden.
    pub visibility_divisor: f64,
    /// Keep the vertical rotation within ±90° so the globe never flips over a pole.
    pub clamp_latitude: bool,

    // ── Interaction ─────────────────────────────────────────
    /// Degrees of rotation per pixel of drag at `scale == drag_sensitivity`.
    pub drag_sensitivity: f64,
    /// Exponent applied per wheel delta unit.
    pub zoom_speed: f64,
    /// Pointer travel (px) below which a press/release counts as a click.
    pub click_threshold_px: f64,
    /// Extra hit radius around markers, in pixels.
    pub pick_tolerance_px: f64,

    // ── Animation ───────────────────────────────────────────
    pub tick_rate_hz: f64,
    /// Longitude advanced per idle tick, in degrees.
    pub autopilot_step_deg: f64,
    pub transition_duration_s: f64,

    // ── Rendering ───────────────────────────────────────────
    pub graticule_step_deg: f64,
    /// Sampling interval along graticule lines.
    pub graticule_precision_deg: f64,
    /// Longest edge kept as a straight chord before land rings are densified.
    pub densify_deg: f64,
    pub marker_radius_px: f64,
    pub active_marker_radius_px: f64,
    pub marker_color: String,
    pub active_marker_color: String,
    /// Label font size at zoom 1.
    pub label_font_px: f64,
    /// Vertical distance from the active marker to the overlay badge anchor.
    pub overlay_offset_px: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            base_scale: 250.0,
            min_zoom: 0.5,
            max_zoom: 10.0,
            visibility_divisor: 1.95,
            clamp_latitude: true,

            drag_sensitivity: 75.0,
            zoom_speed: 0.0015,
            click_threshold_px: 3.0,
            pick_tolerance_px: 4.0,

            tick_rate_hz: 60.0,
            autopilot_step_deg: 0.1,
            transition_duration_s: 1.1,

            graticule_step_deg: 10.0,
            graticule_precision_deg: 2.0,
            densify_deg: 2.0,
            marker_radius_px: 4.0,
            active_marker_radius_px: 8.0,
            marker_color: "#22c55e".to_string(),
            active_marker_color: "#facc15".to_string(),
            label_font_px: 12.0,
            overlay_offset_px: 60.0,
        }
    }
}

impl GlobeConfig {
    pub fn min_scale(&self) -> f64 {
        self.base_scale * self.min_zoom
    }

    pub fn max_scale(&self) -> f64 {
        self.base_scale * self.max_zoom
    }

    /// Angular radius (radians) of the region in which markers are shown.
    pub fn visibility_threshold_rad(&self) -> f64 {
        let divisor = if self.visibility_divisor.is_finite() && self.visibility_divisor > 0.0 {
            self.visibility_divisor
        } else {
            2.0
        };
        std::f64::consts::PI / divisor
    }
}
