//! Orthographic projection with a three-axis rotation.
//!
//! Rotation follows the usual web-mapping convention: the sphere is first
//! spun about the polar axis by `lambda`, then tilted by `phi`, then rolled
//! by `gamma` (all degrees). A rotation of `(-lon, -lat)` therefore brings
//! `(lon, lat)` to the center of the disc.
//!
//! View space is right-handed with `x` to the screen right, `y` up and `z`
//! towards the viewer; the visible hemisphere is `z >= 0`.

use foundation::math::{LonLat, Vec2, Vec3, angular_distance, wrap_degrees};
use serde::{Deserialize, Serialize};

use crate::config::GlobeConfig;

/// Screen position in pixels, `y` growing downwards.
pub type ScreenPoint = Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
    pub gamma: f64,
}

impl Rotation {
    pub fn new(lambda: f64, phi: f64, gamma: f64) -> Self {
        Self { lambda, phi, gamma }
    }

    /// Rotation that centers `p` on the disc.
    pub fn centering(p: LonLat) -> Self {
        Self::new(wrap_degrees(-p.lon_deg), -p.lat_deg, 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    rotation: Rotation,
    scale: f64,
    base_scale: f64,
    min_scale: f64,
    max_scale: f64,
    center: Vec2,
    visibility_threshold: f64,
    clamp_latitude: bool,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(&GlobeConfig::default())
    }
}

impl Projection {
    pub fn new(config: &GlobeConfig) -> Self {
        let min_scale = config.min_scale().min(config.max_scale());
        let max_scale = config.max_scale().max(min_scale);
        Self {
            rotation: Rotation::default(),
            scale: config.base_scale.clamp(min_scale, max_scale),
            base_scale: config.base_scale,
            min_scale,
            max_scale,
            center: config.viewport.center(),
            visibility_threshold: config.visibility_threshold_rad(),
            clamp_latitude: config.clamp_latitude,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn scale_bounds(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Current zoom as a multiple of the base scale.
    pub fn zoom(&self) -> f64 {
        self.scale / self.base_scale
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Geographic point at the center of the disc.
    pub fn facing(&self) -> LonLat {
        LonLat::new(wrap_degrees(-self.rotation.lambda), -self.rotation.phi)
    }

    /// Sets the rotation; longitude is wrapped into `[-180, 180)` and latitude
    /// clamped when configured. Non-finite components are ignored.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        if rotation.lambda.is_finite() {
            self.rotation.lambda = wrap_degrees(rotation.lambda);
        }
        if rotation.phi.is_finite() {
            self.rotation.phi = if self.clamp_latitude {
                rotation.phi.clamp(-90.0, 90.0)
            } else {
                wrap_degrees(rotation.phi)
            };
        }
        if rotation.gamma.is_finite() {
            self.rotation.gamma = wrap_degrees(rotation.gamma);
        }
    }

    pub fn rotate_by(&mut self, d_lambda: f64, d_phi: f64) {
        let r = self.rotation;
        self.set_rotation(Rotation::new(r.lambda + d_lambda, r.phi + d_phi, r.gamma));
    }

    /// Sets the scale clamped to the configured zoom bounds and returns the value applied.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
        self.scale
    }

    pub fn is_visible(&self, p: LonLat) -> bool {
        angular_distance(p, self.facing()) <= self.visibility_threshold
    }

    /// Screen position of `p`, or `None` when it lies beyond the visibility threshold.
    pub fn project(&self, p: LonLat) -> Option<ScreenPoint> {
        if !p.lon_deg.is_finite() || !p.lat_deg.is_finite() || !self.is_visible(p) {
            return None;
        }
        Some(self.project_view(self.view_from_world(p)))
    }

    /// Screen position of a view-space direction; ignores depth.
    pub fn project_view(&self, v: Vec3) -> ScreenPoint {
        Vec2::new(
            self.center.x + self.scale * v.x,
            self.center.y - self.scale * v.y,
        )
    }

    /// Geographic point under `screen`, or `None` outside the disc.
    pub fn invert(&self, screen: ScreenPoint) -> Option<LonLat> {
        let x = (screen.x - self.center.x) / self.scale;
        let y = (self.center.y - screen.y) / self.scale;
        let r2 = x * x + y * y;
        if !r2.is_finite() || r2 > 1.0 {
            return None;
        }
        Some(self.world_from_view(Vec3::new(x, y, (1.0 - r2).sqrt())))
    }

    /// Rotates a geographic point into view space.
    pub fn view_from_world(&self, p: LonLat) -> Vec3 {
        self.view_from_unit(p.to_unit())
    }

    pub fn view_from_unit(&self, w: Vec3) -> Vec3 {
        let (sl, cl) = self.rotation.lambda.to_radians().sin_cos();
        let (sp, cp) = self.rotation.phi.to_radians().sin_cos();
        let (sg, cg) = self.rotation.gamma.to_radians().sin_cos();

        let x1 = w.x * cl - w.y * sl;
        let y1 = w.x * sl + w.y * cl;
        let z1 = w.z;

        let k = z1 * cp + x1 * sp;
        let depth = x1 * cp - z1 * sp;
        let right = y1 * cg - k * sg;
        let up = k * cg + y1 * sg;
        Vec3::new(right, up, depth)
    }

    pub fn world_from_view(&self, v: Vec3) -> LonLat {
        let (sl, cl) = self.rotation.lambda.to_radians().sin_cos();
        let (sp, cp) = self.rotation.phi.to_radians().sin_cos();
        let (sg, cg) = self.rotation.gamma.to_radians().sin_cos();

        let y1 = v.x * cg + v.y * sg;
        let k = v.y * cg - v.x * sg;
        let x1 = v.z * cp + k * sp;
        let z1 = k * cp - v.z * sp;

        let x = x1 * cl + y1 * sl;
        let y = y1 * cl - x1 * sl;
        LonLat::from_unit(Vec3::new(x, y, z1))
    }
}
