//! Backdrop geometry: ocean disc, graticule and landmass outlines.
//!
//! The pass is a pure function of the projection state and the loaded
//! landmass set; nothing from a previous pass is reused.

use std::fmt::Write as _;

use formats::LandmassSet;
use foundation::math::{LonLat, Vec3};
use tracing::debug;

use crate::clip;
use crate::config::GlobeConfig;
use crate::projection::{Projection, ScreenPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: ScreenPoint,
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub points: Vec<ScreenPoint>,
    pub closed: bool,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// SVG path data, e.g. `M10.00,20.00L30.00,40.00Z`.
    pub fn svg_data(&self) -> String {
        let mut out = String::with_capacity(self.points.len() * 16);
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(out, "{cmd}{:.2},{:.2}", p.x, p.y);
        }
        if self.closed && !self.points.is_empty() {
            out.push('Z');
        }
        out
    }
}

/// Visible outline of one landmass region.
#[derive(Debug, Clone, PartialEq)]
pub struct LandPath {
    pub key: Option<String>,
    pub paths: Vec<Path>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub ocean: Circle,
    pub graticule: Vec<Path>,
    pub land: Vec<LandPath>,
}

#[derive(Debug, Clone)]
pub struct RenderPass {
    graticule: Vec<Vec<LonLat>>,
    landmass: Option<LandmassSet>,
    densify_rad: f64,
}

impl RenderPass {
    pub fn new(config: &GlobeConfig) -> Self {
        Self {
            graticule: graticule_lines(config.graticule_step_deg, config.graticule_precision_deg),
            landmass: None,
            densify_rad: config.densify_deg.max(0.1).to_radians(),
        }
    }

    pub fn set_landmass(&mut self, landmass: LandmassSet) {
        debug!(
            regions = landmass.region_count(),
            rings = landmass.ring_count(),
            "landmass attached to render pass"
        );
        self.landmass = Some(landmass);
    }

    pub fn has_landmass(&self) -> bool {
        self.landmass.is_some()
    }

    pub fn run(&self, projection: &Projection) -> RenderFrame {
        RenderFrame {
            ocean: Circle {
                center: projection.center(),
                radius: projection.scale(),
            },
            graticule: self.graticule_paths(projection),
            land: self.land_paths(projection),
        }
    }

    fn graticule_paths(&self, projection: &Projection) -> Vec<Path> {
        let mut out = Vec::new();
        for line in &self.graticule {
            let view: Vec<Vec3> = line.iter().map(|p| projection.view_from_world(*p)).collect();
            for run in clip::clip_line(&view) {
                out.push(Path {
                    points: run.into_iter().map(|v| projection.project_view(v)).collect(),
                    closed: false,
                });
            }
        }
        out
    }

    fn land_paths(&self, projection: &Projection) -> Vec<LandPath> {
        let Some(landmass) = &self.landmass else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(landmass.regions.len());
        for region in &landmass.regions {
            let mut paths = Vec::new();
            for polygon in &region.polygons {
                let rings: Vec<Vec<Vec3>> = polygon
                    .rings
                    .iter()
                    .map(|ring| {
                        let view: Vec<Vec3> =
                            ring.iter().map(|p| projection.view_from_world(*p)).collect();
                        clip::densify(&view, self.densify_rad)
                    })
                    .collect();
                for visible in clip::clip_polygon(&rings, self.densify_rad) {
                    paths.push(Path {
                        points: visible.into_iter().map(|v| projection.project_view(v)).collect(),
                        closed: true,
                    });
                }
            }
            if !paths.is_empty() {
                out.push(LandPath {
                    key: region.key.clone(),
                    paths,
                });
            }
        }
        out
    }
}

/// Meridians and parallels every `step_deg`, sampled every `precision_deg`.
///
/// Meridians stop at ±(90 − step) except those on multiples of 90°, which run
/// pole to pole.
pub fn graticule_lines(step_deg: f64, precision_deg: f64) -> Vec<Vec<LonLat>> {
    let step = if step_deg.is_finite() && step_deg > 0.0 { step_deg } else { 10.0 };
    let precision = if precision_deg.is_finite() && precision_deg > 0.0 {
        precision_deg
    } else {
        2.0
    };
    let minor_extent = (90.0 - step).max(0.0);

    let mut lines = Vec::new();
    let mut i = 0;
    loop {
        let lon = -180.0 + step * i as f64;
        if lon >= 180.0 - 1e-9 {
            break;
        }
        let major = (lon % 90.0).abs() < 1e-9;
        let extent = if major { 90.0 } else { minor_extent };
        lines.push(
            sample(-extent, extent, precision)
                .map(|lat| LonLat::new(lon, lat))
                .collect(),
        );
        i += 1;
    }

    let mut j = 1;
    loop {
        let lat = -90.0 + step * j as f64;
        if lat >= 90.0 - 1e-9 {
            break;
        }
        lines.push(
            sample(-180.0, 180.0, precision)
                .map(|lon| LonLat::new(lon, lat))
                .collect(),
        );
        j += 1;
    }
    lines
}

fn sample(from: f64, to: f64, precision: f64) -> impl Iterator<Item = f64> {
    let n = ((to - from) / precision).ceil().max(1.0) as usize;
    (0..=n).map(move |i| from + (to - from) * i as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::{Path, RenderPass, graticule_lines};
    use crate::config::GlobeConfig;
    use crate::projection::{Projection, Rotation};
    use formats::{LandPolygon, LandmassSet, Region};
    use foundation::math::{LonLat, Vec2, Vec3};
    use pretty_assertions::assert_eq;

    /// Clockwise seen from outside, so the square itself is land.
    fn square(lon: f64, lat: f64, half: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(lon - half, lat - half),
            LonLat::new(lon - half, lat + half),
            LonLat::new(lon + half, lat + half),
            LonLat::new(lon + half, lat - half),
            LonLat::new(lon - half, lat - half),
        ]
    }

    /// Clockwise small circle of angular radius `radius_deg` around `center`.
    fn cap(center: LonLat, radius_deg: f64) -> Vec<LonLat> {
        let c = center.to_unit();
        let lon = center.lon_deg.to_radians();
        let lat = center.lat_deg.to_radians();
        let east = Vec3::new(-lon.sin(), lon.cos(), 0.0);
        let north = Vec3::new(-lat.sin() * lon.cos(), -lat.sin() * lon.sin(), lat.cos());
        let (sr, cr) = radius_deg.to_radians().sin_cos();
        let mut ring: Vec<LonLat> = (0..72)
            .map(|i| {
                let t = -(i as f64 * 5.0).to_radians();
                let dir = east.scale(t.cos()) + north.scale(t.sin());
                LonLat::from_unit(c.scale(cr) + dir.scale(sr))
            })
            .collect();
        ring.push(ring[0]);
        ring
    }

    /// Even-odd fill test over closed screen paths.
    fn filled(paths: &[Path], p: Vec2) -> bool {
        let mut inside = false;
        for path in paths {
            let pts = &path.points;
            for i in 0..pts.len() {
                let (a, b) = (pts[i], pts[(i + 1) % pts.len()]);
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                    if p.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }

    fn landmass() -> LandmassSet {
        LandmassSet::new(vec![
            Region {
                key: Some("near".to_string()),
                polygons: vec![LandPolygon {
                    rings: vec![square(100.0, 5.0, 5.0)],
                }],
            },
            Region {
                key: Some("far".to_string()),
                polygons: vec![LandPolygon {
                    rings: vec![square(-80.0, -5.0, 5.0)],
                }],
            },
            Region {
                key: Some("edge".to_string()),
                polygons: vec![LandPolygon {
                    rings: vec![square(10.0, 0.0, 10.0)],
                }],
            },
        ])
    }

    #[test]
    fn graticule_has_minor_and_major_meridians() {
        let lines = graticule_lines(10.0, 2.0);
        // 36 meridians + 17 parallels.
        assert_eq!(lines.len(), 53);
        let prime = &lines[18];
        assert_eq!(prime[0], LonLat::new(0.0, -90.0));
        let minor = &lines[19];
        assert_eq!(minor[0], LonLat::new(10.0, -80.0));
        assert_eq!(minor.last(), Some(&LonLat::new(10.0, 80.0)));
    }

    #[test]
    fn missing_landmass_yields_ocean_and_graticule_only() {
        let pass = RenderPass::new(&GlobeConfig::default());
        let frame = pass.run(&Projection::default());
        assert_eq!(frame.ocean.center, Vec2::new(300.0, 300.0));
        assert_eq!(frame.ocean.radius, 250.0);
        assert!(!frame.graticule.is_empty());
        assert!(frame.land.is_empty());
    }

    #[test]
    fn render_is_idempotent() {
        let mut pass = RenderPass::new(&GlobeConfig::default());
        pass.set_landmass(landmass());
        let mut proj = Projection::default();
        proj.set_rotation(Rotation::new(-95.0, -5.0, 0.0));
        proj.set_scale(400.0);
        assert_eq!(pass.run(&proj), pass.run(&proj));
    }

    #[test]
    fn land_is_clipped_to_the_visible_hemisphere() {
        let mut pass = RenderPass::new(&GlobeConfig::default());
        pass.set_landmass(landmass());
        let mut proj = Projection::default();
        proj.set_rotation(Rotation::centering(LonLat::new(100.0, 5.0)));
        let frame = pass.run(&proj);

        let keys: Vec<_> = frame.land.iter().map(|l| l.key.as_deref()).collect();
        assert_eq!(keys, vec![Some("near"), Some("edge")]);

        let r = proj.scale() + 1e-6;
        for land in &frame.land {
            for path in &land.paths {
                assert!(path.closed);
                for p in &path.points {
                    assert!((*p - proj.center()).length() <= r);
                }
            }
        }
    }

    #[test]
    fn land_larger_than_a_hemisphere_keeps_its_fill_inside() {
        let mut pass = RenderPass::new(&GlobeConfig::default());
        pass.set_landmass(LandmassSet::new(vec![Region {
            key: Some("cap".to_string()),
            polygons: vec![LandPolygon {
                rings: vec![cap(LonLat::new(30.0, 0.0), 100.0)],
            }],
        }]));
        let proj = Projection::default();
        assert_eq!(proj.facing(), LonLat::new(0.0, 0.0));
        let frame = pass.run(&proj);
        assert_eq!(frame.land.len(), 1);
        let paths = &frame.land[0].paths;

        // Center of the disc is 30° from the cap center.
        assert!(filled(paths, proj.center()));
        let east = proj.project(LonLat::new(80.0, 0.0)).expect("visible");
        assert!(filled(paths, east));
        // 110° from the cap center, so ocean.
        let west = proj.project(LonLat::new(-80.0, 0.0)).expect("visible");
        assert!(!filled(paths, west));
        // 90° from the cap center, across the horizon from the west edge.
        let south_west = proj.project(LonLat::new(-60.0, -60.0)).expect("visible");
        assert!(filled(paths, south_west));
    }

    #[test]
    fn svg_data_closes_rings() {
        let path = Path {
            points: vec![Vec2::new(1.0, 2.0), Vec2::new(3.5, 4.25)],
            closed: true,
        };
        assert_eq!(path.svg_data(), "M1.00,2.00L3.50,4.25Z");
    }
}
