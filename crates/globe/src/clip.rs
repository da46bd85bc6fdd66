//! Hemisphere clipping of view-space paths.
//!
//! Inputs are unit vectors in view space; the visible half is `z >= 0`.
//! Edges are treated as chords, so callers densify long edges first.

use std::f64::consts::TAU;

use foundation::math::{Vec3, angle_between, slerp, stable_total_cmp_f64};

/// Inserts intermediate points so that no edge spans more than `max_step_rad`.
pub fn densify(points: &[Vec3], max_step_rad: f64) -> Vec<Vec3> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if max_step_rad.is_nan() || max_step_rad <= 0.0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(first);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let angle = angle_between(a, b);
        let steps = (angle / max_step_rad).ceil() as usize;
        for i in 1..steps {
            out.push(slerp(a, b, i as f64 / steps as f64));
        }
        out.push(b);
    }
    out
}

/// Clips an open polyline, returning the visible runs in order.
pub fn clip_line(points: &[Vec3]) -> Vec<Vec<Vec3>> {
    let mut runs = Vec::new();
    let mut current: Vec<Vec3> = Vec::new();

    for (i, &p) in points.iter().enumerate() {
        let inside = p.z >= 0.0;
        if i > 0 {
            let prev = points[i - 1];
            let prev_inside = prev.z >= 0.0;
            if prev_inside && !inside {
                current.push(horizon_crossing(prev, p));
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            } else if !prev_inside && inside {
                current.push(horizon_crossing(prev, p));
            }
        }
        if inside {
            current.push(p);
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

/// Clips one polygon (exterior ring plus holes) to the visible hemisphere.
///
/// Rings follow the world-atlas winding: land lies to the right of travel,
/// seen from outside the sphere. A ring may repeat its first point at the end.
/// Visible runs of crossing rings are rejoined along the horizon, clockwise on
/// screen, from each exit to the nearest entry. The result holds closed rings
/// without a repeated end point and is empty when no land is visible.
pub fn clip_polygon(rings: &[Vec<Vec3>], rim_step_rad: f64) -> Vec<Vec<Vec3>> {
    let mut out = Vec::new();
    let mut runs = Vec::new();
    let mut rim_is_land = true;
    let mut any_ring = false;

    for ring in rings {
        let pts = open_ring(ring);
        if pts.len() < 3 {
            continue;
        }
        any_ring = true;
        let visible = pts.iter().filter(|p| p.z >= 0.0).count();
        if visible == pts.len() {
            // Counter-clockwise on screen: the land is outside the ring.
            rim_is_land &= planar_area(pts) > 0.0;
            out.push(pts.to_vec());
        } else if visible == 0 {
            // Seen through the globe the winding is mirrored.
            rim_is_land &= planar_area(pts) < 0.0;
        } else {
            split_runs(pts, &mut runs);
        }
    }

    if !runs.is_empty() {
        out.extend(rejoin(&runs, rim_step_rad));
    } else if any_ring && rim_is_land {
        out.push(rim_circle(rim_step_rad));
    }
    out
}

fn open_ring(ring: &[Vec3]) -> &[Vec3] {
    if ring.len() >= 2 && ring.first() == ring.last() {
        &ring[..ring.len() - 1]
    } else {
        ring
    }
}

/// Twice the signed area of the ring's screen-plane footprint; positive when
/// counter-clockwise.
fn planar_area(pts: &[Vec3]) -> f64 {
    let n = pts.len();
    (0..n)
        .map(|i| {
            let (a, b) = (pts[i], pts[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum()
}

/// Appends the visible runs of a ring that crosses the horizon. Each run
/// starts at an entry point and ends at an exit point on the rim.
fn split_runs(pts: &[Vec3], runs: &mut Vec<Vec<Vec3>>) {
    let n = pts.len();
    let Some(start) = pts.iter().position(|p| p.z < 0.0) else {
        return;
    };
    let mut current: Option<Vec<Vec3>> = None;
    for i in 0..n {
        let a = pts[(start + i) % n];
        let b = pts[(start + i + 1) % n];
        match (a.z >= 0.0, b.z >= 0.0) {
            (false, true) => current = Some(vec![horizon_crossing(a, b), b]),
            (true, true) => {
                if let Some(run) = current.as_mut() {
                    run.push(b);
                }
            }
            (true, false) => {
                if let Some(mut run) = current.take() {
                    run.push(horizon_crossing(a, b));
                    runs.push(run);
                }
            }
            (false, false) => {}
        }
    }
}

/// Links runs into closed rings: from each exit, walk the rim clockwise to
/// the first entry.
fn rejoin(runs: &[Vec<Vec3>], rim_step_rad: f64) -> Vec<Vec<Vec3>> {
    let entries: Vec<f64> = runs.iter().map(|r| rim_angle(r[0])).collect();
    let mut used = vec![false; runs.len()];
    let mut out = Vec::new();

    for start in 0..runs.len() {
        if used[start] {
            continue;
        }
        let mut ring = Vec::new();
        let mut k = start;
        loop {
            used[k] = true;
            ring.extend_from_slice(&runs[k]);
            let exit = rim_angle(runs[k][runs[k].len() - 1]);
            let next = (0..runs.len())
                .filter(|&j| !used[j] || j == start)
                .min_by(|&a, &b| {
                    stable_total_cmp_f64(
                        clockwise_gap(exit, entries[a]),
                        clockwise_gap(exit, entries[b]),
                    )
                })
                .unwrap_or(start);
            ring.extend(rim_arc(exit, entries[next], rim_step_rad));
            if next == start {
                break;
            }
            k = next;
        }
        if ring.len() >= 3 {
            out.push(ring);
        }
    }
    out
}

fn rim_angle(p: Vec3) -> f64 {
    p.y.atan2(p.x)
}

/// Clockwise angular distance from `from` to `to`, in `[0, 2π)`.
fn clockwise_gap(from: f64, to: f64) -> f64 {
    (from - to).rem_euclid(TAU)
}

/// Point where the chord `a → b` meets the horizon plane, pushed onto the rim.
fn horizon_crossing(a: Vec3, b: Vec3) -> Vec3 {
    let denom = a.z - b.z;
    let t = if denom.abs() < f64::EPSILON {
        0.5
    } else {
        (a.z / denom).clamp(0.0, 1.0)
    };
    let p = a.lerp(b, t);
    let rim = Vec3::new(p.x, p.y, 0.0);
    if rim.length() < 1e-12 {
        // Chord passes through the view axis.
        return Vec3::new(a.x, a.y, 0.0).normalize();
    }
    rim.normalize()
}

/// Points along the horizon strictly between angles `from` and `to`, clockwise.
fn rim_arc(from: f64, to: f64, step_rad: f64) -> Vec<Vec3> {
    let gap = clockwise_gap(from, to);
    let step = if step_rad > 0.0 { step_rad } else { 0.05 };
    let steps = (gap / step).ceil() as usize;
    (1..steps)
        .map(|i| {
            let angle = from - gap * i as f64 / steps as f64;
            Vec3::new(angle.cos(), angle.sin(), 0.0)
        })
        .collect()
}

/// The whole horizon, clockwise.
fn rim_circle(step_rad: f64) -> Vec<Vec3> {
    let step = if step_rad > 0.0 { step_rad } else { 0.05 };
    let steps = ((TAU / step).ceil() as usize).max(8);
    (0..steps)
        .map(|i| {
            let angle = -TAU * i as f64 / steps as f64;
            Vec3::new(angle.cos(), angle.sin(), 0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{clip_line, clip_polygon, densify};
    use foundation::math::{Vec3, angle_between};

    fn unit(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3::new(x, y, z).normalize()
    }

    #[test]
    fn densify_bounds_edge_length() {
        let a = unit(1.0, 0.0, 0.0);
        let b = unit(0.0, 1.0, 0.0);
        let step = 2f64.to_radians();
        let pts = densify(&[a, b], step);
        assert!(pts.len() >= 46 && pts.len() <= 47);
        for pair in pts.windows(2) {
            assert!(angle_between(pair[0], pair[1]) <= step + 1e-12);
        }
        assert_eq!(pts.last(), Some(&b));
    }

    #[test]
    fn fully_visible_ring_is_unchanged() {
        // Clockwise on screen: land inside.
        let ring = vec![
            unit(0.1, 0.0, 1.0),
            unit(0.0, -0.1, 1.0),
            unit(-0.1, 0.0, 1.0),
            unit(0.1, 0.0, 1.0),
        ];
        let clipped = clip_polygon(&[ring.clone()], 0.1);
        assert_eq!(clipped, vec![ring[..3].to_vec()]);
    }

    #[test]
    fn visible_ring_wound_the_other_way_keeps_the_rest_of_the_disc() {
        let ring = vec![
            unit(0.1, 0.0, 1.0),
            unit(0.0, 0.1, 1.0),
            unit(-0.1, 0.0, 1.0),
        ];
        let clipped = clip_polygon(&[ring.clone()], 0.1);
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[0], ring);
        assert!(clipped[1].iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn hidden_ring_is_dropped() {
        let ring = vec![
            unit(0.1, 0.0, -1.0),
            unit(0.0, 0.1, -1.0),
            unit(-0.1, 0.0, -1.0),
        ];
        assert!(clip_polygon(&[ring], 0.1).is_empty());
    }

    #[test]
    fn hidden_ring_around_the_front_covers_the_disc() {
        // Land is everything except a small patch on the far side.
        let ring = vec![
            unit(-0.1, 0.0, -1.0),
            unit(0.0, 0.1, -1.0),
            unit(0.1, 0.0, -1.0),
        ];
        let clipped = clip_polygon(&[ring], 0.1);
        assert_eq!(clipped.len(), 1);
        assert!(clipped[0].len() >= 60);
        for p in &clipped[0] {
            assert_eq!(p.z, 0.0);
            assert!((p.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn straddling_ring_is_closed_on_the_horizon() {
        // Square centred on the horizon at +x; half of it is behind the globe.
        let ring = vec![
            unit(1.0, -0.2, 0.2),
            unit(1.0, 0.2, 0.2),
            unit(1.0, 0.2, -0.2),
            unit(1.0, -0.2, -0.2),
        ];
        let clipped = clip_polygon(&[ring], 0.01);
        assert_eq!(clipped.len(), 1);
        let ring = &clipped[0];
        assert!(ring.iter().all(|p| p.z >= -1e-12));
        let on_rim = ring.iter().filter(|p| p.z.abs() < 1e-12).count();
        assert!(on_rim >= 2);
        for p in ring {
            assert!((p.length() - 1.0).abs() < 1e-9);
            // The rim closure stays on the near side of the square.
            assert!(p.x > 0.9, "{p:?}");
        }
    }

    #[test]
    fn straddling_ring_wound_the_other_way_takes_the_long_way_round() {
        let ring = vec![
            unit(1.0, -0.2, -0.2),
            unit(1.0, 0.2, -0.2),
            unit(1.0, 0.2, 0.2),
            unit(1.0, -0.2, 0.2),
        ];
        let clipped = clip_polygon(&[ring], 0.01);
        assert_eq!(clipped.len(), 1);
        assert!(clipped[0].iter().any(|p| p.x < -0.99));
    }

    #[test]
    fn line_is_split_into_visible_runs() {
        let line = vec![
            unit(0.0, 0.0, 1.0),
            unit(1.0, 0.0, 0.5),
            unit(1.0, 0.0, -0.5),
            unit(0.0, 1.0, -1.0),
            unit(-1.0, 1.0, 0.5),
            unit(-1.0, 0.0, 1.0),
        ];
        let runs = clip_line(&line);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 3);
        assert!(runs[0][2].z.abs() < 1e-12);
        assert!(runs[1][0].z.abs() < 1e-12);
        assert_eq!(runs[1].len(), 3);
    }
}
