//! TopoJSON topology decoding.
//!
//! Only polygonal geometry is kept: `Polygon`, `MultiPolygon` and
//! `GeometryCollection`s of those. Points and lines carry no landmass.

use std::collections::BTreeMap;

use foundation::math::LonLat;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::landmass::{LandPolygon, LandmassError, LandmassSet, Region, normalize_ring, region_key};

/// Objects tried, in order, when the caller does not name one.
const PREFERRED_OBJECTS: [&str; 2] = ["countries", "land"];

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

pub fn decode_topology_str(
    payload: &str,
    object: Option<&str>,
) -> Result<LandmassSet, LandmassError> {
    let value: Value = serde_json::from_str(payload)?;
    decode_topology_value(value, object)
}

pub fn decode_topology_value(
    value: Value,
    object: Option<&str>,
) -> Result<LandmassSet, LandmassError> {
    let kind = value.get("type").and_then(|v| v.as_str()).unwrap_or_default();
    if kind != "Topology" {
        return Err(LandmassError::UnsupportedDocument {
            found: kind.to_string(),
        });
    }

    let topology: Topology = serde_json::from_value(value)?;
    let arcs = decode_arcs(&topology.arcs, topology.transform);

    let name = match object {
        Some(name) => name.to_string(),
        None => PREFERRED_OBJECTS
            .iter()
            .find(|n| topology.objects.contains_key(**n))
            .map(|n| n.to_string())
            .or_else(|| topology.objects.keys().next().cloned())
            .ok_or_else(|| LandmassError::MissingObject {
                name: PREFERRED_OBJECTS[0].to_string(),
            })?,
    };
    let root = topology
        .objects
        .get(&name)
        .ok_or_else(|| LandmassError::MissingObject { name: name.clone() })?;

    let mut regions = Vec::new();
    let mut index = 0usize;
    collect_regions(root, &arcs, &mut regions, &mut index)?;

    debug!(
        object = %name,
        regions = regions.len(),
        arcs = arcs.len(),
        "decoded topology"
    );
    Ok(LandmassSet::new(regions))
}

/// Converts quantized, delta-encoded arcs into absolute lon/lat positions.
fn decode_arcs(raw: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Vec<LonLat>> {
    raw.iter()
        .map(|arc| {
            let mut x = 0.0;
            let mut y = 0.0;
            arc.iter()
                .filter(|p| p.len() >= 2)
                .map(|p| match transform {
                    Some(t) => {
                        x += p[0];
                        y += p[1];
                        LonLat::new(
                            x * t.scale[0] + t.translate[0],
                            y * t.scale[1] + t.translate[1],
                        )
                    }
                    None => LonLat::new(p[0], p[1]),
                })
                .collect()
        })
        .collect()
}

fn collect_regions(
    geometry: &Value,
    arcs: &[Vec<LonLat>],
    out: &mut Vec<Region>,
    index: &mut usize,
) -> Result<(), LandmassError> {
    let Some(obj) = geometry.as_object() else {
        return Err(LandmassError::InvalidGeometry {
            index: *index,
            reason: "geometry must be an object".to_string(),
        });
    };

    let kind = obj.get("type").and_then(|v| v.as_str()).unwrap_or_default();
    if kind == "GeometryCollection" {
        let children = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or_else(|| LandmassError::InvalidGeometry {
                index: *index,
                reason: "GeometryCollection missing geometries".to_string(),
            })?;
        for child in children {
            collect_regions(child, arcs, out, index)?;
        }
        return Ok(());
    }

    let this_index = *index;
    *index += 1;

    let polygons = match kind {
        "Polygon" => {
            let rings = polygon_arc_refs(obj, this_index)?;
            vec![stitch_polygon(&rings, arcs)?]
        }
        "MultiPolygon" => {
            let polys = obj
                .get("arcs")
                .and_then(|v| v.as_array())
                .ok_or_else(|| invalid(this_index, "MultiPolygon missing arcs"))?;
            let mut out = Vec::with_capacity(polys.len());
            for poly in polys {
                let rings = ring_arc_refs(poly, this_index)?;
                out.push(stitch_polygon(&rings, arcs)?);
            }
            out
        }
        other => {
            debug!(index = this_index, kind = other, "skipping non-polygonal geometry");
            return Ok(());
        }
    };

    let polygons: Vec<LandPolygon> = polygons
        .into_iter()
        .filter(|p| !p.rings.is_empty())
        .collect();
    if polygons.is_empty() {
        return Ok(());
    }

    out.push(Region {
        key: region_key(obj),
        polygons,
    });
    Ok(())
}

fn polygon_arc_refs(obj: &Map<String, Value>, index: usize) -> Result<Vec<Vec<i64>>, LandmassError> {
    let rings = obj
        .get("arcs")
        .ok_or_else(|| invalid(index, "Polygon missing arcs"))?;
    ring_arc_refs(rings, index)
}

fn ring_arc_refs(rings: &Value, index: usize) -> Result<Vec<Vec<i64>>, LandmassError> {
    let rings = rings
        .as_array()
        .ok_or_else(|| invalid(index, "polygon arcs must be an array of rings"))?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        let refs = ring
            .as_array()
            .ok_or_else(|| invalid(index, "ring must be an array of arc indices"))?;
        let mut ids = Vec::with_capacity(refs.len());
        for r in refs {
            ids.push(
                r.as_i64()
                    .ok_or_else(|| invalid(index, "arc index must be an integer"))?,
            );
        }
        out.push(ids);
    }
    Ok(out)
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<LonLat>]) -> Result<LandPolygon, LandmassError> {
    let mut out = Vec::with_capacity(rings.len());
    for (ring_i, refs) in rings.iter().enumerate() {
        match normalize_ring(stitch_ring(refs, arcs)?) {
            Some(ring) => out.push(ring),
            // A degenerate exterior makes its holes meaningless.
            None if ring_i == 0 => return Ok(LandPolygon { rings: Vec::new() }),
            None => {}
        }
    }
    Ok(LandPolygon { rings: out })
}

/// Joins arcs end to end; consecutive arcs share their join position, so the
/// duplicate is dropped. Negative indices (`!i`) walk arc `i` backwards.
fn stitch_ring(refs: &[i64], arcs: &[Vec<LonLat>]) -> Result<Vec<LonLat>, LandmassError> {
    let mut points: Vec<LonLat> = Vec::new();
    for &r in refs {
        let (arc_index, reversed) = if r < 0 { (!r, true) } else { (r, false) };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(LandmassError::InvalidArc { index: r })?;

        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }
    Ok(points)
}

fn invalid(index: usize, reason: &str) -> LandmassError {
    LandmassError::InvalidGeometry {
        index,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_topology_str, stitch_ring};
    use crate::landmass::{LandmassError, LandmassSet};
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;

    // Two squares sharing an edge, quantized with a 1-degree grid offset to (100, 0).
    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [1, 1], "translate": [100, 0]},
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "458", "properties": {"name": "Malaysia"}, "arcs": [[0, 1]]},
                    {"type": "Polygon", "id": "764", "arcs": [[-1, 2]]},
                    {"type": null}
                ]
            }
        },
        "arcs": [
            [[1, 0], [0, 1]],
            [[1, 1], [-1, 0], [0, -1], [1, 0]],
            [[1, 0], [1, 0], [0, 1], [-1, 0]]
        ]
    }"#;

    #[test]
    fn decodes_delta_encoded_arcs_into_closed_rings() {
        let set = decode_topology_str(TOPOLOGY, None).expect("decode topology");
        assert_eq!(set.region_count(), 2);
        assert_eq!(set.regions[0].key.as_deref(), Some("Malaysia"));
        assert_eq!(set.regions[1].key.as_deref(), Some("764"));

        let ring = &set.regions[0].polygons[0].rings[0];
        assert_eq!(
            ring,
            &vec![
                LonLat::new(101.0, 0.0),
                LonLat::new(101.0, 1.0),
                LonLat::new(100.0, 1.0),
                LonLat::new(100.0, 0.0),
                LonLat::new(101.0, 0.0),
            ]
        );
    }

    #[test]
    fn negative_arc_reference_walks_backwards() {
        let set = decode_topology_str(TOPOLOGY, None).expect("decode topology");
        let ring = &set.regions[1].polygons[0].rings[0];
        assert_eq!(ring.first(), Some(&LonLat::new(101.0, 1.0)));
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn generic_entry_point_accepts_topology() {
        let set = LandmassSet::from_json_str(TOPOLOGY).expect("decode");
        assert_eq!(set.ring_count(), 2);
    }

    #[test]
    fn out_of_range_arc_is_an_error() {
        let arcs = vec![vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 0.0)]];
        let err = stitch_ring(&[0, 3], &arcs).unwrap_err();
        assert!(matches!(err, LandmassError::InvalidArc { index: 3 }));
    }

    #[test]
    fn missing_named_object_is_an_error() {
        let err = decode_topology_str(TOPOLOGY, Some("land")).unwrap_err();
        assert!(matches!(err, LandmassError::MissingObject { .. }));
    }
}
