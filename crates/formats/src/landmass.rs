use foundation::math::LonLat;
use serde_json::Value;

/// Closed ring of positions; the first position is repeated at the end.
pub type Ring = Vec<LonLat>;

/// A polygon in lon/lat space: the first ring is the exterior, the rest are holes.
///
/// Rings follow the world-atlas winding: seen from outside the globe the
/// exterior runs clockwise (land to the right of travel) and holes run
/// counter-clockwise. The winding decides which side of a ring is land once
/// it is clipped at the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct LandPolygon {
    pub rings: Vec<Ring>,
}

/// All polygons belonging to one region (typically a country).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Region name or id from the source dataset, if it had one.
    pub key: Option<String>,
    pub polygons: Vec<LandPolygon>,
}

/// Landmass boundaries used as visual context behind the globe's markers.
///
/// Nothing interactive depends on this data; an empty set is a valid
/// (degraded) state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmassSet {
    pub regions: Vec<Region>,
}

#[derive(Debug)]
pub enum LandmassError {
    Json(serde_json::Error),
    UnsupportedDocument { found: String },
    MissingObject { name: String },
    InvalidArc { index: i64 },
    InvalidGeometry { index: usize, reason: String },
}

impl std::fmt::Display for LandmassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandmassError::Json(e) => write!(f, "JSON parse error: {e}"),
            LandmassError::UnsupportedDocument { found } => {
                write!(
                    f,
                    "expected a Topology or FeatureCollection document, found {found:?}"
                )
            }
            LandmassError::MissingObject { name } => {
                write!(f, "topology has no object named {name:?}")
            }
            LandmassError::InvalidArc { index } => write!(f, "arc index {index} out of range"),
            LandmassError::InvalidGeometry { index, reason } => {
                write!(f, "invalid geometry at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for LandmassError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LandmassError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LandmassError {
    fn from(e: serde_json::Error) -> Self {
        LandmassError::Json(e)
    }
}

impl LandmassSet {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Decodes either a TopoJSON `Topology` or a GeoJSON `FeatureCollection`.
    ///
    /// For topologies the `countries` object is preferred, then `land`, then
    /// the first object by name.
    pub fn from_json_str(payload: &str) -> Result<Self, LandmassError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, LandmassError> {
        let kind = value
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        match kind.as_str() {
            "Topology" => crate::topojson::decode_topology_value(value, None),
            "FeatureCollection" => crate::geojson::decode_feature_collection(&value),
            _ => Err(LandmassError::UnsupportedDocument { found: kind }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.iter().all(|r| r.polygons.is_empty())
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn ring_count(&self) -> usize {
        self.rings().count()
    }

    /// Iterates every ring with the key of the region it belongs to.
    pub fn rings(&self) -> impl Iterator<Item = (Option<&str>, &Ring)> + '_ {
        self.regions.iter().flat_map(|region| {
            region
                .polygons
                .iter()
                .flat_map(|poly| poly.rings.iter())
                .map(move |ring| (region.key.as_deref(), ring))
        })
    }
}

/// Closes `ring` if needed and checks it has enough distinct positions.
///
/// Returns `None` for degenerate rings (fewer than three distinct positions
/// or any non-finite coordinate).
pub(crate) fn normalize_ring(mut ring: Ring) -> Option<Ring> {
    if ring
        .iter()
        .any(|p| !p.lon_deg.is_finite() || !p.lat_deg.is_finite())
    {
        return None;
    }
    let first = *ring.first()?;
    if ring.last() != Some(&first) {
        ring.push(first);
    }
    if ring.len() < 4 {
        return None;
    }
    Some(ring)
}

/// Twice the signed planar area of a closed ring in lon/lat degrees;
/// positive when the ring runs counter-clockwise.
pub(crate) fn signed_area(ring: &[LonLat]) -> f64 {
    ring.windows(2)
        .map(|w| w[0].lon_deg * w[1].lat_deg - w[1].lon_deg * w[0].lat_deg)
        .sum()
}

/// Reverses `ring` when its winding differs from the requested one.
pub(crate) fn wind(mut ring: Ring, clockwise: bool) -> Ring {
    let area = signed_area(&ring);
    if (clockwise && area > 0.0) || (!clockwise && area < 0.0) {
        ring.reverse();
    }
    ring
}

pub(crate) fn region_key(geometry: &serde_json::Map<String, Value>) -> Option<String> {
    let from_props = geometry
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(str::to_string);
    from_props.or_else(|| match geometry.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{LandmassError, LandmassSet, normalize_ring};
    use foundation::math::LonLat;

    #[test]
    fn closes_open_rings_and_rejects_degenerate_ones() {
        let open = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(1.0, 0.0),
            LonLat::new(1.0, 1.0),
        ];
        let closed = normalize_ring(open).expect("valid ring");
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.first(), closed.last());

        let sliver = vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 0.0)];
        assert!(normalize_ring(sliver).is_none());

        let bad = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(f64::NAN, 0.0),
            LonLat::new(1.0, 1.0),
        ];
        assert!(normalize_ring(bad).is_none());
    }

    #[test]
    fn rejects_unknown_documents() {
        let err = LandmassSet::from_json_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert!(matches!(err, LandmassError::UnsupportedDocument { .. }));

        let err = LandmassSet::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, LandmassError::Json(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
