use foundation::math::LonLat;
use serde_json::Value;
use tracing::debug;

use crate::landmass::{
    LandPolygon, LandmassError, LandmassSet, Region, Ring, normalize_ring, region_key, wind,
};

pub fn decode_feature_collection_str(payload: &str) -> Result<LandmassSet, LandmassError> {
    let value: Value = serde_json::from_str(payload)?;
    decode_feature_collection(&value)
}

/// Decodes the polygonal features of a GeoJSON `FeatureCollection`.
///
/// Features with a null geometry or a non-polygonal type are skipped.
pub fn decode_feature_collection(value: &Value) -> Result<LandmassSet, LandmassError> {
    let obj = value.as_object().ok_or(LandmassError::UnsupportedDocument {
        found: "non-object".to_string(),
    })?;
    let ty = obj.get("type").and_then(|v| v.as_str()).unwrap_or_default();
    if ty != "FeatureCollection" {
        return Err(LandmassError::UnsupportedDocument {
            found: ty.to_string(),
        });
    }

    let features = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or_else(|| LandmassError::InvalidGeometry {
            index: 0,
            reason: "FeatureCollection missing features".to_string(),
        })?;

    let mut regions = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let feat_obj = feature
            .as_object()
            .ok_or_else(|| LandmassError::InvalidGeometry {
                index,
                reason: "feature must be an object".to_string(),
            })?;

        let Some(geometry) = feat_obj.get("geometry").filter(|g| !g.is_null()) else {
            debug!(index, "skipping feature without geometry");
            continue;
        };
        let polygons = parse_polygonal(geometry)
            .map_err(|reason| LandmassError::InvalidGeometry { index, reason })?;
        let polygons: Vec<LandPolygon> = polygons
            .into_iter()
            .filter_map(|rings| build_polygon(rings))
            .collect();
        if polygons.is_empty() {
            continue;
        }

        regions.push(Region {
            key: region_key(feat_obj),
            polygons,
        });
    }

    debug!(regions = regions.len(), "decoded feature collection");
    Ok(LandmassSet::new(regions))
}

/// GeoJSON (RFC 7946) winds exteriors counter-clockwise; rings are rewound
/// to the clockwise exterior winding of [`LandPolygon`].
fn build_polygon(rings: Vec<Ring>) -> Option<LandPolygon> {
    let mut iter = rings.into_iter();
    let exterior = wind(normalize_ring(iter.next()?)?, true);
    let mut out = vec![exterior];
    out.extend(iter.filter_map(normalize_ring).map(|hole| wind(hole, false)));
    Some(LandPolygon { rings: out })
}

/// Returns the polygons of a `Polygon`/`MultiPolygon` geometry, or an empty
/// list for other geometry types.
fn parse_polygonal(value: &Value) -> Result<Vec<Vec<Ring>>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    match ty {
        "Polygon" | "MultiPolygon" => {}
        other => {
            debug!(kind = other, "skipping non-polygonal geometry");
            return Ok(Vec::new());
        }
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;
    if ty == "Polygon" {
        Ok(vec![parse_polygon(coords)?])
    } else {
        parse_multi_polygon(coords)
    }
}

fn parse_position(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    arr.iter().map(parse_position).collect()
}

fn parse_polygon(coords: &Value) -> Result<Vec<Ring>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Ring>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}

#[cfg(test)]
mod tests {
    use super::decode_feature_collection_str;
    use crate::landmass::{LandmassError, LandmassSet, signed_area};
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": 458, "properties": {},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[100, 1], [104, 1], [104, 6], [100, 6]]],
                [[[110, 1], [119, 1], [119, 7], [110, 1]]]
             ]}},
            {"type": "Feature", "properties": {"name": "Singapore"},
             "geometry": {"type": "Polygon", "coordinates": [
                [[103.6, 1.2], [104.0, 1.2], [104.0, 1.5], [103.6, 1.5], [103.6, 1.2]]
             ]}},
            {"type": "Feature", "properties": {"name": "Nowhere"}, "geometry": null},
            {"type": "Feature", "properties": {"name": "Pin"},
             "geometry": {"type": "Point", "coordinates": [101.0, 3.0]}}
        ]
    }"#;

    #[test]
    fn keeps_polygonal_features_only() {
        let set = decode_feature_collection_str(COLLECTION).expect("decode");
        let keys: Vec<_> = set.regions.iter().map(|r| r.key.clone()).collect();
        assert_eq!(keys, vec![Some("458".to_string()), Some("Singapore".to_string())]);
        assert_eq!(set.regions[0].polygons.len(), 2);
        assert_eq!(set.ring_count(), 3);
    }

    #[test]
    fn open_rings_are_closed() {
        let set = decode_feature_collection_str(COLLECTION).expect("decode");
        let ring = &set.regions[0].polygons[0].rings[0];
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn rings_are_rewound_to_clockwise_exteriors() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Polygon","coordinates":[
                [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                [[2, 2], [2, 4], [4, 4], [4, 2], [2, 2]]
            ]}}
        ]}"#;
        let set = decode_feature_collection_str(payload).expect("decode");
        let rings = &set.regions[0].polygons[0].rings;
        assert!(signed_area(&rings[0]) < 0.0);
        assert!(signed_area(&rings[1]) > 0.0);
        assert_eq!(rings[0][1], LonLat::new(0.0, 10.0));
    }

    #[test]
    fn generic_entry_point_accepts_feature_collections() {
        let set = LandmassSet::from_json_str(COLLECTION).expect("decode");
        assert!(!set.is_empty());
    }

    #[test]
    fn malformed_coordinates_report_feature_index() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[["a", 1]]]}}
        ]}"#;
        let err = decode_feature_collection_str(payload).unwrap_err();
        assert!(matches!(err, LandmassError::InvalidGeometry { index: 0, .. }));
    }
}
