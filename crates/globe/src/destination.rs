use std::fmt;

use foundation::math::LonLat;
use serde::{Deserialize, Serialize};

/// Stable identity of a destination; markers are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationId(pub String);

impl DestinationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DestinationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DestinationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A selectable point on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(with = "lon_lat_pair")]
    pub coordinates: LonLat,
    /// Short text drawn next to the active marker (e.g. a price).
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Destination {
    pub fn new(id: impl Into<DestinationId>, name: impl Into<String>, coordinates: LonLat) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            label: None,
            country: None,
            description: None,
            image: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Text shown beside the marker when it is active.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn has_valid_coordinates(&self) -> bool {
        self.coordinates.is_valid()
    }
}

/// `[lon, lat]` on the wire, like GeoJSON positions.
mod lon_lat_pair {
    use foundation::math::LonLat;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(p: &LonLat, s: S) -> Result<S::Ok, S::Error> {
        [p.lon_deg, p.lat_deg].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<LonLat, D::Error> {
        let [lon, lat] = <[f64; 2]>::deserialize(d)?;
        Ok(LonLat::new(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::{Destination, DestinationId};
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_coordinates_as_lon_lat_pair() {
        let d: Destination = serde_json::from_str(
            r#"{"id": "b", "name": "Chanthaburi", "coordinates": [102.1, 12.6], "label": "RM 10/kg"}"#,
        )
        .expect("parse destination");
        assert_eq!(d.id, DestinationId::new("b"));
        assert_eq!(d.coordinates, LonLat::new(102.1, 12.6));
        assert_eq!(d.display_label(), "RM 10/kg");
        assert_eq!(d.country, None);
    }

    #[test]
    fn validity_follows_coordinate_range() {
        assert!(Destination::new("a", "A", LonLat::new(101.6, 3.1)).has_valid_coordinates());
        assert!(!Destination::new("x", "X", LonLat::new(190.0, 0.0)).has_valid_coordinates());
        assert!(!Destination::new("y", "Y", LonLat::new(0.0, f64::NAN)).has_valid_coordinates());
    }
}
