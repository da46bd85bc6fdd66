use foundation::math::{LonLat, stable_total_cmp_f64};
use serde::{Deserialize, Serialize};

/// Named durian cultivars used by the price comparison presets.
pub mod variety {
    pub const MUSANG_KING: &str = "Musang King (D197)";
    pub const BLACK_THORN: &str = "Black Thorn (D200)";
    pub const RED_PRAWN: &str = "Red Prawn (D175)";
    pub const D24: &str = "D24 (Sultan)";
    pub const XO: &str = "XO";
    pub const KAMPUNG: &str = "Kampung";

    pub const ALL: [&str; 6] = [MUSANG_KING, BLACK_THORN, RED_PRAWN, D24, XO, KAMPUNG];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn to_lon_lat(self) -> LonLat {
        LonLat::new(self.lng, self.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurianVariety {
    pub name: String,
    /// Ringgit per kilogram.
    pub price_per_kg: f64,
    pub availability: bool,
    pub last_updated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingCategories {
    pub quality: f64,
    pub price: f64,
    pub service: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallRatings {
    pub overall: f64,
    pub total_reviews: u32,
    pub categories: RatingCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stall {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub phone: String,
    pub whatsapp: String,
    pub operating_hours: String,
    pub varieties: Vec<DurianVariety>,
    pub ratings: StallRatings,
    pub photos: Vec<String>,
    /// Kilometres from the user, filled in by [`crate::search`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub is_live_source: bool,
}

impl Stall {
    pub fn variety(&self, name: &str) -> Option<&DurianVariety> {
        self.varieties.iter().find(|v| v.name == name)
    }

    /// Cheapest variety currently in stock.
    pub fn cheapest_available(&self) -> Option<&DurianVariety> {
        self.varieties
            .iter()
            .filter(|v| v.availability && v.price_per_kg > 0.0)
            .min_by(|a, b| stable_total_cmp_f64(a.price_per_kg, b.price_per_kg))
    }

    /// Last comma-separated component of the address, e.g. the country.
    pub fn country(&self) -> Option<&str> {
        self.address
            .rsplit(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use crate::demo::demo_stalls;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_with_camel_case_keys() {
        let stall = &demo_stalls()[0];
        let json = serde_json::to_value(stall).expect("serialize");
        assert_eq!(json["operatingHours"], "12:00 PM - 12:00 AM");
        assert_eq!(json["varieties"][0]["pricePerKg"], 65.0);
        assert!(json.get("distance").is_none());

        let back: super::Stall = serde_json::from_value(json).expect("deserialize");
        assert_eq!(&back, stall);
    }

    #[test]
    fn country_and_cheapest_variety() {
        let stalls = demo_stalls();
        assert_eq!(stalls[0].country(), Some("Malaysia"));
        assert_eq!(stalls[2].country(), Some("Thailand"));
        let cheapest = stalls[0].cheapest_available().expect("in stock");
        assert_eq!(cheapest.price_per_kg, 28.0);
    }
}
