use super::Vec3;

/// Mean Earth radius used for great-circle distances (kilometers).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinates in degrees.
///
/// Longitude comes first, matching GeoJSON/TopoJSON position order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// True when both components are finite and inside
    /// lon ∈ [-180, 180], lat ∈ [-90, 90].
    pub fn is_valid(self) -> bool {
        self.lon_deg.is_finite()
            && self.lat_deg.is_finite()
            && (-180.0..=180.0).contains(&self.lon_deg)
            && (-90.0..=90.0).contains(&self.lat_deg)
    }

    /// Point on the unit sphere: x towards (0°, 0°), y towards (90°E, 0°), z north.
    pub fn to_unit(self) -> Vec3 {
        let lon = self.lon_deg.to_radians();
        let lat = self.lat_deg.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    pub fn from_unit(v: Vec3) -> Self {
        let lat = v.z.clamp(-1.0, 1.0).asin();
        let lon = v.y.atan2(v.x);
        Self::new(lon.to_degrees(), lat.to_degrees())
    }
}

/// Wraps an angle in degrees into `[-180, 180)`.
///
/// Values already in range are returned bit-for-bit unchanged.
pub fn wrap_degrees(deg: f64) -> f64 {
    if (-180.0..180.0).contains(&deg) {
        return deg;
    }
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Central angle between two geographic points, in radians.
pub fn angular_distance(a: LonLat, b: LonLat) -> f64 {
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();
    let (sin_lat0, cos_lat0) = a.lat_deg.to_radians().sin_cos();
    let (sin_lat1, cos_lat1) = b.lat_deg.to_radians().sin_cos();
    let (sin_d_lon, cos_d_lon) = d_lon.sin_cos();

    let x = cos_lat1 * sin_d_lon;
    let y = cos_lat0 * sin_lat1 - sin_lat0 * cos_lat1 * cos_d_lon;
    let z = sin_lat0 * sin_lat1 + cos_lat0 * cos_lat1 * cos_d_lon;
    (x * x + y * y).sqrt().atan2(z)
}

/// Haversine great-circle distance in kilometers.
pub fn haversine_km(a: LonLat, b: LonLat) -> f64 {
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat_deg.to_radians().cos() * b.lat_deg.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
