use foundation::math::{haversine_km, stable_total_cmp_f64};
use tracing::debug;

use crate::stall::{Coordinates, Stall};

/// Great-circle distance in kilometres, rounded to 0.1 km.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let km = haversine_km(from.to_lon_lat(), to.to_lon_lat());
    (km * 10.0).round() / 10.0
}

/// Filters stalls whose name or address contains `query` (case-insensitive).
/// The query is matched verbatim, surrounding whitespace included.
///
/// With a known user position every result carries its distance and the list
/// is sorted nearest first; otherwise the input order is kept.
pub fn search(stalls: &[Stall], query: &str, user: Option<Coordinates>) -> Vec<Stall> {
    let needle = query.to_lowercase();
    let mut out: Vec<Stall> = stalls
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.name.to_lowercase().contains(&needle)
                || s.address.to_lowercase().contains(&needle)
        })
        .cloned()
        .map(|mut s| {
            s.distance = user.map(|u| distance_km(u, s.coordinates));
            s
        })
        .collect();

    if user.is_some() {
        out.sort_by(|a, b| {
            stable_total_cmp_f64(a.distance.unwrap_or(0.0), b.distance.unwrap_or(0.0))
        });
    }
    debug!(query = %query, matches = out.len(), located = user.is_some(), "stall search");
    out
}
