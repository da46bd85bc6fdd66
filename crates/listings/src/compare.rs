use foundation::math::stable_total_cmp_f64;
use serde::{Deserialize, Serialize};

use crate::stall::Stall;

/// One bar of the price comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub name: String,
    pub price: f64,
    pub available: bool,
}

/// Price per kg of `variety` at every stall that lists it, cheapest first.
///
/// Stalls without the variety (or listing it at zero) are left out; the first
/// row is the best deal.
pub fn compare_prices(stalls: &[Stall], variety: &str) -> Vec<PriceRow> {
    let mut rows: Vec<PriceRow> = stalls
        .iter()
        .filter_map(|stall| {
            let v = stall.variety(variety)?;
            Some(PriceRow {
                name: stall.name.clone(),
                price: v.price_per_kg,
                available: v.availability,
            })
        })
        .filter(|row| row.price > 0.0)
        .collect();
    rows.sort_by(|a, b| stable_total_cmp_f64(a.price, b.price));
    rows
}
