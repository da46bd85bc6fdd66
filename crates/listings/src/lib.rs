//! Durian stall listings: records, the demo set, search, price comparison
//! and the mapping from stalls to globe destinations.

pub mod compare;
pub mod demo;
pub mod destinations;
pub mod search;
pub mod stall;
pub mod weather;

pub use compare::{PriceRow, compare_prices};
pub use demo::demo_stalls;
pub use destinations::{to_destination, to_destinations};
pub use search::search;
pub use stall::*;
pub use weather::{Weather, mock_weather};
