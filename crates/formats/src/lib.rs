pub mod geojson;
pub mod landmass;
pub mod topojson;

pub use landmass::*;
