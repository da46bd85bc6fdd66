use globe::Destination;

use crate::stall::Stall;

const DEFAULT_COUNTRY: &str = "Malaysia";

/// Globe destination for a stall. The label shows the cheapest in-stock price.
pub fn to_destination(stall: &Stall) -> Destination {
    let mut dest = Destination::new(
        stall.id.as_str(),
        stall.name.clone(),
        stall.coordinates.to_lon_lat(),
    );
    dest.country = Some(stall.country().unwrap_or(DEFAULT_COUNTRY).to_string());
    dest.description = Some(stall.address.clone());
    dest.image = stall.photos.first().cloned();
    dest.label = stall
        .cheapest_available()
        .map(|v| format!("RM {}/kg", v.price_per_kg));
    dest
}

pub fn to_destinations(stalls: &[Stall]) -> Vec<Destination> {
    stalls.iter().map(to_destination).collect()
}

#[cfg(test)]
mod tests {
    use super::to_destinations;
    use crate::demo::demo_stalls;
    use foundation::math::LonLat;
    use globe::DestinationId;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_stalls_to_lon_lat_destinations() {
        let mut stalls = demo_stalls();
        stalls[1].address = String::new();
        let dests = to_destinations(&stalls);
        assert_eq!(dests.len(), 6);

        let first = &dests[0];
        assert_eq!(first.id, DestinationId::new("1"));
        assert_eq!(first.coordinates, LonLat::new(101.6212, 3.1189));
        assert_eq!(first.country.as_deref(), Some("Malaysia"));
        assert_eq!(first.label.as_deref(), Some("RM 28/kg"));
        assert_eq!(
            first.image.as_deref(),
            Some("https://picsum.photos/seed/durian1/400/300")
        );

        assert_eq!(dests[1].country.as_deref(), Some("Malaysia"));
        assert_eq!(dests[4].country.as_deref(), Some("Philippines"));
    }
}
