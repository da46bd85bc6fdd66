//! Fixed demo listings: two Malaysian stalls and four regional exporters.

use crate::stall::{Coordinates, DurianVariety, RatingCategories, Stall, StallRatings, variety};

fn v(name: &str, price_per_kg: f64, last_updated: &str) -> DurianVariety {
    DurianVariety {
        name: name.to_string(),
        price_per_kg,
        availability: true,
        last_updated: last_updated.to_string(),
    }
}

fn ratings(overall: f64, total_reviews: u32, quality: f64, price: f64, service: f64) -> StallRatings {
    StallRatings {
        overall,
        total_reviews,
        categories: RatingCategories {
            quality,
            price,
            service,
        },
    }
}

struct Contact<'a> {
    phone: &'a str,
    whatsapp: &'a str,
    hours: &'a str,
    photo: &'a str,
}

fn stall(
    id: &str,
    name: &str,
    address: &str,
    (lat, lng): (f64, f64),
    contact: Contact<'_>,
    varieties: Vec<DurianVariety>,
    ratings: StallRatings,
) -> Stall {
    Stall {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        coordinates: Coordinates::new(lat, lng),
        phone: contact.phone.to_string(),
        whatsapp: contact.whatsapp.to_string(),
        operating_hours: contact.hours.to_string(),
        varieties,
        ratings,
        photos: vec![contact.photo.to_string()],
        distance: None,
        is_live_source: false,
    }
}

pub fn demo_stalls() -> Vec<Stall> {
    vec![
        stall(
            "1",
            "Durian King @ SS2",
            "19, Jalan SS 2/67, SS 2, 47300 Petaling Jaya, Selangor, Malaysia",
            (3.1189, 101.6212),
            Contact {
                phone: "012-3456789",
                whatsapp: "60123456789",
                hours: "12:00 PM - 12:00 AM",
                photo: "https://picsum.photos/seed/durian1/400/300",
            },
            vec![
                v(variety::MUSANG_KING, 65.0, "2024-05-20"),
                v(variety::BLACK_THORN, 95.0, "2024-05-20"),
                v(variety::D24, 28.0, "2024-05-20"),
            ],
            ratings(4.8, 1250, 4.9, 4.2, 4.7),
        ),
        stall(
            "3",
            "Rizky Durian Raub",
            "Pusat Bandar Raub, 27600 Raub, Pahang, Malaysia",
            (3.7915, 101.8569),
            Contact {
                phone: "019-9876543",
                whatsapp: "60199876543",
                hours: "10:00 AM - 10:00 PM",
                photo: "https://picsum.photos/seed/durian3/400/300",
            },
            vec![
                v(variety::MUSANG_KING, 55.0, "2024-05-22"),
                v(variety::KAMPUNG, 15.0, "2024-05-22"),
            ],
            ratings(4.9, 450, 5.0, 4.8, 4.5),
        ),
        stall(
            "global-1",
            "Queen Durian Export Co.",
            "Chanthaburi City, Chanthaburi, Thailand",
            (12.6112, 102.1039),
            Contact {
                phone: "+66 39 123 456",
                whatsapp: "6639123456",
                hours: "8:00 AM - 6:00 PM",
                photo: "https://picsum.photos/seed/thai-durian/400/300",
            },
            vec![v("Monthong", 12.0, "2024-05-25"), v("Chanee", 10.0, "2024-05-25")],
            ratings(4.7, 3200, 4.8, 4.9, 4.4),
        ),
        stall(
            "global-2",
            "Dak Lak Durian Hub",
            "Buon Ma Thuot, Dak Lak, Vietnam",
            (12.6678, 108.0383),
            Contact {
                phone: "+84 262 345 678",
                whatsapp: "84262345678",
                hours: "7:00 AM - 7:00 PM",
                photo: "https://picsum.photos/seed/viet-durian/400/300",
            },
            vec![
                v("Ri6 Durian", 15.0, "2024-05-25"),
                v("Musang King (VN)", 45.0, "2024-05-25"),
            ],
            ratings(4.6, 1800, 4.7, 4.8, 4.5),
        ),
        stall(
            "global-3",
            "Davao Durian Industry Association",
            "Davao City, Davao del Sur, Philippines",
            (7.1907, 125.4553),
            Contact {
                phone: "+63 82 234 5678",
                whatsapp: "63822345678",
                hours: "9:00 AM - 9:00 PM",
                photo: "https://picsum.photos/seed/ph-durian/400/300",
            },
            vec![v("Puyat Durian", 8.0, "2024-05-25"), v("Arancillo", 9.0, "2024-05-25")],
            ratings(4.5, 2400, 4.6, 4.7, 4.3),
        ),
        stall(
            "global-4",
            "Medan Exotic Fruit Center",
            "Medan, North Sumatra, Indonesia",
            (3.5952, 98.6722),
            Contact {
                phone: "+62 61 3456 7890",
                whatsapp: "626134567890",
                hours: "10:00 AM - 11:00 PM",
                photo: "https://picsum.photos/seed/indo-durian/400/300",
            },
            vec![v("Durian Medan", 7.0, "2024-05-25"), v("Bawor", 14.0, "2024-05-25")],
            ratings(4.4, 3100, 4.5, 4.8, 4.2),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::demo_stalls;
    use std::collections::BTreeSet;

    #[test]
    fn demo_set_has_unique_ids_and_valid_coordinates() {
        let stalls = demo_stalls();
        assert_eq!(stalls.len(), 6);
        let ids: BTreeSet<_> = stalls.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 6);
        assert!(stalls.iter().all(|s| s.coordinates.to_lon_lat().is_valid()));
    }
}
