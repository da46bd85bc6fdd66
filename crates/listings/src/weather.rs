use globe::overlay::OverlayInfo;
use serde::{Deserialize, Serialize};

use crate::stall::Stall;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub temp: f64,
    pub condition: String,
    pub humidity: f64,
    pub wind_speed: f64,
}

impl Weather {
    /// Overlay badge data, with the stall's cheapest price when known.
    pub fn to_overlay(&self, stall: Option<&Stall>) -> OverlayInfo {
        OverlayInfo {
            temperature_c: self.temp,
            condition: self.condition.clone(),
            price: stall
                .and_then(Stall::cheapest_available)
                .map(|v| format!("RM {}/kg", v.price_per_kg)),
        }
    }
}

/// Fixed tropical weather for the selected stall; `None` without a selection.
pub fn mock_weather(selected: Option<&Stall>) -> Option<Weather> {
    selected.map(|_| Weather {
        temp: 31.0,
        condition: "Tropical Sun".to_string(),
        humidity: 80.0,
        wind_speed: 12.0,
    })
}

#[cfg(test)]
mod tests {
    use super::mock_weather;
    use crate::demo::demo_stalls;
    use globe::overlay::WeatherIcon;
    use pretty_assertions::assert_eq;

    #[test]
    fn weather_only_for_a_selection() {
        assert!(mock_weather(None).is_none());
        let stalls = demo_stalls();
        let w = mock_weather(Some(&stalls[2])).expect("weather");
        assert_eq!(w.temp, 31.0);
        assert_eq!(w.humidity, 80.0);

        let overlay = w.to_overlay(Some(&stalls[2]));
        assert_eq!(overlay.price.as_deref(), Some("RM 10/kg"));
        assert_eq!(WeatherIcon::classify(&overlay.condition), WeatherIcon::Wind);
    }
}
