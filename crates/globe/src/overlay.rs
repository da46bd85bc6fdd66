use serde::{Deserialize, Serialize};

use crate::markers::Marker;
use crate::projection::ScreenPoint;

/// Display data for the active destination, supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayInfo {
    pub temperature_c: f64,
    pub condition: String,
    #[serde(default)]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Cloud,
    Rain,
    Sun,
    Wind,
}

impl WeatherIcon {
    /// Picks an icon from free-form condition text ("Light Rain", "Clear sky", ...).
    pub fn classify(condition: &str) -> Self {
        let c = condition.to_lowercase();
        if c.contains("cloud") {
            WeatherIcon::Cloud
        } else if c.contains("rain") {
            WeatherIcon::Rain
        } else if c.contains("clear") {
            WeatherIcon::Sun
        } else {
            WeatherIcon::Wind
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeatherIcon::Cloud => "cloud",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Sun => "sun",
            WeatherIcon::Wind => "wind",
        }
    }
}

/// Floating badge above the active marker. `anchor` is the badge's
/// bottom-center point; hosts center it horizontally on `anchor.x`.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBadge {
    pub anchor: ScreenPoint,
    pub icon: WeatherIcon,
    pub temperature: String,
    pub condition: String,
    pub price: Option<String>,
}

/// Places the badge when there is overlay data and the active marker is on screen.
pub fn place(info: Option<&OverlayInfo>, active: Option<&Marker>, offset_px: f64) -> Option<OverlayBadge> {
    let info = info?;
    let marker = active?;
    let at = marker.screen.filter(|_| marker.visible)?;
    Some(OverlayBadge {
        anchor: ScreenPoint::new(at.x, at.y - offset_px),
        icon: WeatherIcon::classify(&info.condition),
        temperature: format!("{}°C", info.temperature_c),
        condition: info.condition.clone(),
        price: info.price.clone(),
    })
}
