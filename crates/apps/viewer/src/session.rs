//! Scripted, deterministic globe session driven by a virtual clock.

use globe::{DestinationId, Globe, GlobeConfig, GlobeInput};
use listings::{Stall, mock_weather, to_destinations};
use runtime::VirtualClock;
use tracing::{debug, info};

/// Input applied before the ticks run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub select: Option<String>,
    /// Drag offset in pixels, starting at the viewport center.
    pub drag: Option<(f64, f64)>,
    pub wheel: Option<f64>,
    pub ticks: u32,
}

pub struct Session {
    pub globe: Globe,
    clock: VirtualClock,
    stalls: Vec<Stall>,
}

impl Session {
    pub fn new(config: GlobeConfig, stalls: Vec<Stall>) -> Self {
        let clock = VirtualClock::new();
        let mut globe = Globe::new(config, Box::new(clock.clone()));
        globe.on_select(|id| info!(id = %id, "destination selected"));
        let report = globe.set_destinations(&to_destinations(&stalls));
        debug!(
            entered = report.entered.len(),
            rejected = report.rejected.len(),
            "destinations loaded"
        );
        Self { globe, clock, stalls }
    }

    /// Selects `id`, feeding the overlay with the stall's weather.
    pub fn select(&mut self, id: &str) {
        let stall = self.stalls.iter().find(|s| s.id == id);
        let overlay = mock_weather(stall).map(|w| w.to_overlay(stall));
        self.globe.set_active(Some(DestinationId::from(id)));
        self.globe.set_overlay(overlay);
    }

    pub fn drag(&mut self, dx: f64, dy: f64) {
        let c = self.globe.config().viewport.center();
        self.globe.handle_input(GlobeInput::PointerDown { x: c.x, y: c.y });
        self.globe.handle_input(GlobeInput::PointerMove {
            x: c.x + dx,
            y: c.y + dy,
        });
        self.globe.handle_input(GlobeInput::PointerUp);
    }

    /// Advances the clock by `n` tick periods and runs whatever became due.
    pub fn advance(&mut self, n: u32) -> usize {
        let rate = self.globe.config().tick_rate_hz;
        let period = if rate > 0.0 { 1.0 / rate } else { 0.0 };
        (0..n)
            .map(|_| {
                self.clock.advance(period);
                self.globe.pump()
            })
            .sum()
    }

    pub fn run(&mut self, script: &Script) -> usize {
        if let Some((dx, dy)) = script.drag {
            self.drag(dx, dy);
        }
        if let Some(delta) = script.wheel {
            self.globe.handle_input(GlobeInput::Wheel { delta });
        }
        if let Some(id) = &script.select {
            self.select(id);
        }
        let ran = self.advance(script.ticks);
        debug!(ticks = ran, mode = ?self.globe.mode(), "script finished");
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::{Script, Session};
    use globe::GlobeConfig;
    use globe::animation::Mode;
    use listings::demo_stalls;

    #[test]
    fn selecting_a_stall_flies_to_it_and_shows_the_badge() {
        let mut session = Session::new(GlobeConfig::default(), demo_stalls());
        let script = Script {
            select: Some("global-1".to_string()),
            ticks: 120,
            ..Script::default()
        };
        let ran = session.run(&script);
        assert!(ran >= 118, "{ran}");
        assert_eq!(session.globe.mode(), Mode::Holding);

        let frame = session.globe.frame();
        let badge = frame.overlay.as_ref().expect("badge over active marker");
        assert_eq!(badge.temperature, "31°C");
        assert_eq!(badge.price.as_deref(), Some("RM 10/kg"));
        assert!(frame.markers.iter().any(|m| m.active && m.id.as_str() == "global-1"));
    }

    #[test]
    fn without_selection_the_globe_keeps_spinning() {
        let mut session = Session::new(GlobeConfig::default(), demo_stalls());
        let before = session.globe.projection().rotation().lambda;
        session.run(&Script {
            ticks: 30,
            ..Script::default()
        });
        assert_eq!(session.globe.mode(), Mode::Autopilot);
        assert!(session.globe.projection().rotation().lambda != before);
        assert!(session.globe.frame().overlay.is_none());
    }
}
