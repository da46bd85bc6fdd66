//! Idle auto-rotation and eased fly-to transitions.

use foundation::math::{LonLat, wrap_degrees};
use foundation::time::{Time, TimeSpan};
use tracing::debug;

use crate::config::GlobeConfig;
use crate::destination::DestinationId;
use crate::projection::{Projection, Rotation};

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let u = t - 2.0;
        (u * u * u + 2.0) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Idle spin, no active selection.
    #[default]
    Autopilot,
    Dragging,
    Transitioning,
    /// Idle with an active selection; the globe stays put.
    Holding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    target: DestinationId,
    from: Rotation,
    to: Rotation,
    /// Signed longitude change along the short way round.
    delta_lambda: f64,
    span: TimeSpan,
}

impl Transition {
    pub fn new(target: DestinationId, from: Rotation, to: Rotation, start: Time, duration_s: f64) -> Self {
        Self {
            target,
            from,
            to,
            delta_lambda: wrap_degrees(to.lambda - from.lambda),
            span: TimeSpan::starting_at(start, duration_s),
        }
    }

    pub fn target(&self) -> &DestinationId {
        &self.target
    }

    pub fn end_rotation(&self) -> Rotation {
        self.to
    }

    pub fn is_complete(&self, now: Time) -> bool {
        self.span.is_complete(now)
    }

    /// Rotation at `now`; exactly the end rotation once the span is over.
    pub fn sample(&self, now: Time) -> Rotation {
        let t = self.span.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let e = ease_in_out_cubic(t);
        Rotation::new(
            self.from.lambda + self.delta_lambda * e,
            self.from.phi + (self.to.phi - self.from.phi) * e,
            self.from.gamma + (self.to.gamma - self.from.gamma) * e,
        )
    }
}

/// Result of one animation tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Still,
    Spun,
    Stepped,
    Finished(DestinationId),
}

impl TickOutcome {
    pub fn moved(&self) -> bool {
        !matches!(self, TickOutcome::Still)
    }
}

#[derive(Debug, Clone)]
pub struct AnimationDriver {
    mode: Mode,
    transition: Option<Transition>,
    step_deg: f64,
    duration_s: f64,
}

impl AnimationDriver {
    pub fn new(config: &GlobeConfig) -> Self {
        Self {
            mode: Mode::Autopilot,
            transition: None,
            step_deg: config.autopilot_step_deg,
            duration_s: config.transition_duration_s,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Starts flying towards `target`, replacing any transition in flight.
    ///
    /// Returns the id of the replaced transition, if any.
    pub fn start_transition(
        &mut self,
        id: DestinationId,
        target: LonLat,
        from: Rotation,
        now: Time,
    ) -> Option<DestinationId> {
        let mut to = Rotation::centering(target);
        to.gamma = from.gamma;
        let replaced = self.transition.take().map(|t| t.target);
        debug!(id = %id, lambda = to.lambda, phi = to.phi, "transition started");
        self.transition = Some(Transition::new(id, from, to, now, self.duration_s));
        self.mode = Mode::Transitioning;
        replaced
    }

    /// Drops any transition in flight and settles into the idle mode that
    /// matches the selection. While the pointer is held the driver stays in
    /// `Dragging` instead, so autopilot never runs under a pressed pointer.
    pub fn settle(&mut self, has_selection: bool, pointer_held: bool) -> Option<DestinationId> {
        let cancelled = self.transition.take().map(|t| t.target);
        if pointer_held || self.mode == Mode::Dragging {
            self.mode = Mode::Dragging;
        } else {
            self.mode = idle_mode(has_selection);
        }
        cancelled
    }

    /// Pointer pressed. A transition in flight keeps running until the
    /// pointer actually moves.
    pub fn press(&mut self) {
        if self.mode != Mode::Transitioning {
            self.mode = Mode::Dragging;
        }
    }

    /// Pointer moved while pressed; cancels a transition in flight.
    pub fn drag_moved(&mut self) -> Option<DestinationId> {
        let cancelled = self.transition.take().map(|t| t.target);
        self.mode = Mode::Dragging;
        cancelled
    }

    pub fn release(&mut self, has_selection: bool) {
        if self.mode == Mode::Dragging {
            self.mode = idle_mode(has_selection);
        }
    }

    pub fn tick(&mut self, projection: &mut Projection, now: Time) -> TickOutcome {
        match self.mode {
            Mode::Autopilot => {
                projection.rotate_by(self.step_deg, 0.0);
                TickOutcome::Spun
            }
            Mode::Transitioning => {
                let Some(transition) = &self.transition else {
                    self.mode = Mode::Holding;
                    return TickOutcome::Still;
                };
                projection.set_rotation(transition.sample(now));
                if !transition.is_complete(now) {
                    return TickOutcome::Stepped;
                }
                let target = transition.target.clone();
                self.transition = None;
                self.mode = Mode::Holding;
                debug!(id = %target, "transition finished");
                TickOutcome::Finished(target)
            }
            Mode::Dragging | Mode::Holding => TickOutcome::Still,
        }
    }
}

fn idle_mode(has_selection: bool) -> Mode {
    if has_selection {
        Mode::Holding
    } else {
        Mode::Autopilot
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationDriver, Mode, TickOutcome, Transition, ease_in_out_cubic};
    use crate::config::GlobeConfig;
    use crate::destination::DestinationId;
    use crate::projection::{Projection, Rotation};
    use foundation::math::LonLat;
    use foundation::time::Time;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ≈ {b} (eps {eps})");
    }

    #[test]
    fn easing_is_symmetric_and_pinned_at_ends() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_close(ease_in_out_cubic(0.25) + ease_in_out_cubic(0.75), 1.0, 1e-12);
        assert!(ease_in_out_cubic(0.1) < 0.1);
    }

    #[test]
    fn transition_takes_the_short_way_round() {
        let t = Transition::new(
            DestinationId::new("x"),
            Rotation::new(170.0, 0.0, 0.0),
            Rotation::new(-170.0, 0.0, 0.0),
            Time(0.0),
            1.0,
        );
        let mid = t.sample(Time(0.5));
        assert_close(mid.lambda, 180.0, 1e-9);
    }

    #[test]
    fn transition_ends_exactly_on_target() {
        let cfg = GlobeConfig::default();
        let mut driver = AnimationDriver::new(&cfg);
        let mut proj = Projection::new(&cfg);
        proj.set_rotation(Rotation::new(37.3, 12.9, 0.0));

        let id = DestinationId::new("b");
        driver.start_transition(id.clone(), LonLat::new(102.1, 12.6), proj.rotation(), Time(0.0));
        assert_eq!(driver.mode(), Mode::Transitioning);

        let before = proj.rotation();
        assert_eq!(driver.tick(&mut proj, Time(0.5)), TickOutcome::Stepped);
        assert_ne!(proj.rotation(), before);

        assert_eq!(driver.tick(&mut proj, Time(1.2)), TickOutcome::Finished(id));
        assert_eq!(proj.rotation().lambda, -102.1);
        assert_eq!(proj.rotation().phi, -12.6);
        assert_eq!(driver.mode(), Mode::Holding);
        assert_eq!(driver.tick(&mut proj, Time(2.0)), TickOutcome::Still);
    }

    #[test]
    fn press_keeps_transition_until_pointer_moves() {
        let cfg = GlobeConfig::default();
        let mut driver = AnimationDriver::new(&cfg);
        let id = DestinationId::new("a");
        driver.start_transition(id.clone(), LonLat::new(101.6, 3.1), Rotation::default(), Time(0.0));

        driver.press();
        assert_eq!(driver.mode(), Mode::Transitioning);
        assert_eq!(driver.drag_moved(), Some(id));
        assert_eq!(driver.mode(), Mode::Dragging);
        assert!(driver.transition().is_none());

        driver.release(true);
        assert_eq!(driver.mode(), Mode::Holding);
    }

    #[test]
    fn autopilot_spins_only_when_idle() {
        let cfg = GlobeConfig::default();
        let mut driver = AnimationDriver::new(&cfg);
        let mut proj = Projection::new(&cfg);

        assert_eq!(driver.tick(&mut proj, Time(0.0)), TickOutcome::Spun);
        assert_close(proj.rotation().lambda, 0.1, 1e-12);

        driver.press();
        assert_eq!(driver.tick(&mut proj, Time(0.0)), TickOutcome::Still);
        driver.release(false);
        assert_eq!(driver.mode(), Mode::Autopilot);
        driver.settle(true, false);
        assert_eq!(driver.mode(), Mode::Holding);
        assert_eq!(driver.tick(&mut proj, Time(0.0)), TickOutcome::Still);
    }

    #[test]
    fn settling_under_a_held_pointer_stays_suspended() {
        let cfg = GlobeConfig::default();
        let mut driver = AnimationDriver::new(&cfg);
        let mut proj = Projection::new(&cfg);
        driver.start_transition(
            DestinationId::new("b"),
            LonLat::new(102.1, 12.6),
            proj.rotation(),
            Time(0.0),
        );
        driver.press();
        assert_eq!(driver.mode(), Mode::Transitioning);

        let cancelled = driver.settle(false, true);
        assert_eq!(cancelled, Some(DestinationId::new("b")));
        assert_eq!(driver.mode(), Mode::Dragging);
        let before = proj.rotation();
        assert_eq!(driver.tick(&mut proj, Time(0.5)), TickOutcome::Still);
        assert_eq!(proj.rotation(), before);

        driver.release(false);
        assert_eq!(driver.mode(), Mode::Autopilot);
    }
}
