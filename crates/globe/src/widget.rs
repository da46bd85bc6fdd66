//! The globe widget: owns projection state and every sub-component, accepts
//! host input and ticks, and publishes frames plus an event trace.

use std::collections::VecDeque;

use formats::LandmassSet;
use foundation::time::Time;
use runtime::{Clock, EventBus, Stamped, SystemClock, Ticker};
use tracing::{debug, info, warn};

use crate::animation::{AnimationDriver, Mode, TickOutcome};
use crate::config::GlobeConfig;
use crate::destination::{Destination, DestinationId};
use crate::input::{Cursor, GlobeInput};
use crate::interaction::{InteractionController, InteractionOutcome};
use crate::markers::{MarkerLayer, MarkerSprite, MarkerStyle, ReconcileReport};
use crate::overlay::{self, OverlayBadge, OverlayInfo};
use crate::projection::{Projection, ScreenPoint};
use crate::render::{RenderFrame, RenderPass};

/// Trace record published on the widget's event bus.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    DestinationsChanged {
        entered: usize,
        exited: usize,
        rejected: usize,
    },
    ActiveChanged {
        id: Option<DestinationId>,
    },
    Selected {
        id: DestinationId,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    TransitionStarted {
        id: DestinationId,
    },
    TransitionCancelled {
        id: DestinationId,
    },
    TransitionFinished {
        id: DestinationId,
    },
    Zoomed {
        scale: f64,
    },
    LandmassLoaded {
        regions: usize,
    },
    LandmassUnavailable {
        reason: String,
    },
    Shutdown,
}

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeFrame {
    /// Render pass counter; increases with every state change.
    pub index: u64,
    pub render: RenderFrame,
    pub markers: Vec<MarkerSprite>,
    pub overlay: Option<OverlayBadge>,
    pub cursor: Cursor,
}

type SelectCallback = Box<dyn FnMut(&DestinationId)>;

pub struct Globe {
    config: GlobeConfig,
    projection: Projection,
    render_pass: RenderPass,
    markers: MarkerLayer,
    interaction: InteractionController,
    animation: AnimationDriver,
    active: Option<DestinationId>,
    overlay: Option<OverlayInfo>,
    clock: Box<dyn Clock>,
    ticker: Ticker,
    on_select: Option<SelectCallback>,
    events: EventBus<GlobeEvent>,
    frame: GlobeFrame,
    hovering: bool,
    shut_down: bool,
}

impl std::fmt::Debug for Globe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Globe")
            .field("rotation", &self.projection.rotation())
            .field("scale", &self.projection.scale())
            .field("mode", &self.animation.mode())
            .field("active", &self.active)
            .field("markers", &self.markers.len())
            .field("frame", &self.frame.index)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

impl Globe {
    pub fn new(config: GlobeConfig, clock: Box<dyn Clock>) -> Self {
        let projection = Projection::new(&config);
        let render_pass = RenderPass::new(&config);
        let ticker = Ticker::start(config.tick_rate_hz, clock.now());
        let frame = GlobeFrame {
            index: 0,
            render: render_pass.run(&projection),
            markers: Vec::new(),
            overlay: None,
            cursor: Cursor::Grab,
        };
        Self {
            markers: MarkerLayer::new(MarkerStyle::from_config(&config)),
            interaction: InteractionController::new(&config),
            animation: AnimationDriver::new(&config),
            projection,
            render_pass,
            active: None,
            overlay: None,
            clock,
            ticker,
            on_select: None,
            events: EventBus::new(),
            frame,
            hovering: false,
            shut_down: false,
            config,
        }
    }

    pub fn with_system_clock(config: GlobeConfig) -> Self {
        Self::new(config, Box::new(SystemClock::new()))
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn mode(&self) -> Mode {
        self.animation.mode()
    }

    pub fn active(&self) -> Option<&DestinationId> {
        self.active.as_ref()
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    /// Last rendered frame.
    pub fn frame(&self) -> &GlobeFrame {
        &self.frame
    }

    pub fn events(&self) -> &VecDeque<Stamped<GlobeEvent>> {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Stamped<GlobeEvent>> {
        self.events.drain()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Registers the callback fired when the user clicks a marker.
    pub fn on_select(&mut self, callback: impl FnMut(&DestinationId) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    /// Replaces the destination list; markers are matched by id.
    pub fn set_destinations(&mut self, destinations: &[Destination]) -> ReconcileReport {
        let had_active = self.active_resolves();
        let report = self.markers.reconcile(destinations);
        debug!(
            entered = report.entered.len(),
            updated = report.updated.len(),
            exited = report.exited.len(),
            rejected = report.rejected.len(),
            "destinations reconciled"
        );
        self.emit(GlobeEvent::DestinationsChanged {
            entered: report.entered.len(),
            exited: report.exited.len(),
            rejected: report.rejected.len(),
        });

        let has_active = self.active_resolves();
        if had_active && !has_active {
            debug!(id = ?self.active, "active destination removed");
            self.settle();
        } else if !had_active && has_active {
            self.begin_transition();
        }

        self.render();
        report
    }

    /// Sets the active selection. Changing it to a known destination starts a
    /// fly-to; clearing it (or naming an unknown id) lets autopilot resume.
    pub fn set_active(&mut self, id: Option<DestinationId>) {
        if self.shut_down || id == self.active {
            return;
        }
        self.active = id;
        self.emit(GlobeEvent::ActiveChanged {
            id: self.active.clone(),
        });

        if self.active_resolves() {
            self.begin_transition();
        } else {
            if let Some(id) = &self.active {
                debug!(id = %id, "active id has no marker; treating as no selection");
            }
            self.settle();
        }
        self.render();
    }

    pub fn set_overlay(&mut self, info: Option<OverlayInfo>) {
        self.overlay = info;
        self.render();
    }

    /// Attaches the landmass dataset; costs one extra render pass.
    pub fn set_landmass(&mut self, landmass: LandmassSet) {
        if self.shut_down {
            return;
        }
        let regions = landmass.region_count();
        info!(regions, "landmass loaded");
        self.render_pass.set_landmass(landmass);
        self.emit(GlobeEvent::LandmassLoaded { regions });
        self.render();
    }

    /// Records that the landmass dataset could not be loaded. Markers and
    /// interaction are unaffected.
    pub fn landmass_unavailable(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(reason = %reason, "landmass unavailable; rendering without land");
        self.emit(GlobeEvent::LandmassUnavailable { reason });
    }

    pub fn handle_input(&mut self, input: GlobeInput) {
        if self.shut_down {
            return;
        }
        let before = self.animation.mode();
        match self.interaction.handle(input, &mut self.projection) {
            InteractionOutcome::Ignored => {}
            InteractionOutcome::Pressed { .. } => {
                self.animation.press();
                self.frame.cursor = self.interaction.cursor(self.hovering);
            }
            InteractionOutcome::Rotated { .. } => {
                if let Some(id) = self.animation.drag_moved() {
                    debug!(id = %id, "drag cancelled transition");
                    self.emit(GlobeEvent::TransitionCancelled { id });
                }
                self.render();
            }
            InteractionOutcome::Clicked { at } => {
                self.animation.release(self.active_resolves());
                self.click(at);
                self.render();
            }
            InteractionOutcome::DragEnded => {
                self.animation.release(self.active_resolves());
                self.render();
            }
            InteractionOutcome::Zoomed { scale } => {
                self.emit(GlobeEvent::Zoomed { scale });
                self.render();
            }
            InteractionOutcome::Hovered { at } => {
                self.hovering = self
                    .markers
                    .pick(at, self.config.pick_tolerance_px, self.active.as_ref())
                    .is_some();
                self.frame.cursor = self.interaction.cursor(self.hovering);
            }
        }
        self.note_mode_change(before);
    }

    /// Runs one animation tick at the clock's current time.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.tick_at(now);
    }

    /// Runs every tick the ticker has scheduled up to now; returns how many ran.
    pub fn pump(&mut self) -> usize {
        if self.shut_down {
            return 0;
        }
        let frames = self.ticker.due(self.clock.now());
        for frame in &frames {
            self.tick_at(frame.time);
        }
        frames.len()
    }

    /// Stops the ticker and cancels any transition. Later ticks and input are no-ops.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.ticker.stop();
        let held = self.interaction.is_dragging();
        if let Some(id) = self.animation.settle(self.active_resolves(), held) {
            self.emit(GlobeEvent::TransitionCancelled { id });
        }
        self.shut_down = true;
        self.emit(GlobeEvent::Shutdown);
        debug!("globe shut down");
    }

    fn tick_at(&mut self, now: Time) {
        if self.shut_down {
            return;
        }
        let before = self.animation.mode();
        let outcome = self.animation.tick(&mut self.projection, now);
        if let TickOutcome::Finished(id) = &outcome {
            self.emit(GlobeEvent::TransitionFinished { id: id.clone() });
        }
        if outcome.moved() {
            self.render();
        }
        self.note_mode_change(before);
    }

    fn click(&mut self, at: ScreenPoint) {
        let Some(id) = self
            .markers
            .pick(at, self.config.pick_tolerance_px, self.active.as_ref())
            .cloned()
        else {
            return;
        };
        debug!(id = %id, "marker selected");
        self.emit(GlobeEvent::Selected { id: id.clone() });
        if let Some(callback) = self.on_select.as_mut() {
            callback(&id);
        }
    }

    fn active_resolves(&self) -> bool {
        self.active.as_ref().is_some_and(|id| self.markers.contains(id))
    }

    fn begin_transition(&mut self) {
        let Some(id) = self.active.clone() else {
            return;
        };
        let Some(target) = self.markers.get(&id).map(|m| m.destination.coordinates) else {
            return;
        };
        let before = self.animation.mode();
        let now = self.clock.now();
        if let Some(replaced) =
            self.animation
                .start_transition(id.clone(), target, self.projection.rotation(), now)
        {
            self.emit(GlobeEvent::TransitionCancelled { id: replaced });
        }
        self.emit(GlobeEvent::TransitionStarted { id });
        self.note_mode_change(before);
    }

    fn settle(&mut self) {
        let before = self.animation.mode();
        let held = self.interaction.is_dragging();
        if let Some(id) = self.animation.settle(self.active_resolves(), held) {
            self.emit(GlobeEvent::TransitionCancelled { id });
        }
        self.note_mode_change(before);
    }

    fn note_mode_change(&mut self, before: Mode) {
        let after = self.animation.mode();
        if before != after {
            debug!(from = ?before, to = ?after, "mode changed");
            self.emit(GlobeEvent::ModeChanged {
                from: before,
                to: after,
            });
        }
    }

    fn emit(&mut self, event: GlobeEvent) {
        self.events.emit(self.frame.index, event);
    }

    fn render(&mut self) {
        self.markers.update(&self.projection);
        let active_marker = self.active.as_ref().and_then(|id| self.markers.get(id));
        let overlay = overlay::place(
            self.overlay.as_ref(),
            active_marker,
            self.config.overlay_offset_px,
        );
        self.frame = GlobeFrame {
            index: self.frame.index + 1,
            render: self.render_pass.run(&self.projection),
            markers: self
                .markers
                .sprites(self.active.as_ref(), self.projection.zoom()),
            overlay,
            cursor: self.interaction.cursor(self.hovering),
        };
    }
}

impl Drop for Globe {
    fn drop(&mut self) {
        self.shutdown();
    }
}
