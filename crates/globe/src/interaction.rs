//! Pointer drag and zoom handling.
//!
//! Drag deltas are scaled by `sensitivity / scale`, so the globe surface
//! roughly follows the pointer at any zoom level.

use foundation::math::Vec2;

use crate::config::GlobeConfig;
use crate::input::{Cursor, GlobeInput};
use crate::projection::{Projection, ScreenPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Pressed {
        start: ScreenPoint,
        last: ScreenPoint,
        /// Largest distance from `start` seen during the gesture.
        travel: f64,
    },
}

/// What an input did to the projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionOutcome {
    Ignored,
    Pressed { at: ScreenPoint },
    Rotated { d_lambda: f64, d_phi: f64 },
    /// Pointer released after moving less than the click threshold.
    Clicked { at: ScreenPoint },
    DragEnded,
    Zoomed { scale: f64 },
    Hovered { at: ScreenPoint },
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: DragState,
    sensitivity: f64,
    zoom_speed: f64,
    click_threshold_px: f64,
}

impl InteractionController {
    pub fn new(config: &GlobeConfig) -> Self {
        Self {
            state: DragState::Idle,
            sensitivity: config.drag_sensitivity,
            zoom_speed: config.zoom_speed,
            click_threshold_px: config.click_threshold_px,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Pressed { .. })
    }

    pub fn cursor(&self, over_marker: bool) -> Cursor {
        if self.is_dragging() {
            Cursor::Grabbing
        } else if over_marker {
            Cursor::Pointer
        } else {
            Cursor::Grab
        }
    }

    pub fn handle(&mut self, input: GlobeInput, projection: &mut Projection) -> InteractionOutcome {
        match input {
            GlobeInput::PointerDown { x, y } => {
                let at = Vec2::new(x, y);
                if !at.is_finite() {
                    return InteractionOutcome::Ignored;
                }
                self.state = DragState::Pressed {
                    start: at,
                    last: at,
                    travel: 0.0,
                };
                InteractionOutcome::Pressed { at }
            }
            GlobeInput::PointerMove { x, y } => {
                let at = Vec2::new(x, y);
                if !at.is_finite() {
                    return InteractionOutcome::Ignored;
                }
                let DragState::Pressed {
                    start,
                    last,
                    travel,
                } = self.state
                else {
                    return InteractionOutcome::Hovered { at };
                };

                let k = self.sensitivity / projection.scale();
                let d_lambda = (at.x - last.x) * k;
                let d_phi = -(at.y - last.y) * k;
                self.state = DragState::Pressed {
                    start,
                    last: at,
                    travel: travel.max(start.distance(at)),
                };
                if d_lambda == 0.0 && d_phi == 0.0 {
                    return InteractionOutcome::Ignored;
                }
                projection.rotate_by(d_lambda, d_phi);
                InteractionOutcome::Rotated { d_lambda, d_phi }
            }
            GlobeInput::PointerUp => match std::mem::replace(&mut self.state, DragState::Idle) {
                DragState::Pressed { start, travel, .. } if travel < self.click_threshold_px => {
                    InteractionOutcome::Clicked { at: start }
                }
                DragState::Pressed { .. } => InteractionOutcome::DragEnded,
                DragState::Idle => InteractionOutcome::Ignored,
            },
            GlobeInput::PointerLeave => match std::mem::replace(&mut self.state, DragState::Idle) {
                DragState::Pressed { .. } => InteractionOutcome::DragEnded,
                DragState::Idle => InteractionOutcome::Ignored,
            },
            GlobeInput::Wheel { delta } => {
                if !delta.is_finite() {
                    return InteractionOutcome::Ignored;
                }
                let target = projection.scale() * (-delta * self.zoom_speed).exp();
                InteractionOutcome::Zoomed {
                    scale: projection.set_scale(target),
                }
            }
            GlobeInput::Pinch { factor } => {
                if !factor.is_finite() || factor <= 0.0 {
                    return InteractionOutcome::Ignored;
                }
                let target = projection.base_scale() * factor;
                InteractionOutcome::Zoomed {
                    scale: projection.set_scale(target),
                }
            }
        }
    }
}
