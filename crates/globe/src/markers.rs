//! Identity-keyed marker layer.
//!
//! Markers are stored by [`DestinationId`] and reconciled against each new
//! destination list by set difference, so a marker keeps its identity when
//! the list is reordered or partially replaced.

use std::collections::{BTreeMap, BTreeSet};

use foundation::math::precision::stable_total_cmp_f64;
use tracing::warn;

use crate::config::GlobeConfig;
use crate::destination::{Destination, DestinationId};
use crate::projection::{Projection, ScreenPoint};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub destination: Destination,
    /// Position from the last pass; `None` when beyond the visibility threshold.
    pub screen: Option<ScreenPoint>,
    pub visible: bool,
}

impl Marker {
    fn new(destination: Destination) -> Self {
        Self {
            destination,
            screen: None,
            visible: false,
        }
    }

    pub fn id(&self) -> &DestinationId {
        &self.destination.id
    }
}

/// Outcome of [`MarkerLayer::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub entered: Vec<DestinationId>,
    pub updated: Vec<DestinationId>,
    pub exited: Vec<DestinationId>,
    /// Destinations skipped for non-finite or out-of-range coordinates.
    pub rejected: Vec<DestinationId>,
    /// Repeated ids; only the first occurrence was kept.
    pub duplicates: Vec<DestinationId>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSprite {
    pub text: String,
    pub position: ScreenPoint,
    pub font_px: f64,
}

/// Drawable state of one visible marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSprite {
    pub id: DestinationId,
    pub position: ScreenPoint,
    pub radius: f64,
    pub color: String,
    pub active: bool,
    pub pulse_ring: bool,
    pub glow: bool,
    pub label: Option<LabelSprite>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius_px: f64,
    pub active_radius_px: f64,
    pub color: String,
    pub active_color: String,
    pub label_font_px: f64,
}

impl MarkerStyle {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            radius_px: config.marker_radius_px,
            active_radius_px: config.active_marker_radius_px,
            color: config.marker_color.clone(),
            active_color: config.active_marker_color.clone(),
            label_font_px: config.label_font_px,
        }
    }

    /// Label size for the current zoom; grows with zoom within fixed bounds.
    pub fn label_font_px(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        self.label_font_px * zoom.clamp(0.75, 2.5)
    }
}

#[derive(Debug, Clone)]
pub struct MarkerLayer {
    markers: BTreeMap<DestinationId, Marker>,
    /// Draw order: input order of the last reconcile.
    order: Vec<DestinationId>,
    style: MarkerStyle,
}

impl MarkerLayer {
    pub fn new(style: MarkerStyle) -> Self {
        Self {
            markers: BTreeMap::new(),
            order: Vec::new(),
            style,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: &DestinationId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn contains(&self, id: &DestinationId) -> bool {
        self.markers.contains_key(id)
    }

    /// Markers in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.order.iter().filter_map(|id| self.markers.get(id))
    }

    pub fn reconcile(&mut self, destinations: &[Destination]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut seen: BTreeSet<DestinationId> = BTreeSet::new();
        let mut order = Vec::with_capacity(destinations.len());

        for dest in destinations {
            if !dest.has_valid_coordinates() {
                warn!(
                    id = %dest.id,
                    lon = dest.coordinates.lon_deg,
                    lat = dest.coordinates.lat_deg,
                    "skipping destination with invalid coordinates"
                );
                report.rejected.push(dest.id.clone());
                continue;
            }
            if !seen.insert(dest.id.clone()) {
                warn!(id = %dest.id, "skipping duplicate destination id");
                report.duplicates.push(dest.id.clone());
                continue;
            }

            match self.markers.get_mut(&dest.id) {
                Some(marker) => {
                    if marker.destination.coordinates != dest.coordinates {
                        marker.screen = None;
                        marker.visible = false;
                    }
                    marker.destination = dest.clone();
                    report.updated.push(dest.id.clone());
                }
                None => {
                    self.markers.insert(dest.id.clone(), Marker::new(dest.clone()));
                    report.entered.push(dest.id.clone());
                }
            }
            order.push(dest.id.clone());
        }

        let stale: Vec<DestinationId> = self
            .markers
            .keys()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            self.markers.remove(&id);
            report.exited.push(id);
        }

        self.order = order;
        report
    }

    /// Recomputes every marker's screen position and visibility.
    pub fn update(&mut self, projection: &Projection) {
        for marker in self.markers.values_mut() {
            marker.screen = projection.project(marker.destination.coordinates);
            marker.visible = marker.screen.is_some();
        }
    }

    /// Sprites for visible markers in draw order; the active marker is drawn last.
    pub fn sprites(&self, active: Option<&DestinationId>, zoom: f64) -> Vec<MarkerSprite> {
        let mut out = Vec::with_capacity(self.markers.len());
        let mut active_sprite = None;

        for marker in self.iter() {
            let Some(position) = marker.screen.filter(|_| marker.visible) else {
                continue;
            };
            let is_active = active == Some(marker.id());
            if is_active {
                let font_px = self.style.label_font_px(zoom);
                let radius = self.style.active_radius_px;
                active_sprite = Some(MarkerSprite {
                    id: marker.id().clone(),
                    position,
                    radius,
                    color: self.style.active_color.clone(),
                    active: true,
                    pulse_ring: true,
                    glow: true,
                    label: Some(LabelSprite {
                        text: marker.destination.display_label().to_string(),
                        position: ScreenPoint::new(position.x + radius + 4.0, position.y + font_px * 0.35),
                        font_px,
                    }),
                });
            } else {
                out.push(MarkerSprite {
                    id: marker.id().clone(),
                    position,
                    radius: self.style.radius_px,
                    color: self.style.color.clone(),
                    active: false,
                    pulse_ring: false,
                    glow: false,
                    label: None,
                });
            }
        }

        out.extend(active_sprite);
        out
    }

    /// Topmost visible marker whose disc (plus `tolerance`) contains `point`.
    ///
    /// The active marker wins when hit; otherwise the nearest center wins and
    /// ties go to the marker drawn later.
    pub fn pick(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        active: Option<&DestinationId>,
    ) -> Option<&DestinationId> {
        let mut best: Option<(f64, usize, &DestinationId)> = None;

        for (order, marker) in self.iter().enumerate() {
            let Some(pos) = marker.screen.filter(|_| marker.visible) else {
                continue;
            };
            let is_active = active == Some(marker.id());
            let radius = if is_active {
                self.style.active_radius_px
            } else {
                self.style.radius_px
            };
            let d = pos.distance(point);
            if d > radius + tolerance {
                continue;
            }
            if is_active {
                return Some(marker.id());
            }

            best = match best {
                None => Some((d, order, marker.id())),
                Some((bd, bo, bid)) => {
                    let ord = stable_total_cmp_f64(d, bd).then_with(|| bo.cmp(&order));
                    if ord.is_lt() {
                        Some((d, order, marker.id()))
                    } else {
                        Some((bd, bo, bid))
                    }
                }
            };
        }

        best.map(|(_, _, id)| id)
    }
}
