/// Host input, already translated from platform events into viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobeInput {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    /// Scroll amount; positive zooms out.
    Wheel { delta: f64 },
    /// Cumulative pinch factor relative to the base scale.
    Pinch { factor: f64 },
}

/// Cursor the host should show over the globe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Grab,
    Grabbing,
    /// Hovering a marker.
    Pointer,
}

impl Cursor {
    /// CSS cursor keyword.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Pointer => "pointer",
        }
    }
}
