use foundation::time::Time;

/// One animation tick.
///
/// Frames are produced at a fixed rate by a [`crate::Ticker`]; `time` is the
/// scheduled time of the tick, not the wall-clock time it was delivered.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based tick index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64, origin: Time) -> Self {
        Self {
            index,
            dt_s,
            time: origin.after(index as f64 * dt_s),
        }
    }
}
