use std::cell::Cell;
use std::rc::Rc;

use foundation::time::Time;

use crate::frame::Frame;

/// Slack for comparing scheduled tick times against the clock.
const DUE_EPSILON_S: f64 = 1e-9;

/// Shared cancellation flag.
///
/// Hosts that schedule callbacks (animation frames, timers) keep a clone and
/// check it before invoking the owner; once cancelled it never resets.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Fixed-rate tick source.
///
/// The ticker does not own a thread or an OS timer: the host polls
/// [`Ticker::due`] with the current time and receives the frames whose
/// scheduled time has passed, in order. Dropping the ticker cancels its token.
#[derive(Debug)]
pub struct Ticker {
    dt_s: f64,
    origin: Time,
    next_index: u64,
    max_catch_up: usize,
    token: CancelToken,
}

impl Ticker {
    /// Starts ticking at `rate_hz`; the first frame is due one interval after `now`.
    pub fn start(rate_hz: f64, now: Time) -> Self {
        let rate_hz = if rate_hz.is_finite() && rate_hz > 0.0 {
            rate_hz
        } else {
            60.0
        };
        Self {
            dt_s: 1.0 / rate_hz,
            origin: now,
            next_index: 1,
            max_catch_up: 8,
            token: CancelToken::new(),
        }
    }

    /// Caps how many overdue frames a single poll delivers; older ones are skipped.
    pub fn with_max_catch_up(mut self, frames: usize) -> Self {
        self.max_catch_up = frames.max(1);
        self
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_s
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn stop(&mut self) {
        self.token.cancel();
    }

    /// Frames scheduled at or before `now` that have not been delivered yet.
    pub fn due(&mut self, now: Time) -> Vec<Frame> {
        if !self.is_running() {
            return Vec::new();
        }

        let elapsed = now.since(self.origin) + DUE_EPSILON_S;
        if elapsed < 0.0 {
            return Vec::new();
        }
        let last_due = (elapsed / self.dt_s).floor() as u64;
        if last_due < self.next_index {
            return Vec::new();
        }

        let pending = (last_due - self.next_index + 1) as usize;
        if pending > self.max_catch_up {
            self.next_index = last_due + 1 - self.max_catch_up as u64;
        }

        let mut out = Vec::with_capacity(pending.min(self.max_catch_up));
        while self.next_index <= last_due {
            out.push(Frame::new(self.next_index, self.dt_s, self.origin));
            self.next_index += 1;
        }
        out
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::Ticker;
    use foundation::time::Time;

    #[test]
    fn delivers_each_frame_once_in_order() {
        let mut ticker = Ticker::start(10.0, Time(0.0));
        assert!(ticker.due(Time(0.05)).is_empty());

        let frames = ticker.due(Time(0.3));
        let idx: Vec<u64> = frames.iter().map(|f| f.index).collect();
        assert_eq!(idx, vec![1, 2, 3]);
        assert!(ticker.due(Time(0.3)).is_empty());

        let next = ticker.due(Time(0.4));
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].index, 4);
    }

    #[test]
    fn skips_frames_beyond_catch_up_limit() {
        let mut ticker = Ticker::start(10.0, Time(0.0)).with_max_catch_up(2);
        let frames = ticker.due(Time(1.0));
        let idx: Vec<u64> = frames.iter().map(|f| f.index).collect();
        assert_eq!(idx, vec![9, 10]);
    }

    #[test]
    fn stop_and_drop_cancel_the_token() {
        let mut ticker = Ticker::start(60.0, Time(0.0));
        let token = ticker.token();
        ticker.stop();
        assert!(token.is_cancelled());
        assert!(ticker.due(Time(5.0)).is_empty());

        let ticker = Ticker::start(60.0, Time(0.0));
        let token = ticker.token();
        assert!(!token.is_cancelled());
        drop(ticker);
        assert!(token.is_cancelled());
    }
}
