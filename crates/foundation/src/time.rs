/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn after(self, seconds: f64) -> Self {
        Time(self.0 + seconds)
    }

    /// Seconds elapsed since `earlier` (negative if `earlier` is in the future).
    pub fn since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn starting_at(start: Time, duration_s: f64) -> Self {
        Self {
            start,
            end: start.after(duration_s.max(0.0)),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Normalized position of `t` within the span, clamped to `[0, 1]`.
    ///
    /// A zero-length span is complete as soon as it starts.
    pub fn progress(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, t: Time) -> bool {
        t.0 >= self.end.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};

    #[test]
    fn progress_is_clamped() {
        let span = TimeSpan::starting_at(Time(2.0), 1.0);
        assert_eq!(span.progress(Time(1.0)), 0.0);
        assert_eq!(span.progress(Time(2.5)), 0.5);
        assert_eq!(span.progress(Time(9.0)), 1.0);
        assert!(span.is_complete(Time(3.0)));
        assert!(!span.is_complete(Time(2.99)));
    }

    #[test]
    fn zero_length_span_completes_immediately() {
        let span = TimeSpan::starting_at(Time(1.0), 0.0);
        assert_eq!(span.progress(Time(1.0)), 1.0);
        assert_eq!(span.progress(Time(0.5)), 0.0);
    }
}
