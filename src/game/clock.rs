use std::time::Instant;

/// Play time for one session. The song clock and the countdown both start at
/// selection, so elapsed time keeps running while the countdown is shown.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    start: Instant,
    countdown_start: Instant,
    countdown_duration_s: f32,
}

impl SessionClock {
    pub fn start(now: Instant, countdown_duration_s: f32) -> Self {
        Self {
            start: now,
            countdown_start: now,
            countdown_duration_s: countdown_duration_s.max(0.0),
        }
    }

    /// Seconds since start. Never negative, even for an `now` before start.
    #[inline(always)]
    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }

    /// Positive while counting down, zero or negative afterwards.
    #[inline(always)]
    pub fn countdown_remaining(&self, now: Instant) -> f32 {
        self.countdown_duration_s - now.saturating_duration_since(self.countdown_start).as_secs_f32()
    }

    /// Whole seconds shown on the countdown overlay, `None` once it is over.
    pub fn countdown_display(&self, now: Instant) -> Option<u32> {
        let remaining = self.countdown_remaining(now);
        (remaining > 0.0).then(|| remaining as u32)
    }
}
