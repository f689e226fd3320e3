// Shared judge timing so gameplay, autoplay and presentation agree.

// All windows are in seconds.
pub const DEFAULT_TAP_WINDOW_S: f32 = 0.5;
pub const DEFAULT_HOLD_DURATION_S: f32 = 1.0;
pub const DEFAULT_COUNTDOWN_S: f32 = 5.0;

pub const DEFAULT_TAP_SCORE: u32 = 100;
pub const DEFAULT_HOLD_SCORE: u32 = 200;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingProfile {
    /// Max |elapsed - note time| for a press to count.
    pub tap_window_s: f32,
    /// How long a hold must be kept after it starts.
    pub hold_duration_s: f32,
    pub countdown_s: f32,
    pub tap_score: u32,
    pub hold_score: u32,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self {
            tap_window_s: DEFAULT_TAP_WINDOW_S,
            hold_duration_s: DEFAULT_HOLD_DURATION_S,
            countdown_s: DEFAULT_COUNTDOWN_S,
            tap_score: DEFAULT_TAP_SCORE,
            hold_score: DEFAULT_HOLD_SCORE,
        }
    }
}

impl TimingProfile {
    #[inline(always)]
    pub fn in_window(&self, note_time: f32, elapsed: f32) -> bool {
        (elapsed - note_time).abs() <= self.tap_window_s
    }

    /// True once a note can no longer be pressed in time.
    #[inline(always)]
    pub fn window_passed(&self, note_time: f32, elapsed: f32) -> bool {
        elapsed > note_time + self.tap_window_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_inclusive_on_both_sides() {
        let t = TimingProfile {
            tap_window_s: 0.25,
            ..TimingProfile::default()
        };
        assert!(t.in_window(1.0, 1.25));
        assert!(t.in_window(1.0, 0.75));
        assert!(!t.in_window(1.0, 1.3));
        assert!(!t.window_passed(1.0, 1.25));
        assert!(t.window_passed(1.0, 1.3));
    }
}
