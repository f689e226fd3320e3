use crate::core::input::Lane;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    Hit,
    Miss,
    /// The hold at the cursor is being kept; the cursor waits on it.
    HoldProgress { held_for_s: f32 },
    HoldComplete,
}

impl Outcome {
    /// Whether this outcome ends judgement of its note.
    #[inline(always)]
    pub const fn resolves_note(self) -> bool {
        !matches!(self, Self::HoldProgress { .. })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::HoldProgress { .. } => "HOLDING",
            Self::HoldComplete => "HELD",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Judgment {
    pub note_index: usize,
    pub lane: Lane,
    pub outcome: Outcome,
    /// Elapsed time minus note time at the judging tick.
    pub time_error_s: f32,
    pub score_delta: u32,
}

impl Judgment {
    #[inline(always)]
    pub fn time_error_ms(&self) -> f32 {
        self.time_error_s * 1000.0
    }
}
