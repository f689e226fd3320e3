use crate::core::input::Lane;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoteType {
    Tap,
    Hold,
}

impl NoteType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::Hold => "hold",
        }
    }
}

/// One chart entry. Charts never mutate their notes; per-play hold progress
/// lives in [`HoldState`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Note {
    pub time: f32,
    pub lane: Lane,
    pub note_type: NoteType,
    /// Present for holds only.
    pub duration: Option<f32>,
}

impl Note {
    pub const fn tap(time: f32, lane: Lane) -> Self {
        Self {
            time,
            lane,
            note_type: NoteType::Tap,
            duration: None,
        }
    }

    pub const fn hold(time: f32, lane: Lane, duration: f32) -> Self {
        Self {
            time,
            lane,
            note_type: NoteType::Hold,
            duration: Some(duration),
        }
    }
}

/// Runtime state of the hold note sitting at the judge cursor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoldState {
    pub note_index: usize,
    /// Set on the first tick that sees the lane pressed inside the window.
    pub started_at: Option<f32>,
}

impl HoldState {
    pub const fn new(note_index: usize) -> Self {
        Self {
            note_index,
            started_at: None,
        }
    }

    pub fn held_for(&self, elapsed: f32) -> f32 {
        self.started_at.map_or(0.0, |start| (elapsed - start).max(0.0))
    }
}
