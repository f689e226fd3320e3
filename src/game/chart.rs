use crate::game::note::{Note, NoteType};

/// An immutable, time-ordered note list for one song.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chart {
    notes: Vec<Note>,
}

impl Chart {
    /// Sorts by time. The sort is stable, so notes sharing a timestamp keep
    /// their source order and are judged in that order.
    pub fn from_notes(mut notes: Vec<Note>) -> Self {
        notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { notes }
    }

    #[inline(always)]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn hold_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| n.note_type == NoteType::Hold)
            .count()
    }

    pub fn tap_count(&self) -> usize {
        self.len() - self.hold_count()
    }

    /// Time of the last note start, or 0 for an empty chart.
    pub fn last_note_time(&self) -> f32 {
        self.notes.last().map_or(0.0, |n| n.time)
    }
}
