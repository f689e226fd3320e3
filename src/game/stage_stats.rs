use std::sync::Arc;

use crate::game::gameplay::Session;
use crate::game::judgment::Outcome;
use crate::game::song::SongEntry;
use crate::game::timing_stats::{self, TimingStats};

/// End-of-song numbers shown on evaluation.
#[derive(Clone, Debug)]
pub struct StageSummary {
    pub song: Arc<SongEntry>,
    pub score: u64,
    pub total_notes: usize,
    pub hits: u32,
    pub holds_completed: u32,
    pub misses: u32,
    pub timing: TimingStats,
}

impl StageSummary {
    pub fn from_session(session: &Session) -> Self {
        let mut hits = 0u32;
        let mut holds_completed = 0u32;
        let mut misses = 0u32;
        for j in session.results().iter().flatten() {
            match j.outcome {
                Outcome::Hit => hits += 1,
                Outcome::HoldComplete => holds_completed += 1,
                Outcome::Miss => misses += 1,
                Outcome::HoldProgress { .. } => {}
            }
        }
        Self {
            song: Arc::clone(&session.song),
            score: session.score(),
            total_notes: session.chart.len(),
            hits,
            holds_completed,
            misses,
            timing: timing_stats::compute_note_timing_stats(session.results()),
        }
    }

    /// Resolved notes that were not missed, as a fraction of the chart.
    pub fn clear_ratio(&self) -> f64 {
        if self.total_notes == 0 {
            return 0.0;
        }
        f64::from(self.hits + self.holds_completed) / self.total_notes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{LaneSet, LaneState};
    use crate::game::chart::Chart;
    use crate::game::gameplay;
    use crate::game::note::Note;
    use crate::game::timing_windows::TimingProfile;
    use std::time::{Duration, Instant};

    #[test]
    fn summary_counts_outcomes() {
        let lanes = LaneSet::new(4);
        let l = |n| lanes.lane(n).unwrap();
        let chart = Chart::from_notes(vec![
            Note::tap(0.0, l(1)),
            Note::hold(0.1, l(2), 1.0),
            Note::tap(1.2, l(3)),
        ]);
        let song = Arc::new(SongEntry {
            id: 3,
            title: "Summary".to_string(),
            poster_path: None,
        });
        let timing = TimingProfile {
            countdown_s: 0.0,
            ..TimingProfile::default()
        };
        let t0 = Instant::now();
        let mut session = gameplay::Session::new(song, Arc::new(chart), timing, t0);

        let mut held = LaneState::new(lanes);
        held.set_pressed(l(1), true).unwrap();
        held.set_pressed(l(2), true).unwrap();
        gameplay::update(&mut session, t0 + Duration::from_millis(200), &held);
        gameplay::update(&mut session, t0 + Duration::from_millis(1300), &held);
        gameplay::update(&mut session, t0 + Duration::from_secs(3), &LaneState::new(lanes));
        assert!(session.is_finished());

        let summary = StageSummary::from_session(&session);
        assert_eq!(summary.song.id, 3);
        assert_eq!(summary.total_notes, 3);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.holds_completed, 1);
        assert_eq!(summary.misses, 1);
        assert_eq!(summary.score, 300);
        assert_eq!(summary.timing.count, 2);
        // Tap 200ms late, hold started 100ms late.
        assert!((summary.timing.mean_ms - 150.0).abs() < 0.1);
        assert!((summary.clear_ratio() - 2.0 / 3.0).abs() < 1e-9);
    }
}
