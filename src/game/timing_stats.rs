use crate::game::judgment::{Judgment, Outcome};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TimingStats {
    pub mean_abs_ms: f32,
    pub mean_ms: f32,
    pub stddev_ms: f32,
    pub max_abs_ms: f32,
    pub count: usize,
}

/// Offset statistics over resolved, non-miss judgments.
pub fn compute_note_timing_stats(results: &[Option<Judgment>]) -> TimingStats {
    let offsets = || {
        results
            .iter()
            .flatten()
            .filter(|j| matches!(j.outcome, Outcome::Hit | Outcome::HoldComplete))
            .map(Judgment::time_error_ms)
    };

    // First pass: sums and maxima
    let mut sum_abs = 0.0_f32;
    let mut sum_signed = 0.0_f32;
    let mut max_abs = 0.0_f32;
    let mut count: usize = 0;
    for e in offsets() {
        let a = e.abs();
        sum_abs += a;
        sum_signed += e;
        max_abs = max_abs.max(a);
        count += 1;
    }

    if count == 0 {
        return TimingStats::default();
    }

    let mean_ms = sum_signed / (count as f32);
    let mean_abs_ms = sum_abs / (count as f32);

    // Second pass: sample standard deviation of signed offsets
    let stddev_ms = if count > 1 {
        let sum_diff_sq: f32 = offsets().map(|e| (e - mean_ms) * (e - mean_ms)).sum();
        (sum_diff_sq / ((count as f32) - 1.0)).sqrt()
    } else {
        0.0
    };

    TimingStats {
        mean_abs_ms,
        mean_ms,
        stddev_ms,
        max_abs_ms: max_abs,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::LaneSet;
    use approx::assert_relative_eq;

    fn judged(outcome: Outcome, time_error_s: f32) -> Option<Judgment> {
        Some(Judgment {
            note_index: 0,
            lane: LaneSet::new(4).lane(1).unwrap(),
            outcome,
            time_error_s,
            score_delta: 0,
        })
    }

    #[test]
    fn ignores_misses_and_unresolved_notes() {
        let results = vec![
            judged(Outcome::Hit, 0.1),
            judged(Outcome::Miss, 0.6),
            None,
            judged(Outcome::HoldComplete, 0.3),
        ];
        let stats = compute_note_timing_stats(&results);
        assert_eq!(stats.count, 2);
        assert_relative_eq!(stats.mean_ms, 200.0, epsilon = 1e-3);
        assert_relative_eq!(stats.mean_abs_ms, 200.0, epsilon = 1e-3);
        assert_relative_eq!(stats.max_abs_ms, 300.0, epsilon = 1e-3);
        // Sample stddev of {100, 300}.
        assert_relative_eq!(stats.stddev_ms, 141.421_36, epsilon = 1e-2);
    }

    #[test]
    fn single_offset_has_zero_spread() {
        let stats = compute_note_timing_stats(&[judged(Outcome::Hit, 0.05)]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.stddev_ms, 0.0);
    }

    #[test]
    fn no_hits_gives_defaults() {
        let stats = compute_note_timing_stats(&[judged(Outcome::Miss, 0.7), None]);
        assert_eq!(stats, TimingStats::default());
    }
}
