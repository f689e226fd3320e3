use crate::game::stage_stats::StageSummary;

pub fn summary_lines(summary: &StageSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Result: #{} {}", summary.song.id, summary.song.title),
        format!("Score: {}", summary.score),
        format!(
            "Hits: {}  Holds: {}  Misses: {}  ({} notes, {:.1}%)",
            summary.hits,
            summary.holds_completed,
            summary.misses,
            summary.total_notes,
            summary.clear_ratio() * 100.0
        ),
    ];
    let t = &summary.timing;
    if t.count > 0 {
        lines.push(format!(
            "Offset: mean {:+.1}ms, mean abs {:.1}ms, stddev {:.1}ms, max {:.1}ms",
            t.mean_ms, t.mean_abs_ms, t.stddev_ms, t.max_abs_ms
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::song::SongEntry;
    use crate::game::timing_stats::TimingStats;
    use std::sync::Arc;

    fn summary(timing: TimingStats) -> StageSummary {
        StageSummary {
            song: Arc::new(SongEntry {
                id: 2,
                title: "Two".to_string(),
                poster_path: None,
            }),
            score: 300,
            total_notes: 4,
            hits: 1,
            holds_completed: 1,
            misses: 2,
            timing,
        }
    }

    #[test]
    fn lines_include_counts_and_ratio() {
        let lines = summary_lines(&summary(TimingStats::default()));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Result: #2 Two");
        assert_eq!(lines[1], "Score: 300");
        assert!(lines[2].contains("Misses: 2"), "{}", lines[2]);
        assert!(lines[2].ends_with("(4 notes, 50.0%)"), "{}", lines[2]);
    }

    #[test]
    fn offsets_only_shown_when_measured() {
        let lines = summary_lines(&summary(TimingStats {
            mean_abs_ms: 20.0,
            mean_ms: -10.0,
            stddev_ms: 5.0,
            max_abs_ms: 30.0,
            count: 2,
        }));
        assert_eq!(lines[3], "Offset: mean -10.0ms, mean abs 20.0ms, stddev 5.0ms, max 30.0ms");
    }
}
