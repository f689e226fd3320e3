use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{info, trace};
use serde::Deserialize;

use crate::core::input::LaneSet;
use crate::game::chart::Chart;
use crate::game::note::{Note, NoteType};
use crate::game::parsing::LoadError;

/// One CSV row as written in the chart file. Everything stays textual so each
/// field can be validated with a precise error.
#[derive(Debug, Deserialize)]
struct RawRow {
    time: String,
    lane: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    duration: Option<String>,
}

pub fn chart_path(notes_dir: &Path, song_id: usize) -> PathBuf {
    notes_dir.join(format!("{song_id} - notes.csv"))
}

/// Loads `<notes_dir>/<song_id> - notes.csv`.
pub fn load_chart(notes_dir: &Path, song_id: usize, lanes: LaneSet) -> Result<Chart, LoadError> {
    let path = chart_path(notes_dir, song_id);
    let file = File::open(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    let chart = parse_chart(file, lanes)?;
    info!(
        "Loaded chart '{}': {} notes ({} taps, {} holds)",
        path.display(),
        chart.len(),
        chart.tap_count(),
        chart.hold_count()
    );
    Ok(chart)
}

/// Parses a whole chart. Any bad row fails the load.
pub fn parse_chart<R: Read>(reader: R, lanes: LaneSet) -> Result<Chart, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut notes = Vec::new();
    for (i, record) in rdr.deserialize::<RawRow>().enumerate() {
        let note = parse_row(i + 1, record?, lanes)?;
        trace!(
            "Note {}: time={:.3} lane={} type={}",
            i,
            note.time,
            note.lane,
            note.note_type.as_str()
        );
        notes.push(note);
    }
    Ok(Chart::from_notes(notes))
}

fn parse_row(row: usize, raw: RawRow, lanes: LaneSet) -> Result<Note, LoadError> {
    let time = raw
        .time
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite() && *t >= 0.0)
        .ok_or_else(|| LoadError::InvalidTime {
            row,
            value: raw.time.clone(),
        })?;

    let unknown_lane = || LoadError::UnknownLane {
        row,
        value: raw.lane.clone(),
        count: lanes.count(),
    };
    let lane_number = raw.lane.parse::<i64>().map_err(|_| unknown_lane())?;
    let lane = lanes.lane(lane_number).map_err(|_| unknown_lane())?;

    let note_type = if raw.kind.eq_ignore_ascii_case("tap") {
        NoteType::Tap
    } else if raw.kind.eq_ignore_ascii_case("hold") {
        NoteType::Hold
    } else {
        return Err(LoadError::UnknownKind {
            row,
            value: raw.kind,
        });
    };

    match note_type {
        NoteType::Tap => Ok(Note::tap(time, lane)),
        NoteType::Hold => {
            let value = raw
                .duration
                .filter(|d| !d.trim().is_empty())
                .ok_or(LoadError::MissingDuration { row })?;
            let duration = value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|d| d.is_finite() && *d > 0.0)
                .ok_or_else(|| LoadError::InvalidDuration {
                    row,
                    value: value.clone(),
                })?;
            Ok(Note::hold(time, lane, duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Chart, LoadError> {
        parse_chart(text.as_bytes(), LaneSet::new(4))
    }

    #[test]
    fn parses_taps_and_holds_sorted_by_time() {
        let chart = parse(
            "time,lane,type,duration\n\
             2.5,3,tap,\n\
             0.0,2,hold,1.0\n\
             1.0,1,TAP,\n",
        )
        .unwrap();

        assert_eq!(chart.len(), 3);
        let first = chart.get(0).unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.lane.number(), 2);
        assert_eq!(first.note_type, NoteType::Hold);
        assert_eq!(first.duration, Some(1.0));
        assert_eq!(chart.get(1).unwrap().note_type, NoteType::Tap);
        assert_eq!(chart.get(2).unwrap().time, 2.5);
    }

    #[test]
    fn duration_column_is_optional_for_tap_only_charts() {
        let chart = parse("time,lane,type\n0.5,1,tap\n1.5,4,tap\n").unwrap();
        assert_eq!(chart.len(), 2);
        assert!(chart.notes().iter().all(|n| n.duration.is_none()));
    }

    #[test]
    fn whitespace_around_fields_is_ignored() {
        let chart = parse("time, lane, type, duration\n 1.0 , 2 , hold , 0.75 \n").unwrap();
        assert_eq!(chart.get(0).unwrap().duration, Some(0.75));
    }

    #[test]
    fn equal_times_keep_file_order() {
        let chart = parse("time,lane,type\n1.0,3,tap\n1.0,1,tap\n1.0,2,tap\n").unwrap();
        let lanes: Vec<u8> = chart.notes().iter().map(|n| n.lane.number()).collect();
        assert_eq!(lanes, vec![3, 1, 2]);
    }

    #[test]
    fn empty_chart_is_valid() {
        assert!(parse("time,lane,type\n").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_numeric_time() {
        let err = parse("time,lane,type\n0.5,1,tap\nsoon,1,tap\n").unwrap_err();
        assert!(
            matches!(err, LoadError::InvalidTime { row: 2, ref value } if value == "soon"),
            "got {err:?}"
        );
    }

    #[test]
    fn rejects_negative_time() {
        let err = parse("time,lane,type\n-0.1,1,tap\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidTime { row: 1, .. }), "got {err:?}");
    }

    #[test]
    fn rejects_unknown_lane() {
        let err = parse("time,lane,type\n0.0,5,tap\n").unwrap_err();
        assert!(
            matches!(err, LoadError::UnknownLane { row: 1, count: 4, .. }),
            "got {err:?}"
        );
        let err = parse("time,lane,type\n0.0,left,tap\n").unwrap_err();
        assert!(matches!(err, LoadError::UnknownLane { row: 1, .. }), "got {err:?}");
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = parse("time,lane,type\n0.0,1,roll\n").unwrap_err();
        assert!(
            matches!(err, LoadError::UnknownKind { row: 1, ref value } if value == "roll"),
            "got {err:?}"
        );
    }

    #[test]
    fn rejects_hold_without_duration() {
        let err = parse("time,lane,type,duration\n0.0,1,hold,\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingDuration { row: 1 }), "got {err:?}");
        let err = parse("time,lane,type\n0.0,1,hold\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingDuration { row: 1 }), "got {err:?}");
    }

    #[test]
    fn rejects_bad_hold_duration() {
        let err = parse("time,lane,type,duration\n0.0,1,hold,0\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidDuration { row: 1, .. }), "got {err:?}");
    }

    #[test]
    fn missing_required_column_is_a_csv_error() {
        let err = parse("time,type\n0.0,tap\n").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)), "got {err:?}");
    }

    #[test]
    fn load_chart_reads_numbered_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("2 - notes.csv"),
            "time,lane,type,duration\n1.0,1,tap,\n",
        )
        .unwrap();

        let chart = load_chart(dir.path(), 2, LaneSet::new(4)).unwrap();
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn load_chart_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_chart(dir.path(), 9, LaneSet::new(4)).unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert!(path.ends_with("9 - notes.csv")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
