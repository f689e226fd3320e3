use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use smallvec::SmallVec;

use crate::core::input::{LaneState, MAX_LANES};
use crate::game::chart::Chart;
use crate::game::clock::SessionClock;
use crate::game::judgment::{Judgment, Outcome};
use crate::game::note::{HoldState, Note, NoteType};
use crate::game::scores::ScoreAccumulator;
use crate::game::song::SongEntry;
use crate::game::timing_windows::TimingProfile;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Counting,
    Playing,
    /// Every note is resolved. Terminal.
    Finished,
}

pub type Judgments = SmallVec<[Judgment; 4]>;

/// What one call to [`update`] did.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub elapsed: f32,
    pub phase: Phase,
    /// `Some` only while counting down.
    pub countdown_remaining: Option<f32>,
    pub judgments: Judgments,
    pub score: u64,
}

/// All per-play state for one selected song. A new selection builds a new
/// `Session`; nothing is carried over.
#[derive(Clone, Debug)]
pub struct Session {
    pub song: Arc<SongEntry>,
    pub chart: Arc<Chart>,
    pub timing: TimingProfile,
    clock: SessionClock,
    phase: Phase,
    // Every note before this index is resolved.
    cursor: usize,
    hold: Option<HoldState>,
    score: ScoreAccumulator,
    results: Vec<Option<Judgment>>,
    last_judgments: [Option<Judgment>; MAX_LANES],
}

impl Session {
    pub fn new(song: Arc<SongEntry>, chart: Arc<Chart>, timing: TimingProfile, now: Instant) -> Self {
        info!(
            "Starting session for song {} '{}': {} notes, {:.1}s countdown.",
            song.id,
            song.title,
            chart.len(),
            timing.countdown_s
        );
        let results = vec![None; chart.len()];
        Self {
            song,
            chart,
            timing,
            clock: SessionClock::start(now, timing.countdown_s),
            phase: Phase::Counting,
            cursor: 0,
            hold: None,
            score: ScoreAccumulator::new(),
            results,
            last_judgments: [None; MAX_LANES],
        }
    }

    #[inline(always)]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[inline(always)]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub const fn score(&self) -> u64 {
        self.score.total()
    }

    #[inline(always)]
    pub const fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Hold progress for the note at the cursor, if it is a hold being judged.
    #[inline(always)]
    pub const fn hold_state(&self) -> Option<&HoldState> {
        self.hold.as_ref()
    }

    /// Final judgment per chart index, `None` until resolved.
    pub fn results(&self) -> &[Option<Judgment>] {
        &self.results
    }

    /// Most recent judgment per lane index, for flash feedback.
    pub fn last_judgments(&self) -> &[Option<Judgment>; MAX_LANES] {
        &self.last_judgments
    }

    #[inline(always)]
    pub fn is_finished(&self) -> bool {
        self.phase() == Phase::Finished
    }
}

/// Runs one tick: leaves the countdown once it reaches zero, then judges
/// every due note in chart order.
pub fn update(state: &mut Session, now: Instant, lanes: &LaneState) -> TickReport {
    let elapsed = state.clock.elapsed(now);
    let mut judgments = Judgments::new();

    if state.phase == Phase::Counting {
        let remaining = state.clock.countdown_remaining(now);
        if remaining > 0.0 {
            return TickReport {
                elapsed,
                phase: state.phase,
                countdown_remaining: Some(remaining),
                judgments,
                score: state.score(),
            };
        }
        state.phase = Phase::Playing;
        info!("Countdown over at {elapsed:.3}s; judging starts.");
    }

    if state.phase == Phase::Playing {
        judge_due_notes(state, elapsed, lanes, &mut judgments);
        if state.cursor >= state.chart.len() {
            state.phase = Phase::Finished;
            info!(
                "All {} notes judged at {:.3}s. Final score: {}",
                state.chart.len(),
                elapsed,
                state.score()
            );
        }
    }

    TickReport {
        elapsed,
        phase: state.phase,
        countdown_remaining: None,
        judgments,
        score: state.score(),
    }
}

fn judge_due_notes(state: &mut Session, elapsed: f32, lanes: &LaneState, out: &mut Judgments) {
    let chart = Arc::clone(&state.chart);
    while let Some(&note) = chart.get(state.cursor) {
        if note.time > elapsed {
            break;
        }
        let index = state.cursor;

        if !lanes.is_pressed(note.lane) {
            if state.timing.window_passed(note.time, elapsed) {
                resolve(state, index, note, Outcome::Miss, elapsed, out);
                continue;
            }
            // Still pressable; later notes wait behind this one.
            break;
        }

        match note.note_type {
            NoteType::Tap => {
                let outcome = if state.timing.in_window(note.time, elapsed) {
                    Outcome::Hit
                } else {
                    Outcome::Miss
                };
                resolve(state, index, note, outcome, elapsed, out);
            }
            NoteType::Hold => {
                let mut hold = match state.hold {
                    Some(h) if h.note_index == index => h,
                    _ => HoldState::new(index),
                };
                if hold.started_at.is_none() {
                    if !state.timing.in_window(note.time, elapsed) {
                        resolve(state, index, note, Outcome::Miss, elapsed, out);
                        continue;
                    }
                    hold.started_at = Some(elapsed);
                    debug!(
                        "Note at time {:.3} - Lane {} - HOLD - started at {:.3}",
                        note.time, note.lane, elapsed
                    );
                }

                let held_for_s = hold.held_for(elapsed);
                if held_for_s >= state.timing.hold_duration_s {
                    // Offset of a completed hold is measured at its start.
                    let started_at = hold.started_at.unwrap_or(elapsed);
                    resolve(state, index, note, Outcome::HoldComplete, started_at, out);
                    continue;
                }

                state.hold = Some(hold);
                let progress = Judgment {
                    note_index: index,
                    lane: note.lane,
                    outcome: Outcome::HoldProgress { held_for_s },
                    time_error_s: elapsed - note.time,
                    score_delta: 0,
                };
                state.last_judgments[note.lane.index()] = Some(progress);
                out.push(progress);
                break;
            }
        }
    }
    debug_assert!(state.cursor <= state.chart.len());
}

fn resolve(
    state: &mut Session,
    index: usize,
    note: Note,
    outcome: Outcome,
    judged_at: f32,
    out: &mut Judgments,
) {
    let score_delta = match outcome {
        Outcome::Hit => state.timing.tap_score,
        Outcome::HoldComplete => state.timing.hold_score,
        Outcome::Miss | Outcome::HoldProgress { .. } => 0,
    };
    let judgment = Judgment {
        note_index: index,
        lane: note.lane,
        outcome,
        time_error_s: judged_at - note.time,
        score_delta,
    };

    state.score.apply(score_delta);
    state.results[index] = Some(judgment);
    state.last_judgments[note.lane.index()] = Some(judgment);
    state.hold = None;
    state.cursor += 1;

    debug!(
        "Note {} at time {:.3} - Lane {} - {} - {} ({:+.1}ms) +{} Score: {}",
        judgment.note_index,
        note.time,
        judgment.lane,
        note.note_type.as_str().to_ascii_uppercase(),
        outcome.as_str(),
        judgment.time_error_ms(),
        judgment.score_delta,
        state.score()
    );
    out.push(judgment);
}
