use std::time::Instant;

use log::info;

use crate::core::input::{LaneSet, MAX_LANES};
use crate::game::gameplay::{Phase, Session, TickReport};
use crate::game::judgment::{Judgment, Outcome};
use crate::game::stage_stats::StageSummary;
use crate::screens::Screen;
use crate::screens::evaluation;

/// Everything a renderer needs for one tick of gameplay.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub title: &'a str,
    pub elapsed: f32,
    pub phase: Phase,
    /// Seconds left on the countdown, `None` once play has begun.
    pub countdown_remaining: Option<f32>,
    /// Whole seconds shown on the countdown overlay.
    pub countdown_display: Option<u32>,
    pub score: u64,
    /// Judgments made during this tick, in chart order.
    pub judgments: &'a [Judgment],
    pub lanes: LaneSet,
    pub last_judgments: &'a [Option<Judgment>; MAX_LANES],
    /// How long the hold at the cursor has been kept, if one is in progress.
    pub hold_progress: Option<f32>,
    pub song_length_s: f32,
}

impl<'a> Frame<'a> {
    pub fn new(session: &'a Session, report: &'a TickReport, lanes: LaneSet, now: Instant) -> Self {
        Self {
            title: &session.song.title,
            elapsed: report.elapsed,
            phase: report.phase,
            countdown_remaining: report.countdown_remaining,
            countdown_display: session.clock().countdown_display(now),
            score: report.score,
            judgments: &report.judgments,
            lanes,
            last_judgments: session.last_judgments(),
            hold_progress: session
                .hold_state()
                .filter(|h| h.started_at.is_some())
                .map(|h| h.held_for(report.elapsed)),
            song_length_s: session.chart.last_note_time(),
        }
    }

    pub fn game_time(&self) -> String {
        format_game_time(self.elapsed, self.song_length_s)
    }

    /// One cell per lane: last outcome, or `-` if the lane has not been judged.
    pub fn lane_summary(&self) -> String {
        self.lanes
            .iter()
            .map(|lane| {
                self.last_judgments[lane.index()].map_or("-", |j| j.outcome.as_str())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Receives the state of the app once per tick.
pub trait PresentationSink {
    fn screen_changed(&mut self, _screen: Screen) {}
    fn frame(&mut self, frame: &Frame<'_>);
    fn stage_finished(&mut self, _summary: &StageSummary) {}
}

/// Headless sink: a status line once a second plus countdown ticks.
#[derive(Debug, Default)]
pub struct LogSink {
    log_timer: f32,
    last_elapsed: Option<f32>,
    last_countdown: Option<u32>,
    combo: u32,
    misses: u32,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSink for LogSink {
    fn screen_changed(&mut self, screen: Screen) {
        info!("Screen: {}", screen.as_str());
        *self = Self::default();
    }

    fn frame(&mut self, frame: &Frame<'_>) {
        if frame.countdown_display != self.last_countdown {
            if let (Some(n), Some(remaining)) = (frame.countdown_display, frame.countdown_remaining) {
                info!("'{}' starts in {} ({:.2}s)", frame.title, n, remaining);
            }
            self.last_countdown = frame.countdown_display;
        }

        for j in frame.judgments.iter().filter(|j| j.outcome.resolves_note()) {
            if j.outcome == Outcome::Miss {
                self.combo = 0;
                self.misses += 1;
            } else {
                self.combo += 1;
            }
        }

        let delta = self
            .last_elapsed
            .map_or(0.0, |prev| (frame.elapsed - prev).max(0.0));
        self.last_elapsed = Some(frame.elapsed);
        self.log_timer += delta;
        if self.log_timer >= 1.0 {
            let holding = frame
                .hold_progress
                .map_or_else(String::new, |h| format!(", Holding: {h:.2}s"));
            info!(
                "{:?} Time: {}, Score: {}, Combo: {}, Misses: {}{}, Lanes: [{}]",
                frame.phase,
                frame.game_time(),
                frame.score,
                self.combo,
                self.misses,
                holding,
                frame.lane_summary()
            );
            self.log_timer = 0.0;
        }
    }

    fn stage_finished(&mut self, summary: &StageSummary) {
        for line in evaluation::summary_lines(summary) {
            info!("{line}");
        }
    }
}

fn format_game_time(s: f32, total_seconds: f32) -> String {
    if s < 0.0 {
        return format_game_time(0.0, total_seconds);
    }
    let s_u64 = s as u64;
    let minutes = s_u64 / 60;
    let seconds = s_u64 % 60;

    if total_seconds >= 600.0 {
        format!("{:02}:{:02}", minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
