use crate::core::input::{InputQueue, Lane};
use crate::game::chart::Chart;
use crate::game::note::NoteType;
use crate::game::timing_windows::TimingProfile;

/// Extra time a lane stays down past the last moment the judge could still
/// want it pressed, so a tick landing right on that moment sees it down.
const RELEASE_PAD_S: f32 = 0.05;

#[derive(Copy, Clone, Debug, PartialEq)]
struct ScheduledEdge {
    time: f32,
    lane: Lane,
    pressed: bool,
}

/// Plays a chart by queuing the press/release edges a perfect player would.
#[derive(Debug, Clone)]
pub struct Autoplay {
    edges: Vec<ScheduledEdge>,
    next: usize,
}

impl Autoplay {
    pub fn new(chart: &Chart, timing: &TimingProfile) -> Self {
        let mut edges = Vec::with_capacity(chart.len() * 2);
        for note in chart.notes() {
            // The cursor may sit on an earlier hold, so a note can be judged
            // as late as the end of its window; a hold may start that late.
            let hold_for = match note.note_type {
                NoteType::Tap => timing.tap_window_s,
                NoteType::Hold => {
                    timing.tap_window_s + note.duration.unwrap_or(0.0).max(timing.hold_duration_s)
                }
            } + RELEASE_PAD_S;
            edges.push(ScheduledEdge {
                time: note.time,
                lane: note.lane,
                pressed: true,
            });
            edges.push(ScheduledEdge {
                time: note.time + hold_for,
                lane: note.lane,
                pressed: false,
            });
        }
        // Releases before presses at the same instant so back-to-back notes
        // on one lane re-press.
        edges.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.pressed.cmp(&b.pressed)));
        drop_overlapping_releases(&mut edges);
        Self { edges, next: 0 }
    }

    /// Queues every edge due at `elapsed`. Returns how many were queued.
    pub fn poll(&mut self, elapsed: f32, queue: &mut InputQueue) -> usize {
        let start = self.next;
        while let Some(edge) = self.edges.get(self.next) {
            if edge.time > elapsed {
                break;
            }
            queue.queue_input_edge(edge.lane, edge.pressed);
            self.next += 1;
        }
        self.next - start
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.edges.len()
    }
}

/// A release that would cut a later note short (the lane was pressed again
/// before it) is dropped; that note's own release ends the press.
fn drop_overlapping_releases(edges: &mut Vec<ScheduledEdge>) {
    let mut depth = [0u32; crate::core::input::MAX_LANES];
    edges.retain(|e| {
        let d = &mut depth[e.lane.index()];
        if e.pressed {
            *d += 1;
            true
        } else {
            *d = d.saturating_sub(1);
            *d == 0
        }
    });
}
