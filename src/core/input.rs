use std::collections::VecDeque;
use std::fmt;

use log::trace;
use thiserror::Error;

/// Hard upper bound on the configurable lane count.
pub const MAX_LANES: usize = 8;

/// A lane number, 1-based as in chart files. Only [`LaneSet::lane`] hands
/// these out, so a `Lane` is always valid for the set that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lane(u8);

impl Lane {
    #[inline(always)]
    pub const fn number(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("lane {lane} is outside the configured lane set 1..={count}")]
pub struct InvalidLaneError {
    pub lane: i64,
    pub count: u8,
}

/// The fixed, enumerable set of lanes for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneSet {
    count: u8,
}

impl LaneSet {
    pub fn new(count: u8) -> Self {
        Self {
            count: count.clamp(1, MAX_LANES as u8),
        }
    }

    #[inline(always)]
    pub const fn count(self) -> u8 {
        self.count
    }

    pub fn lane(self, number: i64) -> Result<Lane, InvalidLaneError> {
        if number >= 1 && number <= i64::from(self.count) {
            Ok(Lane(number as u8))
        } else {
            Err(InvalidLaneError {
                lane: number,
                count: self.count,
            })
        }
    }

    #[inline(always)]
    pub const fn contains(self, lane: Lane) -> bool {
        lane.0 >= 1 && lane.0 <= self.count
    }

    pub fn iter(self) -> impl Iterator<Item = Lane> {
        (1..=self.count).map(Lane)
    }
}

impl Default for LaneSet {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Which lanes are currently held down. Written only by press/release edges,
/// read by the judge.
#[derive(Clone, Debug)]
pub struct LaneState {
    lanes: LaneSet,
    pressed: [bool; MAX_LANES],
}

impl LaneState {
    pub fn new(lanes: LaneSet) -> Self {
        Self {
            lanes,
            pressed: [false; MAX_LANES],
        }
    }

    #[inline(always)]
    pub const fn lanes(&self) -> LaneSet {
        self.lanes
    }

    pub fn set_pressed(&mut self, lane: Lane, pressed: bool) -> Result<(), InvalidLaneError> {
        if !self.lanes.contains(lane) {
            return Err(InvalidLaneError {
                lane: i64::from(lane.number()),
                count: self.lanes.count(),
            });
        }
        self.pressed[lane.index()] = pressed;
        Ok(())
    }

    /// Lanes outside the set are never pressed.
    #[inline(always)]
    pub fn is_pressed(&self, lane: Lane) -> bool {
        self.lanes.contains(lane) && self.pressed[lane.index()]
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; MAX_LANES];
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEdge {
    pub lane: Lane,
    pub pressed: bool,
}

/// Press/release edges waiting for the next tick. Draining happens once at
/// the top of a tick so lane state cannot change mid-judgement.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<InputEdge>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_input_edge(&mut self, lane: Lane, pressed: bool) {
        self.pending.push_back(InputEdge { lane, pressed });
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Applies every queued edge in arrival order. All valid edges are
    /// applied even if one is rejected; the first rejection is returned.
    pub fn process_input_edges(&mut self, state: &mut LaneState) -> Result<usize, InvalidLaneError> {
        let mut applied = 0;
        let mut first_err = None;
        while let Some(edge) = self.pending.pop_front() {
            match state.set_pressed(edge.lane, edge.pressed) {
                Ok(()) => {
                    trace!(
                        "Lane {} {}",
                        edge.lane,
                        if edge.pressed { "pressed" } else { "released" }
                    );
                    applied += 1;
                }
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(applied),
        }
    }
}
