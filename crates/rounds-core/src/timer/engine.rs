//! Timer engine implementation.
//!
//! The engine is a deterministic state machine with no internal thread and
//! no clock. One call to `tick()` means one elapsed second; the caller (see
//! [`super::TimerRunner`]) decides when a second has passed.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!         Finished
//! ```
//!
//! ## Phase Sequence
//!
//! ```text
//! Prep -> Round 1 -> Rest -> Round 2 -> ... -> Round N -> Finished
//! ```
//!
//! Zero-length prep or rest is passed through without consuming a tick, and
//! there is never a rest after the final round.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(preset.timings());
//! engine.start();
//! // Once per second:
//! for event in engine.tick() { /* render, play cues */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::cue::Cue;
use super::phase::Phase;
use crate::events::Event;

/// Remaining seconds at which the round warning sounds.
pub const WARNING_AT_SECS: u64 = 10;
/// Prep and rest beep while this many seconds (or fewer) remain.
pub const BEEP_FROM_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Phase lengths the engine counts through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub prep_secs: u64,
    pub round_secs: u64,
    pub rest_secs: u64,
    pub rounds: u32,
}

impl Timings {
    /// Length of the whole workout: prep, every round, and the rests between rounds.
    ///
    /// There is no rest after the final round, so this is one rest shorter
    /// than `(round + rest) * rounds`: the default preset runs 47:15, not 48:00.
    pub fn total_secs(&self) -> u64 {
        let rounds = u64::from(self.rounds.max(1));
        self.prep_secs
            .saturating_add(self.round_secs.saturating_mul(rounds))
            .saturating_add(self.rest_secs.saturating_mul(rounds - 1))
    }

    pub fn length_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Prep => self.prep_secs,
            Phase::Round => self.round_secs,
            Phase::Rest => self.rest_secs,
            Phase::Finished => 0,
        }
    }
}

/// Core round timer.
///
/// Counters are only ever changed by the commands below, so a paused engine
/// keeps its exact position and resumes from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    timings: Timings,
    state: TimerState,
    phase: Phase,
    /// 1-based round number; during rest it is the round just completed.
    round: u32,
    remaining_secs: u64,
}

impl TimerEngine {
    /// Create an engine in the `Idle` state, positioned at the first phase.
    pub fn new(timings: Timings) -> Self {
        let timings = Timings {
            rounds: timings.rounds.max(1),
            ..timings
        };
        let mut engine = Self {
            timings,
            state: TimerState::Idle,
            phase: Phase::Prep,
            round: 1,
            remaining_secs: 0,
        };
        engine.rewind();
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.round
    }

    pub fn rounds(&self) -> u32 {
        self.timings.rounds
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn phase_length_secs(&self) -> u64 {
        self.timings.length_of(self.phase)
    }

    pub fn total_secs(&self) -> u64 {
        self.timings.total_secs()
    }

    pub fn is_finished(&self) -> bool {
        self.state == TimerState::Finished
    }

    /// Seconds of the workout already counted down.
    pub fn elapsed_secs(&self) -> u64 {
        let t = &self.timings;
        let done_rounds = u64::from(self.round.saturating_sub(1));
        let rounds_done = |n: u64| {
            t.round_secs
                .saturating_mul(n)
                .saturating_add(t.rest_secs.saturating_mul(done_rounds))
        };
        let before_phase = match self.phase {
            Phase::Prep => 0,
            Phase::Round => t.prep_secs.saturating_add(rounds_done(done_rounds)),
            Phase::Rest => t.prep_secs.saturating_add(rounds_done(done_rounds + 1)),
            Phase::Finished => return self.total_secs(),
        };
        before_phase.saturating_add(self.phase_length_secs().saturating_sub(self.remaining_secs))
    }

    /// 0.0 ..= 1.0 progress across the whole workout.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return if self.is_finished() { 1.0 } else { 0.0 };
        }
        (self.elapsed_secs() as f64 / total as f64).min(1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            round: self.round,
            rounds: self.timings.rounds,
            remaining_secs: self.remaining_secs,
            phase_length_secs: self.phase_length_secs(),
            elapsed_secs: self.elapsed_secs(),
            total_secs: self.total_secs(),
            progress_pct: self.progress() * 100.0,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start from `Idle`, or resume from `Paused`.
    pub fn start(&mut self) -> Vec<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                let mut events = vec![Event::TimerStarted {
                    phase: self.phase,
                    round: self.round,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                }];
                self.entry_cues(&mut events);
                self.settle(&mut events);
                events
            }
            TimerState::Paused => self.resume(),
            TimerState::Running | TimerState::Finished => Vec::new(),
        }
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }
        self.state = TimerState::Paused;
        vec![Event::TimerPaused {
            phase: self.phase,
            round: self.round,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    /// Continue from the paused position. Entry cues are not replayed.
    pub fn resume(&mut self) -> Vec<Event> {
        if self.state != TimerState::Paused {
            return Vec::new();
        }
        self.state = TimerState::Running;
        vec![Event::TimerResumed {
            phase: self.phase,
            round: self.round,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }]
    }

    /// Count down one second. Does nothing unless `Running`.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }
        let mut events = Vec::new();
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.advance(&mut events);
            self.settle(&mut events);
        } else {
            self.countdown_cue(&mut events);
        }
        events.push(Event::Ticked {
            phase: self.phase,
            round: self.round,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        });
        events
    }

    /// End the current phase now and move to the next one.
    ///
    /// Cues only sound while running; skipping an idle or paused timer
    /// repositions it silently and leaves its state alone.
    pub fn skip(&mut self) -> Vec<Event> {
        if self.is_finished() {
            return Vec::new();
        }
        let from = self.phase;
        let mut events = Vec::new();
        self.advance(&mut events);
        self.settle(&mut events);
        events.insert(
            0,
            Event::TimerSkipped {
                from,
                to: self.phase,
                round: self.round,
                at: Utc::now(),
            },
        );
        events
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.state = TimerState::Idle;
        self.rewind();
        vec![Event::TimerReset { at: Utc::now() }]
    }

    pub fn set_timings(&mut self, timings: Timings) -> Vec<Event> {
        self.timings = Timings {
            rounds: timings.rounds.max(1),
            ..timings
        };
        self.reset()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn audible(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Position at the first phase without emitting anything.
    fn rewind(&mut self) {
        self.round = 1;
        if self.timings.prep_secs > 0 {
            self.phase = Phase::Prep;
            self.remaining_secs = self.timings.prep_secs;
        } else {
            self.phase = Phase::Round;
            self.remaining_secs = self.timings.round_secs;
        }
    }

    /// Pass through phases that have nothing left to count.
    fn settle(&mut self, events: &mut Vec<Event>) {
        while self.remaining_secs == 0 && self.phase != Phase::Finished {
            self.advance(events);
        }
    }

    /// Leave the current phase as if it had reached zero.
    fn advance(&mut self, events: &mut Vec<Event>) {
        match self.phase {
            Phase::Prep => self.enter(Phase::Round, 1, events),
            Phase::Round => {
                self.cue(Cue::RoundEnd, events);
                if self.round >= self.timings.rounds {
                    self.finish(events);
                } else if self.timings.rest_secs > 0 {
                    self.enter(Phase::Rest, self.round, events);
                } else {
                    self.enter(Phase::Round, self.round + 1, events);
                }
            }
            Phase::Rest => self.enter(Phase::Round, self.round + 1, events),
            Phase::Finished => {}
        }
    }

    fn enter(&mut self, phase: Phase, round: u32, events: &mut Vec<Event>) {
        self.phase = phase;
        self.round = round;
        self.remaining_secs = self.timings.length_of(phase);
        tracing::debug!(phase = %phase, round, secs = self.remaining_secs, "phase started");
        events.push(Event::PhaseStarted {
            phase,
            round,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        });
        self.entry_cues(events);
    }

    fn finish(&mut self, events: &mut Vec<Event>) {
        self.state = TimerState::Finished;
        self.phase = Phase::Finished;
        self.remaining_secs = 0;
        tracing::info!(rounds = self.timings.rounds, "timer finished");
        events.push(Event::TimerFinished {
            rounds: self.timings.rounds,
            total_secs: self.total_secs(),
            at: Utc::now(),
        });
    }

    fn entry_cues(&self, events: &mut Vec<Event>) {
        if self.phase == Phase::Round {
            self.cue(Cue::RoundStart, events);
        }
        self.countdown_cue(events);
    }

    fn countdown_cue(&self, events: &mut Vec<Event>) {
        let remaining = self.remaining_secs;
        match self.phase {
            Phase::Round if remaining == WARNING_AT_SECS => self.cue(Cue::TenSecondWarning, events),
            Phase::Prep | Phase::Rest if (1..=BEEP_FROM_SECS).contains(&remaining) => {
                self.cue(Cue::Beep, events)
            }
            _ => {}
        }
    }

    fn cue(&self, cue: Cue, events: &mut Vec<Event>) {
        if !self.audible() {
            return;
        }
        events.push(Event::CueTriggered {
            cue,
            phase: self.phase,
            round: self.round,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        });
    }
}
