use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Cue, Phase, TimerState};

/// Every state change of a timer produces an Event.
/// The CLI renders them; the runner forwards cue events to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        round: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        round: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        round: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseStarted {
        phase: Phase,
        round: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A sound should be played now.
    CueTriggered {
        cue: Cue,
        phase: Phase,
        round: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Emitted once per elapsed second while running.
    Ticked {
        phase: Phase,
        round: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        from: Phase,
        to: Phase,
        round: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    TimerFinished {
        rounds: u32,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        round: u32,
        rounds: u32,
        remaining_secs: u64,
        phase_length_secs: u64,
        elapsed_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The cue carried by this event, if any.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Event::CueTriggered { cue, .. } => Some(*cue),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Event::TimerFinished { .. })
    }
}
