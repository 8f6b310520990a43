mod cue;
mod engine;
mod phase;
mod runner;

pub use cue::{Cue, CuePlayer, SilentPlayer, TerminalBell};
pub use engine::{TimerEngine, TimerState, Timings, BEEP_FROM_SECS, WARNING_AT_SECS};
pub use phase::Phase;
pub use runner::{TimerRunner, DEFAULT_TICK_INTERVAL};
