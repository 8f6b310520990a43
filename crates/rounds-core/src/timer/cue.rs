//! Audio cues and the playback seam.
//!
//! The engine only decides *when* a cue fires. Playing it is delegated to a
//! [`CuePlayer`], which must return promptly: the countdown task calls it
//! inline between ticks.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Short countdown beep in the last seconds of prep and rest.
    Beep,
    /// Bell at the start of every round.
    RoundStart,
    /// Clapper ten seconds before the round ends.
    TenSecondWarning,
    /// Bell at the end of every round.
    RoundEnd,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Beep => "beep",
            Cue::RoundStart => "round_start",
            Cue::TenSecondWarning => "ten_second_warning",
            Cue::RoundEnd => "round_end",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plays a cue without blocking the caller.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);
}

impl<F> CuePlayer for F
where
    F: Fn(Cue) + Send + Sync,
{
    fn play(&self, cue: Cue) {
        self(cue)
    }
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&self, _cue: Cue) {}
}

/// Rings the terminal bell on stderr.
///
/// Round bells ring twice so they can be told apart from countdown beeps.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    pub ring: bool,
}

impl TerminalBell {
    pub fn new(ring: bool) -> Self {
        Self { ring }
    }

    fn rings_for(cue: Cue) -> usize {
        match cue {
            Cue::Beep | Cue::TenSecondWarning => 1,
            Cue::RoundStart | Cue::RoundEnd => 2,
        }
    }
}

impl CuePlayer for TerminalBell {
    fn play(&self, cue: Cue) {
        tracing::info!(cue = %cue, "cue");
        if !self.ring {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let bells = "\x07".repeat(Self::rings_for(cue));
        if let Err(e) = stderr.write_all(bells.as_bytes()).and_then(|_| stderr.flush()) {
            tracing::warn!("failed to ring terminal bell: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_are_players() {
        let heard = Mutex::new(Vec::new());
        let player = |cue: Cue| heard.lock().unwrap().push(cue);
        player.play(Cue::RoundStart);
        player.play(Cue::Beep);
        assert_eq!(*heard.lock().unwrap(), vec![Cue::RoundStart, Cue::Beep]);
    }

    #[test]
    fn round_bells_ring_twice() {
        assert_eq!(TerminalBell::rings_for(Cue::RoundEnd), 2);
        assert_eq!(TerminalBell::rings_for(Cue::Beep), 1);
    }
}
