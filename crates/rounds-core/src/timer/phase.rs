use std::fmt;

use serde::{Deserialize, Serialize};

/// The countdown segment the timer is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Prep,
    Round,
    Rest,
    Finished,
}

impl Phase {
    /// Label shown on the timer screen.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Prep => "Prep",
            Phase::Round => "Fight",
            Phase::Rest => "Rest",
            Phase::Finished => "Finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_is_labelled_fight() {
        assert_eq!(Phase::Round.to_string(), "Fight");
        assert_eq!(Phase::Prep.label(), "Prep");
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Rest).unwrap(), "\"rest\"");
    }
}
