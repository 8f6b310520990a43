//! Workout presets.
//!
//! A preset is the user-editable description of a workout. The timer only
//! sees its [`Timings`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::Timings;

/// Seconds added or removed by one duration adjustment.
pub const ADJUST_STEP_SECS: u64 = 5;
/// Longest prep, round or rest a preset may hold.
pub const MAX_PHASE_SECS: u64 = 24 * 60 * 60;
pub const MAX_ROUNDS: u32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Row id; 0 until the preset has been stored.
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub rounds: u32,
    pub round_length_secs: u64,
    pub rest_secs: u64,
    pub prep_secs: u64,
}

/// A preset value that can be stepped up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetField {
    Rounds,
    RoundLength,
    Rest,
    Prep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    Increment,
    Decrement,
}

impl Preset {
    /// The preset seeded into an empty library.
    pub fn default_preset() -> Self {
        Self {
            id: 0,
            name: "Default".into(),
            rounds: 12,
            round_length_secs: 3 * 60,
            rest_secs: 60,
            prep_secs: 15,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "must not be empty"));
        }
        if !(1..=MAX_ROUNDS).contains(&self.rounds) {
            return Err(ValidationError::invalid(
                "rounds",
                format!("must be between 1 and {MAX_ROUNDS}"),
            ));
        }
        if self.round_length_secs < 1 {
            return Err(ValidationError::invalid(
                "round_length",
                "must be at least one second",
            ));
        }
        for (field, secs) in [
            ("round_length", self.round_length_secs),
            ("rest", self.rest_secs),
            ("prep", self.prep_secs),
        ] {
            if secs > MAX_PHASE_SECS {
                return Err(ValidationError::invalid(field, "must be at most 24 hours"));
            }
        }
        Ok(())
    }

    pub fn timings(&self) -> Timings {
        Timings {
            prep_secs: self.prep_secs,
            round_secs: self.round_length_secs,
            rest_secs: self.rest_secs,
            rounds: self.rounds,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.timings().total_secs()
    }

    /// Name given to a copy of this preset.
    pub fn copy_name(&self) -> String {
        format!("{} (Copy)", self.name)
    }

    /// Step one field using the default step size. Returns whether anything changed.
    pub fn adjust(&mut self, field: PresetField, direction: Adjust) -> bool {
        self.adjust_by(field, direction, ADJUST_STEP_SECS)
    }

    /// Step one field. Durations move by `step_secs`, never drop to or
    /// below `step_secs` and never pass [`MAX_PHASE_SECS`]. Rounds move by
    /// one within `1..=MAX_ROUNDS`.
    pub fn adjust_by(&mut self, field: PresetField, direction: Adjust, step_secs: u64) -> bool {
        let step_secs = step_secs.max(1);
        let secs = match field {
            PresetField::Rounds => {
                return match direction {
                    Adjust::Increment if self.rounds < MAX_ROUNDS => {
                        self.rounds += 1;
                        true
                    }
                    Adjust::Increment => false,
                    Adjust::Decrement if self.rounds > 1 => {
                        self.rounds -= 1;
                        true
                    }
                    Adjust::Decrement => false,
                };
            }
            PresetField::RoundLength => &mut self.round_length_secs,
            PresetField::Rest => &mut self.rest_secs,
            PresetField::Prep => &mut self.prep_secs,
        };
        match direction {
            Adjust::Increment if secs.saturating_add(step_secs) <= MAX_PHASE_SECS => {
                *secs += step_secs;
                true
            }
            Adjust::Increment => false,
            Adjust::Decrement if *secs > step_secs => {
                *secs -= step_secs;
                true
            }
            Adjust::Decrement => false,
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::default_preset()
    }
}

impl PresetField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetField::Rounds => "rounds",
            PresetField::RoundLength => "round_length",
            PresetField::Rest => "rest",
            PresetField::Prep => "prep",
        }
    }
}

impl fmt::Display for PresetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "rounds" => Ok(PresetField::Rounds),
            "round_length" | "round" => Ok(PresetField::RoundLength),
            "rest" | "rest_time" => Ok(PresetField::Rest),
            "prep" | "prep_time" => Ok(PresetField::Prep),
            other => Err(ValidationError::invalid(
                "field",
                format!("unknown preset field '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_matches_seed() {
        let p = Preset::default_preset();
        assert_eq!(p.name, "Default");
        assert_eq!(p.rounds, 12);
        assert_eq!(p.round_length_secs, 180);
        assert_eq!(p.rest_secs, 60);
        assert_eq!(p.prep_secs, 15);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn durations_step_by_five_seconds() {
        let mut p = Preset::default_preset();
        assert!(p.adjust(PresetField::RoundLength, Adjust::Increment));
        assert_eq!(p.round_length_secs, 185);
        assert!(p.adjust(PresetField::Rest, Adjust::Decrement));
        assert_eq!(p.rest_secs, 55);
    }

    #[test]
    fn durations_do_not_drop_to_five_seconds_or_below() {
        let mut p = Preset {
            prep_secs: 10,
            ..Preset::default_preset()
        };
        assert!(p.adjust(PresetField::Prep, Adjust::Decrement));
        assert_eq!(p.prep_secs, 5);
        assert!(!p.adjust(PresetField::Prep, Adjust::Decrement));
        assert_eq!(p.prep_secs, 5);
    }

    #[test]
    fn rounds_never_drop_below_one() {
        let mut p = Preset {
            rounds: 2,
            ..Preset::default_preset()
        };
        assert!(p.adjust(PresetField::Rounds, Adjust::Decrement));
        assert!(!p.adjust(PresetField::Rounds, Adjust::Decrement));
        assert_eq!(p.rounds, 1);
    }

    #[test]
    fn validation_rejects_blank_name_and_zero_rounds() {
        let blank = Preset {
            name: "   ".into(),
            ..Preset::default_preset()
        };
        assert!(blank.validate().is_err());

        let no_rounds = Preset {
            rounds: 0,
            ..Preset::default_preset()
        };
        assert!(no_rounds.validate().is_err());
    }

    #[test]
    fn zero_rest_and_prep_are_valid() {
        let p = Preset {
            rest_secs: 0,
            prep_secs: 0,
            ..Preset::default_preset()
        };
        assert!(p.validate().is_ok());
        assert_eq!(p.total_secs(), 12 * 180);
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("round-length".parse::<PresetField>().unwrap(), PresetField::RoundLength);
        assert_eq!("Rest".parse::<PresetField>().unwrap(), PresetField::Rest);
        assert!("tempo".parse::<PresetField>().is_err());
    }

    #[test]
    fn validation_caps_durations_and_rounds() {
        let huge = Preset {
            round_length_secs: 1 << 62,
            rest_secs: 1 << 62,
            ..Preset::default_preset()
        };
        assert!(huge.validate().is_err());

        let long_prep = Preset {
            prep_secs: MAX_PHASE_SECS + 1,
            ..Preset::default_preset()
        };
        assert!(long_prep.validate().is_err());

        let too_many = Preset {
            rounds: MAX_ROUNDS + 1,
            ..Preset::default_preset()
        };
        assert!(too_many.validate().is_err());

        let longest = Preset {
            rounds: MAX_ROUNDS,
            round_length_secs: MAX_PHASE_SECS,
            ..Preset::default_preset()
        };
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn increments_stop_at_the_caps() {
        let mut p = Preset {
            rounds: MAX_ROUNDS,
            rest_secs: MAX_PHASE_SECS - 3,
            ..Preset::default_preset()
        };
        assert!(!p.adjust(PresetField::Rounds, Adjust::Increment));
        assert!(!p.adjust(PresetField::Rest, Adjust::Increment));
        assert_eq!(p.rounds, MAX_ROUNDS);
        assert_eq!(p.rest_secs, MAX_PHASE_SECS - 3);
        assert!(p.validate().is_ok());
    }
}
