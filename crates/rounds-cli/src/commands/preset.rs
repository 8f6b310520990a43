//! Preset management commands.
//!
//! Mirrors the preset editor: list, create, rename, duplicate, delete,
//! choose the active preset and step its values up or down.

use clap::{Subcommand, ValueEnum};
use rounds_core::format::{format_clock, format_total, parse_duration};
use rounds_core::{Adjust, Config, Database, Preset, PresetField, PresetLibrary};

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    Inc,
    Dec,
}

impl From<Direction> for Adjust {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Inc => Adjust::Increment,
            Direction::Dec => Adjust::Decrement,
        }
    }
}

#[derive(Subcommand)]
pub enum PresetAction {
    /// List all presets
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one preset (defaults to the active preset)
    Show {
        id: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a preset
    Create {
        name: String,
        /// Number of rounds
        #[arg(long, default_value_t = 3)]
        rounds: u32,
        /// Round length (m:ss or seconds)
        #[arg(long, default_value = "3:00")]
        round_length: String,
        /// Rest between rounds (m:ss or seconds)
        #[arg(long, default_value = "1:00")]
        rest: String,
        /// Prep time before the first round (m:ss or seconds)
        #[arg(long, default_value = "0:15")]
        prep: String,
        /// Make the new preset active
        #[arg(long)]
        activate: bool,
    },
    /// Rename a preset
    Rename { id: i64, name: String },
    /// Copy a preset (defaults to the active preset) and make the copy active
    Duplicate { id: Option<i64> },
    /// Delete a preset
    Delete { id: i64 },
    /// Make a preset active
    Use { id: i64 },
    /// Step a value of the active preset up or down
    Adjust {
        /// rounds, round_length, rest or prep
        field: PresetField,
        direction: Direction,
        /// How many steps to apply
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
}

pub fn run(action: PresetAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut lib = PresetLibrary::open(Database::open()?)?
        .with_adjust_step(config.timer.adjust_step_secs);

    match action {
        PresetAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(lib.presets())?);
            } else {
                let active = lib.active_id();
                for preset in lib.presets() {
                    print_summary(preset, preset.id == active);
                }
            }
        }
        PresetAction::Show { id, json } => {
            let preset = match id {
                Some(id) => lib.get(id).ok_or_else(|| format!("preset {id} not found"))?,
                None => lib.active(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(preset)?);
            } else {
                print_details(preset, preset.id == lib.active_id());
            }
        }
        PresetAction::Create {
            name,
            rounds,
            round_length,
            rest,
            prep,
            activate,
        } => {
            let preset = Preset {
                id: 0,
                name,
                rounds,
                round_length_secs: parse_duration(&round_length)?,
                rest_secs: parse_duration(&rest)?,
                prep_secs: parse_duration(&prep)?,
            };
            let id = lib.create(preset)?.id;
            if activate {
                lib.set_active(id)?;
            }
            println!("Preset created: {id}");
        }
        PresetAction::Rename { id, name } => {
            let preset = lib.rename(id, &name)?;
            println!("Preset {} renamed to '{}'", preset.id, preset.name);
        }
        PresetAction::Duplicate { id } => {
            let source = id.unwrap_or_else(|| lib.active_id());
            let copy = lib.duplicate(source)?;
            println!("Preset duplicated: {} ({})", copy.id, copy.name);
        }
        PresetAction::Delete { id } => {
            lib.delete(id)?;
            println!("Preset deleted: {id}");
            println!("Active preset: {}", lib.active().name);
        }
        PresetAction::Use { id } => {
            let preset = lib.set_active(id)?;
            println!("Active preset: {}", preset.name);
        }
        PresetAction::Adjust {
            field,
            direction,
            times,
        } => {
            let mut changed = 0;
            for _ in 0..times {
                if !lib.adjust_active(field, direction.into())? {
                    break;
                }
                changed += 1;
            }
            if changed < times {
                eprintln!("{field} is at its limit");
            }
            print_details(lib.active(), true);
        }
    }
    Ok(())
}

fn print_summary(preset: &Preset, active: bool) {
    let marker = if active { "*" } else { " " };
    println!(
        "{marker} {:>3}  {:<20} {:>2} x {} / rest {} / prep {}  ({})",
        preset.id,
        preset.name,
        preset.rounds,
        format_clock(preset.round_length_secs),
        format_clock(preset.rest_secs),
        format_clock(preset.prep_secs),
        format_total(preset.total_secs()),
    );
}

fn print_details(preset: &Preset, active: bool) {
    let active = if active { " [ACTIVE]" } else { "" };
    println!("{} ({}){active}", preset.name, preset.id);
    println!("  Rounds:       {}", preset.rounds);
    println!("  Round length: {}", format_clock(preset.round_length_secs));
    println!("  Rest:         {}", format_clock(preset.rest_secs));
    println!("  Prep:         {}", format_clock(preset.prep_secs));
    println!("  Total:        {}", format_total(preset.total_secs()));
}
