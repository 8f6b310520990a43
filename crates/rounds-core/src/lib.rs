//! # Rounds Core Library
//!
//! Core logic for the Rounds boxing round timer. The `rounds` CLI is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A deterministic prep/round/rest state machine advanced
//!   one second per `tick()`, deciding when audio cues fire
//! - **Timer Runner**: A single tokio countdown task per timer that ticks the
//!   engine, fans out events and hands cues to a [`CuePlayer`]
//! - **Presets**: Workout definitions and the preset library
//! - **Storage**: SQLite preset/settings storage and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerRunner`]: Real-time countdown driver
//! - [`PresetLibrary`]: Preset management and the active preset
//! - [`Database`]: Preset and settings persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod format;
pub mod library;
pub mod preset;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use library::PresetLibrary;
pub use preset::{Adjust, Preset, PresetField};
pub use storage::{Config, Database, Settings, ThemeMode};
pub use timer::{
    Cue, CuePlayer, Phase, SilentPlayer, TerminalBell, TimerEngine, TimerRunner, TimerState,
    Timings,
};
