pub mod config;
pub mod preset;
pub mod run;
pub mod settings;
