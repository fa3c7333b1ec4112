//! Skyshow CLI - command line tools for drone light-show sequences.
//!
//! This crate backs the `skyshow` binary:
//! - pattern: generate a seed sequence
//! - export: compile a sequence to a waypoint list or mission JSON
//! - stats / preview / cues: inspect sequences and missions
//! - library: manage saved sequences on disk

pub mod commands;
pub mod logging;

pub use commands::{apply_setting_overrides, read_sequence, write_output};
