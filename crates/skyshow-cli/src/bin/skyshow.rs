//! Drone light-show tool: generate patterns, inspect sequences and export
//! missions for the flight controller.
//!
//! Usage:
//!   cargo run -p skyshow-cli --bin skyshow -- pattern heart --points 32 -o heart.json
//!   cargo run -p skyshow-cli --bin skyshow -- export heart.json --format waypoints
//!   cargo run -p skyshow-cli --bin skyshow -- cues mission.json
//!
//! Home position and speed defaults come from `SKYSHOW_*` environment
//! variables; flags override them.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use skyshow_cli::commands::{
    cue_report, export_mission, export_waypoints, library_delete, library_get, library_list,
    library_save, preview_report, read_mission, sequence_json, stats_report,
};
use skyshow_cli::{apply_setting_overrides, logging, read_sequence, write_output};
use skyshow_core::config::SettingsField;
use skyshow_core::{generate, FileStore, MissionSettings, PatternKind, PatternParams};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Design and export drone light shows")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a pattern sequence
    Pattern {
        /// circle, figure8, spiral, formation, star, heart, wave, helix,
        /// random, square, triangle, zigzag, burst
        kind: PatternKind,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value_t = 24)]
        points: usize,

        #[arg(long, default_value_t = 100.0)]
        radius: f64,

        /// Base altitude (m)
        #[arg(long, default_value_t = 10.0)]
        altitude: f64,

        #[arg(long, default_value_t = 10.0)]
        altitude_variation: f64,

        /// Starting hue in degrees
        #[arg(long, default_value_t = 0.0)]
        hue_start: f64,

        /// Star points / burst rays
        #[arg(long, default_value_t = 5)]
        arms: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a sequence for the flight controller
    Export {
        sequence: PathBuf,

        #[arg(long, value_enum, default_value_t = ExportFormat::Mission)]
        format: ExportFormat,

        #[command(flatten)]
        settings: SettingsArgs,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print waypoint count, altitude, colors and duration
    Stats { sequence: PathBuf },

    /// Print the servo cue plan of a mission document
    Cues {
        mission: PathBuf,

        /// Use key waypoint colors instead of interpolation samples
        #[arg(long)]
        keyframes: bool,
    },

    /// Sample the playback preview at a fixed tick rate
    Preview {
        sequence: PathBuf,

        #[arg(long, default_value_t = 100)]
        tick_ms: u64,

        #[arg(long, default_value_t = 50)]
        ticks: usize,
    },

    /// Manage the saved sequence library
    Library {
        /// Library directory
        #[arg(long, env = "SKYSHOW_LIBRARY_DIR", default_value = ".skyshow")]
        dir: PathBuf,

        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(Subcommand, Debug)]
enum LibraryAction {
    List,
    /// Save a sequence file into the library
    Save { sequence: PathBuf },
    Delete { id: String },
    /// Write a saved sequence out as JSON
    Select {
        id: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    /// QGC WPL 110 text
    Waypoints,
    /// Structured JSON mission document
    Mission,
}

#[derive(clap::Args, Debug)]
struct SettingsArgs {
    #[arg(long, allow_hyphen_values = true)]
    home_lat: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    home_lon: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    home_alt: Option<String>,

    /// Recorded in the mission header (m/s)
    #[arg(long)]
    default_speed: Option<String>,

    #[arg(long)]
    safety_radius: Option<String>,
}

impl SettingsArgs {
    fn resolve(self) -> MissionSettings {
        apply_setting_overrides(
            MissionSettings::from_env(),
            &[
                (SettingsField::HomeLat, self.home_lat),
                (SettingsField::HomeLon, self.home_lon),
                (SettingsField::HomeAlt, self.home_alt),
                (SettingsField::DefaultSpeed, self.default_speed),
                (SettingsField::SafetyRadius, self.safety_radius),
            ],
        )
    }
}

fn main() -> Result<()> {
    logging::init()?;
    let args = Args::parse();

    match args.command {
        Command::Pattern {
            kind,
            name,
            points,
            radius,
            altitude,
            altitude_variation,
            hue_start,
            arms,
            output,
        } => {
            let params = PatternParams {
                name,
                points,
                radius,
                altitude,
                altitude_variation,
                hue_start,
                arms,
                ..PatternParams::default()
            };
            let sequence = generate(kind, &params);
            write_output(output.as_deref(), &sequence_json(&sequence)?)?;
        }
        Command::Export {
            sequence,
            format,
            settings,
            output,
        } => {
            let sequence = read_sequence(&sequence)?;
            let settings = settings.resolve();
            let text = match format {
                ExportFormat::Waypoints => export_waypoints(&sequence, &settings),
                ExportFormat::Mission => export_mission(&sequence, &settings)?,
            };
            write_output(output.as_deref(), &text)?;
        }
        Command::Stats { sequence } => {
            print!("{}", stats_report(&read_sequence(&sequence)?));
        }
        Command::Cues { mission, keyframes } => {
            print!("{}", cue_report(&read_mission(&mission)?, !keyframes));
        }
        Command::Preview {
            sequence,
            tick_ms,
            ticks,
        } => {
            let sequence = read_sequence(&sequence)?;
            print!("{}", preview_report(&sequence, tick_ms, ticks));
        }
        Command::Library { dir, action } => {
            let store = FileStore::new(dir);
            match action {
                LibraryAction::List => print!("{}", library_list(&store)),
                LibraryAction::Save { sequence } => {
                    let id = library_save(&store, read_sequence(&sequence)?)?;
                    println!("{}", id);
                }
                LibraryAction::Delete { id } => {
                    if !library_delete(&store, &id)? {
                        bail!("no saved sequence with id {}", id);
                    }
                    tracing::info!("Deleted {}", id);
                }
                LibraryAction::Select { id, output } => {
                    let Some(sequence) = library_get(&store, &id) else {
                        bail!("no saved sequence with id {}", id);
                    };
                    write_output(output.as_deref(), &sequence_json(&sequence)?)?;
                }
            }
        }
    }

    Ok(())
}
