//! Subcommand implementations. Each returns the text to print so the binary
//! stays a thin argument parser.

use anyhow::{Context, Result};
use chrono::Utc;
use skyshow_core::config::SettingsField;
use skyshow_core::cues::{cue_plan, CueSource, LedChannelMap};
use skyshow_core::mission::{compile_mission, waypoint_list, MissionDocument};
use skyshow_core::models::Sequence;
use skyshow_core::persistence::{load_library, save_library, KeyValueStore};
use skyshow_core::playback::{frame_at, FixedTicks, Playback};
use skyshow_core::store::ShowState;
use skyshow_core::MissionSettings;
use std::fs;
use std::path::Path;

/// Read a sequence JSON file, re-applying timing and color rules.
pub fn read_sequence(path: &Path) -> Result<Sequence> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading sequence {}", path.display()))?;
    let sequence: Sequence = serde_json::from_str(&raw)
        .with_context(|| format!("parsing sequence {}", path.display()))?;
    Ok(sequence.normalized())
}

pub fn read_mission(path: &Path) -> Result<MissionDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading mission {}", path.display()))?;
    MissionDocument::from_json(&raw).with_context(|| format!("parsing mission {}", path.display()))
}

/// Write to `path`, or stdout when none is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}

/// Apply `(field, raw value)` overrides on top of the given settings.
///
/// Rejected values are logged and the previous value is kept.
pub fn apply_setting_overrides(
    mut settings: MissionSettings,
    overrides: &[(SettingsField, Option<String>)],
) -> MissionSettings {
    for (field, raw) in overrides {
        let Some(raw) = raw else { continue };
        if let Err(err) = settings.apply(*field, raw) {
            tracing::warn!("Ignoring setting: {}", err);
        }
    }
    settings
}

pub fn sequence_json(sequence: &Sequence) -> Result<String> {
    let mut json = serde_json::to_string_pretty(sequence)?;
    json.push('\n');
    Ok(json)
}

pub fn export_waypoints(sequence: &Sequence, settings: &MissionSettings) -> String {
    waypoint_list(sequence, settings)
}

pub fn export_mission(sequence: &Sequence, settings: &MissionSettings) -> Result<String> {
    let mut json = compile_mission(sequence, settings).to_json_pretty()?;
    json.push('\n');
    Ok(json)
}

pub fn stats_report(sequence: &Sequence) -> String {
    let stats = sequence.statistics();
    format!(
        concat!(
            "Sequence: {} ({})\nWaypoints: {}\nMax altitude: {:.1} m\n",
            "Unique colors: {}\nDuration: {:.1} s\n",
        ),
        sequence.name,
        sequence.id,
        stats.count,
        stats.max_altitude,
        stats.unique_color_count,
        stats.duration_seconds,
    )
}

/// One line per servo write.
pub fn cue_report(mission: &MissionDocument, use_interpolation: bool) -> String {
    let source = CueSource::select(mission, use_interpolation);
    let plan = cue_plan(mission, source, &LedChannelMap::default());

    let mut out = format!("# {} ({:?}, {} servo writes)\n", mission.name, source, plan.len());
    for cue in plan {
        out.push_str(&format!(
            "{:>9.1} ms  SERVO {:>2}  {} us\n",
            cue.at_ms, cue.channel, cue.pulse_us
        ));
    }
    out
}

/// Sample the preview at a fixed tick rate.
pub fn preview_report(sequence: &Sequence, tick_ms: u64, ticks: usize) -> String {
    let mut playback = Playback::new();
    playback.play();

    let mut out = String::new();
    playback.run(&mut FixedTicks::new(tick_ms, ticks), sequence.duration, |elapsed| {
        if let Some(frame) = frame_at(sequence, elapsed) {
            out.push_str(&format!(
                "{:>6} ms  wp {:>3}  ({:>6.1}, {:>6.1}, {:>5.1})  {} @ {:.2}\n",
                frame.elapsed_ms,
                frame.segment + 1,
                frame.x,
                frame.y,
                frame.z,
                frame.color.hex,
                frame.color.brightness,
            ));
        }
    });
    out
}

pub fn library_list<S: KeyValueStore + ?Sized>(store: &S) -> String {
    let state = ShowState::from_library(load_library(store));
    if state.sequences().is_empty() {
        return "No saved sequences\n".to_string();
    }

    let mut out = String::new();
    for sequence in state.sequences() {
        let saved = sequence
            .saved_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{}  {:<24} {:>4} pts  {:>6.1} s  {}\n",
            sequence.id,
            sequence.name,
            sequence.len(),
            sequence.duration as f64 / 1000.0,
            saved,
        ));
    }
    out
}

/// Save a sequence into the library. Returns its id.
pub fn library_save<S: KeyValueStore + ?Sized>(store: &S, sequence: Sequence) -> Result<String> {
    let state = ShowState::from_library(load_library(store)).save(sequence, Utc::now());
    save_library(store, state.sequences()).context("saving library")?;
    Ok(state.active_id().unwrap_or_default().to_string())
}

/// Delete by id. Returns false when the id is unknown.
pub fn library_delete<S: KeyValueStore + ?Sized>(store: &S, id: &str) -> Result<bool> {
    let state = ShowState::from_library(load_library(store));
    if state.get(id).is_none() {
        return Ok(false);
    }
    let next = state.delete(id);
    save_library(store, next.sequences()).context("saving library")?;
    Ok(true)
}

pub fn library_get<S: KeyValueStore + ?Sized>(store: &S, id: &str) -> Option<Sequence> {
    ShowState::from_library(load_library(store)).get(id).cloned()
}
