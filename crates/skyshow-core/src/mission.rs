//! Mission compiler.
//!
//! Two export formats, both pure functions of a sequence and the mission
//! settings:
//!
//! - a QGroundControl `QGC WPL 110` waypoint list (tab separated text)
//! - a JSON mission document with waypoints, keyframe lighting cues and the
//!   flattened color interpolation timeline

use crate::color::{LedColor, Rgb};
use crate::config::{MissionSettings, DEFAULT_SPEED_MPS};
use crate::error::MissionError;
use crate::geo::{to_geographic, GeoPosition, HomePosition};
use crate::interpolate::{interpolate_sequence, LightSample};
use crate::models::Sequence;
use serde::{Deserialize, Serialize};

pub const WAYPOINT_LIST_HEADER: &str = "QGC WPL 110";
pub const MISSION_FORMAT_VERSION: &str = "1.0";

/// MAV_CMD_NAV_WAYPOINT
const CMD_NAV_WAYPOINT: u16 = 16;
/// MAV_FRAME_GLOBAL
const FRAME_GLOBAL: u8 = 0;
/// MAV_FRAME_GLOBAL_RELATIVE_ALT
const FRAME_GLOBAL_RELATIVE_ALT: u8 = 3;

/// Structured mission consumed by the flight/lighting integration script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDocument {
    pub name: String,
    pub version: String,
    pub sequence_id: String,
    /// Playback length in milliseconds
    pub duration: u64,
    pub home_position: HomePosition,
    pub default_speed: f64,
    pub safety_radius: f64,
    pub waypoints: Vec<MissionWaypoint>,
    pub lighting_sequence: Vec<LightingCue>,
    pub color_interpolation: Vec<LightSample>,
}

/// Canvas coordinates of a waypoint as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionWaypoint {
    /// 1-based; 0 is the home position
    pub index: usize,
    pub canvas_position: CanvasPosition,
    /// `latitude`, `longitude`, `altitude` at the top level of the record
    #[serde(flatten)]
    pub position: GeoPosition,
    pub color: String,
    pub rgb: Rgb,
    pub brightness: f64,
    pub timestamp: u64,
    pub speed: f64,
    pub transition_duration: u64,
}

/// Keyframe lighting command, one per waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingCue {
    pub timestamp: u64,
    pub color: LedColor,
    pub transition_duration: u64,
    pub pwm: Rgb,
    pub percentage: Rgb,
}

impl MissionDocument {
    pub fn to_json_pretty(&self) -> Result<String, MissionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MissionError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Build the structured mission document.
pub fn compile_mission(sequence: &Sequence, settings: &MissionSettings) -> MissionDocument {
    let home = &settings.home;

    let waypoints = sequence
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| MissionWaypoint {
            index: i + 1,
            canvas_position: CanvasPosition {
                x: point.x,
                y: point.y,
                z: point.z,
            },
            position: to_geographic(point.x, point.y, point.z, home),
            color: point.color.clone(),
            rgb: point.rgb,
            brightness: point.brightness,
            timestamp: point.timestamp,
            speed: point.speed.unwrap_or(DEFAULT_SPEED_MPS),
            transition_duration: point.transition_ms(),
        })
        .collect();

    let lighting_sequence = sequence
        .points
        .iter()
        .map(|point| LightingCue {
            timestamp: point.timestamp,
            color: LedColor {
                hex: point.color.clone(),
                rgb: point.rgb,
                brightness: point.brightness,
            },
            transition_duration: point.transition_ms(),
            pwm: point.rgb.pwm(point.brightness),
            percentage: point.rgb.percentage(point.brightness),
        })
        .collect();

    let color_interpolation: Vec<LightSample> = interpolate_sequence(&sequence.points).collect();

    tracing::debug!(
        "Compiled mission '{}': {} waypoints, {} interpolation samples",
        sequence.name,
        sequence.points.len(),
        color_interpolation.len()
    );

    MissionDocument {
        name: sequence.name.clone(),
        version: MISSION_FORMAT_VERSION.to_string(),
        sequence_id: sequence.id.clone(),
        duration: sequence.duration,
        home_position: *home,
        default_speed: settings.default_speed,
        safety_radius: settings.safety_radius,
        waypoints,
        lighting_sequence,
        color_interpolation,
    }
}

/// Render the tab-separated waypoint list.
///
/// Line layout: index, current, frame, command, param1-4, latitude,
/// longitude, altitude, autocontinue. Line 0 is the home position.
pub fn waypoint_list(sequence: &Sequence, settings: &MissionSettings) -> String {
    let home = &settings.home;
    let mut out = String::new();
    out.push_str(WAYPOINT_LIST_HEADER);
    out.push('\n');

    let home_position = GeoPosition {
        latitude: home.latitude,
        longitude: home.longitude,
        altitude: home.altitude,
    };
    push_waypoint_line(&mut out, 0, true, FRAME_GLOBAL, &home_position);

    for (i, point) in sequence.points.iter().enumerate() {
        let position = to_geographic(point.x, point.y, point.z, home);
        push_waypoint_line(&mut out, i + 1, false, FRAME_GLOBAL_RELATIVE_ALT, &position);
    }

    out
}

fn push_waypoint_line(
    out: &mut String,
    index: usize,
    current: bool,
    frame: u8,
    position: &GeoPosition,
) {
    out.push_str(&format!(
        "{}\t{}\t{}\t{}\t0\t0\t0\t0\t{:.7}\t{:.7}\t{:.2}\t1\n",
        index,
        u8::from(current),
        frame,
        CMD_NAV_WAYPOINT,
        position.latitude,
        position.longitude,
        position.altitude,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Waypoint;

    fn three_point_sequence() -> Sequence {
        Sequence::from_points(
            "Demo",
            vec![
                Waypoint::with_hex(200.0, 150.0, 10.0, "#ff0000"),
                Waypoint::with_hex(220.0, 150.0, 10.0, "#00ff00").speed(3.0),
                Waypoint::with_hex(240.0, 150.0, 20.0, "#0000ff")
                    .brightness(0.5)
                    .transition(800),
            ],
        )
    }

    #[test]
    fn waypoint_list_of_empty_sequence_has_header_and_home() {
        let text = waypoint_list(&Sequence::empty("none"), &MissionSettings::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "QGC WPL 110");
        assert_eq!(
            lines[1],
            "0\t1\t0\t16\t0\t0\t0\t0\t37.7749000\t-122.4194000\t0.00\t1"
        );
    }

    #[test]
    fn waypoint_list_lines_are_indexed_and_rounded() {
        let text = waypoint_list(&three_point_sequence(), &MissionSettings::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);

        let fields: Vec<&str> = lines[3].split('\t').collect();
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[0], "2");
        assert_eq!(fields[2], "3");
        assert_eq!(fields[8], "37.7749000");
        assert_eq!(fields[9].split('.').nth(1).map(str::len), Some(7));
        assert_eq!(fields[10], "10.00");
    }

    #[test]
    fn waypoint_list_is_idempotent() {
        let seq = three_point_sequence();
        let settings = MissionSettings::default();
        assert_eq!(waypoint_list(&seq, &settings), waypoint_list(&seq, &settings));
    }

    #[test]
    fn document_applies_defaults_and_encodings() {
        let doc = compile_mission(&three_point_sequence(), &MissionSettings::default());

        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.duration, 3000);
        assert_eq!(doc.waypoints.len(), 3);
        assert_eq!(doc.lighting_sequence.len(), 3);

        assert_eq!(doc.waypoints[0].index, 1);
        assert_eq!(doc.waypoints[0].speed, 5.0);
        assert_eq!(doc.waypoints[1].speed, 3.0);
        assert_eq!(doc.waypoints[0].transition_duration, 500);
        assert_eq!(doc.waypoints[2].transition_duration, 800);

        let cue = &doc.lighting_sequence[2];
        assert_eq!(cue.timestamp, 2000);
        assert_eq!(cue.color.hex, "#0000ff");
        assert_eq!(cue.pwm, Rgb::new(0, 0, 128));
        assert_eq!(cue.percentage, Rgb::new(0, 0, 50));
    }

    #[test]
    fn waypoint_speed_ignores_settings_default() {
        let mut settings = MissionSettings::default();
        settings.apply_named("defaultSpeed", "8").unwrap();

        let seq = Sequence::from_points("one", vec![Waypoint::with_hex(0.0, 0.0, 5.0, "#fff000")]);
        let doc = compile_mission(&seq, &settings);
        assert_eq!(doc.waypoints[0].speed, 5.0);
        assert_eq!(doc.default_speed, 8.0);
    }

    #[test]
    fn empty_sequence_compiles_to_empty_arrays() {
        let doc = compile_mission(&Sequence::empty("none"), &MissionSettings::default());
        assert!(doc.waypoints.is_empty());
        assert!(doc.lighting_sequence.is_empty());
        assert!(doc.color_interpolation.is_empty());
        assert_eq!(doc.duration, 0);
    }

    #[test]
    fn document_json_shape_matches_integration_script() {
        let doc = compile_mission(&three_point_sequence(), &MissionSettings::default());
        let value: serde_json::Value =
            serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();

        let wp = &value["waypoints"][0];
        assert!(wp["latitude"].is_number());
        assert!(wp["longitude"].is_number());
        assert_eq!(wp["altitude"], 10.0);
        assert_eq!(wp["canvasPosition"]["x"], 200.0);
        assert_eq!(wp["transitionDuration"], 500);

        let cue = &value["lightingSequence"][0];
        assert_eq!(cue["color"]["rgb"]["r"], 255);
        assert_eq!(cue["color"]["brightness"], 1.0);

        assert!(value["colorInterpolation"].is_array());
        let home_lat = value["homePosition"]["latitude"].as_f64().unwrap();
        assert!((home_lat - 37.7749).abs() < 1e-9);
    }

    #[test]
    fn document_json_round_trips() {
        let doc = compile_mission(&three_point_sequence(), &MissionSettings::default());
        let json = doc.to_json_pretty().unwrap();
        let parsed = MissionDocument::from_json(&json).unwrap();
        assert_eq!(parsed.name, doc.name);
        assert_eq!(parsed.waypoints.len(), doc.waypoints.len());
        assert_eq!(parsed.waypoints[2].rgb, doc.waypoints[2].rgb);
        assert_eq!(parsed.color_interpolation.len(), doc.color_interpolation.len());
    }
}
