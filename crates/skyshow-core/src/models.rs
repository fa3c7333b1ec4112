//! Core data models: waypoints and light-show sequences.

use crate::color::{hex_to_rgb, rgb_to_hex, Rgb};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fixed spacing between consecutive waypoints in milliseconds.
pub const AUTHORING_INTERVAL_MS: u64 = 1000;
/// LED fade time used when a waypoint does not specify one.
pub const DEFAULT_TRANSITION_MS: u64 = 500;
/// Name given to sequences created with a blank name.
pub const DEFAULT_SEQUENCE_NAME: &str = "Untitled Sequence";

/// A single timed, colored, positioned point in a flight sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    /// Canvas pixels, origin top-left
    pub x: f64,
    pub y: f64,
    /// Altitude in meters
    pub z: f64,
    /// `#rrggbb`
    pub color: String,
    pub rgb: Rgb,
    /// 0.0 ..= 1.0
    pub brightness: f64,
    /// Milliseconds from sequence start, assigned by the sequence
    #[serde(default)]
    pub timestamp: u64,
    /// Target speed for the segment ending here (m/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// LED fade into this point's color (ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<u64>,
}

impl Waypoint {
    /// Create a full-brightness waypoint.
    pub fn new(x: f64, y: f64, z: f64, rgb: Rgb) -> Self {
        Self {
            x,
            y,
            z,
            color: rgb_to_hex(rgb),
            rgb,
            brightness: 1.0,
            timestamp: 0,
            speed: None,
            transition_duration: None,
        }
    }

    /// Create a waypoint from a hex color; unparsable hex falls back to white.
    pub fn with_hex(x: f64, y: f64, z: f64, hex: &str) -> Self {
        let mut point = Self::new(x, y, z, Rgb::WHITE);
        point.color = hex.to_string();
        point.reconcile_color();
        point
    }

    pub fn brightness(mut self, brightness: f64) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn speed(mut self, speed_mps: f64) -> Self {
        self.speed = Some(speed_mps);
        self
    }

    pub fn transition(mut self, duration_ms: u64) -> Self {
        self.transition_duration = Some(duration_ms);
        self
    }

    /// Transition duration, defaulting to 500 ms.
    pub fn transition_ms(&self) -> u64 {
        self.transition_duration.unwrap_or(DEFAULT_TRANSITION_MS)
    }

    /// Make `color` and `rgb` agree.
    ///
    /// A parsable `color` wins and is lower-cased; otherwise `color` is
    /// rebuilt from `rgb`.
    pub fn reconcile_color(&mut self) {
        if let Ok(rgb) = hex_to_rgb(&self.color) {
            self.rgb = rgb;
        }
        self.color = rgb_to_hex(self.rgb);
    }
}

/// An ordered, named collection of waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub id: String,
    pub name: String,
    /// Flight order
    pub points: Vec<Waypoint>,
    /// Total playback length in milliseconds
    pub duration: u64,
    /// Set when the snapshot is saved into the library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Derived summary of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStats {
    pub count: usize,
    pub max_altitude: f64,
    pub unique_color_count: usize,
    pub duration_seconds: f64,
}

impl Sequence {
    /// Create an empty sequence with a fresh id.
    pub fn empty(name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: normalize_name(name),
            points: Vec::new(),
            duration: 0,
            saved_at: None,
        }
    }

    /// Create a sequence from a point list, normalizing timing and colors.
    pub fn from_points(name: &str, points: Vec<Waypoint>) -> Self {
        Self::empty(name).with_points(points)
    }

    /// New sequence with `point` appended.
    pub fn with_point(&self, point: Waypoint) -> Self {
        let mut points = self.points.clone();
        points.push(point);
        self.with_points(points)
    }

    /// New sequence with no points; id and name are kept.
    pub fn cleared(&self) -> Self {
        self.with_points(Vec::new())
    }

    /// New sequence with the whole point list replaced.
    pub fn with_points(&self, points: Vec<Waypoint>) -> Self {
        let mut next = Self {
            id: self.id.clone(),
            name: self.name.clone(),
            points,
            duration: 0,
            saved_at: self.saved_at,
        };
        next.retime();
        next
    }

    /// New sequence with a different name.
    pub fn renamed(&self, name: &str) -> Self {
        Self {
            name: normalize_name(name),
            ..self.clone()
        }
    }

    /// Re-apply name, timing and color rules, e.g. after loading untrusted JSON.
    pub fn normalized(&self) -> Self {
        self.renamed(&self.name).with_points(self.points.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn statistics(&self) -> SequenceStats {
        let max_altitude = self
            .points
            .iter()
            .map(|p| p.z)
            .reduce(f64::max)
            .unwrap_or(0.0);
        let unique_colors: HashSet<&str> =
            self.points.iter().map(|p| p.color.as_str()).collect();

        SequenceStats {
            count: self.points.len(),
            max_altitude,
            unique_color_count: unique_colors.len(),
            duration_seconds: self.duration as f64 / 1000.0,
        }
    }

    fn retime(&mut self) {
        for (index, point) in self.points.iter_mut().enumerate() {
            point.timestamp = index as u64 * AUTHORING_INTERVAL_MS;
            point.reconcile_color();
        }
        self.duration = sequence_duration(self.points.len());
    }
}

/// `0` for no points, otherwise `(n - 1) * interval + interval`.
pub fn sequence_duration(point_count: usize) -> u64 {
    match point_count {
        0 => 0,
        n => (n as u64 - 1) * AUTHORING_INTERVAL_MS + AUTHORING_INTERVAL_MS,
    }
}

fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_SEQUENCE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
