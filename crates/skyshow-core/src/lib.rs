//! Sequence model and mission compiler for drone light shows.
//!
//! Sequences are drawn on a 400x300 canvas, converted to geographic
//! coordinates around a home position and exported either as a waypoint list
//! or as a JSON mission carrying timed RGB/PWM lighting cues.

pub mod color;
pub mod config;
pub mod cues;
pub mod error;
pub mod geo;
pub mod interpolate;
pub mod mission;
pub mod models;
pub mod patterns;
pub mod persistence;
pub mod playback;
pub mod store;

pub use color::{hex_to_rgb, hsl_to_rgb, rgb_to_hex, LedColor, Rgb};
pub use config::{MissionSettings, SettingsField};
pub use cues::{cue_plan, CueSource, LedChannelMap, ServoCue};
pub use error::{ColorError, MissionError, SettingsError, StoreError};
pub use geo::{to_geographic, CanvasFrame, GeoPosition, HomePosition};
pub use interpolate::{interpolate_segment, interpolate_sequence, LightSample};
pub use mission::{compile_mission, waypoint_list, MissionDocument};
pub use models::{Sequence, SequenceStats, Waypoint};
pub use patterns::{generate, PatternKind, PatternParams};
pub use persistence::{load_library, save_library, FileStore, KeyValueStore, MemoryStore};
pub use playback::{frame_at, FixedTicks, Playback, PlaybackFrame, TickSource};
pub use store::ShowState;
