//! Preview playback clock.
//!
//! A tick source feeds elapsed-time deltas into [`Playback`], which wraps at
//! the sequence duration. Rendering is left to the caller; [`frame_at`] gives
//! the interpolated drone state for any elapsed time.

use crate::color::LedColor;
use crate::models::{Sequence, Waypoint};
use serde::{Deserialize, Serialize};

/// Produces time deltas (ms) for the playback clock.
pub trait TickSource {
    /// Next delta, or `None` when the source is exhausted.
    fn next_tick(&mut self) -> Option<u64>;
}

impl<I: Iterator<Item = u64>> TickSource for I {
    fn next_tick(&mut self) -> Option<u64> {
        self.next()
    }
}

/// A fixed number of equal ticks, for tests and offline rendering.
#[derive(Debug, Clone)]
pub struct FixedTicks {
    step_ms: u64,
    remaining: usize,
}

impl FixedTicks {
    pub fn new(step_ms: u64, count: usize) -> Self {
        Self {
            step_ms,
            remaining: count,
        }
    }
}

impl Iterator for FixedTicks {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.step_ms)
    }
}

/// `(elapsed + delta) mod duration`; always 0 for an empty sequence.
pub fn advance_elapsed(elapsed_ms: u64, delta_ms: u64, duration_ms: u64) -> u64 {
    if duration_ms == 0 {
        return 0;
    }
    (elapsed_ms % duration_ms + delta_ms % duration_ms) % duration_ms
}

/// Playback position for one sequence preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Playback {
    elapsed_ms: u64,
    playing: bool,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop and rewind.
    pub fn reset(&mut self) {
        self.playing = false;
        self.elapsed_ms = 0;
    }

    pub fn seek(&mut self, elapsed_ms: u64, duration_ms: u64) {
        self.elapsed_ms = advance_elapsed(0, elapsed_ms, duration_ms);
    }

    /// Advance by one tick if playing. Returns the new elapsed time.
    pub fn tick(&mut self, delta_ms: u64, duration_ms: u64) -> u64 {
        if self.playing {
            self.elapsed_ms = advance_elapsed(self.elapsed_ms, delta_ms, duration_ms);
        }
        self.elapsed_ms
    }

    /// Drone state at the current position.
    pub fn frame(&self, sequence: &Sequence) -> Option<PlaybackFrame> {
        frame_at(sequence, self.elapsed_ms)
    }

    /// Drain `ticks`, reporting the elapsed time after each one.
    pub fn run<T, F>(&mut self, ticks: &mut T, duration_ms: u64, mut on_tick: F)
    where
        T: TickSource + ?Sized,
        F: FnMut(u64),
    {
        while let Some(delta) = ticks.next_tick() {
            on_tick(self.tick(delta, duration_ms));
        }
    }
}

/// Interpolated drone state at an instant of the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackFrame {
    pub elapsed_ms: u64,
    /// Index of the waypoint the drone last passed
    pub segment: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: LedColor,
}

/// Drone state at `elapsed_ms`, linear between waypoints.
///
/// Holds the last waypoint after its timestamp. `None` for an empty sequence.
pub fn frame_at(sequence: &Sequence, elapsed_ms: u64) -> Option<PlaybackFrame> {
    let points = &sequence.points;
    let first = points.first()?;

    // Index of the last waypoint with timestamp <= elapsed
    let segment = points
        .partition_point(|p| p.timestamp <= elapsed_ms)
        .saturating_sub(1);
    let current = points.get(segment).unwrap_or(first);

    let Some(next) = points.get(segment + 1) else {
        return Some(frame_from(elapsed_ms, segment, current, current, 0.0));
    };

    let span = next.timestamp.saturating_sub(current.timestamp);
    let progress = if span == 0 {
        0.0
    } else {
        (elapsed_ms.saturating_sub(current.timestamp) as f64 / span as f64).clamp(0.0, 1.0)
    };
    Some(frame_from(elapsed_ms, segment, current, next, progress))
}

fn frame_from(
    elapsed_ms: u64,
    segment: usize,
    a: &Waypoint,
    b: &Waypoint,
    progress: f64,
) -> PlaybackFrame {
    let lerp = |from: f64, to: f64| from + (to - from) * progress;
    PlaybackFrame {
        elapsed_ms,
        segment,
        x: lerp(a.x, b.x),
        y: lerp(a.y, b.y),
        z: lerp(a.z, b.z),
        color: LedColor::new(a.rgb.lerp(b.rgb, progress), lerp(a.brightness, b.brightness)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn two_points() -> Sequence {
        Sequence::from_points(
            "preview",
            vec![
                Waypoint::with_hex(0.0, 0.0, 0.0, "#000000"),
                Waypoint::with_hex(100.0, 50.0, 20.0, "#ffffff").brightness(0.0),
            ],
        )
    }

    #[test]
    fn elapsed_wraps_at_duration() {
        assert_eq!(advance_elapsed(1900, 200, 2000), 100);
        assert_eq!(advance_elapsed(0, 2000, 2000), 0);
        assert_eq!(advance_elapsed(500, 100, 0), 0);
        assert_eq!(advance_elapsed(u64::MAX, u64::MAX, 1000), (2 * (u64::MAX % 1000)) % 1000);
    }

    #[test]
    fn paused_playback_does_not_advance() {
        let mut playback = Playback::new();
        assert_eq!(playback.tick(100, 2000), 0);
        playback.play();
        assert_eq!(playback.tick(100, 2000), 100);
        playback.pause();
        assert_eq!(playback.tick(100, 2000), 100);
        playback.reset();
        assert_eq!(playback.elapsed_ms(), 0);
        assert!(!playback.is_playing());
    }

    #[test]
    fn run_drains_fixed_ticks_with_wraparound() {
        let seq = two_points();
        let mut playback = Playback::new();
        playback.play();

        let mut seen = Vec::new();
        playback.run(&mut FixedTicks::new(500, 5), seq.duration, |t| seen.push(t));
        assert_eq!(seen, vec![500, 1000, 1500, 0, 500]);
    }

    #[test]
    fn frames_interpolate_between_waypoints() {
        let seq = two_points();

        let start = frame_at(&seq, 0).unwrap();
        assert_eq!((start.x, start.y, start.z), (0.0, 0.0, 0.0));
        assert_eq!(start.segment, 0);

        let mid = frame_at(&seq, 500).unwrap();
        assert_eq!((mid.x, mid.y, mid.z), (50.0, 25.0, 10.0));
        assert_eq!(mid.color.rgb, Rgb::new(128, 128, 128));
        assert_eq!(mid.color.brightness, 0.5);

        let mut playback = Playback::new();
        playback.seek(1500, seq.duration);
        let held = playback.frame(&seq).unwrap();
        assert_eq!(held.segment, 1);
        assert_eq!((held.x, held.y), (100.0, 50.0));
    }

    #[test]
    fn empty_sequence_has_no_frame() {
        assert!(frame_at(&Sequence::empty("none"), 0).is_none());
    }
}
