//! Color/brightness interpolation between consecutive waypoints.
//!
//! Each segment is sampled once per 100 ms (at least two steps) and the
//! segments are concatenated in flight order. A segment's last sample and the
//! next segment's first sample share a timestamp; both are kept because the
//! exported sample count is relied upon downstream.

use crate::color::{LedColor, Rgb};
use crate::models::Waypoint;
use serde::{Deserialize, Serialize};

/// Milliseconds of segment per interpolation step.
pub const SAMPLE_PERIOD_MS: u64 = 100;
/// Minimum steps per segment, so there is always a start and an end sample.
pub const MIN_STEPS: u64 = 2;

/// One synthetic lighting sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSample {
    /// Milliseconds from sequence start
    pub timestamp: f64,
    pub color: LedColor,
    /// Channels scaled by brightness
    pub pwm: Rgb,
}

/// Number of steps for a segment from `start_ms` to `end_ms`.
pub fn segment_steps(start_ms: u64, end_ms: u64) -> u64 {
    (end_ms.saturating_sub(start_ms) / SAMPLE_PERIOD_MS).max(MIN_STEPS)
}

/// Lazy samples for one segment; clone it to replay from the start.
#[derive(Debug, Clone)]
pub struct SegmentSamples {
    start_ms: f64,
    span_ms: f64,
    from: Rgb,
    to: Rgb,
    from_brightness: f64,
    to_brightness: f64,
    steps: u64,
    step: u64,
}

impl SegmentSamples {
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn sample(&self, step: u64) -> LightSample {
        let progress = step as f64 / self.steps as f64;
        let rgb = self.from.lerp(self.to, progress);
        let brightness =
            self.from_brightness + (self.to_brightness - self.from_brightness) * progress;

        LightSample {
            timestamp: self.start_ms + self.span_ms * progress,
            color: LedColor::new(rgb, brightness),
            pwm: rgb.pwm(brightness),
        }
    }
}

impl Iterator for SegmentSamples {
    type Item = LightSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step > self.steps {
            return None;
        }
        let sample = self.sample(self.step);
        self.step += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1).saturating_sub(self.step) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SegmentSamples {}

/// Samples from `a` to `b`, both endpoints included (`steps + 1` items).
pub fn interpolate_segment(a: &Waypoint, b: &Waypoint) -> SegmentSamples {
    SegmentSamples {
        start_ms: a.timestamp as f64,
        span_ms: b.timestamp.saturating_sub(a.timestamp) as f64,
        from: a.rgb,
        to: b.rgb,
        from_brightness: a.brightness,
        to_brightness: b.brightness,
        steps: segment_steps(a.timestamp, b.timestamp),
        step: 0,
    }
}

/// Samples for every consecutive pair of `points`, in order.
///
/// Empty for fewer than two points.
pub fn interpolate_sequence(
    points: &[Waypoint],
) -> impl Iterator<Item = LightSample> + Clone + '_ {
    points
        .windows(2)
        .flat_map(|pair| interpolate_segment(&pair[0], &pair[1]))
}
