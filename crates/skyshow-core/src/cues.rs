//! Servo cue plans for RGB LEDs wired to flight-controller servo outputs.
//!
//! The integration script drives one LED color channel per AUX output with
//! `DO_SET_SERVO`, mapping a 0-255 PWM duty to 1000-2020 us. This module turns
//! a compiled mission into that timed list of servo writes without touching
//! any hardware.

use crate::color::{LedColor, Rgb};
use crate::mission::MissionDocument;
use serde::{Deserialize, Serialize};

/// Pulse width for a zero duty cycle (us).
pub const PULSE_MIN_US: u16 = 1000;
/// Microseconds added per PWM step.
pub const PULSE_US_PER_STEP: u16 = 4;

/// Servo outputs carrying each LED channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedChannelMap {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Default for LedChannelMap {
    fn default() -> Self {
        // AUX1..AUX3
        Self {
            red: 9,
            green: 10,
            blue: 11,
        }
    }
}

/// Which timeline in the mission drives the LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueSource {
    /// One cue per waypoint (`lightingSequence`)
    Keyframes,
    /// Every interpolation sample (`colorInterpolation`)
    Interpolated,
}

impl CueSource {
    /// Prefer interpolation when asked for and the mission carries samples.
    pub fn select(mission: &MissionDocument, use_interpolation: bool) -> Self {
        if use_interpolation && !mission.color_interpolation.is_empty() {
            CueSource::Interpolated
        } else {
            CueSource::Keyframes
        }
    }
}

/// A single servo write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServoCue {
    /// Milliseconds from show start
    pub at_ms: f64,
    pub channel: u8,
    pub pulse_us: u16,
}

/// `pwm * 4 + 1000`.
pub fn pulse_width_us(pwm: u8) -> u16 {
    PULSE_MIN_US + u16::from(pwm) * PULSE_US_PER_STEP
}

/// Duty cycle the LED driver writes: `int(channel * brightness)`, truncated.
pub fn duty_cycle(color: &LedColor) -> Rgb {
    let duty = |channel: u8| (f64::from(channel) * color.brightness).clamp(0.0, 255.0) as u8;
    Rgb::new(duty(color.rgb.r), duty(color.rgb.g), duty(color.rgb.b))
}

/// Flatten a mission's lighting timeline into servo writes, in time order.
pub fn cue_plan(
    mission: &MissionDocument,
    source: CueSource,
    channels: &LedChannelMap,
) -> Vec<ServoCue> {
    let timeline: Vec<(f64, Rgb)> = match source {
        CueSource::Keyframes => mission
            .lighting_sequence
            .iter()
            .map(|cue| (cue.timestamp as f64, duty_cycle(&cue.color)))
            .collect(),
        CueSource::Interpolated => mission
            .color_interpolation
            .iter()
            .map(|sample| (sample.timestamp, duty_cycle(&sample.color)))
            .collect(),
    };

    timeline
        .into_iter()
        .flat_map(|(at_ms, pwm)| {
            [
                (channels.red, pwm.r),
                (channels.green, pwm.g),
                (channels.blue, pwm.b),
            ]
            .map(|(channel, duty)| ServoCue {
                at_ms,
                channel,
                pulse_us: pulse_width_us(duty),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissionSettings;
    use crate::mission::compile_mission;
    use crate::models::{Sequence, Waypoint};

    fn mission(points: usize) -> MissionDocument {
        let points = (0..points)
            .map(|i| {
                Waypoint::with_hex(200.0 + i as f64, 150.0, 10.0, "#ff8000").brightness(0.5)
            })
            .collect();
        compile_mission(&Sequence::from_points("cues", points), &MissionSettings::default())
    }

    #[test]
    fn pulse_width_spans_servo_range() {
        assert_eq!(pulse_width_us(0), 1000);
        assert_eq!(pulse_width_us(128), 1512);
        assert_eq!(pulse_width_us(255), 2020);
    }

    #[test]
    fn source_falls_back_to_keyframes() {
        assert_eq!(CueSource::select(&mission(3), true), CueSource::Interpolated);
        assert_eq!(CueSource::select(&mission(3), false), CueSource::Keyframes);
        assert_eq!(CueSource::select(&mission(1), true), CueSource::Keyframes);
    }

    #[test]
    fn keyframe_plan_writes_three_channels_per_cue() {
        let plan = cue_plan(&mission(2), CueSource::Keyframes, &LedChannelMap::default());
        assert_eq!(plan.len(), 6);

        // #ff8000 at half brightness -> duty (127, 64, 0)
        let pulses: Vec<(u8, u16)> = plan[..3].iter().map(|c| (c.channel, c.pulse_us)).collect();
        assert_eq!(pulses, vec![(9, 1508), (10, 1256), (11, 1000)]);
        assert!(plan[..3].iter().all(|c| c.at_ms == 0.0));
        assert_eq!(plan[3].at_ms, 1000.0);
    }

    #[test]
    fn duty_cycle_truncates_half_steps() {
        let color = LedColor::new(Rgb::new(255, 128, 1), 0.5);
        assert_eq!(duty_cycle(&color), Rgb::new(127, 64, 0));
        // the document's rounded encoding differs on the red channel
        assert_eq!(color.rgb.pwm(0.5), Rgb::new(128, 64, 1));
    }

    #[test]
    fn interpolated_plan_follows_samples() {
        let doc = mission(2);
        let plan = cue_plan(&doc, CueSource::Interpolated, &LedChannelMap::default());
        assert_eq!(plan.len(), doc.color_interpolation.len() * 3);
        assert!(plan.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
    }
}
