//! Canonical pattern generators used to seed sequences for preview.
//!
//! Every generator is a closed-form path on the design canvas with colors
//! taken from an evenly spaced hue sweep. `Random` is the only
//! non-deterministic pattern; use [`generate_random_with`] to pin it down.

use crate::color::hsl_to_rgb;
use crate::geo::{CanvasFrame, CANVAS_CENTER};
use crate::models::{Sequence, Waypoint};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

const SPIRAL_TURNS: f64 = 3.0;
const HELIX_TURNS: f64 = 3.0;
const WAVE_CYCLES: f64 = 2.0;
const STAR_INNER_RATIO: f64 = 0.4;
/// Parametric heart spans roughly +-16 units horizontally.
const HEART_EXTENT: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Circle,
    Figure8,
    Spiral,
    Formation,
    Star,
    Heart,
    Wave,
    Helix,
    Random,
    Square,
    Triangle,
    Zigzag,
    Burst,
}

impl PatternKind {
    pub const ALL: [PatternKind; 13] = [
        PatternKind::Circle,
        PatternKind::Figure8,
        PatternKind::Spiral,
        PatternKind::Formation,
        PatternKind::Star,
        PatternKind::Heart,
        PatternKind::Wave,
        PatternKind::Helix,
        PatternKind::Random,
        PatternKind::Square,
        PatternKind::Triangle,
        PatternKind::Zigzag,
        PatternKind::Burst,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PatternKind::Circle => "Circle",
            PatternKind::Figure8 => "Figure 8",
            PatternKind::Spiral => "Spiral",
            PatternKind::Formation => "Formation",
            PatternKind::Star => "Star",
            PatternKind::Heart => "Heart",
            PatternKind::Wave => "Wave",
            PatternKind::Helix => "Helix",
            PatternKind::Random => "Random",
            PatternKind::Square => "Square",
            PatternKind::Triangle => "Triangle",
            PatternKind::Zigzag => "Zigzag",
            PatternKind::Burst => "Burst",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PatternKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        PatternKind::ALL
            .into_iter()
            .find(|kind| {
                kind.label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .eq_ignore_ascii_case(&key)
            })
            .ok_or_else(|| format!("unknown pattern {:?}", s))
    }
}

/// Shared generator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternParams {
    /// Defaults to the pattern label
    pub name: Option<String>,
    pub points: usize,
    pub center: (f64, f64),
    /// Pixels
    pub radius: f64,
    /// Base altitude in meters
    pub altitude: f64,
    /// Altitude range used by climbing patterns (m)
    pub altitude_variation: f64,
    /// Hue of the first point in degrees
    pub hue_start: f64,
    /// Star points / burst rays
    pub arms: usize,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            name: None,
            points: 24,
            center: CANVAS_CENTER,
            radius: 100.0,
            altitude: 10.0,
            altitude_variation: 10.0,
            hue_start: 0.0,
            arms: 5,
        }
    }
}

/// Generate a sequence for `kind`.
pub fn generate(kind: PatternKind, params: &PatternParams) -> Sequence {
    let path = match kind {
        PatternKind::Random => return generate_random_with(&mut rand::rng(), params),
        PatternKind::Circle => circle(params),
        PatternKind::Figure8 => figure8(params),
        PatternKind::Spiral => spiral(params),
        PatternKind::Formation => formation(params),
        PatternKind::Star => star(params),
        PatternKind::Heart => heart(params),
        PatternKind::Wave => wave(params),
        PatternKind::Helix => helix(params),
        PatternKind::Square => square(params),
        PatternKind::Triangle => triangle(params),
        PatternKind::Zigzag => zigzag(params),
        PatternKind::Burst => burst(params),
    };

    let n = path.len();
    let points = path
        .into_iter()
        .enumerate()
        .map(|(i, (x, y, z))| {
            let hue = sweep_hue(params.hue_start, i, n);
            Waypoint::new(x, y, z, hsl_to_rgb(hue, 100.0, 50.0))
        })
        .collect();

    tracing::debug!("Generated {} pattern with {} points", kind, n);
    Sequence::from_points(&sequence_name(kind, params), points)
}

/// Random scatter around the center using the caller's RNG.
pub fn generate_random_with<R: Rng>(rng: &mut R, params: &PatternParams) -> Sequence {
    let frame = CanvasFrame::default();
    let (cx, cy) = params.center;
    let r = params.radius.abs();
    let variation = params.altitude_variation.abs();

    let points = (0..params.points)
        .map(|_| {
            let x = (cx + rng.random_range(-1.0..=1.0) * r).clamp(0.0, frame.width);
            let y = (cy + rng.random_range(-1.0..=1.0) * r).clamp(0.0, frame.height);
            let z = params.altitude + rng.random_range(0.0..=1.0) * variation;
            let hue = rng.random_range(0.0..360.0);
            Waypoint::new(x, y, z, hsl_to_rgb(hue, 100.0, 50.0))
        })
        .collect();

    Sequence::from_points(&sequence_name(PatternKind::Random, params), points)
}

fn sequence_name(kind: PatternKind, params: &PatternParams) -> String {
    params
        .name
        .clone()
        .unwrap_or_else(|| kind.label().to_string())
}

/// `(start + 360 * i / n) mod 360`
fn sweep_hue(start: f64, index: usize, count: usize) -> f64 {
    let offset = if count == 0 {
        0.0
    } else {
        360.0 * index as f64 / count as f64
    };
    (start + offset).rem_euclid(360.0)
}

/// Fraction around a closed loop, `[0, 1)`.
fn loop_fraction(index: usize, count: usize) -> f64 {
    index as f64 / count.max(1) as f64
}

/// Fraction along an open path, `[0, 1]`.
fn path_fraction(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

type Path = Vec<(f64, f64, f64)>;

fn circle(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    (0..p.points)
        .map(|i| {
            let angle = TAU * loop_fraction(i, p.points);
            (cx + p.radius * angle.cos(), cy + p.radius * angle.sin(), p.altitude)
        })
        .collect()
}

fn figure8(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    (0..p.points)
        .map(|i| {
            let t = TAU * loop_fraction(i, p.points);
            (cx + p.radius * t.sin(), cy + p.radius * t.sin() * t.cos(), p.altitude)
        })
        .collect()
}

fn spiral(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    (0..p.points)
        .map(|i| {
            let t = path_fraction(i, p.points);
            let angle = TAU * SPIRAL_TURNS * t;
            let r = p.radius * t;
            (cx + r * angle.cos(), cy + r * angle.sin(), p.altitude)
        })
        .collect()
}

fn formation(p: &PatternParams) -> Path {
    if p.points == 0 {
        return Vec::new();
    }
    let (cx, cy) = p.center;
    let cols = (p.points as f64).sqrt().ceil() as usize;
    let rows = p.points.div_ceil(cols);
    let spread = |index: usize, count: usize| {
        if count <= 1 {
            0.0
        } else {
            -p.radius + 2.0 * p.radius * index as f64 / (count - 1) as f64
        }
    };

    (0..p.points)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            (cx + spread(col, cols), cy + spread(row, rows), p.altitude)
        })
        .collect()
}

fn star(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    let arms = p.arms.max(2);
    let vertices: Vec<(f64, f64)> = (0..arms * 2)
        .map(|k| {
            let r = if k % 2 == 0 {
                p.radius
            } else {
                p.radius * STAR_INNER_RATIO
            };
            let angle = -PI / 2.0 + PI * k as f64 / arms as f64;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    flat(walk_polygon(&vertices, p.points), p.altitude)
}

fn heart(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    let scale = p.radius / HEART_EXTENT;
    (0..p.points)
        .map(|i| {
            let t = TAU * loop_fraction(i, p.points);
            let hx = 16.0 * t.sin().powi(3);
            let hy = 13.0 * t.cos()
                - 5.0 * (2.0 * t).cos()
                - 2.0 * (3.0 * t).cos()
                - (4.0 * t).cos();
            // canvas y grows downwards
            (cx + hx * scale, cy - hy * scale, p.altitude)
        })
        .collect()
}

fn wave(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    (0..p.points)
        .map(|i| {
            let t = path_fraction(i, p.points);
            let phase = (TAU * WAVE_CYCLES * t).sin();
            (
                cx - p.radius + 2.0 * p.radius * t,
                cy + p.radius / 2.0 * phase,
                p.altitude + p.altitude_variation * (phase * 0.5 + 0.5),
            )
        })
        .collect()
}

fn helix(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    (0..p.points)
        .map(|i| {
            let t = path_fraction(i, p.points);
            let angle = TAU * HELIX_TURNS * t;
            (
                cx + p.radius * angle.cos(),
                cy + p.radius * angle.sin(),
                p.altitude + p.altitude_variation * t,
            )
        })
        .collect()
}

fn square(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    let r = p.radius;
    let corners = [(cx - r, cy - r), (cx + r, cy - r), (cx + r, cy + r), (cx - r, cy + r)];
    flat(walk_polygon(&corners, p.points), p.altitude)
}

fn triangle(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    let corners: Vec<(f64, f64)> = [-90.0_f64, 30.0, 150.0]
        .iter()
        .map(|deg| {
            let angle = deg.to_radians();
            (cx + p.radius * angle.cos(), cy + p.radius * angle.sin())
        })
        .collect();
    flat(walk_polygon(&corners, p.points), p.altitude)
}

fn zigzag(p: &PatternParams) -> Path {
    let (cx, cy) = p.center;
    (0..p.points)
        .map(|i| {
            let t = path_fraction(i, p.points);
            let offset = if i % 2 == 0 { -p.radius / 2.0 } else { p.radius / 2.0 };
            (cx - p.radius + 2.0 * p.radius * t, cy + offset, p.altitude)
        })
        .collect()
}

/// Rays out from the center, returning to the center before each ray.
///
/// `points` is split across the rays, earlier rays taking the remainder.
fn burst(p: &PatternParams) -> Path {
    if p.points == 0 {
        return Vec::new();
    }
    let (cx, cy) = p.center;
    let rays = p.arms.clamp(1, p.points);
    let (base, extra) = (p.points / rays, p.points % rays);

    let mut path = Vec::with_capacity(p.points);
    for ray in 0..rays {
        let angle = TAU * ray as f64 / rays as f64 - PI / 2.0;
        let outward = base + usize::from(ray < extra) - 1;
        path.push((cx, cy, p.altitude));
        for step in 1..=outward {
            let t = step as f64 / outward as f64;
            path.push((
                cx + p.radius * t * angle.cos(),
                cy + p.radius * t * angle.sin(),
                p.altitude + p.altitude_variation * t,
            ));
        }
    }
    path
}

fn flat(points: Vec<(f64, f64)>, altitude: f64) -> Path {
    points.into_iter().map(|(x, y)| (x, y, altitude)).collect()
}

/// `count` points evenly spaced along a closed polygon, starting at the first
/// vertex.
fn walk_polygon(vertices: &[(f64, f64)], count: usize) -> Vec<(f64, f64)> {
    let Some(&first) = vertices.first() else {
        return Vec::new();
    };

    let edges: Vec<((f64, f64), (f64, f64), f64)> = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b, (b.0 - a.0).hypot(b.1 - a.1)))
        .collect();
    let perimeter: f64 = edges.iter().map(|e| e.2).sum();
    if perimeter <= f64::EPSILON {
        return vec![first; count];
    }

    (0..count)
        .map(|i| {
            let mut remaining = perimeter * loop_fraction(i, count);
            for &(a, b, len) in &edges {
                if remaining <= len && len > 0.0 {
                    let t = remaining / len;
                    return (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
                }
                remaining -= len;
            }
            first
        })
        .collect()
}
