//! Canvas, metric and geographic coordinate conversions.
//!
//! Sequences are drawn on a fixed 400x300 design canvas where one pixel maps to
//! one meter. Export offsets every point from the home position using an
//! equirectangular small-area approximation (111 320 m per degree of latitude).
//! Accuracy degrades with distance from home and towards the poles; consumers
//! should not expect better than tens of meters.

use serde::{Deserialize, Serialize};

/// Logical width of the design canvas in pixels.
pub const CANVAS_WIDTH: f64 = 400.0;
/// Logical height of the design canvas in pixels.
pub const CANVAS_HEIGHT: f64 = 300.0;
/// Canvas point that maps onto the home position.
pub const CANVAS_CENTER: (f64, f64) = (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Logical pixel space of a drawing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasFrame {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasFrame {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl CanvasFrame {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

/// Geographic origin all canvas positions are offset from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomePosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Default for HomePosition {
    fn default() -> Self {
        // San Francisco
        Self {
            latitude: 37.7749,
            longitude: -122.4194,
            altitude: 0.0,
        }
    }
}

/// Decimal-degree position plus altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Offset from the canvas center in meters, as used by the 3D preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalPosition {
    pub east_m: f64,
    pub north_m: f64,
    pub up_m: f64,
}

/// Map a click in displayed (CSS) pixels into the canvas' logical pixels.
///
/// # Arguments
/// * `frame` - Logical canvas size
/// * `display_x`, `display_y` - Click position relative to the element
/// * `display_width`, `display_height` - Rendered element size
///
/// An axis with a non-positive rendered size is returned unscaled.
pub fn scale_display_point(
    frame: &CanvasFrame,
    display_x: f64,
    display_y: f64,
    display_width: f64,
    display_height: f64,
) -> (f64, f64) {
    let scale = |value: f64, logical: f64, displayed: f64| {
        if displayed > 0.0 {
            value * (logical / displayed)
        } else {
            value
        }
    };
    (
        scale(display_x, frame.width, display_width),
        scale(display_y, frame.height, display_height),
    )
}

/// Canvas pixels plus altitude to meters from the canvas center.
pub fn to_local(x: f64, y: f64, z: f64) -> LocalPosition {
    let (x0, y0) = CANVAS_CENTER;
    LocalPosition {
        east_m: x - x0,
        north_m: y - y0,
        up_m: z,
    }
}

/// Meters per degree of longitude at the given latitude.
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    METERS_PER_DEG_LAT * lat_deg.to_radians().cos()
}

/// Convert a canvas position to latitude/longitude/altitude.
///
/// * `latitude = home.latitude + (y - 150) / 111320`
/// * `longitude = home.longitude + (x - 200) / (111320 * cos(home.latitude))`
/// * `altitude = home.altitude + z`
pub fn to_geographic(x: f64, y: f64, z: f64, home: &HomePosition) -> GeoPosition {
    let local = to_local(x, y, z);
    GeoPosition {
        latitude: home.latitude + local.north_m / METERS_PER_DEG_LAT,
        longitude: home.longitude + local.east_m / meters_per_deg_lon(home.latitude),
        altitude: home.altitude + local.up_m,
    }
}

/// Inverse of [`to_geographic`]: returns canvas `(x, y, z)`.
pub fn to_canvas(position: &GeoPosition, home: &HomePosition) -> (f64, f64, f64) {
    let (x0, y0) = CANVAS_CENTER;
    let north_m = (position.latitude - home.latitude) * METERS_PER_DEG_LAT;
    let east_m = (position.longitude - home.longitude) * meters_per_deg_lon(home.latitude);
    (x0 + east_m, y0 + north_m, position.altitude - home.altitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_center_maps_to_home() {
        let home = HomePosition::default();
        let geo = to_geographic(200.0, 150.0, 0.0, &home);
        assert_eq!(geo.latitude, home.latitude);
        assert_eq!(geo.longitude, home.longitude);
        assert_eq!(geo.altitude, 0.0);
    }

    #[test]
    fn offsets_follow_equirectangular_scale() {
        let home = HomePosition {
            latitude: 60.0,
            longitude: 10.0,
            altitude: 5.0,
        };
        let geo = to_geographic(200.0 + 111.32, 150.0 + 111.32, 20.0, &home);

        assert!((geo.latitude - 60.001).abs() < 1e-12);
        // cos(60deg) = 0.5, so the same meters cover twice the longitude
        assert!((geo.longitude - 10.002).abs() < 1e-9);
        assert_eq!(geo.altitude, 25.0);
    }

    #[test]
    fn to_canvas_inverts_to_geographic() {
        let home = HomePosition::default();
        let geo = to_geographic(321.5, 12.25, 42.0, &home);
        let (x, y, z) = to_canvas(&geo, &home);
        assert!((x - 321.5).abs() < 1e-6);
        assert!((y - 12.25).abs() < 1e-6);
        assert!((z - 42.0).abs() < 1e-9);
    }

    #[test]
    fn display_clicks_scale_into_logical_pixels() {
        let frame = CanvasFrame::default();
        // Canvas rendered at 800x600 CSS pixels
        assert_eq!(
            scale_display_point(&frame, 400.0, 300.0, 800.0, 600.0),
            (200.0, 150.0)
        );
        // Collapsed element: leave coordinates alone
        assert_eq!(scale_display_point(&frame, 40.0, 30.0, 0.0, 0.0), (40.0, 30.0));
    }

    #[test]
    fn local_frame_is_centered() {
        let local = to_local(250.0, 100.0, 7.0);
        assert_eq!(local.east_m, 50.0);
        assert_eq!(local.north_m, -50.0);
        assert_eq!(local.up_m, 7.0);
    }
}
