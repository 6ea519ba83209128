/// Fixed capture directions around a viewpoint.
///
/// Azimuth turns clockwise seen from above (about `-up`), so each lateral
/// face's right edge meets the next face's left edge. Elevation tilts the
/// turned front toward `up` about the turned right axis.

use glam::{Quat, Vec3};
use serde::Deserialize;

/// One face of the capture cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Front,
    Right,
    Back,
    Left,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureDirection {
    pub face: CubeFace,
    pub azimuth_degrees: f32,
    pub elevation_degrees: f32,
}

impl CaptureDirection {
    const fn new(face: CubeFace, azimuth_degrees: f32, elevation_degrees: f32) -> Self {
        Self { face, azimuth_degrees, elevation_degrees }
    }

    /// Turn a unit `(front, up)` basis toward this direction.
    ///
    /// Returns the rotated `(front, up)` pair.
    pub fn orient(&self, front: Vec3, up: Vec3) -> (Vec3, Vec3) {
        let yaw = Quat::from_axis_angle(-up, self.azimuth_degrees.to_radians());
        let front = yaw * front;
        let right = front.cross(up);
        let pitch = Quat::from_axis_angle(right, self.elevation_degrees.to_radians());
        ((pitch * front).normalize(), (pitch * up).normalize())
    }
}

const CUBE_DIRECTIONS: [CaptureDirection; 6] = [
    CaptureDirection::new(CubeFace::Front, 0.0, 0.0),
    CaptureDirection::new(CubeFace::Right, 90.0, 0.0),
    CaptureDirection::new(CubeFace::Back, 180.0, 0.0),
    CaptureDirection::new(CubeFace::Left, 270.0, 0.0),
    CaptureDirection::new(CubeFace::Top, 0.0, 90.0),
    CaptureDirection::new(CubeFace::Bottom, 0.0, -90.0),
];

/// Which set of directions a volume captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureLayout {
    /// Four lateral faces plus top and bottom; reconstructs a closed surface
    #[default]
    Cube,
    /// Four lateral faces only; reconstructs an open band
    LegacyRing,
}

impl CaptureLayout {
    pub fn directions(self) -> &'static [CaptureDirection] {
        match self {
            CaptureLayout::Cube => &CUBE_DIRECTIONS,
            CaptureLayout::LegacyRing => &CUBE_DIRECTIONS[..4],
        }
    }

    pub fn has_caps(self) -> bool {
        matches!(self, CaptureLayout::Cube)
    }
}
