/// Euclidean ↔ spherical conversion (physics convention).
///
/// Coordinates are expressed in a local frame with `x = front`,
/// `y = up × front` and `z = up`: `polar` is measured from `up`, `azimuth`
/// in the equatorial plane starting at `front`.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Angle from the +z (up) axis, in [0, π]
    pub polar: f32,
    /// Angle from +x (front) toward +y, in (-π, π]
    pub azimuth: f32,
}

/// Convert a local-frame point to spherical coordinates.
///
/// The origin maps to `radius = 0` with both angles 0.
pub fn euclidean_to_spherical(p: Vec3) -> Spherical {
    let radius = p.length();
    if radius <= f32::EPSILON {
        return Spherical { radius: 0.0, polar: 0.0, azimuth: 0.0 };
    }
    Spherical {
        radius,
        polar: (p.z / radius).clamp(-1.0, 1.0).acos(),
        azimuth: p.y.atan2(p.x),
    }
}

pub fn spherical_to_euclidean(s: Spherical) -> Vec3 {
    let (sin_polar, cos_polar) = s.polar.sin_cos();
    let (sin_azimuth, cos_azimuth) = s.azimuth.sin_cos();
    Vec3::new(
        s.radius * sin_polar * cos_azimuth,
        s.radius * sin_polar * sin_azimuth,
        s.radius * cos_polar,
    )
}

#[cfg(test)]
#[path = "spherical_tests.rs"]
mod tests;
