/// Radius and height limits applied to every reconstructed point.
///
/// Both limits are measured from the reference frame's origin: the radius as a
/// distance, the height along the frame's `up`. Radius is clamped first, height second, so a
/// point outside both bounds ends on the height bound.

use glam::Vec3;
use crate::capture::VisibilityVolumeDesc;
use crate::math::{CoordinateSystem, euclidean_to_spherical, spherical_to_euclidean};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampPolicy {
    pub radius_max: Option<f32>,
    pub up_min: f32,
    pub up_max: f32,
}

impl Default for ClampPolicy {
    fn default() -> Self {
        Self { radius_max: None, up_min: f32::NEG_INFINITY, up_max: f32::INFINITY }
    }
}

impl ClampPolicy {
    pub fn from_desc(desc: &VisibilityVolumeDesc) -> Self {
        Self {
            radius_max: desc.radius_limit(),
            up_min: desc.up_min,
            up_max: desc.up_max,
        }
    }

    /// Clamp `p` against `reference`, the world frame when one is given and
    /// the volume's own frame (centered on the eye) otherwise.
    pub fn apply(&self, p: Vec3, reference: &CoordinateSystem) -> Vec3 {
        let p = match self.radius_max {
            Some(radius_max) => clamp_radius(p, reference.origin, reference, radius_max),
            None => p,
        };
        clamp_height(p, reference, self.up_min, self.up_max)
    }
}

/// Pull `p` back onto the sphere of radius `radius_max` around `center`
///
/// Works in spherical coordinates over `axes`, so the direction from `center`
/// is kept. The offset is scaled down by its largest component first, which
/// leaves the angles alone and keeps the squared length finite for points
/// placed near `f32::MAX`.
pub fn clamp_radius(p: Vec3, center: Vec3, axes: &CoordinateSystem, radius_max: f32) -> Vec3 {
    let offset = p - center;
    let scale = offset.abs().max_element();
    if !(scale > 0.0 && scale.is_finite()) {
        return p;
    }
    let mut s = euclidean_to_spherical(axes.to_local_vector(offset / scale));
    let limit = radius_max / scale;
    if s.radius <= limit {
        return p;
    }
    s.radius = limit;
    center + axes.from_local_vector(spherical_to_euclidean(s)) * scale
}

/// Slide `p` along `reference.up` until its height lies in `[up_min, up_max]`
pub fn clamp_height(p: Vec3, reference: &CoordinateSystem, up_min: f32, up_max: f32) -> Vec3 {
    let height = reference.height(p);
    if height > up_max {
        p - reference.up * (height - up_max)
    } else if height < up_min {
        p + reference.up * (up_min - height)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_clamp_lands_on_sphere_along_ray() {
        let eye = Vec3::new(2.0, 1.0, -3.0);
        let axes = CoordinateSystem::default();
        for p in [Vec3::new(40.0, 0.0, 0.0), Vec3::new(-20.0, 30.0, 15.0), Vec3::new(2.0, -100.0, -3.0)] {
            let clamped = clamp_radius(p, eye, &axes, 10.0);
            assert!(((clamped - eye).length() - 10.0).abs() < 1e-4);
            assert!((clamped - eye).normalize().dot((p - eye).normalize()) > 1.0 - 1e-5);
        }
    }

    #[test]
    fn test_radius_clamp_ignores_points_inside() {
        let axes = CoordinateSystem::default();
        let p = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(clamp_radius(p, Vec3::ZERO, &axes, 10.0), p);
    }

    #[test]
    fn test_radius_clamp_is_independent_of_axes() {
        let tilted = CoordinateSystem::new("tilted", Vec3::new(5.0, 5.0, 5.0), Vec3::new(1.0, 1.0, 0.0), Vec3::Z).unwrap();
        let p = Vec3::new(30.0, -12.0, 8.0);
        let a = clamp_radius(p, Vec3::ZERO, &tilted, 7.0);
        let b = clamp_radius(p, Vec3::ZERO, &CoordinateSystem::default(), 7.0);
        assert!((a - b).length() < 1e-4);
    }

    #[test]
    fn test_height_clamp_hits_bounds() {
        let reference = CoordinateSystem::new("ground", Vec3::new(0.0, 0.0, 1.0), Vec3::Z, Vec3::X).unwrap();
        let above = clamp_height(Vec3::new(3.0, 4.0, 50.0), &reference, -2.0, 5.0);
        assert!((reference.height(above) - 5.0).abs() < 1e-5);
        assert_eq!((above.x, above.y), (3.0, 4.0));

        let below = clamp_height(Vec3::new(3.0, 4.0, -50.0), &reference, -2.0, 5.0);
        assert!((reference.height(below) + 2.0).abs() < 1e-5);

        let inside = Vec3::new(1.0, 1.0, 2.0);
        assert_eq!(clamp_height(inside, &reference, -2.0, 5.0), inside);
    }

    #[test]
    fn test_policy_clamps_radius_then_height() {
        let policy = ClampPolicy { radius_max: Some(10.0), up_min: -1.0, up_max: 2.0 };
        let reference = CoordinateSystem::default();
        let p = policy.apply(Vec3::new(0.0, 100.0, 0.0), &reference);
        assert!((p - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);

        let q = policy.apply(Vec3::new(30.0, 0.0, 40.0), &reference);
        assert!((q.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_default_policy_is_identity() {
        let p = Vec3::new(1e6, -1e6, 3.0);
        assert_eq!(ClampPolicy::default().apply(p, &CoordinateSystem::default()), p);
    }

    #[test]
    fn test_policy_radius_is_centered_on_reference_origin() {
        let policy = ClampPolicy { radius_max: Some(5.0), ..Default::default() };
        let reference = CoordinateSystem::new("ground", Vec3::new(10.0, 0.0, 0.0), Vec3::Y, Vec3::X).unwrap();
        let p = policy.apply(Vec3::new(30.0, 0.0, 0.0), &reference);
        assert!((p - Vec3::new(15.0, 0.0, 0.0)).length() < 1e-4);

        // Inside the sphere around the reference origin, even though far from zero
        let q = Vec3::new(12.0, 3.0, 0.0);
        assert_eq!(policy.apply(q, &reference), q);
    }

    #[test]
    fn test_radius_clamp_stays_finite_near_float_max() {
        let axes = CoordinateSystem::default();
        let dir = Vec3::new(1.0, 2.0, -2.0) / 3.0;
        for radius_max in [1.0e8, f32::MAX] {
            let p = dir * f32::MAX;
            let clamped = clamp_radius(p, Vec3::ZERO, &axes, radius_max);
            assert!(clamped.is_finite(), "{:?} for limit {}", clamped, radius_max);
            let unit = clamped / radius_max;
            assert!((unit.length() - 1.0).abs() < 1e-3);
            assert!(unit.dot(dir) > 1.0 - 1e-4);
        }
    }
}
