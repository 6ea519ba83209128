/// Reversed-Z perspective projections and their closed-form inverses.
///
/// All matrices are right-handed (camera looks down -Z) and map view depth to
/// the [0, 1] clip range with the near plane at 1.0. The infinite variant sends
/// the far plane to depth 0.0, so a cleared depth attachment (0.0) reads back
/// as "nothing hit".
///
/// The inverses are written out instead of calling `Mat4::inverse()`: the
/// general inverse loses precision on the zero-heavy infinite matrix and the
/// reconstructor evaluates it for every pixel of every face.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Depth values above this are treated as hits; anything at or below is a miss.
pub const MISS_DEPTH_FLOOR: f32 = 1.0e-6;

/// Infinite far plane, reversed-Z, right-handed perspective projection.
///
/// Same matrix as `Mat4::perspective_infinite_reverse_rh`.
pub fn infinite_reversed_z_rh(fov_y_radians: f32, aspect: f32, z_near: f32) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_radians).tan();
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, -1.0),
        Vec4::new(0.0, 0.0, z_near, 0.0),
    )
}

/// Closed-form inverse of [`infinite_reversed_z_rh`].
pub fn infinite_reversed_z_rh_inverse(fov_y_radians: f32, aspect: f32, z_near: f32) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_radians).tan();
    Mat4::from_cols(
        Vec4::new(aspect / f, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0 / z_near),
        Vec4::new(0.0, 0.0, -1.0, 0.0),
    )
}

/// Finite far plane, reversed-Z, right-handed perspective projection.
///
/// Near maps to 1.0 and far to 0.0.
pub fn reversed_z_rh(fov_y_radians: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_radians).tan();
    let range = z_far - z_near;
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, z_near / range, -1.0),
        Vec4::new(0.0, 0.0, z_near * z_far / range, 0.0),
    )
}

/// Closed-form inverse of [`reversed_z_rh`].
pub fn reversed_z_rh_inverse(fov_y_radians: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_radians).tan();
    let range = z_far - z_near;
    let nf = z_near * z_far;
    Mat4::from_cols(
        Vec4::new(aspect / f, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, range / nf),
        Vec4::new(0.0, 0.0, -1.0, 1.0 / z_far),
    )
}

/// NDC coordinates of the center of pixel `(row, col)`.
///
/// Row 0 is the bottom row, matching the read-back order of depth attachments.
pub fn pixel_center_ndc(row: u32, col: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        2.0 * (col as f32 + 0.5) / width as f32 - 1.0,
        2.0 * (row as f32 + 0.5) / height as f32 - 1.0,
    )
}

/// Unproject an NDC position and raw depth sample back to world space.
///
/// Returns `None` when the homogeneous `w` is zero (depth 0.0 under an
/// infinite projection) or the point does not fit in an `f32`; missed pixels
/// go through [`view_ray`] instead. Depths above 1.0 (in front of the near
/// plane) are clamped.
pub fn unproject(ndc: Vec2, depth: f32, projection_inverse: &Mat4, view_inverse: &Mat4) -> Option<Vec3> {
    let clip = Vec4::new(ndc.x, ndc.y, depth.min(1.0), 1.0);
    let view = *projection_inverse * clip;
    if view.w == 0.0 {
        return None;
    }
    let point = view_inverse.transform_point3((view / view.w).truncate());
    point.is_finite().then_some(point)
}

/// Unit view-space direction of the ray through `ndc`, camera looking down -Z.
pub fn view_ray(ndc: Vec2, fov_y_radians: f32, aspect: f32) -> Vec3 {
    let f = 1.0 / (0.5 * fov_y_radians).tan();
    Vec3::new(ndc.x * aspect / f, ndc.y / f, -1.0).normalize()
}

/// Project a world-space point to `(ndc.x, ndc.y, depth)`.
///
/// Returns `None` for points on or behind the eye plane.
pub fn project(world: Vec3, view: &Mat4, projection: &Mat4) -> Option<Vec3> {
    let clip = *projection * (*view * world.extend(1.0));
    if clip.w <= f32::EPSILON {
        return None;
    }
    Some(clip.truncate() / clip.w)
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
