/// Volume reconstruction: depth captures → closed triangle mesh.
///
/// Every pixel of every captured face becomes one vertex. Pixels that saw
/// nothing (depth at or below [`MISS_DEPTH_FLOOR`]) are placed along their view
/// ray at a fixed distance from the eye instead of infinity. Points are then
/// clamped by the volume's radius and height limits, neighbouring pixels are
/// joined by quads and the face grids are stitched with the [`SeamTable`] of
/// the layout.

use crate::capture::VisibilityVolume;
use crate::error::Result;
use crate::math::projection::{MISS_DEPTH_FLOOR, pixel_center_ndc, unproject, view_ray};
use crate::math::CoordinateSystem;
use crate::reconstruct::seam_table::vertex_index;
use crate::reconstruct::{ClampPolicy, FaceOrientation, MeshAccumulator, SeamTable, TriangleMesh};
use crate::{visvol_bail, visvol_debug, visvol_info, visvol_warn};

const SOURCE: &str = "visvol::VolumeReconstructor";

/// Distance given to missed pixels when the volume has no radius limit
pub const DEFAULT_MISS_RADIUS: f32 = 1.0e4;

#[derive(Debug, Clone, Copy)]
pub struct VolumeReconstructor {
    pub orientation: FaceOrientation,
    /// Used for missed pixels when the volume sets no `radius_max`
    pub miss_radius: f32,
}

impl Default for VolumeReconstructor {
    fn default() -> Self {
        Self { orientation: FaceOrientation::Outward, miss_radius: DEFAULT_MISS_RADIUS }
    }
}

impl VolumeReconstructor {
    pub fn new(orientation: FaceOrientation) -> Self {
        Self { orientation, ..Default::default() }
    }

    /// Reconstruct the visibility surface of a fully captured volume
    ///
    /// `world`, when given, is the frame whose ground plane the height limits
    /// refer to; otherwise the volume's own origin and up are used. Output
    /// vertices are in scene coordinates, `W·H·k + i·W + j` for pixel `(i, j)`
    /// of direction `k`.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the volume still has directions to capture.
    pub fn reconstruct(&self, volume: VisibilityVolume, world: Option<&CoordinateSystem>) -> Result<TriangleMesh> {
        if !volume.is_complete() {
            visvol_bail!(
                SOURCE,
                InvalidState,
                "'{}': reconstruct after {} of {} captures",
                volume.desc().id,
                volume.current_index(),
                volume.directions().len()
            );
        }

        let desc = volume.desc();
        let n = volume.resolution();
        let eye = volume.frame().origin;
        // Clamp limits are measured from this frame's origin
        let reference = world.unwrap_or(volume.frame());
        let clamp = ClampPolicy::from_desc(desc);
        let seams = SeamTable::for_layout(desc.layout);

        let fov_y = desc.fov_degrees.to_radians();
        let miss_radius = desc.radius_limit().unwrap_or(self.miss_radius);
        let projection_inverse = volume.projection_inverse();

        let face_count = volume.directions().len();
        let pixels = n as usize * n as usize;
        let mut acc = MeshAccumulator::with_capacity(
            self.orientation,
            pixels * face_count,
            2 * (n as usize - 1).pow(2) * face_count + seams.triangle_count(n),
        );

        let mut misses = 0usize;
        for (k, buffer) in volume.depth_buffers().iter().enumerate() {
            let view_inverse = volume.view_matrix(k).inverse();

            for i in 0..n {
                for j in 0..n {
                    let ndc = pixel_center_ndc(i, j, n, n);
                    let depth = buffer.at(i, j);
                    let miss_point = || eye + view_inverse.transform_vector3(view_ray(ndc, fov_y, 1.0)) * miss_radius;

                    // Also catches NaN and negative samples
                    let world_point = if !(depth > MISS_DEPTH_FLOOR) {
                        misses += 1;
                        miss_point()
                    } else if let Some(p) = unproject(ndc, depth, &projection_inverse, &view_inverse) {
                        p
                    } else {
                        visvol_warn!(
                            SOURCE,
                            "'{}': face {} pixel ({}, {}) depth {} does not unproject, treated as a miss",
                            desc.id,
                            k,
                            i,
                            j,
                            depth
                        );
                        misses += 1;
                        miss_point()
                    };
                    acc.push_vertex(clamp.apply(world_point, reference));

                    if i > 0 && j > 0 {
                        acc.push_quad(
                            vertex_index(k, i - 1, j - 1, n),
                            vertex_index(k, i - 1, j, n),
                            vertex_index(k, i, j - 1, n),
                            vertex_index(k, i, j, n),
                        )?;
                    }
                }
            }
            visvol_debug!(SOURCE, "'{}': face {:?} unprojected", desc.id, volume.directions()[k].face);
        }

        seams.stitch(&mut acc, n)?;

        visvol_info!(
            SOURCE,
            "'{}': {} vertices, {} triangles ({} of {} samples missed)",
            desc.id,
            acc.vertex_count(),
            acc.face_count(),
            misses,
            pixels * face_count
        );

        Ok(acc.into_mesh())
    }
}

#[cfg(test)]
#[path = "reconstructor_tests.rs"]
mod tests;
