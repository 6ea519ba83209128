/// Capture session for one visibility volume.
///
/// A volume walks its capture directions one by one against a borrowed
/// [`RenderContext`]: for each direction the context receives the view and
/// projection matrices, draws, presents, and the presented depth attachment is
/// copied into the volume. Once every direction is recorded the volume is
/// handed to the reconstructor, which consumes it.

use std::path::PathBuf;
use glam::{Mat4, Vec3};

use crate::capture::{CaptureDirection, CaptureLayout, DepthImage};
use crate::error::Result;
use crate::math::{CoordinateSystem, infinite_reversed_z_rh, infinite_reversed_z_rh_inverse};
use crate::render::RenderContext;
use crate::{visvol_bail, visvol_debug, visvol_warn};

const SOURCE: &str = "visvol::VisibilityVolume";

/// Plain description of a capture request, as read from config or CLI
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityVolumeDesc {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub origin: Vec3,
    pub up: Vec3,
    pub front: Vec3,
    pub fov_degrees: f32,
    /// Lowest allowed height above the reference ground plane
    pub up_min: f32,
    /// Highest allowed height above the reference ground plane
    pub up_max: f32,
    /// Largest allowed distance from `origin`; non-positive or non-finite disables the clamp
    pub radius_max: f32,
    pub z_near: f32,
    pub output_path: PathBuf,
    pub layout: CaptureLayout,
}

impl Default for VisibilityVolumeDesc {
    fn default() -> Self {
        Self {
            id: "visibility_volume".to_string(),
            width: 600,
            height: 600,
            origin: Vec3::ZERO,
            up: Vec3::Y,
            front: Vec3::X,
            fov_degrees: 90.0,
            up_min: f32::NEG_INFINITY,
            up_max: f32::INFINITY,
            radius_max: f32::INFINITY,
            z_near: 0.1,
            output_path: PathBuf::from("visibility_sphere.obj"),
            layout: CaptureLayout::Cube,
        }
    }
}

impl VisibilityVolumeDesc {
    /// The radius clamp, if one is configured
    pub fn radius_limit(&self) -> Option<f32> {
        (self.radius_max.is_finite() && self.radius_max > 0.0).then_some(self.radius_max)
    }
}

#[derive(Debug)]
pub struct VisibilityVolume {
    desc: VisibilityVolumeDesc,
    frame: CoordinateSystem,
    resolution: u32,
    directions: &'static [CaptureDirection],
    depth_buffers: Vec<DepthImage>,
    current_index: usize,
}

impl VisibilityVolume {
    /// Validate a description and build an uninitialized volume
    ///
    /// Non-square resolutions are coerced to `height × height`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a zero resolution, a field of view outside (0, 180)
    /// degrees, a non-positive near plane or a degenerate basis.
    pub fn new(mut desc: VisibilityVolumeDesc) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 {
            visvol_bail!(SOURCE, InvalidConfig, "'{}': resolution {}x{} is empty", desc.id, desc.width, desc.height);
        }
        if !(desc.fov_degrees > 0.0 && desc.fov_degrees < 180.0) {
            visvol_bail!(SOURCE, InvalidConfig, "'{}': field of view {} is outside (0, 180) degrees", desc.id, desc.fov_degrees);
        }
        if !(desc.z_near > 0.0 && desc.z_near.is_finite()) {
            visvol_bail!(SOURCE, InvalidConfig, "'{}': near plane {} must be positive", desc.id, desc.z_near);
        }
        if desc.up_min > desc.up_max {
            visvol_bail!(SOURCE, InvalidConfig, "'{}': up_min {} is above up_max {}", desc.id, desc.up_min, desc.up_max);
        }
        if desc.width != desc.height {
            visvol_warn!(
                SOURCE,
                "'{}': resolution {}x{} is not square, using {}x{}",
                desc.id,
                desc.width,
                desc.height,
                desc.height,
                desc.height
            );
            desc.width = desc.height;
        }
        let directions = desc.layout.directions();
        // Flat vertex indices are u32
        let vertex_count = directions.len() as u64 * desc.height as u64 * desc.height as u64;
        if vertex_count > u32::MAX as u64 {
            visvol_bail!(
                SOURCE,
                InvalidConfig,
                "'{}': resolution {} gives {} vertices, more than a u32 index can address",
                desc.id,
                desc.height,
                vertex_count
            );
        }

        let frame = CoordinateSystem::new(desc.id.clone(), desc.origin, desc.up, desc.front)?;
        desc.up = frame.up;
        desc.front = frame.front;

        Ok(Self {
            resolution: desc.height,
            directions,
            frame,
            desc,
            depth_buffers: Vec::new(),
            current_index: 0,
        })
    }

    /// Build a volume whose captures were recorded elsewhere (depth dumps)
    ///
    /// # Errors
    ///
    /// `InvalidState` if the buffer count or any buffer size does not match.
    pub fn with_depth_buffers(desc: VisibilityVolumeDesc, buffers: Vec<DepthImage>) -> Result<Self> {
        let mut volume = Self::new(desc)?;
        if buffers.len() != volume.directions.len() {
            visvol_bail!(
                SOURCE,
                InvalidState,
                "'{}': expected {} depth buffers, got {}",
                volume.desc.id,
                volume.directions.len(),
                buffers.len()
            );
        }
        for (k, buffer) in buffers.iter().enumerate() {
            if buffer.width() != volume.resolution || buffer.height() != volume.resolution {
                visvol_bail!(
                    SOURCE,
                    InvalidState,
                    "'{}': depth buffer {} is {}x{}, expected {}x{}",
                    volume.desc.id,
                    k,
                    buffer.width(),
                    buffer.height(),
                    volume.resolution,
                    volume.resolution
                );
            }
        }
        volume.current_index = buffers.len();
        volume.depth_buffers = buffers;
        Ok(volume)
    }

    // ===== CAPTURE PROTOCOL =====

    /// Prepare the context and allocate one depth buffer per direction
    ///
    /// # Errors
    ///
    /// `UnsupportedCapability` if the context cannot render reversed-Z depth.
    /// Errors from `resize_viewport` are propagated.
    pub fn initialize(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if !ctx.supports_reversed_z() {
            visvol_bail!(
                SOURCE,
                UnsupportedCapability,
                "render context cannot produce a [0, 1] reversed-Z depth range"
            );
        }
        ctx.resize_viewport(self.resolution, self.resolution)?;
        self.depth_buffers = self
            .directions
            .iter()
            .map(|_| DepthImage::new(self.resolution, self.resolution))
            .collect();
        self.current_index = 0;
        visvol_debug!(
            SOURCE,
            "'{}': {} directions at {}x{}",
            self.desc.id,
            self.directions.len(),
            self.resolution,
            self.resolution
        );
        Ok(())
    }

    pub fn has_more_captures(&self) -> bool {
        self.current_index < self.directions.len()
    }

    pub fn is_complete(&self) -> bool {
        !self.depth_buffers.is_empty() && self.current_index == self.directions.len()
    }

    /// View matrix looking from the origin along direction `index`
    pub fn view_matrix(&self, index: usize) -> Mat4 {
        let (front, up) = self.directions[index].orient(self.frame.front, self.frame.up);
        Mat4::look_at_rh(self.frame.origin, self.frame.origin + front, up)
    }

    /// View matrix for the direction the cursor points at
    ///
    /// # Errors
    ///
    /// `InvalidState` once every direction has been captured.
    pub fn next_view_matrix(&self) -> Result<Mat4> {
        if !self.has_more_captures() {
            visvol_bail!(SOURCE, InvalidState, "'{}': no capture direction left", self.desc.id);
        }
        Ok(self.view_matrix(self.current_index))
    }

    /// Square, infinite-far, reversed-Z projection shared by all directions
    pub fn projection_matrix(&self) -> Mat4 {
        infinite_reversed_z_rh(self.desc.fov_degrees.to_radians(), 1.0, self.desc.z_near)
    }

    pub fn projection_inverse(&self) -> Mat4 {
        infinite_reversed_z_rh_inverse(self.desc.fov_degrees.to_radians(), 1.0, self.desc.z_near)
    }

    /// Copy the presented depth attachment into the current direction's buffer and advance
    ///
    /// Call only after the context drew and presented this direction's view.
    ///
    /// # Errors
    ///
    /// `InvalidState` before `initialize` or past the last direction;
    /// `BackendError` when the read-back size is wrong.
    pub fn record_current_depth_buffer(&mut self, ctx: &dyn RenderContext) -> Result<()> {
        if self.depth_buffers.is_empty() {
            visvol_bail!(SOURCE, InvalidState, "'{}': record before initialize", self.desc.id);
        }
        if !self.has_more_captures() {
            visvol_bail!(SOURCE, InvalidState, "'{}': every direction is already recorded", self.desc.id);
        }

        let samples = ctx.read_depth_buffer(0, 0, self.resolution, self.resolution)?;
        let expected = (self.resolution * self.resolution) as usize;
        if samples.len() != expected {
            visvol_bail!(
                SOURCE,
                BackendError,
                "'{}': depth read-back returned {} samples, expected {}",
                self.desc.id,
                samples.len(),
                expected
            );
        }

        let image = DepthImage::from_samples(self.resolution, self.resolution, samples)?;
        visvol_debug!(
            SOURCE,
            "'{}': recorded {:?} ({} hits)",
            self.desc.id,
            self.directions[self.current_index].face,
            image.hit_count()
        );
        self.depth_buffers[self.current_index] = image;
        self.current_index += 1;
        Ok(())
    }

    /// Capture the current direction: view, projection, draw, present, record
    pub fn capture_next(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        let view = self.next_view_matrix()?;
        ctx.set_view_matrix(view);
        ctx.set_projection_matrix(self.projection_matrix());
        ctx.draw_scene()?;
        ctx.present_frame()?;
        self.record_current_depth_buffer(ctx)
    }

    // ===== ACCESSORS =====

    pub fn desc(&self) -> &VisibilityVolumeDesc {
        &self.desc
    }

    /// The volume's own frame (origin, normalized up and front)
    pub fn frame(&self) -> &CoordinateSystem {
        &self.frame
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn directions(&self) -> &'static [CaptureDirection] {
        self.directions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn depth_buffer(&self, index: usize) -> Option<&DepthImage> {
        self.depth_buffers.get(index)
    }

    pub fn depth_buffers(&self) -> &[DepthImage] {
        &self.depth_buffers
    }
}

#[cfg(test)]
#[path = "visibility_volume_tests.rs"]
mod tests;
