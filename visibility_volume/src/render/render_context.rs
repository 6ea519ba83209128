/// RenderContext trait - the renderer collaborator driven by a capture session

use glam::Mat4;
use crate::error::Result;

/// Counters reported by a render backend for the last presented frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames presented since the context was created
    pub frames_presented: u64,
    /// Triangles submitted by the last draw
    pub triangles: u32,
    /// Depth samples that passed the depth test during the last draw
    pub fragments_written: u64,
}

/// Backend able to draw the scene from a camera pose and hand back its depth
///
/// Implemented by concrete renderers (e.g. the software rasterizer). A capture
/// session owns no renderer state: the context is borrowed mutably for every
/// call, so only one session can drive it at a time.
///
/// Depth conventions expected by the session:
/// - reversed-Z: near plane writes 1.0, the cleared attachment holds 0.0
/// - `read_depth_buffer` returns rows bottom-up, row-major, one `f32` per pixel
/// - the read returns the most recently *presented* frame
pub trait RenderContext: Send {
    /// Resize the render viewport and its depth attachment
    fn resize_viewport(&mut self, width: u32, height: u32) -> Result<()>;

    /// Set the camera view matrix used by subsequent draws
    fn set_view_matrix(&mut self, view: Mat4);

    /// Set the projection matrix used by subsequent draws
    fn set_projection_matrix(&mut self, projection: Mat4);

    /// Clear and draw the whole scene into the back depth attachment
    fn draw_scene(&mut self) -> Result<()>;

    /// Finish the frame; after this call the frame's depth is readable
    fn present_frame(&mut self) -> Result<()>;

    /// Read a `width × height` block of the presented depth attachment
    ///
    /// # Errors
    ///
    /// `BackendError` if the block lies outside the viewport or nothing was presented yet.
    fn read_depth_buffer(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<f32>>;

    /// Whether the backend can produce a [0, 1] reversed-Z depth range
    ///
    /// Capture sessions refuse to start without it.
    fn supports_reversed_z(&self) -> bool {
        true
    }

    /// Statistics about the last presented frame
    fn stats(&self) -> RenderStats {
        RenderStats::default()
    }
}
