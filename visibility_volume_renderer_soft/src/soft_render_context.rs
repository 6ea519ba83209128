/// SoftRenderContext: headless CPU implementation of RenderContext.
///
/// Draws every scene mesh into a back depth target with reversed-Z
/// conventions. `present_frame` swaps back and front targets; reads
/// always come from the front (presented) target.

use glam::{Mat4, Vec4};
use visibility_volume::visvol::{self, RenderContext, RenderStats};
use visibility_volume::{visvol_bail, visvol_debug, visvol_trace};
use crate::rasterizer::{rasterize_triangle, DepthTarget};
use crate::scene::SoftScene;

pub struct SoftRenderContext {
    scene: SoftScene,
    view: Mat4,
    projection: Mat4,
    /// Target written by draw_scene
    back: DepthTarget,
    /// Last presented target
    front: DepthTarget,
    /// Whether `front` holds a presented frame for the current viewport
    presented: bool,
    stats: RenderStats,
    /// Counters of the draw not yet presented
    pending: RenderStats,
}

impl SoftRenderContext {
    /// Create a context around a scene; the viewport starts empty
    pub fn new(scene: SoftScene) -> Self {
        Self {
            scene,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            back: DepthTarget::default(),
            front: DepthTarget::default(),
            presented: false,
            stats: RenderStats::default(),
            pending: RenderStats::default(),
        }
    }

    pub fn scene(&self) -> &SoftScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SoftScene {
        &mut self.scene
    }

    /// Current viewport size
    pub fn viewport(&self) -> (u32, u32) {
        (self.back.width(), self.back.height())
    }
}

impl RenderContext for SoftRenderContext {
    fn resize_viewport(&mut self, width: u32, height: u32) -> visvol::Result<()> {
        if width == 0 || height == 0 {
            visvol_bail!(
                "visvol::soft",
                BackendError,
                "Viewport must not be empty ({}x{})",
                width,
                height
            );
        }
        if self.viewport() != (width, height) {
            visvol_debug!("visvol::soft", "Viewport resized to {}x{}", width, height);
            self.back = DepthTarget::new(width, height);
            self.front = DepthTarget::new(width, height);
            self.presented = false;
        }
        Ok(())
    }

    fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    fn draw_scene(&mut self) -> visvol::Result<()> {
        if self.back.width() == 0 {
            visvol_bail!("visvol::soft", BackendError, "draw_scene called before resize_viewport");
        }

        self.back.clear();
        let view_projection = self.projection * self.view;
        let mut triangles = 0u32;
        let mut fragments = 0u64;

        for mesh in self.scene.meshes() {
            let mvp = view_projection * mesh.transform;
            let clip: Vec<Vec4> = mesh.positions.iter().map(|p| mvp * p.extend(1.0)).collect();
            for &[a, b, c] in &mesh.triangles {
                let (Some(a), Some(b), Some(c)) =
                    (clip.get(a as usize), clip.get(b as usize), clip.get(c as usize))
                else {
                    visvol_bail!(
                        "visvol::soft",
                        BackendError,
                        "Mesh '{}' has a triangle index out of range",
                        mesh.name
                    );
                };
                fragments += rasterize_triangle(&mut self.back, [*a, *b, *c]);
                triangles += 1;
            }
        }

        visvol_trace!("visvol::soft", "Drew {} triangles, {} fragments", triangles, fragments);
        self.pending = RenderStats { frames_presented: self.stats.frames_presented, triangles, fragments_written: fragments };
        Ok(())
    }

    fn present_frame(&mut self) -> visvol::Result<()> {
        if self.back.width() == 0 {
            visvol_bail!("visvol::soft", BackendError, "present_frame called before resize_viewport");
        }
        std::mem::swap(&mut self.back, &mut self.front);
        self.presented = true;
        self.stats = RenderStats { frames_presented: self.stats.frames_presented + 1, ..self.pending };
        Ok(())
    }

    fn read_depth_buffer(&self, x: u32, y: u32, width: u32, height: u32) -> visvol::Result<Vec<f32>> {
        if !self.presented {
            visvol_bail!("visvol::soft", BackendError, "No frame presented yet");
        }
        let (vw, vh) = (self.front.width(), self.front.height());
        let inside = x.checked_add(width).is_some_and(|r| r <= vw)
            && y.checked_add(height).is_some_and(|t| t <= vh);
        if !inside {
            visvol_bail!(
                "visvol::soft",
                BackendError,
                "Depth read {}x{} at ({}, {}) exceeds viewport {}x{}",
                width,
                height,
                x,
                y,
                vw,
                vh
            );
        }

        let samples = self.front.samples();
        let mut out = Vec::with_capacity((width * height) as usize);
        for row in y..y + height {
            let start = (row * vw + x) as usize;
            out.extend_from_slice(&samples[start..start + width as usize]);
        }
        Ok(out)
    }

    fn stats(&self) -> RenderStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "soft_render_context_tests.rs"]
mod tests;
