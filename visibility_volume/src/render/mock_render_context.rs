/// Mock RenderContext for unit tests (no rasterization)
///
/// Records every call so tests can assert the draw → present → read-back
/// ordering, and returns synthetic depth.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use glam::Mat4;

#[cfg(test)]
use crate::render::{RenderContext, RenderStats};
#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::visvol_bail;

#[cfg(test)]
pub struct MockRenderContext {
    pub commands: Arc<Mutex<Vec<String>>>,
    /// Depth written everywhere when `frame_fills` has no entry for the frame
    pub depth_fill: f32,
    /// Optional per-presented-frame constant depth
    pub frame_fills: Vec<f32>,
    pub reversed_z: bool,
    /// Return one sample too few from read_depth_buffer
    pub truncate_reads: bool,
    pub view: Mat4,
    pub projection: Mat4,
    width: u32,
    height: u32,
    drawn: Option<f32>,
    presented: Option<f32>,
    frames_presented: u64,
}

#[cfg(test)]
impl MockRenderContext {
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            depth_fill: 0.0,
            frame_fills: Vec::new(),
            reversed_z: true,
            truncate_reads: false,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            width: 0,
            height: 0,
            drawn: None,
            presented: None,
            frames_presented: 0,
        }
    }

    pub fn with_depth_fill(depth: f32) -> Self {
        Self { depth_fill: depth, ..Self::new() }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn record(&self, command: String) {
        self.commands.lock().unwrap().push(command);
    }
}

#[cfg(test)]
impl RenderContext for MockRenderContext {
    fn resize_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        self.record(format!("resize_viewport({}, {})", width, height));
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn set_view_matrix(&mut self, view: Mat4) {
        self.record("set_view_matrix".to_string());
        self.view = view;
    }

    fn set_projection_matrix(&mut self, projection: Mat4) {
        self.record("set_projection_matrix".to_string());
        self.projection = projection;
    }

    fn draw_scene(&mut self) -> Result<()> {
        self.record("draw_scene".to_string());
        let frame = self.frames_presented as usize;
        self.drawn = Some(self.frame_fills.get(frame).copied().unwrap_or(self.depth_fill));
        Ok(())
    }

    fn present_frame(&mut self) -> Result<()> {
        self.record("present_frame".to_string());
        self.presented = self.drawn.take();
        self.frames_presented += 1;
        Ok(())
    }

    fn read_depth_buffer(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<f32>> {
        self.record(format!("read_depth_buffer({}, {}, {}, {})", x, y, width, height));
        let Some(depth) = self.presented else {
            visvol_bail!("visvol::MockRenderContext", BackendError, "no frame presented");
        };
        let mut count = (width * height) as usize;
        if self.truncate_reads {
            count -= 1;
        }
        Ok(vec![depth; count])
    }

    fn supports_reversed_z(&self) -> bool {
        self.reversed_z
    }

    fn stats(&self) -> RenderStats {
        RenderStats {
            frames_presented: self.frames_presented,
            triangles: 0,
            fragments_written: (self.width * self.height) as u64,
        }
    }
}
