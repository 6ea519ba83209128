/// Capture driver: runs visibility volumes one after another against a
/// single render context and hands each mesh to a sink.

use std::path::PathBuf;

use crate::capture::{VisibilityVolume, VisibilityVolumeDesc};
use crate::error::Result;
use crate::io::{MeshSink, write_depth_dump};
use crate::math::CoordinateSystem;
use crate::reconstruct::{EdgeReport, VolumeReconstructor};
use crate::render::RenderContext;
use crate::{visvol_error, visvol_info, visvol_warn};

const SOURCE: &str = "visvol::CaptureDriver";

/// Outcome of one processed volume
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeReport {
    pub id: String,
    pub output_path: PathBuf,
    pub vertices: usize,
    pub faces: usize,
    pub edges: EdgeReport,
}

#[derive(Debug, Clone, Default)]
pub struct CaptureDriver {
    reconstructor: VolumeReconstructor,
    world: Option<CoordinateSystem>,
    depth_dump_dir: Option<PathBuf>,
}

impl CaptureDriver {
    pub fn new(reconstructor: VolumeReconstructor) -> Self {
        Self { reconstructor, ..Default::default() }
    }

    /// Measure height limits from this frame instead of each volume's own origin
    pub fn with_world_frame(mut self, world: Option<CoordinateSystem>) -> Self {
        self.world = world;
        self
    }

    /// Also write every captured depth buffer under `dir`
    pub fn with_depth_dumps(mut self, dir: impl Into<PathBuf>) -> Self {
        self.depth_dump_dir = Some(dir.into());
        self
    }

    /// Initialize `volume` and capture all of its directions
    pub fn capture(&self, ctx: &mut dyn RenderContext, volume: &mut VisibilityVolume) -> Result<()> {
        volume.initialize(ctx)?;
        while volume.has_more_captures() {
            volume.capture_next(ctx)?;
        }
        let stats = ctx.stats();
        visvol_info!(
            SOURCE,
            "'{}': captured {} directions ({} frames presented)",
            volume.desc().id,
            volume.directions().len(),
            stats.frames_presented
        );
        Ok(())
    }

    fn dump_depth_buffers(&self, volume: &VisibilityVolume) -> Result<()> {
        let Some(dir) = &self.depth_dump_dir else {
            return Ok(());
        };
        for (direction, buffer) in volume.directions().iter().zip(volume.depth_buffers()) {
            let name = format!("{}_{}.depth", volume.desc().id, format!("{:?}", direction.face).to_lowercase());
            write_depth_dump(&dir.join(name), buffer)?;
        }
        Ok(())
    }

    /// Capture, reconstruct and store one volume
    pub fn process(
        &self,
        ctx: &mut dyn RenderContext,
        desc: VisibilityVolumeDesc,
        sink: &mut dyn MeshSink,
    ) -> Result<VolumeReport> {
        let mut volume = VisibilityVolume::new(desc)?;
        self.capture(ctx, &mut volume)?;
        self.dump_depth_buffers(&volume)?;

        let id = volume.desc().id.clone();
        let output_path = volume.desc().output_path.clone();
        let has_caps = volume.desc().layout.has_caps();
        let mesh = self.reconstructor.reconstruct(volume, self.world.as_ref())?;

        let edges = mesh.edge_report();
        if has_caps && !edges.is_closed() {
            visvol_warn!(
                SOURCE,
                "'{}': surface is not closed ({} boundary, {} non-manifold edges)",
                id,
                edges.boundary_edges,
                edges.non_manifold_edges
            );
        }

        sink.write_mesh(&output_path, &mesh)?;
        Ok(VolumeReport {
            id,
            output_path,
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            edges,
        })
    }

    /// Process volumes strictly in order
    ///
    /// A failing volume is logged and skipped, except for fatal errors
    /// (missing render capabilities), which stop the run.
    pub fn process_all(
        &self,
        ctx: &mut dyn RenderContext,
        descs: Vec<VisibilityVolumeDesc>,
        sink: &mut dyn MeshSink,
    ) -> Result<Vec<VolumeReport>> {
        let total = descs.len();
        let mut reports = Vec::with_capacity(total);
        for (index, desc) in descs.into_iter().enumerate() {
            let id = desc.id.clone();
            visvol_info!(SOURCE, "Volume {}/{}: '{}'", index + 1, total, id);
            match self.process(ctx, desc, sink) {
                Ok(report) => reports.push(report),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => visvol_error!(SOURCE, "Skipping '{}': {}", id, e),
            }
        }
        Ok(reports)
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
