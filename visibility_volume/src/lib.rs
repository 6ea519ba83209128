/*!
# Visibility Volume

Reconstructs the free space visible from a viewpoint as a closed triangle mesh.

A [`visvol::VisibilityVolume`] captures reversed-Z depth images in six fixed
directions through any backend implementing [`visvol::RenderContext`]. The
[`visvol::VolumeReconstructor`] unprojects every depth sample, clamps it to the
volume's radius and height limits and stitches the six face grids into one
surface, which a [`visvol::MeshSink`] writes out as OBJ text.

## Architecture

- **math**: reversed-Z projections, spherical coordinates, reference frames
- **capture**: capture directions and the per-volume capture session
- **reconstruct**: clamping, seam table, mesh accumulation
- **config**: YAML scene files
- **driver**: sequential processing of many volumes
*/

mod error;
pub mod log;
pub mod math;
pub mod render;
pub mod capture;
pub mod reconstruct;
pub mod io;
pub mod config;
pub mod driver;

// Main visvol namespace module
pub mod visvol {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types and registry, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity, log, log_detailed,
        };
    }

    pub use crate::render::{RenderContext, RenderStats};
    pub use crate::capture::{CaptureDirection, CaptureLayout, CubeFace, DepthImage, VisibilityVolume, VisibilityVolumeDesc};
    pub use crate::reconstruct::{FaceOrientation, TriangleMesh, VolumeReconstructor, EdgeReport};
    pub use crate::io::{MeshSink, ObjFileSink};
    pub use crate::config::{MeshFormat, MeshPlacement, SceneConfig};
    pub use crate::math::CoordinateSystem;
    pub use crate::driver::{CaptureDriver, VolumeReport};
}

// Re-export math library at crate root
pub use glam;
