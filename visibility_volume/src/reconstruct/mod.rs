pub mod mesh;
pub mod clamp;
pub mod seam_table;
pub mod reconstructor;

pub use mesh::{TriangleMesh, MeshAccumulator, FaceOrientation, EdgeReport};
pub use clamp::ClampPolicy;
pub use seam_table::{SeamTable, LateralSeam, CapSeam, CapEdge};
pub use reconstructor::{VolumeReconstructor, DEFAULT_MISS_RADIUS};
