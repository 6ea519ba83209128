pub mod scene_config;
pub mod mesh_placement;

pub use scene_config::SceneConfig;
pub use mesh_placement::{MeshFormat, MeshPlacement};
