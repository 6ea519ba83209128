pub mod mesh_sink;
pub mod depth_dump;

pub use mesh_sink::{MeshSink, ObjFileSink, write_obj};
pub use depth_dump::{read_depth_dump, write_depth_dump};
