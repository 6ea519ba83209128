/// Mesh output: the `MeshSink` trait and the OBJ-style text writer.
///
/// Format: one `v x y z` line per vertex in emission order, then one
/// `f i j k` line per triangle with 1-based indices. No normals, no texture
/// coordinates.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::reconstruct::TriangleMesh;
use crate::visvol_info;

/// Destination for reconstructed meshes
pub trait MeshSink {
    /// Store `mesh` under `path`
    fn write_mesh(&mut self, path: &Path, mesh: &TriangleMesh) -> Result<()>;
}

/// Serialize `mesh` as OBJ text
pub fn write_obj<W: Write>(out: &mut W, mesh: &TriangleMesh) -> Result<()> {
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for [a, b, c] in &mesh.faces {
        writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}

/// Writes each mesh to its own file, creating parent directories
#[derive(Debug, Default)]
pub struct ObjFileSink {
    files_written: usize,
}

impl ObjFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_written(&self) -> usize {
        self.files_written
    }
}

impl MeshSink for ObjFileSink {
    fn write_mesh(&mut self, path: &Path, mesh: &TriangleMesh) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        write_obj(&mut out, mesh)?;
        out.flush()?;
        self.files_written += 1;
        visvol_info!(
            "visvol::ObjFileSink",
            "Wrote {} ({} vertices, {} faces)",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.5, 0.0, -2.0), Vec3::new(0.0, 1.0, 0.25)],
            faces: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn test_write_obj_uses_one_based_faces() {
        let mut out = Vec::new();
        write_obj(&mut out, &triangle()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "v 0 0 0\nv 1.5 0 -2\nv 0 1 0.25\nf 1 2 3\n");
    }

    #[test]
    fn test_write_obj_empty_mesh() {
        let mut out = Vec::new();
        write_obj(&mut out, &TriangleMesh::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_file_sink_creates_directories() {
        let dir = std::env::temp_dir().join(format!("visvol_sink_{}", std::process::id()));
        let path = dir.join("nested").join("volume.obj");
        let mut sink = ObjFileSink::new();
        sink.write_mesh(&path, &triangle()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 1);
        assert_eq!(sink.files_written(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }
}
