/// SoftScene: the triangle meshes drawn by the software renderer.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys.
/// Meshes keep their vertices in local space plus a world matrix.

use std::path::Path;
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use visibility_volume::visvol::{self, MeshFormat, MeshPlacement};
use visibility_volume::{visvol_info, visvol_warn, visvol_error};
use crate::obj_loader;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a mesh within a SoftScene.
    ///
    /// A key becomes invalid only when its own mesh is removed.
    pub struct SceneMeshKey;
}

// ===== SCENE MESH =====

/// Indexed triangle mesh with a world transform
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    pub name: String,
    /// Vertex positions in local space
    pub positions: Vec<Vec3>,
    /// Triangle vertex indices into `positions`
    pub triangles: Vec<[u32; 3]>,
    /// Local to world matrix
    pub transform: Mat4,
}

impl SceneMesh {
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self { name: name.into(), positions, triangles, transform: Mat4::IDENTITY }
    }

    /// Replace the world matrix
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Axis-aligned box centered on the local origin
    pub fn cuboid(name: impl Into<String>, half_extents: Vec3) -> Self {
        let h = half_extents;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let triangles = vec![
            [0, 2, 1], [0, 3, 2], // -Z
            [4, 5, 6], [4, 6, 7], // +Z
            [0, 1, 5], [0, 5, 4], // -Y
            [3, 6, 2], [3, 7, 6], // +Y
            [0, 4, 7], [0, 7, 3], // -X
            [1, 2, 6], [1, 6, 5], // +X
        ];
        Self::new(name, positions, triangles)
    }

    /// Square in the XZ plane centered on the local origin
    pub fn quad(name: impl Into<String>, half_size: f32) -> Self {
        let s = half_size;
        let positions = vec![
            Vec3::new(-s, 0.0, -s),
            Vec3::new(s, 0.0, -s),
            Vec3::new(s, 0.0, s),
            Vec3::new(-s, 0.0, s),
        ];
        Self::new(name, positions, vec![[0, 2, 1], [0, 3, 2]])
    }

    /// Vertices of triangle `index` in world space
    pub fn world_triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.triangles.get(index)?;
        let fetch = |i: u32| self.positions.get(i as usize).map(|p| self.transform.transform_point3(*p));
        Some([fetch(a)?, fetch(b)?, fetch(c)?])
    }
}

// ===== SCENE =====

/// Collection of meshes drawn by a [`crate::SoftRenderContext`]
#[derive(Debug, Default)]
pub struct SoftScene {
    meshes: SlotMap<SceneMeshKey, SceneMesh>,
    /// Lookup by mesh name (last insert wins)
    names: FxHashMap<String, SceneMeshKey>,
}

impl SoftScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from mesh placements
    ///
    /// PLY placements are skipped with a warning. A placement whose file
    /// cannot be loaded is logged and skipped.
    pub fn from_placements(placements: &[MeshPlacement]) -> Self {
        let mut scene = Self::new();
        for placement in placements {
            if let Err(e) = scene.add_placement(placement) {
                visvol_error!("visvol::soft::scene", "Mesh '{}' not loaded: {}", placement.id, e);
            }
        }
        scene
    }

    /// Load one placed mesh file and add it; returns `Ok(None)` for skipped formats
    pub fn add_placement(&mut self, placement: &MeshPlacement) -> visvol::Result<Option<SceneMeshKey>> {
        match placement.format {
            MeshFormat::Ply => {
                visvol_warn!(
                    "visvol::soft::scene",
                    "Mesh '{}': PLY files are not supported, skipped",
                    placement.id
                );
                Ok(None)
            }
            MeshFormat::Obj => {
                let mut mesh = obj_loader::load_obj_triangles(&placement.filename)?;
                mesh.name = placement.id.clone();
                mesh.transform = placement.transform();
                Ok(Some(self.add_mesh(mesh)))
            }
        }
    }

    /// Load a single OBJ file with an identity transform
    pub fn add_obj_file(&mut self, path: &Path) -> visvol::Result<SceneMeshKey> {
        let mesh = obj_loader::load_obj_triangles(path)?;
        Ok(self.add_mesh(mesh))
    }

    pub fn add_mesh(&mut self, mesh: SceneMesh) -> SceneMeshKey {
        visvol_info!(
            "visvol::soft::scene",
            "Added mesh '{}' ({} vertices, {} triangles)",
            mesh.name,
            mesh.positions.len(),
            mesh.triangles.len()
        );
        let name = mesh.name.clone();
        let key = self.meshes.insert(mesh);
        self.names.insert(name, key);
        key
    }

    /// Remove a mesh; returns it if the key was valid
    pub fn remove_mesh(&mut self, key: SceneMeshKey) -> Option<SceneMesh> {
        let mesh = self.meshes.remove(key)?;
        if self.names.get(&mesh.name) == Some(&key) {
            self.names.remove(&mesh.name);
        }
        Some(mesh)
    }

    pub fn mesh(&self, key: SceneMeshKey) -> Option<&SceneMesh> {
        self.meshes.get(key)
    }

    pub fn mesh_mut(&mut self, key: SceneMeshKey) -> Option<&mut SceneMesh> {
        self.meshes.get_mut(key)
    }

    pub fn find(&self, name: &str) -> Option<SceneMeshKey> {
        self.names.get(name).copied()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &SceneMesh> + '_ {
        self.meshes.values()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total number of triangles over all meshes
    pub fn triangle_count(&self) -> usize {
        self.meshes.values().map(|m| m.triangles.len()).sum()
    }
}

/// Demo scene used when no geometry is supplied: two unit cubes on a 10×10 floor
pub fn builtin_scene() -> SoftScene {
    let mut scene = SoftScene::new();
    for (name, center) in [("cube #1", Vec3::new(-1.0, 0.0, -4.0)), ("cube #2", Vec3::new(2.0, 0.0, -3.0))] {
        scene.add_mesh(SceneMesh::cuboid(name, Vec3::splat(0.5)).with_transform(Mat4::from_translation(center)));
    }
    scene.add_mesh(SceneMesh::quad("floor", 5.0).with_transform(Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0))));
    scene
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
