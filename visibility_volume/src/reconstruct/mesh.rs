/// Indexed triangle mesh produced by the reconstructor.
///
/// Faces are stored 0-based; writers add 1 when the output format is 1-based.

use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::error::Result;

/// Which side of the surface counter-clockwise triangles face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceOrientation {
    /// Away from the viewpoint
    #[default]
    Outward,
    /// Toward the viewpoint
    Inward,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

/// Edge usage summary of a mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// Distinct undirected edges
    pub edges: usize,
    /// Edges used by exactly one face
    pub boundary_edges: usize,
    /// Edges used by more than two faces
    pub non_manifold_edges: usize,
    /// Directed edges traversed more than once (neighbours wound in opposite directions)
    pub flipped_edges: usize,
}

impl EdgeReport {
    /// Every edge shared by exactly two faces
    pub fn is_closed(&self) -> bool {
        self.edges > 0 && self.boundary_edges == 0 && self.non_manifold_edges == 0
    }

    pub fn is_consistently_oriented(&self) -> bool {
        self.flipped_edges == 0
    }
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Count how many faces use each edge
    pub fn edge_report(&self) -> EdgeReport {
        let mut undirected: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        let mut directed: FxHashMap<(u32, u32), u32> = FxHashMap::default();

        for face in &self.faces {
            for e in 0..3 {
                let (a, b) = (face[e], face[(e + 1) % 3]);
                *directed.entry((a, b)).or_insert(0) += 1;
                *undirected.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }

        EdgeReport {
            edges: undirected.len(),
            boundary_edges: undirected.values().filter(|&&n| n == 1).count(),
            non_manifold_edges: undirected.values().filter(|&&n| n > 2).count(),
            flipped_edges: directed.values().filter(|&&n| n > 1).count(),
        }
    }
}

/// Append-only mesh builder
///
/// Triangles are handed over counter-clockwise as seen from the viewpoint and
/// written according to the configured [`FaceOrientation`].
#[derive(Debug, Default)]
pub struct MeshAccumulator {
    mesh: TriangleMesh,
    orientation: FaceOrientation,
}

impl MeshAccumulator {
    pub fn new(orientation: FaceOrientation) -> Self {
        Self { mesh: TriangleMesh::default(), orientation }
    }

    pub fn with_capacity(orientation: FaceOrientation, vertices: usize, faces: usize) -> Self {
        Self {
            mesh: TriangleMesh {
                vertices: Vec::with_capacity(vertices),
                faces: Vec::with_capacity(faces),
            },
            orientation,
        }
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3) -> u32 {
        self.mesh.vertices.push(position);
        (self.mesh.vertices.len() - 1) as u32
    }

    /// Append a triangle given counter-clockwise from the viewpoint
    ///
    /// # Errors
    ///
    /// `InvalidState` if any index refers to a vertex not appended yet.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) -> Result<()> {
        let count = self.mesh.vertices.len() as u32;
        if a >= count || b >= count || c >= count {
            crate::visvol_bail!(
                "visvol::MeshAccumulator",
                InvalidState,
                "triangle ({}, {}, {}) references a vertex beyond {}",
                a,
                b,
                c,
                count
            );
        }
        let face = match self.orientation {
            FaceOrientation::Inward => [a, b, c],
            FaceOrientation::Outward => [a, c, b],
        };
        self.mesh.faces.push(face);
        Ok(())
    }

    /// Append the two triangles of a quad laid out as seen from the viewpoint
    pub fn push_quad(&mut self, lower_left: u32, lower_right: u32, upper_left: u32, upper_right: u32) -> Result<()> {
        self.push_triangle(lower_left, lower_right, upper_right)?;
        self.push_triangle(lower_left, upper_right, upper_left)
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.mesh.faces.len()
    }

    pub fn into_mesh(self) -> TriangleMesh {
        self.mesh
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
