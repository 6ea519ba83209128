/// Adjacency between capture faces, as a lookup table.
///
/// Each face image is a chart seen from the viewpoint: columns grow toward the
/// camera's right, rows grow toward its up. Lateral faces are indexed
/// front/right/back/left (0..4), the caps top (4) and bottom (5), matching the
/// capture order. A vertex is addressed by `(face, row, col)`.
///
/// - Lateral seam: the last column of `left` touches the first column of
///   `right`, row for row.
/// - Cap seam: the last row (top cap) or first row (bottom cap) of a lateral
///   face touches one edge of the cap. Walking the lateral row left to right
///   walks that cap edge forward or backward.
///
/// Where three faces meet, the lateral corners of two neighbouring faces and
/// the shared cap corner form one closing triangle.

use crate::capture::CaptureLayout;
use crate::error::Result;
use crate::reconstruct::MeshAccumulator;

pub const TOP_FACE: usize = 4;
pub const BOTTOM_FACE: usize = 5;

/// Edge of a cap face image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapEdge {
    FirstRow,
    LastRow,
    FirstCol,
    LastCol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LateralSeam {
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapSeam {
    pub lateral: usize,
    pub cap: usize,
    pub edge: CapEdge,
    /// Cap edge runs opposite to the lateral row
    pub reversed: bool,
}

impl CapSeam {
    const fn new(lateral: usize, cap: usize, edge: CapEdge, reversed: bool) -> Self {
        Self { lateral, cap, edge, reversed }
    }

    /// `(row, col)` of the cap pixel next to column `t` of the lateral row
    pub fn cap_pixel(&self, t: u32, n: u32) -> (u32, u32) {
        let u = if self.reversed { n - 1 - t } else { t };
        match self.edge {
            CapEdge::FirstRow => (0, u),
            CapEdge::LastRow => (n - 1, u),
            CapEdge::FirstCol => (u, 0),
            CapEdge::LastCol => (u, n - 1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeamTable {
    pub lateral: &'static [LateralSeam],
    /// Ordered around the cap so that `top[k]` and `top[k + 1]` share a corner
    pub top: &'static [CapSeam],
    pub bottom: &'static [CapSeam],
}

const LATERAL_RING: [LateralSeam; 4] = [
    LateralSeam { left: 0, right: 1 },
    LateralSeam { left: 1, right: 2 },
    LateralSeam { left: 2, right: 3 },
    LateralSeam { left: 3, right: 0 },
];

// Top image: columns toward right-of-front, rows toward back
const TOP_CAP: [CapSeam; 4] = [
    CapSeam::new(0, TOP_FACE, CapEdge::FirstRow, false),
    CapSeam::new(1, TOP_FACE, CapEdge::LastCol, false),
    CapSeam::new(2, TOP_FACE, CapEdge::LastRow, true),
    CapSeam::new(3, TOP_FACE, CapEdge::FirstCol, true),
];

// Bottom image: columns toward right-of-front, rows toward front
const BOTTOM_CAP: [CapSeam; 4] = [
    CapSeam::new(0, BOTTOM_FACE, CapEdge::LastRow, false),
    CapSeam::new(1, BOTTOM_FACE, CapEdge::LastCol, true),
    CapSeam::new(2, BOTTOM_FACE, CapEdge::FirstRow, true),
    CapSeam::new(3, BOTTOM_FACE, CapEdge::FirstCol, false),
];

pub const CUBE_SEAMS: SeamTable = SeamTable { lateral: &LATERAL_RING, top: &TOP_CAP, bottom: &BOTTOM_CAP };
pub const RING_SEAMS: SeamTable = SeamTable { lateral: &LATERAL_RING, top: &[], bottom: &[] };

/// Flat vertex index of pixel `(row, col)` of `face`
#[inline]
pub fn vertex_index(face: usize, row: u32, col: u32, n: u32) -> u32 {
    face as u32 * n * n + row * n + col
}

impl SeamTable {
    pub fn for_layout(layout: CaptureLayout) -> &'static SeamTable {
        match layout {
            CaptureLayout::Cube => &CUBE_SEAMS,
            CaptureLayout::LegacyRing => &RING_SEAMS,
        }
    }

    /// Number of triangles `stitch` emits for resolution `n`
    pub fn triangle_count(&self, n: u32) -> usize {
        let strip = 2 * (n as usize - 1);
        let caps = self.top.len() + self.bottom.len();
        (self.lateral.len() + caps) * strip + caps
    }

    /// Emit every seam strip and corner triangle
    ///
    /// All face grids (`n × n` vertices each) must already be appended.
    pub fn stitch(&self, acc: &mut MeshAccumulator, n: u32) -> Result<()> {
        let last = n - 1;

        for seam in self.lateral {
            for i in 1..n {
                acc.push_quad(
                    vertex_index(seam.left, i - 1, last, n),
                    vertex_index(seam.right, i - 1, 0, n),
                    vertex_index(seam.left, i, last, n),
                    vertex_index(seam.right, i, 0, n),
                )?;
            }
        }

        let cap_vertex = |seam: &CapSeam, t: u32| {
            let (row, col) = seam.cap_pixel(t, n);
            vertex_index(seam.cap, row, col, n)
        };

        // Top cap sits above the lateral faces' last row
        for seam in self.top {
            for j in 1..n {
                acc.push_quad(
                    vertex_index(seam.lateral, last, j - 1, n),
                    vertex_index(seam.lateral, last, j, n),
                    cap_vertex(seam, j - 1),
                    cap_vertex(seam, j),
                )?;
            }
        }

        // Bottom cap sits below the lateral faces' first row
        for seam in self.bottom {
            for j in 1..n {
                acc.push_quad(
                    cap_vertex(seam, j - 1),
                    cap_vertex(seam, j),
                    vertex_index(seam.lateral, 0, j - 1, n),
                    vertex_index(seam.lateral, 0, j, n),
                )?;
            }
        }

        for (k, seam) in self.top.iter().enumerate() {
            let next = &self.top[(k + 1) % self.top.len()];
            acc.push_triangle(
                vertex_index(seam.lateral, last, last, n),
                vertex_index(next.lateral, last, 0, n),
                cap_vertex(seam, last),
            )?;
        }

        for (k, seam) in self.bottom.iter().enumerate() {
            let next = &self.bottom[(k + 1) % self.bottom.len()];
            acc.push_triangle(
                vertex_index(seam.lateral, 0, last, n),
                cap_vertex(seam, last),
                vertex_index(next.lateral, 0, 0, n),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "seam_table_tests.rs"]
mod tests;
