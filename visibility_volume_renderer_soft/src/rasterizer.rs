/// Reversed-Z depth rasterization on the CPU.
///
/// Triangles arrive in clip space. They are clipped against the near plane
/// (`z <= w`) and the far plane (`z >= 0`), perspective-divided, and filled at
/// pixel centers with a GREATER depth test against a target cleared to 0.0.
/// Both windings are drawn.

use glam::{Vec2, Vec4};

/// Barycentric slack so pixel centers on a shared edge are never dropped by both triangles
const EDGE_TOLERANCE: f32 = 1.0e-5;

/// Depth attachment, row-major, row 0 at the bottom
#[derive(Debug, Clone, Default)]
pub struct DepthTarget {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0.0; (width * height) as usize] }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every sample to the far value (0.0)
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn at(&self, row: u32, col: u32) -> f32 {
        self.data[(row * self.width + col) as usize]
    }
}

/// Signed distances to the two depth clip planes
fn near_distance(v: &Vec4) -> f32 {
    v.w - v.z
}

fn far_distance(v: &Vec4) -> f32 {
    v.z
}

/// Sutherland–Hodgman against one plane; keeps vertices with distance >= 0
fn clip_polygon(polygon: &[Vec4], distance: fn(&Vec4) -> f32) -> Vec<Vec4> {
    let mut out = Vec::with_capacity(polygon.len() + 2);
    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let (d0, d1) = (distance(current), distance(next));
        if d0 >= 0.0 {
            out.push(*current);
        }
        if (d0 >= 0.0) != (d1 >= 0.0) {
            let t = d0 / (d0 - d1);
            out.push(*current + (*next - *current) * t);
        }
    }
    out
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Fill one screen-space triangle; `depth` holds NDC depth per vertex
fn fill_triangle(target: &mut DepthTarget, screen: [Vec2; 3], depth: [f32; 3]) -> u64 {
    let area = edge(screen[0], screen[1], screen[2]);
    if area.abs() <= f32::EPSILON {
        return 0;
    }

    let min = screen[0].min(screen[1]).min(screen[2]);
    let max = screen[0].max(screen[1]).max(screen[2]);
    let col_start = (min.x - 0.5).ceil().max(0.0) as u32;
    let row_start = (min.y - 0.5).ceil().max(0.0) as u32;
    let col_end = ((max.x - 0.5).floor() + 1.0).clamp(0.0, target.width as f32) as u32;
    let row_end = ((max.y - 0.5).floor() + 1.0).clamp(0.0, target.height as f32) as u32;

    let mut written = 0;
    for row in row_start..row_end {
        for col in col_start..col_end {
            let p = Vec2::new(col as f32 + 0.5, row as f32 + 0.5);
            let b0 = edge(screen[1], screen[2], p) / area;
            let b1 = edge(screen[2], screen[0], p) / area;
            let b2 = edge(screen[0], screen[1], p) / area;
            if b0 < -EDGE_TOLERANCE || b1 < -EDGE_TOLERANCE || b2 < -EDGE_TOLERANCE {
                continue;
            }
            let z = b0 * depth[0] + b1 * depth[1] + b2 * depth[2];
            let slot = &mut target.data[(row * target.width + col) as usize];
            if z > *slot {
                *slot = z;
                written += 1;
            }
        }
    }
    written
}

/// Clip, project and fill a clip-space triangle; returns the samples written
pub fn rasterize_triangle(target: &mut DepthTarget, clip: [Vec4; 3]) -> u64 {
    let polygon = clip_polygon(&clip, near_distance);
    if polygon.len() < 3 {
        return 0;
    }
    let polygon = clip_polygon(&polygon, far_distance);
    if polygon.len() < 3 {
        return 0;
    }

    let half = Vec2::new(target.width as f32, target.height as f32) * 0.5;
    let projected: Vec<(Vec2, f32)> = polygon
        .iter()
        .map(|v| {
            let ndc = v.truncate() / v.w;
            ((ndc.truncate() + Vec2::ONE) * half, ndc.z.clamp(0.0, 1.0))
        })
        .collect();

    let mut written = 0;
    for i in 1..projected.len() - 1 {
        let (a, b, c) = (projected[0], projected[i], projected[i + 1]);
        written += fill_triangle(target, [a.0, b.0, c.0], [a.1, b.1, c.1]);
    }
    written
}
