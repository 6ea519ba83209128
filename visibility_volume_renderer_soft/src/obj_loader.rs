/// Wavefront OBJ reader for scene geometry.
///
/// Only `v` and `f` records matter for depth rendering. Face corners may be
/// written `i`, `i/t`, `i//n` or `i/t/n`; negative indices count back from the
/// last vertex read so far. Polygons are fan-triangulated.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use glam::Vec3;
use visibility_volume::visvol::{Error, Result};
use visibility_volume::{visvol_bail, visvol_debug};
use crate::scene::SceneMesh;

/// Load an OBJ file; the mesh is named after the file stem
pub fn load_obj_triangles(path: &Path) -> Result<SceneMesh> {
    let file = File::open(path)
        .map_err(|e| Error::Io(format!("Cannot open mesh '{}': {}", path.display(), e)))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mesh = parse_obj(file, &name)?;
    visvol_debug!(
        "visvol::soft::obj",
        "Loaded '{}': {} vertices, {} triangles",
        path.display(),
        mesh.positions.len(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

/// Parse OBJ text from any reader
pub fn parse_obj<R: Read>(reader: R, name: &str) -> Result<SceneMesh> {
    let reader = BufReader::new(reader);
    let mut positions = Vec::<Vec3>::new();
    let mut triangles = Vec::<[u32; 3]>::new();
    let mut corners = Vec::<u32>::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_index + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut coord = || -> Option<f32> { parts.next()?.parse().ok() };
                match (coord(), coord(), coord()) {
                    (Some(x), Some(y), Some(z)) => positions.push(Vec3::new(x, y, z)),
                    _ => visvol_bail!(
                        "visvol::soft::obj",
                        InvalidConfig,
                        "{}:{}: malformed vertex '{}'",
                        name,
                        line_number,
                        line.trim()
                    ),
                }
            }
            Some("f") => {
                corners.clear();
                for token in parts {
                    corners.push(resolve_index(token, positions.len(), name, line_number)?);
                }
                if corners.len() < 3 {
                    visvol_bail!(
                        "visvol::soft::obj",
                        InvalidConfig,
                        "{}:{}: face needs at least 3 vertices",
                        name,
                        line_number
                    );
                }
                for i in 1..corners.len() - 1 {
                    triangles.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(SceneMesh::new(name, positions, triangles))
}

/// Turn one face corner token into a zero-based vertex index
fn resolve_index(token: &str, vertex_count: usize, name: &str, line_number: usize) -> Result<u32> {
    let position = token.split('/').next().unwrap_or_default();
    let index: i64 = match position.parse() {
        Ok(index) => index,
        Err(_) => visvol_bail!(
            "visvol::soft::obj",
            InvalidConfig,
            "{}:{}: bad face index '{}'",
            name,
            line_number,
            token
        ),
    };
    let resolved = if index < 0 { vertex_count as i64 + index } else { index - 1 };
    if index == 0 || resolved < 0 || resolved >= vertex_count as i64 {
        visvol_bail!(
            "visvol::soft::obj",
            InvalidConfig,
            "{}:{}: face index {} out of range ({} vertices)",
            name,
            line_number,
            index,
            vertex_count
        );
    }
    Ok(resolved as u32)
}
