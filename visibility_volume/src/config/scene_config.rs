/// YAML scene configuration.
///
/// Top-level keys, each holding one mapping or a sequence of mappings:
///
/// ```yaml
/// world_coord_sys:
///   origin: [0, 0, 0]
///   up: [0, 1, 0]
///   front: [1, 0, 0]
/// mesh:
///   - id: city
///     filename: city.obj
///     format: OBJ
///     position: [0, 0, 0]
///     orientation axis, angle: [0, 1, 0, 90]
///     scale: 1.5
/// visibility_vol:
///   - id: corner
///     width: 600
///     height: 600
///     origin: [-110, 1, 1527]
///     up: [0, 1, 0]
///     front: [1, 0, 0]
///     fov_degrees: 90
///     up_max: 4000
///     up_min: -4000
///     radius_max: 50
///     output_file: corner.obj
/// ```
///
/// Entities are parsed independently: one with a missing required field or a
/// malformed value is logged and dropped, the rest of the file still loads.
/// Missing optional fields take their default with a warning.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::capture::{CaptureLayout, VisibilityVolumeDesc};
use crate::config::{MeshFormat, MeshPlacement};
use crate::error::{Error, Result};
use crate::math::CoordinateSystem;
use crate::{visvol_bail, visvol_error, visvol_info, visvol_warn};

const SOURCE: &str = "visvol::SceneConfig";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneConfig {
    pub coordinate_systems: Vec<CoordinateSystem>,
    pub meshes: Vec<MeshPlacement>,
    pub volumes: Vec<VisibilityVolumeDesc>,
}

// ===== RAW (as written in the file) =====

#[derive(Debug, Default, Deserialize)]
struct RawScene {
    world_coord_sys: Option<Value>,
    mesh: Option<Value>,
    visibility_vol: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawCoordinateSystem {
    id: Option<String>,
    origin: Option<[f32; 3]>,
    up: Option<[f32; 3]>,
    front: Option<[f32; 3]>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScale {
    Uniform(f32),
    PerAxis([f32; 3]),
}

#[derive(Debug, Deserialize)]
struct RawMesh {
    id: Option<String>,
    filename: Option<PathBuf>,
    format: Option<String>,
    position: Option<[f32; 3]>,
    #[serde(rename = "orientation axis, angle")]
    orientation: Option<[f32; 4]>,
    scale: Option<RawScale>,
}

#[derive(Debug, Deserialize)]
struct RawVolume {
    id: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    origin: Option<[f32; 3]>,
    up: Option<[f32; 3]>,
    front: Option<[f32; 3]>,
    fov_degrees: Option<f32>,
    up_max: Option<f32>,
    up_min: Option<f32>,
    radius_max: Option<f32>,
    z_near: Option<f32>,
    output_file: Option<PathBuf>,
    layout: Option<CaptureLayout>,
}

// ===== FIELD HELPERS =====

fn required<T>(value: Option<T>, entity: &str, field: &str) -> Result<T> {
    match value {
        Some(value) => Ok(value),
        None => visvol_bail!(SOURCE, InvalidConfig, "{}: missing required field '{}'", entity, field),
    }
}

fn optional<T: std::fmt::Debug>(value: Option<T>, default: T, entity: &str, field: &str) -> T {
    value.unwrap_or_else(|| {
        visvol_warn!(SOURCE, "{}: '{}' not set, using {:?}", entity, field, default);
        default
    })
}

/// A key may hold one mapping or a sequence of them
fn entities(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items,
        Some(other) => vec![other],
    }
}

fn parse_entity<T: DeserializeOwned>(value: Value, kind: &str, index: usize) -> Result<T> {
    serde_yaml::from_value(value)
        .map_err(|e| Error::InvalidConfig(format!("{} #{}: {}", kind, index, e)))
}

// ===== CONVERSIONS =====

impl RawCoordinateSystem {
    fn into_frame(self, index: usize) -> Result<CoordinateSystem> {
        let id = self.id.unwrap_or_else(|| format!("world_coord_sys #{}", index));
        let entity = format!("world_coord_sys '{}'", id);
        let origin = required(self.origin, &entity, "origin")?;
        let up = required(self.up, &entity, "up")?;
        let front = required(self.front, &entity, "front")?;
        CoordinateSystem::new(id, Vec3::from(origin), Vec3::from(up), Vec3::from(front))
    }
}

impl RawMesh {
    fn into_placement(self, index: usize) -> Result<MeshPlacement> {
        let id = self.id.unwrap_or_else(|| format!("mesh #{}", index));
        let entity = format!("mesh '{}'", id);
        let filename = required(self.filename, &entity, "filename")?;

        let tag = optional(self.format, "OBJ".to_string(), &entity, "format");
        let Some(format) = MeshFormat::from_tag(&tag) else {
            visvol_bail!(SOURCE, InvalidConfig, "{}: unknown format '{}' (expected OBJ or PLY)", entity, tag);
        };

        let position = optional(self.position, [0.0; 3], &entity, "position");
        let [ax, ay, az, angle] = optional(self.orientation, [0.0, 1.0, 0.0, 0.0], &entity, "orientation axis, angle");
        let scale = match self.scale {
            Some(RawScale::Uniform(s)) => Vec3::splat(s),
            Some(RawScale::PerAxis(s)) => Vec3::from(s),
            None => Vec3::ONE,
        };

        Ok(MeshPlacement {
            id,
            filename,
            format,
            position: Vec3::from(position),
            axis: Vec3::new(ax, ay, az),
            angle_degrees: angle,
            scale,
        })
    }
}

impl RawVolume {
    fn into_desc(self, index: usize) -> Result<VisibilityVolumeDesc> {
        let defaults = VisibilityVolumeDesc::default();
        let id = self.id.unwrap_or_else(|| format!("visibility_vol #{}", index));
        let entity = format!("visibility_vol '{}'", id);

        let width = required(self.width, &entity, "width")?;
        let height = required(self.height, &entity, "height")?;
        let origin = required(self.origin, &entity, "origin")?;
        let up = required(self.up, &entity, "up")?;
        let front = required(self.front, &entity, "front")?;

        Ok(VisibilityVolumeDesc {
            width,
            height,
            origin: Vec3::from(origin),
            up: Vec3::from(up),
            front: Vec3::from(front),
            fov_degrees: optional(self.fov_degrees, defaults.fov_degrees, &entity, "fov_degrees"),
            up_max: optional(self.up_max, defaults.up_max, &entity, "up_max"),
            up_min: optional(self.up_min, defaults.up_min, &entity, "up_min"),
            radius_max: optional(self.radius_max, defaults.radius_max, &entity, "radius_max"),
            z_near: self.z_near.unwrap_or(defaults.z_near),
            output_path: optional(self.output_file, PathBuf::from("visibility_volume.obj"), &entity, "output_file"),
            layout: self.layout.unwrap_or_default(),
            id,
        })
    }
}

/// Parse every entity of one kind, logging and skipping the failures
fn collect<R, T>(value: Option<Value>, kind: &str, convert: impl Fn(R, usize) -> Result<T>) -> Vec<T>
where
    R: DeserializeOwned,
{
    let mut out = Vec::new();
    for (index, item) in entities(value).into_iter().enumerate() {
        match parse_entity::<R>(item, kind, index).and_then(|raw| convert(raw, index)) {
            Ok(entity) => out.push(entity),
            Err(e) => visvol_error!(SOURCE, "Dropping {} #{}: {}", kind, index, e),
        }
    }
    out
}

impl SceneConfig {
    /// Parse a YAML document
    ///
    /// # Errors
    ///
    /// `InvalidConfig` only when the document itself is not valid YAML or its
    /// root is not a mapping. Bad entities are dropped, not reported as errors.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawScene = match serde_yaml::from_str::<Option<RawScene>>(text) {
            Ok(raw) => raw.unwrap_or_default(),
            Err(e) => visvol_bail!(SOURCE, InvalidConfig, "cannot parse scene file: {}", e),
        };

        let config = Self {
            coordinate_systems: collect(raw.world_coord_sys, "world_coord_sys", RawCoordinateSystem::into_frame),
            meshes: collect(raw.mesh, "mesh", RawMesh::into_placement),
            volumes: collect(raw.visibility_vol, "visibility_vol", RawVolume::into_desc),
        };
        visvol_info!(
            SOURCE,
            "Loaded {} coordinate system(s), {} mesh(es), {} visibility volume(s)",
            config.coordinate_systems.len(),
            config.meshes.len(),
            config.volumes.len()
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => visvol_bail!(SOURCE, Io, "cannot read {}: {}", path.display(), e),
        };
        Self::from_yaml_str(&text)
    }

    /// Frame the height limits refer to (the first one declared)
    pub fn world_frame(&self) -> Option<&CoordinateSystem> {
        if self.coordinate_systems.len() > 1 {
            visvol_warn!(SOURCE, "{} coordinate systems declared, using the first", self.coordinate_systems.len());
        }
        self.coordinate_systems.first()
    }
}

#[cfg(test)]
#[path = "scene_config_tests.rs"]
mod tests;
