/// Placement of an external mesh file in the scene

use std::path::PathBuf;
use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Ply,
}

impl MeshFormat {
    /// Parse a format tag, case-insensitively
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "OBJ" => Some(MeshFormat::Obj),
            "PLY" => Some(MeshFormat::Ply),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshPlacement {
    pub id: String,
    pub filename: PathBuf,
    pub format: MeshFormat,
    pub position: Vec3,
    pub axis: Vec3,
    pub angle_degrees: f32,
    pub scale: Vec3,
}

impl MeshPlacement {
    pub fn new(id: impl Into<String>, filename: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            format: MeshFormat::Obj,
            position: Vec3::ZERO,
            axis: Vec3::Y,
            angle_degrees: 0.0,
            scale: Vec3::ONE,
        }
    }

    /// Rotation about `axis`; identity for a zero angle or zero axis
    pub fn rotation(&self) -> Quat {
        match self.axis.try_normalize() {
            Some(axis) if self.angle_degrees != 0.0 => Quat::from_axis_angle(axis, self.angle_degrees.to_radians()),
            _ => Quat::IDENTITY,
        }
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.position)
    }
}
