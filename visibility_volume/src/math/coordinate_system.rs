/// Orthonormal reference frame (origin + up + front) used to express the
/// world ground plane and each capture viewpoint.

use glam::Vec3;
use crate::error::Result;

const SOURCE: &str = "visvol::CoordinateSystem";

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    pub id: String,
    pub origin: Vec3,
    /// Unit length
    pub up: Vec3,
    /// Unit length, orthogonal to `up`
    pub front: Vec3,
}

impl CoordinateSystem {
    /// Build a frame, normalizing `up` and orthogonalizing `front` against it.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if either axis is zero or `front` is parallel to `up`.
    pub fn new(id: impl Into<String>, origin: Vec3, up: Vec3, front: Vec3) -> Result<Self> {
        let id = id.into();
        let Some(up_n) = up.try_normalize() else {
            crate::visvol_bail!(SOURCE, InvalidConfig, "'{}': up axis {:?} has zero length", id, up);
        };
        let Some(front_n) = (front - up_n * front.dot(up_n)).try_normalize() else {
            crate::visvol_bail!(SOURCE, InvalidConfig, "'{}': front axis {:?} is parallel to up {:?}", id, front, up);
        };
        Ok(Self { id, origin, up: up_n, front: front_n })
    }

    /// `front × up`, the camera's screen-right direction
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up)
    }

    /// Express a scene point in the local frame: `x = front`, `y = up × front`, `z = up`.
    pub fn to_local(&self, p: Vec3) -> Vec3 {
        self.to_local_vector(p - self.origin)
    }

    /// Inverse of [`CoordinateSystem::to_local`].
    pub fn from_local(&self, local: Vec3) -> Vec3 {
        self.origin + self.from_local_vector(local)
    }

    /// Rotate a direction or offset into the local axes, ignoring the origin.
    pub fn to_local_vector(&self, d: Vec3) -> Vec3 {
        Vec3::new(d.dot(self.front), d.dot(self.up.cross(self.front)), d.dot(self.up))
    }

    pub fn from_local_vector(&self, local: Vec3) -> Vec3 {
        self.front * local.x + self.up.cross(self.front) * local.y + self.up * local.z
    }

    /// Signed distance of `p` above the frame's ground plane
    pub fn height(&self, p: Vec3) -> f32 {
        (p - self.origin).dot(self.up)
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            id: "world".to_string(),
            origin: Vec3::ZERO,
            up: Vec3::Y,
            front: Vec3::X,
        }
    }
}
