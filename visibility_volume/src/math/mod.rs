pub mod projection;
pub mod spherical;
pub mod coordinate_system;

pub use projection::{
    infinite_reversed_z_rh, infinite_reversed_z_rh_inverse, reversed_z_rh, reversed_z_rh_inverse,
    view_ray, project, unproject, pixel_center_ndc,
};
pub use spherical::{Spherical, euclidean_to_spherical, spherical_to_euclidean};
pub use coordinate_system::CoordinateSystem;
