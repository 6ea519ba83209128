pub mod direction;
pub mod depth_image;
pub mod visibility_volume;

pub use direction::{CaptureDirection, CaptureLayout, CubeFace};
pub use depth_image::DepthImage;
pub use visibility_volume::{VisibilityVolume, VisibilityVolumeDesc};
