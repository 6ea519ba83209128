/// One captured depth attachment: `width × height` reversed-Z samples,
/// row-major with row 0 at the bottom.

use crate::error::Result;
use crate::math::projection::MISS_DEPTH_FLOOR;

#[derive(Debug, Clone, PartialEq)]
pub struct DepthImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthImage {
    /// Cleared image (every sample a miss)
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0.0; width as usize * height as usize] }
    }

    /// Wrap existing samples
    ///
    /// # Errors
    ///
    /// `InvalidState` if `data.len() != width * height`.
    pub fn from_samples(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            crate::visvol_bail!(
                "visvol::DepthImage",
                InvalidState,
                "expected {}x{} = {} depth samples, got {}",
                width,
                height,
                expected,
                data.len()
            );
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn at(&self, row: u32, col: u32) -> f32 {
        self.data[(row * self.width + col) as usize]
    }

    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Number of samples that hit geometry
    pub fn hit_count(&self) -> usize {
        self.data.iter().filter(|&&d| d > MISS_DEPTH_FLOOR).count()
    }
}
