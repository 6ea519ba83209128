/// Raw depth dumps: `VVDEPTH1`, width and height as little-endian `u32`,
/// then `width * height` little-endian `f32` samples (row 0 at the bottom).
///
/// Dumps let a capture be reconstructed again later without re-rendering,
/// through `VisibilityVolume::with_depth_buffers`.

use std::fs;
use std::path::Path;

use crate::capture::DepthImage;
use crate::error::Result;
use crate::visvol_bail;

const MAGIC: &[u8; 8] = b"VVDEPTH1";
const HEADER_LEN: usize = 16;

pub fn write_depth_dump(path: &Path, image: &DepthImage) -> Result<()> {
    let samples = image.samples();
    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len() * 4);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&image.width().to_le_bytes());
    bytes.extend_from_slice(&image.height().to_le_bytes());
    if cfg!(target_endian = "little") {
        bytes.extend_from_slice(bytemuck::cast_slice(samples));
    } else {
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_depth_dump(path: &Path) -> Result<DepthImage> {
    let bytes = fs::read(path)?;
    if bytes.len() < HEADER_LEN || &bytes[..8] != MAGIC {
        visvol_bail!("visvol::DepthDump", Io, "{} is not a depth dump", path.display());
    }
    let width = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let height = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != width as usize * height as usize * 4 {
        visvol_bail!(
            "visvol::DepthDump",
            Io,
            "{}: {}x{} header but {} payload bytes",
            path.display(),
            width,
            height,
            payload.len()
        );
    }
    // Payload may be unaligned for f32, so decode per sample
    let samples = payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    DepthImage::from_samples(width, height, samples)
}
