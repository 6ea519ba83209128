//! Command line surface of `visvol`

use std::path::PathBuf;

use clap::Parser;
use visibility_volume::glam::Vec3;
use visibility_volume::visvol::{CaptureLayout, FaceOrientation, VisibilityVolumeDesc};

/// Reconstruct the space visible from a viewpoint as a closed OBJ mesh
///
/// Without `--config` a single volume is captured at (x, y, z) looking
/// along +X with +Y up. Without `--input` or config meshes the built-in
/// demo scene is rendered.
#[derive(Parser, Debug)]
#[command(name = "visvol", version)]
pub struct Cli {
    /// x position of the camera
    #[arg(short = 'x', default_value_t = 0.0, allow_negative_numbers = true)]
    pub x: f32,

    /// y position of the camera
    #[arg(short = 'y', default_value_t = 0.0, allow_negative_numbers = true)]
    pub y: f32,

    /// z position of the camera
    #[arg(short = 'z', default_value_t = 0.0, allow_negative_numbers = true)]
    pub z: f32,

    /// x resolution of each capture in pixels
    #[arg(long = "rx", default_value_t = 600)]
    pub rx: u32,

    /// y resolution of each capture in pixels
    #[arg(long = "ry", default_value_t = 600)]
    pub ry: u32,

    /// Radius of the visibility sphere
    #[arg(short, long, default_value_t = 20.0)]
    pub radius: f32,

    /// Output mesh file
    #[arg(short, long, default_value = "visibility_sphere.obj")]
    pub output: PathBuf,

    /// Scene mesh in OBJ format
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// YAML scene file with coordinate systems, meshes and volumes
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Vertical field of view of each capture, in degrees
    #[arg(long, default_value_t = 90.0)]
    pub fov: f32,

    /// Capture only the four lateral directions (open mesh)
    #[arg(long)]
    pub legacy_ring: bool,

    /// Also write every captured depth buffer to this directory
    #[arg(long, value_name = "DIR")]
    pub dump_depth: Option<PathBuf>,

    /// Emit triangles facing the eye instead of away from it
    #[arg(long)]
    pub inward: bool,

    /// Log debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The single volume described by the flags
    pub fn volume_desc(&self) -> VisibilityVolumeDesc {
        VisibilityVolumeDesc {
            id: "visibility_sphere".to_string(),
            width: self.rx,
            height: self.ry,
            origin: Vec3::new(self.x, self.y, self.z),
            fov_degrees: self.fov,
            radius_max: self.radius,
            output_path: self.output.clone(),
            layout: if self.legacy_ring { CaptureLayout::LegacyRing } else { CaptureLayout::Cube },
            ..VisibilityVolumeDesc::default()
        }
    }

    pub fn orientation(&self) -> FaceOrientation {
        if self.inward { FaceOrientation::Inward } else { FaceOrientation::Outward }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["visvol"]).unwrap();
        let desc = cli.volume_desc();
        assert_eq!((desc.width, desc.height), (600, 600));
        assert_eq!(desc.radius_max, 20.0);
        assert_eq!(desc.fov_degrees, 90.0);
        assert_eq!(desc.origin, Vec3::ZERO);
        assert_eq!(desc.up, Vec3::Y);
        assert_eq!(desc.front, Vec3::X);
        assert_eq!(desc.output_path, PathBuf::from("visibility_sphere.obj"));
        assert_eq!(desc.layout, CaptureLayout::Cube);
        assert_eq!(cli.orientation(), FaceOrientation::Outward);
        assert!(cli.input.is_none() && cli.config.is_none());
    }

    #[test]
    fn test_position_resolution_and_output() {
        let cli = Cli::try_parse_from([
            "visvol", "-x", "-110", "-y", "1.5", "-z", "1527", "--rx", "64", "--ry", "64",
            "-r", "50", "-o", "out/corner.obj", "--legacy-ring", "--inward",
        ])
        .unwrap();
        let desc = cli.volume_desc();
        assert_eq!(desc.origin, Vec3::new(-110.0, 1.5, 1527.0));
        assert_eq!((desc.width, desc.height), (64, 64));
        assert_eq!(desc.radius_max, 50.0);
        assert_eq!(desc.output_path, PathBuf::from("out/corner.obj"));
        assert_eq!(desc.layout, CaptureLayout::LegacyRing);
        assert_eq!(cli.orientation(), FaceOrientation::Inward);
    }

    #[test]
    fn test_paths() {
        let cli = Cli::try_parse_from(["visvol", "-i", "city.obj", "-c", "scene.yaml", "--dump-depth", "dumps", "-v"])
            .unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("city.obj")));
        assert_eq!(cli.config, Some(PathBuf::from("scene.yaml")));
        assert_eq!(cli.dump_depth, Some(PathBuf::from("dumps")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_help_is_not_an_error_exit() {
        let err = Cli::try_parse_from(["visvol", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }
}
