//! `visvol`: capture visibility volumes of a scene and write them as OBJ meshes

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use visibility_volume::visvol::log::{set_min_severity, LogSeverity};
use visibility_volume::visvol::{
    CaptureDriver, CoordinateSystem, MeshPlacement, ObjFileSink, SceneConfig, VisibilityVolumeDesc,
    VolumeReconstructor,
};
use visibility_volume::{visvol_info, visvol_warn};
use visibility_volume_renderer_soft::{builtin_scene, SoftRenderContext, SoftScene};

use crate::cli::Cli;

const SOURCE: &str = "visvol::app";

/// Everything one run needs: scene geometry, volumes and the reference frame
struct RunPlan {
    placements: Vec<MeshPlacement>,
    volumes: Vec<VisibilityVolumeDesc>,
    world: Option<CoordinateSystem>,
}

fn plan(cli: &Cli) -> Result<RunPlan> {
    let Some(path) = &cli.config else {
        return Ok(RunPlan { placements: Vec::new(), volumes: vec![cli.volume_desc()], world: None });
    };

    let config = SceneConfig::from_file(path).with_context(|| format!("loading scene file {}", path.display()))?;
    if config.volumes.is_empty() {
        bail!("{} declares no usable visibility volume", path.display());
    }
    let world = config.world_frame().cloned();
    Ok(RunPlan { placements: config.meshes, volumes: config.volumes, world })
}

fn build_scene(cli: &Cli, placements: &[MeshPlacement]) -> Result<SoftScene> {
    let mut scene = SoftScene::from_placements(placements);
    if let Some(input) = &cli.input {
        scene
            .add_obj_file(input)
            .with_context(|| format!("loading input mesh {}", input.display()))?;
    }
    if scene.is_empty() {
        if cli.input.is_some() || !placements.is_empty() {
            visvol_warn!(SOURCE, "No scene mesh could be loaded");
        }
        visvol_info!(SOURCE, "No input file provided, using the built-in scene");
        scene = builtin_scene();
    }
    Ok(scene)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        set_min_severity(LogSeverity::Debug);
    }

    let RunPlan { placements, volumes, world } = plan(&cli)?;
    let scene = build_scene(&cli, &placements)?;
    visvol_info!(SOURCE, "Scene: {} mesh(es), {} triangles", scene.mesh_count(), scene.triangle_count());

    let mut driver = CaptureDriver::new(VolumeReconstructor::new(cli.orientation())).with_world_frame(world);
    if let Some(dir) = &cli.dump_depth {
        driver = driver.with_depth_dumps(dir);
    }

    let mut ctx = SoftRenderContext::new(scene);
    let mut sink = ObjFileSink::new();
    let requested = volumes.len();
    let reports = driver.process_all(&mut ctx, volumes, &mut sink)?;

    for report in &reports {
        visvol_info!(
            SOURCE,
            "'{}' -> {} ({} vertices, {} faces)",
            report.id,
            report.output_path.display(),
            report.vertices,
            report.faces
        );
    }
    if reports.len() < requested {
        bail!("{} of {} visibility volumes failed", requested - reports.len(), requested);
    }
    Ok(())
}
