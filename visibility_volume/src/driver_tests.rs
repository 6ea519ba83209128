use std::path::{Path, PathBuf};
use glam::Vec3;

use super::*;
use crate::error::Error;
use crate::io::read_depth_dump;
use crate::reconstruct::TriangleMesh;
use crate::render::mock_render_context::MockRenderContext;

#[derive(Default)]
struct MemorySink {
    meshes: Vec<(PathBuf, TriangleMesh)>,
}

impl MeshSink for MemorySink {
    fn write_mesh(&mut self, path: &Path, mesh: &TriangleMesh) -> Result<()> {
        self.meshes.push((path.to_path_buf(), mesh.clone()));
        Ok(())
    }
}

fn desc(id: &str, n: u32) -> VisibilityVolumeDesc {
    VisibilityVolumeDesc {
        id: id.to_string(),
        width: n,
        height: n,
        radius_max: 10.0,
        output_path: PathBuf::from(format!("{}.obj", id)),
        ..Default::default()
    }
}

#[test]
fn test_process_writes_closed_mesh() {
    let mut ctx = MockRenderContext::new();
    let mut sink = MemorySink::default();
    let report = CaptureDriver::default().process(&mut ctx, desc("a", 4), &mut sink).unwrap();

    assert_eq!(report.vertices, 96);
    assert_eq!(report.faces, 188);
    assert!(report.edges.is_closed());
    assert_eq!(sink.meshes.len(), 1);
    assert_eq!(sink.meshes[0].0, PathBuf::from("a.obj"));
}

#[test]
fn test_process_all_runs_volumes_in_order_and_skips_invalid() {
    let mut ctx = MockRenderContext::new();
    let mut sink = MemorySink::default();
    let descs = vec![
        desc("first", 2),
        VisibilityVolumeDesc { front: Vec3::Y, ..desc("parallel", 2) },
        desc("third", 3),
    ];
    let reports = CaptureDriver::default().process_all(&mut ctx, descs, &mut sink).unwrap();

    let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "third"]);
    assert_eq!(sink.meshes.len(), 2);

    // Each volume resized the viewport before its own captures
    let resizes: Vec<String> = ctx.commands().into_iter().filter(|c| c.starts_with("resize")).collect();
    assert_eq!(resizes, vec!["resize_viewport(2, 2)", "resize_viewport(3, 3)"]);
    assert_eq!(ctx.stats().frames_presented, 12);
}

#[test]
fn test_process_all_stops_on_fatal_error() {
    let mut ctx = MockRenderContext::new();
    ctx.reversed_z = false;
    let mut sink = MemorySink::default();
    let result = CaptureDriver::default().process_all(&mut ctx, vec![desc("a", 2), desc("b", 2)], &mut sink);

    assert!(matches!(result, Err(Error::UnsupportedCapability(_))));
    assert!(sink.meshes.is_empty());
}

#[test]
fn test_world_frame_is_used_for_height_limits() {
    let world = CoordinateSystem::new("ground", Vec3::new(0.0, -2.0, 0.0), Vec3::Y, Vec3::X).unwrap();
    let mut ctx = MockRenderContext::new();
    let mut sink = MemorySink::default();
    let volume = VisibilityVolumeDesc { up_max: 1.0, ..desc("clamped", 3) };
    CaptureDriver::default()
        .with_world_frame(Some(world))
        .process(&mut ctx, volume, &mut sink)
        .unwrap();

    assert!(sink.meshes[0].1.vertices.iter().all(|v| v.y <= -1.0 + 1e-4));
}

#[test]
fn test_depth_dumps_are_written_per_direction() {
    let dir = std::env::temp_dir().join(format!("visvol_driver_dumps_{}", std::process::id()));
    let mut ctx = MockRenderContext::with_depth_fill(0.25);
    let mut sink = MemorySink::default();
    CaptureDriver::default()
        .with_depth_dumps(&dir)
        .process(&mut ctx, desc("dumped", 2), &mut sink)
        .unwrap();

    for face in ["front", "right", "back", "left", "top", "bottom"] {
        let image = read_depth_dump(&dir.join(format!("dumped_{}.depth", face))).unwrap();
        assert_eq!(image.width(), 2);
        assert!(image.samples().iter().all(|&d| d == 0.25));
    }
    std::fs::remove_dir_all(&dir).unwrap();
}
