use glam::Vec3;
use super::*;
use crate::capture::{CaptureLayout, DepthImage, VisibilityVolumeDesc};
use crate::error::Error;
use crate::render::mock_render_context::MockRenderContext;

fn desc(n: u32) -> VisibilityVolumeDesc {
    VisibilityVolumeDesc {
        id: "reconstruct".to_string(),
        width: n,
        height: n,
        ..Default::default()
    }
}

fn captured(desc: VisibilityVolumeDesc, depth: f32) -> VisibilityVolume {
    let mut ctx = MockRenderContext::with_depth_fill(depth);
    let mut volume = VisibilityVolume::new(desc).unwrap();
    volume.initialize(&mut ctx).unwrap();
    while volume.has_more_captures() {
        volume.capture_next(&mut ctx).unwrap();
    }
    volume
}

fn face_normal(mesh: &TriangleMesh, face: &[u32; 3]) -> (Vec3, Vec3) {
    let [a, b, c] = face.map(|i| mesh.vertices[i as usize]);
    ((b - a).cross(c - a), (a + b + c) / 3.0)
}

// ============================================================================
// End to end with synthetic captures
// ============================================================================

#[test]
fn test_all_miss_capture_gives_closed_sphere_at_radius() {
    let volume = captured(VisibilityVolumeDesc { radius_max: 10.0, ..desc(4) }, 0.0);
    let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();

    assert_eq!(mesh.vertex_count(), 96);
    for v in &mesh.vertices {
        assert!((v.length() - 10.0).abs() < 1e-3, "vertex at distance {}", v.length());
    }

    // 2·3·3·6 face quads + 24·3 seam triangles + 8 corners
    assert_eq!(mesh.face_count(), 108 + 72 + 8);
    let report = mesh.edge_report();
    assert!(report.is_closed(), "{:?}", report);
    assert!(report.is_consistently_oriented(), "{:?}", report);
}

#[test]
fn test_constant_depth_reconstructs_a_cube() {
    // depth 0.02 with near 0.1 puts every hit 5 units down its view axis
    let origin = Vec3::new(1.0, 2.0, 3.0);
    let volume = captured(VisibilityVolumeDesc { origin, ..desc(5) }, 0.02);
    let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();

    assert_eq!(mesh.vertex_count(), 150);
    for v in &mesh.vertices {
        let max = (*v - origin).abs().max_element();
        assert!((max - 5.0).abs() < 1e-3, "vertex {:?} off the cube", v);
    }
    assert!(mesh.edge_report().is_closed());
}

#[test]
fn test_outward_orientation_faces_away_from_eye() {
    let volume = captured(VisibilityVolumeDesc { radius_max: 10.0, ..desc(6) }, 0.0);
    let mesh = VolumeReconstructor::new(FaceOrientation::Outward).reconstruct(volume, None).unwrap();
    for face in &mesh.faces {
        let (normal, centroid) = face_normal(&mesh, face);
        assert!(normal.dot(centroid) > 0.0);
    }

    let volume = captured(VisibilityVolumeDesc { radius_max: 10.0, ..desc(6) }, 0.0);
    let mesh = VolumeReconstructor::new(FaceOrientation::Inward).reconstruct(volume, None).unwrap();
    for face in &mesh.faces {
        let (normal, centroid) = face_normal(&mesh, face);
        assert!(normal.dot(centroid) < 0.0);
    }
}

#[test]
fn test_unbounded_misses_use_default_radius() {
    let volume = captured(desc(2), 0.0);
    let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();
    for v in &mesh.vertices {
        assert!((v.length() / DEFAULT_MISS_RADIUS - 1.0).abs() < 1e-3);
    }
}

#[test]
fn test_nan_and_negative_depth_are_misses() {
    for depth in [f32::NAN, -0.5] {
        let volume = captured(VisibilityVolumeDesc { radius_max: 3.0, ..desc(3) }, depth);
        let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();
        assert!(mesh.vertices.iter().all(|v| (v.length() - 3.0).abs() < 1e-3));
    }
}

#[test]
fn test_huge_radius_limit_keeps_misses_on_their_rays() {
    let origin = Vec3::new(3.0, -2.0, 1.0);
    for radius_max in [1.0e8, f32::MAX] {
        let volume = captured(VisibilityVolumeDesc { origin, radius_max, ..desc(3) }, 0.0);
        let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();

        for v in &mesh.vertices {
            assert!(v.is_finite(), "vertex {:?} at limit {}", v, radius_max);
            assert_ne!(*v, origin);
            // Scale before measuring, |v|² would overflow at f32::MAX
            let unit = (*v - origin) / radius_max;
            assert!((unit.length() - 1.0).abs() < 1e-3, "vertex {:?} at limit {}", v, radius_max);
        }
        assert!(mesh.edge_report().is_closed());
    }
}

// ============================================================================
// Clamping
// ============================================================================

#[test]
fn test_radius_limit_is_centered_on_world_origin() {
    let world = CoordinateSystem::new("ground", Vec3::new(4.0, 0.0, 0.0), Vec3::Y, Vec3::X).unwrap();
    let volume = captured(VisibilityVolumeDesc { radius_max: 10.0, ..desc(4) }, 0.0);
    let mesh = VolumeReconstructor::default().reconstruct(volume, Some(&world)).unwrap();

    let from_world: Vec<f32> = mesh.vertices.iter().map(|v| (*v - world.origin).length()).collect();
    assert!(from_world.iter().all(|&d| d <= 10.0 + 1e-3));
    // Misses behind the world origin are pulled in onto its sphere
    assert!(from_world.iter().any(|&d| (d - 10.0).abs() < 1e-3));
    // Misses toward +x sit 10 from the eye, well inside the world sphere
    assert!(from_world.iter().any(|&d| d < 8.0));
    assert!(mesh.vertices.iter().any(|v| (v.length() - 10.0).abs() > 1.0));
}

#[test]
fn test_height_limits_relative_to_volume_origin() {
    let origin = Vec3::new(0.0, 100.0, 0.0);
    let volume = captured(
        VisibilityVolumeDesc { origin, radius_max: 10.0, up_min: -3.0, up_max: 2.0, ..desc(4) },
        0.0,
    );
    let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();

    let heights: Vec<f32> = mesh.vertices.iter().map(|v| v.y - origin.y).collect();
    assert!(heights.iter().all(|&h| h <= 2.0 + 1e-4 && h >= -3.0 - 1e-4));
    assert!(heights.iter().any(|&h| (h - 2.0).abs() < 1e-4));
    assert!(heights.iter().any(|&h| (h + 3.0).abs() < 1e-4));
}

#[test]
fn test_height_limits_relative_to_world_frame() {
    let world = CoordinateSystem::new("ground", Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Vec3::X).unwrap();
    let volume = captured(VisibilityVolumeDesc { radius_max: 10.0, up_max: 0.5, ..desc(4) }, 0.0);
    let mesh = VolumeReconstructor::default().reconstruct(volume, Some(&world)).unwrap();

    // Ground at y = -1, so nothing above y = -0.5
    assert!(mesh.vertices.iter().all(|v| v.y <= -0.5 + 1e-4));
    assert!(mesh.vertices.iter().any(|v| (v.y + 0.5).abs() < 1e-4));
    assert!(mesh.vertices.iter().any(|v| v.y < -9.0));
}

#[test]
fn test_radius_limit_caps_far_hits() {
    // Hits 50 units out, limit 20
    let volume = captured(VisibilityVolumeDesc { radius_max: 20.0, ..desc(3) }, 0.002);
    let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();
    assert!(mesh.vertices.iter().all(|v| (v.length() - 20.0).abs() < 1e-3));
}

// ============================================================================
// Layouts and failure cases
// ============================================================================

#[test]
fn test_legacy_ring_is_an_open_band() {
    let volume = captured(VisibilityVolumeDesc { layout: CaptureLayout::LegacyRing, radius_max: 10.0, ..desc(4) }, 0.0);
    let mesh = VolumeReconstructor::default().reconstruct(volume, None).unwrap();
    assert_eq!(mesh.vertex_count(), 64);
    assert_eq!(mesh.face_count(), 2 * 9 * 4 + 2 * 3 * 4);
    assert_eq!(mesh.edge_report().boundary_edges, 32);
}

#[test]
fn test_incomplete_volume_is_rejected() {
    let mut ctx = MockRenderContext::new();
    let mut volume = VisibilityVolume::new(desc(4)).unwrap();
    volume.initialize(&mut ctx).unwrap();
    volume.capture_next(&mut ctx).unwrap();

    let result = VolumeReconstructor::default().reconstruct(volume, None);
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

#[test]
fn test_replayed_buffers_match_live_capture() {
    let live = captured(VisibilityVolumeDesc { radius_max: 10.0, ..desc(3) }, 0.05);
    let buffers: Vec<DepthImage> = live.depth_buffers().to_vec();
    let replay = VisibilityVolume::with_depth_buffers(VisibilityVolumeDesc { radius_max: 10.0, ..desc(3) }, buffers).unwrap();

    let a = VolumeReconstructor::default().reconstruct(live, None).unwrap();
    let b = VolumeReconstructor::default().reconstruct(replay, None).unwrap();
    assert_eq!(a, b);
}
