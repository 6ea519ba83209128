use super::*;
use std::io::Write;

#[test]
fn test_cuboid_counts() {
    let cube = SceneMesh::cuboid("c", Vec3::ONE);
    assert_eq!(cube.positions.len(), 8);
    assert_eq!(cube.triangles.len(), 12);
    assert!(cube.triangles.iter().flatten().all(|&i| i < 8));
}

#[test]
fn test_world_triangle_applies_transform() {
    let quad = SceneMesh::quad("q", 1.0).with_transform(Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
    let tri = quad.world_triangle(0).unwrap();
    assert!(tri.iter().all(|p| (p.y - 2.0).abs() < 1e-6));
    assert!(quad.world_triangle(5).is_none());
}

#[test]
fn test_builtin_scene_contents() {
    let scene = builtin_scene();
    assert_eq!(scene.mesh_count(), 3);
    assert_eq!(scene.triangle_count(), 2 + 12 + 12);
    assert!(scene.find("floor").is_some());
}

#[test]
fn test_keys_stay_valid_after_removal() {
    let mut scene = SoftScene::new();
    let a = scene.add_mesh(SceneMesh::quad("a", 1.0));
    let b = scene.add_mesh(SceneMesh::quad("b", 1.0));

    assert!(scene.remove_mesh(a).is_some());
    assert!(scene.mesh(a).is_none());
    assert!(scene.remove_mesh(a).is_none());
    assert_eq!(scene.mesh(b).unwrap().name, "b");
    assert_eq!(scene.find("a"), None);
    assert_eq!(scene.find("b"), Some(b));
}

#[test]
fn test_ply_placement_is_skipped() {
    let mut scene = SoftScene::new();
    let placement = MeshPlacement { format: MeshFormat::Ply, ..MeshPlacement::new("scan", "scan.ply") };
    assert_eq!(scene.add_placement(&placement).unwrap(), None);
    assert!(scene.is_empty());
}

#[test]
fn test_obj_placement_is_loaded_with_transform() {
    let dir = std::env::temp_dir().join(format!("visvol_scene_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tri.obj");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
    drop(file);

    let placement = MeshPlacement { position: Vec3::new(0.0, 0.0, -5.0), ..MeshPlacement::new("tri", &path) };
    let scene = SoftScene::from_placements(&[placement]);
    let key = scene.find("tri").unwrap();
    let tri = scene.mesh(key).unwrap().world_triangle(0).unwrap();
    assert!((tri[1] - Vec3::new(1.0, 0.0, -5.0)).length() < 1e-6);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_is_skipped() {
    let scene = SoftScene::from_placements(&[MeshPlacement::new("ghost", "/nonexistent/ghost.obj")]);
    assert!(scene.is_empty());
}
