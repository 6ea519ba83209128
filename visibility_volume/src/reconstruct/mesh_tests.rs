use glam::Vec3;
use super::*;
use crate::error::Error;

fn tetrahedron(orientation: FaceOrientation) -> TriangleMesh {
    let mut acc = MeshAccumulator::new(orientation);
    for p in [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z] {
        acc.push_vertex(p);
    }
    acc.push_triangle(0, 2, 1).unwrap();
    acc.push_triangle(0, 1, 3).unwrap();
    acc.push_triangle(0, 3, 2).unwrap();
    acc.push_triangle(1, 2, 3).unwrap();
    acc.into_mesh()
}

#[test]
fn test_push_vertex_returns_append_index() {
    let mut acc = MeshAccumulator::default();
    assert_eq!(acc.push_vertex(Vec3::ZERO), 0);
    assert_eq!(acc.push_vertex(Vec3::X), 1);
    assert_eq!(acc.vertex_count(), 2);
}

#[test]
fn test_triangle_must_reference_existing_vertices() {
    let mut acc = MeshAccumulator::default();
    acc.push_vertex(Vec3::ZERO);
    acc.push_vertex(Vec3::X);
    assert!(matches!(acc.push_triangle(0, 1, 2), Err(Error::InvalidState(_))));
    assert_eq!(acc.face_count(), 0);
}

#[test]
fn test_orientation_controls_winding() {
    let mut outward = MeshAccumulator::new(FaceOrientation::Outward);
    let mut inward = MeshAccumulator::new(FaceOrientation::Inward);
    for acc in [&mut outward, &mut inward] {
        acc.push_vertex(Vec3::ZERO);
        acc.push_vertex(Vec3::X);
        acc.push_vertex(Vec3::Y);
        acc.push_triangle(0, 1, 2).unwrap();
    }
    assert_eq!(outward.into_mesh().faces, vec![[0, 2, 1]]);
    assert_eq!(inward.into_mesh().faces, vec![[0, 1, 2]]);
}

#[test]
fn test_quad_shares_diagonal() {
    let mut acc = MeshAccumulator::new(FaceOrientation::Inward);
    for _ in 0..4 {
        acc.push_vertex(Vec3::ZERO);
    }
    acc.push_quad(0, 1, 2, 3).unwrap();
    let report = acc.into_mesh().edge_report();
    assert_eq!(report.edges, 5);
    assert_eq!(report.boundary_edges, 4);
    assert!(report.is_consistently_oriented());
}

#[test]
fn test_tetrahedron_is_closed() {
    for orientation in [FaceOrientation::Outward, FaceOrientation::Inward] {
        let report = tetrahedron(orientation).edge_report();
        assert_eq!(report.edges, 6);
        assert!(report.is_closed());
        assert!(report.is_consistently_oriented());
    }
}

#[test]
fn test_open_and_flipped_meshes_are_reported() {
    let mut mesh = tetrahedron(FaceOrientation::Inward);
    mesh.faces.pop();
    assert_eq!(mesh.edge_report().boundary_edges, 3);
    assert!(!mesh.edge_report().is_closed());

    let mut flipped = tetrahedron(FaceOrientation::Inward);
    flipped.faces[0] = [0, 1, 2];
    assert!(flipped.edge_report().is_closed());
    assert_eq!(flipped.edge_report().flipped_edges, 3);
}

#[test]
fn test_empty_mesh_is_not_closed() {
    assert!(!TriangleMesh::default().edge_report().is_closed());
}
