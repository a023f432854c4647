use approx::assert_relative_eq;
use projvis_core::{Frame, ProjectionConfig, ProjectionSystem, Vec3, WireframeModel};

fn tilted_system(c: Vec3) -> ProjectionSystem {
    ProjectionSystem::new(
        c,
        Vec3::new(2.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, -1.0),
        Vec3::new(-1.0, -3.0, 0.5),
    )
    .unwrap()
}

#[test]
fn triangle_file_with_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("triangle.txt");
    std::fs::write(&path, "3\n0 0 0\n1 0 0\n0 1 0\n1\n3 0 1 2\n").unwrap();

    let model = WireframeModel::load(&path).unwrap();
    let config = ProjectionConfig::load(dir.path().join("config.txt")).unwrap();
    let system = config.system().unwrap();

    let projected: Vec<Vec3> = model
        .vertices
        .iter()
        .map(|&v| system.project(v).expect("vertex should project"))
        .collect();

    // On the z = 0 plane every vertex is a fixed point
    for (p, v) in projected.iter().zip(&model.vertices) {
        assert_relative_eq!(p.x, v.x);
        assert_relative_eq!(p.y, v.y);
        assert_relative_eq!(p.z, 0.0);
    }
    for v in &model.vertices {
        assert_relative_eq!(system.project_homogeneous(*v).w, 5.0);
    }

    let frame = Frame::build(&system, &model, 800.0, 600.0);
    assert_eq!(frame.edges(&model).len(), 3);
    let screen = frame.screen_points();
    // Bounding box (0,0)-(1,1), scale 480, center (0.5, 0.5)
    assert_relative_eq!(screen[0].x, 160.0);
    assert_relative_eq!(screen[0].y, 60.0);
    assert_relative_eq!(screen[1].x, 640.0);
    assert_relative_eq!(screen[1].y, 60.0);
    assert_relative_eq!(screen[2].x, 160.0);
    assert_relative_eq!(screen[2].y, 540.0);
}

#[test]
fn normal_is_unit_for_tilted_plane() {
    let system = tilted_system(Vec3::new(4.0, 4.0, 9.0));
    assert_relative_eq!(system.normal().magnitude(), 1.0, epsilon = 1e-12);
    let n = system.normal();
    let [p1, p2, p3] = system.plane_points();
    assert_relative_eq!(n.dot(p1 - p2), 0.0, epsilon = 1e-12);
    assert_relative_eq!(n.dot(p3 - p2), 0.0, epsilon = 1e-12);
}

#[test]
fn plane_points_are_fixed_points() {
    let system = tilted_system(Vec3::new(4.0, 4.0, 9.0));
    assert!(!system.is_viewpoint_on_plane());
    for p in system.plane_points() {
        let w = system.project_homogeneous(p).w;
        assert!(w != 0.0);
        let image = system.project(p).unwrap();
        assert_relative_eq!(image.x, p.x, epsilon = 1e-9);
        assert_relative_eq!(image.y, p.y, epsilon = 1e-9);
        assert_relative_eq!(image.z, p.z, epsilon = 1e-9);
    }
}

#[test]
fn projected_points_lie_on_plane_and_line_of_sight() {
    let c = Vec3::new(4.0, 4.0, 9.0);
    let system = tilted_system(c);
    let n = system.normal();
    for v in WireframeModel::cube(3.0).vertices {
        let image = system.project(v).unwrap();
        assert_relative_eq!(n.dot(image), system.d1(), epsilon = 1e-9);
        // C, v and its image are collinear
        let collinearity = (v - c).cross(image - c).magnitude();
        assert_relative_eq!(collinearity, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn moving_viewpoint_keeps_plane_coefficients() {
    let near = tilted_system(Vec3::new(1.0, 1.0, 4.0));
    let far = near.with_viewpoint(Vec3::new(2.0, 2.0, 8.0)).unwrap();
    assert_eq!(near.normal(), far.normal());
    assert_eq!(near.raw_normal(), far.raw_normal());
    assert_eq!(near.d1(), far.d1());
    for p in near.plane_points() {
        assert!(far.project(p).is_some());
    }
}

#[test]
fn cube_from_default_view_projects_fully() {
    let system = ProjectionConfig::default().system().unwrap();
    let model = WireframeModel::cube(2.0);
    let frame = Frame::build(&system, &model, 80.0, 48.0);
    assert_eq!(frame.skipped_count(), 0);
    assert_eq!(frame.edges(&model).len(), model.edge_count());
    for p in frame.screen_points() {
        assert!(p.x >= 0.0 && p.x <= 80.0);
        assert!(p.y >= 0.0 && p.y <= 48.0);
    }
}

#[test]
fn bundled_models_load() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../models");

    let cube = WireframeModel::load(dir.join("cube.txt")).unwrap();
    assert_eq!(cube, WireframeModel::cube(2.0));

    let pyramid = WireframeModel::load(dir.join("pyramid.txt")).unwrap();
    assert_eq!(pyramid.vertices.len(), 5);
    assert_eq!(pyramid.edge_count(), 16);

    let config = ProjectionConfig::load(dir.join("config.txt")).unwrap();
    assert_eq!(config.c, Vec3::new(2.0, 1.5, 6.0));
    let system = config.system().unwrap();
    let frame = Frame::build(&system, &pyramid, 80.0, 48.0);
    assert_eq!(frame.skipped_count(), 0);
    assert_eq!(frame.edges(&pyramid).len(), 16);
}
