use draw3d_core::builder::{build, SegmentFrame};
use draw3d_core::context::DrawingContext;
use draw3d_core::geom::Vec3;
use draw3d_core::model::{Color, Drone, Geometry, Material, Polygon, Primitive, Rotation};
use draw3d_core::shape::{AxisRotation, ShapeKind};
use draw3d_core::transform::{Axis, AxisRange, AxisUp};
use draw3d_core::{DrawConfig, Scene, SceneError};

const EPS: f64 = 1e-9;

fn context(up: AxisUp) -> DrawingContext {
    let mut ctx = DrawingContext::new(DrawConfig::default());
    ctx.transform.range = AxisRange::new(10.0, 10.0, 10.0);
    ctx.transform.up = up;
    ctx
}

#[test]
fn arrow_shaft_is_shortened_by_a_third_of_the_cap() {
    for up in [AxisUp::Y, AxisUp::Z] {
        let ctx = context(up);
        let mut arrow = Primitive::arrow(Vec3::new(0.0, 0.0, 6.0), Vec3::new(6.0, 0.0, 6.0));
        ctx.resolve(&mut arrow);
        let shapes = build(&arrow, &ctx).expect("arrow builds");
        assert_eq!(2, shapes.len());

        let full = 6.0 * 500.0 / 20.0;
        let cap_height = ctx.config.arrow_cap_height;
        match &shapes[0].kind {
            ShapeKind::Cylinder { height, radius, .. } => {
                assert!((full - height - cap_height / 3.0).abs() < EPS);
                assert_eq!(ctx.config.arrow_radius, *radius);
            }
            other => panic!("expected shaft cylinder, got {other:?}"),
        }
        match &shapes[1].kind {
            ShapeKind::Cone { height, radius, .. } => {
                assert_eq!(cap_height, *height);
                assert_eq!(ctx.config.arrow_cap_radius, *radius);
            }
            other => panic!("expected cap cone, got {other:?}"),
        }

        let rotations = &shapes[0].placement.rotations;
        assert_eq!(2, rotations.len());
        assert_eq!(Axis::Y, rotations[0].axis);
        assert!(rotations[0].degrees.abs() < EPS);
        assert_eq!(Axis::Z, rotations[1].axis);
        assert!((rotations[1].degrees - 90.0).abs() < EPS);
    }
}

#[test]
fn segment_frame_matches_line_geometry() {
    let frame = SegmentFrame::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0));
    assert!((frame.length - 4.0).abs() < EPS);
    assert_eq!(Vec3::new(0.0, 0.0, 2.0), frame.midpoint);
    assert!((frame.theta - std::f64::consts::FRAC_PI_2).abs() < EPS);
    assert!((frame.phi - std::f64::consts::FRAC_PI_2).abs() < EPS);
}

#[test]
fn z_up_swaps_translation_and_rotation_components() {
    let ctx = context(AxisUp::Z);
    let boxed = Primitive::cuboid(
        Vec3::new(1.0, 2.0, 3.0),
        1.0,
        1.0,
        1.0,
        Rotation::new(10.0, 20.0, 30.0),
    );
    let shapes = build(&boxed, &ctx).expect("box builds");
    let placement = &shapes[0].placement;
    assert_eq!(Vec3::new(25.0, 75.0, 50.0), placement.translate);
    assert_eq!(
        vec![
            AxisRotation { axis: Axis::X, degrees: 10.0 },
            AxisRotation { axis: Axis::Y, degrees: 30.0 },
            AxisRotation { axis: Axis::Z, degrees: 20.0 },
        ],
        placement.rotations
    );

    let ctx = context(AxisUp::Y);
    let shapes = build(&boxed, &ctx).expect("box builds");
    assert_eq!(Vec3::new(25.0, 50.0, 75.0), shapes[0].placement.translate);
    assert_eq!(20.0, shapes[0].placement.rotations[1].degrees);
}

#[test]
fn labels_follow_the_same_axis_swap() {
    let ctx = context(AxisUp::Z);
    let mut label = Primitive::label(Vec3::new(0.0, 4.0, 2.0), "P");
    if let Geometry::Label(l) = &mut label.geometry {
        l.rotation = Rotation::new(180.0, 5.0, 0.0);
    }
    ctx.resolve(&mut label);
    let shapes = build(&label, &ctx).expect("label builds");
    assert_eq!(Vec3::new(0.0, 50.0, 100.0), shapes[0].placement.translate);
    assert_eq!(0.0, shapes[0].placement.rotations[1].degrees);
    assert_eq!(5.0, shapes[0].placement.rotations[2].degrees);
    assert_eq!(ctx.defaults.material.diffuse, shapes[0].material.diffuse);
}

#[test]
fn unset_style_binds_to_defaults_at_draw_time() {
    let mut scene = Scene::default();
    let red = Material::new(Color::RED);
    let blue = Material::new(Color::BLUE);

    let sphere = Primitive::sphere(Vec3::new(1.0, 1.0, 1.0), 0.5);
    scene.defaults_mut().material = red;
    assert!(scene.draw(sphere.clone()));
    scene.defaults_mut().material = blue;
    assert!(scene.draw(sphere));

    let view = &scene.views()[0];
    assert_eq!(Some(red), view.draw_list[0].style.material);
    assert_eq!(Some(blue), view.draw_list[1].style.material);

    // Replaying keeps the materials bound at first draw.
    scene.redraw();
    let view = &scene.views()[0];
    assert_eq!(red, view.shapes[0].material);
    assert_eq!(blue, view.shapes[1].material);
}

#[test]
fn polygon_decorations_are_drawn_but_not_logged() {
    let mut scene = Scene::default();
    let square = Polygon::new(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
    ])
    .with_decorations(true, true, true);
    assert!(scene.draw(Primitive::polygon(square)));

    let view = &scene.views()[0];
    assert_eq!(1, view.draw_list.len());
    // Mesh plus a sphere, a label and an edge per vertex.
    assert_eq!(13, view.shapes.len());
    let labels: Vec<&str> = view
        .shapes
        .iter()
        .filter_map(|s| match &s.kind {
            ShapeKind::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(vec!["v0", "v1", "v2", "v3"], labels);
    match &view.shapes[0].kind {
        ShapeKind::Mesh { faces, .. } => assert_eq!(2, faces.len()),
        other => panic!("expected mesh, got {other:?}"),
    }
}

#[test]
fn plane_outside_view_space_is_skipped_and_reported() {
    let mut scene = Scene::default();
    assert!(!scene.draw(Primitive::plane(0.0, 0.0, 1.0, -50.0)));
    assert!(scene.views()[0].draw_list.is_empty());
    assert!(matches!(
        scene.diagnostics(),
        [SceneError::DegeneratePlane { points: 0, .. }]
    ));

    assert!(scene.draw(Primitive::plane(1.0, 1.0, 1.0, 0.0)));
    match &scene.views()[0].shapes[0].kind {
        ShapeKind::Mesh { points, faces } => {
            assert_eq!(6, points.len());
            assert_eq!(4, faces.len());
        }
        other => panic!("expected mesh, got {other:?}"),
    }
}

#[test]
fn out_of_range_coordinates_are_flagged_but_drawn() {
    let mut scene = Scene::default();
    assert!(scene.draw(Primitive::point(15.0, 0.0, 0.0)));
    assert_eq!(1, scene.views()[0].draw_list.len());
    assert!(matches!(
        scene.diagnostics(),
        [SceneError::OutOfRangeCoordinate { primitive: "Point", .. }]
    ));
}

#[test]
fn polygon_with_one_vertex_is_rejected() {
    let mut scene = Scene::default();
    assert!(!scene.draw(Primitive::polygon(Polygon::new(vec![Vec3::ZERO]))));
    assert!(matches!(
        scene.diagnostics(),
        [SceneError::InvalidPolygon { vertices: 1 }]
    ));
}

#[test]
fn drone_replaces_the_draw_list_of_its_view() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(1.0, 1.0, 1.0));
    let drone = |z: f64| {
        Primitive::new(Geometry::Drone(Drone {
            id: 0,
            at: Vec3::new(-5.0, 5.0, z),
            radius: 48.0,
            height: 8.0,
            rotation: Rotation::NONE,
            rotor_material: Some(Material::new(Color::BLACK)),
        }))
    };
    assert!(scene.draw(drone(-10.0)));
    assert!(scene.draw(drone(-9.0)));
    let view = &scene.views()[0];
    assert_eq!(1, view.draw_list.len());
    match view.shapes.last().map(|s| &s.kind) {
        Some(ShapeKind::Group(parts)) => assert_eq!(7, parts.len()),
        other => panic!("expected drone group, got {other:?}"),
    }
}
