use draw3d_core::geom::Vec3;
use draw3d_core::model::{Geometry, Polygon, Primitive};
use draw3d_core::scene_file::{load_scene, read_scene, save_scene, write_scene};
use draw3d_core::transform::AxisRange;
use draw3d_core::{Scene, SceneError};
use std::io::Cursor;

fn two_view_scene() -> Scene {
    let mut scene = Scene::default();
    scene.set_camera(Vec3::new(-20.0, -150.0, -900.0));
    scene.draw(Primitive::vector(3.0, 4.0, 5.0));

    scene.advance_sequence();
    scene
        .set_range(AxisRange::new(5.0, 5.0, 5.0))
        .expect("valid range");
    scene.set_cumulate(true);
    scene.set_show_boundary(true);
    let square = Polygon::new(vec![
        Vec3::new(-1.5, -1.5, 0.0),
        Vec3::new(1.5, -1.5, 0.0),
        Vec3::new(1.5, 1.5, 0.25),
        Vec3::new(-1.5, 1.5, 0.25),
    ])
    .with_decorations(true, true, true);
    scene.draw(Primitive::polygon(square));
    scene.step_forward().expect("second view");
    scene
}

#[test]
fn written_scene_reads_back_equivalent() {
    let scene = two_view_scene();
    assert!(scene.views().iter().all(|v| v.visible));

    let file = tempfile::NamedTempFile::new().expect("temp file");
    save_scene(&scene, file.path()).expect("save scene");

    let mut restored = Scene::default();
    let report = load_scene(file.path(), &mut restored).expect("load scene");
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(2, report.groups);
    assert_eq!(2, report.primitives);

    assert_eq!(scene.views().len(), restored.views().len());
    for (written, read) in scene.views().iter().zip(restored.views()) {
        assert_eq!(written.snapshot, read.snapshot);
        assert_eq!(written.draw_list, read.draw_list);
    }
    match &restored.views()[1].draw_list[0].geometry {
        Geometry::Polygon(p) => {
            assert!(p.show_edges && p.show_vertices && p.show_labels);
            assert_eq!(4, p.vertices.len());
        }
        other => panic!("expected polygon, got {other:?}"),
    }
}

#[test]
fn only_visible_views_are_written() {
    let mut scene = two_view_scene();
    scene.jump_to_start(0).expect("view 0");
    let text = write_scene(&scene).expect("write");
    assert_eq!(1, text.lines().filter(|l| l.starts_with("DataGroup")).count());
    assert!(text.contains("Vector: 3, 4, 5"));
    assert!(!text.contains("Polygon"));
}

#[test]
fn bad_lines_are_reported_and_skipped() {
    let input = "\
// hand written
DataGroup: 0
View: true, true, false, false, true, true, false
Range: 8, 8, 8

Point: 1, 2, 3
Point: 1, nope, 3
Teapot: 1, 2, 3
Color: salmon
Sphere: 0, 0, 0, 1, 0, 0, 0, -
Line: 0; 0; 0; 1; 1; 1
";
    let mut scene = Scene::default();
    let report = read_scene(Cursor::new(input), &mut scene).expect("stream is fine");
    assert_eq!(2, report.warnings.len());
    assert!(report.warnings[0].message.starts_with("line 7:"));
    assert!(report.warnings[1].message.contains("unknown record `Teapot`"));
    assert_eq!(3, report.primitives);

    let view = &scene.views()[0];
    assert_eq!(8.0, view.snapshot.range.x);
    assert_eq!(3, view.draw_list.len());
    let salmon = draw3d_core::Color::parse_web("salmon").expect("named color");
    assert_eq!(Some(salmon), view.draw_list[1].style.material.map(|m| m.diffuse));
}

#[test]
fn entries_that_no_longer_build_survive_a_round_trip() {
    let mut scene = Scene::default();
    assert!(scene.draw(Primitive::plane(0.0, 0.0, 1.0, -8.0)));
    scene
        .set_range(AxisRange::new(5.0, 5.0, 5.0))
        .expect("valid range");
    assert_eq!(1, scene.views()[0].draw_list.len());
    assert!(scene.views()[0].shapes.is_empty());

    let text = write_scene(&scene).expect("write");
    let mut restored = Scene::default();
    let report = read_scene(Cursor::new(text), &mut restored).expect("read");
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(1, report.primitives);
    assert_eq!(scene.views()[0].draw_list, restored.views()[0].draw_list);
    assert!(matches!(
        restored.diagnostics(),
        [SceneError::DegeneratePlane { points: 0, .. }]
    ));
}

#[test]
fn non_positive_range_record_is_skipped() {
    let input = "\
DataGroup: 0
Range: 0, 4, 4
Point: 1, 1, 1
";
    let mut scene = Scene::default();
    let report = read_scene(Cursor::new(input), &mut scene).expect("read");
    assert_eq!(1, report.warnings.len());
    assert!(report.warnings[0].message.starts_with("line 2:"));
    assert_eq!(AxisRange::default(), scene.views()[0].snapshot.range);
    let translate = scene.views()[0].shapes[0].placement.translate;
    assert!(translate.x.is_finite());
}

#[test]
fn quoted_text_survives_delimiters() {
    let mut scene = Scene::default();
    scene.draw(Primitive::label(Vec3::new(1.0, 2.0, 3.0), "x: 1, y; 2"));
    let text = write_scene(&scene).expect("write");

    let mut restored = Scene::default();
    let report = read_scene(Cursor::new(text), &mut restored).expect("read");
    assert!(report.warnings.is_empty());
    assert_eq!(scene.views()[0].draw_list, restored.views()[0].draw_list);
}
