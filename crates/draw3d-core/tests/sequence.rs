use draw3d_core::geom::Vec3;
use draw3d_core::model::Primitive;
use draw3d_core::transform::{AxisRange, AxisUp};
use draw3d_core::view::ViewState;
use draw3d_core::{DrawConfig, Scene, SceneError};

fn four_views() -> Scene {
    let mut scene = Scene::default();
    scene.draw(Primitive::vector(1.0, 2.0, 3.0));
    for i in 1..4 {
        scene.advance_sequence();
        let f = i as f64;
        scene.set_camera(Vec3::new(-10.0 * f, -200.0 + f, -1000.0));
        scene.set_origin(Vec3::new(f, -f, 0.0));
        scene
            .set_range(AxisRange::new(10.0 + f, 10.0, 10.0 - f))
            .expect("valid range");
        scene.set_axis_up(if i % 2 == 0 { AxisUp::Z } else { AxisUp::Y });
        scene.draw(Primitive::point(f, 0.0, 0.0));
    }
    scene.jump_to_start(0).expect("view 0 exists");
    scene
}

#[test]
fn stepping_forward_then_back_restores_the_first_view() {
    let mut scene = four_views();
    let start = scene.snapshot();
    assert_eq!(scene.views()[0].snapshot, start);

    for k in 1..4 {
        assert_eq!(k, scene.step_forward().expect("next view"));
        assert_eq!(scene.views()[k].snapshot, scene.snapshot());
    }
    for _ in 0..3 {
        scene.step_backward().expect("previous view");
    }
    assert_eq!(0, scene.current_index());
    assert_eq!(start, scene.snapshot());
}

#[test]
fn stepping_past_either_end_is_reported_without_change() {
    let mut scene = four_views();
    let before = scene.snapshot();
    assert!(matches!(
        scene.step_backward(),
        Err(SceneError::SequenceBoundary { index: 0 })
    ));
    assert_eq!(before, scene.snapshot());

    scene.jump_to_start(3).expect("view 3 exists");
    assert!(matches!(
        scene.step_forward(),
        Err(SceneError::SequenceBoundary { index: 3 })
    ));
    assert_eq!(3, scene.current_index());
    assert!(scene.jump_to_start(9).is_err());
}

#[test]
fn only_one_view_is_visible_without_cumulate() {
    let mut scene = four_views();
    scene.step_forward().expect("next view");
    scene.step_forward().expect("next view");
    let visible: Vec<usize> = scene
        .views()
        .iter()
        .filter(|v| v.visible)
        .map(|v| v.index)
        .collect();
    assert_eq!(vec![2], visible);
    assert_eq!(ViewState::Active, scene.views()[2].state(2));
    assert_eq!(ViewState::Superseded, scene.views()[0].state(2));
    assert_eq!(ViewState::Inactive, scene.views()[3].state(2));
}

#[test]
fn cumulate_keeps_earlier_views_visible() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(1.0, 0.0, 0.0));
    scene.advance_sequence();
    scene.set_cumulate(true);
    scene.draw(Primitive::point(2.0, 0.0, 0.0));
    scene.advance_sequence();
    scene.draw(Primitive::point(3.0, 0.0, 0.0));
    scene.jump_to_start(0).expect("view 0");

    scene.step_forward().expect("view 1");
    scene.step_forward().expect("view 2");
    assert!(scene.views().iter().all(|v| v.visible));

    scene.step_backward().expect("view 1");
    let visible: Vec<bool> = scene.views().iter().map(|v| v.visible).collect();
    assert_eq!(vec![true, true, false], visible);
}

#[test]
fn manual_cumulate_overrides_view_settings() {
    let mut scene = four_views();
    assert!(scene.toggle_manual_cumulate());
    scene.step_forward().expect("view 1");
    scene.step_forward().expect("view 2");
    assert_eq!(3, scene.views().iter().filter(|v| v.visible).count());
    assert!(!scene.toggle_manual_cumulate());
}

#[test]
fn new_views_start_inactive_and_hidden() {
    let mut scene = Scene::default();
    let index = scene.advance_sequence();
    assert_eq!(1, index);
    assert_eq!(1, scene.building_index());
    assert_eq!(0, scene.current_index());
    let view = &scene.views()[1];
    assert!(!view.visible);
    assert!(view.draw_list.is_empty());
    assert_eq!(ViewState::Inactive, view.state(0));
    assert_eq!(scene.views()[0].snapshot, view.snapshot);
}

#[test]
fn redraw_reproduces_the_same_shapes() {
    let mut scene = Scene::default();
    scene.draw(Primitive::arrow(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-3.0, 4.0, 2.0)));
    scene.draw(Primitive::plane(0.0, 1.0, 0.0, -2.0));
    scene.draw(Primitive::label(Vec3::new(2.0, 2.0, 2.0), "A"));
    let before = scene.views()[0].shapes.clone();
    scene.redraw();
    scene.redraw();
    assert_eq!(before, scene.views()[0].shapes);
    assert_eq!(3, scene.views()[0].draw_list.len());
}

#[test]
fn nudging_the_origin_moves_shapes_but_not_the_snapshot() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(0.0, 0.0, 0.0));
    let saved = scene.views()[0].snapshot;
    scene.nudge_origin(1, -1);
    assert_eq!(
        Vec3::new(10.0, -10.0, 0.0),
        scene.views()[0].shapes[0].placement.translate
    );
    assert_eq!(saved, scene.views()[0].snapshot);

    scene.reload_current();
    assert_eq!(Vec3::ZERO, scene.views()[0].shapes[0].placement.translate);
}

#[test]
fn reset_returns_to_a_single_default_view() {
    let mut scene = four_views();
    scene.defaults_mut().point_size = 9.0;
    scene.step_forward().expect("view 1");
    scene.reset_all();
    assert_eq!(1, scene.views().len());
    assert_eq!(0, scene.current_index());
    assert!(scene.views()[0].draw_list.is_empty());
    assert!(scene.views()[0].visible);
    assert_eq!(DrawConfig::default().point_size, scene.defaults().point_size);
    assert_eq!(DrawConfig::default().camera, scene.snapshot().camera);
}

#[test]
fn clear_and_advance_wipes_rendered_contents_only() {
    let mut scene = four_views();
    scene.clear_and_advance().expect("view 1");
    assert_eq!(1, scene.current_index());
    assert!(scene.views()[0].shapes.is_empty());
    assert_eq!(1, scene.views()[0].draw_list.len());
}

#[test]
fn cleared_views_stay_hidden_under_a_cumulating_next_view() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(1.0, 0.0, 0.0));
    scene.advance_sequence();
    scene.set_cumulate(true);
    scene.draw(Primitive::point(2.0, 0.0, 0.0));
    scene.jump_to_start(0).expect("view 0");

    assert_eq!(1, scene.clear_and_advance().expect("view 1"));
    assert!(!scene.views()[0].visible);
    assert!(scene.views()[0].shapes.is_empty());
    assert!(scene.views()[1].visible);
    assert_eq!(1, scene.views()[1].shapes.len());
}

#[test]
fn clear_and_advance_at_the_last_view_changes_nothing() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(1.0, 0.0, 0.0));
    assert!(matches!(
        scene.clear_and_advance(),
        Err(SceneError::SequenceBoundary { index: 0 })
    ));
    assert_eq!(1, scene.views()[0].shapes.len());
}

#[test]
fn changing_range_or_axis_up_replaces_drawn_shapes() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(4.0, 1.0, 3.0));
    let before = scene.views()[0].shapes[0].placement.translate;

    scene
        .set_range(AxisRange::new(5.0, 5.0, 5.0))
        .expect("valid range");
    let after = scene.views()[0].shapes[0].placement.translate;
    assert_ne!(before, after);
    assert_eq!(
        scene.context().transform.to_screen(Vec3::new(4.0, 1.0, 3.0)),
        after
    );

    scene.set_axis_up(AxisUp::Y);
    assert_eq!(
        scene.context().transform.to_screen(Vec3::new(4.0, 1.0, 3.0)),
        scene.views()[0].shapes[0].placement.translate
    );
    assert_eq!(1, scene.views()[0].shapes.len());
}

#[test]
fn setting_origin_moves_drawn_shapes() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(0.0, 0.0, 0.0));
    scene.set_origin(Vec3::new(30.0, -5.0, 0.0));
    assert_eq!(
        Vec3::new(30.0, -5.0, 0.0),
        scene.views()[0].shapes[0].placement.translate
    );
}

#[test]
fn degenerate_ranges_are_refused() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(0.0, 0.0, 0.0));
    let before = scene.snapshot();
    for bad in [
        AxisRange::new(0.0, 0.0, 0.0),
        AxisRange::new(5.0, -1.0, 5.0),
        AxisRange::new(5.0, 5.0, f64::NAN),
    ] {
        assert!(matches!(
            scene.set_range(bad),
            Err(SceneError::InvalidRange { .. })
        ));
    }
    assert_eq!(before, scene.snapshot());
    let translate = scene.views()[0].shapes[0].placement.translate;
    assert!(translate.x.is_finite() && translate.y.is_finite() && translate.z.is_finite());
}

#[test]
fn replay_does_not_repeat_diagnostics() {
    let mut scene = Scene::default();
    scene.draw(Primitive::point(15.0, 0.0, 0.0));
    assert_eq!(1, scene.diagnostics().len());
    scene.redraw();
    scene.reload_current();
    scene.nudge_origin(1, 0);
    assert_eq!(1, scene.diagnostics().len());
}

#[test]
fn axis_and_tick_visibility_are_linked() {
    let mut scene = Scene::default();
    let with_ticks = scene.guides().len();
    scene.set_show_axes(false);
    assert!(!scene.settings().show_ticks);
    assert!(scene.guides().is_empty());
    scene.set_show_ticks(true);
    assert!(scene.settings().show_axes);
    assert_eq!(with_ticks, scene.guides().len());
}
