use crate::builder;
use crate::config::{DisplaySettings, DrawConfig};
use crate::context::{Defaults, DrawingContext};
use crate::error::SceneError;
use crate::geom::{self, Vec3};
use crate::guides;
use crate::model::{Geometry, Primitive};
use crate::shape::Shape;
use crate::transform::{AxisRange, AxisUp};
use crate::view::{View, ViewSnapshot};
use itertools::Itertools;
use tracing::{debug, warn};

/// The ordered view sequence plus the live drawing state.
///
/// Draw calls go to the *building* view; navigation moves the *current*
/// view. Both start at 0 and usually coincide while a scene is constructed.
#[derive(Debug)]
pub struct Scene {
    ctx: DrawingContext,
    camera: Vec3,
    settings: DisplaySettings,
    views: Vec<View>,
    current: usize,
    building: usize,
    manual_cumulate: bool,
    guides: Vec<Shape>,
    diagnostics: Vec<SceneError>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DrawConfig::default())
    }
}

impl Scene {
    pub fn new(config: DrawConfig) -> Self {
        let snapshot = ViewSnapshot::from_config(&config);
        let mut first = View::new(0, snapshot);
        first.show();
        let mut scene = Self {
            ctx: DrawingContext::new(config),
            camera: snapshot.camera,
            settings: snapshot.settings,
            views: vec![first],
            current: 0,
            building: 0,
            manual_cumulate: false,
            guides: Vec::new(),
            diagnostics: Vec::new(),
        };
        scene.rebuild_guides();
        scene
    }

    pub fn config(&self) -> &DrawConfig {
        &self.ctx.config
    }

    pub fn context(&self) -> &DrawingContext {
        &self.ctx
    }

    pub fn defaults(&self) -> &Defaults {
        &self.ctx.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut Defaults {
        &mut self.ctx.defaults
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn view(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn building_index(&self) -> usize {
        self.building
    }

    pub fn guides(&self) -> &[Shape] {
        &self.guides
    }

    pub fn manual_cumulate(&self) -> bool {
        self.manual_cumulate
    }

    pub fn diagnostics(&self) -> &[SceneError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<SceneError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Live camera, origin, range and settings.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            camera: self.camera,
            origin: self.ctx.transform.origin,
            range: self.ctx.transform.range,
            settings: self.settings,
        }
    }

    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    // Setters update the live state and the building view's snapshot.

    pub fn set_camera(&mut self, camera: Vec3) {
        self.camera = camera;
        self.save_snapshot();
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.ctx.transform.origin = origin;
        self.save_snapshot();
        self.refresh_building();
    }

    /// Refuses ranges with a zero, negative or non-finite half-extent.
    pub fn set_range(&mut self, range: AxisRange) -> Result<(), SceneError> {
        if !range.is_valid() {
            let err = SceneError::InvalidRange {
                x: range.x,
                y: range.y,
                z: range.z,
            };
            warn!("{err}");
            return Err(err);
        }
        self.ctx.transform.range = range;
        self.save_snapshot();
        self.rebuild_guides();
        self.refresh_building();
        Ok(())
    }

    pub fn set_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings;
        self.ctx.transform.up = settings.axis_up;
        self.save_snapshot();
        self.rebuild_guides();
        self.refresh_building();
    }

    pub fn set_axis_up(&mut self, up: AxisUp) {
        self.set_settings(DisplaySettings {
            axis_up: up,
            ..self.settings
        });
    }

    /// Hiding the axes hides the ticks as well.
    pub fn set_show_axes(&mut self, show: bool) {
        self.set_settings(DisplaySettings {
            show_axes: show,
            show_ticks: self.settings.show_ticks && show,
            ..self.settings
        });
    }

    /// Ticks need axes, so showing ticks turns the axes on.
    pub fn set_show_ticks(&mut self, show: bool) {
        self.set_settings(DisplaySettings {
            show_ticks: show,
            show_axes: self.settings.show_axes || show,
            ..self.settings
        });
    }

    pub fn set_show_boundary(&mut self, show: bool) {
        self.set_settings(DisplaySettings {
            show_boundary: show,
            ..self.settings
        });
    }

    pub fn set_ambient_light(&mut self, on: bool) {
        self.set_settings(DisplaySettings {
            ambient_light: on,
            ..self.settings
        });
    }

    pub fn set_point_light(&mut self, on: bool) {
        self.set_settings(DisplaySettings {
            point_light: on,
            ..self.settings
        });
    }

    pub fn set_cumulate(&mut self, on: bool) {
        self.set_settings(DisplaySettings {
            cumulate: on,
            ..self.settings
        });
    }

    fn save_snapshot(&mut self) {
        let snapshot = self.snapshot();
        if let Some(view) = self.views.get_mut(self.building) {
            view.snapshot = snapshot;
        }
    }

    /// Replays the visible views when the building view is on screen.
    fn refresh_building(&mut self) {
        if self.views.get(self.building).is_some_and(|v| v.visible) {
            self.redraw();
        }
    }

    fn apply_snapshot(&mut self, snapshot: ViewSnapshot) {
        self.camera = snapshot.camera;
        self.ctx.transform.origin = snapshot.origin;
        self.ctx.transform.range = snapshot.range;
        self.ctx.transform.up = snapshot.settings.axis_up;
        self.settings = snapshot.settings;
    }

    fn report(&mut self, err: SceneError) {
        warn!("{err}");
        self.diagnostics.push(err);
    }

    /// Draws into the building view and logs the primitive. Returns `false`
    /// when the primitive could not be built.
    pub fn draw(&mut self, primitive: Primitive) -> bool {
        self.draw_into(self.building, primitive, false)
    }

    /// Like [`Scene::draw`], but the primitive is logged even when it does
    /// not build under the live range. Saved scenes restore through this.
    pub fn restore(&mut self, primitive: Primitive) -> bool {
        self.draw_into(self.building, primitive, true)
    }

    pub fn draw_all(&mut self, primitives: impl IntoIterator<Item = Primitive>) -> usize {
        primitives
            .into_iter()
            .map(|p| self.draw(p))
            .filter(|drawn| *drawn)
            .count()
    }

    /// Draws into a specific view, e.g. the overlay view of a drone.
    pub fn draw_to_view(&mut self, index: usize, primitive: Primitive) -> Result<bool, SceneError> {
        if index >= self.views.len() {
            return Err(SceneError::NoSuchView {
                index,
                count: self.views.len(),
            });
        }
        Ok(self.draw_into(index, primitive, false))
    }

    fn draw_into(&mut self, index: usize, mut primitive: Primitive, keep_unbuilt: bool) -> bool {
        if index >= self.views.len() {
            return false;
        }
        self.ctx.resolve(&mut primitive);
        let keyword = primitive.geometry.keyword();
        for point in primitive.geometry.anchor_points() {
            if self.ctx.transform.out_of_range(point) {
                self.report(SceneError::OutOfRangeCoordinate {
                    primitive: keyword,
                    point,
                });
            }
        }
        let drawn = match builder::build(&primitive, &self.ctx) {
            Ok(shapes) => {
                self.views[index].shapes.extend(shapes);
                true
            }
            Err(err) => {
                self.report(err);
                false
            }
        };
        if !drawn && !keep_unbuilt {
            return false;
        }
        let view = &mut self.views[index];
        // A drone's latest position is the whole logical state of its view.
        if matches!(primitive.geometry, Geometry::Drone(_)) {
            view.draw_list = vec![primitive];
        } else {
            view.draw_list.push(primitive);
        }
        drawn
    }

    /// Samples the curve and logs one line per consecutive pair of samples.
    pub fn draw_bezier(&mut self, control: &[Vec3]) -> usize {
        let samples = geom::bezier(control, self.ctx.config.bezier_samples);
        samples
            .into_iter()
            .tuple_windows()
            .map(|(a, b)| self.draw(Primitive::line(a, b)))
            .filter(|drawn| *drawn)
            .count()
    }

    /// Draws the part of the line `point + t * direction` inside the axis range.
    pub fn draw_line_through(&mut self, point: Vec3, direction: Vec3) -> bool {
        let bounds = self.ctx.transform.range.bounds();
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        let axes = [
            (point.x, direction.x, bounds.min.x, bounds.max.x),
            (point.y, direction.y, bounds.min.y, bounds.max.y),
            (point.z, direction.z, bounds.min.z, bounds.max.z),
        ];
        for (p, d, lo, hi) in axes {
            if d.abs() <= f64::EPSILON {
                if p < lo || p > hi {
                    t_max = f64::NEG_INFINITY;
                }
                continue;
            }
            let (a, b) = ((lo - p) / d, (hi - p) / d);
            t_min = t_min.max(a.min(b));
            t_max = t_max.min(a.max(b));
        }
        if !(t_min.is_finite() && t_max.is_finite()) || t_min >= t_max {
            self.report(SceneError::OutOfRangeCoordinate {
                primitive: "Line",
                point,
            });
            return false;
        }
        self.draw(Primitive::line(
            point + direction * t_min,
            point + direction * t_max,
        ))
    }

    /// Wipes the rendered contents of a view, keeping its draw list.
    pub fn clear_rendered(&mut self, index: usize) {
        if let Some(view) = self.views.get_mut(index) {
            view.shapes.clear();
        }
    }

    /// Appends a view seeded with the live settings; later draw calls go there.
    pub fn advance_sequence(&mut self) -> usize {
        let index = self.views.len();
        self.views.push(View::new(index, self.snapshot()));
        self.building = index;
        debug!(index, "advanced sequence");
        index
    }

    /// Inserts a visible view right after the current one and makes it
    /// current. Cumulate is switched on so the views below stay visible.
    pub fn open_overlay_view(&mut self) -> usize {
        self.set_cumulate(true);
        let at = self.current + 1;
        self.views.insert(at, View::new(at, self.snapshot()));
        for (i, view) in self.views.iter_mut().enumerate() {
            view.index = i;
        }
        if self.building >= at {
            self.building += 1;
        }
        self.current = at;
        self.views[at].show();
        at
    }

    /// Hides every view and makes the building view the current one.
    pub fn focus_building(&mut self) {
        self.hide_all();
        self.current = self.building;
        self.views[self.building].show();
    }

    fn hide_all(&mut self) {
        for view in &mut self.views {
            view.visible = false;
        }
    }

    fn activate(&mut self, index: usize) {
        let snapshot = self.views[index].snapshot;
        self.apply_snapshot(snapshot);
        self.current = index;
        self.views[index].show();
        self.rebuild_guides();
        self.redraw();
    }

    pub fn step_forward(&mut self) -> Result<usize, SceneError> {
        if self.current + 1 >= self.views.len() {
            warn!(index = self.current, "already at the last view");
            return Err(SceneError::SequenceBoundary {
                index: self.current,
            });
        }
        let next = self.current + 1;
        let cumulate = self.views[next].snapshot.settings.cumulate;
        if !self.manual_cumulate && !cumulate {
            self.hide_all();
        }
        self.activate(next);
        Ok(next)
    }

    pub fn step_backward(&mut self) -> Result<usize, SceneError> {
        if self.current == 0 {
            warn!("already at the first view");
            return Err(SceneError::SequenceBoundary { index: 0 });
        }
        for view in &mut self.views[self.current..] {
            view.visible = false;
        }
        self.activate(self.current - 1);
        Ok(self.current)
    }

    pub fn jump_to_start(&mut self, index: usize) -> Result<(), SceneError> {
        if index >= self.views.len() {
            return Err(SceneError::NoSuchView {
                index,
                count: self.views.len(),
            });
        }
        self.hide_all();
        self.activate(index);
        Ok(())
    }

    /// Hides and wipes every view up to the current one, then steps forward.
    pub fn clear_and_advance(&mut self) -> Result<usize, SceneError> {
        if self.current + 1 >= self.views.len() {
            return Err(SceneError::SequenceBoundary {
                index: self.current,
            });
        }
        for view in &mut self.views[..=self.current] {
            view.visible = false;
            view.shapes.clear();
        }
        self.step_forward()
    }

    pub fn toggle_manual_cumulate(&mut self) -> bool {
        self.manual_cumulate = !self.manual_cumulate;
        self.manual_cumulate
    }

    pub fn reload_current(&mut self) {
        self.activate(self.current);
    }

    /// Shifts the live screen origin by whole `nudge_step`s. The saved
    /// snapshot is left alone.
    pub fn nudge_origin(&mut self, steps_x: i8, steps_y: i8) {
        let step = self.ctx.config.nudge_step;
        let shift = Vec3::new(f64::from(steps_x) * step, f64::from(steps_y) * step, 0.0);
        self.ctx.transform.origin = self.ctx.transform.origin + shift;
        self.rebuild_guides();
        self.redraw();
    }

    /// Back to a single empty view with default settings and defaults.
    pub fn reset_all(&mut self) {
        *self = Scene::new(self.ctx.config.clone());
    }

    /// Rebuilds the rendered contents of every visible view from its draw
    /// list. Entries that no longer build are kept and skipped without a
    /// new diagnostic.
    pub fn redraw(&mut self) {
        for view in self.views.iter_mut().filter(|v| v.visible) {
            view.shapes.clear();
            for primitive in &view.draw_list {
                match builder::build(primitive, &self.ctx) {
                    Ok(shapes) => view.shapes.extend(shapes),
                    Err(err) => debug!(view = view.index, "skipped on redraw: {err}"),
                }
            }
        }
    }

    pub(crate) fn rebuild_guides(&mut self) {
        self.guides = guides::build_guides(&self.ctx, &self.settings);
    }
}
