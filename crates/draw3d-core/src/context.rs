use crate::config::DrawConfig;
use crate::model::{CullFace, DrawMode, Geometry, Material, Primitive};
use crate::transform::Transformer;
use serde::{Deserialize, Serialize};

/// Current defaults applied to primitives drawn without explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub material: Material,
    pub draw_mode: DrawMode,
    pub cull_face: CullFace,
    pub font_size: f64,
    pub point_size: f64,
    pub line_radius: f64,
    pub arrow_radius: f64,
    pub vector_radius: f64,
}

impl Defaults {
    pub fn from_config(cfg: &DrawConfig) -> Self {
        Self {
            material: cfg.material,
            draw_mode: cfg.draw_mode,
            cull_face: cfg.cull_face,
            font_size: cfg.font_size,
            point_size: cfg.point_size,
            line_radius: cfg.line_radius,
            arrow_radius: cfg.arrow_radius,
            vector_radius: cfg.vector_radius,
        }
    }
}

/// Everything a builder call needs: constants, current defaults and the
/// transform of the view being drawn into.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingContext {
    pub config: DrawConfig,
    pub defaults: Defaults,
    pub transform: Transformer,
}

impl DrawingContext {
    pub fn new(config: DrawConfig) -> Self {
        let transform = Transformer::new(
            config.axis_length,
            config.range,
            config.display.axis_up,
            config.origin,
        );
        Self {
            defaults: Defaults::from_config(&config),
            config,
            transform,
        }
    }

    /// Fills every unset field from the current defaults. Once resolved a
    /// primitive replays identically even if the defaults change later.
    pub fn resolve(&self, primitive: &mut Primitive) {
        let d = &self.defaults;
        let cfg = &self.config;
        let style = &mut primitive.style;
        style.material.get_or_insert(d.material);
        style.draw_mode.get_or_insert(d.draw_mode);
        style.cull_face.get_or_insert(d.cull_face);
        let diffuse = style.material.map_or(d.material.diffuse, |m| m.diffuse);

        match &mut primitive.geometry {
            Geometry::Line(s) => {
                s.radius.get_or_insert(d.line_radius);
            }
            Geometry::Arrow(s) => {
                s.radius.get_or_insert(d.arrow_radius);
            }
            Geometry::Vector(v) => {
                v.radius.get_or_insert(d.vector_radius);
            }
            Geometry::Cone(r) => {
                r.divisions.get_or_insert(cfg.cone_divisions);
            }
            Geometry::Cylinder(r) => {
                r.divisions.get_or_insert(cfg.cylinder_divisions);
            }
            Geometry::Oval(o) => {
                o.divisions.get_or_insert(cfg.oval_divisions);
            }
            Geometry::Sphere(s) => {
                s.divisions.get_or_insert(cfg.sphere_divisions);
            }
            Geometry::Label(l) => {
                l.font_size.get_or_insert(d.font_size);
                l.color.get_or_insert(diffuse);
            }
            Geometry::Point(_)
            | Geometry::Plane(_)
            | Geometry::Polygon(_)
            | Geometry::Box(_)
            | Geometry::Rectangle(_)
            | Geometry::Triangle(_) => {}
            Geometry::Drone(dr) => {
                dr.rotor_material.get_or_insert(d.material);
            }
        }
    }
}
