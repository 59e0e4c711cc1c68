//! Turns logical primitives into screen-space shapes.

use crate::context::DrawingContext;
use crate::error::SceneError;
use crate::geom::{self, Vec3};
use crate::model::{
    Color, Cuboid, CullFace, DrawMode, Drone, Geometry, Label, Material, Plane, Polygon, Primitive,
    Rotation, Style,
};
use crate::shape::{Placement, Shape, ShapeKind};
use crate::transform::Axis;
use crate::triangulate;

/// Length, midpoint and spherical angles (radians) of a screen-space segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFrame {
    pub length: f64,
    pub midpoint: Vec3,
    pub theta: f64,
    pub phi: f64,
}

impl SegmentFrame {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            length: geom::length(a, b),
            midpoint: geom::midpoint(a, b),
            theta: geom::theta(a, b),
            phi: geom::phi(a, b),
        }
    }

    fn placement(&self, at: Vec3) -> Placement {
        Placement::at(at)
            .rotate(Axis::Y, -self.theta.to_degrees())
            .rotate(Axis::Z, self.phi.to_degrees())
    }
}

#[derive(Debug, Clone, Copy)]
struct Look {
    material: Material,
    draw_mode: DrawMode,
    cull_face: CullFace,
}

impl Look {
    fn of(style: &Style, ctx: &DrawingContext) -> Self {
        Self {
            material: style.material.unwrap_or(ctx.defaults.material),
            draw_mode: style.draw_mode.unwrap_or(ctx.defaults.draw_mode),
            cull_face: style.cull_face.unwrap_or(ctx.defaults.cull_face),
        }
    }

    fn with_material(self, material: Material) -> Self {
        Self { material, ..self }
    }

    fn shape(&self, kind: ShapeKind, placement: Placement) -> Shape {
        Shape {
            kind,
            placement,
            material: self.material,
            draw_mode: self.draw_mode,
            cull_face: self.cull_face,
        }
    }
}

struct Cap {
    radius: f64,
    height: f64,
    divisions: u32,
}

/// Builds the shapes for one primitive. The primitive is expected to be
/// resolved already (see [`DrawingContext::resolve`]); unset fields fall back
/// to the current defaults without being recorded.
pub fn build(primitive: &Primitive, ctx: &DrawingContext) -> Result<Vec<Shape>, SceneError> {
    let t = &ctx.transform;
    let cfg = &ctx.config;
    let d = &ctx.defaults;
    let look = Look::of(&primitive.style, ctx);

    let shapes = match &primitive.geometry {
        Geometry::Point(p) => vec![look.shape(
            ShapeKind::Sphere {
                radius: d.point_size,
                divisions: cfg.sphere_divisions,
            },
            Placement::at(t.to_screen(*p)),
        )],
        Geometry::Line(s) => {
            let radius = s.radius.unwrap_or(d.line_radius);
            vec![cylinder_between(
                t.to_screen(s.p1),
                t.to_screen(s.p2),
                radius,
                cfg.cylinder_divisions,
                &look,
            )]
        }
        Geometry::Arrow(s) => {
            let radius = s.radius.unwrap_or(d.arrow_radius);
            let ratio = radius / cfg.arrow_radius;
            let cap = Cap {
                radius: cfg.arrow_cap_radius * ratio,
                height: cfg.arrow_cap_height * ratio,
                divisions: cfg.cap_divisions,
            };
            capped(t.to_screen(s.p1), t.to_screen(s.p2), radius, &cap, ctx, &look)
        }
        Geometry::Vector(v) => {
            let radius = v.radius.unwrap_or(d.vector_radius);
            let ratio = radius / cfg.vector_radius;
            let cap = Cap {
                radius: cfg.vector_cap_radius * ratio,
                height: cfg.vector_cap_height * ratio,
                divisions: cfg.cap_divisions,
            };
            capped(t.to_screen(Vec3::ZERO), t.to_screen(v.tip), radius, &cap, ctx, &look)
        }
        Geometry::Plane(plane) => plane_mesh(plane, ctx, &look)?,
        Geometry::Polygon(poly) => polygon(poly, ctx, &look)?,
        Geometry::Box(b) => vec![cuboid(b, ctx, &look)],
        Geometry::Rectangle(r) => vec![cuboid(
            &Cuboid {
                center: r.center,
                width: r.width,
                height: 0.0,
                depth: r.height,
                rotation: r.rotation,
            },
            ctx,
            &look,
        )],
        Geometry::Cone(r) => vec![look.shape(
            ShapeKind::Cone {
                radius: t.scale(Axis::X, r.radius),
                height: t.scale_up(r.height),
                divisions: r.divisions.unwrap_or(cfg.cone_divisions),
            },
            rotated(t.to_screen(r.center), r.rotation, ctx),
        )],
        Geometry::Cylinder(r) => vec![look.shape(
            ShapeKind::Cylinder {
                radius: t.scale(Axis::X, r.radius),
                height: t.scale_up(r.height),
                divisions: r.divisions.unwrap_or(cfg.cylinder_divisions),
            },
            rotated(t.to_screen(r.center), r.rotation, ctx),
        )],
        Geometry::Oval(o) => vec![look.shape(
            ShapeKind::Oval {
                major: t.scale(Axis::X, o.major),
                minor: t.scale_up(o.minor),
                divisions: o.divisions.unwrap_or(cfg.oval_divisions),
            },
            rotated(t.to_screen(o.center), o.rotation, ctx),
        )],
        Geometry::Sphere(s) => vec![look.shape(
            ShapeKind::Sphere {
                radius: t.scale(Axis::X, s.radius),
                divisions: s.divisions.unwrap_or(cfg.sphere_divisions),
            },
            rotated(t.to_screen(s.center), s.rotation, ctx),
        )],
        Geometry::Triangle(tri) => vec![look.shape(
            ShapeKind::Mesh {
                points: tri.vertices.iter().map(|p| t.to_screen(*p)).collect(),
                faces: vec![[0, 1, 2]],
            },
            Placement::default(),
        )],
        Geometry::Label(label) => vec![text(label, ctx, &look)],
        Geometry::Drone(drone) => vec![drone_group(drone, ctx, &look)],
    };
    Ok(shapes)
}

fn rotated(at: Vec3, rotation: Rotation, ctx: &DrawingContext) -> Placement {
    let r = ctx.transform.rotation(rotation);
    Placement::at(at).rotate_xyz(r.x, r.y, r.z)
}

fn cylinder_between(a: Vec3, b: Vec3, radius: f64, divisions: u32, look: &Look) -> Shape {
    let frame = SegmentFrame::new(a, b);
    look.shape(
        ShapeKind::Cylinder {
            radius,
            height: frame.length,
            divisions,
        },
        frame.placement(frame.midpoint),
    )
}

/// Shaft from `a` towards `b`, shortened by a third of the cap height, plus a cone cap at `b`.
fn capped(a: Vec3, b: Vec3, radius: f64, cap: &Cap, ctx: &DrawingContext, look: &Look) -> Vec<Shape> {
    let frame = SegmentFrame::new(a, b);
    if frame.length <= f64::EPSILON {
        return Vec::new();
    }
    let shaft = (frame.length - cap.height / 3.0).max(0.0);
    let shaft_end = a.lerp(b, shaft / frame.length);
    vec![
        cylinder_between(a, shaft_end, radius, ctx.config.cylinder_divisions, look),
        look.shape(
            ShapeKind::Cone {
                radius: cap.radius,
                height: cap.height,
                divisions: cap.divisions,
            },
            frame.placement(b),
        ),
    ]
}

fn cuboid(b: &Cuboid, ctx: &DrawingContext, look: &Look) -> Shape {
    let t = &ctx.transform;
    look.shape(
        ShapeKind::Box {
            width: t.scale(Axis::X, b.width),
            height: t.scale(Axis::Y, b.height),
            depth: t.scale(Axis::Z, b.depth),
        },
        rotated(t.to_screen(b.center), b.rotation, ctx),
    )
}

fn plane_mesh(plane: &Plane, ctx: &DrawingContext, look: &Look) -> Result<Vec<Shape>, SceneError> {
    let t = &ctx.transform;
    let hits = triangulate::plane_box_intersection(plane, &t.range.bounds());
    if hits.len() < 3 {
        return Err(SceneError::DegeneratePlane {
            a: plane.a,
            b: plane.b,
            c: plane.c,
            d: plane.d,
            points: hits.len(),
        });
    }
    let faces = triangulate::fan(hits.len());
    Ok(vec![look.shape(
        ShapeKind::Mesh {
            points: hits.iter().map(|p| t.to_screen(*p)).collect(),
            faces,
        },
        Placement::default(),
    )])
}

fn polygon(poly: &Polygon, ctx: &DrawingContext, look: &Look) -> Result<Vec<Shape>, SceneError> {
    let n = poly.vertices.len();
    if n < 2 {
        return Err(SceneError::InvalidPolygon { vertices: n });
    }
    let t = &ctx.transform;
    let cfg = &ctx.config;
    let mut out = vec![look.shape(
        ShapeKind::Mesh {
            points: poly.vertices.iter().map(|p| t.to_screen(*p)).collect(),
            faces: triangulate::triangulate(&poly.vertices),
        },
        Placement::default(),
    )];

    // Decorations are drawn but never logged.
    let black = look.with_material(Material::new(Color::BLACK));
    for (i, v) in poly.vertices.iter().enumerate() {
        let at = t.to_screen(*v);
        if poly.show_vertices {
            out.push(black.shape(
                ShapeKind::Sphere {
                    radius: cfg.vertex_size,
                    divisions: cfg.sphere_divisions,
                },
                Placement::at(at),
            ));
        }
        if poly.show_labels {
            let label = Label {
                at: *v,
                rotation: Rotation::new(180.0, 0.0, 0.0),
                text: format!("v{i}"),
                font_size: Some(cfg.decoration_font_size),
                color: Some(Color::BLACK),
            };
            out.push(text(&label, ctx, &black));
        }
        if poly.show_edges {
            let next = poly.vertices[poly.next(i)];
            out.push(cylinder_between(
                at,
                t.to_screen(next),
                cfg.edge_radius,
                cfg.cylinder_divisions,
                &black,
            ));
        }
    }
    Ok(out)
}

fn text(label: &Label, ctx: &DrawingContext, look: &Look) -> Shape {
    let color = label.color.unwrap_or(look.material.diffuse);
    look.with_material(Material::new(color)).shape(
        ShapeKind::Text {
            text: label.text.clone(),
            font_size: label.font_size.unwrap_or(ctx.defaults.font_size),
        },
        rotated(ctx.transform.to_screen(label.at), label.rotation, ctx),
    )
}

fn drone_group(drone: &Drone, ctx: &DrawingContext, look: &Look) -> Shape {
    let body = *look;
    let rotor = look.with_material(drone.rotor_material.unwrap_or(look.material));
    let arm = |placement: Placement| {
        body.shape(
            ShapeKind::Cylinder {
                radius: 2.0,
                height: drone.radius,
                divisions: ctx.config.cylinder_divisions,
            },
            placement,
        )
    };
    let offset = drone.radius / 2.0;
    let mut parts = vec![
        arm(Placement::default().rotate(Axis::Z, 90.0)),
        arm(Placement::default().rotate(Axis::X, -90.0)),
        body.shape(
            ShapeKind::Cylinder {
                radius: 2.0,
                height: drone.height,
                divisions: ctx.config.cylinder_divisions,
            },
            Placement::default(),
        ),
    ];
    for at in [
        Vec3::new(offset, 0.0, 0.0),
        Vec3::new(0.0, 0.0, offset),
        Vec3::new(-offset, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -offset),
    ] {
        parts.push(rotor.shape(
            ShapeKind::Cone {
                radius: drone.height / 2.0,
                height: drone.height,
                divisions: 8,
            },
            Placement::at(at).rotate(Axis::X, 180.0),
        ));
    }
    body.shape(
        ShapeKind::Group(parts),
        rotated(ctx.transform.to_screen(drone.at), drone.rotation, ctx),
    )
}
