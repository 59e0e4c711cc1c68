use crate::config::DisplaySettings;
use crate::context::DrawingContext;
use crate::geom::{self, BBox3, Vec3};
use crate::model::{Color, CullFace, DrawMode, Material};
use crate::shape::{Placement, Shape, ShapeKind};
use crate::transform::{Axis, AxisUp};

const LABEL_FONT_SIZE: f64 = 10.0;

fn solid(kind: ShapeKind, placement: Placement, color: Color) -> Shape {
    Shape {
        kind,
        placement,
        material: Material::new(color),
        draw_mode: DrawMode::Fill,
        cull_face: CullFace::Back,
    }
}

/// Axes, axis labels, tick marks and range boundary for the live view.
pub fn build_guides(ctx: &DrawingContext, settings: &DisplaySettings) -> Vec<Shape> {
    let t = &ctx.transform;
    let cfg = &ctx.config;
    let mut out = Vec::new();

    // Logical axis drawn along each screen axis, in screen X, Y, Z order.
    let screen_axes = match settings.axis_up {
        AxisUp::Y => [Axis::X, Axis::Y, Axis::Z],
        AxisUp::Z => [Axis::X, Axis::Z, Axis::Y],
    };

    if settings.show_axes {
        let half = cfg.axis_length / 2.0;
        for (slot, axis) in screen_axes.iter().enumerate() {
            let (name, color, max) = match axis {
                Axis::X => ("X", Color::RED, t.range.x),
                Axis::Y => ("Y", Color::GREEN, t.range.y),
                Axis::Z => ("Z", Color::BLUE, t.range.z),
            };
            let (placement, dir) = match slot {
                0 => (Placement::at(t.origin).rotate(Axis::Z, 90.0), Vec3::new(1.0, 0.0, 0.0)),
                1 => (Placement::at(t.origin), Vec3::new(0.0, 1.0, 0.0)),
                _ => (Placement::at(t.origin).rotate(Axis::X, -90.0), Vec3::new(0.0, 0.0, 1.0)),
            };
            out.push(solid(
                ShapeKind::Cylinder {
                    radius: cfg.axis_radius,
                    height: cfg.axis_length,
                    divisions: cfg.cylinder_divisions,
                },
                placement,
                color,
            ));
            for (sign, value) in [(1.0, max), (-1.0, -max)] {
                out.push(solid(
                    ShapeKind::Text {
                        text: format!("{value} {name}"),
                        font_size: LABEL_FONT_SIZE,
                    },
                    Placement::at(t.origin + dir * (sign * half)).rotate(Axis::X, 180.0),
                    Color::BLACK,
                ));
            }
        }
    }

    if settings.show_axes && settings.show_ticks {
        for (slot, axis) in screen_axes.iter().enumerate() {
            let max = match axis {
                Axis::X => t.range.x,
                Axis::Y => t.range.y,
                Axis::Z => t.range.z,
            };
            let n = max.floor() as i64;
            for k in (-n..=n).filter(|k| *k != 0) {
                let u = k as f64;
                let user = match axis {
                    Axis::X => Vec3::new(u, 0.0, 0.0),
                    Axis::Y => Vec3::new(0.0, u, 0.0),
                    Axis::Z => Vec3::new(0.0, 0.0, u),
                };
                let placement = Placement::at(t.to_screen(user));
                let placement = if slot == 1 {
                    placement.rotate(Axis::Z, 90.0)
                } else {
                    placement
                };
                out.push(solid(
                    ShapeKind::Cylinder {
                        radius: cfg.axis_radius / 2.0,
                        height: cfg.tick_length,
                        divisions: 8,
                    },
                    placement,
                    Color::BLACK,
                ));
            }
        }
    }

    if settings.show_boundary {
        let corners = t.range.bounds().corners().map(|c| t.to_screen(c));
        for (i, j) in BBox3::edges() {
            let (a, b) = (corners[i], corners[j]);
            out.push(solid(
                ShapeKind::Cylinder {
                    radius: cfg.axis_radius / 2.0,
                    height: geom::length(a, b),
                    divisions: 8,
                },
                Placement::at(geom::midpoint(a, b))
                    .rotate(Axis::Y, -geom::theta(a, b).to_degrees())
                    .rotate(Axis::Z, geom::phi(a, b).to_degrees()),
                Color::rgb(128, 128, 128),
            ));
        }
    }

    out
}
