use crate::geom::Vec3;
use crate::model::{CullFace, DrawMode, Material};
use crate::transform::Axis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRotation {
    pub axis: Axis,
    pub degrees: f64,
}

/// Translation followed by rotations, in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Placement {
    pub translate: Vec3,
    pub rotations: Vec<AxisRotation>,
}

impl Placement {
    pub fn at(translate: Vec3) -> Self {
        Self {
            translate,
            rotations: Vec::new(),
        }
    }

    pub fn rotate(mut self, axis: Axis, degrees: f64) -> Self {
        self.rotations.push(AxisRotation { axis, degrees });
        self
    }

    pub fn rotate_xyz(self, x: f64, y: f64, z: f64) -> Self {
        self.rotate(Axis::X, x).rotate(Axis::Y, y).rotate(Axis::Z, z)
    }
}

/// Screen-space geometry. Cylinders and cones are aligned with the local
/// vertical axis before placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Cylinder {
        radius: f64,
        height: f64,
        divisions: u32,
    },
    Cone {
        radius: f64,
        height: f64,
        divisions: u32,
    },
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
        divisions: u32,
    },
    Oval {
        major: f64,
        minor: f64,
        divisions: u32,
    },
    Mesh {
        points: Vec<Vec3>,
        faces: Vec<[usize; 3]>,
    },
    Text {
        text: String,
        font_size: f64,
    },
    Group(Vec<Shape>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub placement: Placement,
    pub material: Material,
    pub draw_mode: DrawMode,
    pub cull_face: CullFace,
}

impl Shape {
    /// Counts this shape and every shape nested in groups.
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            ShapeKind::Group(children) => children.iter().map(Shape::leaf_count).sum(),
            _ => 1,
        }
    }
}
