use crate::geom::{BBox3, Vec3};
use crate::model::Rotation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Which logical axis is drawn vertically on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisUp {
    Y,
    Z,
}

/// Symmetric half-extents: each axis spans `[-x, x]`, `[-y, y]`, `[-z, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AxisRange {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|h| h.is_finite() && *h > 0.0)
    }

    pub fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => 2.0 * self.x,
            Axis::Y => 2.0 * self.y,
            Axis::Z => 2.0 * self.z,
        }
    }

    pub fn bounds(&self) -> BBox3 {
        BBox3::new(
            Vec3::new(-self.x, -self.y, -self.z),
            Vec3::new(self.x, self.y, self.z),
        )
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::new(10.0, 10.0, 10.0)
    }
}

/// Maps user-space coordinates to screen space for one view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformer {
    pub axis_length: f64,
    pub range: AxisRange,
    pub up: AxisUp,
    /// Screen-space offset added to every placed point.
    pub origin: Vec3,
}

impl Transformer {
    pub fn new(axis_length: f64, range: AxisRange, up: AxisUp, origin: Vec3) -> Self {
        Self {
            axis_length,
            range,
            up,
            origin,
        }
    }

    /// `u * AXIS_LENGTH / (max - min)` along `axis`.
    pub fn scale(&self, axis: Axis, u: f64) -> f64 {
        u * self.axis_length / self.range.span(axis)
    }

    pub fn unscale(&self, axis: Axis, s: f64) -> f64 {
        s * self.range.span(axis) / self.axis_length
    }

    /// Scale for extents measured along the vertical axis (cone and cylinder heights).
    pub fn scale_up(&self, h: f64) -> f64 {
        match self.up {
            AxisUp::Y => self.scale(Axis::Y, h),
            AxisUp::Z => self.scale(Axis::Z, h),
        }
    }

    /// Scaled and axis-swapped point without the origin offset.
    pub fn to_screen_relative(&self, p: Vec3) -> Vec3 {
        let x = self.scale(Axis::X, p.x);
        let y = self.scale(Axis::Y, p.y);
        let z = self.scale(Axis::Z, p.z);
        match self.up {
            AxisUp::Y => Vec3::new(x, y, z),
            AxisUp::Z => Vec3::new(x, z, y),
        }
    }

    pub fn to_screen(&self, p: Vec3) -> Vec3 {
        self.origin + self.to_screen_relative(p)
    }

    /// Exchanges the Y and Z rotation components in Z-up mode.
    pub fn rotation(&self, r: Rotation) -> Rotation {
        match self.up {
            AxisUp::Y => r,
            AxisUp::Z => Rotation::new(r.x, r.z, r.y),
        }
    }

    pub fn out_of_range(&self, p: Vec3) -> bool {
        !self.range.bounds().contains(p)
    }
}
