use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(self) -> Option<Self> {
        let n = self.norm();
        if n <= f64::EPSILON {
            None
        } else {
            Some(self * (1.0 / n))
        }
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self - other).norm() <= eps
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Corners in bit order: bit 0 selects max x, bit 1 max y, bit 2 max z.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut out = [Vec3::ZERO; 8];
        for (i, c) in out.iter_mut().enumerate() {
            *c = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        out
    }

    /// The 12 edges as corner index pairs (see [`BBox3::corners`]).
    pub fn edges() -> [(usize, usize); 12] {
        [
            (0, 1),
            (2, 3),
            (4, 5),
            (6, 7),
            (0, 2),
            (1, 3),
            (4, 6),
            (5, 7),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ]
    }
}

/// Spherical coordinates; angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spherical {
    pub rho: f64,
    pub theta: f64,
    pub phi: f64,
}

pub fn length(p1: Vec3, p2: Vec3) -> f64 {
    (p2 - p1).norm()
}

pub fn midpoint(p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 + p2) * 0.5
}

/// Azimuth of `p2 - p1` measured in the XZ plane.
pub fn theta(p1: Vec3, p2: Vec3) -> f64 {
    let d = p2 - p1;
    d.z.atan2(d.x)
}

/// Polar angle of `p2 - p1` measured from the -Y axis. Zero for a zero-length segment.
pub fn phi(p1: Vec3, p2: Vec3) -> f64 {
    let d = p2 - p1;
    let rho = d.norm();
    if rho <= f64::EPSILON {
        return 0.0;
    }
    (-d.y / rho).clamp(-1.0, 1.0).acos()
}

pub fn cartesian_to_spherical(v: Vec3) -> Spherical {
    Spherical {
        rho: v.norm(),
        theta: theta(Vec3::ZERO, v),
        phi: phi(Vec3::ZERO, v),
    }
}

pub fn spherical_to_cartesian(s: Spherical) -> Vec3 {
    let planar = s.rho * s.phi.sin();
    Vec3::new(
        planar * s.theta.cos(),
        -s.rho * s.phi.cos(),
        planar * s.theta.sin(),
    )
}

/// Samples a Bezier curve with de Casteljau's construction at `t = j / samples`
/// for `j in 0..samples`. The curve end point itself is never sampled.
pub fn bezier(control: &[Vec3], samples: usize) -> Vec<Vec3> {
    if control.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(samples);
    let mut work = control.to_vec();
    for j in 0..samples {
        let t = j as f64 / samples as f64;
        work.copy_from_slice(control);
        for level in 1..control.len() {
            for i in 0..control.len() - level {
                work[i] = work[i].lerp(work[i + 1], t);
            }
        }
        out.push(work[0]);
    }
    out
}
