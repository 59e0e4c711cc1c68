use crate::geom::{BBox3, Vec3};
use crate::model::Plane;
use tracing::warn;

const EPS: f64 = 1e-9;

/// Newell normal of a closed polygon; its length is twice the polygon area.
pub fn newell_normal(points: &[Vec3]) -> Vec3 {
    let mut n = Vec3::ZERO;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

pub fn polygon_area(points: &[Vec3]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    newell_normal(points).norm() * 0.5
}

pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    (b - a).cross(c - a).norm() * 0.5
}

/// True when every turn of the ring bends the same way around the polygon normal.
pub fn is_convex(points: &[Vec3]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let normal = newell_normal(points);
    if normal.norm() <= EPS {
        return false;
    }
    (0..n).all(|i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        (b - a).cross(c - b).dot(normal) >= -EPS
    })
}

/// Fan from vertex 0: `(0, i, i + 1)` for `i in 1..n-1`.
pub fn fan(n: usize) -> Vec<[usize; 3]> {
    if n < 3 {
        return Vec::new();
    }
    (1..n - 1).map(|i| [0, i, i + 1]).collect()
}

/// Fan for convex rings, ear clipping otherwise.
pub fn triangulate(points: &[Vec3]) -> Vec<[usize; 3]> {
    if is_convex(points) {
        fan(points.len())
    } else {
        ear_clip(points)
    }
}

/// Ear clipping on the polygon projected onto its dominant plane.
///
/// Always yields `n - 2` triangles for `n >= 3`. When no ear can be found
/// (self-intersecting or otherwise non-simple input) the rest of the ring is
/// fanned from its first remaining vertex.
pub fn ear_clip(points: &[Vec3]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let flat = project_to_dominant_plane(points);
    let ccw = signed_area_2d(&flat) >= 0.0;

    let mut ring: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);
    while ring.len() > 3 {
        let len = ring.len();
        let ear = (0..len).find(|&i| {
            let prev = ring[(i + len - 1) % len];
            let next = ring[(i + 1) % len];
            is_ear(&flat, &ring, prev, ring[i], next, ccw)
        });
        match ear {
            Some(i) => {
                let prev = ring[(i + len - 1) % len];
                let next = ring[(i + 1) % len];
                triangles.push([prev, ring[i], next]);
                ring.remove(i);
            }
            None => {
                warn!(remaining = len, "no ear found; fanning remaining polygon ring");
                for i in 1..len - 1 {
                    triangles.push([ring[0], ring[i], ring[i + 1]]);
                }
                return triangles;
            }
        }
    }
    triangles.push([ring[0], ring[1], ring[2]]);
    triangles
}

fn is_ear(flat: &[[f64; 2]], ring: &[usize], prev: usize, ear: usize, next: usize, ccw: bool) -> bool {
    let a = flat[prev];
    let b = flat[ear];
    let c = flat[next];
    let cross = orient2d(a, b, c);
    let convex = if ccw { cross > EPS } else { cross < -EPS };
    if !convex {
        return false;
    }
    ring.iter()
        .filter(|&&j| j != prev && j != ear && j != next)
        .map(|&j| flat[j])
        .filter(|p| !same_point(*p, a) && !same_point(*p, b) && !same_point(*p, c))
        .all(|p| !point_in_triangle(a, b, c, p, ccw))
}

fn orient2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn point_in_triangle(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2], ccw: bool) -> bool {
    let sign = if ccw { 1.0 } else { -1.0 };
    orient2d(a, b, p) * sign >= -EPS
        && orient2d(b, c, p) * sign >= -EPS
        && orient2d(c, a, p) * sign >= -EPS
}

fn same_point(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() <= EPS && (a[1] - b[1]).abs() <= EPS
}

fn signed_area_2d(flat: &[[f64; 2]]) -> f64 {
    let mut sum = 0.0;
    for (i, a) in flat.iter().enumerate() {
        let b = flat[(i + 1) % flat.len()];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum * 0.5
}

fn project_to_dominant_plane(points: &[Vec3]) -> Vec<[f64; 2]> {
    let n = newell_normal(points);
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    // Drop the axis the normal is most aligned with, keeping handedness so
    // the ring orientation matches the normal.
    if az >= ax && az >= ay {
        let s = if n.z >= 0.0 { 1.0 } else { -1.0 };
        points.iter().map(|p| [p.x * s, p.y]).collect()
    } else if ax >= ay {
        let s = if n.x >= 0.0 { 1.0 } else { -1.0 };
        points.iter().map(|p| [p.y * s, p.z]).collect()
    } else {
        let s = if n.y >= 0.0 { 1.0 } else { -1.0 };
        points.iter().map(|p| [p.z * s, p.x]).collect()
    }
}

/// Intersects the infinite plane with the 12 edges of `bounds`.
///
/// The returned points are deduplicated and ordered around the intersection
/// polygon, so they can be fanned directly. Fewer than 3 points means the
/// plane misses the box or only touches it.
pub fn plane_box_intersection(plane: &Plane, bounds: &BBox3) -> Vec<Vec3> {
    let normal = Vec3::new(plane.a, plane.b, plane.c);
    let Some(unit) = normal.normalized() else {
        return Vec::new();
    };
    let scale = (bounds.max - bounds.min).norm().max(1.0);
    let tol = EPS * scale;
    let side = |p: Vec3| (normal.dot(p) + plane.d) / normal.norm();

    let corners = bounds.corners();
    let mut hits: Vec<Vec3> = Vec::new();
    let push = |p: Vec3, hits: &mut Vec<Vec3>| {
        if !hits.iter().any(|h| h.approx_eq(p, tol * 10.0)) {
            hits.push(p);
        }
    };
    for (i, j) in BBox3::edges() {
        let (pi, pj) = (corners[i], corners[j]);
        let (fi, fj) = (side(pi), side(pj));
        let on_i = fi.abs() <= tol;
        let on_j = fj.abs() <= tol;
        if on_i {
            push(pi, &mut hits);
        }
        if on_j {
            push(pj, &mut hits);
        }
        if !on_i && !on_j && fi * fj < 0.0 {
            let t = fi / (fi - fj);
            push(pi.lerp(pj, t), &mut hits);
        }
    }
    if hits.len() < 3 {
        return hits;
    }

    let centroid = hits.iter().fold(Vec3::ZERO, |acc, p| acc + *p) * (1.0 / hits.len() as f64);
    let helper = if unit.x.abs() < 0.9 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };
    let u = unit.cross(helper).normalized().unwrap_or(Vec3::new(0.0, 0.0, 1.0));
    let v = unit.cross(u);
    let angle = |p: &Vec3| {
        let d = *p - centroid;
        d.dot(v).atan2(d.dot(u))
    };
    hits.sort_by(|a, b| angle(a).total_cmp(&angle(b)));
    hits
}
