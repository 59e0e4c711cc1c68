use draw3d_core::geom::{BBox3, Vec3};
use draw3d_core::model::Plane;
use draw3d_core::triangulate::{
    ear_clip, fan, is_convex, plane_box_intersection, polygon_area, triangle_area, triangulate,
};

fn covered_area(points: &[Vec3], triangles: &[[usize; 3]]) -> f64 {
    triangles
        .iter()
        .map(|t| triangle_area(points[t[0]], points[t[1]], points[t[2]]))
        .sum()
}

fn hexagon() -> Vec<Vec3> {
    (0..6)
        .map(|i| {
            let a = i as f64 * std::f64::consts::PI / 3.0;
            Vec3::new(2.0 * a.cos(), 2.0 * a.sin(), 1.0)
        })
        .collect()
}

fn l_shape() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
    ]
}

fn box10() -> BBox3 {
    BBox3::new(Vec3::new(-10.0, -10.0, -10.0), Vec3::new(10.0, 10.0, 10.0))
}

#[test]
fn convex_fan_covers_polygon() {
    let hex = hexagon();
    assert!(is_convex(&hex));
    let triangles = fan(hex.len());
    assert_eq!(4, triangles.len());
    assert_eq!([0, 1, 2], triangles[0]);
    assert_eq!([0, 4, 5], triangles[3]);
    assert!((covered_area(&hex, &triangles) - polygon_area(&hex)).abs() < 1e-9);
}

#[test]
fn ear_clipping_handles_concave_polygon() {
    let l = l_shape();
    assert!(!is_convex(&l));
    let triangles = triangulate(&l);
    assert_eq!(4, triangles.len());
    assert!((covered_area(&l, &triangles) - 3.0).abs() < 1e-9);
}

#[test]
fn ear_clipping_accepts_clockwise_and_tilted_rings() {
    let mut clockwise = l_shape();
    clockwise.reverse();
    let triangles = ear_clip(&clockwise);
    assert_eq!(4, triangles.len());
    assert!((covered_area(&clockwise, &triangles) - 3.0).abs() < 1e-9);

    // Same outline standing in the XZ plane.
    let upright: Vec<Vec3> = l_shape().iter().map(|p| Vec3::new(p.x, 5.0, p.y)).collect();
    let triangles = ear_clip(&upright);
    assert_eq!(4, triangles.len());
    assert!((covered_area(&upright, &triangles) - 3.0).abs() < 1e-9);
}

#[test]
fn self_intersecting_ring_still_yields_n_minus_two_triangles() {
    let bowtie = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::new(1.0, 3.0, 0.0),
    ];
    assert_eq!(3, ear_clip(&bowtie).len());
}

#[test]
fn degenerate_inputs_produce_no_triangles() {
    assert!(fan(2).is_empty());
    assert!(ear_clip(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]).is_empty());
}

#[test]
fn plane_through_center_yields_ordered_polygon() {
    let hits = plane_box_intersection(
        &Plane {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: 0.0,
        },
        &box10(),
    );
    assert_eq!(4, hits.len());
    // Ordered points trace the full 20 x 20 section.
    assert!((polygon_area(&hits) - 400.0).abs() < 1e-6);

    let diagonal = Plane {
        a: 1.0,
        b: 1.0,
        c: 1.0,
        d: 0.0,
    };
    let hits = plane_box_intersection(&diagonal, &box10());
    assert_eq!(6, hits.len());
    assert!(is_convex(&hits));
    for p in &hits {
        assert!((p.x + p.y + p.z).abs() < 1e-9);
    }
}

#[test]
fn plane_through_center_always_intersects() {
    let normals = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.3, -0.7, 0.2),
        Vec3::new(-2.0, 5.0, 1.0),
        Vec3::new(1.0, 1.0, 0.0),
    ];
    for n in normals {
        let plane = Plane {
            a: n.x,
            b: n.y,
            c: n.z,
            d: 0.0,
        };
        assert!(plane_box_intersection(&plane, &box10()).len() >= 3);
    }
}

#[test]
fn plane_outside_box_has_no_intersection() {
    let hits = plane_box_intersection(
        &Plane {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: -20.0,
        },
        &box10(),
    );
    assert!(hits.len() < 2);
}
