use draw3d_core::geom::{
    bezier, cartesian_to_spherical, length, midpoint, phi, spherical_to_cartesian, theta, Vec3,
};

const EPS: f64 = 1e-9;

fn samples() -> Vec<(Vec3, Vec3)> {
    vec![
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0)),
        (Vec3::new(-4.5, 2.0, 7.0), Vec3::new(3.0, -1.0, -2.0)),
        (Vec3::new(10.0, 10.0, -10.0), Vec3::new(-10.0, 0.5, 0.25)),
    ]
}

#[test]
fn midpoint_bisects_and_length_is_symmetric() {
    for (a, b) in samples() {
        let m = midpoint(a, b);
        assert!((length(a, m) - length(m, b)).abs() < EPS);
        assert!((length(a, m) + length(m, b) - length(a, b)).abs() < EPS);
        assert_eq!(length(a, b), length(b, a));
        assert!(length(a, b) >= 0.0);
    }
}

#[test]
fn spherical_angles_round_trip() {
    let vectors = [
        Vec3::new(3.0, -4.0, 5.0),
        Vec3::new(-1.0, 2.0, -7.5),
        Vec3::new(0.0, 6.0, 0.0),
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::new(2.5, 0.0, -0.5),
    ];
    for v in vectors {
        let s = cartesian_to_spherical(v);
        let back = spherical_to_cartesian(s);
        assert!(back.approx_eq(v, 1e-9), "{v:?} -> {back:?}");
    }
}

#[test]
fn segment_angles_follow_axis_conventions() {
    let origin = Vec3::ZERO;
    assert!(theta(origin, Vec3::new(1.0, 0.0, 0.0)).abs() < EPS);
    assert!((theta(origin, Vec3::new(0.0, 0.0, 1.0)) - std::f64::consts::FRAC_PI_2).abs() < EPS);
    assert!((phi(origin, Vec3::new(1.0, 0.0, 0.0)) - std::f64::consts::FRAC_PI_2).abs() < EPS);
    assert!(phi(origin, Vec3::new(0.0, -3.0, 0.0)).abs() < EPS);
    assert!((phi(origin, Vec3::new(0.0, 3.0, 0.0)) - std::f64::consts::PI).abs() < EPS);
    assert_eq!(0.0, phi(origin, origin));
}

#[test]
fn bezier_starts_at_first_control_point() {
    let control = [
        Vec3::new(-5.0, 0.0, 1.0),
        Vec3::new(0.0, 8.0, 2.0),
        Vec3::new(3.0, -2.0, 0.0),
        Vec3::new(6.0, 1.0, -4.0),
    ];
    let curve = bezier(&control, 100);
    assert_eq!(100, curve.len());
    assert_eq!(control[0], curve[0]);
}

#[test]
fn two_point_bezier_is_a_straight_line() {
    let a = Vec3::new(1.0, -2.0, 3.0);
    let b = Vec3::new(-4.0, 6.0, 0.5);
    let curve = bezier(&[a, b], 10);
    for (j, p) in curve.iter().enumerate() {
        let t = j as f64 / 10.0;
        assert!(p.approx_eq(a.lerp(b, t), 1e-12));
    }
}

#[test]
fn bezier_without_control_points_is_empty() {
    assert!(bezier(&[], 10).is_empty());
}
