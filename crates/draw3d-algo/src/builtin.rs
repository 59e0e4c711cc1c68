//! Algorithms registered by default.

use crate::algorithm::{Algorithm, Emission};
use crate::drone::DroneState;
use chrono::{DateTime, Utc};
use draw3d_core::model::{Drone, Rotation};
use draw3d_core::{Color, Geometry, Material, Primitive, Vec3};
use nalgebra::{Rotation3, Unit, Vector3};
use std::f64::consts::TAU;
use tracing::info;

fn to_vec3(v: Vector3<f64>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// A vector of length 5 swept once around a coordinate axis.
#[derive(Debug, Clone)]
pub struct Rotate {
    axis: Unit<Vector3<f64>>,
    start: Vector3<f64>,
    iterations: usize,
    delay: u64,
    material: Material,
}

impl Rotate {
    pub fn x() -> Self {
        Self {
            axis: Vector3::x_axis(),
            start: Vector3::new(0.0, 5.0, 0.0),
            iterations: 128,
            delay: 5,
            material: Material::with_specular(Color::rgb(153, 50, 204), Color::rgb(218, 112, 214)),
        }
    }

    pub fn y() -> Self {
        Self {
            axis: Vector3::y_axis(),
            start: Vector3::new(0.0, 0.0, 5.0),
            iterations: 32,
            delay: 50,
            material: Material::with_specular(Color::rgb(250, 128, 114), Color::rgb(255, 160, 122)),
        }
    }

    pub fn z() -> Self {
        Self {
            axis: Vector3::z_axis(),
            start: Vector3::new(5.0, 0.0, 0.0),
            iterations: 32,
            delay: 50,
            material: Material::with_specular(Color::rgb(184, 134, 11), Color::rgb(218, 165, 32)),
        }
    }

    pub fn tip(&self, iteration: usize) -> Vec3 {
        let angle = iteration as f64 * TAU / self.iterations as f64;
        to_vec3(Rotation3::from_axis_angle(&self.axis, angle) * self.start)
    }
}

impl Algorithm for Rotate {
    fn iteration_count(&self) -> usize {
        self.iterations
    }

    fn delay_millis(&self) -> u64 {
        self.delay
    }

    fn material_for(&self, _iteration: usize) -> Option<Material> {
        Some(self.material)
    }

    fn process(&mut self, iteration: usize) -> Emission {
        let tip = self.tip(iteration);
        Primitive::vector(tip.x, tip.y, tip.z)
            .with_material(self.material)
            .into()
    }
}

/// Cylinders walked around the Z axis, fading as they go.
#[derive(Debug, Clone)]
pub struct CylinderRing {
    pub iterations: usize,
    pub delay: u64,
    pub radius: f64,
    pub height: f64,
    pub start: Vector3<f64>,
}

impl Default for CylinderRing {
    fn default() -> Self {
        Self {
            iterations: 32,
            delay: 50,
            radius: 1.0,
            height: 2.0,
            start: Vector3::new(5.0, 5.0, 5.0),
        }
    }
}

impl Algorithm for CylinderRing {
    fn iteration_count(&self) -> usize {
        self.iterations
    }

    fn delay_millis(&self) -> u64 {
        self.delay
    }

    fn material_for(&self, iteration: usize) -> Option<Material> {
        let saturation = 1.0 - iteration as f64 * 0.02;
        Some(Material::with_specular(
            Color::hsb(10.0, saturation, 1.0),
            Color::hsb(0.0, saturation, 1.0),
        ))
    }

    fn process(&mut self, iteration: usize) -> Emission {
        let angle = iteration as f64 * TAU / self.iterations as f64;
        let center = to_vec3(Rotation3::from_axis_angle(&Vector3::z_axis(), angle) * self.start);
        let mut cylinder = Primitive::cylinder(center, self.radius, self.height, Rotation::NONE);
        if let Some(material) = self.material_for(iteration) {
            cylinder = cylinder.with_material(material);
        }
        cylinder.into()
    }
}

/// Point surface `z = m·cos(r) / (2 + r)` whose amplitude `m` grows with
/// each iteration.
#[derive(Debug, Clone)]
pub struct DampedWave {
    pub iterations: usize,
    pub delay: u64,
    pub extent: f64,
    pub step: f64,
}

impl Default for DampedWave {
    fn default() -> Self {
        Self {
            iterations: 10,
            delay: 500,
            extent: 6.0,
            step: 0.2,
        }
    }
}

impl DampedWave {
    pub fn samples_per_side(&self) -> usize {
        (2.0 * self.extent / self.step).round() as usize + 1
    }

    pub fn height(amplitude: f64, x: f64, y: f64) -> f64 {
        let r = x.hypot(y);
        amplitude * r.cos() / (2.0 + r)
    }
}

impl Algorithm for DampedWave {
    fn iteration_count(&self) -> usize {
        self.iterations
    }

    fn delay_millis(&self) -> u64 {
        self.delay
    }

    fn clear_before_each_iteration(&self) -> bool {
        true
    }

    fn material_for(&self, _iteration: usize) -> Option<Material> {
        Some(Material::with_specular(
            Color::rgb(255, 127, 80),
            Color::rgb(240, 128, 128),
        ))
    }

    fn process(&mut self, iteration: usize) -> Emission {
        let amplitude = iteration as f64;
        let n = self.samples_per_side();
        let coord = |k: usize| -self.extent + k as f64 * self.step;
        let points = (0..n)
            .flat_map(|i| (0..n).map(move |j| (coord(i), coord(j))))
            .map(|(x, y)| Primitive::point(x, y, Self::height(amplitude, x, y)))
            .collect::<Vec<_>>();
        points.into()
    }
}

/// A drone flying a straight path and logging its partner's movement.
#[derive(Debug, Clone)]
pub struct DronePath {
    id: u8,
    from: Vec3,
    to: Vec3,
    iterations: usize,
    delay: u64,
    partner: Option<DroneState>,
    heard_at: Option<DateTime<Utc>>,
}

impl DronePath {
    fn new(from: Vec3, to: Vec3) -> Self {
        Self {
            id: 0,
            from,
            to,
            iterations: 200,
            delay: 50,
            partner: None,
            heard_at: None,
        }
    }

    /// Vertical climb from z = -10 to z = 10.
    pub fn climb() -> Self {
        Self::new(Vec3::new(-5.0, 5.0, -10.0), Vec3::new(-5.0, 5.0, 10.0))
    }

    /// Level pass along X.
    pub fn cross() -> Self {
        Self::new(Vec3::new(-10.0, -5.0, 0.0), Vec3::new(10.0, -5.0, 0.0))
    }

    pub fn position(&self, iteration: usize) -> Vec3 {
        self.from.lerp(self.to, iteration as f64 / self.iterations as f64)
    }
}

impl Algorithm for DronePath {
    fn iteration_count(&self) -> usize {
        self.iterations
    }

    fn delay_millis(&self) -> u64 {
        self.delay
    }

    fn clear_before_each_iteration(&self) -> bool {
        true
    }

    fn is_drone(&self) -> bool {
        true
    }

    fn id(&self) -> u8 {
        self.id
    }

    fn set_id(&mut self, id: u8) {
        self.id = id;
    }

    fn info(&self) -> Option<DroneState> {
        self.partner
    }

    fn set_info(&mut self, info: DroneState) {
        let now = Utc::now();
        if let (Some(prev), Some(at)) = (self.partner, self.heard_at) {
            let distance = (info.position - prev.position).norm();
            let elapsed = (now - at).num_milliseconds();
            let speed = if elapsed > 0 {
                distance / elapsed as f64
            } else {
                0.0
            };
            info!(
                drone = self.id,
                partner = info.id,
                x = info.position.x,
                y = info.position.y,
                z = info.position.z,
                distance,
                elapsed_ms = elapsed,
                speed,
                "partner moved"
            );
        }
        self.partner = Some(info);
        self.heard_at = Some(now);
    }

    fn process(&mut self, iteration: usize) -> Emission {
        let drone = Drone {
            id: self.id,
            at: self.position(iteration),
            radius: 48.0,
            height: 8.0,
            rotation: Rotation::NONE,
            rotor_material: Some(Material::new(Color::BLACK)),
        };
        Primitive::new(Geometry::Drone(drone))
            .with_material(Material::new(Color::BLUE))
            .into()
    }
}
