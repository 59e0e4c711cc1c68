//! The capability set the scheduler drives.

use crate::drone::DroneState;
use draw3d_core::{Material, Primitive};
use std::time::Duration;

/// What one iteration produces.
#[derive(Debug, Clone)]
pub enum Emission {
    One(Primitive),
    Many(Vec<Primitive>),
}

impl Emission {
    pub fn into_primitives(self) -> Vec<Primitive> {
        match self {
            Emission::One(p) => vec![p],
            Emission::Many(ps) => ps,
        }
    }
}

impl From<Primitive> for Emission {
    fn from(p: Primitive) -> Self {
        Emission::One(p)
    }
}

impl From<Vec<Primitive>> for Emission {
    fn from(ps: Vec<Primitive>) -> Self {
        Emission::Many(ps)
    }
}

/// A procedural animation. Each iteration runs on the task's worker; the
/// emitted primitives are drawn by the engine.
///
/// Drone algorithms additionally carry an id (0 or 1) and receive their
/// partner's last published state through [`Algorithm::set_info`] before
/// each iteration.
pub trait Algorithm: Send {
    fn iteration_count(&self) -> usize;

    fn delay_millis(&self) -> u64;

    /// Wipe the target view's rendered contents before drawing each iteration.
    fn clear_before_each_iteration(&self) -> bool {
        false
    }

    fn is_drone(&self) -> bool {
        false
    }

    fn id(&self) -> u8 {
        0
    }

    fn set_id(&mut self, _id: u8) {}

    fn info(&self) -> Option<DroneState> {
        None
    }

    fn set_info(&mut self, _info: DroneState) {}

    /// Default material to install before the iteration is drawn.
    fn material_for(&self, _iteration: usize) -> Option<Material> {
        None
    }

    fn process(&mut self, iteration: usize) -> Emission;

    fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis())
    }
}
