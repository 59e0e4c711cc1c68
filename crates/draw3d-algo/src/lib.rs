//! Procedural animations driven against a [`draw3d_core::Scene`].

pub mod algorithm;
pub mod builtin;
pub mod drone;
pub mod engine;
pub mod error;
pub mod registry;

pub use algorithm::{Algorithm, Emission};
pub use drone::{DroneSlots, DroneState};
pub use engine::{Command, Engine, RunReport, TaskReport};
pub use error::SchedulerError;
pub use registry::AlgorithmRegistry;
