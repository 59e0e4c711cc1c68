use draw3d_core::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no algorithm registered as `{0}`")]
    UnknownAlgorithm(String),
    #[error("only two drones can run together, `{name}` rejected")]
    DronePairingOverflow { name: String },
    #[error("`{name}` cannot run alongside the loaded algorithms (drones and non-drones do not mix)")]
    DroneMix { name: String },
    #[error("no algorithms loaded")]
    NothingLoaded,
    #[error("algorithms are running")]
    Busy,
    #[error(transparent)]
    Scene(#[from] SceneError),
}
