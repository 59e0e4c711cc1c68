pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod geom;
pub mod guides;
pub mod model;
pub mod report;
pub mod scene;
pub mod scene_file;
pub mod shape;
pub mod transform;
pub mod triangulate;
pub mod view;

pub use config::{DisplaySettings, DrawConfig};
pub use error::SceneError;
pub use geom::Vec3;
pub use model::{Color, Geometry, Material, Primitive};
pub use scene::Scene;
