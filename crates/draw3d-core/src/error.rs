use crate::geom::Vec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("coordinate {point:?} outside axis range in {primitive}")]
    OutOfRangeCoordinate { primitive: &'static str, point: Vec3 },

    #[error("plane {a}x + {b}y + {c}z + {d} = 0 does not intersect the view space ({points} intersection points)")]
    DegeneratePlane {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        points: usize,
    },

    #[error("axis range ({x}, {y}, {z}) needs finite half-extents above zero")]
    InvalidRange { x: f64, y: f64, z: f64 },

    #[error("polygon needs at least 2 vertices, got {vertices}")]
    InvalidPolygon { vertices: usize },

    #[error("cannot step past view {index}")]
    SequenceBoundary { index: usize },

    #[error("no view with index {index} (views: {count})")]
    NoSuchView { index: usize, count: usize },

    #[error("line {line}: {message}")]
    FileFormat { line: usize, message: String },

    #[error("scene i/o: {0}")]
    Io(#[from] std::io::Error),
}
