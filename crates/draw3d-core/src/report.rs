use crate::scene::Scene;
use crate::view::ViewSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

impl Warning {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of reading a scene file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadReport {
    pub lines: usize,
    pub groups: usize,
    pub primitives: usize,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSummary {
    pub index: usize,
    pub visible: bool,
    pub snapshot: ViewSnapshot,
    pub primitives: usize,
    pub shapes: usize,
    pub kinds: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSummary {
    pub current: usize,
    pub views: Vec<ViewSummary>,
    pub warnings: Vec<Warning>,
}

impl SceneSummary {
    pub fn of(scene: &Scene) -> Self {
        let views = scene
            .views()
            .iter()
            .map(|v| ViewSummary {
                index: v.index,
                visible: v.visible,
                snapshot: v.snapshot,
                primitives: v.draw_list.len(),
                shapes: v.shapes.iter().map(|s| s.leaf_count()).sum(),
                kinds: v
                    .draw_list
                    .iter()
                    .map(|p| p.geometry.keyword().to_string())
                    .collect(),
            })
            .collect();
        let warnings = scene
            .diagnostics()
            .iter()
            .map(|d| Warning::new("draw", d.to_string()))
            .collect();
        Self {
            current: scene.current_index(),
            views,
            warnings,
        }
    }
}
