use crate::config::{DisplaySettings, DrawConfig};
use crate::geom::Vec3;
use crate::model::Primitive;
use crate::shape::Shape;
use crate::transform::AxisRange;
use serde::{Deserialize, Serialize};

/// Camera, origin, range and display settings saved with a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub camera: Vec3,
    pub origin: Vec3,
    pub range: AxisRange,
    pub settings: DisplaySettings,
}

impl ViewSnapshot {
    pub fn from_config(cfg: &DrawConfig) -> Self {
        Self {
            camera: cfg.camera,
            origin: cfg.origin,
            range: cfg.range,
            settings: cfg.display,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewState {
    /// Created but never shown.
    Inactive,
    /// The view currently navigated to.
    Active,
    /// Navigated away from; may stay visible under cumulate.
    Superseded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    pub index: usize,
    pub snapshot: ViewSnapshot,
    /// Logged primitives in draw order, used for replay and saving.
    pub draw_list: Vec<Primitive>,
    /// Rendered contents.
    pub shapes: Vec<Shape>,
    pub visible: bool,
    pub shown: bool,
}

impl View {
    pub fn new(index: usize, snapshot: ViewSnapshot) -> Self {
        Self {
            index,
            snapshot,
            draw_list: Vec::new(),
            shapes: Vec::new(),
            visible: false,
            shown: false,
        }
    }

    pub fn state(&self, current: usize) -> ViewState {
        if !self.shown {
            ViewState::Inactive
        } else if self.index == current {
            ViewState::Active
        } else {
            ViewState::Superseded
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.shown = true;
    }
}
