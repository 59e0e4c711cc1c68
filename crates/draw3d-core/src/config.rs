use crate::geom::Vec3;
use crate::model::{Color, CullFace, DrawMode, Material};
use crate::transform::{AxisRange, AxisUp};
use serde::{Deserialize, Serialize};

/// Per-view display toggles, saved with every view snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub show_axes: bool,
    pub show_ticks: bool,
    pub axis_up: AxisUp,
    pub show_boundary: bool,
    pub ambient_light: bool,
    pub point_light: bool,
    pub cumulate: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_axes: true,
            show_ticks: true,
            axis_up: AxisUp::Z,
            show_boundary: false,
            ambient_light: true,
            point_light: true,
            cumulate: false,
        }
    }
}

/// Drawing constants and initial defaults. Sizes are in screen units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub axis_length: f64,
    pub axis_radius: f64,
    pub tick_length: f64,
    pub range: AxisRange,
    pub camera: Vec3,
    pub origin: Vec3,
    pub display: DisplaySettings,

    pub material: Material,
    pub draw_mode: DrawMode,
    pub cull_face: CullFace,

    pub point_size: f64,
    pub line_radius: f64,
    pub arrow_radius: f64,
    pub arrow_cap_radius: f64,
    pub arrow_cap_height: f64,
    pub vector_radius: f64,
    pub vector_cap_radius: f64,
    pub vector_cap_height: f64,
    pub cap_divisions: u32,

    pub vertex_size: f64,
    pub edge_radius: f64,
    pub font_size: f64,
    pub decoration_font_size: f64,

    pub cone_divisions: u32,
    pub cylinder_divisions: u32,
    pub sphere_divisions: u32,
    pub oval_divisions: u32,

    pub bezier_samples: usize,
    pub nudge_step: f64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            axis_length: 500.0,
            axis_radius: 1.0,
            tick_length: 6.0,
            range: AxisRange::default(),
            camera: Vec3::new(-10.0, -200.0, -1000.0),
            origin: Vec3::ZERO,
            display: DisplaySettings::default(),
            material: Material::with_specular(Color::rgb(100, 149, 237), Color::WHITE),
            draw_mode: DrawMode::Fill,
            cull_face: CullFace::Back,
            point_size: 3.0,
            line_radius: 1.0,
            arrow_radius: 1.5,
            arrow_cap_radius: 5.0,
            arrow_cap_height: 15.0,
            vector_radius: 1.5,
            vector_cap_radius: 5.0,
            vector_cap_height: 15.0,
            cap_divisions: 16,
            vertex_size: 3.0,
            edge_radius: 0.75,
            font_size: 12.0,
            decoration_font_size: 10.0,
            cone_divisions: 32,
            cylinder_divisions: 32,
            sphere_divisions: 32,
            oval_divisions: 64,
            bezier_samples: 100,
            nudge_step: 10.0,
        }
    }
}
