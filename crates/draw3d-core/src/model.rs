use crate::geom::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("orange", [255, 165, 0]),
    ("gold", [255, 215, 0]),
    ("coral", [255, 127, 80]),
    ("lightcoral", [240, 128, 128]),
    ("salmon", [250, 128, 114]),
    ("lightsalmon", [255, 160, 122]),
    ("goldenrod", [218, 165, 32]),
    ("darkgoldenrod", [184, 134, 11]),
    ("orchid", [218, 112, 214]),
    ("darkorchid", [153, 50, 204]),
    ("turquoise", [64, 224, 208]),
    ("purple", [128, 0, 128]),
    ("navy", [0, 0, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("darkgray", [169, 169, 169]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
    ("cornflowerblue", [100, 149, 237]),
    ("lightblue", [173, 216, 230]),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hue in degrees, saturation and brightness in `[0, 1]`.
    pub fn hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        let to_byte = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Accepts `#rrggbb`, `0xrrggbb`, bare `rrggbb`, `#rgb` and common color names.
    pub fn parse_web(s: &str) -> Option<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if let Some((_, [r, g, b])) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Some(Self::rgb(*r, *g, *b));
        }
        let hex = lower
            .strip_prefix('#')
            .or_else(|| lower.strip_prefix("0x"))
            .unwrap_or(&lower);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            // Trailing alpha byte is accepted and ignored.
            6 | 8 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse_web(&s).ok_or_else(|| format!("invalid color `{s}`"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub diffuse: Color,
    pub specular: Option<Color>,
}

impl Material {
    pub const fn new(diffuse: Color) -> Self {
        Self {
            diffuse,
            specular: None,
        }
    }

    pub const fn with_specular(diffuse: Color, specular: Color) -> Self {
        Self {
            diffuse,
            specular: Some(specular),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawMode {
    Fill,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CullFace {
    None,
    Back,
    Front,
}

impl DrawMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawMode::Fill => "fill",
            DrawMode::Line => "line",
        }
    }
}

impl FromStr for DrawMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fill" => Ok(DrawMode::Fill),
            "line" => Ok(DrawMode::Line),
            other => Err(format!("unknown draw mode `{other}`")),
        }
    }
}

impl CullFace {
    pub fn as_str(self) -> &'static str {
        match self {
            CullFace::None => "none",
            CullFace::Back => "back",
            CullFace::Front => "front",
        }
    }
}

impl FromStr for CullFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CullFace::None),
            "back" => Ok(CullFace::Back),
            "front" => Ok(CullFace::Front),
            other => Err(format!("unknown cull face `{other}`")),
        }
    }
}

/// Unset fields resolve to the drawing defaults the first time the primitive is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Style {
    pub material: Option<Material>,
    pub draw_mode: Option<DrawMode>,
    pub cull_face: Option<CullFace>,
}

/// Rotation triple in degrees, applied about X, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub const NONE: Rotation = Rotation::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Vec3,
    pub p2: Vec3,
    pub radius: Option<f64>,
}

/// A vector drawn from the user-space origin to `tip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginVector {
    pub tip: Vec3,
    pub radius: Option<f64>,
}

/// `a*x + b*y + c*z + d = 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vec3>,
    pub show_edges: bool,
    pub show_vertices: bool,
    pub show_labels: bool,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            show_edges: false,
            show_vertices: false,
            show_labels: false,
        }
    }

    pub fn with_decorations(mut self, edges: bool, vertices: bool, labels: bool) -> Self {
        self.show_edges = edges;
        self.show_vertices = vertices;
        self.show_labels = labels;
        self
    }

    /// Index of the vertex following `i`, wrapping to 0.
    pub fn next(&self, i: usize) -> usize {
        if i + 1 >= self.vertices.len() {
            0
        } else {
            i + 1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub center: Vec3,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub center: Vec3,
    pub width: f64,
    pub height: f64,
    pub rotation: Rotation,
}

/// Shared by cones and cylinders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub center: Vec3,
    pub radius: f64,
    pub height: f64,
    pub rotation: Rotation,
    pub divisions: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oval {
    pub center: Vec3,
    pub major: f64,
    pub minor: f64,
    pub rotation: Rotation,
    pub divisions: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    pub rotation: Rotation,
    pub divisions: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub at: Vec3,
    pub rotation: Rotation,
    pub text: String,
    pub font_size: Option<f64>,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub id: u8,
    pub at: Vec3,
    /// Arm span radius in screen units.
    pub radius: f64,
    pub height: f64,
    pub rotation: Rotation,
    pub rotor_material: Option<Material>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Vec3),
    Line(Segment),
    Arrow(Segment),
    Vector(OriginVector),
    Plane(Plane),
    Polygon(Polygon),
    Box(Cuboid),
    Rectangle(Rectangle),
    Cone(Round),
    Cylinder(Round),
    Oval(Oval),
    Sphere(Sphere),
    Triangle(Triangle),
    Label(Label),
    Drone(Drone),
}

impl Geometry {
    /// Record keyword used by the scene file.
    pub fn keyword(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Arrow(_) => "Arrow",
            Geometry::Vector(_) => "Vector",
            Geometry::Plane(_) => "Plane",
            Geometry::Polygon(_) => "Polygon",
            Geometry::Box(_) => "Box",
            Geometry::Rectangle(_) => "Rectangle",
            Geometry::Cone(_) => "Cone",
            Geometry::Cylinder(_) => "Cylinder",
            Geometry::Oval(_) => "Oval",
            Geometry::Sphere(_) => "Sphere",
            Geometry::Triangle(_) => "Triangle",
            Geometry::Label(_) => "Text",
            Geometry::Drone(_) => "Drone",
        }
    }

    /// User-space points checked against the axis range before drawing.
    pub fn anchor_points(&self) -> Vec<Vec3> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::Line(s) | Geometry::Arrow(s) => vec![s.p1, s.p2],
            Geometry::Vector(v) => vec![v.tip],
            Geometry::Plane(_) => Vec::new(),
            Geometry::Polygon(p) => p.vertices.clone(),
            Geometry::Box(b) => vec![b.center],
            Geometry::Rectangle(r) => vec![r.center],
            Geometry::Cone(r) | Geometry::Cylinder(r) => vec![r.center],
            Geometry::Oval(o) => vec![o.center],
            Geometry::Sphere(s) => vec![s.center],
            Geometry::Triangle(t) => t.vertices.to_vec(),
            Geometry::Label(l) => vec![l.at],
            Geometry::Drone(d) => vec![d.at],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub geometry: Geometry,
    pub style: Style,
}

impl Primitive {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            style: Style::default(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.style.material = Some(material);
        self
    }

    pub fn with_draw_mode(mut self, mode: DrawMode) -> Self {
        self.style.draw_mode = Some(mode);
        self
    }

    pub fn with_cull_face(mut self, cull: CullFace) -> Self {
        self.style.cull_face = Some(cull);
        self
    }

    pub fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(Geometry::Point(Vec3::new(x, y, z)))
    }

    pub fn line(p1: Vec3, p2: Vec3) -> Self {
        Self::new(Geometry::Line(Segment {
            p1,
            p2,
            radius: None,
        }))
    }

    pub fn arrow(p1: Vec3, p2: Vec3) -> Self {
        Self::new(Geometry::Arrow(Segment {
            p1,
            p2,
            radius: None,
        }))
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Self {
        Self::new(Geometry::Vector(OriginVector {
            tip: Vec3::new(x, y, z),
            radius: None,
        }))
    }

    pub fn plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::new(Geometry::Plane(Plane { a, b, c, d }))
    }

    pub fn polygon(polygon: Polygon) -> Self {
        Self::new(Geometry::Polygon(polygon))
    }

    pub fn sphere(center: Vec3, radius: f64) -> Self {
        Self::new(Geometry::Sphere(Sphere {
            center,
            radius,
            rotation: Rotation::NONE,
            divisions: None,
        }))
    }

    pub fn cylinder(center: Vec3, radius: f64, height: f64, rotation: Rotation) -> Self {
        Self::new(Geometry::Cylinder(Round {
            center,
            radius,
            height,
            rotation,
            divisions: None,
        }))
    }

    pub fn cone(center: Vec3, radius: f64, height: f64, rotation: Rotation) -> Self {
        Self::new(Geometry::Cone(Round {
            center,
            radius,
            height,
            rotation,
            divisions: None,
        }))
    }

    pub fn cuboid(center: Vec3, width: f64, height: f64, depth: f64, rotation: Rotation) -> Self {
        Self::new(Geometry::Box(Cuboid {
            center,
            width,
            height,
            depth,
            rotation,
        }))
    }

    pub fn label(at: Vec3, text: impl Into<String>) -> Self {
        Self::new(Geometry::Label(Label {
            at,
            rotation: Rotation::NONE,
            text: text.into(),
            font_size: None,
            color: None,
        }))
    }

    pub fn drone(at: Vec3, radius: f64, height: f64) -> Self {
        Self::new(Geometry::Drone(Drone {
            id: 0,
            at,
            radius,
            height,
            rotation: Rotation::NONE,
            rotor_material: None,
        }))
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::new(Geometry::Triangle(Triangle {
            vertices: [a, b, c],
        }))
    }
}
