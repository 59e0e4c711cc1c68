//! Line-oriented scene files.
//!
//! Each record starts with a keyword; tokens are separated by any of
//! `,;: ` and lines starting with `//` are comments. Primitive records end
//! with four style tokens (diffuse, specular, draw mode, cull face) where
//! `-` marks an unset value. Text records carry their string last, in
//! double quotes.

use crate::config::DisplaySettings;
use crate::error::SceneError;
use crate::geom::Vec3;
use crate::model::{
    Color, Cuboid, CullFace, DrawMode, Drone, Geometry, Label, Material, OriginVector, Oval, Plane,
    Polygon, Primitive, Rectangle, Rotation, Round, Segment, Sphere, Style, Triangle,
};
use crate::report::{ReadReport, Warning};
use crate::scene::Scene;
use crate::transform::{AxisRange, AxisUp};
use std::fmt::{self, Write as _};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

const UNSET: &str = "-";

/// Serializes every visible view, in index order.
pub fn write_scene(scene: &Scene) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "// draw3d scene")?;
    for view in scene.views().iter().filter(|v| v.visible) {
        let snap = &view.snapshot;
        let s = &snap.settings;
        writeln!(out, "DataGroup: {}", view.index)?;
        writeln!(
            out,
            "View: {}, {}, {}, {}, {}, {}, {}",
            s.show_axes,
            s.show_ticks,
            s.axis_up == AxisUp::Z,
            s.show_boundary,
            s.ambient_light,
            s.point_light,
            s.cumulate
        )?;
        writeln!(out, "Camera: {}", vec3(snap.camera))?;
        writeln!(out, "Origin: {}", vec3(snap.origin))?;
        writeln!(
            out,
            "Range: {}, {}, {}",
            snap.range.x, snap.range.y, snap.range.z
        )?;
        for primitive in &view.draw_list {
            writeln!(out, "{}", primitive_line(primitive))?;
        }
    }
    Ok(out)
}

pub fn save_scene(scene: &Scene, path: &Path) -> Result<(), SceneError> {
    let text = write_scene(scene).map_err(|e| SceneError::FileFormat {
        line: 0,
        message: e.to_string(),
    })?;
    std::fs::write(path, text)?;
    Ok(())
}

fn vec3(p: Vec3) -> String {
    format!("{}, {}, {}", p.x, p.y, p.z)
}

fn rotation(r: Rotation) -> String {
    format!("{}, {}, {}", r.x, r.y, r.z)
}

fn opt<T: fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| UNSET.to_string(), |v| v.to_string())
}

fn style(s: &Style) -> String {
    format!(
        "{}, {}, {}, {}",
        opt(s.material.map(|m| m.diffuse)),
        opt(s.material.and_then(|m| m.specular)),
        opt(s.draw_mode.map(DrawMode::as_str)),
        opt(s.cull_face.map(CullFace::as_str)),
    )
}

fn primitive_line(p: &Primitive) -> String {
    let body = match &p.geometry {
        Geometry::Point(at) => vec3(*at),
        Geometry::Line(s) | Geometry::Arrow(s) => {
            format!("{}, {}, {}", vec3(s.p1), vec3(s.p2), opt(s.radius))
        }
        Geometry::Vector(v) => format!("{}, {}", vec3(v.tip), opt(v.radius)),
        Geometry::Plane(pl) => format!("{}, {}, {}, {}", pl.a, pl.b, pl.c, pl.d),
        Geometry::Polygon(poly) => {
            let mut body = poly.vertices.len().to_string();
            for v in &poly.vertices {
                body.push_str(", ");
                body.push_str(&vec3(*v));
            }
            format!(
                "{body}, {}, {}, {}",
                poly.show_edges, poly.show_vertices, poly.show_labels
            )
        }
        Geometry::Box(b) => format!(
            "{}, {}, {}, {}, {}",
            vec3(b.center),
            b.width,
            b.height,
            b.depth,
            rotation(b.rotation)
        ),
        Geometry::Rectangle(r) => format!(
            "{}, {}, {}, {}",
            vec3(r.center),
            r.width,
            r.height,
            rotation(r.rotation)
        ),
        Geometry::Cone(r) | Geometry::Cylinder(r) => format!(
            "{}, {}, {}, {}, {}",
            vec3(r.center),
            r.radius,
            r.height,
            rotation(r.rotation),
            opt(r.divisions)
        ),
        Geometry::Oval(o) => format!(
            "{}, {}, {}, {}, {}",
            vec3(o.center),
            o.major,
            o.minor,
            rotation(o.rotation),
            opt(o.divisions)
        ),
        Geometry::Sphere(s) => format!(
            "{}, {}, {}, {}",
            vec3(s.center),
            s.radius,
            rotation(s.rotation),
            opt(s.divisions)
        ),
        Geometry::Triangle(t) => format!(
            "{}, {}, {}",
            vec3(t.vertices[0]),
            vec3(t.vertices[1]),
            vec3(t.vertices[2])
        ),
        Geometry::Label(l) => {
            let text = l.text.replace(['\n', '\r'], " ");
            return format!(
                "Text: {}, {}, {}, {}, {} \"{text}\"",
                vec3(l.at),
                rotation(l.rotation),
                opt(l.font_size),
                opt(l.color),
                style(&p.style)
            );
        }
        Geometry::Drone(d) => format!(
            "{}, {}, {}, {}, {}, {}, {}",
            d.id,
            vec3(d.at),
            d.radius,
            d.height,
            rotation(d.rotation),
            opt(d.rotor_material.map(|m| m.diffuse)),
            opt(d.rotor_material.and_then(|m| m.specular))
        ),
    };
    format!("{}: {body}, {}", p.geometry.keyword(), style(&p.style))
}

enum Record {
    Group,
    View(DisplaySettings),
    Camera(Vec3),
    Origin(Vec3),
    Range(AxisRange),
    Color(Material),
    Primitive(Primitive),
}

struct Tokens<'a> {
    items: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        let items = s
            .split(|c: char| matches!(c, ',' | ';' | ':') || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        Self { items, pos: 0 }
    }

    fn next(&mut self, what: &str) -> Result<&'a str, String> {
        let token = self
            .items
            .get(self.pos)
            .copied()
            .ok_or_else(|| format!("missing {what}"))?;
        self.pos += 1;
        Ok(token)
    }

    fn has_more(&self) -> bool {
        self.pos < self.items.len()
    }

    fn f64(&mut self, what: &str) -> Result<f64, String> {
        let token = self.next(what)?;
        token
            .parse::<f64>()
            .map_err(|_| format!("malformed {what} `{token}`"))
    }

    fn opt_f64(&mut self, what: &str) -> Result<Option<f64>, String> {
        if !self.has_more() || self.items[self.pos] == UNSET {
            self.pos += 1;
            return Ok(None);
        }
        self.f64(what).map(Some)
    }

    fn opt_u32(&mut self, what: &str) -> Result<Option<u32>, String> {
        if !self.has_more() || self.items[self.pos] == UNSET {
            self.pos += 1;
            return Ok(None);
        }
        let token = self.next(what)?;
        token
            .parse::<u32>()
            .map(Some)
            .map_err(|_| format!("malformed {what} `{token}`"))
    }

    fn usize(&mut self, what: &str) -> Result<usize, String> {
        let token = self.next(what)?;
        token
            .parse::<usize>()
            .map_err(|_| format!("malformed {what} `{token}`"))
    }

    fn bool(&mut self, what: &str) -> Result<bool, String> {
        match self.next(what)?.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(format!("malformed {what} `{other}`")),
        }
    }

    fn vec3(&mut self, what: &str) -> Result<Vec3, String> {
        Ok(Vec3::new(self.f64(what)?, self.f64(what)?, self.f64(what)?))
    }

    fn rotation(&mut self) -> Result<Rotation, String> {
        Ok(Rotation::new(
            self.f64("x rotation")?,
            self.f64("y rotation")?,
            self.f64("z rotation")?,
        ))
    }

    fn color(&mut self, what: &str) -> Result<Option<Color>, String> {
        if !self.has_more() {
            return Ok(None);
        }
        let token = self.next(what)?;
        if token == UNSET {
            return Ok(None);
        }
        Color::parse_web(token)
            .map(Some)
            .ok_or_else(|| format!("malformed {what} `{token}`"))
    }

    fn keyword<T: std::str::FromStr<Err = String>>(&mut self) -> Result<Option<T>, String> {
        if !self.has_more() {
            return Ok(None);
        }
        let token = self.next("style")?;
        if token == UNSET {
            return Ok(None);
        }
        token.parse::<T>().map(Some)
    }

    /// Trailing style tokens; missing ones stay unset.
    fn style(&mut self) -> Result<Style, String> {
        let diffuse = self.color("diffuse color")?;
        let specular = self.color("specular color")?;
        let material = diffuse.map(|d| Material {
            diffuse: d,
            specular,
        });
        let draw_mode = self.keyword::<DrawMode>()?;
        let cull_face = self.keyword::<CullFace>()?;
        if self.has_more() {
            return Err(format!("unexpected token `{}`", self.items[self.pos]));
        }
        Ok(Style {
            material,
            draw_mode,
            cull_face,
        })
    }
}

fn parse_record(raw: &str) -> Result<Option<Record>, String> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("//") {
        return Ok(None);
    }

    // Text keeps its quoted string out of the tokenizer.
    let (head, text) = match (line.find('"'), line.rfind('"')) {
        (Some(open), Some(close)) if close > open => (&line[..open], Some(&line[open + 1..close])),
        _ => (line, None),
    };
    let mut t = Tokens::new(head);
    let keyword = t.next("record keyword")?;

    let geometry = match keyword {
        "DataGroup" => return Ok(Some(Record::Group)),
        "View" => {
            let settings = DisplaySettings {
                show_axes: t.bool("axes flag")?,
                show_ticks: t.bool("ticks flag")?,
                axis_up: if t.bool("z-up flag")? {
                    AxisUp::Z
                } else {
                    AxisUp::Y
                },
                show_boundary: t.bool("boundary flag")?,
                ambient_light: t.bool("ambient light flag")?,
                point_light: t.bool("point light flag")?,
                cumulate: t.bool("cumulate flag")?,
            };
            return Ok(Some(Record::View(settings)));
        }
        "Camera" => return Ok(Some(Record::Camera(t.vec3("camera angle")?))),
        "Origin" => return Ok(Some(Record::Origin(t.vec3("origin")?))),
        "Range" => {
            let r = t.vec3("range")?;
            let range = AxisRange::new(r.x, r.y, r.z);
            if !range.is_valid() {
                return Err(format!("range ({}, {}, {}) must be positive", r.x, r.y, r.z));
            }
            return Ok(Some(Record::Range(range)));
        }
        "Color" => {
            let diffuse = t.color("diffuse color")?.ok_or("missing diffuse color")?;
            let specular = t.color("specular color")?;
            return Ok(Some(Record::Color(Material { diffuse, specular })));
        }
        "Point" => Geometry::Point(t.vec3("point")?),
        "Line" | "Arrow" => {
            let segment = Segment {
                p1: t.vec3("start point")?,
                p2: t.vec3("end point")?,
                radius: t.opt_f64("radius")?,
            };
            if keyword == "Line" {
                Geometry::Line(segment)
            } else {
                Geometry::Arrow(segment)
            }
        }
        "Vector" => Geometry::Vector(OriginVector {
            tip: t.vec3("tip")?,
            radius: t.opt_f64("radius")?,
        }),
        "Plane" => Geometry::Plane(Plane {
            a: t.f64("a")?,
            b: t.f64("b")?,
            c: t.f64("c")?,
            d: t.f64("d")?,
        }),
        "Polygon" => {
            let n = t.usize("vertex count")?;
            let vertices = (0..n)
                .map(|_| t.vec3("vertex"))
                .collect::<Result<Vec<_>, _>>()?;
            Geometry::Polygon(Polygon::new(vertices).with_decorations(
                t.bool("edges flag")?,
                t.bool("vertices flag")?,
                t.bool("labels flag")?,
            ))
        }
        "Box" => Geometry::Box(Cuboid {
            center: t.vec3("center")?,
            width: t.f64("width")?,
            height: t.f64("height")?,
            depth: t.f64("depth")?,
            rotation: t.rotation()?,
        }),
        "Rectangle" => Geometry::Rectangle(Rectangle {
            center: t.vec3("center")?,
            width: t.f64("width")?,
            height: t.f64("height")?,
            rotation: t.rotation()?,
        }),
        "Cone" | "Cylinder" => {
            let round = Round {
                center: t.vec3("center")?,
                radius: t.f64("radius")?,
                height: t.f64("height")?,
                rotation: t.rotation()?,
                divisions: t.opt_u32("divisions")?,
            };
            if keyword == "Cone" {
                Geometry::Cone(round)
            } else {
                Geometry::Cylinder(round)
            }
        }
        "Oval" => Geometry::Oval(Oval {
            center: t.vec3("center")?,
            major: t.f64("major radius")?,
            minor: t.f64("minor radius")?,
            rotation: t.rotation()?,
            divisions: t.opt_u32("divisions")?,
        }),
        "Sphere" => Geometry::Sphere(Sphere {
            center: t.vec3("center")?,
            radius: t.f64("radius")?,
            rotation: t.rotation()?,
            divisions: t.opt_u32("divisions")?,
        }),
        "Triangle" => Geometry::Triangle(Triangle {
            vertices: [t.vec3("vertex")?, t.vec3("vertex")?, t.vec3("vertex")?],
        }),
        "Text" => Geometry::Label(Label {
            at: t.vec3("position")?,
            rotation: t.rotation()?,
            font_size: t.opt_f64("font size")?,
            color: t.color("text color")?,
            text: text.ok_or("missing quoted text")?.to_string(),
        }),
        "Drone" => {
            let id = t.usize("drone id")?;
            let id = u8::try_from(id).map_err(|_| format!("drone id {id} out of range"))?;
            let at = t.vec3("position")?;
            let radius = t.f64("radius")?;
            let height = t.f64("height")?;
            let rotation = t.rotation()?;
            let rotor = t.color("rotor color")?;
            let rotor_specular = t.color("rotor specular color")?;
            Geometry::Drone(Drone {
                id,
                at,
                radius,
                height,
                rotation,
                rotor_material: rotor.map(|diffuse| Material {
                    diffuse,
                    specular: rotor_specular,
                }),
            })
        }
        other => return Err(format!("unknown record `{other}`")),
    };
    let style = t.style()?;
    Ok(Some(Record::Primitive(Primitive { geometry, style })))
}

/// Reads records into `scene`. Bad lines are reported and skipped; only a
/// failing stream aborts the read.
pub fn read_scene(reader: impl BufRead, scene: &mut Scene) -> Result<ReadReport, SceneError> {
    let mut report = ReadReport::default();
    let mut started = false;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        report.lines = lineno;
        let record = match parse_record(&line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(message) => {
                let err = SceneError::FileFormat {
                    line: lineno,
                    message,
                };
                warn!("{err}");
                report.warnings.push(Warning::new("file_format", err.to_string()));
                continue;
            }
        };
        match record {
            Record::Group => {
                let reuse = !started
                    && scene.building_index() + 1 == scene.views().len()
                    && scene
                        .view(scene.building_index())
                        .is_some_and(|v| v.draw_list.is_empty());
                if !reuse {
                    scene.advance_sequence();
                }
                scene.focus_building();
                started = true;
                report.groups += 1;
            }
            Record::View(settings) => scene.set_settings(settings),
            Record::Camera(c) => scene.set_camera(c),
            Record::Origin(o) => scene.set_origin(o),
            Record::Range(r) => {
                if let Err(err) = scene.set_range(r) {
                    report.warnings.push(Warning::new("range", err.to_string()));
                }
            }
            Record::Color(m) => scene.defaults_mut().material = m,
            Record::Primitive(p) => {
                // Logged even when it no longer builds, so the list survives a round trip.
                scene.restore(p);
                report.primitives += 1;
            }
        }
    }
    debug!(
        groups = report.groups,
        primitives = report.primitives,
        "scene read"
    );
    Ok(report)
}

pub fn load_scene(path: &Path, scene: &mut Scene) -> Result<ReadReport, SceneError> {
    let file = std::fs::File::open(path)?;
    read_scene(std::io::BufReader::new(file), scene)
}
