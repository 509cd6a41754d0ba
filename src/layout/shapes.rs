//! Reference lines, spans and free-form shapes

use crate::color::{normalize, to_rgba};
use crate::{PlotlinksError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Opacity of spans given as a bare `(start, end)` pair
const SPAN_OPACITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Line,
    Rect,
    Circle,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
        }
    }
}

/// A shape coordinate: a number, or a date/category string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Number(f64),
    Text(String),
}

impl Coord {
    pub fn to_value(&self) -> Value {
        match self {
            Coord::Number(n) => json!(n),
            Coord::Text(s) => json!(s),
        }
    }
}

impl From<f64> for Coord {
    fn from(value: f64) -> Self {
        Coord::Number(value)
    }
}

impl From<&str> for Coord {
    fn from(value: &str) -> Self {
        Coord::Text(value.to_string())
    }
}

/// Description of one shape
///
/// `x` is shorthand for `x0 == x1` (and `y` likewise). An axis with no
/// coordinate at all spans the whole paper in that direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub x: Option<Coord>,
    pub y: Option<Coord>,
    pub x0: Option<Coord>,
    pub y0: Option<Coord>,
    pub x1: Option<Coord>,
    pub y1: Option<Coord>,
    pub color: String,
    pub dash: String,
    pub width: f64,
    pub fillcolor: Option<String>,
    pub fill: bool,
    pub opacity: f64,
    pub xref: String,
    pub yref: String,
}

impl Default for ShapeSpec {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Line,
            x: None,
            y: None,
            x0: None,
            y0: None,
            x1: None,
            y1: None,
            color: "red".to_string(),
            dash: "solid".to_string(),
            width: 1.0,
            fillcolor: None,
            fill: false,
            opacity: 1.0,
            xref: "x".to_string(),
            yref: "y".to_string(),
        }
    }
}

impl ShapeSpec {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn hline(y: impl Into<Coord>) -> Self {
        Self {
            y: Some(y.into()),
            ..Self::new(ShapeKind::Line)
        }
    }

    pub fn vline(x: impl Into<Coord>) -> Self {
        Self {
            x: Some(x.into()),
            ..Self::new(ShapeKind::Line)
        }
    }

    pub fn hspan(y0: impl Into<Coord>, y1: impl Into<Coord>) -> Self {
        Self {
            y0: Some(y0.into()),
            y1: Some(y1.into()),
            fill: true,
            opacity: SPAN_OPACITY,
            ..Self::new(ShapeKind::Rect)
        }
    }

    pub fn vspan(x0: impl Into<Coord>, x1: impl Into<Coord>) -> Self {
        Self {
            x0: Some(x0.into()),
            x1: Some(x1.into()),
            fill: true,
            opacity: SPAN_OPACITY,
            ..Self::new(ShapeKind::Rect)
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }
}

/// Resolve one axis' `(ref, start, end)` for a shape.
fn resolve_extent(
    single: &Option<Coord>,
    start: &Option<Coord>,
    end: &Option<Coord>,
    reference: &str,
) -> (String, Value, Value) {
    match (start, end, single) {
        (_, Some(end), _) => {
            let start = start.as_ref().unwrap_or(end);
            (reference.to_string(), start.to_value(), end.to_value())
        }
        (Some(start), None, _) => (reference.to_string(), start.to_value(), start.to_value()),
        (None, None, Some(at)) => (reference.to_string(), at.to_value(), at.to_value()),
        (None, None, None) => ("paper".to_string(), json!(0), json!(1)),
    }
}

/// Build a plotly shape.
pub fn get_shape(spec: &ShapeSpec) -> Result<Value> {
    let (xref, x0, x1) = resolve_extent(&spec.x, &spec.x0, &spec.x1, &spec.xref);
    let (yref, y0, y1) = resolve_extent(&spec.y, &spec.y0, &spec.y1, &spec.yref);

    let mut shape = json!({
        "type": spec.kind.as_str(),
        "x0": x0,
        "y0": y0,
        "x1": x1,
        "y1": y1,
        "line": {
            "color": normalize(&spec.color)?,
            "width": spec.width,
            "dash": spec.dash
        },
        "xref": xref,
        "yref": yref
    });

    if (spec.fill || spec.fillcolor.is_some()) && spec.kind != ShapeKind::Line {
        let fill = spec.fillcolor.as_deref().unwrap_or(&spec.color);
        shape["fillcolor"] = json!(to_rgba(&normalize(fill)?, spec.opacity)?);
    }
    Ok(shape)
}

/// A horizontal or vertical reference line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceLine {
    At(Coord),
    Spec(ShapeSpec),
}

/// A horizontal or vertical shaded band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Span {
    Range(Coord, Coord),
    Spec(ShapeSpec),
}

/// Shapes requested for a layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    pub hline: Vec<ReferenceLine>,
    pub vline: Vec<ReferenceLine>,
    pub hspan: Vec<Span>,
    pub vspan: Vec<Span>,
    /// Raw shape objects: passed through when they carry `type`, otherwise
    /// read as a [`ShapeSpec`].
    pub shapes: Vec<Value>,
}

#[derive(Clone, Copy)]
enum Orientation {
    Horizontal,
    Vertical,
}

fn malformed(message: String) -> PlotlinksError {
    PlotlinksError::MalformedShape(message)
}

impl ShapeOptions {
    pub fn is_empty(&self) -> bool {
        self.hline.is_empty()
            && self.vline.is_empty()
            && self.hspan.is_empty()
            && self.vspan.is_empty()
            && self.shapes.is_empty()
    }

    /// Build every requested shape, failing on the first malformed one.
    pub fn build(&self) -> Result<Vec<Value>> {
        let mut shapes = Vec::new();
        for line in &self.hline {
            shapes.push(line_shape(line, Orientation::Horizontal)?);
        }
        for line in &self.vline {
            shapes.push(line_shape(line, Orientation::Vertical)?);
        }
        for span in &self.hspan {
            shapes.push(span_shape(span, Orientation::Horizontal)?);
        }
        for span in &self.vspan {
            shapes.push(span_shape(span, Orientation::Vertical)?);
        }
        for raw in &self.shapes {
            shapes.push(raw_shape(raw)?);
        }
        Ok(shapes)
    }
}

fn line_shape(line: &ReferenceLine, orientation: Orientation) -> Result<Value> {
    match (line, orientation) {
        (ReferenceLine::At(at), Orientation::Horizontal) => get_shape(&ShapeSpec::hline(at.clone())),
        (ReferenceLine::At(at), Orientation::Vertical) => get_shape(&ShapeSpec::vline(at.clone())),
        (ReferenceLine::Spec(spec), Orientation::Horizontal) => {
            if spec.y.is_none() && spec.y0.is_none() {
                return Err(malformed("hline needs 'y' or 'y0'".to_string()));
            }
            get_shape(&ShapeSpec {
                kind: ShapeKind::Line,
                ..spec.clone()
            })
        }
        (ReferenceLine::Spec(spec), Orientation::Vertical) => {
            if spec.x.is_none() && spec.x0.is_none() {
                return Err(malformed("vline needs 'x' or 'x0'".to_string()));
            }
            get_shape(&ShapeSpec {
                kind: ShapeKind::Line,
                ..spec.clone()
            })
        }
    }
}

fn span_shape(span: &Span, orientation: Orientation) -> Result<Value> {
    match (span, orientation) {
        (Span::Range(v0, v1), Orientation::Horizontal) => {
            get_shape(&ShapeSpec::hspan(v0.clone(), v1.clone()))
        }
        (Span::Range(v0, v1), Orientation::Vertical) => {
            get_shape(&ShapeSpec::vspan(v0.clone(), v1.clone()))
        }
        (Span::Spec(spec), Orientation::Horizontal) => {
            if spec.y0.is_none() || spec.y1.is_none() {
                return Err(malformed("hspan needs 'y0' and 'y1'".to_string()));
            }
            get_shape(&ShapeSpec {
                kind: ShapeKind::Rect,
                ..spec.clone()
            })
        }
        (Span::Spec(spec), Orientation::Vertical) => {
            if spec.x0.is_none() || spec.x1.is_none() {
                return Err(malformed("vspan needs 'x0' and 'x1'".to_string()));
            }
            get_shape(&ShapeSpec {
                kind: ShapeKind::Rect,
                ..spec.clone()
            })
        }
    }
}

fn raw_shape(raw: &Value) -> Result<Value> {
    let Some(map) = raw.as_object() else {
        return Err(malformed(format!(
            "shapes need to be objects, got {}",
            raw
        )));
    };
    if map.contains_key("type") {
        return Ok(raw.clone());
    }
    let spec: ShapeSpec = serde_json::from_value(Value::Object(map.clone()))
        .map_err(|e| malformed(e.to_string()))?;
    get_shape(&spec)
}

/// Paper-referenced annotation styled with theme colors.
pub fn styled_annotation(annotation: &Value, fontcolor: &str, arrowcolor: &str) -> Value {
    let mut map = annotation.as_object().cloned().unwrap_or_else(Map::new);
    map.insert("arrowcolor".to_string(), json!(arrowcolor));
    let mut font = map
        .get("font")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    font.insert("color".to_string(), json!(fontcolor));
    map.insert("font".to_string(), Value::Object(font));
    Value::Object(map)
}
