//! Axis identifiers and axis definitions

use crate::naming;
use crate::PlotlinksError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Direction of a coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    X,
    Y,
    Z,
}

impl AxisKind {
    pub const ALL: [AxisKind; 3] = [AxisKind::X, AxisKind::Y, AxisKind::Z];

    pub fn letter(self) -> char {
        match self {
            AxisKind::X => 'x',
            AxisKind::Y => 'y',
            AxisKind::Z => 'z',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'x' => Some(AxisKind::X),
            'y' => Some(AxisKind::Y),
            'z' => Some(AxisKind::Z),
            _ => None,
        }
    }

    /// The axis a definition of this kind is anchored against.
    pub fn perpendicular(self) -> AxisKind {
        match self {
            AxisKind::X => AxisKind::Y,
            AxisKind::Y | AxisKind::Z => AxisKind::X,
        }
    }

    /// Side an axis sits on when its definition does not say.
    pub fn default_side(self) -> Side {
        match self {
            AxisKind::Y => Side::Left,
            AxisKind::X | AxisKind::Z => Side::Bottom,
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Identifier of one axis: kind plus 1-based index (`x1`, `y2`, ...)
///
/// Parsing accepts every spelling found in chart specifications
/// (`x`, `x2`, `xaxis`, `xaxis2`); display always yields the suffixed
/// reference form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisId {
    pub kind: AxisKind,
    pub index: u32,
}

impl AxisId {
    pub fn new(kind: AxisKind, index: u32) -> Self {
        Self {
            kind,
            index: index.max(1),
        }
    }

    /// The first axis of a kind (`x1`, `y1`, `z1`)
    pub fn primary(kind: AxisKind) -> Self {
        Self::new(kind, 1)
    }

    pub fn x(index: u32) -> Self {
        Self::new(AxisKind::X, index)
    }

    pub fn y(index: u32) -> Self {
        Self::new(AxisKind::Y, index)
    }

    /// Layout key holding this axis' definition (`xaxis1`)
    pub fn key(&self) -> String {
        naming::axis_key(self.kind.letter(), self.index)
    }

    /// Parse any axis spelling, returning `None` for non-axis names
    pub fn parse(name: &str) -> Option<Self> {
        let (letter, index) = naming::parse_axis_name(name)?;
        Some(Self::new(AxisKind::from_letter(letter)?, index))
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", naming::axis_ref(self.kind.letter(), self.index))
    }
}

impl FromStr for AxisId {
    type Err = PlotlinksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AxisId::parse(s).ok_or_else(|| PlotlinksError::AxisNotFound(s.to_string()))
    }
}

impl Serialize for AxisId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AxisId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Side of the plotting area an axis is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = PlotlinksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            other => Err(PlotlinksError::ValidationError(format!(
                "invalid side '{}'. Expected one of: left, right, top, bottom",
                other
            ))),
        }
    }
}

/// Fractional `[low, high]` range of the canvas an axis occupies
///
/// Domains compare by exact value (`f64::total_cmp`), so two axes are on
/// the same domain only if both bounds are bit-for-bit equal numbers.
#[derive(Debug, Clone, Copy)]
pub struct Domain {
    pub low: f64,
    pub high: f64,
}

impl Domain {
    pub const FULL: Domain = Domain {
        low: 0.0,
        high: 1.0,
    };

    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Read a `[low, high]` JSON array
    pub fn from_value(value: &Value) -> Option<Self> {
        let arr = value.as_array()?;
        if arr.len() != 2 {
            return None;
        }
        Some(Self::new(arr[0].as_f64()?, arr[1].as_f64()?))
    }

    pub fn to_value(&self) -> Value {
        json!([self.low, self.high])
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain::FULL
    }
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Domain {}

impl PartialOrd for Domain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Domain {
    fn cmp(&self, other: &Self) -> Ordering {
        self.low
            .total_cmp(&other.low)
            .then_with(|| self.high.total_cmp(&other.high))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// One axis definition from a layout
///
/// The keys that take part in axis composition are lifted into typed
/// fields; everything else (fonts, grid colours, ranges, ...) stays in
/// `properties` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct AxisDef {
    pub domain: Option<Domain>,
    pub side: Option<Side>,
    /// Perpendicular axis this axis is pinned to
    pub anchor: Option<AxisId>,
    /// Same-direction axis whose canvas space this axis shares
    pub overlaying: Option<AxisId>,
    pub title: Option<String>,
    pub properties: Map<String, Value>,
}

impl AxisDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, low: f64, high: f64) -> Self {
        self.domain = Some(Domain::new(low, high));
        self
    }

    pub fn with_anchor(mut self, anchor: AxisId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn domain_or_default(&self) -> Domain {
        self.domain.unwrap_or_default()
    }

    pub fn side_or_default(&self, kind: AxisKind) -> Side {
        self.side.unwrap_or_else(|| kind.default_side())
    }

    /// Replace the title, including any structured title object.
    pub fn set_title(&mut self, title: &str) {
        self.properties.remove("title");
        self.title = Some(title.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property; typed keys are routed to their fields.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut single = Map::new();
        single.insert(key.to_string(), value);
        let parsed = AxisDef::from(single);
        self.properties.remove(key);
        match key {
            "domain" => self.domain = parsed.domain,
            "side" => self.side = parsed.side,
            "anchor" => self.anchor = parsed.anchor,
            "overlaying" => self.overlaying = parsed.overlaying,
            "title" => self.title = parsed.title,
            _ => {}
        }
        self.properties.extend(parsed.properties);
    }

    /// Copy styling from another definition, leaving placement alone.
    ///
    /// Domain, anchor, side and overlaying describe where an axis sits in a
    /// grid and are never overwritten by this call.
    pub fn apply_style(&mut self, style: &AxisDef) {
        for (k, v) in &style.properties {
            self.properties.insert(k.clone(), v.clone());
        }
        if let Some(title) = &style.title {
            if !title.is_empty() {
                self.title = Some(title.clone());
            }
        }
    }
}

impl From<Map<String, Value>> for AxisDef {
    fn from(map: Map<String, Value>) -> Self {
        let mut def = AxisDef::default();
        for (key, value) in map {
            match key.as_str() {
                "domain" => match Domain::from_value(&value) {
                    Some(domain) => def.domain = Some(domain),
                    None => {
                        def.properties.insert(key, value);
                    }
                },
                "side" => match value.as_str().and_then(|s| s.parse::<Side>().ok()) {
                    Some(side) => def.side = Some(side),
                    None => {
                        def.properties.insert(key, value);
                    }
                },
                "anchor" => match value.as_str().and_then(AxisId::parse) {
                    Some(id) => def.anchor = Some(id),
                    None => {
                        def.properties.insert(key, value);
                    }
                },
                "overlaying" => match value.as_str().and_then(AxisId::parse) {
                    Some(id) => def.overlaying = Some(id),
                    None => {
                        def.properties.insert(key, value);
                    }
                },
                "title" => match value.as_str() {
                    Some(title) => def.title = Some(title.to_string()),
                    None => {
                        def.properties.insert(key, value);
                    }
                },
                _ => {
                    def.properties.insert(key, value);
                }
            }
        }
        def
    }
}

impl From<AxisDef> for Map<String, Value> {
    fn from(def: AxisDef) -> Self {
        let mut map = def.properties;
        if let Some(domain) = def.domain {
            map.insert("domain".to_string(), domain.to_value());
        }
        if let Some(side) = def.side {
            map.insert("side".to_string(), json!(side.as_str()));
        }
        if let Some(anchor) = def.anchor {
            map.insert("anchor".to_string(), json!(anchor.to_string()));
        }
        if let Some(overlaying) = def.overlaying {
            map.insert("overlaying".to_string(), json!(overlaying.to_string()));
        }
        if let Some(title) = def.title {
            map.insert("title".to_string(), json!(title));
        }
        map
    }
}

impl From<AxisDef> for Value {
    fn from(def: AxisDef) -> Self {
        Value::Object(def.into())
    }
}
