//! Traces: one series of data drawn against a pair of axes

use super::axis::{AxisId, AxisKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Trace types positioned by a `domain` box instead of cartesian axes
pub const DOMAIN_TRACE_TYPES: &[&str] = &[
    "pie",
    "sunburst",
    "treemap",
    "icicle",
    "funnelarea",
    "sankey",
    "table",
    "indicator",
    "parcoords",
    "parcats",
];

/// Trace types drawn inside a 3-D scene
pub const SCENE_TRACE_TYPES: &[&str] = &[
    "scatter3d",
    "surface",
    "mesh3d",
    "cone",
    "streamtube",
    "volume",
    "isosurface",
];

/// A single trace of a chart specification.
///
/// `xaxis`/`yaxis` hold the axis references when they are present; a trace
/// without them is drawn on `x1`/`y1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Trace {
    pub name: Option<String>,
    /// Trace type (`scatter`, `bar`, `pie`, ...)
    pub kind: Option<String>,
    pub xaxis: Option<AxisId>,
    pub yaxis: Option<AxisId>,
    pub properties: Map<String, Value>,
}

impl Trace {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn on(mut self, axis: AxisId) -> Self {
        self.bind(axis);
        self
    }

    /// Name used for lookups; unnamed traces answer to `""`.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn kind_or_default(&self) -> &str {
        self.kind.as_deref().unwrap_or("scatter")
    }

    pub fn x_ref(&self) -> AxisId {
        self.xaxis.unwrap_or(AxisId::x(1))
    }

    pub fn y_ref(&self) -> AxisId {
        self.yaxis.unwrap_or(AxisId::y(1))
    }

    /// Reference for the given kind. Z never appears on a trace.
    pub fn axis_ref(&self, kind: AxisKind) -> Option<AxisId> {
        match kind {
            AxisKind::X => Some(self.x_ref()),
            AxisKind::Y => Some(self.y_ref()),
            AxisKind::Z => None,
        }
    }

    /// Point the trace at an axis of the id's kind.
    pub fn bind(&mut self, axis: AxisId) {
        match axis.kind {
            AxisKind::X => self.xaxis = Some(axis),
            AxisKind::Y => self.yaxis = Some(axis),
            AxisKind::Z => {}
        }
    }

    pub fn is_domain_based(&self) -> bool {
        DOMAIN_TRACE_TYPES.contains(&self.kind_or_default())
    }

    pub fn is_scene_based(&self) -> bool {
        SCENE_TRACE_TYPES.contains(&self.kind_or_default())
    }

    pub fn is_cartesian(&self) -> bool {
        !self.is_domain_based() && !self.is_scene_based()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        match (key, &value) {
            ("name", Value::String(s)) => self.name = Some(s.clone()),
            ("type", Value::String(s)) => self.kind = Some(s.clone()),
            ("xaxis", Value::String(s)) if AxisId::parse(s).map(|a| a.kind) == Some(AxisKind::X) => {
                self.xaxis = AxisId::parse(s)
            }
            ("yaxis", Value::String(s)) if AxisId::parse(s).map(|a| a.kind) == Some(AxisKind::Y) => {
                self.yaxis = AxisId::parse(s)
            }
            _ => {
                self.properties.insert(key.to_string(), value);
            }
        }
    }

    /// Set a nested property such as `marker.color`, creating objects on
    /// the way.
    pub fn set_path(&mut self, path: &[&str], value: Value) {
        match path {
            [] => {}
            [key] => self.set(key, value),
            [head, rest @ ..] => {
                let entry = self
                    .properties
                    .entry(head.to_string())
                    .or_insert_with(|| json!({}));
                insert_path(entry, rest, value);
            }
        }
    }
}

fn insert_path(target: &mut Value, path: &[&str], value: Value) {
    if !target.is_object() {
        *target = json!({});
    }
    let Value::Object(obj) = target else {
        return;
    };
    match path {
        [] => {}
        [key] => {
            obj.insert(key.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = obj.entry(head.to_string()).or_insert_with(|| json!({}));
            insert_path(entry, rest, value);
        }
    }
}

impl From<Map<String, Value>> for Trace {
    fn from(map: Map<String, Value>) -> Self {
        let mut trace = Trace::default();
        for (key, value) in map {
            trace.set(&key, value);
        }
        trace
    }
}

impl From<Trace> for Map<String, Value> {
    fn from(trace: Trace) -> Self {
        let mut map = trace.properties;
        if let Some(kind) = trace.kind {
            map.insert("type".to_string(), json!(kind));
        }
        if let Some(name) = trace.name {
            map.insert("name".to_string(), json!(name));
        }
        if let Some(x) = trace.xaxis {
            map.insert("xaxis".to_string(), json!(x.to_string()));
        }
        if let Some(y) = trace.yaxis {
            map.insert("yaxis".to_string(), json!(y.to_string()));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_from_json() {
        let trace: Trace = serde_json::from_value(json!({
            "type": "bar",
            "name": "sales",
            "x": [1, 2, 3],
            "y": [4, 5, 6],
            "yaxis": "y2"
        }))
        .unwrap();
        assert_eq!(trace.kind.as_deref(), Some("bar"));
        assert_eq!(trace.name_or_empty(), "sales");
        assert_eq!(trace.x_ref(), AxisId::x(1));
        assert_eq!(trace.y_ref(), AxisId::y(2));
        assert_eq!(trace.get("x"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn test_trace_serializes_suffixed_refs() {
        let trace = Trace::new("scatter").with_name("a").on(AxisId::y(1));
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!({"type": "scatter", "name": "a", "yaxis": "y1"})
        );
    }

    #[test]
    fn test_domain_based_types() {
        assert!(Trace::new("pie").is_domain_based());
        assert!(!Trace::new("bar").is_domain_based());
        assert!(Trace::new("surface").is_scene_based());
        assert!(Trace::default().is_cartesian());
    }

    #[test]
    fn test_mismatched_axis_kind_stays_in_properties() {
        let trace: Trace = serde_json::from_value(json!({"xaxis": "y2"})).unwrap();
        assert_eq!(trace.xaxis, None);
        assert_eq!(trace.get("xaxis"), Some(&json!("y2")));
    }

    #[test]
    fn test_set_path_creates_objects() {
        let mut trace = Trace::new("scatter");
        trace.set_path(&["marker", "line", "color"], json!("#fff"));
        trace.set_path(&["marker", "size"], json!(4));
        assert_eq!(
            trace.get("marker"),
            Some(&json!({"line": {"color": "#fff"}, "size": 4}))
        );
    }
}
