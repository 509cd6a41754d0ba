//! Chart specification model
//!
//! A [`Figure`] is the plotly-style pair of a trace list and a layout. The
//! keys that axis composition needs (axis references on traces, axis
//! definitions and scenes in the layout) are typed; everything else is kept
//! as raw JSON so a specification survives a load/save cycle unchanged.

mod axis;
mod layout;
mod trace;

pub use axis::{AxisDef, AxisId, AxisKind, Domain, Side};
pub use layout::{Layout, Scene};
pub use trace::{Trace, DOMAIN_TRACE_TYPES, SCENE_TRACE_TYPES};

use crate::{PlotlinksError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete chart specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    #[serde(default)]
    pub data: Vec<Trace>,
    #[serde(default)]
    pub layout: Layout,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self { data, layout }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            PlotlinksError::ValidationError(format!("Failed to parse chart specification: {}", e))
        })
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            PlotlinksError::ValidationError(format!("Failed to parse chart specification: {}", e))
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| PlotlinksError::RenderError(format!("Failed to serialize figure: {}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PlotlinksError::RenderError(format!("Failed to serialize figure: {}", e)))
    }

    /// Position of the first trace with this name (`""` for unnamed).
    pub fn trace_position(&self, name: &str) -> Option<usize> {
        self.data.iter().position(|t| t.name_or_empty() == name)
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.data.iter().find(|t| t.name_or_empty() == name)
    }

    pub fn trace_names(&self) -> Vec<&str> {
        self.data.iter().map(|t| t.name_or_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_figure_roundtrip_preserves_unknown_keys() {
        let input = json!({
            "data": [
                {"type": "scatter", "name": "a", "x": [1, 2], "y": [3, 4], "xaxis": "x1", "yaxis": "y1",
                 "line": {"width": 1.3}}
            ],
            "layout": {
                "xaxis1": {"domain": [0.0, 1.0], "anchor": "y1", "gridcolor": "#E1E5ED"},
                "yaxis1": {"domain": [0.0, 1.0], "anchor": "x1"},
                "paper_bgcolor": "#F5F6F9"
            }
        });
        let fig = Figure::from_value(input.clone()).unwrap();
        assert_eq!(fig.to_value().unwrap(), input);
    }

    #[test]
    fn test_figure_defaults_missing_sections() {
        let fig = Figure::from_json("{}").unwrap();
        assert!(fig.data.is_empty());
        assert!(fig.layout.axes.is_empty());
    }

    #[test]
    fn test_trace_lookup_by_name() {
        let fig = Figure::new(
            vec![Trace::new("bar").with_name("a"), Trace::new("bar")],
            Layout::new(),
        );
        assert_eq!(fig.trace_position("a"), Some(0));
        assert_eq!(fig.trace_position(""), Some(1));
        assert_eq!(fig.trace_names(), vec!["a", ""]);
        assert!(fig.trace("b").is_none());
    }

    #[test]
    fn test_invalid_json_is_validation_error() {
        let err = Figure::from_json("{not json").unwrap_err();
        assert!(matches!(err, PlotlinksError::ValidationError(_)));
    }
}
