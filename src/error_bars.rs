//! Error bars and continuous error bands

use crate::axis::trace_index;
use crate::color::{normalize, to_rgba};
use crate::figure::{AxisKind, Figure, Trace};
use crate::{PlotlinksError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Color of a continuous band when neither the caller nor the trace line
/// sets one.
const BAND_COLOR: &str = "charcoal";

/// How error values are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Absolute values, one per point or one for all
    #[default]
    Data,
    Constant,
    Percent,
    Sqrt,
    /// Filled band around the trace, absolute offsets
    Continuous,
    /// Filled band around the trace, offsets in percent
    ContinuousPercent,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Data => "data",
            ErrorKind::Constant => "constant",
            ErrorKind::Percent => "percent",
            ErrorKind::Sqrt => "sqrt",
            ErrorKind::Continuous => "continuous",
            ErrorKind::ContinuousPercent => "continuous_percent",
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, ErrorKind::Continuous | ErrorKind::ContinuousPercent)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = PlotlinksError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "data" => Ok(ErrorKind::Data),
            "constant" => Ok(ErrorKind::Constant),
            "percent" => Ok(ErrorKind::Percent),
            "sqrt" => Ok(ErrorKind::Sqrt),
            "continuous" => Ok(ErrorKind::Continuous),
            "continuous_percent" => Ok(ErrorKind::ContinuousPercent),
            other => Err(PlotlinksError::InvalidErrorBar(format!(
                "unknown error type '{}'",
                other
            ))),
        }
    }
}

/// One value for every point, or one value per point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorValues {
    Scalar(f64),
    Array(Vec<f64>),
}

impl ErrorValues {
    fn at(&self, i: usize) -> Option<f64> {
        match self {
            ErrorValues::Scalar(v) => Some(*v),
            ErrorValues::Array(values) => values.get(i).copied(),
        }
    }
}

impl From<f64> for ErrorValues {
    fn from(value: f64) -> Self {
        ErrorValues::Scalar(value)
    }
}

impl From<Vec<f64>> for ErrorValues {
    fn from(values: Vec<f64>) -> Self {
        ErrorValues::Array(values)
    }
}

/// Error bar request for [`set_errors`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBar {
    /// `X` or `Y`
    pub axis: AxisKind,
    pub kind: ErrorKind,
    pub values: Option<ErrorValues>,
    /// Lower values for asymmetric `data` errors, same shape as `values`
    pub values_minus: Option<ErrorValues>,
    pub color: Option<String>,
    pub thickness: f64,
    /// Bar cap width, or band line width for continuous errors
    pub width: Option<f64>,
    pub opacity: Option<f64>,
}

impl Default for ErrorBar {
    fn default() -> Self {
        Self {
            axis: AxisKind::Y,
            kind: ErrorKind::Data,
            values: None,
            values_minus: None,
            color: None,
            thickness: 1.0,
            width: None,
            opacity: None,
        }
    }
}

impl ErrorBar {
    pub fn new(kind: ErrorKind, values: impl Into<ErrorValues>) -> Self {
        Self {
            kind,
            values: Some(values.into()),
            ..Default::default()
        }
    }

    pub fn sqrt() -> Self {
        Self {
            kind: ErrorKind::Sqrt,
            ..Default::default()
        }
    }

    pub fn with_minus(mut self, values: impl Into<ErrorValues>) -> Self {
        self.values_minus = Some(values.into());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn on_axis(mut self, axis: AxisKind) -> Self {
        self.axis = axis;
        self
    }

    fn require_values(&self) -> Result<&ErrorValues> {
        self.values.as_ref().ok_or_else(|| {
            PlotlinksError::InvalidErrorBar(format!("'{}' errors need values", self.kind))
        })
    }
}

/// Build the `error_x`/`error_y` object for discrete error kinds.
pub fn get_error_bar(bar: &ErrorBar) -> Result<Value> {
    let mut error = Map::new();
    match bar.kind {
        ErrorKind::Data => match (bar.require_values()?, &bar.values_minus) {
            (ErrorValues::Array(values), minus) => {
                if let Some(minus) = minus {
                    let ErrorValues::Array(minus) = minus else {
                        return Err(PlotlinksError::InvalidErrorBar(
                            "values and values_minus must both be arrays or both scalars"
                                .to_string(),
                        ));
                    };
                    if minus.len() != values.len() {
                        return Err(PlotlinksError::InvalidErrorBar(format!(
                            "values has {} entries but values_minus has {}",
                            values.len(),
                            minus.len()
                        )));
                    }
                    error.insert("symmetric".into(), json!(false));
                    error.insert("arrayminus".into(), json!(minus));
                }
                error.insert("array".into(), json!(values));
            }
            (ErrorValues::Scalar(value), minus) => {
                if let Some(minus) = minus {
                    let ErrorValues::Scalar(minus) = minus else {
                        return Err(PlotlinksError::InvalidErrorBar(
                            "values and values_minus must both be arrays or both scalars"
                                .to_string(),
                        ));
                    };
                    error.insert("symmetric".into(), json!(false));
                    error.insert("valueminus".into(), json!(minus));
                }
                error.insert("value".into(), json!(value));
            }
        },
        ErrorKind::Constant | ErrorKind::Percent => match bar.require_values()? {
            ErrorValues::Scalar(value) => {
                error.insert("value".into(), json!(value));
            }
            ErrorValues::Array(_) => {
                return Err(PlotlinksError::InvalidErrorBar(format!(
                    "'{}' errors take a single value",
                    bar.kind
                )))
            }
        },
        ErrorKind::Sqrt => {}
        ErrorKind::Continuous | ErrorKind::ContinuousPercent => {
            return Err(PlotlinksError::InvalidErrorBar(format!(
                "'{}' errors are drawn as bands, not bars",
                bar.kind
            )))
        }
    }

    error.insert("type".into(), json!(bar.kind.as_str()));
    error.insert("thickness".into(), json!(bar.thickness));
    error.insert("width".into(), json!(bar.width.unwrap_or(5.0)));
    error.insert("visible".into(), json!(true));
    error.insert("opacity".into(), json!(bar.opacity.unwrap_or(1.0)));
    if let Some(color) = &bar.color {
        error.insert("color".into(), json!(normalize(color)?));
    }
    Ok(Value::Object(error))
}

/// Add error bars to one trace (by name) or to every trace.
///
/// Works on a copy. Discrete kinds set `error_x`/`error_y` on the traces;
/// continuous kinds append an upper line and a filled lower band per trace,
/// drawn on the trace's axes.
pub fn set_errors(fig: &Figure, trace: Option<&str>, bar: &ErrorBar) -> Result<Figure> {
    if bar.axis == AxisKind::Z {
        return Err(PlotlinksError::InvalidErrorBar(
            "error bars are drawn on the x or y axis".to_string(),
        ));
    }

    let mut fig = fig.clone();
    let targets: Vec<usize> = match trace {
        Some(name) => vec![*trace_index(&fig)
            .get(name)
            .ok_or_else(|| PlotlinksError::TraceNotFound(name.to_string()))?],
        None => (0..fig.data.len()).collect(),
    };

    if bar.kind.is_continuous() {
        let mut bands = Vec::new();
        for i in targets {
            let (upper, lower) = band_traces(&fig.data[i], bar)?;
            bands.push(upper);
            bands.push(lower);
        }
        fig.data.extend(bands);
    } else {
        let error = get_error_bar(bar)?;
        let key = format!("error_{}", bar.axis.letter());
        for i in targets {
            fig.data[i].set(&key, error.clone());
        }
    }
    Ok(fig)
}

fn numbers(trace: &Trace, key: &str) -> Result<Vec<f64>> {
    let name = trace.name_or_empty();
    let values = trace.get(key).and_then(Value::as_array).ok_or_else(|| {
        PlotlinksError::InvalidErrorBar(format!("trace '{}' has no '{}' values", name, key))
    })?;
    values
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                PlotlinksError::InvalidErrorBar(format!(
                    "trace '{}' has a non-numeric '{}' value: {}",
                    name, key, v
                ))
            })
        })
        .collect()
}

/// Upper line and filled lower band around one trace.
fn band_traces(trace: &Trace, bar: &ErrorBar) -> Result<(Trace, Trace)> {
    let values = bar.require_values()?;
    let y = numbers(trace, "y")?;
    if let ErrorValues::Array(offsets) = values {
        if offsets.len() != y.len() {
            return Err(PlotlinksError::InvalidErrorBar(format!(
                "trace '{}' has {} points but {} error values were given",
                trace.name_or_empty(),
                y.len(),
                offsets.len()
            )));
        }
    }

    let percent = bar.kind == ErrorKind::ContinuousPercent;
    let mut up = Vec::with_capacity(y.len());
    let mut down = Vec::with_capacity(y.len());
    for (i, v) in y.iter().enumerate() {
        let offset = values.at(i).unwrap_or(0.0);
        if percent {
            up.push(v * (1.0 + offset / 100.0));
            down.push(v * (1.0 - offset / 100.0));
        } else {
            up.push(v + offset);
            down.push(v - offset);
        }
    }

    let color = match &bar.color {
        Some(color) => normalize(color)?,
        None => match trace.get("line").and_then(|l| l.get("color")).and_then(Value::as_str) {
            Some(color) => color.to_string(),
            None => normalize(BAND_COLOR)?,
        },
    };
    let prefix = trace
        .name
        .as_deref()
        .map(|n| format!("{}_", n))
        .unwrap_or_default();

    let mut upper = Trace::new("scatter")
        .with_name(&format!("{}upper", prefix))
        .with("mode", json!("lines"))
        .with("showlegend", json!(false))
        .with("line", json!({"width": bar.width.unwrap_or(0.5), "color": color}))
        .with("y", json!(up));
    if let Some(x) = trace.get("x") {
        upper.set("x", x.clone());
    }
    upper.xaxis = trace.xaxis;
    upper.yaxis = trace.yaxis;

    let mut lower = upper.clone().with_name(&format!("{}lower", prefix));
    lower.set("y", json!(down));
    lower.set("fill", json!("tonexty"));
    lower.set("fillcolor", json!(to_rgba(&color, bar.opacity.unwrap_or(0.3))?));

    Ok((upper, lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::AxisId;

    fn figure() -> Figure {
        Figure::from_value(json!({
            "data": [
                {"type": "scatter", "name": "a", "x": [1, 2, 3], "y": [10.0, 20.0, 30.0],
                 "line": {"color": "#FF0000"}},
                {"type": "scatter", "name": "b", "x": [1, 2, 3], "y": [1, 2, 3], "yaxis": "y2"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_constant_on_one_trace() {
        let fig = set_errors(&figure(), Some("a"), &ErrorBar::new(ErrorKind::Constant, 2.0)).unwrap();
        let error = fig.data[0].get("error_y").unwrap();
        assert_eq!(error["type"], json!("constant"));
        assert_eq!(error["value"], json!(2.0));
        assert_eq!(error["width"], json!(5.0));
        assert!(fig.data[1].get("error_y").is_none());
    }

    #[test]
    fn test_asymmetric_data_on_all_traces() {
        let bar = ErrorBar::new(ErrorKind::Data, vec![1.0, 2.0, 3.0])
            .with_minus(vec![0.5, 0.5, 0.5])
            .on_axis(AxisKind::X)
            .with_color("blue");
        let fig = set_errors(&figure(), None, &bar).unwrap();
        for trace in &fig.data {
            let error = trace.get("error_x").unwrap();
            assert_eq!(error["symmetric"], json!(false));
            assert_eq!(error["arrayminus"], json!([0.5, 0.5, 0.5]));
            assert_eq!(error["color"], json!("#3780bf"));
        }
    }

    #[test]
    fn test_shape_mismatches_rejected() {
        let cases = [
            ErrorBar::new(ErrorKind::Data, vec![1.0, 2.0]).with_minus(vec![1.0]),
            ErrorBar::new(ErrorKind::Data, 1.0).with_minus(vec![1.0]),
            ErrorBar::new(ErrorKind::Percent, vec![1.0]),
            ErrorBar::new(ErrorKind::Continuous, vec![1.0]),
            ErrorBar::default(),
        ];
        for bar in cases {
            let err = set_errors(&figure(), Some("a"), &bar).unwrap_err();
            assert!(matches!(err, PlotlinksError::InvalidErrorBar(_)), "{:?}", bar);
        }
    }

    #[test]
    fn test_sqrt_needs_no_values() {
        let fig = set_errors(&figure(), Some("b"), &ErrorBar::sqrt()).unwrap();
        assert_eq!(fig.data[1].get("error_y").unwrap()["type"], json!("sqrt"));
    }

    #[test]
    fn test_unknown_trace() {
        let err = set_errors(&figure(), Some("zz"), &ErrorBar::sqrt()).unwrap_err();
        assert!(matches!(err, PlotlinksError::TraceNotFound(_)));
    }

    #[test]
    fn test_continuous_band() {
        let bar = ErrorBar::new(ErrorKind::Continuous, 1.0);
        let fig = set_errors(&figure(), Some("a"), &bar).unwrap();
        assert_eq!(fig.data.len(), 4);

        let upper = &fig.data[2];
        let lower = &fig.data[3];
        assert_eq!(upper.name.as_deref(), Some("a_upper"));
        assert_eq!(upper.get("y"), Some(&json!([11.0, 21.0, 31.0])));
        assert_eq!(upper.get("line").unwrap()["color"], json!("#FF0000"));
        assert_eq!(lower.name.as_deref(), Some("a_lower"));
        assert_eq!(lower.get("y"), Some(&json!([9.0, 19.0, 29.0])));
        assert_eq!(lower.get("fill"), Some(&json!("tonexty")));
        assert_eq!(lower.get("fillcolor"), Some(&json!("rgba(255, 0, 0, 0.3)")));
    }

    #[test]
    fn test_continuous_percent_keeps_axis() {
        let bar = ErrorBar::new(ErrorKind::ContinuousPercent, 10.0);
        let fig = set_errors(&figure(), Some("b"), &bar).unwrap();
        let upper = &fig.data[2];
        assert_eq!(upper.y_ref(), AxisId::y(2));
        let y: Vec<f64> = serde_json::from_value(upper.get("y").unwrap().clone()).unwrap();
        assert!((y[2] - 3.3).abs() < 1e-9);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("continuous_percent".parse::<ErrorKind>().unwrap(), ErrorKind::ContinuousPercent);
        assert!("bogus".parse::<ErrorKind>().is_err());
    }
}
