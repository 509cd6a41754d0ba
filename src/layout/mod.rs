//! Layout builder
//!
//! Produces a themed base [`Layout`] with titles, bar settings, margins,
//! annotations and reference shapes applied, every color normalized.

mod shapes;

pub use shapes::{
    get_shape, styled_annotation, Coord, ReferenceLine, ShapeKind, ShapeOptions, ShapeSpec, Span,
};

use crate::color::normalize_colors;
use crate::figure::{AxisId, AxisKind, Layout, Scene};
use crate::theme::{get_theme, Theme};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Plot margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub l: f64,
    pub r: f64,
    pub b: f64,
    pub t: f64,
}

impl Margin {
    pub fn new(l: f64, r: f64, b: f64, t: f64) -> Self {
        Self { l, r, b, t }
    }
}

impl From<(f64, f64, f64, f64)> for Margin {
    fn from((l, r, b, t): (f64, f64, f64, f64)) -> Self {
        Self { l, r, b, t }
    }
}

/// Options for [`get_layout`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOptions {
    pub title: Option<String>,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    /// Only used for 3-D layouts
    pub z_title: Option<String>,
    /// `group`, `stack`, `overlay`, ...
    pub bar_mode: Option<String>,
    pub bargap: Option<f64>,
    pub bargroupgap: Option<f64>,
    pub grid_color: Option<String>,
    pub zero_line_color: Option<String>,
    pub margin: Option<Margin>,
    pub annotations: Vec<Value>,
    pub is_3d: bool,
    /// Sets `showlegend`
    pub legend: Option<bool>,
    pub logx: bool,
    pub logy: bool,
    pub shapes: ShapeOptions,
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_axis_titles(mut self, x: &str, y: &str) -> Self {
        self.x_title = Some(x.to_string());
        self.y_title = Some(y.to_string());
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Build a layout from a theme.
///
/// Shapes are built and validated before the theme layout is copied, so a
/// malformed shape leaves nothing half-applied.
///
/// # Example
/// ```
/// use plotlinks::layout::{get_layout, LayoutOptions};
/// let layout = get_layout("pearl", &LayoutOptions::new().with_title("Sales")).unwrap();
/// assert_eq!(layout.get("title").unwrap()["text"], "Sales");
/// ```
pub fn get_layout(theme: &str, options: &LayoutOptions) -> Result<Layout> {
    let theme = get_theme(theme)?;
    let shapes = options.shapes.build()?;

    let mut layout = theme.layout();
    if options.is_3d {
        apply_3d_overrides(&mut layout, theme);
    }

    if let Some(title) = non_empty(&options.title) {
        set_chart_title(&mut layout, title);
    }
    if let Some(x_title) = non_empty(&options.x_title) {
        layout.axis_mut(AxisId::x(1)).set_title(x_title);
    }
    if let Some(y_title) = non_empty(&options.y_title) {
        layout.axis_mut(AxisId::y(1)).set_title(y_title);
    }

    if let Some(bar_mode) = non_empty(&options.bar_mode) {
        layout.set("barmode", json!(bar_mode));
    }
    if let Some(bargap) = options.bargap {
        layout.set("bargap", json!(bargap));
    }
    if let Some(bargroupgap) = options.bargroupgap {
        layout.set("bargroupgap", json!(bargroupgap));
    }

    if !options.annotations.is_empty() {
        let annotations: Vec<Value> = options
            .annotations
            .iter()
            .map(|a| {
                styled_annotation(a, theme.annotations.fontcolor, theme.annotations.arrowcolor)
            })
            .collect();
        layout.set("annotations", Value::Array(annotations));
    }

    if let Some(color) = non_empty(&options.grid_color) {
        for def in layout.axes.values_mut() {
            def.set("gridcolor", json!(color));
        }
    }
    if let Some(color) = non_empty(&options.zero_line_color) {
        for def in layout.axes.values_mut() {
            def.set("zerolinecolor", json!(color));
        }
    }
    if let Some(margin) = options.margin {
        layout.set("margin", json!(margin));
    }

    if let Some(show) = options.legend {
        layout.set("showlegend", json!(show));
    }
    if options.logx {
        layout.axis_mut(AxisId::x(1)).set("type", json!("log"));
    }
    if options.logy {
        layout.axis_mut(AxisId::y(1)).set("type", json!("log"));
    }

    if options.is_3d {
        move_axes_to_scene(&mut layout, non_empty(&options.z_title));
    }

    if !shapes.is_empty() {
        layout.set("shapes", Value::Array(shapes));
    }

    normalize_layout_colors(layout)
}

/// Set the chart title text, keeping any theme title styling.
pub fn set_chart_title(layout: &mut Layout, title: &str) {
    match layout.properties.get_mut("title") {
        Some(Value::Object(styled)) => {
            styled.insert("text".to_string(), json!(title));
        }
        _ => {
            layout.set("title", json!({ "text": title }));
        }
    }
}

fn apply_3d_overrides(layout: &mut Layout, theme: &Theme) {
    let Some(overrides) = &theme.axis_3d else {
        return;
    };
    for (key, values) in overrides {
        let (Some(id), Some(values)) = (AxisId::parse(key), values.as_object()) else {
            continue;
        };
        let def = layout.axis_mut(id);
        for (k, v) in values {
            def.set(k, v.clone());
        }
    }
}

/// Relocate the primary x/y axes under the first scene and add a z axis
/// modelled on the x axis.
fn move_axes_to_scene(layout: &mut Layout, z_title: Option<&str>) {
    let x = layout.axes.remove(&AxisId::x(1)).unwrap_or_default();
    let y = layout.axes.remove(&AxisId::y(1)).unwrap_or_default();
    let mut z = x.clone();
    z.title = None;
    z.properties.remove("title");
    if let Some(title) = z_title {
        z.set_title(title);
    }

    let scene = layout.scenes.entry(1).or_insert_with(Scene::new);
    scene.axes.insert(AxisId::primary(AxisKind::X), x);
    scene.axes.insert(AxisId::primary(AxisKind::Y), y);
    scene.axes.insert(AxisId::primary(AxisKind::Z), z);
}

/// Run the color normalizer over a whole layout.
pub fn normalize_layout_colors(layout: Layout) -> Result<Layout> {
    let mut value = Value::Object(layout.into());
    normalize_colors(&mut value)?;
    match value {
        Value::Object(map) => Ok(Layout::from(map)),
        _ => Ok(Layout::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlotlinksError;

    #[test]
    fn test_layout_from_theme_is_normalized() {
        let layout = get_layout("pearl", &LayoutOptions::new()).unwrap();
        assert_eq!(layout.get("paper_bgcolor"), Some(&json!("#F5F6F9")));
        let x = layout.axis(AxisId::x(1)).unwrap();
        assert_eq!(x.get("gridcolor"), Some(&json!("#E1E5ED")));
        assert_eq!(x.get("tickfont"), Some(&json!({"color": "#4D5663"})));
    }

    #[test]
    fn test_titles_applied() {
        let options = LayoutOptions::new()
            .with_title("Returns")
            .with_axis_titles("Date", "Price");
        let layout = get_layout("solar", &options).unwrap();
        assert_eq!(
            layout.get("title"),
            Some(&json!({"text": "Returns", "font": {"color": "#D9D9D9"}, "x": 0.5}))
        );
        assert_eq!(
            layout.axis(AxisId::x(1)).and_then(|d| d.title.as_deref()),
            Some("Date")
        );
        assert_eq!(
            layout.axis(AxisId::y(1)).and_then(|d| d.title.as_deref()),
            Some("Price")
        );
    }

    #[test]
    fn test_unknown_theme_fails() {
        let err = get_layout("neon", &LayoutOptions::new()).unwrap_err();
        assert!(matches!(err, PlotlinksError::UnknownTheme(_)));
    }

    #[test]
    fn test_bar_options_and_margin() {
        let options = LayoutOptions {
            bar_mode: Some("stack".to_string()),
            bargap: Some(0.2),
            margin: Some((10.0, 20.0, 30.0, 40.0).into()),
            legend: Some(false),
            ..Default::default()
        };
        let layout = get_layout("white", &options).unwrap();
        assert_eq!(layout.get("barmode"), Some(&json!("stack")));
        assert_eq!(layout.get("bargap"), Some(&json!(0.2)));
        assert_eq!(
            layout.get("margin"),
            Some(&json!({"l": 10.0, "r": 20.0, "b": 30.0, "t": 40.0}))
        );
        assert_eq!(layout.get("showlegend"), Some(&json!(false)));
    }

    #[test]
    fn test_grid_color_override_and_log_axes() {
        let options = LayoutOptions {
            grid_color: Some("red".to_string()),
            logy: true,
            ..Default::default()
        };
        let layout = get_layout("pearl", &options).unwrap();
        let y = layout.axis(AxisId::y(1)).unwrap();
        assert_eq!(y.get("gridcolor"), Some(&json!("#db4052")));
        assert_eq!(y.get("type"), Some(&json!("log")));
        assert!(layout.axis(AxisId::x(1)).unwrap().get("type").is_none());
    }

    #[test]
    fn test_3d_layout_moves_axes_into_scene() {
        let options = LayoutOptions {
            is_3d: true,
            x_title: Some("a".to_string()),
            z_title: Some("c".to_string()),
            ..Default::default()
        };
        let layout = get_layout("pearl", &options).unwrap();
        assert!(layout.axes.is_empty());
        assert!(layout.is_3d());
        let scene = &layout.scenes[&1];
        assert_eq!(scene.axis(AxisKind::X).and_then(|d| d.title.as_deref()), Some("a"));
        assert_eq!(scene.axis(AxisKind::Z).and_then(|d| d.title.as_deref()), Some("c"));
        // 3-D grid override from the theme
        assert_eq!(
            scene.axis(AxisKind::X).and_then(|d| d.get("gridcolor")),
            Some(&json!("#9499A3"))
        );
    }

    #[test]
    fn test_annotations_get_theme_colors() {
        let options = LayoutOptions {
            annotations: vec![json!({"x": 1, "y": 2, "text": "peak"})],
            ..Default::default()
        };
        let layout = get_layout("space", &options).unwrap();
        let annotations = layout.get("annotations").unwrap().as_array().unwrap();
        assert_eq!(annotations[0]["arrowcolor"], json!("#db4052"));
        assert_eq!(annotations[0]["font"]["color"], json!("#D9D9D9"));
    }

    #[test]
    fn test_shapes_validated_before_layout() {
        let options = LayoutOptions {
            title: Some("x".to_string()),
            shapes: ShapeOptions {
                shapes: vec![json!("not a shape")],
                ..Default::default()
            },
            ..Default::default()
        };
        let err = get_layout("pearl", &options).unwrap_err();
        assert!(matches!(err, PlotlinksError::MalformedShape(_)));
    }

    #[test]
    fn test_hline_added_to_layout() {
        let options = LayoutOptions {
            shapes: ShapeOptions {
                hline: vec![ReferenceLine::At(Coord::Number(0.0))],
                ..Default::default()
            },
            ..Default::default()
        };
        let layout = get_layout("ggplot", &options).unwrap();
        let shapes = layout.get("shapes").unwrap().as_array().unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0]["line"]["color"], json!("#db4052"));
    }
}
