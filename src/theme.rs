//! Static theme registry
//!
//! Themes are built once on first use and never mutated; callers take a
//! [`Layout`] copy via [`Theme::layout`] before changing anything.

use crate::figure::Layout;
use crate::{PlotlinksError, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const DEFAULT_THEME: &str = "pearl";

/// Colors used for annotation text and arrows
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStyle {
    pub fontcolor: &'static str,
    pub arrowcolor: &'static str,
}

/// A named bundle of layout defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Default color scale for traces
    pub colorscale: &'static str,
    pub linewidth: f64,
    /// Line color for box and histogram outlines, when the theme sets one
    pub linecolor: Option<&'static str>,
    pub bargap: f64,
    layout: Map<String, Value>,
    pub annotations: AnnotationStyle,
    /// Axis overrides applied to 3-D scenes, keyed `xaxis`/`yaxis`
    pub axis_3d: Option<Map<String, Value>>,
}

impl Theme {
    /// Fresh copy of the theme's base layout
    pub fn layout(&self) -> Layout {
        Layout::from(self.layout.clone())
    }

    pub fn raw_layout(&self) -> &Map<String, Value> {
        &self.layout
    }

    /// Style shared by the theme's axes (taken from its x axis).
    pub fn axis_style(&self) -> Map<String, Value> {
        self.layout
            .get("xaxis")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// Color of the chart title font.
    pub fn title_color(&self) -> Option<&str> {
        self.layout
            .get("titlefont")
            .and_then(|f| f.get("color"))
            .and_then(Value::as_str)
    }
}

/// The colors that tell one theme apart from another
struct Swatch {
    legend_bg: &'static str,
    legend_font: &'static str,
    paper_bg: &'static str,
    plot_bg: &'static str,
    title: &'static str,
    tick: &'static str,
    grid: &'static str,
    axis_title: &'static str,
    zeroline: &'static str,
    annotation_font: &'static str,
    annotation_arrow: &'static str,
    grid_3d: Option<&'static str>,
}

fn build(
    name: &'static str,
    colorscale: &'static str,
    linecolor: Option<&'static str>,
    swatch: Swatch,
) -> Theme {
    let axis = json!({
        "tickfont": {"color": swatch.tick},
        "gridcolor": swatch.grid,
        "titlefont": {"color": swatch.axis_title},
        "zerolinecolor": swatch.zeroline,
        "showgrid": true
    });
    let layout = json!({
        "legend": {"bgcolor": swatch.legend_bg, "font": {"color": swatch.legend_font}},
        "paper_bgcolor": swatch.paper_bg,
        "plot_bgcolor": swatch.plot_bg,
        "title": {"font": {"color": swatch.title}, "x": 0.5},
        "xaxis": axis.clone(),
        "yaxis": axis,
        "titlefont": {"color": swatch.title}
    });
    let axis_3d = swatch.grid_3d.map(|grid| {
        let overrides = json!({"gridcolor": grid, "zerolinecolor": grid});
        let mut map = Map::new();
        map.insert("xaxis".to_string(), overrides.clone());
        map.insert("yaxis".to_string(), overrides);
        map
    });

    Theme {
        name,
        colorscale,
        linewidth: 1.3,
        linecolor,
        bargap: 0.01,
        layout: match layout {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        annotations: AnnotationStyle {
            fontcolor: swatch.annotation_font,
            arrowcolor: swatch.annotation_arrow,
        },
        axis_3d,
    }
}

static THEMES: LazyLock<BTreeMap<&'static str, Theme>> = LazyLock::new(|| {
    let themes = vec![
        build(
            "ggplot",
            "ggplot",
            Some("pearl"),
            Swatch {
                legend_bg: "white",
                legend_font: "grey10",
                paper_bg: "white",
                plot_bg: "grey14",
                title: "charcoal",
                tick: "grey10",
                grid: "lightivory",
                axis_title: "grey10",
                zeroline: "lightivory",
                annotation_font: "grey10",
                annotation_arrow: "grey10",
                grid_3d: None,
            },
        ),
        build(
            "pearl",
            "original",
            None,
            Swatch {
                legend_bg: "pearl02",
                legend_font: "pearl06",
                paper_bg: "pearl02",
                plot_bg: "pearl02",
                title: "pearl06",
                tick: "pearl06",
                grid: "pearl03",
                axis_title: "pearl06",
                zeroline: "pearl03",
                annotation_font: "pearl06",
                annotation_arrow: "pearl04",
                grid_3d: Some("pearl04"),
            },
        ),
        build(
            "solar",
            "original",
            None,
            Swatch {
                legend_bg: "charcoal",
                legend_font: "pearl",
                paper_bg: "charcoal",
                plot_bg: "charcoal",
                title: "pearl",
                tick: "grey12",
                grid: "grey08",
                axis_title: "pearl",
                zeroline: "grey09",
                annotation_font: "pearl",
                annotation_arrow: "grey11",
                grid_3d: None,
            },
        ),
        build(
            "space",
            "original",
            None,
            Swatch {
                legend_bg: "grey03",
                legend_font: "pearl",
                paper_bg: "grey03",
                plot_bg: "grey03",
                title: "pearl",
                tick: "grey12",
                grid: "grey08",
                axis_title: "pearl",
                zeroline: "grey09",
                annotation_font: "pearl",
                annotation_arrow: "red",
                grid_3d: None,
            },
        ),
        build(
            "white",
            "original",
            None,
            Swatch {
                legend_bg: "white",
                legend_font: "pearl06",
                paper_bg: "white",
                plot_bg: "white",
                title: "pearl06",
                tick: "pearl06",
                grid: "pearl03",
                axis_title: "pearl06",
                zeroline: "pearl03",
                annotation_font: "pearl06",
                annotation_arrow: "pearl04",
                grid_3d: Some("pearl04"),
            },
        ),
        build(
            "polar",
            "polar",
            None,
            Swatch {
                legend_bg: "polardust",
                legend_font: "polargrey",
                paper_bg: "polardust",
                plot_bg: "polardust",
                title: "polardark",
                tick: "polargrey",
                grid: "pearl03",
                axis_title: "polargrey",
                zeroline: "pearl03",
                annotation_font: "polardark",
                annotation_arrow: "pearl04",
                grid_3d: Some("pearl04"),
            },
        ),
        build(
            "henanigans",
            "original",
            None,
            Swatch {
                legend_bg: "henanigans_bg",
                legend_font: "henanigans_light2",
                paper_bg: "henanigans_bg",
                plot_bg: "henanigans_bg",
                title: "henanigans_light2",
                tick: "henanigans_light1",
                grid: "henanigans_grey1",
                axis_title: "henanigans_light1",
                zeroline: "henanigans_grey2",
                annotation_font: "henanigans_orange2",
                annotation_arrow: "henanigans_orange2",
                grid_3d: Some("henanigans_grey1"),
            },
        ),
    ];
    themes.into_iter().map(|t| (t.name, t)).collect()
});

/// Look up a theme by name.
pub fn get_theme(name: &str) -> Result<&'static Theme> {
    THEMES
        .get(name.trim().to_lowercase().as_str())
        .ok_or_else(|| PlotlinksError::UnknownTheme(name.to_string()))
}

/// Registered theme names, sorted.
pub fn theme_names() -> Vec<&'static str> {
    THEMES.keys().copied().collect()
}
