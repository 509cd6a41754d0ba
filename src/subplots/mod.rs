//! Subplot composition
//!
//! [`subplots`] places several finished figures on one canvas: a grid is
//! allocated with [`make_grid`], each figure's traces are re-pointed at
//! the axes of its cell, and the unused grid axes are dropped.

mod grid;

pub use grid::{cell_domain, make_grid, CellRef, CellSpec, GridOptions, StartCell, SubplotGrid};

use crate::color;
use crate::figure::{AxisId, AxisKind, Domain, Figure, Layout, Trace};
use crate::layout::{get_layout, normalize_layout_colors, LayoutOptions};
use crate::naming;
use crate::theme::{get_theme, DEFAULT_THEME};
use crate::{PlotlinksError, Result};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Layout keys that describe one figure's decorations and are never carried
/// into a composite.
const PER_FIGURE_KEYS: &[&str] = &["annotations", "shapes"];

/// Grid with a themed (or caller supplied) layout applied.
///
/// Non-axis properties of the base layout are copied onto the grid, every
/// x axis takes the styling of the base `xaxis1` and every y axis the
/// styling of `yaxis1`. Placement keys of the grid axes are kept.
pub fn get_subplots(
    rows: usize,
    cols: usize,
    options: &GridOptions,
    theme: Option<&str>,
    base_layout: Option<&Layout>,
) -> Result<SubplotGrid> {
    let theme = get_theme(theme.unwrap_or(DEFAULT_THEME))?;
    let base = match base_layout {
        Some(layout) => layout.clone(),
        None => get_layout(theme.name, &LayoutOptions::new())?,
    };

    let mut grid = make_grid(rows, cols, options)?;
    let layout = &mut grid.figure.layout;

    for (key, value) in &base.properties {
        if !PER_FIGURE_KEYS.contains(&key.as_str()) {
            layout.properties.insert(key.clone(), value.clone());
        }
    }

    let title_color = match base.get("annotations").and_then(|a| a.get(0)) {
        Some(first) => first
            .pointer("/font/color")
            .and_then(Value::as_str)
            .map(str::to_string),
        None => Some(color::normalize(theme.annotations.fontcolor)?),
    };
    if let (Some(color), Some(Value::Array(titles))) =
        (title_color, layout.properties.get_mut("annotations"))
    {
        for title in titles.iter_mut() {
            if let Some(font) = title.get_mut("font").and_then(Value::as_object_mut) {
                font.insert("color".to_string(), json!(color));
            }
        }
    }

    let x_style = base.axis(AxisId::x(1)).cloned().unwrap_or_default();
    let y_style = base.axis(AxisId::y(1)).cloned().unwrap_or_default();
    for (id, def) in layout.axes.iter_mut() {
        match id.kind {
            AxisKind::Y => def.apply_style(&y_style),
            _ => def.apply_style(&x_style),
        }
    }
    for scene in layout.scenes.values_mut() {
        for (id, def) in scene.axes.iter_mut() {
            match id.kind {
                AxisKind::Y => def.apply_style(&y_style),
                _ => def.apply_style(&x_style),
            }
        }
    }

    grid.figure.layout = normalize_layout_colors(std::mem::take(&mut grid.figure.layout))?;
    Ok(grid)
}

/// Default `(rows, cols)` for `count` figures: one cell for a single
/// figure, otherwise two columns.
pub fn default_shape(count: usize) -> (usize, usize) {
    match count {
        0 | 1 => (1, 1),
        n => (n.div_ceil(2), 2),
    }
}

/// Compose figures into one subplot grid.
///
/// Each figure takes the next non-blank cell, row-major. Cartesian traces
/// are re-pointed at the cell's axes, 3-D traces at the cell's scene, and
/// domain-based traces (pie, sunburst, ...) get a `domain` equal to the
/// cell's canvas area. Grid axes and scenes numbered beyond the number of
/// figures are removed.
///
/// Layout properties other than axes come from, in order of precedence:
/// `base_layout`, the input layouts (earlier figures winning, nested keys
/// filled from later ones), the theme. Input shapes and annotations are not
/// merged.
///
/// # Example
/// ```
/// use plotlinks::subplots::{subplots, GridOptions};
/// use plotlinks::{Figure, Trace};
///
/// let figs: Vec<Figure> = ["a", "b", "c"]
///     .iter()
///     .map(|name| Figure::new(vec![Trace::new("scatter").with_name(name)], Default::default()))
///     .collect();
/// let grid = subplots(&figs, Some((2, 2)), &GridOptions::default(), None, None).unwrap();
/// assert_eq!(grid.data.len(), 3);
/// assert!(!grid.layout.axes.contains_key(&plotlinks::AxisId::x(4)));
/// ```
pub fn subplots(
    figures: &[Figure],
    shape: Option<(usize, usize)>,
    options: &GridOptions,
    theme: Option<&str>,
    base_layout: Option<&Layout>,
) -> Result<Figure> {
    if figures.is_empty() {
        return Err(PlotlinksError::InvalidShape(
            "no figures to place on a grid".to_string(),
        ));
    }
    let (rows, cols) = shape.unwrap_or_else(|| default_shape(figures.len()));
    if figures.len() > rows * cols {
        return Err(PlotlinksError::InvalidShape(format!(
            "{} figures do not fit a {}x{} grid",
            figures.len(),
            rows,
            cols
        )));
    }

    let grid = get_subplots(rows, cols, options, theme, base_layout)?;
    let cells: Vec<CellRef> = grid.cells().copied().collect();
    if cells.len() < figures.len() {
        return Err(PlotlinksError::InvalidShape(format!(
            "{} figures given but the grid specs leave only {} cells",
            figures.len(),
            cells.len()
        )));
    }

    let mut composite = grid.figure;
    for (figure, cell) in figures.iter().zip(&cells) {
        let domain = cell_domain(&composite.layout, cell);
        for trace in &figure.data {
            composite.data.push(place_trace(trace.clone(), cell, domain));
        }
    }

    trim_unused_cells(&mut composite.layout, &cells[..figures.len()]);

    let inputs = input_properties(figures);
    let properties = &mut composite.layout.properties;
    if base_layout.is_some() {
        fill_missing(properties, inputs);
    } else {
        let theme_properties = std::mem::take(properties);
        *properties = inputs;
        fill_missing(properties, theme_properties);
    }

    tracing::debug!(
        figures = figures.len(),
        rows,
        cols,
        traces = composite.data.len(),
        "composed subplots"
    );
    composite.layout = normalize_layout_colors(composite.layout)?;
    Ok(composite)
}

/// Drop the axes and scenes of cells that received no figure.
///
/// A shared axis anchored to a dropped cell moves to the used partner
/// furthest towards its side: bottom-most for x, left-most for y.
fn trim_unused_cells(layout: &mut Layout, used: &[CellRef]) {
    let axes: BTreeSet<AxisId> = used.iter().flat_map(CellRef::axes).collect();
    let scenes: BTreeSet<u32> = used
        .iter()
        .filter_map(|cell| match cell {
            CellRef::Scene(index) => Some(*index),
            CellRef::Cartesian { .. } => None,
        })
        .collect();
    layout.axes.retain(|id, _| axes.contains(id));
    layout.scenes.retain(|index, _| scenes.contains(index));

    let mut anchors: BTreeMap<AxisId, (f64, AxisId)> = BTreeMap::new();
    for cell in used {
        if let CellRef::Cartesian { x, y } = *cell {
            for (id, partner) in [(x, y), (y, x)] {
                let position = layout
                    .axes
                    .get(&partner)
                    .map(|def| def.domain_or_default().low)
                    .unwrap_or(0.0);
                let best = anchors.entry(id).or_insert((position, partner));
                if position < best.0 {
                    *best = (position, partner);
                }
            }
        }
    }
    for (id, def) in layout.axes.iter_mut() {
        let dangling = def.anchor.is_some_and(|anchor| !axes.contains(&anchor));
        if let (true, Some((_, partner))) = (dangling, anchors.get(id)) {
            tracing::debug!(axis = %id, anchor = %partner, "re-anchoring shared axis");
            def.anchor = Some(*partner);
        }
    }
}

fn place_trace(mut trace: Trace, cell: &CellRef, domain: Option<(Domain, Domain)>) -> Trace {
    if trace.is_domain_based() {
        if let Some((x, y)) = domain {
            trace.set("domain", json!({"x": x.to_value(), "y": y.to_value()}));
        }
        return trace;
    }
    match cell {
        CellRef::Cartesian { x, y } => {
            trace.bind(*x);
            trace.bind(*y);
        }
        CellRef::Scene(index) => {
            trace.set("scene", json!(naming::scene_key(*index)));
        }
    }
    trace
}

/// Union of the input layouts' non-axis properties, earlier inputs winning.
fn input_properties(figures: &[Figure]) -> Map<String, Value> {
    let mut union = Map::new();
    for figure in figures {
        let properties = figure
            .layout
            .properties
            .iter()
            .filter(|(key, _)| !PER_FIGURE_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        fill_missing(&mut union, properties);
    }
    union
}

/// Add every key of `source` that `target` lacks, descending into objects
/// present on both sides.
fn fill_missing(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (None, value) => {
                target.insert(key, value);
            }
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                fill_missing(existing, incoming);
            }
            _ => {}
        }
    }
}

// =============================================================================
// Figure helpers
// =============================================================================

/// Union of the layouts of several figures, later figures overwriting
/// earlier ones key by key.
pub fn base_layout(figures: &[Figure]) -> Layout {
    let mut union = Map::new();
    for figure in figures {
        union.extend(Map::<String, Value>::from(figure.layout.clone()));
    }
    Layout::from(union)
}

/// All traces of several figures on a single canvas.
pub fn merge_figures(figures: &[Figure]) -> Figure {
    Figure::new(
        figures.iter().flat_map(|f| f.data.iter().cloned()).collect(),
        base_layout(figures),
    )
}

/// One figure per trace, each with the original layout.
pub fn strip_figures(figure: &Figure) -> Vec<Figure> {
    figure
        .data
        .iter()
        .map(|trace| Figure::new(vec![trace.clone()], figure.layout.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::trace_axis_refs;

    fn scatter(name: &str, legend: Value) -> Figure {
        Figure::from_value(json!({
            "data": [{"type": "scatter", "name": name, "x": [1, 2], "y": [3, 4]}],
            "layout": {"legend": legend, "xaxis1": {"title": name}, "shapes": [{"type": "line"}]}
        }))
        .unwrap()
    }

    fn three() -> Vec<Figure> {
        vec![
            scatter("A", json!({"bgcolor": "#FFFFFF", "orientation": "h"})),
            scatter("B", json!({"bgcolor": "#000000", "x": 0.1})),
            scatter("C", json!({"x": 0.9, "y": 0.5})),
        ]
    }

    #[test]
    fn test_three_figures_on_two_by_two() {
        let composite = subplots(&three(), Some((2, 2)), &GridOptions::default(), None, None).unwrap();
        assert_eq!(composite.data.len(), 3);

        let refs = trace_axis_refs(&composite);
        assert_eq!(refs["A"], (AxisId::x(1), AxisId::y(1)));
        assert_eq!(refs["B"], (AxisId::x(2), AxisId::y(2)));
        assert_eq!(refs["C"], (AxisId::x(3), AxisId::y(3)));

        let layout = &composite.layout;
        assert!(!layout.axes.contains_key(&AxisId::x(4)));
        assert!(!layout.axes.contains_key(&AxisId::y(4)));
        assert_eq!(
            layout.get("legend"),
            Some(&json!({"bgcolor": "#FFFFFF", "orientation": "h", "x": 0.1, "y": 0.5, "font": {"color": "#4D5663"}}))
        );
        // decorations of the inputs are left behind
        assert!(layout.get("shapes").is_none());
    }

    #[test]
    fn test_shared_axes_reanchored_after_trim() {
        let grid = GridOptions::new().shared(true, false);
        let composite = subplots(&three(), Some((2, 2)), &grid, None, None).unwrap();
        let layout = &composite.layout;

        assert!(!layout.axes.contains_key(&AxisId::y(4)));
        // column 2 has only its top cell left
        assert_eq!(layout.axes[&AxisId::x(2)].anchor, Some(AxisId::y(2)));
        assert_eq!(layout.axes[&AxisId::x(1)].anchor, Some(AxisId::y(3)));
        assert!(crate::validate::validate(&composite).valid());
    }

    #[test]
    fn test_empty_bottom_row_moves_shared_anchors_up() {
        let mut figures = three();
        figures.push(scatter("D", json!({})));
        let grid = GridOptions::new().shared(true, true);
        let composite = subplots(&figures, Some((3, 2)), &grid, None, None).unwrap();
        let layout = &composite.layout;

        assert!(!layout.axes.contains_key(&AxisId::y(3)));
        assert_eq!(layout.axes[&AxisId::x(1)].anchor, Some(AxisId::y(2)));
        assert_eq!(layout.axes[&AxisId::x(2)].anchor, Some(AxisId::y(2)));
        assert!(crate::validate::validate_figure(&composite).is_ok());
    }

    #[test]
    fn test_invalid_shape_rejected() {
        let figs = &three()[..2];
        let err = subplots(figs, Some((1, 1)), &GridOptions::default(), None, None).unwrap_err();
        assert!(matches!(err, PlotlinksError::InvalidShape(_)));
    }

    #[test]
    fn test_default_shapes() {
        assert_eq!(default_shape(1), (1, 1));
        assert_eq!(default_shape(2), (1, 2));
        assert_eq!(default_shape(3), (2, 2));
        assert_eq!(default_shape(5), (3, 2));

        let single = subplots(&three()[..1], None, &GridOptions::default(), None, None).unwrap();
        assert_eq!(single.layout.axes[&AxisId::x(1)].domain, Some(Domain::FULL));
    }

    #[test]
    fn test_pie_gets_cell_domain() {
        let pie = Figure::from_value(json!({
            "data": [{"type": "pie", "labels": ["a", "b"], "values": [1, 2]}]
        }))
        .unwrap();
        let figs = vec![three().remove(0), pie];
        let composite = subplots(&figs, None, &GridOptions::default(), None, None).unwrap();
        let placed = &composite.data[1];
        assert_eq!(placed.xaxis, None);
        assert_eq!(placed.get("domain").unwrap()["x"][1], json!(1.0));
        assert_eq!(placed.get("domain").unwrap()["y"], json!([0.0, 1.0]));
    }

    #[test]
    fn test_axis_style_from_base() {
        let grid = get_subplots(1, 2, &GridOptions::default(), Some("solar"), None).unwrap();
        let layout = &grid.figure.layout;
        for id in [AxisId::x(2), AxisId::y(2)] {
            assert!(layout.axes[&id].get("gridcolor").is_some());
        }
        assert_eq!(layout.axes[&AxisId::y(2)].anchor, Some(AxisId::x(2)));
        assert!(layout.get("paper_bgcolor").is_some());
    }

    #[test]
    fn test_title_annotations_colored_by_theme() {
        let options = GridOptions::new().with_titles(&["one"]);
        let grid = get_subplots(1, 1, &options, Some("pearl"), None).unwrap();
        let annotations = grid.figure.layout.get("annotations").unwrap();
        assert_eq!(annotations[0]["font"]["color"], json!("#4D5663"));
    }

    #[test]
    fn test_base_layout_wins() {
        let base = Layout::new().with("legend", json!({"bgcolor": "#123456"}));
        let composite = subplots(&three(), None, &GridOptions::default(), None, Some(&base)).unwrap();
        assert_eq!(composite.layout.get("legend").unwrap()["bgcolor"], json!("#123456"));
        assert_eq!(composite.layout.get("legend").unwrap()["orientation"], json!("h"));
    }

    #[test]
    fn test_merge_and_strip() {
        let merged = merge_figures(&three());
        assert_eq!(merged.data.len(), 3);
        // later layouts overwrite
        assert_eq!(merged.layout.axes[&AxisId::x(1)].title.as_deref(), Some("C"));

        let stripped = strip_figures(&merged);
        assert_eq!(stripped.len(), 3);
        assert_eq!(stripped[1].data[0].name.as_deref(), Some("B"));
        assert_eq!(stripped[1].layout, merged.layout);
    }
}
