//! Grid-layout primitive
//!
//! Allocates one axis pair (or one 3-D scene) per cell of a `rows x cols`
//! grid and computes the canvas domain of every cell. Cells are visited
//! row-major starting from [`StartCell`], which is also the order axis
//! indices are handed out in.

use crate::figure::{AxisDef, AxisId, AxisKind, Domain, Figure, Layout, Scene};
use crate::{PlotlinksError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Grid corner that `specs[0][0]` refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartCell {
    #[default]
    TopLeft,
    BottomLeft,
}

/// Specification of one grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSpec {
    pub is_3d: bool,
    pub colspan: usize,
    pub rowspan: usize,
    /// Padding inside the cell, as a fraction of the canvas
    pub l: f64,
    pub r: f64,
    pub t: f64,
    pub b: f64,
}

impl Default for CellSpec {
    fn default() -> Self {
        Self {
            is_3d: false,
            colspan: 1,
            rowspan: 1,
            l: 0.0,
            r: 0.0,
            t: 0.0,
            b: 0.0,
        }
    }
}

impl CellSpec {
    pub fn scene() -> Self {
        Self {
            is_3d: true,
            ..Default::default()
        }
    }

    pub fn span(colspan: usize, rowspan: usize) -> Self {
        Self {
            colspan,
            rowspan,
            ..Default::default()
        }
    }
}

/// Options for [`make_grid`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// One x axis per grid column, drawn under the bottom-most cell
    pub shared_xaxes: bool,
    /// One y axis per grid row, drawn left of the left-most cell
    pub shared_yaxes: bool,
    pub start_cell: StartCell,
    /// Space between columns; `0.2 / cols` when unset
    pub horizontal_spacing: Option<f64>,
    /// Space between rows; `0.3 / rows` when unset
    pub vertical_spacing: Option<f64>,
    /// Per-cell specifications, `rows` lists of `cols` entries. `None`
    /// leaves a cell blank or makes room for a span.
    pub specs: Option<Vec<Vec<Option<CellSpec>>>>,
    /// Titles of the non-blank cells, in allocation order
    pub subplot_titles: Vec<String>,
}

impl GridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(mut self, x: bool, y: bool) -> Self {
        self.shared_xaxes = x;
        self.shared_yaxes = y;
        self
    }

    pub fn with_titles<S: AsRef<str>>(mut self, titles: &[S]) -> Self {
        self.subplot_titles = titles.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }
}

/// Axes assigned to one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRef {
    Cartesian { x: AxisId, y: AxisId },
    /// Index of the 3-D scene
    Scene(u32),
}

impl CellRef {
    pub fn axes(&self) -> Vec<AxisId> {
        match self {
            CellRef::Cartesian { x, y } => vec![*x, *y],
            CellRef::Scene(_) => Vec::new(),
        }
    }
}

/// Output of [`make_grid`]: an empty figure whose layout holds the cell
/// axes, plus the cell-to-axes mapping in `specs` order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubplotGrid {
    pub figure: Figure,
    pub grid_ref: Vec<Vec<Option<CellRef>>>,
}

impl SubplotGrid {
    /// Non-blank cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &CellRef> {
        self.grid_ref.iter().flatten().flatten()
    }

    /// Canvas domain of a cell as `(x, y)`.
    pub fn cell_domain(&self, cell: &CellRef) -> Option<(Domain, Domain)> {
        cell_domain(&self.figure.layout, cell)
    }
}

/// Canvas domain of a cell in `layout`, read back from its axes or scene.
pub fn cell_domain(layout: &Layout, cell: &CellRef) -> Option<(Domain, Domain)> {
    match cell {
        CellRef::Cartesian { x, y } => {
            let x = layout.axes.get(x)?.domain_or_default();
            let y = layout.axes.get(y)?.domain_or_default();
            Some((x, y))
        }
        CellRef::Scene(index) => {
            let domain = layout.scenes.get(index)?.properties.get("domain")?;
            let x = Domain::from_value(domain.get("x")?)?;
            let y = Domain::from_value(domain.get("y")?)?;
            Some((x, y))
        }
    }
}

// =============================================================================
// Allocation
// =============================================================================

struct Geometry {
    rows: usize,
    width: f64,
    height: f64,
    horizontal_spacing: f64,
    vertical_spacing: f64,
    start_cell: StartCell,
}

impl Geometry {
    fn new(rows: usize, cols: usize, options: &GridOptions) -> Result<Self> {
        let horizontal_spacing = options.horizontal_spacing.unwrap_or(0.2 / cols as f64);
        let vertical_spacing = options.vertical_spacing.unwrap_or(0.3 / rows as f64);
        if !(0.0..1.0).contains(&horizontal_spacing) || !(0.0..1.0).contains(&vertical_spacing) {
            return Err(PlotlinksError::InvalidShape(format!(
                "spacing must lie in [0, 1), got horizontal {} and vertical {}",
                horizontal_spacing, vertical_spacing
            )));
        }

        let width = (1.0 - horizontal_spacing * (cols as f64 - 1.0)) / cols as f64;
        let height = (1.0 - vertical_spacing * (rows as f64 - 1.0)) / rows as f64;
        if width <= 0.0 || height <= 0.0 {
            return Err(PlotlinksError::InvalidShape(format!(
                "spacing leaves no room for a {}x{} grid",
                rows, cols
            )));
        }

        Ok(Self {
            rows,
            width,
            height,
            horizontal_spacing,
            vertical_spacing,
            start_cell: options.start_cell,
        })
    }

    /// Visual row counted from the bottom of the canvas.
    fn from_bottom(&self, row: usize) -> usize {
        match self.start_cell {
            StartCell::TopLeft => self.rows - 1 - row,
            StartCell::BottomLeft => row,
        }
    }

    fn cell(&self, row: usize, col: usize, spec: &CellSpec) -> (Domain, Domain) {
        let last_col = col + spec.colspan - 1;
        let last_row = row + spec.rowspan - 1;
        let (bottom, top) = {
            let a = self.from_bottom(row);
            let b = self.from_bottom(last_row);
            (a.min(b), a.max(b))
        };

        let x_low = col as f64 * (self.width + self.horizontal_spacing);
        let x_high = last_col as f64 * (self.width + self.horizontal_spacing) + self.width;
        let y_low = bottom as f64 * (self.height + self.vertical_spacing);
        let y_high = top as f64 * (self.height + self.vertical_spacing) + self.height;

        (
            Domain::new(x_low + spec.l, x_high - spec.r),
            Domain::new(y_low + spec.b, y_high - spec.t),
        )
    }
}

fn check_specs(rows: usize, cols: usize, options: &GridOptions) -> Result<Vec<Vec<Option<CellSpec>>>> {
    let Some(specs) = &options.specs else {
        return Ok(vec![vec![Some(CellSpec::default()); cols]; rows]);
    };

    if specs.len() != rows || specs.iter().any(|row| row.len() != cols) {
        return Err(PlotlinksError::InvalidShape(format!(
            "specs must be {} rows of {} cells",
            rows, cols
        )));
    }
    for (r, row) in specs.iter().enumerate() {
        for (c, spec) in row.iter().enumerate() {
            let Some(spec) = spec else { continue };
            if spec.colspan == 0 || spec.rowspan == 0 {
                return Err(PlotlinksError::InvalidShape(format!(
                    "cell ({}, {}) spans zero cells",
                    r + 1,
                    c + 1
                )));
            }
            if c + spec.colspan > cols || r + spec.rowspan > rows {
                return Err(PlotlinksError::InvalidShape(format!(
                    "cell ({}, {}) spans past the edge of a {}x{} grid",
                    r + 1,
                    c + 1,
                    rows,
                    cols
                )));
            }
        }
    }
    Ok(specs.clone())
}

/// Allocate the axes of a subplot grid.
///
/// Without shared axes every cell receives the next x and y index. With
/// `shared_xaxes` the x axis of column `c` is `x{c}`, anchored to the
/// bottom-most cell of that column; `shared_yaxes` does the same for rows
/// on the left. 3-D cells get their own scene instead of an axis pair.
///
/// # Example
/// ```
/// use plotlinks::subplots::{make_grid, CellRef, GridOptions};
/// use plotlinks::AxisId;
///
/// let grid = make_grid(2, 2, &GridOptions::default()).unwrap();
/// assert_eq!(grid.cells().count(), 4);
/// assert_eq!(
///     grid.grid_ref[1][0],
///     Some(CellRef::Cartesian { x: AxisId::x(3), y: AxisId::y(3) })
/// );
/// ```
pub fn make_grid(rows: usize, cols: usize, options: &GridOptions) -> Result<SubplotGrid> {
    if rows == 0 || cols == 0 {
        return Err(PlotlinksError::InvalidShape(format!(
            "a grid needs at least one row and one column, got {}x{}",
            rows, cols
        )));
    }
    let specs = check_specs(rows, cols, options)?;
    let geometry = Geometry::new(rows, cols, options)?;

    let mut layout = Layout::new();
    let mut grid_ref = vec![vec![None; cols]; rows];
    let mut cell_domains = Vec::new();
    let mut counts: BTreeMap<AxisKind, u32> = BTreeMap::new();
    let mut scenes = 0;
    // shared axis -> position of the cell it is currently anchored to
    let mut anchored_at: BTreeMap<AxisId, f64> = BTreeMap::new();

    for (r, row) in specs.iter().enumerate() {
        for (c, spec) in row.iter().enumerate() {
            let Some(spec) = spec else { continue };
            let (x_domain, y_domain) = geometry.cell(r, c, spec);
            cell_domains.push((x_domain, y_domain));

            if spec.is_3d {
                scenes += 1;
                let mut scene = Scene::new();
                for kind in AxisKind::ALL {
                    scene.axes.insert(AxisId::primary(kind), AxisDef::new());
                }
                scene.properties.insert(
                    "domain".to_string(),
                    json!({"x": x_domain.to_value(), "y": y_domain.to_value()}),
                );
                layout.scenes.insert(scenes, scene);
                grid_ref[r][c] = Some(CellRef::Scene(scenes));
                continue;
            }

            let mut next = |kind: AxisKind, shared: bool, position: usize| {
                if shared {
                    AxisId::new(kind, position as u32 + 1)
                } else {
                    let count = counts.entry(kind).or_insert(0);
                    *count += 1;
                    AxisId::new(kind, *count)
                }
            };
            let x = next(AxisKind::X, options.shared_xaxes, c);
            let y = next(AxisKind::Y, options.shared_yaxes, r);

            place_axis(&mut layout, &mut anchored_at, x, x_domain, y, y_domain.low, options.shared_xaxes);
            place_axis(&mut layout, &mut anchored_at, y, y_domain, x, x_domain.low, options.shared_yaxes);
            grid_ref[r][c] = Some(CellRef::Cartesian { x, y });
        }
    }

    if options.subplot_titles.len() > cell_domains.len() {
        return Err(PlotlinksError::InvalidShape(format!(
            "{} subplot titles given for {} cells",
            options.subplot_titles.len(),
            cell_domains.len()
        )));
    }
    let titles: Vec<Value> = options
        .subplot_titles
        .iter()
        .zip(&cell_domains)
        .filter(|(title, _)| !title.is_empty())
        .map(|(title, (x, y))| title_annotation(title, x, y))
        .collect();
    if !titles.is_empty() {
        layout.set("annotations", Value::Array(titles));
    }

    tracing::debug!(
        rows,
        cols,
        cells = cell_domains.len(),
        scenes,
        shared_x = options.shared_xaxes,
        shared_y = options.shared_yaxes,
        "allocated subplot grid"
    );

    Ok(SubplotGrid {
        figure: Figure::new(Vec::new(), layout),
        grid_ref,
    })
}

/// Insert or re-anchor one cell axis.
///
/// A shared axis is created by the first cell that uses it and moves its
/// anchor to any later cell lying further towards the axis' side.
fn place_axis(
    layout: &mut Layout,
    anchored_at: &mut BTreeMap<AxisId, f64>,
    id: AxisId,
    domain: Domain,
    partner: AxisId,
    partner_position: f64,
    shared: bool,
) {
    match layout.axes.get_mut(&id) {
        Some(def) if shared => {
            let current = anchored_at.get(&id).copied().unwrap_or(f64::INFINITY);
            if partner_position < current {
                def.anchor = Some(partner);
                anchored_at.insert(id, partner_position);
            }
        }
        _ => {
            layout.set_axis_def(id, AxisDef::new().with_domain(domain.low, domain.high).with_anchor(partner));
            anchored_at.insert(id, partner_position);
        }
    }
}

fn title_annotation(title: &str, x: &Domain, y: &Domain) -> Value {
    json!({
        "text": title,
        "x": x.midpoint(),
        "y": y.high,
        "xref": "paper",
        "yref": "paper",
        "xanchor": "center",
        "yanchor": "bottom",
        "showarrow": false,
        "font": {"size": 16}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn domain(grid: &SubplotGrid, id: AxisId) -> Domain {
        grid.figure.layout.axes[&id].domain_or_default()
    }

    #[test]
    fn test_single_cell_fills_canvas() {
        let grid = make_grid(1, 1, &GridOptions::default()).unwrap();
        assert_eq!(domain(&grid, AxisId::x(1)), Domain::FULL);
        assert_eq!(domain(&grid, AxisId::y(1)), Domain::FULL);
        assert_eq!(grid.figure.layout.axes[&AxisId::x(1)].anchor, Some(AxisId::y(1)));
        assert_eq!(grid.figure.layout.axes[&AxisId::y(1)].anchor, Some(AxisId::x(1)));
    }

    #[test]
    fn test_two_by_two_domains_top_left() {
        let grid = make_grid(2, 2, &GridOptions::default()).unwrap();
        // spacing 0.1 horizontally, 0.15 vertically
        let x2 = domain(&grid, AxisId::x(2));
        assert!(close(x2.low, 0.55) && close(x2.high, 1.0));
        let y1 = domain(&grid, AxisId::y(1));
        assert!(close(y1.low, 0.575) && close(y1.high, 1.0));
        let y3 = domain(&grid, AxisId::y(3));
        assert!(close(y3.low, 0.0) && close(y3.high, 0.425));
    }

    #[test]
    fn test_bottom_left_start() {
        let options = GridOptions {
            start_cell: StartCell::BottomLeft,
            ..Default::default()
        };
        let grid = make_grid(2, 1, &options).unwrap();
        assert!(close(domain(&grid, AxisId::y(1)).low, 0.0));
        assert!(close(domain(&grid, AxisId::y(2)).high, 1.0));
    }

    #[test]
    fn test_blank_cells_are_skipped() {
        let options = GridOptions {
            specs: Some(vec![
                vec![Some(CellSpec::span(2, 1)), None],
                vec![Some(CellSpec::default()), Some(CellSpec::default())],
            ]),
            ..Default::default()
        };
        let grid = make_grid(2, 2, &options).unwrap();
        assert_eq!(grid.cells().count(), 3);
        assert_eq!(grid.grid_ref[0][1], None);
        let wide = domain(&grid, AxisId::x(1));
        assert!(close(wide.low, 0.0) && close(wide.high, 1.0));
        assert_eq!(
            grid.grid_ref[1][1],
            Some(CellRef::Cartesian { x: AxisId::x(3), y: AxisId::y(3) })
        );
    }

    #[test]
    fn test_rowspan_covers_both_rows() {
        let options = GridOptions {
            specs: Some(vec![
                vec![Some(CellSpec::span(1, 2)), Some(CellSpec::default())],
                vec![None, Some(CellSpec::default())],
            ]),
            ..Default::default()
        };
        let grid = make_grid(2, 2, &options).unwrap();
        let tall = domain(&grid, AxisId::y(1));
        assert!(close(tall.low, 0.0) && close(tall.high, 1.0));
    }

    #[test]
    fn test_shared_axes() {
        let grid = make_grid(2, 2, &GridOptions::new().shared(true, true)).unwrap();
        let layout = &grid.figure.layout;
        assert_eq!(layout.max_axis_index(AxisKind::X), 2);
        assert_eq!(layout.max_axis_index(AxisKind::Y), 2);
        assert_eq!(
            grid.grid_ref[1][1],
            Some(CellRef::Cartesian { x: AxisId::x(2), y: AxisId::y(2) })
        );
        // x axes sit under the bottom row
        assert_eq!(layout.axes[&AxisId::x(1)].anchor, Some(AxisId::y(2)));
        assert_eq!(layout.axes[&AxisId::y(2)].anchor, Some(AxisId::x(1)));
    }

    #[test]
    fn test_scene_cells() {
        let options = GridOptions {
            specs: Some(vec![vec![Some(CellSpec::scene()), Some(CellSpec::default())]]),
            ..Default::default()
        };
        let grid = make_grid(1, 2, &options).unwrap();
        assert_eq!(grid.grid_ref[0][0], Some(CellRef::Scene(1)));
        assert_eq!(
            grid.grid_ref[0][1],
            Some(CellRef::Cartesian { x: AxisId::x(1), y: AxisId::y(1) })
        );
        let (x, _) = grid.cell_domain(&CellRef::Scene(1)).unwrap();
        assert!(close(x.low, 0.0) && close(x.high, 0.45));
    }

    #[test]
    fn test_titles_become_annotations() {
        let options = GridOptions::new().with_titles(&["left", "right"]);
        let grid = make_grid(1, 2, &options).unwrap();
        let annotations = grid.figure.layout.get("annotations").unwrap().as_array().unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[1]["text"], json!("right"));
        assert!(close(annotations[1]["x"].as_f64().unwrap(), 0.775));
        assert_eq!(annotations[0]["yref"], json!("paper"));
    }

    #[test]
    fn test_invalid_grids() {
        for (rows, cols, options) in [
            (0, 2, GridOptions::default()),
            (
                1,
                2,
                GridOptions {
                    specs: Some(vec![vec![Some(CellSpec::default())]]),
                    ..Default::default()
                },
            ),
            (
                1,
                2,
                GridOptions {
                    specs: Some(vec![vec![None, Some(CellSpec::span(2, 1))]]),
                    ..Default::default()
                },
            ),
            (
                1,
                3,
                GridOptions {
                    horizontal_spacing: Some(0.6),
                    ..Default::default()
                },
            ),
            (1, 1, GridOptions::new().with_titles(&["a", "b"])),
        ] {
            let err = make_grid(rows, cols, &options).unwrap_err();
            assert!(matches!(err, PlotlinksError::InvalidShape(_)), "{:?}", options);
        }
    }
}
