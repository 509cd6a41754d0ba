//! Chart building from DataFrames
//!
//! Free functions that turn a polars [`DataFrame`] into traces
//! ([`to_traces`]) or into complete figures ([`figure`]). Layout, secondary
//! axes, error bars and subplots are applied through the same public
//! operations the rest of the crate exposes.

mod columns;
mod traces;

pub use columns::{numeric_columns, values as column_values};
pub use traces::to_traces;

use crate::axis::{set_axis, AxisPlacement};
use crate::color::ColorSource;
use crate::config::Config;
use crate::error_bars::{set_errors, ErrorBar};
use crate::figure::{AxisId, AxisKind, Figure, Side};
use crate::layout::{get_layout, LayoutOptions};
use crate::subplots::{strip_figures, subplots, GridOptions};
use crate::{PlotlinksError, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Kind of chart [`to_traces`] builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Scatter,
    Line,
    /// Stacked cumulative lines, filled between
    Area,
    Bar,
    /// Horizontal bars
    Barh,
    Box,
    Histogram,
    Pie,
    Heatmap,
    Surface,
    Bubble,
    Scatter3d,
    Bubble3d,
    /// Lines plus the difference of the first two in a lower panel
    Spread,
    /// Lines plus the ratio of the first two in a lower panel
    Ratio,
}

impl ChartKind {
    pub const ALL: [ChartKind; 15] = [
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Bar,
        ChartKind::Barh,
        ChartKind::Box,
        ChartKind::Histogram,
        ChartKind::Pie,
        ChartKind::Heatmap,
        ChartKind::Surface,
        ChartKind::Bubble,
        ChartKind::Scatter3d,
        ChartKind::Bubble3d,
        ChartKind::Spread,
        ChartKind::Ratio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Bar => "bar",
            ChartKind::Barh => "barh",
            ChartKind::Box => "box",
            ChartKind::Histogram => "histogram",
            ChartKind::Pie => "pie",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Surface => "surface",
            ChartKind::Bubble => "bubble",
            ChartKind::Scatter3d => "scatter3d",
            ChartKind::Bubble3d => "bubble3d",
            ChartKind::Spread => "spread",
            ChartKind::Ratio => "ratio",
        }
    }

    pub fn is_bar(&self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::Barh)
    }

    pub fn is_3d(&self) -> bool {
        matches!(self, ChartKind::Scatter3d | ChartKind::Bubble3d)
    }

    /// Kinds drawn as one scatter line per column.
    pub fn is_line_like(&self) -> bool {
        matches!(
            self,
            ChartKind::Scatter
                | ChartKind::Line
                | ChartKind::Area
                | ChartKind::Spread
                | ChartKind::Ratio
        )
    }

    /// Kinds that take error bars.
    pub fn supports_error_bars(&self) -> bool {
        matches!(
            self,
            ChartKind::Scatter | ChartKind::Line | ChartKind::Bar | ChartKind::Barh
        )
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = PlotlinksError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        let s = match s.as_str() {
            "lines" => "line",
            "hist" => "histogram",
            other => other,
        };
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PlotlinksError::ValidationError(format!("unknown chart kind '{}'", s)))
    }
}

/// Settings for pie charts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieOptions {
    pub sort: Option<bool>,
    pub pull: Option<f64>,
    pub hole: Option<f64>,
    pub textposition: Option<String>,
    pub textinfo: Option<String>,
    pub linecolor: Option<String>,
}

/// How columns become traces
#[derive(Debug, Clone, PartialEq)]
pub struct TraceOptions {
    /// Columns to chart; all numeric columns when empty
    pub keys: Vec<String>,
    /// Column for the x axis; row positions when unset
    pub x: Option<String>,
    pub y: Option<String>,
    pub z: Option<String>,
    /// Column holding hover text
    pub text: Option<String>,
    /// Column whose values split the rows into one trace each
    pub categories: Option<String>,
    /// Pie labels column
    pub labels: Option<String>,
    /// Pie values column
    pub values: Option<String>,
    /// Column sizing bubbles
    pub size_column: Option<String>,
    pub colors: ColorSource,
    /// Color scale name; the theme's scale when unset
    pub colorscale: Option<String>,
    /// Scatter mode: `lines`, `markers`, `lines+markers`, ...
    pub mode: String,
    pub symbol: String,
    /// Marker size
    pub size: f64,
    pub fill: bool,
    /// Line width; the theme's line width when unset
    pub width: Option<f64>,
    pub opacity: Option<f64>,
    /// Order bars by column total, largest first
    pub sortbars: bool,
    /// Add a least-squares line per column
    pub bestfit: bool,
    pub bestfit_colors: Option<ColorSource>,
    /// `v` or `h`
    pub orientation: Option<String>,
    pub bins: Option<usize>,
    pub histnorm: Option<String>,
    pub histfunc: Option<String>,
    /// Box plot points: `all`, `outliers`, `suspectedoutliers`; none when unset
    pub boxpoints: Option<String>,
    pub pie: PieOptions,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            x: None,
            y: None,
            z: None,
            text: None,
            categories: None,
            labels: None,
            values: None,
            size_column: None,
            colors: ColorSource::Auto,
            colorscale: None,
            mode: "lines".to_string(),
            symbol: "circle".to_string(),
            size: 12.0,
            fill: false,
            width: None,
            opacity: None,
            sortbars: false,
            bestfit: false,
            bestfit_colors: None,
            orientation: None,
            bins: None,
            histnorm: None,
            histfunc: None,
            boxpoints: None,
            pie: PieOptions::default(),
        }
    }
}

impl TraceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.keys = keys.iter().map(|k| k.as_ref().to_string()).collect();
        self
    }

    pub fn with_x(mut self, x: &str) -> Self {
        self.x = Some(x.to_string());
        self
    }

    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = mode.to_string();
        self
    }
}

/// Everything [`figure`] needs besides the data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub traces: TraceOptions,
    pub layout: LayoutOptions,
    /// Overrides the configured theme
    pub theme: Option<String>,
    /// Traces moved onto a right-hand y axis
    pub secondary_y: Vec<String>,
    pub error_x: Option<ErrorBar>,
    pub error_y: Option<ErrorBar>,
    /// Trace the error bars apply to; all traces when unset
    pub error_trace: Option<String>,
    /// One panel per trace
    pub subplots: bool,
    pub shape: Option<(usize, usize)>,
    pub grid: GridOptions,
    /// Title each panel with its trace name
    pub subplot_titles: bool,
}

impl ChartOptions {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_traces(mut self, traces: TraceOptions) -> Self {
        self.traces = traces;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.layout.title = Some(title.to_string());
        self
    }
}

// =============================================================================
// Figure building
// =============================================================================

/// Build a complete figure from a DataFrame.
///
/// # Example
/// ```
/// use plotlinks::chart::{figure, ChartKind, ChartOptions};
/// use plotlinks::Config;
/// use polars::prelude::*;
///
/// let df = df! { "a" => [1.0, 2.0, 3.0], "b" => [3.0, 1.0, 2.0] }.unwrap();
/// let fig = figure(&df, &ChartOptions::new(ChartKind::Line), &Config::default()).unwrap();
/// assert_eq!(fig.data.len(), 2);
/// ```
pub fn figure(df: &DataFrame, options: &ChartOptions, config: &Config) -> Result<Figure> {
    let theme = options.theme.as_deref().unwrap_or(&config.theme);
    let kind = options.kind;

    let mut layout_options = options.layout.clone();
    layout_options.is_3d = kind.is_3d();
    if layout_options.margin.is_none() {
        layout_options.margin = config.margin;
    }
    if kind == ChartKind::Histogram && layout_options.bar_mode.is_none() {
        layout_options.bar_mode = Some("overlay".to_string());
    }
    let mut layout = get_layout(theme, &layout_options)?;

    let mut trace_options = options.traces.clone();
    if trace_options.colorscale.is_none() && matches!(trace_options.colors, ColorSource::Auto) {
        trace_options.colorscale = config_scale(config);
    }
    let data = to_traces(df, kind, &trace_options, theme)?;

    match kind {
        ChartKind::Spread | ChartKind::Ratio => add_lower_panel(&mut layout, kind),
        ChartKind::Pie => {
            layout.axes.remove(&AxisId::x(1));
            layout.axes.remove(&AxisId::y(1));
        }
        ChartKind::Bar | ChartKind::Barh => {
            if layout_options.bar_mode.as_deref().is_some_and(|m| m.contains("stack")) {
                if let Some(Value::Object(legend)) = layout.properties.get_mut("legend") {
                    legend.insert("traceorder".to_string(), json!("normal"));
                }
            }
        }
        _ => {}
    }

    let mut fig = Figure::new(data, layout);

    if !options.secondary_y.is_empty() {
        fig = set_axis(&fig, &options.secondary_y, &AxisPlacement::side(Side::Right))?;
    }

    if kind.supports_error_bars() {
        let trace = options.error_trace.as_deref();
        if let Some(bar) = &options.error_x {
            fig = set_errors(&fig, trace, &bar.clone().on_axis(AxisKind::X))?;
        }
        if let Some(bar) = &options.error_y {
            fig = set_errors(&fig, trace, &bar.clone().on_axis(AxisKind::Y))?;
        }
    }

    if options.subplots {
        let mut grid = options.grid.clone();
        if options.subplot_titles {
            grid.subplot_titles = fig.data.iter().map(|t| t.name_or_empty().to_string()).collect();
        }
        let panels = strip_figures(&fig);
        fig = subplots(&panels, options.shape, &grid, Some(theme), Some(&fig.layout))?;
    }

    tracing::debug!(kind = %kind, theme, traces = fig.data.len(), "built figure");
    Ok(fig)
}

/// Configured default scale, unless it is the plain default.
fn config_scale(config: &Config) -> Option<String> {
    (config.colorscale != crate::config::DEFAULT_COLORSCALE).then(|| config.colorscale.clone())
}

/// Shrink the main panel and add the `x2`/`y2` panel spread and ratio
/// charts draw their lower trace on.
fn add_lower_panel(layout: &mut crate::figure::Layout, kind: ChartKind) {
    let title = match kind {
        ChartKind::Spread => "Spread",
        _ => "Ratio",
    };
    let y1 = layout.axis_mut(AxisId::y(1));
    y1.domain = Some(crate::Domain::new(0.3, 1.0));
    let mut y2 = y1.clone();
    y2.domain = Some(crate::Domain::new(0.0, 0.25));
    y2.set_title(title);

    let mut x2 = layout.axis_mut(AxisId::x(1)).clone();
    x2.anchor = Some(AxisId::y(2));
    x2.set("showticklabels", json!(false));

    layout.set_axis_def(AxisId::y(2), y2);
    layout.set_axis_def(AxisId::x(2), x2);
    layout.set("hovermode", json!("x"));
}

/// One figure per option set.
pub fn figures(df: &DataFrame, specs: &[ChartOptions], config: &Config) -> Result<Vec<Figure>> {
    specs.iter().map(|spec| figure(df, spec, config)).collect()
}

/// Options for [`scatter_matrix`]
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixOptions {
    pub theme: Option<String>,
    pub bins: usize,
    pub color: String,
    pub size: f64,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            theme: None,
            bins: 10,
            color: "grey".to_string(),
            size: 2.0,
        }
    }
}

/// Scatter plot of every pair of numeric columns, with histograms on the
/// diagonal.
pub fn scatter_matrix(df: &DataFrame, options: &MatrixOptions, config: &Config) -> Result<Figure> {
    let theme = options.theme.as_deref().unwrap_or(&config.theme);
    let columns = numeric_columns(df);
    if columns.is_empty() {
        return Err(PlotlinksError::DataError(
            "a scatter matrix needs at least one numeric column".to_string(),
        ));
    }

    let mut panels = Vec::with_capacity(columns.len() * columns.len());
    for row in &columns {
        for col in &columns {
            let mut spec = if row == col {
                let mut spec = ChartOptions::new(ChartKind::Histogram);
                spec.traces.keys = vec![row.clone()];
                spec.traces.bins = Some(options.bins);
                spec
            } else {
                let mut spec = ChartOptions::new(ChartKind::Scatter);
                spec.traces = TraceOptions::new()
                    .with_keys(&[row])
                    .with_x(col)
                    .with_mode("markers");
                spec.traces.size = options.size;
                spec.traces.colors = ColorSource::List(vec![options.color.clone()]);
                spec
            };
            spec.theme = Some(theme.to_string());
            panels.push(figure(df, &spec, config)?);
        }
    }

    let mut base = get_layout(theme, &LayoutOptions::new())?;
    base.axis_mut(AxisId::x(1)).set("showgrid", json!(false));
    base.axis_mut(AxisId::y(1)).set("showgrid", json!(false));
    let grid = GridOptions {
        horizontal_spacing: Some(0.05),
        vertical_spacing: Some(0.07),
        ..Default::default()
    };
    let n = columns.len();
    let mut matrix = subplots(&panels, Some((n, n)), &grid, Some(theme), Some(&base))?;
    matrix.layout.set("bargap", json!(0.02));
    matrix.layout.set("showlegend", json!(false));
    Ok(matrix)
}

// =============================================================================
// Best fit
// =============================================================================

/// Least-squares line through one column
#[derive(Debug, Clone, PartialEq)]
pub struct BestFit {
    pub slope: f64,
    pub intercept: f64,
    /// Fitted value for every row
    pub fitted: Vec<f64>,
}

impl BestFit {
    /// `slope*x+intercept`, two decimals
    pub fn formula(&self) -> String {
        format!("{:.2}*x+{:.2}", self.slope, self.intercept)
    }
}

/// Fit a straight line to `column` against `x`.
///
/// `x` defaults to row positions; a date column is replaced by positions
/// counted from one. When `column` is not given the frame must have
/// exactly one numeric column other than `x`.
pub fn best_fit(df: &DataFrame, column: Option<&str>, x: Option<&str>) -> Result<BestFit> {
    let column = match column {
        Some(name) => name.to_string(),
        None => {
            let candidates: Vec<String> = numeric_columns(df)
                .into_iter()
                .filter(|c| Some(c.as_str()) != x)
                .collect();
            match candidates.as_slice() {
                [only] => only.clone(),
                [] => {
                    return Err(PlotlinksError::DataError(
                        "no numeric column to fit".to_string(),
                    ))
                }
                _ => {
                    return Err(PlotlinksError::AmbiguousColumn(format!(
                        "{} numeric columns ({}); name the one to fit",
                        candidates.len(),
                        candidates.join(", ")
                    )))
                }
            }
        }
    };

    let ys = columns::numbers(df, &column)?;
    let xs: Vec<f64> = match x {
        Some(name) if columns::is_temporal(df, name)? => (1..=ys.len()).map(|i| i as f64).collect(),
        Some(name) => columns::numbers(df, name)?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect(),
        None => (0..ys.len()).map(|i| i as f64).collect(),
    };
    fit_line(&xs, &ys)
}

pub(crate) fn fit_line(xs: &[f64], ys: &[Option<f64>]) -> Result<BestFit> {
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| match y {
            Some(y) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    let n = points.len() as f64;
    if points.len() < 2 {
        return Err(PlotlinksError::DataError(
            "a best fit line needs at least two points".to_string(),
        ));
    }

    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return Err(PlotlinksError::DataError(
            "x values do not vary; no line fits".to_string(),
        ));
    }
    let sxy: f64 = points.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    Ok(BestFit {
        slope,
        intercept,
        fitted: xs.iter().map(|x| slope * x + intercept).collect(),
    })
}
