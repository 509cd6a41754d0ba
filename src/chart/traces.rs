//! Trace synthesis: DataFrame columns to plotly traces

use super::columns::{self, is_temporal, labels, numbers, numeric_columns, require, to_json, values, x_values};
use super::{fit_line, ChartKind, TraceOptions};
use crate::color::{get_colors, get_colorscale, to_rgba, ColorSource};
use crate::figure::{AxisId, Trace};
use crate::theme::{get_theme, Theme};
use crate::{PlotlinksError, Result};
use polars::prelude::DataFrame;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

const FILL_OPACITY: f64 = 0.3;
const BAR_OPACITY: f64 = 0.6;
const HISTOGRAM_OPACITY: f64 = 0.8;
const DEFAULT_HEATMAP_SCALE: &str = "rdbu";

/// Turn DataFrame columns into traces of one kind.
///
/// Colors come from `options.colors`, falling back to the theme's scale.
/// Columns named in the options must exist or the call fails with
/// [`PlotlinksError::ColumnNotFound`].
pub fn to_traces(
    df: &DataFrame,
    kind: ChartKind,
    options: &TraceOptions,
    theme: &str,
) -> Result<Vec<Trace>> {
    let theme = get_theme(theme)?;
    let named: Vec<&String> = [
        &options.x,
        &options.y,
        &options.z,
        &options.text,
        &options.categories,
        &options.labels,
        &options.values,
        &options.size_column,
    ]
    .into_iter()
    .flatten()
    .chain(options.keys.iter())
    .collect();
    require(df, &named)?;

    let ctx = Context::new(options, theme);
    let traces = match kind {
        _ if options.categories.is_some() && kind.is_bar() => {
            let mut grouped = options.clone();
            grouped.x = options.categories.clone();
            grouped.categories = None;
            return to_traces(df, kind, &grouped, theme.name);
        }
        ChartKind::Scatter | ChartKind::Bubble | ChartKind::Scatter3d | ChartKind::Bubble3d
            if options.categories.is_some() =>
        {
            category_traces(df, kind, &ctx)?
        }
        ChartKind::Scatter | ChartKind::Line | ChartKind::Area => line_traces(df, kind, &ctx)?,
        ChartKind::Spread | ChartKind::Ratio => {
            let mut traces = line_traces(df, kind, &ctx)?;
            traces.extend(lower_panel_traces(df, kind, &ctx)?);
            traces
        }
        ChartKind::Bar | ChartKind::Barh => bar_traces(df, kind, &ctx)?,
        ChartKind::Box => box_traces(df, &ctx)?,
        ChartKind::Histogram => histogram_traces(df, &ctx)?,
        ChartKind::Pie => vec![pie_trace(df, &ctx)?],
        ChartKind::Heatmap | ChartKind::Surface => vec![grid_trace(df, kind, &ctx)?],
        ChartKind::Bubble => vec![bubble_trace(df, &ctx)?],
        ChartKind::Scatter3d | ChartKind::Bubble3d => vec![scatter3d_trace(df, kind, &ctx)?],
    };
    tracing::debug!(kind = %kind, count = traces.len(), "synthesized traces");
    Ok(traces)
}

/// Resolved settings shared by every trace builder.
struct Context<'a> {
    options: &'a TraceOptions,
    theme: &'static Theme,
    scale: String,
    width: f64,
}

impl<'a> Context<'a> {
    fn new(options: &'a TraceOptions, theme: &'static Theme) -> Self {
        Self {
            options,
            theme,
            scale: options
                .colorscale
                .clone()
                .unwrap_or_else(|| theme.colorscale.to_string()),
            width: options.width.unwrap_or(theme.linewidth),
        }
    }

    fn colors<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<String>> {
        get_colors(keys, &self.options.colors, &self.scale)
    }

    /// Columns to draw: the explicit keys, the `y` column, or every numeric
    /// column that is not used for something else.
    fn keys(&self, df: &DataFrame) -> Vec<String> {
        if !self.options.keys.is_empty() {
            return self.options.keys.clone();
        }
        if let Some(y) = &self.options.y {
            return vec![y.clone()];
        }
        let used = [&self.options.x, &self.options.text, &self.options.size_column];
        numeric_columns(df)
            .into_iter()
            .filter(|c| !used.iter().any(|u| u.as_deref() == Some(c.as_str())))
            .collect()
    }

    fn text(&self, df: &DataFrame) -> Result<Option<Value>> {
        self.options
            .text
            .as_deref()
            .map(|name| values(df, name).map(Value::Array))
            .transpose()
    }

    fn textfont(&self) -> Option<Value> {
        self.theme
            .raw_layout()
            .get("xaxis")
            .and_then(|axis| axis.get("titlefont"))
            .cloned()
    }

    fn marker(&self, color: Value, size: Value) -> Value {
        let mut marker = json!({
            "color": color,
            "symbol": self.options.symbol,
            "size": size,
            "line": {"width": self.width}
        });
        if let Some(opacity) = self.options.opacity {
            marker["opacity"] = json!(opacity);
        }
        marker
    }
}

fn markers_only(mode: &str) -> String {
    if mode.contains("markers") {
        mode.to_string()
    } else {
        "markers".to_string()
    }
}

/// Scale sizes onto 12..=112 relative to the column's full range.
fn bubble_sizes(sizes: &[Option<f64>]) -> Vec<Value> {
    let present = sizes.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;
    sizes
        .iter()
        .map(|v| match v {
            Some(v) if range > 0.0 => json!((100.0 * (v - min) / range) as i64 + 12),
            Some(_) => json!(12),
            None => Value::Null,
        })
        .collect()
}

fn pick<T: Clone>(items: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().filter_map(|&i| items.get(i).cloned()).collect()
}

// =============================================================================
// Line-like traces
// =============================================================================

fn line_traces(df: &DataFrame, kind: ChartKind, ctx: &Context) -> Result<Vec<Trace>> {
    let options = ctx.options;
    let keys = ctx.keys(df);
    let colors = ctx.colors(&keys)?;
    let x = Value::Array(x_values(df, options.x.as_deref())?);
    let text = ctx.text(df)?;

    let mut running: Vec<f64> = vec![0.0; df.height()];
    let mut traces = Vec::with_capacity(keys.len());
    for (key, color) in keys.iter().zip(&colors) {
        let ys = numbers(df, key)?;
        let ys: Vec<Option<f64>> = if kind == ChartKind::Area {
            for (total, y) in running.iter_mut().zip(&ys) {
                *total += y.unwrap_or(0.0);
            }
            running.iter().map(|v| Some(*v)).collect()
        } else {
            ys
        };

        let mut trace = Trace::new("scatter")
            .with_name(key)
            .with("x", x.clone())
            .with("y", to_json(&ys))
            .with("mode", json!(options.mode))
            .with("line", json!({"color": color, "width": ctx.width}));
        if options.mode.contains("markers") {
            trace.set("marker", ctx.marker(json!(color), json!(options.size)));
        }
        if kind == ChartKind::Area || options.fill {
            let fill = if kind == ChartKind::Area { "tonexty" } else { "tozeroy" };
            let opacity = options.opacity.unwrap_or(FILL_OPACITY);
            trace.set("fill", json!(fill));
            trace.set("fillcolor", json!(to_rgba(color, opacity)?));
        }
        if let Some(text) = &text {
            trace.set("text", text.clone());
        }
        traces.push(trace);
    }

    if options.bestfit {
        traces.extend(best_fit_traces(df, &keys, &x, ctx)?);
    }
    Ok(traces)
}

/// Dashed least-squares lines, one per key, named after their formula.
fn best_fit_traces(df: &DataFrame, keys: &[String], x: &Value, ctx: &Context) -> Result<Vec<Trace>> {
    let xs: Vec<f64> = match ctx.options.x.as_deref() {
        Some(name) if is_temporal(df, name)? => (1..=df.height()).map(|i| i as f64).collect(),
        Some(name) if columns::is_numeric(df.column(name)?.dtype()) => numbers(df, name)?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect(),
        _ => (0..df.height()).map(|i| i as f64).collect(),
    };

    let mut fits = Vec::with_capacity(keys.len());
    for key in keys {
        let fit = fit_line(&xs, &numbers(df, key)?)?;
        fits.push(fit);
    }
    let formulas: Vec<String> = fits.iter().map(|f| f.formula()).collect();
    let colors = match &ctx.options.bestfit_colors {
        Some(source) => get_colors(&formulas, source, &ctx.scale)?,
        None => get_colors(&formulas, &ColorSource::Auto, &ctx.scale)?
            .iter()
            .map(|c| to_rgba(c, BAR_OPACITY))
            .collect::<Result<_>>()?,
    };

    Ok(fits
        .iter()
        .zip(formulas.iter().zip(&colors))
        .map(|(fit, (formula, color))| {
            let fitted: Vec<Option<f64>> = fit.fitted.iter().map(|v| Some(*v)).collect();
            Trace::new("scatter")
                .with_name(formula)
                .with("x", x.clone())
                .with("y", to_json(&fitted))
                .with("mode", json!("lines"))
                .with("line", json!({"color": color, "width": ctx.width, "dash": "dash"}))
        })
        .collect())
}

/// Difference or ratio of the first two keys, drawn on `x2`/`y2`.
fn lower_panel_traces(df: &DataFrame, kind: ChartKind, ctx: &Context) -> Result<Vec<Trace>> {
    let keys = ctx.keys(df);
    let (first, second) = match keys.as_slice() {
        [a, b, ..] => (numbers(df, a)?, numbers(df, b)?),
        _ => {
            return Err(PlotlinksError::ValidationError(format!(
                "a {} chart needs at least two columns",
                kind
            )))
        }
    };
    let x = Value::Array(x_values(df, ctx.options.x.as_deref())?);
    let title = match kind {
        ChartKind::Spread => "Spread",
        _ => "Ratio",
    };

    let lower = |ys: Vec<Option<f64>>, color: &str, width: f64| {
        Trace::new("scatter")
            .with_name(title)
            .with("x", x.clone())
            .with("y", to_json(&ys))
            .with("mode", json!("lines"))
            .with("line", json!({"color": color, "width": width}))
            .with("fill", json!("tozeroy"))
            .with("connectgaps", json!(false))
            .with("showlegend", json!(false))
            .on(AxisId::x(2))
            .on(AxisId::y(2))
    };

    let pairs = first.iter().zip(&second);
    if kind == ChartKind::Spread {
        let spread: Vec<Option<f64>> = pairs.map(|(a, b)| Some((*a)? - (*b)?)).collect();
        let positive = spread.iter().map(|v| v.filter(|v| *v >= 0.0)).collect();
        let negative = spread.iter().map(|v| v.filter(|v| *v < 0.0)).collect();
        Ok(vec![
            lower(positive, "#008000", 0.5),
            lower(negative, "#ff0000", 0.5),
        ])
    } else {
        let ratio = pairs
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) if *b != 0.0 => Some(a / b),
                _ => None,
            })
            .collect();
        Ok(vec![lower(ratio, "#008000", 1.0)])
    }
}

// =============================================================================
// Bars and distributions
// =============================================================================

fn bar_traces(df: &DataFrame, kind: ChartKind, ctx: &Context) -> Result<Vec<Trace>> {
    let options = ctx.options;
    let mut keys = ctx.keys(df);
    if options.sortbars {
        let mut totals = Vec::with_capacity(keys.len());
        for key in keys.drain(..) {
            let total: f64 = numbers(df, &key)?.into_iter().flatten().sum();
            totals.push((key, total));
        }
        totals.sort_by(|a, b| b.1.total_cmp(&a.1));
        keys = totals.into_iter().map(|(k, _)| k).collect();
    }
    let colors = ctx.colors(&keys)?;
    let x = Value::Array(x_values(df, options.x.as_deref())?);
    let text = ctx.text(df)?;
    let orientation = match kind {
        ChartKind::Barh => "h".to_string(),
        _ => options.orientation.clone().unwrap_or_else(|| "v".to_string()),
    };

    let mut traces = Vec::with_capacity(keys.len());
    for (key, color) in keys.iter().zip(&colors) {
        let ys = to_json(&numbers(df, key)?);
        let (xs, ys) = match kind {
            ChartKind::Barh => (ys, x.clone()),
            _ => (x.clone(), ys),
        };
        let mut trace = Trace::new("bar")
            .with_name(key)
            .with("x", xs)
            .with("y", ys)
            .with("orientation", json!(orientation))
            .with(
                "marker",
                json!({"color": to_rgba(color, BAR_OPACITY)?, "line": {"color": color, "width": 1}}),
            );
        if let Some(text) = &text {
            trace.set("text", text.clone());
        }
        traces.push(trace);
    }
    Ok(traces)
}

fn box_traces(df: &DataFrame, ctx: &Context) -> Result<Vec<Trace>> {
    let keys = ctx.keys(df);
    let colors = ctx.colors(&keys)?;
    let boxpoints = match &ctx.options.boxpoints {
        Some(points) => json!(points),
        None => json!(false),
    };
    keys.iter()
        .zip(&colors)
        .map(|(key, color)| {
            Ok(Trace::new("box")
                .with_name(key)
                .with("y", to_json(&numbers(df, key)?))
                .with("marker", json!({"color": color}))
                .with("line", json!({"width": ctx.width}))
                .with("boxpoints", boxpoints.clone()))
        })
        .collect()
}

fn histogram_traces(df: &DataFrame, ctx: &Context) -> Result<Vec<Trace>> {
    let options = ctx.options;
    let keys = ctx.keys(df);
    let colors = ctx.colors(&keys)?;
    let horizontal = options.orientation.as_deref() == Some("h");

    let mut traces = Vec::with_capacity(keys.len());
    for (key, color) in keys.iter().zip(&colors) {
        let axis = if horizontal { "y" } else { "x" };
        let mut trace = Trace::new("histogram")
            .with_name(key)
            .with(axis, to_json(&numbers(df, key)?))
            .with("marker", json!({"color": color}))
            .with("line", json!({"width": ctx.width}))
            .with("opacity", json!(options.opacity.unwrap_or(HISTOGRAM_OPACITY)))
            .with("histfunc", json!(options.histfunc.as_deref().unwrap_or("count")));
        if horizontal {
            trace.set("orientation", json!("h"));
        }
        if let Some(norm) = &options.histnorm {
            trace.set("histnorm", json!(norm));
        }
        if let Some(bins) = options.bins {
            trace.set(if horizontal { "nbinsy" } else { "nbinsx" }, json!(bins));
        }
        traces.push(trace);
    }
    Ok(traces)
}

fn pie_trace(df: &DataFrame, ctx: &Context) -> Result<Trace> {
    let options = ctx.options;
    let (labels_column, values_column) = match (&options.labels, &options.values) {
        (Some(l), Some(v)) => (l, v),
        _ => {
            return Err(PlotlinksError::ValidationError(
                "a pie chart needs both a labels and a values column".to_string(),
            ))
        }
    };
    let names = labels(df, labels_column)?;
    let colors = ctx.colors(&names)?;

    let mut marker = Map::new();
    marker.insert("colors".to_string(), json!(colors));
    let mut line = Map::new();
    if let Some(color) = &options.pie.linecolor {
        line.insert("color".to_string(), json!(color));
    }
    if let Some(width) = options.width {
        line.insert("width".to_string(), json!(width));
    }
    if !line.is_empty() {
        marker.insert("line".to_string(), Value::Object(line));
    }

    let mut trace = Trace::new("pie")
        .with_name("")
        .with("labels", json!(names))
        .with("values", Value::Array(values(df, values_column)?))
        .with("marker", Value::Object(marker));
    let pie = &options.pie;
    if let Some(sort) = pie.sort {
        trace.set("sort", json!(sort));
    }
    if let Some(pull) = pie.pull {
        trace.set("pull", json!(pull));
    }
    if let Some(hole) = pie.hole {
        trace.set("hole", json!(hole));
    }
    if let Some(position) = &pie.textposition {
        trace.set("textposition", json!(position));
    }
    if let Some(info) = &pie.textinfo {
        trace.set("textinfo", json!(info));
    }
    Ok(trace)
}

// =============================================================================
// Grids, bubbles and 3-D
// =============================================================================

/// Heatmap or surface: `z` from the named column, or one row per key.
fn grid_trace(df: &DataFrame, kind: ChartKind, ctx: &Context) -> Result<Trace> {
    let options = ctx.options;
    let scale = options.colorscale.as_deref().unwrap_or(DEFAULT_HEATMAP_SCALE);
    let colorscale: Vec<Value> = get_colorscale(scale)?
        .into_iter()
        .map(|(pos, color)| json!([pos, color]))
        .collect();

    let (x, y, z) = match &options.z {
        Some(z) => (
            Value::Array(x_values(df, options.x.as_deref())?),
            match &options.y {
                Some(y) => Value::Array(values(df, y)?),
                None => Value::Array(x_values(df, None)?),
            },
            to_json(&numbers(df, z)?),
        ),
        None => {
            let keys = ctx.keys(df);
            let rows = keys
                .iter()
                .map(|k| Ok(to_json(&numbers(df, k)?)))
                .collect::<Result<Vec<_>>>()?;
            (
                Value::Array(x_values(df, options.x.as_deref())?),
                json!(keys),
                Value::Array(rows),
            )
        }
    };

    let name = match kind {
        ChartKind::Surface => "surface",
        _ => "heatmap",
    };
    Ok(Trace::new(name)
        .with("x", x)
        .with("y", y)
        .with("z", z)
        .with("colorscale", Value::Array(colorscale)))
}

fn bubble_column<'a>(ctx: &Context<'a>) -> Result<&'a str> {
    ctx.options
        .size_column
        .as_deref()
        .or(ctx.options.z.as_deref())
        .ok_or_else(|| {
            PlotlinksError::ValidationError("a bubble chart needs a size column".to_string())
        })
}

fn require_xy(ctx: &Context, kind: ChartKind) -> Result<(String, String)> {
    match (&ctx.options.x, &ctx.options.y) {
        (Some(x), Some(y)) => Ok((x.clone(), y.clone())),
        _ => Err(PlotlinksError::ValidationError(format!(
            "a {} chart needs both x and y columns",
            kind
        ))),
    }
}

fn bubble_trace(df: &DataFrame, ctx: &Context) -> Result<Trace> {
    let (x, y) = require_xy(ctx, ChartKind::Bubble)?;
    let sizes = bubble_sizes(&numbers(df, bubble_column(ctx)?)?);
    let color = ctx.colors(&["bubble"])?.remove(0);
    let colors = vec![json!(color); df.height()];

    let mut trace = Trace::new("scatter")
        .with("x", Value::Array(values(df, &x)?))
        .with("y", Value::Array(values(df, &y)?))
        .with("mode", json!("markers"))
        .with("marker", ctx.marker(Value::Array(colors), Value::Array(sizes)));
    let labels = ctx.options.labels.as_deref().or(ctx.options.text.as_deref());
    if let Some(labels) = labels {
        trace.set("text", Value::Array(values(df, labels)?));
    }
    if let Some(font) = ctx.textfont() {
        trace.set("textfont", font);
    }
    Ok(trace)
}

fn scatter3d_trace(df: &DataFrame, kind: ChartKind, ctx: &Context) -> Result<Trace> {
    let options = ctx.options;
    let (x, y) = require_xy(ctx, kind)?;
    let z = options.z.as_deref().ok_or_else(|| {
        PlotlinksError::ValidationError(format!("a {} chart needs a z column", kind))
    })?;
    let keys: Vec<String> = match &options.text {
        Some(text) => labels(df, text)?,
        None => (0..df.height()).map(|i| i.to_string()).collect(),
    };
    let colors = ctx.colors(&keys)?;
    let sizes = match kind {
        ChartKind::Bubble3d => Value::Array(bubble_sizes(&numbers(df, bubble_column(ctx)?)?)),
        _ => json!(vec![options.size; df.height()]),
    };

    let mut marker = ctx.marker(json!(colors), sizes);
    marker["opacity"] = json!(options.opacity.unwrap_or(HISTOGRAM_OPACITY));
    let mut trace = Trace::new("scatter3d")
        .with("x", Value::Array(values(df, &x)?))
        .with("y", Value::Array(values(df, &y)?))
        .with("z", Value::Array(values(df, z)?))
        .with("mode", json!(markers_only(&options.mode)))
        .with("marker", marker);
    if options.text.is_some() {
        trace.set("text", json!(keys));
    }
    Ok(trace)
}

/// One marker trace per distinct value of the categories column, in order
/// of first appearance.
fn category_traces(df: &DataFrame, kind: ChartKind, ctx: &Context) -> Result<Vec<Trace>> {
    let options = ctx.options;
    let column = options.categories.as_deref().unwrap_or_default();
    let (x_name, y_name) = require_xy(ctx, kind)?;
    let categories = labels(df, column)?;

    let mut order: Vec<String> = Vec::new();
    let mut rows: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, category) in categories.iter().enumerate() {
        let entry = rows.entry(category.as_str()).or_default();
        if entry.is_empty() {
            order.push(category.clone());
        }
        entry.push(i);
    }
    let colors = ctx.colors(&order)?;

    let xs = values(df, &x_name)?;
    let ys = values(df, &y_name)?;
    let zs = match (kind.is_3d(), &options.z) {
        (true, Some(z)) => Some(values(df, z)?),
        (true, None) => {
            return Err(PlotlinksError::ValidationError(format!(
                "a {} chart needs a z column",
                kind
            )))
        }
        _ => None,
    };
    let sizes = match kind {
        ChartKind::Bubble | ChartKind::Bubble3d => Some(bubble_sizes(&numbers(df, bubble_column(ctx)?)?)),
        _ => None,
    };
    let text = ctx.text(df)?;
    let textfont = ctx.textfont();
    let mode = markers_only(&options.mode);

    let mut traces = Vec::with_capacity(order.len());
    for (category, color) in order.iter().zip(&colors) {
        let picked = &rows[category.as_str()];
        let size = match &sizes {
            Some(sizes) => Value::Array(pick(sizes, picked)),
            None => json!(options.size),
        };
        let mut trace = Trace::new(if kind.is_3d() { "scatter3d" } else { "scatter" })
            .with_name(category)
            .with("x", Value::Array(pick(&xs, picked)))
            .with("y", Value::Array(pick(&ys, picked)))
            .with("mode", json!(mode))
            .with("marker", ctx.marker(json!(color), size));
        if let Some(zs) = &zs {
            trace.set("z", Value::Array(pick(zs, picked)));
        }
        if let Some(Value::Array(text)) = &text {
            trace.set("text", Value::Array(pick(text, picked)));
        }
        if let Some(font) = &textfont {
            trace.set("textfont", font.clone());
        }
        traces.push(trace);
    }
    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame() -> DataFrame {
        df! {
            "x" => [1.0f64, 2.0, 3.0],
            "a" => [1.0f64, 2.0, 3.0],
            "b" => [3.0f64, 1.0, 2.0]
        }
        .unwrap()
    }

    fn opts() -> TraceOptions {
        TraceOptions::new()
    }

    #[test]
    fn test_line_traces_use_all_numeric_columns() {
        let traces = to_traces(&frame(), ChartKind::Line, &opts(), "pearl").unwrap();
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[1].name.as_deref(), Some("a"));
        assert_eq!(traces[1].get("x").unwrap(), &json!([0, 1, 2]));
        assert_eq!(traces[1].get("line").unwrap()["width"], json!(1.3));
        assert!(traces[1].get("marker").is_none());
    }

    #[test]
    fn test_x_column_is_excluded_from_keys() {
        let traces = to_traces(&frame(), ChartKind::Scatter, &opts().with_x("x"), "pearl").unwrap();
        let names: Vec<_> = traces.iter().map(|t| t.name_or_empty()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(traces[0].get("x").unwrap(), &json!([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_markers_mode_adds_marker() {
        let options = opts().with_mode("lines+markers");
        let traces = to_traces(&frame(), ChartKind::Line, &options, "pearl").unwrap();
        assert_eq!(traces[0].get("marker").unwrap()["symbol"], json!("circle"));
        assert_eq!(traces[0].get("marker").unwrap()["size"], json!(12.0));
    }

    #[test]
    fn test_area_is_cumulative() {
        let options = opts().with_keys(&["a", "b"]);
        let traces = to_traces(&frame(), ChartKind::Area, &options, "pearl").unwrap();
        assert_eq!(traces[1].get("y").unwrap(), &json!([4.0, 3.0, 5.0]));
        assert_eq!(traces[1].get("fill").unwrap(), &json!("tonexty"));
        assert!(traces[1]
            .get("fillcolor")
            .unwrap()
            .as_str()
            .unwrap()
            .ends_with("0.3)"));
    }

    #[test]
    fn test_bar_and_barh() {
        let options = opts().with_keys(&["a"]).with_x("x");
        let bar = to_traces(&frame(), ChartKind::Bar, &options, "pearl").unwrap();
        assert_eq!(bar[0].kind.as_deref(), Some("bar"));
        assert_eq!(bar[0].get("marker").unwrap()["line"]["width"], json!(1));

        let barh = to_traces(&frame(), ChartKind::Barh, &options, "pearl").unwrap();
        assert_eq!(barh[0].get("orientation").unwrap(), &json!("h"));
        assert_eq!(barh[0].get("y").unwrap(), bar[0].get("x").unwrap());
    }

    #[test]
    fn test_sortbars_by_total() {
        let df = df! { "small" => [1.0f64, 1.0], "large" => [5.0f64, 5.0] }.unwrap();
        let options = TraceOptions {
            sortbars: true,
            ..opts()
        };
        let traces = to_traces(&df, ChartKind::Bar, &options, "pearl").unwrap();
        assert_eq!(traces[0].name.as_deref(), Some("large"));
    }

    #[test]
    fn test_bestfit_traces() {
        let options = TraceOptions {
            bestfit: true,
            ..opts().with_keys(&["a"]).with_x("x")
        };
        let traces = to_traces(&frame(), ChartKind::Scatter, &options, "pearl").unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[1].name.as_deref(), Some("1.00*x+0.00"));
        assert_eq!(traces[1].get("line").unwrap()["dash"], json!("dash"));
    }

    #[test]
    fn test_spread_needs_two_columns() {
        let options = opts().with_keys(&["a"]);
        let err = to_traces(&frame(), ChartKind::Spread, &options, "pearl").unwrap_err();
        assert!(matches!(err, PlotlinksError::ValidationError(_)));
    }

    #[test]
    fn test_spread_splits_sign() {
        let options = opts().with_keys(&["a", "b"]);
        let traces = to_traces(&frame(), ChartKind::Spread, &options, "pearl").unwrap();
        let positive = &traces[2];
        let negative = &traces[3];
        assert_eq!(positive.get("y").unwrap(), &json!([null, 1.0, 1.0]));
        assert_eq!(negative.get("y").unwrap(), &json!([-2.0, null, null]));
        assert_eq!(positive.y_ref(), AxisId::y(2));
        assert_eq!(positive.get("showlegend").unwrap(), &json!(false));
    }

    #[test]
    fn test_ratio_skips_zero_division() {
        let df = df! { "a" => [2.0f64, 1.0], "b" => [1.0f64, 0.0] }.unwrap();
        let traces = to_traces(&df, ChartKind::Ratio, &opts(), "pearl").unwrap();
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[2].get("y").unwrap(), &json!([2.0, null]));
    }

    #[test]
    fn test_histogram_bins() {
        let options = TraceOptions {
            bins: Some(20),
            ..opts().with_keys(&["a"])
        };
        let traces = to_traces(&frame(), ChartKind::Histogram, &options, "pearl").unwrap();
        assert_eq!(traces[0].get("nbinsx").unwrap(), &json!(20));
        assert_eq!(traces[0].get("histfunc").unwrap(), &json!("count"));
        assert_eq!(traces[0].get("opacity").unwrap(), &json!(0.8));
    }

    #[test]
    fn test_box_without_points() {
        let traces = to_traces(&frame(), ChartKind::Box, &opts().with_keys(&["b"]), "pearl").unwrap();
        assert_eq!(traces[0].get("boxpoints").unwrap(), &json!(false));
    }

    #[test]
    fn test_heatmap_rows_per_key() {
        let options = opts().with_keys(&["a", "b"]);
        let traces = to_traces(&frame(), ChartKind::Heatmap, &options, "pearl").unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].get("y").unwrap(), &json!(["a", "b"]));
        assert_eq!(traces[0].get("z").unwrap()[1], json!([3.0, 1.0, 2.0]));
        let scale = traces[0].get("colorscale").unwrap().as_array().unwrap();
        assert_eq!(scale[0][0], json!(0.0));
    }

    #[test]
    fn test_bubble_sizes() {
        let sizes = bubble_sizes(&[Some(0.0), Some(5.0), Some(10.0), None]);
        assert_eq!(sizes, vec![json!(12), json!(62), json!(112), Value::Null]);
    }

    #[test]
    fn test_bubble_needs_size_column() {
        let df = df! {
            "x" => [1.0f64, 2.0, 3.0],
            "y" => [3.0f64, 1.0, 2.0],
            "weight" => [10.0f64, 20.0, 30.0]
        }
        .unwrap();
        let options = TraceOptions {
            x: Some("x".into()),
            y: Some("y".into()),
            size_column: Some("weight".into()),
            ..opts()
        };
        let traces = to_traces(&df, ChartKind::Bubble, &options, "pearl").unwrap();
        assert_eq!(
            traces[0].get("marker").unwrap()["size"],
            json!([12, 62, 112])
        );

        let unsized_options = TraceOptions { size_column: None, ..options };
        let err = to_traces(&df, ChartKind::Bubble, &unsized_options, "pearl").unwrap_err();
        assert!(matches!(err, PlotlinksError::ValidationError(_)));
    }

    #[test]
    fn test_categories_split_rows() {
        let df = df! {
            "x" => [1.0f64, 2.0, 3.0, 4.0],
            "y" => [4.0f64, 3.0, 2.0, 1.0],
            "group" => ["b", "a", "b", "a"]
        }
        .unwrap();
        let options = TraceOptions {
            x: Some("x".into()),
            y: Some("y".into()),
            categories: Some("group".into()),
            ..opts()
        };
        let traces = to_traces(&df, ChartKind::Scatter, &options, "pearl").unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].name.as_deref(), Some("b"));
        assert_eq!(traces[0].get("x").unwrap(), &json!([1.0, 3.0]));
        assert_eq!(traces[0].get("mode").unwrap(), &json!("markers"));
        assert!(traces[0].get("textfont").is_some());
    }

    #[test]
    fn test_scatter3d_requires_z() {
        let options = TraceOptions {
            x: Some("x".into()),
            y: Some("a".into()),
            ..opts()
        };
        let err = to_traces(&frame(), ChartKind::Scatter3d, &options, "pearl").unwrap_err();
        assert!(matches!(err, PlotlinksError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_theme() {
        let err = to_traces(&frame(), ChartKind::Line, &opts(), "nope").unwrap_err();
        assert!(matches!(err, PlotlinksError::UnknownTheme(_)));
    }
}
