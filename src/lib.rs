/*!
# plotlinks - chart specifications from DataFrames

plotlinks turns polars DataFrames into plotly-style chart specifications
(`data` traces + `layout`), applies themes and colour scales, and composes
existing specifications: moving traces onto secondary axes and merging
several charts into one subplot grid.

## Example

```rust,ignore
use plotlinks::chart::{self, ChartKind, ChartOptions};
use plotlinks::subplots::{subplots, GridOptions};
use plotlinks::Config;

let config = Config::default();
let line = chart::figure(&df, &ChartOptions::new(ChartKind::Line), &config)?;
let bars = chart::figure(&df, &ChartOptions::new(ChartKind::Bar), &config)?;

let grid = subplots(&[line, bars], Some((1, 2)), &GridOptions::default(), Some("pearl"), None)?;
```

## Architecture

- [`figure`] - typed Chart Specification (traces, layout, axis definitions)
- [`color`] / [`theme`] - colour resolution and the static theme registry
- [`layout`] - themed base layouts, reference lines and spans
- [`chart`] - trace synthesis from DataFrame columns
- [`axis`] - axis introspection and secondary-axis mutation
- [`subplots`] - grid allocation and subplot composition
- [`render`] - output as plotly JSON or standalone HTML
*/

pub mod axis;
pub mod chart;
pub mod color;
pub mod config;
pub mod error_bars;
pub mod figure;
pub mod layout;
pub mod naming;
pub mod render;
pub mod subplots;
pub mod theme;
pub mod validate;

// Re-export key types for convenience
pub use config::Config;
pub use figure::{AxisDef, AxisId, AxisKind, Domain, Figure, Layout, Scene, Side, Trace};

// DataFrame abstraction (wraps Polars)
pub use polars::prelude::DataFrame;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum PlotlinksError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Axis not found: {0}")]
    AxisNotFound(String),

    #[error("Trace not found: {0}")]
    TraceNotFound(String),

    #[error("Unknown theme: '{0}'")]
    UnknownTheme(String),

    #[error("Unknown color scale: '{0}'")]
    UnknownColorScale(String),

    #[error("Not a valid color: {0}")]
    InvalidColor(String),

    #[error("Malformed shape descriptor: {0}")]
    MalformedShape(String),

    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    #[error("Ambiguous column: {0}")]
    AmbiguousColumn(String),

    #[error("Invalid error bar: {0}")]
    InvalidErrorBar(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

impl From<polars::error::PolarsError> for PlotlinksError {
    fn from(err: polars::error::PolarsError) -> Self {
        PlotlinksError::DataError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlotlinksError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
