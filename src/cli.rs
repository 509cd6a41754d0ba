/*!
plotlinks Command Line Interface

Builds chart specifications from CSV files, composes existing specifications
(secondary axes, subplot grids) and renders them as JSON or HTML.
*/

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use plotlinks::axis::{set_axis, AxisPlacement};
use plotlinks::chart::{self, ChartKind, ChartOptions, TraceOptions};
use plotlinks::color::{get_scales, hex_to_hsv, normalize, scale_names, to_rgba};
use plotlinks::render::{HtmlRenderer, JsonRenderer, Renderer};
use plotlinks::subplots::{subplots, GridOptions};
use plotlinks::theme::theme_names;
use plotlinks::validate::validate;
use plotlinks::{AxisId, Config, DataFrame, Figure, Side, VERSION};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plotlinks")]
#[command(about = "Chart specifications from DataFrames, with secondary axes and subplots")]
#[command(version = VERSION)]
pub struct Cli {
    /// JSON config file with chart defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Json,
    Html,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SideArg {
    Left,
    Right,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available themes
    Themes,

    /// List color scales, or show the colors of one
    Scales {
        /// Scale to show; prefix with '-' to reverse
        name: Option<String>,

        /// Number of colors
        #[arg(short, long)]
        n: Option<usize>,
    },

    /// Normalize a color and show its conversions
    Color {
        /// Name, hex, rgb() or rgba() color
        color: String,

        /// Alpha for the rgba form
        #[arg(long, default_value_t = 1.0)]
        alpha: f64,
    },

    /// Build a chart from a CSV file
    Chart {
        /// CSV file with a header row
        file: PathBuf,

        /// Chart kind (line, scatter, bar, barh, area, box, histogram, pie, ...)
        #[arg(long, default_value = "line")]
        kind: String,

        /// Column for the x axis
        #[arg(long)]
        x: Option<String>,

        /// Column for the y axis (bubble, 3-D kinds)
        #[arg(long)]
        y: Option<String>,

        /// Column for z values
        #[arg(long)]
        z: Option<String>,

        /// Columns to chart, comma separated
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Column splitting rows into one trace per value
        #[arg(long)]
        categories: Option<String>,

        /// Pie labels column
        #[arg(long)]
        labels: Option<String>,

        /// Pie values column
        #[arg(long)]
        values: Option<String>,

        /// Scatter mode
        #[arg(long)]
        mode: Option<String>,

        #[arg(long)]
        title: Option<String>,

        /// Overrides the configured theme
        #[arg(long)]
        theme: Option<String>,

        /// Traces to move onto a right-hand y axis
        #[arg(long, value_delimiter = ',')]
        secondary_y: Vec<String>,

        /// One subplot per trace
        #[arg(long)]
        subplots: bool,

        #[arg(long)]
        bestfit: bool,

        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Output file path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Place chart specifications in a grid
    Subplots {
        /// Figure JSON files, one per cell
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        rows: Option<usize>,

        #[arg(long)]
        cols: Option<usize>,

        #[arg(long)]
        shared_x: bool,

        #[arg(long)]
        shared_y: bool,

        /// Cell titles, comma separated
        #[arg(long, value_delimiter = ',')]
        titles: Vec<String>,

        #[arg(long)]
        theme: Option<String>,

        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Move traces onto a secondary axis
    Secondary {
        /// Figure JSON file
        file: PathBuf,

        /// Trace names, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        traces: Vec<String>,

        /// Existing axis to move onto, e.g. y2
        #[arg(long)]
        on: Option<String>,

        #[arg(long, value_enum, default_value = "right")]
        side: SideArg,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a figure JSON file
    Render {
        file: PathBuf,

        #[arg(long, value_enum, default_value = "html")]
        format: Format,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check a figure JSON file for broken references
    Validate { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Themes => {
            for name in theme_names() {
                println!("{}", name);
            }
        }

        Commands::Scales { name, n } => match name {
            Some(name) => {
                for color in get_scales(&name, n)? {
                    println!("{}", color);
                }
            }
            None => {
                for name in scale_names() {
                    println!("{}", name);
                }
            }
        },

        Commands::Color { color, alpha } => {
            let hex = normalize(&color)?;
            let (h, s, v) = hex_to_hsv(&hex)?;
            println!("hex:  {}", hex);
            println!("rgba: {}", to_rgba(&hex, alpha)?);
            println!("hsv:  ({:.3}, {:.3}, {:.3})", h, s, v);
        }

        Commands::Chart {
            file,
            kind,
            x,
            y,
            z,
            keys,
            categories,
            labels,
            values,
            mode,
            title,
            theme,
            secondary_y,
            subplots,
            bestfit,
            format,
            output,
        } => {
            let df = read_csv(&file)?;
            let kind: ChartKind = kind.parse()?;
            let mut traces = TraceOptions {
                keys,
                x,
                y,
                z,
                categories,
                labels,
                values,
                bestfit,
                ..TraceOptions::default()
            };
            if let Some(mode) = mode {
                traces.mode = mode;
            }
            let mut options = ChartOptions::new(kind).with_traces(traces);
            options.layout.title = title;
            options.theme = theme;
            options.secondary_y = secondary_y;
            options.subplots = subplots;
            options.subplot_titles = subplots;

            let fig = chart::figure(&df, &options, &config)?;
            emit(&fig, format, &config, output.as_deref())?;
        }

        Commands::Subplots {
            files,
            rows,
            cols,
            shared_x,
            shared_y,
            titles,
            theme,
            format,
            output,
        } => {
            let figures = files
                .iter()
                .map(|f| read_figure(f))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let shape = match (rows, cols) {
                (Some(r), Some(c)) => Some((r, c)),
                (Some(r), None) => Some((r, figures.len().div_ceil(r))),
                (None, Some(c)) => Some((figures.len().div_ceil(c), c)),
                (None, None) => None,
            };
            let grid = GridOptions::new()
                .shared(shared_x, shared_y)
                .with_titles(&titles);
            let theme = theme.unwrap_or_else(|| config.theme.clone());
            let fig = subplots(&figures, shape, &grid, Some(&theme), None)?;
            emit(&fig, format, &config, output.as_deref())?;
        }

        Commands::Secondary {
            file,
            traces,
            on,
            side,
            title,
            format,
            output,
        } => {
            let fig = read_figure(&file)?;
            let mut placement = match on {
                Some(name) => AxisPlacement::on(
                    AxisId::parse(&name)
                        .with_context(|| format!("'{}' is not an axis name", name))?,
                ),
                None => AxisPlacement::side(match side {
                    SideArg::Left => Side::Left,
                    SideArg::Right => Side::Right,
                }),
            };
            placement = placement.with_title(&title);
            let fig = set_axis(&fig, &traces, &placement)?;
            emit(&fig, format, &config, output.as_deref())?;
        }

        Commands::Render {
            file,
            format,
            output,
        } => {
            let fig = read_figure(&file)?;
            emit(&fig, format, &config, output.as_deref())?;
        }

        Commands::Validate { file } => {
            let fig = read_figure(&file)?;
            let result = validate(&fig);
            for warning in result.warnings() {
                println!("warning: {}", warning);
            }
            for error in result.errors() {
                println!("error: {}", error);
            }
            if !result.valid() {
                std::process::exit(1);
            }
            println!("ok");
        }
    }

    Ok(())
}

fn read_csv(path: &Path) -> anyhow::Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|opts| opts.with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(df)
}

fn read_figure(path: &Path) -> anyhow::Result<Figure> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Figure::from_json(&text)?)
}

fn emit(fig: &Figure, format: Format, config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let text = match format {
        Format::Json => JsonRenderer::pretty().render(fig)?,
        Format::Html => HtmlRenderer::from_config(config).render(fig)?,
    };
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote chart");
        }
        None => println!("{}", text),
    }
    Ok(())
}
