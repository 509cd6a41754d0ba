//! Output renderers for chart specifications
//!
//! Every renderer implements [`Renderer`]: it takes a finished [`Figure`]
//! and produces some output (JSON text, an HTML page, ...). Figures are
//! validated before rendering so a broken axis reference fails here rather
//! than in the browser.
//!
//! # Example
//!
//! ```
//! use plotlinks::render::{JsonRenderer, Renderer};
//! use plotlinks::{Figure, Trace};
//!
//! let fig = Figure::new(vec![Trace::new("scatter").with_name("a")], Default::default());
//! let json = JsonRenderer::new().render(&fig).unwrap();
//! assert!(json.contains("\"scatter\""));
//! ```

mod html;

pub use html::HtmlRenderer;

use crate::figure::Figure;
use crate::validate::validate_figure;
use crate::{PlotlinksError, Result};

/// Trait for chart specification renderers
///
/// # Associated Types
///
/// * `Output` - what `render()` returns: `String` for text formats, bytes
///   for binary ones.
pub trait Renderer {
    type Output;

    /// Produce output for a figure that already passed [`Renderer::validate`].
    fn write(&self, fig: &Figure) -> Result<Self::Output>;

    /// Check that the figure can be rendered.
    ///
    /// The default rejects figures whose traces or axes reference axes
    /// that do not exist.
    fn validate(&self, fig: &Figure) -> Result<()> {
        validate_figure(fig)
    }

    /// Validate, then write.
    fn render(&self, fig: &Figure) -> Result<Self::Output> {
        self.validate(fig)?;
        self.write(fig)
    }
}

/// Plotly JSON (`{"data": [...], "layout": {...}}`)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn write(&self, fig: &Figure) -> Result<String> {
        let value = fig.to_value()?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        text.map_err(|e| PlotlinksError::RenderError(e.to_string()))
    }
}
