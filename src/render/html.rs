//! Standalone HTML output embedding plotly.js

use super::Renderer;
use crate::config::Config;
use crate::figure::Figure;
use crate::{PlotlinksError, Result};
use serde_json::{json, Value};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders a figure as a complete HTML page
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    /// Script URL for plotly.js
    pub plotly_src: String,
    /// Pixel size; the div fills its container when unset
    pub dimensions: Option<(u32, u32)>,
    pub show_link: bool,
    pub link_text: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            plotly_src: PLOTLY_CDN.to_string(),
            dimensions: config.dimensions,
            show_link: config.offline_show_link,
            link_text: config.offline_link_text.clone(),
        }
    }

    /// Only the `<div>` and `<script>`, for embedding in an existing page.
    pub fn fragment(&self, fig: &Figure) -> Result<String> {
        let value = fig.to_value()?;
        let data = script_json(&value["data"])?;
        let layout = script_json(&value["layout"])?;
        let options = script_json(&json!({
            "showLink": self.show_link,
            "linkText": self.link_text,
            "responsive": self.dimensions.is_none()
        }))?;

        let div_id = format!("plotlinks-{}", uuid::Uuid::new_v4());
        let style = match self.dimensions {
            Some((width, height)) => format!("width:{}px;height:{}px;", width, height),
            None => "width:100%;height:100%;".to_string(),
        };

        Ok(format!(
            r#"<div id="{id}" class="plotlinks-chart" style="{style}"></div>
<script type="text/javascript">
  (function() {{
    const data = {data};
    const layout = {layout};
    Plotly.newPlot('{id}', data, layout, {options});
  }})();
</script>"#,
            id = div_id,
            style = style,
            data = data,
            layout = layout,
            options = options,
        ))
    }
}

/// JSON safe to inline in a `<script>` element.
fn script_json(value: &Value) -> Result<String> {
    let text = serde_json::to_string(value).map_err(|e| PlotlinksError::RenderError(e.to_string()))?;
    Ok(text.replace("</", "<\\/"))
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page_title(fig: &Figure) -> String {
    let title = match fig.layout.get("title") {
        Some(Value::String(text)) => text.as_str(),
        Some(Value::Object(title)) => title.get("text").and_then(Value::as_str).unwrap_or(""),
        _ => "",
    };
    if title.is_empty() {
        "plotlinks".to_string()
    } else {
        escape_html(title)
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn write(&self, fig: &Figure) -> Result<String> {
        let body = self.fragment(fig)?;
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="{src}"></script>
  <style>html, body {{ margin: 0; height: 100%; }}</style>
</head>
<body>
{body}
</body>
</html>
"#,
            title = page_title(fig),
            src = self.plotly_src,
            body = body,
        ))
    }
}
