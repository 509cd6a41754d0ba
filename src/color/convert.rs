//! Color conversion between names, hex, rgb(a) and hsv

use super::names;
use crate::{PlotlinksError, Result};
use palette::{FromColor, Hsv, Srgb};
use serde_json::Value;

const WHITE: [f64; 3] = [255.0, 255.0, 255.0];

/// Layout keys that contain "color" but hold scale names or references
const NON_COLOR_KEYS: &[&str] = &["colorscale", "coloraxis", "colorway", "colorbar"];

fn invalid(color: &str) -> PlotlinksError {
    PlotlinksError::InvalidColor(color.to_string())
}

/// Numbers inside `rgb(...)` / `rgba(...)`.
fn functional_components(color: &str) -> Result<Vec<f64>> {
    let open = color.find('(').ok_or_else(|| invalid(color))?;
    let close = color.rfind(')').ok_or_else(|| invalid(color))?;
    if close <= open {
        return Err(invalid(color));
    }
    color[open + 1..close]
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| invalid(color)))
        .collect()
}

fn hex_component(hex: &str, start: usize, color: &str) -> Result<u8> {
    hex.get(start..start + 2)
        .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        .ok_or_else(|| invalid(color))
}

/// Format a channel or alpha value the way color strings are written:
/// integers without a fraction, alphas rounded to two places.
fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

/// Canonical hex form of any supported color.
///
/// * `rgba(...)` is blended over white
/// * `rgb(...)` becomes upper-case `#RRGGBB`
/// * `#rrggbb` is returned unchanged, `#rgb` is expanded
/// * names are looked up case-insensitively in the name table, then as
///   CSS colors
///
/// # Example
/// ```
/// use plotlinks::color::normalize;
/// assert_eq!(normalize("#f03").unwrap(), "#ff0033");
/// assert_eq!(normalize("rgb(23,25,24)").unwrap(), "#171918");
/// assert_eq!(normalize("pearl02").unwrap(), "#F5F6F9");
/// ```
pub fn normalize(color: &str) -> Result<String> {
    let trimmed = color.trim();
    let lower = trimmed.to_lowercase();

    if lower.starts_with("rgba") {
        return rgb_to_hex(&rgba_to_rgb(trimmed, "#FFFFFF")?);
    }
    if lower.starts_with("rgb") {
        return rgb_to_hex(trimmed);
    }
    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid(color));
        }
        return match hex.len() {
            6 => Ok(trimmed.to_string()),
            3 => Ok(format!(
                "#{}",
                hex.chars().flat_map(|c| [c, c]).collect::<String>()
            )),
            _ => csscolorparser::parse(trimmed)
                .map(|c| c.to_css_hex())
                .map_err(|_| invalid(color)),
        };
    }
    if let Some(hex) = names::lookup(&lower) {
        return normalize(hex);
    }
    csscolorparser::parse(&lower)
        .map(|c| c.to_css_hex())
        .map_err(|_| invalid(color))
}

/// Red, green and blue channels of any supported color.
pub fn rgb_components(color: &str) -> Result<[u8; 3]> {
    let hex = normalize(color)?;
    let digits = hex.trim_start_matches('#');
    Ok([
        hex_component(digits, 0, color)?,
        hex_component(digits, 2, color)?,
        hex_component(digits, 4, color)?,
    ])
}

/// `rgba(r, g, b, alpha)` form of a color.
///
/// An `rgba` input keeps its channels and gets the new alpha.
///
/// # Example
/// ```
/// use plotlinks::color::to_rgba;
/// assert_eq!(to_rgba("#E1E5ED", 0.6).unwrap(), "rgba(225, 229, 237, 0.6)");
/// ```
pub fn to_rgba(color: &str, alpha: f64) -> Result<String> {
    let lower = color.trim().to_lowercase();
    let channels: Vec<f64> = if lower.starts_with("rgb") {
        let parts = functional_components(&lower)?;
        if parts.len() < 3 {
            return Err(invalid(color));
        }
        parts[..3].to_vec()
    } else {
        rgb_components(color)?.iter().map(|c| *c as f64).collect()
    };
    Ok(format!(
        "rgba({}, {}, {}, {})",
        format_number(channels[0]),
        format_number(channels[1]),
        format_number(channels[2]),
        format_number(alpha)
    ))
}

/// `rgb(r, g, b)` form of a hex or named color.
pub fn hex_to_rgb(color: &str) -> Result<String> {
    let [r, g, b] = rgb_components(color)?;
    Ok(format!("rgb({}, {}, {})", r, g, b))
}

/// Upper-case hex form of an `rgb(...)` color.
pub fn rgb_to_hex(color: &str) -> Result<String> {
    let parts = functional_components(color)?;
    if parts.len() < 3 {
        return Err(invalid(color));
    }
    Ok(parts[..3]
        .iter()
        .map(|c| format!("{:02X}", c.round().clamp(0.0, 255.0) as u8))
        .fold("#".to_string(), |acc, pair| acc + &pair))
}

/// Flatten an `rgba(...)` color onto a background, yielding `rgb(...)`.
pub fn rgba_to_rgb(color: &str, bg: &str) -> Result<String> {
    let parts = functional_components(color)?;
    if parts.len() != 4 {
        return Err(invalid(color));
    }
    let background = match rgb_components(bg) {
        Ok(rgb) => rgb.map(|c| c as f64),
        Err(_) => WHITE,
    };
    let alpha = parts[3].clamp(0.0, 1.0);
    let blended: Vec<String> = (0..3)
        .map(|i| {
            let value = (1.0 - alpha) * background[i] + alpha * parts[i];
            (value.floor() as i64).to_string()
        })
        .collect();
    Ok(format!("rgb({})", blended.join(", ")))
}

/// Hue, saturation and value of a color, each in `[0, 1]`.
pub fn hex_to_hsv(color: &str) -> Result<(f64, f64, f64)> {
    let [r, g, b] = rgb_components(color)?;
    let hsv: Hsv = Hsv::from_color(Srgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ));
    Ok((
        hsv.hue.into_positive_degrees() as f64 / 360.0,
        hsv.saturation as f64,
        hsv.value as f64,
    ))
}

fn hsv_to_hex(hue: f64, saturation: f64, value: f64) -> String {
    let hsv: Hsv = Hsv::new((hue * 360.0) as f32, saturation as f32, value as f32);
    let rgb: Srgb = Srgb::from_color(hsv);
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rgb.red),
        channel(rgb.green),
        channel(rgb.blue)
    )
}

/// Shades of a base color: `n / 2` steps of saturation then `n / 2` steps
/// of value, plus the base itself, sorted.
pub fn color_range(color: &str, n: usize) -> Result<Vec<String>> {
    let base = normalize(color)?;
    if n < 2 {
        return Ok(vec![base]);
    }
    let (h, s, v) = hex_to_hsv(&base)?;
    let steps = n.div_ceil(2);
    let step = 2.0 / n as f64;

    let mut out: Vec<String> = (0..steps)
        .map(|i| hsv_to_hex(h, i as f64 * step, v))
        .chain((0..steps).map(|i| hsv_to_hex(h, s, i as f64 * step)))
        .collect();
    if !out.contains(&base) {
        out.push(base);
    }
    out.sort();
    Ok(out)
}

/// Rewrite every color string in a layout fragment to canonical hex.
///
/// Applies to string values under any key containing "color"; `rgba`
/// values are left alone so their transparency survives.
pub fn normalize_colors(value: &mut Value) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                let lower = key.to_lowercase();
                let is_color_key =
                    lower.contains("color") && !NON_COLOR_KEYS.iter().any(|k| lower.contains(k));
                if let (true, Value::String(s)) = (is_color_key, &mut *item) {
                    if !s.trim().to_lowercase().starts_with("rgba") {
                        *s = normalize(s)?;
                    }
                    continue;
                }
                normalize_colors(item)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                normalize_colors(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_hex_forms() {
        assert_eq!(normalize("#ff9933").unwrap(), "#ff9933");
        assert_eq!(normalize("#E1E5ED").unwrap(), "#E1E5ED");
        assert_eq!(normalize("#f03").unwrap(), "#ff0033");
        assert!(normalize("#zzzzzz").is_err());
    }

    #[test]
    fn test_normalize_functional_forms() {
        assert_eq!(normalize("rgb(23,25,24)").unwrap(), "#171918");
        assert_eq!(normalize("rgb(255, 153, 51)").unwrap(), "#FF9933");
        // 50% black over white
        assert_eq!(normalize("rgba(0,0,0,0.5)").unwrap(), "#7F7F7F");
    }

    #[test]
    fn test_normalize_names() {
        assert_eq!(normalize("blue").unwrap(), "#3780bf");
        assert_eq!(normalize("Charcoal").unwrap(), "#151516");
        // only known to CSS
        assert_eq!(normalize("rebeccapurple").unwrap(), "#663399");
        let err = normalize("notacolor").unwrap_err();
        assert!(matches!(err, PlotlinksError::InvalidColor(_)));
    }

    #[test]
    fn test_to_rgba() {
        assert_eq!(to_rgba("#f03", 0.7).unwrap(), "rgba(255, 0, 51, 0.7)");
        assert_eq!(to_rgba("rgb(23,23,23)", 0.5).unwrap(), "rgba(23, 23, 23, 0.5)");
        assert_eq!(
            to_rgba("rgba(23, 23, 23, 0.1)", 1.0).unwrap(),
            "rgba(23, 23, 23, 1)"
        );
        assert_eq!(to_rgba("orange", 0.9).unwrap(), "rgba(255, 153, 51, 0.9)");
    }

    #[test]
    fn test_hex_rgb_conversions() {
        assert_eq!(hex_to_rgb("#E1E5ED").unwrap(), "rgb(225, 229, 237)");
        assert_eq!(rgb_to_hex("rgb(225, 229, 237)").unwrap(), "#E1E5ED");
        assert_eq!(
            rgba_to_rgb("rgba(255, 0, 0, 0.5)", "#000000").unwrap(),
            "rgb(127, 0, 0)"
        );
    }

    #[test]
    fn test_hex_to_hsv() {
        let (h, s, v) = hex_to_hsv("#ff0000").unwrap();
        assert!(h.abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);
        assert!((v - 1.0).abs() < 1e-6);

        let (_, s, v) = hex_to_hsv("#808080").unwrap();
        assert!(s.abs() < 1e-6);
        assert!((v - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_range_contains_base_and_is_sorted() {
        let range = color_range("#ff9933", 20).unwrap();
        assert!(range.contains(&"#ff9933".to_string()));
        assert!(range.len() >= 20);
        let mut sorted = range.clone();
        sorted.sort();
        assert_eq!(range, sorted);
    }

    #[test]
    fn test_normalize_colors_walks_nested_layout() {
        let mut layout = json!({
            "paper_bgcolor": "pearl02",
            "xaxis1": {"gridcolor": "#fff", "tickfont": {"color": "pearl06"}},
            "shapes": [{"line": {"color": "red"}}],
            "legend": {"bgcolor": "rgba(0,0,0,0)"},
            "title": "red"
        });
        normalize_colors(&mut layout).unwrap();
        assert_eq!(layout["paper_bgcolor"], json!("#F5F6F9"));
        assert_eq!(layout["xaxis1"]["gridcolor"], json!("#ffffff"));
        assert_eq!(layout["xaxis1"]["tickfont"]["color"], json!("#4D5663"));
        assert_eq!(layout["shapes"][0]["line"]["color"], json!("#db4052"));
        assert_eq!(layout["legend"]["bgcolor"], json!("rgba(0,0,0,0)"));
        assert_eq!(layout["title"], json!("red"));
    }

    #[test]
    fn test_normalize_colors_skips_scale_keys() {
        let mut trace = json!({"colorscale": "Viridis", "marker": {"color": "blue"}});
        normalize_colors(&mut trace).unwrap();
        assert_eq!(trace["colorscale"], json!("Viridis"));
        assert_eq!(trace["marker"]["color"], json!("#3780bf"));
    }
}
