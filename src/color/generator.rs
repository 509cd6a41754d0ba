//! Color assignment for traces

use super::convert::{normalize, to_rgba};
use super::scales::get_scales;
use crate::Result;
use std::collections::{HashMap, VecDeque};

/// Scale used when a palette turns out to be empty
const FALLBACK_SCALE: &str = "ggplot";

/// Yields `rgba` colors from a base palette.
///
/// Each round walks the whole palette at one opacity, then lowers the
/// opacity and rotates the palette by one so neighbouring traces in the
/// next round do not repeat the previous pairing. Opacity starts at 1 and
/// drops towards 0.2. The sequence is finite; use [`get_colors`] for an
/// assignment that never runs out.
#[derive(Debug, Clone)]
pub struct ColorGenerator {
    palette: VecDeque<String>,
    alphas: Vec<f64>,
    round: usize,
    position: usize,
}

impl ColorGenerator {
    /// Generator over explicit colors, sized for `n` draws.
    ///
    /// When more than eight rounds would be needed for `n` colors the
    /// opacity steps are made finer.
    pub fn new<S: AsRef<str>>(colors: &[S], n: Option<usize>) -> Result<Self> {
        let mut palette: VecDeque<String> = colors
            .iter()
            .map(|c| normalize(c.as_ref()))
            .collect::<Result<_>>()?;
        if palette.is_empty() {
            palette = get_scales(FALLBACK_SCALE, None)?.into();
        }

        let step = match n {
            Some(n) if palette.len() * 8 < n => palette.len() as f64 * 0.8 / n as f64,
            _ => 0.1,
        };
        let rounds = ((0.8 / step) - 1e-9).ceil().max(1.0) as usize;
        let alphas = (0..rounds)
            .map(|i| {
                let offset = 0.2 + i as f64 * step;
                1.0 - offset + 0.2
            })
            .collect();

        Ok(Self {
            palette,
            alphas,
            round: 0,
            position: 0,
        })
    }

    /// Generator over a named scale.
    pub fn from_scale(scale: &str, n: Option<usize>) -> Result<Self> {
        let colors = get_scales(scale, n)?;
        Self::new(colors.as_slice(), n)
    }

    fn restart(&mut self) {
        self.round = 0;
        self.position = 0;
    }
}

impl Iterator for ColorGenerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let alpha = *self.alphas.get(self.round)?;
        let color = self.palette.get(self.position)?;
        let rgba = to_rgba(color, alpha).ok()?;

        self.position += 1;
        if self.position == self.palette.len() {
            self.position = 0;
            self.round += 1;
            self.palette.rotate_right(1);
        }
        Some(rgba)
    }
}

/// Where trace colors come from
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ColorSource {
    /// The configured default scale
    #[default]
    Auto,
    /// A named scale
    Scale(String),
    /// Explicit colors, cycled
    List(Vec<String>),
    /// Explicit color per key; keys without one fall back to the default scale
    Map(HashMap<String, String>),
}

/// One color per key, in key order.
///
/// An explicit map entry always wins. Generated colors wrap around to the
/// first round if more keys than the generator can serve are requested.
pub fn get_colors<S: AsRef<str>>(
    keys: &[S],
    source: &ColorSource,
    default_scale: &str,
) -> Result<Vec<String>> {
    let n = Some(keys.len());
    let mut generator = match source {
        ColorSource::Auto | ColorSource::Map(_) => ColorGenerator::from_scale(default_scale, n)?,
        ColorSource::Scale(scale) => ColorGenerator::from_scale(scale, n)?,
        ColorSource::List(colors) => ColorGenerator::new(colors.as_slice(), n)?,
    };

    let mut out = Vec::with_capacity(keys.len());
    for key in keys {
        if let ColorSource::Map(explicit) = source {
            if let Some(color) = explicit.get(key.as_ref()) {
                out.push(color.clone());
                continue;
            }
        }
        let color = match generator.next() {
            Some(color) => color,
            None => {
                generator.restart();
                generator.next().unwrap_or_default()
            }
        };
        out.push(color);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_round_is_opaque_palette() {
        let colors: Vec<String> = ColorGenerator::new(&["#ff0000", "#00ff00"], None)
            .unwrap()
            .take(2)
            .collect();
        assert_eq!(colors, vec!["rgba(255, 0, 0, 1)", "rgba(0, 255, 0, 1)"]);
    }

    #[test]
    fn test_second_round_rotates_and_fades() {
        let colors: Vec<String> = ColorGenerator::new(&["#ff0000", "#00ff00"], None)
            .unwrap()
            .skip(2)
            .take(2)
            .collect();
        assert_eq!(colors, vec!["rgba(0, 255, 0, 0.9)", "rgba(255, 0, 0, 0.9)"]);
    }

    #[test]
    fn test_default_generator_is_finite() {
        let count = ColorGenerator::new(&["red", "blue"], None).unwrap().count();
        assert_eq!(count, 16);
    }

    #[test]
    fn test_finer_steps_for_many_draws() {
        let count = ColorGenerator::new(&["red"], Some(20)).unwrap().count();
        assert!(count >= 20);
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let mut generator = ColorGenerator::new::<&str>(&[], None).unwrap();
        assert_eq!(generator.next().as_deref(), Some("rgba(226, 74, 51, 1)"));
    }

    #[test]
    fn test_get_colors_explicit_map_wins() {
        let mut explicit = HashMap::new();
        explicit.insert("b".to_string(), "pink".to_string());
        let colors = get_colors(&["a", "b", "c"], &ColorSource::Map(explicit), "dflt").unwrap();
        assert_eq!(colors[0], "rgba(255, 153, 51, 1)");
        assert_eq!(colors[1], "pink");
        assert_eq!(colors[2], "rgba(55, 128, 191, 1)");
    }

    #[test]
    fn test_get_colors_wraps_when_exhausted() {
        let keys: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let source = ColorSource::List(vec!["#000000".to_string()]);
        let colors = get_colors(&keys, &source, "dflt").unwrap();
        assert_eq!(colors.len(), 5);
        assert!(colors.iter().all(|c| c.starts_with("rgba(0, 0, 0")));
    }

    #[test]
    fn test_get_colors_unknown_scale() {
        let source = ColorSource::Scale("nope".to_string());
        assert!(get_colors(&["a"], &source, "dflt").is_err());
    }
}
