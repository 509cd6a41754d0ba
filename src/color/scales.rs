//! Named color scales
//!
//! The custom qualitative scales plus the ColorBrewer palettes at their
//! largest class count. Smaller sequential and diverging palettes are
//! resampled in Oklab rather than stored.

use super::convert::normalize;
use crate::{PlotlinksError, Result};
use palette::{FromColor, IntoColor, LinSrgb, Mix, Oklab, Srgb};
use std::fmt;

/// Smallest palette handed out for ColorBrewer scales
const MIN_CLASSES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Qualitative,
    Sequential,
    Diverging,
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaleKind::Qualitative => "qual",
            ScaleKind::Sequential => "seq",
            ScaleKind::Diverging => "div",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    pub name: &'static str,
    pub kind: ScaleKind,
    /// Fixed scales are handed out whole regardless of the requested size.
    pub fixed: bool,
    pub colors: &'static [&'static str],
}

const fn custom(name: &'static str, colors: &'static [&'static str]) -> ColorScale {
    ColorScale {
        name,
        kind: ScaleKind::Qualitative,
        fixed: true,
        colors,
    }
}

const fn brewer(name: &'static str, kind: ScaleKind, colors: &'static [&'static str]) -> ColorScale {
    ColorScale {
        name,
        kind,
        fixed: false,
        colors,
    }
}

const DFLT: &[&str] = &[
    "orange", "blue", "grassgreen", "purple", "red", "teal", "yellow", "olive", "salmon",
    "lightblue2",
];

pub static SCALES: &[ColorScale] = &[
    // Custom qualitative
    custom("dflt", DFLT),
    custom("original", DFLT),
    custom(
        "ggplot",
        &["brick", "smurf", "lightviolet", "mediumgray", "mustard", "lime2", "pinksalmon"],
    ),
    custom(
        "polar",
        &[
            "polarblue", "polarorange", "polargreen", "polarpurple", "polarred", "polarcyan",
            "polarbluelight",
        ],
    ),
    custom(
        "plotly",
        &[
            "rgb(31, 119, 180)",
            "rgb(255, 127, 14)",
            "rgb(44, 160, 44)",
            "rgb(214, 39, 40)",
            "rgb(148, 103, 189)",
            "rgb(140, 86, 75)",
            "rgb(227, 119, 194)",
            "rgb(127, 127, 127)",
            "rgb(188, 189, 34)",
            "rgb(23, 190, 207)",
        ],
    ),
    // ColorBrewer qualitative
    brewer(
        "accent",
        ScaleKind::Qualitative,
        &["#7fc97f", "#beaed4", "#fdc086", "#ffff99", "#386cb0", "#f0027f", "#bf5b17", "#666666"],
    ),
    brewer(
        "dark2",
        ScaleKind::Qualitative,
        &["#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666"],
    ),
    brewer(
        "paired",
        ScaleKind::Qualitative,
        &[
            "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
            "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
        ],
    ),
    brewer(
        "pastel1",
        ScaleKind::Qualitative,
        &[
            "#fbb4ae", "#b3cde3", "#ccebc5", "#decbe4", "#fed9a6", "#ffffcc", "#e5d8bd", "#fddaec",
            "#f2f2f2",
        ],
    ),
    brewer(
        "pastel2",
        ScaleKind::Qualitative,
        &["#b3e2cd", "#fdcdac", "#cbd5e8", "#f4cae4", "#e6f5c9", "#fff2ae", "#f1e2cc", "#cccccc"],
    ),
    brewer(
        "set1",
        ScaleKind::Qualitative,
        &[
            "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
            "#999999",
        ],
    ),
    brewer(
        "set2",
        ScaleKind::Qualitative,
        &["#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3"],
    ),
    brewer(
        "set3",
        ScaleKind::Qualitative,
        &[
            "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
            "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
        ],
    ),
    // ColorBrewer sequential
    brewer(
        "blues",
        ScaleKind::Sequential,
        &[
            "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
            "#08306b",
        ],
    ),
    brewer(
        "bugn",
        ScaleKind::Sequential,
        &[
            "#f7fcfd", "#e5f5f9", "#ccece6", "#99d8c9", "#66c2a4", "#41ae76", "#238b45", "#006d2c",
            "#00441b",
        ],
    ),
    brewer(
        "bupu",
        ScaleKind::Sequential,
        &[
            "#f7fcfd", "#e0ecf4", "#bfd3e6", "#9ebcda", "#8c96c6", "#8c6bb1", "#88419d", "#810f7c",
            "#4d004b",
        ],
    ),
    brewer(
        "gnbu",
        ScaleKind::Sequential,
        &[
            "#f7fcf0", "#e0f3db", "#ccebc5", "#a8ddb5", "#7bccc4", "#4eb3d3", "#2b8cbe", "#0868ac",
            "#084081",
        ],
    ),
    brewer(
        "greens",
        ScaleKind::Sequential,
        &[
            "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#006d2c",
            "#00441b",
        ],
    ),
    brewer(
        "greys",
        ScaleKind::Sequential,
        &[
            "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252", "#252525",
            "#000000",
        ],
    ),
    brewer(
        "oranges",
        ScaleKind::Sequential,
        &[
            "#fff5eb", "#fee6ce", "#fdd0a2", "#fdae6b", "#fd8d3c", "#f16913", "#d94801", "#a63603",
            "#7f2704",
        ],
    ),
    brewer(
        "orrd",
        ScaleKind::Sequential,
        &[
            "#fff7ec", "#fee8c8", "#fdd49e", "#fdbb84", "#fc8d59", "#ef6548", "#d7301f", "#b30000",
            "#7f0000",
        ],
    ),
    brewer(
        "pubu",
        ScaleKind::Sequential,
        &[
            "#fff7fb", "#ece7f2", "#d0d1e6", "#a6bddb", "#74a9cf", "#3690c0", "#0570b0", "#045a8d",
            "#023858",
        ],
    ),
    brewer(
        "pubugn",
        ScaleKind::Sequential,
        &[
            "#fff7fb", "#ece2f0", "#d0d1e6", "#a6bddb", "#67a9cf", "#3690c0", "#02818a", "#016c59",
            "#014636",
        ],
    ),
    brewer(
        "purd",
        ScaleKind::Sequential,
        &[
            "#f7f4f9", "#e7e1ef", "#d4b9da", "#c994c7", "#df65b0", "#e7298a", "#ce1256", "#980043",
            "#67001f",
        ],
    ),
    brewer(
        "purples",
        ScaleKind::Sequential,
        &[
            "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3", "#54278f",
            "#3f007d",
        ],
    ),
    brewer(
        "rdpu",
        ScaleKind::Sequential,
        &[
            "#fff7f3", "#fde0dd", "#fcc5c0", "#fa9fb5", "#f768a1", "#dd3497", "#ae017e", "#7a0177",
            "#49006a",
        ],
    ),
    brewer(
        "reds",
        ScaleKind::Sequential,
        &[
            "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
            "#67000d",
        ],
    ),
    brewer(
        "ylgn",
        ScaleKind::Sequential,
        &[
            "#ffffe5", "#f7fcb9", "#d9f0a3", "#addd8e", "#78c679", "#41ab5d", "#238443", "#006837",
            "#004529",
        ],
    ),
    brewer(
        "ylgnbu",
        ScaleKind::Sequential,
        &[
            "#ffffd9", "#edf8b1", "#c7e9b4", "#7fcdbb", "#41b6c4", "#1d91c0", "#225ea8", "#253494",
            "#081d58",
        ],
    ),
    brewer(
        "ylorbr",
        ScaleKind::Sequential,
        &[
            "#ffffe5", "#fff7bc", "#fee391", "#fec44f", "#fe9929", "#ec7014", "#cc4c02", "#993404",
            "#662506",
        ],
    ),
    brewer(
        "ylorrd",
        ScaleKind::Sequential,
        &[
            "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
            "#800026",
        ],
    ),
    // ColorBrewer diverging
    brewer(
        "brbg",
        ScaleKind::Diverging,
        &[
            "#543005", "#8c510a", "#bf812d", "#dfc27d", "#f6e8c3", "#f5f5f5", "#c7eae5", "#80cdc1",
            "#35978f", "#01665e", "#003c30",
        ],
    ),
    brewer(
        "piyg",
        ScaleKind::Diverging,
        &[
            "#8e0152", "#c51b7d", "#de77ae", "#f1b6da", "#fde0ef", "#f7f7f7", "#e6f5d0", "#b8e186",
            "#7fbc41", "#4d9221", "#276419",
        ],
    ),
    brewer(
        "prgn",
        ScaleKind::Diverging,
        &[
            "#40004b", "#762a83", "#9970ab", "#c2a5cf", "#e7d4e8", "#f7f7f7", "#d9f0d3", "#a6dba0",
            "#5aae61", "#1b7837", "#00441b",
        ],
    ),
    brewer(
        "puor",
        ScaleKind::Diverging,
        &[
            "#7f3b08", "#b35806", "#e08214", "#fdb863", "#fee0b6", "#f7f7f7", "#d8daeb", "#b2abd2",
            "#8073ac", "#542788", "#2d004b",
        ],
    ),
    brewer(
        "rdbu",
        ScaleKind::Diverging,
        &[
            "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
            "#4393c3", "#2166ac", "#053061",
        ],
    ),
    brewer(
        "rdgy",
        ScaleKind::Diverging,
        &[
            "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#ffffff", "#e0e0e0", "#bababa",
            "#878787", "#4d4d4d", "#1a1a1a",
        ],
    ),
    brewer(
        "rdylbu",
        ScaleKind::Diverging,
        &[
            "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee090", "#ffffbf", "#e0f3f8", "#abd9e9",
            "#74add1", "#4575b4", "#313695",
        ],
    ),
    brewer(
        "rdylgn",
        ScaleKind::Diverging,
        &[
            "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a",
            "#66bd63", "#1a9850", "#006837",
        ],
    ),
    brewer(
        "spectral",
        ScaleKind::Diverging,
        &[
            "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598", "#abdda4",
            "#66c2a5", "#3288bd", "#5e4fa2",
        ],
    ),
];

/// Look up a scale by name, ignoring case and a leading `-`.
pub fn find_scale(name: &str) -> Option<&'static ColorScale> {
    let key = name.trim().trim_start_matches('-').to_lowercase();
    SCALES.iter().find(|s| s.name == key)
}

/// All registered scale names, in registry order.
pub fn scale_names() -> Vec<&'static str> {
    SCALES.iter().map(|s| s.name).collect()
}

/// Colors of a named scale as canonical hex strings.
///
/// A leading `-` reverses the scale. With `n`, ColorBrewer scales are cut
/// down to `n` colors (never fewer than three): qualitative ones keep
/// their first `n` entries, sequential and diverging ones are resampled
/// evenly across the full palette. Custom scales are always returned whole.
///
/// # Example
/// ```
/// use plotlinks::color::get_scales;
/// let colors = get_scales("-ggplot", None).unwrap();
/// assert_eq!(colors.first().map(String::as_str), Some("#FFB5B8"));
/// ```
pub fn get_scales(name: &str, n: Option<usize>) -> Result<Vec<String>> {
    let scale =
        find_scale(name).ok_or_else(|| PlotlinksError::UnknownColorScale(name.to_string()))?;

    let full: Vec<String> = scale
        .colors
        .iter()
        .map(|c| normalize(c))
        .collect::<Result<Vec<_>>>()?;

    let mut colors = match n {
        Some(count) if !scale.fixed && count < full.len() => {
            let count = count.max(MIN_CLASSES);
            match scale.kind {
                ScaleKind::Qualitative => full[..count].to_vec(),
                ScaleKind::Sequential | ScaleKind::Diverging => resample(&full, count)?,
            }
        }
        _ => full,
    };

    if name.trim().starts_with('-') {
        colors.reverse();
    }
    Ok(colors)
}

/// Plotly colorscale of a named scale: evenly spaced `(position, color)`
/// stops from 0 to 1.
pub fn get_colorscale(name: &str) -> Result<Vec<(f64, String)>> {
    let colors = get_scales(name, None)?;
    colorscale_from(&colors)
}

/// Plotly colorscale from an explicit list of colors.
pub fn colorscale_from<S: AsRef<str>>(colors: &[S]) -> Result<Vec<(f64, String)>> {
    match colors {
        [] => Err(PlotlinksError::InvalidColor(
            "a colorscale needs at least one color".to_string(),
        )),
        [only] => {
            let color = normalize(only.as_ref())?;
            Ok(vec![(0.0, color.clone()), (1.0, color)])
        }
        _ => {
            let last = (colors.len() - 1) as f64;
            colors
                .iter()
                .enumerate()
                .map(|(i, c)| -> Result<(f64, String)> {
                    Ok((i as f64 / last, normalize(c.as_ref())?))
                })
                .collect()
        }
    }
}

// =============================================================================
// Oklab resampling
// =============================================================================

fn parse_to_srgb(color: &str) -> Result<Srgb<f32>> {
    let parsed = csscolorparser::parse(color)
        .map_err(|e| PlotlinksError::InvalidColor(format!("'{}': {}", color, e)))?;
    Ok(Srgb::new(parsed.r as f32, parsed.g as f32, parsed.b as f32))
}

fn srgb_to_hex(color: &Srgb<f32>) -> String {
    let r = (color.red.clamp(0.0, 1.0) * 255.0).round() as u8;
    let g = (color.green.clamp(0.0, 1.0) * 255.0).round() as u8;
    let b = (color.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// `count` evenly spaced colors along a multi-stop gradient, mixed in Oklab.
///
/// The first and last stops are always reproduced exactly.
pub fn resample(colors: &[String], count: usize) -> Result<Vec<String>> {
    if colors.is_empty() || count == 0 {
        return Ok(vec![]);
    }
    let stops: Vec<Oklab<f32>> = colors
        .iter()
        .map(|c| parse_to_srgb(c).map(|rgb| Oklab::from_color(LinSrgb::from(rgb))))
        .collect::<Result<Vec<_>>>()?;

    if stops.len() == 1 || count == 1 {
        return Ok(vec![colors[0].clone(); count]);
    }

    let segments = stops.len() - 1;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        if i == 0 {
            out.push(colors[0].clone());
            continue;
        }
        if i == count - 1 {
            out.push(colors[segments].clone());
            continue;
        }
        let t = i as f32 / (count - 1) as f32;
        let position = t * segments as f32;
        let segment = (position.floor() as usize).min(segments - 1);
        let local = position - segment as f32;

        let mixed = stops[segment].mix(stops[segment + 1], local);
        let lin: LinSrgb<f32> = mixed.into_color();
        out.push(srgb_to_hex(&Srgb::from(lin)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_scale_resolves_names() {
        let colors = get_scales("dflt", None).unwrap();
        assert_eq!(colors.len(), 10);
        assert_eq!(colors[0], "#ff9933");
        assert_eq!(colors[1], "#3780bf");
    }

    #[test]
    fn test_custom_scale_ignores_count() {
        assert_eq!(get_scales("ggplot", Some(3)).unwrap().len(), 7);
    }

    #[test]
    fn test_reversed_scale() {
        let forward = get_scales("polar", None).unwrap();
        let mut reversed = get_scales("-polar", None).unwrap();
        reversed.reverse();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_plotly_scale_is_hex() {
        let colors = get_scales("plotly", None).unwrap();
        assert_eq!(colors[0], "#1F77B4");
    }

    #[test]
    fn test_qualitative_brewer_truncates() {
        let colors = get_scales("Set1", Some(4)).unwrap();
        assert_eq!(colors, vec!["#e41a1c", "#377eb8", "#4daf4a", "#984ea3"]);
        // never below three
        assert_eq!(get_scales("set1", Some(1)).unwrap().len(), 3);
        // larger than available returns the full palette
        assert_eq!(get_scales("set1", Some(50)).unwrap().len(), 9);
    }

    #[test]
    fn test_sequential_resample_keeps_endpoints() {
        let colors = get_scales("blues", Some(5)).unwrap();
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], "#f7fbff");
        assert_eq!(colors[4], "#08306b");
    }

    #[test]
    fn test_unknown_scale() {
        let err = get_scales("nope", None).unwrap_err();
        assert!(matches!(err, PlotlinksError::UnknownColorScale(_)));
    }

    #[test]
    fn test_colorscale_positions() {
        let scale = colorscale_from(&["#000000", "#808080", "#ffffff"]).unwrap();
        assert_eq!(scale.len(), 3);
        assert_eq!(scale[0].0, 0.0);
        assert_eq!(scale[1].0, 0.5);
        assert_eq!(scale[2].0, 1.0);

        let single = colorscale_from(&["red"]).unwrap();
        assert_eq!(single, vec![(0.0, "#db4052".to_string()), (1.0, "#db4052".to_string())]);
        assert!(colorscale_from::<&str>(&[]).is_err());
    }

    #[test]
    fn test_named_colorscale() {
        let scale = get_colorscale("rdbu").unwrap();
        assert_eq!(scale.len(), 11);
        assert_eq!(scale[10], (1.0, "#053061".to_string()));
    }

    #[test]
    fn test_scale_names_unique() {
        let names = scale_names();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }
}
