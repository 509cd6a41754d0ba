//! Color resolution
//!
//! Maps color names, scale names and color lists to concrete color values.
//! Everything here is a pure function over the static name and scale
//! tables.

mod convert;
mod generator;
pub mod names;
mod scales;

pub use convert::{
    color_range, hex_to_hsv, hex_to_rgb, normalize, normalize_colors, rgb_components, rgb_to_hex,
    rgba_to_rgb, to_rgba,
};
pub use generator::{get_colors, ColorGenerator, ColorSource};
pub use scales::{
    colorscale_from, find_scale, get_colorscale, get_scales, resample, scale_names, ColorScale,
    ScaleKind, SCALES,
};
