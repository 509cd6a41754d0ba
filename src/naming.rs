//! Centralized naming conventions for axis and scene identifiers.
//!
//! A chart specification refers to the same axis in several spellings:
//! a trace says `x` or `x2`, the layout keys the definition as `xaxis`,
//! `xaxis1` or `xaxis2`. All of them resolve to a kind letter plus a
//! 1-based index. An unsuffixed name is always index 1.
//!
//! # Categories
//!
//! - **Axis references**: what a trace stores (`x1`, `y3`)
//! - **Axis keys**: what the layout stores (`xaxis1`, `yaxis3`)
//! - **Scene keys**: 3-D subplot containers (`scene`, `scene2`)
//! - **Trace names**: collision policy for duplicate trace names

use const_format::concatcp;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// ============================================================================
// Base Building Blocks
// ============================================================================

/// Infix between the kind letter and the index in layout keys
const AXIS_INFIX: &str = "axis";

/// Prefix for 3-D scene containers
pub const SCENE_PREFIX: &str = "scene";

/// Suffix appended to a trace name that collides with an earlier one
pub const COLLISION_SUFFIX: char = '_';

/// Pattern accepted for any axis spelling: `x`, `x2`, `xaxis`, `xaxis2`
const AXIS_NAME_PATTERN: &str = concatcp!("^([xyz])(?:", AXIS_INFIX, ")?([0-9]*)$");

/// Pattern accepted for scene spellings: `scene`, `scene2`
const SCENE_NAME_PATTERN: &str = concatcp!("^", SCENE_PREFIX, "([0-9]*)$");

static AXIS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AXIS_NAME_PATTERN).expect("axis name pattern is valid"));

static SCENE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SCENE_NAME_PATTERN).expect("scene name pattern is valid"));

// ============================================================================
// Constructor Functions
// ============================================================================

/// Reference stored on a trace, e.g. `x1`, `y2`.
///
/// # Example
/// ```
/// use plotlinks::naming;
/// assert_eq!(naming::axis_ref('y', 2), "y2");
/// ```
pub fn axis_ref(kind: char, index: u32) -> String {
    format!("{}{}", kind, index)
}

/// Layout key holding an axis definition, e.g. `xaxis1`, `yaxis2`.
///
/// # Example
/// ```
/// use plotlinks::naming;
/// assert_eq!(naming::axis_key('x', 1), "xaxis1");
/// ```
pub fn axis_key(kind: char, index: u32) -> String {
    format!("{}{}{}", kind, AXIS_INFIX, index)
}

/// Key of an axis inside a scene (scenes never number their axes).
pub fn scene_axis_key(kind: char) -> String {
    format!("{}{}", kind, AXIS_INFIX)
}

/// Layout key for a scene: `scene` for the first, `scene2` onwards after.
///
/// # Example
/// ```
/// use plotlinks::naming;
/// assert_eq!(naming::scene_key(1), "scene");
/// assert_eq!(naming::scene_key(3), "scene3");
/// ```
pub fn scene_key(index: u32) -> String {
    if index <= 1 {
        SCENE_PREFIX.to_string()
    } else {
        format!("{}{}", SCENE_PREFIX, index)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse any axis spelling into `(kind, index)`.
///
/// Returns `None` for names that are not axes (`"paper"`, `"free"`,
/// `"legend"`) and for an explicit index of zero.
///
/// # Example
/// ```
/// use plotlinks::naming;
/// assert_eq!(naming::parse_axis_name("x"), Some(('x', 1)));
/// assert_eq!(naming::parse_axis_name("yaxis3"), Some(('y', 3)));
/// assert_eq!(naming::parse_axis_name("paper"), None);
/// ```
pub fn parse_axis_name(name: &str) -> Option<(char, u32)> {
    let caps = AXIS_NAME_RE.captures(name)?;
    let kind = caps.get(1)?.as_str().chars().next()?;
    let digits = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let index = if digits.is_empty() {
        1
    } else {
        digits.parse::<u32>().ok()?
    };
    if index == 0 {
        return None;
    }
    Some((kind, index))
}

/// Whether a layout key names an axis definition (as opposed to a reference).
pub fn is_axis_key(key: &str) -> bool {
    key.contains(AXIS_INFIX) && parse_axis_name(key).is_some()
}

/// Parse a scene spelling into its 1-based index.
pub fn parse_scene_name(name: &str) -> Option<u32> {
    let caps = SCENE_NAME_RE.captures(name)?;
    let digits = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    if digits.is_empty() {
        return Some(1);
    }
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(index) => Some(index),
    }
}

/// Trailing numeric suffix of a key, if it has one.
///
/// `xaxis12` yields 12, `xaxis` yields `None`.
pub fn trailing_index(key: &str) -> Option<u32> {
    let digits: String = key
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

// ============================================================================
// Trace Names
// ============================================================================

/// Disambiguate trace names in input order.
///
/// If two traces share a name, the second (and later) is suffixed with a
/// trailing underscore, in input order. The suffix is repeated until the
/// name is unused, so every returned name is unique.
///
/// # Example
/// ```
/// use plotlinks::naming;
/// let names = naming::disambiguate(["a", "b", "a", "a"]);
/// assert_eq!(names, vec!["a", "b", "a_", "a__"]);
/// ```
pub fn disambiguate<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::new();
    for name in names {
        let mut candidate = name.as_ref().to_string();
        while seen.contains(&candidate) {
            candidate.push(COLLISION_SUFFIX);
        }
        seen.insert(candidate.clone());
        result.push(candidate);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ref_and_key() {
        assert_eq!(axis_ref('x', 1), "x1");
        assert_eq!(axis_ref('z', 4), "z4");
        assert_eq!(axis_key('y', 2), "yaxis2");
        assert_eq!(scene_axis_key('z'), "zaxis");
    }

    #[test]
    fn test_parse_axis_name_unsuffixed_is_one() {
        assert_eq!(parse_axis_name("x"), Some(('x', 1)));
        assert_eq!(parse_axis_name("x1"), Some(('x', 1)));
        assert_eq!(parse_axis_name("xaxis"), Some(('x', 1)));
        assert_eq!(parse_axis_name("xaxis1"), Some(('x', 1)));
        assert_eq!(parse_axis_name("zaxis"), Some(('z', 1)));
    }

    #[test]
    fn test_parse_axis_name_multi_digit() {
        assert_eq!(parse_axis_name("yaxis12"), Some(('y', 12)));
        assert_eq!(parse_axis_name("x10"), Some(('x', 10)));
    }

    #[test]
    fn test_parse_axis_name_rejects_non_axes() {
        assert_eq!(parse_axis_name("paper"), None);
        assert_eq!(parse_axis_name("free"), None);
        assert_eq!(parse_axis_name("x0"), None);
        assert_eq!(parse_axis_name("waxis"), None);
        assert_eq!(parse_axis_name("xaxis_title"), None);
    }

    #[test]
    fn test_is_axis_key() {
        assert!(is_axis_key("xaxis"));
        assert!(is_axis_key("yaxis3"));
        assert!(!is_axis_key("y3"));
        assert!(!is_axis_key("legend"));
    }

    #[test]
    fn test_scene_names() {
        assert_eq!(scene_key(1), "scene");
        assert_eq!(scene_key(2), "scene2");
        assert_eq!(parse_scene_name("scene"), Some(1));
        assert_eq!(parse_scene_name("scene4"), Some(4));
        assert_eq!(parse_scene_name("scene0"), None);
        assert_eq!(parse_scene_name("scenery"), None);
    }

    #[test]
    fn test_trailing_index() {
        assert_eq!(trailing_index("xaxis12"), Some(12));
        assert_eq!(trailing_index("yaxis3"), Some(3));
        assert_eq!(trailing_index("xaxis"), None);
        assert_eq!(trailing_index("legend"), None);
    }

    #[test]
    fn test_disambiguate_chains_underscores() {
        assert_eq!(disambiguate(["a", "a", "a"]), vec!["a", "a_", "a__"]);
        assert_eq!(disambiguate(["a", "a_", "a"]), vec!["a", "a_", "a__"]);
        assert!(disambiguate(Vec::<String>::new()).is_empty());
    }
}
