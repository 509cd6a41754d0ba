//! Chart specification consistency checks.
//!
//! Checks that every reference in a figure points at something that exists
//! and that axis domains are usable, without rendering anything.

use crate::figure::{AxisDef, AxisId, AxisKind, Figure};
use crate::naming;
use crate::{PlotlinksError, Result};
use serde_json::Value;
use std::collections::BTreeSet;

// ============================================================================
// Core Types
// ============================================================================

/// Result of [`validate`]
#[derive(Debug, Clone, Default)]
pub struct Validated {
    errors: Vec<Problem>,
    warnings: Vec<Problem>,
}

impl Validated {
    /// Whether the figure has no errors.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Problem] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Problem] {
        &self.warnings
    }
}

/// One finding, located by the key path it concerns
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub message: String,
    /// e.g. `data[2].yaxis` or `layout.xaxis3.anchor`
    pub location: String,
}

impl Problem {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: location.into(),
        }
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

// ============================================================================
// Validation Function
// ============================================================================

/// Inspect a figure.
///
/// Errors: trace axis references that resolve to no axis definition (the
/// implicit `x1`/`y1` always resolve), anchors naming missing axes, scene
/// references naming missing scenes, domains outside `[0, 1]` or reversed.
/// Warnings: overlays naming missing axes, axes no trace or axis refers to.
pub fn validate(fig: &Figure) -> Validated {
    let mut result = Validated::default();
    let layout = &fig.layout;
    let defined = |id: &AxisId| id.index == 1 || layout.axes.contains_key(id);

    let mut referenced: BTreeSet<AxisId> = BTreeSet::new();
    for (i, trace) in fig.data.iter().enumerate() {
        if trace.is_domain_based() {
            continue;
        }
        if trace.is_scene_based() {
            let scene = trace
                .get("scene")
                .and_then(Value::as_str)
                .map(|s| naming::parse_scene_name(s).unwrap_or(0))
                .unwrap_or(1);
            if scene != 1 && !layout.scenes.contains_key(&scene) {
                result.errors.push(Problem::new(
                    format!("data[{}].scene", i),
                    format!("scene {} is not defined", scene),
                ));
            }
            continue;
        }
        for id in [trace.x_ref(), trace.y_ref()] {
            referenced.insert(id);
            if !defined(&id) {
                result.errors.push(Problem::new(
                    format!("data[{}].{}axis", i, id.kind.letter()),
                    format!("axis {} is not defined", id),
                ));
            }
        }
    }

    for (id, def) in &layout.axes {
        let location = format!("layout.{}", id.key());
        check_domain(def, &location, &mut result);
        if let Some(anchor) = def.anchor {
            referenced.insert(anchor);
            if !defined(&anchor) {
                result.errors.push(Problem::new(
                    format!("{}.anchor", location),
                    format!("axis {} is not defined", anchor),
                ));
            }
        }
        // plotly places an axis overlaying a missing one on its own domain
        if let Some(overlaying) = def.overlaying {
            referenced.insert(overlaying);
            if !defined(&overlaying) {
                result.warnings.push(Problem::new(
                    format!("{}.overlaying", location),
                    format!("overlaid axis {} is not defined", overlaying),
                ));
            }
        }
    }

    for (index, scene) in &layout.scenes {
        for (id, def) in &scene.axes {
            let location = format!("layout.{}.{}", naming::scene_key(*index), id.key());
            check_domain(def, &location, &mut result);
        }
    }

    let has_cartesian = fig.data.iter().any(|t| t.is_cartesian());
    for id in layout.axes.keys() {
        if has_cartesian && id.kind != AxisKind::Z && id.index > 1 && !referenced.contains(id) {
            result.warnings.push(Problem::new(
                format!("layout.{}", id.key()),
                "axis is not used by any trace",
            ));
        }
    }
    result
}

fn check_domain(def: &AxisDef, location: &str, result: &mut Validated) {
    if let Some(domain) = def.domain {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(domain.low) || !in_range(domain.high) || domain.low > domain.high {
            result.errors.push(Problem::new(
                format!("{}.domain", location),
                format!("[{}, {}] is not an ordered range within [0, 1]", domain.low, domain.high),
            ));
        }
    }
}

/// Fail with [`PlotlinksError::ValidationError`] listing every error.
pub fn validate_figure(fig: &Figure) -> Result<()> {
    let result = validate(fig);
    for warning in result.warnings() {
        tracing::debug!(%warning, "validation warning");
    }
    if result.valid() {
        return Ok(());
    }
    let messages: Vec<String> = result.errors().iter().map(|p| p.to_string()).collect();
    Err(PlotlinksError::ValidationError(messages.join("; ")))
}
