//! Moving traces onto secondary axes

use super::{axis_at, axis_definitions, next_axis_id, trace_axis_refs, trace_index, traces_by_axis};
use crate::figure::{AxisDef, AxisId, AxisKind, Domain, Figure, Side};
use crate::{PlotlinksError, Result};
use std::collections::BTreeSet;

/// Where [`set_axis`] should put the traces
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPlacement {
    /// Existing axis to move the traces to. When absent, an axis on the
    /// trace's current domain and `side` is reused or created.
    pub on: Option<AxisId>,
    pub side: Side,
    /// Title of a newly created axis
    pub title: String,
}

impl Default for AxisPlacement {
    fn default() -> Self {
        Self {
            on: None,
            side: Side::Right,
            title: String::new(),
        }
    }
}

impl AxisPlacement {
    pub fn on(axis: AxisId) -> Self {
        Self {
            on: Some(axis),
            ..Default::default()
        }
    }

    pub fn side(side: Side) -> Self {
        Self {
            side,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

/// Move the named traces onto another axis.
///
/// Works on a copy of `fig`. With `placement.on`, every trace is bound to
/// that axis and to the axis it is anchored to (the primary perpendicular
/// axis when it has no anchor). Otherwise each trace's current y axis
/// domain is looked up: an axis already sitting on that domain and side,
/// anchored to the trace's x axis, is reused. Only when there is none is a
/// new y axis created overlaying the current one.
///
/// Axis definitions left without traces are removed afterwards.
///
/// # Example
/// ```
/// use plotlinks::axis::{set_axis, trace_axis_refs, AxisPlacement};
/// use plotlinks::{AxisId, Figure};
/// use serde_json::json;
///
/// let fig = Figure::from_value(json!({
///     "data": [{"name": "price"}, {"name": "volume"}],
///     "layout": {"xaxis1": {}, "yaxis1": {}}
/// })).unwrap();
/// let moved = set_axis(&fig, &["volume"], &AxisPlacement::default()).unwrap();
/// assert_eq!(trace_axis_refs(&moved)["volume"].1, AxisId::y(2));
/// ```
pub fn set_axis<S: AsRef<str>>(
    fig: &Figure,
    traces: &[S],
    placement: &AxisPlacement,
) -> Result<Figure> {
    let mut fig = fig.clone();

    if let Some(target) = placement.on {
        if target.kind == AxisKind::Z {
            return Err(PlotlinksError::ValidationError(format!(
                "traces cannot be placed on '{}'",
                target
            )));
        }
        if !axis_definitions(&fig).contains_key(&target) {
            return Err(PlotlinksError::AxisNotFound(target.to_string()));
        }
    }

    for name in traces {
        let name = name.as_ref();
        let position = *trace_index(&fig)
            .get(name)
            .ok_or_else(|| PlotlinksError::TraceNotFound(name.to_string()))?;

        let target = match placement.on {
            Some(target) => target,
            None => secondary_for(&mut fig, name, placement)?,
        };
        rebind(&mut fig, position, target);
    }

    collect_orphans(&mut fig);
    Ok(fig)
}

/// Find or create the y axis a trace should move to.
fn secondary_for(fig: &mut Figure, name: &str, placement: &AxisPlacement) -> Result<AxisId> {
    let (current_x, current_y) = *trace_axis_refs(fig)
        .get(name)
        .ok_or_else(|| PlotlinksError::TraceNotFound(name.to_string()))?;
    let current_def = axis_definitions(fig)
        .remove(&current_y)
        .unwrap_or_default();
    let domain = current_def.domain_or_default();

    if let Some(existing) = reusable_axis(fig, domain, placement.side, current_x) {
        tracing::debug!(
            trace = name,
            axis = %existing,
            domain = %domain,
            "reusing axis on the same domain and side"
        );
        return Ok(existing);
    }

    let id = next_axis_id(fig, AxisKind::Y);
    let mut def: AxisDef = current_def;
    for key in ["title", "overlaying", "side", "anchor"] {
        def.properties.remove(key);
    }
    def.title = (!placement.title.is_empty()).then(|| placement.title.clone());
    def.overlaying = Some(current_y);
    def.side = Some(placement.side);
    def.anchor = Some(current_x);

    tracing::debug!(
        trace = name,
        axis = %id,
        overlaying = %current_y,
        side = %placement.side,
        "creating secondary axis"
    );
    fig.layout.axis_container_mut().insert(id, def);
    Ok(id)
}

/// Axis on `domain` and `side` that sits in the same panel as `x`.
///
/// The lowest index from the occupancy view is preferred; another match
/// is only searched for when that one is anchored to a different x axis.
fn reusable_axis(fig: &Figure, domain: Domain, side: Side, x: AxisId) -> Option<AxisId> {
    let defs = axis_definitions(fig);
    let anchored_to_x = |id: &AxisId| {
        defs.get(id)
            .and_then(|def| def.anchor)
            .filter(|anchor| anchor.kind == AxisKind::X)
            .unwrap_or_else(|| AxisId::primary(AxisKind::X))
            == x
    };
    if let Some(id) = axis_at(fig, AxisKind::Y, domain, side) {
        if anchored_to_x(&id) {
            return Some(id);
        }
    }
    defs.iter()
        .filter(|(id, def)| {
            id.kind == AxisKind::Y
                && def.domain_or_default() == domain
                && def.side_or_default(id.kind) == side
        })
        .map(|(id, _)| *id)
        .find(|id| anchored_to_x(id))
}

/// Point a trace at `target` and at the axis `target` is anchored to.
fn rebind(fig: &mut Figure, position: usize, target: AxisId) {
    let perpendicular = target.kind.perpendicular();
    let anchor = axis_definitions(fig)
        .get(&target)
        .and_then(|def| def.anchor)
        .filter(|anchor| anchor.kind == perpendicular)
        .unwrap_or_else(|| AxisId::primary(perpendicular));

    if let Some(trace) = fig.data.get_mut(position) {
        trace.bind(target);
        trace.bind(anchor);
    }
}

/// Drop top-level axis definitions that no trace references.
///
/// `overlaying` is left as it was, even when it names a dropped axis.
fn collect_orphans(fig: &mut Figure) {
    let referenced: BTreeSet<AxisId> = traces_by_axis(fig).into_keys().collect();
    let orphans: Vec<AxisId> = fig
        .layout
        .axes
        .keys()
        .filter(|id| id.kind != AxisKind::Z && !referenced.contains(id))
        .copied()
        .collect();

    for id in &orphans {
        tracing::debug!(axis = %id, "removing axis without traces");
        fig.layout.axes.remove(id);
    }
}
