//! Axis introspection
//!
//! Read-only views that recover the axis structure of an existing
//! [`Figure`]: which trace sits on which axes, which axis definitions
//! exist, how many there are of each kind and which canvas domain and side
//! each one occupies. Every view reads from [`Layout::axis_container`], so
//! 3-D figures are answered from their first scene.
//!
//! A figure without any axis definitions still reports the implicit `x1`
//! and `y1` axes that its traces default to.
//!
//! [`Layout::axis_container`]: crate::figure::Layout::axis_container

mod secondary;

pub use secondary::{set_axis, AxisPlacement};

use crate::figure::{AxisDef, AxisId, AxisKind, Domain, Figure, Side};
use crate::naming;
use std::collections::BTreeMap;

/// Axis pair a trace is drawn on
pub type AxisPair = (AxisId, AxisId);

/// Disambiguated trace names, in trace order.
pub fn trace_names(fig: &Figure) -> Vec<String> {
    naming::disambiguate(fig.data.iter().map(|t| t.name_or_empty()))
}

/// Trace name to its `(x, y)` axis references.
///
/// Missing references default to `x1`/`y1`. If two traces share a name,
/// the second (and later) is suffixed with a trailing underscore, in input
/// order.
pub fn trace_axis_refs(fig: &Figure) -> BTreeMap<String, AxisPair> {
    trace_names(fig)
        .into_iter()
        .zip(fig.data.iter())
        .map(|(name, trace)| (name, (trace.x_ref(), trace.y_ref())))
        .collect()
}

/// Trace name to its position in `data`, names disambiguated as in
/// [`trace_axis_refs`].
pub fn trace_index(fig: &Figure) -> BTreeMap<String, usize> {
    trace_names(fig)
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect()
}

/// Axis id to the names of the traces drawn on it.
pub fn traces_by_axis(fig: &Figure) -> BTreeMap<AxisId, Vec<String>> {
    let mut by_axis: BTreeMap<AxisId, Vec<String>> = BTreeMap::new();
    for (name, (x, y)) in trace_axis_refs(fig) {
        by_axis.entry(x).or_default().push(name.clone());
        by_axis.entry(y).or_default().push(name);
    }
    by_axis
}

/// Axis id to its definition.
///
/// Primary x/y definitions are filled with defaults when the layout has no
/// axis of that kind at all.
pub fn axis_definitions(fig: &Figure) -> BTreeMap<AxisId, AxisDef> {
    let mut defs = fig.layout.axis_container().clone();
    for kind in [AxisKind::X, AxisKind::Y] {
        if !defs.keys().any(|id| id.kind == kind) {
            defs.insert(AxisId::primary(kind), AxisDef::default());
        }
    }
    defs
}

/// Number of axis definitions of each kind.
pub fn axis_count(fig: &Figure) -> BTreeMap<AxisKind, usize> {
    let mut counts = BTreeMap::new();
    for id in axis_definitions(fig).keys() {
        *counts.entry(id.kind).or_insert(0) += 1;
    }
    counts
}

/// Axis ids of each kind, in index order.
pub fn axis_ids(fig: &Figure) -> BTreeMap<AxisKind, Vec<AxisId>> {
    let mut ids: BTreeMap<AxisKind, Vec<AxisId>> = BTreeMap::new();
    for id in axis_definitions(fig).into_keys() {
        ids.entry(id.kind).or_default().push(id);
    }
    ids
}

/// Occupancy of the canvas: kind, then domain, then side, to axis id.
pub type DomainOccupancy = BTreeMap<AxisKind, BTreeMap<Domain, BTreeMap<Side, AxisId>>>;

/// Group the x and y axes by the domain and side they occupy.
///
/// Domains are compared by exact value. When two axes share a domain and
/// side the one with the lower index is reported.
pub fn axis_domain_occupancy(fig: &Figure) -> DomainOccupancy {
    let mut occupancy: DomainOccupancy = BTreeMap::new();
    for kind in [AxisKind::X, AxisKind::Y] {
        occupancy.insert(kind, BTreeMap::new());
    }
    for (id, def) in axis_definitions(fig) {
        let Some(by_domain) = occupancy.get_mut(&id.kind) else {
            continue;
        };
        by_domain
            .entry(def.domain_or_default())
            .or_default()
            .entry(def.side_or_default(id.kind))
            .or_insert(id);
    }
    occupancy
}

/// Existing axis of `kind` on `domain` and `side`, if any.
pub fn axis_at(fig: &Figure, kind: AxisKind, domain: Domain, side: Side) -> Option<AxisId> {
    axis_domain_occupancy(fig)
        .get(&kind)
        .and_then(|by_domain| by_domain.get(&domain))
        .and_then(|by_side| by_side.get(&side))
        .copied()
}

/// First unused index for a new axis of `kind`.
///
/// Starts at one past the current count and skips indices already taken,
/// which happens when the existing numbering has gaps.
pub fn next_axis_id(fig: &Figure, kind: AxisKind) -> AxisId {
    let defs = axis_definitions(fig);
    let count = defs.keys().filter(|id| id.kind == kind).count() as u32;
    let mut index = count + 1;
    while defs.contains_key(&AxisId::new(kind, index)) {
        index += 1;
    }
    AxisId::new(kind, index)
}

/// Every introspection view of one figure
#[derive(Debug, Clone, PartialEq)]
pub struct AxisInfo {
    pub refs: BTreeMap<String, AxisPair>,
    pub by_axis: BTreeMap<AxisId, Vec<String>>,
    pub definitions: BTreeMap<AxisId, AxisDef>,
    pub counts: BTreeMap<AxisKind, usize>,
    pub ids: BTreeMap<AxisKind, Vec<AxisId>>,
    pub domains: DomainOccupancy,
}

impl AxisInfo {
    pub fn of(fig: &Figure) -> Self {
        Self {
            refs: trace_axis_refs(fig),
            by_axis: traces_by_axis(fig),
            definitions: axis_definitions(fig),
            counts: axis_count(fig),
            ids: axis_ids(fig),
            domains: axis_domain_occupancy(fig),
        }
    }
}
