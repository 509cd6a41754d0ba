//! Property-based tests for axis introspection, secondary axes and subplots.

use plotlinks::axis::{axis_definitions, set_axis, trace_axis_refs, AxisPlacement};
use plotlinks::subplots::{subplots, GridOptions};
use plotlinks::validate::validate;
use plotlinks::{AxisId, Figure, Layout, PlotlinksError, Side, Trace};
use proptest::prelude::*;
use serde_json::json;

/// Traces `t0..tn`, each on `y1` or on a right-hand `y2`.
fn figure_with(on_secondary: &[bool]) -> Figure {
    let data = on_secondary
        .iter()
        .enumerate()
        .map(|(i, secondary)| {
            let trace = Trace::new("scatter").with_name(&format!("t{}", i));
            if *secondary {
                trace.on(AxisId::y(2))
            } else {
                trace
            }
        })
        .collect();
    let mut layout = Layout::default();
    layout.set("xaxis1", json!({}));
    layout.set("yaxis1", json!({"title": "primary"}));
    if on_secondary.iter().any(|s| *s) {
        layout.set(
            "yaxis2",
            json!({"overlaying": "y1", "side": "right", "anchor": "x1"}),
        );
    }
    Figure::new(data, layout)
}

fn one_trace_figure(name: &str) -> Figure {
    Figure::new(
        vec![Trace::new("scatter").with_name(name)],
        Layout::default().with("legend", json!({"title": name})),
    )
}

proptest! {
    /// Rebinding every trace to the axes it already reports changes nothing.
    #[test]
    fn test_axis_refs_idempotent(layout in prop::collection::vec(any::<bool>(), 1..8)) {
        let fig = figure_with(&layout);
        let refs = trace_axis_refs(&fig);

        let mut applied = fig.clone();
        for trace in &mut applied.data {
            let (x, y) = refs[trace.name_or_empty()];
            trace.bind(x);
            trace.bind(y);
        }
        prop_assert_eq!(trace_axis_refs(&applied), refs);
    }

    /// Moving any trace off `y1` creates a right-hand axis overlaying `y1`,
    /// including when it was the only trace there.
    #[test]
    fn test_secondary_axis_created(n in 1usize..8, pick in 0usize..8) {
        let fig = figure_with(&vec![false; n]);
        let name = format!("t{}", pick % n);
        let moved = set_axis(&fig, &[name.as_str()], &AxisPlacement::side(Side::Right)).unwrap();

        let (_, y) = trace_axis_refs(&moved)[&name];
        prop_assert_ne!(y, AxisId::y(1));
        let def = &axis_definitions(&moved)[&y];
        prop_assert_eq!(def.side, Some(Side::Right));
        prop_assert_eq!(def.overlaying, Some(AxisId::y(1)));
    }

    /// Two separate calls for traces sharing a domain land on one axis.
    #[test]
    fn test_secondary_axis_reused(n in 3usize..8, a in 0usize..8, b in 0usize..8) {
        let a = a % n;
        let b = (a + 1 + b % (n - 1)) % n;
        prop_assume!(a != b);
        let fig = figure_with(&vec![false; n]);
        let placement = AxisPlacement::side(Side::Right);

        let first = set_axis(&fig, &[format!("t{}", a)], &placement).unwrap();
        let second = set_axis(&first, &[format!("t{}", b)], &placement).unwrap();
        let refs = trace_axis_refs(&second);
        prop_assert_eq!(refs[&format!("t{}", a)].1, refs[&format!("t{}", b)].1);
    }

    /// After any move, every axis definition is used by some trace.
    #[test]
    fn test_no_orphan_axes(
        layout in prop::collection::vec(any::<bool>(), 1..8),
        moves in prop::collection::vec(0usize..8, 1..4),
        right in any::<bool>(),
    ) {
        let fig = figure_with(&layout);
        let names: Vec<String> = moves.iter().map(|m| format!("t{}", m % layout.len())).collect();
        let side = if right { Side::Right } else { Side::Left };
        let moved = set_axis(&fig, &names, &AxisPlacement::side(side)).unwrap();

        let used: Vec<AxisId> = trace_axis_refs(&moved)
            .values()
            .flat_map(|(x, y)| [*x, *y])
            .collect();
        for id in axis_definitions(&moved).keys() {
            prop_assert!(used.contains(id), "{} has no traces", id);
        }
    }

    /// Every trace lands in its own cell and unused cells leave no axes.
    #[test]
    fn test_subplot_grid_shape(
        sizes in prop::collection::vec(1usize..4, 1..7),
        extra_rows in 0usize..2,
        cols in 1usize..4,
    ) {
        let figures: Vec<Figure> = sizes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let data = (0..*n)
                    .map(|j| Trace::new("scatter").with_name(&format!("f{}_{}", i, j)))
                    .collect();
                Figure::new(data, Layout::default())
            })
            .collect();
        let rows = figures.len().div_ceil(cols) + extra_rows;
        let grid = subplots(&figures, Some((rows, cols)), &GridOptions::default(), None, None).unwrap();

        prop_assert_eq!(grid.data.len(), sizes.iter().sum::<usize>());
        let refs = trace_axis_refs(&grid);
        for (i, n) in sizes.iter().enumerate() {
            let cell = i as u32 + 1;
            for j in 0..*n {
                prop_assert_eq!(refs[&format!("f{}_{}", i, j)], (AxisId::x(cell), AxisId::y(cell)));
            }
        }
        let count = figures.len() as u32;
        prop_assert!(grid.layout.axes.keys().all(|id| id.index <= count));
        prop_assert_eq!(grid.layout.axes.len(), 2 * figures.len());
    }

    /// Shared axes survive trimming with anchors that still resolve.
    #[test]
    fn test_shared_grid_validates(
        count in 1usize..7,
        extra_rows in 0usize..2,
        cols in 1usize..4,
        shared_x in any::<bool>(),
        shared_y in any::<bool>(),
    ) {
        let figures: Vec<Figure> = (0..count)
            .map(|i| one_trace_figure(&format!("f{}", i)))
            .collect();
        let rows = count.div_ceil(cols) + extra_rows;
        let options = GridOptions::new().shared(shared_x, shared_y);
        let grid = subplots(&figures, Some((rows, cols)), &options, None, None).unwrap();

        prop_assert_eq!(grid.data.len(), count);
        let result = validate(&grid);
        prop_assert!(result.valid(), "{:?}", result.errors());
        let used: Vec<AxisId> = trace_axis_refs(&grid)
            .values()
            .flat_map(|(x, y)| [*x, *y])
            .collect();
        for (id, def) in &grid.layout.axes {
            prop_assert!(used.contains(id), "{} has no traces", id);
            if let Some(anchor) = def.anchor {
                prop_assert!(grid.layout.axes.contains_key(&anchor), "{} anchored to {}", id, anchor);
            }
        }
    }

    /// Too many figures for the grid fails without output.
    #[test]
    fn test_invalid_shape(rows in 1usize..3, cols in 1usize..3, extra in 1usize..3) {
        let figures: Vec<Figure> = (0..rows * cols + extra)
            .map(|i| one_trace_figure(&format!("f{}", i)))
            .collect();
        let result = subplots(&figures, Some((rows, cols)), &GridOptions::default(), None, None);
        prop_assert!(matches!(result, Err(PlotlinksError::InvalidShape(_))));
    }
}

#[test]
fn test_three_figures_on_two_by_two() {
    let figures: Vec<Figure> = ["A", "B", "C"].iter().map(|n| one_trace_figure(n)).collect();
    let grid = subplots(&figures, Some((2, 2)), &GridOptions::default(), None, None).unwrap();

    assert_eq!(grid.data.len(), 3);
    let refs = trace_axis_refs(&grid);
    assert_eq!(refs["A"], (AxisId::x(1), AxisId::y(1)));
    assert_eq!(refs["B"], (AxisId::x(2), AxisId::y(2)));
    assert_eq!(refs["C"], (AxisId::x(3), AxisId::y(3)));
    assert!(!grid.layout.axes.contains_key(&AxisId::x(4)));
    assert!(!grid.layout.axes.contains_key(&AxisId::y(4)));
    assert_eq!(grid.layout.get("legend").unwrap()["title"], json!("A"));
}
