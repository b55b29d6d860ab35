#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use peaky_layout::{
    Axis, Constraints, Engine, EngineConfig, GridSpec, LayoutSpec, Op, ResizeEdge, SnapState,
    Tree, build_tree,
};

#[derive(Debug, Arbitrary)]
struct Input {
    rows: u8,
    columns: u8,
    min: u8,
    ops: Vec<FuzzOp>,
}

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Resize { pane: u8, edge: u8, delta: i16, snap: bool },
    Split { pane: u8, vertical: bool, percent: u8 },
    Close { pane: u8 },
    Reset { pane: Option<u8> },
    Swap { a: u8, b: u8 },
    Zoom { pane: u8, toggle: bool },
    Undo,
    Redo,
}

fn pane_name(tree: &Tree, index: u8) -> String {
    let panes = tree.pane_ids();
    if panes.is_empty() || usize::from(index) >= panes.len() * 2 {
        // Out-of-range indices probe unknown IDs.
        return format!("ghost{index}");
    }
    panes[usize::from(index) % panes.len()].clone()
}

fn to_op(tree: &Tree, op: &FuzzOp, fresh: &mut u32, snap_state: SnapState) -> Option<Op> {
    Some(match *op {
        FuzzOp::Resize {
            pane,
            edge,
            delta,
            snap,
        } => {
            let edge = match edge % 4 {
                0 => ResizeEdge::Left,
                1 => ResizeEdge::Right,
                2 => ResizeEdge::Up,
                _ => ResizeEdge::Down,
            };
            if snap {
                Op::resize_snapped(pane_name(tree, pane), edge, i32::from(delta), snap_state)
            } else {
                Op::resize(pane_name(tree, pane), edge, i32::from(delta))
            }
        }
        FuzzOp::Split {
            pane,
            vertical,
            percent,
        } => {
            *fresh += 1;
            let axis = if vertical {
                Axis::Vertical
            } else {
                Axis::Horizontal
            };
            Op::split(
                pane_name(tree, pane),
                format!("f{fresh}"),
                axis,
                u32::from(percent),
            )
        }
        FuzzOp::Close { pane } => Op::close(pane_name(tree, pane)),
        FuzzOp::Reset { pane: None } => Op::reset_all(),
        FuzzOp::Reset { pane: Some(pane) } => Op::reset_around(pane_name(tree, pane)),
        FuzzOp::Swap { a, b } => Op::swap(pane_name(tree, a), pane_name(tree, b)),
        FuzzOp::Zoom { pane, toggle } => Op::zoom(pane_name(tree, pane), toggle),
        FuzzOp::Undo | FuzzOp::Redo => return None,
    })
}

fuzz_target!(|input: Input| {
    let rows = u32::from(input.rows % 4) + 1;
    let columns = u32::from(input.columns % 4) + 1;
    let ids: Vec<String> = (0..rows * columns).map(|i| format!("p{i}")).collect();
    let Ok(tree) = build_tree(&LayoutSpec::Grid(GridSpec::new(rows, columns)), &ids) else {
        return;
    };
    let min = u32::from(input.min % 80) + 1;
    let config = EngineConfig {
        constraints: Constraints::new(min, min),
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_config(tree, &config);
    let mut fresh = 0u32;
    let mut snap_state = SnapState::default();

    for op in input.ops.iter().take(256) {
        let Some(before) = engine.tree().cloned() else {
            return;
        };
        match op {
            FuzzOp::Undo => {
                engine.undo();
            }
            FuzzOp::Redo => {
                engine.redo();
            }
            other => {
                let Some(op) = to_op(&before, other, &mut fresh, snap_state) else {
                    continue;
                };
                match engine.apply(op) {
                    Ok(result) => snap_state = result.snap_state,
                    Err(_) => assert_eq!(engine.tree(), Some(&before), "rejected op mutated tree"),
                }
            }
        }

        let Some(tree) = engine.tree() else {
            return;
        };
        tree.validate().expect("tree invariants hold after every call");
        let rects = tree.rects();
        if !rects.is_empty() {
            let area: u64 = rects
                .values()
                .map(|r| u64::from(r.width) * u64::from(r.height))
                .sum();
            assert_eq!(area, 1_000_000, "leaves must tile the root");
        }
        let restored = Tree::from_snapshot(&tree.to_snapshot()).expect("snapshot round trip");
        assert_eq!(restored.state_hash(), tree.state_hash());
        if tree.is_empty() {
            return;
        }
    }
});
