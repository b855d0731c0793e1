//! Weighted tiling along the container's orientation.
//!
//! Weights are pixel-denominated: after a layout pass each child's weight
//! on the axis equals its assigned gap-free extent, so the weights always
//! sum to the container's usable extent. Any deficit between the stored
//! weights and the available space is spread equally before distribution.

use crate::layout_engine::systems::{LayoutContext, layout_node};
use crate::model::tree::NodeId;
use crate::model::window::WindowId;
use crate::model::workspace::Workspace;
use crate::sys::geometry::{Orientation, Rect};

pub(crate) fn layout(
    ws: &mut Workspace,
    node: NodeId,
    orientation: Orientation,
    rect: Rect,
    ctx: &LayoutContext<'_>,
    out: &mut Vec<(WindowId, Rect)>,
) {
    let children: Vec<NodeId> = ws.tree.children(node).to_vec();
    if children.is_empty() {
        return;
    }
    let count = children.len();
    let gap = ctx.config.gaps.inner.along(orientation);
    let total_gap = (count - 1) as f64 * gap;
    let usable = (rect.extent(orientation) - total_gap).max(0.0);

    let sum: f64 = children.iter().map(|&c| ws.tree[c].weight(orientation)).sum();
    let spread = (usable - sum) / count as f64;

    let mut offset = rect.position(orientation);
    for (i, &child) in children.iter().enumerate() {
        let extent = (ws.tree[child].weight(orientation) + spread).max(0.0);
        ws.tree[child].set_weight(orientation, extent);

        let child_rect = rect.with_span(orientation, offset, extent).round();
        // The gap-free slice: half of each interior seam belongs to the
        // child, outer edges get nothing.
        let lo = offset - if i > 0 { gap / 2.0 } else { 0.0 };
        let hi = offset + extent + if i < count - 1 { gap / 2.0 } else { 0.0 };
        let child_virtual = rect.with_span(orientation, lo, hi - lo).round();

        layout_node(ws, child, child_rect, child_virtual, ctx, out);
        offset += extent + gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::{EngineConfig, InnerGaps};
    use crate::layout_engine::systems::calculate_layout;
    use crate::model::window::WindowId;
    use crate::model::workspace::Workspace;
    use crate::sys::backend::Monitor;

    fn w(idx: u32) -> WindowId { WindowId::new(1, idx) }

    fn workspace(width: f64, height: f64, config: &EngineConfig) -> Workspace {
        Workspace::new(Monitor::new(Rect::from_parts(0.0, 0.0, width, height)), config)
    }

    #[test]
    fn three_equal_children_with_gaps() {
        let mut config = EngineConfig::default();
        config.gaps.inner = InnerGaps::uniform(10.0);
        let mut ws = workspace(900.0, 400.0, &config);
        for idx in 1..=3 {
            ws.add_window(w(idx));
        }
        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rects.len(), 3);
        let widths: Vec<f64> = rects.iter().map(|(_, r)| r.size.width).collect();
        let xs: Vec<f64> = rects.iter().map(|(_, r)| r.origin.x).collect();
        assert_eq!(widths, vec![293.0, 294.0, 293.0]);
        assert_eq!(xs, vec![0.0, 303.0, 607.0]);
        for (_, rect) in &rects {
            assert_eq!(rect.origin.y, 0.0);
            assert_eq!(rect.size.height, 400.0);
        }
    }

    #[test]
    fn weights_sum_to_usable_extent_after_layout() {
        let mut config = EngineConfig::default();
        config.gaps.inner = InnerGaps::uniform(10.0);
        let mut ws = workspace(900.0, 400.0, &config);
        for idx in 1..=3 {
            ws.add_window(w(idx));
        }
        let ctx = LayoutContext { config: &config, manipulated: None };
        calculate_layout(&mut ws, &ctx);
        let sum: f64 = ws
            .tree()
            .children(ws.root())
            .iter()
            .map(|&c| ws.tree()[c].weight(Orientation::Horizontal))
            .sum();
        assert!((sum - 880.0).abs() < 1e-6);
    }

    #[test]
    fn weight_changes_shift_the_seam() {
        let config = EngineConfig::default();
        let mut ws = workspace(1000.0, 600.0, &config);
        let a = ws.add_window(w(1));
        ws.add_window(w(2));
        let ctx = LayoutContext { config: &config, manipulated: None };
        calculate_layout(&mut ws, &ctx);

        let b = ws.node_for(w(2)).unwrap();
        ws.tree[a].set_weight(Orientation::Horizontal, 600.0);
        ws.tree[b].set_weight(Orientation::Horizontal, 400.0);
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rects[0].1.size.width, 600.0);
        assert_eq!(rects[1].1.origin.x, 600.0);
        assert_eq!(rects[1].1.size.width, 400.0);
    }

    #[test]
    fn nested_container_lays_out_recursively() {
        let config = EngineConfig::default();
        let mut ws = workspace(1000.0, 600.0, &config);
        ws.add_window(w(1));
        ws.record_focus(w(1));
        ws.add_window(w(2));
        // Nest w2 and w3 in a vertical container next to w1.
        let b = ws.node_for(w(2)).unwrap();
        use crate::model::workspace::{ContainerLayout, NodeData};
        let inner = ws.tree.push_child(
            ws.root(),
            NodeData::container(Orientation::Vertical, ContainerLayout::Tiles),
        );
        let slot = ws.unbind(b).unwrap();
        ws.tree.bind(b, inner, 0);
        ws.tree[inner].set_weights(slot.weights);
        ws.tree.push_child(inner, NodeData::window(w(3)));

        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rects.len(), 3);
        let of = |wid: WindowId| rects.iter().find(|(w, _)| *w == wid).unwrap().1;
        assert_eq!(of(w(1)), Rect::from_parts(0.0, 0.0, 500.0, 600.0));
        assert_eq!(of(w(2)), Rect::from_parts(500.0, 0.0, 500.0, 300.0));
        assert_eq!(of(w(3)), Rect::from_parts(500.0, 300.0, 500.0, 300.0));
    }
}
