//! Scroll (carousel) layout: horizontal only. The most recent child is
//! anchored near the center of the rect and the rest run contiguously off
//! both sides; the backend clips whatever hangs outside the workspace.

use crate::layout_engine::systems::{LayoutContext, layout_node};
use crate::model::tree::NodeId;
use crate::model::window::WindowId;
use crate::model::workspace::Workspace;
use crate::sys::geometry::{Orientation, Rect};

pub(crate) fn layout(
    ws: &mut Workspace,
    node: NodeId,
    rect: Rect,
    ctx: &LayoutContext<'_>,
    out: &mut Vec<(WindowId, Rect)>,
) {
    let children: Vec<NodeId> = ws.tree.children(node).to_vec();
    if children.is_empty() {
        return;
    }
    if let [only] = children[..] {
        ws.tree[only].set_weight(Orientation::Horizontal, rect.size.width);
        layout_node(ws, only, rect, rect, ctx, out);
        return;
    }

    let full_width = rect.size.width;
    let ratio = ctx.config.focused_width_ratio;
    let anchor = ws.most_recent_child(node).unwrap_or(children[0]);
    let anchor_index = children.iter().position(|&c| c == anchor).unwrap_or(0);

    // A child that was never laid out has no width yet and gets the
    // focused share; anything else keeps its previously assigned width.
    let width_of = |ws: &Workspace, child: NodeId| {
        let weight = ws.tree()[child].weight(Orientation::Horizontal);
        if weight > 0.0 { weight } else { full_width * ratio }
    };

    let anchor_x = rect.origin.x + (1.0 - ratio) / 2.0 * full_width;

    let mut slots: Vec<(NodeId, f64, f64)> = Vec::with_capacity(children.len());
    let mut x = anchor_x;
    for &child in &children[anchor_index..] {
        let width = width_of(ws, child);
        slots.push((child, x, width));
        x += width;
    }
    let mut x = anchor_x;
    for &child in children[..anchor_index].iter().rev() {
        let width = width_of(ws, child);
        x -= width;
        slots.push((child, x, width));
    }

    slots.sort_by(|a, b| a.1.total_cmp(&b.1));
    for (child, x, width) in slots {
        ws.tree[child].set_weight(Orientation::Horizontal, width);
        let child_rect =
            Rect::from_parts(x, rect.origin.y, width, rect.size.height).round();
        layout_node(ws, child, child_rect, child_rect, ctx, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::EngineConfig;
    use crate::layout_engine::systems::calculate_layout;
    use crate::model::workspace::ContainerLayout;
    use crate::sys::backend::Monitor;

    fn w(idx: u32) -> WindowId { WindowId::new(1, idx) }

    fn scroll_workspace(count: u32) -> (Workspace, EngineConfig) {
        let config = EngineConfig::default();
        let mut ws =
            Workspace::new(Monitor::new(Rect::from_parts(0.0, 0.0, 1000.0, 600.0)), &config);
        for idx in 1..=count {
            ws.add_window(w(idx));
        }
        let root = ws.root();
        ws.set_container_layout(root, ContainerLayout::Scroll);
        (ws, config)
    }

    fn rect_of(rects: &[(WindowId, Rect)], wid: WindowId) -> Rect {
        rects.iter().find(|(w, _)| *w == wid).unwrap().1
    }

    #[test]
    fn anchor_is_centered_with_ten_percent_peek() {
        let (mut ws, config) = scroll_workspace(3);
        ws.record_focus(w(2));
        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);

        let anchor = rect_of(&rects, w(2));
        assert_eq!(anchor, Rect::from_parts(100.0, 0.0, 800.0, 600.0));
        // Left neighbour ends where the anchor begins, right neighbour
        // starts at the anchor's right edge.
        let left = rect_of(&rects, w(1));
        assert_eq!(left.origin.x, 100.0 - left.size.width);
        assert_eq!(rect_of(&rects, w(3)).origin.x, 900.0);
    }

    #[test]
    fn single_child_takes_the_full_rect() {
        let (mut ws, config) = scroll_workspace(1);
        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rect_of(&rects, w(1)), Rect::from_parts(0.0, 0.0, 1000.0, 600.0));
    }

    #[test]
    fn two_children_leave_only_an_edge_visible() {
        let (mut ws, config) = scroll_workspace(2);
        ws.record_focus(w(1));
        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rect_of(&rects, w(1)), Rect::from_parts(100.0, 0.0, 800.0, 600.0));
        // The second window pokes in from the right with a 10% peek left.
        assert_eq!(rect_of(&rects, w(2)).origin.x, 900.0);
    }

    #[test]
    fn custom_widths_survive_relayout() {
        let (mut ws, config) = scroll_workspace(3);
        ws.record_focus(w(2));
        let ctx = LayoutContext { config: &config, manipulated: None };
        calculate_layout(&mut ws, &ctx);

        let anchor = ws.node_for(w(2)).unwrap();
        ws.tree[anchor].set_weight(Orientation::Horizontal, 500.0);
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rect_of(&rects, w(2)).size.width, 500.0);
        // Anchor position is unchanged; the right neighbour touches the
        // anchor's new right edge.
        assert_eq!(rect_of(&rects, w(2)).origin.x, 100.0);
        assert_eq!(rect_of(&rects, w(3)).origin.x, 600.0);
    }
}
