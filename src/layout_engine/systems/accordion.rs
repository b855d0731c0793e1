//! Accordion: every child gets the full rect minus padding peels, with
//! the peel counts chosen so the most recently focused child is the most
//! exposed one.

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
    let recent = ws.most_recent_child(node);
    let recent_index = recent
        .and_then(|child| children.iter().position(|&c| c == child))
        .unwrap_or(0);
    let padding = ctx.config.accordion_padding;

    for (i, &child) in children.iter().enumerate() {
        // First/last children only peel on their interior edge; the
        // neighbours of the most recent child double up on the side facing
        // it; everything else in between peels once on both sides.
        let lo_peels = if i == 0 {
            0
        } else if i == recent_index + 1 {
            2
        } else {
            1
        };
        let hi_peels = if i == count - 1 {
            0
        } else if i + 1 == recent_index {
            2
        } else {
            1
        };
        let position = rect.position(orientation) + lo_peels as f64 * padding;
        let extent = (rect.extent(orientation) - (lo_peels + hi_peels) as f64 * padding).max(0.0);
        let child_rect = rect.with_span(orientation, position, extent).round();
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

    fn accordion_workspace(count: u32) -> (Workspace, EngineConfig) {
        let config = EngineConfig::default();
        let mut ws =
            Workspace::new(Monitor::new(Rect::from_parts(0.0, 0.0, 1000.0, 600.0)), &config);
        for idx in 1..=count {
            ws.add_window(w(idx));
        }
        let root = ws.root();
        ws.set_container_layout(root, ContainerLayout::Accordion);
        (ws, config)
    }

    fn rect_of(rects: &[(WindowId, Rect)], wid: WindowId) -> Rect {
        rects.iter().find(|(w, _)| *w == wid).unwrap().1
    }

    #[test]
    fn single_child_takes_the_full_rect() {
        let (mut ws, config) = accordion_workspace(1);
        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rect_of(&rects, w(1)), Rect::from_parts(0.0, 0.0, 1000.0, 600.0));
    }

    #[test]
    fn middle_focus_peels_neighbours_double() {
        let (mut ws, config) = accordion_workspace(4);
        ws.record_focus(w(3));
        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);

        // recent index 2 with padding 30 on a 1000-wide rect:
        // child 0 (first): interior edge only.
        assert_eq!(rect_of(&rects, w(1)), Rect::from_parts(0.0, 0.0, 970.0, 600.0));
        // child 1: neighbour below the focus, double peel on the hi side.
        assert_eq!(rect_of(&rects, w(2)), Rect::from_parts(30.0, 0.0, 910.0, 600.0));
        // child 2 (the focus): single peel on both sides.
        assert_eq!(rect_of(&rects, w(3)), Rect::from_parts(30.0, 0.0, 940.0, 600.0));
        // child 3 (last, neighbour above): double peel on the lo side only.
        assert_eq!(rect_of(&rects, w(4)), Rect::from_parts(60.0, 0.0, 940.0, 600.0));
    }

    #[test]
    fn vertical_accordion_peels_top_and_bottom() {
        let (mut ws, config) = accordion_workspace(2);
        let root = ws.root();
        ws.set_container_orientation(root, Orientation::Vertical);
        ws.record_focus(w(1));
        let ctx = LayoutContext { config: &config, manipulated: None };
        let rects = calculate_layout(&mut ws, &ctx);
        assert_eq!(rect_of(&rects, w(1)), Rect::from_parts(0.0, 0.0, 1000.0, 570.0));
        assert_eq!(rect_of(&rects, w(2)), Rect::from_parts(0.0, 60.0, 1000.0, 540.0));
    }
}
