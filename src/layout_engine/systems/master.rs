//! Master/stack layout: the first child fills the master column, the rest
//! stack vertically beside it. The master share and side persist in the
//! container's layout state.

use serde::{Deserialize, Serialize};

use crate::layout_engine::systems::{LayoutContext, layout_node};
use crate::model::tree::NodeId;
use crate::model::window::WindowId;
use crate::model::workspace::Workspace;
use crate::sys::geometry::{Orientation, Rect};

pub const MASTER_PERCENT_MIN: f64 = 0.1;
pub const MASTER_PERCENT_MAX: f64 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasterState {
    percent: f64,
    pub side: MasterSide,
}

impl MasterState {
    pub fn new(percent: f64, side: MasterSide) -> MasterState {
        MasterState {
            percent: percent.clamp(MASTER_PERCENT_MIN, MASTER_PERCENT_MAX),
            side,
        }
    }

    pub fn percent(&self) -> f64 { self.percent }

    pub fn set_percent(&mut self, percent: f64) {
        self.percent = percent.clamp(MASTER_PERCENT_MIN, MASTER_PERCENT_MAX);
    }

    pub fn add_percent(&mut self, delta: f64) { self.set_percent(self.percent + delta); }
}

pub(crate) fn layout(
    ws: &mut Workspace,
    node: NodeId,
    state: MasterState,
    rect: Rect,
    ctx: &LayoutContext<'_>,
    out: &mut Vec<(WindowId, Rect)>,
) {
    let children: Vec<NodeId> = ws.tree.children(node).to_vec();
    let Some(&master) = children.first() else { return };
    if children.len() == 1 {
        layout_node(ws, master, rect, rect, ctx, out);
        return;
    }

    let gap_h = ctx.config.gaps.inner.horizontal;
    let gap_v = ctx.config.gaps.inner.vertical;
    let available = (rect.size.width - gap_h).max(0.0);
    let master_width = available * state.percent;
    let stack_width = available - master_width;
    let (master_x, stack_x) = match state.side {
        MasterSide::Left => (rect.origin.x, rect.origin.x + master_width + gap_h),
        MasterSide::Right => (rect.origin.x + stack_width + gap_h, rect.origin.x),
    };

    let master_rect =
        Rect::from_parts(master_x, rect.origin.y, master_width, rect.size.height).round();
    ws.tree[master].set_weight(Orientation::Horizontal, master_width);
    layout_node(ws, master, master_rect, master_rect, ctx, out);

    let stack = &children[1..];
    let total_gap = (stack.len() - 1) as f64 * gap_v;
    let row_height = ((rect.size.height - total_gap) / stack.len() as f64).max(0.0);
    let mut y = rect.origin.y;
    for &child in stack {
        let child_rect = Rect::from_parts(stack_x, y, stack_width, row_height).round();
        ws.tree[child].set_weight(Orientation::Horizontal, stack_width);
        layout_node(ws, child, child_rect, child_rect, ctx, out);
        y += row_height + gap_v;
    }
}
