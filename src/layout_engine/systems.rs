//! Per-layout algorithms and the recursive dispatch over the workspace
//! tree. Every layout receives the container's assigned rect plus the
//! gap-free virtual rect, and recurses through [`layout_node`] for
//! container children.

pub mod accordion;
pub mod dwindle;
pub mod master;
pub mod scroll;
pub mod tiles;

use crate::common::config::EngineConfig;
use crate::layout_engine::utils::compute_tiling_area;
use crate::model::tree::NodeId;
use crate::model::window::WindowId;
use crate::model::workspace::{ContainerLayout, LayoutKind, NodeKind, Workspace};
use crate::sys::geometry::Rect;

use dwindle::DwindleCache;

#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub config: &'a EngineConfig,
    /// Window currently driven by the user's pointer, if any. While set,
    /// dwindle caches freeze their pre-drag frames and never rebuild.
    pub manipulated: Option<WindowId>,
}

/// Computes the target rect of every visible tiled window in the
/// workspace. Weights and per-window memos are updated as a side effect;
/// pushing the rects to the backend is the caller's business.
pub fn calculate_layout(ws: &mut Workspace, ctx: &LayoutContext<'_>) -> Vec<(WindowId, Rect)> {
    let screen = ws.monitor().visible_frame;
    let tiling = compute_tiling_area(screen, &ctx.config.gaps);
    let mut out = Vec::new();
    layout_node(ws, ws.root(), tiling, tiling, ctx, &mut out);
    for (wid, rect) in &mut out {
        if ws.is_fullscreen(*wid) {
            *rect = if ctx.config.no_outer_gaps_in_fullscreen { screen } else { tiling };
            if let Some(node) = ws.node_for(*wid) {
                if let Some(window) = ws.tree[node].as_window_mut() {
                    window.last_applied_rect = Some(*rect);
                }
            }
        }
    }
    out.retain(|(wid, _)| !ws.is_minimized(*wid) && !ws.is_app_hidden(wid.pid));
    out
}

pub(crate) fn layout_node(
    ws: &mut Workspace,
    node: NodeId,
    rect: Rect,
    virtual_rect: Rect,
    ctx: &LayoutContext<'_>,
    out: &mut Vec<(WindowId, Rect)>,
) {
    let (orientation, kind) = match &mut ws.tree[node].kind {
        NodeKind::Window(window) => {
            window.last_applied_rect = Some(rect);
            window.last_applied_virtual_rect = Some(virtual_rect);
            out.push((window.wid, rect));
            return;
        }
        NodeKind::Container(c) => (c.orientation, c.layout.kind()),
    };
    match kind {
        LayoutKind::Tiles => tiles::layout(ws, node, orientation, rect, ctx, out),
        LayoutKind::Accordion => accordion::layout(ws, node, orientation, rect, ctx, out),
        LayoutKind::Scroll => scroll::layout(ws, node, rect, ctx, out),
        LayoutKind::Master => {
            let state = match ws.tree[node].as_container().map(|c| &c.layout) {
                Some(ContainerLayout::Master(state)) => *state,
                _ => return,
            };
            master::layout(ws, node, state, rect, ctx, out);
        }
        LayoutKind::Dwindle => layout_dwindle(ws, node, rect, ctx, out),
    }
}

fn layout_dwindle(
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
        layout_node(ws, only, rect, rect, ctx, out);
        return;
    }

    let windows = ws.windows_under(node);
    let Some(container) = ws.tree[node].as_container_mut() else { return };
    // Take the cache out while it computes so the tree stays borrowable.
    let ContainerLayout::Dwindle(mut cache) =
        std::mem::replace(&mut container.layout, ContainerLayout::Dwindle(DwindleCache::default()))
    else {
        return;
    };
    cache.ensure(&windows, rect, ctx.config, ctx.manipulated);
    let rects = cache.layout(rect, &ctx.config.gaps, ctx.manipulated);
    if let Some(container) = ws.tree[node].as_container_mut() {
        container.layout = ContainerLayout::Dwindle(cache);
    }
    for (wid, leaf_rect) in rects {
        let leaf_rect = leaf_rect.round();
        if let Some(leaf) = ws.node_for(wid) {
            if let Some(window) = ws.tree[leaf].as_window_mut() {
                window.last_applied_rect = Some(leaf_rect);
                window.last_applied_virtual_rect = Some(leaf_rect);
            }
        }
        out.push((wid, leaf_rect));
    }
}
