//! Spatial focus navigation. Weighted layouts walk the tree; dwindle
//! trusts actual window geometry (windows may have been moved outside the
//! layout system), so it re-reads frames from the backend and picks the
//! edge-adjacent candidate with the largest perpendicular overlap.

use tracing::debug;

use crate::layout_engine::systems::dwindle::DwindleCache;
use crate::model::tree::NodeId;
use crate::model::window::WindowId;
use crate::model::workspace::{LayoutKind, NodeKind, Workspace};
use crate::sys::backend::WindowBackend;
use crate::sys::geometry::{Direction, Rect};

/// Extra slack on top of the inner gap when deciding edge adjacency.
const EDGE_TOUCH_SLACK: f64 = 5.0;

/// Minimum perpendicular overlap, as a share of the smaller extent, for a
/// candidate to count as a neighbour rather than a diagonal.
const MIN_OVERLAP_SHARE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationProvider {
    Tree,
    Geometric,
}

pub fn provider_for(kind: LayoutKind) -> Option<NavigationProvider> {
    match kind {
        LayoutKind::Tiles | LayoutKind::Master | LayoutKind::Scroll => {
            Some(NavigationProvider::Tree)
        }
        LayoutKind::Dwindle => Some(NavigationProvider::Geometric),
        LayoutKind::Accordion => None,
    }
}

/// Walks up to the nearest ancestor with a sibling in `direction`, then
/// enters that sibling at the face the move came from.
pub fn tree_neighbor(ws: &Workspace, from: WindowId, direction: Direction) -> Option<WindowId> {
    let node = ws.node_for(from)?;
    let (parent, index) = ws.closest_parent(node, direction, None)?;
    let siblings = ws.tree().children(parent);
    let target = if direction.is_positive() {
        *siblings.get(index + 1)?
    } else {
        *siblings.get(index.checked_sub(1)?)?
    };
    enter_from(ws, target, direction)
}

/// Descends into a neighbour subtree: along the movement axis the nearest
/// child is taken (entering from the right snaps to the leftmost leaf);
/// across it, the most recently focused child.
fn enter_from(ws: &Workspace, mut node: NodeId, direction: Direction) -> Option<WindowId> {
    loop {
        match &ws.tree()[node].kind {
            NodeKind::Window(window) => return Some(window.wid),
            NodeKind::Container(container) => {
                let children = ws.tree().children(node);
                let next = if container.orientation == direction.orientation() {
                    if direction.is_positive() {
                        children.first().copied()
                    } else {
                        children.last().copied()
                    }
                } else {
                    ws.most_recent_child(node)
                };
                node = next?;
            }
        }
    }
}

/// Reads every cached leaf's frame back from the backend. Failures are
/// absorbed; the stale cached frame keeps being used.
pub async fn sync_geometry<B: WindowBackend>(
    backend: &B,
    windows: &[WindowId],
) -> Vec<(WindowId, Rect)> {
    let mut frames = Vec::with_capacity(windows.len());
    for &wid in windows {
        match backend.get_rect(wid).await {
            Ok(frame) => frames.push((wid, frame)),
            Err(err) => debug!(?wid, %err, "skipping stale window during geometry sync"),
        }
    }
    frames
}

/// Picks the neighbour among the cache's leaves: edge-adjacent along the
/// direction, overlapping enough on the perpendicular axis, ranked by
/// overlap length.
pub fn geometric_neighbor(
    cache: &DwindleCache,
    from: WindowId,
    direction: Direction,
    inner_gap: f64,
) -> Option<WindowId> {
    let source = cache.leaf_frame(from)?;
    let source_face = source.face(direction);
    let perpendicular = direction.orientation().perpendicular();
    let mut best: Option<(WindowId, f64)> = None;
    for (wid, frame) in cache.leaf_frames() {
        if wid == from {
            continue;
        }
        let candidate_face = frame.face(direction.opposite());
        if (source_face - candidate_face).abs() >= inner_gap + EDGE_TOUCH_SLACK {
            continue;
        }
        let overlap = source.overlap(frame, perpendicular);
        let min_extent = source.extent(perpendicular).min(frame.extent(perpendicular));
        if overlap < MIN_OVERLAP_SHARE * min_extent {
            continue;
        }
        if best.map(|(_, len)| overlap > len).unwrap_or(true) {
            best = Some((wid, overlap));
        }
    }
    best.map(|(wid, _)| wid)
}
