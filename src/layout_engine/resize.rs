//! The resize driver: discrete resize commands dispatched by the target's
//! containing layout, and the pointer-driven path fed by backend resize
//! notifications.
//!
//! The pointer path is paced by a 16 ms debouncer and serialised through a
//! single in-flight apply task: each accepted event cancels the previous
//! task and awaits it before mutating anything, and the drag-end sequence
//! awaits the last task before the manipulated flag may clear.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::common::config::EngineConfig;
use crate::layout_engine::engine::{CommandError, Session};
use crate::layout_engine::systems::dwindle::{EdgeSign, ResizeEdges};
use crate::layout_engine::systems::master::MasterSide;
use crate::layout_engine::systems::{LayoutContext, calculate_layout};
use crate::layout_engine::utils::compute_tiling_area;
use crate::model::tree::NodeId;
use crate::model::window::WindowId;
use crate::model::workspace::{ContainerLayout, LayoutKind, Workspace};
use crate::sys::backend::WindowBackend;
use crate::sys::geometry::{Orientation, Rect};

/// Minimum spacing between accepted pointer events (a 60 Hz ceiling).
pub const POINTER_DEBOUNCE: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDimension {
    Width,
    Height,
    Smart,
    SmartOpposite,
}

/// `+n` adds, `-n` subtracts, a bare `n` sets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResizeAmount {
    Set(f64),
    Add(f64),
    Subtract(f64),
}

impl ResizeAmount {
    pub fn parse(raw: &str) -> Option<ResizeAmount> {
        let trimmed = raw.trim();
        if let Some(rest) = trimmed.strip_prefix('+') {
            Some(ResizeAmount::Add(rest.parse().ok()?))
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            Some(ResizeAmount::Subtract(rest.parse().ok()?))
        } else {
            Some(ResizeAmount::Set(trimmed.parse().ok()?))
        }
    }

    fn pixels(self) -> f64 {
        match self {
            ResizeAmount::Set(v) | ResizeAmount::Add(v) | ResizeAmount::Subtract(v) => v,
        }
    }

    fn grows(self) -> bool { !matches!(self, ResizeAmount::Subtract(_)) }
}

/// Applies a discrete resize command to the window's containing layout.
pub(crate) fn discrete_resize(
    ws: &mut Workspace,
    config: &EngineConfig,
    target: WindowId,
    dimension: ResizeDimension,
    amount: ResizeAmount,
) -> Result<(), CommandError> {
    if ws.is_floating(target) {
        return Err(CommandError::FloatingNotSupported);
    }
    let node = ws.node_for(target).ok_or(CommandError::NoWindowFocused)?;
    let Some(parent) = ws.tree().parent(node) else { return Ok(()) };
    let kind = ws.container_kind(parent).unwrap_or(LayoutKind::Tiles);
    match kind {
        LayoutKind::Dwindle => {
            let pixels = amount.pixels();
            let delta = match dimension {
                ResizeDimension::Width => (pixels, 0.0),
                ResizeDimension::Height => (0.0, pixels),
                ResizeDimension::Smart => (pixels, pixels),
                ResizeDimension::SmartOpposite => (pixels, -pixels),
            };
            if let Some(cache) = ws.dwindle_cache_mut(parent) {
                cache.resize(
                    target,
                    delta,
                    amount.grows(),
                    ResizeEdges::both_positive(),
                    config.mouse_sensitivity,
                    true,
                );
            }
            Ok(())
        }
        LayoutKind::Master => {
            if matches!(dimension, ResizeDimension::Height | ResizeDimension::SmartOpposite) {
                return Err(CommandError::MasterHeightUnsupported);
            }
            let available = master_available_width(ws, parent, config);
            if available <= 0.0 {
                return Ok(());
            }
            let Some(state) = ws.master_state_mut(parent) else { return Ok(()) };
            // A right-sided master's seam is controlled from the other
            // direction, so the pixel delta flips sign.
            let side_sign = match state.side {
                MasterSide::Left => 1.0,
                MasterSide::Right => -1.0,
            };
            match amount {
                ResizeAmount::Set(v) => state.set_percent(v / available),
                ResizeAmount::Add(px) => state.add_percent(side_sign * px / available),
                ResizeAmount::Subtract(px) => state.add_percent(side_sign * -px / available),
            }
            Ok(())
        }
        LayoutKind::Tiles | LayoutKind::Scroll | LayoutKind::Accordion => {
            let orientation = resolve_orientation(ws, parent, dimension);
            let Some((oriented_parent, oriented_node)) = ws.oriented_ancestor(node, orientation)
            else {
                return Ok(());
            };
            let current = ws.tree()[oriented_node].weight(orientation);
            let delta = match amount {
                ResizeAmount::Set(v) => v - current,
                ResizeAmount::Add(px) => px,
                ResizeAmount::Subtract(px) => -px,
            };
            apply_weight_delta(ws, oriented_parent, oriented_node, orientation, delta);
            Ok(())
        }
    }
}

fn resolve_orientation(
    ws: &Workspace,
    container: NodeId,
    dimension: ResizeDimension,
) -> Orientation {
    let own = ws
        .tree()
        .get(container)
        .and_then(|d| d.as_container())
        .map(|c| c.orientation)
        .unwrap_or(Orientation::Horizontal);
    match dimension {
        ResizeDimension::Width => Orientation::Horizontal,
        ResizeDimension::Height => Orientation::Vertical,
        ResizeDimension::Smart => own,
        ResizeDimension::SmartOpposite => own.perpendicular(),
    }
}

/// Adjusts the oriented node's weight; in a tiles container the delta is
/// taken from the siblings in equal shares so the sum stays put. Scroll
/// widths are absolute and never redistributed.
fn apply_weight_delta(
    ws: &mut Workspace,
    oriented_parent: NodeId,
    oriented_node: NodeId,
    orientation: Orientation,
    delta: f64,
) {
    let current = ws.tree()[oriented_node].weight(orientation);
    let new_weight = (current + delta).max(1.0);
    let applied = new_weight - current;
    ws.tree[oriented_node].set_weight(orientation, new_weight);
    trace!(?orientation, applied, "discrete weight change");

    let redistribute = !matches!(ws.container_kind(oriented_parent), Some(LayoutKind::Scroll));
    if redistribute {
        let siblings: Vec<NodeId> = ws
            .tree()
            .children(oriented_parent)
            .iter()
            .copied()
            .filter(|&c| c != oriented_node)
            .collect();
        if !siblings.is_empty() {
            let share = applied / siblings.len() as f64;
            for sibling in siblings {
                let weight = ws.tree()[sibling].weight(orientation);
                ws.tree[sibling].set_weight(orientation, (weight - share).max(1.0));
            }
        }
    }
}

/// The master/stack area width, recovered from the weights the last layout
/// pass recorded; falls back to the workspace rect before the first pass.
fn master_available_width(ws: &Workspace, container: NodeId, config: &EngineConfig) -> f64 {
    let children = ws.tree().children(container);
    let from_weights: f64 = children
        .iter()
        .take(2)
        .map(|&c| ws.tree()[c].weight(Orientation::Horizontal))
        .sum();
    if from_weights > 0.0 {
        return from_weights;
    }
    let tiling = compute_tiling_area(ws.monitor().visible_frame, &config.gaps);
    (tiling.size.width - config.gaps.inner.horizontal).max(0.0)
}

/// One edge of the window moved beyond the 1 px noise floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EdgeMovement {
    pub diff: f64,
    pub orientation: Orientation,
    pub sign: EdgeSign,
}

impl EdgeMovement {
    pub fn grows(&self) -> bool { self.diff > 0.0 }

    pub fn delta(&self) -> (f64, f64) {
        let signed = match self.sign {
            EdgeSign::Negative => -self.diff,
            EdgeSign::Positive => self.diff,
        };
        match self.orientation {
            Orientation::Horizontal => (signed, 0.0),
            Orientation::Vertical => (0.0, signed),
        }
    }

    pub fn edges(&self) -> ResizeEdges {
        match self.orientation {
            Orientation::Horizontal => ResizeEdges { horizontal: Some(self.sign), vertical: None },
            Orientation::Vertical => ResizeEdges { horizontal: None, vertical: Some(self.sign) },
        }
    }
}

/// Diffs the observed rect against the last applied one into the four edge
/// movements and picks the first over 1 px, in the fixed order
/// left, down, up, right.
pub(crate) fn edge_movement(last: Rect, current: Rect) -> Option<EdgeMovement> {
    let left = last.min().x - current.min().x;
    let right = current.max().x - last.max().x;
    let up = last.min().y - current.min().y;
    let down = current.max().y - last.max().y;
    for (diff, orientation, sign) in [
        (left, Orientation::Horizontal, EdgeSign::Negative),
        (down, Orientation::Vertical, EdgeSign::Positive),
        (up, Orientation::Vertical, EdgeSign::Negative),
        (right, Orientation::Horizontal, EdgeSign::Positive),
    ] {
        if diff.abs() > 1.0 {
            return Some(EdgeMovement { diff, orientation, sign });
        }
    }
    None
}

struct InflightTask {
    cancel: CancellationToken,
    done: oneshot::Receiver<()>,
}

/// Debounce and in-flight-task bookkeeping for the pointer path.
#[derive(Default)]
pub struct ResizeDriver {
    last_accepted: Option<Instant>,
    inflight: Option<InflightTask>,
}

impl ResizeDriver {
    pub fn new() -> ResizeDriver { ResizeDriver::default() }

    /// Accepts or drops a pointer event; at most one passes per 16 ms.
    fn accept_event(&mut self) -> bool {
        let now = Instant::now();
        match self.last_accepted {
            Some(prev) if now.duration_since(prev) < POINTER_DEBOUNCE => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    pub fn reset_debounce(&mut self) { self.last_accepted = None; }

    /// Cancels the in-flight apply task and awaits its completion.
    pub async fn settle(&mut self) {
        if let Some(task) = self.inflight.take() {
            task.cancel.cancel();
            let _ = task.done.await;
        }
    }

    /// Awaits the in-flight apply task without cancelling it.
    pub async fn await_inflight(&mut self) {
        if let Some(task) = self.inflight.take() {
            let _ = task.done.await;
        }
    }

    /// Spawns the apply task that pushes frames to the backend. The task
    /// checks for cancellation around every suspension point; backend
    /// failures are absorbed and repaired by the next refresh.
    fn spawn_apply<B: WindowBackend + Clone + 'static>(
        &mut self,
        backend: &B,
        frames: Vec<(WindowId, Rect)>,
    ) {
        let cancel = CancellationToken::new();
        let (done_tx, done_rx) = oneshot::channel();
        let token = cancel.clone();
        let backend = backend.clone();
        tokio::task::spawn_local(async move {
            for (wid, frame) in frames {
                if token.is_cancelled() {
                    break;
                }
                if let Err(err) = backend.set_frame(wid, frame).await {
                    debug!(?wid, %err, "backend refused frame during drag");
                }
                if token.is_cancelled() {
                    break;
                }
            }
            let _ = done_tx.send(());
        });
        self.inflight = Some(InflightTask { cancel, done: done_rx });
    }
}

/// Handles one backend window-resized notification during a pointer drag.
/// Returns whether the event was accepted.
pub(crate) async fn pointer_resize<B: WindowBackend + Clone + 'static>(
    ws: &mut Workspace,
    driver: &mut ResizeDriver,
    session: &mut Session,
    config: &EngineConfig,
    backend: &B,
    wid: WindowId,
    current: Rect,
) -> bool {
    if ws.is_floating(wid) {
        ws.note_floating_frame(wid, current);
        return false;
    }
    if session.manipulated.is_some_and(|m| m != wid) {
        return false;
    }
    let Some(node) = ws.node_for(wid) else { return false };
    let Some(parent) = ws.tree().parent(node) else { return false };
    let kind = ws.container_kind(parent).unwrap_or(LayoutKind::Tiles);
    if matches!(kind, LayoutKind::Master | LayoutKind::Accordion) {
        return false;
    }
    if !driver.accept_event() {
        trace!(?wid, "pointer event debounced");
        return false;
    }
    let Some(last) = ws.tree()[node].as_window().and_then(|w| w.last_applied_rect) else {
        return false;
    };
    let Some(movement) = edge_movement(last, current) else { return false };

    // Supersede the previous in-flight apply task before touching state.
    driver.settle().await;
    if ws.node_for(wid) != Some(node) {
        return false;
    }

    session.manipulated = Some(wid);
    if ws.tree[node].weight_before_resize.is_none() {
        let weights = ws.tree()[node].weights();
        ws.tree[node].weight_before_resize = Some(weights);
    }

    match kind {
        LayoutKind::Dwindle => {
            if let Some(cache) = ws.dwindle_cache_mut(parent) {
                cache.resize(
                    wid,
                    movement.delta(),
                    movement.grows(),
                    movement.edges(),
                    config.mouse_sensitivity,
                    true,
                );
            }
        }
        LayoutKind::Tiles | LayoutKind::Scroll => {
            if let Some((oriented_parent, oriented_node)) =
                ws.oriented_ancestor(node, movement.orientation)
            {
                apply_weight_delta(
                    ws,
                    oriented_parent,
                    oriented_node,
                    movement.orientation,
                    movement.diff,
                );
            }
        }
        LayoutKind::Master | LayoutKind::Accordion => {}
    }

    let ctx = LayoutContext { config, manipulated: session.manipulated };
    let frames: Vec<(WindowId, Rect)> = calculate_layout(ws, &ctx)
        .into_iter()
        .filter(|(w, _)| Some(*w) != session.manipulated)
        .collect();
    driver.spawn_apply(backend, frames);
    true
}

/// Drag-end sequence: await the in-flight task, clear the manipulated
/// flag, reset the debouncer, drop the weight memos and box snapshots.
/// The caller issues the refresh afterwards.
pub(crate) async fn end_pointer_drag(
    ws: &mut Workspace,
    driver: &mut ResizeDriver,
    session: &mut Session,
) {
    driver.await_inflight().await;
    session.manipulated = None;
    driver.reset_debounce();
    for node in ws.tree.descendants(ws.root()) {
        ws.tree[node].weight_before_resize = None;
        if let Some(container) = ws.tree[node].as_container_mut() {
            if let ContainerLayout::Dwindle(cache) = &mut container.layout {
                cache.clear_snapshots();
            }
        }
    }
}
