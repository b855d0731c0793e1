//! The dwindle cache: a persistent binary tree of splits layered over the
//! flat window list of a dwindle container.
//!
//! The cache is authoritative for split ratios exactly while its recorded
//! window set matches the container's. It rebuilds lazily on the next
//! layout after the sets diverge, and never while a window is being
//! dragged. Every node remembers its last computed frame; during a
//! pointer-drag session the pre-drag frame is frozen in `snapshot` and
//! used as the divisor for ratio updates, which keeps the drag from
//! feeding its own effects back into the math.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::debug;

use crate::common::collections::{HashMap, HashSet};
use crate::common::config::{EngineConfig, GapSettings};
use crate::model::window::WindowId;
use crate::sys::geometry::{Orientation, Rect};

slotmap::new_key_type! { pub struct SplitNodeId; }

pub const RATIO_MIN: f64 = 0.1;
pub const RATIO_MAX: f64 = 1.9;

/// Distance from the workspace edge within which a node counts as
/// edge-constrained.
const EDGE_TOLERANCE: f64 = 10.0;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum SplitKind {
    Split {
        /// First-child share, as `ratio / (ratio + 1)`. 1.0 is an even split.
        ratio: f64,
        /// A vertical seam: children sit side by side.
        vertical: bool,
        first: SplitNodeId,
        second: SplitNodeId,
    },
    Leaf {
        window: WindowId,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SplitNode {
    parent: Option<SplitNodeId>,
    pub kind: SplitKind,
    /// Most recently computed rect for this subtree.
    pub frame: Rect,
    /// Pre-drag frame, present only during a pointer-drag session.
    pub snapshot: Option<Rect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeSign {
    Negative,
    Positive,
}

/// Which window edges a resize is controlled from, per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResizeEdges {
    pub horizontal: Option<EdgeSign>,
    pub vertical: Option<EdgeSign>,
}

impl ResizeEdges {
    pub fn both_positive() -> ResizeEdges {
        ResizeEdges {
            horizontal: Some(EdgeSign::Positive),
            vertical: Some(EdgeSign::Positive),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct DwindleCache {
    nodes: SlotMap<SplitNodeId, SplitNode>,
    root: Option<SplitNodeId>,
    leaves: HashMap<WindowId, SplitNodeId>,
}

impl DwindleCache {
    /// Whether the recorded window set matches the container's current set.
    pub fn is_fresh(&self, windows: &[WindowId]) -> bool {
        if self.leaves.len() != windows.len() {
            return false;
        }
        windows.iter().all(|w| self.leaves.contains_key(w))
    }

    pub fn recorded_windows(&self) -> HashSet<WindowId> {
        self.leaves.keys().copied().collect()
    }

    /// Rebuilds from the container's flat window list iff the recorded set
    /// diverged and no window is currently pointer-manipulated.
    pub fn ensure(
        &mut self,
        windows: &[WindowId],
        rect: Rect,
        config: &EngineConfig,
        manipulated: Option<WindowId>,
    ) {
        if self.is_fresh(windows) || manipulated.is_some() {
            return;
        }
        debug!(count = windows.len(), "rebuilding dwindle cache");
        self.nodes.clear();
        self.leaves.clear();
        self.root = (!windows.is_empty()).then(|| self.build(windows, rect, config));
    }

    fn build(&mut self, windows: &[WindowId], rect: Rect, config: &EngineConfig) -> SplitNodeId {
        if let [window] = windows {
            let id = self.nodes.insert(SplitNode {
                parent: None,
                kind: SplitKind::Leaf { window: *window },
                frame: rect,
                snapshot: None,
            });
            self.leaves.insert(*window, id);
            return id;
        }
        let mid = windows.len() / 2;
        let ratio = config.dwindle_default_split_ratio.clamp(RATIO_MIN, RATIO_MAX);
        let vertical = split_vertically(rect, config.split_width_multiplier);
        let (r1, r2) = split_rects(rect, vertical, ratio, &config.gaps);
        let first = self.build(&windows[..mid.max(1)], r1, config);
        let second = self.build(&windows[mid.max(1)..], r2, config);
        let id = self.nodes.insert(SplitNode {
            parent: None,
            kind: SplitKind::Split { ratio, vertical, first, second },
            frame: rect,
            snapshot: None,
        });
        self.nodes[first].parent = Some(id);
        self.nodes[second].parent = Some(id);
        id
    }

    /// Recomputes every node's frame for the given container rect and
    /// returns the leaf rects. While a drag is in progress the pre-drag
    /// frames are frozen into snapshots instead of being discarded.
    pub fn layout(
        &mut self,
        rect: Rect,
        gaps: &GapSettings,
        manipulated: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.layout_rec(root, rect, gaps, manipulated.is_some(), &mut out);
        }
        out
    }

    fn layout_rec(
        &mut self,
        node: SplitNodeId,
        rect: Rect,
        gaps: &GapSettings,
        dragging: bool,
        out: &mut Vec<(WindowId, Rect)>,
    ) {
        let entry = &mut self.nodes[node];
        if !dragging {
            entry.frame = rect;
            entry.snapshot = None;
        } else if entry.snapshot.is_none() {
            entry.snapshot = Some(entry.frame);
            entry.frame = rect;
        } else {
            entry.frame = rect;
        }
        match entry.kind.clone() {
            SplitKind::Leaf { window } => out.push((window, rect)),
            SplitKind::Split { ratio, vertical, first, second } => {
                let (r1, r2) = split_rects(rect, vertical, ratio, gaps);
                self.layout_rec(first, r1, gaps, dragging, out);
                self.layout_rec(second, r2, gaps, dragging, out);
            }
        }
    }

    /// Applies a resize to the splits controlling `wid`.
    ///
    /// Smart mode first drops any axis the node is constrained on at both
    /// workspace edges, then adjusts the outer controlling split and the
    /// inner (opposite-side) compensation split per axis. Standard mode
    /// touches only the outer split.
    pub fn resize(
        &mut self,
        wid: WindowId,
        delta: (f64, f64),
        should_grow: bool,
        edges: ResizeEdges,
        sensitivity: f64,
        smart: bool,
    ) {
        let Some(&node) = self.leaves.get(&wid) else { return };
        let Some(root) = self.root else { return };
        let (mut dx, mut dy) = delta;
        if edges.horizontal.is_none() {
            dx = 0.0;
        }
        if edges.vertical.is_none() {
            dy = 0.0;
        }
        if smart {
            let frame = self.nodes[node].frame;
            let bounds = self.nodes[root].snapshot.unwrap_or(self.nodes[root].frame);
            let near = |a: f64, b: f64| (a - b).abs() < EDGE_TOLERANCE;
            if near(frame.min().x, bounds.min().x) && near(frame.max().x, bounds.max().x) {
                dx = 0.0;
            }
            if near(frame.min().y, bounds.min().y) && near(frame.max().y, bounds.max().y) {
                dy = 0.0;
            }
        }
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for (pixels, orientation, sign) in [
            (dx, Orientation::Horizontal, edges.horizontal),
            (dy, Orientation::Vertical, edges.vertical),
        ] {
            if pixels == 0.0 {
                continue;
            }
            let Some(sign) = sign else { continue };
            let from_first = sign == EdgeSign::Positive;
            let outer = self.controlling_split(node, orientation, from_first);
            if let Some((split, is_first)) = outer {
                self.apply_ratio_delta(split, is_first, orientation, pixels, should_grow, sensitivity);
            }
            if smart {
                if let Some((split, is_first)) = self.controlling_split(node, orientation, !from_first)
                {
                    self.apply_ratio_delta(
                        split,
                        is_first,
                        orientation,
                        pixels,
                        should_grow,
                        sensitivity,
                    );
                }
            }
        }
    }

    /// Nearest ancestor split along `orientation` where the walked subtree
    /// sits on the wanted side. Returns the split and whether the subtree
    /// is its first child.
    fn controlling_split(
        &self,
        node: SplitNodeId,
        orientation: Orientation,
        want_first: bool,
    ) -> Option<(SplitNodeId, bool)> {
        let mut child = node;
        while let Some(parent) = self.nodes[child].parent {
            if let SplitKind::Split { vertical, first, .. } = self.nodes[parent].kind {
                let matches_axis = vertical == (orientation == Orientation::Horizontal);
                let is_first = first == child;
                if matches_axis && is_first == want_first {
                    return Some((parent, is_first));
                }
            }
            child = parent;
        }
        None
    }

    fn apply_ratio_delta(
        &mut self,
        split: SplitNodeId,
        subtree_is_first: bool,
        orientation: Orientation,
        pixels: f64,
        should_grow: bool,
        sensitivity: f64,
    ) {
        let container = &self.nodes[split];
        let container_size = container.snapshot.unwrap_or(container.frame).extent(orientation);
        if container_size <= 0.0 {
            return;
        }
        let orientation_sign = if subtree_is_first { 1.0 } else { -1.0 };
        let growth_sign = if should_grow { 1.0 } else { -1.0 };
        let delta = orientation_sign * growth_sign * (pixels.abs() * sensitivity) / container_size;
        if let SplitKind::Split { ratio, .. } = &mut self.nodes[split].kind {
            *ratio = (*ratio + delta).clamp(RATIO_MIN, RATIO_MAX);
        }
    }

    /// Resets every split to the default ratio.
    pub fn balance(&mut self, default_ratio: f64) {
        let default_ratio = default_ratio.clamp(RATIO_MIN, RATIO_MAX);
        for node in self.nodes.values_mut() {
            if let SplitKind::Split { ratio, .. } = &mut node.kind {
                *ratio = default_ratio;
            }
        }
    }

    pub fn clear_snapshots(&mut self) {
        for node in self.nodes.values_mut() {
            node.snapshot = None;
        }
    }

    pub fn has_snapshots(&self) -> bool {
        self.nodes.values().any(|n| n.snapshot.is_some())
    }

    pub fn leaf_frame(&self, wid: WindowId) -> Option<Rect> {
        self.leaves.get(&wid).map(|&id| self.nodes[id].frame)
    }

    /// Overwrites a leaf's frame with geometry read back from the backend.
    pub fn set_leaf_frame(&mut self, wid: WindowId, frame: Rect) {
        if let Some(&id) = self.leaves.get(&wid) {
            self.nodes[id].frame = frame;
        }
    }

    pub fn leaf_frames(&self) -> impl Iterator<Item = (WindowId, Rect)> + '_ {
        self.leaves.iter().map(|(&wid, &id)| (wid, self.nodes[id].frame))
    }

    pub fn split_ratios(&self) -> Vec<f64> {
        self.nodes
            .values()
            .filter_map(|n| match n.kind {
                SplitKind::Split { ratio, .. } => Some(ratio),
                SplitKind::Leaf { .. } => None,
            })
            .collect()
    }
}

fn split_vertically(rect: Rect, split_width_multiplier: f64) -> bool {
    let aspect = if rect.size.height > 0.0 {
        rect.size.width / rect.size.height
    } else {
        f64::INFINITY
    };
    aspect / split_width_multiplier >= 1.0
}

/// Seam-aware split: each side gets its share of the extent minus the gap.
fn split_rects(rect: Rect, vertical: bool, ratio: f64, gaps: &GapSettings) -> (Rect, Rect) {
    let orientation = if vertical { Orientation::Horizontal } else { Orientation::Vertical };
    let gap = gaps.inner.along(orientation);
    let extent = (rect.extent(orientation) - gap).max(0.0);
    let first = extent * ratio / (ratio + 1.0);
    let second = extent - first;
    let position = rect.position(orientation);
    (
        rect.with_span(orientation, position, first),
        rect.with_span(orientation, position + first + gap, second),
    )
}
