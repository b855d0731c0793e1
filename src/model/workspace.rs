//! The workspace tree: one root tiling container per workspace, plus the
//! auxiliary buckets (floating, minimized, fullscreen, popups, hidden apps).
//!
//! Containers own their children exclusively; windows are leaves. Per-layout
//! caches live inside the container's [`ContainerLayout`] value, so a cache
//! cannot outlive a layout change away from its kind.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::collections::{HashMap, HashSet};
use crate::common::config::EngineConfig;
use crate::layout_engine::systems::dwindle::DwindleCache;
use crate::layout_engine::systems::master::{MasterSide, MasterState};
use crate::model::tree::{BindingToken, Forest, NodeId};
use crate::model::window::{WindowData, WindowId, pid_t};
use crate::sys::backend::Monitor;
use crate::sys::geometry::{Direction, Orientation, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Tiles,
    Accordion,
    Dwindle,
    Scroll,
    Master,
}

/// A container's layout, together with the layout's persistent state where
/// it has any.
#[derive(Debug, Serialize, Deserialize)]
pub enum ContainerLayout {
    Tiles,
    Accordion,
    Scroll,
    Dwindle(DwindleCache),
    Master(MasterState),
}

impl ContainerLayout {
    pub fn kind(&self) -> LayoutKind {
        match self {
            ContainerLayout::Tiles => LayoutKind::Tiles,
            ContainerLayout::Accordion => LayoutKind::Accordion,
            ContainerLayout::Scroll => LayoutKind::Scroll,
            ContainerLayout::Dwindle(_) => LayoutKind::Dwindle,
            ContainerLayout::Master(_) => LayoutKind::Master,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Container {
    pub orientation: Orientation,
    pub layout: ContainerLayout,
    /// The child most recently on the focus path through this container.
    most_recent: Option<NodeId>,
}

impl Container {
    pub fn new(orientation: Orientation, layout: ContainerLayout) -> Container {
        Container { orientation, layout, most_recent: None }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum NodeKind {
    Container(Container),
    Window(WindowData),
}

/// Payload of every tree node: the per-axis adaptive weights plus the
/// container/window specifics.
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeData {
    weight_h: f64,
    weight_v: f64,
    /// Weights captured when a pointer drag first touched this node;
    /// cleared when the drag ends.
    pub weight_before_resize: Option<(f64, f64)>,
    pub kind: NodeKind,
}

impl NodeData {
    pub fn container(orientation: Orientation, layout: ContainerLayout) -> NodeData {
        NodeData {
            weight_h: 0.0,
            weight_v: 0.0,
            weight_before_resize: None,
            kind: NodeKind::Container(Container::new(orientation, layout)),
        }
    }

    pub fn window(wid: WindowId) -> NodeData {
        NodeData {
            weight_h: 0.0,
            weight_v: 0.0,
            weight_before_resize: None,
            kind: NodeKind::Window(WindowData::new(wid)),
        }
    }

    pub fn weight(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.weight_h,
            Orientation::Vertical => self.weight_v,
        }
    }

    pub fn set_weight(&mut self, orientation: Orientation, value: f64) {
        match orientation {
            Orientation::Horizontal => self.weight_h = value,
            Orientation::Vertical => self.weight_v = value,
        }
    }

    pub fn weights(&self) -> (f64, f64) { (self.weight_h, self.weight_v) }

    pub fn set_weights(&mut self, weights: (f64, f64)) {
        self.weight_h = weights.0;
        self.weight_v = weights.1;
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            NodeKind::Container(c) => Some(c),
            NodeKind::Window(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            NodeKind::Container(c) => Some(c),
            NodeKind::Window(_) => None,
        }
    }

    pub fn as_window(&self) -> Option<&WindowData> {
        match &self.kind {
            NodeKind::Window(w) => Some(w),
            NodeKind::Container(_) => None,
        }
    }

    pub fn as_window_mut(&mut self) -> Option<&mut WindowData> {
        match &mut self.kind {
            NodeKind::Window(w) => Some(w),
            NodeKind::Container(_) => None,
        }
    }

    pub fn window_id(&self) -> Option<WindowId> { self.as_window().map(|w| w.wid) }
}

/// A full binding of a node: where it was attached and with what weights.
#[derive(Clone, Copy, Debug)]
pub struct Binding {
    pub parent: NodeId,
    pub index: usize,
    pub weights: (f64, f64),
}

#[derive(Serialize, Deserialize)]
pub struct Workspace {
    pub(crate) tree: Forest<NodeData>,
    root: NodeId,
    monitor: Monitor,
    window_nodes: HashMap<WindowId, NodeId>,
    floating: HashMap<WindowId, WindowData>,
    minimized: Vec<WindowId>,
    fullscreen: HashSet<WindowId>,
    popups: Vec<WindowId>,
    hidden_apps: HashSet<pid_t>,
}

impl Workspace {
    pub fn new(monitor: Monitor, config: &EngineConfig) -> Workspace {
        let orientation = config.default_root_container_orientation.resolve(
            monitor.visible_frame.size.width,
            monitor.visible_frame.size.height,
        );
        let layout = default_container_layout(config);
        let mut tree = Forest::new();
        let root = tree.insert_root(NodeData::container(orientation, layout));
        Workspace {
            tree,
            root,
            monitor,
            window_nodes: HashMap::default(),
            floating: HashMap::default(),
            minimized: Vec::new(),
            fullscreen: HashSet::default(),
            popups: Vec::new(),
            hidden_apps: HashSet::default(),
        }
    }

    pub fn root(&self) -> NodeId { self.root }

    pub fn monitor(&self) -> Monitor { self.monitor }

    pub fn tree(&self) -> &Forest<NodeData> { &self.tree }

    pub fn node_for(&self, wid: WindowId) -> Option<NodeId> {
        self.window_nodes.get(&wid).copied()
    }

    pub fn window_at(&self, node: NodeId) -> Option<WindowId> {
        self.tree.get(node).and_then(|data| data.window_id())
    }

    pub fn contains(&self, wid: WindowId) -> bool {
        self.window_nodes.contains_key(&wid) || self.floating.contains_key(&wid)
    }

    pub fn is_floating(&self, wid: WindowId) -> bool { self.floating.contains_key(&wid) }

    pub fn is_fullscreen(&self, wid: WindowId) -> bool { self.fullscreen.contains(&wid) }

    pub fn floating_windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.floating.keys().copied()
    }

    /// All window leaves under `node`, in tree order.
    pub fn windows_under(&self, node: NodeId) -> Vec<WindowId> {
        self.tree
            .descendants(node)
            .into_iter()
            .filter_map(|n| self.window_at(n))
            .collect()
    }

    pub fn all_tiled_windows(&self) -> Vec<WindowId> { self.windows_under(self.root) }

    /// The container a new window should join: the deepest container on the
    /// focus path from the root.
    fn insertion_container(&self) -> NodeId {
        let mut node = self.root;
        loop {
            let Some(container) = self.tree[node].as_container() else {
                return self.tree.parent(node).unwrap_or(self.root);
            };
            let Some(next) = container
                .most_recent
                .filter(|&child| self.tree.parent(child) == Some(node))
            else {
                return node;
            };
            node = next;
        }
    }

    /// Inserts a window into the tree next to the most recent child of the
    /// focused container. The new leaf receives the average weight of its
    /// siblings on both axes.
    pub fn add_window(&mut self, wid: WindowId) -> NodeId {
        if let Some(&existing) = self.window_nodes.get(&wid) {
            return existing;
        }
        let parent = self.insertion_container();
        let index = self.tree[parent]
            .as_container()
            .and_then(|c| c.most_recent)
            .and_then(|child| self.tree.index_in_parent(child))
            .map(|i| i + 1)
            .unwrap_or_else(|| self.tree.child_count(parent));
        let siblings: Vec<NodeId> = self.tree.children(parent).to_vec();
        let node = self.tree.insert_child_at(parent, index, NodeData::window(wid));
        let weights = self.average_weights(&siblings);
        self.tree[node].set_weights(weights);
        self.window_nodes.insert(wid, node);
        debug!(?wid, "window added to tree");
        node
    }

    fn average_weights(&self, siblings: &[NodeId]) -> (f64, f64) {
        if siblings.is_empty() {
            return (0.0, 0.0);
        }
        let count = siblings.len() as f64;
        let (mut h, mut v) = (0.0, 0.0);
        for &sibling in siblings {
            let (sh, sv) = self.tree[sibling].weights();
            h += sh;
            v += sv;
        }
        (h / count, v / count)
    }

    /// Unbinds the window's leaf from the tree in the same event that
    /// reported its disappearance.
    pub fn remove_window(&mut self, wid: WindowId) {
        if let Some(node) = self.window_nodes.remove(&wid) {
            let parent = self.tree.parent(node);
            self.clear_most_recent_references(node);
            self.tree.remove(node);
            if let Some(parent) = parent {
                self.remove_empty_containers_upward(parent);
            }
        }
        self.floating.remove(&wid);
        self.fullscreen.remove(&wid);
        self.minimized.retain(|&w| w != wid);
        self.popups.retain(|&w| w != wid);
    }

    fn clear_most_recent_references(&mut self, node: NodeId) {
        if let Some(parent) = self.tree.parent(node) {
            if let Some(container) = self.tree[parent].as_container_mut() {
                if container.most_recent == Some(node) {
                    container.most_recent = None;
                }
            }
        }
    }

    fn remove_empty_containers_upward(&mut self, mut node: NodeId) {
        while node != self.root
            && self.tree[node].as_container().is_some()
            && self.tree.child_count(node) == 0
        {
            let Some(parent) = self.tree.parent(node) else { break };
            self.clear_most_recent_references(node);
            self.tree.remove(node);
            node = parent;
        }
    }

    /// Detaches a node, returning everything needed to restore it.
    pub fn unbind(&mut self, node: NodeId) -> Option<Binding> {
        let weights = self.tree.get(node)?.weights();
        self.clear_most_recent_references(node);
        let BindingToken { parent, index } = self.tree.unbind(node)?;
        Some(Binding { parent, index, weights })
    }

    /// Binds a detached node into a slot, assigning the slot's weights.
    pub fn bind(&mut self, node: NodeId, binding: Binding) {
        self.tree.bind(node, binding.parent, binding.index);
        self.tree[node].set_weights(binding.weights);
    }

    /// Exchanges two windows' slots. Indices and adaptive weights stay with
    /// the slots, not the windows.
    pub fn swap_windows(&mut self, a: WindowId, b: WindowId) -> bool {
        let (Some(node_a), Some(node_b)) = (self.node_for(a), self.node_for(b)) else {
            return false;
        };
        self.swap_nodes(node_a, node_b)
    }

    /// Exchanges two nodes' slots. Indices and adaptive weights stay with
    /// the slots, not the nodes.
    pub fn swap_nodes(&mut self, node_a: NodeId, node_b: NodeId) -> bool {
        if node_a == node_b
            || self.tree.is_descendant(node_a, node_b)
            || self.tree.is_descendant(node_b, node_a)
        {
            return false;
        }
        let slot_a = Binding {
            parent: self.tree.parent(node_a).unwrap_or(self.root),
            index: self.tree.index_in_parent(node_a).unwrap_or(0),
            weights: self.tree[node_a].weights(),
        };
        let slot_b = Binding {
            parent: self.tree.parent(node_b).unwrap_or(self.root),
            index: self.tree.index_in_parent(node_b).unwrap_or(0),
            weights: self.tree[node_b].weights(),
        };
        self.tree.unbind(node_a);
        self.tree.unbind(node_b);
        let (first, first_slot, second, second_slot) = if slot_b.index <= slot_a.index {
            (node_a, slot_b, node_b, slot_a)
        } else {
            (node_b, slot_a, node_a, slot_b)
        };
        self.bind(first, first_slot);
        self.bind(second, second_slot);
        true
    }

    /// Marks the path from the root to `wid` as most recent.
    pub fn record_focus(&mut self, wid: WindowId) {
        let Some(node) = self.node_for(wid) else { return };
        let mut child = node;
        while let Some(parent) = self.tree.parent(child) {
            if let Some(container) = self.tree[parent].as_container_mut() {
                container.most_recent = Some(child);
            }
            child = parent;
        }
    }

    /// The container's most recently focused child, falling back to the
    /// first child.
    pub fn most_recent_child(&self, container: NodeId) -> Option<NodeId> {
        let recent = self.tree[container]
            .as_container()
            .and_then(|c| c.most_recent)
            .filter(|&child| self.tree.parent(child) == Some(container));
        recent.or_else(|| self.tree.children(container).first().copied())
    }

    /// Walks up from `node` until a container matches the direction's axis
    /// and the child on the walked path has a sibling in that direction.
    /// Returns the container and the child's own index.
    pub fn closest_parent(
        &self,
        node: NodeId,
        direction: Direction,
        layout: Option<LayoutKind>,
    ) -> Option<(NodeId, usize)> {
        let mut child = node;
        while let Some(parent) = self.tree.parent(child) {
            if let Some(container) = self.tree[parent].as_container() {
                let index = self.tree.index_in_parent(child)?;
                let orientation_matches = container.orientation == direction.orientation();
                let layout_matches =
                    layout.map(|kind| container.layout.kind() == kind).unwrap_or(true);
                let has_sibling = if direction.is_positive() {
                    index + 1 < self.tree.child_count(parent)
                } else {
                    index > 0
                };
                if orientation_matches && layout_matches && has_sibling {
                    return Some((parent, index));
                }
            }
            child = parent;
        }
        None
    }

    /// Nearest ancestor container (via the walked child) whose orientation
    /// matches, regardless of sibling availability.
    pub fn oriented_ancestor(
        &self,
        node: NodeId,
        orientation: Orientation,
    ) -> Option<(NodeId, NodeId)> {
        let mut child = node;
        while let Some(parent) = self.tree.parent(child) {
            if let Some(container) = self.tree[parent].as_container() {
                if container.orientation == orientation {
                    return Some((parent, child));
                }
            }
            child = parent;
        }
        None
    }

    /// Replaces a container's layout. A scroll container is forced to
    /// horizontal orientation; switching away from dwindle/master drops the
    /// old cache with the old layout value.
    pub fn set_container_layout(&mut self, container: NodeId, layout: ContainerLayout) {
        let Some(c) = self.tree[container].as_container_mut() else { return };
        if matches!(layout, ContainerLayout::Scroll) {
            c.orientation = Orientation::Horizontal;
        }
        c.layout = layout;
    }

    pub fn set_container_orientation(&mut self, container: NodeId, orientation: Orientation) {
        let Some(c) = self.tree[container].as_container_mut() else { return };
        if matches!(c.layout, ContainerLayout::Scroll) {
            return;
        }
        c.orientation = orientation;
    }

    pub fn container_kind(&self, node: NodeId) -> Option<LayoutKind> {
        self.tree.get(node).and_then(|d| d.as_container()).map(|c| c.layout.kind())
    }

    pub fn dwindle_cache_mut(&mut self, container: NodeId) -> Option<&mut DwindleCache> {
        match &mut self.tree.get_mut(container)?.as_container_mut()?.layout {
            ContainerLayout::Dwindle(cache) => Some(cache),
            _ => None,
        }
    }

    pub fn master_state_mut(&mut self, container: NodeId) -> Option<&mut MasterState> {
        match &mut self.tree.get_mut(container)?.as_container_mut()?.layout {
            ContainerLayout::Master(state) => Some(state),
            _ => None,
        }
    }

    /// Normalisation pass, run after structural edits:
    /// empty containers are removed, single-child non-root containers are
    /// flattened into their parent, and nested same-orientation containers
    /// are flipped. Both latter passes are config-gated.
    pub fn normalize(&mut self, config: &EngineConfig) {
        let nodes = self.tree.descendants(self.root);
        for node in nodes.into_iter().rev() {
            if !self.tree.contains(node) || node == self.root {
                continue;
            }
            if self.tree[node].as_container().is_none() {
                continue;
            }
            if self.tree.child_count(node) == 0 {
                self.clear_most_recent_references(node);
                self.tree.remove(node);
            } else if config.flatten_single_child_containers && self.tree.child_count(node) == 1 {
                self.flatten_container(node);
            }
        }
        if config.alternate_nested_orientation {
            for node in self.tree.descendants(self.root) {
                if node == self.root {
                    continue;
                }
                let Some(parent) = self.tree.parent(node) else { continue };
                let Some(parent_orientation) =
                    self.tree[parent].as_container().map(|c| c.orientation)
                else {
                    continue;
                };
                if let Some(container) = self.tree[node].as_container_mut() {
                    if container.orientation == parent_orientation
                        && !matches!(container.layout, ContainerLayout::Scroll)
                    {
                        container.orientation = parent_orientation.perpendicular();
                    }
                }
            }
        }
    }

    /// Dissolves a single-child container, moving the child into the
    /// container's slot with the container's weights.
    fn flatten_container(&mut self, container: NodeId) {
        let Some(&child) = self.tree.children(container).first() else { return };
        let Some(parent) = self.tree.parent(container) else { return };
        let was_recent =
            self.tree[parent].as_container().and_then(|c| c.most_recent) == Some(container);
        let Some(slot) = self.unbind(container) else { return };
        self.tree.unbind(child);
        self.bind(child, slot);
        if was_recent {
            if let Some(parent_container) = self.tree[parent].as_container_mut() {
                parent_container.most_recent = Some(child);
            }
        }
        self.tree.remove(container);
    }

    /// Moves a window between the tiling tree and the floating bucket.
    /// Returns true if the window is now floating.
    pub fn toggle_floating(&mut self, wid: WindowId) -> Option<bool> {
        if let Some(mut data) = self.floating.remove(&wid) {
            let node = self.add_window(wid);
            let restored = data.floating_size.take();
            if let Some(window) = self.tree[node].as_window_mut() {
                window.floating_size = restored;
            }
            Some(false)
        } else if let Some(node) = self.node_for(wid) {
            let mut data = match &self.tree[node].kind {
                NodeKind::Window(w) => w.clone(),
                NodeKind::Container(_) => return None,
            };
            // Restore the size it last floated at, or start from its
            // current tiled size.
            data.floating_size = data.floating_size.or(data.last_applied_rect.map(|r| r.size));
            self.remove_window(wid);
            self.floating.insert(wid, data);
            Some(true)
        } else {
            None
        }
    }

    pub fn toggle_fullscreen(&mut self, wid: WindowId) -> bool {
        let now_fullscreen = if self.fullscreen.remove(&wid) {
            false
        } else {
            self.fullscreen.insert(wid);
            true
        };
        if let Some(node) = self.node_for(wid) {
            if let Some(window) = self.tree[node].as_window_mut() {
                window.fullscreen = now_fullscreen;
            }
        }
        now_fullscreen
    }

    pub fn set_minimized(&mut self, wid: WindowId, minimized: bool) {
        self.minimized.retain(|&w| w != wid);
        if minimized {
            self.minimized.push(wid);
        }
    }

    pub fn is_minimized(&self, wid: WindowId) -> bool { self.minimized.contains(&wid) }

    /// Popups are tracked but never tiled.
    pub fn set_popup(&mut self, wid: WindowId, popup: bool) {
        self.popups.retain(|&w| w != wid);
        if popup {
            self.popups.push(wid);
        }
    }

    pub fn is_popup(&self, wid: WindowId) -> bool { self.popups.contains(&wid) }

    pub fn set_app_hidden(&mut self, pid: pid_t, hidden: bool) {
        if hidden {
            self.hidden_apps.insert(pid);
        } else {
            self.hidden_apps.remove(&pid);
        }
    }

    pub fn is_app_hidden(&self, pid: pid_t) -> bool { self.hidden_apps.contains(&pid) }

    pub fn note_floating_frame(&mut self, wid: WindowId, frame: Rect) {
        if let Some(data) = self.floating.get_mut(&wid) {
            data.last_applied_rect = Some(frame);
        }
    }

    pub fn floating_frame(&self, wid: WindowId) -> Option<Rect> {
        self.floating.get(&wid).and_then(|d| d.last_applied_rect)
    }

    /// Re-targets the workspace to a new monitor. Tiled windows pick up the
    /// new rect on the next refresh; floating windows keep their rect,
    /// translated proportionally into the new frame.
    pub fn assign_monitor(&mut self, monitor: Monitor) {
        let old = self.monitor;
        self.monitor = monitor;
        for data in self.floating.values_mut() {
            if let Some(frame) = data.last_applied_rect {
                data.last_applied_rect =
                    Some(frame.translate_between(old.visible_frame, monitor.visible_frame));
            }
        }
    }

    pub fn draw_tree(&self) -> String {
        let tree = self.ascii_tree(self.root);
        let mut out = String::new();
        let _ = ascii_tree::write_tree(&mut out, &tree);
        out
    }

    fn ascii_tree(&self, node: NodeId) -> ascii_tree::Tree {
        let data = &self.tree[node];
        match &data.kind {
            NodeKind::Window(w) => ascii_tree::Tree::Leaf(vec![format!(
                "{:?} [w {:.0}x{:.0}]",
                w.wid, data.weight_h, data.weight_v
            )]),
            NodeKind::Container(c) => {
                let marker = if self.tree.parent(node).is_none() { "*" } else { "" };
                let desc = format!(
                    "{marker}{:?} {:?} [w {:.0}x{:.0}]",
                    c.layout.kind(),
                    c.orientation,
                    data.weight_h,
                    data.weight_v
                );
                let children =
                    self.tree.children(node).iter().map(|&c| self.ascii_tree(c)).collect();
                ascii_tree::Tree::Node(desc, children)
            }
        }
    }
}

pub(crate) fn default_container_layout(config: &EngineConfig) -> ContainerLayout {
    use crate::common::config::DefaultLayout;
    match config.default_root_container_layout {
        DefaultLayout::Tiles => ContainerLayout::Tiles,
        DefaultLayout::Accordion => ContainerLayout::Accordion,
        DefaultLayout::Dwindle => ContainerLayout::Dwindle(DwindleCache::default()),
        DefaultLayout::Scroll => ContainerLayout::Scroll,
        DefaultLayout::Master => {
            ContainerLayout::Master(MasterState::new(config.master_default_percent, MasterSide::Left))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::geometry::{Point, Size};

    fn w(idx: u32) -> WindowId { WindowId::new(1, idx) }

    fn test_monitor() -> Monitor {
        Monitor::new(Rect::new(Point::new(0.0, 0.0), Size::new(1000.0, 600.0)))
    }

    fn workspace() -> Workspace { Workspace::new(test_monitor(), &EngineConfig::default()) }

    #[test]
    fn new_workspace_has_horizontal_tiles_root() {
        let ws = workspace();
        let root = &ws.tree()[ws.root()];
        let container = root.as_container().unwrap();
        assert_eq!(container.orientation, Orientation::Horizontal);
        assert_eq!(container.layout.kind(), LayoutKind::Tiles);
    }

    #[test]
    fn add_window_inserts_after_most_recent() {
        let mut ws = workspace();
        let a = ws.add_window(w(1));
        ws.record_focus(w(1));
        ws.add_window(w(2));
        ws.record_focus(w(2));
        ws.record_focus(w(1));
        ws.add_window(w(3));
        let order: Vec<_> = ws
            .tree()
            .children(ws.root())
            .iter()
            .map(|&n| ws.window_at(n).unwrap())
            .collect();
        assert_eq!(order, vec![w(1), w(3), w(2)]);
        assert_eq!(ws.node_for(w(1)), Some(a));
    }

    #[test]
    fn new_window_weight_is_sibling_average() {
        let mut ws = workspace();
        let a = ws.add_window(w(1));
        let b = ws.add_window(w(2));
        ws.tree[a].set_weight(Orientation::Horizontal, 400.0);
        ws.tree[b].set_weight(Orientation::Horizontal, 600.0);
        let c = ws.add_window(w(3));
        assert_eq!(ws.tree()[c].weight(Orientation::Horizontal), 500.0);
    }

    #[test]
    fn window_appears_in_one_container_only() {
        let mut ws = workspace();
        let first = ws.add_window(w(1));
        let again = ws.add_window(w(1));
        assert_eq!(first, again);
        assert_eq!(ws.all_tiled_windows(), vec![w(1)]);
    }

    #[test]
    fn swap_exchanges_slots_and_keeps_weights_in_place() {
        let mut ws = workspace();
        let a = ws.add_window(w(1));
        let b = ws.add_window(w(2));
        ws.tree[a].set_weight(Orientation::Horizontal, 700.0);
        ws.tree[b].set_weight(Orientation::Horizontal, 300.0);
        assert!(ws.swap_windows(w(1), w(2)));
        let children: Vec<_> = ws.tree().children(ws.root()).to_vec();
        assert_eq!(ws.window_at(children[0]), Some(w(2)));
        assert_eq!(ws.window_at(children[1]), Some(w(1)));
        assert_eq!(ws.tree()[children[0]].weight(Orientation::Horizontal), 700.0);
        assert_eq!(ws.tree()[children[1]].weight(Orientation::Horizontal), 300.0);
    }

    #[test]
    fn closest_parent_requires_sibling_in_direction() {
        let mut ws = workspace();
        ws.add_window(w(1));
        ws.add_window(w(2));
        let first = ws.node_for(w(1)).unwrap();
        let second = ws.node_for(w(2)).unwrap();
        assert_eq!(
            ws.closest_parent(first, Direction::Right, None),
            Some((ws.root(), 0))
        );
        assert_eq!(ws.closest_parent(first, Direction::Left, None), None);
        assert_eq!(
            ws.closest_parent(second, Direction::Left, None),
            Some((ws.root(), 1))
        );
        assert_eq!(ws.closest_parent(first, Direction::Down, None), None);
    }

    #[test]
    fn normalize_flattens_single_child_containers() {
        let mut ws = workspace();
        ws.add_window(w(1));
        let inner = ws.tree.push_child(
            ws.root(),
            NodeData::container(Orientation::Vertical, ContainerLayout::Tiles),
        );
        let leaf = ws.tree.push_child(inner, NodeData::window(w(2)));
        ws.window_nodes.insert(w(2), leaf);
        ws.normalize(&EngineConfig::default());
        assert_eq!(ws.tree.parent(leaf), Some(ws.root()));
        assert!(!ws.tree.contains(inner));
    }

    #[test]
    fn normalize_flips_nested_same_orientation() {
        let mut ws = workspace();
        ws.add_window(w(1));
        let inner = ws.tree.push_child(
            ws.root(),
            NodeData::container(Orientation::Horizontal, ContainerLayout::Tiles),
        );
        for idx in [2, 3] {
            let leaf = ws.tree.push_child(inner, NodeData::window(w(idx)));
            ws.window_nodes.insert(w(idx), leaf);
        }
        ws.normalize(&EngineConfig::default());
        assert_eq!(
            ws.tree()[inner].as_container().unwrap().orientation,
            Orientation::Vertical
        );
    }

    #[test]
    fn float_toggle_remembers_size() {
        let mut ws = workspace();
        let node = ws.add_window(w(1));
        ws.tree[node].as_window_mut().unwrap().last_applied_rect =
            Some(Rect::from_parts(0.0, 0.0, 500.0, 400.0));
        assert_eq!(ws.toggle_floating(w(1)), Some(true));
        assert!(ws.is_floating(w(1)));
        assert!(ws.node_for(w(1)).is_none());
        assert_eq!(
            ws.floating.get(&w(1)).unwrap().floating_size,
            Some(Size::new(500.0, 400.0))
        );
        assert_eq!(ws.toggle_floating(w(1)), Some(false));
        let node = ws.node_for(w(1)).unwrap();
        assert_eq!(
            ws.tree()[node].as_window().unwrap().floating_size,
            Some(Size::new(500.0, 400.0))
        );
    }

    #[test]
    fn monitor_change_translates_floating_proportionally() {
        let mut ws = workspace();
        ws.add_window(w(1));
        ws.toggle_floating(w(1));
        ws.note_floating_frame(w(1), Rect::from_parts(100.0, 60.0, 200.0, 120.0));
        let wide = Monitor::new(Rect::from_parts(0.0, 0.0, 2000.0, 1200.0));
        ws.assign_monitor(wide);
        assert_eq!(
            ws.floating_frame(w(1)),
            Some(Rect::from_parts(200.0, 120.0, 400.0, 240.0))
        );
    }

    #[test]
    fn removing_last_window_of_container_removes_container() {
        let mut ws = workspace();
        ws.add_window(w(1));
        let inner = ws.tree.push_child(
            ws.root(),
            NodeData::container(Orientation::Vertical, ContainerLayout::Tiles),
        );
        let leaf = ws.tree.push_child(inner, NodeData::window(w(2)));
        ws.window_nodes.insert(w(2), leaf);
        ws.remove_window(w(2));
        assert!(!ws.tree.contains(inner));
        assert_eq!(ws.tree.child_count(ws.root()), 1);
    }

    #[test]
    fn draw_tree_renders_kind_and_windows() {
        let mut ws = workspace();
        ws.add_window(w(1));
        ws.add_window(w(2));
        let drawing = ws.draw_tree();
        assert!(drawing.contains("Tiles"));
        assert!(drawing.contains("1/1"));
        assert!(drawing.contains("1/2"));
    }
}
