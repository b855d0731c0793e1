//! Arena-backed forest used by the workspace model.
//!
//! Nodes are addressed by generational [`NodeId`]s, so a stale id from a
//! removed subtree can never alias a newly created node. Structural edits
//! exchange ids, never references; [`Forest::unbind`] hands back a
//! [`BindingToken`] sufficient to restore or swap the node later.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

slotmap::new_key_type! { pub struct NodeId; }

#[derive(Serialize, Deserialize, Debug)]
struct Node<T> {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T,
}

/// Where a node was attached before an unbind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BindingToken {
    pub parent: NodeId,
    pub index: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Forest<T> {
    nodes: SlotMap<NodeId, Node<T>>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self { Forest { nodes: SlotMap::with_key() } }
}

impl<T> Forest<T> {
    pub fn new() -> Self { Self::default() }

    pub fn contains(&self, id: NodeId) -> bool { self.nodes.contains_key(id) }

    pub fn get(&self, id: NodeId) -> Option<&T> { self.nodes.get(id).map(|n| &n.data) }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|n| &mut n.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_count(&self, id: NodeId) -> usize { self.children(id).len() }

    /// The node's position in its parent's ordered child list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Creates a detached root node.
    pub fn insert_root(&mut self, data: T) -> NodeId {
        self.nodes.insert(Node { parent: None, children: Vec::new(), data })
    }

    /// Creates a node bound as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, data: T) -> NodeId {
        let index = self.child_count(parent);
        self.insert_child_at(parent, index, data)
    }

    pub fn insert_child_at(&mut self, parent: NodeId, index: usize, data: T) -> NodeId {
        let id = self.nodes.insert(Node { parent: Some(parent), children: Vec::new(), data });
        let siblings = &mut self.nodes[parent].children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        id
    }

    /// Detaches `id` from its parent, returning where it was bound.
    /// Returns `None` for roots and unknown ids. The node and its subtree
    /// stay alive until [`Forest::remove`] or a re-bind.
    pub fn unbind(&mut self, id: NodeId) -> Option<BindingToken> {
        let parent = self.nodes.get(id)?.parent?;
        let index = self.nodes[parent].children.iter().position(|&c| c == id)?;
        self.nodes[parent].children.remove(index);
        self.nodes[id].parent = None;
        Some(BindingToken { parent, index })
    }

    /// Binds a detached node under `parent` at `index` (clamped).
    pub fn bind(&mut self, id: NodeId, parent: NodeId, index: usize) {
        debug_assert!(self.nodes[id].parent.is_none(), "bind of an attached node");
        debug_assert!(!self.is_descendant(parent, id), "bind would create a cycle");
        self.nodes[id].parent = Some(parent);
        let siblings = &mut self.nodes[parent].children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
    }

    /// Removes a node and its whole subtree. Detaches from the parent first.
    pub fn remove(&mut self, id: NodeId) {
        self.unbind(id);
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(n) = self.nodes.remove(node) {
                stack.extend(n.children);
            }
        }
    }

    /// The node and all its ancestors, root last.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.contains(id).then_some(id);
        std::iter::from_fn(move || {
            let node = current?;
            current = self.parent(node);
            Some(node)
        })
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|n| n == ancestor)
    }

    /// Preorder traversal of the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if !self.contains(node) {
                continue;
            }
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }
}

impl<T> std::ops::Index<NodeId> for Forest<T> {
    type Output = T;
    fn index(&self, id: NodeId) -> &T { &self.nodes[id].data }
}

impl<T> std::ops::IndexMut<NodeId> for Forest<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T { &mut self.nodes[id].data }
}
