//! The render tree the observer restyles.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use thiserror::Error;

use super::source::{ChangeSource, EventBus, NodeInserted};
use crate::radius::RadiusMarker;

/// Identifies a node in a [`RenderTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single node could not be restyled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("node {0} is no longer in the tree")]
    NodeRemoved(NodeId),

    #[error("node {node} rejected the style: {reason}")]
    Rejected { node: NodeId, reason: String },
}

/// Tree of rendered elements carrying radius marker classes.
pub trait RenderTree {
    /// Nodes currently bearing `marker`, in document order.
    fn marked_nodes(&self, marker: RadiusMarker) -> Vec<NodeId>;

    /// Sets the corner radius of `node` to a CSS length.
    fn apply_radius(&mut self, node: NodeId, value: &str) -> Result<(), ApplyError>;
}

#[derive(Debug, Clone, Default)]
struct Node {
    classes: Vec<String>,
    radius: Option<String>,
}

/// An in-memory [`RenderTree`], for tests and headless hosts.
///
/// Insertions are published to the attached [`EventBus`], if any.
#[derive(Debug, Default)]
pub struct MemoryTree {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
    locked: HashSet<NodeId>,
    source: Option<EventBus>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes insertions to `source`.
    pub fn with_source(mut self, source: EventBus) -> Self {
        self.source = Some(source);
        self
    }

    /// Appends a node with the given classes and returns its id.
    pub fn insert(&mut self, classes: &[&str]) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
        self.nodes.insert(
            id,
            Node {
                classes: classes.clone(),
                radius: None,
            },
        );
        if let Some(source) = &self.source {
            source.notify(&NodeInserted { node: id, classes });
        }
        id
    }

    pub fn remove(&mut self, node: NodeId) -> bool {
        self.locked.remove(&node);
        self.nodes.remove(&node).is_some()
    }

    /// Makes `node` reject style changes.
    pub fn lock(&mut self, node: NodeId) {
        self.locked.insert(node);
    }

    pub fn unlock(&mut self, node: NodeId) {
        self.locked.remove(&node);
    }

    /// The radius last applied to `node`.
    pub fn radius_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node)?.radius.as_deref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl RenderTree for MemoryTree {
    fn marked_nodes(&self, marker: RadiusMarker) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.classes.iter().any(|c| marker.matches(c)))
            .map(|(id, _)| *id)
            .collect()
    }

    fn apply_radius(&mut self, node: NodeId, value: &str) -> Result<(), ApplyError> {
        if self.locked.contains(&node) {
            return Err(ApplyError::Rejected {
                node,
                reason: "node is locked".to_string(),
            });
        }
        let entry = self.nodes.get_mut(&node).ok_or(ApplyError::NodeRemoved(node))?;
        entry.radius = Some(value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_nodes_in_order() {
        let mut tree = MemoryTree::new();
        let a = tree.insert(&["card", "rounded-md"]);
        tree.insert(&["rounded-lg"]);
        let c = tree.insert(&["rounded-medium"]);
        assert_eq!(tree.marked_nodes(RadiusMarker::RoundedMd), vec![a, c]);
    }

    #[test]
    fn test_apply_errors() {
        let mut tree = MemoryTree::new();
        let a = tree.insert(&["rounded-sm"]);
        tree.lock(a);
        assert!(matches!(
            tree.apply_radius(a, "4px"),
            Err(ApplyError::Rejected { .. })
        ));
        tree.remove(a);
        assert_eq!(tree.apply_radius(a, "4px"), Err(ApplyError::NodeRemoved(a)));
    }

    #[test]
    fn test_insert_publishes() {
        let bus = EventBus::new();
        let seen = std::rc::Rc::new(std::cell::Cell::new(0));
        let sink = seen.clone();
        bus.on_insert(Box::new(|_| true), Box::new(move |_| sink.set(sink.get() + 1)));

        let mut tree = MemoryTree::new().with_source(bus);
        tree.insert(&["rounded-full"]);
        assert_eq!(seen.get(), 1);
    }
}
