//! Aggregated call tree.
//!
//! Nodes live in an arena owned by the tree and refer to their children by
//! index, keyed by qualified span name. The reducer's open-span stack holds
//! the same indices, so nothing outside the tree ever owns a node.

use std::collections::BTreeMap;
use std::time::Duration;

/// Index of a node inside its `CallTree`
pub type NodeId = usize;

/// One span position in the call tree
#[derive(Debug, Clone, PartialEq)]
pub struct SpanNode {
    /// `target::span` key under the parent
    pub qualified_name: String,

    /// Bare span name, as listed in ancestor chains
    pub span: String,

    /// Busy time summed over every occurrence and every repeat
    pub cumulative: Duration,

    /// Children by qualified name
    pub children: BTreeMap<String, NodeId>,
}

impl SpanNode {
    fn new(qualified_name: String, span: String) -> Self {
        Self {
            qualified_name,
            span,
            cumulative: Duration::ZERO,
            children: BTreeMap::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Call tree: top-level spans by qualified name, recursively nested
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallTree {
    nodes: Vec<SpanNode>,
    roots: BTreeMap<String, NodeId>,
}

impl CallTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level spans
    pub fn roots(&self) -> &BTreeMap<String, NodeId> {
        &self.roots
    }

    /// Children of `parent`, or the top-level spans for `None`
    pub fn children_of(&self, parent: Option<NodeId>) -> &BTreeMap<String, NodeId> {
        match parent {
            Some(id) => &self.nodes[id].children,
            None => &self.roots,
        }
    }

    /// Look up a child by qualified name
    pub fn child(&self, parent: Option<NodeId>, qualified_name: &str) -> Option<NodeId> {
        self.children_of(parent).get(qualified_name).copied()
    }

    /// Return the existing child with this qualified name, or create it
    ///
    /// Reuse is what makes repeated calls and repeated runs accumulate into
    /// one node.
    pub fn get_or_insert_child(
        &mut self,
        parent: Option<NodeId>,
        qualified_name: &str,
        span: &str,
    ) -> NodeId {
        if let Some(id) = self.child(parent, qualified_name) {
            return id;
        }

        let id = self.nodes.len();
        self.nodes
            .push(SpanNode::new(qualified_name.to_string(), span.to_string()));

        let siblings = match parent {
            Some(parent) => &mut self.nodes[parent].children,
            None => &mut self.roots,
        };
        siblings.insert(qualified_name.to_string(), id);

        id
    }

    pub fn node(&self, id: NodeId) -> &SpanNode {
        &self.nodes[id]
    }

    pub(crate) fn add_time(&mut self, id: NodeId, elapsed: Duration) {
        self.nodes[id].cumulative += elapsed;
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of the top-level spans' cumulative durations
    pub fn total(&self) -> Duration {
        self.roots
            .values()
            .map(|id| self.nodes[*id].cumulative)
            .sum()
    }

    /// Copy of the tree with every duration divided by `divisor`
    ///
    /// Structure and indices are preserved, so ids stay valid on the copy.
    pub fn scaled_down(&self, divisor: u32) -> CallTree {
        let mut scaled = self.clone();
        for node in &mut scaled.nodes {
            node.cumulative /= divisor;
        }
        scaled
    }

    /// Busy time of a node minus the busy time of its children
    pub fn self_time(&self, id: NodeId) -> Duration {
        let node = &self.nodes[id];
        let children: Duration = node
            .children
            .values()
            .map(|child| self.nodes[*child].cumulative)
            .sum();
        node.cumulative.saturating_sub(children)
    }
}
