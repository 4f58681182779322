//! Build collapsed stack format from the call tree.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "app::main;air::exec::call 1000"
//! This means: main entered call, which spent 1000ns of self time.

use super::call_tree::{CallTree, NodeId};
use crate::utils::config::FOLDED_FRAME_SEPARATOR;
use log::debug;

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Weight (self time in nanoseconds)
    pub weight: u64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Format as the standard collapsed stack line
    ///
    /// Example: "main;execute;storage_read 1000"
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from a call tree
///
/// **Public** - main entry point for stack building
///
/// One stack per tree node, weighted by the node's self time. Nodes whose
/// time is entirely spent in children are left out; the flamegraph still
/// draws them as the parents of those children.
///
/// # Returns
/// Collapsed stacks sorted by weight (descending)
pub fn collapse_tree(tree: &CallTree) -> Vec<CollapsedStack> {
    let mut stacks = Vec::new();
    let mut path = Vec::new();

    for id in tree.roots().values() {
        collapse_node(tree, *id, &mut path, &mut stacks);
    }

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));

    debug!("Built {} collapsed stacks from {} nodes", stacks.len(), tree.len());

    stacks
}

fn collapse_node<'t>(
    tree: &'t CallTree,
    id: NodeId,
    path: &mut Vec<&'t str>,
    stacks: &mut Vec<CollapsedStack>,
) {
    let node = tree.node(id);
    path.push(&node.qualified_name);

    let weight = u64::try_from(tree.self_time(id).as_nanos()).unwrap_or(u64::MAX);
    if weight > 0 {
        stacks.push(CollapsedStack::new(path.join(FOLDED_FRAME_SEPARATOR), weight));
    }

    for child in node.children.values() {
        collapse_node(tree, *child, path, stacks);
    }

    path.pop();
}
