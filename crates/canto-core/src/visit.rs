//! Visitor framework: generic pre-order depth-first traversal over a node
//! tree, with early termination for find-first passes.

use std::sync::Arc;

use crate::node::{Node, NodeKind};

/// A read-only pass over a node tree.
///
/// `done` is consulted before every visit; once it returns true, traversal
/// stops immediately and remaining siblings/descendants are not visited.
/// Visitors accumulate findings in their own state rather than through
/// traversal return values.
pub trait NodeVisitor {
    fn visit(&mut self, node: &Node);

    fn done(&self) -> bool {
        false
    }
}

/// Visit `root` and every descendant in pre-order depth-first order.
///
/// Uses an explicit stack so tree depth never bounds the call stack.
pub fn traverse(root: &Arc<Node>, visitor: &mut dyn NodeVisitor) {
    let mut stack: Vec<Arc<Node>> = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if visitor.done() {
            return;
        }
        visitor.visit(&node);
        // Push in reverse so the leftmost child is visited first.
        for child in node.children().iter().rev() {
            stack.push(child.clone());
        }
    }
}

/// Semantic pass: detect unresolved-value markers in a definition body.
///
/// An abstract marker means the body is intentionally incomplete; callers use
/// this as a completeness gate to veto output generation.
#[derive(Debug, Default)]
pub struct IncompleteCheck {
    found_abstract: bool,
}

impl IncompleteCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found_abstract(&self) -> bool {
        self.found_abstract
    }
}

impl NodeVisitor for IncompleteCheck {
    fn visit(&mut self, node: &Node) {
        if let NodeKind::NullValue { is_abstract: true } = node.kind() {
            self.found_abstract = true;
        }
    }

    fn done(&self) -> bool {
        self.found_abstract
    }
}
