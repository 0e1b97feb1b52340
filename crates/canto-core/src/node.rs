//! The generic parse tree.
//!
//! Every parsed construct is a [`Node`]: an ordered sequence of owned children
//! plus a non-owning back-reference to the parent, wired once by
//! [`Node::attach_parents`] after parse. Child order is semantically
//! meaningful (argument and content order). After the attach pass the tree
//! structure is immutable; evaluation never mutates nodes.

use std::sync::{Arc, OnceLock, Weak};

use crate::error::Error;
use crate::ident::{CantoPath, Ident};
use crate::value::Value;
use crate::Result;

/// A name occurrence in content; the owning node's children are its
/// actual-argument subtrees, so argument count is the child count.
#[derive(Debug, Clone, PartialEq)]
pub struct NameRef {
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Literal text, passed through to output unchanged.
    Text(String),
    /// A reference to a named definition, resolved at instantiation time.
    Reference(NameRef),
    /// An ordered content sequence; renders as the concatenation of its
    /// children.
    Block,
    /// The unresolved-value marker. An abstract marker denotes an
    /// intentionally incomplete value and vetoes rendering.
    NullValue { is_abstract: bool },
    /// An already-evaluated compile-time constant.
    Literal(Value),
    /// A redirect instruction: stop evaluating and re-target the whole
    /// instantiation chain to the carried location.
    Redirect(CantoPath),
}

pub struct Node {
    kind: NodeKind,
    children: Vec<Arc<Node>>,
    parent: OnceLock<Weak<Node>>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("children", &self.children)
            .finish()
    }
}

impl Node {
    fn new(kind: NodeKind, children: Vec<Arc<Node>>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            children,
            parent: OnceLock::new(),
        })
    }

    pub fn text(s: impl Into<String>) -> Arc<Self> {
        Self::new(NodeKind::Text(s.into()), vec![])
    }

    /// A reference with no arguments.
    pub fn reference(name: impl Into<Ident>) -> Arc<Self> {
        Self::new(NodeKind::Reference(NameRef { name: name.into() }), vec![])
    }

    /// A reference whose children are its actual arguments, in call order.
    pub fn reference_with_args(name: impl Into<Ident>, args: Vec<Arc<Node>>) -> Arc<Self> {
        Self::new(NodeKind::Reference(NameRef { name: name.into() }), args)
    }

    pub fn block(children: Vec<Arc<Node>>) -> Arc<Self> {
        Self::new(NodeKind::Block, children)
    }

    /// An empty body.
    pub fn empty() -> Arc<Self> {
        Self::new(NodeKind::Block, vec![])
    }

    pub fn null(is_abstract: bool) -> Arc<Self> {
        Self::new(NodeKind::NullValue { is_abstract }, vec![])
    }

    pub fn literal(value: Value) -> Arc<Self> {
        Self::new(NodeKind::Literal(value), vec![])
    }

    pub fn redirect(location: impl Into<CantoPath>) -> Arc<Self> {
        Self::new(NodeKind::Redirect(location.into()), vec![])
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.get().and_then(Weak::upgrade)
    }

    /// For a reference node, the call-site argument count.
    pub fn arg_count(&self) -> usize {
        self.children.len()
    }

    /// The init pass: wire each descendant's parent back-reference.
    ///
    /// Walked iteratively so nesting depth never bounds the stack. Errors if
    /// any node already carries a parent, which would mean the node appears
    /// under two parents.
    pub fn attach_parents(self: &Arc<Self>) -> Result<()> {
        let mut stack: Vec<Arc<Node>> = vec![self.clone()];
        while let Some(node) = stack.pop() {
            for child in node.children() {
                child
                    .parent
                    .set(Arc::downgrade(&node))
                    .map_err(|_| Error::ReattachedNode)?;
                stack.push(child.clone());
            }
        }
        Ok(())
    }
}
