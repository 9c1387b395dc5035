//! Tree visitor framework shared by every pass over the node tree.
//!
//! # Design
//!
//! An implementation declares, per [`NodeKind`], an optional "in" handler
//! and an optional "out" handler. [`Visitor::new`] asks for them once and
//! stores them in a table indexed by [`NodeKind::index`], so a visit is an
//! array load and an indirect call, with no per-node lookup.
//!
//! Traversal order is always: "in" handler, then the node's children (via
//! [`Node::accept`]), then the "out" handler. The "in" handler can stop the
//! descent by clearing [`VisitArgs::visit_deeper`].
//!
//! Replacing implementations (`REPLACING = true`) may swap the node for
//! another, remove it, or return an [`Array`] whose items are spliced into
//! the enclosing list. For non-replacing implementations the returned
//! [`Replacement`] is ignored and lists come back with the same nodes.
//!
//! ```text
//! struct DropComments;
//!
//! impl Visit for DropComments {
//!     const REPLACING: bool = true;
//!
//!     fn handler(kind: NodeKind) -> Handler<Self> {
//!         match kind {
//!             NodeKind::Comment => Handler::on_in(|_, _, _| Replacement::Remove),
//!             _ => Handler::NONE,
//!         }
//!     }
//! }
//! ```

use std::mem;

use crate::{Anonymous, Array, MixinArg, MixinParam, Node, NodeKind};

mod accept;

/// Per-visit flags the "in" handler may change.
#[derive(Clone, Copy, Debug)]
pub struct VisitArgs {
    pub visit_deeper: bool,
}

/// What a replacing visitor does with the node it was handed.
#[derive(Debug)]
pub enum Replacement {
    Keep,
    Remove,
    With(Node),
}

pub type VisitInFn<V> = fn(&mut V, &mut Node, &mut VisitArgs) -> Replacement;
pub type VisitOutFn<V> = fn(&mut V, &Node);

/// The handlers one implementation registers for one node kind.
pub struct Handler<V> {
    pub visit_in: Option<VisitInFn<V>>,
    pub visit_out: Option<VisitOutFn<V>>,
}

impl<V> Clone for Handler<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Handler<V> {}

impl<V> Handler<V> {
    pub const NONE: Self = Handler {
        visit_in: None,
        visit_out: None,
    };

    pub fn on_in(visit_in: VisitInFn<V>) -> Self {
        Handler {
            visit_in: Some(visit_in),
            visit_out: None,
        }
    }

    pub fn on_out(visit_out: VisitOutFn<V>) -> Self {
        Handler {
            visit_in: None,
            visit_out: Some(visit_out),
        }
    }

    #[must_use]
    pub fn and_out(mut self, visit_out: VisitOutFn<V>) -> Self {
        self.visit_out = Some(visit_out);
        self
    }
}

/// A visitor implementation.
pub trait Visit: Sized {
    /// Whether handler results replace the visited node.
    const REPLACING: bool = false;

    /// Handlers for `kind`. Called once per kind when a [`Visitor`] is built.
    fn handler(kind: NodeKind) -> Handler<Self>;
}

/// Drives an implementation over a tree.
pub struct Visitor<V: Visit> {
    implementation: V,
    table: [Handler<V>; NodeKind::COUNT],
}

impl<V: Visit> Visitor<V> {
    pub fn new(implementation: V) -> Self {
        Visitor {
            implementation,
            table: std::array::from_fn(|index| V::handler(NodeKind::ALL[index])),
        }
    }

    pub fn implementation(&self) -> &V {
        &self.implementation
    }

    pub fn implementation_mut(&mut self) -> &mut V {
        &mut self.implementation
    }

    pub fn into_inner(self) -> V {
        self.implementation
    }

    /// Visit one node. `None` means a replacing handler removed it.
    pub fn visit(&mut self, mut node: Node) -> Option<Node> {
        let handler = self.table[node.kind().index()];
        let mut args = VisitArgs { visit_deeper: true };
        if let Some(visit_in) = handler.visit_in {
            let replacement = visit_in(&mut self.implementation, &mut node, &mut args);
            if V::REPLACING {
                match replacement {
                    Replacement::Keep => {}
                    Replacement::Remove => return None,
                    Replacement::With(new_node) => node = new_node,
                }
            }
        }
        if args.visit_deeper {
            less_stack::ensure_sufficient_stack(|| node.accept(self));
        }
        if let Some(visit_out) = handler.visit_out {
            visit_out(&mut self.implementation, &node);
        }
        Some(node)
    }

    /// Visit a list; replacing visitors drop removed nodes and splice
    /// array results in place, preserving order.
    pub fn visit_array(&mut self, nodes: Vec<Node>) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.visit(node) {
                None => {}
                Some(Node::Array(array)) if V::REPLACING => flatten(array.items, &mut out),
                Some(visited) => out.push(visited),
            }
        }
        out
    }

    /// Visit a required child in place. A removed child becomes an empty
    /// anonymous node so the parent stays well-formed.
    pub fn visit_child(&mut self, child: &mut Node) {
        let taken = mem::replace(child, Anonymous::empty().into());
        *child = self
            .visit(taken)
            .unwrap_or_else(|| Anonymous::empty().into());
    }

    pub fn visit_optional(&mut self, child: &mut Option<Box<Node>>) {
        if let Some(node) = child.take() {
            *child = self.visit(*node).map(Box::new);
        }
    }

    pub fn visit_list(&mut self, nodes: &mut Vec<Node>) {
        let taken = mem::take(nodes);
        *nodes = self.visit_array(taken);
    }

    /// Visit a list of one concrete kind. Results of another kind are
    /// dropped: the list's type cannot hold them.
    pub fn visit_typed_list<T>(&mut self, items: &mut Vec<T>)
    where
        T: Into<Node> + TryFrom<Node, Error = Node>,
    {
        let nodes = mem::take(items).into_iter().map(Into::into).collect();
        *items = self
            .visit_array(nodes)
            .into_iter()
            .filter_map(|node| match T::try_from(node) {
                Ok(item) => Some(item),
                Err(other) => {
                    tracing::debug!(kind = other.kind().name(), "dropping mistyped visit result");
                    None
                }
            })
            .collect();
    }

    /// Visit a typed required child; a removed or mistyped result resets
    /// it to its default.
    pub fn visit_typed_child<T>(&mut self, item: &mut T)
    where
        T: Into<Node> + TryFrom<Node, Error = Node> + Default,
    {
        let node = mem::take(item).into();
        *item = self
            .visit(node)
            .and_then(|node| T::try_from(node).ok())
            .unwrap_or_default();
    }

    /// Mixin arguments are not nodes; visit the value they wrap.
    pub fn visit_arg(&mut self, arg: &mut MixinArg) {
        self.visit_child(&mut arg.value);
    }

    pub fn visit_param(&mut self, param: &mut MixinParam) {
        if let Some(value) = param.value.take() {
            param.value = self.visit(value);
        }
    }
}

/// Expand nested arrays depth-first into `out`.
pub fn flatten(nodes: Vec<Node>, out: &mut Vec<Node>) {
    for node in nodes {
        match node {
            Node::Array(Array { items, .. }) => flatten(items, out),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests;
