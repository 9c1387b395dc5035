//! The closed set of node kinds.
//!
//! # Design
//!
//! Every kind is a variant of [`Node`]; evaluation, CSS generation and child
//! traversal are exhaustive matches over it, so adding a kind is a compile
//! error everywhere it must be handled. [`NodeKind`] mirrors the variants
//! without payloads and gives each a stable small index, which the visitor
//! framework uses as its dispatch-table key.
//!
//! Rulesets and mixin definitions sit behind `Rc`: frames and closures
//! reference them without copying bodies, and visitors that need to edit one
//! go through `Rc::make_mut`.

use std::rc::Rc;

use crate::{FileInfo, NodeId, NodeMeta};

mod reference;
mod rule;
mod value;

pub use reference::{Call, CondOp, Condition, NamespaceValue, Property, Variable, VariableCall};
pub use rule::{
    Combinator, Declaration, DetachedRuleset, Element, Extend, ExtendOption, MergeMode,
    MixinArg, MixinCall, MixinDefinition, MixinParam, Ruleset, Selector,
};
pub use value::{
    Anonymous, Array, Assignment, Attribute, Boolean, Comment, Dimension, Expression, Keyword,
    Negative, Operation, Paren, Quoted, Url, Value,
};

/// Access to the metadata every node kind carries.
pub trait HasMeta {
    fn meta(&self) -> &NodeMeta;
    fn meta_mut(&mut self) -> &mut NodeMeta;
}

impl<T: HasMeta + Clone> HasMeta for Rc<T> {
    fn meta(&self) -> &NodeMeta {
        (**self).meta()
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        Rc::make_mut(self).meta_mut()
    }
}

macro_rules! impl_has_meta {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasMeta for $ty {
                #[inline]
                fn meta(&self) -> &NodeMeta {
                    &self.meta
                }

                #[inline]
                fn meta_mut(&mut self) -> &mut NodeMeta {
                    &mut self.meta
                }
            }
        )*
    };
}

impl_has_meta!(
    Anonymous, Keyword, Boolean, Dimension, Quoted, Comment, Expression, Value, Operation,
    Negative, Paren, Url, Assignment, Attribute, Variable, Property, Call, Condition,
    VariableCall, NamespaceValue, Declaration, Ruleset, DetachedRuleset, Selector, Element,
    Extend, MixinDefinition, MixinCall, Array,
);

macro_rules! node_kinds {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A node of the stylesheet tree.
        #[derive(Clone, Debug)]
        pub enum Node {
            $($variant($ty),)*
        }

        /// Payload-free tag of a [`Node`] variant.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum NodeKind {
            $($variant,)*
        }

        impl NodeKind {
            /// Every kind, ordered by [`NodeKind::index`].
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)*];
            pub const COUNT: usize = Self::ALL.len();

            #[inline]
            pub const fn index(self) -> usize {
                self as usize
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$variant => stringify!($variant),)*
                }
            }
        }

        impl Node {
            #[inline]
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Node::$variant(_) => NodeKind::$variant,)*
                }
            }
        }

        impl HasMeta for Node {
            fn meta(&self) -> &NodeMeta {
                match self {
                    $(Node::$variant(node) => node.meta(),)*
                }
            }

            fn meta_mut(&mut self) -> &mut NodeMeta {
                match self {
                    $(Node::$variant(node) => node.meta_mut(),)*
                }
            }
        }

        $(
            impl From<$ty> for Node {
                #[inline]
                fn from(node: $ty) -> Self {
                    Node::$variant(node)
                }
            }

            impl TryFrom<Node> for $ty {
                type Error = Node;

                fn try_from(node: Node) -> Result<Self, Node> {
                    match node {
                        Node::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

node_kinds! {
    Anonymous(Anonymous),
    Keyword(Keyword),
    Boolean(Boolean),
    Dimension(Dimension),
    Quoted(Quoted),
    Comment(Comment),
    Expression(Expression),
    Value(Value),
    Operation(Operation),
    Negative(Negative),
    Paren(Paren),
    Url(Url),
    Assignment(Assignment),
    Attribute(Attribute),
    Variable(Variable),
    Property(Property),
    Call(Call),
    Condition(Condition),
    VariableCall(VariableCall),
    NamespaceValue(NamespaceValue),
    Declaration(Declaration),
    Ruleset(Rc<Ruleset>),
    DetachedRuleset(DetachedRuleset),
    Selector(Selector),
    Element(Element),
    Extend(Extend),
    MixinDefinition(Rc<MixinDefinition>),
    MixinCall(MixinCall),
    Array(Array),
}

impl From<Ruleset> for Node {
    fn from(ruleset: Ruleset) -> Self {
        Node::Ruleset(Rc::new(ruleset))
    }
}

impl From<MixinDefinition> for Node {
    fn from(definition: MixinDefinition) -> Self {
        Node::MixinDefinition(Rc::new(definition))
    }
}

impl Node {
    #[inline]
    pub fn meta(&self) -> &NodeMeta {
        HasMeta::meta(self)
    }

    #[inline]
    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        HasMeta::meta_mut(self)
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.meta().id
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.meta().index
    }

    pub fn file_info(&self) -> Option<&Rc<FileInfo>> {
        self.meta().file_info.as_ref()
    }

    pub fn set_parent(&mut self, parent: NodeId) {
        self.meta_mut().parent = Some(parent);
    }

    /// Replace the location with `index` and `file_info`.
    #[must_use]
    pub fn located(mut self, index: Option<usize>, file_info: Option<Rc<FileInfo>>) -> Self {
        let meta = self.meta_mut();
        meta.index = index;
        meta.file_info = file_info;
        self
    }

    /// Bare sequences spliced into their enclosing list by visitors and
    /// ruleset evaluation.
    #[inline]
    pub fn is_array_like(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    /// Truthiness used by guards: booleans are themselves, everything else
    /// that exists is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Boolean(boolean) => boolean.value,
            _ => true,
        }
    }

    /// The rules of a node that carries a rule body.
    pub fn rules(&self) -> Option<&[Node]> {
        match self {
            Node::Ruleset(ruleset) => Some(&ruleset.rules),
            Node::DetachedRuleset(detached) => Some(&detached.ruleset.rules),
            Node::MixinDefinition(definition) => Some(&definition.rules),
            Node::Array(array) => Some(&array.items),
            _ => None,
        }
    }

    /// The items of a list-valued node.
    pub fn value_items(&self) -> Option<&[Node]> {
        match self {
            Node::Value(value) => Some(&value.value),
            Node::Expression(expression) => Some(&expression.value),
            _ => None,
        }
    }

    /// Nodes that never produce output on their own.
    pub fn is_silent(&self) -> bool {
        match self {
            Node::MixinDefinition(_)
            | Node::Extend(_)
            | Node::Condition(_)
            | Node::DetachedRuleset(_)
            | Node::VariableCall(_)
            | Node::MixinCall(_) => true,
            Node::Declaration(declaration) => declaration.variable,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
