//! Node model for the Less evaluation core.
//!
//! This crate holds everything about the tree that does not need an
//! evaluation context:
//! - [`Node`] and its kinds, each carrying [`NodeMeta`] (id, location,
//!   parent id, visibility)
//! - [`Unit`] arithmetic and conversion tables
//! - [`FrameChain`], the innermost-first scope chain lookups walk
//! - [`compare()`], the three-way comparison guards use
//! - CSS fragment generation into a [`CssOutput`] sink
//! - the [`visitor`] framework every tree pass is built on
//!
//! Evaluation lives in `less_eval`; parsing is outside this workspace, so
//! trees are built directly through the node constructors.

mod meta;
mod node;
mod node_id;
mod scope;
mod unit;

pub mod compare;
pub mod output;
pub mod visitor;

pub use compare::compare;
pub use meta::{FileInfo, NodeMeta, VisibilityInfo};
pub use node::{
    Anonymous, Array, Assignment, Attribute, Boolean, Call, Combinator, Comment, CondOp,
    Condition, Declaration, DetachedRuleset, Dimension, Element, Expression, Extend, ExtendOption,
    HasMeta, Keyword, MergeMode, MixinArg, MixinCall, MixinDefinition, MixinParam,
    NamespaceValue, Negative, Node, NodeKind, Operation, Paren, Property, Quoted, Ruleset,
    Selector, Url, Value, Variable, VariableCall,
};
pub use node_id::NodeId;
pub use output::{CssChunk, CssChunks, CssContext, CssOutput};
pub use scope::FrameChain;
pub use unit::{Unit, UnitGroup};
