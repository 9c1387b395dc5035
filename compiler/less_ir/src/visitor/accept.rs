//! Child traversal for every node kind.

use std::rc::Rc;

use super::{Visit, Visitor};
use crate::Node;

impl Node {
    /// Hand this node's children to `visitor`, storing back what it
    /// returns.
    pub fn accept<V: Visit>(&mut self, visitor: &mut Visitor<V>) {
        match self {
            Node::Anonymous(_)
            | Node::Keyword(_)
            | Node::Boolean(_)
            | Node::Dimension(_)
            | Node::Quoted(_)
            | Node::Comment(_)
            | Node::Variable(_)
            | Node::Property(_)
            | Node::VariableCall(_) => {}
            Node::Expression(node) => visitor.visit_list(&mut node.value),
            Node::Value(node) => visitor.visit_list(&mut node.value),
            Node::Operation(node) => {
                visitor.visit_child(&mut node.left);
                visitor.visit_child(&mut node.right);
            }
            Node::Negative(node) => visitor.visit_child(&mut node.value),
            Node::Paren(node) => visitor.visit_child(&mut node.value),
            Node::Url(node) => visitor.visit_child(&mut node.value),
            Node::Assignment(node) => visitor.visit_child(&mut node.value),
            Node::Attribute(node) => {
                visitor.visit_child(&mut node.key);
                visitor.visit_optional(&mut node.value);
            }
            Node::Call(node) => visitor.visit_list(&mut node.args),
            Node::Condition(node) => {
                visitor.visit_child(&mut node.lvalue);
                visitor.visit_child(&mut node.rvalue);
            }
            Node::NamespaceValue(node) => visitor.visit_child(&mut node.value),
            Node::Declaration(node) => visitor.visit_child(&mut node.value),
            Node::Ruleset(node) => {
                let ruleset = Rc::make_mut(node);
                visitor.visit_typed_list(&mut ruleset.selectors);
                visitor.visit_list(&mut ruleset.rules);
            }
            Node::DetachedRuleset(node) => {
                let ruleset = Rc::make_mut(&mut node.ruleset);
                visitor.visit_list(&mut ruleset.rules);
            }
            Node::Selector(node) => {
                visitor.visit_typed_list(&mut node.elements);
                visitor.visit_optional(&mut node.condition);
            }
            Node::Element(node) => visitor.visit_child(&mut node.value),
            Node::Extend(node) => visitor.visit_typed_child(&mut node.selector),
            Node::MixinDefinition(node) => {
                let definition = Rc::make_mut(node);
                for param in &mut definition.params {
                    visitor.visit_param(param);
                }
                visitor.visit_list(&mut definition.rules);
                visitor.visit_optional(&mut definition.condition);
            }
            Node::MixinCall(node) => {
                visitor.visit_typed_child(&mut node.selector);
                for arg in &mut node.args {
                    visitor.visit_arg(arg);
                }
            }
            Node::Array(node) => {
                for item in &mut node.items {
                    item.accept(visitor);
                }
            }
        }
    }
}
