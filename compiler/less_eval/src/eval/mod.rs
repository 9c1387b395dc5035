//! Node evaluation.
//!
//! [`Eval`] is implemented once for [`Node`]: an exhaustive match that
//! forwards each kind to its evaluation function. Modules are organized by
//! what the kinds do:
//!
//! - `expression`: lists, operations, negation
//! - `reference`: variables, properties, string interpolation
//! - `condition`: guard conditions
//! - `call`: function calls
//! - `url`: url rewriting
//! - `ruleset`: declarations, selectors, rulesets and detached rulesets
//!
//! Every dispatch step runs on a stack that grows on demand, and any error
//! that leaves it is located at the node that raised it unless an inner
//! node already supplied a location.

use less_ir::{Array, Assignment, Attribute, Element, Node};

use crate::context::EvalContext;
use crate::EvalResult;

mod call;
mod condition;
mod expression;
mod reference;
mod ruleset;
mod url;

pub use ruleset::eval_ruleset;
pub(crate) use ruleset::{call_detached, eval_selector, make_important};

/// Evaluation of a node in a context.
pub trait Eval {
    fn eval(&self, ctx: &mut EvalContext) -> EvalResult<Node>;
}

impl Eval for Node {
    fn eval(&self, ctx: &mut EvalContext) -> EvalResult<Node> {
        less_stack::ensure_sufficient_stack(|| eval_node(self, ctx))
            .map_err(|err| self.meta().locate(err))
    }
}

fn eval_node(node: &Node, ctx: &mut EvalContext) -> EvalResult<Node> {
    match node {
        Node::Anonymous(_)
        | Node::Keyword(_)
        | Node::Boolean(_)
        | Node::Dimension(_)
        | Node::Comment(_) => Ok(node.clone()),
        Node::Quoted(quoted) => reference::eval_quoted(quoted, ctx),
        Node::Expression(expression) => expression::eval_expression(expression, ctx),
        Node::Value(value) => expression::eval_value(value, ctx),
        Node::Operation(operation) => expression::eval_operation(operation, ctx),
        Node::Negative(negative) => expression::eval_negative(negative, ctx),
        Node::Paren(paren) => expression::eval_paren(paren, ctx),
        Node::Url(url) => url::eval_url(url, ctx),
        Node::Assignment(assignment) => eval_assignment(assignment, ctx),
        Node::Attribute(attribute) => eval_attribute(attribute, ctx),
        Node::Variable(variable) => reference::eval_variable(variable, ctx),
        Node::Property(property) => reference::eval_property(property, ctx),
        Node::Call(call) => call::eval_call(call, ctx),
        Node::Condition(condition) => condition::eval_condition(condition, ctx),
        Node::VariableCall(call) => crate::resolve::eval_variable_call(call, ctx),
        Node::NamespaceValue(namespace) => crate::resolve::eval_namespace_value(namespace, ctx),
        Node::Declaration(declaration) => ruleset::eval_declaration(declaration, ctx),
        Node::Ruleset(ruleset) => Ok(eval_ruleset(ruleset, ctx)?.into()),
        Node::DetachedRuleset(detached) => Ok(ruleset::eval_detached(detached, ctx).into()),
        Node::Selector(selector) => Ok(eval_selector(selector, ctx)?.into()),
        Node::Element(element) => Ok(eval_element(element, ctx)?.into()),
        Node::Extend(extend) => Ok(crate::resolve::eval_extend(extend, ctx)?.into()),
        Node::MixinDefinition(definition) => Ok(ruleset::eval_mixin_definition(definition, ctx)),
        Node::MixinCall(call) => crate::mixin::eval_mixin_call(call, ctx),
        Node::Array(array) => eval_array(array, ctx),
    }
}

fn eval_assignment(assignment: &Assignment, ctx: &mut EvalContext) -> EvalResult<Node> {
    Ok(Assignment {
        meta: assignment.meta.clone(),
        key: assignment.key.clone(),
        value: Box::new(assignment.value.eval(ctx)?),
    }
    .into())
}

fn eval_attribute(attribute: &Attribute, ctx: &mut EvalContext) -> EvalResult<Node> {
    let value = match &attribute.value {
        Some(value) => Some(Box::new(value.eval(ctx)?)),
        None => None,
    };
    Ok(Attribute {
        meta: attribute.meta.clone(),
        key: Box::new(attribute.key.eval(ctx)?),
        op: attribute.op.clone(),
        value,
        cif: attribute.cif.clone(),
    }
    .into())
}

pub(crate) fn eval_element(element: &Element, ctx: &mut EvalContext) -> EvalResult<Element> {
    Ok(Element {
        meta: element.meta.clone(),
        combinator: element.combinator.clone(),
        value: Box::new(element.value.eval(ctx)?),
        is_variable: element.is_variable,
    })
}

/// Evaluate every item, splicing nested arrays in place.
fn eval_array(array: &Array, ctx: &mut EvalContext) -> EvalResult<Node> {
    let mut items = Vec::with_capacity(array.items.len());
    for item in &array.items {
        match item.eval(ctx)? {
            Node::Array(nested) => items.extend(nested.items),
            evaluated => items.push(evaluated),
        }
    }
    Ok(Array {
        meta: array.meta.clone(),
        items,
    }
    .into())
}
