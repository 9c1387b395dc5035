use std::rc::Rc;

use less_diagnostic::errors;
use less_ir::{Declaration, NamespaceValue, Node, NodeMeta, Ruleset, Selector, Variable};

use crate::context::EvalContext;
use crate::eval::{call_detached, Eval};
use crate::EvalResult;

/// Walk the lookups of `@ns[@var]`, `.mixin()[$prop]` or `@config[]`.
///
/// Every step picks a declaration out of the current scope and continues
/// with its evaluated value. Rules produced by a mixin call only become a
/// scope when the step reaches them.
pub(crate) fn eval_namespace_value(
    namespace: &NamespaceValue,
    ctx: &mut EvalContext,
) -> EvalResult<Node> {
    let mut current = namespace.value.eval(ctx)?;
    for lookup in &namespace.lookups {
        let scope = into_scope(current, ctx)?;
        let declaration = if lookup.is_empty() {
            scope
                .last_declaration()
                .cloned()
                .ok_or_else(errors::namespace_without_declarations)?
        } else if lookup.starts_with('@') {
            let name = match lookup.strip_prefix("@@") {
                Some(inner) => format!("@{}", indirect(namespace, inner, ctx)?),
                None => lookup.clone(),
            };
            scope
                .variable(&name)
                .cloned()
                .ok_or_else(|| errors::namespace_variable_not_found(&name))?
        } else {
            let name = match lookup.strip_prefix("$@") {
                Some(inner) => indirect(namespace, inner, ctx)?,
                None => lookup.strip_prefix('$').unwrap_or(lookup).to_string(),
            };
            scope
                .property(&name)
                .last()
                .map(|declaration| (*declaration).clone())
                .ok_or_else(|| errors::namespace_property_not_found(&name))?
        };
        current = declaration_value(&declaration, ctx)?;
    }

    if matches!(current, Node::Value(_)) {
        current = current.eval(ctx)?;
    }
    Ok(current)
}

/// The text value of variable `@name`, used as another name.
fn indirect(namespace: &NamespaceValue, name: &str, ctx: &mut EvalContext) -> EvalResult<String> {
    let variable = Variable {
        meta: NodeMeta::at(namespace.meta.index, namespace.meta.file_info.clone()),
        name: format!("@{name}"),
    };
    Ok(Node::from(variable).eval(ctx)?.plain_text())
}

fn into_scope(node: Node, ctx: &mut EvalContext) -> EvalResult<Rc<Ruleset>> {
    match node {
        Node::Array(array) => Ok(Rc::new(Ruleset::new(vec![Selector::default()], array.items))),
        Node::Ruleset(ruleset) => Ok(ruleset),
        Node::DetachedRuleset(detached) => Ok(Rc::new(call_detached(&detached, ctx)?)),
        _ => Err(errors::namespace_without_declarations()),
    }
}

/// The evaluated value of `declaration`; rules held as a value are
/// evaluated into a ruleset.
fn declaration_value(declaration: &Declaration, ctx: &mut EvalContext) -> EvalResult<Node> {
    let value = match Node::Declaration(declaration.clone()).eval(ctx)? {
        Node::Declaration(evaluated) => *evaluated.value,
        other => other,
    };
    match value {
        Node::DetachedRuleset(detached) => Ok(call_detached(&detached, ctx)?.into()),
        other => Ok(other),
    }
}
