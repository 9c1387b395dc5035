use std::rc::Rc;

use less_diagnostic::errors;
use less_ir::{Array, DetachedRuleset, Node, NodeMeta, Ruleset, Variable, VariableCall};

use crate::context::EvalContext;
use crate::eval::{call_detached, make_important, Eval};
use crate::EvalResult;

/// `@detached();` expands the rules held by a variable.
///
/// Besides detached rulesets, anything carrying rules or a list of values
/// can be called; those are wrapped into a detached ruleset evaluated in the
/// caller's scope.
pub(crate) fn eval_variable_call(call: &VariableCall, ctx: &mut EvalContext) -> EvalResult<Node> {
    let variable = Variable {
        meta: NodeMeta::at(call.meta.index, call.meta.file_info.clone()),
        name: call.variable.clone(),
    };
    let detached = match Node::from(variable).eval(ctx)? {
        Node::DetachedRuleset(detached) => detached,
        other => {
            let rules = other
                .rules()
                .or_else(|| other.value_items())
                .ok_or_else(|| errors::variable_call_failed(&call.variable))?;
            DetachedRuleset::new(Rc::new(Ruleset::bindings(rules.to_vec())))
        }
    };

    let ruleset = call_detached(&detached, ctx)?;
    let rules = if call.important {
        make_important(ruleset.rules)
    } else {
        ruleset.rules
    };
    Ok(Array::new(rules).into())
}
