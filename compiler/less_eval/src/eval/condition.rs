use less_ir::{compare, Boolean, CondOp, Condition, Node};

use super::Eval;
use crate::context::EvalContext;
use crate::operators::relation_holds;
use crate::EvalResult;

/// Guard conditions. Both operands are always evaluated, so errors on the
/// right-hand side surface even when the left already decides the result.
pub(super) fn eval_condition(condition: &Condition, ctx: &mut EvalContext) -> EvalResult<Node> {
    let left = condition.lvalue.eval(ctx)?;
    let right = condition.rvalue.eval(ctx)?;
    let result = match condition.op {
        CondOp::And => left.is_truthy() && right.is_truthy(),
        CondOp::Or => left.is_truthy() || right.is_truthy(),
        op => relation_holds(op, compare(&left, &right)),
    };
    let mut evaluated = Boolean::new(result != condition.negate);
    evaluated.meta = condition.meta.derive();
    Ok(evaluated.into())
}
