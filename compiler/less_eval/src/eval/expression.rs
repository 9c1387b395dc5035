//! Lists, arithmetic and negation.

use less_diagnostic::errors;
use less_ir::{Dimension, Expression, Negative, Node, Operation, Paren, Value};

use super::Eval;
use crate::context::EvalContext;
use crate::operators::operate;
use crate::options::MathMode;
use crate::EvalResult;

pub(super) fn eval_expression(expression: &Expression, ctx: &mut EvalContext) -> EvalResult<Node> {
    let math_on = ctx.is_math_on();
    let mut double_paren = false;

    let mut evaluate = |ctx: &mut EvalContext| -> EvalResult<Node> {
        match expression.value.as_slice() {
            [] => Ok(Node::Expression(expression.clone())),
            [only] => {
                double_paren = matches!(
                    only,
                    Node::Expression(inner) if inner.parens && !inner.parens_in_op && !ctx.in_calc()
                );
                only.eval(ctx)
            }
            items => {
                let value = items
                    .iter()
                    .map(|item| item.eval(ctx))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Expression {
                    meta: expression.meta.clone(),
                    value,
                    no_spacing: expression.no_spacing,
                    parens: false,
                    parens_in_op: false,
                }
                .into())
            }
        }
    };
    let result = if expression.parens {
        ctx.with_parens(evaluate)?
    } else {
        evaluate(ctx)?
    };

    let keep_parens = expression.parens
        && expression.parens_in_op
        && !math_on
        && !double_paren
        && !matches!(result, Node::Dimension(_));
    if keep_parens {
        return Ok(Paren::new(result).into());
    }
    Ok(result)
}

pub(super) fn eval_value(value: &Value, ctx: &mut EvalContext) -> EvalResult<Node> {
    if let [only] = value.value.as_slice() {
        return only.eval(ctx);
    }
    let items = value
        .value
        .iter()
        .map(|item| item.eval(ctx))
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value {
        meta: value.meta.clone(),
        value: items,
    }
    .into())
}

pub(super) fn eval_operation(operation: &Operation, ctx: &mut EvalContext) -> EvalResult<Node> {
    let left = operation.left.eval(ctx)?;
    let right = operation.right.eval(ctx)?;

    if !ctx.is_math_on_with_op(&operation.op) {
        return Ok(literal_operation(operation, left, right));
    }

    let op = if operation.op == "./" { "/" } else { operation.op.as_str() };
    match (&left, &right) {
        (Node::Dimension(a), Node::Dimension(b)) => {
            let mut result = operate(op, a, b, ctx.options().strict_units)?;
            result.meta = operation.meta.derive();
            Ok(result.into())
        }
        _ if ctx.math() == MathMode::ParensDivision && is_division(&left) => {
            Ok(literal_operation(operation, left, right))
        }
        _ => Err(errors::invalid_operation()),
    }
}

fn is_division(node: &Node) -> bool {
    matches!(node, Node::Operation(operation) if operation.op == "/")
}

fn literal_operation(operation: &Operation, left: Node, right: Node) -> Node {
    Operation {
        meta: operation.meta.clone(),
        op: operation.op.clone(),
        left: Box::new(left),
        right: Box::new(right),
        is_spaced: operation.is_spaced,
    }
    .into()
}

/// Under math, `-x` is `-1 * x`; otherwise the sign stays literal.
pub(super) fn eval_negative(negative: &Negative, ctx: &mut EvalContext) -> EvalResult<Node> {
    if ctx.is_math_on() {
        let product = Operation::new("*", Dimension::new(-1.0, "").into(), (*negative.value).clone(), false);
        let product = Node::from(product).located(negative.meta.index, negative.meta.file_info.clone());
        return product.eval(ctx);
    }
    Ok(Negative {
        meta: negative.meta.clone(),
        value: Box::new(negative.value.eval(ctx)?),
    }
    .into())
}

pub(super) fn eval_paren(paren: &Paren, ctx: &mut EvalContext) -> EvalResult<Node> {
    Ok(Paren {
        meta: paren.meta.clone(),
        value: Box::new(paren.value.eval(ctx)?),
    }
    .into())
}
