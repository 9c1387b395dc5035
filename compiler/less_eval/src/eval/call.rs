//! Function calls.

use less_diagnostic::{errors, LessError};
use less_ir::output::format_number;
use less_ir::{Anonymous, Call, Node};

use super::Eval;
use crate::context::EvalContext;
use crate::functions::{CallSite, FunctionCaller, FunctionValue};
use crate::EvalResult;

/// `calc()` turns math off for its own arguments; a call nested inside it
/// turns math back on but still counts as being inside calc.
pub(super) fn eval_call(call: &Call, ctx: &mut EvalContext) -> EvalResult<Node> {
    let is_calc = call.is_calc();
    ctx.with_math_on(!is_calc, |ctx| {
        if is_calc || ctx.in_calc() {
            ctx.with_calc(|ctx| dispatch(call, ctx))
        } else {
            dispatch(call, ctx)
        }
    })
}

fn dispatch(call: &Call, ctx: &mut EvalContext) -> EvalResult<Node> {
    let site = CallSite {
        index: call.meta.index,
        file_info: call.meta.file_info.clone(),
    };
    let caller = FunctionCaller::new(&call.name, ctx, site);
    if caller.is_valid() {
        tracing::trace!(function = %call.name, "dispatching function call");
        let value = caller
            .call(ctx, &call.args)
            .map_err(|err| wrap_function_error(call, err))?;
        if let Some(node) = into_node(value) {
            return Ok(node.located(call.meta.index, call.meta.file_info.clone()));
        }
    }

    let args = call
        .args
        .iter()
        .map(|arg| arg.eval(ctx))
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Call {
        meta: call.meta.clone(),
        name: call.name.clone(),
        args,
    }
    .into())
}

/// Errors that already know their line pass through; anything else is
/// reported at the call.
fn wrap_function_error(call: &Call, err: LessError) -> LessError {
    if err.has_line_column() {
        return err;
    }
    let wrapped = errors::function_failed(&call.name, &err.message);
    call.meta.locate(LessError::new(err.kind, wrapped.message))
}

fn into_node(value: FunctionValue) -> Option<Node> {
    let text = match value {
        FunctionValue::Node(node) => return Some(node),
        FunctionValue::Nothing => return None,
        FunctionValue::Bool(_) => String::new(),
        FunctionValue::Number(number) if number == 0.0 => String::new(),
        FunctionValue::Number(number) => format_number(number, None),
        FunctionValue::Text(text) => text,
    };
    Some(Anonymous::new(text).into())
}
