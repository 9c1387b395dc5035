//! Argument preparation and invocation for one function call.

use less_ir::{Expression, Node};

use super::{CallSite, FunctionDef, FunctionValue};
use crate::context::EvalContext;
use crate::eval::Eval;
use crate::EvalResult;

pub struct FunctionCaller {
    function: Option<FunctionDef>,
    site: CallSite,
}

impl FunctionCaller {
    pub fn new(name: &str, ctx: &EvalContext, site: CallSite) -> Self {
        FunctionCaller {
            function: ctx.functions().get(name).cloned(),
            site,
        }
    }

    /// Whether a function is registered under the call's name.
    pub fn is_valid(&self) -> bool {
        self.function.is_some()
    }

    /// Invoke the function. An unregistered name yields
    /// [`FunctionValue::Nothing`].
    pub fn call(&self, ctx: &mut EvalContext, args: &[Node]) -> EvalResult<FunctionValue> {
        let Some(function) = &self.function else {
            return Ok(FunctionValue::Nothing);
        };
        let args = if function.eval_args {
            args.iter()
                .map(|arg| arg.eval(ctx))
                .collect::<EvalResult<Vec<_>>>()?
        } else {
            args.to_vec()
        };
        (function.body)(ctx, &self.site, prepare_args(args))
    }
}

fn is_comment(node: &Node) -> bool {
    matches!(node, Node::Comment(_))
}

/// Drop comments and unwrap single-item expressions. A parenthesized
/// single division stays wrapped so it still prints with its parentheses.
fn prepare_args(args: Vec<Node>) -> Vec<Node> {
    args.into_iter()
        .filter(|arg| !is_comment(arg))
        .map(|arg| match arg {
            Node::Expression(expression) => {
                let items: Vec<Node> = expression
                    .value
                    .iter()
                    .filter(|item| !is_comment(item))
                    .cloned()
                    .collect();
                match items.as_slice() {
                    [Node::Operation(operation)] if expression.parens && operation.op == "/" => {
                        Node::Expression(expression)
                    }
                    [only] => only.clone(),
                    _ => Expression::new(items).into(),
                }
            }
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests;
