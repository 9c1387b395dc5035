//! Mixins: argument matching, parameter binding and expansion.
//!
//! A definition is expanded in three steps. [`match_args`] decides from the
//! argument count and pattern parameters whether a definition can take a
//! call at all, [`match_condition`] runs its guard against a trial binding,
//! and [`eval_call`] binds the parameters for real and evaluates the body.
//! Choosing among several matching definitions is [`eval_mixin_call`]'s
//! job.

use std::rc::Rc;

use less_diagnostic::errors;
use less_ir::{
    Declaration, DetachedRuleset, Expression, FrameChain, MixinArg, MixinDefinition, Node,
    Ruleset,
};

use crate::context::EvalContext;
use crate::eval::{eval_ruleset, make_important, Eval};
use crate::EvalResult;

mod call;

pub use call::{eval_mixin_call, format_call};

/// Parameters bound for one expansion.
#[derive(Clone, Debug)]
pub struct Bindings {
    /// A selector-less ruleset declaring one variable per parameter.
    pub frame: Ruleset,
    /// Every argument value in parameter order, for `@arguments`.
    pub arguments: Vec<Node>,
}

/// Arguments that count towards the required parameters: positional ones
/// and named ones that do not name an optional parameter.
fn required_count(definition: &MixinDefinition, args: &[MixinArg]) -> usize {
    args.iter()
        .filter(|arg| match &arg.name {
            Some(name) => !definition.optional_parameters.contains(name),
            None => true,
        })
        .count()
}

/// Whether `args` fit the definition's arity and its pattern parameters.
pub fn match_args(
    definition: &MixinDefinition,
    args: &[MixinArg],
    ctx: &mut EvalContext,
) -> EvalResult<bool> {
    let required = required_count(definition, args);
    if definition.variadic {
        if required + 1 < definition.required {
            return Ok(false);
        }
    } else if required < definition.required || args.len() > definition.params.len() {
        return Ok(false);
    }

    let css = ctx.options().css_context();
    for (param, arg) in definition
        .params
        .iter()
        .zip(args)
        .take(required.min(definition.arity))
    {
        let (None, Some(pattern), false) = (&param.name, &param.value, param.variadic) else {
            continue;
        };
        let expected = pattern.eval(ctx)?.to_css(&css)?;
        let supplied = arg.value.eval(ctx)?.to_css(&css)?;
        if expected != supplied {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Frames a definition expands in: its closure, then the caller's scope.
fn mixin_frames(definition: &MixinDefinition, ctx: &EvalContext) -> FrameChain {
    match &definition.frames {
        Some(closure) => ctx.frames().prepended(closure),
        None => ctx.frames().clone(),
    }
}

/// Run the guard against a trial binding of `args`. A definition without a
/// guard always matches.
pub fn match_condition(
    definition: &MixinDefinition,
    args: &[MixinArg],
    ctx: &mut EvalContext,
) -> EvalResult<bool> {
    let Some(condition) = &definition.condition else {
        return Ok(true);
    };
    let frames = mixin_frames(definition, ctx);
    let bindings = eval_params(definition, args, &frames, ctx)?;
    let frames = frames.prepended(&FrameChain::from_innermost_first([Rc::new(bindings.frame)]));
    let outcome = ctx.with_frames(frames, |ctx| condition.eval(ctx))?;
    Ok(outcome.is_truthy())
}

/// Bind `args` to the definition's parameters.
///
/// Named arguments bind first; positional ones fill the remaining
/// parameters in order, and a trailing variadic parameter collects the
/// rest. Defaults are evaluated in `mixin_frames` with the bindings made so
/// far in front, so a default can refer to earlier parameters.
pub fn eval_params(
    definition: &MixinDefinition,
    args: &[MixinArg],
    mixin_frames: &FrameChain,
    ctx: &mut EvalContext,
) -> EvalResult<Bindings> {
    let params = &definition.params;
    let mut bound: Vec<Option<Node>> = vec![None; params.len().max(args.len())];
    let mut declarations: Vec<Node> = Vec::with_capacity(params.len() + 1);
    let mut positional: Vec<&MixinArg> = Vec::with_capacity(args.len());

    for arg in args {
        let Some(name) = &arg.name else {
            positional.push(arg);
            continue;
        };
        let slot = params
            .iter()
            .zip(&bound)
            .position(|(param, bound)| bound.is_none() && param.name.as_ref() == Some(name))
            .ok_or_else(|| errors::named_argument_not_found(&definition.name, name))?;
        let value = arg.value.eval(ctx)?;
        declarations.push(Declaration::new(name.clone(), value.clone()).into());
        if let Some(entry) = bound.get_mut(slot) {
            *entry = Some(value);
        }
    }

    let mut next = 0;
    for (index, param) in params.iter().enumerate() {
        if bound.get(index).is_some_and(Option::is_some) {
            continue;
        }
        if param.variadic {
            let rest = positional
                .get(next..)
                .unwrap_or_default()
                .iter()
                .map(|arg| arg.value.eval(ctx))
                .collect::<EvalResult<Vec<_>>>()?;
            if let Some(name) = &param.name {
                let value = Node::from(Expression::new(rest.clone())).eval(ctx)?;
                declarations.push(Declaration::new(name.clone(), value).into());
            }
            for (offset, value) in rest.into_iter().enumerate() {
                if let Some(entry) = bound.get_mut(next + offset) {
                    *entry = Some(value);
                }
            }
        } else if let Some(name) = &param.name {
            let value = match positional.get(next) {
                Some(arg) => argument_value(&arg.value, ctx)?,
                None => match &param.value {
                    Some(default) => {
                        let partial = Rc::new(Ruleset::bindings(declarations.clone()));
                        let frames = mixin_frames.prepended(&FrameChain::from_innermost_first([partial]));
                        ctx.with_frames(frames, |ctx| default.eval(ctx))?
                    }
                    None => {
                        return Err(errors::wrong_argument_count(
                            &definition.name,
                            args.len(),
                            definition.arity,
                        ));
                    }
                },
            };
            declarations.push(Declaration::new(name.clone(), value.clone()).into());
            if let Some(entry) = bound.get_mut(index) {
                *entry = Some(value);
            }
        }
        next += 1;
    }

    Ok(Bindings {
        frame: Ruleset::bindings(declarations),
        arguments: bound.into_iter().flatten().collect(),
    })
}

/// Rules passed as an argument become a detached ruleset.
fn argument_value(value: &Node, ctx: &mut EvalContext) -> EvalResult<Node> {
    match value {
        Node::Array(array) => {
            let ruleset = Ruleset::bindings(array.items.clone());
            Ok(DetachedRuleset::new(Rc::new(ruleset)).into())
        }
        other => other.eval(ctx),
    }
}

/// Expand the definition for `args`.
///
/// The body is evaluated with the frames, innermost first: the definition
/// itself, the parameter bindings (plus `@arguments`), the definition's
/// closure, then the caller's scope.
pub fn eval_call(
    definition: &MixinDefinition,
    args: &[MixinArg],
    important: bool,
    ctx: &mut EvalContext,
) -> EvalResult<Ruleset> {
    let frames = mixin_frames(definition, ctx);
    let Bindings {
        frame: mut bindings,
        arguments,
    } = eval_params(definition, args, &frames, ctx)?;
    let all_arguments = Node::from(Expression::new(arguments)).eval(ctx)?;
    bindings
        .rules
        .insert(0, Declaration::new("@arguments", all_arguments).into());

    let origin = definition.original.unwrap_or(definition.meta.id);
    let definition_frame = Ruleset {
        meta: definition.meta.clone(),
        original: definition.original,
        ..Ruleset::bindings(definition.rules.clone())
    };
    let frames = frames.prepended(&FrameChain::from_innermost_first([
        Rc::new(definition_frame),
        Rc::new(bindings),
    ]));

    let mut body = Ruleset::bindings(definition.rules.clone());
    body.original = Some(origin);
    let mut ruleset = ctx.with_frames(frames, |ctx| eval_ruleset(&body, ctx))?;
    if important {
        ruleset.rules = make_important(ruleset.rules);
    }
    Ok(ruleset)
}
