//! Mixin call dispatch: finding definitions, grouping them by `default()`,
//! and concatenating what the chosen ones produce.

use std::rc::Rc;

use less_diagnostic::errors;
use less_ir::{
    Array, CssContext, MixinArg, MixinCall, MixinDefinition, Node, Ruleset, Selector,
};

use super::{eval_call, match_args, match_condition};
use crate::context::EvalContext;
use crate::eval::{eval_selector, Eval};
use crate::EvalResult;

/// A rule whose selector path matches a call, with the namespaces passed
/// through to reach it.
#[derive(Clone, Debug)]
struct Found {
    rule: Node,
    path: Vec<Node>,
}

/// How a candidate's guards react to `default()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DefaultGroup {
    /// Passes whatever `default()` returns.
    Unaffected,
    /// Passes only when `default()` is true.
    WhenDefault,
    /// Passes only when `default()` is false.
    UnlessDefault,
}

fn rule_selectors(rule: &Node) -> &[Selector] {
    match rule {
        Node::Ruleset(ruleset) => &ruleset.selectors,
        Node::MixinDefinition(definition) => &definition.selectors,
        _ => &[],
    }
}

/// Whether a namespace may be entered: it has to accept a call without
/// arguments.
fn accepts_no_args(rule: &Node, ctx: &mut EvalContext) -> EvalResult<bool> {
    match rule {
        Node::MixinDefinition(definition) => match_args(definition, &[], ctx),
        _ => Ok(true),
    }
}

/// Rules in `rules` matching `selector`. A match on a prefix of the selector
/// descends into that namespace with the rest of it.
fn find(rules: &[Node], selector: &Selector, ctx: &mut EvalContext) -> EvalResult<Vec<Found>> {
    let mut found = Vec::new();
    for rule in rules
        .iter()
        .filter(|rule| matches!(rule, Node::Ruleset(_) | Node::MixinDefinition(_)))
    {
        let Some(matched) = rule_selectors(rule)
            .iter()
            .map(|candidate| selector.match_prefix(candidate))
            .find(|matched| *matched > 0)
        else {
            continue;
        };
        if selector.elements.len() == matched {
            found.push(Found {
                rule: rule.clone(),
                path: Vec::new(),
            });
            continue;
        }
        if !accepts_no_args(rule, ctx)? {
            continue;
        }
        let rest = Selector::new(selector.elements.get(matched..).unwrap_or_default().to_vec());
        for mut inner in find(rule.rules().unwrap_or_default(), &rest, ctx)? {
            inner.path.push(rule.clone());
            found.push(inner);
        }
    }
    Ok(found)
}

/// A ruleset being evaluated must not expand into itself.
fn is_recursive(rule: &Node, frames: &[Rc<Ruleset>]) -> bool {
    match rule {
        Node::Ruleset(ruleset) => frames
            .iter()
            .any(|frame| frame.origin_id() == ruleset.origin_id()),
        _ => false,
    }
}

fn candidate_matches_args(rule: &Node, args: &[MixinArg], ctx: &mut EvalContext) -> EvalResult<bool> {
    match rule {
        Node::MixinDefinition(definition) => match_args(definition, args, ctx),
        _ => Ok(args.is_empty()),
    }
}

/// The guard of a ruleset is the condition on its last selector.
fn ruleset_condition(ruleset: &Ruleset, ctx: &mut EvalContext) -> EvalResult<bool> {
    let Some(last) = ruleset.selectors.last() else {
        return Ok(true);
    };
    if !last.evald_condition {
        return Ok(false);
    }
    match &last.condition {
        Some(condition) => Ok(condition.eval(ctx)?.is_truthy()),
        None => Ok(true),
    }
}

fn rule_condition(rule: &Node, args: &[MixinArg], ctx: &mut EvalContext) -> EvalResult<bool> {
    match rule {
        Node::MixinDefinition(definition) => match_condition(definition, args, ctx),
        Node::Ruleset(ruleset) => ruleset_condition(ruleset, ctx),
        _ => Ok(true),
    }
}

fn passes_guards(found: &Found, args: &[MixinArg], ctx: &mut EvalContext) -> EvalResult<bool> {
    for namespace in &found.path {
        if !rule_condition(namespace, &[], ctx)? {
            return Ok(false);
        }
    }
    rule_condition(&found.rule, args, ctx)
}

/// Evaluate the guards once with `default()` false and once with it true.
/// `None` when they fail both times.
fn default_group(
    found: &Found,
    args: &[MixinArg],
    ctx: &mut EvalContext,
) -> EvalResult<Option<DefaultGroup>> {
    let unless_default = ctx.with_default_value(Some(false), |ctx| passes_guards(found, args, ctx))?;
    let when_default = ctx.with_default_value(Some(true), |ctx| passes_guards(found, args, ctx))?;
    Ok(match (unless_default, when_default) {
        (true, true) => Some(DefaultGroup::Unaffected),
        (false, true) => Some(DefaultGroup::WhenDefault),
        (true, false) => Some(DefaultGroup::UnlessDefault),
        (false, false) => None,
    })
}

/// Evaluate the arguments; `...` spreads a list into positional arguments.
fn eval_args(call: &MixinCall, ctx: &mut EvalContext) -> EvalResult<Vec<MixinArg>> {
    let mut args = Vec::with_capacity(call.args.len());
    for arg in &call.args {
        let value = arg.value.eval(ctx)?;
        if arg.expand {
            if let Some(items) = value.value_items() {
                args.extend(items.iter().cloned().map(MixinArg::positional));
                continue;
            }
        }
        args.push(MixinArg {
            name: arg.name.clone(),
            value,
            expand: false,
        });
    }
    Ok(args)
}

/// `selector(name:value, value)`, as shown in dispatch errors.
pub fn format_call(selector: &Selector, args: &[MixinArg], css: &CssContext) -> String {
    let selector = Node::Selector(selector.clone())
        .to_css(css)
        .unwrap_or_default();
    let args: Vec<String> = args
        .iter()
        .map(|arg| {
            let value = arg.value.to_css(css).unwrap_or_else(|_| "???".to_string());
            match &arg.name {
                Some(name) => format!("{name}:{value}"),
                None => value,
            }
        })
        .collect();
    format!("{}({})", selector.trim(), args.join(", "))
}

/// A plain ruleset called as a mixin behaves like a definition without
/// parameters that remembers where it came from.
fn as_definition(rule: &Node) -> Option<Rc<MixinDefinition>> {
    match rule {
        Node::MixinDefinition(definition) => Some(Rc::clone(definition)),
        Node::Ruleset(ruleset) => {
            let mut definition = MixinDefinition::new("", Vec::new(), ruleset.rules.clone(), None);
            definition.original = Some(ruleset.origin_id());
            definition.meta.visibility = ruleset.meta.visibility;
            Some(Rc::new(definition))
        }
        _ => None,
    }
}

/// Expand a mixin call into the rules of every chosen definition.
///
/// Frames are searched innermost first and the first frame with a
/// definition taking the arguments decides the result. Among its
/// candidates, those whose guards ignore `default()` are always expanded;
/// the ones depending on it are expanded only as a fallback, and more than
/// one such fallback is ambiguous.
#[tracing::instrument(level = "debug", skip_all, fields(args = call.args.len()))]
pub fn eval_mixin_call(call: &MixinCall, ctx: &mut EvalContext) -> EvalResult<Node> {
    ctx.check_mixin_depth()?;
    let selector = eval_selector(&call.selector, ctx)?;
    let args = eval_args(call, ctx)?;
    let frames: Vec<Rc<Ruleset>> = ctx.frames().iter().cloned().collect();
    let mut found_any = false;

    for frame in &frames {
        let found = find(&frame.rules, &selector, ctx)?;
        if found.is_empty() {
            continue;
        }
        found_any = true;

        let mut matched = false;
        let mut candidates: Vec<(Found, DefaultGroup)> = Vec::new();
        for candidate in found {
            if is_recursive(&candidate.rule, &frames) {
                tracing::trace!("skipping ruleset that is being evaluated");
                continue;
            }
            if !candidate_matches_args(&candidate.rule, &args, ctx)? {
                continue;
            }
            matched = true;
            if let Some(group) = default_group(&candidate, &args, ctx)? {
                candidates.push((candidate, group));
            }
        }
        if !matched {
            continue;
        }
        tracing::debug!(candidates = candidates.len(), "mixin candidates");

        let count = |wanted: DefaultGroup| candidates.iter().filter(|(_, group)| *group == wanted).count();
        let fallback = if count(DefaultGroup::Unaffected) > 0 {
            DefaultGroup::UnlessDefault
        } else {
            if count(DefaultGroup::WhenDefault) + count(DefaultGroup::UnlessDefault) > 1 {
                let css = ctx.options().css_context();
                return Err(errors::ambiguous_default(&format_call(&selector, &args, &css)));
            }
            DefaultGroup::WhenDefault
        };

        let mut rules = Vec::new();
        for (candidate, group) in &candidates {
            if *group != DefaultGroup::Unaffected && *group != fallback {
                continue;
            }
            let Some(definition) = as_definition(&candidate.rule) else {
                continue;
            };
            let expanded = ctx.with_mixin_call(|ctx| eval_call(&definition, &args, call.important, ctx))?;
            for mut rule in expanded.rules {
                if call.meta.visibility.blocks_visibility() {
                    rule.meta_mut().visibility.add_visibility_block();
                }
                rules.push(rule);
            }
        }
        return Ok(Array::new(rules).into());
    }

    let css = ctx.options().css_context();
    if found_any {
        Err(errors::no_matching_definition(&format_call(&selector, &args, &css)))
    } else {
        let selector = Node::Selector(selector).to_css(&css).unwrap_or_default();
        Err(errors::undefined_mixin(selector.trim()))
    }
}
