//! Declarations, selectors and the rule containers.

use std::rc::Rc;

use less_diagnostic::errors;
use less_ir::{Declaration, DetachedRuleset, MixinDefinition, Node, Ruleset, Selector};

use super::{eval_element, Eval};
use crate::context::EvalContext;
use crate::options::MathMode;
use crate::EvalResult;

pub(super) fn eval_declaration(declaration: &Declaration, ctx: &mut EvalContext) -> EvalResult<Node> {
    let evaluate = |ctx: &mut EvalContext| {
        let (value, important) = ctx.with_important_scope(|ctx| declaration.value.eval(ctx));
        value.map(|value| (value, important))
    };
    // `font: 12px/1.5` is a shorthand, not a division.
    let (value, important) =
        if !declaration.variable && declaration.name == "font" && ctx.math() == MathMode::Always {
            ctx.with_math_mode(MathMode::ParensDivision, evaluate)?
        } else {
            evaluate(ctx)?
        };

    if !declaration.variable && matches!(value, Node::DetachedRuleset(_)) {
        return Err(errors::ruleset_on_property());
    }
    Ok(Declaration {
        meta: declaration.meta.clone(),
        name: declaration.name.clone(),
        value: Box::new(value),
        important: declaration.important || important,
        merge: declaration.merge,
        inline: declaration.inline,
        variable: declaration.variable,
    }
    .into())
}

/// Evaluate the element values and the guard. A selector without a guard
/// keeps its previous outcome.
pub(crate) fn eval_selector(selector: &Selector, ctx: &mut EvalContext) -> EvalResult<Selector> {
    let evald_condition = match &selector.condition {
        Some(condition) => condition.eval(ctx)?.is_truthy(),
        None => selector.evald_condition,
    };
    let elements = selector
        .elements
        .iter()
        .map(|element| eval_element(element, ctx))
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Selector {
        meta: selector.meta.clone(),
        elements,
        condition: None,
        evald_condition,
    })
}

/// Capture the current frames the first time the value is evaluated.
pub(super) fn eval_detached(detached: &DetachedRuleset, ctx: &EvalContext) -> DetachedRuleset {
    DetachedRuleset {
        meta: detached.meta.clone(),
        ruleset: Rc::clone(&detached.ruleset),
        frames: Some(detached.frames.clone().unwrap_or_else(|| ctx.frames().clone())),
    }
}

/// Evaluate the rules of a detached ruleset. Its captured frames are
/// searched before the caller's.
pub(crate) fn call_detached(detached: &DetachedRuleset, ctx: &mut EvalContext) -> EvalResult<Ruleset> {
    let frames = match &detached.frames {
        Some(captured) => ctx.frames().prepended(captured),
        None => ctx.frames().clone(),
    };
    ctx.with_frames(frames, |ctx| eval_ruleset(&detached.ruleset, ctx))
}

/// A definition evaluates to itself with its closure captured.
pub(super) fn eval_mixin_definition(definition: &Rc<MixinDefinition>, ctx: &EvalContext) -> Node {
    if definition.frames.is_some() {
        return Node::MixinDefinition(Rc::clone(definition));
    }
    Node::from(MixinDefinition {
        frames: Some(ctx.frames().clone()),
        ..(**definition).clone()
    })
}

/// Evaluate a ruleset into a new one.
///
/// The result gets a fresh id and remembers where it came from, so mixin
/// lookup can recognize a ruleset calling itself. While the body is being
/// evaluated the ruleset is the innermost frame; the frame is refreshed
/// whenever rules are spliced in or a nested ruleset finishes.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(selectors = ruleset.selectors.len(), rules = ruleset.rules.len())
)]
pub fn eval_ruleset(ruleset: &Ruleset, ctx: &mut EvalContext) -> EvalResult<Ruleset> {
    let selectors = ruleset
        .selectors
        .iter()
        .map(|selector| eval_selector(selector, ctx))
        .collect::<EvalResult<Vec<_>>>()?;
    let passes = selectors.is_empty() || selectors.iter().any(|selector| selector.evald_condition);
    if !passes {
        tracing::trace!("ruleset guard failed, body dropped");
    }

    let mut evaluated = Ruleset {
        meta: ruleset.meta.derive(),
        selectors,
        rules: if passes { ruleset.rules.clone() } else { Vec::new() },
        root: ruleset.root,
        allow_imports: ruleset.allow_imports,
        original: Some(ruleset.origin_id()),
    };
    let frame = Rc::new(evaluated.clone());
    ctx.with_frame(frame, |ctx| eval_rules(&mut evaluated, ctx))?;
    Ok(evaluated)
}

fn is_eval_first(rule: &Node) -> bool {
    matches!(rule, Node::MixinDefinition(_) | Node::DetachedRuleset(_))
}

fn is_variable_declaration(rule: &Node) -> bool {
    matches!(rule, Node::Declaration(declaration) if declaration.variable)
}

fn eval_rules(ruleset: &mut Ruleset, ctx: &mut EvalContext) -> EvalResult<()> {
    // Definitions first, so their closures see this frame.
    for rule in &mut ruleset.rules {
        if is_eval_first(rule) {
            *rule = rule.eval(ctx)?;
        }
    }
    ctx.refresh_innermost(Rc::new(ruleset.clone()));

    expand_calls(ruleset, ctx)?;

    for index in 0..ruleset.rules.len() {
        let Some(rule) = ruleset.rules.get(index) else {
            break;
        };
        if is_eval_first(rule) {
            continue;
        }
        let evaluated = rule.eval(ctx)?;
        let nested = matches!(evaluated, Node::Ruleset(_));
        if let Some(slot) = ruleset.rules.get_mut(index) {
            *slot = evaluated;
        }
        if nested {
            ctx.refresh_innermost(Rc::new(ruleset.clone()));
        }
    }

    let mut rules = Vec::with_capacity(ruleset.rules.len());
    less_ir::visitor::flatten(std::mem::take(&mut ruleset.rules), &mut rules);
    ruleset.rules = inline_parent_rulesets(rules);
    Ok(())
}

/// Replace mixin calls and variable calls by the rules they produce.
fn expand_calls(ruleset: &mut Ruleset, ctx: &mut EvalContext) -> EvalResult<()> {
    let mut index = 0;
    while let Some(rule) = ruleset.rules.get(index) {
        let produced: Vec<Node> = match rule {
            // Variables the ruleset declares itself win over the mixin's.
            Node::MixinCall(_) => into_rules(rule.eval(ctx)?)
                .into_iter()
                .filter(|produced| match produced {
                    Node::Declaration(declaration) if declaration.variable => {
                        ruleset.variable(&declaration.name).is_none()
                    }
                    _ => true,
                })
                .collect(),
            Node::VariableCall(_) => into_rules(rule.eval(ctx)?)
                .into_iter()
                .filter(|produced| !is_variable_declaration(produced))
                .collect(),
            _ => {
                index += 1;
                continue;
            }
        };
        let count = produced.len();
        ruleset.rules.splice(index..=index, produced);
        index += count;
        ctx.refresh_innermost(Rc::new(ruleset.clone()));
    }
    Ok(())
}

fn into_rules(node: Node) -> Vec<Node> {
    match node {
        Node::Array(array) => array.items,
        other => vec![other],
    }
}

fn is_just_parent_selector(selector: &Selector) -> bool {
    match selector.elements.as_slice() {
        [element] => {
            element.value.plain_text() == "&" && element.combinator.is_empty_or_whitespace()
        }
        _ => false,
    }
}

/// Fold `& { ... }` children into their parent. Their variables stay
/// behind; everything else inherits the child's visibility.
fn inline_parent_rulesets(rules: Vec<Node>) -> Vec<Node> {
    let mut inlined = Vec::with_capacity(rules.len());
    for rule in rules {
        match rule {
            Node::Ruleset(child)
                if matches!(child.selectors.as_slice(), [selector] if is_just_parent_selector(selector)) =>
            {
                for sub_rule in child.rules.iter().filter(|sub_rule| !is_variable_declaration(sub_rule)) {
                    let mut sub_rule = sub_rule.clone();
                    sub_rule.meta_mut().visibility = child.meta.visibility;
                    inlined.push(sub_rule);
                }
            }
            other => inlined.push(other),
        }
    }
    inlined
}

/// Mark every declaration `!important`, recursing into nested rulesets.
pub(crate) fn make_important(rules: Vec<Node>) -> Vec<Node> {
    rules
        .into_iter()
        .map(|rule| match rule {
            Node::Declaration(mut declaration) => {
                declaration.important = true;
                Node::Declaration(declaration)
            }
            Node::Ruleset(ruleset) => {
                let mut ruleset = (*ruleset).clone();
                ruleset.rules = make_important(ruleset.rules);
                ruleset.into()
            }
            other => other,
        })
        .collect()
}
