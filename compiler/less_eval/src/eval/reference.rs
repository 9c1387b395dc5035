//! Variables, properties and string interpolation.

use less_diagnostic::errors;
use less_ir::{
    Call, Declaration, Expression, MergeMode, Node, NodeMeta, Property, Quoted, Value, Variable,
};

use super::Eval;
use crate::context::EvalContext;
use crate::EvalResult;

pub(super) fn eval_variable(variable: &Variable, ctx: &mut EvalContext) -> EvalResult<Node> {
    let name = match variable.name.strip_prefix("@@") {
        Some(inner) => {
            let target = Variable {
                meta: variable.meta.derive(),
                name: format!("@{inner}"),
            };
            format!("@{}", Node::from(target).eval(ctx)?.plain_text())
        }
        None => variable.name.clone(),
    };

    ctx.guard(
        variable.meta.id,
        || errors::recursive_variable(&name),
        |ctx| {
            let declaration = ctx
                .frames()
                .frame_with_variable(&name)
                .and_then(|frame| frame.variable(&name).cloned())
                .ok_or_else(|| errors::undefined_variable(&name))?;
            tracing::trace!(name = %name, "resolved variable");
            ctx.guard(
                declaration.meta.id,
                || errors::recursive_variable(&name),
                |ctx| {
                    if declaration.important {
                        ctx.mark_important();
                    }
                    if ctx.in_calc() {
                        let wrapped = Call::new("_SELF", vec![(*declaration.value).clone()]);
                        return Node::from(wrapped).eval(ctx);
                    }
                    declaration.value.eval(ctx)
                },
            )
        },
    )
}

pub(super) fn eval_property(property: &Property, ctx: &mut EvalContext) -> EvalResult<Node> {
    let name = property.name.as_str();
    ctx.guard(
        property.meta.id,
        || errors::recursive_property(name),
        |ctx| {
            let declarations: Vec<Declaration> = ctx
                .frames()
                .frame_with_property(name)
                .map(|frame| frame.property(name).into_iter().cloned().collect())
                .unwrap_or_default();
            let Some(declaration) = merge_declarations(declarations).pop() else {
                return Err(errors::undefined_property(name));
            };
            ctx.guard(
                declaration.meta.id,
                || errors::recursive_property(name),
                |ctx| {
                    if declaration.important {
                        ctx.mark_important();
                    }
                    declaration.value.eval(ctx)
                },
            )
        },
    )
}

/// Fold the `+:` and `+_:` declarations into the first of them. `+` opens a
/// new comma-separated group, `+_` extends the current space-separated one,
/// and the folded declaration is important if any part was.
pub(crate) fn merge_declarations(declarations: Vec<Declaration>) -> Vec<Declaration> {
    let mut result = Vec::with_capacity(declarations.len());
    let mut groups: Vec<Vec<Node>> = vec![Vec::new()];
    let mut important = false;
    let mut first_merged = None;

    for declaration in declarations {
        let Some(mode) = declaration.merge else {
            result.push(declaration);
            continue;
        };
        if mode == MergeMode::Comma && groups.last().is_some_and(|group| !group.is_empty()) {
            groups.push(Vec::new());
        }
        if let Some(group) = groups.last_mut() {
            group.push((*declaration.value).clone());
        }
        important |= declaration.important;
        if first_merged.is_none() {
            first_merged = Some(result.len());
            result.push(declaration);
        }
    }

    if let Some(merged) = first_merged.and_then(|index| result.get_mut(index)) {
        let value = Value::new(
            groups
                .into_iter()
                .map(|group| Expression::new(group).into())
                .collect(),
        );
        let mut value = Node::from(value);
        value.set_parent(merged.meta.id);
        merged.value = Box::new(value);
        merged.important = important;
    }
    result
}

/// Replace `@{name}` with variable values, then `${name}` with property
/// values, each until the text stops changing.
pub(super) fn eval_quoted(quoted: &Quoted, ctx: &mut EvalContext) -> EvalResult<Node> {
    let value = replace_until_stable(&quoted.value, '@', ctx, &|name: &str, ctx: &mut EvalContext| {
        let variable = Variable {
            meta: located(&quoted.meta),
            name: format!("@{name}"),
        };
        interpolated_text(&Node::from(variable), ctx)
    })?;
    let value = replace_until_stable(&value, '$', ctx, &|name: &str, ctx: &mut EvalContext| {
        let property = Property {
            meta: located(&quoted.meta),
            name: format!("${name}"),
        };
        interpolated_text(&Node::from(property), ctx)
    })?;
    Ok(Quoted {
        meta: quoted.meta.clone(),
        quote: quoted.quote,
        value,
        escaped: quoted.escaped,
    }
    .into())
}

fn located(meta: &NodeMeta) -> NodeMeta {
    NodeMeta::at(meta.index, meta.file_info.clone())
}

/// Strings contribute their raw text; anything else its CSS.
fn interpolated_text(reference: &Node, ctx: &mut EvalContext) -> EvalResult<String> {
    match reference.eval(ctx)? {
        Node::Quoted(quoted) => Ok(quoted.value),
        other => other.to_css(&ctx.options().css_context()),
    }
}

type Resolve<'a> = dyn Fn(&str, &mut EvalContext) -> EvalResult<String> + 'a;

fn replace_until_stable(
    text: &str,
    sigil: char,
    ctx: &mut EvalContext,
    resolve: &Resolve<'_>,
) -> EvalResult<String> {
    let mut current = text.to_string();
    loop {
        let next = replace_once(&current, sigil, ctx, resolve)?;
        if next == current {
            return Ok(next);
        }
        current = next;
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

fn replace_once(
    text: &str,
    sigil: char,
    ctx: &mut EvalContext,
    resolve: &Resolve<'_>,
) -> EvalResult<String> {
    let open = format!("{sigil}{{");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(&open) {
        let (before, after) = rest.split_at(start);
        let after = &after[open.len()..];
        let name_len = after.bytes().take_while(|byte| is_name_byte(*byte)).count();
        out.push_str(before);
        if name_len > 0 && after[name_len..].starts_with('}') {
            out.push_str(&resolve(&after[..name_len], ctx)?);
            rest = &after[name_len + 1..];
        } else {
            out.push_str(&open);
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}
