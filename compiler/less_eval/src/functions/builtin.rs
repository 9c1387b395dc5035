//! Builtin functions every registry starts from.

#![allow(
    clippy::needless_pass_by_value,
    reason = "builtins share the registry's owned-argument signature"
)]

use less_diagnostic::errors;
use less_ir::{Anonymous, Dimension, FileInfo, Keyword, Node, Quoted, Url};

use super::{CallSite, FunctionDef, FunctionRegistry, FunctionValue};
use crate::context::EvalContext;
use crate::environment::get_file_manager;
use crate::eval::Eval;
use crate::options::RewriteUrls;
use crate::EvalResult;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.add_multiple([
        ("if", FunctionDef::raw(if_function)),
        ("isdefined", FunctionDef::raw(is_defined)),
        ("default", FunctionDef::raw(default_function)),
        ("_self", FunctionDef::evaluated(self_function)),
        ("boolean", FunctionDef::evaluated(boolean)),
        ("e", FunctionDef::evaluated(escape)),
        ("isnumber", FunctionDef::evaluated(is_number)),
        ("isstring", FunctionDef::evaluated(is_string)),
        ("iskeyword", FunctionDef::evaluated(is_keyword)),
        ("isunit", FunctionDef::evaluated(is_unit)),
        ("length", FunctionDef::evaluated(length)),
        ("extract", FunctionDef::evaluated(extract)),
        ("percentage", FunctionDef::evaluated(percentage)),
        ("unit", FunctionDef::evaluated(unit)),
        ("data-uri", FunctionDef::evaluated(data_uri)),
    ]);
}

fn keyword(value: bool) -> EvalResult<FunctionValue> {
    Ok(Node::from(Keyword::from_bool(value)).into())
}

/// Items of a list value; anything else is a one-item list.
fn list_items(node: &Node) -> Vec<Node> {
    match node.value_items() {
        Some(items) => items.to_vec(),
        None => vec![node.clone()],
    }
}

fn if_function(ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let mut args = args.into_iter();
    let (Some(condition), Some(when_true)) = (args.next(), args.next()) else {
        return Err(errors::invalid_function_argument("if", "a condition and a value"));
    };
    if condition.eval(ctx)?.is_truthy() {
        return Ok(when_true.eval(ctx)?.into());
    }
    match args.next() {
        Some(when_false) => Ok(when_false.eval(ctx)?.into()),
        None => Ok(Node::from(Anonymous::empty()).into()),
    }
}

fn is_defined(ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let defined = match args.first() {
        Some(variable) => variable.eval(ctx).is_ok(),
        None => false,
    };
    keyword(defined)
}

/// `true`/`false` while mixin guards are being grouped; otherwise the call
/// stays literal.
fn default_function(
    ctx: &mut EvalContext,
    _site: &CallSite,
    _args: Vec<Node>,
) -> EvalResult<FunctionValue> {
    match ctx.default_value() {
        Some(value) => keyword(value),
        None => Ok(FunctionValue::Nothing),
    }
}

fn self_function(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    Ok(args
        .into_iter()
        .next()
        .map_or(FunctionValue::Nothing, FunctionValue::Node))
}

fn boolean(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    keyword(args.first().is_some_and(Node::is_truthy))
}

fn escape(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let Some(value) = args.first() else {
        return Err(errors::invalid_function_argument("e", "a string"));
    };
    Ok(Node::from(Anonymous::new(value.plain_text())).into())
}

fn is_number(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    keyword(matches!(args.first(), Some(Node::Dimension(_))))
}

fn is_string(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    keyword(matches!(args.first(), Some(Node::Quoted(_))))
}

fn is_keyword(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    keyword(matches!(args.first(), Some(Node::Keyword(_))))
}

fn is_unit(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let unit = match args.get(1) {
        Some(Node::Keyword(keyword)) => keyword.value.clone(),
        Some(Node::Quoted(quoted)) => quoted.value.clone(),
        Some(Node::Anonymous(anonymous)) => anonymous.value.clone(),
        _ => {
            return Err(errors::invalid_function_argument("isunit", "a unit or a string as its second argument"));
        }
    };
    keyword(matches!(
        args.first(),
        Some(Node::Dimension(dimension)) if dimension.unit.to_string().eq_ignore_ascii_case(&unit)
    ))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "list lengths are far below 2^52"
)]
fn length(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let count = args.first().map_or(0, |list| list_items(list).len());
    Ok(Node::from(Dimension::new(count as f64, "")).into())
}

/// One-based index into a list. Out of range or fractional indices leave
/// the call literal.
fn extract(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let (Some(list), Some(Node::Dimension(index))) = (args.first(), args.get(1)) else {
        return Ok(FunctionValue::Nothing);
    };
    let position = index.value - 1.0;
    if position < 0.0 || position.fract() != 0.0 {
        return Ok(FunctionValue::Nothing);
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "checked non-negative and integral above"
    )]
    let position = position as usize;
    Ok(list_items(list)
        .into_iter()
        .nth(position)
        .map_or(FunctionValue::Nothing, FunctionValue::Node))
}

fn percentage(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    match args.first() {
        Some(Node::Dimension(number)) => Ok(Node::from(Dimension::new(number.value * 100.0, "%")).into()),
        _ => Err(errors::invalid_function_argument("percentage", "a number")),
    }
}

fn unit(_ctx: &mut EvalContext, _site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let Some(Node::Dimension(number)) = args.first() else {
        return Err(errors::invalid_function_argument("unit", "a number as its first argument"));
    };
    let unit = match args.get(1) {
        Some(Node::Keyword(keyword)) => keyword.value.clone(),
        Some(Node::Quoted(quoted)) => quoted.value.clone(),
        Some(other) => other.plain_text(),
        None => String::new(),
    };
    Ok(Node::from(Dimension::new(number.value, &unit)).into())
}

/// Inline a file as a `data:` url. Anything the environment cannot provide
/// degrades to a plain `url()` of the path.
fn data_uri(ctx: &mut EvalContext, site: &CallSite, args: Vec<Node>) -> EvalResult<FunctionValue> {
    let (mime_node, path_node) = match args.as_slice() {
        [path] => (None, path),
        [mime, path, ..] => (Some(mime), path),
        [] => return Err(errors::invalid_function_argument("data-uri", "a file path")),
    };
    let Node::Quoted(quoted) = path_node else {
        return fallback_url(ctx, site, path_node);
    };
    let (path, fragment) = match quoted.value.find('#') {
        Some(start) => quoted.value.split_at(start),
        None => (quoted.value.as_str(), ""),
    };
    let current_directory = site
        .file_info
        .as_deref()
        .map(|info| current_directory(info, ctx.options().rewrite_urls))
        .unwrap_or_default();

    let Some(manager) = get_file_manager(ctx.environment(), path, &current_directory, ctx.plugins()) else {
        tracing::warn!(path, "no file manager for data-uri, falling back to url()");
        return fallback_url(ctx, site, path_node);
    };

    let environment = ctx.environment();
    let (mimetype, use_base64) = match mime_node {
        Some(mime) => {
            let mime = mime.plain_text();
            let base64 = mime.ends_with(";base64");
            (mime, base64)
        }
        None => {
            let mime = environment.mime_lookup(path).unwrap_or_default();
            let base64 = mime != "image/svg+xml" && !is_text_charset(environment.charset_lookup(&mime));
            let mime = if base64 { format!("{mime};base64") } else { mime };
            (mime, base64)
        }
    };

    let Some(file) = manager.load_file_sync(path, &current_directory) else {
        tracing::warn!(path, "could not load file for data-uri, falling back to url()");
        return fallback_url(ctx, site, path_node);
    };
    if file.contents.is_empty() {
        return fallback_url(ctx, site, path_node);
    }

    let encoded = if use_base64 {
        match environment.encode_base64(&file.contents) {
            Some(encoded) => encoded,
            None => {
                tracing::warn!(path, "environment cannot base64-encode, falling back to url()");
                return fallback_url(ctx, site, path_node);
            }
        }
    } else {
        encode_uri_component(&file.contents)
    };

    let mut url = Url::new(Quoted::double(format!("data:{mimetype},{encoded}{fragment}")).into());
    url.is_evald = true;
    Ok(Node::from(url).into())
}

fn is_text_charset(charset: Option<String>) -> bool {
    matches!(charset.as_deref(), Some("US-ASCII" | "UTF-8"))
}

fn current_directory(info: &FileInfo, rewrite_urls: RewriteUrls) -> String {
    if rewrite_urls == RewriteUrls::Off {
        info.entry_path.clone()
    } else {
        info.current_directory.clone()
    }
}

fn fallback_url(ctx: &mut EvalContext, site: &CallSite, path: &Node) -> EvalResult<FunctionValue> {
    let url = Node::from(Url::new(path.clone())).located(site.index, site.file_info.clone());
    Ok(url.eval(ctx)?.into())
}

/// Percent-encode everything outside the URI component safe set.
fn encode_uri_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
