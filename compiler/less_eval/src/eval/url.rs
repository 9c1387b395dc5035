//! `url()` rewriting.

use less_ir::{Node, Url};

use super::Eval;
use crate::context::{normalize_path, EvalContext};
use crate::EvalResult;

pub(super) fn eval_url(url: &Url, ctx: &mut EvalContext) -> EvalResult<Node> {
    let mut value = url.value.eval(ctx)?;
    if !url.is_evald {
        let rootpath = url
            .meta
            .file_info
            .as_deref()
            .map(|info| info.rootpath.as_str())
            .filter(|rootpath| !rootpath.is_empty())
            .unwrap_or(&ctx.options().rootpath)
            .to_string();
        // Runs under every policy; `Off` still resolves relative paths.
        if let Some((path, quoted)) = path_text(&mut value) {
            *path = if ctx.path_requires_rewrite(path) {
                let rootpath = if quoted { rootpath } else { escape_path(&rootpath) };
                ctx.rewrite_path(path, &rootpath)
            } else {
                normalize_path(path)
            };
        }
        let url_args = &ctx.options().url_args;
        if !url_args.is_empty() {
            if let Some((path, _)) = path_text(&mut value) {
                append_url_args(path, url_args);
            }
        }
    }
    Ok(Url {
        meta: url.meta.clone(),
        value: Box::new(value),
        is_evald: true,
    }
    .into())
}

/// The path text of a url value, and whether it was quoted.
fn path_text(value: &mut Node) -> Option<(&mut String, bool)> {
    match value {
        Node::Quoted(quoted) => Some((&mut quoted.value, true)),
        Node::Anonymous(anonymous) => Some((&mut anonymous.value, false)),
        Node::Keyword(keyword) => Some((&mut keyword.value, false)),
        _ => None,
    }
}

/// Characters that end an unquoted url are escaped with `\`.
fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '(' | ')' | '\'' | '"') || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `?args` or `&args`, placed before any fragment. `data:` uris are left
/// alone.
fn append_url_args(path: &mut String, url_args: &str) {
    if path.trim_start().starts_with("data:") {
        return;
    }
    let delimiter = if path.contains('?') { '&' } else { '?' };
    let args = format!("{delimiter}{url_args}");
    match path.find('#') {
        Some(fragment) => path.insert_str(fragment, &args),
        None => path.push_str(&args),
    }
}
