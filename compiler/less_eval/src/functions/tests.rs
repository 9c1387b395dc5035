#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::environment::{Environment, FileManager, LoadedFile};
use crate::eval::Eval;
use crate::options::{EvalOptions, RewriteUrls};
use less_diagnostic::LessError;
use less_ir::{
    Anonymous, CondOp, Condition, CssContext, Declaration, Dimension, FrameChain, Keyword, Quoted,
    Ruleset, Value, Variable,
};
use pretty_assertions::assert_eq;

fn number(value: f64, unit: &str) -> Node {
    Dimension::new(value, unit).into()
}

fn keyword(value: &str) -> Node {
    Keyword::new(value).into()
}

fn call(name: &str, args: Vec<Node>) -> Node {
    less_ir::Call::new(name, args).into()
}

fn css(ctx: &mut EvalContext, node: &Node) -> String {
    node.eval(ctx).unwrap().to_css(&CssContext::default()).unwrap()
}

fn context() -> EvalContext {
    EvalContext::new(EvalOptions::default())
}

fn context_with(name: &str, function: FunctionDef) -> EvalContext {
    let mut registry = FunctionRegistry::inherit(Rc::new(FunctionRegistry::builtin()));
    registry.add(name, function);
    context().with_functions(Rc::new(registry))
}

#[test]
fn lookup_is_case_insensitive() {
    let registry = FunctionRegistry::builtin();
    assert!(registry.get("IF").is_some());
    assert!(registry.get("Data-Uri").is_some());
    assert!(registry.get("no-such-function").is_none());
}

#[test]
fn inherited_registry_falls_through_and_shadows() {
    let base = Rc::new(FunctionRegistry::builtin());
    let mut registry = FunctionRegistry::inherit(Rc::clone(&base));
    registry.add("length", FunctionDef::evaluated(|_, _, _| Ok(FunctionValue::Text("mine".into()))));

    assert!(registry.get("percentage").is_some());
    assert_eq!(registry.get_local_functions().len(), 1);
    assert!(registry.get_local_functions().contains_key("length"));

    let mut ctx = context().with_functions(Rc::new(registry));
    assert_eq!(css(&mut ctx, &call("length", vec![number(1.0, "")])), "mine");
}

#[test]
fn raw_functions_are_marked() {
    let registry = FunctionRegistry::builtin();
    for name in ["if", "isdefined", "default"] {
        assert!(!registry.get(name).unwrap().eval_args, "{name}");
    }
    assert!(registry.get("boolean").unwrap().eval_args);
}

#[test]
fn unknown_functions_keep_evaluated_arguments() {
    let mut ctx = context();
    let sum = less_ir::Operation::new("+", number(1.0, "px"), number(2.0, "px"), true);
    assert_eq!(css(&mut ctx, &call("foo", vec![sum.into(), keyword("a")])), "foo(3px, a)");
}

#[test]
fn if_picks_a_branch() {
    let mut ctx = context();
    let holds = Condition::new(CondOp::Gt, number(2.0, ""), number(1.0, ""), false);
    let fails = Condition::new(CondOp::Lt, number(2.0, ""), number(1.0, ""), false);

    let node = call("if", vec![holds.into(), keyword("yes"), keyword("no")]);
    assert_eq!(css(&mut ctx, &node), "yes");
    let node = call("if", vec![fails.clone().into(), keyword("yes"), keyword("no")]);
    assert_eq!(css(&mut ctx, &node), "no");
    let node = call("if", vec![fails.into(), keyword("yes")]);
    assert_eq!(css(&mut ctx, &node), "");
}

#[test]
fn isdefined_checks_the_scope() {
    let frame = Ruleset::bindings(vec![Declaration::new("@x", number(1.0, "")).into()]);
    let mut ctx = context().with_initial_frames(FrameChain::from_innermost_first([Rc::new(frame)]));
    assert_eq!(css(&mut ctx, &call("isdefined", vec![Variable::new("@x").into()])), "true");
    assert_eq!(css(&mut ctx, &call("isdefined", vec![Variable::new("@y").into()])), "false");
}

#[test]
fn type_predicates() {
    let mut ctx = context();
    assert_eq!(css(&mut ctx, &call("isnumber", vec![number(1.0, "px")])), "true");
    assert_eq!(css(&mut ctx, &call("isnumber", vec![keyword("a")])), "false");
    assert_eq!(css(&mut ctx, &call("isstring", vec![Quoted::double("a").into()])), "true");
    assert_eq!(css(&mut ctx, &call("iskeyword", vec![keyword("a")])), "true");
    assert_eq!(css(&mut ctx, &call("isunit", vec![number(1.0, "px"), keyword("px")])), "true");
    assert_eq!(css(&mut ctx, &call("isunit", vec![number(1.0, "px"), keyword("em")])), "false");
}

#[test]
fn boolean_and_escape() {
    let mut ctx = context();
    let holds = Condition::new(CondOp::Eq, number(1.0, ""), number(1.0, ""), false);
    assert_eq!(css(&mut ctx, &call("boolean", vec![holds.into()])), "true");
    assert_eq!(css(&mut ctx, &call("e", vec![Quoted::double("a b").into()])), "a b");
}

#[test]
fn list_functions() {
    let mut ctx = context();
    let list = || Node::from(Value::new(vec![keyword("a"), keyword("b"), keyword("c")]));

    assert_eq!(css(&mut ctx, &call("length", vec![list()])), "3");
    assert_eq!(css(&mut ctx, &call("length", vec![keyword("a")])), "1");
    assert_eq!(css(&mut ctx, &call("extract", vec![list(), number(2.0, "")])), "b");
    // Out of range stays literal.
    assert_eq!(
        css(&mut ctx, &call("extract", vec![list(), number(5.0, "")])),
        "extract(a, b, c, 5)"
    );
}

#[test]
fn number_functions() {
    let mut ctx = context();
    assert_eq!(css(&mut ctx, &call("percentage", vec![number(0.5, "")])), "50%");
    assert_eq!(css(&mut ctx, &call("unit", vec![number(5.0, "px"), keyword("em")])), "5em");
    assert_eq!(css(&mut ctx, &call("unit", vec![number(5.0, "px")])), "5");
}

#[test]
fn default_is_literal_outside_guards() {
    let mut ctx = context();
    assert_eq!(css(&mut ctx, &call("default", Vec::new())), "default()");
    let inside = ctx.with_default_value(Some(true), |ctx| css(ctx, &call("default", Vec::new())));
    assert_eq!(inside, "true");
}

#[test]
fn scalar_results_become_anonymous() {
    let mut ctx = context_with("yes", FunctionDef::evaluated(|_, _, _| Ok(FunctionValue::Bool(true))));
    assert_eq!(css(&mut ctx, &call("yes", Vec::new())), "");

    let mut ctx = context_with("zero", FunctionDef::evaluated(|_, _, _| Ok(FunctionValue::Number(0.0))));
    assert_eq!(css(&mut ctx, &call("zero", Vec::new())), "");

    let mut ctx = context_with("half", FunctionDef::evaluated(|_, _, _| Ok(FunctionValue::Number(0.5))));
    assert_eq!(css(&mut ctx, &call("half", Vec::new())), "0.5");

    let mut ctx = context_with("text", FunctionDef::evaluated(|_, _, _| Ok(FunctionValue::Text("hi".into()))));
    assert_eq!(css(&mut ctx, &call("text", Vec::new())), "hi");
}

#[test]
fn function_errors_are_reported_at_the_call() {
    let mut ctx = context_with("boom", FunctionDef::evaluated(|_, _, _| Err(LessError::runtime("bad"))));
    let file = Rc::new(FileInfo::named("main.less"));
    let node = call("boom", Vec::new()).located(Some(7), Some(file));

    let err = node.eval(&mut ctx).unwrap_err();
    assert_eq!(err.message, "Error evaluating function `boom`: bad");
    assert_eq!(err.index, Some(7));
    assert_eq!(err.filename.as_deref(), Some("main.less"));
}

#[test]
fn located_function_errors_pass_through() {
    let mut ctx = context_with(
        "boom",
        FunctionDef::evaluated(|_, _, _| Err(LessError::runtime("inner").with_line_column(3, 4))),
    );
    let err = call("boom", Vec::new()).eval(&mut ctx).unwrap_err();
    assert_eq!(err.message, "inner");
    assert_eq!((err.line, err.column), (Some(3), Some(4)));
}

/// Serves a fixed set of files and encodes by tagging the contents.
struct Files(Vec<Rc<dyn FileManager>>);

struct Memory(Vec<(&'static str, &'static str)>);

impl FileManager for Memory {
    fn supports(&self, _filename: &str, _current_directory: &str) -> bool {
        true
    }

    fn load_file_sync(&self, filename: &str, current_directory: &str) -> Option<LoadedFile> {
        let path = format!("{current_directory}{filename}");
        self.0
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(name, contents)| LoadedFile {
                filename: (*name).to_string(),
                contents: (*contents).to_string(),
            })
    }
}

impl Environment for Files {
    fn encode_base64(&self, contents: &str) -> Option<String> {
        Some(format!("b64[{contents}]"))
    }

    fn mime_lookup(&self, filename: &str) -> Option<String> {
        let mime = match filename.rsplit('.').next() {
            Some("png") => "image/png",
            Some("svg") => "image/svg+xml",
            Some("txt") => "text/plain",
            _ => return None,
        };
        Some(mime.to_string())
    }

    fn charset_lookup(&self, mime: &str) -> Option<String> {
        mime.starts_with("text/").then(|| "UTF-8".to_string())
    }

    fn file_managers(&self) -> &[Rc<dyn FileManager>] {
        &self.0
    }
}

fn data_uri_context(rewrite_urls: RewriteUrls) -> EvalContext {
    let files: Rc<dyn FileManager> = Rc::new(Memory(vec![
        ("img/a.png", "PNG"),
        ("img/icon.svg", "<svg a b/>"),
        ("img/notes.txt", "a b"),
        ("img/empty.png", ""),
    ]));
    EvalContext::new(EvalOptions {
        rewrite_urls,
        ..EvalOptions::default()
    })
    .with_environment(Rc::new(Files(vec![files])))
}

fn data_uri(args: Vec<Node>) -> Node {
    let file = FileInfo {
        entry_path: "img/".to_string(),
        current_directory: "img/".to_string(),
        ..FileInfo::named("main.less")
    };
    call("data-uri", args).located(Some(0), Some(Rc::new(file)))
}

fn path(path: &str) -> Node {
    Quoted::double(path).into()
}

#[test]
fn data_uri_inlines_binary_files_as_base64() {
    let mut ctx = data_uri_context(RewriteUrls::Off);
    assert_eq!(
        css(&mut ctx, &data_uri(vec![path("a.png")])),
        r#"url("data:image/png;base64,b64[PNG]")"#
    );
}

#[test]
fn data_uri_percent_encodes_text_and_svg() {
    let mut ctx = data_uri_context(RewriteUrls::All);
    assert_eq!(
        css(&mut ctx, &data_uri(vec![path("icon.svg#top")])),
        r#"url("data:image/svg+xml,%3Csvg%20a%20b%2F%3E#top")"#
    );
    assert_eq!(
        css(&mut ctx, &data_uri(vec![path("notes.txt")])),
        r#"url("data:text/plain,a%20b")"#
    );
}

#[test]
fn data_uri_explicit_mime_decides_encoding() {
    let mut ctx = data_uri_context(RewriteUrls::Off);
    let node = data_uri(vec![path("text/plain;base64"), path("notes.txt")]);
    assert_eq!(css(&mut ctx, &node), r#"url("data:text/plain;base64,b64[a b]")"#);
}

#[test]
fn data_uri_falls_back_to_url() {
    // No environment at all.
    let mut ctx = context();
    assert_eq!(css(&mut ctx, &data_uri(vec![path("a.png")])), r#"url("a.png")"#);

    // Missing and empty files.
    let mut ctx = data_uri_context(RewriteUrls::Off);
    assert_eq!(css(&mut ctx, &data_uri(vec![path("missing.png")])), r#"url("missing.png")"#);
    assert_eq!(css(&mut ctx, &data_uri(vec![path("empty.png")])), r#"url("empty.png")"#);

    // Not a string.
    assert_eq!(
        css(&mut ctx, &data_uri(vec![Anonymous::new("a.png").into()])),
        "url(a.png)"
    );
}
