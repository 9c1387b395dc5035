//! CSS fragment generation.
//!
//! `gen_css` walks a node and hands ordered `(chunk, file_info, index)`
//! triples to a [`CssOutput`] sink. Joining, indentation policy beyond the
//! minimal separators and source maps belong to the sink, not here.
//! [`Node::to_css`] exists for the places evaluation itself needs rendered
//! text: pattern-parameter matching, `@@` indirection, string
//! interpolation and error messages.

use std::rc::Rc;

use less_diagnostic::{errors, LessError};

use crate::{Combinator, Dimension, FileInfo, Node, Ruleset, Selector};

/// Receives generated CSS fragments in order.
pub trait CssOutput {
    fn add(&mut self, chunk: &str, file_info: Option<&Rc<FileInfo>>, index: Option<usize>);

    fn is_empty(&self) -> bool;
}

/// Generation options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CssContext {
    pub compress: bool,
    pub strict_units: bool,
    pub num_precision: Option<u32>,
}

impl Default for CssContext {
    fn default() -> Self {
        CssContext {
            compress: false,
            strict_units: false,
            num_precision: Some(8),
        }
    }
}

/// One emitted fragment with its origin.
#[derive(Clone, Debug)]
pub struct CssChunk {
    pub text: String,
    pub file_info: Option<Rc<FileInfo>>,
    pub index: Option<usize>,
}

/// A sink that records every fragment.
#[derive(Clone, Debug, Default)]
pub struct CssChunks {
    chunks: Vec<CssChunk>,
}

impl CssChunks {
    pub fn chunks(&self) -> &[CssChunk] {
        &self.chunks
    }

    pub fn join(&self) -> String {
        self.chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }
}

impl CssOutput for CssChunks {
    fn add(&mut self, chunk: &str, file_info: Option<&Rc<FileInfo>>, index: Option<usize>) {
        if chunk.is_empty() {
            return;
        }
        self.chunks.push(CssChunk {
            text: chunk.to_string(),
            file_info: file_info.cloned(),
            index,
        });
    }

    fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

struct TextOutput(String);

impl CssOutput for TextOutput {
    fn add(&mut self, chunk: &str, _file_info: Option<&Rc<FileInfo>>, _index: Option<usize>) {
        self.0.push_str(chunk);
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Render a number the way stylesheets expect: rounded to `precision`
/// decimals, no trailing zeros, no exponent for tiny values.
pub fn format_number(value: f64, precision: Option<u32>) -> String {
    let value = match precision {
        Some(precision) => {
            let scale = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
            ((value + 2e-16) * scale).round() / scale
        }
        None => value,
    };
    if value == 0.0 {
        return "0".to_string();
    }
    if value.abs() < 0.000_001 {
        let fixed = format!("{value:.20}");
        return fixed.trim_end_matches('0').to_string();
    }
    value.to_string()
}

impl Node {
    pub fn gen_css(&self, ctx: &CssContext, out: &mut dyn CssOutput) -> Result<(), LessError> {
        let meta = self.meta();
        let file_info = meta.file_info.as_ref();
        let index = meta.index;
        match self {
            Node::Anonymous(node) => out.add(&node.value, file_info, index),
            Node::Keyword(node) => out.add(&node.value, file_info, index),
            Node::Boolean(node) => out.add(if node.value { "true" } else { "false" }, file_info, index),
            Node::Comment(node) => out.add(&node.value, file_info, index),
            Node::Variable(node) => out.add(&node.name, file_info, index),
            Node::Property(node) => out.add(&node.name, file_info, index),
            Node::Dimension(node) => gen_dimension(node, ctx, out)?,
            Node::Quoted(node) => {
                if node.escaped {
                    out.add(&node.value, file_info, index);
                } else {
                    let quote = node.quote.to_string();
                    out.add(&quote, file_info, index);
                    out.add(&node.value, file_info, index);
                    out.add(&quote, file_info, index);
                }
            }
            Node::Expression(node) => {
                for (i, item) in node.value.iter().enumerate() {
                    item.gen_css(ctx, out)?;
                    let next_is_comma = matches!(
                        node.value.get(i + 1),
                        Some(Node::Anonymous(next)) if next.value == ","
                    );
                    if !node.no_spacing && i + 1 < node.value.len() && !next_is_comma {
                        out.add(" ", file_info, index);
                    }
                }
            }
            Node::Value(node) => {
                let separator = if ctx.compress { "," } else { ", " };
                for (i, item) in node.value.iter().enumerate() {
                    if i > 0 {
                        out.add(separator, file_info, index);
                    }
                    item.gen_css(ctx, out)?;
                }
            }
            Node::Array(node) => {
                for item in &node.items {
                    item.gen_css(ctx, out)?;
                }
            }
            Node::Operation(node) => {
                node.left.gen_css(ctx, out)?;
                if node.is_spaced {
                    out.add(" ", file_info, index);
                }
                out.add(&node.op, file_info, index);
                if node.is_spaced {
                    out.add(" ", file_info, index);
                }
                node.right.gen_css(ctx, out)?;
            }
            Node::Negative(node) => {
                out.add("-", file_info, index);
                node.value.gen_css(ctx, out)?;
            }
            Node::Paren(node) => {
                out.add("(", file_info, index);
                node.value.gen_css(ctx, out)?;
                out.add(")", file_info, index);
            }
            Node::Url(node) => {
                out.add("url(", file_info, index);
                node.value.gen_css(ctx, out)?;
                out.add(")", file_info, index);
            }
            Node::Assignment(node) => {
                out.add(&node.key, file_info, index);
                out.add("=", file_info, index);
                node.value.gen_css(ctx, out)?;
            }
            Node::Attribute(node) => {
                out.add("[", file_info, index);
                node.key.gen_css(ctx, out)?;
                if let (Some(op), Some(value)) = (&node.op, &node.value) {
                    out.add(op, file_info, index);
                    value.gen_css(ctx, out)?;
                }
                if let Some(cif) = &node.cif {
                    out.add(" ", file_info, index);
                    out.add(cif, file_info, index);
                }
                out.add("]", file_info, index);
            }
            Node::Call(node) => {
                out.add(&node.name, file_info, index);
                out.add("(", file_info, index);
                for (i, arg) in node.args.iter().enumerate() {
                    arg.gen_css(ctx, out)?;
                    if i + 1 < node.args.len() {
                        out.add(", ", file_info, index);
                    }
                }
                out.add(")", file_info, index);
            }
            Node::Declaration(node) => {
                if node.variable {
                    return Ok(());
                }
                let separator = if ctx.compress { ":" } else { ": " };
                out.add(&format!("{}{separator}", node.name), file_info, index);
                node.value
                    .gen_css(ctx, out)
                    .map_err(|err| meta.locate(err))?;
                let important = if node.important { " !important" } else { "" };
                let terminator = if node.inline { "" } else { ";" };
                out.add(&format!("{important}{terminator}"), file_info, index);
            }
            Node::Ruleset(node) => gen_ruleset(node, ctx, out)?,
            Node::Selector(node) => gen_selector(node, ctx, out)?,
            Node::Element(node) => {
                gen_combinator(&node.combinator, ctx, file_info, index, out);
                node.value.gen_css(ctx, out)?;
            }
            Node::Condition(_)
            | Node::VariableCall(_)
            | Node::NamespaceValue(_)
            | Node::DetachedRuleset(_)
            | Node::Extend(_)
            | Node::MixinDefinition(_)
            | Node::MixinCall(_) => {}
        }
        Ok(())
    }

    pub fn to_css(&self, ctx: &CssContext) -> Result<String, LessError> {
        let mut out = TextOutput(String::new());
        self.gen_css(ctx, &mut out)?;
        Ok(out.0)
    }

    /// Text of a node used as a name: the raw value of strings and
    /// keywords, the rendered CSS of anything else.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Quoted(node) => node.value.clone(),
            Node::Keyword(node) => node.value.clone(),
            Node::Anonymous(node) => node.value.clone(),
            other => other.to_css(&CssContext::default()).unwrap_or_default(),
        }
    }
}

fn gen_dimension(
    node: &Dimension,
    ctx: &CssContext,
    out: &mut dyn CssOutput,
) -> Result<(), LessError> {
    let file_info = node.meta.file_info.as_ref();
    let index = node.meta.index;
    if ctx.strict_units && !node.unit.is_singular() {
        return Err(node.meta.locate(errors::multiple_units(&node.unit.to_string())));
    }
    let mut text = format_number(node.value, ctx.num_precision);
    let value: f64 = text.parse().unwrap_or(node.value);
    if ctx.compress {
        if value == 0.0 && node.unit.is_length() {
            out.add(&text, file_info, index);
            return Ok(());
        }
        if value > 0.0 && value < 1.0 {
            text.remove(0);
        }
    }
    out.add(&text, file_info, index);
    if let Some(unit) = node.unit.css_text(ctx.strict_units) {
        out.add(unit, file_info, index);
    }
    Ok(())
}

fn gen_combinator(
    combinator: &Combinator,
    ctx: &CssContext,
    file_info: Option<&Rc<FileInfo>>,
    index: Option<usize>,
    out: &mut dyn CssOutput,
) {
    let value = combinator.value.as_str();
    let padded = !(ctx.compress || matches!(value, "" | " " | "|"));
    if padded {
        out.add(&format!(" {value} "), file_info, index);
    } else {
        out.add(value, file_info, index);
    }
}

fn gen_selector(
    selector: &Selector,
    ctx: &CssContext,
    out: &mut dyn CssOutput,
) -> Result<(), LessError> {
    let file_info = selector.meta.file_info.as_ref();
    let index = selector.meta.index;
    for (i, element) in selector.elements.iter().enumerate() {
        // Leading descendant combinators are implied by nesting.
        if i > 0 || !element.combinator.is_empty_or_whitespace() {
            gen_combinator(&element.combinator, ctx, file_info, index, out);
        }
        element.value.gen_css(ctx, out)?;
    }
    Ok(())
}

fn gen_ruleset(ruleset: &Ruleset, ctx: &CssContext, out: &mut dyn CssOutput) -> Result<(), LessError> {
    let file_info = ruleset.meta.file_info.as_ref();
    let index = ruleset.meta.index;
    let rules = ruleset.rules.iter().filter(|rule| !rule.is_silent());
    let (open, indent, newline) = match (ruleset.root, ctx.compress) {
        (true, _) => ("", "", if ctx.compress { "" } else { "\n" }),
        (false, true) => ("{", "", ""),
        (false, false) => (" {\n", "  ", "\n"),
    };
    if !ruleset.root {
        let separator = if ctx.compress { "," } else { ", " };
        for (i, selector) in ruleset.selectors.iter().enumerate() {
            if i > 0 {
                out.add(separator, file_info, index);
            }
            gen_selector(selector, ctx, out)?;
        }
        out.add(open, file_info, index);
    }
    for rule in rules {
        out.add(indent, file_info, index);
        rule.gen_css(ctx, out)?;
        out.add(newline, file_info, index);
    }
    if !ruleset.root {
        out.add("}", file_info, index);
    }
    Ok(())
}
