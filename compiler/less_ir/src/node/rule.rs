//! Rule-level nodes: declarations, rulesets, selectors and mixins.

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{FrameChain, Keyword, Node, NodeId, NodeMeta};

/// How a declaration joins earlier same-named declarations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeMode {
    /// `+:` starts a new comma-separated group.
    Comma,
    /// `+_:` continues the current space-separated group.
    Space,
}

/// `name: value`. Names starting with `@` declare variables.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub meta: NodeMeta,
    pub name: String,
    pub value: Box<Node>,
    pub important: bool,
    pub merge: Option<MergeMode>,
    pub inline: bool,
    pub variable: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, mut value: Node) -> Self {
        let name = name.into();
        let meta = NodeMeta::new();
        value.set_parent(meta.id);
        Declaration {
            meta,
            variable: name.starts_with('@'),
            name,
            value: Box::new(value),
            important: false,
            merge: None,
            inline: false,
        }
    }

    #[must_use]
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    #[must_use]
    pub fn merged(mut self, merge: MergeMode) -> Self {
        self.merge = Some(merge);
        self
    }
}

/// A selector block. Also the unit of scope: every frame is a ruleset.
#[derive(Clone, Debug)]
pub struct Ruleset {
    pub meta: NodeMeta,
    pub selectors: Vec<Selector>,
    pub rules: Vec<Node>,
    pub root: bool,
    pub allow_imports: bool,
    /// The ruleset this one was evaluated or copied from.
    pub original: Option<NodeId>,
}

impl Ruleset {
    pub fn new(selectors: Vec<Selector>, rules: Vec<Node>) -> Self {
        Ruleset {
            meta: NodeMeta::new(),
            selectors,
            rules,
            root: false,
            allow_imports: false,
            original: None,
        }
    }

    /// A frame of bindings with no selectors.
    pub fn bindings(rules: Vec<Node>) -> Self {
        Self::new(Vec::new(), rules)
    }

    pub fn root(rules: Vec<Node>) -> Self {
        Ruleset {
            root: true,
            ..Self::new(Vec::new(), rules)
        }
    }

    /// Id of the source ruleset this one descends from.
    pub fn origin_id(&self) -> NodeId {
        self.original.unwrap_or(self.meta.id)
    }

    /// The last variable declaration called `name`.
    pub fn variable(&self, name: &str) -> Option<&Declaration> {
        self.declarations()
            .rev()
            .find(|declaration| declaration.variable && declaration.name == name)
    }

    /// Every property declaration called `name` (with or without `$`), in
    /// cascade order.
    pub fn property(&self, name: &str) -> Vec<&Declaration> {
        let name = name.strip_prefix('$').unwrap_or(name);
        self.declarations()
            .filter(|declaration| !declaration.variable && declaration.name == name)
            .collect()
    }

    pub fn last_declaration(&self) -> Option<&Declaration> {
        self.declarations().next_back()
    }

    pub fn declarations(&self) -> impl DoubleEndedIterator<Item = &Declaration> {
        self.rules.iter().filter_map(|rule| match rule {
            Node::Declaration(declaration) => Some(declaration),
            _ => None,
        })
    }

    /// Nested rules that can be called as mixins.
    pub fn rulesets(&self) -> impl Iterator<Item = &Node> {
        self.rules
            .iter()
            .filter(|rule| matches!(rule, Node::Ruleset(_) | Node::MixinDefinition(_)))
    }
}

/// Rules held as a value, evaluated later against the frames captured when
/// the value itself was evaluated.
#[derive(Clone, Debug)]
pub struct DetachedRuleset {
    pub meta: NodeMeta,
    pub ruleset: Rc<Ruleset>,
    pub frames: Option<FrameChain>,
}

impl DetachedRuleset {
    pub fn new(ruleset: Rc<Ruleset>) -> Self {
        DetachedRuleset {
            meta: NodeMeta::new(),
            ruleset,
            frames: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Combinator {
    pub value: String,
}

impl Combinator {
    /// A single space is the descendant combinator; anything else is
    /// trimmed.
    pub fn new(value: &str) -> Self {
        let value = if value == " " { " " } else { value.trim() };
        Combinator {
            value: value.to_string(),
        }
    }

    pub fn is_empty_or_whitespace(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub meta: NodeMeta,
    pub combinator: Combinator,
    pub value: Box<Node>,
    pub is_variable: bool,
}

impl Element {
    pub fn new(combinator: Combinator, mut value: Node) -> Self {
        let meta = NodeMeta::new();
        value.set_parent(meta.id);
        Element {
            meta,
            is_variable: !matches!(
                value,
                Node::Keyword(_) | Node::Anonymous(_) | Node::Quoted(_) | Node::Attribute(_)
            ),
            combinator,
            value: Box::new(value),
        }
    }

    /// A plain name element such as `.mixin` or `#ns`.
    pub fn named(combinator: &str, name: &str) -> Self {
        Self::new(Combinator::new(combinator), Keyword::new(name).into())
    }
}

#[derive(Clone, Debug)]
pub struct Selector {
    pub meta: NodeMeta,
    pub elements: Vec<Element>,
    /// CSS guard (`.a when (@mode = dark)`).
    pub condition: Option<Box<Node>>,
    /// Result of the guard after evaluation; true without a guard.
    pub evald_condition: bool,
}

impl Selector {
    pub fn new(elements: Vec<Element>) -> Self {
        Selector {
            meta: NodeMeta::new(),
            elements,
            condition: None,
            evald_condition: true,
        }
    }

    /// Selector of compound names without combinators: `["#ns", ".m"]` is
    /// `#ns.m`.
    pub fn of_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|name| Element::named("", name)).collect())
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Node) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExtendOption {
    Exact,
    All,
}

impl ExtendOption {
    pub fn parse(option: &str) -> Self {
        match option {
            "all" | "!all" => ExtendOption::All,
            _ => ExtendOption::Exact,
        }
    }
}

static NEXT_EXTEND_ID: AtomicUsize = AtomicUsize::new(0);

/// `:extend(selector)`. Matching happens in a later pass; here it only
/// carries the target and its bookkeeping ids.
#[derive(Clone, Debug)]
pub struct Extend {
    pub meta: NodeMeta,
    pub selector: Selector,
    pub option: ExtendOption,
    pub object_id: usize,
    pub parent_ids: Vec<usize>,
    pub allow_before: bool,
    pub allow_after: bool,
    pub first_extend_on_this_selector_path: bool,
    pub self_selectors: Vec<Selector>,
    pub has_found_matches: bool,
}

impl Extend {
    pub fn new(mut selector: Selector, option: ExtendOption) -> Self {
        let meta = NodeMeta::new();
        let object_id = NEXT_EXTEND_ID.fetch_add(1, Ordering::Relaxed);
        let all = option == ExtendOption::All;
        selector.meta.parent = Some(meta.id);
        Extend {
            meta,
            selector,
            option,
            object_id,
            parent_ids: vec![object_id],
            allow_before: all,
            allow_after: all,
            first_extend_on_this_selector_path: false,
            self_selectors: Vec::new(),
            has_found_matches: false,
        }
    }
}

/// One declared mixin parameter.
///
/// A parameter with a value but no name is a pattern: the call only
/// matches when the corresponding argument renders identically.
#[derive(Clone, Debug)]
pub struct MixinParam {
    pub name: Option<String>,
    pub value: Option<Node>,
    pub variadic: bool,
}

impl MixinParam {
    pub fn named(name: &str) -> Self {
        MixinParam {
            name: Some(name.to_string()),
            value: None,
            variadic: false,
        }
    }

    pub fn with_default(name: &str, value: Node) -> Self {
        MixinParam {
            value: Some(value),
            ..Self::named(name)
        }
    }

    pub fn pattern(value: Node) -> Self {
        MixinParam {
            name: None,
            value: Some(value),
            variadic: false,
        }
    }

    /// `@rest...` or, without a name, a bare `...`.
    pub fn variadic(name: Option<&str>) -> Self {
        MixinParam {
            name: name.map(str::to_string),
            value: None,
            variadic: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MixinDefinition {
    pub meta: NodeMeta,
    pub name: String,
    pub selectors: Vec<Selector>,
    pub params: Vec<MixinParam>,
    pub rules: Vec<Node>,
    pub condition: Option<Box<Node>>,
    pub variadic: bool,
    pub arity: usize,
    /// Parameters a call must supply: unnamed ones and named ones without a
    /// default.
    pub required: usize,
    /// Names of parameters that have defaults.
    pub optional_parameters: Vec<String>,
    /// Closure captured when the definition was evaluated.
    pub frames: Option<FrameChain>,
    /// Set when a plain ruleset is being called as a mixin.
    pub original: Option<NodeId>,
}

impl MixinDefinition {
    pub fn new(
        name: &str,
        params: Vec<MixinParam>,
        rules: Vec<Node>,
        condition: Option<Node>,
    ) -> Self {
        let name = if name.is_empty() {
            "anonymous mixin"
        } else {
            name
        };
        let (required, optional_parameters) = params.iter().fold(
            (0, Vec::new()),
            |(required, mut optional), param| match (&param.name, &param.value) {
                (Some(name), Some(_)) => {
                    optional.push(name.clone());
                    (required, optional)
                }
                _ => (required + 1, optional),
            },
        );
        MixinDefinition {
            meta: NodeMeta::new(),
            name: name.to_string(),
            selectors: vec![Selector::of_names(&[name])],
            variadic: params.last().is_some_and(|param| param.variadic),
            arity: params.len(),
            required,
            optional_parameters,
            params,
            rules,
            condition: condition.map(Box::new),
            frames: None,
            original: None,
        }
    }
}

/// An argument at a mixin call site. `expand` spreads a list value
/// (`.m(@list...)`).
#[derive(Clone, Debug)]
pub struct MixinArg {
    pub name: Option<String>,
    pub value: Node,
    pub expand: bool,
}

impl MixinArg {
    pub fn positional(value: Node) -> Self {
        MixinArg {
            name: None,
            value,
            expand: false,
        }
    }

    pub fn named(name: &str, value: Node) -> Self {
        MixinArg {
            name: Some(name.to_string()),
            value,
            expand: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MixinCall {
    pub meta: NodeMeta,
    pub selector: Selector,
    pub args: Vec<MixinArg>,
    pub important: bool,
}

impl MixinCall {
    pub fn new(mut selector: Selector, args: Vec<MixinArg>) -> Self {
        let meta = NodeMeta::new();
        selector.meta.parent = Some(meta.id);
        MixinCall {
            meta,
            selector,
            args,
            important: false,
        }
    }
}

impl Selector {
    /// The selector split into the simple names mixin lookup compares:
    /// `#ns > .m` gives `["#ns", ".m"]`. A leading `&` is dropped.
    pub fn mixin_elements(&self) -> Vec<String> {
        let css: String = self
            .elements
            .iter()
            .map(|element| format!("{}{}", element.combinator.value, element.value.plain_text()))
            .collect();
        let mut names = split_simple_names(&css);
        if names.first().is_some_and(|first| first == "&") {
            names.remove(0);
        }
        names
    }

    /// How many leading elements of this (call) selector match `candidate`,
    /// or 0 when `candidate` is not a prefix of it.
    pub fn match_prefix(&self, candidate: &Selector) -> usize {
        let names = candidate.mixin_elements();
        let len = names.len();
        if len == 0 || self.elements.len() < len {
            return 0;
        }
        let matches = self
            .elements
            .iter()
            .zip(&names)
            .all(|(element, name)| element.value.plain_text() == *name);
        if matches {
            len
        } else {
            0
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Tokens of the form `[,&#*.\w-]([\w-]|\\.)*`.
fn split_simple_names(css: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = css.chars().peekable();
    while let Some(c) = chars.next() {
        if !(is_name_char(c) || matches!(c, ',' | '&' | '#' | '*' | '.')) {
            continue;
        }
        let mut name = String::from(c);
        while let Some(&next) = chars.peek() {
            if is_name_char(next) {
                name.push(next);
                chars.next();
            } else if next == '\\' {
                chars.next();
                let Some(escaped) = chars.next() else {
                    break;
                };
                name.push('\\');
                name.push(escaped);
            } else {
                break;
            }
        }
        names.push(name);
    }
    names
}
