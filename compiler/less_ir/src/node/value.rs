//! Value nodes: literals and the composites built from them.

use crate::unit::{Unit, UnitGroup};
use crate::{Node, NodeId, NodeMeta};

fn adopt(parent: NodeId, child: &mut Node) {
    child.set_parent(parent);
}

fn adopt_all(parent: NodeId, children: &mut [Node]) {
    for child in children {
        adopt(parent, child);
    }
}

/// Raw text passed through untouched.
#[derive(Clone, Debug)]
pub struct Anonymous {
    pub meta: NodeMeta,
    pub value: String,
    pub map_lines: bool,
    pub rules_only: bool,
}

impl Anonymous {
    pub fn new(value: impl Into<String>) -> Self {
        Anonymous {
            meta: NodeMeta::new(),
            value: value.into(),
            map_lines: false,
            rules_only: false,
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Keyword {
    pub meta: NodeMeta,
    pub value: String,
}

impl Keyword {
    pub fn new(value: impl Into<String>) -> Self {
        Keyword {
            meta: NodeMeta::new(),
            value: value.into(),
        }
    }

    /// The `true` / `false` keywords guards compare against.
    pub fn from_bool(value: bool) -> Self {
        Self::new(if value { "true" } else { "false" })
    }
}

#[derive(Clone, Debug)]
pub struct Boolean {
    pub meta: NodeMeta,
    pub value: bool,
}

impl Boolean {
    pub fn new(value: bool) -> Self {
        Boolean {
            meta: NodeMeta::new(),
            value,
        }
    }
}

/// A number with a unit.
#[derive(Clone, Debug)]
pub struct Dimension {
    pub meta: NodeMeta,
    pub value: f64,
    pub unit: Unit,
}

impl Dimension {
    pub fn new(value: f64, unit: &str) -> Self {
        Self::with_unit(value, Unit::of(unit))
    }

    pub fn with_unit(value: f64, unit: Unit) -> Self {
        Dimension {
            meta: NodeMeta::new(),
            value,
            unit,
        }
    }

    /// This dimension expressed in base units (px, s, rad).
    #[must_use]
    pub fn unify(&self) -> Dimension {
        let (value, unit) = self.unit.unify(self.value);
        Dimension {
            meta: self.meta.derive(),
            value,
            unit,
        }
    }

    #[must_use]
    pub fn convert_to(&self, targets: &[(UnitGroup, String)]) -> Dimension {
        let (value, unit) = self.unit.convert(self.value, targets);
        Dimension {
            meta: self.meta.derive(),
            value,
            unit,
        }
    }
}

/// A string literal. Escaped strings (`~"..."`) print without quotes.
#[derive(Clone, Debug)]
pub struct Quoted {
    pub meta: NodeMeta,
    pub quote: char,
    pub value: String,
    pub escaped: bool,
}

impl Quoted {
    pub fn new(quote: char, value: impl Into<String>, escaped: bool) -> Self {
        Quoted {
            meta: NodeMeta::new(),
            quote,
            value: value.into(),
            escaped,
        }
    }

    pub fn double(value: impl Into<String>) -> Self {
        Self::new('"', value, false)
    }
}

#[derive(Clone, Debug)]
pub struct Comment {
    pub meta: NodeMeta,
    pub value: String,
    pub is_line_comment: bool,
}

impl Comment {
    pub fn new(value: impl Into<String>, is_line_comment: bool) -> Self {
        Comment {
            meta: NodeMeta::new(),
            value: value.into(),
            is_line_comment,
        }
    }
}

/// Space-separated list. `parens` marks an explicit `( ... )` group, the
/// only construct that moves the math-mode parens depth.
#[derive(Clone, Debug)]
pub struct Expression {
    pub meta: NodeMeta,
    pub value: Vec<Node>,
    pub no_spacing: bool,
    pub parens: bool,
    pub parens_in_op: bool,
}

impl Expression {
    pub fn new(mut value: Vec<Node>) -> Self {
        let meta = NodeMeta::new();
        adopt_all(meta.id, &mut value);
        Expression {
            meta,
            value,
            no_spacing: false,
            parens: false,
            parens_in_op: false,
        }
    }

    /// A parenthesized group; `in_op` when it is an operand.
    #[must_use]
    pub fn parenthesized(mut self, in_op: bool) -> Self {
        self.parens = true;
        self.parens_in_op = in_op;
        self
    }
}

/// Comma-separated list.
#[derive(Clone, Debug)]
pub struct Value {
    pub meta: NodeMeta,
    pub value: Vec<Node>,
}

impl Value {
    pub fn new(mut value: Vec<Node>) -> Self {
        let meta = NodeMeta::new();
        adopt_all(meta.id, &mut value);
        Value { meta, value }
    }
}

#[derive(Clone, Debug)]
pub struct Operation {
    pub meta: NodeMeta,
    pub op: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub is_spaced: bool,
}

impl Operation {
    pub fn new(op: impl Into<String>, mut left: Node, mut right: Node, is_spaced: bool) -> Self {
        let meta = NodeMeta::new();
        adopt(meta.id, &mut left);
        adopt(meta.id, &mut right);
        Operation {
            meta,
            op: op.into().trim().to_string(),
            left: Box::new(left),
            right: Box::new(right),
            is_spaced,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Negative {
    pub meta: NodeMeta,
    pub value: Box<Node>,
}

impl Negative {
    pub fn new(mut value: Node) -> Self {
        let meta = NodeMeta::new();
        adopt(meta.id, &mut value);
        Negative {
            meta,
            value: Box::new(value),
        }
    }
}

/// Literal parentheses kept in output. Unlike a parenthesized
/// [`Expression`], it never affects math mode.
#[derive(Clone, Debug)]
pub struct Paren {
    pub meta: NodeMeta,
    pub value: Box<Node>,
}

impl Paren {
    pub fn new(mut value: Node) -> Self {
        let meta = NodeMeta::new();
        adopt(meta.id, &mut value);
        Paren {
            meta,
            value: Box::new(value),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Url {
    pub meta: NodeMeta,
    pub value: Box<Node>,
    /// Already rewritten; evaluating again must not rewrite twice.
    pub is_evald: bool,
}

impl Url {
    pub fn new(mut value: Node) -> Self {
        let meta = NodeMeta::new();
        adopt(meta.id, &mut value);
        Url {
            meta,
            value: Box::new(value),
            is_evald: false,
        }
    }
}

/// `key=value`, as in `alpha(opacity=50)`.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub meta: NodeMeta,
    pub key: String,
    pub value: Box<Node>,
}

impl Assignment {
    pub fn new(key: impl Into<String>, mut value: Node) -> Self {
        let meta = NodeMeta::new();
        adopt(meta.id, &mut value);
        Assignment {
            meta,
            key: key.into(),
            value: Box::new(value),
        }
    }
}

/// Attribute selector `[key op value cif]`.
#[derive(Clone, Debug)]
pub struct Attribute {
    pub meta: NodeMeta,
    pub key: Box<Node>,
    pub op: Option<String>,
    pub value: Option<Box<Node>>,
    pub cif: Option<String>,
}

impl Attribute {
    pub fn new(key: Node, op: Option<&str>, value: Option<Node>) -> Self {
        Attribute {
            meta: NodeMeta::new(),
            key: Box::new(key),
            op: op.map(str::to_string),
            value: value.map(Box::new),
            cif: None,
        }
    }
}

/// A bare ordered sequence, spliced into whatever list receives it.
#[derive(Clone, Debug, Default)]
pub struct Array {
    pub meta: NodeMeta,
    pub items: Vec<Node>,
}

impl Array {
    pub fn new(items: Vec<Node>) -> Self {
        Array {
            meta: NodeMeta::new(),
            items,
        }
    }
}
