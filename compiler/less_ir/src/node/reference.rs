//! Nodes that name something resolved at evaluation time.

use std::fmt;
use std::str::FromStr;

use crate::{Node, NodeMeta};

/// `@name`, or `@@name` for indirection through another variable's value.
#[derive(Clone, Debug)]
pub struct Variable {
    pub meta: NodeMeta,
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            meta: NodeMeta::new(),
            name: name.into(),
        }
    }
}

/// `$name`: the value of a property declared in an enclosing scope.
#[derive(Clone, Debug)]
pub struct Property {
    pub meta: NodeMeta,
    pub name: String,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Property {
            meta: NodeMeta::new(),
            name: name.into(),
        }
    }
}

/// A function call, resolved through the function registry.
#[derive(Clone, Debug)]
pub struct Call {
    pub meta: NodeMeta,
    pub name: String,
    pub args: Vec<Node>,
}

impl Call {
    pub fn new(name: impl Into<String>, mut args: Vec<Node>) -> Self {
        let meta = NodeMeta::new();
        for arg in &mut args {
            arg.set_parent(meta.id);
        }
        Call {
            meta,
            name: name.into(),
            args,
        }
    }

    /// `calc()` keeps its operators literal.
    pub fn is_calc(&self) -> bool {
        self.name == "calc"
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CondOp {
    And,
    Or,
    Lt,
    /// `<=` and its alternative spelling `=<`.
    LtEq,
    Eq,
    GtEq,
    Gt,
}

impl CondOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CondOp::And => "and",
            CondOp::Or => "or",
            CondOp::Lt => "<",
            CondOp::LtEq => "<=",
            CondOp::Eq => "=",
            CondOp::GtEq => ">=",
            CondOp::Gt => ">",
        }
    }
}

impl FromStr for CondOp {
    type Err = String;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op {
            "and" => Ok(CondOp::And),
            "or" => Ok(CondOp::Or),
            "<" => Ok(CondOp::Lt),
            "<=" | "=<" => Ok(CondOp::LtEq),
            "=" => Ok(CondOp::Eq),
            ">=" => Ok(CondOp::GtEq),
            ">" => Ok(CondOp::Gt),
            other => Err(format!("unknown condition operator `{other}`")),
        }
    }
}

impl fmt::Display for CondOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guard expression. `negate` applies after the operator.
#[derive(Clone, Debug)]
pub struct Condition {
    pub meta: NodeMeta,
    pub op: CondOp,
    pub lvalue: Box<Node>,
    pub rvalue: Box<Node>,
    pub negate: bool,
}

impl Condition {
    pub fn new(op: CondOp, mut lvalue: Node, mut rvalue: Node, negate: bool) -> Self {
        let meta = NodeMeta::new();
        lvalue.set_parent(meta.id);
        rvalue.set_parent(meta.id);
        Condition {
            meta,
            op,
            lvalue: Box::new(lvalue),
            rvalue: Box::new(rvalue),
            negate,
        }
    }
}

/// `@detached();`: expands a variable holding rules in place.
#[derive(Clone, Debug)]
pub struct VariableCall {
    pub meta: NodeMeta,
    pub variable: String,
    pub important: bool,
}

impl VariableCall {
    pub fn new(variable: impl Into<String>) -> Self {
        VariableCall {
            meta: NodeMeta::new(),
            variable: variable.into(),
            important: false,
        }
    }
}

/// `@ns[@var]`, `.mixin()[$prop]`, `@config[]`: chained lookups into the
/// rules a mixin or variable call produces. An empty lookup selects the last
/// declaration.
#[derive(Clone, Debug)]
pub struct NamespaceValue {
    pub meta: NodeMeta,
    pub value: Box<Node>,
    pub lookups: Vec<String>,
    pub important: bool,
}

impl NamespaceValue {
    pub fn new(mut value: Node, lookups: Vec<String>) -> Self {
        let meta = NodeMeta::new();
        value.set_parent(meta.id);
        NamespaceValue {
            meta,
            value: Box::new(value),
            lookups,
            important: false,
        }
    }
}
