//! Function registry.
//!
//! Functions are looked up by case-folded name. Each declares whether it
//! wants its arguments evaluated first; the three that do not (`if`,
//! `isdefined`, `default`) receive the raw operand nodes and evaluate what
//! they need themselves. A registry can inherit a base registry, and lookups
//! fall through to it.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use less_ir::{FileInfo, Node};

use crate::context::EvalContext;
use crate::EvalResult;

mod builtin;
mod caller;

pub use caller::FunctionCaller;

/// What a function returns. Scalars are wrapped into nodes by the caller.
#[derive(Clone, Debug)]
pub enum FunctionValue {
    Node(Node),
    Bool(bool),
    Number(f64),
    Text(String),
    /// The function declines; the call is kept as literal CSS.
    Nothing,
}

impl From<Node> for FunctionValue {
    fn from(node: Node) -> Self {
        FunctionValue::Node(node)
    }
}

/// Location of the call being dispatched.
#[derive(Clone, Debug, Default)]
pub struct CallSite {
    pub index: Option<usize>,
    pub file_info: Option<Rc<FileInfo>>,
}

pub type FunctionBody = dyn Fn(&mut EvalContext, &CallSite, Vec<Node>) -> EvalResult<FunctionValue>;

#[derive(Clone)]
pub struct FunctionDef {
    pub eval_args: bool,
    pub body: Rc<FunctionBody>,
}

impl FunctionDef {
    /// A function receiving evaluated arguments.
    pub fn evaluated(
        body: impl Fn(&mut EvalContext, &CallSite, Vec<Node>) -> EvalResult<FunctionValue> + 'static,
    ) -> Self {
        FunctionDef {
            eval_args: true,
            body: Rc::new(body),
        }
    }

    /// A function receiving its arguments unevaluated.
    pub fn raw(
        body: impl Fn(&mut EvalContext, &CallSite, Vec<Node>) -> EvalResult<FunctionValue> + 'static,
    ) -> Self {
        FunctionDef {
            eval_args: false,
            body: Rc::new(body),
        }
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("eval_args", &self.eval_args)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, FunctionDef>,
    base: Option<Rc<FunctionRegistry>>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    /// The registry every context starts from.
    pub fn builtin() -> Self {
        let mut registry = FunctionRegistry::new();
        builtin::register(&mut registry);
        registry
    }

    /// An empty registry whose lookups fall through to `base`.
    pub fn inherit(base: Rc<FunctionRegistry>) -> Self {
        FunctionRegistry {
            functions: FxHashMap::default(),
            base: Some(base),
        }
    }

    pub fn add(&mut self, name: &str, function: FunctionDef) {
        self.functions.insert(name.to_ascii_lowercase(), function);
    }

    pub fn add_multiple(&mut self, functions: impl IntoIterator<Item = (&'static str, FunctionDef)>) {
        for (name, function) in functions {
            self.add(name, function);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        let name = name.to_ascii_lowercase();
        let mut registry = Some(self);
        while let Some(current) = registry {
            if let Some(function) = current.functions.get(&name) {
                return Some(function);
            }
            registry = current.base.as_deref();
        }
        None
    }

    /// Functions registered here, without the base registry's.
    pub fn get_local_functions(&self) -> &FxHashMap<String, FunctionDef> {
        &self.functions
    }
}

#[cfg(test)]
mod tests;
