//! Evaluation context: the scope chain and the math-mode state machine.
//!
//! # Design
//!
//! One typed context is threaded through every `eval` call. Everything that
//! behaves like a stack (frames, parentheses depth, calc nesting, the
//! important scope, the mixin call depth, the in-flight node set) is only
//! changed through the `with_*` closure helpers, which restore the previous
//! state when the closure returns. Errors travel as `Err` values, so the
//! restore also runs on every failing path.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use less_diagnostic::{errors, LessError};
use less_ir::{FrameChain, NodeId, Ruleset};

use crate::environment::{Environment, NoEnvironment};
use crate::functions::FunctionRegistry;
use crate::options::{EvalOptions, MathMode, RewriteUrls};
use crate::plugin::PluginManager;
use crate::EvalResult;

mod path;

pub use path::{is_path_local_relative, is_path_relative, normalize_path};

/// One entry of the important-scope stack.
#[derive(Clone, Copy, Debug, Default)]
struct ImportantScope {
    important: bool,
}

pub struct EvalContext {
    options: EvalOptions,
    math: MathMode,
    math_on: bool,
    calc_stack: SmallVec<[bool; 4]>,
    parens_stack: SmallVec<[bool; 8]>,
    frames: FrameChain,
    important_scope: SmallVec<[ImportantScope; 8]>,
    in_flight: FxHashSet<NodeId>,
    functions: Rc<FunctionRegistry>,
    environment: Rc<dyn Environment>,
    plugins: Rc<PluginManager>,
    default_value: Option<bool>,
    mixin_depth: usize,
}

impl EvalContext {
    pub fn new(options: EvalOptions) -> Self {
        EvalContext {
            math: options.math,
            options,
            math_on: true,
            calc_stack: SmallVec::new(),
            parens_stack: SmallVec::new(),
            frames: FrameChain::new(),
            important_scope: SmallVec::new(),
            in_flight: FxHashSet::default(),
            functions: Rc::new(FunctionRegistry::builtin()),
            environment: Rc::new(NoEnvironment),
            plugins: Rc::new(PluginManager::new()),
            default_value: None,
            mixin_depth: 0,
        }
    }

    #[must_use]
    pub fn with_functions(mut self, functions: Rc<FunctionRegistry>) -> Self {
        self.functions = functions;
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Rc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_plugins(mut self, plugins: Rc<PluginManager>) -> Self {
        self.plugins = plugins;
        self
    }

    /// Start from `frames` instead of an empty chain (injected globals).
    #[must_use]
    pub fn with_initial_frames(mut self, frames: FrameChain) -> Self {
        self.frames = frames;
        self
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    pub fn frames(&self) -> &FrameChain {
        &self.frames
    }

    pub fn functions(&self) -> &Rc<FunctionRegistry> {
        &self.functions
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    /// The current math mode; `font` declarations lower it temporarily.
    pub fn math(&self) -> MathMode {
        self.math
    }

    pub fn default_value(&self) -> Option<bool> {
        self.default_value
    }

    pub fn mixin_depth(&self) -> usize {
        self.mixin_depth
    }

    pub fn in_calc(&self) -> bool {
        !self.calc_stack.is_empty()
    }

    pub fn calc_depth(&self) -> usize {
        self.calc_stack.len()
    }

    pub fn parens_depth(&self) -> usize {
        self.parens_stack.len()
    }

    pub fn important_depth(&self) -> usize {
        self.important_scope.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether arithmetic is evaluated at all right now.
    pub fn is_math_on(&self) -> bool {
        if !self.math_on {
            return false;
        }
        if self.math > MathMode::ParensDivision {
            return !self.parens_stack.is_empty();
        }
        true
    }

    /// Whether `op` is evaluated right now. Division needs parentheses
    /// unless the mode is [`MathMode::Always`].
    pub fn is_math_on_with_op(&self, op: &str) -> bool {
        if !self.math_on {
            return false;
        }
        if op == "/" && self.math != MathMode::Always && self.parens_stack.is_empty() {
            return false;
        }
        self.is_math_on()
    }

    /// Mark the innermost important scope; declarations evaluated inside it
    /// become `!important`.
    pub fn mark_important(&mut self) {
        if let Some(scope) = self.important_scope.last_mut() {
            scope.important = true;
        }
    }

    pub fn with_parens<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.parens_stack.push(true);
        let result = f(self);
        self.parens_stack.pop();
        result
    }

    pub fn with_calc<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.calc_stack.push(true);
        let result = f(self);
        self.calc_stack.pop();
        result
    }

    pub fn with_math_on<T>(&mut self, math_on: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.math_on, math_on);
        let result = f(self);
        self.math_on = previous;
        result
    }

    pub fn with_math_mode<T>(&mut self, math: MathMode, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.math, math);
        let result = f(self);
        self.math = previous;
        result
    }

    /// Run `f` with `frames` as the whole scope chain.
    pub fn with_frames<T>(&mut self, frames: FrameChain, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.frames, frames);
        let result = f(self);
        self.frames = previous;
        result
    }

    /// Run `f` with `frame` pushed as the innermost frame.
    pub fn with_frame<T>(&mut self, frame: Rc<Ruleset>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.frames.push_innermost(frame);
        let result = f(self);
        self.frames.pop_innermost();
        result
    }

    /// Swap the innermost frame, as a ruleset does after splicing rules
    /// into its own body.
    pub fn refresh_innermost(&mut self, frame: Rc<Ruleset>) {
        self.frames.replace_innermost(frame);
    }

    /// Run `f` in a fresh important scope. Also returns whether something
    /// inside marked the scope important.
    pub fn with_important_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> (T, bool) {
        self.important_scope.push(ImportantScope::default());
        let result = f(self);
        let important = self
            .important_scope
            .pop()
            .is_some_and(|scope| scope.important);
        (result, important)
    }

    pub fn with_default_value<T>(
        &mut self,
        value: Option<bool>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let previous = std::mem::replace(&mut self.default_value, value);
        let result = f(self);
        self.default_value = previous;
        result
    }

    /// Fails once more expansions enclose the current point than the
    /// configured limit allows.
    pub fn check_mixin_depth(&self) -> EvalResult<()> {
        if self.mixin_depth > self.options.max_mixin_depth {
            return Err(errors::mixin_depth_exceeded(self.options.max_mixin_depth));
        }
        Ok(())
    }

    /// Run one mixin expansion one level deeper.
    pub fn with_mixin_call<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        self.check_mixin_depth()?;
        self.mixin_depth += 1;
        let result = f(self);
        self.mixin_depth -= 1;
        result
    }

    /// Run `f` with `id` marked in flight. Re-entering a node that is
    /// already in flight fails with `on_recursion()` instead.
    pub fn guard<T>(
        &mut self,
        id: NodeId,
        on_recursion: impl FnOnce() -> LessError,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        if !self.in_flight.insert(id) {
            return Err(on_recursion());
        }
        let result = f(self);
        self.in_flight.remove(&id);
        result
    }

    /// Whether `path` is rewritten under the current policy.
    pub fn path_requires_rewrite(&self, path: &str) -> bool {
        match self.options.rewrite_urls {
            RewriteUrls::Local => is_path_local_relative(path),
            RewriteUrls::Off | RewriteUrls::All => is_path_relative(path),
        }
    }

    /// `path` resolved against `rootpath`. A local-relative path stays
    /// visibly local when the root path is itself relative.
    pub fn rewrite_path(&self, path: &str, rootpath: &str) -> String {
        let rewritten = normalize_path(&format!("{rootpath}{path}"));
        if is_path_local_relative(path)
            && is_path_relative(rootpath)
            && !is_path_local_relative(&rewritten)
        {
            return format!("./{rewritten}");
        }
        rewritten
    }

    pub fn normalize_path(&self, path: &str) -> String {
        normalize_path(path)
    }
}
