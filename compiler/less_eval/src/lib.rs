//! Less Eval - evaluator for the Less evaluation core.
//!
//! Takes a tree built from `less_ir` nodes and reduces it to plain values
//! and rulesets: variables and properties are resolved through the frame
//! chain, arithmetic runs under the configured math mode, function calls go
//! through the [`FunctionRegistry`], and mixin calls are dispatched to their
//! matching definitions.
//!
//! # Architecture
//!
//! - [`EvalContext`]: scope chain, math-mode state and every other stack
//!   evaluation needs, restored by closure helpers
//! - [`Eval`]: the `eval` entry point, implemented for [`Node`]
//! - `operators`: dimension arithmetic and guard comparison
//! - [`mixin`]: argument binding, guard evaluation and call dispatch
//! - `resolve`: variable calls, namespace lookups and extend bookkeeping
//! - [`functions`]: the registry and its builtins
//!
//! Errors are [`LessError`] values located at the innermost node that knows
//! its source position.
//!
//! [`Node`]: less_ir::Node

use std::sync::Once;

mod context;
pub mod environment;
mod eval;
pub mod functions;
pub mod mixin;
mod operators;
mod options;
pub mod plugin;
mod resolve;

pub use context::{is_path_local_relative, is_path_relative, normalize_path, EvalContext};
pub use eval::{eval_ruleset, Eval};
pub use functions::{CallSite, FunctionCaller, FunctionDef, FunctionRegistry, FunctionValue};
pub use less_diagnostic::{ErrorKind, LessError};
pub use options::{EvalOptions, MathMode, ParseOptionError, RewriteUrls};
pub use resolve::find_self_selectors;

/// Result type returned by every evaluation step.
pub type EvalResult<T> = Result<T, LessError>;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and only the first call has any
/// effect. Hosts that install their own subscriber should not call this.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
