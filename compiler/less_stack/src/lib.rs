//! Stack growth guard for recursive tree evaluation.
//!
//! Stylesheets nest arbitrarily: rulesets inside rulesets, mixin calls that
//! expand into further mixin calls, expressions wrapped in parentheses many
//! levels deep. Evaluation and visitor descent are plain recursion over the
//! node tree, so a deep but finite input must not overflow the native stack.
//! Cycles are a different problem and are stopped by the evaluator's
//! recursion guard, never here.
//!
//! On native targets the stack is grown on demand with `stacker`. On WASM
//! the closure runs directly.
//!
//! ```text
//! fn eval(node: &Node, ctx: &mut EvalContext) -> EvalResult<Node> {
//!     ensure_sufficient_stack(|| eval_inner(node, ctx))
//! }
//! ```

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
