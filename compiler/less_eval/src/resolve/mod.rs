//! Name resolution that goes through rule bodies rather than single
//! bindings: `@detached()` calls, namespace lookups such as
//! `#ns.mixin()[@var]`, and the bookkeeping extends carry into later passes.

mod extend;
mod namespace_value;
mod variable_call;

pub use extend::find_self_selectors;
pub(crate) use extend::eval_extend;
pub(crate) use namespace_value::eval_namespace_value;
pub(crate) use variable_call::eval_variable_call;

#[cfg(test)]
mod tests;
