//! Factory functions for every error the evaluator raises.
//!
//! Keeping the wording here means tests and downstream formatters can rely on
//! a single spelling for each message.

use crate::LessError;

// Name resolution

#[cold]
pub fn undefined_variable(name: &str) -> LessError {
    LessError::name(format!("variable {name} is undefined"))
}

#[cold]
pub fn recursive_variable(name: &str) -> LessError {
    LessError::name(format!("Recursive variable definition for {name}"))
}

#[cold]
pub fn undefined_property(name: &str) -> LessError {
    LessError::name(format!("Property '{name}' is undefined"))
}

#[cold]
pub fn recursive_property(name: &str) -> LessError {
    LessError::name(format!("Recursive property reference for {name}"))
}

/// A namespace lookup named a variable the resolved scope does not declare.
#[cold]
pub fn namespace_variable_not_found(name: &str) -> LessError {
    LessError::name(format!("variable {name} not found"))
}

/// A namespace lookup named a property the resolved scope does not declare.
#[cold]
pub fn namespace_property_not_found(name: &str) -> LessError {
    LessError::name(format!("property \"{name}\" not found"))
}

#[cold]
pub fn namespace_without_declarations() -> LessError {
    LessError::name("no declarations found in namespace")
}

#[cold]
pub fn undefined_mixin(selector: &str) -> LessError {
    LessError::name(format!("{selector} is undefined"))
}

#[cold]
pub fn mixin_depth_exceeded(limit: usize) -> LessError {
    LessError::name(format!("Maximum mixin call depth exceeded ({limit})"))
}

// Mixin dispatch

#[cold]
pub fn no_matching_definition(call: &str) -> LessError {
    LessError::runtime(format!("No matching definition was found for `{call}`"))
}

#[cold]
pub fn ambiguous_default(call: &str) -> LessError {
    LessError::runtime(format!(
        "Ambiguous use of `default()` found when matching for `{call}`"
    ))
}

#[cold]
pub fn named_argument_not_found(mixin: &str, name: &str) -> LessError {
    LessError::runtime(format!("Named argument for {mixin} {name} not found"))
}

#[cold]
pub fn wrong_argument_count(mixin: &str, supplied: usize, arity: usize) -> LessError {
    LessError::runtime(format!(
        "wrong number of arguments for {mixin} ({supplied} for {arity})"
    ))
}

#[cold]
pub fn variable_call_failed(name: &str) -> LessError {
    LessError::runtime(format!("Could not evaluate variable call {name}"))
}

// Calls and operations

/// Wrap a failure raised inside a function body.
#[cold]
pub fn function_failed(function: &str, message: &str) -> LessError {
    LessError::runtime(format!("Error evaluating function `{function}`: {message}"))
}

#[cold]
pub fn invalid_function_argument(function: &str, expected: &str) -> LessError {
    LessError::runtime(format!("{function} expects {expected}"))
}

#[cold]
pub fn invalid_operation() -> LessError {
    LessError::runtime("Operation on an invalid type")
}

#[cold]
pub fn incompatible_units(left: &str, right: &str) -> LessError {
    LessError::runtime(format!(
        "Incompatible units. Change the units or use the unit function. Bad units: '{left}' and '{right}'."
    ))
}

// Output

#[cold]
pub fn multiple_units(unit: &str) -> LessError {
    LessError::syntax(format!(
        "Multiple units in dimension. Correct the units or use the unit function. Bad unit: {unit}"
    ))
}

#[cold]
pub fn ruleset_on_property() -> LessError {
    LessError::syntax("Rulesets cannot be evaluated on a property.")
}

#[cfg(test)]
mod tests;
