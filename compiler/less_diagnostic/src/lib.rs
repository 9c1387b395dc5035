//! Error contract for the Less evaluation core.
//!
//! Every error that leaves evaluation is a [`LessError`]: a kind, a message,
//! and where it happened (filename and source index, plus line and column
//! when the source text is known). Other layers format that quadruple for
//! humans; nothing here renders source snippets.
//!
//! # Taxonomy
//!
//! - [`ErrorKind::Name`]: undefined variable, property or mixin, and
//!   recursive definitions.
//! - [`ErrorKind::Runtime`]: function-call failure, argument mismatch,
//!   invalid operations.
//! - [`ErrorKind::Syntax`]: malformed values found while generating CSS.
//!
//! Construct errors through the factory functions in [`errors`] so messages
//! stay consistent across the evaluator.

mod error;
pub mod errors;
pub mod span_utils;

pub use error::{ErrorKind, LessError};
