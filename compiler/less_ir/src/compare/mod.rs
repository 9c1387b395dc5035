//! Three-way comparison of evaluated values, as used by guards.
//!
//! The result is `None` when the operands are incomparable; guards treat
//! that as false for every relational operator. Operands of different kinds
//! are always incomparable.

use std::cmp::Ordering;

use crate::output::CssContext;
use crate::{Dimension, Node};

pub fn compare(a: &Node, b: &Node) -> Option<Ordering> {
    match (a, b) {
        (Node::Dimension(a), Node::Dimension(b)) => compare_dimensions(a, b),
        (Node::Quoted(a), Node::Quoted(b)) if !a.escaped && !b.escaped => {
            Some(a.value.cmp(&b.value))
        }
        (Node::Quoted(_), Node::Quoted(_)) | (Node::Anonymous(_), Node::Anonymous(_)) => {
            css_equal(a, b)
        }
        (Node::Keyword(a), Node::Keyword(b)) => (a.value == b.value).then_some(Ordering::Equal),
        (Node::Boolean(a), Node::Boolean(b)) => (a.value == b.value).then_some(Ordering::Equal),
        (Node::Expression(_), Node::Expression(_)) | (Node::Value(_), Node::Value(_)) => {
            let (left, right) = (a.value_items()?, b.value_items()?);
            if left.len() != right.len() {
                return None;
            }
            left.iter()
                .zip(right)
                .all(|(l, r)| compare(l, r) == Some(Ordering::Equal))
                .then_some(Ordering::Equal)
        }
        _ => None,
    }
}

fn compare_dimensions(a: &Dimension, b: &Dimension) -> Option<Ordering> {
    if a.unit.is_empty() || b.unit.is_empty() {
        return a.value.partial_cmp(&b.value);
    }
    let (a, b) = (a.unify(), b.unify());
    if a.unit != b.unit {
        return None;
    }
    a.value.partial_cmp(&b.value)
}

fn css_equal(a: &Node, b: &Node) -> Option<Ordering> {
    let ctx = CssContext::default();
    match (a.to_css(&ctx), b.to_css(&ctx)) {
        (Ok(a), Ok(b)) if a == b => Some(Ordering::Equal),
        _ => None,
    }
}
