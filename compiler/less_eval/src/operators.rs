//! Dimension arithmetic and relational guard operators.
//!
//! The operand set is closed (only dimensions take part in arithmetic), so
//! both entry points are plain functions over the operand types rather than
//! per-node trait methods.

use std::cmp::Ordering;

use less_diagnostic::errors;
use less_ir::{CondOp, Dimension, Unit};

use crate::EvalResult;

fn apply(op: &str, left: f64, right: f64) -> EvalResult<f64> {
    match op {
        "+" => Ok(left + right),
        "-" => Ok(left - right),
        "*" => Ok(left * right),
        "/" => Ok(left / right),
        _ => Err(errors::invalid_operation()),
    }
}

fn sorted(mut units: Vec<String>) -> Vec<String> {
    units.sort();
    units
}

/// `left op right` for two dimensions.
///
/// Addition and subtraction convert the right operand into the left's units;
/// a unitless left operand takes the right's unit instead, and a unitless
/// right operand leaves the left unit alone. Multiplication
/// and division combine the unit fractions and cancel.
pub fn operate(op: &str, left: &Dimension, right: &Dimension, strict_units: bool) -> EvalResult<Dimension> {
    let mut value = apply(op, left.value, right.value)?;
    let mut unit = left.unit.clone();

    match op {
        "+" | "-" => {
            if unit.is_empty() {
                unit = right.unit.clone();
                if left.unit.backup_unit.is_some() {
                    unit.backup_unit.clone_from(&left.unit.backup_unit);
                }
            } else if !right.unit.numerator.is_empty() || !unit.denominator.is_empty() {
                let converted = right.convert_to(&left.unit.used_units());
                if strict_units && converted.unit.to_string() != unit.to_string() {
                    return Err(errors::incompatible_units(
                        &unit.to_string(),
                        &converted.unit.to_string(),
                    ));
                }
                value = apply(op, left.value, converted.value)?;
            }
        }
        "*" => {
            unit = combine(
                left.unit.numerator.iter().chain(&right.unit.numerator),
                left.unit.denominator.iter().chain(&right.unit.denominator),
                &left.unit,
            );
        }
        "/" => {
            unit = combine(
                left.unit.numerator.iter().chain(&right.unit.denominator),
                left.unit.denominator.iter().chain(&right.unit.numerator),
                &left.unit,
            );
        }
        _ => {}
    }

    Ok(Dimension::with_unit(value, unit))
}

fn combine<'a>(
    numerator: impl Iterator<Item = &'a String>,
    denominator: impl Iterator<Item = &'a String>,
    left: &Unit,
) -> Unit {
    let mut unit = Unit {
        numerator: sorted(numerator.cloned().collect()),
        denominator: sorted(denominator.cloned().collect()),
        backup_unit: left.backup_unit.clone(),
    };
    unit.cancel();
    unit
}

/// Whether a relational guard holds for an ordering. Incomparable operands
/// satisfy no operator.
pub fn relation_holds(op: CondOp, ordering: Option<Ordering>) -> bool {
    match ordering {
        Some(Ordering::Less) => matches!(op, CondOp::Lt | CondOp::LtEq),
        Some(Ordering::Equal) => matches!(op, CondOp::Eq | CondOp::GtEq | CondOp::LtEq),
        Some(Ordering::Greater) => matches!(op, CondOp::Gt | CondOp::GtEq),
        None => false,
    }
}
