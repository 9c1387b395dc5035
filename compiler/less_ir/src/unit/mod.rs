//! Units attached to dimensions.
//!
//! A unit is a product of atomic units over a product of atomic units
//! (`px*px/s`). Arithmetic concatenates and cancels; conversion works within
//! one of three groups (length, duration, angle) by ratio to a base unit.

use std::collections::BTreeMap;
use std::fmt;

/// A group of mutually convertible atomic units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitGroup {
    Length,
    Duration,
    Angle,
}

impl UnitGroup {
    pub const ALL: [UnitGroup; 3] = [UnitGroup::Length, UnitGroup::Duration, UnitGroup::Angle];

    /// Unit every member converts to when unifying.
    pub fn base_unit(self) -> &'static str {
        match self {
            UnitGroup::Length => "px",
            UnitGroup::Duration => "s",
            UnitGroup::Angle => "rad",
        }
    }

    /// Size of `unit` relative to the group's reference, if it belongs here.
    pub fn ratio(self, unit: &str) -> Option<f64> {
        let unit = unit.to_ascii_lowercase();
        let ratio = match (self, unit.as_str()) {
            (UnitGroup::Length, "m") => 1.0,
            (UnitGroup::Length, "cm") => 0.01,
            (UnitGroup::Length, "mm") => 0.001,
            (UnitGroup::Length, "in") => 0.0254,
            (UnitGroup::Length, "px") => 0.0254 / 96.0,
            (UnitGroup::Length, "pt") => 0.0254 / 72.0,
            (UnitGroup::Length, "pc") => 0.0254 / 72.0 * 12.0,
            (UnitGroup::Duration, "s") => 1.0,
            (UnitGroup::Duration, "ms") => 0.001,
            (UnitGroup::Angle, "rad") => 1.0 / (2.0 * std::f64::consts::PI),
            (UnitGroup::Angle, "deg") => 1.0 / 360.0,
            (UnitGroup::Angle, "grad") => 1.0 / 400.0,
            (UnitGroup::Angle, "turn") => 1.0,
            _ => return None,
        };
        Some(ratio)
    }

    pub fn of(unit: &str) -> Option<UnitGroup> {
        Self::ALL
            .into_iter()
            .find(|group| group.ratio(unit).is_some())
    }
}

const LENGTH_UNITS: &[&str] = &[
    "px", "em", "ex", "ch", "rem", "in", "cm", "mm", "pc", "pt", "vw", "vh", "vmin", "vmax",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unit {
    pub numerator: Vec<String>,
    pub denominator: Vec<String>,
    /// Unit to print when the unit is not singular and strict units are off.
    pub backup_unit: Option<String>,
}

impl Unit {
    pub fn new(numerator: Vec<String>, denominator: Vec<String>) -> Self {
        let backup_unit = numerator.first().cloned();
        let mut numerator = numerator;
        let mut denominator = denominator;
        numerator.sort();
        denominator.sort();
        Unit {
            numerator,
            denominator,
            backup_unit,
        }
    }

    /// A single atomic unit; the empty string is unitless.
    pub fn of(unit: &str) -> Self {
        if unit.is_empty() {
            Unit::default()
        } else {
            Unit::new(vec![unit.to_string()], Vec::new())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.numerator.is_empty() && self.denominator.is_empty()
    }

    pub fn is_singular(&self) -> bool {
        self.numerator.len() <= 1 && self.denominator.is_empty()
    }

    pub fn is_length(&self) -> bool {
        let text = self.to_string();
        LENGTH_UNITS
            .iter()
            .any(|unit| unit.eq_ignore_ascii_case(&text))
    }

    /// Remove units appearing in both numerator and denominator.
    pub fn cancel(&mut self) {
        let mut counter: BTreeMap<String, i64> = BTreeMap::new();
        for unit in self.numerator.drain(..) {
            *counter.entry(unit).or_default() += 1;
        }
        for unit in self.denominator.drain(..) {
            *counter.entry(unit).or_default() -= 1;
        }
        for (unit, count) in counter {
            let target = if count > 0 {
                &mut self.numerator
            } else {
                &mut self.denominator
            };
            for _ in 0..count.unsigned_abs() {
                target.push(unit.clone());
            }
        }
    }

    /// First unit used from each conversion group.
    pub fn used_units(&self) -> Vec<(UnitGroup, String)> {
        let mut used: Vec<(UnitGroup, String)> = Vec::new();
        for unit in self.numerator.iter().chain(&self.denominator) {
            if let Some(group) = UnitGroup::of(unit) {
                if !used.iter().any(|(seen, _)| *seen == group) {
                    used.push((group, unit.clone()));
                }
            }
        }
        used
    }

    /// Convert `value` expressed in this unit into the `targets` units.
    pub fn convert(&self, value: f64, targets: &[(UnitGroup, String)]) -> (f64, Unit) {
        let mut value = value;
        let mut unit = self.clone();
        for (group, target) in targets {
            let Some(target_ratio) = group.ratio(target) else {
                continue;
            };
            for atomic in &mut unit.numerator {
                if let Some(ratio) = group.ratio(atomic) {
                    value *= ratio / target_ratio;
                    atomic.clone_from(target);
                }
            }
            for atomic in &mut unit.denominator {
                if let Some(ratio) = group.ratio(atomic) {
                    value /= ratio / target_ratio;
                    atomic.clone_from(target);
                }
            }
        }
        unit.cancel();
        (value, unit)
    }

    /// Convert into base units of every group.
    pub fn unify(&self, value: f64) -> (f64, Unit) {
        let targets: Vec<(UnitGroup, String)> = UnitGroup::ALL
            .into_iter()
            .map(|group| (group, group.base_unit().to_string()))
            .collect();
        self.convert(value, &targets)
    }

    /// The text printed after a number.
    pub fn css_text(&self, strict_units: bool) -> Option<&str> {
        if self.numerator.len() == 1 {
            return self.numerator.first().map(String::as_str);
        }
        if strict_units {
            return None;
        }
        self.backup_unit
            .as_deref()
            .or_else(|| self.denominator.first().map(String::as_str))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.numerator.join("*"))?;
        for unit in &self.denominator {
            write!(f, "/{unit}")?;
        }
        Ok(())
    }
}
