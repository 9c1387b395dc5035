//! Property-based tests for unit arithmetic and number formatting.
//!
//! These generate random unit lists and magnitudes and check:
//! 1. Cancellation leaves no unit on both sides and is idempotent
//! 2. Conversion within a group round-trips
//! 3. Formatted numbers never use exponent notation and stay within the
//!    requested precision

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use less_ir::output::format_number;
use less_ir::{Unit, UnitGroup};
use proptest::prelude::*;

fn unit_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["px", "em", "s", "ms", "deg", "rad", "%"]).prop_map(str::to_string)
}

fn unit_strategy() -> impl Strategy<Value = Unit> {
    (
        prop::collection::vec(unit_name_strategy(), 0..4),
        prop::collection::vec(unit_name_strategy(), 0..4),
    )
        .prop_map(|(numerator, denominator)| Unit::new(numerator, denominator))
}

fn length_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["px", "cm", "mm", "in", "pt", "pc"]).prop_map(str::to_string)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_cancel_separates_sides(unit in unit_strategy()) {
        let mut cancelled = unit.clone();
        cancelled.cancel();
        for atomic in &cancelled.numerator {
            prop_assert!(!cancelled.denominator.contains(atomic));
        }

        let mut again = cancelled.clone();
        again.cancel();
        prop_assert_eq!(again.numerator, cancelled.numerator);
        prop_assert_eq!(again.denominator, cancelled.denominator);
    }

    #[test]
    fn prop_length_conversion_round_trips(
        value in -1.0e4f64..1.0e4,
        from in length_strategy(),
        to in length_strategy(),
    ) {
        let unit = Unit::of(&from);
        let (converted, target) = unit.convert(value, &[(UnitGroup::Length, to.clone())]);
        prop_assert_eq!(target.numerator.clone(), vec![to]);
        let (back, _) = target.convert(converted, &[(UnitGroup::Length, from)]);
        prop_assert!((back - value).abs() <= 1e-9 * value.abs().max(1.0));
    }

    #[test]
    fn prop_formatted_numbers_are_plain(value in -1.0e6f64..1.0e6, precision in 0u32..10) {
        let text = format_number(value, Some(precision));
        prop_assert!(!text.contains('e'), "{}", text);
        let parsed: f64 = text.parse().unwrap();
        let tolerance = 0.5 * 10f64.powi(-i32::try_from(precision).unwrap()) + 1e-9;
        prop_assert!((parsed - value).abs() <= tolerance, "{} vs {}", text, value);
    }
}
