//! Property-based tests for the konst engine
//!
//! These tests use proptest to check the overflow checkers against exact arithmetic and the evaluator against the
//! registry across many randomly generated operands.

mod common;

use common::{Fixture, ty};
use konst::constants::operations::overflowed;
use konst::{ConstantValue, NativeValue, OperationRegistry};
use konst_core::PrimitiveKind::{Int, Long};
use konst_core::lang::operators::OperatorToken;
use num_bigint::BigInt;
use proptest::prelude::*;

/// Property: the checker flags a machine result exactly when the exact result leaves the `Int` range.
fn int_checker_agrees(name: &str, a: i32, b: i32, exact: Option<i32>) {
    let op = OperationRegistry::shared().binary(name, Int, Int).expect("registered");
    let machine = (op.compute)(&NativeValue::Int(a), &NativeValue::Int(b)).expect("defined");
    let checker = op.checker.expect("integral operations have checkers");
    let exact_big = checker(&BigInt::from(a), &BigInt::from(b)).expect("exact result");
    assert_eq!(overflowed(&machine, &exact_big), exact.is_none(), "{name}({a}, {b})");
    if let Some(exact) = exact {
        assert_eq!(machine, NativeValue::Int(exact));
    }
}

proptest! {
    #[test]
    fn int_plus_checker(a in any::<i32>(), b in any::<i32>()) {
        int_checker_agrees("plus", a, b, a.checked_add(b));
    }

    #[test]
    fn int_minus_checker(a in any::<i32>(), b in any::<i32>()) {
        int_checker_agrees("minus", a, b, a.checked_sub(b));
    }

    #[test]
    fn int_times_checker(a in any::<i32>(), b in any::<i32>()) {
        int_checker_agrees("times", a, b, a.checked_mul(b));
    }

    #[test]
    fn long_plus_wraps(a in any::<i64>(), b in any::<i64>()) {
        let op = OperationRegistry::shared().binary("plus", Long, Long).expect("registered");
        let machine = (op.compute)(&NativeValue::Long(a), &NativeValue::Long(b)).expect("defined");
        prop_assert_eq!(&machine, &NativeValue::Long(a.wrapping_add(b)));
        let exact = (op.checker.expect("checker"))(&BigInt::from(a), &BigInt::from(b)).expect("exact");
        prop_assert_eq!(overflowed(&machine, &exact), a.checked_add(b).is_none());
    }

    /// Property: folding `a + b` over non-negative literals reports a diagnostic iff the sum overflows.
    #[test]
    fn folded_sum_reports_overflow(a in 0..=i32::MAX, b in 0..=i32::MAX) {
        let mut f = Fixture::new();
        let expr = f.integral(Int, &a.to_string(), OperatorToken::Plus, &b.to_string(), "plus");
        let value = f.constant(&expr, Some(&ty(Int))).to_constant_value(None);
        prop_assert_eq!(value, ConstantValue::Int(a.wrapping_add(b)));
        prop_assert_eq!(f.trace.diagnostics().len(), usize::from(a.checked_add(b).is_none()));
    }

    /// Property: literal parsers never panic.
    #[test]
    fn literal_parsers_are_total(s in "\\PC*") {
        use konst::constants::evaluator::literals;
        let _ = literals::parse_long(&s);
        let _ = literals::parse_floating(&s);
        let _ = literals::parse_char(&s);
    }
}
