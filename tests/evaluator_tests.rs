//! End-to-end folding tests: literals, overflow, division and diagnostics rendering.

mod common;

use std::sync::Arc;

use common::{Fixture, ty};
use konst::constants::get_constant;
use konst::diagnostics::DiagnosticCode;
use konst::{ConstantValue, render_error};
use konst_core::PrimitiveKind::{self, Double, Int, Long};
use konst_core::lang::operators::OperatorToken;

#[test]
fn literal_forms() {
    let mut f = Fixture::new();
    let int = ty(Int);
    let cases: [(&str, Option<&konst::ResolvedType>, ConstantValue); 3] = [
        ("0x1F", Some(&int), ConstantValue::Int(31)),
        ("0b101", Some(&int), ConstantValue::Int(5)),
        ("123L", None, ConstantValue::Long(123)),
    ];
    for (text, expected, value) in cases {
        let expr = f.b.int(text);
        assert_eq!(f.constant(&expr, expected).to_constant_value(expected), value, "{text}");
    }
}

#[test]
fn deferred_integer_takes_use_site_width() {
    let mut f = Fixture::new();
    let expr = f.b.int("300");
    let constant = f.constant(&expr, None);
    assert_eq!(constant.to_constant_value(Some(&ty(PrimitiveKind::Short))), ConstantValue::Short(300));
    assert_eq!(constant.to_constant_value(Some(&ty(PrimitiveKind::Byte))), ConstantValue::Int(300));
    assert_eq!(constant.to_constant_value(Some(&ty(Long))), ConstantValue::Long(300));
}

#[test]
fn long_overflow_is_detected() {
    let mut f = Fixture::new();
    let expr = f.integral(Long, "9223372036854775807L", OperatorToken::Mul, "2L", "times");
    let value = f.constant(&expr, Some(&ty(Long))).to_constant_value(None);
    assert_eq!(value, ConstantValue::Long(-2));
    let codes: Vec<_> = f.trace.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::IntegerOverflow]);
}

#[test]
fn nested_arithmetic_without_overflow_is_clean() {
    let mut f = Fixture::new();
    let sum = f.integral(Int, "40", OperatorToken::Plus, "2", "plus");
    let three = f.b.int("3");
    let product = f.binary(sum, OperatorToken::Mul, three, "times", (Int, Int), Int);
    let constant = f.constant(&product, Some(&ty(Int)));
    assert_eq!(constant.to_constant_value(None), ConstantValue::Int(126));
    assert!(constant.is_pure());
    assert!(f.trace.diagnostics().is_empty());
}

#[test]
fn division_by_zero_integer_and_floating() {
    let mut f = Fixture::new();
    let int_div = f.integral(Int, "5", OperatorToken::Div, "0", "div");
    assert!(f.constant(&int_div, Some(&ty(Int))).is_error());
    assert!(get_constant(&f.trace, int_div.id).is_none());

    let (l, r) = (f.b.float("5.0"), f.b.float("0.0"));
    let float_div = f.binary(l, OperatorToken::Div, r, "div", (Double, Double), Double);
    let value = f.constant(&float_div, Some(&ty(Double))).to_constant_value(None);
    assert_eq!(value, ConstantValue::Double(f64::INFINITY));

    let codes: Vec<_> = f.trace.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::DivisionByZero]);
}

#[test]
fn second_evaluation_returns_cached_object() {
    let mut f = Fixture::new();
    let expr = f.integral(Int, "2147483647", OperatorToken::Plus, "1", "plus");
    let first = f.constant(&expr, Some(&ty(Int)));
    let second = f.constant(&expr, Some(&ty(Int)));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(f.trace.diagnostics().len(), 1);
}

#[test]
fn overflow_diagnostic_renders() {
    let mut f = Fixture::new();
    let expr = f.integral(Int, "2147483647", OperatorToken::Plus, "1", "plus");
    let _ = f.constant(&expr, Some(&ty(Int)));
    let mut diagnostic = f.trace.diagnostics()[0].clone();
    diagnostic.span = konst::ast::Span::new(8, 22);

    insta::assert_snapshot!(render_error("Limits.kt", "val x = 2147483647 + 1", &diagnostic), @r"
    warning[konst::integer_overflow]: This operation has led to an overflow
      --> Limits.kt:1:9
        |
      1 | val x = 2147483647 + 1
        |         ^^^^^^^^^^^^^^
      = note: The folded value wraps around to the machine-width result
    ");
}

#[test]
fn constant_display() {
    insta::assert_snapshot!(ConstantValue::Double(1e10).to_string(), @"1.0E10");
    insta::assert_snapshot!(ConstantValue::String("a".into()).to_string(), @r#""a""#);
}
