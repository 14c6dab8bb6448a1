//! Operation registry: compute functions for every foldable operator over the compile-time operand kinds.
//!
//! The registry is keyed by operator-convention name and operand kinds:
//! - binary: `(name, receiver kind, argument kind)`
//! - unary: `(name, receiver kind)`
//!
//! Each entry computes over [`NativeValue`]s with machine-width semantics (integers wrap, floats follow IEEE 754).
//! Integer arithmetic entries additionally carry an **overflow checker**, which recomputes the operation over
//! [`BigInt`]; the evaluator compares the two results to detect overflow.
//!
//! ## Notes
//! - A compute function returns `None` when the machine operation fails (integer `div`/`rem` by zero); the
//!   evaluator treats that as "not constant".
//! - Arithmetic over `Byte` and `Short` follows numeric promotion and never stays narrow.
//! - The table is built once per process ([`OperationRegistry::shared`]) and is read-only afterwards.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use konst_core::lang::operators;
use konst_core::lang::types::primitives::NUMERIC_KINDS;
use konst_core::{PrimitiveKind, promote_numeric};
use num_bigint::{BigInt, Sign};

use crate::constants::value::NativeValue;

pub type BinaryCompute = Box<dyn Fn(&NativeValue, &NativeValue) -> Option<NativeValue> + Send + Sync>;
pub type UnaryCompute = Box<dyn Fn(&NativeValue) -> Option<NativeValue> + Send + Sync>;
pub type BinaryChecker = fn(&BigInt, &BigInt) -> Option<BigInt>;
pub type UnaryChecker = fn(&BigInt) -> Option<BigInt>;

pub struct BinaryOperation {
    pub compute: BinaryCompute,
    pub checker: Option<BinaryChecker>,
}

pub struct UnaryOperation {
    pub compute: UnaryCompute,
    pub checker: Option<UnaryChecker>,
}

impl std::fmt::Debug for BinaryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryOperation")
            .field("checked", &self.checker.is_some())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for UnaryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnaryOperation")
            .field("checked", &self.checker.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct OperationRegistry {
    binary: HashMap<&'static str, HashMap<(PrimitiveKind, PrimitiveKind), BinaryOperation>>,
    unary: HashMap<&'static str, HashMap<PrimitiveKind, UnaryOperation>>,
}

static SHARED: LazyLock<OperationRegistry> = LazyLock::new(OperationRegistry::new);

/// Integer arithmetic with an exact counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Plus,
    Minus,
    Times,
    Div,
    Rem,
    Mod,
}

const ARITH_OPS: &[(&str, ArithOp)] = &[
    ("plus", ArithOp::Plus),
    ("minus", ArithOp::Minus),
    ("times", ArithOp::Times),
    (operators::DIV, ArithOp::Div),
    ("rem", ArithOp::Rem),
    ("mod", ArithOp::Mod),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BitOp {
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftOp {
    Shl,
    Shr,
    Ushr,
}

impl OperationRegistry {
    /// The process-wide registry.
    pub fn shared() -> &'static OperationRegistry {
        &SHARED
    }

    pub fn new() -> Self {
        let mut registry = OperationRegistry::default();
        registry.register_numeric();
        registry.register_bitwise();
        registry.register_char();
        registry.register_boolean();
        registry.register_string();
        registry.register_equality();
        registry
    }

    /// Look up a binary operation by convention name and operand kinds.
    pub fn binary(&self, name: &str, left: PrimitiveKind, right: PrimitiveKind) -> Option<&BinaryOperation> {
        self.binary.get(name)?.get(&(left, right))
    }

    /// Look up a unary operation by function name and receiver kind.
    pub fn unary(&self, name: &str, operand: PrimitiveKind) -> Option<&UnaryOperation> {
        self.unary.get(name)?.get(&operand)
    }

    pub fn binary_len(&self) -> usize {
        self.binary.values().map(HashMap::len).sum()
    }

    pub fn unary_len(&self) -> usize {
        self.unary.values().map(HashMap::len).sum()
    }

    fn add_binary(
        &mut self,
        name: &'static str,
        left: PrimitiveKind,
        right: PrimitiveKind,
        compute: impl Fn(&NativeValue, &NativeValue) -> Option<NativeValue> + Send + Sync + 'static,
        checker: Option<BinaryChecker>,
    ) {
        let compute: BinaryCompute = Box::new(compute);
        self.binary
            .entry(name)
            .or_default()
            .insert((left, right), BinaryOperation { compute, checker });
    }

    fn add_unary(
        &mut self,
        name: &'static str,
        operand: PrimitiveKind,
        compute: impl Fn(&NativeValue) -> Option<NativeValue> + Send + Sync + 'static,
        checker: Option<UnaryChecker>,
    ) {
        let compute: UnaryCompute = Box::new(compute);
        self.unary
            .entry(name)
            .or_default()
            .insert(operand, UnaryOperation { compute, checker });
    }

    // ---- numeric ----------------------------------------------------------------------------------------------

    fn register_numeric(&mut self) {
        for &left in NUMERIC_KINDS {
            for &right in NUMERIC_KINDS {
                let Some(result) = promote_numeric(left, right) else {
                    continue;
                };
                let integral = left.is_integral() && right.is_integral();
                for &(name, op) in ARITH_OPS {
                    let checker = integral.then_some(exact_checker(op));
                    self.add_binary(
                        name,
                        left,
                        right,
                        move |a, b| arithmetic(op, result, a, b),
                        checker,
                    );
                }
                self.add_binary(
                    operators::COMPARE_TO,
                    left,
                    right,
                    move |a, b| compare_numeric(result, a, b).map(ordering_to_int),
                    None,
                );
            }
        }

        for &kind in NUMERIC_KINDS {
            let widened = if matches!(kind, PrimitiveKind::Byte | PrimitiveKind::Short) {
                PrimitiveKind::Int
            } else {
                kind
            };
            for name in ["minus", "unaryMinus"] {
                let checker = kind.is_integral().then_some(exact_negate as UnaryChecker);
                self.add_unary(name, kind, move |a| negate(widened, a), checker);
            }
            for name in ["plus", "unaryPlus"] {
                self.add_unary(name, kind, move |a| convert(widened, a), None);
            }
            self.add_unary("inc", kind, move |a| step(kind, a, 1), None);
            self.add_unary("dec", kind, move |a| step(kind, a, -1), None);
            self.register_conversions(kind);
        }

        for kind in [PrimitiveKind::Int, PrimitiveKind::Long] {
            self.add_unary("inv", kind, move |a| invert(kind, a), None);
        }
    }

    fn register_conversions(&mut self, kind: PrimitiveKind) {
        const CONVERSIONS: &[(&str, PrimitiveKind)] = &[
            ("toByte", PrimitiveKind::Byte),
            ("toShort", PrimitiveKind::Short),
            ("toInt", PrimitiveKind::Int),
            ("toLong", PrimitiveKind::Long),
            ("toFloat", PrimitiveKind::Float),
            ("toDouble", PrimitiveKind::Double),
            ("toChar", PrimitiveKind::Char),
        ];
        for &(name, target) in CONVERSIONS {
            self.add_unary(name, kind, move |a| convert(target, a), None);
        }
        self.add_unary(
            "toString",
            kind,
            |a| Some(NativeValue::String(a.to_java_string())),
            None,
        );
    }

    // ---- bitwise ----------------------------------------------------------------------------------------------

    fn register_bitwise(&mut self) {
        for kind in [PrimitiveKind::Int, PrimitiveKind::Long] {
            for (name, op) in [("and", BitOp::And), ("or", BitOp::Or), ("xor", BitOp::Xor)] {
                self.add_binary(name, kind, kind, move |a, b| bitwise(op, a, b), None);
            }
            for (name, op) in [("shl", ShiftOp::Shl), ("shr", ShiftOp::Shr), ("ushr", ShiftOp::Ushr)] {
                self.add_binary(
                    name,
                    kind,
                    PrimitiveKind::Int,
                    move |a, b| shift(op, a, b),
                    None,
                );
            }
        }
    }

    // ---- char -------------------------------------------------------------------------------------------------

    fn register_char(&mut self) {
        use PrimitiveKind::{Char, Int};

        self.add_binary(
            "plus",
            Char,
            Int,
            |a, b| match (a, b) {
                (NativeValue::Char(c), NativeValue::Int(i)) => {
                    Some(NativeValue::Char(i32::from(*c).wrapping_add(*i) as u16))
                }
                _ => None,
            },
            None,
        );
        self.add_binary(
            "minus",
            Char,
            Int,
            |a, b| match (a, b) {
                (NativeValue::Char(c), NativeValue::Int(i)) => {
                    Some(NativeValue::Char(i32::from(*c).wrapping_sub(*i) as u16))
                }
                _ => None,
            },
            None,
        );
        self.add_binary(
            "minus",
            Char,
            Char,
            |a, b| match (a, b) {
                (NativeValue::Char(x), NativeValue::Char(y)) => Some(NativeValue::Int(i32::from(*x) - i32::from(*y))),
                _ => None,
            },
            None,
        );
        self.add_binary(
            operators::COMPARE_TO,
            Char,
            Char,
            |a, b| match (a, b) {
                (NativeValue::Char(x), NativeValue::Char(y)) => Some(ordering_to_int(x.cmp(y))),
                _ => None,
            },
            None,
        );

        self.add_unary("inc", Char, |a| step(Char, a, 1), None);
        self.add_unary("dec", Char, |a| step(Char, a, -1), None);
        self.register_conversions(Char);
    }

    // ---- boolean ----------------------------------------------------------------------------------------------

    fn register_boolean(&mut self) {
        use PrimitiveKind::Boolean;

        let logic: [(&'static str, fn(bool, bool) -> bool); 3] =
            [("and", |a, b| a & b), ("or", |a, b| a | b), ("xor", |a, b| a ^ b)];
        for (name, f) in logic {
            self.add_binary(
                name,
                Boolean,
                Boolean,
                move |a, b| match (a, b) {
                    (NativeValue::Boolean(x), NativeValue::Boolean(y)) => Some(NativeValue::Boolean(f(*x, *y))),
                    _ => None,
                },
                None,
            );
        }
        self.add_binary(
            operators::COMPARE_TO,
            Boolean,
            Boolean,
            |a, b| match (a, b) {
                (NativeValue::Boolean(x), NativeValue::Boolean(y)) => Some(ordering_to_int(x.cmp(y))),
                _ => None,
            },
            None,
        );
        self.add_unary(
            "not",
            Boolean,
            |a| match a {
                NativeValue::Boolean(x) => Some(NativeValue::Boolean(!x)),
                _ => None,
            },
            None,
        );
        self.add_unary(
            "toString",
            Boolean,
            |a| Some(NativeValue::String(a.to_java_string())),
            None,
        );
    }

    // ---- string -----------------------------------------------------------------------------------------------

    fn register_string(&mut self) {
        use PrimitiveKind::{Any, String};

        self.add_binary(
            "plus",
            String,
            Any,
            |a, b| match a {
                NativeValue::String(s) => Some(NativeValue::String(format!("{s}{}", b.to_java_string()))),
                _ => None,
            },
            None,
        );
        self.add_binary(
            operators::COMPARE_TO,
            String,
            String,
            |a, b| match (a, b) {
                (NativeValue::String(x), NativeValue::String(y)) => Some(NativeValue::Int(compare_utf16(x, y))),
                _ => None,
            },
            None,
        );
        self.add_unary(
            "length",
            String,
            |a| match a {
                NativeValue::String(s) => Some(NativeValue::Int(s.encode_utf16().count() as i32)),
                _ => None,
            },
            None,
        );
        self.add_unary("toString", String, |a| Some(a.clone()), None);
    }

    // ---- equality ---------------------------------------------------------------------------------------------

    fn register_equality(&mut self) {
        for kind in NUMERIC_KINDS
            .iter()
            .copied()
            .chain([PrimitiveKind::Char, PrimitiveKind::Boolean, PrimitiveKind::String])
        {
            self.add_binary(
                operators::EQUALS,
                kind,
                PrimitiveKind::Any,
                |a, b| Some(NativeValue::Boolean(a == b)),
                None,
            );
        }
    }
}

// ---- machine-width compute ------------------------------------------------------------------------------------

fn as_f64(value: &NativeValue) -> Option<f64> {
    match value {
        NativeValue::Float(v) => Some(f64::from(*v)),
        NativeValue::Double(v) => Some(*v),
        other => other.as_integral().map(|v| v as f64),
    }
}

fn as_f32(value: &NativeValue) -> Option<f32> {
    match value {
        NativeValue::Float(v) => Some(*v),
        NativeValue::Double(v) => Some(*v as f32),
        other => other.as_integral().map(|v| v as f32),
    }
}

/// Integer arithmetic in 64 bits; 32-bit results are the truncation of the wrapped 64-bit result.
fn integer_arithmetic(op: ArithOp, a: i64, b: i64) -> Option<i64> {
    Some(match op {
        ArithOp::Plus => a.wrapping_add(b),
        ArithOp::Minus => a.wrapping_sub(b),
        ArithOp::Times => a.wrapping_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        ArithOp::Rem => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        ArithOp::Mod => {
            if b == 0 {
                return None;
            }
            let r = a.wrapping_rem(b);
            if r != 0 && (r < 0) != (b < 0) { r + b } else { r }
        }
    })
}

fn int32_arithmetic(op: ArithOp, a: i32, b: i32) -> Option<i32> {
    Some(match op {
        ArithOp::Plus => a.wrapping_add(b),
        ArithOp::Minus => a.wrapping_sub(b),
        ArithOp::Times => a.wrapping_mul(b),
        _ => integer_arithmetic(op, i64::from(a), i64::from(b))? as i32,
    })
}

macro_rules! float_arithmetic {
    ($op:expr, $a:expr, $b:expr) => {{
        let (a, b) = ($a, $b);
        match $op {
            ArithOp::Plus => a + b,
            ArithOp::Minus => a - b,
            ArithOp::Times => a * b,
            ArithOp::Div => a / b,
            ArithOp::Rem => a % b,
            ArithOp::Mod => {
                let r = a % b;
                if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
            }
        }
    }};
}

fn arithmetic(op: ArithOp, result: PrimitiveKind, a: &NativeValue, b: &NativeValue) -> Option<NativeValue> {
    match result {
        PrimitiveKind::Int => {
            let (a, b) = (a.as_integral()? as i32, b.as_integral()? as i32);
            int32_arithmetic(op, a, b).map(NativeValue::Int)
        }
        PrimitiveKind::Long => integer_arithmetic(op, a.as_integral()?, b.as_integral()?).map(NativeValue::Long),
        PrimitiveKind::Float => Some(NativeValue::Float(float_arithmetic!(op, as_f32(a)?, as_f32(b)?))),
        PrimitiveKind::Double => Some(NativeValue::Double(float_arithmetic!(op, as_f64(a)?, as_f64(b)?))),
        _ => None,
    }
}

fn compare_numeric(result: PrimitiveKind, a: &NativeValue, b: &NativeValue) -> Option<Ordering> {
    match result {
        PrimitiveKind::Float => Some(as_f32(a)?.total_cmp(&as_f32(b)?)),
        PrimitiveKind::Double => Some(as_f64(a)?.total_cmp(&as_f64(b)?)),
        _ => Some(a.as_integral()?.cmp(&b.as_integral()?)),
    }
}

fn ordering_to_int(ordering: Ordering) -> NativeValue {
    NativeValue::Int(match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

/// Host-platform string comparison: difference of the first differing UTF-16 units, else of the lengths.
fn compare_utf16(a: &str, b: &str) -> i32 {
    let mut left = a.encode_utf16();
    let mut right = b.encode_utf16();
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) if x != y => return i32::from(x) - i32::from(y),
            (Some(_), Some(_)) => {}
            (Some(_), None) => return 1 + left.count() as i32,
            (None, Some(_)) => return -(1 + right.count() as i32),
            (None, None) => return 0,
        }
    }
}

fn negate(result: PrimitiveKind, a: &NativeValue) -> Option<NativeValue> {
    match (result, a) {
        (PrimitiveKind::Float, NativeValue::Float(v)) => Some(NativeValue::Float(-v)),
        (PrimitiveKind::Double, NativeValue::Double(v)) => Some(NativeValue::Double(-v)),
        (PrimitiveKind::Int, value) => Some(NativeValue::Int((value.as_integral()? as i32).wrapping_neg())),
        (PrimitiveKind::Long, NativeValue::Long(v)) => Some(NativeValue::Long(v.wrapping_neg())),
        _ => None,
    }
}

fn step(kind: PrimitiveKind, a: &NativeValue, delta: i8) -> Option<NativeValue> {
    Some(match a {
        NativeValue::Byte(v) => NativeValue::Byte(v.wrapping_add(delta)),
        NativeValue::Short(v) => NativeValue::Short(v.wrapping_add(i16::from(delta))),
        NativeValue::Int(v) => NativeValue::Int(v.wrapping_add(i32::from(delta))),
        NativeValue::Long(v) => NativeValue::Long(v.wrapping_add(i64::from(delta))),
        NativeValue::Float(v) => NativeValue::Float(v + f32::from(delta)),
        NativeValue::Double(v) => NativeValue::Double(v + f64::from(delta)),
        NativeValue::Char(c) if kind == PrimitiveKind::Char => {
            NativeValue::Char(c.wrapping_add_signed(i16::from(delta)))
        }
        _ => return None,
    })
}

fn invert(kind: PrimitiveKind, a: &NativeValue) -> Option<NativeValue> {
    match (kind, a) {
        (PrimitiveKind::Int, NativeValue::Int(v)) => Some(NativeValue::Int(!v)),
        (PrimitiveKind::Long, NativeValue::Long(v)) => Some(NativeValue::Long(!v)),
        _ => None,
    }
}

/// Numeric conversion with host-platform semantics.
///
/// Floating values convert to `Byte`, `Short` and `Char` through `Int`; float-to-integer conversions saturate and
/// map `NaN` to zero.
fn convert(target: PrimitiveKind, a: &NativeValue) -> Option<NativeValue> {
    let integral = match a {
        NativeValue::Char(c) => Some(i64::from(*c)),
        NativeValue::Float(v) => Some(if matches!(target, PrimitiveKind::Long) {
            *v as i64
        } else {
            i64::from(*v as i32)
        }),
        NativeValue::Double(v) => Some(if matches!(target, PrimitiveKind::Long) {
            *v as i64
        } else {
            i64::from(*v as i32)
        }),
        other => other.as_integral(),
    };
    Some(match target {
        PrimitiveKind::Byte => NativeValue::Byte(integral? as i8),
        PrimitiveKind::Short => NativeValue::Short(integral? as i16),
        PrimitiveKind::Int => NativeValue::Int(integral? as i32),
        PrimitiveKind::Long => NativeValue::Long(integral?),
        PrimitiveKind::Char => NativeValue::Char(integral? as u16),
        PrimitiveKind::Float => NativeValue::Float(match a {
            NativeValue::Char(c) => f32::from(*c),
            other => as_f32(other)?,
        }),
        PrimitiveKind::Double => NativeValue::Double(match a {
            NativeValue::Char(c) => f64::from(*c),
            other => as_f64(other)?,
        }),
        _ => return None,
    })
}

fn bitwise(op: BitOp, a: &NativeValue, b: &NativeValue) -> Option<NativeValue> {
    macro_rules! apply {
        ($x:expr, $y:expr) => {
            match op {
                BitOp::And => $x & $y,
                BitOp::Or => $x | $y,
                BitOp::Xor => $x ^ $y,
            }
        };
    }
    match (a, b) {
        (NativeValue::Int(x), NativeValue::Int(y)) => Some(NativeValue::Int(apply!(x, y))),
        (NativeValue::Long(x), NativeValue::Long(y)) => Some(NativeValue::Long(apply!(x, y))),
        _ => None,
    }
}

/// Shifts use only the low 5 (`Int`) or 6 (`Long`) bits of the distance.
fn shift(op: ShiftOp, a: &NativeValue, b: &NativeValue) -> Option<NativeValue> {
    let NativeValue::Int(distance) = b else {
        return None;
    };
    let distance = *distance as u32;
    match a {
        NativeValue::Int(x) => Some(NativeValue::Int(match op {
            ShiftOp::Shl => x.wrapping_shl(distance),
            ShiftOp::Shr => x.wrapping_shr(distance),
            ShiftOp::Ushr => (*x as u32).wrapping_shr(distance) as i32,
        })),
        NativeValue::Long(x) => Some(NativeValue::Long(match op {
            ShiftOp::Shl => x.wrapping_shl(distance),
            ShiftOp::Shr => x.wrapping_shr(distance),
            ShiftOp::Ushr => (*x as u64).wrapping_shr(distance) as i64,
        })),
        _ => None,
    }
}

// ---- exact checkers -------------------------------------------------------------------------------------------

fn exact_checker(op: ArithOp) -> BinaryChecker {
    match op {
        ArithOp::Plus => exact_plus,
        ArithOp::Minus => exact_minus,
        ArithOp::Times => exact_times,
        ArithOp::Div => exact_div,
        ArithOp::Rem => exact_rem,
        ArithOp::Mod => exact_mod,
    }
}

fn exact_plus(a: &BigInt, b: &BigInt) -> Option<BigInt> {
    Some(a + b)
}

fn exact_minus(a: &BigInt, b: &BigInt) -> Option<BigInt> {
    Some(a - b)
}

fn exact_times(a: &BigInt, b: &BigInt) -> Option<BigInt> {
    Some(a * b)
}

fn exact_div(a: &BigInt, b: &BigInt) -> Option<BigInt> {
    (b.sign() != Sign::NoSign).then(|| a / b)
}

fn exact_rem(a: &BigInt, b: &BigInt) -> Option<BigInt> {
    (b.sign() != Sign::NoSign).then(|| a % b)
}

fn exact_mod(a: &BigInt, b: &BigInt) -> Option<BigInt> {
    if b.sign() == Sign::NoSign {
        return None;
    }
    let r = a % b;
    if r.sign() != Sign::NoSign && r.sign() != b.sign() {
        Some(r + b)
    } else {
        Some(r)
    }
}

fn exact_negate(a: &BigInt) -> Option<BigInt> {
    Some(-a)
}

/// Whether a machine-width integral result disagrees with its exact counterpart.
pub fn overflowed(machine: &NativeValue, exact: &BigInt) -> bool {
    match machine.as_integral() {
        Some(value) => BigInt::from(value) != *exact,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrimitiveKind::*;

    fn registry() -> &'static OperationRegistry {
        OperationRegistry::shared()
    }

    fn binary(name: &str, a: NativeValue, b: NativeValue) -> Option<NativeValue> {
        let op = registry()
            .binary(name, a.kind().unwrap(), b.kind().unwrap())
            .unwrap_or_else(|| panic!("missing {name}"));
        (op.compute)(&a, &b)
    }

    fn unary(name: &str, a: NativeValue) -> Option<NativeValue> {
        let op = registry().unary(name, a.kind().unwrap()).unwrap();
        (op.compute)(&a)
    }

    #[test]
    fn int_arithmetic_wraps() {
        assert_eq!(
            binary("plus", NativeValue::Int(i32::MAX), NativeValue::Int(1)),
            Some(NativeValue::Int(i32::MIN))
        );
        assert_eq!(
            binary("times", NativeValue::Long(i64::MAX), NativeValue::Long(2)),
            Some(NativeValue::Long(-2))
        );
        assert_eq!(
            binary(operators::DIV, NativeValue::Int(i32::MIN), NativeValue::Int(-1)),
            Some(NativeValue::Int(i32::MIN))
        );
    }

    #[test]
    fn narrow_operands_promote() {
        assert_eq!(
            binary("plus", NativeValue::Byte(100), NativeValue::Byte(100)),
            Some(NativeValue::Int(200))
        );
        assert_eq!(
            binary("plus", NativeValue::Int(1), NativeValue::Double(0.5)),
            Some(NativeValue::Double(1.5))
        );
        assert_eq!(unary("unaryMinus", NativeValue::Short(5)), Some(NativeValue::Int(-5)));
    }

    #[test]
    fn integer_division_by_zero_fails() {
        assert_eq!(binary(operators::DIV, NativeValue::Int(5), NativeValue::Int(0)), None);
        assert_eq!(binary("rem", NativeValue::Long(5), NativeValue::Long(0)), None);
        assert_eq!(
            binary(operators::DIV, NativeValue::Double(5.0), NativeValue::Double(0.0)),
            Some(NativeValue::Double(f64::INFINITY))
        );
    }

    #[test]
    fn rem_truncates_and_mod_floors() {
        assert_eq!(binary("rem", NativeValue::Int(-7), NativeValue::Int(3)), Some(NativeValue::Int(-1)));
        assert_eq!(binary("mod", NativeValue::Int(-7), NativeValue::Int(3)), Some(NativeValue::Int(2)));
        assert_eq!(
            binary("mod", NativeValue::Double(-7.0), NativeValue::Double(3.0)),
            Some(NativeValue::Double(2.0))
        );
    }

    #[test]
    fn checkers_exist_only_for_integral_pairs() {
        assert!(registry().binary("plus", Int, Int).unwrap().checker.is_some());
        assert!(registry().binary("plus", Byte, Long).unwrap().checker.is_some());
        assert!(registry().binary("plus", Int, Double).unwrap().checker.is_none());
        assert!(registry().binary(operators::COMPARE_TO, Int, Int).unwrap().checker.is_none());
        assert!(registry().unary("unaryMinus", Int).unwrap().checker.is_some());
        assert!(registry().unary("unaryMinus", Double).unwrap().checker.is_none());
    }

    #[test]
    fn checker_detects_overflow() {
        let op = registry().binary("plus", Int, Int).unwrap();
        let machine = (op.compute)(&NativeValue::Int(i32::MAX), &NativeValue::Int(1)).unwrap();
        let exact = (op.checker.unwrap())(&BigInt::from(i32::MAX), &BigInt::from(1)).unwrap();
        assert!(overflowed(&machine, &exact));

        let machine = (op.compute)(&NativeValue::Int(1), &NativeValue::Int(1)).unwrap();
        let exact = (op.checker.unwrap())(&BigInt::from(1), &BigInt::from(1)).unwrap();
        assert!(!overflowed(&machine, &exact));
    }

    #[test]
    fn compare_to_yields_sign() {
        assert_eq!(
            binary(operators::COMPARE_TO, NativeValue::Int(1), NativeValue::Long(2)),
            Some(NativeValue::Int(-1))
        );
        assert_eq!(
            binary(
                operators::COMPARE_TO,
                NativeValue::String("b".into()),
                NativeValue::String("a".into())
            ),
            Some(NativeValue::Int(1))
        );
        assert_eq!(
            binary(
                operators::COMPARE_TO,
                NativeValue::String("ab".into()),
                NativeValue::String("abcd".into())
            ),
            Some(NativeValue::Int(-2))
        );
    }

    #[test]
    fn equality_is_kind_strict() {
        let equals = registry().binary(operators::EQUALS, Int, Any).unwrap();
        assert_eq!(
            (equals.compute)(&NativeValue::Int(1), &NativeValue::Long(1)),
            Some(NativeValue::Boolean(false))
        );
        assert_eq!(
            (equals.compute)(&NativeValue::Int(1), &NativeValue::Int(1)),
            Some(NativeValue::Boolean(true))
        );
    }

    #[test]
    fn conversions_follow_host_semantics() {
        assert_eq!(unary("toByte", NativeValue::Int(300)), Some(NativeValue::Byte(44)));
        assert_eq!(unary("toInt", NativeValue::Double(f64::NAN)), Some(NativeValue::Int(0)));
        assert_eq!(unary("toInt", NativeValue::Double(1e20)), Some(NativeValue::Int(i32::MAX)));
        assert_eq!(unary("toByte", NativeValue::Double(300.7)), Some(NativeValue::Byte(44)));
        assert_eq!(unary("toChar", NativeValue::Int(65)), Some(NativeValue::Char(65)));
        assert_eq!(unary("toInt", NativeValue::Char(65)), Some(NativeValue::Int(65)));
        assert_eq!(unary("toString", NativeValue::Double(1.0)), Some(NativeValue::String("1.0".into())));
    }

    #[test]
    fn char_and_string_operations() {
        assert_eq!(
            binary("plus", NativeValue::Char(65), NativeValue::Int(2)),
            Some(NativeValue::Char(67))
        );
        assert_eq!(
            binary("minus", NativeValue::Char(67), NativeValue::Char(65)),
            Some(NativeValue::Int(2))
        );
        let concat = registry().binary("plus", String, Any).unwrap();
        assert_eq!(
            (concat.compute)(&NativeValue::String("x".into()), &NativeValue::Null),
            Some(NativeValue::String("xnull".into()))
        );
        assert_eq!(unary("length", NativeValue::String("héllo".into())), Some(NativeValue::Int(5)));
    }

    #[test]
    fn shifts_mask_their_distance() {
        assert_eq!(binary("shl", NativeValue::Int(1), NativeValue::Int(33)), Some(NativeValue::Int(2)));
        assert_eq!(binary("ushr", NativeValue::Int(-1), NativeValue::Int(28)), Some(NativeValue::Int(15)));
        assert_eq!(binary("shr", NativeValue::Long(-8), NativeValue::Int(1)), Some(NativeValue::Long(-4)));
    }

    #[test]
    fn unary_steps_keep_their_kind() {
        assert_eq!(unary("inc", NativeValue::Byte(127)), Some(NativeValue::Byte(-128)));
        assert_eq!(unary("dec", NativeValue::Char(66)), Some(NativeValue::Char(65)));
        assert_eq!(unary("not", NativeValue::Boolean(true)), Some(NativeValue::Boolean(false)));
        assert_eq!(unary("inv", NativeValue::Int(0)), Some(NativeValue::Int(-1)));
    }
}
