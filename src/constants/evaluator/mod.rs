//! Compile-time constant evaluator.
//!
//! The evaluator folds an expression tree into a [`CompileTimeConstant`] when its value is statically known. It is
//! split into focused submodules, each contributing `impl ConstantExpressionEvaluator` blocks:
//! - `literals`: literal text parsing
//! - `operators`: operator calls (`a + b`, `-a`, `a.compareTo(b)`), boolean `&&`/`||`
//! - `calls`: names, qualified access, `arrayOf(...)` and annotation constructor calls
//!
//! ## Notes
//! - "Not a constant" is `Ok(None)`; a constant that represents a failed computation is `Ok(Some(..))` holding an
//!   `Error` value.
//! - Every folded node is memoized in the [`BindingTrace`]; folding the same node again in the same pass returns the
//!   cached `Arc` without recomputation and without re-reporting diagnostics.
//! - [`EvalError::Internal`] aborts the current evaluation path only; it signals an inconsistency between the tree
//!   and the resolution results, never a property of user code.

mod calls;
pub mod literals;
mod operators;


use std::sync::Arc;

use thiserror::Error;

use crate::constants::compile_time::{CompileTimeConstant, Parameters};
use crate::constants::operations::OperationRegistry;
use crate::constants::value::{ConstantValue, NativeValue};
use crate::frontend::ast::{Expr, ExprKind, Literal, LiteralKind, NodeId, TemplateEntry};
use crate::frontend::resolution::Resolution;
use crate::frontend::trace::BindingTrace;
use crate::frontend::types::{BuiltIns, ResolvedType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The tree and the resolution results disagree.
    #[error("internal error while folding node {node}: {message}")]
    Internal { node: NodeId, message: String },
}

impl EvalError {
    pub(crate) fn internal(node: NodeId, message: impl Into<String>) -> Self {
        EvalError::Internal {
            node,
            message: message.into(),
        }
    }
}

pub type EvalResult = Result<Option<Arc<CompileTimeConstant>>, EvalError>;

/// A folded operand: its native value plus the parameters of the constant it came from.
#[derive(Debug, Clone)]
pub(crate) struct Operand {
    pub value: NativeValue,
    pub parameters: Parameters,
}

pub struct ConstantExpressionEvaluator<'a> {
    resolution: &'a dyn Resolution,
    builtins: &'a BuiltIns,
    registry: &'a OperationRegistry,
    trace: &'a mut BindingTrace,
}

impl<'a> ConstantExpressionEvaluator<'a> {
    pub fn new(
        resolution: &'a dyn Resolution,
        builtins: &'a BuiltIns,
        registry: &'a OperationRegistry,
        trace: &'a mut BindingTrace,
    ) -> Self {
        Self {
            resolution,
            builtins,
            registry,
            trace,
        }
    }

    pub fn resolution(&self) -> &'a dyn Resolution {
        self.resolution
    }

    pub fn builtins(&self) -> &'a BuiltIns {
        self.builtins
    }

    pub fn trace(&mut self) -> &mut BindingTrace {
        &mut *self.trace
    }

    /// Fold `expr`, surfacing internal-consistency failures.
    #[tracing::instrument(skip_all, fields(node = %expr.id))]
    pub fn try_evaluate(&mut self, expr: &Expr, expected: Option<&ResolvedType>) -> EvalResult {
        self.fold(expr, expected)
    }

    /// Fold `expr`. Internal-consistency failures abort this evaluation and yield `None`.
    pub fn evaluate(&mut self, expr: &Expr, expected: Option<&ResolvedType>) -> Option<Arc<CompileTimeConstant>> {
        match self.try_evaluate(expr, expected) {
            Ok(constant) => constant,
            Err(err) => {
                tracing::error!(%err, "constant evaluation aborted");
                None
            }
        }
    }

    /// Like [`Self::evaluate`], but constants holding an `Error` value are reported as "not constant".
    pub fn evaluate_non_error(
        &mut self,
        expr: &Expr,
        expected: Option<&ResolvedType>,
    ) -> Option<Arc<CompileTimeConstant>> {
        self.evaluate(expr, expected).filter(|c| !c.is_error())
    }

    /// Fold `expr` and materialize the value against `expected`.
    pub fn evaluate_to_constant_value(&mut self, expr: &Expr, expected: Option<&ResolvedType>) -> Option<ConstantValue> {
        self.evaluate_non_error(expr, expected)
            .map(|c| c.to_constant_value(expected))
    }

    /// Memoized fold: the trace is consulted first and every `Some` result is recorded.
    pub(crate) fn fold(&mut self, expr: &Expr, expected: Option<&ResolvedType>) -> EvalResult {
        if let Some(cached) = self.trace.compile_time_value(expr.id) {
            return Ok(Some(cached));
        }
        let Some(constant) = self.fold_uncached(expr, expected)? else {
            return Ok(None);
        };
        if let Err(err) = self.trace.record_compile_time_value(expr.id, constant.clone()) {
            tracing::debug!(%err, "constant already recorded");
        }
        Ok(Some(constant))
    }

    fn fold_uncached(&mut self, expr: &Expr, expected: Option<&ResolvedType>) -> EvalResult {
        match &expr.kind {
            ExprKind::Constant(literal) => Ok(self.fold_literal(literal, expected).map(Arc::new)),
            ExprKind::Parenthesized(inner) => self.fold(inner, expected),
            ExprKind::Labeled { body, .. } => self.fold(body, expected),
            ExprKind::StringTemplate(entries) => self.fold_template(entries),
            ExprKind::Binary { left, operation, right } => {
                if konst_core::lang::operators::is_boolean_operation(operation.token) {
                    self.fold_boolean_operation(operation.token, left, right)
                } else {
                    self.fold_operator_call(expr, operation.id, left, &[right.as_ref()], operation.token, expected)
                }
            }
            ExprKind::Unary { operation, base, .. } => {
                self.fold_operator_call(expr, operation.id, base, &[], operation.token, expected)
            }
            ExprKind::Cast { left, .. } => self.fold(left, expected),
            ExprKind::SimpleName(_) => Ok(self.fold_simple_name(expr)),
            ExprKind::Qualified { receiver, selector, .. } => self.fold_qualified(receiver, selector, expected),
            ExprKind::Call { callee, arguments } => self.fold_call(callee, arguments),
            ExprKind::ClassLiteral(_) => Ok(self.fold_class_literal(expr)),
            ExprKind::FunctionLiteral(_) | ExprKind::Block(_) | ExprKind::If { .. } | ExprKind::This => Ok(None),
        }
    }

    /// Fold an operand against the type its operation expects, rejecting `Error` values.
    pub(crate) fn fold_operand(&mut self, expr: &Expr, ty: &ResolvedType) -> Result<Option<Operand>, EvalError> {
        let Some(constant) = self.fold(expr, Some(ty))? else {
            return Ok(None);
        };
        if constant.is_error() {
            return Ok(None);
        }
        Ok(constant.native_value(Some(ty)).map(|value| Operand {
            value,
            parameters: constant.parameters(),
        }))
    }

    fn fold_literal(&mut self, literal: &Literal, expected: Option<&ResolvedType>) -> Option<CompileTimeConstant> {
        let text = literal.text.as_str();
        match literal.kind {
            LiteralKind::Integer => {
                let (value, long_suffix) = literals::parse_long(text)?;
                let parameters = Parameters::new(true, !long_suffix, false);
                self.create_constant(NativeValue::Long(value), expected, parameters)
            }
            LiteralKind::Float => {
                let value = literals::parse_floating(text)?;
                self.create_constant(value, expected, Parameters::new(true, true, false))
            }
            LiteralKind::Boolean => {
                let value = literals::parse_boolean(text)?;
                self.create_constant(NativeValue::Boolean(value), expected, Parameters::new(true, true, false))
            }
            LiteralKind::Character => {
                let value = literals::parse_char(text)?;
                self.create_constant(NativeValue::Char(value), expected, Parameters::new(true, true, false))
            }
            LiteralKind::Null => Some(ConstantValue::Null.wrap()),
        }
    }

    /// Build the constant for a computed native value.
    ///
    /// Pure integral results go through [`Self::create_integer_constant`]; everything else keeps its kind.
    pub(crate) fn create_constant(
        &self,
        value: NativeValue,
        expected: Option<&ResolvedType>,
        parameters: Parameters,
    ) -> Option<CompileTimeConstant> {
        if parameters.is_pure {
            if let Some(integral) = value.as_integral() {
                return Some(self.create_integer_constant(integral, expected, parameters));
            }
        }
        ConstantValue::from_native(value).map(|v| v.wrap_with(parameters))
    }

    /// Integer constants without a usable expected type stay deferred.
    fn create_integer_constant(
        &self,
        value: i64,
        expected: Option<&ResolvedType>,
        parameters: Parameters,
    ) -> CompileTimeConstant {
        let Some(expected) = expected.filter(|ty| !ty.is_error()) else {
            return CompileTimeConstant::integer(value, parameters);
        };
        let typed = ConstantValue::integer_for_type(value, expected).unwrap_or_else(|| match i32::try_from(value) {
            Ok(int) => ConstantValue::Int(int),
            Err(_) => ConstantValue::Long(value),
        });
        typed.wrap_with(parameters)
    }

    fn fold_template(&mut self, entries: &[TemplateEntry]) -> EvalResult {
        let string_type = self.builtins.string_type();
        let mut text = String::new();
        let mut can_be_used_in_annotation = true;
        let mut uses_variable_as_constant = false;

        for entry in entries {
            match entry {
                TemplateEntry::Literal(segment) => text.push_str(segment),
                TemplateEntry::Escape { unescaped, .. } => text.push_str(unescaped),
                TemplateEntry::Expression(inner) => {
                    let Some(constant) = self.fold(inner, Some(&string_type))? else {
                        return Ok(None);
                    };
                    // Enum, array, annotation, class and error values have no native textual form.
                    let Some(native) = constant.native_value(Some(&string_type)) else {
                        return Ok(None);
                    };
                    text.push_str(&native.to_java_string());
                    can_be_used_in_annotation &= constant.can_be_used_in_annotations();
                    uses_variable_as_constant |= constant.uses_variable_as_constant();
                }
            }
        }

        let parameters = Parameters::new(can_be_used_in_annotation, false, uses_variable_as_constant);
        Ok(Some(Arc::new(ConstantValue::String(text).wrap_with(parameters))))
    }

    fn fold_class_literal(&self, expr: &Expr) -> Option<Arc<CompileTimeConstant>> {
        let ty = self.resolution.expression_type(expr.id)?;
        if ty.is_error() {
            return None;
        }
        Some(Arc::new(ConstantValue::KClass(ty.clone()).wrap()))
    }
}

/// Read the memoized constant of a node, hiding constants that hold an `Error` value.
pub fn get_constant(trace: &BindingTrace, node: NodeId) -> Option<Arc<CompileTimeConstant>> {
    trace.compile_time_value(node).filter(|c| !c.is_error())
}
