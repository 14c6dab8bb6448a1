//! Operator folding: resolved operator calls and the eager boolean operations.

use std::sync::Arc;

use konst_core::lang::operators::{self, OperatorToken};
use num_bigint::BigInt;

use super::{ConstantExpressionEvaluator, EvalError, EvalResult, Operand};
use crate::constants::compile_time::{CompileTimeConstant, Parameters};
use crate::constants::operations::overflowed;
use crate::constants::value::{ConstantValue, NativeValue};
use crate::frontend::ast::{Expr, NodeId};
use crate::frontend::diagnostics::errors;
use crate::frontend::types::ResolvedType;

impl ConstantExpressionEvaluator<'_> {
    /// Fold `&&` / `||`. Both sides must already be constant; no short-circuiting happens at compile time.
    pub(super) fn fold_boolean_operation(&mut self, token: OperatorToken, left: &Expr, right: &Expr) -> EvalResult {
        let boolean = self.builtins.boolean_type();
        let Some(lhs) = self.fold_operand(left, &boolean)? else {
            return Ok(None);
        };
        let Some(rhs) = self.fold_operand(right, &boolean)? else {
            return Ok(None);
        };
        let (NativeValue::Boolean(a), NativeValue::Boolean(b)) = (&lhs.value, &rhs.value) else {
            return Ok(None);
        };
        let value = match token {
            OperatorToken::AndAnd => *a && *b,
            OperatorToken::OrOr => *a || *b,
            other => {
                return Err(EvalError::internal(
                    left.id,
                    format!("'{}' is not a boolean operation", operators::as_str(other)),
                ));
            }
        };
        let parameters = Parameters::new(
            true,
            false,
            lhs.parameters.uses_variable_as_constant || rhs.parameters.uses_variable_as_constant,
        );
        Ok(Some(Arc::new(ConstantValue::Boolean(value).wrap_with(parameters))))
    }

    /// Fold a call to an operator-convention function: `a + b`, `-a`, `a.compareTo(b)`, `a.toLong()`.
    ///
    /// `site` is the expression diagnostics are reported on, `call_node` keys the resolved call, `receiver` is the
    /// explicit receiver and `arguments` holds at most one value argument.
    pub(super) fn fold_operator_call(
        &mut self,
        site: &Expr,
        call_node: NodeId,
        receiver: &Expr,
        arguments: &[&Expr],
        token: OperatorToken,
        expected: Option<&ResolvedType>,
    ) -> EvalResult {
        let resolution = self.resolution;
        let Some(call) = resolution.resolved_call(call_node) else {
            return Ok(None);
        };
        let Some(receiver_type) = call.receiver_type() else {
            return Ok(None);
        };
        let name = call.descriptor.name();
        let parameters = call.descriptor.value_parameters();

        match (arguments, parameters) {
            ([], []) => {
                let Some(operand) = self.fold_operand(receiver, receiver_type)? else {
                    return Ok(None);
                };
                Ok(self
                    .fold_unary(site, name, receiver_type, &operand, expected)
                    .map(Arc::new))
            }
            ([argument], [parameter]) => {
                let Some(lhs) = self.fold_operand(receiver, receiver_type)? else {
                    return Ok(None);
                };
                let Some(rhs) = self.fold_operand(argument, &parameter.ty)? else {
                    return Ok(None);
                };
                self.fold_binary(site, name, token, (receiver_type, &lhs), (&parameter.ty, &rhs), expected)
            }
            _ => Ok(None),
        }
    }

    fn fold_unary(
        &mut self,
        site: &Expr,
        name: &str,
        receiver_type: &ResolvedType,
        operand: &Operand,
        expected: Option<&ResolvedType>,
    ) -> Option<CompileTimeConstant> {
        let registry = self.registry;
        let kind = receiver_type.operand_kind()?;
        let operation = registry.unary(name, kind)?;
        let result = (operation.compute)(&operand.value)?;

        if let (Some(checker), Some(value)) = (operation.checker, operand.value.as_integral()) {
            if let Some(exact) = checker(&BigInt::from(value)) {
                self.check_overflow(site, &result, &exact);
            }
        }

        let parameters = Parameters::new(
            operand.parameters.can_be_used_in_annotation,
            !operators::is_number_conversion(name) && operand.parameters.is_pure,
            operand.parameters.uses_variable_as_constant,
        );
        self.create_constant(result, expected, parameters)
    }

    fn fold_binary(
        &mut self,
        site: &Expr,
        name: &str,
        token: OperatorToken,
        (left_type, lhs): (&ResolvedType, &Operand),
        (right_type, rhs): (&ResolvedType, &Operand),
        expected: Option<&ResolvedType>,
    ) -> EvalResult {
        let (Some(left_kind), Some(right_kind)) = (left_type.operand_kind(), right_type.operand_kind()) else {
            return Ok(None);
        };

        if name == operators::DIV && rhs.value.as_integral() == Some(0) {
            self.trace.report(errors::division_by_zero(site.id, site.span));
            return Ok(Some(Arc::new(ConstantValue::error("Division by zero").wrap())));
        }

        let registry = self.registry;
        let Some(operation) = registry.binary(name, left_kind, right_kind) else {
            return Ok(None);
        };
        let Some(result) = (operation.compute)(&lhs.value, &rhs.value) else {
            return Ok(None);
        };

        if let (Some(checker), Some(a), Some(b)) = (operation.checker, lhs.value.as_integral(), rhs.value.as_integral())
        {
            if let Some(exact) = checker(&BigInt::from(a), &BigInt::from(b)) {
                self.check_overflow(site, &result, &exact);
            }
        }

        let parameters = Parameters::new(
            lhs.parameters.can_be_used_in_annotation && rhs.parameters.can_be_used_in_annotation,
            lhs.parameters.is_pure && rhs.parameters.is_pure,
            lhs.parameters.uses_variable_as_constant || rhs.parameters.uses_variable_as_constant,
        );
        // Comparison results keep their own type whatever the use site expects.
        let constant = if name == operators::COMPARE_TO {
            ConstantValue::from_native(compare_result(site.id, token, result)?).map(|v| v.wrap_with(parameters))
        } else if name == operators::EQUALS {
            ConstantValue::from_native(equals_result(site.id, token, result)?).map(|v| v.wrap_with(parameters))
        } else {
            self.create_constant(result, expected, parameters)
        };
        Ok(constant.map(Arc::new))
    }

    fn check_overflow(&mut self, site: &Expr, machine: &NativeValue, exact: &BigInt) {
        if overflowed(machine, exact) {
            self.trace.report(errors::integer_overflow(site.id, site.span));
        }
    }
}

/// Turn a three-way comparison into the result the call site asked for.
fn compare_result(node: NodeId, token: OperatorToken, result: NativeValue) -> Result<NativeValue, EvalError> {
    let NativeValue::Int(ordering) = result else {
        return Err(EvalError::internal(node, "comparison did not produce an Int"));
    };
    let value = match token {
        OperatorToken::Lt => ordering < 0,
        OperatorToken::LtEq => ordering <= 0,
        OperatorToken::Gt => ordering > 0,
        OperatorToken::GtEq => ordering >= 0,
        OperatorToken::Identifier => return Ok(result),
        other => {
            return Err(EvalError::internal(
                node,
                format!("unexpected comparison token '{}'", operators::as_str(other)),
            ));
        }
    };
    Ok(NativeValue::Boolean(value))
}

fn equals_result(node: NodeId, token: OperatorToken, result: NativeValue) -> Result<NativeValue, EvalError> {
    let NativeValue::Boolean(equal) = result else {
        return Err(EvalError::internal(node, "equality did not produce a Boolean"));
    };
    match token {
        OperatorToken::EqEq | OperatorToken::Identifier => Ok(result),
        OperatorToken::ExclEq => Ok(NativeValue::Boolean(!equal)),
        other => Err(EvalError::internal(
            node,
            format!("unexpected equality token '{}'", operators::as_str(other)),
        )),
    }
}
