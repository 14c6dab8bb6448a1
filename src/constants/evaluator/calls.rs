//! Names, qualified access and call expressions.

use std::sync::Arc;

use konst_core::lang::operators::OperatorToken;

use super::{ConstantExpressionEvaluator, EvalResult};
use crate::annotations::arguments;
use crate::constants::compile_time::{CompileTimeConstant, Parameters};
use crate::constants::value::ConstantValue;
use crate::frontend::ast::{Expr, ExprKind, ValueArgument};
use crate::frontend::descriptors::{CallableDescriptor, DeclarationDescriptor, FunctionDescriptor};
use crate::frontend::resolution::ResolvedCall;
use crate::frontend::types::ResolvedType;

impl ConstantExpressionEvaluator<'_> {
    /// Enum entries fold to themselves; read-only static bindings re-expose their recorded initializer.
    pub(super) fn fold_simple_name(&mut self, expr: &Expr) -> Option<Arc<CompileTimeConstant>> {
        let target = self.resolution.reference_target(expr.id)?;
        let constant = match target {
            DeclarationDescriptor::EnumEntry(entry) => ConstantValue::Enum(entry.clone()).wrap(),
            DeclarationDescriptor::Callable(CallableDescriptor::Variable(variable))
                if variable.is_compile_time_constant_binding() =>
            {
                let initializer = variable.compile_time_initializer.clone()?;
                initializer.wrap_with(Parameters::new(true, false, true))
            }
            _ => return None,
        };
        Some(Arc::new(constant))
    }

    /// `receiver.selector`: a call selector is first folded on its own (static members reached through a
    /// receiver), then as a call on the receiver. Any other selector is folded on its own.
    pub(super) fn fold_qualified(
        &mut self,
        receiver: &Expr,
        selector: &Expr,
        expected: Option<&ResolvedType>,
    ) -> EvalResult {
        let ExprKind::Call { callee, arguments } = &selector.kind else {
            return self.fold(selector, expected);
        };
        if let Some(constant) = self.fold(selector, expected)? {
            return Ok(Some(constant));
        }
        if !matches!(callee.kind, ExprKind::SimpleName(_)) {
            return Ok(None);
        }
        let arguments: Vec<&Expr> = arguments.iter().map(|a| &a.expression).collect();
        self.fold_operator_call(
            selector,
            callee.id,
            receiver,
            &arguments,
            OperatorToken::Identifier,
            expected,
        )
    }

    /// Only `arrayOf(...)` and annotation constructor calls fold.
    pub(super) fn fold_call(&mut self, callee: &Expr, arguments: &[ValueArgument]) -> EvalResult {
        let resolution = self.resolution;
        let Some(call) = resolution.resolved_call(callee.id) else {
            return Ok(None);
        };
        match &call.descriptor {
            CallableDescriptor::Function(function) if function.is_array_of() => self.fold_array_of(function, arguments),
            CallableDescriptor::Constructor(class) if class.is_annotation_class() => {
                self.fold_annotation_constructor(call, arguments)
            }
            _ => Ok(None),
        }
    }

    fn fold_array_of(&mut self, function: &FunctionDescriptor, arguments: &[ValueArgument]) -> EvalResult {
        let Some(element_type) = function
            .value_parameters
            .first()
            .and_then(|p| p.vararg_element_type.as_ref())
        else {
            return Ok(None);
        };

        let mut elements = Vec::with_capacity(arguments.len());
        let mut uses_variable_as_constant = false;
        for argument in arguments {
            let Some(constant) = self.fold(&argument.expression, Some(element_type))? else {
                continue;
            };
            if constant.is_error() {
                continue;
            }
            uses_variable_as_constant |= constant.uses_variable_as_constant();
            elements.push(constant.to_constant_value(Some(element_type)));
        }

        let array = ConstantValue::array(elements, function.return_type.clone());
        Ok(Some(Arc::new(
            array.wrap_with(Parameters::new(true, false, uses_variable_as_constant)),
        )))
    }

    fn fold_annotation_constructor(&mut self, call: &ResolvedCall, arguments: &[ValueArgument]) -> EvalResult {
        let descriptor = arguments::bind_source_arguments(self, call, arguments)?;
        Ok(Some(Arc::new(ConstantValue::annotation(descriptor).wrap())))
    }
}
