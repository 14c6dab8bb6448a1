//! Shared fixture for integration tests: builds trees and records what the resolver would have reported.
#![allow(dead_code)]

use std::sync::Arc;

use konst::ast::{Expr, ExprKind};
use konst::constants::{CompileTimeConstant, ConstantExpressionEvaluator, EvalResult, OperationRegistry};
use konst::frontend::builder::AstBuilder;
use konst::frontend::descriptors::{ClassDescriptor, FunctionDescriptor, ValueParameterDescriptor};
use konst::frontend::resolution::{RecordedResolution, ResolvedCall};
use konst::{BindingTrace, BuiltIns, ResolvedType};
use konst_core::PrimitiveKind;
use konst_core::lang::operators::OperatorToken;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ty(kind: PrimitiveKind) -> ResolvedType {
    ResolvedType::primitive(kind)
}

/// Member operator `receiver.name(parameter)`.
pub fn member_call(
    name: &str,
    receiver: PrimitiveKind,
    parameter: Option<PrimitiveKind>,
    ret: ResolvedType,
) -> ResolvedCall {
    let value_parameters = parameter
        .map(|kind| vec![ValueParameterDescriptor::new("other", 0, ty(kind))])
        .unwrap_or_default();
    ResolvedCall::function(FunctionDescriptor {
        fq_name: format!("kotlin.{}.{name}", receiver.as_str()),
        value_parameters,
        return_type: ret,
    })
    .with_dispatch_receiver(ty(receiver))
}

pub struct Fixture {
    pub b: AstBuilder,
    pub builtins: BuiltIns,
    pub resolution: RecordedResolution,
    pub trace: BindingTrace,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let builtins = BuiltIns::new();
        let resolution = RecordedResolution::with_builtins(&builtins);
        Self {
            b: AstBuilder::new(),
            builtins,
            resolution,
            trace: BindingTrace::new(),
        }
    }

    pub fn register_class(&mut self, class: ClassDescriptor) -> Arc<ClassDescriptor> {
        let class = Arc::new(class);
        self.resolution.register_class(class.clone());
        class
    }

    /// `left <token> right` resolved to the member `name` of the left kind.
    pub fn binary(
        &mut self,
        left: Expr,
        token: OperatorToken,
        right: Expr,
        name: &str,
        kinds: (PrimitiveKind, PrimitiveKind),
        ret: PrimitiveKind,
    ) -> Expr {
        let expr = self.b.binary(left, token, right);
        let ExprKind::Binary { operation, .. } = &expr.kind else {
            unreachable!();
        };
        self.resolution
            .record_call(operation.id, member_call(name, kinds.0, Some(kinds.1), ty(ret)));
        expr
    }

    /// Integer literals combined with an `Int` or `Long` operator.
    pub fn integral(&mut self, kind: PrimitiveKind, left: &str, token: OperatorToken, right: &str, name: &str) -> Expr {
        let left = self.b.int(left);
        let right = self.b.int(right);
        self.binary(left, token, right, name, (kind, kind), kind)
    }

    pub fn evaluator(&mut self) -> ConstantExpressionEvaluator<'_> {
        ConstantExpressionEvaluator::new(
            &self.resolution,
            &self.builtins,
            OperationRegistry::shared(),
            &mut self.trace,
        )
    }

    pub fn eval(&mut self, expr: &Expr, expected: Option<&ResolvedType>) -> EvalResult {
        self.evaluator().try_evaluate(expr, expected)
    }

    pub fn constant(&mut self, expr: &Expr, expected: Option<&ResolvedType>) -> Arc<CompileTimeConstant> {
        self.eval(expr, expected)
            .expect("no internal error")
            .expect("expression folds to a constant")
    }
}
