//! Compile-time constants: the value model, the operation registry and the evaluator.

pub mod compile_time;
pub mod evaluator;
pub mod operations;
pub mod value;

pub use compile_time::{CompileTimeConstant, Parameters};
pub use evaluator::{ConstantExpressionEvaluator, EvalError, EvalResult, get_constant};
pub use operations::OperationRegistry;
pub use value::{ConstantValue, NativeValue};
