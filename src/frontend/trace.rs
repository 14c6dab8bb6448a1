//! Per-pass binding trace.
//!
//! The trace memoizes analysis results keyed by tree node and collects diagnostics for one analysis pass. It is
//! owned by the surrounding analysis context and discarded with it; concurrent passes each use their own trace.
//!
//! ## Notes
//! - Slots are monotonic: a second `record` for the same key fails and leaves the stored value untouched.
//! - `report` ignores an exact repeat of a (diagnostic code, node) pair.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

use crate::constants::CompileTimeConstant;
use crate::frontend::ast::NodeId;
use crate::frontend::descriptors::AnnotationDescriptor;
use crate::frontend::diagnostics::{CompileError, DiagnosticCode};

/// Named result slots of the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Folded constant of an expression.
    CompileTimeValue,
    /// Resolved descriptor of an annotation entry.
    Annotation,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::CompileTimeValue => write!(f, "COMPILE_TIME_VALUE"),
            Slot::Annotation => write!(f, "ANNOTATION"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("slot {slot} already holds a value for node {node}")]
    AlreadyRecorded { slot: Slot, node: NodeId },
}

#[derive(Debug, Default)]
pub struct BindingTrace {
    compile_time_values: HashMap<NodeId, Arc<CompileTimeConstant>>,
    annotations: HashMap<NodeId, AnnotationDescriptor>,
    diagnostics: Vec<CompileError>,
    reported: HashSet<(DiagnosticCode, NodeId)>,
}

impl BindingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile_time_value(&self, node: NodeId) -> Option<Arc<CompileTimeConstant>> {
        self.compile_time_values.get(&node).cloned()
    }

    pub fn record_compile_time_value(
        &mut self,
        node: NodeId,
        constant: Arc<CompileTimeConstant>,
    ) -> Result<(), TraceError> {
        if self.compile_time_values.contains_key(&node) {
            return Err(TraceError::AlreadyRecorded {
                slot: Slot::CompileTimeValue,
                node,
            });
        }
        self.compile_time_values.insert(node, constant);
        Ok(())
    }

    pub fn annotation(&self, entry: NodeId) -> Option<&AnnotationDescriptor> {
        self.annotations.get(&entry)
    }

    pub fn record_annotation(&mut self, entry: NodeId, descriptor: AnnotationDescriptor) -> Result<(), TraceError> {
        if self.annotations.contains_key(&entry) {
            return Err(TraceError::AlreadyRecorded {
                slot: Slot::Annotation,
                node: entry,
            });
        }
        self.annotations.insert(entry, descriptor);
        Ok(())
    }

    pub fn report(&mut self, diagnostic: CompileError) {
        if !self.reported.insert((diagnostic.code, diagnostic.node)) {
            return;
        }
        tracing::debug!(code = %diagnostic.code, node = %diagnostic.node, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[CompileError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<CompileError> {
        self.reported.clear();
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ConstantValue;
    use crate::frontend::ast::Span;
    use crate::frontend::diagnostics::errors;

    #[test]
    fn record_is_monotonic() {
        let mut trace = BindingTrace::new();
        let first = Arc::new(ConstantValue::Int(1).wrap());
        let second = Arc::new(ConstantValue::Int(2).wrap());

        trace.record_compile_time_value(NodeId(7), first.clone()).unwrap();
        let err = trace.record_compile_time_value(NodeId(7), second).unwrap_err();

        assert_eq!(
            err,
            TraceError::AlreadyRecorded {
                slot: Slot::CompileTimeValue,
                node: NodeId(7)
            }
        );
        assert!(Arc::ptr_eq(&trace.compile_time_value(NodeId(7)).unwrap(), &first));
    }

    #[test]
    fn report_deduplicates_per_node_and_code() {
        let mut trace = BindingTrace::new();
        trace.report(errors::integer_overflow(NodeId(1), Span::default()));
        trace.report(errors::integer_overflow(NodeId(1), Span::default()));
        trace.report(errors::division_by_zero(NodeId(1), Span::default()));
        trace.report(errors::integer_overflow(NodeId(2), Span::default()));
        assert_eq!(trace.diagnostics().len(), 3);
    }
}
