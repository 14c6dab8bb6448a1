//! Name and call resolution contract.
//!
//! Overload resolution and type inference happen outside the engine. The engine consumes their results through the
//! [`Resolution`] trait: resolved calls for call sites and operator references, reference targets for simple names,
//! and inferred types for expressions.
//!
//! [`RecordedResolution`] is a map-backed implementation fed by whoever ran resolution (a driver or a test).

use std::collections::HashMap;
use std::sync::Arc;

use crate::frontend::ast::NodeId;
use crate::frontend::descriptors::{
    CallableDescriptor, ClassDescriptor, DeclarationDescriptor, FunctionDescriptor, ValueParameterDescriptor,
};
use crate::frontend::types::{BuiltIns, ResolvedType};

/// How the explicit receiver of a call site was bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplicitReceiverKind {
    NoExplicitReceiver,
    DispatchReceiver,
    ExtensionReceiver,
    BothReceivers,
}

/// Arguments bound to one parameter of a resolved call, by node id of the argument expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValueArgument {
    pub parameter: ValueParameterDescriptor,
    pub argument_ids: Vec<NodeId>,
}

/// The result of resolving one call site.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    pub descriptor: CallableDescriptor,
    pub explicit_receiver_kind: ExplicitReceiverKind,
    pub dispatch_receiver_type: Option<ResolvedType>,
    pub extension_receiver_type: Option<ResolvedType>,
    /// In parameter order.
    pub value_arguments: Vec<ResolvedValueArgument>,
}

impl ResolvedCall {
    pub fn new(descriptor: CallableDescriptor) -> Self {
        Self {
            descriptor,
            explicit_receiver_kind: ExplicitReceiverKind::NoExplicitReceiver,
            dispatch_receiver_type: None,
            extension_receiver_type: None,
            value_arguments: Vec::new(),
        }
    }

    pub fn function(descriptor: FunctionDescriptor) -> Self {
        Self::new(CallableDescriptor::Function(Arc::new(descriptor)))
    }

    pub fn with_dispatch_receiver(mut self, ty: ResolvedType) -> Self {
        self.dispatch_receiver_type = Some(ty);
        self.explicit_receiver_kind = ExplicitReceiverKind::DispatchReceiver;
        self
    }

    pub fn with_extension_receiver(mut self, ty: ResolvedType) -> Self {
        self.extension_receiver_type = Some(ty);
        self.explicit_receiver_kind = ExplicitReceiverKind::ExtensionReceiver;
        self
    }

    pub fn with_argument(mut self, parameter: ValueParameterDescriptor, argument_ids: Vec<NodeId>) -> Self {
        self.value_arguments.push(ResolvedValueArgument {
            parameter,
            argument_ids,
        });
        self
    }

    /// Type of the explicit receiver, when exactly one receiver is explicit.
    pub fn receiver_type(&self) -> Option<&ResolvedType> {
        match self.explicit_receiver_kind {
            ExplicitReceiverKind::DispatchReceiver => self.dispatch_receiver_type.as_ref(),
            ExplicitReceiverKind::ExtensionReceiver => self.extension_receiver_type.as_ref(),
            ExplicitReceiverKind::NoExplicitReceiver | ExplicitReceiverKind::BothReceivers => None,
        }
    }
}

/// Results of name resolution and type inference, as consumed by the engine.
pub trait Resolution {
    /// Resolved call of a call expression, operator reference, simple name or annotation entry.
    fn resolved_call(&self, node: NodeId) -> Option<&ResolvedCall>;

    /// Declaration a simple name refers to.
    fn reference_target(&self, node: NodeId) -> Option<&DeclarationDescriptor>;

    /// Inferred type of an expression.
    fn expression_type(&self, node: NodeId) -> Option<&ResolvedType>;

    /// Class by fully-qualified name, across module dependencies.
    fn find_class(&self, fq_name: &str) -> Option<Arc<ClassDescriptor>>;

    /// Class descriptor produced for a class or object declaration.
    fn declared_class(&self, declaration: NodeId) -> Option<Arc<ClassDescriptor>>;
}

#[derive(Debug, Default, Clone)]
pub struct RecordedResolution {
    calls: HashMap<NodeId, ResolvedCall>,
    references: HashMap<NodeId, DeclarationDescriptor>,
    types: HashMap<NodeId, ResolvedType>,
    classes: HashMap<String, Arc<ClassDescriptor>>,
    declared_classes: HashMap<NodeId, Arc<ClassDescriptor>>,
}

impl RecordedResolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with every built-in class registered.
    pub fn with_builtins(builtins: &BuiltIns) -> Self {
        let mut resolution = Self::new();
        for class in builtins.classes() {
            resolution.register_class(class.clone());
        }
        resolution
    }

    pub fn record_call(&mut self, node: NodeId, call: ResolvedCall) {
        self.calls.insert(node, call);
    }

    pub fn record_reference(&mut self, node: NodeId, target: DeclarationDescriptor) {
        self.references.insert(node, target);
    }

    pub fn record_type(&mut self, node: NodeId, ty: ResolvedType) {
        self.types.insert(node, ty);
    }

    pub fn register_class(&mut self, class: Arc<ClassDescriptor>) {
        self.classes.insert(class.fq_name.clone(), class);
    }

    pub fn record_declared_class(&mut self, declaration: NodeId, class: Arc<ClassDescriptor>) {
        self.declared_classes.insert(declaration, class);
    }
}

impl Resolution for RecordedResolution {
    fn resolved_call(&self, node: NodeId) -> Option<&ResolvedCall> {
        self.calls.get(&node)
    }

    fn reference_target(&self, node: NodeId) -> Option<&DeclarationDescriptor> {
        self.references.get(&node)
    }

    fn expression_type(&self, node: NodeId) -> Option<&ResolvedType> {
        self.types.get(&node)
    }

    fn find_class(&self, fq_name: &str) -> Option<Arc<ClassDescriptor>> {
        self.classes.get(fq_name).cloned()
    }

    fn declared_class(&self, declaration: NodeId) -> Option<Arc<ClassDescriptor>> {
        self.declared_classes.get(&declaration).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use konst_core::PrimitiveKind;

    fn int() -> ResolvedType {
        ResolvedType::primitive(PrimitiveKind::Int)
    }

    #[test]
    fn receiver_type_follows_explicit_receiver_kind() {
        let plus = FunctionDescriptor {
            fq_name: "kotlin.Int.plus".to_string(),
            value_parameters: vec![ValueParameterDescriptor::new("other", 0, int())],
            return_type: int(),
        };
        let call = ResolvedCall::function(plus.clone());
        assert_eq!(call.receiver_type(), None);

        let call = ResolvedCall::function(plus.clone()).with_dispatch_receiver(int());
        assert_eq!(call.receiver_type(), Some(&int()));

        let mut both = ResolvedCall::function(plus).with_extension_receiver(int());
        both.explicit_receiver_kind = ExplicitReceiverKind::BothReceivers;
        assert_eq!(both.receiver_type(), None);
    }

    #[test]
    fn builtins_are_registered() {
        let builtins = BuiltIns::new();
        let resolution = RecordedResolution::with_builtins(&builtins);
        let target = builtins.target_annotation();
        assert!(resolution.find_class(&target.fq_name).is_some());
    }
}
