//! Declaration descriptors produced by the resolution collaborator.
//!
//! Descriptors are the resolved view of declarations: classes with their constructor parameters and annotations,
//! enum entries, variables with their compile-time initializers, and functions. They are immutable once built and
//! shared through `Arc`.

use std::sync::Arc;

use konst_core::lang::names;

use crate::constants::ConstantValue;
use crate::frontend::types::ResolvedType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
    EnumClass,
    AnnotationClass,
}

/// A parameter of a function or constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParameterDescriptor {
    pub name: String,
    pub index: usize,
    pub ty: ResolvedType,
    /// Element type when the parameter is declared `vararg`; `ty` is then the array type.
    pub vararg_element_type: Option<ResolvedType>,
}

impl ValueParameterDescriptor {
    pub fn new(name: impl Into<String>, index: usize, ty: ResolvedType) -> Self {
        Self {
            name: name.into(),
            index,
            ty,
            vararg_element_type: None,
        }
    }

    pub fn vararg(name: impl Into<String>, index: usize, element: ResolvedType) -> Self {
        Self {
            name: name.into(),
            index,
            ty: ResolvedType::array_of(element.clone()),
            vararg_element_type: Some(element),
        }
    }

    pub fn is_vararg(&self) -> bool {
        self.vararg_element_type.is_some()
    }
}

/// An entry of an enum class. Identity (not name) is what makes two enum constants equal.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumEntryDescriptor {
    pub name: String,
    /// Fully-qualified name of the enum class declaring the entry.
    pub enum_class: String,
}

impl EnumEntryDescriptor {
    pub fn enum_type(&self) -> ResolvedType {
        ResolvedType::class(self.enum_class.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub fq_name: String,
    pub kind: ClassKind,
    pub constructor_parameters: Vec<ValueParameterDescriptor>,
    pub enum_entries: Vec<Arc<EnumEntryDescriptor>>,
    pub annotations: Vec<AnnotationDescriptor>,
}

impl ClassDescriptor {
    pub fn new(fq_name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            fq_name: fq_name.into(),
            kind,
            constructor_parameters: Vec::new(),
            enum_entries: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: &str, ty: ResolvedType) -> Self {
        let index = self.constructor_parameters.len();
        self.constructor_parameters
            .push(ValueParameterDescriptor::new(name, index, ty));
        self
    }

    pub fn with_vararg_parameter(mut self, name: &str, element: ResolvedType) -> Self {
        let index = self.constructor_parameters.len();
        self.constructor_parameters
            .push(ValueParameterDescriptor::vararg(name, index, element));
        self
    }

    pub fn with_enum_entries<'a>(mut self, entries: impl IntoIterator<Item = &'a str>) -> Self {
        for name in entries {
            self.enum_entries.push(Arc::new(EnumEntryDescriptor {
                name: name.to_string(),
                enum_class: self.fq_name.clone(),
            }));
        }
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationDescriptor) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_annotation_class(&self) -> bool {
        self.kind == ClassKind::AnnotationClass
    }

    pub fn short_name(&self) -> &str {
        names::short_name(&self.fq_name)
    }

    pub fn default_type(&self) -> ResolvedType {
        ResolvedType::class(self.fq_name.clone())
    }

    /// Constructor parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ValueParameterDescriptor> {
        self.constructor_parameters.iter().find(|p| p.name == name)
    }

    /// Enum entry by name; always `None` for classes that are not enum classes.
    pub fn enum_entry(&self, name: &str) -> Option<&Arc<EnumEntryDescriptor>> {
        if self.kind != ClassKind::EnumClass {
            return None;
        }
        self.enum_entries.iter().find(|e| e.name == name)
    }

    /// First annotation of the given class.
    pub fn find_annotation(&self, fq_name: &str) -> Option<&AnnotationDescriptor> {
        self.annotations
            .iter()
            .find(|a| a.class_fq_name() == Some(fq_name))
    }
}

/// A resolved annotation: its type plus an ordered parameter → value mapping.
///
/// Absent optional arguments are absent from the mapping, never `Null`-valued.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDescriptor {
    pub ty: ResolvedType,
    arguments: Vec<(ValueParameterDescriptor, ConstantValue)>,
}

impl AnnotationDescriptor {
    pub fn new(ty: ResolvedType) -> Self {
        Self {
            ty,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, parameter: ValueParameterDescriptor, value: ConstantValue) -> Self {
        self.set_argument(parameter, value);
        self
    }

    /// Bind `value` to `parameter`, replacing an earlier binding of the same parameter in place.
    pub fn set_argument(&mut self, parameter: ValueParameterDescriptor, value: ConstantValue) {
        match self.arguments.iter_mut().find(|(p, _)| p.name == parameter.name) {
            Some(slot) => slot.1 = value,
            None => self.arguments.push((parameter, value)),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&ConstantValue> {
        self.arguments
            .iter()
            .find(|(p, _)| p.name == name)
            .map(|(_, v)| v)
    }

    pub fn arguments(&self) -> &[(ValueParameterDescriptor, ConstantValue)] {
        &self.arguments
    }

    pub fn first_argument(&self) -> Option<&ConstantValue> {
        self.arguments.first().map(|(_, v)| v)
    }

    pub fn class_fq_name(&self) -> Option<&str> {
        self.ty.class_fq_name()
    }

    pub fn is_error(&self) -> bool {
        self.ty.is_error()
    }
}

/// Where a variable is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Top-level (static) declaration.
    TopLevel,
    /// Member of an object declaration.
    Object,
    /// Member of a class instance.
    Class,
    /// Local variable or parameter.
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDescriptor {
    pub name: String,
    pub ty: ResolvedType,
    pub is_var: bool,
    pub container: ContainerKind,
    /// Value of the initializer when the resolver proved it constant.
    pub compile_time_initializer: Option<ConstantValue>,
}

impl VariableDescriptor {
    /// A read-only, static or object-level binding of a primitive or `String` type.
    pub fn is_compile_time_constant_binding(&self) -> bool {
        !self.is_var
            && matches!(self.container, ContainerKind::TopLevel | ContainerKind::Object)
            && self.ty.is_primitive_or_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    pub fq_name: String,
    pub value_parameters: Vec<ValueParameterDescriptor>,
    pub return_type: ResolvedType,
}

impl FunctionDescriptor {
    pub fn name(&self) -> &str {
        names::short_name(&self.fq_name)
    }

    /// The intrinsic array constructor (`arrayOf(...)`).
    pub fn is_array_of(&self) -> bool {
        self.fq_name == names::ARRAY_OF
    }
}

/// The target of a resolved call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallableDescriptor {
    Function(Arc<FunctionDescriptor>),
    /// Primary constructor of the class.
    Constructor(Arc<ClassDescriptor>),
    Variable(Arc<VariableDescriptor>),
}

impl CallableDescriptor {
    pub fn name(&self) -> &str {
        match self {
            CallableDescriptor::Function(f) => f.name(),
            CallableDescriptor::Constructor(c) => c.short_name(),
            CallableDescriptor::Variable(v) => &v.name,
        }
    }

    pub fn value_parameters(&self) -> &[ValueParameterDescriptor] {
        match self {
            CallableDescriptor::Function(f) => &f.value_parameters,
            CallableDescriptor::Constructor(c) => &c.constructor_parameters,
            CallableDescriptor::Variable(_) => &[],
        }
    }
}

/// The target of a name reference.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationDescriptor {
    Class(Arc<ClassDescriptor>),
    EnumEntry(Arc<EnumEntryDescriptor>),
    Callable(CallableDescriptor),
}
