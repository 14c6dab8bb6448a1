//! Constants and annotations read from compiled class metadata.
//!
//! The compiled format stores `boolean`, `byte`, `char` and `short` constants as 32-bit integers and delivers
//! annotation arguments as a sequence of visitor callbacks. [`BinaryAnnotationLoader`] turns both into the same
//! [`ConstantValue`] and [`AnnotationDescriptor`] values source folding produces.
//!
//! ## Examples
//! ```rust
//! use konst::annotations::binary::BinaryAnnotationLoader;
//! use konst::constants::{ConstantValue, NativeValue};
//! use konst::frontend::resolution::RecordedResolution;
//! use konst::frontend::types::BuiltIns;
//!
//! let builtins = BuiltIns::new();
//! let resolution = RecordedResolution::with_builtins(&builtins);
//! let loader = BinaryAnnotationLoader::new(&resolution, &builtins);
//!
//! assert_eq!(loader.load_constant("Z", NativeValue::Int(1)), Some(ConstantValue::Boolean(true)));
//! assert_eq!(loader.load_constant("C", NativeValue::Int(65)), Some(ConstantValue::Char(65)));
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use konst_core::PrimitiveKind;
use konst_core::lang::names;
use konst_core::lang::targets::{self, TargetId};

use crate::constants::compile_time::{CompileTimeConstant, Parameters};
use crate::constants::value::{ConstantValue, NativeValue};
use crate::frontend::descriptors::{AnnotationDescriptor, ClassDescriptor, ValueParameterDescriptor};
use crate::frontend::resolution::Resolution;
use crate::frontend::types::{BuiltIns, ResolvedType};

#[derive(Clone, Copy)]
pub struct BinaryAnnotationLoader<'a> {
    resolution: &'a dyn Resolution,
    builtins: &'a BuiltIns,
}

impl<'a> BinaryAnnotationLoader<'a> {
    pub fn new(resolution: &'a dyn Resolution, builtins: &'a BuiltIns) -> Self {
        Self { resolution, builtins }
    }

    /// Load a constant from its type descriptor code and raw encoded value.
    ///
    /// `Z`, `B`, `C` and `S` values are encoded as `Int` and narrowed here; every other code passes its raw value
    /// through. A narrow code whose raw value is not an `Int` is dropped.
    pub fn load_constant(&self, descriptor: &str, raw: NativeValue) -> Option<ConstantValue> {
        let narrowed = match descriptor {
            "Z" | "B" | "C" | "S" => {
                let NativeValue::Int(value) = raw else {
                    tracing::warn!(descriptor, ?raw, "narrow constant is not encoded as Int");
                    return None;
                };
                match descriptor {
                    "Z" => NativeValue::Boolean(value != 0),
                    "B" => NativeValue::Byte(value as i8),
                    "C" => NativeValue::Char(value as u16),
                    _ => NativeValue::Short(value as i16),
                }
            }
            _ => raw,
        };
        ConstantValue::from_native(narrowed)
    }

    /// Like [`Self::load_constant`], with the parameters of a constant read from compiled metadata.
    pub fn load_compile_time_constant(&self, descriptor: &str, raw: NativeValue) -> Option<CompileTimeConstant> {
        let value = self.load_constant(descriptor, raw)?;
        let parameters = Parameters::new(!value.is_null(), false, false);
        Some(value.wrap_with(parameters))
    }

    /// Start loading one annotation of the given class. Finish with [`AnnotationArgumentVisitor::visit_end`].
    #[tracing::instrument(skip_all, fields(class = fq_name))]
    pub fn load_annotation(&self, fq_name: &str) -> AnnotationArgumentVisitor<'a> {
        let host_targets = (fq_name == names::HOST_TARGET_ANNOTATION).then(Vec::new);
        let class = self.resolution.find_class(fq_name);
        if class.is_none() && host_targets.is_none() {
            tracing::debug!(class = fq_name, "annotation class not found");
        }
        AnnotationArgumentVisitor {
            loader: *self,
            fq_name: fq_name.to_string(),
            class,
            descriptor: None,
            host_targets,
        }
    }

    fn resolve_enum(&self, enum_class: &str, entry: &str) -> ConstantValue {
        self.resolution
            .find_class(enum_class)
            .and_then(|class| class.enum_entry(entry).cloned())
            .map(ConstantValue::Enum)
            .unwrap_or_else(|| ConstantValue::error(format!("Unresolved enum entry: {enum_class}.{entry}")))
    }

    /// Narrow an `Int`-encoded value when the parameter type asks for a narrower kind.
    fn load_argument(&self, name: &str, value: NativeValue, ty: &ResolvedType) -> ConstantValue {
        let code = match ty.operand_kind() {
            Some(PrimitiveKind::Boolean) => "Z",
            Some(PrimitiveKind::Byte) => "B",
            Some(PrimitiveKind::Char) => "C",
            Some(PrimitiveKind::Short) => "S",
            _ => "",
        };
        let value = match value {
            NativeValue::Int(_) if !code.is_empty() => self.load_constant(code, value),
            other => ConstantValue::from_native(other),
        };
        value.unwrap_or_else(|| ConstantValue::error(format!("Unsupported annotation argument: {name}")))
    }
}

/// Accumulates the arguments of one annotation.
pub struct AnnotationArgumentVisitor<'a> {
    loader: BinaryAnnotationLoader<'a>,
    fq_name: String,
    class: Option<Arc<ClassDescriptor>>,
    descriptor: Option<AnnotationDescriptor>,
    /// Collected targets when this is the host-platform target annotation.
    host_targets: Option<Vec<TargetId>>,
}

impl<'a> AnnotationArgumentVisitor<'a> {
    pub fn visit(&mut self, name: &str, value: NativeValue) {
        let Some(parameter) = self.parameter(name) else {
            return;
        };
        let loaded = self.loader.load_argument(name, value, &parameter.ty);
        self.set(parameter, loaded);
    }

    pub fn visit_enum(&mut self, name: &str, enum_class: &str, entry: &str) {
        if let Some(host_targets) = &mut self.host_targets {
            push_host_target(host_targets, entry);
            return;
        }
        let Some(parameter) = self.parameter(name) else {
            return;
        };
        let value = self.loader.resolve_enum(enum_class, entry);
        self.set(parameter, value);
    }

    pub fn visit_array(&mut self, name: &str) -> ArrayArgumentVisitor<'_, 'a> {
        ArrayArgumentVisitor {
            name: name.to_string(),
            elements: Vec::new(),
            parent: self,
        }
    }

    pub fn visit_annotation(&mut self, name: &str, fq_name: &str) -> NestedAnnotationVisitor<'_, 'a> {
        let inner = self.loader.load_annotation(fq_name);
        NestedAnnotationVisitor {
            name: name.to_string(),
            inner,
            parent: self,
        }
    }

    /// Finish the annotation and add it to `annotations`.
    ///
    /// The host-platform target annotation is converted to the native target annotation, which is only added when
    /// `annotations` holds no native target annotation yet.
    pub fn visit_end(self, annotations: &mut Vec<AnnotationDescriptor>) {
        let builtins = self.loader.builtins;
        match self.host_targets {
            Some(host_targets) => {
                if annotations
                    .iter()
                    .any(|a| a.class_fq_name() == Some(names::TARGET_ANNOTATION))
                {
                    return;
                }
                let entries = host_targets
                    .into_iter()
                    .filter_map(|target| builtins.target_entry(target))
                    .map(|entry| ConstantValue::Enum(entry.clone()))
                    .collect();
                let parameter = builtins.allowed_targets_parameter();
                let allowed = ConstantValue::array(entries, parameter.ty.clone());
                annotations.push(
                    AnnotationDescriptor::new(builtins.target_annotation().default_type())
                        .with_argument(parameter.clone(), allowed),
                );
            }
            None => annotations.push(into_descriptor(self.fq_name, self.class, self.descriptor)),
        }
    }

    fn parameter(&self, name: &str) -> Option<ValueParameterDescriptor> {
        self.class.as_ref()?.parameter(name).cloned()
    }

    fn set(&mut self, parameter: ValueParameterDescriptor, value: ConstantValue) {
        let class = &self.class;
        self.descriptor
            .get_or_insert_with(|| new_descriptor(&self.fq_name, class.as_deref()))
            .set_argument(parameter, value);
    }
}

/// Accumulates the elements of one array argument.
pub struct ArrayArgumentVisitor<'p, 'a> {
    name: String,
    elements: Vec<ConstantValue>,
    parent: &'p mut AnnotationArgumentVisitor<'a>,
}

impl ArrayArgumentVisitor<'_, '_> {
    pub fn visit(&mut self, value: NativeValue) {
        let element_type = self.element_type();
        let loaded = self.parent.loader.load_argument(&self.name, value, &element_type);
        self.elements.push(loaded);
    }

    pub fn visit_enum(&mut self, enum_class: &str, entry: &str) {
        if let Some(host_targets) = &mut self.parent.host_targets {
            push_host_target(host_targets, entry);
            return;
        }
        let value = self.parent.loader.resolve_enum(enum_class, entry);
        self.elements.push(value);
    }

    pub fn visit_end(self) {
        if self.parent.host_targets.is_some() {
            return;
        }
        let Some(parameter) = self.parent.parameter(&self.name) else {
            return;
        };
        let array = ConstantValue::array(self.elements, parameter.ty.clone());
        self.parent.set(parameter, array);
    }

    fn element_type(&self) -> ResolvedType {
        self.parent
            .parameter(&self.name)
            .and_then(|p| p.ty.array_element().cloned())
            .unwrap_or(ResolvedType::Nothing)
    }
}

/// Visitor of an annotation nested as an argument of another annotation.
pub struct NestedAnnotationVisitor<'p, 'a> {
    name: String,
    inner: AnnotationArgumentVisitor<'a>,
    parent: &'p mut AnnotationArgumentVisitor<'a>,
}

impl NestedAnnotationVisitor<'_, '_> {
    pub fn visit_end(self) {
        let Some(parameter) = self.parent.parameter(&self.name) else {
            return;
        };
        let inner = self.inner;
        let descriptor = into_descriptor(inner.fq_name, inner.class, inner.descriptor);
        self.parent.set(parameter, ConstantValue::annotation(descriptor));
    }
}

impl<'a> Deref for NestedAnnotationVisitor<'_, 'a> {
    type Target = AnnotationArgumentVisitor<'a>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for NestedAnnotationVisitor<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// The compiled-format table is name-to-name: only the first native target of each host element type is kept.
fn push_host_target(host_targets: &mut Vec<TargetId>, entry: &str) {
    if let Some(target) = targets::from_host_element_type(entry).first() {
        host_targets.push(*target);
    }
}

fn new_descriptor(fq_name: &str, class: Option<&ClassDescriptor>) -> AnnotationDescriptor {
    match class {
        Some(class) => AnnotationDescriptor::new(class.default_type()),
        None => AnnotationDescriptor::new(ResolvedType::error(fq_name)),
    }
}

fn into_descriptor(
    fq_name: String,
    class: Option<Arc<ClassDescriptor>>,
    descriptor: Option<AnnotationDescriptor>,
) -> AnnotationDescriptor {
    descriptor.unwrap_or_else(|| new_descriptor(&fq_name, class.as_deref()))
}
