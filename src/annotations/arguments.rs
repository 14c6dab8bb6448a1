//! Annotation argument resolution.
//!
//! Turns the raw arguments of an annotation into an [`AnnotationDescriptor`]: a parameter → value mapping over the
//! annotation class's constructor parameters. Two inputs are supported:
//! - source syntax ([`AnnotationEntry`]), whose argument expressions are folded by the constant evaluator;
//! - host-platform annotations ([`ForeignAnnotation`]) read from foreign class metadata.
//!
//! ## Notes
//! - Arguments that cannot be resolved are omitted from the mapping. Only an explicit `null` in source produces a
//!   `Null` value.
//! - Inside arrays an unresolvable host-platform element becomes an `Error` placeholder so positions are kept.
//! - Host-platform deprecation and target annotations are mapped onto the native built-in classes.

use std::sync::Arc;

use konst_core::lang::names;
use konst_core::lang::targets;

use crate::constants::evaluator::{ConstantExpressionEvaluator, EvalError};
use crate::constants::operations::OperationRegistry;
use crate::constants::value::{ConstantValue, NativeValue};
use crate::frontend::ast::{AnnotationEntry, ValueArgument};
use crate::frontend::descriptors::{AnnotationDescriptor, CallableDescriptor, ClassDescriptor};
use crate::frontend::resolution::{Resolution, ResolvedCall};
use crate::frontend::trace::BindingTrace;
use crate::frontend::types::{BuiltIns, ResolvedType};

/// An annotation read from host-platform class metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignAnnotation {
    /// `None` when the metadata names no class.
    pub class_fq_name: Option<String>,
    pub arguments: Vec<ForeignAnnotationArgument>,
}

/// One argument of a [`ForeignAnnotation`]. `name` is `None` for the unnamed (default member) argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignAnnotationArgument {
    Literal {
        name: Option<String>,
        value: NativeValue,
    },
    EnumValue {
        name: Option<String>,
        enum_class: String,
        entry: String,
    },
    Array {
        name: Option<String>,
        elements: Vec<ForeignAnnotationArgument>,
    },
    Annotation {
        name: Option<String>,
        annotation: ForeignAnnotation,
    },
    ClassObject {
        name: Option<String>,
        ty: ResolvedType,
    },
}

impl ForeignAnnotationArgument {
    pub fn name(&self) -> Option<&str> {
        match self {
            ForeignAnnotationArgument::Literal { name, .. }
            | ForeignAnnotationArgument::EnumValue { name, .. }
            | ForeignAnnotationArgument::Array { name, .. }
            | ForeignAnnotationArgument::Annotation { name, .. }
            | ForeignAnnotationArgument::ClassObject { name, .. } => name.as_deref(),
        }
    }
}

pub struct AnnotationArgumentResolver<'a> {
    resolution: &'a dyn Resolution,
    builtins: &'a BuiltIns,
    registry: &'a OperationRegistry,
}

impl<'a> AnnotationArgumentResolver<'a> {
    pub fn new(resolution: &'a dyn Resolution, builtins: &'a BuiltIns, registry: &'a OperationRegistry) -> Self {
        Self {
            resolution,
            builtins,
            registry,
        }
    }

    /// Resolve a source annotation entry and record the descriptor in the trace.
    ///
    /// An entry whose descriptor is already recorded is returned from the trace unchanged. An entry without a
    /// resolved constructor call resolves to an annotation of error type with no arguments.
    #[tracing::instrument(skip_all, fields(entry = %entry.id, name = %entry.type_ref.name))]
    pub fn resolve(&self, entry: &AnnotationEntry, trace: &mut BindingTrace) -> Result<AnnotationDescriptor, EvalError> {
        if let Some(recorded) = trace.annotation(entry.id) {
            return Ok(recorded.clone());
        }

        let descriptor = match self.resolution.resolved_call(entry.id) {
            Some(call) if matches!(call.descriptor, CallableDescriptor::Constructor(_)) => {
                let mut evaluator = ConstantExpressionEvaluator::new(self.resolution, self.builtins, self.registry, trace);
                bind_source_arguments(&mut evaluator, call, &entry.arguments)?
            }
            _ => AnnotationDescriptor::new(ResolvedType::error(entry.type_ref.name.clone())),
        };

        if let Err(err) = trace.record_annotation(entry.id, descriptor.clone()) {
            tracing::debug!(%err, "annotation already recorded");
        }
        Ok(descriptor)
    }

    /// Resolve every entry, skipping (and logging) entries whose evaluation hit an internal error.
    pub fn resolve_all(&self, entries: &[AnnotationEntry], trace: &mut BindingTrace) -> Vec<AnnotationDescriptor> {
        entries
            .iter()
            .filter_map(|entry| match self.resolve(entry, trace) {
                Ok(descriptor) => Some(descriptor),
                Err(err) => {
                    tracing::error!(%err, entry = %entry.id, "annotation resolution aborted");
                    None
                }
            })
            .collect()
    }

    /// Resolve a host-platform annotation.
    #[tracing::instrument(skip_all, fields(class = annotation.class_fq_name.as_deref().unwrap_or("<unnamed>")))]
    pub fn resolve_foreign(&self, annotation: &ForeignAnnotation) -> AnnotationDescriptor {
        let Some(fq_name) = annotation.class_fq_name.as_deref() else {
            return AnnotationDescriptor::new(ResolvedType::error("<unnamed annotation>"));
        };
        let Some(class) = self.foreign_class(fq_name) else {
            return AnnotationDescriptor::new(ResolvedType::error(fq_name));
        };
        let mut descriptor = AnnotationDescriptor::new(class.default_type());

        if fq_name == names::HOST_TARGET_ANNOTATION {
            if let Some(allowed) = self.remap_host_targets(&annotation.arguments) {
                descriptor.set_argument(self.builtins.allowed_targets_parameter().clone(), allowed);
            }
            return descriptor;
        }

        if fq_name == names::HOST_DEPRECATED_ANNOTATION && annotation.arguments.is_empty() {
            if let Some(parameter) = class.parameter(names::DEFAULT_ANNOTATION_MEMBER) {
                descriptor.set_argument(
                    parameter.clone(),
                    ConstantValue::String(names::HOST_DEPRECATED_MESSAGE.to_string()),
                );
            }
            return descriptor;
        }

        for argument in &annotation.arguments {
            let name = argument.name().unwrap_or(names::DEFAULT_ANNOTATION_MEMBER);
            let Some(parameter) = class.parameter(name) else {
                continue;
            };
            if let Some(value) = self.foreign_value(argument, &parameter.ty) {
                descriptor.set_argument(parameter.clone(), value);
            }
        }
        descriptor
    }

    fn foreign_class(&self, fq_name: &str) -> Option<Arc<ClassDescriptor>> {
        if fq_name == names::HOST_DEPRECATED_ANNOTATION {
            Some(self.builtins.deprecated_annotation().clone())
        } else if fq_name == names::HOST_TARGET_ANNOTATION {
            Some(self.builtins.target_annotation().clone())
        } else {
            self.resolution.find_class(fq_name)
        }
    }

    fn foreign_value(&self, argument: &ForeignAnnotationArgument, expected: &ResolvedType) -> Option<ConstantValue> {
        match argument {
            ForeignAnnotationArgument::Literal { value, .. } => ConstantValue::from_native(value.clone()),
            ForeignAnnotationArgument::EnumValue { enum_class, entry, .. } => {
                let class = self.resolution.find_class(enum_class)?;
                class.enum_entry(entry).cloned().map(ConstantValue::Enum)
            }
            ForeignAnnotationArgument::Array { elements, .. } => {
                let element_type = expected.array_element().cloned().unwrap_or(ResolvedType::Nothing);
                let values = elements
                    .iter()
                    .map(|element| {
                        self.foreign_value(element, &element_type)
                            .unwrap_or_else(|| ConstantValue::error("Unresolved array element"))
                    })
                    .collect();
                Some(ConstantValue::array(values, expected.clone()))
            }
            ForeignAnnotationArgument::Annotation { annotation, .. } => {
                annotation.class_fq_name.as_ref()?;
                Some(ConstantValue::annotation(self.resolve_foreign(annotation)))
            }
            ForeignAnnotationArgument::ClassObject { ty, .. } => Some(ConstantValue::KClass(ty.not_nullable().clone())),
        }
    }

    /// Remap the host target argument (one element type or an array of them) onto native target entries.
    fn remap_host_targets(&self, arguments: &[ForeignAnnotationArgument]) -> Option<ConstantValue> {
        let [argument] = arguments else {
            return None;
        };
        let host_names: Vec<&str> = match argument {
            ForeignAnnotationArgument::EnumValue { entry, .. } => vec![entry.as_str()],
            ForeignAnnotationArgument::Array { elements, .. } => elements
                .iter()
                .filter_map(|element| match element {
                    ForeignAnnotationArgument::EnumValue { entry, .. } => Some(entry.as_str()),
                    _ => None,
                })
                .collect(),
            _ => return None,
        };

        let entries = host_names
            .into_iter()
            .flat_map(targets::from_host_element_type)
            .filter_map(|target| self.builtins.target_entry(*target))
            .map(|entry| ConstantValue::Enum(entry.clone()))
            .collect();
        Some(ConstantValue::array(
            entries,
            self.builtins.allowed_targets_parameter().ty.clone(),
        ))
    }
}

/// Bind the arguments of a resolved annotation constructor call.
///
/// Each parameter's arguments are folded against the parameter type. A `vararg` parameter collects every folded
/// argument (spread arrays are flattened) into an array of the parameter type; any other parameter takes its single
/// argument when it folds to a non-error constant.
pub(crate) fn bind_source_arguments(
    evaluator: &mut ConstantExpressionEvaluator<'_>,
    call: &ResolvedCall,
    arguments: &[ValueArgument],
) -> Result<AnnotationDescriptor, EvalError> {
    let ty = match &call.descriptor {
        CallableDescriptor::Constructor(class) => class.default_type(),
        other => ResolvedType::error(other.name()),
    };
    let mut descriptor = AnnotationDescriptor::new(ty);

    for resolved in &call.value_arguments {
        let parameter = &resolved.parameter;
        let bound: Vec<&ValueArgument> = resolved
            .argument_ids
            .iter()
            .filter_map(|id| arguments.iter().find(|a| a.expression.id == *id))
            .collect();

        if let Some(element_type) = &parameter.vararg_element_type {
            let mut elements = Vec::with_capacity(bound.len());
            for argument in bound {
                let expected = if argument.is_spread { &parameter.ty } else { element_type };
                let Some(constant) = evaluator.fold(&argument.expression, Some(expected))? else {
                    continue;
                };
                if constant.is_error() {
                    continue;
                }
                match constant.to_constant_value(Some(expected)) {
                    ConstantValue::Array { elements: spread, .. } if argument.is_spread => elements.extend(spread),
                    value => elements.push(value),
                }
            }
            descriptor.set_argument(parameter.clone(), ConstantValue::array(elements, parameter.ty.clone()));
        } else if let [argument] = bound.as_slice() {
            let Some(constant) = evaluator.fold(&argument.expression, Some(&parameter.ty))? else {
                continue;
            };
            if !constant.is_error() {
                descriptor.set_argument(parameter.clone(), constant.to_constant_value(Some(&parameter.ty)));
            }
        }
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::descriptors::ClassKind;
    use crate::frontend::resolution::RecordedResolution;
    use konst_core::PrimitiveKind;
    use konst_core::lang::targets::TargetId;

    fn target_names(value: &ConstantValue) -> Vec<String> {
        let ConstantValue::Array { elements, .. } = value else {
            panic!("expected array, got {value}");
        };
        elements
            .iter()
            .map(|e| match e {
                ConstantValue::Enum(entry) => entry.name.clone(),
                other => panic!("expected enum, got {other}"),
            })
            .collect()
    }

    #[test]
    fn host_deprecated_without_arguments_gets_message() {
        let builtins = BuiltIns::new();
        let resolution = RecordedResolution::with_builtins(&builtins);
        let resolver = AnnotationArgumentResolver::new(&resolution, &builtins, OperationRegistry::shared());

        let descriptor = resolver.resolve_foreign(&ForeignAnnotation {
            class_fq_name: Some(names::HOST_DEPRECATED_ANNOTATION.to_string()),
            arguments: vec![],
        });
        assert_eq!(descriptor.class_fq_name(), Some(names::DEPRECATED_ANNOTATION));
        assert_eq!(
            descriptor.argument(names::DEFAULT_ANNOTATION_MEMBER),
            Some(&ConstantValue::String(names::HOST_DEPRECATED_MESSAGE.to_string()))
        );
    }

    #[test]
    fn host_target_method_expands_to_function_and_accessors() {
        let builtins = BuiltIns::new();
        let resolution = RecordedResolution::with_builtins(&builtins);
        let resolver = AnnotationArgumentResolver::new(&resolution, &builtins, OperationRegistry::shared());

        let host_entry = |entry: &str| ForeignAnnotationArgument::EnumValue {
            name: None,
            enum_class: names::HOST_ELEMENT_TYPE_ENUM.to_string(),
            entry: entry.to_string(),
        };
        let descriptor = resolver.resolve_foreign(&ForeignAnnotation {
            class_fq_name: Some(names::HOST_TARGET_ANNOTATION.to_string()),
            arguments: vec![ForeignAnnotationArgument::Array {
                name: None,
                elements: vec![host_entry("METHOD"), host_entry("FIELD")],
            }],
        });

        assert_eq!(descriptor.class_fq_name(), Some(names::TARGET_ANNOTATION));
        let allowed = descriptor.argument(names::ALLOWED_TARGETS_PARAMETER).unwrap();
        assert_eq!(
            target_names(allowed),
            vec!["FUNCTION", "PROPERTY_GETTER", "PROPERTY_SETTER", "FIELD"]
        );
        assert_eq!(allowed.ty(), builtins.allowed_targets_parameter().ty);
        let ConstantValue::Array { elements, .. } = allowed else {
            unreachable!();
        };
        let ConstantValue::Enum(first) = &elements[0] else {
            unreachable!();
        };
        assert!(Arc::ptr_eq(first, builtins.target_entry(TargetId::Function).unwrap()));
    }

    #[test]
    fn foreign_arguments_bind_by_name_and_default_member() {
        let builtins = BuiltIns::new();
        let mut resolution = RecordedResolution::with_builtins(&builtins);
        let string = ResolvedType::primitive(PrimitiveKind::String);
        let ints = ResolvedType::array_of(ResolvedType::primitive(PrimitiveKind::Int));
        let class = Arc::new(
            ClassDescriptor::new("lib.Info", ClassKind::AnnotationClass)
                .with_parameter("value", string)
                .with_parameter("codes", ints.clone())
                .with_parameter("type", ResolvedType::class(names::KCLASS)),
        );
        resolution.register_class(class);
        let resolver = AnnotationArgumentResolver::new(&resolution, &builtins, OperationRegistry::shared());

        let descriptor = resolver.resolve_foreign(&ForeignAnnotation {
            class_fq_name: Some("lib.Info".to_string()),
            arguments: vec![
                ForeignAnnotationArgument::Literal {
                    name: None,
                    value: NativeValue::String("hello".into()),
                },
                ForeignAnnotationArgument::Array {
                    name: Some("codes".into()),
                    elements: vec![
                        ForeignAnnotationArgument::Literal {
                            name: None,
                            value: NativeValue::Int(1),
                        },
                        ForeignAnnotationArgument::Literal {
                            name: None,
                            value: NativeValue::Opaque("?".into()),
                        },
                    ],
                },
                ForeignAnnotationArgument::ClassObject {
                    name: Some("type".into()),
                    ty: ResolvedType::class("lib.Thing").nullable(),
                },
                ForeignAnnotationArgument::Literal {
                    name: Some("unknown".into()),
                    value: NativeValue::Int(3),
                },
            ],
        });

        assert_eq!(descriptor.argument("value"), Some(&ConstantValue::String("hello".into())));
        assert_eq!(
            descriptor.argument("codes"),
            Some(&ConstantValue::array(
                vec![ConstantValue::Int(1), ConstantValue::error("Unresolved array element")],
                ints
            ))
        );
        assert_eq!(
            descriptor.argument("type"),
            Some(&ConstantValue::KClass(ResolvedType::class("lib.Thing")))
        );
        assert_eq!(descriptor.arguments().len(), 3);
    }

    #[test]
    fn unresolved_foreign_class_has_error_type() {
        let builtins = BuiltIns::new();
        let resolution = RecordedResolution::with_builtins(&builtins);
        let resolver = AnnotationArgumentResolver::new(&resolution, &builtins, OperationRegistry::shared());
        let descriptor = resolver.resolve_foreign(&ForeignAnnotation {
            class_fq_name: Some("missing.Ann".to_string()),
            arguments: vec![ForeignAnnotationArgument::Literal {
                name: None,
                value: NativeValue::Int(1),
            }],
        });
        assert!(descriptor.is_error());
        assert!(descriptor.arguments().is_empty());
    }
}
