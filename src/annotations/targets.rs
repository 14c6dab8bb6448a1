//! Annotation applicability checks.
//!
//! Every annotated element has a list of *actual targets* derived from its syntactic category. Every annotation
//! class has a set of *possible targets* read from its own target-restriction annotation. An annotation whose
//! possible targets share nothing with the actual targets is reported as applied to the wrong target.

use konst_core::lang::names;
use konst_core::lang::targets::{self, TargetId, TargetSet};

use crate::constants::value::ConstantValue;
use crate::frontend::ast::{
    AnnotationEntry, ClassDecl, DeclKind, Declaration, Expr, ExprKind, FunctionDecl, Statement, TemplateEntry,
    TypeReference,
};
use crate::frontend::diagnostics::errors;
use crate::frontend::resolution::Resolution;
use crate::frontend::trace::BindingTrace;

pub struct AnnotationTargetChecker<'a> {
    resolution: &'a dyn Resolution,
}

impl<'a> AnnotationTargetChecker<'a> {
    pub fn new(resolution: &'a dyn Resolution) -> Self {
        Self { resolution }
    }

    /// Check the annotations of a declaration, its declared type, plain parameters and initializer blocks.
    #[tracing::instrument(skip_all, fields(declaration = %declaration.id))]
    pub fn check(&self, declaration: &Declaration, trace: &mut BindingTrace) {
        if matches!(declaration.kind, DeclKind::TypeParameter(_)) {
            return;
        }
        let actual = self.actual_targets(declaration);
        self.check_entries(&declaration.annotations, &actual, trace);

        if let Some(type_ref) = declaration.callable_type_ref() {
            self.check_type_reference(type_ref, trace);
        }
        match &declaration.kind {
            DeclKind::Function(function) | DeclKind::Constructor(function) => {
                for parameter in &function.parameters {
                    if !is_property_backed(parameter) {
                        self.check(parameter, trace);
                    }
                }
            }
            DeclKind::Class(class) => {
                for initializer in &class.anonymous_initializers {
                    self.check(initializer, trace);
                }
            }
            _ => {}
        }
    }

    /// Check every annotation inside an expression, including local declarations in blocks. Annotated expressions
    /// only accept expression targets.
    pub fn check_expression(&self, expr: &Expr, trace: &mut BindingTrace) {
        self.check_entries(&expr.annotations, &[TargetId::Expression], trace);

        match &expr.kind {
            ExprKind::Constant(_) | ExprKind::SimpleName(_) | ExprKind::This => {}
            ExprKind::Parenthesized(inner) => self.check_expression(inner, trace),
            ExprKind::Labeled { body, .. } => self.check_expression(body, trace),
            ExprKind::StringTemplate(entries) => {
                for entry in entries {
                    if let TemplateEntry::Expression(inner) = entry {
                        self.check_expression(inner, trace);
                    }
                }
            }
            ExprKind::Binary { left, right, .. } => {
                self.check_expression(left, trace);
                self.check_expression(right, trace);
            }
            ExprKind::Unary { base, .. } => self.check_expression(base, trace),
            ExprKind::Cast { left, target } => {
                self.check_expression(left, trace);
                self.check_type_reference(target, trace);
            }
            ExprKind::Qualified { receiver, selector, .. } => {
                self.check_expression(receiver, trace);
                self.check_expression(selector, trace);
            }
            ExprKind::Call { callee, arguments } => {
                self.check_expression(callee, trace);
                for argument in arguments {
                    self.check_expression(&argument.expression, trace);
                }
            }
            ExprKind::ClassLiteral(type_ref) => self.check_type_reference(type_ref, trace),
            ExprKind::FunctionLiteral(function) => self.check_function_literal(function, trace),
            ExprKind::Block(statements) => {
                for statement in statements {
                    match statement {
                        Statement::Expression(inner) => self.check_expression(inner, trace),
                        Statement::Declaration(local) => self.walk_declaration(local, trace),
                    }
                }
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_expression(condition, trace);
                self.check_expression(then_branch, trace);
                if let Some(otherwise) = else_branch {
                    self.check_expression(otherwise, trace);
                }
            }
        }
    }

    pub fn check_type_reference(&self, type_ref: &TypeReference, trace: &mut BindingTrace) {
        self.check_entries(&type_ref.annotations, &[TargetId::Type], trace);
    }

    /// Check a whole file: the file itself, its package directive, and every nested declaration and expression.
    #[tracing::instrument(skip_all, fields(file = %file.id))]
    pub fn check_file(&self, file: &Declaration, trace: &mut BindingTrace) {
        self.check(file, trace);
        let DeclKind::File(contents) = &file.kind else {
            return;
        };
        if let Some(package) = &contents.package {
            self.check(package, trace);
        }
        for declaration in &contents.declarations {
            self.walk_declaration(declaration, trace);
        }
    }

    /// Possible targets of the annotation recorded for `entry`.
    ///
    /// ## Returns
    /// - The full set when the annotation's type failed to resolve.
    /// - The default set when the entry was never resolved or its class declares no restriction.
    pub fn possible_targets(&self, entry: &AnnotationEntry, trace: &BindingTrace) -> TargetSet {
        let Some(descriptor) = trace.annotation(entry.id) else {
            return TargetSet::DEFAULT;
        };
        if descriptor.is_error() {
            return TargetSet::ALL;
        }
        let Some(class) = descriptor.class_fq_name().and_then(|fq| self.resolution.find_class(fq)) else {
            return TargetSet::DEFAULT;
        };
        let Some(restriction) = class.find_annotation(names::TARGET_ANNOTATION) else {
            return TargetSet::DEFAULT;
        };
        match restriction.first_argument() {
            Some(ConstantValue::Array { elements, .. }) => elements
                .iter()
                .filter_map(|element| match element {
                    ConstantValue::Enum(entry) => targets::from_str(&entry.name),
                    _ => None,
                })
                .collect(),
            _ => TargetSet::DEFAULT,
        }
    }

    /// Targets implied by the syntactic category of a declaration. Some categories have none.
    pub fn actual_targets(&self, declaration: &Declaration) -> Vec<TargetId> {
        match &declaration.kind {
            DeclKind::File(_) => vec![TargetId::File],
            DeclKind::PackageDirective(_) => vec![TargetId::Package],
            DeclKind::Class(_) => {
                let is_annotation_class = self
                    .resolution
                    .declared_class(declaration.id)
                    .is_some_and(|class| class.is_annotation_class());
                if is_annotation_class {
                    vec![TargetId::AnnotationClass, TargetId::Classifier]
                } else {
                    vec![TargetId::Classifier]
                }
            }
            DeclKind::EnumEntry(_) => vec![TargetId::Property, TargetId::Field],
            DeclKind::Property(property) if property.is_local => vec![TargetId::LocalVariable],
            DeclKind::Property(_) => vec![TargetId::Property, TargetId::Field],
            DeclKind::Parameter(parameter) if parameter.has_val_or_var => vec![TargetId::Property, TargetId::Field],
            DeclKind::Parameter(_) => vec![TargetId::ValueParameter],
            DeclKind::Constructor(_) => vec![TargetId::Constructor],
            DeclKind::Function(_) => vec![TargetId::Function],
            DeclKind::PropertyAccessor(accessor) if accessor.is_getter => vec![TargetId::PropertyGetter],
            DeclKind::PropertyAccessor(_) => vec![TargetId::PropertySetter],
            DeclKind::AnonymousInitializer(_) | DeclKind::TypeParameter(_) => Vec::new(),
        }
    }

    fn check_entries(&self, entries: &[AnnotationEntry], actual: &[TargetId], trace: &mut BindingTrace) {
        for entry in entries {
            let possible = self.possible_targets(entry, trace);
            if actual.iter().any(|target| possible.contains(*target)) {
                continue;
            }
            let description = actual
                .first()
                .map_or(targets::UNIDENTIFIED_TARGET, |target| targets::description(*target));
            trace.report(errors::wrong_annotation_target(description, entry.id, entry.span));
        }
    }

    fn check_function_literal(&self, function: &FunctionDecl, trace: &mut BindingTrace) {
        for parameter in &function.parameters {
            self.check(parameter, trace);
        }
        if let Some(body) = &function.body {
            self.check_expression(body, trace);
        }
    }

    /// Check a declaration, then everything nested inside it.
    fn walk_declaration(&self, declaration: &Declaration, trace: &mut BindingTrace) {
        self.check(declaration, trace);
        match &declaration.kind {
            DeclKind::Class(class) => self.walk_class(class, trace),
            DeclKind::Property(property) => {
                if let Some(initializer) = &property.initializer {
                    self.check_expression(initializer, trace);
                }
                for accessor in &property.accessors {
                    self.walk_declaration(accessor, trace);
                }
            }
            DeclKind::Parameter(parameter) => {
                if let Some(default) = &parameter.default_value {
                    self.check_expression(default, trace);
                }
            }
            DeclKind::Function(function) | DeclKind::Constructor(function) => {
                for parameter in &function.parameters {
                    if let DeclKind::Parameter(decl) = &parameter.kind {
                        if let Some(default) = &decl.default_value {
                            self.check_expression(default, trace);
                        }
                    }
                }
                if let Some(body) = &function.body {
                    self.check_expression(body, trace);
                }
            }
            DeclKind::PropertyAccessor(accessor) => {
                if let Some(body) = &accessor.body {
                    self.check_expression(body, trace);
                }
            }
            DeclKind::AnonymousInitializer(Some(body)) => self.check_expression(body, trace),
            DeclKind::File(_)
            | DeclKind::PackageDirective(_)
            | DeclKind::EnumEntry(_)
            | DeclKind::AnonymousInitializer(None)
            | DeclKind::TypeParameter(_) => {}
        }
    }

    fn walk_class(&self, class: &ClassDecl, trace: &mut BindingTrace) {
        for initializer in &class.anonymous_initializers {
            if let DeclKind::AnonymousInitializer(Some(body)) = &initializer.kind {
                self.check_expression(body, trace);
            }
        }
        for member in &class.members {
            self.walk_declaration(member, trace);
            // Constructor `val`/`var` parameters are properties of the class.
            if let DeclKind::Constructor(constructor) = &member.kind {
                for parameter in constructor.parameters.iter().filter(|p| is_property_backed(p)) {
                    self.check(parameter, trace);
                }
            }
        }
    }
}

fn is_property_backed(parameter: &Declaration) -> bool {
    matches!(&parameter.kind, DeclKind::Parameter(p) if p.has_val_or_var)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::builder::AstBuilder;
    use crate::frontend::descriptors::{ClassDescriptor, ClassKind};
    use crate::frontend::resolution::RecordedResolution;
    use crate::frontend::types::BuiltIns;

    #[test]
    fn unresolved_entries_use_default_targets() {
        let resolution = RecordedResolution::new();
        let checker = AnnotationTargetChecker::new(&resolution);
        let mut b = AstBuilder::new();
        let entry = b.annotation("Unknown", vec![]);
        assert_eq!(checker.possible_targets(&entry, &BindingTrace::new()), TargetSet::DEFAULT);
    }

    #[test]
    fn annotation_classes_have_two_actual_targets() {
        let builtins = BuiltIns::new();
        let mut resolution = RecordedResolution::with_builtins(&builtins);
        let mut b = AstBuilder::new();
        let class = b.class("Marker", crate::frontend::ast::ClassDeclKind::Class, vec![]);
        resolution.record_declared_class(
            class.id,
            std::sync::Arc::new(ClassDescriptor::new("a.Marker", ClassKind::AnnotationClass)),
        );
        let checker = AnnotationTargetChecker::new(&resolution);
        assert_eq!(
            checker.actual_targets(&class),
            vec![TargetId::AnnotationClass, TargetId::Classifier]
        );
    }

    #[test]
    fn anonymous_initializer_reports_unidentified_target() {
        let resolution = RecordedResolution::new();
        let checker = AnnotationTargetChecker::new(&resolution);
        let mut b = AstBuilder::new();
        let entry = b.annotation("Anything", vec![]);
        let initializer = b.declaration(DeclKind::AnonymousInitializer(None), vec![entry]);

        let mut trace = BindingTrace::new();
        checker.check(&initializer, &mut trace);
        let diagnostics = trace.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains(targets::UNIDENTIFIED_TARGET));
    }
}
