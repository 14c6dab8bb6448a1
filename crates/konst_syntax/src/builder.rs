//! Programmatic tree construction.
//!
//! [`AstBuilder`] hands out fresh [`NodeId`]s and monotonically increasing spans so that trees built in code (by a
//! parser, a test, or a fuzz harness) satisfy the identity rules of [`crate::ast`].
//!
//! ## Examples
//! ```rust
//! use konst_core::lang::operators::OperatorToken;
//! use konst_syntax::ast::ExprKind;
//! use konst_syntax::builder::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! let lhs = b.int("1");
//! let rhs = b.int("2");
//! let sum = b.binary(lhs, OperatorToken::Plus, rhs);
//! assert!(matches!(sum.kind, ExprKind::Binary { .. }));
//! ```

use konst_core::lang::operators::OperatorToken;

use crate::ast::*;

/// Allocates node identities while building a tree.
#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: u32,
    offset: usize,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn span(&mut self, width: usize) -> Span {
        let start = self.offset;
        self.offset += width.max(1);
        Span::new(start, self.offset)
    }

    pub fn expr(&mut self, kind: ExprKind) -> Expr {
        Expr {
            id: self.fresh_id(),
            span: self.span(1),
            kind,
            annotations: Vec::new(),
        }
    }

    // ---- literals ----

    pub fn literal(&mut self, kind: LiteralKind, text: &str) -> Expr {
        let span = self.span(text.len());
        Expr {
            id: self.fresh_id(),
            span,
            kind: ExprKind::Constant(Literal {
                kind,
                text: text.to_string(),
            }),
            annotations: Vec::new(),
        }
    }

    pub fn int(&mut self, text: &str) -> Expr {
        self.literal(LiteralKind::Integer, text)
    }

    pub fn float(&mut self, text: &str) -> Expr {
        self.literal(LiteralKind::Float, text)
    }

    pub fn boolean(&mut self, value: bool) -> Expr {
        self.literal(LiteralKind::Boolean, if value { "true" } else { "false" })
    }

    /// Character literal; `text` includes the quotes (`'a'`, `'\n'`).
    pub fn character(&mut self, text: &str) -> Expr {
        self.literal(LiteralKind::Character, text)
    }

    pub fn null(&mut self) -> Expr {
        self.literal(LiteralKind::Null, "null")
    }

    /// A string template made of one plain text entry.
    pub fn string(&mut self, text: &str) -> Expr {
        self.template(vec![TemplateEntry::Literal(text.to_string())])
    }

    pub fn template(&mut self, entries: Vec<TemplateEntry>) -> Expr {
        self.expr(ExprKind::StringTemplate(entries))
    }

    // ---- operators ----

    pub fn operation(&mut self, token: OperatorToken) -> OperationReference {
        OperationReference {
            id: self.fresh_id(),
            span: self.span(1),
            token,
        }
    }

    pub fn binary(&mut self, left: Expr, token: OperatorToken, right: Expr) -> Expr {
        let operation = self.operation(token);
        self.expr(ExprKind::Binary {
            left: Box::new(left),
            operation,
            right: Box::new(right),
        })
    }

    /// A binary expression spelled by name (`a compareTo b`).
    pub fn infix_call(&mut self, left: Expr, right: Expr) -> Expr {
        self.binary(left, OperatorToken::Identifier, right)
    }

    pub fn prefix(&mut self, token: OperatorToken, base: Expr) -> Expr {
        let operation = self.operation(token);
        self.expr(ExprKind::Unary {
            operation,
            base: Box::new(base),
            is_postfix: false,
        })
    }

    pub fn paren(&mut self, inner: Expr) -> Expr {
        self.expr(ExprKind::Parenthesized(Box::new(inner)))
    }

    pub fn labeled(&mut self, label: &str, body: Expr) -> Expr {
        self.expr(ExprKind::Labeled {
            label: label.to_string(),
            body: Box::new(body),
        })
    }

    // ---- references and calls ----

    pub fn name(&mut self, ident: &str) -> Expr {
        self.expr(ExprKind::SimpleName(ident.to_string()))
    }

    pub fn qualified(&mut self, receiver: Expr, selector: Expr) -> Expr {
        self.expr(ExprKind::Qualified {
            receiver: Box::new(receiver),
            selector: Box::new(selector),
            is_safe: false,
        })
    }

    pub fn call(&mut self, callee: Expr, arguments: Vec<ValueArgument>) -> Expr {
        self.expr(ExprKind::Call {
            callee: Box::new(callee),
            arguments,
        })
    }

    /// `name(args...)` with positional arguments.
    pub fn call_named(&mut self, name: &str, arguments: Vec<Expr>) -> Expr {
        let callee = self.name(name);
        self.call(callee, arguments.into_iter().map(positional).collect())
    }

    pub fn cast(&mut self, left: Expr, type_name: &str) -> Expr {
        let target = self.type_ref(type_name);
        self.expr(ExprKind::Cast {
            left: Box::new(left),
            target,
        })
    }

    pub fn class_literal(&mut self, type_name: &str) -> Expr {
        let target = self.type_ref(type_name);
        self.expr(ExprKind::ClassLiteral(target))
    }

    pub fn function_literal(&mut self, parameters: Vec<Declaration>, body: Option<Expr>) -> Expr {
        self.expr(ExprKind::FunctionLiteral(Box::new(FunctionDecl {
            name: None,
            is_literal: true,
            parameters,
            return_type: None,
            body,
        })))
    }

    pub fn block(&mut self, statements: Vec<Statement>) -> Expr {
        self.expr(ExprKind::Block(statements))
    }

    // ---- annotations and types ----

    pub fn type_ref(&mut self, name: &str) -> TypeReference {
        TypeReference {
            id: self.fresh_id(),
            span: self.span(name.len()),
            name: name.to_string(),
            annotations: Vec::new(),
        }
    }

    pub fn annotation(&mut self, name: &str, arguments: Vec<ValueArgument>) -> AnnotationEntry {
        let type_ref = self.type_ref(name);
        AnnotationEntry {
            id: self.fresh_id(),
            span: self.span(1),
            type_ref,
            arguments,
        }
    }

    // ---- declarations ----

    pub fn declaration(&mut self, kind: DeclKind, annotations: Vec<AnnotationEntry>) -> Declaration {
        Declaration {
            id: self.fresh_id(),
            span: self.span(1),
            annotations,
            kind,
        }
    }

    pub fn property(&mut self, name: &str, annotations: Vec<AnnotationEntry>) -> Declaration {
        self.declaration(
            DeclKind::Property(PropertyDecl {
                name: name.to_string(),
                is_local: false,
                is_var: false,
                type_ref: None,
                initializer: None,
                accessors: Vec::new(),
            }),
            annotations,
        )
    }

    /// `val name = initializer` inside a body.
    pub fn local_property(&mut self, name: &str, initializer: Expr, annotations: Vec<AnnotationEntry>) -> Declaration {
        self.declaration(
            DeclKind::Property(PropertyDecl {
                name: name.to_string(),
                is_local: true,
                is_var: false,
                type_ref: None,
                initializer: Some(initializer),
                accessors: Vec::new(),
            }),
            annotations,
        )
    }

    pub fn parameter(&mut self, name: &str, has_val_or_var: bool, annotations: Vec<AnnotationEntry>) -> Declaration {
        self.declaration(
            DeclKind::Parameter(ParameterDecl {
                name: name.to_string(),
                has_val_or_var,
                type_ref: None,
                default_value: None,
            }),
            annotations,
        )
    }

    pub fn function(
        &mut self,
        name: &str,
        parameters: Vec<Declaration>,
        annotations: Vec<AnnotationEntry>,
    ) -> Declaration {
        self.declaration(
            DeclKind::Function(FunctionDecl {
                name: Some(name.to_string()),
                is_literal: false,
                parameters,
                return_type: None,
                body: None,
            }),
            annotations,
        )
    }

    pub fn class(&mut self, name: &str, kind: ClassDeclKind, annotations: Vec<AnnotationEntry>) -> Declaration {
        self.declaration(
            DeclKind::Class(ClassDecl {
                name: name.to_string(),
                kind,
                anonymous_initializers: Vec::new(),
                members: Vec::new(),
            }),
            annotations,
        )
    }
}

/// A positional argument.
pub fn positional(expression: Expr) -> ValueArgument {
    ValueArgument {
        name: None,
        expression,
        is_spread: false,
    }
}

/// A named argument (`name = expression`).
pub fn named(name: &str, expression: Expr) -> ValueArgument {
    ValueArgument {
        name: Some(name.to_string()),
        expression,
        is_spread: false,
    }
}
