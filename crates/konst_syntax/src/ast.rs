//! Expression and declaration tree definitions.
//!
//! The tree is produced by the parser collaborator; the engine only reads it. Every node that can be the key of an
//! analysis result (expressions, operation references, annotation entries, type references, declarations) carries a
//! [`NodeId`] that is unique within one parsed unit.
//!
//! Node kinds are closed enums: adding a kind is a compile error at every exhaustive `match` over it.

use std::fmt;

use konst_core::lang::operators::OperatorToken;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Identity of a tree node, unique within one parsed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier (interned string index in practice, String for simplicity here)
pub type Ident = String;

// ============================================================================
// Expressions
// ============================================================================

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
    /// Annotations written directly on the expression (`@Ann expr`).
    pub annotations: Vec<AnnotationEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal constant: integer, floating point, boolean, character or `null`.
    Constant(Literal),
    /// `(expr)`
    Parenthesized(Box<Expr>),
    /// `label@ expr`
    Labeled { label: Ident, body: Box<Expr> },
    /// `"text ${expr} \n"`
    StringTemplate(Vec<TemplateEntry>),
    /// `left op right`
    Binary {
        left: Box<Expr>,
        operation: OperationReference,
        right: Box<Expr>,
    },
    /// `op base` or `base op`
    Unary {
        operation: OperationReference,
        base: Box<Expr>,
        is_postfix: bool,
    },
    /// `left as Type`
    Cast { left: Box<Expr>, target: TypeReference },
    /// `name`
    SimpleName(Ident),
    /// `receiver.selector` or `receiver?.selector`
    Qualified {
        receiver: Box<Expr>,
        selector: Box<Expr>,
        is_safe: bool,
    },
    /// `callee(arguments)`
    Call { callee: Box<Expr>, arguments: Vec<ValueArgument> },
    /// `Type::class`
    ClassLiteral(TypeReference),
    /// `{ params -> body }`
    FunctionLiteral(Box<FunctionDecl>),
    /// `{ statements }`
    Block(Vec<Statement>),
    /// `if (condition) then else otherwise`
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    /// `this`
    This,
}

/// Literal categories as classified by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Float,
    Boolean,
    Character,
    Null,
}

/// A literal with its raw source text (e.g. `0x1F`, `1.5f`, `'\n'`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

/// The operator token of a binary or unary expression. Its id keys the resolved operator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReference {
    pub id: NodeId,
    pub span: Span,
    pub token: OperatorToken,
}

/// One segment of a string template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateEntry {
    /// Plain text.
    Literal(String),
    /// An escape sequence with its source text and decoded value.
    Escape { text: String, unescaped: String },
    /// `$name` or `${expr}`
    Expression(Box<Expr>),
}

/// One statement of a block: an expression or a local declaration (`val x = 1`, `fun local() {}`).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expr),
    Declaration(Declaration),
}

/// An argument at a call site or in an annotation entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueArgument {
    pub name: Option<Ident>,
    pub expression: Expr,
    pub is_spread: bool,
}

// ============================================================================
// Annotations and type references
// ============================================================================

/// `@Name(arguments)` as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntry {
    pub id: NodeId,
    pub span: Span,
    pub type_ref: TypeReference,
    pub arguments: Vec<ValueArgument>,
}

/// A reference to a type as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeReference {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub annotations: Vec<AnnotationEntry>,
}

// ============================================================================
// Declarations
// ============================================================================

/// A declaration (or any other annotatable non-expression element).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub id: NodeId,
    pub span: Span,
    pub annotations: Vec<AnnotationEntry>,
    pub kind: DeclKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    File(FileDecl),
    PackageDirective(Vec<Ident>),
    /// Class, interface, object or enum class.
    Class(ClassDecl),
    EnumEntry(Ident),
    Property(PropertyDecl),
    Parameter(ParameterDecl),
    Constructor(FunctionDecl),
    Function(FunctionDecl),
    PropertyAccessor(AccessorDecl),
    /// `init { ... }`
    AnonymousInitializer(Option<Expr>),
    TypeParameter(Ident),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileDecl {
    pub package: Option<Box<Declaration>>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassDeclKind {
    Class,
    Interface,
    Object,
    Enum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub kind: ClassDeclKind,
    pub anonymous_initializers: Vec<Declaration>,
    pub members: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: Ident,
    pub is_local: bool,
    pub is_var: bool,
    pub type_ref: Option<TypeReference>,
    pub initializer: Option<Expr>,
    pub accessors: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    pub name: Ident,
    /// `val`/`var` on a constructor parameter makes it a property.
    pub has_val_or_var: bool,
    pub type_ref: Option<TypeReference>,
    pub default_value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Option<Ident>,
    /// Function literal (`{ x -> ... }`) rather than a named function.
    pub is_literal: bool,
    /// Each entry is a [`DeclKind::Parameter`] declaration.
    pub parameters: Vec<Declaration>,
    pub return_type: Option<TypeReference>,
    pub body: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDecl {
    pub is_getter: bool,
    pub body: Option<Expr>,
}

impl Declaration {
    /// The declared type reference of a callable declaration (property, parameter, function, constructor).
    pub fn callable_type_ref(&self) -> Option<&TypeReference> {
        match &self.kind {
            DeclKind::Property(p) => p.type_ref.as_ref(),
            DeclKind::Parameter(p) => p.type_ref.as_ref(),
            DeclKind::Function(f) | DeclKind::Constructor(f) => f.return_type.as_ref(),
            _ => None,
        }
    }
}
