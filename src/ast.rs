//! The components of the AST generated through the [lowering][`lower`] pass.
//!
//! A full program is described as [`Program`] struct.
//!
//! Unlike the [CST][`crate::parser::cst`], the AST only holds the parts of the program
//! that carry meaning: punctuation is dropped, binary chains are resolved into trees
//! (see [`resolve`]), and pipes are rewritten into calls.
//!
//! Every node carries the [`Span`] of source it was lowered from,
//! and the span of a node always contains the spans of its children.
//!
//! Typically, an AST should not be defined manually because it is painful.
//! Instead, [`crate::compile`] should be used to create one from a string.

use crate::span::{Span, Spanned};

pub mod op;
pub mod resolve;
pub mod lower;
pub mod transpile;
mod display;

pub use op::BinOp;

/// A complete program.
///
/// # Syntax
/// ```text
/// program = (stmt ";")+ ;
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Program {
    /// The statements of the program, in order.
    pub stmts: Vec<Stmt>,
    /// The span from the start of the first statement to the end of the last.
    pub span: Span
}

/// A statement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Stmt {
    /// A variable declaration with a value initializer.
    ///
    /// See [`Decl`] for examples.
    Decl(Decl),

    /// An expression.
    Expr(ExprStmt)
}

/// A variable declaration.
///
/// # Syntax
/// ```text
/// decl = "let" "mut"? ident "=" expr;
/// ```
///
/// # Example
/// ```text
/// let a = 1;
/// let mut b = f(a);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Decl {
    /// Whether the variable can be reassigned.
    pub mt: MutType,
    /// The variable being declared.
    pub ident: Ident,
    /// The initializer.
    pub value: Expr,
    /// The span from `let` to the end of the initializer.
    pub span: Span
}

/// The mutability of a declaration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MutType {
    /// `let mut x = ...`
    Mut,
    /// `let x = ...`
    Immut
}

/// An expression used as a statement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExprStmt {
    #[allow(missing_docs)]
    pub expr: Expr
}

/// An expression.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expr {
    /// Variable access.
    Ident(Ident),

    /// Integer literal (e.g. `1`, `14`, `007`).
    IntLiteral(IntLiteral),

    /// A function call.
    ///
    /// Pipes (`a |> f`) also produce calls.
    Call(Call),

    /// Property access (`a.b`).
    Member(Member),

    /// Namespace access (`a::b`).
    NamespaceMember(Member),

    /// A binary operation (e.g. `a + b`, `a is b`).
    Binary(Binary),

    /// Waiting on the result of a call (`a ||> f`).
    Await(Await)
}

/// An identifier.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Ident {
    /// The text of the identifier.
    pub name: String,
    #[allow(missing_docs)]
    pub span: Span
}

/// An integer literal.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IntLiteral {
    /// The parsed value.
    pub value: u64,
    /// The literal as written in source.
    pub raw: String,
    #[allow(missing_docs)]
    pub span: Span
}

/// A function call.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Call {
    /// The function being called.
    pub callee: Box<Expr>,
    /// The arguments, in order.
    pub args: Vec<Expr>,
    #[allow(missing_docs)]
    pub span: Span
}

/// Access of a named member of an object or namespace.
///
/// Both `a.b` and `a::b` use this node. See [`Expr::Member`] and [`Expr::NamespaceMember`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Member {
    /// The expression being accessed.
    pub object: Box<Expr>,
    /// The member's name.
    pub property: Ident,
    #[allow(missing_docs)]
    pub span: Span
}

/// A binary operation.
///
/// [Resolution][`resolve`] never produces a pipe operator here,
/// as pipes are rewritten into [`Call`] and [`Await`].
/// A pipe built by hand is still transpiled as the equivalent call.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Binary {
    #[allow(missing_docs)]
    pub op: BinOp,
    #[allow(missing_docs)]
    pub lhs: Box<Expr>,
    #[allow(missing_docs)]
    pub rhs: Box<Expr>,
    #[allow(missing_docs)]
    pub span: Span
}

/// An await on an expression.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Await {
    /// The expression being awaited.
    pub expr: Box<Expr>,
    #[allow(missing_docs)]
    pub span: Span
}

impl Expr {
    /// The direct subexpressions of this expression, in source order.
    ///
    /// For calls produced by pipes, the argument comes before the callee,
    /// as they appear in that order in source.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Ident(_) | Expr::IntLiteral(_) => vec![],
            Expr::Call(Call { callee, args, .. }) => {
                let mut children: Vec<_> = std::iter::once(&**callee).chain(args).collect();
                children.sort_by_key(|e| e.span().start());
                children
            },
            Expr::Member(m) | Expr::NamespaceMember(m) => vec![&*m.object],
            Expr::Binary(Binary { lhs, rhs, .. }) => vec![lhs, rhs],
            Expr::Await(Await { expr, .. }) => vec![expr],
        }
    }
}

macro_rules! impl_spanned {
    ($($t:ident),*) => {
        $(
            impl Spanned for $t {
                fn span(&self) -> &Span {
                    &self.span
                }
            }
        )*
    }
}
impl_spanned! { Program, Decl, Ident, IntLiteral, Call, Member, Binary, Await }

impl Spanned for ExprStmt {
    fn span(&self) -> &Span {
        self.expr.span()
    }
}
impl Spanned for Stmt {
    fn span(&self) -> &Span {
        match self {
            Stmt::Decl(d) => d.span(),
            Stmt::Expr(e) => e.span(),
        }
    }
}
impl Spanned for Expr {
    fn span(&self) -> &Span {
        match self {
            Expr::Ident(e)           => e.span(),
            Expr::IntLiteral(e)      => e.span(),
            Expr::Call(e)            => e.span(),
            Expr::Member(e)          => e.span(),
            Expr::NamespaceMember(e) => e.span(),
            Expr::Binary(e)          => e.span(),
            Expr::Await(e)           => e.span(),
        }
    }
}
