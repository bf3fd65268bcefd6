//! The concrete syntax tree produced by the [parser][`crate::parser`].
//!
//! Every grammar rule has one node here. A node holds, in grammar order,
//! every token and child node the rule matched (punctuation included),
//! as well as the span from its first to its last token.
//!
//! ```text
//! Program           := Statement+
//! Statement         := (LetDecl | ExprStmt) ';'
//! LetDecl           := 'let' 'mut'? Identifier '=' Expression
//! ExprStmt          := Expression
//! Expression        := BinaryExpr
//! BinaryExpr        := CallExpr (BinOp CallExpr)*
//! CallExpr          := MemberExpr Arguments?
//! Arguments         := '(' (Expression (',' Expression)*)? ')'
//! MemberExpr        := PrimaryExpr (DotMember | DoubleColonMember)?
//! DotMember         := '.' IdentExpr
//! DoubleColonMember := '::' IdentExpr
//! PrimaryExpr       := IdentExpr | IntLiteralExpr
//! IdentExpr         := Identifier
//! IntLiteralExpr    := Integer
//! ```
#![allow(missing_docs)]

use crate::lexer::token::Token;
use crate::span::{Span, Spanned};

/// `Program := Statement+`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span
}

/// `Statement := (LetDecl | ExprStmt) ';'`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Statement {
    pub kind: StatementKind,
    pub semi: Token,
    pub span: Span
}

/// The two alternatives of a statement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum StatementKind {
    LetDecl(LetDecl),
    ExprStmt(ExprStmt)
}

/// `LetDecl := 'let' 'mut'? Identifier '=' Expression`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LetDecl {
    pub let_kw: Token,
    pub mut_kw: Option<Token>,
    pub ident: Token,
    pub equal: Token,
    pub expr: Expression,
    pub span: Span
}

/// `ExprStmt := Expression`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExprStmt {
    pub expr: Expression,
    pub span: Span
}

/// `Expression := BinaryExpr`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Expression {
    pub binary: BinaryExpr,
    pub span: Span
}

/// `BinaryExpr := CallExpr (BinOp CallExpr)*`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BinaryExpr {
    pub head: CallExpr,
    /// Each operator token with its right operand, in source order.
    pub tail: Vec<(Token, CallExpr)>,
    pub span: Span
}

/// `CallExpr := MemberExpr Arguments?`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CallExpr {
    pub member: MemberExpr,
    pub args: Option<Arguments>,
    pub span: Span
}

/// `Arguments := '(' (Expression (',' Expression)*)? ')'`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Arguments {
    pub lparen: Token,
    pub exprs: Vec<Expression>,
    pub commas: Vec<Token>,
    pub rparen: Token,
    pub span: Span
}

/// `MemberExpr := PrimaryExpr (DotMember | DoubleColonMember)?`
///
/// Only one member suffix is allowed (`a.b`, not `a.b.c`).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MemberExpr {
    pub primary: PrimaryExpr,
    pub suffix: Option<MemberSuffix>,
    pub span: Span
}

/// The two alternatives of a member suffix.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MemberSuffix {
    Dot(DotMember),
    DoubleColon(DoubleColonMember)
}

/// `DotMember := '.' IdentExpr`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DotMember {
    pub dot: Token,
    pub ident: IdentExpr,
    pub span: Span
}

/// `DoubleColonMember := '::' IdentExpr`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DoubleColonMember {
    pub dcolon: Token,
    pub ident: IdentExpr,
    pub span: Span
}

/// `PrimaryExpr := IdentExpr | IntLiteralExpr`
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PrimaryExpr {
    Ident(IdentExpr),
    IntLiteral(IntLiteralExpr)
}

/// `IdentExpr := Identifier`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IdentExpr {
    pub ident: Token
}

/// `IntLiteralExpr := Integer`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IntLiteralExpr {
    pub int: Token
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
impl_spanned! {
    Program, Statement, LetDecl, ExprStmt, Expression, BinaryExpr,
    CallExpr, Arguments, MemberExpr, DotMember, DoubleColonMember
}

impl Spanned for StatementKind {
    fn span(&self) -> &Span {
        match self {
            StatementKind::LetDecl(d)  => d.span(),
            StatementKind::ExprStmt(e) => e.span(),
        }
    }
}
impl Spanned for MemberSuffix {
    fn span(&self) -> &Span {
        match self {
            MemberSuffix::Dot(m)         => m.span(),
            MemberSuffix::DoubleColon(m) => m.span(),
        }
    }
}
impl Spanned for PrimaryExpr {
    fn span(&self) -> &Span {
        match self {
            PrimaryExpr::Ident(e)      => e.span(),
            PrimaryExpr::IntLiteral(e) => e.span(),
        }
    }
}
impl Spanned for IdentExpr {
    fn span(&self) -> &Span {
        &self.ident.span
    }
}
impl Spanned for IntLiteralExpr {
    fn span(&self) -> &Span {
        &self.int.span
    }
}
