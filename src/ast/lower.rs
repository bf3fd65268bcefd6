//! Converts the [CST][`crate::parser::cst`] into the [AST][`crate::ast`].
//!
//! Each CST node implements [`Lower`], which converts the node and its children
//! into their AST counterparts. During lowering:
//! - the text of identifier and integer tokens is extracted,
//! - punctuation is dropped,
//! - binary chains are [resolved][`super::resolve`] by precedence,
//! - and each AST node's span is computed from the spans of its children.

use std::fmt::Display;

use crate::err::{DwErr, FullDwErr};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::cst;
use crate::span::{SourceId, Span, SpanConflict, Spanned};

use super::resolve::resolve;
use super::*;

/// An error that occurs in the lowering process.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LowerErr {
    /// Two spans that were merged came from different sources.
    SpanConflict(SpanConflict),

    /// The program has no statements.
    EmptyProgram,

    /// An integer literal is too large.
    IntOutOfRange(String)
}
impl DwErr for LowerErr {
    fn err_name(&self) -> &'static str {
        match self {
            LowerErr::SpanConflict(_) => "internal error",
            LowerErr::EmptyProgram    => "syntax error",
            LowerErr::IntOutOfRange(_) => "literal error",
        }
    }
}
impl Display for LowerErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LowerErr::SpanConflict(c)    => write!(f, "cannot merge spans: {c}"),
            LowerErr::EmptyProgram       => write!(f, "program has no statements"),
            LowerErr::IntOutOfRange(lit) => write!(f, "integer literal {lit} is too large"),
        }
    }
}
impl std::error::Error for LowerErr {}

/// A [`LowerErr`] with its position.
pub type FullLowerErr = FullDwErr<LowerErr>;
/// A [`Result`] type for operations in the lowering process.
pub type LowerResult<T> = Result<T, FullLowerErr>;

impl From<SpanConflict> for FullLowerErr {
    fn from(value: SpanConflict) -> Self {
        let span = value.right.clone();
        LowerErr::SpanConflict(value).at(span)
    }
}

/// The state shared by every node during lowering.
#[derive(Debug, Clone)]
pub struct LowerCtx {
    source: SourceId
}

impl LowerCtx {
    /// Create a context for lowering a tree parsed from the given source.
    pub fn new(source: impl Into<SourceId>) -> Self {
        Self { source: source.into() }
    }

    /// The source being lowered.
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Get the span of a token, checking that it came from this context's source.
    fn token_span(&self, token: &Token) -> LowerResult<Span> {
        if token.span.source() == &self.source {
            Ok(token.span.clone())
        } else {
            let own = Span::empty(self.source.clone(), token.span.start());
            Err(SpanConflict { left: own, right: token.span.clone() }.into())
        }
    }
}

/// Converts a CST node into its AST node.
pub trait Lower {
    /// The AST node this CST node converts into.
    type Output;

    /// Lower this node (and its children).
    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output>;
}

impl<L: Lower> Lower for [L] {
    type Output = Vec<L::Output>;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        self.iter().map(|node| node.lower(ctx)).collect()
    }
}

impl Lower for cst::Program {
    type Output = Program;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        let stmts = self.statements.lower(ctx)?;
        let span = Span::merge_all(self.statements.iter().map(|st| &st.span))?
            .ok_or_else(|| LowerErr::EmptyProgram.at(self.span.clone()))?;

        log::debug!("lowered {} statements in {}", stmts.len(), ctx.source);
        Ok(Program { stmts, span })
    }
}

impl Lower for cst::Statement {
    type Output = Stmt;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        match &self.kind {
            cst::StatementKind::LetDecl(d)  => d.lower(ctx).map(Stmt::Decl),
            cst::StatementKind::ExprStmt(e) => e.lower(ctx).map(Stmt::Expr),
        }
    }
}

impl Lower for cst::LetDecl {
    type Output = Decl;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        let mt = match self.mut_kw {
            Some(_) => MutType::Mut,
            None    => MutType::Immut,
        };
        let ident = Ident {
            name: self.ident.text.clone(),
            span: ctx.token_span(&self.ident)?
        };
        let value = self.expr.lower(ctx)?;
        let span = ctx.token_span(&self.let_kw)?.merge(value.span())?;

        Ok(Decl { mt, ident, value, span })
    }
}

impl Lower for cst::ExprStmt {
    type Output = ExprStmt;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        Ok(ExprStmt { expr: self.expr.lower(ctx)? })
    }
}

impl Lower for cst::Expression {
    type Output = Expr;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        self.binary.lower(ctx)
    }
}

impl Lower for cst::BinaryExpr {
    type Output = Expr;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        let head = self.head.lower(ctx)?;
        let pairs = self.tail.iter()
            .map(|(op, operand)| {
                let TokenKind::Operator(op) = op.kind else {
                    unreachable!("binary expression joined by non-operator {op}")
                };
                Ok((BinOp::from(op), operand.lower(ctx)?))
            })
            .collect::<LowerResult<Vec<_>>>()?;

        Ok(resolve(head, pairs)?)
    }
}

impl Lower for cst::CallExpr {
    type Output = Expr;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        let callee = self.member.lower(ctx)?;

        match &self.args {
            Some(args) => {
                let end = ctx.token_span(&args.rparen)?.end();
                let span = callee.span().extend_to(end);

                Ok(Expr::Call(Call { callee: Box::new(callee), args: args.lower(ctx)?, span }))
            },
            None => Ok(callee)
        }
    }
}

impl Lower for cst::Arguments {
    type Output = Vec<Expr>;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        self.exprs.lower(ctx)
    }
}

impl Lower for cst::MemberExpr {
    type Output = Expr;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        let object = self.primary.lower(ctx)?;

        let (property, ns) = match &self.suffix {
            Some(cst::MemberSuffix::Dot(m)) => (m.ident.lower(ctx)?, false),
            Some(cst::MemberSuffix::DoubleColon(m)) => (m.ident.lower(ctx)?, true),
            None => return Ok(object),
        };
        let span = object.span().merge(property.span())?;
        let member = Member { object: Box::new(object), property, span };

        match ns {
            false => Ok(Expr::Member(member)),
            true  => Ok(Expr::NamespaceMember(member)),
        }
    }
}

impl Lower for cst::PrimaryExpr {
    type Output = Expr;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        match self {
            cst::PrimaryExpr::Ident(e)      => e.lower(ctx).map(Expr::Ident),
            cst::PrimaryExpr::IntLiteral(e) => e.lower(ctx).map(Expr::IntLiteral),
        }
    }
}

impl Lower for cst::IdentExpr {
    type Output = Ident;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        Ok(Ident {
            name: self.ident.text.clone(),
            span: ctx.token_span(&self.ident)?
        })
    }
}

impl Lower for cst::IntLiteralExpr {
    type Output = IntLiteral;

    fn lower(&self, ctx: &LowerCtx) -> LowerResult<Self::Output> {
        let span = ctx.token_span(&self.int)?;
        let raw = self.int.text.clone();
        let value = raw.parse()
            .map_err(|_| LowerErr::IntOutOfRange(raw.clone()).at(span.clone()))?;

        Ok(IntLiteral { value, raw, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::test_utils::prelude::*;
    use crate::test_utils::{assert_spans_contained, lower_str};

    load_tests!("tests/files/programs.dw");

    fn parse_str(input: &str, source: &str) -> cst::Program {
        let (tokens, _) = tokenize(input, source);
        parse(tokens).0
    }

    #[test]
    fn lower_decl() {
        let program = lower_str("let mut abc = 12;");
        let [Stmt::Decl(decl)] = &program.stmts[..] else { panic!("expected one declaration") };

        assert_eq!(decl.mt, MutType::Mut);
        assert_eq!(decl.ident.name, "abc");
        assert_eq!(decl.ident.span.range(), 8..11);
        assert_eq!(decl.span.range(), 0..16);
        assert!(matches!(decl.value, Expr::IntLiteral(IntLiteral { value: 12, .. })));
    }

    #[test]
    fn lower_spans() -> TestResult<()> {
        let program = lower_str("f(a, 1)  ;\na::b; x.y |> g;");
        assert_eq!(program.span.range(), 0..26);

        let spans: Vec<_> = program.stmts.iter().map(|st| st.span().range()).collect();
        assert_eq!(spans, [0..7, 11..15, 17..25]);

        for test in tests().all() {
            assert_spans_contained(&test.lower()?);
        }
        Ok(())
    }

    #[test]
    fn lower_precedence() -> TestResult<()> {
        let program = tests().get("precedence")?.lower()?;
        assert_eq!(program.to_string(), [
            "let a = (1 + (2 * 3));",
            "let b = ((1 - 2) - 3);",
            "let c = ((x < y) && ((z ^ 2) == w));",
        ].map(|s| format!("{s}\n")).concat());

        let program = tests().get("pipes")?.lower()?;
        assert_eq!(program.to_string(), [
            "f(a);",
            "await f(a);",
            "let r = await res.json(fetch(url));",
            "let s = print((0 + log::level));",
        ].map(|s| format!("{s}\n")).concat());
        Ok(())
    }

    #[test]
    fn lower_int() {
        let program = lower_str("18446744073709551615; 007;");
        let values: Vec<_> = program.stmts.iter()
            .map(|st| match st {
                Stmt::Expr(ExprStmt { expr: Expr::IntLiteral(lit) }) => (lit.value, lit.raw.as_str()),
                st => panic!("expected integer statement, got {st:?}"),
            })
            .collect();
        assert_eq!(values, [(u64::MAX, "18446744073709551615"), (7, "007")]);

        let cst = parse_str("let x = 18446744073709551616;", "big.dw");
        let err = cst.lower(&LowerCtx::new("big.dw")).unwrap_err();
        assert_eq!(err, LowerErr::IntOutOfRange(String::from("18446744073709551616")));
        assert_eq!(err.span().range(), 8..28);
    }

    #[test]
    fn lower_empty() {
        let cst = parse_str("", "empty.dw");
        let err = cst.lower(&LowerCtx::new("empty.dw")).unwrap_err();
        assert_eq!(err, LowerErr::EmptyProgram);
    }

    #[test]
    fn lower_source_mismatch() {
        let cst = parse_str("let x = 1;", "a.dw");
        let err = cst.lower(&LowerCtx::new("b.dw")).unwrap_err();

        assert!(matches!(err.err(), LowerErr::SpanConflict(_)));
    }
}
