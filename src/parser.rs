//! Converts sequences of tokens to a concrete syntax tree.
//!
//! The parser is implemented as a recursive descent parser.
//! This parser has grammatical rules, which break down into smaller grammatical rules.
//! The string is assigned the top-most rule (`Program`) and the individual units of
//! this rule are computed by recursive statements. See [`cst`] for the grammar.
//!
//! Parsing does not stop at the first error. When a statement fails to parse,
//! the error is recorded and the parser skips ahead to the next `;`
//! before continuing with the next statement.
//!
//! This module provides:
//! - [`parse`]: A function to parse [a list of lexed tokens][`crate::lexer`] into a CST.
//! - [`Parser`]: The struct that does all the parsing.

use std::collections::VecDeque;
use std::fmt::Display;

use crate::err::{DwErr, FullDwErr};
use crate::lexer::token::{token, Token, TokenKind};
use crate::span::{SourceId, Span, Spanned};

pub mod cst;

/// Parses a sequence of tokens into a CST,
/// returning the errors that occurred alongside it.
///
/// The CST holds every statement that parsed successfully.
///
/// # Example
/// ```
/// # use dw_lang::lexer::tokenize;
/// # use dw_lang::parser::parse;
/// let (tokens, _) = tokenize("let x = ; let y = 1;", "main.dw");
/// let (program, errors) = parse(tokens);
///
/// assert_eq!(errors.len(), 1);
/// assert_eq!(program.statements.len(), 1);
/// ```
pub fn parse(tokens: impl IntoIterator<Item=Token>) -> (cst::Program, Vec<FullParseErr>) {
    Parser::new(tokens).parse()
}

/// A struct that does the conversion of tokens to a CST.
pub struct Parser {
    tokens: VecDeque<Token>,
    eof: Token,
    errors: Vec<FullParseErr>
}

/// What the parser was looking for when it failed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expected {
    /// One of the given tokens.
    Tokens(Vec<TokenKind>),

    /// An identifier.
    Ident,

    /// An expression.
    Expr,

    /// A statement.
    Stmt
}

/// An error that occurs in the parsing process.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParseErr {
    /// What the parser expected.
    pub expected: Expected,

    /// The token that was found instead.
    pub found: Token
}
impl DwErr for ParseErr {
    fn err_name(&self) -> &'static str {
        "syntax error"
    }
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Tokens(tokens) => match tokens.as_slice() {
                [t] => write!(f, "{t}"),
                tokens => {
                    let tstr = tokens.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "one of {tstr}")
                }
            },
            Expected::Ident => f.write_str("identifier"),
            Expected::Expr  => f.write_str("expression"),
            Expected::Stmt  => f.write_str("statement"),
        }
    }
}
impl Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}
impl std::error::Error for ParseErr {}

/// A [`ParseErr`] with its position.
pub type FullParseErr = FullDwErr<ParseErr>;
/// A [`Result`] type for operations in the parsing process.
pub type ParseResult<T> = Result<T, FullParseErr>;

/// Create the span starting at the first span and ending at the last span.
///
/// Both spans should come from the same token stream.
fn span_between(first: &Span, last: &Span) -> Span {
    Span::new(first.source().clone(), first.start()..last.end().max(first.end()))
}

impl Parser {
    /// Create a new Parser to read a given set of tokens.
    ///
    /// Error tokens are dropped, as the lexer has already reported them.
    /// If the tokens do not end in an EOF token, one is added after the last token.
    pub fn new(tokens: impl IntoIterator<Item=Token>) -> Self {
        let mut tokens: VecDeque<_> = tokens.into_iter()
            .filter(|t| t.kind != TokenKind::Error)
            .collect();

        let eof = match tokens.pop_back() {
            Some(t) if t.kind == TokenKind::Eof => t,
            Some(t) => {
                let eof = Token::new(TokenKind::Eof, "", Span::empty(t.span.source().clone(), t.span.end()));
                tokens.push_back(t);
                eof
            },
            None => Token::new(TokenKind::Eof, "", Span::empty(SourceId::new(""), 0)),
        };

        Self { tokens, eof, errors: vec![] }
    }

    /// Consumes the parser and converts the tokens into a CST.
    pub fn parse(mut self) -> (cst::Program, Vec<FullParseErr>) {
        let mut statements = vec![];

        while self.peek_token().kind != TokenKind::Eof {
            match self.expect_stmt() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        if statements.is_empty() && self.errors.is_empty() {
            // a program needs at least one statement
            let err = self.error_at_peek(Expected::Stmt);
            self.errors.push(err);
        }

        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => span_between(first.span(), last.span()),
            _ => self.eof.span.clone(),
        };

        log::debug!("parsed {} statements with {} errors", statements.len(), self.errors.len());
        (cst::Program { statements, span }, self.errors)
    }

    /// Skip tokens up to and including the next `;` (or up to EOF).
    fn synchronize(&mut self) {
        log::trace!("skipping to next statement from {}", self.peek_token().span);

        loop {
            match self.peek_token().kind {
                TokenKind::Eof => break,
                token![;] => {
                    self.next_token();
                    break;
                },
                _ => { self.next_token(); }
            }
        }
    }

    // General terminology:
    // "expect X": The next set of tokens must represent X, otherwise error.
    // "match X": If the next set of tokens represent X, consume those tokens.
    //     Otherwise, do & return nothing.

    /// Look at the next token in the input.
    fn peek_token(&self) -> &Token {
        self.tokens.front().unwrap_or(&self.eof)
    }

    /// Consume the next token in the input and return it.
    ///
    /// At the end of the input, this keeps returning the EOF token.
    fn next_token(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(|| self.eof.clone())
    }

    /// Create an error designating that the next token was not what was expected.
    fn error_at_peek(&self, expected: Expected) -> FullParseErr {
        let found = self.peek_token().clone();
        let span = found.span.clone();

        ParseErr { expected, found }.at(span)
    }

    /// Expect that the next token is in the specified list of tokens.
    ///
    /// Return the next token if it is a token in the list,
    /// or error if the next token is not a token in the list.
    fn expect_n(&mut self, one_of: &[TokenKind]) -> ParseResult<Token> {
        self.match_n(one_of)
            .ok_or_else(|| self.error_at_peek(Expected::Tokens(one_of.to_vec())))
    }

    /// Expect that the next token is the specified token.
    fn expect1(&mut self, u: TokenKind) -> ParseResult<Token> {
        self.expect_n(&[u])
    }

    /// If the next token is in the specified list of tokens,
    /// consume the token from input and return it.
    ///
    /// Return None if it is not in the specified list of tokens.
    fn match_n(&mut self, one_of: &[TokenKind]) -> Option<Token> {
        if one_of.contains(&self.peek_token().kind) {
            Some(self.next_token())
        } else {
            None
        }
    }

    /// If the next token is the specified token, consume it and return it.
    fn match1(&mut self, u: TokenKind) -> Option<Token> {
        self.match_n(&[u])
    }

    /// Expect that the next token is an identifier.
    fn expect_ident(&mut self) -> ParseResult<Token> {
        self.match1(TokenKind::Ident)
            .ok_or_else(|| self.error_at_peek(Expected::Ident))
    }

    /// Test whether the next token can begin an expression.
    fn at_expr_start(&self) -> bool {
        matches!(self.peek_token().kind, TokenKind::Ident | TokenKind::Integer)
    }

    /// `Statement := (LetDecl | ExprStmt) ';'`
    fn expect_stmt(&mut self) -> ParseResult<cst::Statement> {
        let kind = match self.peek_token().kind {
            token![let] => cst::StatementKind::LetDecl(self.expect_let_decl()?),
            _ if self.at_expr_start() => cst::StatementKind::ExprStmt(self.expect_expr_stmt()?),
            _ => return Err(self.error_at_peek(Expected::Stmt)),
        };
        let semi = self.expect1(token![;])?;
        let span = span_between(kind.span(), &semi.span);

        Ok(cst::Statement { kind, semi, span })
    }

    /// `LetDecl := 'let' 'mut'? Identifier '=' Expression`
    fn expect_let_decl(&mut self) -> ParseResult<cst::LetDecl> {
        let let_kw = self.expect1(token![let])?;
        let mut_kw = self.match1(token![mut]);
        let ident = self.expect_ident()?;
        let equal = self.expect1(token![=])?;
        let expr = self.expect_expr()?;
        let span = span_between(&let_kw.span, expr.span());

        Ok(cst::LetDecl { let_kw, mut_kw, ident, equal, expr, span })
    }

    /// `ExprStmt := Expression`
    fn expect_expr_stmt(&mut self) -> ParseResult<cst::ExprStmt> {
        let expr = self.expect_expr()?;
        let span = expr.span.clone();

        Ok(cst::ExprStmt { expr, span })
    }

    /// `Expression := BinaryExpr`
    fn expect_expr(&mut self) -> ParseResult<cst::Expression> {
        let binary = self.expect_binary()?;
        let span = binary.span.clone();

        Ok(cst::Expression { binary, span })
    }

    /// `BinaryExpr := CallExpr (BinOp CallExpr)*`
    fn expect_binary(&mut self) -> ParseResult<cst::BinaryExpr> {
        let head = self.expect_call()?;

        let mut tail = vec![];
        while matches!(self.peek_token().kind, TokenKind::Operator(_)) {
            let op = self.next_token();
            let rhs = self.expect_call()?;
            tail.push((op, rhs));
        }

        let span = match tail.last() {
            Some((_, last)) => span_between(head.span(), last.span()),
            None => head.span.clone(),
        };

        Ok(cst::BinaryExpr { head, tail, span })
    }

    /// `CallExpr := MemberExpr Arguments?`
    fn expect_call(&mut self) -> ParseResult<cst::CallExpr> {
        let member = self.expect_member()?;
        let args = match self.peek_token().kind {
            token!["("] => Some(self.expect_args()?),
            _ => None
        };

        let span = match &args {
            Some(args) => span_between(member.span(), args.span()),
            None => member.span.clone(),
        };

        Ok(cst::CallExpr { member, args, span })
    }

    /// `Arguments := '(' (Expression (',' Expression)*)? ')'`
    fn expect_args(&mut self) -> ParseResult<cst::Arguments> {
        let lparen = self.expect1(token!["("])?;

        let mut exprs = vec![];
        let mut commas = vec![];
        let rparen = match self.match1(token![")"]) {
            Some(rparen) => rparen,
            None => {
                exprs.push(self.expect_expr()?);
                while let Some(comma) = self.match1(token![,]) {
                    commas.push(comma);
                    exprs.push(self.expect_expr()?);
                }

                self.expect_n(&[token![,], token![")"]])?
            }
        };
        let span = span_between(&lparen.span, &rparen.span);

        Ok(cst::Arguments { lparen, exprs, commas, rparen, span })
    }

    /// `MemberExpr := PrimaryExpr (DotMember | DoubleColonMember)?`
    fn expect_member(&mut self) -> ParseResult<cst::MemberExpr> {
        let primary = self.expect_primary()?;

        let suffix = match self.peek_token().kind {
            token![.] => {
                let dot = self.next_token();
                let ident = cst::IdentExpr { ident: self.expect_ident()? };
                let span = span_between(&dot.span, ident.span());

                Some(cst::MemberSuffix::Dot(cst::DotMember { dot, ident, span }))
            },
            token![::] => {
                let dcolon = self.next_token();
                let ident = cst::IdentExpr { ident: self.expect_ident()? };
                let span = span_between(&dcolon.span, ident.span());

                Some(cst::MemberSuffix::DoubleColon(cst::DoubleColonMember { dcolon, ident, span }))
            },
            _ => None
        };

        let span = match &suffix {
            Some(suffix) => span_between(primary.span(), suffix.span()),
            None => primary.span().clone(),
        };

        Ok(cst::MemberExpr { primary, suffix, span })
    }

    /// `PrimaryExpr := IdentExpr | IntLiteralExpr`
    fn expect_primary(&mut self) -> ParseResult<cst::PrimaryExpr> {
        match self.peek_token().kind {
            TokenKind::Ident => {
                let ident = self.next_token();
                Ok(cst::PrimaryExpr::Ident(cst::IdentExpr { ident }))
            },
            TokenKind::Integer => {
                let int = self.next_token();
                Ok(cst::PrimaryExpr::IntLiteral(cst::IntLiteralExpr { int }))
            },
            _ => Err(self.error_at_peek(Expected::Expr))
        }
    }
}
