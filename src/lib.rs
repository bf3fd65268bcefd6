#![warn(missing_docs)]

//! Tools to compile code written in the Dw language into JavaScript syntax trees.
//!
//! # Parsing
//!
//! Parsing of a string to a concrete syntax tree (CST) is done
//! with the [`lexer`] and [`parser`] modules.
//!
//! These modules provide:
//! - [`Lexer`][`lexer::Lexer`]: A struct that processes strings into sequences of tokens.
//! - [`Parser`][`parser::Parser`]: A struct that processes sequences of lexer tokens into a CST.
//! - [`cst`][`parser::cst`]: The components of the CST.
//!
//! Neither stage stops at the first error.
//! Both report every error they find and continue with a best-effort result.
//!
//! # Lowering and transpiling
//!
//! The CST is lowered into an abstract syntax tree (AST), which is then
//! transpiled into an [ESTree][`estree`] syntax tree that JavaScript printers can consume.
//!
//! This is provided by:
//! - [`ast`]: The components of the AST.
//! - [`Lower`][`ast::lower::Lower`]: The trait that converts CST nodes into AST nodes.
//! - [`Transpile`][`ast::transpile::Transpile`]: The trait that converts AST nodes into ESTree nodes.
//!
//! The whole pipeline can be run with [`compile`].

use ast::lower::{Lower, LowerCtx, LowerResult};
use ast::transpile::Transpile;
use lexer::token::Token;
use lexer::FullLexErr;
use parser::FullParseErr;
use span::{SourceId, Spanned};

// public API
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod estree;

pub mod err;
pub mod span;

#[cfg(test)]
mod test_utils;

/// The result of lexing and parsing a source.
///
/// This holds the best-effort CST alongside every error found while creating it.
/// Whether to continue past errors is up to the caller.
#[derive(Debug, Clone)]
pub struct Compilation {
    source: SourceId,
    /// The tokens of the source, including the end-of-input token.
    pub tokens: Vec<Token>,
    /// The CST, which holds every statement that parsed successfully.
    pub cst: parser::cst::Program,
    /// Errors from lexing.
    pub lex_errors: Vec<FullLexErr>,
    /// Errors from parsing.
    pub parse_errors: Vec<FullParseErr>
}

/// Lex and parse a Dw source.
///
/// The source id is used to label spans and diagnostics (typically, this is the file name).
///
/// # Example
/// ```
/// let comp = dw_lang::compile("let x = 1;", "main.dw");
/// assert!(!comp.has_errors());
///
/// let program = comp.transpile().unwrap();
/// assert_eq!(program.body.len(), 1);
/// ```
pub fn compile(text: &str, source: impl Into<SourceId>) -> Compilation {
    let source = source.into();

    let (tokens, lex_errors) = lexer::tokenize(text, source.clone());
    let (cst, parse_errors) = parser::parse(tokens.clone());

    Compilation { source, tokens, cst, lex_errors, parse_errors }
}

impl Compilation {
    /// The source this compilation was created from.
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Test if any errors occurred while lexing or parsing.
    pub fn has_errors(&self) -> bool {
        !self.lex_errors.is_empty() || !self.parse_errors.is_empty()
    }

    /// Lower the CST into an AST.
    pub fn lower(&self) -> LowerResult<ast::Program> {
        self.cst.lower(&LowerCtx::new(self.source.clone()))
    }

    /// Lower the CST into an AST, then transpile it into an ESTree AST.
    pub fn transpile(&self) -> LowerResult<estree::Program> {
        self.lower().map(|p| p.transpile())
    }

    /// Render every error as a diagnostic, in source order.
    ///
    /// The text should be the text this compilation was created from.
    pub fn diagnostics(&self, text: &str) -> Vec<String> {
        let lex = self.lex_errors.iter()
            .map(|e| (e.span().start(), e.full_msg(text)));
        let parse = self.parse_errors.iter()
            .map(|e| (e.span().start(), e.full_msg(text)));

        let mut diagnostics: Vec<_> = lex.chain(parse).collect();
        diagnostics.sort_by_key(|&(start, _)| start);

        diagnostics.into_iter()
            .map(|(_, msg)| msg)
            .collect()
    }
}
