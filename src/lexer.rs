//! Converts strings to sequences of tokens.
//!
//! In a general sense, lexing is performed by reading the string,
//! and repeatedly matching specific token patterns until the entire string is consumed.
//!
//! Lexing never stops at a bad character. A character that cannot start a token
//! is emitted as an [error token][`TokenKind::Error`], reported as a [`LexErr`],
//! and lexing continues after it.
//!
//! This module provides:
//! - [`tokenize`]: A utility function that does the lexing from string to tokens.
//! - [`Lexer`]: The iterator which does the entire lexing process.

use std::collections::HashMap;
use std::sync::OnceLock;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::err::{DwErr, FullDwErr};
use crate::span::{Cursor, SourceId, Span};

use self::token::{Keyword, Token, TokenKind};
pub mod token;

/// Convert a string and lex it into a sequence of tokens.
///
/// The last token is always [`TokenKind::Eof`].
///
/// # Example
/// ```
/// # use dw_lang::lexer::tokenize;
/// use dw_lang::lexer::token::{TokenKind, token};
///
/// let (tokens, errors) = tokenize("a |> f", "main.dw");
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
///
/// assert!(errors.is_empty());
/// assert_eq!(kinds, [TokenKind::Ident, token![|>], TokenKind::Ident, TokenKind::Eof]);
/// ```
pub fn tokenize(input: &str, source: impl Into<SourceId>) -> (Vec<Token>, Vec<FullLexErr>) {
    let mut lx = Lexer::new(input, source);
    let tokens: Vec<_> = lx.by_ref().collect();
    let errors = lx.into_errors();

    log::debug!("lexed {} tokens with {} errors", tokens.len(), errors.len());
    (tokens, errors)
}

/// An error that occurs in the lexing process.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum LexErr {
    /// Lexer found character that doesn't start any token (e.g. `@`, emojis)
    UnknownChar(char),

    /// A block comment was not closed (e.g. `/* ... `)
    UnclosedComment,
}
/// A [`LexErr`] with its position.
pub type FullLexErr = FullDwErr<LexErr>;

impl DwErr for LexErr {
    fn err_name(&self) -> &'static str {
        "syntax error"
    }
}

impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErr::UnknownChar(c)  => write!(f, "invalid character {}", wrapq(*c)),
            LexErr::UnclosedComment => write!(f, "comment was never terminated"),
        }
    }
}
impl std::error::Error for LexErr {}

/// Enclose quotes around a character
///
/// For most characters, it will appear as: `'a', 'b', '"', '@'`, etc.
///
/// For ', it appears as `"'"`.
fn wrapq(c: char) -> String {
    if c == '\'' { format!("\"{}\"", c) } else { format!("'{}'", c) }
}

/// Character classes that are treated differently in the lexer
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum CharClass {
    /// An alphabetic character (`a-z`, `A-Z`)
    Alpha,

    /// A numeric character (`0-9`)
    Numeric,

    /// An underscore (`_`)
    Underscore,

    /// Any ASCII punctuation
    Punct,

    /// Whitespace
    Whitespace,
}

impl CharClass {
    fn of(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic()       { Some(Self::Alpha) }
        else if c.is_ascii_digit()       { Some(Self::Numeric) }
        else if c == '_'                 { Some(Self::Underscore) }
        else if c.is_ascii_punctuation() { Some(Self::Punct) }
        else if c.is_whitespace()        { Some(Self::Whitespace) }
        else { None }
    }
}

/// Byte trie over every symbolic token spelling, used for maximal munch.
struct Trie<V> {
    entry: Option<V>, // if no entry, this is a prefix only
    children: HashMap<u8, Trie<V>>
}
impl<V> Trie<V> {
    // Not checked, but iterator should only have unique keys
    fn new<'a>(it: impl IntoIterator<Item=(&'a str, V)>) -> Self {
        let mut trie = Trie {
            entry: None,
            children: HashMap::new()
        };

        for (k, v) in it {
            let leaf = k.bytes().fold(&mut trie, |trie, byte| {
                trie.children.entry(byte).or_insert_with(|| {
                    Trie { entry: None, children: HashMap::new() }
                })
            });

            leaf.entry = Some(v);
        }

        trie
    }

    fn get_child(&self, byte: u8) -> Option<&Trie<V>> {
        self.children.get(&byte)
    }
}

/// The struct that performs the full lexing process.
///
/// The lexer is an iterator of tokens, ending with a [`TokenKind::Eof`] token.
/// Errors found along the way are kept and can be retrieved with [`Lexer::into_errors`].
///
/// # Example
/// ```
/// # use dw_lang::lexer::Lexer;
/// use dw_lang::lexer::token::{TokenKind, token};
///
/// let mut lx = Lexer::new("let x = 1;", "main.dw");
/// assert_eq!(lx.next().map(|t| t.kind), Some(token![let]));
/// assert_eq!(lx.next().map(|t| t.text), Some(String::from("x")));
/// ```
pub struct Lexer<'s> {
    input: &'s str,
    source: SourceId,

    /// The byte offset of the next character to be read.
    cursor: Cursor,
    /// The start offset of the current token being evaluated.
    token_start: Cursor,

    errors: Vec<FullLexErr>,
    done: bool
}

impl<'s> Lexer<'s> {
    /// Create a new lexer over the given input.
    pub fn new(input: &'s str, source: impl Into<SourceId>) -> Self {
        Self {
            input,
            source: source.into(),

            cursor: 0,
            token_start: 0,

            errors: vec![],
            done: false
        }
    }

    /// Consume the lexer, returning the errors it found.
    pub fn into_errors(self) -> Vec<FullLexErr> {
        self.errors
    }

    /// Look at the next character in the input.
    ///
    /// If there are no more characters in the input, return None.
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// The input which has yet to be read.
    fn remaining(&self) -> &'s str {
        &self.input[self.cursor..]
    }

    /// Consume the next character in the input and return it.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// Consume characters while they match the given predicate.
    fn take_while(&mut self, mut f: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !f(c) { break; }
            self.cursor += c.len_utf8();
        }
    }

    /// Get the span from the given offset to the current position.
    fn span_from(&self, start: Cursor) -> Span {
        Span::new(self.source.clone(), start..self.cursor)
    }

    /// Create a token spanning from the start of the current token to the current position.
    fn token(&self, kind: TokenKind) -> Token {
        let text = &self.input[self.token_start..self.cursor];
        Token::new(kind, text, self.span_from(self.token_start))
    }

    /// Skip over whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.remaining();

            if rest.starts_with("//") {
                self.take_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                self.skip_block_comment();
            } else if matches!(self.peek().and_then(CharClass::of), Some(CharClass::Whitespace)) {
                self.take_while(|c| matches!(CharClass::of(c), Some(CharClass::Whitespace)));
            } else {
                break;
            }
        }
    }

    /// Skip a (possibly nested) block comment.
    ///
    /// This function assumes the input is at a `/*`.
    fn skip_block_comment(&mut self) {
        static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*|\*/").expect("comment pattern should compile"));

        let start = self.cursor;
        let mut depth = 0usize;

        // note that there are recursive comments:
        /* /* */ */
        for m in RE.find_iter(self.remaining()) {
            match m.as_str() {
                "/*" => depth += 1,
                _    => depth -= 1,
            }

            if depth == 0 {
                self.cursor = start + m.end();
                return;
            }
        }

        // if we got here, the entire string got consumed...
        // and the comment is still open.
        self.cursor = self.input.len();
        self.errors.push(LexErr::UnclosedComment.at(self.span_from(start)));
    }

    /// Analyzes the next characters in the input as an identifier (e.g. abc, aVariable, a123, a_).
    ///
    /// Reserved words are then reclassified as their keyword or operator.
    fn read_ident(&mut self) -> Token {
        self.take_while(|c| matches!(
            CharClass::of(c),
            Some(CharClass::Alpha | CharClass::Underscore | CharClass::Numeric)
        ));

        let text = &self.input[self.token_start..self.cursor];
        let kind = Keyword::get_kw(text).unwrap_or(TokenKind::Ident);
        self.token(kind)
    }

    /// Analyzes the next characters in the input as an integer (e.g. 0, 123, 007).
    fn read_integer(&mut self) -> Token {
        self.take_while(|c| c.is_ascii_digit());
        self.token(TokenKind::Integer)
    }

    /// Analyzes the next characters in the input as an operator or punctuation.
    ///
    /// The longest spelling that matches is always taken (so `||>` is never `||` and `>`).
    fn read_punct(&mut self) -> Token {
        static TRIE: OnceLock<Trie<TokenKind>> = OnceLock::new();
        let mut trie = TRIE.get_or_init(|| Trie::new(token::symbols()));

        let mut longest = None;
        for (i, byte) in self.remaining().bytes().enumerate() {
            match trie.get_child(byte) {
                Some(child) => {
                    trie = child;
                    if let Some(kind) = trie.entry {
                        longest = Some((i + 1, kind));
                    }
                },
                None => break,
            }
        }

        match longest {
            Some((len, kind)) => {
                self.cursor += len;
                self.token(kind)
            },
            None => self.read_unknown(),
        }
    }

    /// Consume one character that starts no token, and report it.
    fn read_unknown(&mut self) -> Token {
        if let Some(c) = self.next_char() {
            self.errors.push(LexErr::UnknownChar(c).at(self.span_from(self.token_start)));
        }

        self.token(TokenKind::Error)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done { return None; }

        self.skip_trivia();
        self.token_start = self.cursor;

        let token = match self.peek() {
            None => {
                self.done = true;
                self.token(TokenKind::Eof)
            },
            Some(chr) => match CharClass::of(chr) {
                Some(CharClass::Alpha | CharClass::Underscore) => self.read_ident(),
                Some(CharClass::Numeric) => self.read_integer(),
                Some(CharClass::Punct) => self.read_punct(),
                Some(CharClass::Whitespace) | None => self.read_unknown(),
            }
        };

        Some(token)
    }
}
