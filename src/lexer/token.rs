//! The tokens that the string can be lexed into.
//!
//! See [`Token`] and [`TokenKind`] for more information.

use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

use once_cell::sync::Lazy;

use crate::span::{Span, Spanned};

/// The classification of a [`Token`].
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum TokenKind {
    /// An identifier, such as function names or variable names. (e.g. `abcd`, `a_b`, `a1`)
    Ident,

    /// An integer literal (e.g. `0`, `123`, `007`)
    Integer,

    /// Keywords (e.g. `let`, `mut`).
    ///
    /// These cannot be identifiers in any circumstance.
    Keyword(Keyword),

    /// Binary operators (e.g. `+`, `|>`, `is`)
    Operator(Operator),

    /// Punctuation and delimiters (e.g. `.`, `::`, `(`, `;`)
    Punct(Punct),

    /// The end of the input. This is always the last token of a stream.
    Eof,

    /// A character which does not start any token.
    Error
}

/// A unit of source text, holding its classification, its text, and its position.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The exact source text of the token
    pub text: String,
    /// Where the token is in the source
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self { kind, text: text.into(), span }
    }
}

impl std::ops::Deref for Token {
    type Target = TokenKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl PartialEq<TokenKind> for Token {
    fn eq(&self, other: &TokenKind) -> bool {
        &self.kind == other
    }
}
impl PartialEq<Token> for TokenKind {
    fn eq(&self, other: &Token) -> bool {
        self == &other.kind
    }
}
impl Spanned for Token {
    fn span(&self) -> &Span {
        &self.span
    }
}

macro_rules! define_keywords {
    ($($id:ident: $ex:literal),*) => {
        /// Enum that provides all the reserved Dw keywords.
        #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
        pub enum Keyword {
            $(
                #[allow(missing_docs)] $id
            ),*
        }

        impl Keyword {
            /// The spelling of this keyword.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$id => $ex),*
                }
            }
        }

        static KW_MAP: Lazy<BTreeMap<&'static str, TokenKind>> = Lazy::new(|| {
            let mut m = BTreeMap::new();

            $(m.insert($ex, TokenKind::Keyword(Keyword::$id));)*

            m
        });
    };
}

macro_rules! define_operators {
    ($($id:ident: $ex:literal),*) => {
        /// The Dw binary operator tokens.
        #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
        pub enum Operator {
            $(
                #[allow(missing_docs)] $id
            ),*
        }

        impl Operator {
            /// The spelling of this operator.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$id => $ex),*
                }
            }
        }

        static OP_MAP: Lazy<BTreeMap<&'static str, TokenKind>> = Lazy::new(|| {
            let mut m = BTreeMap::new();

            $(m.insert($ex, TokenKind::Operator(Operator::$id));)*

            m
        });
    };
}

macro_rules! define_puncts {
    ($($id:ident: $ex:literal),*) => {
        /// The Dw punctuation tokens (including delimiters).
        #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
        pub enum Punct {
            $(
                #[allow(missing_docs)] $id
            ),*
        }

        impl Punct {
            /// The spelling of this punctuation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$id => $ex),*
                }
            }
        }

        static PUNCT_MAP: Lazy<BTreeMap<&'static str, TokenKind>> = Lazy::new(|| {
            let mut m = BTreeMap::new();

            $(m.insert($ex, TokenKind::Punct(Punct::$id));)*

            m
        });
    };
}

define_keywords! {
    Let:  "let",  // variable declarations
    Mut:  "mut",  // reassignable variables
    Lazy: "lazy"  // reserved
}

define_operators! {
    Pipe:      "|>",
    AwaitPipe: "||>",

    DAnd: "&&",
    DOr:  "||",

    DEqual: "==",
    Ne:     "!=",
    Is:     "is",

    Le: "<=",
    Ge: ">=",
    Lt: "<",
    Gt: ">",

    Plus:    "+",
    Minus:   "-",
    Star:    "*",
    Slash:   "/",
    Percent: "%",
    Caret:   "^",

    And: "&",
    Or:  "|"
}

define_puncts! {
    Dot:      ".",
    DColon:   "::",
    LParen:   "(",
    RParen:   ")",
    LSquare:  "[",
    RSquare:  "]",
    LCurly:   "{",
    RCurly:   "}",
    Colon:    ":",
    Semi:     ";",
    Comma:    ",",
    Equal:    "=",
    Excl:     "!",
    Tilde:    "~"
}

impl Keyword {
    /// If the string is a reserved word, return the token kind it represents
    /// or `None` if it is an ordinary identifier.
    ///
    /// Besides keywords, this also resolves word operators (`is`).
    pub fn get_kw(s: &str) -> Option<TokenKind> {
        KW_MAP.get(s)
            .or_else(|| OP_MAP.get(s).filter(|_| s.starts_with(|c: char| c.is_alphabetic())))
            .copied()
    }
}

/// Iterates over every symbolic token spelling (operators and punctuation)
/// alongside the token kind it lexes to.
///
/// Word operators such as `is` are excluded, as those are lexed as identifiers first.
pub(crate) fn symbols() -> impl Iterator<Item=(&'static str, TokenKind)> {
    OP_MAP.iter()
        .chain(PUNCT_MAP.iter())
        .filter(|(k, _)| k.starts_with(|c: char| c.is_ascii_punctuation()))
        .map(|(&k, &v)| (k, v))
}

/// Utility macro that can be used as a shorthand for keyword, operator, or punctuation token kinds.
#[macro_export]
macro_rules! token {
    (let)  => { $crate::lexer::token::TokenKind::Keyword($crate::lexer::token::Keyword::Let)  };
    (mut)  => { $crate::lexer::token::TokenKind::Keyword($crate::lexer::token::Keyword::Mut)  };
    (lazy) => { $crate::lexer::token::TokenKind::Keyword($crate::lexer::token::Keyword::Lazy) };

    (|>)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Pipe)      };
    (||>) => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::AwaitPipe) };
    (&&)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::DAnd)      };
    (||)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::DOr)       };
    (==)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::DEqual)    };
    (!=)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Ne)        };
    (is)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Is)        };
    (<=)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Le)        };
    (>=)  => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Ge)        };
    (<)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Lt)        };
    (>)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Gt)        };
    (+)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Plus)      };
    (-)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Minus)     };
    (*)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Star)      };
    (/)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Slash)     };
    (%)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Percent)   };
    (^)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Caret)     };
    (&)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::And)       };
    (|)   => { $crate::lexer::token::TokenKind::Operator($crate::lexer::token::Operator::Or)        };

    (.)   => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::Dot)     };
    (::)  => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::DColon)  };
    ("(") => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::LParen)  };
    (")") => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::RParen)  };
    ("[") => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::LSquare) };
    ("]") => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::RSquare) };
    ("{") => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::LCurly)  };
    ("}") => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::RCurly)  };
    (:)   => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::Colon)   };
    (;)   => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::Semi)    };
    (,)   => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::Comma)   };
    (=)   => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::Equal)   };
    (!)   => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::Excl)    };
    (~)   => { $crate::lexer::token::TokenKind::Punct($crate::lexer::token::Punct::Tilde)   };
}
#[doc(inline)]
pub use token;

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
impl Display for Punct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident       => f.write_str("identifier"),
            TokenKind::Integer     => f.write_str("integer"),
            TokenKind::Keyword(kw) => write!(f, "'{kw}'"),
            TokenKind::Operator(o) => write!(f, "'{o}'"),
            TokenKind::Punct(p)    => write!(f, "'{p}'"),
            TokenKind::Eof         => f.write_str("end of input"),
            TokenKind::Error       => f.write_str("invalid character"),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Ident | TokenKind::Integer | TokenKind::Error => {
                write!(f, "{} `{}`", self.kind, self.text)
            },
            kind => Display::fmt(&kind, f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_table() {
        let symbols: BTreeMap<_, _> = symbols().collect();

        assert_eq!(symbols.get("||>"), Some(&token![||>]));
        assert_eq!(symbols.get("::"), Some(&token![::]));
        assert_eq!(symbols.get("("), Some(&token!["("]));
        assert_eq!(symbols.get("is"), None);
        assert_eq!(symbols.len(), 18 + 14);
    }

    #[test]
    fn reserved_words() {
        assert_eq!(Keyword::get_kw("let"), Some(token![let]));
        assert_eq!(Keyword::get_kw("lazy"), Some(token![lazy]));
        assert_eq!(Keyword::get_kw("is"), Some(token![is]));
        assert_eq!(Keyword::get_kw("letx"), None);
        assert_eq!(Keyword::get_kw("+"), None);

        for kw in [Keyword::Let, Keyword::Mut, Keyword::Lazy] {
            assert_eq!(Keyword::get_kw(kw.as_str()), Some(TokenKind::Keyword(kw)));
        }
    }

    #[test]
    fn token_display() {
        assert_eq!(token![;].to_string(), "';'");
        assert_eq!(token![||>].to_string(), "'||>'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
