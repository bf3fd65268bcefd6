//! The operator AST nodes.
//!
//! This differs from [operator tokens][crate::lexer::token]
//! because these nodes have an established binding strength within the Dw language
//! (see [`BinOp::precedence`]).

use std::fmt::Display;

use crate::lexer::token::{Operator, TokenKind};

/// A binary operator AST node.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BinOp {
    /// Pipe (`x |> f`)
    Pipe,

    /// Await pipe (`x ||> f`)
    AwaitPipe,

    /// Logical and (`x && y`)
    LogAnd,

    /// Logical or (`x || y`)
    LogOr,

    /// Equal (`x == y`)
    Eq,

    /// Not equal (`x != y`)
    Ne,

    /// Type/structure test (`x is y`)
    Is,

    /// Less than or equal (`x <= y`)
    Le,

    /// Greater than or equal (`x >= y`)
    Ge,

    /// Less than (`x < y`)
    Lt,

    /// Greater than (`x > y`)
    Gt,

    /// Binary plus (`x + y`)
    Add,

    /// Binary subtract (`x - y`)
    Sub,

    /// Multiplication (`x * y`)
    Mul,

    /// Division (`x / y`)
    Div,

    /// Modulo (`x % y`)
    Mod,

    /// Exponentiation (`x ^ y`)
    Pow,

    /// Bitwise and (`x & y`)
    BitAnd,

    /// Bitwise or (`x | y`)
    BitOr
}

impl BinOp {
    /// The binding strength of this operator.
    ///
    /// A higher precedence binds its operands more tightly.
    /// Operators of equal precedence associate to the left.
    ///
    /// | precedence | operators |
    /// |---|---|
    /// | 0 | `\|>`, `\|\|>` |
    /// | 1 | `&&`, `\|\|` |
    /// | 2 | `==`, `!=`, `is` |
    /// | 3 | `<=`, `>=`, `<`, `>` |
    /// | 4 | `+`, `-` |
    /// | 5 | `*`, `/`, `%` |
    /// | 6 | `^` |
    /// | 7 | `&`, `\|` |
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::Pipe | BinOp::AwaitPipe => 0,
            BinOp::LogAnd | BinOp::LogOr => 1,
            BinOp::Eq | BinOp::Ne | BinOp::Is => 2,
            BinOp::Le | BinOp::Ge | BinOp::Lt | BinOp::Gt => 3,
            BinOp::Add | BinOp::Sub => 4,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 5,
            BinOp::Pow => 6,
            BinOp::BitAnd | BinOp::BitOr => 7,
        }
    }

    /// The source spelling of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Pipe      => "|>",
            BinOp::AwaitPipe => "||>",
            BinOp::LogAnd    => "&&",
            BinOp::LogOr     => "||",
            BinOp::Eq        => "==",
            BinOp::Ne        => "!=",
            BinOp::Is        => "is",
            BinOp::Le        => "<=",
            BinOp::Ge        => ">=",
            BinOp::Lt        => "<",
            BinOp::Gt        => ">",
            BinOp::Add       => "+",
            BinOp::Sub       => "-",
            BinOp::Mul       => "*",
            BinOp::Div       => "/",
            BinOp::Mod       => "%",
            BinOp::Pow       => "^",
            BinOp::BitAnd    => "&",
            BinOp::BitOr     => "|",
        }
    }
}

/// Casting a token to an operator node failed.
#[derive(Debug, PartialEq, Eq)]
pub struct TokenOpCastErr(pub TokenKind);

impl Display for TokenOpCastErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} cannot be converted into a binary operator", self.0)
    }
}
impl std::error::Error for TokenOpCastErr {}

impl From<Operator> for BinOp {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Pipe      => BinOp::Pipe,
            Operator::AwaitPipe => BinOp::AwaitPipe,
            Operator::DAnd      => BinOp::LogAnd,
            Operator::DOr       => BinOp::LogOr,
            Operator::DEqual    => BinOp::Eq,
            Operator::Ne        => BinOp::Ne,
            Operator::Is        => BinOp::Is,
            Operator::Le        => BinOp::Le,
            Operator::Ge        => BinOp::Ge,
            Operator::Lt        => BinOp::Lt,
            Operator::Gt        => BinOp::Gt,
            Operator::Plus      => BinOp::Add,
            Operator::Minus     => BinOp::Sub,
            Operator::Star      => BinOp::Mul,
            Operator::Slash     => BinOp::Div,
            Operator::Percent   => BinOp::Mod,
            Operator::Caret     => BinOp::Pow,
            Operator::And       => BinOp::BitAnd,
            Operator::Or        => BinOp::BitOr,
        }
    }
}
impl TryFrom<TokenKind> for BinOp {
    type Error = TokenOpCastErr;

    fn try_from(value: TokenKind) -> Result<Self, Self::Error> {
        match value {
            TokenKind::Operator(op) => Ok(BinOp::from(op)),
            t => Err(TokenOpCastErr(t))
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::token::token;

    #[test]
    fn token_cast() {
        assert_eq!(BinOp::try_from(token![+]), Ok(BinOp::Add));
        assert_eq!(BinOp::try_from(token![^]), Ok(BinOp::Pow));
        assert_eq!(BinOp::try_from(token![is]), Ok(BinOp::Is));
        assert_eq!(BinOp::try_from(token![||>]), Ok(BinOp::AwaitPipe));
        assert_eq!(BinOp::try_from(token![;]), Err(TokenOpCastErr(token![;])));
        assert_eq!(BinOp::try_from(TokenKind::Ident), Err(TokenOpCastErr(TokenKind::Ident)));
    }

    #[test]
    fn spelling_matches_token() {
        let ops = [
            token![|>], token![||>], token![&&], token![||], token![==], token![!=], token![is],
            token![<=], token![>=], token![<], token![>], token![+], token![-], token![*],
            token![/], token![%], token![^], token![&], token![|],
        ];

        for t in ops {
            let TokenKind::Operator(o) = t else { unreachable!() };
            assert_eq!(BinOp::from(o).as_str(), o.as_str());
        }
    }

    #[test]
    fn precedence_order() {
        assert!(BinOp::Pipe.precedence() < BinOp::LogOr.precedence());
        assert!(BinOp::LogAnd.precedence() < BinOp::Is.precedence());
        assert!(BinOp::Eq.precedence() < BinOp::Lt.precedence());
        assert!(BinOp::Ge.precedence() < BinOp::Add.precedence());
        assert!(BinOp::Sub.precedence() < BinOp::Mod.precedence());
        assert!(BinOp::Div.precedence() < BinOp::Pow.precedence());
        assert!(BinOp::Pow.precedence() < BinOp::BitOr.precedence());

        assert_eq!(BinOp::Add.precedence(), BinOp::Sub.precedence());
        assert_eq!(BinOp::BitAnd.precedence(), BinOp::BitOr.precedence());
        assert_eq!(BinOp::AwaitPipe.precedence(), BinOp::Pipe.precedence());
    }
}
