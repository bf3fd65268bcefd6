//! Resolves a flat chain of binary operations into a tree by operator precedence.
//!
//! The parser reads `a + b * c |> f` as a head expression
//! followed by a list of `(operator, operand)` pairs.
//! [`resolve`] arranges these pairs into a tree based on each operator's
//! [precedence][`BinOp::precedence`], then converts the tree into AST nodes.
//!
//! Pipes are rewritten into calls during conversion:
//! - `a |> f` becomes `f(a)`
//! - `a ||> f` becomes `await f(a)`

use crate::span::{Span, SpanConflict, Spanned};

use super::{Await, BinOp, Binary, Call, Expr};

/// Intermediate tree built while inserting operators.
#[derive(Debug)]
enum OpTree {
    Leaf(Expr),
    Node {
        lhs: Box<OpTree>,
        op: BinOp,
        rhs: Box<OpTree>
    }
}

impl OpTree {
    /// Insert an operator and its right operand into the tree.
    ///
    /// If the operator binds more tightly than the root's operator,
    /// it is inserted into the root's right side.
    /// Otherwise, the operator becomes the new root, with the current tree as its left side.
    fn insert(self, op: BinOp, operand: Expr) -> OpTree {
        match self {
            OpTree::Node { lhs, op: root_op, rhs } if op.precedence() > root_op.precedence() => {
                OpTree::Node { lhs, op: root_op, rhs: Box::new(rhs.insert(op, operand)) }
            },
            root => OpTree::Node {
                lhs: Box::new(root),
                op,
                rhs: Box::new(OpTree::Leaf(operand))
            }
        }
    }

    /// Convert the tree into an expression, bottom-up.
    ///
    /// The left spine grows with the length of the chain, so it is walked iteratively.
    /// Only right sides recurse, and each right side holds strictly tighter operators
    /// than its parent, so that depth is bounded by the number of precedence levels.
    fn into_expr(self) -> Result<Expr, SpanConflict> {
        let mut frames = vec![];
        let mut tree = self;
        let mut expr = loop {
            match tree {
                OpTree::Leaf(e) => break e,
                OpTree::Node { lhs, op, rhs } => {
                    frames.push((op, rhs));
                    tree = *lhs;
                }
            }
        };

        while let Some((op, rhs)) = frames.pop() {
            expr = combine(expr, op, rhs.into_expr()?)?;
        }
        Ok(expr)
    }
}

/// Join two operands with an operator, rewriting pipes into calls.
fn combine(lhs: Expr, op: BinOp, rhs: Expr) -> Result<Expr, SpanConflict> {
    let span = lhs.span().merge(rhs.span())?;

    let expr = match op {
        BinOp::Pipe => pipe_call(lhs, rhs, span),
        BinOp::AwaitPipe => Expr::Await(Await {
            expr: Box::new(pipe_call(lhs, rhs, span.clone())),
            span
        }),
        op => Expr::Binary(Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span })
    };

    Ok(expr)
}

/// `arg |> callee` is `callee(arg)`.
fn pipe_call(arg: Expr, callee: Expr, span: Span) -> Expr {
    Expr::Call(Call { callee: Box::new(callee), args: vec![arg], span })
}

/// Arrange a chain of binary operations into an expression tree.
///
/// The chain `head op1 e1 op2 e2 ...` is given as `head` and the pairs `[(op1, e1), (op2, e2), ...]`.
/// If there are no pairs, `head` is returned unchanged.
///
/// This errors if two operands come from different sources.
pub fn resolve(head: Expr, pairs: impl IntoIterator<Item=(BinOp, Expr)>) -> Result<Expr, SpanConflict> {
    pairs.into_iter()
        .fold(OpTree::Leaf(head), |tree, (op, operand)| tree.insert(op, operand))
        .into_expr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ident, IntLiteral, Stmt};
    use crate::span::SourceId;

    /// Create a chain from a whitespace-separated string
    /// where every operand is a single character.
    fn chain(s: &str) -> (Expr, Vec<(BinOp, Expr)>) {
        let source = SourceId::new("test.dw");
        let mut offset = 0;
        let mut parts = vec![];
        for part in s.split(' ') {
            parts.push((part, Span::new(source.clone(), offset..offset + part.len())));
            offset += part.len() + 1;
        }

        let operand = |text: &str, span: Span| match text.parse() {
            Ok(value) => Expr::IntLiteral(IntLiteral { value, raw: text.to_string(), span }),
            Err(_) => Expr::Ident(Ident { name: text.to_string(), span }),
        };
        let operator = |text: &str| {
            let kind = crate::lexer::tokenize(text, "op.dw").0[0].kind;
            BinOp::try_from(kind).unwrap_or_else(|e| panic!("{e}"))
        };

        let mut parts = parts.into_iter();
        let (head_text, head_span) = parts.next().expect("chain should not be empty");
        let head = operand(head_text, head_span);

        let mut pairs = vec![];
        while let (Some((op, _)), Some((e, span))) = (parts.next(), parts.next()) {
            pairs.push((operator(op), operand(e, span)));
        }

        (head, pairs)
    }

    fn assert_resolve(input: &str, expected: &str) {
        let (head, pairs) = chain(input);
        let expr = resolve(head, pairs).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(expr.to_string(), expected, "resolving {input:?}");
    }

    #[test]
    fn no_operators() {
        let (head, pairs) = chain("a");
        assert_eq!(resolve(head.clone(), pairs), Ok(head));
    }

    #[test]
    fn arithmetic() {
        assert_resolve("1 + 2 * 3", "(1 + (2 * 3))");
        assert_resolve("1 * 2 + 3", "((1 * 2) + 3)");
        assert_resolve("1 - 2 - 3", "((1 - 2) - 3)");
        assert_resolve("1 / 2 % 3 ^ 4", "((1 / 2) % (3 ^ 4))");
        assert_resolve("1 + 2 & 3 * 4", "(1 + ((2 & 3) * 4))");
    }

    #[test]
    fn mixed_tiers() {
        assert_resolve("a < b && c == d", "((a < b) && (c == d))");
        assert_resolve("a is b || c", "((a is b) || c)");
        assert_resolve("a == b != c", "((a == b) != c)");
        assert_resolve("a || b && c", "((a || b) && c)");
        assert_resolve("a + 1 <= b | c", "((a + 1) <= (b | c))");
    }

    #[test]
    fn pipes() {
        assert_resolve("a |> f", "f(a)");
        assert_resolve("a ||> f", "await f(a)");
        assert_resolve("a |> f |> g", "g(f(a))");
        assert_resolve("a + 1 |> f ||> g", "await g(f((a + 1)))");
        assert_resolve("a |> f + 1", "(f + 1)(a)");
    }

    #[test]
    fn pipe_shape() {
        let (head, pairs) = chain("a ||> f");
        let Ok(Expr::Await(Await { expr, span })) = resolve(head, pairs) else {
            panic!("expected await");
        };
        assert_eq!(span.range(), 0..7);

        let Expr::Call(Call { callee, args, span }) = *expr else { panic!("expected call") };
        assert!(matches!(&*callee, Expr::Ident(Ident { name, .. }) if name == "f"));
        assert!(matches!(&args[..], [Expr::Ident(Ident { name, .. })] if name == "a"));
        assert_eq!(span.range(), 0..7);
    }

    #[test]
    fn spans_merge() {
        let (head, pairs) = chain("1 + 2 * 3");
        let Ok(Expr::Binary(Binary { rhs, span, .. })) = resolve(head, pairs) else {
            panic!("expected binary");
        };
        assert_eq!(span.range(), 0..9);
        assert_eq!(rhs.span().range(), 4..9);
    }

    #[test]
    fn span_conflict() {
        let (head, _) = chain("a");
        let other = Expr::Ident(Ident {
            name: String::from("b"),
            span: Span::new(SourceId::new("other.dw"), 4..5)
        });

        assert!(resolve(head, [(BinOp::Add, other)]).is_err());
    }

    #[test]
    fn long_chain() {
        const N: usize = 10_000;
        let code = format!("let x = {};", vec!["1"; N].join(" + "));

        let comp = crate::compile(&code, "chain.dw");
        assert!(!comp.has_errors());
        let mut program = comp.lower().unwrap_or_else(|e| panic!("{e}"));

        let Some(Stmt::Decl(decl)) = program.stmts.pop() else { panic!("expected declaration") };
        assert_eq!(decl.value.span().range(), 8..code.len() - 1);

        // taken apart one level at a time, so dropping the tree does not recurse
        let mut expr = decl.value;
        let mut depth = 0;
        let leaf = loop {
            match expr {
                Expr::Binary(b) => {
                    assert_eq!(b.op, BinOp::Add);
                    assert!(matches!(*b.rhs, Expr::IntLiteral(IntLiteral { value: 1, .. })));
                    expr = *b.lhs;
                    depth += 1;
                },
                e => break e,
            }
        };

        assert_eq!(depth, N - 1);
        assert_eq!(leaf.span().range(), 8..9);
    }
}
