//! Renders the AST back into Dw source.
//!
//! Every binary operation is wrapped in parentheses,
//! so the rendered string shows exactly how the operators were resolved.

use std::fmt::{Display, Formatter};

use super::*;

fn fmt_list<D: Display>(f: &mut Formatter<'_>, elems: &[D]) -> std::fmt::Result {
    if let Some((tail, head)) = elems.split_last() {
        for el in head {
            write!(f, "{el}, ")?;
        }

        write!(f, "{tail}")
    } else {
        Ok(())
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for stmt in &self.stmts {
            writeln!(f, "{stmt}")?;
        }

        Ok(())
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Decl(d) => write!(f, "{d};"),
            Stmt::Expr(e) => write!(f, "{};", e.expr),
        }
    }
}

impl Display for Decl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Decl { mt, ident, value, span: _ } = self;

        match mt {
            MutType::Mut   => write!(f, "let mut {ident} = {value}"),
            MutType::Immut => write!(f, "let {ident} = {value}"),
        }
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Ident(ident) => write!(f, "{ident}"),
            Expr::IntLiteral(lit) => f.write_str(&lit.raw),
            Expr::Call(Call { callee, args, span: _ }) => {
                write!(f, "{callee}(")?;
                fmt_list(f, args)?;
                write!(f, ")")
            },
            Expr::Member(Member { object, property, span: _ }) => write!(f, "{object}.{property}"),
            Expr::NamespaceMember(Member { object, property, span: _ }) => write!(f, "{object}::{property}"),
            Expr::Binary(Binary { op, lhs, rhs, span: _ }) => write!(f, "({lhs} {op} {rhs})"),
            Expr::Await(Await { expr, span: _ }) => write!(f, "await {expr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::lower_str;

    fn assert_display(input: &str, expected: &str) {
        assert_eq!(lower_str(input).to_string(), expected);
    }

    #[test]
    fn display_stmts() {
        assert_display("let x = 1;", "let x = 1;\n");
        assert_display("let mut y = 007;", "let mut y = 007;\n");
        assert_display("f(a, b::c, d.e); g();", "f(a, b::c, d.e);\ng();\n");
    }

    #[test]
    fn display_operators() {
        assert_display("a+b*c;", "(a + (b * c));\n");
        assert_display("let z = a is b && c(1) != 2;", "let z = ((a is b) && (c(1) != 2));\n");
        assert_display("x |> f ||> g;", "await g(f(x));\n");
    }
}
