//! Converts the AST into the [ESTree target AST][`crate::estree`].
//!
//! Transpiling is a pure structural mapping:
//! each node transpiles its children and embeds them in its own target node.
//!
//! Most Dw operators have a matching JavaScript operator.
//! The exceptions are:
//! - `==` and `!=`, which use strict (in)equality,
//! - `^`, which is exponentiation (`**`) rather than bitwise xor,
//! - and `is`, which has no JavaScript operator and is called as `__dw.is(lhs, rhs)`.

use crate::estree::{self, BinaryOperator, LogicalOperator, SourceType, VariableKind, RUNTIME_HELPER};

use super::*;

/// Converts an AST node into its target AST node.
pub trait Transpile {
    /// The target node.
    type Target;

    /// Transpile this node (and its children).
    fn transpile(&self) -> Self::Target;
}

impl Transpile for Program {
    type Target = estree::Program;

    fn transpile(&self) -> Self::Target {
        estree::Program {
            body: self.stmts.iter().map(Transpile::transpile).collect(),
            source_type: SourceType::Module
        }
    }
}

impl Transpile for Stmt {
    type Target = estree::Statement;

    fn transpile(&self) -> Self::Target {
        match self {
            Stmt::Decl(Decl { mt, ident, value, span: _ }) => {
                let kind = match mt {
                    MutType::Mut   => VariableKind::Let,
                    MutType::Immut => VariableKind::Const,
                };

                estree::Statement::VariableDeclaration {
                    kind,
                    declarations: vec![estree::VariableDeclarator {
                        id: ident.transpile(),
                        init: value.transpile()
                    }]
                }
            },
            Stmt::Expr(ExprStmt { expr }) => estree::Statement::ExpressionStatement {
                expression: expr.transpile()
            },
        }
    }
}

impl Transpile for Ident {
    type Target = estree::Expression;

    fn transpile(&self) -> Self::Target {
        estree::Expression::ident(&self.name)
    }
}

/// How a Dw binary operator is written in the target.
enum TargetOp {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
    /// A method on the runtime helper object.
    Helper(&'static str),
    /// A call of the right operand on the left operand, optionally awaited.
    Pipe { awaited: bool }
}

impl BinOp {
    fn target_op(&self) -> TargetOp {
        match self {
            BinOp::LogAnd => TargetOp::Logical(LogicalOperator::And),
            BinOp::LogOr  => TargetOp::Logical(LogicalOperator::Or),
            BinOp::Eq     => TargetOp::Binary(BinaryOperator::StrictEq),
            BinOp::Ne     => TargetOp::Binary(BinaryOperator::StrictNe),
            BinOp::Is     => TargetOp::Helper("is"),
            BinOp::Le     => TargetOp::Binary(BinaryOperator::Le),
            BinOp::Ge     => TargetOp::Binary(BinaryOperator::Ge),
            BinOp::Lt     => TargetOp::Binary(BinaryOperator::Lt),
            BinOp::Gt     => TargetOp::Binary(BinaryOperator::Gt),
            BinOp::Add    => TargetOp::Binary(BinaryOperator::Plus),
            BinOp::Sub    => TargetOp::Binary(BinaryOperator::Minus),
            BinOp::Mul    => TargetOp::Binary(BinaryOperator::Times),
            BinOp::Div    => TargetOp::Binary(BinaryOperator::Div),
            BinOp::Mod    => TargetOp::Binary(BinaryOperator::Mod),
            BinOp::Pow    => TargetOp::Binary(BinaryOperator::Exp),
            BinOp::BitAnd => TargetOp::Binary(BinaryOperator::BitAnd),
            BinOp::BitOr  => TargetOp::Binary(BinaryOperator::BitOr),
            BinOp::Pipe      => TargetOp::Pipe { awaited: false },
            BinOp::AwaitPipe => TargetOp::Pipe { awaited: true },
        }
    }
}

impl Transpile for Expr {
    type Target = estree::Expression;

    fn transpile(&self) -> Self::Target {
        match self {
            Expr::Ident(ident) => ident.transpile(),
            Expr::IntLiteral(IntLiteral { value, raw, span: _ }) => estree::Expression::Literal {
                value: *value,
                raw: raw.clone()
            },
            Expr::Call(Call { callee, args, span: _ }) => estree::Expression::call(
                callee.transpile(),
                args.iter().map(Transpile::transpile).collect()
            ),
            Expr::Member(Member { object, property, span: _ })
            | Expr::NamespaceMember(Member { object, property, span: _ }) => {
                estree::Expression::member(object.transpile(), &property.name)
            },
            Expr::Binary(Binary { op, lhs, rhs, span: _ }) => {
                let left = Box::new(lhs.transpile());
                let right = Box::new(rhs.transpile());

                match op.target_op() {
                    TargetOp::Binary(operator)  => estree::Expression::BinaryExpression { operator, left, right },
                    TargetOp::Logical(operator) => estree::Expression::LogicalExpression { operator, left, right },
                    TargetOp::Helper(method) => estree::Expression::call(
                        estree::Expression::member(estree::Expression::ident(RUNTIME_HELPER), method),
                        vec![*left, *right]
                    ),
                    TargetOp::Pipe { awaited } => {
                        let call = estree::Expression::call(*right, vec![*left]);
                        match awaited {
                            false => call,
                            true  => estree::Expression::AwaitExpression { argument: Box::new(call) },
                        }
                    },
                }
            },
            Expr::Await(Await { expr, span: _ }) => estree::Expression::AwaitExpression {
                argument: Box::new(expr.transpile())
            },
        }
    }
}
