//! The target AST, in the shape of [ESTree](https://github.com/estree/estree) JavaScript nodes.
//!
//! These nodes are produced by [transpiling][`crate::ast::transpile`] the Dw AST,
//! and serialize (with [`serde`]) into the JSON that ESTree printers consume.
//! Only the subset of ESTree that Dw can produce is defined here.

use serde::Serialize;

/// The runtime helper object that implements Dw operations JavaScript has no operator for.
pub const RUNTIME_HELPER: &str = "__dw";

/// A complete module.
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Program {
    /// The statements of the module.
    pub body: Vec<Statement>,
    /// Always `module`.
    pub source_type: SourceType
}

/// Whether a program is a script or a module.
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[allow(missing_docs)]
    Module
}

/// A statement.
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "type")]
pub enum Statement {
    /// `let x = 1;`, `const x = 1;`
    VariableDeclaration {
        /// The kind of declaration.
        kind: VariableKind,
        /// The declared bindings. Dw always produces exactly one.
        declarations: Vec<VariableDeclarator>
    },

    /// An expression used as a statement.
    ExpressionStatement {
        #[allow(missing_docs)]
        expression: Expression
    }
}

/// The kind of a variable declaration.
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// A reassignable binding.
    Let,
    /// A binding that cannot be reassigned.
    Const
}

/// A single binding in a variable declaration.
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "type")]
pub struct VariableDeclarator {
    /// The bound name. This is always an [`Expression::Identifier`].
    pub id: Expression,
    /// The initializer.
    pub init: Expression
}

/// An expression.
#[allow(missing_docs)]
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier {
        name: String
    },
    Literal {
        value: u64,
        raw: String
    },
    CallExpression {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        optional: bool
    },
    MemberExpression {
        object: Box<Expression>,
        property: Box<Expression>,
        computed: bool,
        optional: bool
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>
    },
    LogicalExpression {
        operator: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>
    },
    AwaitExpression {
        argument: Box<Expression>
    }
}

impl Expression {
    /// Create an identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        Expression::Identifier { name: name.into() }
    }

    /// Create a non-optional call.
    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Expression::CallExpression { callee: Box::new(callee), arguments, optional: false }
    }

    /// Create a non-computed, non-optional property access (`object.property`).
    pub fn member(object: Expression, property: impl Into<String>) -> Self {
        Expression::MemberExpression {
            object: Box::new(object),
            property: Box::new(Expression::ident(property)),
            computed: false,
            optional: false
        }
    }
}

/// Binary operators which do not short-circuit.
#[allow(missing_docs)]
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    #[serde(rename = "===")] StrictEq,
    #[serde(rename = "!==")] StrictNe,
    #[serde(rename = "<")]   Lt,
    #[serde(rename = "<=")]  Le,
    #[serde(rename = ">")]   Gt,
    #[serde(rename = ">=")]  Ge,
    #[serde(rename = "+")]   Plus,
    #[serde(rename = "-")]   Minus,
    #[serde(rename = "*")]   Times,
    #[serde(rename = "/")]   Div,
    #[serde(rename = "%")]   Mod,
    #[serde(rename = "**")]  Exp,
    #[serde(rename = "&")]   BitAnd,
    #[serde(rename = "|")]   BitOr
}

/// Binary operators which short-circuit.
#[allow(missing_docs)]
#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LogicalOperator {
    #[serde(rename = "&&")] And,
    #[serde(rename = "||")] Or
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_program() {
        let program = Program {
            body: vec![
                Statement::VariableDeclaration {
                    kind: VariableKind::Const,
                    declarations: vec![VariableDeclarator {
                        id: Expression::ident("x"),
                        init: Expression::Literal { value: 1, raw: String::from("1") }
                    }]
                },
                Statement::ExpressionStatement {
                    expression: Expression::call(Expression::member(Expression::ident("console"), "log"), vec![
                        Expression::BinaryExpression {
                            operator: BinaryOperator::Exp,
                            left: Box::new(Expression::ident("x")),
                            right: Box::new(Expression::ident("y")),
                        }
                    ])
                }
            ],
            source_type: SourceType::Module
        };

        let value = serde_json::to_value(&program).unwrap();
        assert_eq!(value, json!({
            "type": "Program",
            "sourceType": "module",
            "body": [
                {
                    "type": "VariableDeclaration",
                    "kind": "const",
                    "declarations": [{
                        "type": "VariableDeclarator",
                        "id": { "type": "Identifier", "name": "x" },
                        "init": { "type": "Literal", "value": 1, "raw": "1" }
                    }]
                },
                {
                    "type": "ExpressionStatement",
                    "expression": {
                        "type": "CallExpression",
                        "callee": {
                            "type": "MemberExpression",
                            "object": { "type": "Identifier", "name": "console" },
                            "property": { "type": "Identifier", "name": "log" },
                            "computed": false,
                            "optional": false
                        },
                        "arguments": [{
                            "type": "BinaryExpression",
                            "operator": "**",
                            "left": { "type": "Identifier", "name": "x" },
                            "right": { "type": "Identifier", "name": "y" }
                        }],
                        "optional": false
                    }
                }
            ]
        }));
    }

    #[test]
    fn serialize_operators() {
        assert_eq!(serde_json::to_value(BinaryOperator::StrictNe).unwrap(), json!("!=="));
        assert_eq!(serde_json::to_value(BinaryOperator::Ge).unwrap(), json!(">="));
        assert_eq!(serde_json::to_value(LogicalOperator::Or).unwrap(), json!("||"));
        assert_eq!(serde_json::to_value(VariableKind::Let).unwrap(), json!("let"));
    }
}
