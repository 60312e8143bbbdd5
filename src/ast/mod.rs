//! Abstract syntax tree for template expressions
//!
//! These types represent the parsed form of the general-purpose template
//! syntax, the fallback dialect. Parameter macros never reach this tree;
//! they are re-parsed from the raw text on every evaluation.

use rust_decimal::Decimal;

/// AST representation of a template expression
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// Literal value (string, number, boolean, null)
    Literal(LiteralValue),

    /// Identifier, resolved as a property of the root object
    Identifier(String),

    /// Variable reference (`#name`), resolved against the evaluation context
    Variable(String),

    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp {
        /// The operator
        op: BinaryOperator,
        /// Left operand
        left: Box<ExpressionNode>,
        /// Right operand
        right: Box<ExpressionNode>,
    },

    /// Unary operation (negation, not)
    UnaryOp {
        /// The operator
        op: UnaryOperator,
        /// The operand
        operand: Box<ExpressionNode>,
    },

    /// Property navigation (`object.property`)
    Path {
        /// Base expression
        base: Box<ExpressionNode>,
        /// Property name
        path: String,
    },

    /// Index access (`array[index]`)
    Index {
        /// Base expression
        base: Box<ExpressionNode>,
        /// Index expression
        index: Box<ExpressionNode>,
    },

    /// Ternary conditional (`condition ? then : else`)
    Conditional {
        /// Condition
        condition: Box<ExpressionNode>,
        /// Value when the condition holds
        then_expr: Box<ExpressionNode>,
        /// Value otherwise
        else_expr: Box<ExpressionNode>,
    },
}

/// Literal values in template expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Boolean literal
    Boolean(bool),
    /// Integer literal
    Integer(i64),
    /// Decimal literal
    Decimal(Decimal),
    /// String literal
    String(String),
    /// Null literal
    Null,
}

/// Binary operators, loosest to tightest binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Logical or (`||`)
    Or,
    /// Logical and (`&&`)
    And,
    /// Equality (`==`)
    Equal,
    /// Inequality (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessThanOrEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterThanOrEqual,
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Remainder (`%`)
    Modulo,
}

impl BinaryOperator {
    /// Source form of the operator, for error messages
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-`)
    Minus,
    /// Logical not (`!`)
    Not,
}
