//! Evaluator for template expressions
//!
//! Walks the AST produced by the parser. Navigation misses (absent
//! properties, out-of-range indexes) are data and yield null; applying an
//! operator to unsuitable operands is an error and propagates. Nothing on
//! this path is silenced: the template syntax is the catch-all dialect, so
//! its failures are genuinely exceptional.

use crate::ast::{BinaryOperator, ExpressionNode, LiteralValue, UnaryOperator};
use crate::context::EvaluationContext;
use crate::error::{ExprError, Result};
use crate::model::Value;
use crate::parser::{TemplateExpression, TemplatePart};
use rust_decimal::Decimal;

/// Evaluate a template expression AST
///
/// `ctx` supplies `#name` variables; `root` is the object that bare
/// identifiers and property paths navigate. Either may be absent, in which
/// case the corresponding references evaluate to null.
pub fn evaluate(
    expr: &ExpressionNode,
    ctx: Option<&EvaluationContext>,
    root: Option<&Value>,
) -> Result<Value> {
    match expr {
        ExpressionNode::Literal(literal) => Ok(literal_value(literal)),
        ExpressionNode::Identifier(name) => Ok(root
            .and_then(|r| r.get(name))
            .unwrap_or(Value::Null)),
        ExpressionNode::Variable(name) => Ok(ctx
            .and_then(|c| c.variable(name))
            .cloned()
            .unwrap_or(Value::Null)),
        ExpressionNode::Path { base, path } => {
            let base = evaluate(base, ctx, root)?;
            match base {
                Value::Null => Ok(Value::Null),
                Value::Object(_) => Ok(base.get(path).unwrap_or(Value::Null)),
                other => Err(ExprError::evaluation_error(format!(
                    "cannot access property '{path}' on {}",
                    other.type_name()
                ))),
            }
        }
        ExpressionNode::Index { base, index } => {
            let base = evaluate(base, ctx, root)?;
            let index = evaluate(index, ctx, root)?;
            evaluate_index(base, index)
        }
        ExpressionNode::UnaryOp { op, operand } => {
            let operand = evaluate(operand, ctx, root)?;
            evaluate_unary(*op, operand)
        }
        ExpressionNode::BinaryOp { op, left, right } => match op {
            // Logical operators short-circuit
            BinaryOperator::And | BinaryOperator::Or => {
                let left = boolean_operand(*op, evaluate(left, ctx, root)?)?;
                if (*op == BinaryOperator::And && !left) || (*op == BinaryOperator::Or && left) {
                    return Ok(Value::Boolean(left));
                }
                let right = boolean_operand(*op, evaluate(right, ctx, root)?)?;
                Ok(Value::Boolean(right))
            }
            _ => {
                let left = evaluate(left, ctx, root)?;
                let right = evaluate(right, ctx, root)?;
                evaluate_binary(*op, left, right)
            }
        },
        ExpressionNode::Conditional {
            condition,
            then_expr,
            else_expr,
        } => {
            let condition = evaluate(condition, ctx, root)?;
            match condition {
                Value::Boolean(true) => evaluate(then_expr, ctx, root),
                Value::Boolean(false) => evaluate(else_expr, ctx, root),
                other => Err(ExprError::evaluation_error(format!(
                    "ternary condition must be a boolean, got {}",
                    other.type_name()
                ))),
            }
        }
    }
}

impl TemplateExpression {
    /// Evaluate this template
    ///
    /// A template that is a single `#{...}` span yields that expression's
    /// typed value; any mix of parts concatenates into a string.
    pub fn evaluate(
        &self,
        ctx: Option<&EvaluationContext>,
        root: Option<&Value>,
    ) -> Result<Value> {
        match self.parts() {
            [TemplatePart::Expression(expr)] => evaluate(expr, ctx, root),
            parts => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Literal(text) => out.push_str(text),
                        TemplatePart::Expression(expr) => {
                            out.push_str(&evaluate(expr, ctx, root)?.to_string());
                        }
                    }
                }
                Ok(Value::String(out))
            }
        }
    }
}

fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Boolean(b) => Value::Boolean(*b),
        LiteralValue::Integer(i) => Value::Integer(*i),
        LiteralValue::Decimal(d) => Value::Decimal(*d),
        LiteralValue::String(s) => Value::String(s.clone()),
        LiteralValue::Null => Value::Null,
    }
}

fn evaluate_index(base: Value, index: Value) -> Result<Value> {
    let position = match index {
        Value::Integer(i) => i,
        other => {
            return Err(ExprError::evaluation_error(format!(
                "index must be an integer, got {}",
                other.type_name()
            )));
        }
    };
    match base {
        Value::Null => Ok(Value::Null),
        Value::Array(_) => {
            let element = usize::try_from(position)
                .ok()
                .and_then(|i| base.index(i));
            Ok(element.unwrap_or(Value::Null))
        }
        other => Err(ExprError::evaluation_error(format!(
            "cannot index into {}",
            other.type_name()
        ))),
    }
}

fn evaluate_unary(op: UnaryOperator, operand: Value) -> Result<Value> {
    match (op, operand) {
        (UnaryOperator::Minus, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| ExprError::arithmetic_error("integer overflow in negation")),
        (UnaryOperator::Minus, Value::Decimal(d)) => Ok(Value::Decimal(-d)),
        (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOperator::Minus, other) => Err(ExprError::evaluation_error(format!(
            "cannot negate {}",
            other.type_name()
        ))),
        (UnaryOperator::Not, other) => Err(ExprError::evaluation_error(format!(
            "cannot apply '!' to {}",
            other.type_name()
        ))),
    }
}

fn evaluate_binary(op: BinaryOperator, left: Value, right: Value) -> Result<Value> {
    match op {
        BinaryOperator::Equal => Ok(Value::Boolean(values_equal(&left, &right))),
        BinaryOperator::NotEqual => Ok(Value::Boolean(!values_equal(&left, &right))),
        BinaryOperator::Add => evaluate_add(left, right),
        BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide
        | BinaryOperator::Modulo => evaluate_arithmetic(op, left, right),
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => evaluate_comparison(op, left, right),
        // Handled in `evaluate` for short-circuiting
        BinaryOperator::And | BinaryOperator::Or => unreachable!("logical operators short-circuit"),
    }
}

fn evaluate_add(left: Value, right: Value) -> Result<Value> {
    match (&left, &right) {
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (Value::Integer(a), Value::Integer(b)) => a
            .checked_add(*b)
            .map(Value::Integer)
            .ok_or_else(|| ExprError::arithmetic_error("integer overflow in addition")),
        _ => match (as_decimal(&left), as_decimal(&right)) {
            (Some(a), Some(b)) => Ok(Value::Decimal(a + b)),
            _ => Err(operand_error(BinaryOperator::Add, &left, &right)),
        },
    }
}

fn evaluate_arithmetic(op: BinaryOperator, left: Value, right: Value) -> Result<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (&left, &right) {
        return match op {
            BinaryOperator::Subtract => a
                .checked_sub(*b)
                .map(Value::Integer)
                .ok_or_else(|| ExprError::arithmetic_error("integer overflow in subtraction")),
            BinaryOperator::Multiply => a
                .checked_mul(*b)
                .map(Value::Integer)
                .ok_or_else(|| ExprError::arithmetic_error("integer overflow in multiplication")),
            BinaryOperator::Divide => a
                .checked_div(*b)
                .map(Value::Integer)
                .ok_or_else(|| ExprError::arithmetic_error("division by zero")),
            BinaryOperator::Modulo => a
                .checked_rem(*b)
                .map(Value::Integer)
                .ok_or_else(|| ExprError::arithmetic_error("division by zero")),
            _ => unreachable!(),
        };
    }

    let (Some(a), Some(b)) = (as_decimal(&left), as_decimal(&right)) else {
        return Err(operand_error(op, &left, &right));
    };
    match op {
        BinaryOperator::Subtract => Ok(Value::Decimal(a - b)),
        BinaryOperator::Multiply => Ok(Value::Decimal(a * b)),
        BinaryOperator::Divide => {
            if b.is_zero() {
                Err(ExprError::arithmetic_error("division by zero"))
            } else {
                Ok(Value::Decimal(a / b))
            }
        }
        BinaryOperator::Modulo => {
            if b.is_zero() {
                Err(ExprError::arithmetic_error("division by zero"))
            } else {
                Ok(Value::Decimal(a % b))
            }
        }
        _ => unreachable!(),
    }
}

fn evaluate_comparison(op: BinaryOperator, left: Value, right: Value) -> Result<Value> {
    let ordering = match (&left, &right) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => match (as_decimal(&left), as_decimal(&right)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => return Err(operand_error(op, &left, &right)),
        },
    };
    let result = match op {
        BinaryOperator::LessThan => ordering.is_lt(),
        BinaryOperator::LessThanOrEqual => ordering.is_le(),
        BinaryOperator::GreaterThan => ordering.is_gt(),
        BinaryOperator::GreaterThanOrEqual => ordering.is_ge(),
        _ => unreachable!(),
    };
    Ok(Value::Boolean(result))
}

fn values_equal(left: &Value, right: &Value) -> bool {
    // Cross-type numeric equality: 1 == 1.0
    if let (Some(a), Some(b)) = (as_decimal(left), as_decimal(right)) {
        return a == b;
    }
    left == right
}

fn boolean_operand(op: BinaryOperator, value: Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(ExprError::evaluation_error(format!(
            "operand of '{}' must be a boolean, got {}",
            op.symbol(),
            other.type_name()
        ))),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Integer(i) => Some(Decimal::from(*i)),
        Value::Decimal(d) => Some(*d),
        _ => None,
    }
}

fn operand_error(op: BinaryOperator, left: &Value, right: &Value) -> ExprError {
    ExprError::evaluation_error(format!(
        "cannot apply '{}' to {} and {}",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use serde_json::json;

    fn eval(input: &str) -> Result<Value> {
        evaluate(&parse_expression(input).unwrap(), None, None)
    }

    fn eval_with(input: &str, ctx: &EvaluationContext, root: &Value) -> Result<Value> {
        evaluate(&parse_expression(input).unwrap(), Some(ctx), Some(root))
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 1").unwrap(), Value::Integer(2));
        assert_eq!(eval("10 - 2 * 3").unwrap(), Value::Integer(4));
        assert_eq!(eval("7 / 2").unwrap(), Value::Integer(3));
        assert_eq!(eval("7 % 2").unwrap(), Value::Integer(1));
        assert_eq!(
            eval("1 + 0.5").unwrap(),
            Value::Decimal("1.5".parse().unwrap())
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            eval("1 / 0").unwrap_err(),
            ExprError::arithmetic_error("division by zero")
        );
        assert!(eval("1.5 / 0").is_err());
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            eval("'near-' + 'orders'").unwrap(),
            Value::String("near-orders".to_string())
        );
    }

    #[test]
    fn test_comparison_and_logic() {
        assert_eq!(eval("2 < 3 && 3 <= 3").unwrap(), Value::Boolean(true));
        assert_eq!(eval("'a' > 'b' || false").unwrap(), Value::Boolean(false));
        assert_eq!(eval("1 == 1.0").unwrap(), Value::Boolean(true));
        assert_eq!(eval("null == null").unwrap(), Value::Boolean(true));
        assert_eq!(eval("!false").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_short_circuit() {
        // The right side would error on its own; it must never run
        assert_eq!(eval("false && (1 + null == 2)").unwrap(), Value::Boolean(false));
        assert_eq!(eval("true || (1 + null == 2)").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_null_arithmetic_is_an_error() {
        let err = eval("null - null").unwrap_err();
        assert_eq!(
            err,
            ExprError::evaluation_error("cannot apply '-' to null and null")
        );
    }

    #[test]
    fn test_ternary() {
        assert_eq!(
            eval("2 > 1 ? 'yes' : 'no'").unwrap(),
            Value::String("yes".to_string())
        );
        assert!(eval("1 ? 2 : 3").is_err());
    }

    #[test]
    fn test_root_navigation() {
        let root = Value::from(json!({
            "scheme": {"name": "distributed"},
            "limits": [10, 20, 30]
        }));
        let ctx = EvaluationContext::new();
        assert_eq!(
            eval_with("scheme.name", &ctx, &root).unwrap(),
            Value::String("distributed".to_string())
        );
        assert_eq!(eval_with("limits[1]", &ctx, &root).unwrap(), Value::Integer(20));
        // Misses are null, not errors
        assert_eq!(eval_with("missing", &ctx, &root).unwrap(), Value::Null);
        assert_eq!(eval_with("scheme.missing", &ctx, &root).unwrap(), Value::Null);
        assert_eq!(eval_with("limits[99]", &ctx, &root).unwrap(), Value::Null);
        // Navigating into a scalar is an error
        assert!(eval_with("scheme.name.deeper", &ctx, &root).is_err());
    }

    #[test]
    fn test_variables() {
        let mut ctx = EvaluationContext::new();
        ctx.set_variable("region", "eu");
        let root = Value::Null;
        assert_eq!(
            eval_with("#region + '-zone'", &ctx, &root).unwrap(),
            Value::String("eu-zone".to_string())
        );
        assert_eq!(eval_with("#unknown", &ctx, &root).unwrap(), Value::Null);
    }

    #[test]
    fn test_template_concatenation() {
        use crate::parser::parse_template;
        let mut ctx = EvaluationContext::new();
        ctx.set_variable("region", "eu");
        let template = parse_template("cache-#{#region}-#{1 + 1}").unwrap();
        assert_eq!(
            template.evaluate(Some(&ctx), None).unwrap(),
            Value::String("cache-eu-2".to_string())
        );
    }

    #[test]
    fn test_single_span_template_keeps_type() {
        use crate::parser::parse_template;
        let template = parse_template("#{1 + 1}").unwrap();
        assert_eq!(template.evaluate(None, None).unwrap(), Value::Integer(2));
    }
}
