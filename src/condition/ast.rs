// SPDX-License-Identifier: MIT

//! Expression tree for predicates

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ExpressionError;
use crate::placeholder::PlaceholderRef;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// <
    LessThan,
    /// <=
    LessThanOrEqual,
    /// >
    GreaterThan,
    /// >=
    GreaterThanOrEqual,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Equal,
        CompareOp::NotEqual,
        CompareOp::LessThan,
        CompareOp::LessThanOrEqual,
        CompareOp::GreaterThan,
        CompareOp::GreaterThanOrEqual,
    ];

    /// Wire tag used in serialized predicates. Changing any of these
    /// breaks existing consumers.
    pub fn tag(&self) -> &'static str {
        match self {
            CompareOp::Equal => "EQUAL",
            CompareOp::NotEqual => "NOT_EQUAL",
            CompareOp::LessThan => "LESS_THAN",
            CompareOp::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            CompareOp::GreaterThan => "GREATER_THAN",
            CompareOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tag() == tag)
    }

    /// Operator as written in condition text
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::LessThan => "<",
            CompareOp::LessThanOrEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanOrEqual => ">=",
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical operators, as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    Not,
    And,
    Or,
}

impl LogicalOp {
    pub fn tag(&self) -> &'static str {
        match self {
            LogicalOp::Not => "not",
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "not" => Some(LogicalOp::Not),
            "and" => Some(LogicalOp::And),
            "or" => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Operators taking a single operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
}

/// Operators taking two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
}

impl From<UnaryOp> for LogicalOp {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Not => LogicalOp::Not,
        }
    }
}

impl From<BinaryOp> for LogicalOp {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::And => LogicalOp::And,
            BinaryOp::Or => LogicalOp::Or,
        }
    }
}

/// A float literal. NaN and the infinities have no JSON form, so they are
/// rejected when the literal is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FiniteFloat(f64);

impl FiniteFloat {
    pub fn new(value: f64) -> Result<Self, ExpressionError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ExpressionError::ArgumentType(format!(
                "float literal must be finite, got {}",
                value
            )))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for FiniteFloat {
    type Error = ExpressionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Literal values allowed on the right of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(FiniteFloat),
    String(String),
}

impl Literal {
    /// Build a float literal, rejecting NaN and the infinities
    pub fn float(value: f64) -> Result<Self, ExpressionError> {
        FiniteFloat::new(value).map(Literal::Float)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Int(i) => Value::from(*i),
            Literal::Float(f) => Value::from(f.get()),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

impl TryFrom<f64> for Literal {
    type Error = ExpressionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Literal::float(value)
    }
}

impl TryFrom<f32> for Literal {
    type Error = ExpressionError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Literal::float(value.into())
    }
}

impl TryFrom<&Value> for Literal {
    type Error = ExpressionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Literal::String(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Literal::Int(i))
                } else if n.is_u64() {
                    Err(ExpressionError::ArgumentType(format!(
                        "integer {} does not fit in i64",
                        n
                    )))
                } else {
                    let f = n.as_f64().ok_or_else(|| {
                        ExpressionError::ArgumentType(format!("unrepresentable number {}", n))
                    })?;
                    Literal::float(f)
                }
            }
            other => Err(ExpressionError::ArgumentType(format!(
                "expected int, float or string literal, got {}",
                other
            ))),
        }
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone)]
pub enum Operand {
    Literal(Literal),
    Placeholder(PlaceholderRef),
}

impl Operand {
    /// Placeholders are encoded; literals, strings included, pass through raw.
    pub fn encode(&self) -> Value {
        match self {
            Operand::Literal(literal) => literal.to_value(),
            Operand::Placeholder(placeholder) => placeholder.encode(),
        }
    }
}

impl From<Literal> for Operand {
    fn from(literal: Literal) -> Self {
        Operand::Literal(literal)
    }
}

impl From<PlaceholderRef> for Operand {
    fn from(placeholder: PlaceholderRef) -> Self {
        Operand::Placeholder(placeholder)
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Literal(Literal::Int(value))
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Literal(Literal::Int(value.into()))
    }
}

impl From<u32> for Operand {
    fn from(value: u32) -> Self {
        Operand::Literal(Literal::Int(value.into()))
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Literal(Literal::String(value.to_string()))
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Literal(Literal::String(value))
    }
}

/// Leaf node: `left <op> right`
#[derive(Debug, Clone)]
pub struct Comparison {
    op: CompareOp,
    left: PlaceholderRef,
    right: Operand,
}

impl Comparison {
    pub fn new(op: CompareOp, left: PlaceholderRef, right: impl Into<Operand>) -> Self {
        Self {
            op,
            left,
            right: right.into(),
        }
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn left(&self) -> &PlaceholderRef {
        &self.left
    }

    pub fn right(&self) -> &Operand {
        &self.right
    }
}

/// Composite node. Arity is fixed by the variant.
#[derive(Debug, Clone)]
pub enum LogicalExpression {
    Unary {
        op: UnaryOp,
        operand: Arc<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Arc<Expression>,
        right: Arc<Expression>,
    },
}

impl LogicalExpression {
    pub fn not(operand: Arc<Expression>) -> Self {
        LogicalExpression::Unary {
            op: UnaryOp::Not,
            operand,
        }
    }

    pub fn and(left: Arc<Expression>, right: Arc<Expression>) -> Self {
        LogicalExpression::Binary {
            op: BinaryOp::And,
            left,
            right,
        }
    }

    pub fn or(left: Arc<Expression>, right: Arc<Expression>) -> Self {
        LogicalExpression::Binary {
            op: BinaryOp::Or,
            left,
            right,
        }
    }

    pub fn op(&self) -> LogicalOp {
        match self {
            LogicalExpression::Unary { op, .. } => (*op).into(),
            LogicalExpression::Binary { op, .. } => (*op).into(),
        }
    }
}

/// A predicate expression node
#[derive(Debug, Clone)]
pub enum Expression {
    Comparison(Comparison),
    Logical(LogicalExpression),
}

impl From<Comparison> for Expression {
    fn from(comparison: Comparison) -> Self {
        Expression::Comparison(comparison)
    }
}

impl From<LogicalExpression> for Expression {
    fn from(logical: LogicalExpression) -> Self {
        Expression::Logical(logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_op_tags() {
        assert_eq!(CompareOp::Equal.tag(), "EQUAL");
        assert_eq!(CompareOp::NotEqual.tag(), "NOT_EQUAL");
        assert_eq!(CompareOp::LessThan.tag(), "LESS_THAN");
        assert_eq!(CompareOp::LessThanOrEqual.tag(), "LESS_THAN_OR_EQUAL");
        assert_eq!(CompareOp::GreaterThan.tag(), "GREATER_THAN");
        assert_eq!(
            CompareOp::GreaterThanOrEqual.tag(),
            "GREATER_THAN_OR_EQUAL"
        );
    }

    #[test]
    fn test_compare_op_from_tag() {
        for op in CompareOp::ALL {
            assert_eq!(CompareOp::from_tag(op.tag()), Some(op));
        }
        assert_eq!(CompareOp::from_tag("__eq__"), None);
        assert_eq!(CompareOp::from_tag("equal"), None);
    }

    #[test]
    fn test_compare_op_display() {
        assert_eq!(format!("{}", CompareOp::Equal), "==");
        assert_eq!(format!("{}", CompareOp::NotEqual), "!=");
        assert_eq!(format!("{}", CompareOp::LessThan), "<");
        assert_eq!(format!("{}", CompareOp::LessThanOrEqual), "<=");
        assert_eq!(format!("{}", CompareOp::GreaterThan), ">");
        assert_eq!(format!("{}", CompareOp::GreaterThanOrEqual), ">=");
    }

    #[test]
    fn test_logical_op_tags() {
        assert_eq!(LogicalOp::Not.tag(), "not");
        assert_eq!(LogicalOp::And.tag(), "and");
        assert_eq!(LogicalOp::Or.tag(), "or");
        assert_eq!(LogicalOp::from_tag("or"), Some(LogicalOp::Or));
        assert_eq!(LogicalOp::from_tag("AND"), None);
    }

    #[test]
    fn test_arity_ops_map_to_logical_op() {
        assert_eq!(LogicalOp::from(UnaryOp::Not), LogicalOp::Not);
        assert_eq!(LogicalOp::from(BinaryOp::And), LogicalOp::And);
        assert_eq!(LogicalOp::from(BinaryOp::Or), LogicalOp::Or);
    }

    #[test]
    fn test_literal_from_value() {
        assert_eq!(Literal::try_from(&json!(5)), Ok(Literal::Int(5)));
        assert_eq!(Literal::try_from(&json!(-3)), Ok(Literal::Int(-3)));
        assert_eq!(Literal::try_from(&json!(0.5)), Literal::float(0.5));
        assert_eq!(
            Literal::try_from(&json!(0.5)).unwrap().to_value(),
            json!(0.5)
        );
        assert_eq!(
            Literal::try_from(&json!("forty-two")),
            Ok(Literal::String("forty-two".to_string()))
        );
    }

    #[test]
    fn test_literal_rejects_other_types() {
        for value in [
            json!(true),
            json!(null),
            json!([1, 2]),
            json!({"a": 1}),
            json!(u64::MAX),
        ] {
            assert!(matches!(
                Literal::try_from(&value),
                Err(ExpressionError::ArgumentType(_))
            ));
        }
    }

    #[test]
    fn test_float_literal_must_be_finite() {
        for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert!(matches!(
                Literal::float(value),
                Err(ExpressionError::ArgumentType(_))
            ));
            assert!(FiniteFloat::try_from(value).is_err());
        }
        assert!(Literal::try_from(f32::INFINITY).is_err());
        assert_eq!(Literal::try_from(1.5f32), Literal::float(1.5));
        assert_eq!(FiniteFloat::new(-0.25).map(FiniteFloat::get), Ok(-0.25));
    }

    #[test]
    fn test_string_operand_is_raw() {
        let operand = Operand::from("{\"encode\": 1}");
        assert_eq!(operand.encode(), json!("{\"encode\": 1}"));
    }

    #[test]
    fn test_literal_serialize_untagged() {
        assert_eq!(serde_json::to_value(Literal::Int(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(Literal::String("x".to_string())).unwrap(),
            json!("x")
        );
    }
}
