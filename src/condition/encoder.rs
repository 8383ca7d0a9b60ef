// SPDX-License-Identifier: MIT

//! Predicate serialization
//!
//! Encodes an expression tree into the structure downstream evaluators read:
//! - comparisons: `{"cmp_op": <tag>, "left": <placeholder>, "right": <placeholder | literal>}`
//! - logical nodes: `{"logical_op": <tag>, "left": <node>, "right": <node | null>}`

use serde_json::{json, Value};

use super::ast::{Comparison, Expression, LogicalExpression, LogicalOp};

/// Encode an expression tree
pub fn encode(expr: &Expression) -> Value {
    match expr {
        Expression::Comparison(comparison) => encode_comparison(comparison),
        Expression::Logical(logical) => encode_logical(logical),
    }
}

fn encode_comparison(comparison: &Comparison) -> Value {
    json!({
        "cmp_op": comparison.op().tag(),
        "left": comparison.left().encode(),
        "right": comparison.right().encode(),
    })
}

fn encode_logical(logical: &LogicalExpression) -> Value {
    match logical {
        LogicalExpression::Unary { op, operand } => json!({
            "logical_op": LogicalOp::from(*op).tag(),
            "left": encode(operand),
            "right": Value::Null,
        }),
        LogicalExpression::Binary { op, left, right } => json!({
            "logical_op": LogicalOp::from(*op).tag(),
            "left": encode(left),
            "right": encode(right),
        }),
    }
}
