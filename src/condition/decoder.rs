// SPDX-License-Identifier: MIT

//! Rebuild expression trees from their serialized form
//!
//! Placeholders cannot be recovered as their original types, so every
//! encoded placeholder is wrapped in an `EncodedPlaceholder` that emits the
//! same value again. Re-serializing a decoded tree reproduces the input.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::ast::{CompareOp, Comparison, Expression, Literal, LogicalExpression, LogicalOp, Operand};
use crate::error::{ConditionError, Result};
use crate::placeholder::EncodedPlaceholder;

/// Decode a serialized expression node
pub fn decode(value: &Value) -> Result<Expression> {
    let node = value
        .as_object()
        .ok_or_else(|| malformed(format!("expected expression object, got {}", value)))?;

    match (node.get("cmp_op"), node.get("logical_op")) {
        (Some(tag), None) => decode_comparison(tag, node),
        (None, Some(tag)) => decode_logical(tag, node),
        (Some(_), Some(_)) => Err(malformed(
            "node has both cmp_op and logical_op".to_string(),
        )),
        (None, None) => Err(malformed(
            "node has neither cmp_op nor logical_op".to_string(),
        )),
    }
}

fn decode_comparison(tag: &Value, node: &Map<String, Value>) -> Result<Expression> {
    let op = tag
        .as_str()
        .and_then(CompareOp::from_tag)
        .ok_or_else(|| malformed(format!("unknown comparison operator {}", tag)))?;

    let left = match node.get("left") {
        Some(left @ Value::Object(_)) => EncodedPlaceholder::new(left.clone()).into_ref(),
        other => {
            return Err(malformed(format!(
                "comparison left side must be an encoded placeholder, got {}",
                other.unwrap_or(&Value::Null)
            )))
        }
    };

    let right = match node.get("right") {
        Some(right @ Value::Object(_)) => {
            Operand::Placeholder(EncodedPlaceholder::new(right.clone()).into_ref())
        }
        Some(right) => Operand::Literal(Literal::try_from(right).map_err(|e| {
            log::debug!("Rejected comparison operand {}: {}", right, e);
            e
        })?),
        None => return Err(malformed("comparison is missing its right side".to_string())),
    };

    Ok(Comparison::new(op, left, right).into())
}

fn decode_logical(tag: &Value, node: &Map<String, Value>) -> Result<Expression> {
    let op = tag
        .as_str()
        .and_then(LogicalOp::from_tag)
        .ok_or_else(|| malformed(format!("unknown logical operator {}", tag)))?;

    let left = match node.get("left") {
        Some(left) => Arc::new(decode(left)?),
        None => return Err(malformed(format!("'{}' is missing its left operand", op))),
    };
    let right = match node.get("right") {
        None | Some(Value::Null) => None,
        Some(right) => Some(Arc::new(decode(right)?)),
    };

    let logical = match (op, right) {
        (LogicalOp::Not, None) => LogicalExpression::not(left),
        (LogicalOp::And, Some(right)) => LogicalExpression::and(left, right),
        (LogicalOp::Or, Some(right)) => LogicalExpression::or(left, right),
        (LogicalOp::Not, Some(_)) => {
            return Err(malformed("'not' takes exactly one operand".to_string()))
        }
        (op, None) => {
            return Err(malformed(format!("'{}' takes exactly two operands", op)))
        }
    };
    Ok(logical.into())
}

fn malformed(message: String) -> ConditionError {
    log::debug!("Rejected serialized predicate: {}", message);
    ConditionError::construction(message)
}
