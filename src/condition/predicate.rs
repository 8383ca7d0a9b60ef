// SPDX-License-Identifier: MIT

//! Immutable predicate facade
//!
//! A `Predicate` wraps one expression root. Combinators never touch their
//! operands: they allocate a new root that shares the existing subtrees.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

use super::ast::{CompareOp, Comparison, Expression, LogicalExpression, Operand};
use super::{decoder, encoder};
use crate::error::Result;
use crate::placeholder::PlaceholderRef;

/// Boolean expression over placeholders and literals
#[derive(Debug, Clone)]
pub struct Predicate {
    root: Arc<Expression>,
}

impl Predicate {
    fn from_expression(expr: impl Into<Expression>) -> Self {
        Self {
            root: Arc::new(expr.into()),
        }
    }

    /// Build a predicate comparing a placeholder to a literal or another
    /// placeholder
    pub fn from_comparison(
        op: CompareOp,
        left: PlaceholderRef,
        right: impl Into<Operand>,
    ) -> Self {
        Self::from_expression(Comparison::new(op, left, right))
    }

    /// Applies a NOT operation to the predicate
    pub fn negated(&self) -> Self {
        Self::from_expression(LogicalExpression::not(Arc::clone(&self.root)))
    }

    /// Applies an AND operation
    pub fn logical_and(&self, other: &Predicate) -> Self {
        Self::from_expression(LogicalExpression::and(
            Arc::clone(&self.root),
            Arc::clone(&other.root),
        ))
    }

    /// Applies an OR operation
    pub fn logical_or(&self, other: &Predicate) -> Self {
        Self::from_expression(LogicalExpression::or(
            Arc::clone(&self.root),
            Arc::clone(&other.root),
        ))
    }

    pub fn root(&self) -> &Expression {
        &self.root
    }

    /// Encode the whole tree into its JSON-compatible form
    pub fn to_serializable(&self) -> Value {
        encoder::encode(&self.root)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_serializable())?)
    }

    /// Rebuild a predicate from its serialized form. Placeholders come back
    /// as opaque [`EncodedPlaceholder`](crate::placeholder::EncodedPlaceholder)s.
    pub fn from_serializable(value: &Value) -> Result<Self> {
        let root = decoder::decode(value)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_serializable().serialize(serializer)
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        self.negated()
    }
}

impl std::ops::BitAnd for Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Predicate) -> Predicate {
        self.logical_and(&rhs)
    }
}

impl std::ops::BitOr for Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Predicate) -> Predicate {
        self.logical_or(&rhs)
    }
}
