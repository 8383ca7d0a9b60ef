// SPDX-License-Identifier: MIT

//! Predicates for conditional pipeline execution
//!
//! This module provides construction and serialization of predicate trees.
//! Predicates can be built directly:
//! - `Predicate::from_comparison(CompareOp::Equal, placeholder, 5)`
//! - `placeholder.greater_than(Literal::float(0.8)?).logical_and(&other)`
//!
//! or parsed from condition text such as `blessing == 1 and span > 3`.

mod ast;
mod compare;
mod decoder;
mod encoder;
mod parser;
mod predicate;

pub use ast::{
    BinaryOp, CompareOp, Comparison, Expression, FiniteFloat, Literal, LogicalExpression,
    LogicalOp, Operand, UnaryOp,
};
pub use compare::Comparable;
pub use parser::{parse, Bindings};
pub use predicate::Predicate;
