// SPDX-License-Identifier: MIT

//! Comparison builders on placeholders
//!
//! `examples.future().index(0).custom_property("span").greater_than(3)` reads
//! better than spelling out `Predicate::from_comparison` at every call site.

use super::ast::{CompareOp, Operand};
use super::predicate::Predicate;
use crate::placeholder::{ChannelWrappedPlaceholder, PlaceholderRef};

/// Anything that can stand on the left of a comparison
pub trait Comparable {
    fn to_placeholder_ref(&self) -> PlaceholderRef;

    fn compare(&self, op: CompareOp, right: impl Into<Operand>) -> Predicate {
        Predicate::from_comparison(op, self.to_placeholder_ref(), right)
    }

    fn equal_to(&self, right: impl Into<Operand>) -> Predicate {
        self.compare(CompareOp::Equal, right)
    }

    fn not_equal_to(&self, right: impl Into<Operand>) -> Predicate {
        self.compare(CompareOp::NotEqual, right)
    }

    fn less_than(&self, right: impl Into<Operand>) -> Predicate {
        self.compare(CompareOp::LessThan, right)
    }

    fn less_than_or_equal(&self, right: impl Into<Operand>) -> Predicate {
        self.compare(CompareOp::LessThanOrEqual, right)
    }

    fn greater_than(&self, right: impl Into<Operand>) -> Predicate {
        self.compare(CompareOp::GreaterThan, right)
    }

    fn greater_than_or_equal(&self, right: impl Into<Operand>) -> Predicate {
        self.compare(CompareOp::GreaterThanOrEqual, right)
    }
}

impl Comparable for PlaceholderRef {
    fn to_placeholder_ref(&self) -> PlaceholderRef {
        PlaceholderRef::clone(self)
    }
}

impl Comparable for ChannelWrappedPlaceholder {
    fn to_placeholder_ref(&self) -> PlaceholderRef {
        self.clone().into_ref()
    }
}

impl From<ChannelWrappedPlaceholder> for Operand {
    fn from(placeholder: ChannelWrappedPlaceholder) -> Self {
        Operand::Placeholder(placeholder.into_ref())
    }
}
