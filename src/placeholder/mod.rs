// SPDX-License-Identifier: MIT

//! Deferred value references
//!
//! A placeholder stands for a value that only exists once an upstream
//! pipeline step has run. This crate never resolves placeholders; it only
//! needs to encode them into the structured form an evaluator understands.
//! - [`Placeholder`] - the encode capability
//! - [`ChannelWrappedPlaceholder`] - a placeholder anchored to a channel
//! - [`EncodedPlaceholder`] - an opaque, already-encoded placeholder

mod channel;

pub use channel::{ChannelWrappedPlaceholder, PlaceholderOperator};

use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// A deferred value that can be encoded for a downstream evaluator.
///
/// Implementations must be immutable: `encode` is expected to return the
/// same value on every call.
pub trait Placeholder: Debug + Send + Sync {
    /// Encode this placeholder into a JSON-compatible structure
    fn encode(&self) -> Value;
}

/// Shared handle to a placeholder. Expression trees hold these without
/// owning the underlying value.
pub type PlaceholderRef = Arc<dyn Placeholder>;

/// A placeholder known only by its encoded form.
///
/// Produced when decoding a serialized predicate, where the original
/// placeholder type is no longer available.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPlaceholder {
    encoded: Value,
}

impl EncodedPlaceholder {
    pub fn new(encoded: Value) -> Self {
        Self { encoded }
    }

    pub fn into_ref(self) -> PlaceholderRef {
        Arc::new(self)
    }
}

impl Placeholder for EncodedPlaceholder {
    fn encode(&self) -> Value {
        self.encoded.clone()
    }
}
