// SPDX-License-Identifier: MIT

//! Placeholders anchored to a channel

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{Placeholder, PlaceholderRef};
use crate::channel::Channel;

/// One step of an accessor chain applied to a channel's artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlaceholderOperator {
    /// Select one artifact from the channel
    Index { index: usize },
    /// The artifact's value payload
    Value,
    /// The artifact's URI
    Uri,
    /// A typed artifact property
    Property { key: String },
    /// A free-form custom property
    CustomProperty { key: String },
}

/// Placeholder for (a projection of) the artifacts a channel will hold.
///
/// Accessors never modify `self`; each returns a new placeholder with one
/// more operator in its chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelWrappedPlaceholder {
    channel: Arc<Channel>,
    operators: Vec<PlaceholderOperator>,
}

impl ChannelWrappedPlaceholder {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel: Arc::new(channel),
            operators: Vec::new(),
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn operators(&self) -> &[PlaceholderOperator] {
        &self.operators
    }

    /// Append an operator to the accessor chain
    pub fn with_operator(&self, operator: PlaceholderOperator) -> Self {
        let mut operators = self.operators.clone();
        operators.push(operator);
        Self {
            channel: Arc::clone(&self.channel),
            operators,
        }
    }

    pub fn index(&self, index: usize) -> Self {
        self.with_operator(PlaceholderOperator::Index { index })
    }

    pub fn value(&self) -> Self {
        self.with_operator(PlaceholderOperator::Value)
    }

    pub fn uri(&self) -> Self {
        self.with_operator(PlaceholderOperator::Uri)
    }

    pub fn property(&self, key: impl Into<String>) -> Self {
        self.with_operator(PlaceholderOperator::Property { key: key.into() })
    }

    pub fn custom_property(&self, key: impl Into<String>) -> Self {
        self.with_operator(PlaceholderOperator::CustomProperty { key: key.into() })
    }

    pub fn into_ref(self) -> PlaceholderRef {
        Arc::new(self)
    }
}

impl Placeholder for ChannelWrappedPlaceholder {
    fn encode(&self) -> Value {
        json!({
            "channel": &*self.channel,
            "operators": &self.operators,
        })
    }
}

impl From<ChannelWrappedPlaceholder> for PlaceholderRef {
    fn from(placeholder: ChannelWrappedPlaceholder) -> Self {
        placeholder.into_ref()
    }
}
