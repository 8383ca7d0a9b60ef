// SPDX-License-Identifier: MIT

//! Typed artifact channels
//!
//! Only the part of a channel that predicates need is modelled here: its
//! artifact type, where it comes from, and `future()` to anchor a
//! placeholder to it.

use serde::{Deserialize, Serialize};

use crate::error::{ConditionError, Result};
use crate::placeholder::ChannelWrappedPlaceholder;

/// Artifact type carried by a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactType {
    name: String,
}

impl ArtifactType {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConditionError::InvalidArtifactType(
                "artifact type name must not be empty".to_string(),
            ));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A channel of artifacts produced by a pipeline component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "type")]
    artifact_type: ArtifactType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    producer_component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_key: Option<String>,
}

impl Channel {
    /// Create an unattached channel of the given artifact type
    pub fn new(artifact_type: ArtifactType) -> Self {
        Self {
            artifact_type,
            producer_component_id: None,
            output_key: None,
        }
    }

    /// Attach the channel to a producing component's output
    pub fn with_producer(
        mut self,
        component_id: impl Into<String>,
        output_key: impl Into<String>,
    ) -> Self {
        self.producer_component_id = Some(component_id.into());
        self.output_key = Some(output_key.into());
        self
    }

    pub fn artifact_type(&self) -> &ArtifactType {
        &self.artifact_type
    }

    pub fn type_name(&self) -> &str {
        self.artifact_type.name()
    }

    pub fn producer_component_id(&self) -> Option<&str> {
        self.producer_component_id.as_deref()
    }

    pub fn output_key(&self) -> Option<&str> {
        self.output_key.as_deref()
    }

    /// Placeholder for the artifacts this channel will eventually hold
    pub fn future(&self) -> ChannelWrappedPlaceholder {
        ChannelWrappedPlaceholder::new(self.clone())
    }
}
