//! Attachment resources binding a node to a transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::{BaseModel, Element, ResourceKind, SupportError};
use crate::error::{Result, Validate, ValidationError};
use crate::ids::{ElementId, WorkspaceId};
use crate::state::AdministrativeState;

/// An attachment as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Identifier and timestamps.
    #[serde(flatten)]
    pub base: BaseModel,
    /// Attached transport.
    pub transport_id: ElementId,
    /// Attached node.
    pub node_id: ElementId,
    /// Current administrative state.
    #[serde(rename = "administrativeState")]
    pub state: AdministrativeState,
    /// Side of the transport the node is attached to (`a` or `z`).
    #[serde(default)]
    pub side: String,
    /// When the attachment reached `deployed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
    /// Failure detail when the attachment is in an error state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SupportError>,
    /// Parent workspace.
    pub workspace_id: WorkspaceId,
}

impl Element for Attachment {
    const KIND: ResourceKind = ResourceKind::Attachment;

    fn id(&self) -> ElementId {
        self.base.id
    }

    fn state(&self) -> AdministrativeState {
        self.state
    }

    fn support_error(&self) -> Option<&SupportError> {
        self.error.as_ref()
    }
}

/// Payload for attaching a node to a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttachment {
    /// Node to attach.
    pub node_id: ElementId,
    /// Transport to attach it to.
    pub transport_id: ElementId,
}

impl CreateAttachment {
    /// Attach `node_id` to `transport_id`.
    #[must_use]
    pub const fn new(node_id: ElementId, transport_id: ElementId) -> Self {
        Self {
            node_id,
            transport_id,
        }
    }
}

impl Validate for CreateAttachment {
    fn validate(&self) -> Result<()> {
        if self.node_id.is_nil() {
            return Err(ValidationError::Required {
                payload: "CreateAttachment",
                field: "nodeId",
            });
        }
        if self.transport_id.is_nil() {
            return Err(ValidationError::Required {
                payload: "CreateAttachment",
                field: "transportId",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_ids_are_rejected() {
        let valid = CreateAttachment::new(ElementId::generate(), ElementId::generate());
        assert!(valid.validate().is_ok());

        let missing_node = CreateAttachment::new(ElementId::default(), ElementId::generate());
        assert!(matches!(
            missing_node.validate(),
            Err(ValidationError::Required { field: "nodeId", .. })
        ));

        let missing_transport = CreateAttachment::new(ElementId::generate(), ElementId::default());
        assert!(matches!(
            missing_transport.validate(),
            Err(ValidationError::Required { field: "transportId", .. })
        ));
    }

    #[test]
    fn serializes_camel_case_ids() {
        let node_id = ElementId::generate();
        let transport_id = ElementId::generate();
        let json = serde_json::to_value(CreateAttachment::new(node_id, transport_id)).unwrap();
        assert_eq!(json["nodeId"], node_id.to_string());
        assert_eq!(json["transportId"], transport_id.to_string());
    }
}
