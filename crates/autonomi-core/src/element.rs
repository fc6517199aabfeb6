//! Shared shape of the asynchronously provisioned elements.
//!
//! Nodes, transports and attachments are created and deleted through the same
//! "accepted, processing" lifecycle. The [`Element`] trait exposes the few fields
//! convergence logic needs without caring which concrete element it observes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ElementId;
use crate::state::AdministrativeState;

/// Which kind of element an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A node (cloud, access, bridge or router endpoint).
    Node,
    /// A transport between two locations.
    Transport,
    /// An attachment binding a node to a transport.
    Attachment,
}

impl ResourceKind {
    /// Collection segment used in REST paths.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Node => "nodes",
            Self::Transport => "transports",
            Self::Attachment => "attachments",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Node => "node",
            Self::Transport => "transport",
            Self::Attachment => "attachment",
        })
    }
}

/// Structured failure detail the backend attaches to elements in an error state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupportError {
    /// Machine-readable error code (e.g. `ERR_INTERNAL`).
    #[serde(default)]
    pub code: String,
    /// Human-readable message.
    #[serde(default)]
    pub msg: String,
}

/// Fields every backend resource carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseModel {
    /// Resource identifier.
    #[serde(default)]
    pub id: ElementId,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The `{"data": ...}` envelope wrapping single resources and most lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data<T> {
    /// Wrapped payload.
    pub data: T,
}

impl<T> Data<T> {
    /// Wrap a payload.
    pub const fn new(data: T) -> Self {
        Self { data }
    }

    /// Unwrap the payload.
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// An element whose administrative state can be polled.
pub trait Element: Send + Sync + 'static {
    /// Kind reported in logs and errors.
    const KIND: ResourceKind;

    /// Identifier of the element.
    fn id(&self) -> ElementId;

    /// Current administrative state.
    fn state(&self) -> AdministrativeState;

    /// Backend failure detail, present when the element is in an error state.
    fn support_error(&self) -> Option<&SupportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_and_collection() {
        assert_eq!(ResourceKind::Node.to_string(), "node");
        assert_eq!(ResourceKind::Transport.collection(), "transports");
        assert_eq!(ResourceKind::Attachment.collection(), "attachments");
    }

    #[test]
    fn base_model_tolerates_missing_fields() {
        let base: BaseModel = serde_json::from_str("{}").unwrap();
        assert!(base.id.is_nil());
        assert!(base.created_at.is_none());
    }

    #[test]
    fn envelope_unwraps() {
        let wrapped: Data<SupportError> =
            serde_json::from_str(r#"{"data":{"code":"ERR_INTERNAL","msg":"boom"}}"#).unwrap();
        let inner = wrapped.into_inner();
        assert_eq!(inner.code, "ERR_INTERNAL");
        assert_eq!(inner.msg, "boom");
    }
}
