//! Transport resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::{BaseModel, Element, ResourceKind, SupportError};
use crate::error::{require, Result, Validate};
use crate::ids::{ElementId, WorkspaceId};
use crate::product::{AddProduct, Product};
use crate::state::AdministrativeState;

/// Product of a transport: a link from `location` to `location_to`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportProduct {
    /// Base catalogue product, `location` being the A side.
    #[serde(flatten)]
    pub product: Product,
    /// Location of the Z side.
    pub location_to: String,
}

/// VLANs allocated on each side of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportVlans {
    /// VLAN on the A side.
    #[serde(rename = "aVlan", skip_serializing_if = "Option::is_none")]
    pub a_vlan: Option<i64>,
    /// VLAN on the Z side.
    #[serde(rename = "zVlan", skip_serializing_if = "Option::is_none")]
    pub z_vlan: Option<i64>,
}

/// A transport as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    /// Identifier and timestamps.
    #[serde(flatten)]
    pub base: BaseModel,
    /// Parent workspace.
    pub workspace_id: WorkspaceId,
    /// Transport name.
    #[serde(default)]
    pub name: String,
    /// Current administrative state.
    #[serde(rename = "administrativeState")]
    pub state: AdministrativeState,
    /// When the transport reached `deployed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
    /// Failure detail when the transport is in an error state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SupportError>,
    /// Allocated VLANs.
    #[serde(default)]
    pub vlans: TransportVlans,
    /// Both ends are in the same location.
    #[serde(default)]
    pub is_local: bool,
    /// Ordered product.
    #[serde(default)]
    pub product: TransportProduct,
    /// Provider-side connection identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub connection_id: String,
}

impl Element for Transport {
    const KIND: ResourceKind = ResourceKind::Transport;

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

/// Payload for creating a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransport {
    /// Transport name.
    pub name: String,
    /// Transport product to order.
    pub product: AddProduct,
}

impl CreateTransport {
    /// Order the transport product `sku` under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product: AddProduct::new(sku),
        }
    }
}

impl Validate for CreateTransport {
    fn validate(&self) -> Result<()> {
        require(&self.name, "CreateTransport", "name")?;
        self.product.check("CreateTransport")
    }
}
