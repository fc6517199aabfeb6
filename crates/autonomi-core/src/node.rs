//! Node resources.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::{BaseModel, Element, ResourceKind, SupportError};
use crate::error::{require, Result, Validate, ValidationError};
use crate::ids::{ElementId, WorkspaceId};
use crate::port::PhysicalPort;
use crate::product::{AddProduct, Product};
use crate::state::AdministrativeState;

/// Role of a node in the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Customer access through a physical or virtual port.
    Access,
    /// Cloud service provider on-ramp.
    Cloud,
    /// Bridge between workspaces.
    Bridge,
    /// Virtual router.
    Router,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Access => "access",
            Self::Cloud => "cloud",
            Self::Bridge => "bridge",
            Self::Router => "router",
        })
    }
}

/// How an access node reaches the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessProductType {
    /// Through a physical port.
    Physical,
    /// Through a virtual circuit.
    Virtual,
}

/// Product of a node, extended with cloud provider details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeProduct {
    /// Base catalogue product.
    #[serde(flatten)]
    pub product: Product,
    /// Cloud provider name (e.g. `AWS`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub csp_name: String,
    /// Provider name on the underlay network.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub csp_name_underlay: String,
    /// Provider city.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub csp_city: String,
    /// Provider region (e.g. `eu-central-1`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub csp_region: String,
    /// Access product flavour, only set on access nodes.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub access_type: Option<AccessProductType>,
}

/// Provider-side port a node is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Port {
    /// Provider port identifier.
    pub id: String,
    /// Location of the port.
    pub location_id: String,
    /// Cloud provider name.
    pub csp_name: String,
    /// Provider name on the underlay network.
    pub csp_name_underlay: String,
}

/// Credentials the cloud provider needs to accept the connection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderCloudConfig {
    /// Google Cloud partner interconnect pairing key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pairing_key: String,
    /// Account at the cloud provider, not the Autonomi account.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    /// Azure ExpressRoute service key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_key: String,
}

/// Service key issued for some cloud providers once the node is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceKey {
    /// Key value.
    pub id: String,
    /// When the key stops being accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// Key label.
    pub name: String,
}

/// A node as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Identifier and timestamps.
    #[serde(flatten)]
    pub base: BaseModel,
    /// Parent workspace.
    pub workspace_id: WorkspaceId,
    /// Node name.
    #[serde(default)]
    pub name: String,
    /// Current administrative state.
    #[serde(rename = "administrativeState")]
    pub state: AdministrativeState,
    /// When the node reached `deployed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
    /// Ordered product.
    #[serde(default)]
    pub product: NodeProduct,
    /// Node role.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    /// Provider-side connection identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub connection_id: String,
    /// Provider port, once allocated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,
    /// Cloud provider credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<ProviderCloudConfig>,
    /// VLAN on the physical port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i64>,
    /// AWS Direct Connect connection id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dxcon_id: String,
    /// Failure detail when the node is in an error state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SupportError>,
    /// Physical port of an access node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_port: Option<PhysicalPort>,
    /// Service key issued by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_key: Option<ServiceKey>,
}

impl Element for Node {
    const KIND: ResourceKind = ResourceKind::Node;

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

/// Payload for creating a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNode {
    /// Node name.
    pub name: String,
    /// Node role.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Product to order.
    pub product: AddProduct,
    /// Required for cloud nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<ProviderCloudConfig>,
    /// Physical port an access node is plugged into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_port_id: Option<ElementId>,
    /// VLAN on the physical port. Left out when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i64>,
}

impl CreateNode {
    /// Start a payload with the mandatory fields.
    #[must_use]
    pub fn new(name: impl Into<String>, node_type: NodeType, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type,
            product: AddProduct::new(sku),
            provider_config: None,
            physical_port_id: None,
            vlan: None,
        }
    }

    /// Set the cloud provider configuration.
    #[must_use]
    pub fn with_provider_config(mut self, config: ProviderCloudConfig) -> Self {
        self.provider_config = Some(config);
        self
    }

    /// Attach the node to a physical port on a given VLAN.
    ///
    /// A VLAN of `0` means untagged and is not sent.
    #[must_use]
    pub fn with_physical_port(mut self, port_id: ElementId, vlan: i64) -> Self {
        self.physical_port_id = Some(port_id);
        self.vlan = (vlan != 0).then_some(vlan);
        self
    }
}

impl Validate for CreateNode {
    fn validate(&self) -> Result<()> {
        require(&self.name, "CreateNode", "name")?;
        self.product.check("CreateNode")?;
        if self.node_type == NodeType::Cloud && self.provider_config.is_none() {
            return Err(ValidationError::RequiredIf {
                payload: "CreateNode",
                field: "providerConfig",
                condition: "type is cloud",
            });
        }
        Ok(())
    }
}

/// Payload for renaming a node or a transport.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateElement {
    /// New name.
    pub name: String,
}

impl UpdateElement {
    /// Rename to `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validate for UpdateElement {
    fn validate(&self) -> Result<()> {
        require(&self.name, "UpdateElement", "name")
    }
}
